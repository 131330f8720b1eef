use regex::Regex;
use tracing::debug;

use crate::error::ProtocolError;
use crate::extract::{clean_value, compile};
use crate::models::{Route, RouteStep};
use crate::protocol::LabelSet;

#[derive(Debug, Clone)]
pub(crate) struct RouteProbes {
    labels: &'static LabelSet,
    destination: Regex,
    total_distance: Regex,
    estimated_duration: Regex,
}

impl RouteProbes {
    pub(crate) fn compile(labels: &'static LabelSet) -> Result<Self, ProtocolError> {
        let inline = |label: &'static str| compile(label, &inline_pattern(label));

        Ok(Self {
            labels,
            destination: inline(labels.itinerary_to)?,
            total_distance: inline(labels.total_distance)?,
            estimated_duration: inline(labels.estimated_duration)?,
        })
    }

    /// The route marker is searched anywhere in the text while steps must
    /// start their line. Replies in the wild rely on both behaviors.
    pub(crate) fn extract(&self, text: &str) -> Option<Route> {
        if !text.contains(self.labels.route_information) {
            return None;
        }

        let steps = self.steps(text);
        if steps.is_empty() {
            debug!("route marker present but no step lines");
            return None;
        }

        let destination = capture(&self.destination, text)
            .map(|value| value.trim_end_matches(':').trim_end().to_string())
            .filter(|value| !value.is_empty())
            .unwrap_or_else(|| self.labels.default_destination.to_string());

        Some(Route {
            destination,
            total_distance: self.total_or_sentinel(&self.total_distance, text),
            total_duration: self.total_or_sentinel(&self.estimated_duration, text),
            steps,
        })
    }

    fn steps(&self, text: &str) -> Vec<RouteStep> {
        text.lines()
            .filter_map(|line| line.strip_prefix(self.labels.step))
            .filter_map(|rest| decode_step(rest, self.labels.step_separator))
            .collect()
    }

    fn total_or_sentinel(&self, probe: &Regex, text: &str) -> String {
        capture(probe, text)
            .filter(|value| !value.is_empty())
            .unwrap_or_else(|| self.labels.not_available.to_string())
    }
}

fn inline_pattern(label: &str) -> String {
    let mut pattern = regex::escape(label);
    if label.ends_with(|ch: char| ch.is_alphanumeric()) {
        pattern.push_str(r"\b");
    }
    pattern.push_str(r"[ \t]*(.*)");
    pattern
}

fn capture(regex: &Regex, text: &str) -> Option<String> {
    regex
        .captures(text)
        .and_then(|captures| captures.get(1))
        .map(|value| clean_value(value.as_str()))
}

/// Splits a step line at the first separator. A line whose instruction is
/// empty (`Step: | 200m`) is skipped, since a step without an instruction
/// cannot be shown.
fn decode_step(rest: &str, separator: char) -> Option<RouteStep> {
    let (instruction, distance) = match rest.split_once(separator) {
        Some((instruction, distance)) => (instruction, Some(distance)),
        None => (rest, None),
    };

    let instruction = instruction.trim();
    if instruction.is_empty() {
        return None;
    }

    Some(RouteStep {
        instruction: instruction.to_string(),
        distance: distance
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .map(str::to_string),
    })
}

use regex::Regex;
use tracing::debug;

use crate::error::ProtocolError;
use crate::extract::{clean_value, compile};
use crate::models::{IdentifiedPlace, Place};
use crate::protocol::LabelSet;

/// Start of a labelled line. Any run of decoration without letters or
/// digits (indentation, bullets, heading hashes, emoji, bold markers) may
/// precede the label, as may a numbered list marker.
const LINE_LEAD: &str = r"^[^\p{L}\p{N}\r\n]*(?:\d+[.)][ \t]+[^\p{L}\p{N}\r\n]*)?";

/// Coordinates are also accepted after a separator on a shared line, as in
/// `Lat: -23.55, Long: -46.63`.
const INLINE_LEAD: &str = r"[,;|][ \t]*(?:\*\*)?";

const NUMBER_TOKEN: &str = r"^[-+]?(?:\d+(?:\.\d*)?|\.\d+)";

#[derive(Debug, Clone, Default)]
pub struct PlaceScan {
    pub places: Vec<IdentifiedPlace>,
    pub skipped_blocks: usize,
}

#[derive(Debug, Clone)]
pub(crate) struct PlaceProbes {
    labels: &'static LabelSet,
    marker: Regex,
    name: Regex,
    description: Regex,
    address: Regex,
    distance: Regex,
    category: Regex,
    lat: Regex,
    long: Regex,
    instagram: Regex,
    whatsapp: Regex,
    number: Regex,
}

impl PlaceProbes {
    pub(crate) fn compile(labels: &'static LabelSet) -> Result<Self, ProtocolError> {
        let field = |label: &'static str| compile(label, &field_pattern(label));

        Ok(Self {
            labels,
            marker: compile(labels.name, &marker_pattern(labels.name))?,
            name: field(labels.name)?,
            description: field(labels.description)?,
            address: field(labels.address)?,
            distance: field(labels.distance)?,
            category: field(labels.category)?,
            lat: compile(labels.lat, &coordinate_pattern(labels.lat))?,
            long: compile(labels.long, &coordinate_pattern(labels.long))?,
            instagram: field(labels.instagram)?,
            whatsapp: field(labels.whatsapp)?,
            number: compile(labels.lat, NUMBER_TOKEN)?,
        })
    }

    pub(crate) fn scan(&self, text: &str) -> PlaceScan {
        let mut scan = PlaceScan::default();

        for (index, block) in self.blocks(text).into_iter().enumerate() {
            match self.decode(block) {
                Some(place) => scan.places.push(IdentifiedPlace::new(place)),
                None => {
                    scan.skipped_blocks += 1;
                    debug!(block = index, "place block missing name or coordinates");
                }
            }
        }

        scan
    }

    /// Splits `text` before every name marker. Text ahead of the first marker
    /// cannot hold a record and is not returned.
    fn blocks<'a>(&self, text: &'a str) -> Vec<&'a str> {
        let starts = self
            .marker
            .find_iter(text)
            .map(|found| found.start())
            .collect::<Vec<_>>();

        starts
            .iter()
            .enumerate()
            .map(|(idx, &start)| {
                let end = starts.get(idx + 1).copied().unwrap_or(text.len());
                &text[start..end]
            })
            .collect()
    }

    fn decode(&self, block: &str) -> Option<Place> {
        let name = probe(&self.name, block).filter(|value| !value.is_empty())?;
        let latitude = self.coordinate(&self.lat, block)?;
        let longitude = self.coordinate(&self.long, block)?;

        Some(Place {
            name,
            description: probe(&self.description, block).unwrap_or_default(),
            address: probe(&self.address, block).unwrap_or_default(),
            distance: non_empty(probe(&self.distance, block)),
            category: non_empty(probe(&self.category, block))
                .unwrap_or_else(|| self.labels.default_category.to_string()),
            latitude,
            longitude,
            instagram: non_empty(probe(&self.instagram, block)),
            whatsapp: non_empty(probe(&self.whatsapp, block).map(|value| digits_only(&value))),
        })
    }

    fn coordinate(&self, probe_regex: &Regex, block: &str) -> Option<f64> {
        let value = probe(probe_regex, block)?;
        let token = self.number.find(&value)?;
        token
            .as_str()
            .parse::<f64>()
            .ok()
            .filter(|number| number.is_finite())
    }
}

fn label_head(label: &str) -> String {
    regex::escape(label.trim_end_matches(':').trim_end())
}

fn label_tail(label: &str) -> String {
    format!(r"{}(?:\*\*)?[ \t]*:", label_head(label))
}

fn marker_pattern(label: &str) -> String {
    format!(r"(?m){LINE_LEAD}{}", label_tail(label))
}

fn field_pattern(label: &str) -> String {
    format!(r"{}[ \t]*(.*)$", marker_pattern(label))
}

fn coordinate_pattern(label: &str) -> String {
    format!(r"(?m)(?:{LINE_LEAD}|{INLINE_LEAD}){}[ \t]*(.*)$", label_tail(label))
}

fn probe(regex: &Regex, block: &str) -> Option<String> {
    regex
        .captures(block)
        .and_then(|captures| captures.get(1))
        .map(|value| clean_value(value.as_str()))
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|value| !value.is_empty())
}

fn digits_only(value: &str) -> String {
    value.chars().filter(char::is_ascii_digit).collect()
}

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

use crate::error::ProtocolError;
use crate::models::{IdentifiedPlace, ParsedReply, Route};
use crate::places::{PlaceProbes, PlaceScan};
use crate::protocol::LabelSet;
use crate::route::RouteProbes;

static ENGLISH_PARSER: Lazy<ReplyParser> = Lazy::new(|| {
    ReplyParser::new(&LabelSet::ENGLISH).expect("escaped english labels always compile")
});

/// Extracts places and routes from a free-text assistant reply.
///
/// Probes are compiled once per label set. Extraction is pure and never
/// fails: text without protocol labels simply yields no records.
#[derive(Debug, Clone)]
pub struct ReplyParser {
    labels: &'static LabelSet,
    places: PlaceProbes,
    route: RouteProbes,
}

impl ReplyParser {
    pub fn new(labels: &'static LabelSet) -> Result<Self, ProtocolError> {
        Ok(Self {
            labels,
            places: PlaceProbes::compile(labels)?,
            route: RouteProbes::compile(labels)?,
        })
    }

    /// Shared parser for the default English labels.
    pub fn english() -> &'static ReplyParser {
        &ENGLISH_PARSER
    }

    pub fn labels(&self) -> &'static LabelSet {
        self.labels
    }

    /// Like [`ReplyParser::extract_places`], but also reports how many
    /// candidate blocks were dropped.
    pub fn scan_places(&self, text: &str) -> PlaceScan {
        let scan = self.places.scan(text);
        debug!(
            labels = self.labels.code,
            extracted = scan.places.len(),
            skipped = scan.skipped_blocks,
            "place blocks scanned"
        );
        scan
    }

    pub fn extract_places(&self, text: &str) -> Vec<IdentifiedPlace> {
        self.scan_places(text).places
    }

    pub fn extract_route(&self, text: &str) -> Option<Route> {
        let route = self.route.extract(text);
        if let Some(route) = route.as_ref() {
            debug!(
                labels = self.labels.code,
                steps = route.steps.len(),
                "route extracted"
            );
        }
        route
    }

    pub fn parse(&self, text: &str) -> ParsedReply {
        ParsedReply::new(self.extract_places(text), self.extract_route(text))
    }
}

pub fn extract_places(text: &str) -> Vec<IdentifiedPlace> {
    ENGLISH_PARSER.extract_places(text)
}

pub fn extract_route(text: &str) -> Option<Route> {
    ENGLISH_PARSER.extract_route(text)
}

pub fn parse_reply(text: &str) -> ParsedReply {
    ENGLISH_PARSER.parse(text)
}

/// Drops markdown bold markers and surrounding whitespace.
pub(crate) fn clean_value(raw: &str) -> String {
    raw.replace("**", "").trim().to_string()
}

pub(crate) fn compile(label: &'static str, pattern: &str) -> Result<Regex, ProtocolError> {
    Regex::new(pattern).map_err(|source| ProtocolError::InvalidPattern { label, source })
}

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Language {
    #[default]
    Pt,
    En,
    Es,
    It,
}

impl Language {
    pub const ALL: [Language; 4] = [Self::Pt, Self::En, Self::Es, Self::It];

    pub fn from_optional_str(value: Option<&str>) -> Self {
        match value.map(|v| v.trim().to_lowercase()) {
            Some(v) if v == "pt" || v == "pt-br" || v == "pt-pt" || v == "portuguese" => Self::Pt,
            Some(v) if v == "en" || v == "en-us" || v == "en-gb" || v == "english" => Self::En,
            Some(v) if v == "es" || v == "es-es" || v == "es-mx" || v == "spanish" => Self::Es,
            Some(v) if v == "it" || v == "it-it" || v == "italian" => Self::It,
            _ => Self::default(),
        }
    }

    pub fn as_code(self) -> &'static str {
        match self {
            Self::Pt => "pt",
            Self::En => "en",
            Self::Es => "es",
            Self::It => "it",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

/// Display-only identity assigned when a place is extracted. Never parsed
/// from the reply text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlaceId(Uuid);

impl PlaceId {
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl fmt::Display for PlaceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Parsed content of one place block.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Place {
    pub name: String,
    pub description: String,
    pub address: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub distance: Option<String>,
    pub category: String,
    pub latitude: f64,
    pub longitude: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instagram: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub whatsapp: Option<String>,
}

impl Place {
    pub fn coordinates(&self) -> Coordinates {
        Coordinates {
            latitude: self.latitude,
            longitude: self.longitude,
        }
    }
}

/// A place as handed to the caller: parsed content plus a fresh identity.
///
/// Compare `place` fields when checking that two extractions agree; `id`
/// differs on every run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IdentifiedPlace {
    pub id: PlaceId,
    #[serde(flatten)]
    pub place: Place,
}

impl IdentifiedPlace {
    pub fn new(place: Place) -> Self {
        Self {
            id: PlaceId::generate(),
            place,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteStep {
    pub instruction: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub distance: Option<String>,
}

/// An itinerary. Never constructed with an empty `steps` list by the
/// extractor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Route {
    pub destination: String,
    pub total_distance: String,
    pub total_duration: String,
    pub steps: Vec<RouteStep>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ParsedReply {
    #[serde(default)]
    pub places: Vec<IdentifiedPlace>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub route: Option<Route>,
}

impl ParsedReply {
    pub fn new(places: Vec<IdentifiedPlace>, route: Option<Route>) -> Self {
        Self { places, route }
    }

    pub fn has_cards(&self) -> bool {
        !self.places.is_empty() || self.route.is_some()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    User,
    Model,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    pub id: Uuid,
    pub role: Role,
    pub text: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub places: Vec<IdentifiedPlace>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub route: Option<Route>,
    pub created_at: DateTime<Utc>,
}

impl Message {
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            role: Role::User,
            text: text.into(),
            places: Vec::new(),
            route: None,
            created_at: Utc::now(),
        }
    }

    pub fn model(text: impl Into<String>, parsed: ParsedReply) -> Self {
        Self {
            id: Uuid::new_v4(),
            role: Role::Model,
            text: text.into(),
            places: parsed.places,
            route: parsed.route,
            created_at: Utc::now(),
        }
    }

    /// Model replies that produced cards are shown as cards only.
    pub fn displays_raw_text(&self) -> bool {
        self.role == Role::User || (self.places.is_empty() && self.route.is_none())
    }
}

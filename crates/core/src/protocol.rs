//! Fixed structural labels shared by the backend instruction and the reply
//! parser.
//!
//! The backend is told to keep these labels verbatim whatever language the
//! content is written in. Changing a label here changes both what the model is
//! asked to write and what the parser looks for.

use crate::error::ProtocolError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelSet {
    pub code: &'static str,

    pub name: &'static str,
    pub description: &'static str,
    pub address: &'static str,
    pub distance: &'static str,
    pub category: &'static str,
    pub lat: &'static str,
    pub long: &'static str,
    pub instagram: &'static str,
    pub whatsapp: &'static str,

    pub route_information: &'static str,
    pub itinerary_to: &'static str,
    pub total_distance: &'static str,
    pub estimated_duration: &'static str,
    pub step: &'static str,
    pub step_separator: char,

    pub default_category: &'static str,
    pub default_destination: &'static str,
    pub not_available: &'static str,
}

impl LabelSet {
    pub const ENGLISH: LabelSet = LabelSet {
        code: "en",
        name: "Name:",
        description: "Description:",
        address: "Address:",
        distance: "Distance:",
        category: "Category:",
        lat: "Lat:",
        long: "Long:",
        instagram: "Instagram:",
        whatsapp: "WhatsApp:",
        route_information: "Route Information:",
        itinerary_to: "Itinerary to",
        total_distance: "Total Distance:",
        estimated_duration: "Estimated Duration:",
        step: "Step:",
        step_separator: '|',
        default_category: "general",
        default_destination: "Destination",
        not_available: "N/A",
    };

    /// Labels used by the first deployment, whose instruction was written in
    /// Portuguese.
    pub const PORTUGUESE: LabelSet = LabelSet {
        code: "pt",
        name: "Nome:",
        description: "Descrição:",
        address: "Endereço:",
        distance: "Distância:",
        category: "Categoria:",
        lat: "Lat:",
        long: "Long:",
        instagram: "Instagram:",
        whatsapp: "WhatsApp:",
        route_information: "Informações da Rota:",
        itinerary_to: "Itinerário para",
        total_distance: "Distância Total:",
        estimated_duration: "Duração Estimada:",
        step: "Passo:",
        step_separator: '|',
        default_category: "geral",
        default_destination: "Destino",
        not_available: "N/A",
    };

    pub fn from_code(code: &str) -> Result<&'static LabelSet, ProtocolError> {
        match code.trim().to_lowercase().as_str() {
            "en" | "english" => Ok(&Self::ENGLISH),
            "pt" | "portuguese" => Ok(&Self::PORTUGUESE),
            other => Err(ProtocolError::UnknownLabelSet(other.to_string())),
        }
    }

    /// Place-block labels in the order the instruction lists them.
    pub fn place_labels(&self) -> [&'static str; 9] {
        [
            self.name,
            self.description,
            self.address,
            self.distance,
            self.category,
            self.lat,
            self.long,
            self.instagram,
            self.whatsapp,
        ]
    }
}

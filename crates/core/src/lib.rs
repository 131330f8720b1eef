pub mod error;
pub mod extract;
pub mod instruction;
pub mod models;
mod places;
pub mod protocol;
mod route;

pub use error::ProtocolError;
pub use extract::{extract_places, extract_route, parse_reply, ReplyParser};
pub use instruction::{system_instruction, with_location_context};
pub use models::*;
pub use places::PlaceScan;
pub use protocol::LabelSet;

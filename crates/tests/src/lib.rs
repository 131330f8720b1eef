//! Shared fixtures for the cross-crate tests.

use anyhow::{anyhow, Result};
use parking_lot::Mutex;
use waypoint_agents::{GenerationRequest, ReplyGenerator};

/// Two complete place blocks followed by a three-step route.
pub const PLACES_THEN_ROUTE: &str = "\
Name: **Café Lua**
Description: Rooftop coffee with a view of the old town
Address: Rua Augusta 100, Lisboa
Category: Café
Lat: 38.7107
Long: -9.1376
Instagram: @cafelua
WhatsApp: +351 912 345 678

Name: Miradouro da Graça
Description: Sunset viewpoint over the castle
Address: Largo da Graça, Lisboa
Distance: 1.2 km
Category: Viewpoint
Lat: 38.7163
Long: -9.1314

Route Information:
Itinerary to Miradouro da Graça:
Total Distance: 1.2 km
Estimated Duration: 18 min
Step: Head east on Rua Augusta | 300m
Step: Turn left onto Rua da Madalena | 500m
Step: Climb Calçada da Graça to the viewpoint
";

pub const SMALL_TALK: &str = "Olá! Para onde vamos hoje?";

/// Replays canned replies in order and records every request it receives.
pub struct ScriptedGenerator {
    replies: Mutex<Vec<Result<String>>>,
    requests: Mutex<Vec<GenerationRequest>>,
}

impl ScriptedGenerator {
    pub fn new(replies: Vec<Result<String>>) -> Self {
        Self {
            replies: Mutex::new(replies.into_iter().rev().collect()),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn replying(replies: &[&str]) -> Self {
        Self::new(replies.iter().map(|reply| Ok(reply.to_string())).collect())
    }

    pub fn requests(&self) -> Vec<GenerationRequest> {
        self.requests.lock().clone()
    }
}

impl ReplyGenerator for ScriptedGenerator {
    async fn generate(&self, request: &GenerationRequest) -> Result<String> {
        self.requests.lock().push(request.clone());
        self.replies
            .lock()
            .pop()
            .unwrap_or_else(|| Err(anyhow!("no scripted reply left")))
    }
}

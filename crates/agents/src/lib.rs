use std::sync::Arc;
use std::time::Instant;

use anyhow::Result;
use parking_lot::RwLock;
use serde::Serialize;
use tracing::{info, instrument, warn};
use waypoint_core::{
    system_instruction, with_location_context, Coordinates, IdentifiedPlace, Language, Message,
    ParsedReply, Place, ReplyParser, Role, Route,
};
use waypoint_observability::ExtractionMetrics;
use waypoint_storage::{FavoriteToggle, NotebookRepository, PlaceStats, Review};

pub const MAX_HISTORY_MESSAGES: usize = 40;

pub const FALLBACK_REPLY: &str = "Sorry, traveler. We had a problem with the magic compass.";

const EMPTY_REPLY: &str = "...";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HistoryTurn {
    pub role: Role,
    pub text: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct GenerationRequest {
    pub system_instruction: String,
    pub history: Vec<HistoryTurn>,
    pub message: String,
}

/// The generative text backend. Implementations own transport, retries and
/// timeouts.
pub trait ReplyGenerator: Send + Sync {
    async fn generate(&self, request: &GenerationRequest) -> Result<String>;
}

#[derive(Debug, Clone, Serialize)]
pub struct EnrichedPlace {
    #[serde(flatten)]
    pub entry: IdentifiedPlace,
    #[serde(flatten)]
    pub stats: PlaceStats,
}

#[derive(Debug, Default)]
struct ConversationState {
    history: Vec<Message>,
    current_places: Vec<IdentifiedPlace>,
    active_route: Option<Route>,
}

pub struct TravelAssistant<G, S>
where
    G: ReplyGenerator,
    S: NotebookRepository,
{
    generator: Arc<G>,
    store: Arc<S>,
    parser: ReplyParser,
    metrics: Arc<ExtractionMetrics>,
    state: RwLock<ConversationState>,
}

impl<G, S> TravelAssistant<G, S>
where
    G: ReplyGenerator,
    S: NotebookRepository,
{
    pub fn new(
        generator: Arc<G>,
        store: Arc<S>,
        parser: ReplyParser,
        metrics: Arc<ExtractionMetrics>,
    ) -> Self {
        Self {
            generator,
            store,
            parser,
            metrics,
            state: RwLock::new(ConversationState::default()),
        }
    }

    /// Runs one chat turn. Returns `None` for blank input.
    ///
    /// Generator failures are answered with [`FALLBACK_REPLY`] instead of an
    /// error; only notebook failures propagate.
    #[instrument(skip(self, text, location))]
    pub async fn handle_message(
        &self,
        text: &str,
        location: Option<Coordinates>,
    ) -> Result<Option<Message>> {
        let text = text.trim();
        if text.is_empty() {
            return Ok(None);
        }

        let started = Instant::now();
        let language = self.store.language().await?;
        let history = self.history_turns();
        self.push_message(Message::user(text));

        let request = GenerationRequest {
            system_instruction: system_instruction(self.parser.labels(), language),
            history,
            message: with_location_context(text, location),
        };

        let reply = match self.generator.generate(&request).await {
            Ok(reply) => self.decode_reply(reply),
            Err(err) => {
                self.metrics.inc_generator_failure();
                warn!(error = %err, "reply generation failed");
                Message::model(FALLBACK_REPLY, ParsedReply::default())
            }
        };

        {
            let mut state = self.state.write();
            if !reply.places.is_empty() {
                state.current_places = reply.places.clone();
            }
            if let Some(route) = reply.route.as_ref() {
                state.active_route = Some(route.clone());
            }
        }
        self.push_message(reply.clone());

        self.metrics.observe_latency(started.elapsed());
        info!(
            language = language.as_code(),
            places = reply.places.len(),
            route = reply.route.is_some(),
            "turn handled"
        );

        Ok(Some(reply))
    }

    pub fn history(&self) -> Vec<Message> {
        self.state.read().history.clone()
    }

    /// Places from the latest reply that produced any.
    pub fn current_places(&self) -> Vec<IdentifiedPlace> {
        self.state.read().current_places.clone()
    }

    pub fn active_route(&self) -> Option<Route> {
        self.state.read().active_route.clone()
    }

    pub async fn enrich(&self, entry: &IdentifiedPlace) -> Result<EnrichedPlace> {
        let stats = self.store.stats_for(&entry.place.name).await?;
        Ok(EnrichedPlace {
            entry: entry.clone(),
            stats,
        })
    }

    pub async fn toggle_favorite(&self, place: &Place) -> Result<FavoriteToggle> {
        self.store.toggle_favorite(place).await
    }

    pub async fn review(
        &self,
        place: &Place,
        author: Option<&str>,
        text: &str,
    ) -> Result<Option<Review>> {
        self.store.add_review(&place.name, author, text).await
    }

    pub async fn set_language(&self, language: Language) -> Result<()> {
        self.store.set_language(language).await
    }

    fn decode_reply(&self, reply: String) -> Message {
        let reply = if reply.trim().is_empty() {
            EMPTY_REPLY.to_string()
        } else {
            reply
        };

        let scan = self.parser.scan_places(&reply);
        let route = self.parser.extract_route(&reply);
        self.metrics
            .record_reply(scan.places.len(), scan.skipped_blocks, route.is_some());

        Message::model(reply, ParsedReply::new(scan.places, route))
    }

    fn history_turns(&self) -> Vec<HistoryTurn> {
        self.state
            .read()
            .history
            .iter()
            .map(|message| HistoryTurn {
                role: message.role,
                text: message.text.clone(),
            })
            .collect()
    }

    fn push_message(&self, message: Message) {
        let mut state = self.state.write();
        state.history.push(message);
        if state.history.len() > MAX_HISTORY_MESSAGES {
            let keep_from = state.history.len() - MAX_HISTORY_MESSAGES;
            state.history = state.history.split_off(keep_from);
        }
    }
}

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use once_cell::sync::OnceCell;
use serde::Serialize;
use tracing_subscriber::EnvFilter;

static TRACING_INIT: OnceCell<()> = OnceCell::new();

/// Counters for reply extraction, shared between the assistant and the API.
#[derive(Debug, Default)]
pub struct ExtractionMetrics {
    replies_total: AtomicU64,
    places_extracted_total: AtomicU64,
    blocks_skipped_total: AtomicU64,
    routes_extracted_total: AtomicU64,
    generator_failures_total: AtomicU64,
    total_latency_millis: AtomicU64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricsSnapshot {
    pub replies_total: u64,
    pub places_extracted_total: u64,
    pub blocks_skipped_total: u64,
    pub routes_extracted_total: u64,
    pub generator_failures_total: u64,
    pub avg_latency_millis: f64,
}

impl ExtractionMetrics {
    pub fn shared() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Records one processed reply and what came out of it.
    pub fn record_reply(&self, places: usize, skipped_blocks: usize, has_route: bool) {
        self.replies_total.fetch_add(1, Ordering::Relaxed);
        self.places_extracted_total
            .fetch_add(places as u64, Ordering::Relaxed);
        self.blocks_skipped_total
            .fetch_add(skipped_blocks as u64, Ordering::Relaxed);
        if has_route {
            self.routes_extracted_total.fetch_add(1, Ordering::Relaxed);
        }
    }

    pub fn inc_generator_failure(&self) {
        self.generator_failures_total
            .fetch_add(1, Ordering::Relaxed);
    }

    pub fn observe_latency(&self, duration: Duration) {
        self.total_latency_millis
            .fetch_add(duration.as_millis() as u64, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        let replies = self.replies_total.load(Ordering::Relaxed);
        let latency = self.total_latency_millis.load(Ordering::Relaxed);

        MetricsSnapshot {
            replies_total: replies,
            places_extracted_total: self.places_extracted_total.load(Ordering::Relaxed),
            blocks_skipped_total: self.blocks_skipped_total.load(Ordering::Relaxed),
            routes_extracted_total: self.routes_extracted_total.load(Ordering::Relaxed),
            generator_failures_total: self.generator_failures_total.load(Ordering::Relaxed),
            avg_latency_millis: if replies == 0 {
                0.0
            } else {
                latency as f64 / replies as f64
            },
        }
    }
}

pub fn init_tracing(service_name: &str) {
    TRACING_INIT.get_or_init(|| {
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!(
                "{}=info,waypoint_agents=info,waypoint_core=warn",
                service_name
            ))
        });

        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_current_span(true)
            .with_span_list(true)
            .init();
    });
}

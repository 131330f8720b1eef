mod config;

use std::sync::Arc;
use std::time::Instant;

use anyhow::{Context, Result};
use axum::extract::{Json, Query, State};
use axum::http::{header, HeaderValue, Method, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::Router;
use serde::{Deserialize, Serialize};
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::trace::TraceLayer;
use waypoint_core::{system_instruction, Language, ParsedReply, ReplyParser};
use waypoint_observability::{ExtractionMetrics, MetricsSnapshot};

pub use config::ApiConfig;

#[derive(Clone)]
pub struct ApiState {
    pub parser: Arc<ReplyParser>,
    pub metrics: Arc<ExtractionMetrics>,
}

#[derive(Debug, Serialize)]
struct HealthResponse {
    status: &'static str,
    timestamp_utc: String,
    labels: &'static str,
    metrics: MetricsSnapshot,
}

#[derive(Debug, Deserialize)]
struct ParseRequest {
    text: String,
}

#[derive(Debug, Deserialize)]
struct InstructionQuery {
    lang: Option<String>,
}

#[derive(Debug, Serialize)]
struct InstructionResponse {
    language: Language,
    labels: &'static str,
    instruction: String,
}

pub fn build_app(config: ApiConfig) -> Result<Router> {
    let parser = ReplyParser::new(config.labels).context("failed to compile reply parser")?;

    let state = ApiState {
        parser: Arc::new(parser),
        metrics: ExtractionMetrics::shared(),
    };

    Ok(build_router(state, &config))
}

pub fn build_router(state: ApiState, config: &ApiConfig) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/v1/replies/parse", post(parse_reply))
        .route("/v1/instruction", get(instruction))
        .layer(build_cors_layer(&config.allowed_origins))
        .layer(TraceLayer::new_for_http())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(RequestBodyLimitLayer::new(config.max_body_bytes))
        .with_state(state)
}

async fn health(State(state): State<ApiState>) -> impl IntoResponse {
    let payload = HealthResponse {
        status: "ok",
        timestamp_utc: chrono::Utc::now().to_rfc3339(),
        labels: state.parser.labels().code,
        metrics: state.metrics.snapshot(),
    };
    (StatusCode::OK, Json(payload))
}

async fn parse_reply(
    State(state): State<ApiState>,
    Json(request): Json<ParseRequest>,
) -> Response {
    if request.text.trim().is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            Json(serde_json::json!({
                "error": "empty_text",
                "message": "text must contain the assistant reply to parse"
            })),
        )
            .into_response();
    }

    let started = Instant::now();
    let scan = state.parser.scan_places(&request.text);
    let route = state.parser.extract_route(&request.text);
    state
        .metrics
        .record_reply(scan.places.len(), scan.skipped_blocks, route.is_some());
    state.metrics.observe_latency(started.elapsed());

    tracing::info!(
        places = scan.places.len(),
        skipped = scan.skipped_blocks,
        route = route.is_some(),
        "reply parsed"
    );

    let parsed = ParsedReply::new(scan.places, route);
    (StatusCode::OK, Json(parsed)).into_response()
}

async fn instruction(
    State(state): State<ApiState>,
    Query(query): Query<InstructionQuery>,
) -> impl IntoResponse {
    let language = Language::from_optional_str(query.lang.as_deref());
    let labels = state.parser.labels();

    Json(InstructionResponse {
        language,
        labels: labels.code,
        instruction: system_instruction(labels, language),
    })
}

fn build_cors_layer(allowed_origins: &[String]) -> CorsLayer {
    let origins = allowed_origins
        .iter()
        .filter_map(|origin| HeaderValue::from_str(origin).ok())
        .collect::<Vec<_>>();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE])
}

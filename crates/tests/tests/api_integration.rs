use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use serde_json::json;
use tower::ServiceExt;
use waypoint_api::{build_app, ApiConfig};
use waypoint_core::LabelSet;
use waypoint_tests::{PLACES_THEN_ROUTE, SMALL_TALK};

async fn read_json(response: axum::response::Response) -> serde_json::Value {
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&body).unwrap()
}

fn parse_request(text: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/v1/replies/parse")
        .header("content-type", "application/json")
        .body(Body::from(json!({ "text": text }).to_string()))
        .unwrap()
}

#[tokio::test]
async fn health_reports_labels_and_metrics() {
    let app = build_app(ApiConfig::default()).expect("app should build");

    let response = app
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let parsed = read_json(response).await;
    assert_eq!(parsed["status"], "ok");
    assert_eq!(parsed["labels"], "en");
    assert_eq!(parsed["metrics"]["replies_total"], 0);
}

#[tokio::test]
async fn parse_returns_places_and_route() {
    let app = build_app(ApiConfig::default()).expect("app should build");

    let response = app.oneshot(parse_request(PLACES_THEN_ROUTE)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let parsed = read_json(response).await;
    let places = parsed["places"].as_array().unwrap();
    assert_eq!(places.len(), 2);
    assert_eq!(places[0]["name"], "Café Lua");
    assert_eq!(places[0]["whatsapp"], "351912345678");
    assert!(places[0]["id"].is_string());
    assert_eq!(places[1]["distance"], "1.2 km");
    assert_eq!(parsed["route"]["destination"], "Miradouro da Graça");
    assert_eq!(parsed["route"]["steps"].as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn small_talk_parses_to_no_cards() {
    let app = build_app(ApiConfig::default()).expect("app should build");

    let response = app.oneshot(parse_request(SMALL_TALK)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let parsed = read_json(response).await;
    assert_eq!(parsed["places"], json!([]));
    assert!(parsed.get("route").is_none());
}

#[tokio::test]
async fn blank_text_is_rejected() {
    let app = build_app(ApiConfig::default()).expect("app should build");

    let response = app.oneshot(parse_request("  \n ")).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(read_json(response).await["error"], "empty_text");
}

#[tokio::test]
async fn parse_updates_health_metrics() {
    let app = build_app(ApiConfig::default()).expect("app should build");

    let response = app
        .clone()
        .oneshot(parse_request(PLACES_THEN_ROUTE))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let health = app
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();
    let parsed = read_json(health).await;
    assert_eq!(parsed["metrics"]["replies_total"], 1);
    assert_eq!(parsed["metrics"]["places_extracted_total"], 2);
    assert_eq!(parsed["metrics"]["routes_extracted_total"], 1);
}

#[tokio::test]
async fn instruction_uses_configured_labels() {
    let config = ApiConfig {
        labels: &LabelSet::PORTUGUESE,
        ..ApiConfig::default()
    };
    let app = build_app(config).expect("app should build");

    let response = app
        .oneshot(
            Request::builder()
                .uri("/v1/instruction?lang=it")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let parsed = read_json(response).await;
    assert_eq!(parsed["language"], "it");
    assert_eq!(parsed["labels"], "pt");
    let instruction = parsed["instruction"].as_str().unwrap();
    assert!(instruction.contains("Nome: [Place name]"));
    assert!(instruction.contains("LANGUAGE: IT"));
}

#[tokio::test]
async fn oversized_body_is_refused() {
    let config = ApiConfig {
        max_body_bytes: 128,
        ..ApiConfig::default()
    };
    let app = build_app(config).expect("app should build");

    let response = app.oneshot(parse_request(PLACES_THEN_ROUTE)).await.unwrap();
    assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
}

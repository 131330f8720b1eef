use std::sync::Arc;

use waypoint_agents::TravelAssistant;
use waypoint_core::{extract_places, extract_route, Coordinates, Place, ReplyParser};
use waypoint_observability::ExtractionMetrics;
use waypoint_storage::{MemoryStore, NotebookRepository};
use waypoint_tests::{ScriptedGenerator, PLACES_THEN_ROUTE, SMALL_TALK};

#[test]
fn extractors_agree_on_shared_reply() {
    let places = extract_places(PLACES_THEN_ROUTE);
    let route = extract_route(PLACES_THEN_ROUTE).expect("route should be present");

    let names = places
        .iter()
        .map(|entry| entry.place.name.as_str())
        .collect::<Vec<_>>();
    assert_eq!(names, ["Café Lua", "Miradouro da Graça"]);
    assert_eq!(route.total_duration, "18 min");
    assert_eq!(route.steps[2].instruction, "Climb Calçada da Graça to the viewpoint");
    assert_eq!(route.steps[2].distance, None);
}

#[test]
fn extraction_is_repeatable() {
    let first = extract_places(PLACES_THEN_ROUTE)
        .into_iter()
        .map(|entry| entry.place)
        .collect::<Vec<Place>>();
    let second = extract_places(PLACES_THEN_ROUTE)
        .into_iter()
        .map(|entry| entry.place)
        .collect::<Vec<Place>>();

    assert_eq!(first, second);
    assert_eq!(extract_route(PLACES_THEN_ROUTE), extract_route(PLACES_THEN_ROUTE));
}

#[tokio::test]
async fn conversation_tracks_cards_and_notebook() {
    let generator = Arc::new(ScriptedGenerator::replying(&[PLACES_THEN_ROUTE, SMALL_TALK]));
    let store = Arc::new(MemoryStore::new());
    let metrics = ExtractionMetrics::shared();
    let assistant = TravelAssistant::new(
        generator.clone(),
        store.clone(),
        ReplyParser::english().clone(),
        metrics.clone(),
    );

    let here = Coordinates {
        latitude: 38.7139,
        longitude: -9.1394,
    };
    let reply = assistant
        .handle_message("sunset spots near me", Some(here))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(reply.places.len(), 2);
    assert_eq!(reply.route.as_ref().unwrap().steps.len(), 3);
    assert!(!reply.displays_raw_text());

    let chat = assistant.handle_message("obrigado!", None).await.unwrap().unwrap();
    assert!(chat.displays_raw_text());
    assert_eq!(assistant.current_places().len(), 2);
    assert_eq!(
        assistant.active_route().unwrap().destination,
        "Miradouro da Graça"
    );

    let saved = &reply.places[1];
    assistant.toggle_favorite(&saved.place).await.unwrap();
    assistant
        .review(&saved.place, None, "Worth the climb")
        .await
        .unwrap();

    let enriched = assistant.enrich(saved).await.unwrap();
    assert_eq!(enriched.stats.favorite_count, 1);
    assert_eq!(enriched.stats.reviews.len(), 1);
    assert!(store.is_favorite("Miradouro da Graça").await.unwrap());

    let snapshot = metrics.snapshot();
    assert_eq!(snapshot.replies_total, 2);
    assert_eq!(snapshot.places_extracted_total, 2);
    assert_eq!(snapshot.routes_extracted_total, 1);

    let requests = generator.requests();
    assert_eq!(requests.len(), 2);
    assert!(requests[0].message.contains("[Context Location - Lat: 38.7139, Long: -9.1394]"));
    assert_eq!(requests[1].history.len(), 2);
}

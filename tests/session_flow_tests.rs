//! End-to-end tests for the design session driven through the services layer.

use interiorrec::models::{CatalogItem, GridPoint, RoomGeometry, WorldPoint};
use interiorrec::services::{fetch_scenes, generate_options, run_search};
use interiorrec::session::{
    DragCommit, DragStart, Feedback, GenerationOutcome, GenerationStatus, Replacement,
    SelectionState, Session,
};

mod fixtures;
use fixtures::{sample_design, FakeBackend};

fn styles(names: &[&str]) -> Vec<String> {
    names.iter().map(ToString::to_string).collect()
}

fn session_with_sample() -> Session {
    let mut session = Session::new(RoomGeometry::new(16.0, 13.0).unwrap());
    session.load_design(sample_design());
    session
}

// ============================================================================
// Drag Tests
// ============================================================================

#[test]
fn test_drag_sofa_across_the_room() {
    let mut session = session_with_sample();
    let mut updates = session.subscribe();

    // First press selects, second starts the drag
    assert_eq!(session.begin_drag("B07SOFA"), Some(DragStart::SelectedInstead));
    assert_eq!(session.begin_drag("B07SOFA"), Some(DragStart::Started));

    assert!(session.drag_by(WorldPoint::new(3.0, 0.0, 1.0)));
    let DragCommit::Committed(item) = session.end_drag() else {
        panic!("drag should commit");
    };

    assert_eq!(item.start, GridPoint::new(3.0, 5.0));
    assert_eq!(item.end, GridPoint::new(5.0, 9.0));
    assert!(session.selection().is_selected("B07SOFA"));

    // The committed design was published
    assert!(updates.has_changed().unwrap());
    let published = updates.borrow_and_update().clone().unwrap();
    assert_eq!(published.item("B07SOFA").unwrap().start, GridPoint::new(3.0, 5.0));
}

#[test]
fn test_loading_a_design_mid_drag_drops_the_drag() {
    let mut session = session_with_sample();
    session.select("B07SOFA");
    session.begin_drag("B07SOFA");
    session.drag_by(WorldPoint::new(1.0, 0.0, 0.0));

    session.load_design(sample_design());

    assert_eq!(session.selection().state(), &SelectionState::Idle);
    assert_eq!(session.end_drag(), DragCommit::NotDragging);
    let sofa = session.design().unwrap().item("B07SOFA").unwrap().clone();
    assert_eq!(sofa.start, GridPoint::new(2.0, 2.0));
}

// ============================================================================
// Generation Tests
// ============================================================================

#[tokio::test]
async fn test_generation_round_yields_one_option_per_style() {
    let backend = FakeBackend::new();
    let mut session = session_with_sample();

    let ticket = session.begin_generation("living room", &styles(&["minimal", "modern"]));
    let result = generate_options(&backend, &ticket.requests).await;

    assert_eq!(
        session.complete_generation(ticket.epoch, result),
        GenerationOutcome::Ready(2)
    );
    let summaries = session.options().summaries();
    assert_eq!(summaries[0].style.as_deref(), Some("minimal"));
    assert_eq!(summaries[1].style.as_deref(), Some("modern"));

    let requests = backend.generation_requests.lock().unwrap();
    assert_eq!(requests.len(), 2);
    assert!(requests.iter().all(|r| r.room_type == "living room"));

    drop(requests);
    assert!(session.select_option(1));
    assert_eq!(session.design().unwrap().style.as_deref(), Some("modern"));
    assert!(session.options().is_empty());
}

#[tokio::test]
async fn test_one_failing_style_fails_the_whole_round() {
    let backend = FakeBackend::new().failing_style("modern");
    let mut session = session_with_sample();

    let ticket = session.begin_generation("living room", &styles(&["minimal", "modern"]));
    let result = generate_options(&backend, &ticket.requests).await;

    assert_eq!(
        session.complete_generation(ticket.epoch, result),
        GenerationOutcome::Failed
    );
    assert!(session.options().is_empty());
    assert!(matches!(session.generation(), GenerationStatus::Failed { .. }));
    // The active design is untouched
    assert!(session.design().unwrap().contains("B07SOFA"));
}

#[tokio::test]
async fn test_superseded_round_is_ignored() {
    let backend = FakeBackend::new();
    let mut session = session_with_sample();

    let first = session.begin_generation("living room", &styles(&["minimal"]));
    let second = session.begin_generation("living room", &styles(&["modern"]));

    let late = generate_options(&backend, &first.requests).await;
    assert_eq!(
        session.complete_generation(first.epoch, late),
        GenerationOutcome::Stale
    );
    assert!(session.options().is_empty());

    let fresh = generate_options(&backend, &second.requests).await;
    assert_eq!(
        session.complete_generation(second.epoch, fresh),
        GenerationOutcome::Ready(1)
    );
}

// ============================================================================
// Search and Replacement Tests
// ============================================================================

#[tokio::test]
async fn test_search_degrades_to_empty_results() {
    let backend = FakeBackend::new().failing_search();
    let session = session_with_sample();

    let results = run_search(&backend, &session.scene_query("B07SOFA"), "leather", 10).await;

    assert!(results.matches.is_empty());
    assert!(results.similar.is_empty());
    assert!(results.goes_with.is_empty());
    assert!(results.scenes.is_empty());
}

#[tokio::test]
async fn test_similar_results_exclude_the_anchor() {
    let backend = FakeBackend::new().with_catalog(
        vec![CatalogItem::new("B09TEXT")],
        vec![CatalogItem::new("B07SOFA"), CatalogItem::new("B09SIM")],
        vec![],
    );
    let session = session_with_sample();

    let results = run_search(&backend, &session.scene_query("B07SOFA"), "", 10).await;

    assert_eq!(results.matches.len(), 1);
    assert_eq!(results.similar.len(), 1);
    assert_eq!(results.similar[0].item_id, "B09SIM");
}

#[tokio::test]
async fn test_goes_with_results_exclude_the_anchor() {
    let backend = FakeBackend::new()
        .with_catalog(vec![], vec![], vec![vec![CatalogItem::new("B10RUG")]])
        .with_goes_with(vec![CatalogItem::new("B07SOFA"), CatalogItem::new("B10CHAIR")]);
    let session = session_with_sample();

    let results = run_search(&backend, &session.scene_query("B07SOFA"), "", 10).await;

    assert_eq!(results.goes_with.len(), 1);
    assert_eq!(results.goes_with[0].item_id, "B10CHAIR");
    assert_eq!(results.scenes.len(), 1);
}

#[tokio::test]
async fn test_dislike_then_replace_flow() {
    let backend = FakeBackend::new().with_catalog(
        vec![],
        vec![],
        vec![vec![CatalogItem::new("B10RUG").with_description("wool rug")]],
    );
    let mut session = session_with_sample();
    session.select("B07SOFA");
    session.dislike("B07SOFA");
    assert_eq!(session.search_prompt(), Some("B07SOFA"));

    let candidate = CatalogItem::new("B09LOVESEAT").with_description("green loveseat");
    let Replacement::Replaced {
        item,
        reselect_pending,
        scene_query,
    } = session.replace("B07SOFA", &candidate)
    else {
        panic!("replacement should succeed");
    };

    // Geometry is kept, label comes from the description
    assert_eq!(item.start, GridPoint::new(2.0, 2.0));
    assert_eq!(item.end, GridPoint::new(4.0, 6.0));
    assert_eq!(item.object, "green loveseat");
    assert_eq!(session.feedback().feedback("B09LOVESEAT"), Feedback::Liked);
    assert_eq!(session.search_prompt(), None);

    // Reselection waits for the old view to unmount
    assert!(reselect_pending);
    assert_eq!(session.selection().state(), &SelectionState::Idle);
    assert_eq!(
        session.acknowledge_unmount("B07SOFA").as_deref(),
        Some("B09LOVESEAT")
    );

    // Scene suggestions land for the current epoch
    let scenes = fetch_scenes(&backend, &scene_query).await;
    assert!(session.store_suggestions(&scene_query, scenes));
    assert_eq!(session.suggestions().len(), 1);

    let recorded = backend.scene_queries.lock().unwrap();
    assert_eq!(recorded[0].anchor_item_id, "B09LOVESEAT");
    assert!(recorded[0]
        .preferences
        .liked_items
        .contains(&"B09LOVESEAT".to_string()));
    assert!(recorded[0]
        .preferences
        .disliked_items
        .contains(&"B07SOFA".to_string()));
}

#[tokio::test]
async fn test_suggestions_for_an_old_design_are_dropped() {
    let backend = FakeBackend::new().with_catalog(vec![], vec![], vec![vec![]]);
    let mut session = session_with_sample();

    let Replacement::Replaced { scene_query, .. } =
        session.replace("B08LAMP", &CatalogItem::new("B11LAMP"))
    else {
        panic!("replacement should succeed");
    };

    session.load_design(sample_design());
    let scenes = fetch_scenes(&backend, &scene_query).await;

    assert!(!session.store_suggestions(&scene_query, scenes));
    assert!(session.suggestions().is_empty());
}

#[tokio::test]
async fn test_late_suggestions_from_an_earlier_replacement_are_dropped() {
    let backend = FakeBackend::new().with_catalog(vec![], vec![], vec![vec![CatalogItem::new("B10RUG")]]);
    let mut session = session_with_sample();

    let Replacement::Replaced { scene_query: first, .. } =
        session.replace("B07SOFA", &CatalogItem::new("B09SOFA2"))
    else {
        panic!("replacement should succeed");
    };
    let Replacement::Replaced { scene_query: second, .. } =
        session.replace("B08LAMP", &CatalogItem::new("B11LAMP2"))
    else {
        panic!("replacement should succeed");
    };

    // The second request answers first; the first one straggles in later
    let scenes = fetch_scenes(&backend, &second).await;
    assert!(session.store_suggestions(&second, scenes));
    let late = vec![vec![CatalogItem::new("B12STALE")]];
    assert!(!session.store_suggestions(&first, late));

    assert_eq!(session.suggestions()[0][0].item_id, "B10RUG");
}

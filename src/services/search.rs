//! Search panel: the retrievers run for a selected item.

use serde::Serialize;
use tracing::warn;

use crate::models::{CatalogItem, Scene};
use crate::services::backend::{DesignBackend, QueryObject, SearchQuery};
use crate::services::error::Result;
use crate::session::SceneQuery;

/// Results for one search, one list per retriever.
///
/// A failed retriever contributes an empty list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SearchResults {
    /// Text/semantic matches
    pub matches: Vec<CatalogItem>,
    /// Items similar to the anchor
    pub similar: Vec<CatalogItem>,
    /// Items similar to the anchor that fit the rest of the scene
    pub goes_with: Vec<CatalogItem>,
    /// Whole scenes that go with the anchor
    pub scenes: Vec<Scene>,
}

fn or_empty<T>(what: &str, result: Result<Vec<T>>) -> Vec<T> {
    result.unwrap_or_else(|e| {
        warn!("{} failed, showing no results: {}", what, e);
        Vec::new()
    })
}

/// Runs every retriever concurrently.
///
/// `scene` supplies the anchor, the preference context and the scene items;
/// `user_query` is the free text typed by the user.
pub async fn run_search(
    backend: &dyn DesignBackend,
    scene: &SceneQuery,
    user_query: &str,
    k: usize,
) -> SearchResults {
    let query = SearchQuery {
        query_object: QueryObject {
            selected_item_id: scene.anchor_item_id.clone(),
            user_query: user_query.to_string(),
        },
        k,
    };

    let (matches, similar, goes_with, scenes) = tokio::join!(
        backend.search_items(&query),
        backend.similar_items(&scene.anchor_item_id, &scene.preferences),
        backend.similar_items_with_scene(scene),
        backend.scenes_going_with(scene),
    );

    let not_anchor = |item: &CatalogItem| item.item_id != scene.anchor_item_id;
    let mut similar = or_empty("Similar-item search", similar);
    similar.retain(not_anchor);
    let mut goes_with = or_empty("Goes-with search", goes_with);
    goes_with.retain(not_anchor);

    SearchResults {
        matches: or_empty("Text search", matches),
        similar,
        goes_with,
        scenes: or_empty("Scene suggestion", scenes),
    }
}

/// Fetches scene suggestions, degrading to none on failure.
pub async fn fetch_scenes(backend: &dyn DesignBackend, scene: &SceneQuery) -> Vec<Scene> {
    or_empty("Scene suggestion", backend.scenes_going_with(scene).await)
}

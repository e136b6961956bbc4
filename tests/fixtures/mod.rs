//! Shared test fixtures: sample designs and in-memory services.
#![allow(dead_code)]

use std::collections::HashSet;
use std::sync::Mutex;

use async_trait::async_trait;
use interiorrec::models::{CatalogItem, DesignItem, Direction, GridPoint, RoomDesign, Scene};
use interiorrec::services::{
    Asset, AssetError, AssetLoader, BackendError, DesignBackend, GenerationRequest, SearchQuery,
};
use interiorrec::session::{PreferenceContext, SceneQuery};

/// The two-item living room used throughout the tests.
///
/// The sofa spans rows 2..4 and columns 2..6 of a 16 x 13 room.
pub fn sample_design() -> RoomDesign {
    RoomDesign::new(
        vec![
            DesignItem::new(
                "B07SOFA",
                "sofa",
                GridPoint::new(2.0, 2.0),
                GridPoint::new(4.0, 6.0),
            )
            .with_facing(Direction::North),
            DesignItem::new(
                "B08LAMP",
                "floor lamp",
                GridPoint::new(10.0, 1.0),
                GridPoint::new(11.0, 2.0),
            ),
        ],
        "#d9cbb5",
    )
}

/// A design with a single armchair, styled `style`.
pub fn styled_design(style: &str) -> RoomDesign {
    RoomDesign::new(
        vec![DesignItem::new(
            format!("CHAIR-{style}"),
            "armchair",
            GridPoint::new(5.0, 5.0),
            GridPoint::new(7.0, 7.0),
        )],
        "#ffffff",
    )
}

/// Backend double: answers from canned data and records calls.
#[derive(Default)]
pub struct FakeBackend {
    /// Styles whose generation request fails
    pub failing_styles: HashSet<String>,
    /// Make every search endpoint fail
    pub failing_search: bool,
    /// Text search results
    pub matches: Vec<CatalogItem>,
    /// Similar-item results
    pub similar: Vec<CatalogItem>,
    /// Similar-in-scene results
    pub goes_with: Vec<CatalogItem>,
    /// Scene results
    pub scenes: Vec<Scene>,
    /// Generation requests seen, in call order
    pub generation_requests: Mutex<Vec<GenerationRequest>>,
    /// Scene queries seen, in call order
    pub scene_queries: Mutex<Vec<SceneQuery>>,
}

impl FakeBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing_style(mut self, style: &str) -> Self {
        self.failing_styles.insert(style.to_string());
        self
    }

    pub fn failing_search(mut self) -> Self {
        self.failing_search = true;
        self
    }

    pub fn with_catalog(
        mut self,
        matches: Vec<CatalogItem>,
        similar: Vec<CatalogItem>,
        scenes: Vec<Scene>,
    ) -> Self {
        self.matches = matches;
        self.similar = similar;
        self.scenes = scenes;
        self
    }

    pub fn with_goes_with(mut self, goes_with: Vec<CatalogItem>) -> Self {
        self.goes_with = goes_with;
        self
    }

    fn unavailable() -> BackendError {
        BackendError::Api {
            status: 503,
            message: "unavailable".to_string(),
        }
    }
}

#[async_trait]
impl DesignBackend for FakeBackend {
    async fn generate_design(
        &self,
        request: &GenerationRequest,
    ) -> Result<RoomDesign, BackendError> {
        self.generation_requests
            .lock()
            .unwrap()
            .push(request.clone());

        let style = request.style.clone().unwrap_or_default();
        if self.failing_styles.contains(&style) {
            return Err(Self::unavailable());
        }
        Ok(styled_design(&style))
    }

    async fn search_items(&self, _query: &SearchQuery) -> Result<Vec<CatalogItem>, BackendError> {
        if self.failing_search {
            return Err(Self::unavailable());
        }
        Ok(self.matches.clone())
    }

    async fn similar_items(
        &self,
        _item_id: &str,
        _preferences: &PreferenceContext,
    ) -> Result<Vec<CatalogItem>, BackendError> {
        if self.failing_search {
            return Err(Self::unavailable());
        }
        Ok(self.similar.clone())
    }

    async fn similar_items_with_scene(
        &self,
        _query: &SceneQuery,
    ) -> Result<Vec<CatalogItem>, BackendError> {
        if self.failing_search {
            return Err(Self::unavailable());
        }
        Ok(self.goes_with.clone())
    }

    async fn scenes_going_with(&self, query: &SceneQuery) -> Result<Vec<Scene>, BackendError> {
        self.scene_queries.lock().unwrap().push(query.clone());
        if self.failing_search {
            return Err(Self::unavailable());
        }
        Ok(self.scenes.clone())
    }
}

/// Asset loader double that knows a fixed set of ids.
#[derive(Default)]
pub struct FakeAssets {
    /// Ids that have a model
    pub known: HashSet<String>,
}

impl FakeAssets {
    pub fn with(ids: &[&str]) -> Self {
        Self {
            known: ids.iter().map(ToString::to_string).collect(),
        }
    }
}

#[async_trait]
impl AssetLoader for FakeAssets {
    async fn load(&self, item_id: &str) -> Result<Asset, AssetError> {
        if !self.known.contains(item_id) {
            return Err(AssetError::NotFound(item_id.to_string()));
        }
        Ok(Asset {
            item_id: item_id.to_string(),
            content_type: "model/gltf-binary".to_string(),
            bytes: b"glTF".to_vec(),
        })
    }
}

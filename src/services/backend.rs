//! Client for the design generation and recommendation backend.
//!
//! # Endpoints
//!
//! - `POST /generate-design` - Generate one design for a room and style
//! - `POST /retrieve-items` - Text/semantic search anchored on an item
//! - `POST /get-similar-items?item_id=` - Items similar to an anchor
//! - `POST /scene-goes-with-it?item_id=` - Scenes that go with an anchor

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::models::{CatalogItem, RoomDesign, RoomGeometry, Scene};
use crate::services::error::{BackendError, Result};
use crate::session::{PreferenceContext, SceneQuery};

/// Door or window as the generator expects it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OpeningSpec {
    /// Wall name
    pub wall: String,
    /// Fraction along the wall
    pub position: f64,
    /// Width
    pub width: f64,
    /// Height
    pub height: f64,
}

/// Body of a generation request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationRequest {
    /// Room length
    pub length: f64,
    /// Room width
    pub width: f64,
    /// Doors
    pub doors: Vec<OpeningSpec>,
    /// Windows
    pub windows: Vec<OpeningSpec>,
    /// Room type (e.g. "living room")
    #[serde(rename = "roomType")]
    pub room_type: String,
    /// Style variant
    #[serde(skip_serializing_if = "Option::is_none")]
    pub style: Option<String>,
}

impl GenerationRequest {
    /// Builds a request from the room, splitting openings by kind.
    pub fn from_geometry(
        room: &RoomGeometry,
        room_type: impl Into<String>,
        style: Option<String>,
    ) -> Self {
        let to_spec = |o: &crate::models::Opening| OpeningSpec {
            wall: o.wall.to_string(),
            position: o.position,
            width: o.width,
            height: o.height,
        };

        Self {
            length: room.length,
            width: room.width,
            doors: room.doors().map(to_spec).collect(),
            windows: room.windows().map(to_spec).collect(),
            room_type: room_type.into(),
            style,
        }
    }
}

/// Anchor plus free text for a search.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryObject {
    /// Item the search is anchored on
    #[serde(rename = "selectedItemId")]
    pub selected_item_id: String,
    /// User's text
    pub user_query: String,
}

/// Body of a search request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchQuery {
    /// Anchor and text
    pub query_object: QueryObject,
    /// Number of results wanted
    pub k: usize,
}

#[derive(Serialize)]
struct SceneBody<'a> {
    liked_items: &'a [String],
    disliked_items: &'a [String],
    scene_items: &'a [String],
}

impl<'a> From<&'a SceneQuery> for SceneBody<'a> {
    fn from(query: &'a SceneQuery) -> Self {
        Self {
            liked_items: &query.preferences.liked_items,
            disliked_items: &query.preferences.disliked_items,
            scene_items: &query.scene_items,
        }
    }
}

#[derive(Deserialize)]
struct ErrorBody {
    #[serde(alias = "error")]
    detail: serde_json::Value,
}

/// The external generation and recommendation service.
#[async_trait]
pub trait DesignBackend: Send + Sync {
    /// Generates one design. The returned design is not yet style-tagged.
    async fn generate_design(&self, request: &GenerationRequest) -> Result<RoomDesign>;

    /// Text/semantic search anchored on an item.
    async fn search_items(&self, query: &SearchQuery) -> Result<Vec<CatalogItem>>;

    /// Items similar to `item_id`, steered by preferences.
    async fn similar_items(
        &self,
        item_id: &str,
        preferences: &PreferenceContext,
    ) -> Result<Vec<CatalogItem>>;

    /// Items similar to the query's anchor that also fit its scene.
    async fn similar_items_with_scene(&self, query: &SceneQuery) -> Result<Vec<CatalogItem>>;

    /// Scenes that go with the query's anchor item.
    async fn scenes_going_with(&self, query: &SceneQuery) -> Result<Vec<Scene>>;
}

/// HTTP implementation of [`DesignBackend`].
#[derive(Clone)]
pub struct HttpBackend {
    base_url: String,
    http: Client,
}

impl HttpBackend {
    /// Creates a client for the backend at `base_url`.
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(BackendError::Http)?;
        Ok(Self {
            base_url: base_url.into(),
            http,
        })
    }

    fn url(&self, path: &str) -> String {
        let base = self.base_url.trim_end_matches('/');
        let path = path.trim_start_matches('/');
        format!("{base}/{path}")
    }

    async fn post<B, T>(&self, path: &str, query: &[(&str, &str)], body: &B) -> Result<T>
    where
        B: Serialize + Sync + ?Sized,
        T: DeserializeOwned,
    {
        let url = self.url(path);
        debug!("POST {}", url);
        let response = self.http.post(&url).query(query).json(body).send().await?;
        let status = response.status();
        let bytes = response.bytes().await?;

        if !status.is_success() {
            let message = serde_json::from_slice::<ErrorBody>(&bytes)
                .map(|e| match e.detail {
                    serde_json::Value::String(s) => s,
                    other => other.to_string(),
                })
                .unwrap_or_else(|_| String::from_utf8_lossy(&bytes).into_owned());
            return Err(BackendError::Api {
                status: status.as_u16(),
                message,
            });
        }

        Ok(serde_json::from_slice(&bytes)?)
    }
}

#[async_trait]
impl DesignBackend for HttpBackend {
    async fn generate_design(&self, request: &GenerationRequest) -> Result<RoomDesign> {
        self.post("/generate-design", &[], request).await
    }

    async fn search_items(&self, query: &SearchQuery) -> Result<Vec<CatalogItem>> {
        self.post("/retrieve-items", &[], query).await
    }

    async fn similar_items(
        &self,
        item_id: &str,
        preferences: &PreferenceContext,
    ) -> Result<Vec<CatalogItem>> {
        self.post("/get-similar-items", &[("item_id", item_id)], preferences)
            .await
    }

    async fn similar_items_with_scene(&self, query: &SceneQuery) -> Result<Vec<CatalogItem>> {
        self.post(
            "/get-similar-items-with-scene",
            &[("item_id", query.anchor_item_id.as_str())],
            &SceneBody::from(query),
        )
        .await
    }

    async fn scenes_going_with(&self, query: &SceneQuery) -> Result<Vec<Scene>> {
        self.post(
            "/scene-goes-with-it",
            &[("item_id", query.anchor_item_id.as_str())],
            &SceneBody::from(query),
        )
        .await
    }
}

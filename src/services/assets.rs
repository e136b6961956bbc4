//! 3D model and thumbnail resolution.
//!
//! Failures never reach the user as errors: the view falls back to a
//! labelled placeholder box (models) or a "no preview" marker (thumbnails).

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Serialize;
use tracing::debug;

use crate::services::error::AssetError;

/// Content type of proxied models.
pub const MODEL_CONTENT_TYPE: &str = "model/gltf-binary";

/// A loaded renderable asset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Asset {
    /// Item the asset belongs to
    pub item_id: String,
    /// MIME type
    pub content_type: String,
    /// Raw bytes
    pub bytes: Vec<u8>,
}

/// What the view should draw for an item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AssetSlot {
    /// The real model
    Ready {
        /// Item id
        item_id: String,
        /// MIME type
        content_type: String,
    },
    /// A box labelled with the item id
    Placeholder {
        /// Label to draw
        label: String,
    },
}

impl AssetSlot {
    /// Turns a load result into something drawable.
    #[must_use]
    pub fn resolve(item_id: &str, result: &Result<Asset, AssetError>) -> Self {
        match result {
            Ok(asset) => Self::Ready {
                item_id: asset.item_id.clone(),
                content_type: asset.content_type.clone(),
            },
            Err(e) => {
                debug!("Using placeholder for {}: {}", item_id, e);
                Self::Placeholder {
                    label: item_id.to_string(),
                }
            }
        }
    }
}

/// Asynchronous asset source keyed by item id.
#[async_trait]
pub trait AssetLoader: Send + Sync {
    /// Loads the model for `item_id`.
    async fn load(&self, item_id: &str) -> Result<Asset, AssetError>;
}

/// Loads models through the backend's model proxy.
#[derive(Clone)]
pub struct HttpAssetLoader {
    base_url: String,
    http: Client,
}

impl HttpAssetLoader {
    /// Creates a loader for the proxy at `base_url`.
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, AssetError> {
        let http = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            base_url: base_url.into(),
            http,
        })
    }

    /// Proxy URL for an item's model.
    #[must_use]
    pub fn model_url(&self, item_id: &str) -> String {
        format!("{}/s3-proxy/{}", self.base_url.trim_end_matches('/'), item_id)
    }
}

#[async_trait]
impl AssetLoader for HttpAssetLoader {
    async fn load(&self, item_id: &str) -> Result<Asset, AssetError> {
        if item_id.is_empty() {
            return Err(AssetError::NotFound(String::new()));
        }

        let response = self.http.get(self.model_url(item_id)).send().await?;
        match response.status() {
            StatusCode::OK => {}
            status => {
                debug!("Model proxy returned {} for {}", status, item_id);
                return Err(AssetError::NotFound(item_id.to_string()));
            }
        }

        let bytes = response.bytes().await?;
        Ok(Asset {
            item_id: item_id.to_string(),
            content_type: MODEL_CONTENT_TYPE.to_string(),
            bytes: bytes.to_vec(),
        })
    }
}

/// Thumbnail URL for an image id, or `None` when there is no image.
///
/// Images are sharded by the first two characters of the id:
/// `<base>/<prefix>/<id>/<id>_01.jpg`.
#[must_use]
pub fn thumbnail_url(base_url: &str, image_id: Option<&str>) -> Option<String> {
    let image_id = image_id.map(str::trim).filter(|id| !id.is_empty())?;
    let prefix: String = image_id.chars().take(2).collect();
    Some(format!(
        "{}/{prefix}/{image_id}/{image_id}_01.jpg",
        base_url.trim_end_matches('/')
    ))
}

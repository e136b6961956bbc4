//! Service layer for the external collaborators.
//!
//! This module contains the clients for the generation/recommendation
//! backend and the asset store, plus the flows that coordinate several
//! requests (generation rounds, the search panel).

pub mod assets;
pub mod backend;
pub mod error;
pub mod generation;
pub mod search;

// Re-export commonly used types and functions
pub use assets::{thumbnail_url, Asset, AssetLoader, AssetSlot, HttpAssetLoader};
pub use backend::{
    DesignBackend, GenerationRequest, HttpBackend, OpeningSpec, QueryObject, SearchQuery,
};
pub use error::{AssetError, BackendError};
pub use generation::generate_options;
pub use search::{fetch_scenes, run_search, SearchResults};

//! Data models for rooms, furniture and coordinate spaces.
//!
//! This module contains the core data structures used throughout the application.
//! Models are designed to be independent of UI, network and session logic.

pub mod design;
pub mod room;
pub mod transform;

// Re-export all model types
pub use design::{CatalogItem, DesignItem, GridPoint, RoomDesign, Scene};
pub use room::{Direction, Opening, OpeningKind, RoomGeometry};
pub use transform::{CoordinateTransform, WorldPoint};

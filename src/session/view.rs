//! Read-only view models handed to the presentation layer.

use serde::Serialize;

use crate::models::{RoomGeometry, Scene, WorldPoint};
use crate::session::feedback::Feedback;
use crate::session::options::{GenerationStatus, OptionSummary};
use crate::session::selection::{PendingReselect, SelectionState};

/// One furniture item, ready to draw.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ItemView {
    /// Item id, also the render key
    pub item_id: String,
    /// Display text
    pub label: String,
    /// World position of the bounding box centre (drag preview while dragging)
    pub position: WorldPoint,
    /// Grid size as `[rows, cols]`
    pub size: [f64; 2],
    /// Rotation about y, radians
    pub rotation_y: f64,
    /// Selection highlight
    pub selected: bool,
    /// Being dragged right now
    pub dragging: bool,
    /// Like/dislike mark
    pub feedback: Feedback,
    /// Attach a light source
    pub emits_light: bool,
}

/// Everything the view needs for one frame.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionView {
    /// Current epoch
    pub epoch: u64,
    /// Room boundary and openings
    pub room: RoomGeometry,
    /// Wall colour of the active design
    pub wall_color: Option<String>,
    /// Style of the active design
    pub style: Option<String>,
    /// Items of the active design
    pub items: Vec<ItemView>,
    /// Selection state
    pub selection: SelectionState,
    /// Re-selection waiting on an unmount acknowledgement
    pub pending_reselect: Option<PendingReselect>,
    /// Item whose dislike should surface a guided-search prompt
    pub search_prompt: Option<String>,
    /// Candidates awaiting a choice
    pub options: Vec<OptionSummary>,
    /// Generation round state
    pub generation: GenerationStatus,
    /// Scene suggestions from the last replacement
    pub suggestions: Vec<Scene>,
}

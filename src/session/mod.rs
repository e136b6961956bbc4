//! Interactive design session.
//!
//! [`Session`] is the single aggregate behind the 3D view: the room, the
//! active design (or the candidates waiting to become one), selection and
//! drag state, and like/dislike feedback. It is only changed through its
//! methods, each of which maps to one inbound UI event or one network
//! response.
//!
//! # Snapshots
//!
//! The active design is held behind an `Arc` and never mutated in place.
//! Drag commits and replacements build a new design, swap the `Arc` and
//! publish it on a `watch` channel, so readers only ever see whole designs.
//!
//! # Epochs
//!
//! Every generation round and every newly activated design bumps the epoch.
//! Network responses carry the epoch they were issued under; responses for
//! an older epoch are ignored. Replacements keep the epoch but bump a
//! separate sequence, so only the latest replacement's scene suggestions
//! are stored.

pub mod feedback;
pub mod options;
pub mod replacement;
pub mod selection;
pub mod view;

use std::sync::Arc;

use tokio::sync::watch;
use tracing::{debug, info, warn};

use crate::models::{
    CatalogItem, CoordinateTransform, DesignItem, RoomDesign, RoomGeometry, Scene, WorldPoint,
};
use crate::services::{BackendError, GenerationRequest};

pub use feedback::{Feedback, FeedbackStore, PreferenceContext};
pub use options::{DesignOptionSet, GenerationStatus, OptionSummary};
pub use replacement::{Replacement, SceneQuery};
pub use selection::{DragStart, PendingReselect, SelectionController, SelectionState};
pub use view::{ItemView, SessionView};

use replacement::Substitution;

/// Message shown when a generation round fails.
pub const GENERATION_FAILED_MESSAGE: &str = "An error occurred while generating recommendations.";

/// Requests to issue for one generation round.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationTicket {
    /// Epoch to hand back to [`Session::complete_generation`]
    pub epoch: u64,
    /// One request per style
    pub requests: Vec<GenerationRequest>,
}

/// Result of handing a generation response to the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GenerationOutcome {
    /// Candidates are available
    Ready(usize),
    /// The round failed; the active design is unchanged
    Failed,
    /// The response belongs to a superseded round and was ignored
    Stale,
}

/// Result of ending a drag.
#[derive(Debug, Clone, PartialEq)]
pub enum DragCommit {
    /// The item was moved
    Committed(DesignItem),
    /// The dragged item is no longer in the design; nothing was written
    Stale,
    /// No drag was running
    NotDragging,
}

/// The app-state aggregate behind one visit.
#[derive(Debug)]
pub struct Session {
    room: RoomGeometry,
    active: Option<Arc<RoomDesign>>,
    options: DesignOptionSet,
    selection: SelectionController,
    feedback: FeedbackStore,
    epoch: u64,
    replacement_seq: u64,
    generation: GenerationStatus,
    search_prompt: Option<String>,
    suggestions: Vec<Scene>,
    publisher: watch::Sender<Option<Arc<RoomDesign>>>,
}

impl Session {
    /// Creates a session for `room` with no design.
    #[must_use]
    pub fn new(room: RoomGeometry) -> Self {
        let (publisher, _) = watch::channel(None);
        Self {
            room,
            active: None,
            options: DesignOptionSet::new(),
            selection: SelectionController::new(),
            feedback: FeedbackStore::new(),
            epoch: 0,
            replacement_seq: 0,
            generation: GenerationStatus::Idle,
            search_prompt: None,
            suggestions: Vec::new(),
            publisher,
        }
    }

    // ------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------

    /// Room geometry.
    #[must_use]
    pub const fn room(&self) -> &RoomGeometry {
        &self.room
    }

    /// Transform for the current room.
    #[must_use]
    pub fn transform(&self) -> CoordinateTransform {
        CoordinateTransform::new(&self.room)
    }

    /// Snapshot of the active design.
    #[must_use]
    pub fn design(&self) -> Option<Arc<RoomDesign>> {
        self.active.clone()
    }

    /// Receiver that sees every published design snapshot.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<Option<Arc<RoomDesign>>> {
        self.publisher.subscribe()
    }

    /// Candidates from the last completed round.
    #[must_use]
    pub const fn options(&self) -> &DesignOptionSet {
        &self.options
    }

    /// Selection state machine.
    #[must_use]
    pub const fn selection(&self) -> &SelectionController {
        &self.selection
    }

    /// Like/dislike sets.
    #[must_use]
    pub const fn feedback(&self) -> &FeedbackStore {
        &self.feedback
    }

    /// Current epoch.
    #[must_use]
    pub const fn epoch(&self) -> u64 {
        self.epoch
    }

    /// State of the last generation round.
    #[must_use]
    pub const fn generation(&self) -> &GenerationStatus {
        &self.generation
    }

    /// Item whose dislike is prompting a guided search.
    #[must_use]
    pub fn search_prompt(&self) -> Option<&str> {
        self.search_prompt.as_deref()
    }

    /// Scene suggestions from the last replacement.
    #[must_use]
    pub fn suggestions(&self) -> &[Scene] {
        &self.suggestions
    }

    // ------------------------------------------------------------------
    // Room and design lifecycle
    // ------------------------------------------------------------------

    /// Replaces the room geometry. The active design is kept.
    ///
    /// Selection is cleared: a drag preview was measured against the old
    /// room and cannot be committed against the new one.
    pub fn set_room(&mut self, room: RoomGeometry) {
        if self.selection.reset() {
            debug!("Room changed mid-drag, drag dropped");
        }
        self.room = room;
    }

    /// Makes `design` the active design.
    ///
    /// Selection is cleared and any drag is dropped uncommitted.
    pub fn load_design(&mut self, design: RoomDesign) {
        self.activate(design);
        self.generation = GenerationStatus::Idle;
    }

    fn activate(&mut self, design: RoomDesign) {
        self.epoch += 1;
        if self.selection.reset() {
            debug!("Design replaced mid-drag, drag dropped");
        }
        self.options.clear();
        self.search_prompt = None;
        self.suggestions.clear();
        self.active = Some(Arc::new(design));
        self.publish();
    }

    fn publish(&self) {
        self.publisher.send_replace(self.active.clone());
    }

    /// Starts a generation round, one request per style.
    ///
    /// Any previous candidates are dropped and responses for older rounds
    /// will be ignored. With no styles a single unstyled request is made.
    pub fn begin_generation(&mut self, room_type: &str, styles: &[String]) -> GenerationTicket {
        self.epoch += 1;
        self.options.clear();
        self.generation = GenerationStatus::Pending { epoch: self.epoch };

        let requests = if styles.is_empty() {
            vec![GenerationRequest::from_geometry(&self.room, room_type, None)]
        } else {
            styles
                .iter()
                .map(|style| {
                    GenerationRequest::from_geometry(&self.room, room_type, Some(style.clone()))
                })
                .collect()
        };

        info!("Generation round {} started ({} request(s))", self.epoch, requests.len());
        GenerationTicket {
            epoch: self.epoch,
            requests,
        }
    }

    /// Hands the joined result of a generation round to the session.
    pub fn complete_generation(
        &mut self,
        epoch: u64,
        result: Result<Vec<RoomDesign>, BackendError>,
    ) -> GenerationOutcome {
        let current = matches!(self.generation, GenerationStatus::Pending { epoch: e } if e == epoch);
        if epoch != self.epoch || !current {
            debug!("Ignoring generation response for superseded round {}", epoch);
            return GenerationOutcome::Stale;
        }

        match result {
            Ok(designs) => {
                let count = designs.len();
                self.options.populate(designs);
                self.generation = GenerationStatus::Ready;
                info!("Generation round {} ready with {} option(s)", epoch, count);
                GenerationOutcome::Ready(count)
            }
            Err(e) => {
                warn!("Generation round {} failed: {}", epoch, e);
                self.generation = GenerationStatus::Failed {
                    message: GENERATION_FAILED_MESSAGE.to_string(),
                };
                GenerationOutcome::Failed
            }
        }
    }

    /// Activates candidate `index` and discards the option set.
    ///
    /// Returns `false` (and changes nothing) for an out-of-range index.
    pub fn select_option(&mut self, index: usize) -> bool {
        match self.options.select(index) {
            Some(design) => {
                self.activate(design);
                self.generation = GenerationStatus::Idle;
                true
            }
            None => {
                debug!("Ignoring option {} (have {})", index, self.options.len());
                false
            }
        }
    }

    // ------------------------------------------------------------------
    // Selection and drag
    // ------------------------------------------------------------------

    fn has_item(&self, item_id: &str) -> bool {
        self.active.as_ref().is_some_and(|d| d.contains(item_id))
    }

    /// Selects an item of the active design.
    ///
    /// Unknown ids and re-selecting the current item return `false`.
    pub fn select(&mut self, item_id: &str) -> bool {
        if !self.has_item(item_id) {
            debug!("Ignoring selection of unknown item {}", item_id);
            return false;
        }
        self.selection.select(item_id)
    }

    /// Clears the selection.
    pub fn unselect(&mut self) -> bool {
        self.selection.unselect()
    }

    /// Starts dragging `item_id` from its current position.
    ///
    /// Returns `None` if the item is not in the active design.
    pub fn begin_drag(&mut self, item_id: &str) -> Option<DragStart> {
        let origin = {
            let design = self.active.as_ref()?;
            let item = design.item(item_id)?;
            self.transform().item_position(item)
        };
        Some(self.selection.begin_drag(item_id, origin))
    }

    /// Moves the drag preview by a world-space delta.
    pub fn drag_by(&mut self, delta: WorldPoint) -> bool {
        self.selection.drag_by(delta)
    }

    /// Moves the drag preview to a world-space position.
    pub fn drag_to(&mut self, target: WorldPoint) -> bool {
        self.selection.drag_to(target)
    }

    /// Ends the drag and commits the final position into the design.
    pub fn end_drag(&mut self) -> DragCommit {
        let Some((item_id, position)) = self.selection.end_drag() else {
            return DragCommit::NotDragging;
        };

        let transform = self.transform();
        let Some(current) = self.active.as_ref() else {
            return DragCommit::Stale;
        };

        let mut next = RoomDesign::clone(current);
        let Some(item) = next.item_mut(&item_id) else {
            debug!("Dropping drag commit for vanished item {}", item_id);
            self.selection.unselect();
            return DragCommit::Stale;
        };

        transform.place_item(item, position);
        let committed = item.clone();
        self.active = Some(Arc::new(next));
        self.publish();
        DragCommit::Committed(committed)
    }

    /// Second phase of re-selection after a replacement.
    ///
    /// Call once the view bound to `old_item_id` has unmounted.
    pub fn acknowledge_unmount(&mut self, old_item_id: &str) -> Option<String> {
        self.selection
            .acknowledge_unmount(old_item_id)
            .map(ToString::to_string)
    }

    // ------------------------------------------------------------------
    // Feedback
    // ------------------------------------------------------------------

    /// Likes an item, clearing any dislike.
    pub fn like(&mut self, item_id: &str) {
        self.feedback.like(item_id);
        if self.search_prompt.as_deref() == Some(item_id) {
            self.search_prompt = None;
        }
    }

    /// Dislikes an item, clearing any like, and prompts a guided search.
    pub fn dislike(&mut self, item_id: &str) {
        self.feedback.dislike(item_id);
        self.search_prompt = Some(item_id.to_string());
    }

    /// Clears any like or dislike on an item.
    pub fn clear_feedback(&mut self, item_id: &str) {
        self.feedback.clear(item_id);
        if self.search_prompt.as_deref() == Some(item_id) {
            self.search_prompt = None;
        }
    }

    /// Toggles a like; see [`FeedbackStore::toggle_like`].
    pub fn toggle_like(&mut self, item_id: &str) -> Feedback {
        let feedback = self.feedback.toggle_like(item_id);
        if self.search_prompt.as_deref() == Some(item_id) {
            self.search_prompt = None;
        }
        feedback
    }

    /// Toggles a dislike; prompts a guided search when it becomes disliked.
    pub fn toggle_dislike(&mut self, item_id: &str) -> Feedback {
        let feedback = self.feedback.toggle_dislike(item_id);
        self.search_prompt = match feedback {
            Feedback::Disliked => Some(item_id.to_string()),
            _ => None,
        };
        feedback
    }

    /// Hides the guided-search prompt. Returns `false` if none was shown.
    pub fn dismiss_prompt(&mut self) -> bool {
        self.search_prompt.take().is_some()
    }

    /// Context for searches anchored on `item_id`.
    #[must_use]
    pub fn scene_query(&self, item_id: &str) -> SceneQuery {
        SceneQuery {
            epoch: self.epoch,
            sequence: self.replacement_seq,
            anchor_item_id: item_id.to_string(),
            preferences: self.feedback.context(),
            scene_items: self
                .active
                .as_ref()
                .map(|d| d.item_ids())
                .unwrap_or_default(),
        }
    }

    // ------------------------------------------------------------------
    // Replacement
    // ------------------------------------------------------------------

    /// Substitutes `old_item_id` with `candidate`, keeping its geometry.
    ///
    /// On success the new id is liked, selection is moved over in two
    /// phases if the old item was selected, and a [`SceneQuery`] is
    /// returned for the caller to issue in the background.
    pub fn replace(&mut self, old_item_id: &str, candidate: &CatalogItem) -> Replacement {
        let Some(current) = self.active.as_ref() else {
            debug!("Ignoring replacement of {}: no active design", old_item_id);
            return Replacement::NotFound;
        };

        let mut next = RoomDesign::clone(current);
        let item = match replacement::substitute(&mut next, old_item_id, candidate) {
            Substitution::Done(item) => item,
            Substitution::NotFound => {
                debug!("Ignoring replacement of vanished item {}", old_item_id);
                return Replacement::NotFound;
            }
            Substitution::DuplicateId => {
                warn!(
                    "Ignoring replacement of {}: {} is already in the design",
                    old_item_id, candidate.item_id
                );
                return Replacement::DuplicateId;
            }
        };

        self.active = Some(Arc::new(next));
        self.feedback.like(&item.item_id);
        let reselect_pending = self.selection.begin_reselect(old_item_id, &item.item_id);
        if self.search_prompt.as_deref() == Some(old_item_id) {
            self.search_prompt = None;
        }
        self.publish();

        info!("Replaced {} with {}", old_item_id, item.item_id);
        self.replacement_seq += 1;
        let scene_query = self.scene_query(&item.item_id);
        Replacement::Replaced {
            item,
            reselect_pending,
            scene_query,
        }
    }

    /// Stores scene suggestions fetched for `query`.
    ///
    /// Returns `false` if the epoch has moved on or a later replacement
    /// has been made since the query was issued.
    pub fn store_suggestions(&mut self, query: &SceneQuery, scenes: Vec<Scene>) -> bool {
        if query.epoch != self.epoch {
            debug!("Ignoring scene suggestions for superseded epoch {}", query.epoch);
            return false;
        }
        if query.sequence != self.replacement_seq {
            debug!(
                "Ignoring scene suggestions for {}: superseded by a later replacement",
                query.anchor_item_id
            );
            return false;
        }
        self.suggestions = scenes;
        true
    }

    // ------------------------------------------------------------------
    // View
    // ------------------------------------------------------------------

    /// Builds the view model for the current state.
    #[must_use]
    pub fn view(&self) -> SessionView {
        let transform = self.transform();
        let drag = match self.selection.state() {
            SelectionState::Dragging { item_id, position } => Some((item_id.as_str(), *position)),
            _ => None,
        };

        let items = self
            .active
            .as_ref()
            .map(|design| {
                design
                    .items
                    .iter()
                    .map(|item| {
                        let dragged = drag.filter(|(id, _)| *id == item.item_id);
                        let (rows, cols) = item.size();
                        ItemView {
                            item_id: item.item_id.clone(),
                            label: item.object.clone(),
                            position: dragged
                                .map_or_else(|| transform.item_position(item), |(_, p)| p),
                            size: [rows, cols],
                            rotation_y: item.rotation_y(),
                            selected: self.selection.is_selected(&item.item_id),
                            dragging: dragged.is_some(),
                            feedback: self.feedback.feedback(&item.item_id),
                            emits_light: item.emits_light(),
                        }
                    })
                    .collect()
            })
            .unwrap_or_default();

        SessionView {
            epoch: self.epoch,
            room: self.room.clone(),
            wall_color: self.active.as_ref().map(|d| d.wall_color.clone()),
            style: self.active.as_ref().and_then(|d| d.style.clone()),
            items,
            selection: self.selection.state().clone(),
            pending_reselect: self.selection.pending().cloned(),
            search_prompt: self.search_prompt.clone(),
            options: self.options.summaries(),
            generation: self.generation.clone(),
            suggestions: self.suggestions.clone(),
        }
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new(RoomGeometry::default())
    }
}

//! Selection and drag-to-reposition state machine.
//!
//! ```text
//! Idle --select--> Selected --beginDrag--> Dragging --endDrag--> Selected
//!                     |                        |
//!                 unselect                  move (local only)
//!                     v
//!                   Idle          any --reset--> Idle (drag dropped)
//! ```
//!
//! Drag positions never touch the design while the gesture is running; the
//! final position is handed back from [`SelectionController::end_drag`] for
//! the caller to commit.

use serde::Serialize;

use crate::models::WorldPoint;

/// Current interaction state.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum SelectionState {
    /// Nothing selected
    Idle,
    /// One item selected
    Selected {
        /// Selected item
        item_id: String,
    },
    /// Selected item is being dragged
    Dragging {
        /// Dragged item
        item_id: String,
        /// Uncommitted world position
        position: WorldPoint,
    },
}

/// Result of a `begin_drag` request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragStart {
    /// Drag is now in progress
    Started,
    /// The item was not selected; it has been selected instead
    SelectedInstead,
    /// A drag on this item was already running
    AlreadyDragging,
}

/// Re-selection waiting for the view to drop the old item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PendingReselect {
    /// Id whose view must unmount first
    pub old_item_id: String,
    /// Id to select once it has
    pub new_item_id: String,
}

/// Tracks which item is selected and mediates drags.
#[derive(Debug, Clone)]
pub struct SelectionController {
    state: SelectionState,
    pending: Option<PendingReselect>,
}

impl SelectionController {
    /// Creates a controller in the idle state.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            state: SelectionState::Idle,
            pending: None,
        }
    }

    /// Current state.
    #[must_use]
    pub const fn state(&self) -> &SelectionState {
        &self.state
    }

    /// Id of the selected (or dragged) item.
    #[must_use]
    pub fn selected_id(&self) -> Option<&str> {
        match &self.state {
            SelectionState::Idle => None,
            SelectionState::Selected { item_id } | SelectionState::Dragging { item_id, .. } => {
                Some(item_id)
            }
        }
    }

    /// Whether `item_id` is the current selection.
    #[must_use]
    pub fn is_selected(&self, item_id: &str) -> bool {
        self.selected_id() == Some(item_id)
    }

    /// Uncommitted drag position, while dragging.
    #[must_use]
    pub const fn drag_position(&self) -> Option<WorldPoint> {
        match &self.state {
            SelectionState::Dragging { position, .. } => Some(*position),
            _ => None,
        }
    }

    /// Whether a drag gesture is in progress.
    #[must_use]
    pub const fn is_dragging(&self) -> bool {
        matches!(self.state, SelectionState::Dragging { .. })
    }

    /// Re-selection waiting on an unmount acknowledgement.
    #[must_use]
    pub const fn pending(&self) -> Option<&PendingReselect> {
        self.pending.as_ref()
    }

    /// Selects `item_id`.
    ///
    /// Re-selecting the current item changes nothing and returns `false`.
    /// Selecting another item replaces the selection, dropping any drag.
    pub fn select(&mut self, item_id: &str) -> bool {
        self.pending = None;
        if self.is_selected(item_id) {
            return false;
        }
        self.state = SelectionState::Selected {
            item_id: item_id.to_string(),
        };
        true
    }

    /// Clears the selection. Returns `false` if nothing was selected.
    pub fn unselect(&mut self) -> bool {
        self.pending = None;
        let changed = self.state != SelectionState::Idle;
        self.state = SelectionState::Idle;
        changed
    }

    /// Starts dragging `item_id` from `origin`.
    ///
    /// Only the selected item can be dragged; any other item is selected
    /// instead.
    pub fn begin_drag(&mut self, item_id: &str, origin: WorldPoint) -> DragStart {
        match &self.state {
            SelectionState::Selected { item_id: selected } if selected == item_id => {
                self.state = SelectionState::Dragging {
                    item_id: item_id.to_string(),
                    position: origin,
                };
                DragStart::Started
            }
            SelectionState::Dragging { item_id: dragged, .. } if dragged == item_id => {
                DragStart::AlreadyDragging
            }
            _ => {
                self.select(item_id);
                DragStart::SelectedInstead
            }
        }
    }

    /// Moves the drag position by `delta`. Ignored unless dragging.
    pub fn drag_by(&mut self, delta: WorldPoint) -> bool {
        match &mut self.state {
            SelectionState::Dragging { position, .. } => {
                *position = position.offset(delta);
                true
            }
            _ => false,
        }
    }

    /// Moves the drag position to `target`. Ignored unless dragging.
    pub fn drag_to(&mut self, target: WorldPoint) -> bool {
        match &mut self.state {
            SelectionState::Dragging { position, .. } => {
                *position = target;
                true
            }
            _ => false,
        }
    }

    /// Ends the drag, returning the item and its final world position.
    ///
    /// The item stays selected.
    pub fn end_drag(&mut self) -> Option<(String, WorldPoint)> {
        match std::mem::replace(&mut self.state, SelectionState::Idle) {
            SelectionState::Dragging { item_id, position } => {
                self.state = SelectionState::Selected {
                    item_id: item_id.clone(),
                };
                Some((item_id, position))
            }
            other => {
                self.state = other;
                None
            }
        }
    }

    /// Forces the idle state, dropping any drag without committing it.
    ///
    /// Returns `true` if a drag was aborted.
    pub fn reset(&mut self) -> bool {
        let aborted = self.is_dragging();
        self.state = SelectionState::Idle;
        self.pending = None;
        aborted
    }

    /// First phase of moving the selection from `old_item_id` to `new_item_id`.
    ///
    /// Only acts if `old_item_id` is currently selected: the selection is
    /// cleared and the new id parked until [`Self::acknowledge_unmount`].
    pub fn begin_reselect(&mut self, old_item_id: &str, new_item_id: &str) -> bool {
        if !self.is_selected(old_item_id) {
            return false;
        }
        self.state = SelectionState::Idle;
        self.pending = Some(PendingReselect {
            old_item_id: old_item_id.to_string(),
            new_item_id: new_item_id.to_string(),
        });
        true
    }

    /// Second phase: the view bound to `old_item_id` is gone.
    ///
    /// Returns the newly selected id, or `None` if nothing was pending for
    /// that id.
    pub fn acknowledge_unmount(&mut self, old_item_id: &str) -> Option<&str> {
        match self.pending.take() {
            Some(pending) if pending.old_item_id == old_item_id => {
                self.state = SelectionState::Selected {
                    item_id: pending.new_item_id,
                };
                self.selected_id()
            }
            other => {
                self.pending = other;
                None
            }
        }
    }
}

impl Default for SelectionController {
    fn default() -> Self {
        Self::new()
    }
}

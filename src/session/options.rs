//! Candidate designs from one generation round.

use serde::Serialize;

use crate::models::RoomDesign;

/// State of the most recent generation round.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum GenerationStatus {
    /// No round has been started
    Idle,
    /// Requests for `epoch` are in flight
    Pending {
        /// Epoch the round was issued under
        epoch: u64,
    },
    /// Candidates are waiting to be chosen
    Ready,
    /// The last round failed as a whole
    Failed {
        /// User-facing message
        message: String,
    },
}

/// Short description of one candidate, for option pickers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OptionSummary {
    /// Position in the option set
    pub index: usize,
    /// Style variant
    pub style: Option<String>,
    /// Wall colour
    pub wall_color: String,
    /// Number of furniture items
    pub item_count: usize,
    /// Item categories in render order
    pub objects: Vec<String>,
}

/// Style-variant candidates awaiting a choice.
///
/// Filled all at once when a round completes; emptied when one is chosen.
#[derive(Debug, Clone, Default)]
pub struct DesignOptionSet {
    candidates: Vec<RoomDesign>,
}

impl DesignOptionSet {
    /// Creates an empty set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the whole candidate list.
    pub fn populate(&mut self, candidates: Vec<RoomDesign>) {
        self.candidates = candidates;
    }

    /// Drops all candidates.
    pub fn clear(&mut self) {
        self.candidates.clear();
    }

    /// Number of candidates.
    #[must_use]
    pub fn len(&self) -> usize {
        self.candidates.len()
    }

    /// Whether there is nothing to choose from.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }

    /// Candidates in request order.
    #[must_use]
    pub fn candidates(&self) -> &[RoomDesign] {
        &self.candidates
    }

    /// Takes the candidate at `index` and discards the rest.
    ///
    /// Out-of-range indices (including any index on an empty set) return
    /// `None` and leave the set untouched.
    pub fn select(&mut self, index: usize) -> Option<RoomDesign> {
        if index >= self.candidates.len() {
            return None;
        }
        let chosen = self.candidates.swap_remove(index);
        self.candidates.clear();
        Some(chosen)
    }

    /// Summaries for each candidate.
    #[must_use]
    pub fn summaries(&self) -> Vec<OptionSummary> {
        self.candidates
            .iter()
            .enumerate()
            .map(|(index, design)| OptionSummary {
                index,
                style: design.style.clone(),
                wall_color: design.wall_color.clone(),
                item_count: design.items.len(),
                objects: design.items.iter().map(|i| i.object.clone()).collect(),
            })
            .collect()
    }
}

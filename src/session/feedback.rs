//! Like/dislike bookkeeping.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// Preference context sent with every search and recommendation request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PreferenceContext {
    /// Liked item ids
    pub liked_items: Vec<String>,
    /// Disliked item ids
    pub disliked_items: Vec<String>,
}

/// Current mark on an item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Feedback {
    /// Liked
    Liked,
    /// Disliked
    Disliked,
    /// Neither
    Neutral,
}

/// Liked and disliked item ids.
///
/// An id is in at most one of the two sets: `like` drops any dislike and
/// `dislike` drops any like.
#[derive(Debug, Clone, Default)]
pub struct FeedbackStore {
    liked: BTreeSet<String>,
    disliked: BTreeSet<String>,
}

impl FeedbackStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Marks `item_id` as liked.
    pub fn like(&mut self, item_id: &str) {
        self.disliked.remove(item_id);
        self.liked.insert(item_id.to_string());
    }

    /// Marks `item_id` as disliked.
    pub fn dislike(&mut self, item_id: &str) {
        self.liked.remove(item_id);
        self.disliked.insert(item_id.to_string());
    }

    /// Removes any mark from `item_id`.
    pub fn clear(&mut self, item_id: &str) {
        self.liked.remove(item_id);
        self.disliked.remove(item_id);
    }

    /// Likes `item_id`, or clears the like if it is already liked.
    pub fn toggle_like(&mut self, item_id: &str) -> Feedback {
        if self.is_liked(item_id) {
            self.clear(item_id);
        } else {
            self.like(item_id);
        }
        self.feedback(item_id)
    }

    /// Dislikes `item_id`, or clears the dislike if it is already disliked.
    pub fn toggle_dislike(&mut self, item_id: &str) -> Feedback {
        if self.is_disliked(item_id) {
            self.clear(item_id);
        } else {
            self.dislike(item_id);
        }
        self.feedback(item_id)
    }

    /// Whether `item_id` is liked.
    #[must_use]
    pub fn is_liked(&self, item_id: &str) -> bool {
        self.liked.contains(item_id)
    }

    /// Whether `item_id` is disliked.
    #[must_use]
    pub fn is_disliked(&self, item_id: &str) -> bool {
        self.disliked.contains(item_id)
    }

    /// Current mark on `item_id`.
    #[must_use]
    pub fn feedback(&self, item_id: &str) -> Feedback {
        if self.is_liked(item_id) {
            Feedback::Liked
        } else if self.is_disliked(item_id) {
            Feedback::Disliked
        } else {
            Feedback::Neutral
        }
    }

    /// Snapshot of both sets, sorted by id.
    #[must_use]
    pub fn context(&self) -> PreferenceContext {
        PreferenceContext {
            liked_items: self.liked.iter().cloned().collect(),
            disliked_items: self.disliked.iter().cloned().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_like_after_dislike_is_exclusive() {
        let mut store = FeedbackStore::new();
        store.dislike("a");
        store.like("a");
        assert!(store.is_liked("a"));
        assert!(!store.is_disliked("a"));
    }

    #[test]
    fn test_dislike_after_like_is_exclusive() {
        let mut store = FeedbackStore::new();
        store.like("a");
        store.dislike("a");
        assert!(!store.is_liked("a"));
        assert!(store.is_disliked("a"));
    }

    #[test]
    fn test_like_is_idempotent() {
        let mut store = FeedbackStore::new();
        store.like("a");
        store.like("a");
        assert_eq!(store.context().liked_items, vec!["a".to_string()]);
    }

    #[test]
    fn test_toggles() {
        let mut store = FeedbackStore::new();
        assert_eq!(store.toggle_like("a"), Feedback::Liked);
        assert_eq!(store.toggle_like("a"), Feedback::Neutral);
        assert_eq!(store.toggle_dislike("a"), Feedback::Disliked);
        assert_eq!(store.toggle_like("a"), Feedback::Liked);
        assert!(!store.is_disliked("a"));
    }

    #[test]
    fn test_clear() {
        let mut store = FeedbackStore::new();
        store.dislike("a");
        store.clear("a");
        assert_eq!(store.feedback("a"), Feedback::Neutral);
    }

    #[test]
    fn test_context_wire_format() {
        let mut store = FeedbackStore::new();
        store.like("b");
        store.like("a");
        store.dislike("c");

        let json = serde_json::to_value(store.context()).unwrap();
        assert_eq!(json["liked_items"], serde_json::json!(["a", "b"]));
        assert_eq!(json["disliked_items"], serde_json::json!(["c"]));
    }
}

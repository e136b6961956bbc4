//! Substituting a design item with a catalogue candidate.
//!
//! Geometry (`start`, `end`, `facing`) is never touched by a substitution;
//! only identity and label change.

use serde::Serialize;

use crate::models::{CatalogItem, DesignItem, RoomDesign};
use crate::session::feedback::PreferenceContext;

/// Inputs for the "scenes that go with it" request issued after a replacement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SceneQuery {
    /// Epoch the replacement happened under
    pub epoch: u64,
    /// Replacement sequence number; only the latest may store suggestions
    pub sequence: u64,
    /// The newly placed item
    pub anchor_item_id: String,
    /// Liked/disliked ids at the time of the replacement
    pub preferences: PreferenceContext,
    /// Every item id in the design after the replacement
    pub scene_items: Vec<String>,
}

/// Result of [`crate::session::Session::replace`].
#[derive(Debug, Clone, PartialEq)]
pub enum Replacement {
    /// The item was substituted
    Replaced {
        /// The new item as placed in the design
        item: DesignItem,
        /// Whether selection is waiting for the old view to unmount
        reselect_pending: bool,
        /// Follow-up scene request to issue in the background
        scene_query: SceneQuery,
    },
    /// No item with the old id exists (already replaced, or design changed)
    NotFound,
    /// Another item in the design already uses the candidate's id
    DuplicateId,
}

/// Outcome of the in-place substitution itself.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Substitution {
    Done(DesignItem),
    NotFound,
    DuplicateId,
}

/// Swaps the item `old_item_id` in `design` for `candidate`.
///
/// The new item keeps the old one's position in the list and its geometry.
/// Its label is the candidate's description, then its object, then the
/// old item's object.
pub(crate) fn substitute(
    design: &mut RoomDesign,
    old_item_id: &str,
    candidate: &CatalogItem,
) -> Substitution {
    let clashes = candidate.item_id != old_item_id && design.contains(&candidate.item_id);

    let Some(item) = design.item_mut(old_item_id) else {
        return Substitution::NotFound;
    };
    if clashes {
        return Substitution::DuplicateId;
    }

    let object = candidate.label_or(&item.object).to_string();
    item.item_id.clone_from(&candidate.item_id);
    item.object = object;
    Substitution::Done(item.clone())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Direction, GridPoint};

    fn design() -> RoomDesign {
        RoomDesign::new(
            vec![
                DesignItem::new("sofa-1", "sofa", GridPoint::new(2.0, 2.0), GridPoint::new(4.0, 6.0))
                    .with_facing(Direction::North),
                DesignItem::new("lamp-1", "lamp", GridPoint::new(0.0, 0.0), GridPoint::new(1.0, 1.0)),
            ],
            "#ffffff",
        )
    }

    #[test]
    fn test_substitute_keeps_geometry() {
        let mut d = design();
        let before = d.items[0].clone();
        let candidate = CatalogItem::new("sofa-2").with_description("green velvet sofa");

        let Substitution::Done(item) = substitute(&mut d, "sofa-1", &candidate) else {
            panic!("expected substitution");
        };

        assert_eq!(item.item_id, "sofa-2");
        assert_eq!(item.object, "green velvet sofa");
        assert_eq!(item.start, before.start);
        assert_eq!(item.end, before.end);
        assert_eq!(item.facing, before.facing);
        assert_eq!(d.items[0], item);
        assert!(!d.contains("sofa-1"));
    }

    #[test]
    fn test_substitute_falls_back_to_old_object() {
        let mut d = design();
        let result = substitute(&mut d, "lamp-1", &CatalogItem::new("lamp-2"));
        assert!(matches!(result, Substitution::Done(ref item) if item.object == "lamp"));
    }

    #[test]
    fn test_substitute_absent_id() {
        let mut d = design();
        let before = d.clone();
        let result = substitute(&mut d, "nonexistent", &CatalogItem::new("x"));
        assert_eq!(result, Substitution::NotFound);
        assert_eq!(d, before);
    }

    #[test]
    fn test_substitute_rejects_duplicate_id() {
        let mut d = design();
        let before = d.clone();
        let result = substitute(&mut d, "sofa-1", &CatalogItem::new("lamp-1"));
        assert_eq!(result, Substitution::DuplicateId);
        assert_eq!(d, before);
    }
}

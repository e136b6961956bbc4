//! Furniture items and generated room designs.

use std::f64::consts::{FRAC_PI_2, PI};

use serde::{Deserialize, Deserializer, Serialize};

use crate::models::room::Direction;

/// Fallback wall colour when the generator omits one.
const DEFAULT_WALL_COLOR: &str = "#e8e8e8";

/// A point in grid space.
///
/// Serialized as `[row, col]`, matching the generator's wire format.
/// `row` runs along the room width, `col` along the room length.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(from = "(f64, f64)", into = "(f64, f64)")]
pub struct GridPoint {
    /// Row (width axis)
    pub row: f64,
    /// Column (length axis)
    pub col: f64,
}

impl GridPoint {
    /// Creates a new grid point.
    #[must_use]
    pub const fn new(row: f64, col: f64) -> Self {
        Self { row, col }
    }
}

impl From<(f64, f64)> for GridPoint {
    fn from((row, col): (f64, f64)) -> Self {
        Self { row, col }
    }
}

impl From<GridPoint> for (f64, f64) {
    fn from(point: GridPoint) -> Self {
        (point.row, point.col)
    }
}

/// Moves one axis of a `start`/`end` pair so its midpoint lands on `center`.
///
/// The span is kept, and so is the order of the two ends: if `start` was
/// the smaller coordinate it stays the smaller one.
fn recenter_axis(start: f64, end: f64, center: f64) -> (f64, f64) {
    let half = (end - start).abs() / 2.0;
    if start <= end {
        (center - half, center + half)
    } else {
        (center + half, center - half)
    }
}

/// Accepts any string for `facing`; unknown values are treated as absent.
fn deserialize_facing<'de, D>(deserializer: D) -> Result<Option<Direction>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw.and_then(|s| s.parse().ok()))
}

/// One piece of furniture placed in grid space.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DesignItem {
    /// Catalogue identity, also the asset key
    pub item_id: String,
    /// Category or description (e.g. "sofa", "floor lamp")
    pub object: String,
    /// One corner of the bounding rectangle
    pub start: GridPoint,
    /// Opposite corner of the bounding rectangle
    pub end: GridPoint,
    /// Orientation; affects world rotation only
    #[serde(
        default,
        deserialize_with = "deserialize_facing",
        skip_serializing_if = "Option::is_none"
    )]
    pub facing: Option<Direction>,
}

impl DesignItem {
    /// Creates a new item with no facing.
    pub fn new(
        item_id: impl Into<String>,
        object: impl Into<String>,
        start: GridPoint,
        end: GridPoint,
    ) -> Self {
        Self {
            item_id: item_id.into(),
            object: object.into(),
            start,
            end,
            facing: None,
        }
    }

    /// Sets the facing.
    #[must_use]
    pub const fn with_facing(mut self, facing: Direction) -> Self {
        self.facing = Some(facing);
        self
    }

    /// Grid-space size as `(rows, cols)`.
    #[must_use]
    pub fn size(&self) -> (f64, f64) {
        (
            (self.end.row - self.start.row).abs(),
            (self.end.col - self.start.col).abs(),
        )
    }

    /// Centre of the bounding rectangle in grid space.
    #[must_use]
    pub fn center(&self) -> GridPoint {
        GridPoint::new(
            (self.start.row + self.end.row) / 2.0,
            (self.start.col + self.end.col) / 2.0,
        )
    }

    /// Moves the rectangle so its centre is `center`, keeping its size.
    pub fn recenter(&mut self, center: GridPoint) {
        let (start_row, end_row) = recenter_axis(self.start.row, self.end.row, center.row);
        let (start_col, end_col) = recenter_axis(self.start.col, self.end.col, center.col);
        self.start = GridPoint::new(start_row, start_col);
        self.end = GridPoint::new(end_row, end_col);
    }

    /// Rotation about the world y axis in radians.
    ///
    /// Models face `+z` (south) at rest.
    #[must_use]
    pub fn rotation_y(&self) -> f64 {
        match self.facing {
            None | Some(Direction::South) => 0.0,
            Some(Direction::East) => FRAC_PI_2,
            Some(Direction::North) => PI,
            Some(Direction::West) => -FRAC_PI_2,
        }
    }

    /// Whether the renderer should attach a light source to this item.
    #[must_use]
    pub fn emits_light(&self) -> bool {
        let object = self.object.to_ascii_lowercase();
        object.contains("lamp") || object.contains("light")
    }
}

/// One generated furniture layout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoomDesign {
    /// Furniture, in stable render order
    pub items: Vec<DesignItem>,
    /// Display colour for the walls
    #[serde(rename = "wallColor", default = "default_wall_color")]
    pub wall_color: String,
    /// Style variant that produced this design
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub style: Option<String>,
}

fn default_wall_color() -> String {
    DEFAULT_WALL_COLOR.to_string()
}

impl RoomDesign {
    /// Creates a design from its items.
    pub fn new(items: Vec<DesignItem>, wall_color: impl Into<String>) -> Self {
        Self {
            items,
            wall_color: wall_color.into(),
            style: None,
        }
    }

    /// Tags the design with the style that produced it.
    #[must_use]
    pub fn with_style(mut self, style: impl Into<String>) -> Self {
        self.style = Some(style.into());
        self
    }

    /// Looks up an item by id.
    #[must_use]
    pub fn item(&self, item_id: &str) -> Option<&DesignItem> {
        self.items.iter().find(|item| item.item_id == item_id)
    }

    /// Looks up an item by id for mutation.
    pub fn item_mut(&mut self, item_id: &str) -> Option<&mut DesignItem> {
        self.items.iter_mut().find(|item| item.item_id == item_id)
    }

    /// Whether an item with this id is present.
    #[must_use]
    pub fn contains(&self, item_id: &str) -> bool {
        self.item(item_id).is_some()
    }

    /// All item ids in render order.
    #[must_use]
    pub fn item_ids(&self) -> Vec<String> {
        self.items.iter().map(|item| item.item_id.clone()).collect()
    }
}

/// A catalogue entry returned by the search and recommendation services.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogItem {
    /// Catalogue identity
    pub item_id: String,
    /// Thumbnail key, when one exists
    #[serde(default)]
    pub image_id: Option<String>,
    /// Free-text description
    #[serde(default)]
    pub description: Option<String>,
    /// Category, when the service provides one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub object: Option<String>,
}

impl CatalogItem {
    /// Creates an entry with only an id.
    pub fn new(item_id: impl Into<String>) -> Self {
        Self {
            item_id: item_id.into(),
            image_id: None,
            description: None,
            object: None,
        }
    }

    /// Sets the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Sets the image id.
    #[must_use]
    pub fn with_image(mut self, image_id: impl Into<String>) -> Self {
        self.image_id = Some(image_id.into());
        self
    }

    /// Label to give a replaced item: description, then object, then `fallback`.
    #[must_use]
    pub fn label_or<'a>(&'a self, fallback: &'a str) -> &'a str {
        [self.description.as_deref(), self.object.as_deref()]
            .into_iter()
            .flatten()
            .find(|s| !s.trim().is_empty())
            .unwrap_or(fallback)
    }
}

/// A group of catalogue items suggested together.
pub type Scene = Vec<CatalogItem>;

#[cfg(test)]
mod tests {
    use super::*;

    fn sofa() -> DesignItem {
        DesignItem::new("B07SOFA", "sofa", GridPoint::new(2.0, 2.0), GridPoint::new(4.0, 6.0))
    }

    #[test]
    fn test_size_and_center() {
        let item = sofa();
        assert_eq!(item.size(), (2.0, 4.0));
        assert_eq!(item.center(), GridPoint::new(3.0, 4.0));
    }

    #[test]
    fn test_size_ignores_corner_order() {
        let item = DesignItem::new("x", "desk", GridPoint::new(4.0, 6.0), GridPoint::new(2.0, 2.0));
        assert_eq!(item.size(), (2.0, 4.0));
    }

    #[test]
    fn test_recenter_keeps_size() {
        let mut item = sofa();
        item.recenter(GridPoint::new(4.0, 7.0));
        assert_eq!(item.start, GridPoint::new(3.0, 5.0));
        assert_eq!(item.end, GridPoint::new(5.0, 9.0));
        assert_eq!(item.size(), (2.0, 4.0));
    }

    #[test]
    fn test_recenter_keeps_corner_order() {
        let mut item = DesignItem::new("x", "desk", GridPoint::new(4.0, 2.0), GridPoint::new(2.0, 6.0));
        item.recenter(GridPoint::new(10.0, 10.0));
        assert_eq!(item.start, GridPoint::new(11.0, 8.0));
        assert_eq!(item.end, GridPoint::new(9.0, 12.0));
    }

    #[test]
    fn test_rotation_from_facing() {
        assert_eq!(sofa().rotation_y(), 0.0);
        assert_eq!(sofa().with_facing(Direction::North).rotation_y(), PI);
        assert_eq!(sofa().with_facing(Direction::East).rotation_y(), FRAC_PI_2);
        assert_eq!(sofa().with_facing(Direction::West).rotation_y(), -FRAC_PI_2);
    }

    #[test]
    fn test_emits_light() {
        let lamp = DesignItem::new("l", "Floor Lamp", GridPoint::default(), GridPoint::new(1.0, 1.0));
        let light = DesignItem::new("l2", "ceiling light", GridPoint::default(), GridPoint::new(1.0, 1.0));
        assert!(lamp.emits_light());
        assert!(light.emits_light());
        assert!(!sofa().emits_light());
    }

    #[test]
    fn test_design_item_wire_format() {
        let json = r#"{"object":"Sofa","start":[2,2],"end":[4,6],"item_id":"B07","facing":"north"}"#;
        let item: DesignItem = serde_json::from_str(json).unwrap();
        assert_eq!(item.start, GridPoint::new(2.0, 2.0));
        assert_eq!(item.end, GridPoint::new(4.0, 6.0));
        assert_eq!(item.facing, Some(Direction::North));

        let back = serde_json::to_value(&item).unwrap();
        assert_eq!(back["start"], serde_json::json!([2.0, 2.0]));
    }

    #[test]
    fn test_unknown_facing_is_none() {
        let json = r#"{"object":"Rug","start":[0,0],"end":[3,3],"item_id":"R1","facing":"none"}"#;
        let item: DesignItem = serde_json::from_str(json).unwrap();
        assert_eq!(item.facing, None);
    }

    #[test]
    fn test_room_design_wire_format() {
        let json = r##"{"items":[],"wallColor":"#fafafa"}"##;
        let design: RoomDesign = serde_json::from_str(json).unwrap();
        assert_eq!(design.wall_color, "#fafafa");
        assert!(design.style.is_none());

        let bare: RoomDesign = serde_json::from_str(r#"{"items":[]}"#).unwrap();
        assert_eq!(bare.wall_color, DEFAULT_WALL_COLOR);
    }

    #[test]
    fn test_catalog_label_fallbacks() {
        let described = CatalogItem::new("a").with_description("velvet sofa");
        assert_eq!(described.label_or("sofa"), "velvet sofa");

        let mut categorised = CatalogItem::new("b");
        categorised.object = Some("armchair".to_string());
        assert_eq!(categorised.label_or("sofa"), "armchair");

        let bare = CatalogItem::new("c").with_description("  ");
        assert_eq!(bare.label_or("sofa"), "sofa");
    }

    #[test]
    fn test_catalog_item_null_image() {
        let json = r#"{"item_id":"X","description":"lamp","image_id":null}"#;
        let item: CatalogItem = serde_json::from_str(json).unwrap();
        assert!(item.image_id.is_none());
    }
}

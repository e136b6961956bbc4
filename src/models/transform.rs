//! Bidirectional grid <-> world coordinate transformation.

use serde::{Deserialize, Serialize};

use crate::models::design::{DesignItem, GridPoint};
use crate::models::room::RoomGeometry;

/// A point in world space (room centred, y up).
///
/// Serialized as `[x, y, z]`.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(from = "[f64; 3]", into = "[f64; 3]")]
pub struct WorldPoint {
    /// Along the room length
    pub x: f64,
    /// Height above the floor
    pub y: f64,
    /// Along the room width
    pub z: f64,
}

impl WorldPoint {
    /// Creates a new world point.
    #[must_use]
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Returns this point shifted by `delta`.
    #[must_use]
    pub fn offset(self, delta: Self) -> Self {
        Self::new(self.x + delta.x, self.y + delta.y, self.z + delta.z)
    }
}

impl From<[f64; 3]> for WorldPoint {
    fn from([x, y, z]: [f64; 3]) -> Self {
        Self { x, y, z }
    }
}

impl From<WorldPoint> for [f64; 3] {
    fn from(point: WorldPoint) -> Self {
        [point.x, point.y, point.z]
    }
}

/// Maps between grid space and world space for one room.
///
/// Manages two coordinate spaces:
/// 1. **Grid** - generator output, `(row, col)` with the origin at a room corner
/// 2. **World** - render and pointer space, origin at the room centre, floor at `y = 0`
///
/// `col` maps onto `x` and `row` onto `z`; one grid unit is one world unit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CoordinateTransform {
    half_length: f64,
    half_width: f64,
}

impl CoordinateTransform {
    /// Builds the transform for a room.
    #[must_use]
    pub fn new(room: &RoomGeometry) -> Self {
        Self {
            half_length: room.half_length(),
            half_width: room.half_width(),
        }
    }

    /// Converts a grid column/row pair to a floor-level world point.
    #[must_use]
    pub fn grid_to_world(&self, grid_col: f64, grid_row: f64) -> WorldPoint {
        WorldPoint::new(grid_col - self.half_length, 0.0, grid_row - self.half_width)
    }

    /// Converts world `x`/`z` back to `(grid_col, grid_row)`.
    #[must_use]
    pub fn world_to_grid(&self, x: f64, z: f64) -> (f64, f64) {
        (x + self.half_length, z + self.half_width)
    }

    /// Converts a grid point to world space.
    #[must_use]
    pub fn point_to_world(&self, point: GridPoint) -> WorldPoint {
        self.grid_to_world(point.col, point.row)
    }

    /// Converts a world point to grid space, ignoring height.
    #[must_use]
    pub fn world_to_point(&self, world: WorldPoint) -> GridPoint {
        let (col, row) = self.world_to_grid(world.x, world.z);
        GridPoint::new(row, col)
    }

    /// Render position of an item: the world image of its grid centre.
    #[must_use]
    pub fn item_position(&self, item: &DesignItem) -> WorldPoint {
        self.point_to_world(item.center())
    }

    /// Recentres `item` on the grid image of `world`, keeping its size.
    pub fn place_item(&self, item: &mut DesignItem, world: WorldPoint) {
        item.recenter(self.world_to_point(world));
    }
}

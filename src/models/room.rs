//! Room boundary and wall openings.

use std::fmt;
use std::str::FromStr;

use anyhow::Result;
use serde::{Deserialize, Serialize};

/// Compass direction used for walls and item orientation.
///
/// World space convention: north is `-z`, south is `+z`, east is `+x`,
/// west is `-x`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// Wall at `z = -halfWidth`
    North,
    /// Wall at `x = +halfLength`
    East,
    /// Wall at `z = +halfWidth`
    South,
    /// Wall at `x = -halfLength`
    West,
}

impl Direction {
    /// All four directions in clockwise order starting at north.
    pub const ALL: [Self; 4] = [Self::North, Self::East, Self::South, Self::West];

    /// Lowercase name as used on the wire.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::North => "north",
            Self::East => "east",
            Self::South => "south",
            Self::West => "west",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Direction {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "north" | "n" => Ok(Self::North),
            "east" | "e" => Ok(Self::East),
            "south" | "s" => Ok(Self::South),
            "west" | "w" => Ok(Self::West),
            other => anyhow::bail!("Unknown direction '{other}' (expected north, east, south or west)"),
        }
    }
}

/// Strictly positive. NaN is not.
fn is_positive(value: f64) -> bool {
    value > 0.0
}

/// Kind of opening cut into a wall.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OpeningKind {
    /// Door
    Door,
    /// Window
    Window,
}

/// A door or window on one of the four walls.
///
/// Overlap between openings and spans running past the wall ends are not
/// checked here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Opening {
    /// Wall the opening is cut into
    pub wall: Direction,
    /// Fraction along the wall in `[0, 1]`
    pub position: f64,
    /// Opening width (room units)
    pub width: f64,
    /// Opening height (room units)
    pub height: f64,
    /// Door or window
    pub kind: OpeningKind,
}

impl Opening {
    /// Creates a new opening, rejecting non-positive width or height.
    pub fn new(
        wall: Direction,
        position: f64,
        width: f64,
        height: f64,
        kind: OpeningKind,
    ) -> Result<Self> {
        if !is_positive(width) || !is_positive(height) {
            anyhow::bail!(
                "Opening on {wall} wall must have positive width and height (got {width} x {height})"
            );
        }

        Ok(Self {
            wall,
            position,
            width,
            height,
            kind,
        })
    }

    /// Length of the wall this opening sits on.
    ///
    /// North and south walls run along the room length, east and west
    /// walls along its width.
    #[must_use]
    pub fn wall_length(&self, room: &RoomGeometry) -> f64 {
        match self.wall {
            Direction::North | Direction::South => room.length,
            Direction::East | Direction::West => room.width,
        }
    }

    /// Centre of the opening along its wall, measured from the wall midpoint.
    #[must_use]
    pub fn wall_offset(&self, room: &RoomGeometry) -> f64 {
        (self.position - 0.5) * self.wall_length(room)
    }
}

/// Room plan dimensions plus its openings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoomGeometry {
    /// Extent along the world x axis (grid columns)
    pub length: f64,
    /// Extent along the world z axis (grid rows)
    pub width: f64,
    /// Doors and windows in insertion order
    #[serde(default)]
    pub openings: Vec<Opening>,
}

impl RoomGeometry {
    /// Creates a room with no openings.
    pub fn new(length: f64, width: f64) -> Result<Self> {
        if !is_positive(length) || !is_positive(width) {
            anyhow::bail!("Room dimensions must be positive (got {length} x {width})");
        }

        Ok(Self {
            length,
            width,
            openings: Vec::new(),
        })
    }

    /// Adds an opening, returning `self` for chaining.
    #[must_use]
    pub fn with_opening(mut self, opening: Opening) -> Self {
        self.openings.push(opening);
        self
    }

    /// Checks the dimension invariants of a deserialized room.
    pub fn validate(&self) -> Result<()> {
        Self::new(self.length, self.width)?;
        for opening in &self.openings {
            Opening::new(
                opening.wall,
                opening.position,
                opening.width,
                opening.height,
                opening.kind,
            )?;
        }
        Ok(())
    }

    /// Half of the room length.
    #[must_use]
    pub fn half_length(&self) -> f64 {
        self.length / 2.0
    }

    /// Half of the room width.
    #[must_use]
    pub fn half_width(&self) -> f64 {
        self.width / 2.0
    }

    /// Openings on the given wall, in insertion order.
    pub fn openings_on(&self, wall: Direction) -> impl Iterator<Item = &Opening> {
        self.openings.iter().filter(move |o| o.wall == wall)
    }

    /// All doors.
    pub fn doors(&self) -> impl Iterator<Item = &Opening> {
        self.openings.iter().filter(|o| o.kind == OpeningKind::Door)
    }

    /// All windows.
    pub fn windows(&self) -> impl Iterator<Item = &Opening> {
        self.openings.iter().filter(|o| o.kind == OpeningKind::Window)
    }
}

impl Default for RoomGeometry {
    fn default() -> Self {
        Self {
            length: 16.0,
            width: 13.0,
            openings: Vec::new(),
        }
    }
}

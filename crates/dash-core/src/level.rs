//! Grid-based level model.
//!
//! A level is a fixed-size grid of cells. Objects are placed in integer cell
//! coordinates with `y = 0` as the top row; the bottom row
//! (`height_cells - 1`) sits directly on the ground.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Number of columns in every level.
pub const LEVEL_LENGTH_CELLS: i32 = 50;

/// Number of rows in every level.
pub const LEVEL_HEIGHT_CELLS: i32 = 14;

/// Kind of a placed object.
///
/// Kinds this crate does not know about are kept verbatim so that files
/// written by newer tools survive a load/save cycle.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ObjectKind {
    Solid,
    Spike,
    Other(String),
}

impl ObjectKind {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Solid => "solid",
            Self::Spike => "spike",
            Self::Other(name) => name,
        }
    }

    /// Returns true for kinds the simulation knows how to handle.
    pub fn is_known(&self) -> bool {
        !matches!(self, Self::Other(_))
    }
}

impl From<String> for ObjectKind {
    fn from(value: String) -> Self {
        match value.as_str() {
            "solid" => Self::Solid,
            "spike" => Self::Spike,
            _ => Self::Other(value),
        }
    }
}

impl From<ObjectKind> for String {
    fn from(value: ObjectKind) -> Self {
        match value {
            ObjectKind::Other(name) => name,
            known => known.as_str().to_string(),
        }
    }
}

impl std::fmt::Display for ObjectKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An object stored in a level. Coordinates and sizes are in grid cells.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LevelObject {
    pub kind: ObjectKind,
    pub x: i32,
    pub y: i32,
    #[serde(default = "default_extent")]
    pub w: i32,
    #[serde(default = "default_extent")]
    pub h: i32,
    /// Free-form per-object properties.
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub props: Map<String, Value>,
}

fn default_extent() -> i32 {
    1
}

impl LevelObject {
    /// Creates a 1x1 object without properties.
    pub fn new(kind: ObjectKind, x: i32, y: i32) -> Self {
        Self::with_size(kind, x, y, 1, 1)
    }

    pub fn with_size(kind: ObjectKind, x: i32, y: i32, w: i32, h: i32) -> Self {
        Self {
            kind,
            x,
            y,
            w,
            h,
            props: Map::new(),
        }
    }

    pub fn spike(x: i32, y: i32) -> Self {
        Self::new(ObjectKind::Spike, x, y)
    }

    pub fn solid(x: i32, y: i32) -> Self {
        Self::new(ObjectKind::Solid, x, y)
    }

    /// Returns true if the cell `(x, y)` lies inside this object's footprint.
    pub fn occupies(&self, x: i32, y: i32) -> bool {
        x >= self.x
            && x < self.x.saturating_add(self.w)
            && y >= self.y
            && y < self.y.saturating_add(self.h)
    }

    /// Iterates over every cell covered by this object.
    pub fn cells(&self) -> impl Iterator<Item = (i32, i32)> + '_ {
        let x_end = self.x.saturating_add(self.w);
        (self.y..self.y.saturating_add(self.h)).flat_map(move |y| (self.x..x_end).map(move |x| (x, y)))
    }
}

/// A level: fixed grid dimensions and the objects placed on it.
#[derive(Debug, Clone, PartialEq)]
pub struct Level {
    pub length_cells: i32,
    pub height_cells: i32,
    pub objects: Vec<LevelObject>,
}

impl Default for Level {
    fn default() -> Self {
        Self::empty()
    }
}

impl Level {
    pub fn new(length_cells: i32, height_cells: i32, objects: Vec<LevelObject>) -> Self {
        Self {
            length_cells,
            height_cells,
            objects,
        }
    }

    /// Creates a level with the standard dimensions and no objects.
    pub fn empty() -> Self {
        Self::new(LEVEL_LENGTH_CELLS, LEVEL_HEIGHT_CELLS, Vec::new())
    }

    /// The row that rests on the ground.
    pub fn ground_row(&self) -> i32 {
        self.height_cells - 1
    }

    pub fn in_bounds(&self, x: i32, y: i32) -> bool {
        x >= 0 && x < self.length_cells && y >= 0 && y < self.height_cells
    }

    /// Returns the first object occupying the cell, if any.
    pub fn object_at(&self, x: i32, y: i32) -> Option<&LevelObject> {
        self.objects.iter().find(|o| o.occupies(x, y))
    }

    pub fn spikes(&self) -> impl Iterator<Item = &LevelObject> {
        self.objects.iter().filter(|o| o.kind == ObjectKind::Spike)
    }

    pub fn solids(&self) -> impl Iterator<Item = &LevelObject> {
        self.objects.iter().filter(|o| o.kind == ObjectKind::Solid)
    }
}

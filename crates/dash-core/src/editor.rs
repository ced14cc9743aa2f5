//! Level editor controller.
//!
//! Maps grid clicks and tool choices onto [`crate::edit`] operations. Clicks
//! outside the grid are ignored rather than reported, matching how a canvas
//! behaves when the pointer leaves the drawn area.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::edit::{EditError, place_object, remove_object_at};
use crate::files::{FileError, load_level, save_level};
use crate::level::{Level, LevelObject, ObjectKind};

/// Object kind placed by a left click.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Tool {
    #[default]
    Spike,
    Solid,
}

impl Tool {
    pub fn kind(self) -> ObjectKind {
        match self {
            Self::Spike => ObjectKind::Spike,
            Self::Solid => ObjectKind::Solid,
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "spike" => Some(Self::Spike),
            "solid" => Some(Self::Solid),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Spike => "spike",
            Self::Solid => "solid",
        }
    }
}

#[derive(Debug, Clone)]
pub struct EditorController {
    level: Level,
    tool: Tool,
    last_path: Option<PathBuf>,
}

impl EditorController {
    pub fn new(initial_level: Level) -> Self {
        Self {
            level: initial_level,
            tool: Tool::Spike,
            last_path: None,
        }
    }

    pub fn level(&self) -> &Level {
        &self.level
    }

    pub fn tool(&self) -> Tool {
        self.tool
    }

    /// Path of the last successful load or save.
    pub fn last_path(&self) -> Option<&Path> {
        self.last_path.as_deref()
    }

    pub fn set_tool(&mut self, tool: Tool) {
        tracing::debug!(tool = tool.name(), "Selected editor tool");
        self.tool = tool;
    }

    /// Selects a tool by name; unknown names leave the tool unchanged.
    pub fn set_tool_by_name(&mut self, name: &str) -> bool {
        match Tool::from_name(name) {
            Some(tool) => {
                self.set_tool(tool);
                true
            }
            None => {
                tracing::warn!(name, "Ignoring unknown editor tool");
                false
            }
        }
    }

    /// Places a 1x1 object of the current tool's kind at the cell.
    ///
    /// Returns `Ok(false)` when the click was outside the grid.
    pub fn click_place(&mut self, x: i32, y: i32) -> Result<bool, EditError> {
        if !self.level.in_bounds(x, y) {
            tracing::debug!(x, y, "Ignoring out-of-bounds place");
            return Ok(false);
        }
        let obj = LevelObject::new(self.tool.kind(), x, y);
        self.level = place_object(&self.level, obj)?;
        Ok(true)
    }

    /// Removes whatever covers the cell. Returns false outside the grid.
    pub fn click_delete(&mut self, x: i32, y: i32) -> bool {
        if !self.level.in_bounds(x, y) {
            tracing::debug!(x, y, "Ignoring out-of-bounds delete");
            return false;
        }
        self.level = remove_object_at(&self.level, x, y);
        true
    }

    pub fn load_from(&mut self, path: &Path) -> Result<(), FileError> {
        self.level = load_level(path)?;
        self.last_path = Some(path.to_path_buf());
        tracing::info!(path = %path.display(), objects = self.level.objects.len(), "Loaded level into editor");
        Ok(())
    }

    pub fn save_to(&mut self, path: &Path) -> Result<(), FileError> {
        save_level(&self.level, path)?;
        self.last_path = Some(path.to_path_buf());
        tracing::info!(path = %path.display(), "Saved editor level");
        Ok(())
    }
}

//! Versioned JSON level format.
//!
//! Every file carries a `format` marker and an integer `version`. Version 2 is
//! written by this crate; version 1 files (a flat list of ground spikes) are
//! migrated on load.
//!
//! ```json
//! {
//!   "format": "dash.level",
//!   "version": 2,
//!   "length_cells": 50,
//!   "height_cells": 14,
//!   "objects": [
//!     { "kind": "spike", "x": 7, "y": 13, "w": 1, "h": 1 },
//!     { "kind": "solid", "x": 12, "y": 12, "w": 2, "h": 2 }
//!   ]
//! }
//! ```

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::edit::{EditError, check_object};
use crate::level::{LEVEL_HEIGHT_CELLS, LEVEL_LENGTH_CELLS, Level, LevelObject};

/// Format marker stored in every level file.
pub const FORMAT: &str = "dash.level";

/// Version written by [`encode_level`].
pub const VERSION: u32 = 2;

/// Oldest version [`decode_level`] still reads.
pub const LEGACY_VERSION: u32 = 1;

/// Error type for level encoding and decoding.
#[derive(Debug, thiserror::Error)]
pub enum CodecError {
    #[error("Level document must be a JSON object")]
    NotAnObject,
    #[error("Invalid level format marker: {0}")]
    InvalidFormat(String),
    #[error("Unsupported level version: {0}")]
    UnsupportedVersion(String),
    #[error("length_cells must be 50, got {0}")]
    LengthCells(i64),
    #[error("height_cells must be 14, got {0}")]
    HeightCells(i64),
    #[error("spike_cells entry out of range: {0}")]
    SpikeCellOutOfRange(i64),
    #[error("spike_cells must not contain duplicates: {0}")]
    DuplicateSpikeCell(i64),
    #[error("Invalid object at index {index}: {source}")]
    InvalidObject {
        index: usize,
        #[source]
        source: EditError,
    },
    #[error("Objects {first} and {second} overlap at cell ({x}, {y})")]
    Overlap {
        first: usize,
        second: usize,
        x: i32,
        y: i32,
    },
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

/// Version 1 layout: spikes on the ground row only.
#[derive(Debug, Deserialize)]
struct LevelFileV1 {
    length_cells: i64,
    #[serde(default)]
    spike_cells: Vec<i64>,
}

/// Version 2 layout: arbitrary grid objects.
#[derive(Debug, Serialize, Deserialize)]
struct LevelFileV2 {
    format: String,
    version: u32,
    length_cells: i64,
    height_cells: i64,
    #[serde(default)]
    objects: Vec<LevelObject>,
}

/// Encodes a level as a current-version JSON document.
pub fn encode_level(level: &Level) -> Result<Value, CodecError> {
    let file = LevelFileV2 {
        format: FORMAT.to_string(),
        version: VERSION,
        length_cells: i64::from(level.length_cells),
        height_cells: i64::from(level.height_cells),
        objects: level.objects.clone(),
    };
    Ok(serde_json::to_value(file)?)
}

/// Decodes and validates a level document of any supported version.
pub fn decode_level(value: &Value) -> Result<Level, CodecError> {
    let obj = value.as_object().ok_or(CodecError::NotAnObject)?;

    match obj.get("format").and_then(Value::as_str) {
        Some(FORMAT) => {}
        other => {
            return Err(CodecError::InvalidFormat(
                other.map_or_else(|| "<missing>".to_string(), str::to_string),
            ));
        }
    }

    let version = obj.get("version");
    match version.and_then(Value::as_u64) {
        Some(v) if v == u64::from(LEGACY_VERSION) => decode_v1(value),
        Some(v) if v == u64::from(VERSION) => decode_v2(value),
        _ => Err(CodecError::UnsupportedVersion(
            version.map_or_else(|| "<missing>".to_string(), Value::to_string),
        )),
    }
}

fn check_length(length_cells: i64) -> Result<(), CodecError> {
    if length_cells == i64::from(LEVEL_LENGTH_CELLS) {
        Ok(())
    } else {
        Err(CodecError::LengthCells(length_cells))
    }
}

fn decode_v1(value: &Value) -> Result<Level, CodecError> {
    let file: LevelFileV1 = serde_json::from_value(value.clone())?;
    check_length(file.length_cells)?;

    let ground_row = LEVEL_HEIGHT_CELLS - 1;
    let mut objects = Vec::with_capacity(file.spike_cells.len());
    let mut seen = std::collections::HashSet::new();

    for cell in file.spike_cells {
        let x = i32::try_from(cell)
            .ok()
            .filter(|x| (0..LEVEL_LENGTH_CELLS).contains(x))
            .ok_or(CodecError::SpikeCellOutOfRange(cell))?;
        if !seen.insert(x) {
            return Err(CodecError::DuplicateSpikeCell(cell));
        }
        objects.push(LevelObject::spike(x, ground_row));
    }

    tracing::debug!(spikes = objects.len(), "Migrated version 1 level");
    Ok(Level::new(LEVEL_LENGTH_CELLS, LEVEL_HEIGHT_CELLS, objects))
}

fn decode_v2(value: &Value) -> Result<Level, CodecError> {
    let file: LevelFileV2 = serde_json::from_value(value.clone())?;
    check_length(file.length_cells)?;
    if file.height_cells != i64::from(LEVEL_HEIGHT_CELLS) {
        return Err(CodecError::HeightCells(file.height_cells));
    }

    let level = Level::new(LEVEL_LENGTH_CELLS, LEVEL_HEIGHT_CELLS, file.objects);

    // cell -> index of the object that claimed it
    let mut claimed: HashMap<(i32, i32), usize> = HashMap::new();
    for (index, obj) in level.objects.iter().enumerate() {
        check_object(&level, obj).map_err(|source| CodecError::InvalidObject { index, source })?;
        for (x, y) in obj.cells() {
            if let Some(first) = claimed.insert((x, y), index) {
                return Err(CodecError::Overlap {
                    first,
                    second: index,
                    x,
                    y,
                });
            }
        }
    }

    let unknown = level.objects.iter().filter(|o| !o.kind.is_known()).count();
    if unknown > 0 {
        tracing::debug!(unknown, "Level contains object kinds this build does not simulate");
    }

    Ok(level)
}

/// Parses a level from JSON text.
pub fn from_json(json: &str) -> Result<Level, CodecError> {
    let value: Value = serde_json::from_str(json)?;
    decode_level(&value)
}

/// Serializes a level to pretty-printed JSON text with sorted keys.
pub fn to_json(level: &Level) -> Result<String, CodecError> {
    Ok(serde_json::to_string_pretty(&encode_level(level)?)?)
}

impl Level {
    /// Loads a level from JSON text.
    pub fn from_json(json: &str) -> Result<Self, CodecError> {
        from_json(json)
    }

    /// Serializes the level to JSON text.
    pub fn to_json(&self) -> Result<String, CodecError> {
        to_json(self)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::level::ObjectKind;

    #[test]
    fn test_encode_writes_current_version() {
        let level = Level::new(
            LEVEL_LENGTH_CELLS,
            LEVEL_HEIGHT_CELLS,
            vec![LevelObject::spike(4, 13)],
        );
        let value = encode_level(&level).unwrap();

        assert_eq!(value["format"], FORMAT);
        assert_eq!(value["version"], VERSION);
        assert_eq!(value["length_cells"], 50);
        assert_eq!(value["height_cells"], 14);
        assert_eq!(value["objects"][0]["kind"], "spike");
        assert_eq!(value["objects"][0]["w"], 1);
        assert!(value["objects"][0].get("props").is_none());
    }

    #[test]
    fn test_to_json_sorts_keys() {
        let json = to_json(&Level::empty()).unwrap();
        let format_at = json.find("\"format\"").unwrap();
        let height_at = json.find("\"height_cells\"").unwrap();
        let version_at = json.find("\"version\"").unwrap();
        assert!(format_at < height_at && height_at < version_at);
    }

    #[test]
    fn test_v1_migration() {
        let doc = json!({
            "format": FORMAT,
            "version": 1,
            "length_cells": 50,
            "spike_cells": [3, 9, 49]
        });
        let level = decode_level(&doc).unwrap();

        assert_eq!(level.height_cells, LEVEL_HEIGHT_CELLS);
        assert_eq!(
            level.objects,
            vec![
                LevelObject::spike(3, 13),
                LevelObject::spike(9, 13),
                LevelObject::spike(49, 13),
            ]
        );
    }

    #[test]
    fn test_v1_without_spikes() {
        let doc = json!({ "format": FORMAT, "version": 1, "length_cells": 50 });
        assert!(decode_level(&doc).unwrap().objects.is_empty());
    }

    #[test]
    fn test_v1_validation() {
        let dup = json!({ "format": FORMAT, "version": 1, "length_cells": 50, "spike_cells": [4, 4] });
        assert!(matches!(
            decode_level(&dup),
            Err(CodecError::DuplicateSpikeCell(4))
        ));

        let range = json!({ "format": FORMAT, "version": 1, "length_cells": 50, "spike_cells": [50] });
        assert!(matches!(
            decode_level(&range),
            Err(CodecError::SpikeCellOutOfRange(50))
        ));

        let negative = json!({ "format": FORMAT, "version": 1, "length_cells": 50, "spike_cells": [-1] });
        assert!(matches!(
            decode_level(&negative),
            Err(CodecError::SpikeCellOutOfRange(-1))
        ));

        let not_int = json!({ "format": FORMAT, "version": 1, "length_cells": 50, "spike_cells": ["a"] });
        assert!(matches!(decode_level(&not_int), Err(CodecError::Json(_))));

        let not_list = json!({ "format": FORMAT, "version": 1, "length_cells": 50, "spike_cells": 3 });
        assert!(matches!(decode_level(&not_list), Err(CodecError::Json(_))));
    }

    #[test]
    fn test_header_validation() {
        assert!(matches!(
            decode_level(&json!([1, 2])),
            Err(CodecError::NotAnObject)
        ));
        assert!(matches!(
            decode_level(&json!({ "format": "other", "version": 2 })),
            Err(CodecError::InvalidFormat(_))
        ));
        assert!(matches!(
            decode_level(&json!({ "version": 2 })),
            Err(CodecError::InvalidFormat(_))
        ));
        assert!(matches!(
            decode_level(&json!({ "format": FORMAT, "version": 3 })),
            Err(CodecError::UnsupportedVersion(v)) if v == "3"
        ));
        assert!(matches!(
            decode_level(&json!({ "format": FORMAT, "version": "2" })),
            Err(CodecError::UnsupportedVersion(_))
        ));
        assert!(matches!(
            decode_level(&json!({ "format": FORMAT })),
            Err(CodecError::UnsupportedVersion(_))
        ));
    }

    #[test]
    fn test_v2_dimension_validation() {
        let short = json!({ "format": FORMAT, "version": 2, "length_cells": 40, "height_cells": 14 });
        assert!(matches!(decode_level(&short), Err(CodecError::LengthCells(40))));

        let tall = json!({ "format": FORMAT, "version": 2, "length_cells": 50, "height_cells": 20 });
        assert!(matches!(decode_level(&tall), Err(CodecError::HeightCells(20))));

        let missing = json!({ "format": FORMAT, "version": 2, "length_cells": 50 });
        assert!(matches!(decode_level(&missing), Err(CodecError::Json(_))));
    }

    #[test]
    fn test_v2_object_validation() {
        let out_of_bounds = json!({
            "format": FORMAT, "version": 2, "length_cells": 50, "height_cells": 14,
            "objects": [
                { "kind": "solid", "x": 0, "y": 13 },
                { "kind": "solid", "x": 49, "y": 13, "w": 2 }
            ]
        });
        assert!(matches!(
            decode_level(&out_of_bounds),
            Err(CodecError::InvalidObject { index: 1, source: EditError::OutOfBoundsX { .. } })
        ));

        let wide_spike = json!({
            "format": FORMAT, "version": 2, "length_cells": 50, "height_cells": 14,
            "objects": [{ "kind": "spike", "x": 3, "y": 13, "w": 2 }]
        });
        assert!(matches!(
            decode_level(&wide_spike),
            Err(CodecError::InvalidObject { index: 0, source: EditError::SpikeSize { .. } })
        ));

        let overlap = json!({
            "format": FORMAT, "version": 2, "length_cells": 50, "height_cells": 14,
            "objects": [
                { "kind": "solid", "x": 3, "y": 12, "w": 2, "h": 2 },
                { "kind": "spike", "x": 4, "y": 13 }
            ]
        });
        assert!(matches!(
            decode_level(&overlap),
            Err(CodecError::Overlap { first: 0, second: 1, x: 4, y: 13 })
        ));
    }

    #[test]
    fn test_v2_rejects_coordinates_at_integer_limit() {
        let json = r#"{"format":"dash.level","version":2,"length_cells":50,"height_cells":14,
            "objects":[{"kind":"solid","x":2147483647,"y":13,"w":1}]}"#;
        assert!(matches!(
            from_json(json),
            Err(CodecError::InvalidObject { index: 0, source: EditError::OutOfBoundsX { .. } })
        ));

        let tall = json!({
            "format": FORMAT, "version": 2, "length_cells": 50, "height_cells": 14,
            "objects": [{ "kind": "solid", "x": 0, "y": 13, "h": i32::MAX }]
        });
        assert!(matches!(
            decode_level(&tall),
            Err(CodecError::InvalidObject { index: 0, source: EditError::OutOfBoundsY { .. } })
        ));
    }

    #[test]
    fn test_unknown_kinds_survive_round_trip() {
        let doc = json!({
            "format": FORMAT, "version": 2, "length_cells": 50, "height_cells": 14,
            "extra_top_level": true,
            "objects": [
                { "kind": "portal", "x": 10, "y": 5, "props": { "target": "upside_down" } },
                { "kind": "spike", "x": 11, "y": 13 }
            ]
        });
        let level = decode_level(&doc).unwrap();
        assert_eq!(level.objects[0].kind, ObjectKind::Other("portal".into()));
        assert_eq!(level.objects[0].props["target"], "upside_down");

        let encoded = encode_level(&level).unwrap();
        assert_eq!(encoded["objects"][0]["kind"], "portal");
        assert_eq!(encoded["objects"][0]["props"]["target"], "upside_down");
        assert!(encoded.get("extra_top_level").is_none());

        let reloaded = decode_level(&encoded).unwrap();
        assert_eq!(reloaded, level);
    }

    #[test]
    fn test_from_json_rejects_malformed_text() {
        assert!(matches!(from_json("{ not json"), Err(CodecError::Json(_))));
    }
}

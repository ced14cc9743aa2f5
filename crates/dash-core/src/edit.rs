//! Pure level editing operations.

use crate::level::{Level, LevelObject, ObjectKind};

/// Error type for rejected edits.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum EditError {
    #[error("Object size must be positive, got {w}x{h}")]
    InvalidSize { w: i32, h: i32 },
    #[error("Object out of bounds in x: {x}..{end} exceeds 0..{length}")]
    OutOfBoundsX { x: i32, end: i64, length: i32 },
    #[error("Object out of bounds in y: {y}..{end} exceeds 0..{height}")]
    OutOfBoundsY { y: i32, end: i64, height: i32 },
    #[error("Spike must be 1x1, got {w}x{h}")]
    SpikeSize { w: i32, h: i32 },
}

/// Checks that `obj` fits on `level`.
pub(crate) fn check_object(level: &Level, obj: &LevelObject) -> Result<(), EditError> {
    if obj.w <= 0 || obj.h <= 0 {
        return Err(EditError::InvalidSize { w: obj.w, h: obj.h });
    }
    // Widened so coordinates read from a file cannot overflow.
    let end_x = i64::from(obj.x) + i64::from(obj.w);
    if obj.x < 0 || end_x > i64::from(level.length_cells) {
        return Err(EditError::OutOfBoundsX {
            x: obj.x,
            end: end_x,
            length: level.length_cells,
        });
    }
    let end_y = i64::from(obj.y) + i64::from(obj.h);
    if obj.y < 0 || end_y > i64::from(level.height_cells) {
        return Err(EditError::OutOfBoundsY {
            y: obj.y,
            end: end_y,
            height: level.height_cells,
        });
    }
    if obj.kind == ObjectKind::Spike && (obj.w != 1 || obj.h != 1) {
        return Err(EditError::SpikeSize { w: obj.w, h: obj.h });
    }
    Ok(())
}

/// Places `obj` on a copy of `level`.
///
/// Any object occupying the anchor cell `(obj.x, obj.y)` is replaced.
pub fn place_object(level: &Level, obj: LevelObject) -> Result<Level, EditError> {
    check_object(level, &obj)?;

    let mut objects: Vec<LevelObject> = level
        .objects
        .iter()
        .filter(|o| !o.occupies(obj.x, obj.y))
        .cloned()
        .collect();
    objects.push(obj);

    Ok(Level::new(level.length_cells, level.height_cells, objects))
}

/// Returns a copy of `level` without the objects covering `(x, y)`.
pub fn remove_object_at(level: &Level, x: i32, y: i32) -> Level {
    let objects = level
        .objects
        .iter()
        .filter(|o| !o.occupies(x, y))
        .cloned()
        .collect();
    Level::new(level.length_cells, level.height_cells, objects)
}

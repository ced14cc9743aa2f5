//! Level files on disk.
//!
//! Writes go to a `.tmp` sibling first and are renamed over the target, so a
//! crash never leaves a half-written level behind.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::codec::{self, CodecError, VERSION};
use crate::level::Level;

/// Error type for level file operations.
#[derive(Debug, thiserror::Error)]
pub enum FileError {
    #[error("Failed to access {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("Failed to decode level from {}: {source}", .path.display())]
    Decode {
        path: PathBuf,
        #[source]
        source: CodecError,
    },
    #[error("Failed to encode level for {}: {source}", .path.display())]
    Encode {
        path: PathBuf,
        #[source]
        source: CodecError,
    },
}

impl FileError {
    fn io(path: &Path, source: io::Error) -> Self {
        Self::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

/// Reads and decodes a level file.
pub fn load_level(path: &Path) -> Result<Level, FileError> {
    let data = fs::read_to_string(path).map_err(|e| FileError::io(path, e))?;
    codec::from_json(&data).map_err(|source| FileError::Decode {
        path: path.to_path_buf(),
        source,
    })
}

/// Encodes `level` and atomically replaces `path` with it.
pub fn save_level(level: &Level, path: &Path) -> Result<(), FileError> {
    let text = codec::to_json(level).map_err(|source| FileError::Encode {
        path: path.to_path_buf(),
        source,
    })?;
    write_atomic(path, &text)
}

fn temp_path(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_os_string();
    name.push(".tmp");
    PathBuf::from(name)
}

fn write_atomic(path: &Path, text: &str) -> Result<(), FileError> {
    let tmp = temp_path(path);
    let result = fs::write(&tmp, text).and_then(|()| fs::rename(&tmp, path));
    if let Err(e) = result {
        if tmp.exists() {
            if let Err(cleanup) = fs::remove_file(&tmp) {
                tracing::warn!(path = %tmp.display(), error = %cleanup, "Failed to remove temp file");
            }
        }
        return Err(FileError::io(path, e));
    }
    Ok(())
}

/// Archive of beaten levels under `<base_dir>/levels`.
#[derive(Debug, Clone)]
pub struct LevelRepository {
    levels_dir: PathBuf,
}

impl LevelRepository {
    /// Opens the archive, creating the `levels` directory if needed.
    pub fn new(base_dir: &Path) -> Result<Self, FileError> {
        let levels_dir = base_dir.join("levels");
        fs::create_dir_all(&levels_dir).map_err(|e| FileError::io(&levels_dir, e))?;
        Ok(Self { levels_dir })
    }

    pub fn levels_dir(&self) -> &Path {
        &self.levels_dir
    }

    /// File name used for the `beaten_index`-th beaten level (1-based).
    pub fn file_name(beaten_index: u32) -> String {
        format!("level_{beaten_index:04}_v{VERSION}.json")
    }

    /// Saves a beaten level and returns the path it was written to.
    pub fn save_beaten_level(&self, level: &Level, beaten_index: u32) -> Result<PathBuf, FileError> {
        let path = self.levels_dir.join(Self::file_name(beaten_index));
        save_level(level, &path)?;
        tracing::info!(path = %path.display(), beaten_index, "Saved beaten level");
        Ok(path)
    }

    /// Lists archived level files sorted by name.
    pub fn list(&self) -> Result<Vec<PathBuf>, FileError> {
        let entries = fs::read_dir(&self.levels_dir).map_err(|e| FileError::io(&self.levels_dir, e))?;
        let mut paths = Vec::new();
        for entry in entries {
            let path = entry.map_err(|e| FileError::io(&self.levels_dir, e))?.path();
            if path.extension().is_some_and(|ext| ext == "json") {
                paths.push(path);
            }
        }
        paths.sort();
        Ok(paths)
    }
}

//! Error types
//!
//! The physics step itself never fails; these cover the few fallible edges
//! around it (vector normalisation, level construction, settings loading).

use thiserror::Error;

/// Errors raised by vector math
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum PhysicsError {
    /// Normalising a vector whose norm is 0
    #[error("cannot normalise a zero-length vector")]
    ZeroLengthVector,
}

/// Errors raised while building a level grid
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LevelError {
    #[error("level `{0}` has no rows")]
    Empty(String),
    #[error("row {row} has {found} cells, expected {expected}")]
    Ragged {
        row: usize,
        expected: usize,
        found: usize,
    },
    #[error("unknown block character {ch:?} at ({x}, {y})")]
    UnknownBlock { ch: char, x: usize, y: usize },
    #[error("level `{name}` is too large ({width}x{height} cells)")]
    TooLarge {
        name: String,
        width: usize,
        height: usize,
    },
}

/// Errors raised while loading settings
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("failed to read settings: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse settings: {0}")]
    Parse(#[from] serde_json::Error),
}

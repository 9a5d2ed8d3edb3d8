//! Error types for the fallible corners of the core.
//!
//! Most geometry helpers return safe defaults instead of errors because they
//! run during generation, before a shape is known to be valid. Only caller
//! bugs (centroid of nothing) and external input (outline documents, settings
//! files) surface as errors.

use thiserror::Error;

/// Geometry kernel failures
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum GeometryError {
    /// An operation that needs at least one point received none.
    #[error("cannot compute a centroid of an empty point list")]
    EmptyInput,
}

/// Problems with an externally supplied outline document
#[derive(Debug, Error)]
pub enum OutlineError {
    #[error("outline needs at least 3 vertices, got {got}")]
    TooFewVertices { got: usize },

    #[error("outline vertex {index} has a non-finite coordinate")]
    NonFinite { index: usize },

    #[error("outline could not be triangulated")]
    Untriangulable,

    #[error("malformed outline document: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Settings file failures
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("failed to read settings: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse settings: {0}")]
    Parse(#[from] serde_json::Error),
}

use std::io;
use thiserror::Error;

/// Error type for structural file operations.
#[derive(Error, Debug)]
pub enum StructureError {
    /// A coordinate record whose fixed-column region can't be interpreted.
    #[error("Malformed record in {path} at line {line}: {reason}")]
    Parse {
        path: String,
        line: usize,
        reason: String,
    },

    /// The file was read but holds no ATOM/HETATM records.
    #[error("Corrupted file. 0 atom records found in the file: {0}")]
    EmptyStructure(String),

    /// IO error occurred during file operations.
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

/// Result type alias for structural file operations.
pub type Result<T> = std::result::Result<T, StructureError>;

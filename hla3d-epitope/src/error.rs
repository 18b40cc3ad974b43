use std::io;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum EpitopeError {
    /// An epitope or transplant identifier absent from the reference data.
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("Invalid reference table: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, EpitopeError>;

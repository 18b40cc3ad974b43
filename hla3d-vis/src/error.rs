use thiserror::Error;

use hla3d_epitope::EpitopeError;

use super::config::ConfigError;

#[derive(Error, Debug)]
pub enum VisError {
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Epitope(#[from] EpitopeError),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, VisError>;

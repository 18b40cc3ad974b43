use thiserror::Error;

#[derive(Error, Debug)]
pub enum HlaError {
    #[error("Invalid HLA allele identifier, expected `Locus*group:subtype`: {0}")]
    InvalidAllele(String),
}

pub type Result<T> = std::result::Result<T, HlaError>;

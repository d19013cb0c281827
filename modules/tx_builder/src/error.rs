use thiserror::Error;

use crate::validation::ValidationError;

#[derive(Debug, Error)]
pub enum TxBuilderError {
    #[error("Invalid JSON format: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid metadata label '{0}': expected a positive integer that is not already used")]
    InvalidLabel(String),

    #[error("Required signer must not be empty")]
    EmptySigner,

    #[error(transparent)]
    Invalid(#[from] ValidationError),

    #[error("Draft store failed: {0:#}")]
    Store(anyhow::Error),
}

pub type Result<T> = std::result::Result<T, TxBuilderError>;

use thiserror::Error;

use super::todo::TodoId;

#[derive(Debug, Error)]
pub enum TodoError {
    #[error("validation failed: {0}")]
    Validation(String),

    #[error("todo with id {0} not found")]
    NotFound(TodoId),

    #[error("storage error: {0}")]
    Storage(#[from] anyhow::Error),
}

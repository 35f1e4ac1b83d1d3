use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Failed to load resources: {0}")]
    Load(String),

    #[error("Collection already exists: {0}")]
    AlreadyExists(String),

    #[error("Embedding dimension mismatch for id {id}: expected {expected}, got {actual}")]
    DimensionMismatch { id: String, expected: usize, actual: usize },

    #[error("Query failed: {0}")]
    Query(String),
}

pub type Result<T> = std::result::Result<T, Error>;

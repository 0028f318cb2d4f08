use thiserror::Error;

/// Errors that can occur in larder-kge.
#[derive(Error, Debug)]
pub enum Error {
    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    /// JSON serialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    /// Entity not present in the model vocabulary.
    #[error("Entity not found: {0}")]
    EntityNotFound(String),
    /// Relation not present in the model vocabulary.
    #[error("Relation not found: {0}")]
    RelationNotFound(String),
    /// The model artifact is unusable.
    #[error("Invalid model: {0}")]
    InvalidModel(String),
    /// A predictor panicked while holding its exclusive lock.
    #[error("Predictor lock poisoned")]
    Poisoned,
}

impl Error {
    /// True for vocabulary misses, which callers may treat as "no candidates".
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::EntityNotFound(_) | Self::RelationNotFound(_))
    }
}

/// Result type alias for larder-kge.
pub type Result<T> = std::result::Result<T, Error>;

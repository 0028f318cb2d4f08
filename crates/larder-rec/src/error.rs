use thiserror::Error;

/// Errors that can occur while serving recommendations.
#[derive(Error, Debug)]
pub enum Error {
    /// Recipe data or graph error.
    #[error(transparent)]
    Core(#[from] larder_core::Error),
    /// Embedding model error.
    #[error(transparent)]
    Model(#[from] larder_kge::Error),
    /// A criterion weight that cannot be used for scoring.
    #[error("Invalid weight for '{category}': {weight} (must be finite and non-negative)")]
    InvalidWeight { category: String, weight: f32 },
}

/// Result type alias for larder-rec.
pub type Result<T> = std::result::Result<T, Error>;

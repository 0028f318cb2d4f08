//! Error types for larder-core.

use thiserror::Error;

/// Errors raised while loading recipes or building and persisting the graph.
#[derive(Error, Debug)]
pub enum Error {
    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV read/write error.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// JSON serialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Binary graph (de)serialization error.
    #[error("Binary encoding error: {0}")]
    Binary(#[from] bincode::Error),

    /// The recipe source lacks required columns.
    #[error("Missing required columns in recipe source: {}", .0.join(", "))]
    MissingColumns(Vec<String>),

    /// A recipe row could not be turned into a record.
    #[error("Invalid recipe record at row {row}: {reason}")]
    InvalidRecord {
        /// 1-based data row (header excluded).
        row: usize,
        /// What was wrong with it.
        reason: String,
    },

    /// A canonical entity string did not start with a known node type.
    #[error("Malformed canonical entity: {0}")]
    MalformedEntity(String),

    /// Unknown node type name.
    #[error("Unknown node type: {0}")]
    UnknownNodeType(String),

    /// Unknown relation name.
    #[error("Unknown relation: {0}")]
    UnknownRelation(String),
}

/// Result type alias for larder-core.
pub type Result<T> = std::result::Result<T, Error>;

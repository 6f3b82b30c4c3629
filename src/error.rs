//! Crate-wide error type.
use crate::coordinator::Mode;
use crate::pov::PovId;
use thiserror::Error;

/// Convenience result alias used across the crate.
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    /// Missing or unusable configuration. Always fatal at startup.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Settings attribute with the wrong JSON type.
    #[error("Type error with the attribute \"{attribute}\". Expected {expected} but had {actual}.")]
    Schema {
        attribute: String,
        expected: String,
        actual: String,
    },

    /// Settings attribute that the schema does not know about.
    #[error("Unknown attribute \"{attribute}\"")]
    UnknownAttribute { attribute: String },

    /// No learning record with this id in the cache tiers or the repository.
    #[error("No POV with id {0}")]
    NotFound(PovId),

    #[error("Mode {0:?} requires a pov_id")]
    MissingPovId(Mode),

    /// The transport's peer went away for good.
    #[error("Transport closed")]
    Disconnected,

    /// Malformed wire message.
    #[error("Protocol error: {0}")]
    Protocol(String),

    #[error("Invalid image: {0}")]
    InvalidImage(String),

    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

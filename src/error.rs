//! # Error Types
//!
//! Custom error types for GamerGrip using `thiserror`.

use thiserror::Error;

/// Main error type for GamerGrip
#[derive(Debug, Error)]
pub enum GamerGripError {
    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(#[from] toml::de::Error),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Controller access errors
    #[error("Controller error: {0}")]
    Controller(String),

    /// Skin identifier not present in the catalog
    #[error("Unknown skin: {0}")]
    SkinNotFound(String),

    /// Skin asset could not be retrieved
    #[error("Failed to fetch {path}: {reason}")]
    SkinFetch { path: String, reason: String },

    /// Retrieved document is not a usable SVG template
    #[error("Invalid skin template: {0}")]
    InvalidTemplate(String),

    /// XML parsing errors
    #[error("XML error: {0}")]
    Xml(#[from] quick_xml::Error),

    /// HTTP errors
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

/// Result type alias for GamerGrip
pub type Result<T> = std::result::Result<T, GamerGripError>;

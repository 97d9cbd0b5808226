//! Error handling for the lensgen binding generator.
//!
//! This module defines the main error type `Error` used throughout the library,
//! along with a convenient `Result` type alias. Only input contract violations
//! are errors here: unsupported formats and overwritten declarations are reported
//! as [`BindingWarning`](crate::engine::BindingWarning)s instead.
//!
//! # Examples
//!
//! ```
//! use lensgen_core::error::{Error, Result};
//!
//! fn must_have_operations(count: usize) -> Result<()> {
//!     if count == 0 {
//!         return Err(Error::model("no operations in model"));
//!     }
//!     Ok(())
//! }
//!
//! assert!(must_have_operations(0).is_err());
//! ```

use thiserror::Error;

/// Result type for lensgen operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for lensgen operations
#[derive(Debug, Error)]
pub enum Error {
    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// YAML parsing error
    #[error("YAML parsing error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// JSON parsing error
    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML parsing error
    #[error("TOML parsing error: {0}")]
    Toml(#[from] toml::de::Error),

    /// HTTP error while fetching a remote operation model
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Operation model error
    #[error("Operation model error: {0}")]
    Model(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// A parameter has zero or several location flags set.
    #[error(
        "Cannot classify location of parameter '{parameter}' in operation '{operation}': {flags} location flags set"
    )]
    UnclassifiableLocation {
        operation: String,
        parameter: String,
        flags: usize,
    },

    /// Two parameters map to the same declaration name with different definitions
    /// while the strict collision policy is active.
    #[error("Conflicting definitions for '{name}': '{existing}' vs '{incoming}'")]
    DefinitionConflict {
        name: String,
        existing: String,
        incoming: String,
    },
}

impl Error {
    /// Create a new configuration error
    pub fn config<S: Into<String>>(msg: S) -> Self {
        Self::Config(msg.into())
    }

    /// Create a new operation model error
    pub fn model<S: Into<String>>(msg: S) -> Self {
        Self::Model(msg.into())
    }
}

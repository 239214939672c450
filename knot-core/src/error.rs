//! Error types for the binding layer.

use thiserror::Error;

/// Errors surfaced by [`Binder`](crate::Binder) operations.
///
/// Most conditions are recoverable: they are logged through `tracing` and
/// the operation that raised them has no effect.
#[derive(Debug, Error)]
pub enum BindError {
    /// A variable name that is not part of the model was read or written.
    #[error("unknown variable: {0}")]
    UnknownVariable(String),

    /// A format identifier matched neither a registered formatter nor a
    /// printf-style pattern.
    #[error("unknown format: {0}")]
    UnknownFormat(String),

    /// Nested `set_values` calls went deeper than the configured limit.
    #[error("re-entrant updates nested deeper than {0} levels")]
    ReentrancyLimit(usize),

    /// A weak binder handle was used after its binder was dropped.
    #[error("binder has been dropped")]
    Detached,

    /// A configuration value is out of range.
    #[error("invalid setting {name}: {reason}")]
    InvalidSetting { name: &'static str, reason: &'static str },

    /// Configuration or template JSON could not be decoded.
    #[error("invalid configuration: {0}")]
    Config(#[from] serde_json::Error),
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, BindError>;

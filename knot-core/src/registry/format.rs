//! Formatter resolution.

use std::sync::Arc;

use tracing::warn;

use crate::error::{BindError, Result};
use crate::value::Value;

use super::Registry;

/// Value to display-string conversion used by default bindings.
pub type Formatter = Arc<dyn Fn(&Value) -> String + Send + Sync>;

/// `printf(pattern, value)`, supplied by the embedding environment.
pub type PrintfFn = Arc<dyn Fn(&str, &Value) -> String + Send + Sync>;

/// Name of the built-in identity formatter.
pub const DEFAULT_FORMAT: &str = "default";

/// The identity stringification.
pub fn identity() -> Formatter {
    Arc::new(|value: &Value| value.to_string())
}

impl Registry {
    /// Look up a formatter by name, or build one from a printf pattern.
    ///
    /// A name is treated as a pattern only when it contains `%` and a printf
    /// function has been installed.
    pub fn try_formatter(&self, name: &str) -> Result<Formatter> {
        if let Some(formatter) = self.formatter(name) {
            return Ok(formatter);
        }
        if name.contains('%') {
            if let Some(printf) = self.printf() {
                let pattern = name.to_string();
                return Ok(Arc::new(move |value: &Value| printf(&pattern, value)));
            }
        }
        Err(BindError::UnknownFormat(name.to_string()))
    }

    /// Like [`try_formatter`](Self::try_formatter), but falls back to the
    /// default formatter with a warning.
    pub fn resolve_formatter(&self, name: &str) -> Formatter {
        self.try_formatter(name).unwrap_or_else(|err| {
            warn!(format = name, "{err}, using {DEFAULT_FORMAT}");
            self.default_formatter()
        })
    }

    /// The `"default"` formatter, or the identity if it was replaced by
    /// nothing at all.
    pub fn default_formatter(&self) -> Formatter {
        self.formatter(DEFAULT_FORMAT).unwrap_or_else(identity)
    }
}

//! Binder configuration.

use serde::{Deserialize, Serialize};

use crate::error::{BindError, Result};
use crate::reactive::NotifyPolicy;

/// Markup contract and dispatch settings for a [`Binder`](crate::Binder).
///
/// Every field has a default, so a JSON document only needs to name the
/// settings it changes:
///
/// ```rust
/// use knot_core::{BinderConfig, NotifyPolicy};
///
/// let config = BinderConfig::from_json(r#"{ "notify": "per_variable" }"#).unwrap();
/// assert_eq!(config.notify, NotifyPolicy::PerVariable);
/// assert_eq!(config.var_attribute, "data-var");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BinderConfig {
    /// Attribute listing the bound variable names.
    pub var_attribute: String,

    /// Attribute listing component class tokens.
    pub class_attribute: String,

    /// Attribute naming the formatter of a default binding.
    pub format_attribute: String,

    /// Tag of the child element created by default bindings.
    pub text_holder_tag: String,

    /// Treatment of bindings registered under several changed variables.
    pub notify: NotifyPolicy,

    /// Maximum nesting of re-entrant updates.
    pub max_depth: usize,
}

impl BinderConfig {
    /// Parse a configuration from JSON and validate it.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Check that the settings describe a usable binder.
    ///
    /// `max_depth` must be at least 1, otherwise no update could ever run.
    pub fn validate(&self) -> Result<()> {
        if self.max_depth == 0 {
            return Err(BindError::InvalidSetting {
                name: "max_depth",
                reason: "must be at least 1",
            });
        }
        Ok(())
    }
}

impl Default for BinderConfig {
    fn default() -> Self {
        Self {
            var_attribute: "data-var".to_string(),
            class_attribute: "class".to_string(),
            format_attribute: "data-format".to_string(),
            text_holder_tag: "span".to_string(),
            notify: NotifyPolicy::default(),
            max_depth: 64,
        }
    }
}

//! Provider configuration
//!
//! Loaded from TOML:
//!
//! ```toml
//! bcrypt_cost = 12
//!
//! [log]
//! filter = "strand_core=debug"
//! json = true
//! ```

use serde::{Deserialize, Serialize};
use strand_state::{DEFAULT_BCRYPT_COST, MAX_BCRYPT_COST, MIN_BCRYPT_COST};

use crate::error::StrandError;

/// Provider configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StrandConfig {
    /// bcrypt work factor for password hashes
    pub bcrypt_cost: u32,

    /// Logging
    pub log: LogConfig,
}

impl StrandConfig {
    /// Create default configuration
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// With bcrypt cost
    #[inline]
    #[must_use]
    pub fn with_bcrypt_cost(mut self, cost: u32) -> Self {
        self.bcrypt_cost = cost;
        self
    }

    /// With logging configuration
    #[inline]
    #[must_use]
    pub fn with_log(mut self, log: LogConfig) -> Self {
        self.log = log;
        self
    }

    /// Parse and validate TOML
    ///
    /// # Errors
    /// Returns [`StrandError::Config`] on malformed TOML or invalid values
    pub fn from_toml_str(text: &str) -> Result<Self, StrandError> {
        let config: Self =
            toml::from_str(text).map_err(|err| StrandError::Config(err.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Check value ranges
    ///
    /// # Errors
    /// Returns [`StrandError::Config`] naming the offending field
    pub fn validate(&self) -> Result<(), StrandError> {
        if !(MIN_BCRYPT_COST..=MAX_BCRYPT_COST).contains(&self.bcrypt_cost) {
            return Err(StrandError::Config(format!(
                "bcrypt_cost must be within {MIN_BCRYPT_COST}..={MAX_BCRYPT_COST}, got {}",
                self.bcrypt_cost
            )));
        }
        if self.log.filter.trim().is_empty() {
            return Err(StrandError::Config("log.filter must not be empty".to_string()));
        }
        Ok(())
    }
}

impl Default for StrandConfig {
    fn default() -> Self {
        Self {
            bcrypt_cost: DEFAULT_BCRYPT_COST,
            log: LogConfig::default(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LogConfig {
    /// `EnvFilter` directive, used when `RUST_LOG` is unset
    pub filter: String,

    /// Emit JSON lines instead of human-readable output
    pub json: bool,
}

impl LogConfig {
    /// With filter directive
    #[inline]
    #[must_use]
    pub fn with_filter(mut self, filter: impl Into<String>) -> Self {
        self.filter = filter.into();
        self
    }

    /// With JSON output
    #[inline]
    #[must_use]
    pub fn with_json(mut self, json: bool) -> Self {
        self.json = json;
        self
    }
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            filter: "info".to_string(),
            json: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn empty_toml_is_default() {
        assert_eq!(StrandConfig::from_toml_str("").unwrap(), StrandConfig::default());
        assert_eq!(StrandConfig::default().bcrypt_cost, 10);
    }

    #[test]
    fn full_toml() {
        let config = StrandConfig::from_toml_str(
            r#"
            bcrypt_cost = 12

            [log]
            filter = "strand_core=debug"
            json = true
            "#,
        )
        .unwrap();
        assert_eq!(
            config,
            StrandConfig::new()
                .with_bcrypt_cost(12)
                .with_log(LogConfig::default().with_filter("strand_core=debug").with_json(true))
        );
    }

    #[test]
    fn out_of_range_cost_rejected() {
        let err = StrandConfig::from_toml_str("bcrypt_cost = 3").unwrap_err();
        assert!(matches!(err, StrandError::Config(ref msg) if msg.contains("bcrypt_cost")));
        assert!(StrandConfig::new().with_bcrypt_cost(32).validate().is_err());
    }

    #[test]
    fn unknown_field_rejected() {
        assert!(StrandConfig::from_toml_str("cost = 3").is_err());
    }
}

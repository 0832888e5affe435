//! Engine configuration, loaded from TOML.
//!
//! ```toml
//! [cancellation]
//! cancel_min_hours = 24
//! ```
//!
//! Missing sections and keys fall back to their defaults.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{BookingError, Result};
use crate::policy::CancellationPolicy;

/// Longest notice a policy may demand: one year.
const MAX_CANCEL_MIN_HOURS: u32 = 24 * 366;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub cancellation: CancellationPolicy,
}

impl EngineConfig {
    /// Load configuration from a TOML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|e| BookingError::Config(format!("{}: {e}", path.display())))?;
        let config = Self::from_toml_str(&content)?;
        tracing::info!(path = %path.display(), "loaded booking engine config");
        Ok(config)
    }

    /// Parse configuration from a TOML string.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: EngineConfig =
            toml::from_str(content).map_err(|e| BookingError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.cancellation.cancel_min_hours > MAX_CANCEL_MIN_HOURS {
            return Err(BookingError::Config(format!(
                "cancellation.cancel_min_hours must be at most {MAX_CANCEL_MIN_HOURS}, got {}",
                self.cancellation.cancel_min_hours
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = EngineConfig::from_toml_str("").unwrap();
        assert_eq!(config, EngineConfig::default());
        assert_eq!(config.cancellation.cancel_min_hours, 24);
    }

    #[test]
    fn test_parse_cancellation_section() {
        let config = EngineConfig::from_toml_str("[cancellation]\ncancel_min_hours = 6\n").unwrap();
        assert_eq!(config.cancellation.cancel_min_hours, 6);
    }

    #[test]
    fn test_invalid_toml_is_config_error() {
        let err = EngineConfig::from_toml_str("[cancellation\n").unwrap_err();
        assert_eq!(err.code(), "CONFIG_ERROR");

        let err =
            EngineConfig::from_toml_str("[cancellation]\ncancel_min_hours = -1\n").unwrap_err();
        assert_eq!(err.code(), "CONFIG_ERROR");
    }

    #[test]
    fn test_out_of_range_rejected() {
        let err = EngineConfig::from_toml_str("[cancellation]\ncancel_min_hours = 100000\n")
            .unwrap_err();
        assert!(err.to_string().contains("at most"), "got: {err}");
    }

    #[test]
    fn test_missing_file() {
        let err = EngineConfig::from_file("/nonexistent/booking.toml").unwrap_err();
        assert_eq!(err.code(), "CONFIG_ERROR");
    }
}

//! Named configuration values read at call time.
//!
//! Components that depend on settings take an `Arc<dyn SettingsProvider>` in
//! their constructor and look values up whenever they need them, so a changed
//! value is picked up by the next call without rebuilding the component.

use std::collections::HashMap;
use std::sync::RwLock;

use crate::error::AppError;

/// Well-known setting names shared by the services.
pub mod keys {
    /// HMAC secret used to sign and verify authentication tokens.
    pub const JWT_SECRET: &str = "JWT_SECRET";
    /// Token lifetime in seconds.
    pub const JWT_EXPIRATION: &str = "JWT_EXPIRATION";
    /// Marks cookies transport-secure when true.
    pub const IS_PRODUCTION: &str = "IS_PRODUCTION";
    pub const MONGODB_URI: &str = "MONGODB_URI";
    pub const MONGODB_DATABASE: &str = "MONGODB_DATABASE";
    /// gRPC endpoint of the auth service, used by consuming services.
    pub const AUTH_SERVICE_ENDPOINT: &str = "AUTH_SERVICE_ENDPOINT";
}

pub trait SettingsProvider: Send + Sync {
    /// Raw value for `key`, if set.
    fn get(&self, key: &str) -> Option<String>;

    /// Value for `key`; missing or blank values are a configuration error.
    fn require(&self, key: &str) -> Result<String, AppError> {
        match self.get(key) {
            Some(value) if !value.trim().is_empty() => Ok(value),
            _ => Err(AppError::ConfigError(anyhow::anyhow!(
                "{} is required but not set",
                key
            ))),
        }
    }

    /// Positive integer value for `key`.
    fn require_positive(&self, key: &str) -> Result<u64, AppError> {
        let raw = self.require(key)?;
        let value: u64 = raw.trim().parse().map_err(|e: std::num::ParseIntError| {
            AppError::ConfigError(anyhow::anyhow!("{} must be an integer: {}", key, e))
        })?;

        if value == 0 {
            return Err(AppError::ConfigError(anyhow::anyhow!(
                "{} must be positive",
                key
            )));
        }

        Ok(value)
    }

    /// Boolean value for `key`; unset means false.
    fn flag(&self, key: &str) -> Result<bool, AppError> {
        match self.get(key) {
            None => Ok(false),
            Some(raw) => match raw.trim().to_lowercase().as_str() {
                "true" | "1" | "yes" => Ok(true),
                "false" | "0" | "no" | "" => Ok(false),
                other => Err(AppError::ConfigError(anyhow::anyhow!(
                    "{} must be a boolean, got '{}'",
                    key,
                    other
                ))),
            },
        }
    }
}

/// Settings backed by the process environment (plus `.env`, if present).
#[derive(Debug, Clone, Default)]
pub struct EnvSettings;

impl EnvSettings {
    pub fn load() -> Self {
        dotenvy::dotenv().ok();
        Self
    }
}

impl SettingsProvider for EnvSettings {
    fn get(&self, key: &str) -> Option<String> {
        std::env::var(key).ok()
    }
}

/// In-memory settings that can be changed while components hold them.
#[derive(Debug, Default)]
pub struct MapSettings {
    values: RwLock<HashMap<String, String>>,
}

impl MapSettings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(self, key: &str, value: impl Into<String>) -> Self {
        self.set(key, value);
        self
    }

    pub fn set(&self, key: &str, value: impl Into<String>) {
        let mut values = self
            .values
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        values.insert(key.to_string(), value.into());
    }

    pub fn remove(&self, key: &str) {
        let mut values = self
            .values
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        values.remove(key);
    }
}

impl SettingsProvider for MapSettings {
    fn get(&self, key: &str) -> Option<String> {
        self.values
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .get(key)
            .cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_require_rejects_blank_values() {
        let settings = MapSettings::new().with(keys::JWT_SECRET, "  ");
        assert!(settings.require(keys::JWT_SECRET).is_err());
        assert!(settings.require(keys::MONGODB_URI).is_err());
    }

    #[test]
    fn test_require_positive() {
        let settings = MapSettings::new()
            .with(keys::JWT_EXPIRATION, "3600")
            .with("ZERO", "0")
            .with("WORDS", "an hour");

        assert_eq!(settings.require_positive(keys::JWT_EXPIRATION).unwrap(), 3600);
        assert!(settings.require_positive("ZERO").is_err());
        assert!(settings.require_positive("WORDS").is_err());
    }

    #[test]
    fn test_flag_defaults_to_false() {
        let settings = MapSettings::new().with("ON", "TRUE").with("BAD", "maybe");

        assert!(!settings.flag(keys::IS_PRODUCTION).unwrap());
        assert!(settings.flag("ON").unwrap());
        assert!(settings.flag("BAD").is_err());
    }

    #[test]
    fn test_changes_are_visible_on_next_read() {
        let settings = MapSettings::new().with(keys::JWT_EXPIRATION, "60");
        settings.set(keys::JWT_EXPIRATION, "120");
        assert_eq!(settings.require_positive(keys::JWT_EXPIRATION).unwrap(), 120);

        settings.remove(keys::JWT_EXPIRATION);
        assert!(settings.get(keys::JWT_EXPIRATION).is_none());
    }
}

use serde::Deserialize;
use service_core::config::{self as core_config, keys, SettingsProvider};
use service_core::error::AppError;

#[derive(Debug, Clone, Deserialize)]
pub struct AuthConfig {
    /// `port` is the gRPC listen port.
    #[serde(flatten)]
    pub common: core_config::Config,
    pub environment: Environment,
    pub service_name: String,
    pub service_version: String,
    pub log_level: String,
    pub mongodb: MongoConfig,
    pub otlp_endpoint: Option<String>,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    Dev,
    Prod,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MongoConfig {
    pub uri: String,
    pub database: String,
}

impl AuthConfig {
    /// Bootstrap configuration. Token settings are checked here so a broken
    /// deployment fails at startup, but they are read again on every use.
    pub fn from_settings(settings: &dyn SettingsProvider) -> Result<Self, AppError> {
        let common = core_config::Config::load()?;

        let environment: Environment = get_setting(settings, "ENVIRONMENT", Some("dev"), false)?
            .parse()
            .map_err(|e: String| AppError::ConfigError(anyhow::anyhow!(e)))?;
        let is_prod = environment == Environment::Prod;

        let config = AuthConfig {
            common,
            environment,
            service_name: get_setting(settings, "SERVICE_NAME", Some("auth-service"), false)?,
            service_version: get_setting(
                settings,
                "SERVICE_VERSION",
                Some(env!("CARGO_PKG_VERSION")),
                false,
            )?,
            log_level: get_setting(settings, "LOG_LEVEL", Some("info"), false)?,
            mongodb: MongoConfig {
                uri: get_setting(settings, keys::MONGODB_URI, None, is_prod)?,
                database: get_setting(settings, keys::MONGODB_DATABASE, Some("auth"), is_prod)?,
            },
            otlp_endpoint: settings
                .get("OTLP_ENDPOINT")
                .filter(|endpoint| !endpoint.trim().is_empty()),
        };

        config.validate(settings)?;
        Ok(config)
    }

    fn validate(&self, settings: &dyn SettingsProvider) -> Result<(), AppError> {
        if self.common.port == 0 {
            return Err(AppError::ConfigError(anyhow::anyhow!(
                "PORT must be greater than 0"
            )));
        }

        settings.require(keys::JWT_SECRET)?;
        settings.require_positive(keys::JWT_EXPIRATION)?;
        let secure_cookies = settings.flag(keys::IS_PRODUCTION)?;

        if self.environment == Environment::Prod && !secure_cookies {
            tracing::error!(
                "IS_PRODUCTION is not set in production - authentication cookies will not be marked Secure"
            );
        }

        Ok(())
    }
}

fn get_setting(
    settings: &dyn SettingsProvider,
    key: &str,
    default: Option<&str>,
    is_prod: bool,
) -> Result<String, AppError> {
    match settings.get(key) {
        Some(val) => Ok(val),
        None => {
            if is_prod {
                Err(AppError::ConfigError(anyhow::anyhow!(
                    "{} is required in production but not set",
                    key
                )))
            } else if let Some(def) = default {
                Ok(def.to_string())
            } else {
                Err(AppError::ConfigError(anyhow::anyhow!(
                    "{} is required but not set",
                    key
                )))
            }
        }
    }
}

impl std::str::FromStr for Environment {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "dev" => Ok(Environment::Dev),
            "prod" => Ok(Environment::Prod),
            _ => Err(format!("Invalid environment: {}", s)),
        }
    }
}

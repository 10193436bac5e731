//! Configuration loading
//!
//! Every setting resolves in priority order:
//! 1. Command-line argument (highest priority)
//! 2. Environment variable
//! 3. TOML config file
//! 4. Compiled default (fallback)
//!
//! The binary parses its CLI with clap (`#[arg(env = ...)]`), so the
//! values it hands over in [`ConfigOverrides`] already merge tiers 1 and 2
//! for the settings it exposes. Everything else is read from the
//! environment here.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::{info, warn};

/// Secret key shipped as the compiled default; refused in production
pub const DEFAULT_SECRET_KEY: &str = "change-me-in-production";

/// Maximum accepted request body (10 MiB)
pub const DEFAULT_MAX_REQUEST_BYTES: usize = 10 * 1024 * 1024;

/// Deployment environment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Development,
    Staging,
    Production,
    Test,
}

impl Environment {
    pub fn as_str(&self) -> &'static str {
        match self {
            Environment::Development => "development",
            Environment::Staging => "staging",
            Environment::Production => "production",
            Environment::Test => "test",
        }
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Environment {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "development" | "dev" => Ok(Environment::Development),
            "staging" => Ok(Environment::Staging),
            "production" | "prod" => Ok(Environment::Production),
            "test" | "testing" => Ok(Environment::Test),
            other => Err(Error::Config(format!("Unknown environment '{}'", other))),
        }
    }
}

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

impl FromStr for LogFormat {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "text" | "plain" => Ok(LogFormat::Text),
            "json" => Ok(LogFormat::Json),
            other => Err(Error::Config(format!("Unknown log format '{}'", other))),
        }
    }
}

// ========================================
// TOML file
// ========================================

/// Configuration file contents
///
/// Every field is optional: absent values fall through to the compiled
/// defaults.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct TomlConfig {
    pub app_name: Option<String>,
    pub environment: Option<String>,
    pub debug: Option<bool>,
    pub database_url: Option<String>,
    pub redis_url: Option<String>,
    pub api: ApiSection,
    pub security: SecuritySection,
    pub logging: LoggingConfig,
    pub features: FeatureSection,
}

/// `[api]` table
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct ApiSection {
    pub host: Option<String>,
    pub port: Option<u16>,
    pub cors_origins: Option<Vec<String>>,
}

/// `[security]` table
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct SecuritySection {
    pub secret_key: Option<String>,
    pub access_token_expire_minutes: Option<i64>,
    pub require_auth: Option<bool>,
}

/// `[logging]` table
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: Option<String>,

    /// `text` or `json`
    pub format: Option<String>,

    /// Log file path (logs to stderr if not specified)
    pub file: Option<PathBuf>,
}

/// `[features]` table
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct FeatureSection {
    pub enable_shadow_work: Option<bool>,
    pub enable_recommendations: Option<bool>,
    pub enable_ml: Option<bool>,
    pub max_recommendations: Option<usize>,
}

impl TomlConfig {
    /// Parse a TOML document
    pub fn parse(text: &str) -> Result<Self> {
        toml::from_str(text).map_err(|e| Error::Config(format!("Failed to parse TOML: {}", e)))
    }

    /// Read and parse a TOML file
    pub fn from_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| {
            Error::Config(format!("Failed to read config file {}: {}", path.display(), e))
        })?;
        let config = Self::parse(&text)?;
        info!("Loaded TOML configuration from {}", path.display());
        Ok(config)
    }
}

/// Locate the configuration file
///
/// An explicit path must exist. Otherwise the per-user file
/// (`~/.config/team-alchemy/config.toml` on Linux) and then
/// `/etc/team-alchemy/config.toml` are tried; `None` when neither exists.
pub fn config_file_path(explicit: Option<&Path>) -> Result<Option<PathBuf>> {
    if let Some(path) = explicit {
        if !path.exists() {
            return Err(Error::Config(format!(
                "Config file not found: {}",
                path.display()
            )));
        }
        return Ok(Some(path.to_path_buf()));
    }

    let user_config = dirs::config_dir().map(|d| d.join("team-alchemy").join("config.toml"));
    if let Some(user_config) = user_config {
        if user_config.exists() {
            return Ok(Some(user_config));
        }
    }

    if cfg!(unix) {
        let system_config = PathBuf::from("/etc/team-alchemy/config.toml");
        if system_config.exists() {
            return Ok(Some(system_config));
        }
    }

    Ok(None)
}

// ========================================
// Resolved settings
// ========================================

/// Values supplied on the command line (or through clap's `env` fallback)
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub config_path: Option<PathBuf>,
    pub environment: Option<String>,
    pub api_host: Option<String>,
    pub api_port: Option<u16>,
    pub database_url: Option<String>,
    pub log_level: Option<String>,
}

/// Fully resolved application settings
#[derive(Debug, Clone)]
pub struct Settings {
    pub app_name: String,
    pub app_version: String,
    pub environment: Environment,
    pub debug: bool,

    pub api_host: String,
    pub api_port: u16,
    pub api_prefix: String,
    pub cors_origins: Vec<String>,

    pub database_url: String,
    /// Broker URL; jobs run on the in-process worker, the value is reported only
    pub redis_url: String,

    pub secret_key: String,
    pub access_token_expire_minutes: i64,
    pub require_auth: bool,

    pub log_level: String,
    pub log_format: LogFormat,
    pub log_file: Option<PathBuf>,

    pub max_recommendations: usize,
    pub enable_shadow_work: bool,
    pub enable_recommendations: bool,
    pub enable_ml: bool,

    pub max_request_bytes: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            app_name: "Team Alchemy".to_string(),
            app_version: env!("CARGO_PKG_VERSION").to_string(),
            environment: Environment::Development,
            debug: false,
            api_host: "0.0.0.0".to_string(),
            api_port: 8000,
            api_prefix: "/api/v1".to_string(),
            cors_origins: vec!["*".to_string()],
            database_url: "sqlite://team_alchemy.db".to_string(),
            redis_url: "redis://localhost:6379/0".to_string(),
            secret_key: DEFAULT_SECRET_KEY.to_string(),
            access_token_expire_minutes: 30,
            require_auth: false,
            log_level: "info".to_string(),
            log_format: LogFormat::Text,
            log_file: None,
            max_recommendations: 10,
            enable_shadow_work: true,
            enable_recommendations: true,
            enable_ml: true,
            max_request_bytes: DEFAULT_MAX_REQUEST_BYTES,
        }
    }
}

impl Settings {
    /// Load settings from the process environment and the config file
    pub fn load(overrides: ConfigOverrides) -> Result<Self> {
        let toml = match config_file_path(overrides.config_path.as_deref())? {
            Some(path) => Some(TomlConfig::from_file(&path)?),
            None => None,
        };
        let settings = Self::resolve(overrides, toml, |key| std::env::var(key).ok())?;
        settings.validate()?;
        Ok(settings)
    }

    /// Resolve settings from explicit sources
    ///
    /// `env` looks up an environment variable by name; tests pass a map.
    pub fn resolve<F>(overrides: ConfigOverrides, toml: Option<TomlConfig>, env: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let toml = toml.unwrap_or_default();
        let defaults = Settings::default();

        let environment = match overrides
            .environment
            .or_else(|| env("ENVIRONMENT"))
            .or(toml.environment)
        {
            Some(text) => text.parse()?,
            None => defaults.environment,
        };

        let api_port = match overrides.api_port {
            Some(port) => port,
            None => match env("API_PORT").or_else(|| env("PORT")) {
                Some(text) => parse_value::<u16>("API_PORT", &text)?,
                None => toml.api.port.unwrap_or(defaults.api_port),
            },
        };

        let cors_origins = match env("CORS_ORIGINS") {
            Some(text) => split_origins(&text),
            None => toml.api.cors_origins.unwrap_or(defaults.cors_origins),
        };

        let log_format = match env("LOG_FORMAT").or(toml.logging.format) {
            Some(text) => text.parse()?,
            None => defaults.log_format,
        };

        Ok(Self {
            app_name: env("APP_NAME").or(toml.app_name).unwrap_or(defaults.app_name),
            app_version: defaults.app_version,
            environment,
            debug: pick_bool(&env, "DEBUG", toml.debug, defaults.debug)?,
            api_host: overrides
                .api_host
                .or_else(|| env("API_HOST"))
                .or(toml.api.host)
                .unwrap_or(defaults.api_host),
            api_port,
            api_prefix: defaults.api_prefix,
            cors_origins,
            database_url: overrides
                .database_url
                .or_else(|| env("DATABASE_URL"))
                .or(toml.database_url)
                .unwrap_or(defaults.database_url),
            redis_url: env("REDIS_URL").or(toml.redis_url).unwrap_or(defaults.redis_url),
            secret_key: env("SECRET_KEY")
                .or(toml.security.secret_key)
                .unwrap_or(defaults.secret_key),
            access_token_expire_minutes: match env("ACCESS_TOKEN_EXPIRE_MINUTES") {
                Some(text) => parse_value("ACCESS_TOKEN_EXPIRE_MINUTES", &text)?,
                None => toml
                    .security
                    .access_token_expire_minutes
                    .unwrap_or(defaults.access_token_expire_minutes),
            },
            require_auth: pick_bool(
                &env,
                "REQUIRE_AUTH",
                toml.security.require_auth,
                defaults.require_auth,
            )?,
            log_level: overrides
                .log_level
                .or_else(|| env("LOG_LEVEL"))
                .or(toml.logging.level)
                .unwrap_or(defaults.log_level)
                .to_ascii_lowercase(),
            log_format,
            log_file: env("LOG_FILE").map(PathBuf::from).or(toml.logging.file),
            max_recommendations: match env("MAX_RECOMMENDATIONS") {
                Some(text) => parse_value("MAX_RECOMMENDATIONS", &text)?,
                None => toml
                    .features
                    .max_recommendations
                    .unwrap_or(defaults.max_recommendations),
            },
            enable_shadow_work: pick_bool(
                &env,
                "ENABLE_SHADOW_WORK",
                toml.features.enable_shadow_work,
                defaults.enable_shadow_work,
            )?,
            enable_recommendations: pick_bool(
                &env,
                "ENABLE_RECOMMENDATIONS",
                toml.features.enable_recommendations,
                defaults.enable_recommendations,
            )?,
            enable_ml: pick_bool(&env, "ENABLE_ML", toml.features.enable_ml, defaults.enable_ml)?,
            max_request_bytes: defaults.max_request_bytes,
        })
    }

    /// Reject combinations that must not reach a running server
    pub fn validate(&self) -> Result<()> {
        if self.is_production() && self.secret_key == DEFAULT_SECRET_KEY {
            return Err(Error::Config(
                "SECRET_KEY must be set when ENVIRONMENT=production".to_string(),
            ));
        }
        if self.secret_key.is_empty() {
            return Err(Error::Config("SECRET_KEY must not be empty".to_string()));
        }
        if self.access_token_expire_minutes <= 0 {
            return Err(Error::Config(
                "access_token_expire_minutes must be positive".to_string(),
            ));
        }
        if !matches!(
            self.log_level.as_str(),
            "trace" | "debug" | "info" | "warn" | "warning" | "error" | "critical"
        ) {
            return Err(Error::Config(format!("Unknown log level '{}'", self.log_level)));
        }
        if self.secret_key == DEFAULT_SECRET_KEY {
            warn!("Using the default SECRET_KEY; set SECRET_KEY before exposing the API");
        }
        Ok(())
    }

    pub fn is_production(&self) -> bool {
        self.environment == Environment::Production
    }

    /// Level name understood by tracing's `EnvFilter`
    pub fn tracing_level(&self) -> &str {
        match self.log_level.as_str() {
            "warning" => "warn",
            "critical" => "error",
            other => other,
        }
    }

    /// `host:port` string for the listener
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.api_host, self.api_port)
    }
}

fn split_origins(text: &str) -> Vec<String> {
    text.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

fn parse_value<T>(key: &str, text: &str) -> Result<T>
where
    T: FromStr,
    T::Err: fmt::Display,
{
    text.trim()
        .parse::<T>()
        .map_err(|e| Error::Config(format!("Invalid value for {}: '{}' ({})", key, text, e)))
}

/// Parse a boolean environment value (`1/true/yes/on`, `0/false/no/off`)
pub fn parse_bool(key: &str, text: &str) -> Result<bool> {
    match text.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(Error::Config(format!(
            "Invalid boolean for {}: '{}'",
            key, text
        ))),
    }
}

fn pick_bool<F>(env: &F, key: &str, toml: Option<bool>, default: bool) -> Result<bool>
where
    F: Fn(&str) -> Option<String>,
{
    match env(key) {
        Some(text) => parse_bool(key, &text),
        None => Ok(toml.unwrap_or(default)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let settings = Settings::resolve(ConfigOverrides::default(), None, env_from(&[])).unwrap();
        assert_eq!(settings.app_name, "Team Alchemy");
        assert_eq!(settings.api_port, 8000);
        assert_eq!(settings.api_prefix, "/api/v1");
        assert_eq!(settings.environment, Environment::Development);
        assert_eq!(settings.cors_origins, vec!["*"]);
        assert_eq!(settings.max_recommendations, 10);
        assert_eq!(settings.max_request_bytes, 10 * 1024 * 1024);
        assert!(!settings.require_auth);
    }

    #[test]
    fn test_env_overrides_toml() {
        let toml = TomlConfig::parse(
            r#"
            database_url = "sqlite://from-toml.db"
            [api]
            port = 9000
            "#,
        )
        .unwrap();
        let settings = Settings::resolve(
            ConfigOverrides::default(),
            Some(toml),
            env_from(&[("DATABASE_URL", "sqlite://from-env.db")]),
        )
        .unwrap();
        assert_eq!(settings.database_url, "sqlite://from-env.db");
        assert_eq!(settings.api_port, 9000);
    }

    #[test]
    fn test_cli_overrides_env() {
        let overrides = ConfigOverrides {
            api_port: Some(7000),
            ..Default::default()
        };
        let settings =
            Settings::resolve(overrides, None, env_from(&[("API_PORT", "9100")])).unwrap();
        assert_eq!(settings.api_port, 7000);
    }

    #[test]
    fn test_cors_origins_split_on_commas() {
        let settings = Settings::resolve(
            ConfigOverrides::default(),
            None,
            env_from(&[("CORS_ORIGINS", "http://a.test, http://b.test,")]),
        )
        .unwrap();
        assert_eq!(settings.cors_origins, vec!["http://a.test", "http://b.test"]);
    }

    #[test]
    fn test_invalid_port_is_config_error() {
        let result = Settings::resolve(
            ConfigOverrides::default(),
            None,
            env_from(&[("API_PORT", "eighty")]),
        );
        assert!(matches!(result, Err(Error::Config(_))));
    }

    #[test]
    fn test_production_requires_secret() {
        let settings = Settings::resolve(
            ConfigOverrides::default(),
            None,
            env_from(&[("ENVIRONMENT", "production")]),
        )
        .unwrap();
        assert!(settings.validate().is_err());

        let settings = Settings::resolve(
            ConfigOverrides::default(),
            None,
            env_from(&[("ENVIRONMENT", "production"), ("SECRET_KEY", "s3cret")]),
        )
        .unwrap();
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_log_level_normalized() {
        let settings = Settings::resolve(
            ConfigOverrides::default(),
            None,
            env_from(&[("LOG_LEVEL", "WARNING"), ("LOG_FORMAT", "json")]),
        )
        .unwrap();
        assert_eq!(settings.log_level, "warning");
        assert_eq!(settings.tracing_level(), "warn");
        assert_eq!(settings.log_format, LogFormat::Json);
    }

    #[test]
    fn test_parse_bool_variants() {
        assert!(parse_bool("X", "Yes").unwrap());
        assert!(!parse_bool("X", "off").unwrap());
        assert!(parse_bool("X", "maybe").is_err());
    }
}

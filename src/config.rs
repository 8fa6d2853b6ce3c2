use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::env;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{error, info};
use validator::{Validate, ValidationError, ValidationErrors};

/// Default values for configuration
const DEFAULT_LOG_LEVEL: &str = "info";
const DEFAULT_ENV: &str = "development";
const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 3000;
const DEFAULT_DATA_DIR: &str = "data";
const DEFAULT_PUBLIC_DIR: &str = "public";
const CONFIG_DIR: &str = "config";
/// Plain port variable honoured on top of the `APP__*` layer.
const PORT_ENV: &str = "PORT";

/// Application configuration structure with validation
#[derive(Clone, Debug, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct AppConfig {
    /// Server host address
    pub host: String,

    /// Server port
    #[serde(default = "default_port")]
    #[validate(range(min = 1))]
    pub port: u16,

    /// Application environment
    pub environment: String,

    /// Logging level
    #[serde(default = "default_log_level")]
    #[validate(custom = "validate_log_level")]
    pub log_level: String,

    /// Log in JSON format (structured logging)
    #[serde(default)]
    pub log_json: bool,

    /// Directory holding `orders.json` and `inventory.json`
    #[serde(default = "default_data_dir")]
    #[validate(length(min = 1))]
    pub data_dir: String,

    /// Directory holding the kitchen, cash desk and storeroom pages
    #[serde(default = "default_public_dir")]
    #[validate(length(min = 1))]
    pub public_dir: String,

    /// CORS: comma-separated list of allowed origins
    #[serde(default)]
    pub cors_allowed_origins: Option<String>,

    /// Allow permissive CORS outside development
    #[serde(default)]
    pub cors_allow_any_origin: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            environment: DEFAULT_ENV.to_string(),
            log_level: default_log_level(),
            log_json: false,
            data_dir: default_data_dir(),
            public_dir: default_public_dir(),
            cors_allowed_origins: None,
            cors_allow_any_origin: false,
        }
    }
}

impl AppConfig {
    /// Development configuration rooted at the given data and page directories.
    pub fn new(data_dir: impl AsRef<Path>, public_dir: impl AsRef<Path>) -> Self {
        Self {
            data_dir: data_dir.as_ref().display().to_string(),
            public_dir: public_dir.as_ref().display().to_string(),
            ..Self::default()
        }
    }

    pub fn data_dir(&self) -> PathBuf {
        PathBuf::from(&self.data_dir)
    }

    pub fn public_dir(&self) -> PathBuf {
        PathBuf::from(&self.public_dir)
    }

    pub fn log_level(&self) -> &str {
        &self.log_level
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn is_development(&self) -> bool {
        self.environment.eq_ignore_ascii_case("development")
    }

    /// Explicit CORS origins, if any are configured
    pub fn cors_origins(&self) -> Vec<String> {
        self.cors_allowed_origins
            .as_deref()
            .map(|raw| {
                raw.split(',')
                    .map(str::trim)
                    .filter(|origin| !origin.is_empty())
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Whether we should fall back to permissive CORS
    pub fn should_allow_permissive_cors(&self) -> bool {
        self.is_development() || self.cors_allow_any_origin
    }

    fn validate_additional_constraints(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();

        if !self.should_allow_permissive_cors() && self.cors_origins().is_empty() {
            let mut err = ValidationError::new("cors_allowed_origins_required");
            err.message = Some(
                "Set APP__CORS_ALLOWED_ORIGINS for non-development environments or explicitly opt-in via APP__CORS_ALLOW_ANY_ORIGIN=true".into(),
            );
            errors.add("cors_allowed_origins", err);
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

#[derive(Debug, Error)]
pub enum AppConfigError {
    #[error("Configuration loading failed: {0}")]
    Load(#[from] ConfigError),

    #[error("Configuration validation failed: {0}")]
    Validation(#[from] validator::ValidationErrors),
}

/// Default value functions
fn default_log_level() -> String {
    DEFAULT_LOG_LEVEL.to_string()
}

fn default_port() -> u16 {
    DEFAULT_PORT
}

fn default_data_dir() -> String {
    DEFAULT_DATA_DIR.to_string()
}

fn default_public_dir() -> String {
    DEFAULT_PUBLIC_DIR.to_string()
}

fn validate_log_level(level: &str) -> Result<(), ValidationError> {
    let valid_levels = ["trace", "debug", "info", "warn", "error"];
    if valid_levels.contains(&level.to_lowercase().as_str()) {
        Ok(())
    } else {
        let mut err = ValidationError::new("log_level");
        err.message = Some("Must be one of: trace, debug, info, warn, error".into());
        Err(err)
    }
}

/// Initializes tracing using the provided log level as the default filter
pub fn init_tracing(level: &str, json: bool) {
    use tracing_subscriber::{fmt, EnvFilter};

    let default_directive = format!("ristoword={},tower_http=debug", level);
    let filter_directive = env::var("RUST_LOG")
        .ok()
        .filter(|s| !s.trim().is_empty())
        .unwrap_or(default_directive);

    let filter = EnvFilter::new(filter_directive);
    if json {
        let _ = fmt().with_env_filter(filter).json().try_init();
    } else {
        let _ = fmt().with_env_filter(filter).try_init();
    }
}

/// Loads application configuration
///
/// Layers configuration sources in this order:
/// 1. Built-in defaults
/// 2. Default config (config/default.toml)
/// 3. Environment-specific config (config/{env}.toml)
/// 4. Environment variables (APP__*)
/// 5. `PORT`, which wins for the listening port
pub fn load_config() -> Result<AppConfig, AppConfigError> {
    // Support both RUN_ENV and APP_ENV for selecting config profile
    let run_env = env::var("RUN_ENV")
        .or_else(|_| env::var("APP_ENV"))
        .unwrap_or_else(|_| DEFAULT_ENV.to_string());
    info!("Loading configuration for environment: {}", run_env);

    if !Path::new(CONFIG_DIR).exists() {
        info!(
            "Config directory '{}' not found; relying on built-in defaults and environment variables",
            CONFIG_DIR
        );
    }

    let port_override = env::var(PORT_ENV).ok().filter(|p| !p.trim().is_empty());
    load_config_from(Path::new(CONFIG_DIR), &run_env, port_override)
}

/// Builds the configuration from `config_dir` for the `run_env` profile.
pub fn load_config_from(
    config_dir: &Path,
    run_env: &str,
    port_override: Option<String>,
) -> Result<AppConfig, AppConfigError> {
    let mut builder = Config::builder()
        .set_default("host", DEFAULT_HOST)?
        .set_default("port", i64::from(DEFAULT_PORT))?
        .set_default("environment", run_env)?
        .set_default("log_level", DEFAULT_LOG_LEVEL)?
        .set_default("log_json", false)?
        .set_default("data_dir", DEFAULT_DATA_DIR)?
        .set_default("public_dir", DEFAULT_PUBLIC_DIR)?
        .add_source(File::from(config_dir.join("default")).required(false))
        .add_source(File::from(config_dir.join(run_env)).required(false))
        .add_source(Environment::with_prefix("APP").separator("__"));

    if let Some(port) = port_override {
        info!("Using port from {}: {}", PORT_ENV, port);
        builder = builder.set_override("port", port)?;
    }

    let app_config: AppConfig = builder.build()?.try_deserialize()?;

    app_config.validate().map_err(|e| {
        error!("Configuration validation failed: {:?}", e);
        AppConfigError::Validation(e)
    })?;

    app_config.validate_additional_constraints().map_err(|e| {
        error!("Configuration security validation failed: {:?}", e);
        AppConfigError::Validation(e)
    })?;

    info!("Configuration loaded successfully");
    Ok(app_config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use std::fs;
    use tempfile::TempDir;

    fn config_dir_with(files: &[(&str, &str)]) -> TempDir {
        let dir = TempDir::new().unwrap();
        for (name, content) in files {
            fs::write(dir.path().join(name), content).unwrap();
        }
        dir
    }

    #[test]
    fn defaults_apply_without_files() {
        let dir = config_dir_with(&[]);
        let cfg = load_config_from(dir.path(), "development", None).unwrap();

        assert_eq!(cfg.port, 3000);
        assert_eq!(cfg.data_dir(), PathBuf::from("data"));
        assert_eq!(cfg.public_dir(), PathBuf::from("public"));
        assert_eq!(cfg.log_level(), "info");
        assert!(cfg.is_development());
    }

    #[test]
    fn profile_file_overrides_default_file() {
        let dir = config_dir_with(&[
            ("default.toml", "port = 4000\ndata_dir = \"/var/lib/ristoword\"\n"),
            ("staging.toml", "port = 4100\ncors_allow_any_origin = true\n"),
        ]);
        let cfg = load_config_from(dir.path(), "staging", None).unwrap();

        assert_eq!(cfg.port, 4100);
        assert_eq!(cfg.data_dir, "/var/lib/ristoword");
        assert_eq!(cfg.environment, "staging");
    }

    #[test]
    fn port_variable_wins() {
        let dir = config_dir_with(&[("default.toml", "port = 4000\n")]);
        let cfg = load_config_from(dir.path(), "development", Some("8181".into())).unwrap();
        assert_eq!(cfg.port, 8181);
    }

    #[test]
    fn invalid_log_level_fails_validation() {
        let dir = config_dir_with(&[("default.toml", "log_level = \"chatty\"\n")]);
        let result = load_config_from(dir.path(), "development", None);

        assert_matches!(result, Err(AppConfigError::Validation(errors)) => {
            assert!(errors.field_errors().contains_key("log_level"));
        });
    }

    #[test]
    fn non_dev_requires_cors_origins() {
        let dir = config_dir_with(&[]);
        let result = load_config_from(dir.path(), "production", None);
        assert_matches!(result, Err(AppConfigError::Validation(_)));
    }

    #[test]
    fn non_dev_with_origins_passes() {
        let mut cfg = AppConfig::default();
        cfg.environment = "production".into();
        cfg.cors_allowed_origins = Some("https://sala.example.com, ,https://cassa.example.com".into());
        assert!(cfg.validate_additional_constraints().is_ok());
        assert_eq!(cfg.cors_origins().len(), 2);
    }
}

use std::env;
use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

/// Distinguishes runtime behavior for different stages of the application.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnvironment {
    Development,
    Test,
    Production,
}

impl AppEnvironment {
    fn from_str(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "prod" | "production" => Self::Production,
            "test" | "ci" => Self::Test,
            _ => Self::Development,
        }
    }
}

/// Top-level configuration for the application.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub backend: BackendConfig,
    pub telemetry: TelemetryConfig,
    pub preferences: PreferencesConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment = AppEnvironment::from_str(
            &env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
        );

        let base_url = env::var("BACKEND_URL")
            .map_err(|_| ConfigError::MissingVar { name: "BACKEND_URL" })?;
        let api_key = env::var("BACKEND_API_KEY")
            .map_err(|_| ConfigError::MissingVar { name: "BACKEND_API_KEY" })?;
        let timeout_secs = env::var("BACKEND_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".to_string())
            .parse::<u64>()
            .map_err(|_| ConfigError::InvalidTimeout)?;

        let log_level = env::var("APP_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());
        let prefs_path =
            env::var("PREFS_PATH").unwrap_or_else(|_| "realty_prefs.json".to_string());

        Ok(Self {
            environment,
            backend: BackendConfig {
                base_url,
                api_key,
                timeout: Duration::from_secs(timeout_secs),
            },
            telemetry: TelemetryConfig { log_level },
            preferences: PreferencesConfig {
                path: PathBuf::from(prefs_path),
            },
        })
    }
}

/// Connection values for the hosted record store. The key is a static
/// anonymous credential, not a per-user secret.
#[derive(Debug, Clone)]
pub struct BackendConfig {
    pub base_url: String,
    pub api_key: String,
    pub timeout: Duration,
}

/// Tracing controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

/// Location of the on-device preference document.
#[derive(Debug, Clone)]
pub struct PreferencesConfig {
    pub path: PathBuf,
}

#[derive(Debug)]
pub enum ConfigError {
    MissingVar { name: &'static str },
    InvalidTimeout,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::MissingVar { name } => write!(f, "{name} must be set"),
            ConfigError::InvalidTimeout => {
                write!(f, "BACKEND_TIMEOUT_SECS must be a whole number of seconds")
            }
        }
    }
}

impl std::error::Error for ConfigError {}

use std::env;
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_REFINE_MODEL: &str = "gemini-2.5-pro";
pub const DEFAULT_EDIT_MODEL: &str = "gemini-2.5-flash-image";
pub const DEFAULT_SHOPPING_MODEL: &str = "gemini-2.5-flash";
pub const DEFAULT_TIMEOUT_SECS: u64 = 120;
pub const DEFAULT_REPLY_LANGUAGE: &str = "English";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{name} must be a positive number of seconds, got '{value}'")]
    InvalidTimeout { name: &'static str, value: String },
}

/// Runtime configuration, read from the environment.
#[derive(Clone, Debug)]
pub struct AppConfig {
    pub api_key: Option<String>,
    pub base_url: String,
    pub refine_model: String,
    pub edit_model: String,
    pub shopping_model: String,
    pub request_timeout: Duration,
    pub reply_language: String,
    pub data_dir: Option<PathBuf>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: DEFAULT_BASE_URL.to_string(),
            refine_model: DEFAULT_REFINE_MODEL.to_string(),
            edit_model: DEFAULT_EDIT_MODEL.to_string(),
            shopping_model: DEFAULT_SHOPPING_MODEL.to_string(),
            request_timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            reply_language: DEFAULT_REPLY_LANGUAGE.to_string(),
            data_dir: None,
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Builds the configuration from any variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let var = |name: &str| {
            lookup(name)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };
        let defaults = Self::default();

        let request_timeout = match var("ROOMSTYLER_TIMEOUT_SECS") {
            Some(raw) => match raw.parse::<u64>() {
                Ok(secs) if secs > 0 => Duration::from_secs(secs),
                _ => {
                    return Err(ConfigError::InvalidTimeout {
                        name: "ROOMSTYLER_TIMEOUT_SECS",
                        value: raw,
                    });
                }
            },
            None => defaults.request_timeout,
        };

        Ok(Self {
            api_key: var("GEMINI_API_KEY").or_else(|| var("API_KEY")),
            base_url: var("GEMINI_BASE_URL").unwrap_or(defaults.base_url),
            refine_model: var("ROOMSTYLER_REFINE_MODEL").unwrap_or(defaults.refine_model),
            edit_model: var("ROOMSTYLER_EDIT_MODEL").unwrap_or(defaults.edit_model),
            shopping_model: var("ROOMSTYLER_SHOPPING_MODEL").unwrap_or(defaults.shopping_model),
            request_timeout,
            reply_language: var("ROOMSTYLER_REPLY_LANGUAGE").unwrap_or(defaults.reply_language),
            data_dir: var("ROOMSTYLER_DATA_DIR").map(PathBuf::from),
        })
    }
}

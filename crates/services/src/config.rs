use std::env;
use std::time::Duration;

use crate::error::ConfigError;

pub const API_KEY_VAR: &str = "QUIZ_AI_API_KEY";
pub const BASE_URL_VAR: &str = "QUIZ_AI_BASE_URL";
pub const MODEL_VAR: &str = "QUIZ_AI_MODEL";
pub const TIMEOUT_VAR: &str = "QUIZ_AI_TIMEOUT_SECS";

const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
const DEFAULT_MODEL: &str = "gpt-4o-mini";

/// Settings for the hosted question generator.
#[derive(Clone, Debug)]
pub struct GenerationConfig {
    pub base_url: String,
    pub api_key: String,
    pub model: String,
    pub timeout: Option<Duration>,
}

impl GenerationConfig {
    /// Read settings from the process environment.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::MissingApiKey` when no usable key is set and
    /// `ConfigError::InvalidTimeout` for a malformed timeout.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Same as `from_env`, reading values through `lookup`.
    ///
    /// # Errors
    ///
    /// See `from_env`.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let api_key = lookup(API_KEY_VAR)
            .filter(|key| !key.trim().is_empty())
            .ok_or(ConfigError::MissingApiKey)?;
        let base_url = lookup(BASE_URL_VAR).unwrap_or_else(|| DEFAULT_BASE_URL.into());
        let model = lookup(MODEL_VAR).unwrap_or_else(|| DEFAULT_MODEL.into());
        let timeout = lookup(TIMEOUT_VAR)
            .map(|raw| match raw.trim().parse::<u64>() {
                Ok(secs) if secs > 0 => Ok(Duration::from_secs(secs)),
                _ => Err(ConfigError::InvalidTimeout(raw)),
            })
            .transpose()?;

        Ok(Self {
            base_url,
            api_key,
            model,
            timeout,
        })
    }
}

// ABOUTME: Runtime settings loaded from the process environment
// ABOUTME: Default model/prompt overrides, model allow-list and log filter

use std::env;
use thiserror::Error;
use tracing::debug;

use crate::constants::{
    CHATCFG_ALLOWED_MODELS, CHATCFG_DEFAULT_MODEL, CHATCFG_DEFAULT_PROMPT, CHATCFG_LOG,
    DEFAULT_LOG_FILTER, RUST_LOG,
};

#[derive(Error, Debug, PartialEq)]
pub enum ConfigError {
    #[error("{0} is set but blank; unset it to use the built-in default model")]
    EmptyDefaultModel(&'static str),
    #[error("Invalid value for {0}: {1}")]
    InvalidValue(&'static str, String),
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Settings {
    /// `None` lets the store fall back to its built-in default model
    pub default_model: Option<String>,
    /// `None` lets the caller fall back to the built-in default prompt
    pub default_prompt: Option<String>,
    /// Empty means any non-blank model name is accepted
    pub allowed_models: Vec<String>,
    pub log_filter: String,
}

impl Settings {
    pub fn from_env() -> Result<Self, ConfigError> {
        let default_model = match read_var(CHATCFG_DEFAULT_MODEL)? {
            Some(value) if value.trim().is_empty() => {
                return Err(ConfigError::EmptyDefaultModel(CHATCFG_DEFAULT_MODEL))
            }
            Some(value) => Some(value.trim().to_string()),
            None => None,
        };

        // The prompt is used verbatim, surrounding whitespace included
        let default_prompt = read_var(CHATCFG_DEFAULT_PROMPT)?;

        let allowed_models = read_var(CHATCFG_ALLOWED_MODELS)?
            .map(|raw| parse_model_list(&raw))
            .unwrap_or_default();

        let log_filter = env::var(CHATCFG_LOG)
            .or_else(|_| env::var(RUST_LOG))
            .unwrap_or_else(|_| DEFAULT_LOG_FILTER.to_string());

        debug!(
            default_model = ?default_model,
            allowed_models = allowed_models.len(),
            "Loaded settings from environment"
        );

        Ok(Settings {
            default_model,
            default_prompt,
            allowed_models,
            log_filter,
        })
    }
}

/// Read an optional variable. Unset is `None`; a value that is not valid
/// unicode is an error rather than being mistaken for unset.
fn read_var(key: &'static str) -> Result<Option<String>, ConfigError> {
    match env::var(key) {
        Ok(value) => Ok(Some(value)),
        Err(env::VarError::NotPresent) => Ok(None),
        Err(env::VarError::NotUnicode(_)) => Err(ConfigError::InvalidValue(
            key,
            "not valid unicode".to_string(),
        )),
    }
}

/// Split a comma-separated model list, trimming entries and dropping blanks
pub fn parse_model_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

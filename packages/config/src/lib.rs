// ABOUTME: Configuration layer for chatcfg
// ABOUTME: Environment variable names and the Settings loaded from them

pub mod constants;
pub mod settings;

pub use settings::{parse_model_list, ConfigError, Settings};

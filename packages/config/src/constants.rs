// ABOUTME: Environment variable name constants
// ABOUTME: Centralized definitions of all environment variable names read by chatcfg

// Store defaults
pub const CHATCFG_DEFAULT_MODEL: &str = "CHATCFG_DEFAULT_MODEL";
pub const CHATCFG_DEFAULT_PROMPT: &str = "CHATCFG_DEFAULT_PROMPT";

// Validation
pub const CHATCFG_ALLOWED_MODELS: &str = "CHATCFG_ALLOWED_MODELS";

// Logging
pub const CHATCFG_LOG: &str = "CHATCFG_LOG";
pub const RUST_LOG: &str = "RUST_LOG";

/// Log filter used when neither `CHATCFG_LOG` nor `RUST_LOG` is set
pub const DEFAULT_LOG_FILTER: &str = "info";

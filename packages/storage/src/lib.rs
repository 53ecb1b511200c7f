// ABOUTME: Per-user chat configuration storage for chatcfg
// ABOUTME: Concurrent store, record types, validation policy and default providers

pub mod defaults;
pub mod error;
pub mod store;
pub mod types;
pub mod validation;

pub use defaults::{
    DefaultPromptProvider, StaticPrompt, WithFallback, DEFAULT_MODEL, FALLBACK_PROMPT,
};
pub use error::{Result, StorageError};
pub use store::{ConfigStore, ConfigStoreBuilder};
pub use types::{ConfigRecord, ConfigUpdate, SaveOutcome};
pub use validation::{ModelPolicy, ValidationError};

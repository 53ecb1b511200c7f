// ABOUTME: Default value providers consulted when a caller omits a field
// ABOUTME: Static prompt text, closure providers and a fallback wrapper

use crate::{Result, StorageError};

/// Model used when neither the caller nor the store builder names one
pub const DEFAULT_MODEL: &str = "gpt-4o-mini";

/// Prompt substituted when the configured prompt source is unavailable
pub const FALLBACK_PROMPT: &str = "You are a helpful AI assistant.";

/// Supplies the prompt text for records created without one.
///
/// Called outside of any store lock, and only when `create` (or the create
/// path of `save`) omits the prompt. Failures should be reported as
/// [`StorageError::Unavailable`].
pub trait DefaultPromptProvider: Send + Sync {
    fn default_prompt(&self) -> Result<String>;
}

impl<F> DefaultPromptProvider for F
where
    F: Fn() -> Result<String> + Send + Sync,
{
    fn default_prompt(&self) -> Result<String> {
        self()
    }
}

/// Fixed prompt text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StaticPrompt(String);

impl StaticPrompt {
    pub fn new(prompt: impl Into<String>) -> Self {
        Self(prompt.into())
    }
}

impl Default for StaticPrompt {
    fn default() -> Self {
        Self::new(FALLBACK_PROMPT)
    }
}

impl DefaultPromptProvider for StaticPrompt {
    fn default_prompt(&self) -> Result<String> {
        Ok(self.0.clone())
    }
}

/// Wraps a provider and substitutes `fallback` when it reports `Unavailable`.
/// Any other error is passed through.
pub struct WithFallback<P> {
    inner: P,
    fallback: String,
}

impl<P: DefaultPromptProvider> WithFallback<P> {
    pub fn new(inner: P) -> Self {
        Self::with_text(inner, FALLBACK_PROMPT)
    }

    pub fn with_text(inner: P, fallback: impl Into<String>) -> Self {
        Self {
            inner,
            fallback: fallback.into(),
        }
    }
}

impl<P: DefaultPromptProvider> DefaultPromptProvider for WithFallback<P> {
    fn default_prompt(&self) -> Result<String> {
        match self.inner.default_prompt() {
            Err(StorageError::Unavailable(_)) => Ok(self.fallback.clone()),
            other => other,
        }
    }
}

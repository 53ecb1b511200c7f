// ABOUTME: Configuration record and partial-update type definitions
// ABOUTME: Records are handed out by value; the store keeps the only live copy

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Stored model and prompt selection for one user
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConfigRecord {
    pub user_id: String,
    pub model: String,
    pub prompt: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ConfigRecord {
    pub(crate) fn new(user_id: &str, model: String, prompt: String) -> Self {
        let now = Utc::now();
        Self {
            user_id: user_id.to_string(),
            model,
            prompt,
            created_at: now,
            updated_at: now,
        }
    }

    /// Apply the supplied fields, leaving omitted ones as they are.
    /// Callers validate `changes` first.
    pub(crate) fn apply(&mut self, changes: ConfigUpdate) {
        if let Some(model) = changes.model {
            self.model = model;
        }
        if let Some(prompt) = changes.prompt {
            self.prompt = prompt;
        }
        self.updated_at = Utc::now();
    }
}

/// Field values supplied by a caller.
///
/// `None` means the field was omitted: `create` fills it from the defaults and
/// `update` leaves the stored value untouched. `Some(String::new())` for the
/// prompt is an explicit clear and is stored as-is. When deserialized, a
/// missing key and an explicit `null` both become `None`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConfigUpdate {
    pub model: Option<String>,
    pub prompt: Option<String>,
}

impl ConfigUpdate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    pub fn prompt(mut self, prompt: impl Into<String>) -> Self {
        self.prompt = Some(prompt.into());
        self
    }

    pub fn is_empty(&self) -> bool {
        self.model.is_none() && self.prompt.is_none()
    }
}

/// Which path a `save` call took
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SaveOutcome {
    Created,
    Updated,
}

impl SaveOutcome {
    pub fn as_str(&self) -> &str {
        match self {
            SaveOutcome::Created => "created",
            SaveOutcome::Updated => "updated",
        }
    }
}

// ABOUTME: Concurrent per-user configuration store
// ABOUTME: Existence checks, create-with-defaults, partial updates and reads

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;

use crate::defaults::{DefaultPromptProvider, StaticPrompt, DEFAULT_MODEL};
use crate::types::{ConfigRecord, ConfigUpdate, SaveOutcome};
use crate::validation::{check_user_id, ModelPolicy};
use crate::{Result, StorageError};

/// Owns every user's [`ConfigRecord`].
///
/// Records live in a sharded map. Writers for one user hold that user's shard
/// lock for the whole check-validate-write step, so concurrent `create` calls
/// for the same user produce exactly one winner, while users on other shards
/// proceed in parallel. Readers always receive clones.
pub struct ConfigStore {
    records: DashMap<String, ConfigRecord>,
    default_model: String,
    prompt_provider: Box<dyn DefaultPromptProvider>,
    policy: ModelPolicy,
}

impl ConfigStore {
    pub fn builder() -> ConfigStoreBuilder {
        ConfigStoreBuilder::default()
    }

    pub fn default_model(&self) -> &str {
        &self.default_model
    }

    pub fn policy(&self) -> &ModelPolicy {
        &self.policy
    }

    /// Number of configured users
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn exists(&self, user_id: &str) -> bool {
        self.records.contains_key(user_id)
    }

    /// Get the configuration for a user, failing with `NotFound` when absent
    pub fn get(&self, user_id: &str) -> Result<ConfigRecord> {
        self.find(user_id)
            .ok_or_else(|| StorageError::NotFound(user_id.to_string()))
    }

    /// Get the configuration for a user if one exists
    pub fn find(&self, user_id: &str) -> Option<ConfigRecord> {
        self.records.get(user_id).map(|record| record.value().clone())
    }

    /// Current text of the default prompt provider, for callers that offer a
    /// "reset to default" action. Provider failures pass through unchanged.
    pub fn default_prompt(&self) -> Result<String> {
        self.prompt_provider.default_prompt()
    }

    /// Create the first configuration for a user.
    ///
    /// An omitted model resolves to the store's default model and an omitted
    /// prompt to the default prompt provider's text. A supplied prompt is
    /// stored verbatim, including the empty string.
    pub fn create(&self, user_id: &str, input: ConfigUpdate) -> Result<ConfigRecord> {
        check_user_id(user_id)?;
        let model = self.resolve_model(input.model)?;

        // Skip the provider for users that are already configured
        if self.exists(user_id) {
            return Err(StorageError::AlreadyExists(user_id.to_string()));
        }
        let prompt = match input.prompt {
            Some(prompt) => prompt,
            None => self.prompt_provider.default_prompt()?,
        };

        match self.records.entry(user_id.to_string()) {
            Entry::Occupied(_) => Err(StorageError::AlreadyExists(user_id.to_string())),
            Entry::Vacant(slot) => {
                let record = ConfigRecord::new(user_id, model, prompt);
                slot.insert(record.clone());
                Ok(record)
            }
        }
    }

    /// Replace the supplied fields of an existing configuration.
    ///
    /// Omitted fields keep their stored values. Validation happens before the
    /// record is touched, so a rejected update leaves it unchanged.
    pub fn update(&self, user_id: &str, changes: ConfigUpdate) -> Result<ConfigRecord> {
        if let Some(model) = &changes.model {
            self.policy.check(model)?;
        }

        match self.records.get_mut(user_id) {
            Some(mut record) => {
                record.apply(changes);
                Ok(record.value().clone())
            }
            None => Err(StorageError::NotFound(user_id.to_string())),
        }
    }

    /// Update the configuration if the user has one, otherwise create it with
    /// defaults for the omitted fields. The existence decision and the write
    /// happen under the same lock.
    pub fn save(
        &self,
        user_id: &str,
        changes: ConfigUpdate,
    ) -> Result<(ConfigRecord, SaveOutcome)> {
        check_user_id(user_id)?;
        if let Some(model) = &changes.model {
            self.policy.check(model)?;
        }

        // Records are never removed, so a user seen here still exists below
        // and the provider is not called under the shard lock.
        let default_prompt = if changes.prompt.is_none() && !self.exists(user_id) {
            Some(self.prompt_provider.default_prompt()?)
        } else {
            None
        };

        match self.records.entry(user_id.to_string()) {
            Entry::Occupied(mut slot) => {
                slot.get_mut().apply(changes);
                Ok((slot.get().clone(), SaveOutcome::Updated))
            }
            Entry::Vacant(slot) => {
                let model = changes
                    .model
                    .unwrap_or_else(|| self.default_model.clone());
                let prompt = match changes.prompt.or(default_prompt) {
                    Some(prompt) => prompt,
                    None => self.prompt_provider.default_prompt()?,
                };
                let record = ConfigRecord::new(user_id, model, prompt);
                slot.insert(record.clone());
                Ok((record, SaveOutcome::Created))
            }
        }
    }

    fn resolve_model(&self, model: Option<String>) -> Result<String> {
        match model {
            Some(model) => {
                self.policy.check(&model)?;
                Ok(model)
            }
            None => Ok(self.default_model.clone()),
        }
    }
}

/// Builds a [`ConfigStore`], validating the default model against the policy
pub struct ConfigStoreBuilder {
    default_model: String,
    prompt_provider: Box<dyn DefaultPromptProvider>,
    policy: ModelPolicy,
}

impl Default for ConfigStoreBuilder {
    fn default() -> Self {
        Self {
            default_model: DEFAULT_MODEL.to_string(),
            prompt_provider: Box::new(StaticPrompt::default()),
            policy: ModelPolicy::any(),
        }
    }
}

impl ConfigStoreBuilder {
    pub fn default_model(mut self, model: impl Into<String>) -> Self {
        self.default_model = model.into();
        self
    }

    pub fn prompt_provider<P>(mut self, provider: P) -> Self
    where
        P: DefaultPromptProvider + 'static,
    {
        self.prompt_provider = Box::new(provider);
        self
    }

    pub fn policy(mut self, policy: ModelPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn build(self) -> Result<ConfigStore> {
        self.policy.check(&self.default_model)?;

        Ok(ConfigStore {
            records: DashMap::new(),
            default_model: self.default_model,
            prompt_provider: self.prompt_provider,
            policy: self.policy,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_defaults() {
        let store = ConfigStore::builder().build().unwrap();

        assert_eq!(store.default_model(), DEFAULT_MODEL);
        assert_eq!(store.policy(), &ModelPolicy::any());
        assert!(store.is_empty());
    }

    #[test]
    fn test_builder_rejects_blank_default_model() {
        let result = ConfigStore::builder().default_model("  ").build();
        assert!(matches!(result, Err(StorageError::InvalidInput(_))));
    }

    #[test]
    fn test_builder_rejects_default_model_outside_allow_list() {
        let result = ConfigStore::builder()
            .default_model("gpt-4o-mini")
            .policy(ModelPolicy::allow_list(["claude-sonnet"]))
            .build();
        assert!(matches!(result, Err(StorageError::InvalidInput(_))));
    }

    #[test]
    fn test_store_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<ConfigStore>();
    }
}

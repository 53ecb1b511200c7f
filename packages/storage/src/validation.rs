// ABOUTME: Input validation for configuration writes
// ABOUTME: Model name rules shared by create, update and save

use thiserror::Error;

use crate::StorageError;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Model cannot be empty")]
    EmptyModel,

    #[error("Model '{0}' is not available. Must be one of: {1}")]
    ModelNotAllowed(String, String),

    #[error("User id cannot be empty")]
    EmptyUserId,
}

impl From<ValidationError> for StorageError {
    fn from(err: ValidationError) -> Self {
        StorageError::InvalidInput(err.to_string())
    }
}

/// Decides which model names may be stored.
///
/// A name that is blank after trimming is always rejected. With an allow-list,
/// the trimmed name must also match one of its entries exactly.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ModelPolicy {
    allowed: Vec<String>,
}

impl ModelPolicy {
    /// Accept any non-blank model name
    pub fn any() -> Self {
        Self::default()
    }

    /// Accept only the listed models. An empty list behaves like [`ModelPolicy::any`].
    pub fn allow_list<I, S>(models: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut allowed: Vec<String> = models
            .into_iter()
            .map(Into::into)
            .map(|m| m.trim().to_string())
            .filter(|m| !m.is_empty())
            .collect();
        allowed.sort();
        allowed.dedup();
        Self { allowed }
    }

    pub fn allowed_models(&self) -> &[String] {
        &self.allowed
    }

    pub fn check(&self, model: &str) -> Result<(), ValidationError> {
        let model = model.trim();
        if model.is_empty() {
            return Err(ValidationError::EmptyModel);
        }

        if !self.allowed.is_empty()
            && self
                .allowed
                .binary_search_by(|m| m.as_str().cmp(model))
                .is_err()
        {
            return Err(ValidationError::ModelNotAllowed(
                model.to_string(),
                self.allowed.join(", "),
            ));
        }

        Ok(())
    }
}

pub(crate) fn check_user_id(user_id: &str) -> Result<(), ValidationError> {
    if user_id.trim().is_empty() {
        return Err(ValidationError::EmptyUserId);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_models_rejected() {
        let policy = ModelPolicy::any();
        for model in ["", " ", "\t\n", "   \r\n  "] {
            assert_eq!(policy.check(model), Err(ValidationError::EmptyModel));
        }
    }

    #[test]
    fn test_any_policy_accepts_non_blank() {
        let policy = ModelPolicy::any();
        assert!(policy.check("gpt-4o").is_ok());
        assert!(policy.check("  padded  ").is_ok());
    }

    #[test]
    fn test_allow_list() {
        let policy = ModelPolicy::allow_list(["gpt-4o", " claude-sonnet ", "", "gpt-4o"]);

        assert_eq!(policy.allowed_models(), ["claude-sonnet", "gpt-4o"]);
        assert!(policy.check("gpt-4o").is_ok());
        assert!(policy.check(" claude-sonnet").is_ok());

        let err = policy.check("llama").unwrap_err();
        assert_eq!(
            err.to_string(),
            "Model 'llama' is not available. Must be one of: claude-sonnet, gpt-4o"
        );
    }

    #[test]
    fn test_empty_allow_list_accepts_anything_non_blank() {
        let policy = ModelPolicy::allow_list(Vec::<String>::new());
        assert_eq!(policy, ModelPolicy::any());
        assert!(policy.check("whatever").is_ok());
        assert!(policy.check("").is_err());
    }

    #[test]
    fn test_validation_error_maps_to_invalid_input() {
        let err: StorageError = ValidationError::EmptyModel.into();
        assert_eq!(err, StorageError::InvalidInput("Model cannot be empty".to_string()));
    }

    #[test]
    fn test_check_user_id() {
        assert!(check_user_id("alice").is_ok());
        assert_eq!(check_user_id("  "), Err(ValidationError::EmptyUserId));
    }
}

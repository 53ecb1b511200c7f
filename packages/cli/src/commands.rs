// ABOUTME: Command request parsing and dispatch onto the configuration store
// ABOUTME: One JSON request in, one JSON response out, with machine-readable error codes

use chatcfg_storage::{ConfigRecord, ConfigStore, ConfigUpdate, StorageError, FALLBACK_PROMPT};
use serde::Deserialize;
use serde_json::{json, Value};
use thiserror::Error;
use tracing::{debug, error, info, warn};

/// Operations accepted on the command stream
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Operation {
    Exists,
    Get,
    Find,
    Create,
    Update,
    Save,
    #[serde(rename = "default_prompt")]
    DefaultPrompt,
    Status,
}

impl Operation {
    pub fn as_str(&self) -> &str {
        match self {
            Operation::Exists => "exists",
            Operation::Get => "get",
            Operation::Find => "find",
            Operation::Create => "create",
            Operation::Update => "update",
            Operation::Save => "save",
            Operation::DefaultPrompt => "default_prompt",
            Operation::Status => "status",
        }
    }

    pub fn all() -> &'static [Operation] {
        &[
            Operation::Exists,
            Operation::Get,
            Operation::Find,
            Operation::Create,
            Operation::Update,
            Operation::Save,
            Operation::DefaultPrompt,
            Operation::Status,
        ]
    }

    pub fn description(&self) -> &str {
        match self {
            Operation::Exists => "Report whether a user has a configuration",
            Operation::Get => "Return a user's configuration, NOT_FOUND if absent",
            Operation::Find => "Return a user's configuration, null fields if absent",
            Operation::Create => "Create a configuration, filling omitted fields from defaults",
            Operation::Update => "Replace only the supplied fields of an existing configuration",
            Operation::Save => "Update if configured, otherwise create",
            Operation::DefaultPrompt => "Return the prompt new configurations start from",
            Operation::Status => "Report store size and defaults",
        }
    }
}

/// A single command line after JSON decoding
#[derive(Debug, Clone, Deserialize)]
pub struct CommandRequest {
    #[serde(default)]
    pub id: Option<Value>,
    pub op: Operation,
    #[serde(default)]
    pub user_id: Option<String>,
    #[serde(flatten)]
    pub fields: ConfigUpdate,
}

#[derive(Debug, Error)]
pub enum CommandError {
    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error(transparent)]
    Storage(#[from] StorageError),
}

impl CommandError {
    pub fn code(&self) -> &'static str {
        match self {
            CommandError::BadRequest(_) => "BAD_REQUEST",
            CommandError::Storage(storage_error) => match storage_error {
                StorageError::NotFound(_) => "NOT_FOUND",
                StorageError::AlreadyExists(_) => "ALREADY_EXISTS",
                StorageError::InvalidInput(_) => "INVALID_INPUT",
                StorageError::Unavailable(_) => "UNAVAILABLE",
            },
        }
    }
}

/// Decode one input line and run it against the store.
///
/// Never fails: malformed input becomes a `BAD_REQUEST` response so the
/// command loop can keep going.
pub fn handle_line(store: &ConfigStore, line: &str) -> Value {
    let raw: Value = match serde_json::from_str(line) {
        Ok(raw) => raw,
        Err(e) => {
            return error_response(
                None,
                &CommandError::BadRequest(format!("Invalid JSON: {}", e)),
            )
        }
    };

    let id = raw.get("id").cloned();
    match serde_json::from_value::<CommandRequest>(raw) {
        Ok(request) => handle_request(store, request),
        Err(e) => error_response(id, &CommandError::BadRequest(e.to_string())),
    }
}

pub fn handle_request(store: &ConfigStore, request: CommandRequest) -> Value {
    let id = request.id.clone();
    let op = request.op;

    match dispatch(store, request) {
        Ok(mut body) => {
            debug!("{} succeeded", op.as_str());
            if let Value::Object(map) = &mut body {
                map.insert("id".to_string(), id.unwrap_or(Value::Null));
                map.insert("status".to_string(), json!("success"));
            }
            body
        }
        Err(err) => {
            match &err {
                CommandError::Storage(StorageError::Unavailable(msg)) => {
                    error!("{} failed, default prompt unavailable: {}", op.as_str(), msg);
                }
                other => warn!("{} rejected: {}", op.as_str(), other),
            }
            let mut body = error_response(id, &err);
            // Callers resetting a prompt still get usable text
            if op == Operation::DefaultPrompt {
                body["prompt"] = json!(FALLBACK_PROMPT);
            }
            body
        }
    }
}

fn dispatch(store: &ConfigStore, request: CommandRequest) -> Result<Value, CommandError> {
    let CommandRequest {
        op,
        user_id,
        fields,
        ..
    } = request;

    match op {
        Operation::Status => Ok(json!({
            "users": store.len(),
            "default_model": store.default_model(),
            "allowed_models": store.policy().allowed_models(),
        })),
        Operation::DefaultPrompt => Ok(json!({ "prompt": store.default_prompt()? })),
        Operation::Exists => {
            let user_id = require_user_id(user_id)?;
            Ok(json!({ "exists": store.exists(&user_id) }))
        }
        Operation::Get => {
            let user_id = require_user_id(user_id)?;
            Ok(record_body(&store.get(&user_id)?))
        }
        Operation::Find => {
            let user_id = require_user_id(user_id)?;
            Ok(match store.find(&user_id) {
                Some(record) => record_body(&record),
                None => json!({ "model": null, "prompt": null }),
            })
        }
        Operation::Create => {
            let user_id = require_user_id(user_id)?;
            let record = store.create(&user_id, fields)?;
            info!("Created configuration for user: {}", user_id);
            Ok(record_body(&record))
        }
        Operation::Update => {
            let user_id = require_user_id(user_id)?;
            if fields.is_empty() {
                debug!("Update for user {} supplied no fields", user_id);
            }
            let record = store.update(&user_id, fields)?;
            info!("Updated configuration for user: {}", user_id);
            Ok(record_body(&record))
        }
        Operation::Save => {
            let user_id = require_user_id(user_id)?;
            let (record, outcome) = store.save(&user_id, fields)?;
            info!(
                "Saved configuration for user: {} ({})",
                user_id,
                outcome.as_str()
            );
            let mut body = record_body(&record);
            body["outcome"] = json!(outcome.as_str());
            Ok(body)
        }
    }
}

fn require_user_id(user_id: Option<String>) -> Result<String, CommandError> {
    user_id
        .filter(|user_id| !user_id.trim().is_empty())
        .ok_or_else(|| CommandError::BadRequest("user_id is required".to_string()))
}

fn record_body(record: &ConfigRecord) -> Value {
    json!({
        "model": record.model,
        "prompt": record.prompt,
        "updated_at": record.updated_at.to_rfc3339(),
    })
}

fn error_response(id: Option<Value>, err: &CommandError) -> Value {
    json!({
        "id": id.unwrap_or(Value::Null),
        "status": "error",
        "code": err.code(),
        "error": err.to_string(),
    })
}

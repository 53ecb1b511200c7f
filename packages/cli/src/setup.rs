// ABOUTME: Startup wiring for the chatcfg binary
// ABOUTME: Command-line flags, settings overrides, tracing and store construction

use chatcfg_config::{constants::DEFAULT_LOG_FILTER, parse_model_list, Settings};
use chatcfg_storage::{ConfigStore, ModelPolicy, StaticPrompt, StorageError};
use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug, Default)]
#[command(name = "chatcfg")]
#[command(about = "chatcfg - per-user chat model and prompt configuration over JSON lines")]
#[command(version)]
pub struct Cli {
    #[arg(long, help = "Model assigned when a create omits one")]
    pub default_model: Option<String>,
    #[arg(long, help = "Prompt assigned when a create omits one")]
    pub default_prompt: Option<String>,
    #[arg(long, help = "Comma-separated list of accepted model names")]
    pub allowed_models: Option<String>,
    #[arg(long, help = "Read commands from a file instead of stdin")]
    pub script: Option<PathBuf>,
    #[arg(long, help = "Display available operations")]
    pub ops: bool,
}

impl Cli {
    /// Layer command-line flags over settings loaded from the environment
    pub fn apply(&self, mut settings: Settings) -> Settings {
        // Trimmed like CHATCFG_DEFAULT_MODEL; a blank flag is left for the store to reject
        if let Some(model) = &self.default_model {
            settings.default_model = Some(model.trim().to_string());
        }
        if let Some(prompt) = &self.default_prompt {
            settings.default_prompt = Some(prompt.clone());
        }
        if let Some(models) = &self.allowed_models {
            settings.allowed_models = parse_model_list(models);
        }
        settings
    }
}

/// Parse a log filter, falling back to the default with a note on stderr.
/// Runs before the subscriber exists, so the note cannot go through tracing.
pub fn log_filter(filter: &str) -> EnvFilter {
    match EnvFilter::try_new(filter) {
        Ok(filter) => filter,
        Err(e) => {
            eprintln!(
                "chatcfg: ignoring invalid log filter {:?} ({}), using {:?}",
                filter, e, DEFAULT_LOG_FILTER
            );
            EnvFilter::new(DEFAULT_LOG_FILTER)
        }
    }
}

/// Log to stderr so stdout carries nothing but responses
pub fn init_tracing(filter: &str) {
    tracing_subscriber::fmt()
        .with_env_filter(log_filter(filter))
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .init();
}

pub fn build_store(settings: &Settings) -> Result<ConfigStore, StorageError> {
    let mut builder = ConfigStore::builder()
        .policy(ModelPolicy::allow_list(settings.allowed_models.iter().cloned()));

    if let Some(model) = &settings.default_model {
        builder = builder.default_model(model.clone());
    }

    let prompt = match &settings.default_prompt {
        Some(prompt) => StaticPrompt::new(prompt.clone()),
        None => StaticPrompt::default(),
    };

    builder.prompt_provider(prompt).build()
}

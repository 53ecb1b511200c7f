use anyhow::{Context, Result};
use clap::Parser;
use std::fs::File;
use std::io::{self, BufReader};
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use tracing::info;

use chatcfg_cli::{build_store, init_tracing, run, Cli, Operation};
use chatcfg_config::Settings;
use chatcfg_storage::ConfigStore;

fn main() -> Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    if cli.ops {
        println!("Available operations:");
        for op in Operation::all() {
            println!("- {}: {}", op.as_str(), op.description());
        }
        return Ok(());
    }

    let settings = cli.apply(Settings::from_env()?);
    init_tracing(&settings.log_filter);

    let store = Arc::new(build_store(&settings).context("Failed to build configuration store")?);
    info!(
        "chatcfg ready (default model: {}, allowed models: {})",
        store.default_model(),
        store.policy().allowed_models().len()
    );

    // Set up signal handling for graceful shutdown
    let running = Arc::new(AtomicBool::new(true));
    install_shutdown_handler(running.clone(), store.clone())?;

    let stdout = io::stdout();
    let summary = match &cli.script {
        Some(path) => {
            let file = File::open(path)
                .with_context(|| format!("Failed to open script {}", path.display()))?;
            run(&store, BufReader::new(file), stdout.lock(), &running)?
        }
        None => run(&store, io::stdin().lock(), stdout.lock(), &running)?,
    };

    info!(
        "Processed {} commands ({} failed), {} users configured",
        summary.processed,
        summary.failed,
        store.len()
    );

    Ok(())
}

/// Responses are flushed line by line, so exiting here loses no output
fn exit_on_interrupt(store: &ConfigStore) -> ! {
    info!("Stopped by interrupt, {} users configured", store.len());
    std::process::exit(0)
}

#[cfg(unix)]
fn install_shutdown_handler(running: Arc<AtomicBool>, store: Arc<ConfigStore>) -> Result<()> {
    use chatcfg_cli::watch_signals;
    use signal_hook::{consts::SIGINT, iterator::Signals};

    let mut signals = Signals::new([SIGINT]).context("Failed to register SIGINT handler")?;
    std::thread::spawn(move || {
        watch_signals(signals.forever(), &running, || exit_on_interrupt(&store));
    });
    Ok(())
}

#[cfg(windows)]
fn install_shutdown_handler(running: Arc<AtomicBool>, store: Arc<ConfigStore>) -> Result<()> {
    use chatcfg_cli::interrupt;

    ctrlc::set_handler(move || {
        interrupt(&running, || exit_on_interrupt(&store));
    })
    .context("Failed to register Ctrl-C handler")
}

// ABOUTME: Line-delimited JSON command loop
// ABOUTME: Reads one request per line, writes one response per line, stops on EOF or shutdown

use anyhow::Result;
use chatcfg_storage::ConfigStore;
use std::io::{BufRead, Write};
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::{debug, info};

use crate::commands::handle_line;

/// Counters reported when the loop ends
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub processed: usize,
    pub failed: usize,
}

/// Serve commands from `reader` until EOF or until `running` is cleared.
///
/// Blank lines are skipped. I/O errors on either stream end the loop; bad
/// requests do not.
pub fn run<R, W>(
    store: &ConfigStore,
    reader: R,
    mut writer: W,
    running: &AtomicBool,
) -> Result<RunSummary>
where
    R: BufRead,
    W: Write,
{
    let mut summary = RunSummary::default();

    for line_result in reader.lines() {
        if !running.load(Ordering::SeqCst) {
            info!("Shutdown requested, stopping command loop");
            break;
        }

        let line = line_result?;
        if line.trim().is_empty() {
            continue;
        }

        debug!("Received: {}", line);

        let response = handle_line(store, &line);
        summary.processed += 1;
        if response.get("status").and_then(|s| s.as_str()) == Some("error") {
            summary.failed += 1;
        }

        writeln!(writer, "{}", serde_json::to_string(&response)?)?;
        writer.flush()?;
    }

    Ok(summary)
}

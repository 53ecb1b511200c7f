// ABOUTME: Interrupt handling for the command loop
// ABOUTME: Clears the running flag and ends the process without waiting on a blocked read

use std::sync::atomic::{AtomicBool, Ordering};
use tracing::{debug, info};

/// Record an interrupt and hand over to `exit`.
///
/// Returns `false` when a shutdown was already in progress. `exit` runs either
/// way; in the binary it terminates the process, since the command loop may be
/// blocked reading stdin and would never see the cleared flag.
pub fn interrupt<F>(running: &AtomicBool, exit: F) -> bool
where
    F: FnOnce(),
{
    let first = running.swap(false, Ordering::SeqCst);
    if first {
        info!("Interrupt received, shutting down");
    }
    exit();
    first
}

/// Wait for the first delivered signal, then run [`interrupt`].
///
/// Returns `false` if the signal source closed without delivering anything.
pub fn watch_signals<I, F>(signals: I, running: &AtomicBool, exit: F) -> bool
where
    I: IntoIterator<Item = i32>,
    F: FnOnce(),
{
    match signals.into_iter().next() {
        Some(signal) => {
            debug!("Received signal {}", signal);
            interrupt(running, exit);
            true
        }
        None => false,
    }
}

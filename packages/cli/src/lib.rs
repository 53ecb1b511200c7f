// ABOUTME: Command interface for the chatcfg configuration store
// ABOUTME: Request dispatch, the stdio command loop and startup wiring

pub mod commands;
pub mod runner;
pub mod setup;
pub mod shutdown;

#[cfg(test)]
mod tests;

pub use commands::{handle_line, handle_request, CommandError, CommandRequest, Operation};
pub use runner::{run, RunSummary};
pub use setup::{build_store, init_tracing, log_filter, Cli};
pub use shutdown::{interrupt, watch_signals};

//! logging — `slog` loggers for forecast runs.
//!
//! Forecast code never prints; it writes structured records to a
//! `slog::Logger` taken from `ForecastSettings`. When the caller does not
//! supply one, [`build_logger`] returns either a non-blocking terminal logger
//! (`verbose = true`) or a logger that discards every record.
use slog::{Discard, Drain, Logger, o};

/// Capacity of the async channel in front of the terminal drain.
const ASYNC_CHANNEL_SIZE: usize = 1024;

/// Build the default logger for a run.
///
/// - `verbose = true`: `slog-term` full format on stderr behind an
///   `slog-async` drain, tagged with the crate version.
/// - `verbose = false`: `slog::Discard`.
pub fn build_logger(verbose: bool) -> Logger {
    if !verbose {
        return Logger::root(Discard, o!());
    }
    let decorator = slog_term::TermDecorator::new().stderr().build();
    let drain = slog_term::FullFormat::new(decorator).build().fuse();
    let drain = slog_async::Async::new(drain).chan_size(ASYNC_CHANNEL_SIZE).build().fuse();
    Logger::root(drain, o!("crate" => "statespace_forecast", "version" => env!("CARGO_PKG_VERSION")))
}

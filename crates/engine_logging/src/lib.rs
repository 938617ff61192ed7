#![deny(missing_docs)]
//! Shared logging macros for the grid workspace.
//!
//! Every crate logs through the `engine_*` macros below so the backing
//! `log` facade can be swapped in one place. Fetch failures go through
//! [`engine_error!`]; stale responses and coalesced timers through
//! [`engine_debug!`].

/// Logs a trace-level message using the global logging facade.
#[macro_export]
macro_rules! engine_trace {
    ($($arg:tt)*) => {{
        log::trace!(target: "grid", $($arg)*);
    }};
}

/// Logs a debug-level message using the global logging facade.
#[macro_export]
macro_rules! engine_debug {
    ($($arg:tt)*) => {{
        log::debug!(target: "grid", $($arg)*);
    }};
}

/// Logs an info-level message using the global logging facade.
#[macro_export]
macro_rules! engine_info {
    ($($arg:tt)*) => {{
        log::info!(target: "grid", $($arg)*);
    }};
}

/// Logs a warn-level message using the global logging facade.
#[macro_export]
macro_rules! engine_warn {
    ($($arg:tt)*) => {{
        log::warn!(target: "grid", $($arg)*);
    }};
}

/// Logs an error-level message using the global logging facade.
#[macro_export]
macro_rules! engine_error {
    ($($arg:tt)*) => {{
        log::error!(target: "grid", $($arg)*);
    }};
}

/// Log level used by [`initialize_for_tests`].
///
/// `GRID_TEST_LOG` (`trace`, `debug`, `info`, ...) overrides the default,
/// which is debug in debug builds and info otherwise.
pub fn test_level() -> log::LevelFilter {
    std::env::var("GRID_TEST_LOG")
        .ok()
        .and_then(|raw| raw.parse().ok())
        .unwrap_or(if cfg!(debug_assertions) {
            log::LevelFilter::Debug
        } else {
            log::LevelFilter::Info
        })
}

/// Initializes a simple terminal logger for use in tests.
///
/// This safely no-ops if another logger has already been initialized.
pub fn initialize_for_tests() {
    use simplelog::{ColorChoice, CombinedLogger, Config, TermLogger, TerminalMode};

    // Ignore the error if a logger was already set by another test.
    let _ = CombinedLogger::init(vec![TermLogger::new(
        test_level(),
        Config::default(),
        TerminalMode::Mixed,
        ColorChoice::Auto,
    )]);
}

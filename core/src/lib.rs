//! Core process-control functionality for the forklift project
//!
//! This crate translates POSIX process semantics into a small set of
//! structured, inspectable results for a scripting host: building exec
//! argument vectors, creating children (by replacing the current process
//! image or by duplicating it), and reaping them with accurate signal-name
//! resolution.
//!
//! All operations are single-shot, synchronous, and stateless with respect
//! to each other; the only shared resource is the OS process table, queried
//! but never modeled here.

pub mod argv;
#[cfg(unix)]
pub mod commands;
pub mod config;
pub mod error;
#[cfg(unix)]
pub mod launch;
#[cfg(unix)]
pub mod signals;
#[cfg(unix)]
pub mod wait;

pub use argv::ArgumentVector;
pub use config::{AppInfo, PlatformCapabilities};
pub use error::{CoreError, Result};
#[cfg(unix)]
pub use launch::Forked;
#[cfg(unix)]
pub use signals::signal_name;
#[cfg(unix)]
pub use wait::{HangPolicy, ReapResult, TracePolicy, WaitRequest, WaitTarget};

/// Core utilities and helper functions
pub mod utils {
    use tracing::info;

    /// Initialize tracing for the application
    pub fn init_tracing(level: &str) -> crate::Result<()> {
        use tracing_subscriber::{fmt, EnvFilter};

        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

        fmt()
            .with_env_filter(filter)
            .try_init()
            .map_err(|e| crate::CoreError::Configuration(e.to_string()))?;

        info!("Tracing initialized with level: {}", level);
        Ok(())
    }
}

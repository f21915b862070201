//! # Telemetry
//!
//! Logging configuration for binaries and test suites in this workspace.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use ef_telemetry::{init_logging, TelemetryConfig};
//!
//! let config = TelemetryConfig::from_env();
//! init_logging(&config)?;
//! ```
//!
//! ## Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `EF_SERVICE_NAME` | `existence-filter-diagnostics` | Service name in logs |
//! | `EF_LOG_LEVEL` | `info` | Filter directive (falls back to `RUST_LOG`) |
//! | `EF_CONSOLE_OUTPUT` | `true` | Write logs to the console |
//! | `EF_JSON_LOGS` | `false` | JSON instead of human-readable output |

mod config;
mod logging;

pub use config::TelemetryConfig;
pub use logging::{init_logging, init_test_logging};

use thiserror::Error;

/// Telemetry initialization errors
#[derive(Error, Debug)]
pub enum TelemetryError {
    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Global subscriber already installed: {0}")]
    AlreadyInitialized(String),
}

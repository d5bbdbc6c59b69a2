//! # Logging
//!
//! Structured diagnostics through `tracing`:
//!
//! - stderr output, human readable or JSON (`DMC_LOG_JSON=1`)
//! - optional daily rotated log file under `DMC_LOG_DIR`
//! - panic hook that records panics before the default handler runs
//!
//! ```rust,no_run
//! use dmc_client::debug::{self, LogConfig};
//!
//! let _guard = debug::init_logger(&LogConfig::from_env()).unwrap();
//! tracing::info!(page = 0, "Fetching leaderboard");
//! ```
//!
//! The returned guard flushes buffered log lines when dropped; keep it
//! alive for the life of the program.

pub mod config;
pub mod logger;

pub use config::LogConfig;
pub use logger::{init as init_logger, LogGuard};

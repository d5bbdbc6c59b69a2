//! Logging configuration from environment variables

use std::env;
use std::path::PathBuf;

/// Filter used when `RUST_LOG` is unset.
pub const DEFAULT_LOG_LEVEL: &str = "dmc_client=info,dmc=info,warn";

/// Name of the rotated log file inside the log directory.
pub const LOG_FILE_NAME: &str = "dmc.log";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogConfig {
    /// `EnvFilter` directives (e.g. `dmc_client=debug,info`)
    pub log_level: String,
    /// Directory for the rotated log file; no file output when unset
    pub log_dir: Option<PathBuf>,
    /// Emit JSON lines on stderr instead of formatted text
    pub json: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self { log_level: DEFAULT_LOG_LEVEL.to_string(), log_dir: None, json: false }
    }
}

impl LogConfig {
    /// Read `RUST_LOG`, `DMC_LOG_DIR` and `DMC_LOG_JSON`.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let present = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        Self {
            log_level: present("RUST_LOG").unwrap_or_else(|| DEFAULT_LOG_LEVEL.to_string()),
            log_dir: present("DMC_LOG_DIR").map(PathBuf::from),
            json: present("DMC_LOG_JSON")
                .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
                .unwrap_or(false),
        }
    }

    pub fn is_debug_enabled(&self) -> bool {
        self.log_level.contains("debug") || self.log_level.contains("trace")
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn config(vars: &[(&str, &str)]) -> LogConfig {
        let vars: HashMap<String, String> = vars.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        LogConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_without_variables() {
        assert_eq!(config(&[]), LogConfig::default());
        assert!(!LogConfig::default().is_debug_enabled());
    }

    #[test]
    fn reads_variables() {
        let config = config(&[("RUST_LOG", "dmc_client=debug"), ("DMC_LOG_DIR", "/tmp/dmc"), ("DMC_LOG_JSON", "true")]);
        assert_eq!(config.log_dir, Some(PathBuf::from("/tmp/dmc")));
        assert!(config.json);
        assert!(config.is_debug_enabled());
    }

    #[test]
    fn blank_values_are_ignored() {
        let config = config(&[("RUST_LOG", "  "), ("DMC_LOG_DIR", ""), ("DMC_LOG_JSON", "0")]);
        assert_eq!(config, LogConfig::default());
    }
}

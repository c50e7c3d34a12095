//! Runtime configuration for the todo list server.
//!
//! # Responsibility
//! - Resolve the data file path, bind address and logging settings.
//! - Read environment variables with defaults; explicit overrides win.
//!
//! # Invariants
//! - A validated config has a non-empty data file path, a supported log level
//!   and (when set) an absolute log directory.
//! - Configuration is passed explicitly to the components that need it.

use crate::logging::{default_log_level, normalize_level};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::net::SocketAddr;
use std::path::PathBuf;

/// Environment variable overriding the JSON data file path.
pub const ENV_DATA_FILE: &str = "TODOLIST_DATA_FILE";
/// Environment variable overriding the HTTP bind address.
pub const ENV_BIND_ADDR: &str = "TODOLIST_BIND_ADDR";
/// Environment variable overriding the log level.
pub const ENV_LOG_LEVEL: &str = "TODOLIST_LOG_LEVEL";
/// Environment variable enabling file logging into a directory.
pub const ENV_LOG_DIR: &str = "TODOLIST_LOG_DIR";

pub const DEFAULT_DATA_FILE: &str = "data/todos.json";
pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1:3001";

/// Configuration error raised while resolving or validating `AppConfig`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    EmptyDataFile,
    InvalidBindAddr(String),
    UnsupportedLogLevel(String),
    RelativeLogDir(PathBuf),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyDataFile => write!(f, "data file path cannot be empty"),
            Self::InvalidBindAddr(value) => write!(f, "invalid bind address `{value}`"),
            Self::UnsupportedLogLevel(value) => write!(
                f,
                "unsupported log level `{value}`; expected trace|debug|info|warn|error"
            ),
            Self::RelativeLogDir(path) => write!(
                f,
                "log directory must be an absolute path, got `{}`",
                path.display()
            ),
        }
    }
}

impl Error for ConfigError {}

/// Fully resolved runtime configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// JSON file holding the todo array.
    pub data_file: PathBuf,
    /// Socket address the HTTP API listens on.
    pub bind_addr: SocketAddr,
    /// One of `trace|debug|info|warn|error`.
    pub log_level: String,
    /// Rolling log file directory; `None` logs to stderr only.
    pub log_dir: Option<PathBuf>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data_file: PathBuf::from(DEFAULT_DATA_FILE),
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 3001)),
            log_level: default_log_level().to_string(),
            log_dir: None,
        }
    }
}

/// Explicit values (e.g. command-line flags) that take precedence over the
/// environment. A set field means the matching variable is never read.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigOverrides {
    pub data_file: Option<PathBuf>,
    pub bind_addr: Option<String>,
    pub log_level: Option<String>,
    pub log_dir: Option<PathBuf>,
}

impl AppConfig {
    /// Resolves configuration from process environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_env_with(ConfigOverrides::default())
    }

    /// Resolves configuration from `overrides`, then the environment.
    pub fn from_env_with(overrides: ConfigOverrides) -> Result<Self, ConfigError> {
        Self::from_lookup_with(|key| std::env::var(key).ok(), overrides)
    }

    /// Resolves configuration from an arbitrary key lookup.
    ///
    /// Blank values are treated as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        Self::from_lookup_with(lookup, ConfigOverrides::default())
    }

    /// Merges `overrides` over the lookup, then validates once.
    ///
    /// Precedence per field: override, then lookup, then default.
    pub fn from_lookup_with(
        lookup: impl Fn(&str) -> Option<String>,
        overrides: ConfigOverrides,
    ) -> Result<Self, ConfigError> {
        let read = |key: &str| {
            lookup(key)
                .map(|raw| raw.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let mut config = Self::default();
        if let Some(data_file) = overrides
            .data_file
            .or_else(|| read(ENV_DATA_FILE).map(PathBuf::from))
        {
            config.data_file = data_file;
        }
        if let Some(bind_addr) = overrides.bind_addr.or_else(|| read(ENV_BIND_ADDR)) {
            config.bind_addr = parse_bind_addr(&bind_addr)?;
        }
        if let Some(level) = overrides.log_level.or_else(|| read(ENV_LOG_LEVEL)) {
            config.log_level = level;
        }
        if let Some(log_dir) = overrides
            .log_dir
            .or_else(|| read(ENV_LOG_DIR).map(PathBuf::from))
        {
            config.log_dir = Some(log_dir);
        }

        config.validate()?;
        Ok(config)
    }

    /// Validates and normalizes fields in place.
    ///
    /// # Errors
    /// - `EmptyDataFile` when `data_file` is empty.
    /// - `UnsupportedLogLevel` when `log_level` is not a known level.
    /// - `RelativeLogDir` when `log_dir` is set but not absolute.
    pub fn validate(&mut self) -> Result<(), ConfigError> {
        if self.data_file.as_os_str().is_empty() {
            return Err(ConfigError::EmptyDataFile);
        }
        self.log_level = normalize_level(&self.log_level)
            .map_err(|_| ConfigError::UnsupportedLogLevel(self.log_level.clone()))?
            .to_string();
        if let Some(dir) = &self.log_dir {
            if !dir.is_absolute() {
                return Err(ConfigError::RelativeLogDir(dir.clone()));
            }
        }
        Ok(())
    }
}

/// Parses a `host:port` socket address.
pub fn parse_bind_addr(value: &str) -> Result<SocketAddr, ConfigError> {
    value
        .trim()
        .parse()
        .map_err(|_| ConfigError::InvalidBindAddr(value.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_apply_when_environment_is_empty() {
        let config = AppConfig::from_lookup(lookup_from(&[])).unwrap();
        assert_eq!(config.data_file, PathBuf::from(DEFAULT_DATA_FILE));
        assert_eq!(config.bind_addr, parse_bind_addr(DEFAULT_BIND_ADDR).unwrap());
        assert_eq!(config.log_dir, None);
    }

    #[test]
    fn environment_values_override_defaults() {
        let config = AppConfig::from_lookup(lookup_from(&[
            (ENV_DATA_FILE, " /var/lib/todolist/todos.json "),
            (ENV_BIND_ADDR, "0.0.0.0:8080"),
            (ENV_LOG_LEVEL, "WARNING"),
            (ENV_LOG_DIR, "/var/log/todolist"),
        ]))
        .unwrap();

        assert_eq!(config.data_file, PathBuf::from("/var/lib/todolist/todos.json"));
        assert_eq!(config.bind_addr.port(), 8080);
        assert_eq!(config.log_level, "warn");
        assert_eq!(config.log_dir, Some(PathBuf::from("/var/log/todolist")));
    }

    #[test]
    fn blank_values_are_treated_as_unset() {
        let config =
            AppConfig::from_lookup(lookup_from(&[(ENV_DATA_FILE, "   "), (ENV_LOG_DIR, "")]))
                .unwrap();
        assert_eq!(config.data_file, PathBuf::from(DEFAULT_DATA_FILE));
        assert_eq!(config.log_dir, None);
    }

    #[test]
    fn invalid_values_are_rejected() {
        let err = AppConfig::from_lookup(lookup_from(&[(ENV_BIND_ADDR, "localhost")])).unwrap_err();
        assert_eq!(err, ConfigError::InvalidBindAddr("localhost".to_string()));

        let err = AppConfig::from_lookup(lookup_from(&[(ENV_LOG_LEVEL, "loud")])).unwrap_err();
        assert_eq!(err, ConfigError::UnsupportedLogLevel("loud".to_string()));

        let err = AppConfig::from_lookup(lookup_from(&[(ENV_LOG_DIR, "logs")])).unwrap_err();
        assert_eq!(err, ConfigError::RelativeLogDir(PathBuf::from("logs")));
    }

    #[test]
    fn overrides_win_and_shadow_invalid_environment_values() {
        let config = AppConfig::from_lookup_with(
            lookup_from(&[
                (ENV_BIND_ADDR, "localhost"),
                (ENV_LOG_LEVEL, "loud"),
                (ENV_DATA_FILE, "/env/todos.json"),
            ]),
            ConfigOverrides {
                bind_addr: Some("127.0.0.1:4000".to_string()),
                log_level: Some("INFO".to_string()),
                ..ConfigOverrides::default()
            },
        )
        .unwrap();

        assert_eq!(config.bind_addr.port(), 4000);
        assert_eq!(config.log_level, "info");
        assert_eq!(config.data_file, PathBuf::from("/env/todos.json"));
    }

    #[test]
    fn invalid_override_is_still_rejected() {
        let err = AppConfig::from_lookup_with(
            lookup_from(&[]),
            ConfigOverrides {
                log_dir: Some(PathBuf::from("relative/logs")),
                ..ConfigOverrides::default()
            },
        )
        .unwrap_err();
        assert_eq!(err, ConfigError::RelativeLogDir(PathBuf::from("relative/logs")));
    }

    #[test]
    fn validate_rejects_empty_data_file() {
        let mut config = AppConfig {
            data_file: PathBuf::new(),
            ..AppConfig::default()
        };
        assert_eq!(config.validate(), Err(ConfigError::EmptyDataFile));
    }
}

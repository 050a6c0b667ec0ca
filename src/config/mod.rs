//! Configuration management.
//!
//! Settings come from, lowest priority first: built-in defaults, a TOML
//! file, `WORDSWEEP_*` environment variables, then command line flags
//! (applied by the binary).

use crate::models::{RemediationAction, TargetTable};
use crate::{Error, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Default poll interval between watch cycles.
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 1000;

/// Default word list extension in directory mode.
pub const DEFAULT_EXTENSION: &str = "txt";

/// Main configuration for wordsweep.
#[derive(Debug, Clone, Default)]
pub struct SweepConfig {
    /// Word list location and polling.
    pub watch: WatchConfig,
    /// Relational store.
    pub database: DatabaseConfig,
    /// Tables to remediate.
    pub targets: TargetsConfig,
    /// Raw logging settings, resolved by the observability module.
    pub logging: LoggingSettings,
    /// Raw metrics settings, resolved by the observability module.
    pub metrics: MetricsSettings,
}

/// Word list location and polling cadence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WatchConfig {
    /// A single word list file, or a directory of them.
    pub path: PathBuf,
    /// Extension (without the dot) of word lists in directory mode.
    pub extension: String,
    /// Sleep between poll cycles.
    pub poll_interval: Duration,
}

impl Default for WatchConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("."),
            extension: DEFAULT_EXTENSION.to_string(),
            poll_interval: Duration::from_millis(DEFAULT_POLL_INTERVAL_MS),
        }
    }
}

/// Relational store settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatabaseConfig {
    /// Path of the `SQLite` database file.
    pub path: PathBuf,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("wordsweep.db"),
        }
    }
}

/// The two remediated tables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetsConfig {
    /// Matching rows are deleted.
    pub contract_call: TargetTable,
    /// Matching rows have a field cleared.
    pub tx_out: TargetTable,
}

impl Default for TargetsConfig {
    fn default() -> Self {
        Self {
            contract_call: TargetTable::contract_call(),
            tx_out: TargetTable::tx_out(),
        }
    }
}

impl TargetsConfig {
    /// Targets in sweep order.
    #[must_use]
    pub fn tables(&self) -> Vec<TargetTable> {
        vec![self.contract_call.clone(), self.tx_out.clone()]
    }
}

/// Logging section of the config file.
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
pub struct LoggingSettings {
    /// `pretty` or `json`.
    pub format: Option<String>,
    /// `EnvFilter` directive, e.g. `info` or `wordsweep=debug`.
    pub level: Option<String>,
    /// Append logs to this file instead of stderr.
    pub file: Option<String>,
}

/// Metrics section of the config file.
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
pub struct MetricsSettings {
    /// Install the Prometheus recorder and listener.
    pub enabled: Option<bool>,
    /// Listener port.
    pub port: Option<u16>,
}

/// Configuration file structure (for TOML parsing).
#[derive(Debug, Deserialize, Default)]
pub struct ConfigFile {
    /// Watch section.
    pub watch: Option<ConfigFileWatch>,
    /// Database section.
    pub database: Option<ConfigFileDatabase>,
    /// Targets section.
    pub targets: Option<ConfigFileTargets>,
    /// Logging section.
    pub logging: Option<LoggingSettings>,
    /// Metrics section.
    pub metrics: Option<MetricsSettings>,
}

/// Watch section in config file.
#[derive(Debug, Deserialize, Default)]
pub struct ConfigFileWatch {
    /// File or directory.
    pub path: Option<String>,
    /// Word list extension.
    pub extension: Option<String>,
    /// Poll interval in milliseconds.
    pub poll_interval_ms: Option<u64>,
}

/// Database section in config file.
#[derive(Debug, Deserialize, Default)]
pub struct ConfigFileDatabase {
    /// Database file path.
    pub path: Option<String>,
}

/// Targets section in config file.
#[derive(Debug, Deserialize, Default)]
pub struct ConfigFileTargets {
    /// Contract call table overrides.
    pub contract_call: Option<ConfigFileTable>,
    /// Tx out table overrides.
    pub tx_out: Option<ConfigFileTable>,
}

/// One table in the targets section.
#[derive(Debug, Deserialize, Default)]
pub struct ConfigFileTable {
    /// Table name.
    pub table: Option<String>,
    /// Primary key column.
    pub id_column: Option<String>,
    /// Column matched against the word set.
    pub payload_column: Option<String>,
    /// Column cleared on a match (tx out only).
    pub redact_column: Option<String>,
}

impl ConfigFileTable {
    fn apply(self, target: &mut TargetTable) {
        if let Some(table) = self.table {
            target.table = table;
        }
        if let Some(id_column) = self.id_column {
            target.id_column = id_column;
        }
        if let Some(payload_column) = self.payload_column {
            target.payload_column = payload_column;
        }
        if let (Some(redact), RemediationAction::Redact { column }) =
            (self.redact_column, &mut target.action)
        {
            *column = redact;
        }
    }
}

impl SweepConfig {
    /// Creates a new configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads configuration from a file path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| Error::OperationFailed {
            operation: "read_config_file".to_string(),
            cause: format!("{}: {e}", path.display()),
        })?;

        Self::parse(&contents)
    }

    /// Parses TOML configuration text.
    ///
    /// # Errors
    ///
    /// Returns an error if the text is not valid configuration TOML.
    pub fn parse(contents: &str) -> Result<Self> {
        let file: ConfigFile = toml::from_str(contents).map_err(|e| Error::OperationFailed {
            operation: "parse_config_file".to_string(),
            cause: e.to_string(),
        })?;

        Ok(Self::from_config_file(file))
    }

    /// Loads configuration from the default location.
    ///
    /// Checks `WORDSWEEP_CONFIG_PATH` first, then:
    /// 1. Platform-specific config dir (`~/Library/Application Support/wordsweep/` on macOS)
    /// 2. XDG config dir (`~/.config/wordsweep/` for Unix compatibility)
    ///
    /// Returns default configuration if no config file is found.
    ///
    /// # Errors
    ///
    /// Returns an error if a config file exists but cannot be read or parsed.
    pub fn load_default() -> Result<Self> {
        if let Some(path) = std::env::var_os("WORDSWEEP_CONFIG_PATH") {
            return Self::load_from_file(Path::new(&path));
        }

        let Some(base_dirs) = directories::BaseDirs::new() else {
            return Ok(Self::default());
        };

        let platform_config = base_dirs.config_dir().join("wordsweep").join("config.toml");
        if platform_config.exists() {
            return Self::load_from_file(&platform_config);
        }

        let xdg_config = base_dirs
            .home_dir()
            .join(".config")
            .join("wordsweep")
            .join("config.toml");
        if xdg_config.exists() {
            return Self::load_from_file(&xdg_config);
        }

        Ok(Self::default())
    }

    /// Converts a `ConfigFile` to `SweepConfig`.
    fn from_config_file(file: ConfigFile) -> Self {
        let mut config = Self::default();

        if let Some(watch) = file.watch {
            if let Some(path) = watch.path {
                config.watch.path = PathBuf::from(path);
            }
            if let Some(extension) = watch.extension {
                config.watch.extension = normalize_extension(&extension);
            }
            if let Some(ms) = watch.poll_interval_ms {
                config.watch.poll_interval = Duration::from_millis(ms);
            }
        }
        if let Some(path) = file.database.and_then(|db| db.path) {
            config.database.path = PathBuf::from(path);
        }
        if let Some(targets) = file.targets {
            if let Some(table) = targets.contract_call {
                table.apply(&mut config.targets.contract_call);
            }
            if let Some(table) = targets.tx_out {
                table.apply(&mut config.targets.tx_out);
            }
        }
        if let Some(logging) = file.logging {
            config.logging = logging;
        }
        if let Some(metrics) = file.metrics {
            config.metrics = metrics;
        }

        config
    }

    /// Applies `WORDSWEEP_*` environment overrides for the watch and
    /// database sections.
    ///
    /// Logging and metrics variables are read when observability is
    /// initialized.
    ///
    /// # Errors
    ///
    /// Returns an error if `WORDSWEEP_POLL_INTERVAL_MS` is not a number.
    pub fn with_env_overrides(mut self) -> Result<Self> {
        if let Some(path) = parse_string_env("WORDSWEEP_DB_PATH") {
            self.database.path = PathBuf::from(path);
        }
        if let Some(path) = parse_string_env("WORDSWEEP_WATCH_PATH") {
            self.watch.path = PathBuf::from(path);
        }
        if let Some(ms) = parse_string_env("WORDSWEEP_POLL_INTERVAL_MS") {
            let ms = ms.parse::<u64>().map_err(|e| {
                Error::InvalidInput(format!("WORDSWEEP_POLL_INTERVAL_MS '{ms}': {e}"))
            })?;
            self.watch.poll_interval = Duration::from_millis(ms);
        }
        Ok(self)
    }

    /// Sets the watched path.
    #[must_use]
    pub fn with_watch_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.watch.path = path.into();
        self
    }

    /// Sets the database path.
    #[must_use]
    pub fn with_database_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.database.path = path.into();
        self
    }

    /// Sets the poll interval.
    #[must_use]
    pub const fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.watch.poll_interval = interval;
        self
    }

    /// Sets the directory-mode extension. A leading dot is ignored.
    #[must_use]
    pub fn with_extension(mut self, extension: &str) -> Self {
        self.watch.extension = normalize_extension(extension);
        self
    }

    /// Checks values that would make the daemon misbehave.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidInput`] for a zero poll interval, an empty
    /// extension or an empty table or column name.
    pub fn validate(&self) -> Result<()> {
        if self.watch.poll_interval.is_zero() {
            return Err(Error::InvalidInput(
                "watch.poll_interval_ms must be greater than zero".to_string(),
            ));
        }
        if self.watch.extension.is_empty() {
            return Err(Error::InvalidInput(
                "watch.extension must not be empty".to_string(),
            ));
        }
        for target in [&self.targets.contract_call, &self.targets.tx_out] {
            let mut names = vec![&target.table, &target.id_column, &target.payload_column];
            if let RemediationAction::Redact { column } = &target.action {
                names.push(column);
            }
            if names.iter().any(|name| name.trim().is_empty()) {
                return Err(Error::InvalidInput(format!(
                    "targets.{}: table and column names must not be empty",
                    target.kind
                )));
            }
        }
        Ok(())
    }
}

fn normalize_extension(extension: &str) -> String {
    extension.trim().trim_start_matches('.').to_string()
}

fn parse_string_env(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

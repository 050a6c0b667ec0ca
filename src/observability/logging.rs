//! Structured logging configuration.

use crate::config::LoggingSettings;
use std::path::PathBuf;

/// Output format of the fmt layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// Human-readable multi-line output.
    #[default]
    Pretty,
    /// One JSON object per event.
    Json,
}

impl LogFormat {
    /// Parses a format name; anything but `json` is pretty.
    #[must_use]
    pub fn parse(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "json" => Self::Json,
            _ => Self::Pretty,
        }
    }
}

/// Resolved logging configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoggingConfig {
    /// Output format.
    pub format: LogFormat,
    /// `EnvFilter` directive.
    pub level: String,
    /// Optional append-mode log file.
    pub file: Option<PathBuf>,
}

impl LoggingConfig {
    /// Builds logging configuration from config settings with env overrides.
    ///
    /// `WORDSWEEP_LOG_LEVEL`, `WORDSWEEP_LOG_FORMAT` and `WORDSWEEP_LOG_FILE`
    /// win over the file. With no level anywhere, `verbose` selects `debug`
    /// and the default is `info`.
    #[must_use]
    pub fn from_settings(settings: Option<&LoggingSettings>, verbose: bool) -> Self {
        let default_level = if verbose { "debug" } else { "info" };

        let format = super::parse_string_env("WORDSWEEP_LOG_FORMAT")
            .or_else(|| settings.and_then(|s| s.format.clone()))
            .map_or_else(LogFormat::default, |f| LogFormat::parse(&f));
        let level = super::parse_string_env("WORDSWEEP_LOG_LEVEL")
            .or_else(|| settings.and_then(|s| s.level.clone()))
            .unwrap_or_else(|| default_level.to_string());
        let file = super::parse_string_env("WORDSWEEP_LOG_FILE")
            .or_else(|| settings.and_then(|s| s.file.clone()))
            .map(PathBuf::from);

        Self {
            format,
            level,
            file,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_parse() {
        assert_eq!(LogFormat::parse("json"), LogFormat::Json);
        assert_eq!(LogFormat::parse(" JSON "), LogFormat::Json);
        assert_eq!(LogFormat::parse("pretty"), LogFormat::Pretty);
        assert_eq!(LogFormat::parse("anything"), LogFormat::Pretty);
    }

    #[test]
    fn test_settings_are_used() {
        let settings = LoggingSettings {
            format: Some("json".to_string()),
            level: Some("wordsweep=trace".to_string()),
            file: Some("/tmp/wordsweep.log".to_string()),
        };
        let config = LoggingConfig::from_settings(Some(&settings), false);
        if std::env::var_os("WORDSWEEP_LOG_LEVEL").is_none() {
            assert_eq!(config.level, "wordsweep=trace");
        }
        if std::env::var_os("WORDSWEEP_LOG_FORMAT").is_none() {
            assert_eq!(config.format, LogFormat::Json);
        }
    }

    #[test]
    fn test_verbose_default_level() {
        if std::env::var_os("WORDSWEEP_LOG_LEVEL").is_some() {
            return;
        }
        assert_eq!(LoggingConfig::from_settings(None, true).level, "debug");
        assert_eq!(LoggingConfig::from_settings(None, false).level, "info");
    }
}

//! Tracing subscriber configuration.
//!
//! Library crates only emit `tracing` events. Binaries decide where they go
//! by building a [`TracingConfig`] and calling [`TracingConfig::init`] once
//! at startup.
//!
//! # Example
//!
//! ```
//! use worldbench_core::{TracingConfig, TracingFormat};
//! use tracing::Level;
//!
//! // Development: pretty output with debug level and span events
//! let dev = TracingConfig::default()
//!     .with_level(Level::DEBUG)
//!     .with_format(TracingFormat::Pretty)
//!     .with_span_events(true);
//!
//! // Production: JSON output for log aggregation
//! let prod = TracingConfig::default()
//!     .with_format(TracingFormat::Json)
//!     .with_env_filter("worldbench_media=info,worldbench_expand=warn");
//!
//! assert_eq!(dev.level(), Level::DEBUG);
//! assert_eq!(prod.env_filter(), Some("worldbench_media=info,worldbench_expand=warn"));
//! ```

use core::fmt;
use core::str::FromStr;

use tracing::Level;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Environment variable holding a filter directive, e.g. `worldbench_media=debug`.
pub const LOG_ENV: &str = "WORLDBENCH_LOG";

/// Environment variable holding the output format: `pretty`, `compact` or `json`.
pub const LOG_FORMAT_ENV: &str = "WORLDBENCH_LOG_FORMAT";

// ─────────────────────────────────────────────────────────────────────────────
// TracingFormat
// ─────────────────────────────────────────────────────────────────────────────

/// Tracing output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TracingFormat {
    /// Human-readable colored output (default).
    #[default]
    Pretty,
    /// Compact single-line output.
    Compact,
    /// JSON structured output for log aggregation.
    Json,
}

impl TracingFormat {
    /// Returns the lowercase name accepted by [`FromStr`].
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            TracingFormat::Pretty => "pretty",
            TracingFormat::Compact => "compact",
            TracingFormat::Json => "json",
        }
    }
}

impl fmt::Display for TracingFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TracingFormat {
    type Err = TracingConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pretty" => Ok(TracingFormat::Pretty),
            "compact" => Ok(TracingFormat::Compact),
            "json" => Ok(TracingFormat::Json),
            _ => Err(TracingConfigError::UnknownFormat(s.to_owned())),
        }
    }
}

/// Errors raised while reading tracing configuration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TracingConfigError {
    /// The format name is not `pretty`, `compact` or `json`.
    #[error("unknown tracing format '{0}', expected pretty, compact or json")]
    UnknownFormat(String),
}

// ─────────────────────────────────────────────────────────────────────────────
// TracingConfig
// ─────────────────────────────────────────────────────────────────────────────

/// How a binary's tracing subscriber is set up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TracingConfig {
    level: Level,
    format: TracingFormat,
    env_filter: Option<String>,
    span_events: bool,
}

impl Default for TracingConfig {
    fn default() -> Self {
        Self {
            level: Level::INFO,
            format: TracingFormat::Pretty,
            env_filter: None,
            span_events: false,
        }
    }
}

impl TracingConfig {
    /// Creates a configuration with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Reads [`LOG_ENV`] and [`LOG_FORMAT_ENV`] from the process environment.
    ///
    /// Unset variables keep their defaults.
    ///
    /// # Errors
    ///
    /// Returns [`TracingConfigError::UnknownFormat`] for an unknown format name.
    pub fn from_env() -> Result<Self, TracingConfigError> {
        Self::from_vars(|key| std::env::var(key).ok())
    }

    /// Like [`from_env`](Self::from_env), reading variables through `lookup`.
    ///
    /// # Errors
    ///
    /// Returns [`TracingConfigError::UnknownFormat`] for an unknown format name.
    pub fn from_vars(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, TracingConfigError> {
        let mut config = Self::default();
        if let Some(filter) = lookup(LOG_ENV).filter(|f| !f.trim().is_empty()) {
            config.env_filter = Some(filter);
        }
        if let Some(format) = lookup(LOG_FORMAT_ENV) {
            config.format = format.parse()?;
        }
        Ok(config)
    }

    /// Sets the maximum log level, used when no filter directive is set.
    #[must_use]
    pub fn with_level(mut self, level: Level) -> Self {
        self.level = level;
        self
    }

    /// Sets the output format.
    #[must_use]
    pub fn with_format(mut self, format: TracingFormat) -> Self {
        self.format = format;
        self
    }

    /// Sets a filter directive string.
    ///
    /// Format: `target=level,target=level,...`
    #[must_use]
    pub fn with_env_filter(mut self, filter: impl Into<String>) -> Self {
        self.env_filter = Some(filter.into());
        self
    }

    /// Enables span enter/exit events in output.
    #[must_use]
    pub fn with_span_events(mut self, enabled: bool) -> Self {
        self.span_events = enabled;
        self
    }

    /// Returns the maximum log level.
    #[must_use]
    pub fn level(&self) -> Level {
        self.level
    }

    /// Returns the output format.
    #[must_use]
    pub fn format(&self) -> TracingFormat {
        self.format
    }

    /// Returns the filter directive, if any.
    #[must_use]
    pub fn env_filter(&self) -> Option<&str> {
        self.env_filter.as_deref()
    }

    /// Returns true if span enter/exit events are shown.
    #[must_use]
    pub fn span_events(&self) -> bool {
        self.span_events
    }

    /// Builds the filter. An invalid directive falls back to the level.
    fn filter(&self) -> EnvFilter {
        match &self.env_filter {
            Some(filter) => {
                EnvFilter::try_new(filter).unwrap_or_else(|_| EnvFilter::new(self.level.as_str()))
            }
            None => EnvFilter::new(self.level.as_str()),
        }
    }

    /// Installs the global subscriber.
    ///
    /// Returns false if a subscriber was already installed, in which case
    /// this call has no effect.
    pub fn init(&self) -> bool {
        let env_filter = self.filter();
        let span_events = if self.span_events {
            FmtSpan::ENTER | FmtSpan::EXIT
        } else {
            FmtSpan::NONE
        };

        let installed = match self.format {
            TracingFormat::Pretty => tracing_subscriber::registry()
                .with(env_filter)
                .with(
                    tracing_subscriber::fmt::layer()
                        .pretty()
                        .with_span_events(span_events),
                )
                .try_init()
                .is_ok(),
            TracingFormat::Compact => tracing_subscriber::registry()
                .with(env_filter)
                .with(
                    tracing_subscriber::fmt::layer()
                        .compact()
                        .with_span_events(span_events),
                )
                .try_init()
                .is_ok(),
            TracingFormat::Json => tracing_subscriber::registry()
                .with(env_filter)
                .with(
                    tracing_subscriber::fmt::layer()
                        .json()
                        .with_span_events(span_events),
                )
                .try_init()
                .is_ok(),
        };

        if installed {
            tracing::debug!(
                level = %self.level,
                format = %self.format,
                filter = ?self.env_filter,
                "tracing initialized"
            );
        }
        installed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_pretty_info() {
        let config = TracingConfig::default();
        assert_eq!(config.level(), Level::INFO);
        assert_eq!(config.format(), TracingFormat::Pretty);
        assert_eq!(config.env_filter(), None);
        assert!(!config.span_events());
    }

    #[test]
    fn builders_set_fields() {
        let config = TracingConfig::new()
            .with_level(Level::DEBUG)
            .with_format(TracingFormat::Compact)
            .with_env_filter("worldbench_graph=trace")
            .with_span_events(true);
        assert_eq!(config.level(), Level::DEBUG);
        assert_eq!(config.format(), TracingFormat::Compact);
        assert_eq!(config.env_filter(), Some("worldbench_graph=trace"));
        assert!(config.span_events());
    }

    #[test]
    fn format_names_parse() {
        assert_eq!("JSON".parse::<TracingFormat>(), Ok(TracingFormat::Json));
        assert_eq!(" compact ".parse::<TracingFormat>(), Ok(TracingFormat::Compact));
        assert_eq!(
            "xml".parse::<TracingFormat>(),
            Err(TracingConfigError::UnknownFormat("xml".to_owned()))
        );
    }

    #[test]
    fn vars_override_defaults() {
        let config = TracingConfig::from_vars(|key| match key {
            LOG_ENV => Some("worldbench_media=debug".to_owned()),
            LOG_FORMAT_ENV => Some("json".to_owned()),
            _ => None,
        })
        .unwrap();
        assert_eq!(config.env_filter(), Some("worldbench_media=debug"));
        assert_eq!(config.format(), TracingFormat::Json);

        let unset = TracingConfig::from_vars(|_| None).unwrap();
        assert_eq!(unset, TracingConfig::default());

        let blank = TracingConfig::from_vars(|key| (key == LOG_ENV).then(|| "  ".to_owned()));
        assert_eq!(blank.unwrap().env_filter(), None);
    }

    #[test]
    fn bad_format_var_is_an_error() {
        let err = TracingConfig::from_vars(|key| (key == LOG_FORMAT_ENV).then(|| "xml".to_owned()))
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "unknown tracing format 'xml', expected pretty, compact or json"
        );
    }

    #[test]
    fn second_init_is_harmless() {
        let config = TracingConfig::default().with_level(Level::WARN);
        config.init();
        assert!(!config.init());
    }
}

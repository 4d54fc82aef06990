// ABOUTME: Structured logging setup shared by the server and the seeding tool
// ABOUTME: tracing-subscriber registry with env filtering and json/pretty/compact output
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Structured logging configuration
//!
//! `RUST_LOG` wins when set; otherwise the crate logs at `info` and the
//! dependencies listed in [`QUIET_TARGETS`] are held back so request logs
//! stay readable.

use crate::constants::service_names;
use anyhow::Result;
use std::env;
use std::io;
use tracing::info;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Dependency targets capped at a coarser level than the crate itself
pub const QUIET_TARGETS: &[(&str, &str)] = &[
    ("hyper", "warn"),
    ("reqwest", "warn"),
    ("redis", "warn"),
    ("sqlx", "warn"),
    ("tower_http", "info"),
];

const DEFAULT_LEVEL: &str = "info";

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// One JSON object per event, for log shippers
    Json,
    /// Multi-line human output
    #[default]
    Pretty,
    /// Single-line output for CLIs
    Compact,
}

impl LogFormat {
    /// Parse a `LOG_FORMAT` value, defaulting to pretty
    #[must_use]
    pub fn parse(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "json" => Self::Json,
            "compact" => Self::Compact,
            _ => Self::Pretty,
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    /// Base filter (`RUST_LOG` syntax)
    pub filter: String,
    /// Output format
    pub format: LogFormat,
    /// Include source file and line
    pub include_location: bool,
    /// Service name attached to the startup event
    pub service_name: String,
    /// Deployment environment label
    pub environment: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: DEFAULT_LEVEL.to_owned(),
            format: LogFormat::default(),
            include_location: false,
            service_name: service_names::PIERRE_EXERCISE_SERVER.to_owned(),
            environment: "development".to_owned(),
        }
    }
}

impl LoggingConfig {
    /// Read `RUST_LOG`, `LOG_FORMAT`, `LOG_INCLUDE_LOCATION`, `SERVICE_NAME`, `ENVIRONMENT`
    #[must_use]
    pub fn from_env() -> Self {
        let defaults = Self::default();
        let environment = env::var("ENVIRONMENT").unwrap_or(defaults.environment);
        let production = environment == "production";

        Self {
            filter: env::var("RUST_LOG").unwrap_or(defaults.filter),
            format: env::var("LOG_FORMAT").map_or(
                if production {
                    LogFormat::Json
                } else {
                    defaults.format
                },
                |f| LogFormat::parse(&f),
            ),
            include_location: production || env::var("LOG_INCLUDE_LOCATION").is_ok(),
            service_name: env::var("SERVICE_NAME").unwrap_or(defaults.service_name),
            environment,
        }
    }

    /// Override the output format
    #[must_use]
    pub const fn with_format(mut self, format: LogFormat) -> Self {
        self.format = format;
        self
    }

    /// Directives in the order they are added to the filter
    ///
    /// A quiet target is skipped when the base filter already names it, so
    /// `RUST_LOG=sqlx=debug` is honoured.
    #[must_use]
    pub fn directives(&self) -> Vec<String> {
        let mut directives = vec![self.filter.clone()];
        directives.extend(
            QUIET_TARGETS
                .iter()
                .filter(|(target, _)| !self.filter.contains(&format!("{target}=")))
                .map(|(target, level)| format!("{target}={level}")),
        );
        directives
    }

    fn env_filter(&self) -> EnvFilter {
        let mut directives = self.directives().into_iter();
        let base = directives.next().unwrap_or_else(|| DEFAULT_LEVEL.to_owned());
        let filter = EnvFilter::try_new(&base).unwrap_or_else(|_| EnvFilter::new(DEFAULT_LEVEL));
        directives.fold(filter, |filter, directive| match directive.parse() {
            Ok(d) => filter.add_directive(d),
            Err(_) => filter,
        })
    }

    /// Install the global subscriber
    ///
    /// # Errors
    ///
    /// Returns an error if a global subscriber is already installed
    pub fn init(&self) -> Result<()> {
        let location = self.include_location;
        let json = (self.format == LogFormat::Json).then(|| {
            fmt::layer()
                .json()
                .with_current_span(true)
                .with_file(location)
                .with_line_number(location)
                .with_writer(io::stdout)
        });
        let pretty = (self.format == LogFormat::Pretty).then(|| {
            fmt::layer()
                .with_file(location)
                .with_line_number(location)
                .with_writer(io::stdout)
        });
        let compact = (self.format == LogFormat::Compact).then(|| {
            fmt::layer()
                .compact()
                .with_target(false)
                .with_writer(io::stderr)
        });

        tracing_subscriber::registry()
            .with(self.env_filter())
            .with(json)
            .with(pretty)
            .with(compact)
            .try_init()?;

        info!(
            service.name = %self.service_name,
            service.version = env!("CARGO_PKG_VERSION"),
            environment = %self.environment,
            log.filter = %self.filter,
            log.format = ?self.format,
            "Logging initialized"
        );
        Ok(())
    }
}

/// Initialize logging from the environment
///
/// # Errors
///
/// Returns an error if logging initialization fails
pub fn init_from_env() -> Result<()> {
    LoggingConfig::from_env().init()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_format_parse() {
        assert_eq!(LogFormat::parse("json"), LogFormat::Json);
        assert_eq!(LogFormat::parse(" COMPACT "), LogFormat::Compact);
        assert_eq!(LogFormat::parse("whatever"), LogFormat::Pretty);
    }

    #[test]
    fn test_directives_quiet_dependencies() {
        let directives = LoggingConfig::default().directives();
        assert_eq!(directives[0], "info");
        assert!(directives.contains(&"sqlx=warn".to_owned()));
        assert_eq!(directives.len(), QUIET_TARGETS.len() + 1);
    }

    #[test]
    fn test_explicit_target_is_not_overridden() {
        let config = LoggingConfig {
            filter: "debug,sqlx=debug".to_owned(),
            ..LoggingConfig::default()
        };
        let directives = config.directives();
        assert!(!directives.contains(&"sqlx=warn".to_owned()));
        assert!(directives.contains(&"reqwest=warn".to_owned()));
    }

    #[test]
    fn test_with_format() {
        let config = LoggingConfig::default().with_format(LogFormat::Compact);
        assert_eq!(config.format, LogFormat::Compact);
        assert_eq!(config.service_name, "pierre-exercise-server");
    }
}

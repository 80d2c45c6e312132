//! Unified error handling.
//!
//! `EnricherError` covers every failure domain of the enrichment pipeline:
//!   * Input: table layout and configuration problems
//!   * Network: DNS resolution and registry HTTP calls
//!   * Parse: CSV decoding
//!   * Io: reading and writing the workbook
//!
//! Only table and configuration errors are fatal to a run. Resolution and
//! registry errors are produced by the per-row components and contained by
//! their callers (see `enricher` and `registry`). The binary tags fatal
//! errors with their `category()`.
//!
//! Usage:
//!   use abuseenricher::errors::{Result, EnricherError};
//!
//!   fn check(column: &str) -> Result<()> {
//!       Err(EnricherError::missing_column(column, "input.csv"))
//!   }

use std::io;

use thiserror::Error;

use crate::registry::Registry;

/// High-level classification for reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Input,
    Network,
    Parse,
    Io,
}

impl std::fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            ErrorCategory::Input => "input",
            ErrorCategory::Network => "network",
            ErrorCategory::Parse => "parse",
            ErrorCategory::Io => "io",
        };
        f.write_str(s)
    }
}

/// Primary library error type.
#[derive(Error, Debug)]
pub enum EnricherError {
    // ------------------------ Input / Validation ----------------------------
    #[error("Column '{column}' not found in {location}")]
    MissingColumn { column: String, location: String },

    #[error("Malformed table {location}: {reason}")]
    Table { location: String, reason: String },

    #[error("Configuration error: {message}")]
    Configuration { message: String },

    // ----------------------------- Network ----------------------------------
    #[error("DNS lookup failed for '{host}': {reason}")]
    Resolution { host: String, reason: String },

    #[error("{registry} query to {url} failed: {reason}")]
    RegistryQuery {
        registry: Registry,
        url: String,
        reason: String,
    },

    // ---------------------------- Parsing -----------------------------------
    #[error("CSV error in {location}: {source}")]
    Csv {
        location: String,
        #[source]
        source: csv::Error,
    },

    // ----------------------------- I/O / FS ---------------------------------
    #[error("I/O error during {operation} on {path}: {source}")]
    Io {
        path: String,
        operation: String,
        #[source]
        source: io::Error,
    },
}

impl EnricherError {
    /// Categorize the error for reporting.
    pub fn category(&self) -> ErrorCategory {
        use EnricherError::*;
        match self {
            MissingColumn { .. } | Table { .. } | Configuration { .. } => ErrorCategory::Input,
            Resolution { .. } | RegistryQuery { .. } => ErrorCategory::Network,
            Csv { .. } => ErrorCategory::Parse,
            Io { .. } => ErrorCategory::Io,
        }
    }

    // ---------------------------- Constructors -----------------------------

    pub fn missing_column(column: impl Into<String>, location: impl Into<String>) -> Self {
        Self::MissingColumn {
            column: column.into(),
            location: location.into(),
        }
    }

    pub fn table(location: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Table {
            location: location.into(),
            reason: reason.into(),
        }
    }

    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    pub fn resolution(host: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Resolution {
            host: host.into(),
            reason: reason.into(),
        }
    }

    pub fn registry_query(
        registry: Registry,
        url: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self::RegistryQuery {
            registry,
            url: url.into(),
            reason: reason.into(),
        }
    }

    pub fn csv(location: impl Into<String>, source: csv::Error) -> Self {
        Self::Csv {
            location: location.into(),
            source,
        }
    }

    pub fn io(path: impl Into<String>, operation: impl Into<String>, source: io::Error) -> Self {
        Self::Io {
            path: path.into(),
            operation: operation.into(),
            source,
        }
    }
}

/// Public result alias.
pub type Result<T> = std::result::Result<T, EnricherError>;

/// Extension trait for enriching IO results with path + operation context.
pub trait IoResultExt<T> {
    fn with_path(self, path: impl Into<String>, operation: impl Into<String>) -> Result<T>;
}

impl<T> IoResultExt<T> for std::result::Result<T, io::Error> {
    fn with_path(self, path: impl Into<String>, operation: impl Into<String>) -> Result<T> {
        self.map_err(|e| EnricherError::io(path.into(), operation.into(), e))
    }
}

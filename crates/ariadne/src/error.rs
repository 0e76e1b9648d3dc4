//! Error types for ariadne queries.
//!
//! Errors are categorized into two main types:
//!
//! - **`Error`**: Failures that end a query (invalid input, missing target, I/O)
//! - **`LoadDiagnostic`**: Project or document failures that are recorded but never halt a scan
//!
//! ## Error Philosophy
//!
//! Real solutions rarely load cleanly, so ariadne works on a "best effort" basis:
//! - A project whose manifest can't be read is skipped, the rest still load
//! - A document that can't be parsed drops out of every scan
//! - Only the query itself (bad input, nothing found) or infrastructure failures
//!   surface as an `Error`
//!
//! ## Error Categorization
//!
//! `LoadDiagnosticKind` uses a 4xx/5xx style categorization:
//! - Input problems (user's fault): unparseable sources, unreadable manifests
//! - Internal problems (our fault): I/O errors

use std::path::PathBuf;
use thiserror::Error;

/// Result type for ariadne operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level error type for ariadne operations.
#[derive(Debug, Error)]
pub enum Error {
    /// A required query argument was missing or empty
    #[error("invalid query: {0}")]
    InvalidQuery(String),

    /// The queried entity does not exist anywhere in the workspace
    #[error("{what} '{query}' not found")]
    NotFound {
        /// What was being looked for ("class", "method", "file", ...)
        what: &'static str,
        /// The literal query input
        query: String,
    },

    /// File system operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Tree-sitter parsing infrastructure failed
    #[error("parser error: {0}")]
    Parser(String),

    /// Invalid configuration file
    #[error("configuration error: {0}")]
    Config(String),

    /// The solution description itself could not be loaded
    #[error("failed to load workspace {}: {message}", path.display())]
    Workspace {
        /// Path that was being loaded
        path: PathBuf,
        /// What went wrong
        message: String,
    },
}

/// Coarse classification of an [`Error`], used for structured outcomes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Required input missing, detected before any scan
    InvalidQuery,
    /// Target absent after a full scan
    NotFound,
    /// Anything else; propagated unchanged for the caller to log
    Internal,
}

impl Error {
    /// Shorthand for a [`Error::NotFound`].
    #[must_use]
    pub fn not_found(what: &'static str, query: impl Into<String>) -> Self {
        Self::NotFound {
            what,
            query: query.into(),
        }
    }

    /// Coarse classification of this error.
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidQuery(_) => ErrorKind::InvalidQuery,
            Self::NotFound { .. } => ErrorKind::NotFound,
            Self::Io(_) | Self::Parser(_) | Self::Config(_) | Self::Workspace { .. } => {
                ErrorKind::Internal
            }
        }
    }

    /// Stable snake-case code for machine-readable failure records.
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidQuery(_) => "invalid_query",
            Self::NotFound { .. } => "not_found",
            Self::Io(_) => "io_error",
            Self::Parser(_) => "parser_error",
            Self::Config(_) => "config_error",
            Self::Workspace { .. } => "workspace_error",
        }
    }
}

/// Reject an empty or whitespace-only query argument.
///
/// # Errors
///
/// Returns [`Error::InvalidQuery`] naming `what` when `value` is blank.
pub fn require(value: &str, what: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(Error::InvalidQuery(format!("{what} is required")));
    }
    Ok(())
}

/// A project or document that dropped out of the workspace.
///
/// Diagnostics are collected while the workspace loads and binds lazily.
/// They never fail a query; scans simply continue over what is left.
#[derive(Debug, Clone)]
pub struct LoadDiagnostic {
    /// Project manifest or source file that failed
    pub path: PathBuf,
    /// Category of the failure
    pub kind: LoadDiagnosticKind,
    /// Human-readable message
    pub message: String,
}

impl std::fmt::Display for LoadDiagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}: {} ({})",
            self.path.display(),
            self.message,
            self.kind
        )
    }
}

impl std::error::Error for LoadDiagnostic {}

/// Categorization of load diagnostics.
///
/// Uses a 4xx/5xx style pattern:
/// - Input problems are issues with the solution's files (user can fix)
/// - Internal problems are environment or ariadne failures
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadDiagnosticKind {
    // === Input Problems (analogous to HTTP 4xx) ===
    /// Tree-sitter produced no tree for the source
    ParseFailed,

    /// File content is not valid UTF-8
    EncodingError,

    /// A project manifest could not be read or is malformed
    ManifestUnreadable,

    // === Internal Problems (analogous to HTTP 5xx) ===
    /// Could not read the file from disk
    IoError,
}

impl std::fmt::Display for LoadDiagnosticKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ParseFailed => write!(f, "parse failed"),
            Self::EncodingError => write!(f, "encoding error"),
            Self::ManifestUnreadable => write!(f, "manifest unreadable"),
            Self::IoError => write!(f, "I/O error"),
        }
    }
}

impl LoadDiagnosticKind {
    /// Returns `true` if this is an input problem (4xx-style).
    #[must_use]
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            Self::ParseFailed | Self::EncodingError | Self::ManifestUnreadable
        )
    }

    /// Returns `true` if this is an internal problem (5xx-style).
    #[must_use]
    pub fn is_internal_error(&self) -> bool {
        matches!(self, Self::IoError)
    }
}

impl LoadDiagnostic {
    /// Create a new diagnostic.
    #[must_use]
    pub fn new(path: PathBuf, kind: LoadDiagnosticKind, message: impl Into<String>) -> Self {
        Self {
            path,
            kind,
            message: message.into(),
        }
    }

    /// Tree-sitter returned no tree.
    #[must_use]
    pub fn parse_failed(path: PathBuf, message: impl Into<String>) -> Self {
        Self::new(path, LoadDiagnosticKind::ParseFailed, message)
    }

    /// Source is not UTF-8.
    #[must_use]
    pub fn encoding_error(path: PathBuf) -> Self {
        Self::new(
            path,
            LoadDiagnosticKind::EncodingError,
            "file is not valid UTF-8",
        )
    }

    /// Project manifest could not be used.
    #[must_use]
    pub fn manifest_unreadable(path: PathBuf, message: impl Into<String>) -> Self {
        Self::new(path, LoadDiagnosticKind::ManifestUnreadable, message)
    }

    /// Reading the file failed.
    #[must_use]
    pub fn io_error(path: PathBuf, error: &std::io::Error) -> Self {
        Self::new(path, LoadDiagnosticKind::IoError, error.to_string())
    }
}

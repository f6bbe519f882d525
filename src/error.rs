//! Error types for installer builds.
//!
//! Configuration problems are caught before any filesystem or subprocess
//! side effect and reported as [`ConfigError`] variants naming the field
//! and offending value. Native tool failures carry the tool's captured
//! stderr verbatim.

use std::{io, path::PathBuf, process::ExitStatus};
use thiserror::Error as DeriveError;

/// Result type alias for installer build operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for all installer build operations.
#[derive(Debug, DeriveError)]
#[non_exhaustive]
pub enum Error {
    /// Invalid or inconsistent build configuration.
    #[error("{0}")]
    Config(#[from] ConfigError),

    /// A required native tool is not on the search path.
    ///
    /// Raised by the pre-flight dependency check before any staging begins.
    #[error("required tool '{tool}' not found on PATH")]
    ToolMissing {
        /// Name of the missing executable
        tool: &'static str,
    },

    /// A native tool could not be spawned.
    #[error("failed to run {tool}: {error}")]
    CommandFailed {
        /// Tool that failed to execute
        tool: String,
        /// The underlying spawn error
        error: io::Error,
    },

    /// A native tool ran but exited non-zero.
    ///
    /// The captured standard error text is surfaced verbatim; the build
    /// directory is left as-is for inspection.
    #[error("{tool} failed ({status}): {stderr}")]
    ToolFailed {
        /// Tool that failed
        tool: String,
        /// Exit status of the process
        status: ExitStatus,
        /// Captured standard error text
        stderr: String,
    },

    /// File system error with path context.
    ///
    /// Created by the [`ErrorExt`] trait's `fs_context` method.
    #[error("{context} {path}: {error}")]
    Fs {
        /// Operation being performed (e.g. "copying install file")
        context: &'static str,
        /// Path that was being accessed
        path: PathBuf,
        /// The underlying I/O error
        error: io::Error,
    },

    /// Template parse or render failure, naming the template.
    #[error("template '{name}': {reason}")]
    Template {
        /// Template name or source path
        name: String,
        /// Description of the failure
        reason: String,
    },

    /// Generic I/O error.
    #[error("{0}")]
    Io(#[from] io::Error),

    /// TOML parsing error from a configuration file.
    #[error("{0}")]
    Toml(#[from] toml::de::Error),

    /// Error walking a directory during payload staging.
    #[error("{0}")]
    Walkdir(#[from] walkdir::Error),

    /// Path prefix stripping error.
    #[error("{0}")]
    StripPrefix(#[from] std::path::StripPrefixError),
}

/// Configuration validation errors.
///
/// Each variant names the offending field and value. Validation is
/// field-by-field and fails fast on the first violated constraint.
#[derive(Debug, DeriveError)]
#[non_exhaustive]
pub enum ConfigError {
    /// App name missing or empty.
    #[error("app name must be provided")]
    MissingApp,

    /// Version missing or empty.
    #[error("version must be provided")]
    MissingVersion,

    /// Both an uninstall script and the no-uninstall flag were given.
    #[error("cannot specify both 'uninstall' and 'no_uninstall'")]
    UninstallConflict,

    /// A path field has an extension outside its allowed set.
    #[error("{field} file '{path}' must have extension {expected}")]
    BadExtension {
        /// Field name
        field: &'static str,
        /// Offending path
        path: PathBuf,
        /// Human-readable allowed extension set
        expected: &'static str,
    },

    /// A path that must be absolute is not.
    #[error("{field} path '{path}' must be an absolute path")]
    NotAbsolute {
        /// Field name
        field: &'static str,
        /// Offending path
        path: PathBuf,
    },

    /// A path that must exist does not.
    #[error("{field} '{path}' does not exist")]
    MissingPath {
        /// Field name
        field: &'static str,
        /// Offending path
        path: PathBuf,
    },

    /// A chmod mode string is not 3 or 4 octal digits.
    #[error("invalid chmod mode '{mode}': expected 3 or 4 octal digits")]
    BadChmodMode {
        /// Offending mode string
        mode: String,
    },

    /// An environment variable referenced with the `$NAME` convention is unset.
    #[error("environment variable '{name}' is not set")]
    UnsetEnvVar {
        /// Variable name (without the leading `$`)
        name: String,
    },

    /// The signing identity is not known to the system keychain.
    #[error("signing identity '{identity}' not found in keychain")]
    UnknownIdentity {
        /// Resolved identity string
        identity: String,
    },
}

/// Extension trait for filesystem operations with automatic path context.
///
/// Wraps I/O errors with the path that caused them for better diagnostics.
pub trait ErrorExt<T> {
    /// Add filesystem context to an I/O error.
    ///
    /// The `context` should be a present-tense verb phrase describing the
    /// operation, e.g. "reading template file", "creating build directory".
    fn fs_context(self, context: &'static str, path: impl Into<PathBuf>) -> Result<T>;
}

impl<T> ErrorExt<T> for std::result::Result<T, io::Error> {
    fn fs_context(self, context: &'static str, path: impl Into<PathBuf>) -> Result<T> {
        self.map_err(|error| Error::Fs {
            context,
            path: path.into(),
            error,
        })
    }
}

//! Progress reporting capability.
//!
//! Staging and the package driver emit "Created <path>" style progress
//! through an injected [`Reporter`] rather than a hardcoded output stream.
//! The default discards everything, so library callers get silence unless
//! they opt in; the CLI installs a [`ConsoleReporter`].

/// Receives human-readable progress messages during a build.
pub trait Reporter: Send + Sync {
    /// Report one progress message.
    fn report(&self, message: &str);
}

/// Discards all progress messages. The default.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullReporter;

impl Reporter for NullReporter {
    fn report(&self, _message: &str) {}
}

/// Prints progress messages to standard output.
#[derive(Debug, Default, Clone, Copy)]
pub struct ConsoleReporter;

impl Reporter for ConsoleReporter {
    fn report(&self, message: &str) {
        println!("{message}");
    }
}

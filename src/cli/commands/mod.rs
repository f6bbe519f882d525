//! Subcommand implementations.

mod build;

pub use build::build;

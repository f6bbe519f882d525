//! macpkg - macOS installer package builder.
//!
//! This binary assembles a distributable .pkg installer from a declarative
//! description, shelling out to the native packaging and signing tools.

use std::process;

#[tokio::main]
async fn main() {
    // Initialize logging
    env_logger::init();

    // Run CLI and get exit code
    let exit_code = match macpkg::cli::run().await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {}", e);
            1
        }
    };

    process::exit(exit_code);
}

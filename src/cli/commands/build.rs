//! The `build` subcommand: resolve configuration and drive one full build.

use crate::builder::{self, ConsoleReporter, InstallerBuilder};
use crate::cli::BuildArgs;
use crate::config::{self, BuildSpec};
use crate::error::Result;

/// Run one installer build from CLI flags plus any configuration files in
/// the working directory.
pub async fn build(args: BuildArgs) -> Result<()> {
    builder::check_dependencies()?;

    let cwd = std::env::current_dir()?;
    let mut raw = args.into_raw();
    if let Some(local) = config::load_package_config(&cwd)? {
        log::debug!("applying defaults from {}", config::PACKAGE_CONFIG_FILE);
        raw = raw.or_defaults(local);
    }
    if let Some(manifest) = config::load_manifest_config(&cwd)? {
        log::debug!("applying defaults from Cargo.toml [package.metadata.macpkg]");
        raw = raw.or_defaults(manifest);
    }

    let spec = BuildSpec::resolve(raw).await?;

    InstallerBuilder::new(spec)
        .reporter(Box::new(ConsoleReporter))
        .build()
        .await?;

    Ok(())
}

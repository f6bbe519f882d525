//! Installer build orchestration.
//!
//! [`InstallerBuilder`] drives one build end to end: stage the build tree,
//! build the component package, build the distributable product, optionally
//! sign and verify it, and copy the artifact to its destination. Every step
//! is a single blocking external-process call chained strictly in sequence;
//! a failing step aborts immediately and leaves the build tree as-is for
//! inspection.
//!
//! At most one build may run at a time per build directory; the tree is an
//! exclusively-owned resource for the duration of the call.

mod reporter;
pub mod stage;
pub mod tools;

pub use reporter::{ConsoleReporter, NullReporter, Reporter};
pub use stage::BuildTree;
pub use tools::{ToolInvocation, check_dependencies};

use crate::config::BuildSpec;
use crate::error::Result;
use crate::template::Renderer;
use crate::util::fs;
use std::path::PathBuf;

/// Builds one installer package from a validated [`BuildSpec`].
///
/// # Examples
///
/// ```no_run
/// use macpkg::{BuildSpec, InstallerBuilder, config::RawConfig};
///
/// # async fn example() -> macpkg::Result<()> {
/// let spec = BuildSpec::resolve(RawConfig {
///     app: Some("MyApp".into()),
///     version: Some("1.0.0".into()),
///     ..Default::default()
/// })
/// .await?;
///
/// let artifact = InstallerBuilder::new(spec).build().await?;
/// println!("created {}", artifact.display());
/// # Ok(())
/// # }
/// ```
pub struct InstallerBuilder {
    spec: BuildSpec,
    reporter: Box<dyn Reporter>,
}

impl InstallerBuilder {
    /// Create a builder with the default (silent) reporter.
    pub fn new(spec: BuildSpec) -> Self {
        Self {
            spec,
            reporter: Box::new(NullReporter),
        }
    }

    /// Install a progress reporter.
    pub fn reporter(mut self, reporter: Box<dyn Reporter>) -> Self {
        self.reporter = reporter;
        self
    }

    /// The spec this builder was constructed with.
    pub fn spec(&self) -> &BuildSpec {
        &self.spec
    }

    /// Run the build and return the path of the final artifact.
    pub async fn build(&self) -> Result<PathBuf> {
        let spec = &self.spec;
        let reporter = self.reporter.as_ref();
        let tree = BuildTree::new(spec);
        let renderer = Renderer::new();

        reporter.report(&format!(
            "Building installer package for {} version {}.",
            spec.app, spec.version
        ));
        log::info!("building {} {}", spec.app, spec.version);

        stage::stage(spec, &tree, &renderer, reporter).await?;

        reporter.report("Building the macOS installer package");
        tools::build_package(spec, &tree, reporter).await?;

        reporter.report("Building the macOS installer product");
        let product = tools::build_product(&tree, reporter).await?;

        let artifact = match &spec.sign {
            Some(identity) => {
                reporter.report(&format!(
                    "Signing the installer package with certificate ID: {identity}"
                ));
                let signed = tree.signed_product();
                fs::create_dir_0755(&tree.signed_dir()).await?;
                tools::sign_product(&product, &signed, identity, reporter).await?;
                signed
            }
            None => product,
        };

        let target = spec.output_path();
        reporter.report(&format!(
            "Copying installer package to target: {}",
            target.display()
        ));
        fs::copy_file(&artifact, &target).await?;

        reporter.report(&format!("Created {}", target.display()));
        reporter.report("Done!");
        log::info!("✓ created installer package: {}", target.display());

        Ok(target)
    }
}

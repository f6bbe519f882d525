//! Native tool invocation.
//!
//! Every external step is a [`ToolInvocation`]: an executable name and an
//! argument list, run to completion with stdout and stderr captured. Exit
//! code zero is success; anything else aborts the build with the tool's
//! captured stderr surfaced verbatim. There are no retries and no cleanup.

use super::{BuildTree, Reporter};
use crate::config::BuildSpec;
use crate::error::{Error, Result};
use std::ffi::{OsStr, OsString};
use std::path::{Path, PathBuf};

/// Builds the intermediate component package.
pub const PKGBUILD: &str = "pkgbuild";
/// Builds the distributable product from the Distribution descriptor.
pub const PRODUCTBUILD: &str = "productbuild";
/// Signs the product artifact.
pub const PRODUCTSIGN: &str = "productsign";
/// Verifies package signatures.
pub const PKGUTIL: &str = "pkgutil";

/// The native executables a build shells out to.
const REQUIRED_TOOLS: [&str; 4] = [PKGBUILD, PRODUCTBUILD, PRODUCTSIGN, PKGUTIL];

/// One blocking external-process invocation.
#[derive(Debug, Clone)]
pub struct ToolInvocation {
    tool: &'static str,
    args: Vec<OsString>,
}

impl ToolInvocation {
    /// Start an invocation of the named tool.
    pub fn new(tool: &'static str) -> Self {
        Self {
            tool,
            args: Vec::new(),
        }
    }

    /// Append one argument.
    pub fn arg(mut self, arg: impl AsRef<OsStr>) -> Self {
        self.args.push(arg.as_ref().to_os_string());
        self
    }

    /// The tool name.
    pub fn tool(&self) -> &str {
        self.tool
    }

    /// The argument vector as built so far.
    pub fn args(&self) -> &[OsString] {
        &self.args
    }

    /// Run to completion, capturing output.
    ///
    /// A non-zero exit aborts with [`Error::ToolFailed`] carrying the
    /// captured stderr.
    pub async fn run(&self) -> Result<()> {
        log::debug!("running {} {:?}", self.tool, self.args);
        let output = tokio::process::Command::new(self.tool)
            .args(&self.args)
            .output()
            .await
            .map_err(|error| Error::CommandFailed {
                tool: self.tool.to_string(),
                error,
            })?;

        if !output.status.success() {
            return Err(Error::ToolFailed {
                tool: self.tool.to_string(),
                status: output.status,
                stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            });
        }

        Ok(())
    }
}

/// Confirm the native tools are resolvable on the search path.
///
/// Fails fast naming the first missing tool, before any staging begins.
pub fn check_dependencies() -> Result<()> {
    for tool in REQUIRED_TOOLS {
        which::which(tool).map_err(|_| Error::ToolMissing { tool })?;
    }
    Ok(())
}

/// The pkgbuild invocation for the staged tree.
pub fn pkgbuild_invocation(spec: &BuildSpec, tree: &BuildTree) -> ToolInvocation {
    ToolInvocation::new(PKGBUILD)
        .arg("--identifier")
        .arg(&spec.identifier)
        .arg("--version")
        .arg(&spec.version)
        .arg("--scripts")
        .arg(tree.scripts())
        .arg("--root")
        .arg(tree.darwinpkg())
        .arg(tree.intermediate_package())
}

/// The productbuild invocation for the staged tree.
pub fn productbuild_invocation(tree: &BuildTree) -> ToolInvocation {
    ToolInvocation::new(PRODUCTBUILD)
        .arg("--distribution")
        .arg(tree.distribution())
        .arg("--resources")
        .arg(tree.resources())
        .arg("--package-path")
        .arg(tree.package_dir())
        .arg(tree.product())
}

/// The productsign invocation for a product artifact.
pub fn productsign_invocation(product: &Path, signed: &Path, identity: &str) -> ToolInvocation {
    ToolInvocation::new(PRODUCTSIGN)
        .arg("--sign")
        .arg(format!("Developer ID Installer: {identity}"))
        .arg(product)
        .arg(signed)
}

/// Build the intermediate package from the staged tree.
pub async fn build_package(
    spec: &BuildSpec,
    tree: &BuildTree,
    reporter: &dyn Reporter,
) -> Result<PathBuf> {
    pkgbuild_invocation(spec, tree).run().await?;
    let package = tree.intermediate_package();
    reporter.report(&format!("Created {}", package.display()));
    Ok(package)
}

/// Build the distributable product from the intermediate package.
pub async fn build_product(tree: &BuildTree, reporter: &dyn Reporter) -> Result<PathBuf> {
    productbuild_invocation(tree).run().await?;
    let product = tree.product();
    reporter.report(&format!("Created {}", product.display()));
    Ok(product)
}

/// Sign the product artifact and verify the resulting signature.
///
/// A verification failure fails the whole build.
pub async fn sign_product(
    product: &Path,
    signed: &Path,
    identity: &str,
    reporter: &dyn Reporter,
) -> Result<()> {
    productsign_invocation(product, signed, identity).run().await?;
    reporter.report(&format!(
        "Signed {} to {}",
        product.display(),
        signed.display()
    ));

    ToolInvocation::new(PKGUTIL)
        .arg("--check-signature")
        .arg(signed)
        .run()
        .await?;
    reporter.report(&format!("Checked signature of {}", signed.display()));

    Ok(())
}

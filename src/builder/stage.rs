//! Build tree layout and staging.
//!
//! The build tree has a fixed sub-layout the native tools expect:
//!
//! ```text
//! <tree>/Resources/      welcome.html, conclusion.html, LICENSE.txt, banner.png
//! <tree>/scripts/        preinstall, postinstall, links, custom_* scripts
//! <tree>/darwinpkg/      install payload root (plus the uninstall script)
//! <tree>/package/        intermediate package artifact
//! <tree>/pkg/            final product artifact
//! <tree>/pkg-signed/     signed artifact, when signing is requested
//! <tree>/Distribution    product descriptor
//! ```
//!
//! Staging destroys any previous contents of the tree, then renders and
//! copies everything the driver needs. A failure partway through leaves
//! the partially populated tree in place for inspection.

use super::Reporter;
use crate::config::BuildSpec;
use crate::error::Result;
use crate::template::{Renderer, builtin};
use crate::util::fs;
use std::path::{Path, PathBuf};

/// Paths of one staged build tree.
#[derive(Debug, Clone)]
pub struct BuildTree {
    root: PathBuf,
    app: String,
    version: String,
}

impl BuildTree {
    /// Tree layout for the given spec.
    pub fn new(spec: &BuildSpec) -> Self {
        Self {
            root: spec.tree_root(),
            app: spec.app.clone(),
            version: spec.version.clone(),
        }
    }

    /// Root of the tree.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Installer resources (HTML pages, license, banner).
    pub fn resources(&self) -> PathBuf {
        self.root.join("Resources")
    }

    /// Installer scripts consumed by pkgbuild.
    pub fn scripts(&self) -> PathBuf {
        self.root.join("scripts")
    }

    /// Install payload root.
    pub fn darwinpkg(&self) -> PathBuf {
        self.root.join("darwinpkg")
    }

    /// Directory holding the intermediate package artifact.
    pub fn package_dir(&self) -> PathBuf {
        self.root.join("package")
    }

    /// Directory holding the final product artifact.
    pub fn product_dir(&self) -> PathBuf {
        self.root.join("pkg")
    }

    /// Directory holding the signed artifact.
    pub fn signed_dir(&self) -> PathBuf {
        self.root.join("pkg-signed")
    }

    /// The product Distribution descriptor.
    pub fn distribution(&self) -> PathBuf {
        self.root.join("Distribution")
    }

    /// Intermediate package artifact built by pkgbuild.
    pub fn intermediate_package(&self) -> PathBuf {
        self.package_dir().join(format!("{}.pkg", self.app))
    }

    /// Final product artifact built by productbuild.
    pub fn product(&self) -> PathBuf {
        self.product_dir()
            .join(format!("{}-{}.pkg", self.app, self.version))
    }

    /// Signed copy of the product artifact.
    pub fn signed_product(&self) -> PathBuf {
        self.signed_dir()
            .join(format!("{}-{}.pkg", self.app, self.version))
    }

    /// Where the uninstall script lands inside the payload.
    pub fn uninstall_script(&self) -> PathBuf {
        self.darwinpkg()
            .join("Library")
            .join("Application Support")
            .join(&self.app)
            .join(&self.version)
            .join("uninstall.sh")
    }
}

/// Populate the build tree from a validated spec.
///
/// Previous contents of the tree are destroyed first; the five top-level
/// sub-directories are then created with mode 0755 and every artifact the
/// package driver reads is rendered or copied into place.
pub async fn stage(
    spec: &BuildSpec,
    tree: &BuildTree,
    renderer: &Renderer,
    reporter: &dyn Reporter,
) -> Result<()> {
    let data = spec.template_data();

    reporter.report(&format!("Cleaning build directory: {}", tree.root().display()));
    fs::clean_dir(tree.root()).await?;

    reporter.report("Creating build directories");
    create_build_dirs(tree, reporter).await?;

    reporter.report("Creating welcome.html");
    renderer
        .render_html_page(
            spec.welcome.as_deref(),
            "welcome.md",
            builtin::WELCOME_MD,
            &data,
            &tree.resources().join("welcome.html"),
        )
        .await?;

    reporter.report("Creating conclusion.html");
    renderer
        .render_html_page(
            spec.conclusion.as_deref(),
            "conclusion.md",
            builtin::CONCLUSION_MD,
            &data,
            &tree.resources().join("conclusion.html"),
        )
        .await?;

    if let Some(license) = &spec.license {
        reporter.report("Copying license file");
        let target = tree.resources().join("LICENSE.txt");
        fs::copy_file(license, &target).await?;
        reporter.report(&format!("Created {}", target.display()));
    }

    reporter.report("Copying install files");
    for mapping in &spec.install {
        stage_install_files(&mapping.source, &mapping.dest, tree, reporter).await?;
    }

    if !spec.no_uninstall {
        reporter.report("Creating uninstall script");
        let target = tree.uninstall_script();
        match &spec.uninstall {
            Some(script) => renderer.render_user_file(script, &data, &target).await?,
            None => {
                renderer
                    .render_file("uninstall.sh", builtin::UNINSTALL_SH, &data, &target)
                    .await?
            }
        }
        fs::make_executable(&target).await?;
        reporter.report(&format!("Created {}", target.display()));
    }

    reporter.report("Creating pre- and post-install scripts");
    for (name, template) in [
        ("preinstall", builtin::PREINSTALL),
        ("postinstall", builtin::POSTINSTALL),
        ("links", builtin::LINKS),
    ] {
        let target = tree.scripts().join(name);
        renderer.render_file(name, template, &data, &target).await?;
        fs::make_executable(&target).await?;
        reporter.report(&format!("Created {}", target.display()));
    }

    if let Some(script) = &spec.pre_install {
        let target = tree.scripts().join("custom_preinstall");
        renderer.render_user_file(script, &data, &target).await?;
        fs::make_executable(&target).await?;
        reporter.report(&format!("Created {}", target.display()));
    }

    if let Some(script) = &spec.post_install {
        let target = tree.scripts().join("custom_postinstall");
        renderer.render_user_file(script, &data, &target).await?;
        fs::make_executable(&target).await?;
        reporter.report(&format!("Created {}", target.display()));
    }

    if let Some(banner) = &spec.banner {
        reporter.report("Copying banner image");
        let target = tree.resources().join("banner.png");
        fs::copy_file(banner, &target).await?;
        reporter.report(&format!("Created {}", target.display()));
    }

    reporter.report("Creating distribution file");
    let target = tree.distribution();
    renderer
        .render_file("Distribution", builtin::DISTRIBUTION, &data, &target)
        .await?;
    fs::make_executable(&target).await?;
    reporter.report(&format!("Created {}", target.display()));

    Ok(())
}

/// Create the five top-level sub-directories with mode 0755.
async fn create_build_dirs(tree: &BuildTree, reporter: &dyn Reporter) -> Result<()> {
    fs::create_dir_0755(tree.root()).await?;
    for dir in [
        tree.resources(),
        tree.scripts(),
        tree.darwinpkg(),
        tree.package_dir(),
        tree.product_dir(),
    ] {
        fs::create_dir_0755(&dir).await?;
        reporter.report(&format!("Created {}", dir.display()));
    }
    Ok(())
}

/// Copy one install mapping into the payload root.
///
/// An absolute destination maps under `darwinpkg/` by stripping exactly one
/// leading slash; a file source is copied (creating parents), a directory
/// source is copied recursively.
async fn stage_install_files(
    source: &Path,
    dest: &Path,
    tree: &BuildTree,
    reporter: &dyn Reporter,
) -> Result<()> {
    let relative = dest.strip_prefix("/").unwrap_or(dest);
    let target = tree.darwinpkg().join(relative);

    if source.is_file() {
        fs::copy_file(source, &target).await?;
    } else {
        fs::copy_dir(source, &target).await?;
    }
    reporter.report(&format!(
        "Copied {} to {}",
        source.display(),
        target.display()
    ));
    Ok(())
}

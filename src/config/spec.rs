//! The validated build configuration.

use super::{RawConfig, identity};
use crate::error::{ConfigError, Result};
use crate::template::Renderer;
use serde::Serialize;
use std::path::{Path, PathBuf};

/// Root directory the default build tree and default output live under.
pub const DEFAULT_BUILD_ROOT: &str = "build";

/// Identifier used when none is configured.
const DEFAULT_IDENTIFIER: &str = "org.{{ app }}.{{ version }}";

/// Sub-path of the build root the tree is staged under.
const TREE_SUBDIR: &str = "macpkg/darwin";

/// Extensions accepted for the welcome and conclusion pages.
const PAGE_EXTENSIONS: &[&str] = &["md", "markdown", "html"];
const PAGE_EXPECTED: &str = ".md, .markdown, or .html";

/// A (name, url) pair linked from the conclusion page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UrlLink {
    /// Display name of the link
    pub name: String,
    /// Link target
    pub url: String,
}

/// A (source, destination) install mapping.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InstallMapping {
    /// File or directory to install, relative to the working directory
    pub source: PathBuf,
    /// Absolute destination on the target filesystem
    pub dest: PathBuf,
}

/// A (source, target) symlink created after installation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LinkMapping {
    /// Absolute path the link points at
    pub source: PathBuf,
    /// Absolute path of the link itself
    pub target: PathBuf,
}

/// A chmod directive applied after installation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChmodEntry {
    /// Octal mode string, 3 or 4 digits
    pub mode: String,
    /// Absolute path the mode is applied to
    pub path: PathBuf,
}

/// Fully validated configuration for one installer build.
///
/// Constructed once per invocation by [`BuildSpec::resolve`], then consumed
/// read-only by staging and the package driver. Destination-like fields
/// (identifier, install destinations, link endpoints, build directory,
/// output path) have template variables already rendered.
#[derive(Debug, Clone)]
pub struct BuildSpec {
    /// App name shown in the installer.
    pub app: String,
    /// App version.
    pub version: String,
    /// Package identifier, rendered.
    pub identifier: String,
    /// Welcome page source (Markdown or HTML), if customized.
    pub welcome: Option<PathBuf>,
    /// Conclusion page source (Markdown or HTML), if customized.
    pub conclusion: Option<PathBuf>,
    /// Custom uninstall script template, if any.
    pub uninstall: Option<PathBuf>,
    /// Omit the uninstall script entirely.
    pub no_uninstall: bool,
    /// Links shown on the conclusion page.
    pub url: Vec<UrlLink>,
    /// Install payload mappings, destinations rendered.
    pub install: Vec<InstallMapping>,
    /// Post-install symlinks, both endpoints rendered.
    pub link: Vec<LinkMapping>,
    /// License file copied into the installer, if any.
    pub license: Option<PathBuf>,
    /// PNG banner image, if any.
    pub banner: Option<PathBuf>,
    /// Custom pre-install script template, if any.
    pub pre_install: Option<PathBuf>,
    /// Custom post-install script template, if any.
    pub post_install: Option<PathBuf>,
    /// Post-install chmod directives.
    pub chmod: Vec<ChmodEntry>,
    /// Resolved signing certificate identifier, if signing was requested.
    pub sign: Option<String>,
    /// Explicit output path, rendered.
    pub output: Option<PathBuf>,
    /// User-supplied build directory root, rendered.
    pub build_dir: Option<PathBuf>,
}

/// The current CPU architecture, available as `{{ machine }}` in templates.
pub fn machine() -> &'static str {
    std::env::consts::ARCH
}

impl BuildSpec {
    /// Validate, normalize, and template-render a merged [`RawConfig`].
    ///
    /// Validation is field-by-field and fails fast on the first violated
    /// constraint, before any filesystem or subprocess side effect for
    /// that field. Template rendering of destination-like fields happens
    /// after validation; existence checks on the build directory and the
    /// output parent run against the rendered paths.
    pub async fn resolve(raw: RawConfig) -> Result<BuildSpec> {
        let app = raw
            .app
            .filter(|s| !s.is_empty())
            .ok_or(ConfigError::MissingApp)?;
        let version = raw
            .version
            .filter(|s| !s.is_empty())
            .ok_or(ConfigError::MissingVersion)?;

        if raw.no_uninstall && raw.uninstall.is_some() {
            return Err(ConfigError::UninstallConflict.into());
        }

        if let Some(welcome) = &raw.welcome {
            check_extension("welcome", welcome, PAGE_EXTENSIONS, PAGE_EXPECTED)?;
        }
        if let Some(conclusion) = &raw.conclusion {
            check_extension("conclusion", conclusion, PAGE_EXTENSIONS, PAGE_EXPECTED)?;
        }
        if let Some(uninstall) = &raw.uninstall {
            check_extension("uninstall", uninstall, &["sh"], ".sh")?;
        }
        if let Some(license) = &raw.license {
            if !license.exists() {
                return Err(ConfigError::MissingPath {
                    field: "license",
                    path: license.clone(),
                }
                .into());
            }
        }
        for (source, dest) in &raw.install {
            if !source.exists() {
                return Err(ConfigError::MissingPath {
                    field: "install source",
                    path: source.clone(),
                }
                .into());
            }
            check_absolute("install destination", dest)?;
        }
        for (source, target) in &raw.link {
            check_absolute("link source", source)?;
            check_absolute("link target", target)?;
        }
        if let Some(banner) = &raw.banner {
            check_extension("banner", banner, &["png"], ".png")?;
        }
        for (mode, path) in &raw.chmod {
            if !valid_chmod_mode(mode) {
                return Err(ConfigError::BadChmodMode { mode: mode.clone() }.into());
            }
            check_absolute("chmod path", path)?;
        }

        let sign = match &raw.sign {
            Some(value) => {
                let resolved = identity::resolve_identity(value)?;
                identity::verify_identity(&resolved).await?;
                Some(resolved)
            }
            None => None,
        };

        // Render template variables in destination-like fields.
        let renderer = Renderer::new();
        let vars = serde_json::json!({
            "app": app,
            "version": version,
            "machine": machine(),
        });

        let identifier = renderer.render_str(
            "identifier",
            raw.identifier.as_deref().unwrap_or(DEFAULT_IDENTIFIER),
            &vars,
        )?;

        let install = raw
            .install
            .into_iter()
            .map(|(source, dest)| {
                Ok(InstallMapping {
                    source,
                    dest: render_path(&renderer, "install destination", &dest, &vars)?,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        let link = raw
            .link
            .into_iter()
            .map(|(source, target)| {
                Ok(LinkMapping {
                    source: render_path(&renderer, "link source", &source, &vars)?,
                    target: render_path(&renderer, "link target", &target, &vars)?,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        let build_dir = match &raw.build_dir {
            Some(dir) => Some(render_path(&renderer, "build_dir", dir, &vars)?),
            None => None,
        };
        if let Some(dir) = &build_dir {
            if !dir.exists() {
                return Err(ConfigError::MissingPath {
                    field: "build_dir",
                    path: dir.clone(),
                }
                .into());
            }
        }

        let output = match &raw.output {
            Some(path) => Some(render_path(&renderer, "output", path, &vars)?),
            None => None,
        };
        if let Some(path) = &output {
            if let Some(parent) = path.parent() {
                if !parent.as_os_str().is_empty() && !parent.exists() {
                    return Err(ConfigError::MissingPath {
                        field: "output parent",
                        path: parent.to_path_buf(),
                    }
                    .into());
                }
            }
        }

        Ok(BuildSpec {
            app,
            version,
            identifier,
            welcome: raw.welcome,
            conclusion: raw.conclusion,
            uninstall: raw.uninstall,
            no_uninstall: raw.no_uninstall,
            url: raw
                .url
                .into_iter()
                .map(|(name, url)| UrlLink { name, url })
                .collect(),
            install,
            link,
            license: raw.license,
            banner: raw.banner,
            pre_install: raw.pre_install,
            post_install: raw.post_install,
            chmod: raw
                .chmod
                .into_iter()
                .map(|(mode, path)| ChmodEntry { mode, path })
                .collect(),
            sign,
            output,
            build_dir,
        })
    }

    /// Root of the staged build tree.
    ///
    /// `<build_dir>/macpkg/darwin`, where `build_dir` defaults to the fixed
    /// build root. A reused directory only ever has this sub-tree cleaned.
    pub fn tree_root(&self) -> PathBuf {
        self.build_dir
            .as_deref()
            .unwrap_or(Path::new(DEFAULT_BUILD_ROOT))
            .join(TREE_SUBDIR)
    }

    /// File name of the final product artifact.
    pub fn product_file_name(&self) -> String {
        format!("{}-{}.pkg", self.app, self.version)
    }

    /// Where the final artifact is copied to.
    pub fn output_path(&self) -> PathBuf {
        self.output
            .clone()
            .unwrap_or_else(|| Path::new(DEFAULT_BUILD_ROOT).join(self.product_file_name()))
    }

    /// The variable mapping script and descriptor templates render against.
    pub fn template_data(&self) -> serde_json::Value {
        serde_json::json!({
            "app": self.app,
            "version": self.version,
            "machine": machine(),
            "identifier": self.identifier,
            "uninstall": !self.no_uninstall,
            "url": self.url,
            "install": self.install,
            "link": self.link,
            "chmod": self.chmod,
            "license": self.license.is_some(),
            "banner": self.banner.is_some(),
            "pre_install": self.pre_install.is_some(),
            "post_install": self.post_install.is_some(),
        })
    }
}

fn check_extension(
    field: &'static str,
    path: &Path,
    allowed: &[&str],
    expected: &'static str,
) -> Result<()> {
    let matches = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| allowed.iter().any(|a| e.eq_ignore_ascii_case(a)))
        .unwrap_or(false);
    if matches {
        Ok(())
    } else {
        Err(ConfigError::BadExtension {
            field,
            path: path.to_path_buf(),
            expected,
        }
        .into())
    }
}

fn check_absolute(field: &'static str, path: &Path) -> Result<()> {
    if path.is_absolute() {
        Ok(())
    } else {
        Err(ConfigError::NotAbsolute {
            field,
            path: path.to_path_buf(),
        }
        .into())
    }
}

/// A chmod mode must be 3 or 4 octal digits, each 0-7.
fn valid_chmod_mode(mode: &str) -> bool {
    (mode.len() == 3 || mode.len() == 4) && mode.bytes().all(|b| b.is_ascii_digit() && b <= b'7')
}

fn render_path(
    renderer: &Renderer,
    field: &str,
    path: &Path,
    vars: &serde_json::Value,
) -> Result<PathBuf> {
    let rendered = renderer.render_str(field, &path.to_string_lossy(), vars)?;
    Ok(PathBuf::from(rendered))
}

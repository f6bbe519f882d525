//! Raw, unvalidated build configuration and its sources.
//!
//! A [`RawConfig`] can come from three places: CLI flags, a package-local
//! `macpkg.toml`, and the `[package.metadata.macpkg]` table of the project
//! `Cargo.toml`. All three are flat key→value mappings whose keys match the
//! CLI flag names (underscored). Pair-valued fields are arrays of
//! two-element arrays, e.g. `install = [["dist/app", "/usr/local/bin/app"]]`.

use crate::error::{ErrorExt, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Name of the package-local configuration file.
pub const PACKAGE_CONFIG_FILE: &str = "macpkg.toml";

/// One source of build configuration, mirroring the CLI flags.
///
/// All fields are optional; [`BuildSpec::resolve`](crate::BuildSpec::resolve)
/// decides what is required. Sources combine via [`RawConfig::or_defaults`].
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawConfig {
    /// App name.
    pub app: Option<String>,

    /// App version.
    pub version: Option<String>,

    /// Package identifier; may contain `{{ app }}`, `{{ version }}`,
    /// and `{{ machine }}`.
    pub identifier: Option<String>,

    /// Path to the license file.
    pub license: Option<PathBuf>,

    /// Path to the welcome Markdown or HTML file.
    pub welcome: Option<PathBuf>,

    /// Path to the conclusion Markdown or HTML file.
    pub conclusion: Option<PathBuf>,

    /// Path to a custom uninstall shell script.
    pub uninstall: Option<PathBuf>,

    /// Omit the uninstall script from the package entirely.
    #[serde(default)]
    pub no_uninstall: bool,

    /// (name, url) pairs linked from the conclusion page.
    #[serde(default)]
    pub url: Vec<(String, String)>,

    /// (source, absolute destination) install mappings.
    #[serde(default)]
    pub install: Vec<(PathBuf, PathBuf)>,

    /// (absolute source, absolute target) symlinks created after install.
    #[serde(default)]
    pub link: Vec<(PathBuf, PathBuf)>,

    /// Path to a PNG banner image for the installer window.
    pub banner: Option<PathBuf>,

    /// Path to a custom pre-install shell script.
    pub pre_install: Option<PathBuf>,

    /// Path to a custom post-install shell script.
    pub post_install: Option<PathBuf>,

    /// (octal mode, absolute path) directives applied after install.
    #[serde(default)]
    pub chmod: Vec<(String, PathBuf)>,

    /// Signing certificate identifier; `$NAME` reads the environment.
    pub sign: Option<String>,

    /// Build directory root; must exist if given.
    pub build_dir: Option<PathBuf>,

    /// Output path for the final installer package.
    pub output: Option<PathBuf>,
}

impl RawConfig {
    /// Fill gaps in `self` from a lower-precedence source.
    ///
    /// A default is applied only where the field is absent or falsy here:
    /// `None` or empty for scalars, empty for pair lists, `false` for
    /// `no_uninstall`. Defaults fill gaps, never override.
    pub fn or_defaults(mut self, defaults: RawConfig) -> RawConfig {
        fill_string(&mut self.app, defaults.app);
        fill_string(&mut self.version, defaults.version);
        fill_string(&mut self.identifier, defaults.identifier);
        fill_path(&mut self.license, defaults.license);
        fill_path(&mut self.welcome, defaults.welcome);
        fill_path(&mut self.conclusion, defaults.conclusion);
        fill_path(&mut self.uninstall, defaults.uninstall);
        if !self.no_uninstall {
            self.no_uninstall = defaults.no_uninstall;
        }
        fill_vec(&mut self.url, defaults.url);
        fill_vec(&mut self.install, defaults.install);
        fill_vec(&mut self.link, defaults.link);
        fill_path(&mut self.banner, defaults.banner);
        fill_path(&mut self.pre_install, defaults.pre_install);
        fill_path(&mut self.post_install, defaults.post_install);
        fill_vec(&mut self.chmod, defaults.chmod);
        fill_string(&mut self.sign, defaults.sign);
        fill_path(&mut self.build_dir, defaults.build_dir);
        fill_path(&mut self.output, defaults.output);
        self
    }
}

fn fill_string(slot: &mut Option<String>, default: Option<String>) {
    if slot.as_deref().is_none_or(str::is_empty) {
        *slot = default;
    }
}

fn fill_path(slot: &mut Option<PathBuf>, default: Option<PathBuf>) {
    if slot.as_deref().is_none_or(|p| p.as_os_str().is_empty()) {
        *slot = default;
    }
}

fn fill_vec<T>(slot: &mut Vec<T>, default: Vec<T>) {
    if slot.is_empty() {
        *slot = default;
    }
}

/// Load the package-local `macpkg.toml` from `dir`, if present.
pub fn load_package_config(dir: &Path) -> Result<Option<RawConfig>> {
    let path = dir.join(PACKAGE_CONFIG_FILE);
    if !path.exists() {
        return Ok(None);
    }
    let contents =
        std::fs::read_to_string(&path).fs_context("reading configuration file", &path)?;
    let config = toml::from_str(&contents)?;
    Ok(Some(config))
}

/// Load the `[package.metadata.macpkg]` table from `dir`'s `Cargo.toml`,
/// if both exist.
pub fn load_manifest_config(dir: &Path) -> Result<Option<RawConfig>> {
    let path = dir.join("Cargo.toml");
    if !path.exists() {
        return Ok(None);
    }
    let contents = std::fs::read_to_string(&path).fs_context("reading project manifest", &path)?;
    let manifest: toml::Value = toml::from_str(&contents)?;

    let Some(table) = manifest
        .get("package")
        .and_then(|p| p.get("metadata"))
        .and_then(|m| m.get("macpkg"))
    else {
        return Ok(None);
    };

    let config = table.clone().try_into()?;
    Ok(Some(config))
}

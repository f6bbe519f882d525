//! Command line argument parsing.

use crate::config::RawConfig;
use clap::{ArgAction, Parser, Subcommand};
use std::path::PathBuf;

/// macOS installer package builder
#[derive(Parser, Debug)]
#[command(
    name = "macpkg",
    version,
    about = "Build macOS installer packages (.pkg)",
    long_about = "Builds a distributable macOS installer package from a declarative description.

Configuration merges three sources, highest precedence first: command line
flags, a package-local macpkg.toml, and the [package.metadata.macpkg] table
of Cargo.toml. Lower-precedence sources fill gaps, never override.

Usage:
  macpkg build --app MyApp --version 1.0.0 --install dist/myapp /usr/local/bin/myapp
  macpkg build --app MyApp --version 1.0.0 --license LICENSE --sign '$DEVELOPER_ID'

Exit code 0 = installer package exists at the output path."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// Top-level subcommands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Build a macOS installer package
    Build(BuildArgs),
}

/// Flags of the `build` subcommand, mapping 1:1 to the configuration fields.
#[derive(clap::Args, Debug, Default)]
pub struct BuildArgs {
    /// App name
    #[arg(short = 'a', long)]
    pub app: Option<String>,

    /// App version
    #[arg(short = 'v', long)]
    pub version: Option<String>,

    /// Package identifier; may reference {{ app }}, {{ version }}, and
    /// {{ machine }}
    #[arg(long, value_name = "IDENTIFIER")]
    pub identifier: Option<String>,

    /// Path to license file; the user will be prompted to accept it
    #[arg(short = 'l', long, value_name = "PATH")]
    pub license: Option<PathBuf>,

    /// Path to welcome Markdown or HTML file
    #[arg(short = 'w', long, value_name = "PATH")]
    pub welcome: Option<PathBuf>,

    /// Path to conclusion Markdown or HTML file
    #[arg(short = 'c', long, value_name = "PATH")]
    pub conclusion: Option<PathBuf>,

    /// Path to uninstall script; if not provided, one is generated.
    /// See also --no-uninstall
    #[arg(short = 'u', long, value_name = "PATH")]
    pub uninstall: Option<PathBuf>,

    /// Do not include an uninstall script in the package
    #[arg(short = 'U', long)]
    pub no_uninstall: bool,

    /// Link to show on the conclusion page after installation (repeatable)
    #[arg(short = 'L', long, value_names = ["NAME", "URL"], num_args = 2, action = ArgAction::Append)]
    pub url: Vec<String>,

    /// Install FILE_OR_DIR to DEST; DEST must be an absolute path and may
    /// reference {{ app }}, {{ version }}, and {{ machine }} (repeatable)
    #[arg(short = 'i', long, value_names = ["FILE_OR_DIR", "DEST"], num_args = 2, action = ArgAction::Append)]
    pub install: Vec<PathBuf>,

    /// Create a symlink from SRC to TARGET after installation; both must be
    /// absolute paths and may reference template variables (repeatable)
    #[arg(short = 'k', long, value_names = ["SRC", "TARGET"], num_args = 2, action = ArgAction::Append)]
    pub link: Vec<PathBuf>,

    /// Path to PNG banner image for the installer window
    #[arg(short = 'b', long, value_name = "PATH")]
    pub banner: Option<PathBuf>,

    /// Path to pre-install shell script
    #[arg(short = 'p', long, value_name = "PATH")]
    pub pre_install: Option<PathBuf>,

    /// Path to post-install shell script
    #[arg(short = 'P', long, value_name = "PATH")]
    pub post_install: Option<PathBuf>,

    /// Apply octal MODE to absolute PATH after installation (repeatable)
    #[arg(short = 'm', long, value_names = ["MODE", "PATH"], num_args = 2, action = ArgAction::Append)]
    pub chmod: Vec<String>,

    /// Signing certificate ID; '$NAME' reads the environment variable NAME
    #[arg(short = 's', long, value_name = "CERTIFICATE_ID")]
    pub sign: Option<String>,

    /// Build directory; must exist, may reference template variables
    #[arg(short = 'd', long, value_name = "DIR")]
    pub build_dir: Option<PathBuf>,

    /// Output path for the installer package
    #[arg(short = 'o', long, value_name = "PATH")]
    pub output: Option<PathBuf>,
}

impl BuildArgs {
    /// Convert parsed flags into the raw configuration form.
    ///
    /// Pair-valued flags arrive flattened (clap enforces exactly two values
    /// per occurrence) and are re-paired here.
    pub fn into_raw(self) -> RawConfig {
        RawConfig {
            app: self.app,
            version: self.version,
            identifier: self.identifier,
            license: self.license,
            welcome: self.welcome,
            conclusion: self.conclusion,
            uninstall: self.uninstall,
            no_uninstall: self.no_uninstall,
            url: pairs(self.url),
            install: pairs(self.install),
            link: pairs(self.link),
            banner: self.banner,
            pre_install: self.pre_install,
            post_install: self.post_install,
            chmod: self
                .chmod
                .chunks_exact(2)
                .map(|pair| (pair[0].clone(), PathBuf::from(&pair[1])))
                .collect(),
            sign: self.sign,
            build_dir: self.build_dir,
            output: self.output,
        }
    }
}

fn pairs<T: Clone>(values: Vec<T>) -> Vec<(T, T)> {
    values
        .chunks_exact(2)
        .map(|pair| (pair[0].clone(), pair[1].clone()))
        .collect()
}

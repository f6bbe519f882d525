//! Build configuration: raw sources, merging, and the validated [`BuildSpec`].
//!
//! Configuration flows through two stages. [`RawConfig`] mirrors the CLI
//! flags field-for-field and can be loaded from `macpkg.toml` or from the
//! `[package.metadata.macpkg]` table of `Cargo.toml`; sources merge with
//! defined precedence where defaults fill gaps but never override.
//! [`BuildSpec::resolve`] then validates and normalizes every field and
//! renders template variables in destination-like fields, producing the
//! read-only configuration the rest of the build consumes.

mod identity;
mod raw;
mod spec;

pub use identity::{resolve_identity, verify_identity};
pub use raw::{PACKAGE_CONFIG_FILE, RawConfig, load_manifest_config, load_package_config};
pub use spec::{BuildSpec, ChmodEntry, DEFAULT_BUILD_ROOT, InstallMapping, LinkMapping, UrlLink, machine};

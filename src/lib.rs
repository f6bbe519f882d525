//! Build macOS installer packages (.pkg) from a declarative description.
//!
//! macpkg stages install payloads, scripts, and installer resources into a
//! conventional build tree, renders text templates (scripts, HTML pages,
//! the product `Distribution` descriptor) into that tree, then drives the
//! native `pkgbuild`, `productbuild`, and `productsign` tools in sequence,
//! finally copying the signed or unsigned artifact to its destination.
//!
//! It can be used both as a CLI tool and as a library dependency:
//!
//! ```no_run
//! use macpkg::{BuildSpec, InstallerBuilder, config::RawConfig};
//!
//! # async fn example() -> macpkg::Result<()> {
//! let raw = RawConfig {
//!     app: Some("MyApp".into()),
//!     version: Some("1.0.0".into()),
//!     ..Default::default()
//! };
//! let spec = BuildSpec::resolve(raw).await?;
//! let artifact = InstallerBuilder::new(spec).build().await?;
//! println!("created {}", artifact.display());
//! # Ok(())
//! # }
//! ```

pub mod builder;
pub mod cli;
pub mod config;
pub mod error;
pub mod template;
pub mod util;

// Re-export commonly used types
pub use builder::{InstallerBuilder, Reporter};
pub use config::{BuildSpec, RawConfig};
pub use error::{ConfigError, Error, Result};

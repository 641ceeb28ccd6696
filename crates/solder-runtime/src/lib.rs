//! Solder Runtime — bootstrap concerns for Solder-based plugins.
//!
//! This crate provides:
//! - Manifest loading (`ManifestLoader`): plugin metadata from a JSON
//!   manifest file with environment-variable overrides
//! - Logging configuration (`LoggingBuilder`): `tracing-subscriber` setup
//!   with level directives and output formats
//!
//! # Example
//!
//! ```ignore
//! use solder_framework::Plugin;
//! use solder_runtime::{LoggingBuilder, ManifestLoader};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     LoggingBuilder::new().init();
//!
//!     let meta = ManifestLoader::new().file("plugin.json").load()?;
//!     let plugin = Plugin::create(meta);
//!     plugin.run()?;
//!     Ok(())
//! }
//! ```

pub mod error;
pub mod logging;
pub mod manifest;

pub use error::{ManifestError, ManifestResult};
pub use logging::{LogFormat, LoggingBuilder};
pub use manifest::ManifestLoader;

// Re-export tracing for use by other crates
pub use tracing;
pub use tracing_subscriber;

/// Prelude module for convenient imports.
///
/// This provides all the commonly used logging macros:
/// - `trace!`, `debug!`, `info!`, `warn!`, `error!`
/// - `span`, `event`
/// - `Level` for span creation
pub mod prelude {
    pub use tracing::{Level, debug, error, info, span, trace, warn};
}

//! Manifest loader using figment.
//!
//! Loads [`PluginMeta`] from layered sources (lowest to highest priority):
//!
//! 1. Built-in defaults (every field empty)
//! 2. The JSON manifest file (`plugin.json` by default)
//! 3. Environment variables (`SOLDER_*`)
//!
//! # Environment Variable Mapping
//!
//! Environment variables use the `SOLDER_` prefix with `__` as the nesting
//! separator:
//!
//! - `SOLDER_NAME="My Plugin"` → `name = "My Plugin"`
//! - `SOLDER_AUTHOR__NAME=Jo` → `author.name = "Jo"`
//!
//! # Example
//!
//! ```rust,ignore
//! use solder_runtime::ManifestLoader;
//!
//! // Search the working directory for plugin.json:
//! let meta = ManifestLoader::new().load()?;
//!
//! // Load a specific file without env overrides:
//! let meta = ManifestLoader::new()
//!     .file("./meta/plugin.json")
//!     .without_env()
//!     .load()?;
//! ```

use std::path::PathBuf;

use figment::Figment;
use figment::providers::{Env, Format, Json, Serialized};
use tracing::{info, warn};

use solder_framework::PluginMeta;

use crate::error::{ManifestError, ManifestResult};

/// Default manifest file name searched for next to the plugin.
pub const MANIFEST_FILE: &str = "plugin.json";

/// Environment variable prefix for manifest overrides.
const ENV_PREFIX: &str = "SOLDER_";

/// Manifest loader with figment-based multi-source support.
pub struct ManifestLoader {
    /// Specific manifest file to load (overrides search).
    manifest_file: Option<PathBuf>,
    /// Directories searched for [`MANIFEST_FILE`] when no file is set.
    search_paths: Vec<PathBuf>,
    /// Whether to apply environment variable overrides.
    load_env: bool,
}

impl Default for ManifestLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl ManifestLoader {
    /// Creates a loader that searches the working directory and applies
    /// environment overrides.
    pub fn new() -> Self {
        Self {
            manifest_file: None,
            search_paths: vec![PathBuf::from(".")],
            load_env: true,
        }
    }

    /// Loads a specific manifest file instead of searching.
    ///
    /// Unlike a searched file, an explicitly requested file must exist.
    pub fn file(mut self, path: impl Into<PathBuf>) -> Self {
        self.manifest_file = Some(path.into());
        self
    }

    /// Adds a directory to search for [`MANIFEST_FILE`].
    pub fn search_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.search_paths.push(path.into());
        self
    }

    /// Enables environment variable overrides (the default).
    pub fn with_env(mut self) -> Self {
        self.load_env = true;
        self
    }

    /// Disables environment variable overrides.
    pub fn without_env(mut self) -> Self {
        self.load_env = false;
        self
    }

    /// Loads and merges the manifest sources into a [`PluginMeta`].
    pub fn load(&self) -> ManifestResult<PluginMeta> {
        let mut figment = Figment::from(Serialized::defaults(PluginMeta::default()));

        if let Some(path) = &self.manifest_file {
            if !path.exists() {
                return Err(ManifestError::FileNotFound(path.clone()));
            }
            info!(path = %path.display(), "Loading plugin manifest");
            figment = figment.merge(Json::file(path));
        } else if let Some(path) = self.find_manifest() {
            info!(path = %path.display(), "Loading plugin manifest");
            figment = figment.merge(Json::file(path));
        } else {
            warn!("No plugin manifest found, using defaults");
        }

        if self.load_env {
            figment = figment.merge(Env::prefixed(ENV_PREFIX).split("__"));
        }

        Ok(figment.extract()?)
    }

    fn find_manifest(&self) -> Option<PathBuf> {
        self.search_paths
            .iter()
            .map(|dir| dir.join(MANIFEST_FILE))
            .find(|candidate| candidate.exists())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn defaults_apply_when_no_manifest_exists() {
        let dir = tempfile::tempdir().unwrap();
        let meta = ManifestLoader {
            manifest_file: None,
            search_paths: vec![dir.path().to_path_buf()],
            load_env: false,
        }
        .load()
        .unwrap();

        assert_eq!(meta, PluginMeta::default());
    }

    #[test]
    fn a_manifest_file_overrides_the_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(MANIFEST_FILE);
        let mut file = std::fs::File::create(&path).unwrap();
        write!(
            file,
            "{{\"name\": \"Demo\", \"slug\": \"demo\", \"author\": {{\"name\": \"Jo\"}}}}"
        )
        .unwrap();

        let meta = ManifestLoader::new()
            .file(&path)
            .without_env()
            .load()
            .unwrap();

        assert_eq!(meta.name, "Demo");
        assert_eq!(meta.slug, "demo");
        assert_eq!(meta.author.name, "Jo");
        assert_eq!(meta.version, "");
    }

    #[test]
    fn an_explicit_missing_file_is_an_error() {
        let result = ManifestLoader::new()
            .file("/definitely/not/here/plugin.json")
            .load();

        assert!(matches!(result, Err(ManifestError::FileNotFound(_))));
    }

    #[test]
    fn malformed_json_surfaces_as_an_extract_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(MANIFEST_FILE);
        std::fs::write(&path, "{not json").unwrap();

        let result = ManifestLoader::new().file(&path).without_env().load();

        assert!(matches!(result, Err(ManifestError::Extract(_))));
    }

    #[test]
    fn environment_variables_override_the_manifest() {
        // SAFETY: This test is the only one touching SOLDER_SLUG and we
        // clean up immediately after.
        unsafe {
            std::env::set_var("SOLDER_SLUG", "from-env");
        }
        let dir = tempfile::tempdir().unwrap();
        let meta = ManifestLoader {
            manifest_file: None,
            search_paths: vec![dir.path().to_path_buf()],
            load_env: true,
        }
        .load()
        .unwrap();
        unsafe {
            std::env::remove_var("SOLDER_SLUG");
        }

        assert_eq!(meta.slug, "from-env");
    }
}

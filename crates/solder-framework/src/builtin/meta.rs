//! Plugin manifest metadata and the built-in module exposing it.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use solder_core::{Service, ServiceValue, expect_dep};

use crate::module::Module;

/// Plugin author details.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthorMeta {
    pub name: String,
    pub url: String,
}

/// Descriptive metadata for a plugin, typically loaded from its manifest.
///
/// All fields default to empty, so a partial manifest deserialises cleanly;
/// `extra` carries any host- or plugin-specific values the schema does not
/// model.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PluginMeta {
    /// Human-readable plugin name.
    pub name: String,
    /// URL-safe identifier, e.g. `"my-plugin"`.
    pub slug: String,
    /// Short identifier used as a prefix for host-visible names.
    pub short_id: String,
    /// Semver version string.
    pub version: String,
    /// One-line description.
    pub description: String,
    /// Project or documentation URL.
    pub url: String,
    /// Author details.
    pub author: AuthorMeta,
    /// Unmodelled manifest values, passed through verbatim.
    pub extra: serde_json::Value,
}

// ─── MetaModule ──────────────────────────────────────────────────────────────

/// The built-in module exposing manifest metadata as services.
///
/// Registered under the `plugin` key, so other modules reach these as
/// `"@plugin/meta"`, `"@plugin/short_id"`, and so on.
pub struct MetaModule {
    meta: PluginMeta,
}

impl MetaModule {
    /// Creates the module for the given manifest metadata.
    pub fn new(meta: PluginMeta) -> Self {
        Self { meta }
    }
}

impl Module for MetaModule {
    fn factories(&self) -> Vec<(String, Service)> {
        fn field(name: &str, project: fn(&PluginMeta) -> String) -> (String, Service) {
            let service = Service::new(["meta"], move |deps| {
                let meta = expect_dep::<PluginMeta>(deps, 0)?;
                Ok(Arc::new(project(&meta)) as ServiceValue)
            });
            (name.to_string(), service)
        }

        vec![
            ("meta".to_string(), Service::value(self.meta.clone())),
            field("name", |m| m.name.clone()),
            field("slug", |m| m.slug.clone()),
            field("short_id", |m| m.short_id.clone()),
            field("version", |m| m.version.clone()),
            field("description", |m| m.description.clone()),
            field("url", |m| m.url.clone()),
            (
                "author".to_string(),
                Service::new(["meta"], |deps| {
                    let meta = expect_dep::<PluginMeta>(deps, 0)?;
                    Ok(Arc::new(meta.author.clone()) as ServiceValue)
                }),
            ),
            (
                "extra".to_string(),
                Service::new(["meta"], |deps| {
                    let meta = expect_dep::<PluginMeta>(deps, 0)?;
                    Ok(Arc::new(meta.extra.clone()) as ServiceValue)
                }),
            ),
        ]
    }
}

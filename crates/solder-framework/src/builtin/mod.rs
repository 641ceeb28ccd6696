//! Built-in modules seeded into every plugin.
//!
//! [`meta::MetaModule`] exposes manifest metadata as services under the
//! `plugin` key; [`host::HostModule`] provides the shared extension-target
//! lists and registration hooks under the `host` key.

pub mod host;
pub mod meta;

pub use host::{HostModule, Registrable};
pub use meta::{AuthorMeta, MetaModule, PluginMeta};

//! # Solder Framework
//!
//! The module composition and resolution engine of the Solder toolkit.
//!
//! This layer provides:
//! - The [`Module`] contract: factories, extensions, hooks, and a `run`
//!   lifecycle callback
//! - [`ScopedModule`] for namespacing a module's services under a prefix
//! - [`PluginContainer`], the lazy resolver with cycle detection,
//!   memoization, and named-filter post-processing
//! - The [`Plugin`] orchestrator with its builder and compile-time module
//!   discovery
//! - DI helpers for shared lists, overrides, and JSON-file services
//! - The built-in `plugin` (metadata) and `host` (extension-target) modules
//!
//! The framework layer is built on the `solder-core` service model and adds
//! everything needed to compose independently authored modules into one
//! running plugin.

pub mod builtin;
pub mod container;
pub mod di;
pub mod handler;
pub mod module;
pub mod plugin;
pub mod scoped;

pub use builtin::{AuthorMeta, HostModule, MetaModule, PluginMeta, Registrable};
pub use container::PluginContainer;
pub use handler::{DEFAULT_PRIORITY, Handler, HandlerBody, Priority};
pub use module::Module;
pub use plugin::{DEFAULT_DELIMITER, MODULES, ModuleDescriptor, Plugin, PluginBuilder};
pub use scoped::{ScopedContainer, ScopedModule};

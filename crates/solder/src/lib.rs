//! # Solder
//!
//! A dependency-injection and service-wiring toolkit for plugin-based
//! applications.
//!
//! ## Overview
//!
//! Solder composes independently authored plugin *modules* into one running
//! plugin.  Each module contributes service factories, extensions for other
//! modules' services, and handlers for host hooks; everything a module
//! defines lives under its own namespace prefix, and a single container
//! resolves services lazily with cycle detection, memoization, and
//! named-filter post-processing.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────┐  wrap   ┌──────────────┐  compile   ┌─────────────────┐
//! │   Module     │────────▶│ ScopedModule │───────────▶│ PluginContainer │
//! │ (factories,  │         │ ("key/" +    │            │  get(id) / has  │
//! │  extensions, │         │  references) │     ┌─────▶│  cycle detect   │
//! │  hooks, run) │         └──────────────┘     │      └─────────────────┘
//! └──────────────┘                              │
//!                       ┌────────┐   attach + run
//!                       │ Plugin │──────────────┘
//!                       └────────┘───▶ HookRegistry (host actions/filters)
//! ```
//!
//! - **Modules**: the unit of composition; depend only on the `Module` trait
//! - **Scoping**: factory keys and references are rewritten under the
//!   module's key; `@`-prefixed references escape the namespace
//! - **Container**: singleton-per-id resolution with full-chain
//!   circular-dependency reports
//! - **Plugin**: attaches hooks and runs modules in order, with cooperative
//!   `stop()` early termination
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use solder::prelude::*;
//!
//! struct GreeterModule;
//!
//! impl Module for GreeterModule {
//!     fn factories(&self) -> Vec<(String, Service)> {
//!         vec![("greeting".into(), Service::value("hello".to_string()))]
//!     }
//!
//!     fn run(&self, c: &dyn Container, _plugin: &Plugin) -> Result<(), BoxError> {
//!         println!("{}", c.get_as::<String>("greeting")?);
//!         Ok(())
//!     }
//! }
//!
//! fn main() -> Result<(), BoxError> {
//!     let meta = ManifestLoader::new().load()?;
//!     let plugin = Plugin::builder(meta)
//!         .module("greeter", GreeterModule)
//!         .build();
//!     plugin.run()
//! }
//! ```

pub use solder_core as core;
pub use solder_framework as framework;
pub use solder_runtime as runtime;

/// Prelude module for convenient imports.
///
/// ```rust,ignore
/// use solder::prelude::*;
/// ```
pub mod prelude {
    // Service model and lookups
    pub use solder_core::{
        BoxError, Container, ContainerError, ContainerExt, Dep, Extension, HookRegistry, Service,
        ServiceValue, expect_dep,
    };

    // Module composition and the orchestrator
    pub use solder_framework::{
        Handler, Module, ModuleDescriptor, Plugin, PluginBuilder, PluginContainer, PluginMeta,
        Priority, ScopedModule,
    };

    // DI helpers
    pub use solder_framework::di::{extend_list, json_file, override_with, service_list};

    // Module discovery
    pub use solder_framework::plugin::MODULES;

    // Bootstrap
    pub use solder_runtime::{LoggingBuilder, ManifestLoader};
}

//! # Solder Core
//!
//! Foundational types for the Solder service-wiring toolkit.
//!
//! This crate defines the pieces everything else is assembled from:
//!
//! - **Service model**: type-erased service values, dependency references,
//!   and the [`Service`] / [`Extension`] pair that factories and extensions
//!   are expressed as.
//! - **Lookup contract**: the [`Container`] trait implemented by the compiled
//!   container and by scoped adapters, plus typed lookups via
//!   [`ContainerExt`].
//! - **Hook dispatch**: the [`HookRegistry`], a named action/filter dispatcher
//!   with priorities and declared argument counts — the host event system
//!   that handlers attach to.
//! - **Errors**: the [`ContainerError`] taxonomy and the [`BoxError`] alias
//!   used by fallible user callbacks.
//!
//! Higher layers live in `solder-framework` (modules, scoping, the container
//! itself, the plugin orchestrator) and `solder-runtime` (manifest loading
//! and logging setup).

pub mod container;
pub mod error;
pub mod hooks;
pub mod service;

pub use container::{Container, ContainerExt};
pub use error::{BoxError, ContainerError};
pub use hooks::{HookCallback, HookRegistry};
pub use service::{
    Dep, Extension, ExtensionBody, Service, ServiceBody, ServiceValue, expect_dep, resolve_deps,
};

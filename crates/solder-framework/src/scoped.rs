//! Namespace scoping for modules.
//!
//! [`ScopedModule`] decorates a module so every service id it *defines* is
//! namespaced under a prefix, while carefully controlling which id
//! *references* get rewritten:
//!
//! - Factory **keys** are always prefixed — a module owns its factory
//!   namespace.
//! - Factory, extension, and handler **dependencies** are prefixed
//!   individually, recursively through nested services.
//! - Extension **keys** are deliberately left untouched: extensions target
//!   services possibly defined in other modules.
//! - Hook **event names** are never rewritten: they are global coordinates
//!   in the host system, not container-local ids.
//! - A deferred handler **priority** that is a service id is rewritten like
//!   any other reference.
//!
//! References that start with `@` escape the namespace: the marker is
//! stripped and no prefix is applied, so `"@host/registrables"` becomes
//! `"host/registrables"` regardless of the enclosing module's prefix.
//!
//! ```rust,ignore
//! // With prefix "pre/":
//! //   factory "foo" with deps ["bar"]   →  "pre/foo" with deps ["pre/bar"]
//! //   factory "baz" with deps ["@bar"]  →  "pre/baz" with deps ["bar"]
//! ```
//!
//! The transform is total: it is a pure structural rewrite with no failure
//! mode, and inputs it cannot rewrite pass through unchanged.

use std::sync::Arc;

use solder_core::{BoxError, Container, ContainerError, Dep, Extension, Service, ServiceValue};

use crate::handler::{Handler, Priority};
use crate::module::Module;
use crate::plugin::Plugin;

/// Applies `prefix` to `key`, honouring the `@` escape marker.
fn apply_prefix(prefix: &str, key: &str) -> String {
    match key.strip_prefix('@') {
        Some(external) => external.to_string(),
        None => format!("{prefix}{key}"),
    }
}

// ─── ScopedContainer ─────────────────────────────────────────────────────────

/// A de-prefixing container adapter.
///
/// Handed to a scoped module's [`run`](Module::run): lookups using the
/// module's own short ids are translated to the prefixed ids the outer
/// container actually holds, so from the module's point of view
/// `get("foo")` and an outer `get("pre/foo")` are equivalent.  Ids starting
/// with `@` pass through to the outer container with the marker stripped.
pub struct ScopedContainer<'a> {
    inner: &'a dyn Container,
    prefix: &'a str,
}

impl<'a> ScopedContainer<'a> {
    /// Wraps `inner` so lookups are rewritten under `prefix`.
    pub fn new(inner: &'a dyn Container, prefix: &'a str) -> Self {
        Self { inner, prefix }
    }
}

impl Container for ScopedContainer<'_> {
    fn get(&self, id: &str) -> Result<ServiceValue, ContainerError> {
        self.inner.get(&apply_prefix(self.prefix, id))
    }

    fn has(&self, id: &str) -> bool {
        self.inner.has(&apply_prefix(self.prefix, id))
    }
}

// ─── ScopedModule ────────────────────────────────────────────────────────────

/// A module decorator that namespaces the inner module's services.
pub struct ScopedModule {
    prefix: String,
    inner: Arc<dyn Module>,
}

impl ScopedModule {
    /// Wraps `inner` under `prefix`.
    ///
    /// The prefix is used verbatim — include a trailing delimiter if ids
    /// should read like `"pre/foo"`.
    pub fn new(prefix: impl Into<String>, inner: impl Module + 'static) -> Self {
        Self::from_arc(prefix, Arc::new(inner))
    }

    /// Wraps an already shared module.
    pub fn from_arc(prefix: impl Into<String>, inner: Arc<dyn Module>) -> Self {
        Self {
            prefix: prefix.into(),
            inner,
        }
    }

    /// The namespace prefix.
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    fn apply(&self, key: &str) -> String {
        apply_prefix(&self.prefix, key)
    }

    fn prefix_deps(&self, deps: &[Dep]) -> Vec<Dep> {
        deps.iter()
            .map(|dep| match dep {
                Dep::Id(id) => Dep::Id(self.apply(id)),
                Dep::Nested(service) => Dep::Nested(self.prefix_service(service)),
            })
            .collect()
    }

    /// Copies a service with its dependencies prefixed, recursing into
    /// nested services.
    fn prefix_service(&self, service: &Service) -> Service {
        service.with_dependencies(self.prefix_deps(service.dependencies()))
    }

    fn prefix_extension(&self, extension: &Extension) -> Extension {
        extension.with_dependencies(self.prefix_deps(extension.dependencies()))
    }

    fn prefix_handler(&self, handler: &Handler) -> Handler {
        let deferred = match handler.priority() {
            Priority::Service(id) => Some(self.apply(id)),
            Priority::Int(_) => None,
        };

        let rescoped = handler.with_dependencies(self.prefix_deps(handler.dependencies()));
        match deferred {
            Some(id) => rescoped.with_priority(Priority::Service(id)),
            None => rescoped,
        }
    }
}

impl Module for ScopedModule {
    fn factories(&self) -> Vec<(String, Service)> {
        self.inner
            .factories()
            .into_iter()
            .map(|(key, service)| (self.apply(&key), self.prefix_service(&service)))
            .collect()
    }

    fn extensions(&self) -> Vec<(String, Extension)> {
        self.inner
            .extensions()
            .into_iter()
            .map(|(key, extension)| (key, self.prefix_extension(&extension)))
            .collect()
    }

    fn hooks(&self) -> Vec<(String, Vec<Handler>)> {
        self.inner
            .hooks()
            .into_iter()
            .map(|(event, handlers)| {
                let handlers = handlers
                    .iter()
                    .map(|handler| self.prefix_handler(handler))
                    .collect();
                (event, handlers)
            })
            .collect()
    }

    fn run(&self, container: &dyn Container, plugin: &Plugin) -> Result<(), BoxError> {
        let scoped = ScopedContainer::new(container, &self.prefix);
        self.inner.run(&scoped, plugin)
    }
}

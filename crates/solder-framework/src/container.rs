//! The compiled service container.
//!
//! [`PluginContainer`] compiles the factories and extensions of an ordered
//! module list into one lookup surface, then resolves services lazily:
//! cycle detection via an in-progress fetch stack, one cached value per id
//! for the container's lifetime, and named-filter post-processing of every
//! freshly constructed value.
//!
//! # Compilation semantics
//!
//! - Factories merge **later-module-wins** by id: when two modules declare
//!   the same id, the earlier factory is discarded, not merged.
//! - Extensions for the same id **chain** in module order: the first module
//!   to declare one seeds the chain, each later one receives the previous
//!   result as `prev`.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::Mutex;
use tracing::{debug, trace, warn};

use solder_core::{
    BoxError, Container, ContainerError, Extension, HookRegistry, Service, ServiceValue,
};

use crate::module::Module;

/// The resolution engine for a plugin's services.
pub struct PluginContainer {
    factories: HashMap<String, Service>,
    extensions: HashMap<String, Vec<Extension>>,
    cache: Mutex<HashMap<String, ServiceValue>>,
    /// Ids currently being resolved, innermost last.  Guarded cleanup makes
    /// a failed resolution leave no trace here.
    fetch_stack: Mutex<Vec<String>>,
    filter_prefixes: Vec<String>,
    hooks: Arc<HookRegistry>,
}

impl PluginContainer {
    /// Compiles `modules` (in order) into a container.
    ///
    /// Every freshly constructed value is passed through the named filter
    /// `prefix + id` for each of `filter_prefixes`, in order, before being
    /// cached.
    pub fn new<'a, I>(filter_prefixes: Vec<String>, modules: I, hooks: Arc<HookRegistry>) -> Self
    where
        I: IntoIterator<Item = &'a dyn Module>,
    {
        let mut factories: HashMap<String, Service> = HashMap::new();
        let mut extensions: HashMap<String, Vec<Extension>> = HashMap::new();

        for module in modules {
            for (id, factory) in module.factories() {
                if factories.insert(id.clone(), factory).is_some() {
                    warn!(service = %id, "Duplicate service factory — last registration wins");
                }
            }
            for (id, extension) in module.extensions() {
                extensions.entry(id).or_default().push(extension);
            }
        }

        Self {
            factories,
            extensions,
            cache: Mutex::new(HashMap::new()),
            fetch_stack: Mutex::new(Vec::new()),
            filter_prefixes,
            hooks,
        }
    }

    /// The hook registry used for named-filter post-processing.
    pub fn hooks(&self) -> &Arc<HookRegistry> {
        &self.hooks
    }

    fn resolve(&self, id: &str) -> Result<ServiceValue, ContainerError> {
        let Some(factory) = self.factories.get(id) else {
            return Err(ContainerError::NotFound(id.to_string()));
        };

        if let Some(cached) = self.cache.lock().get(id) {
            return Ok(cached.clone());
        }

        trace!(service = %id, "Constructing service");
        let mut value = factory
            .invoke(self)
            .map_err(|e| construction_error(id, e))?;

        if let Some(chain) = self.extensions.get(id) {
            for extension in chain {
                value = extension
                    .invoke(self, value)
                    .map_err(|e| construction_error(id, e))?;
            }
        }

        for prefix in &self.filter_prefixes {
            let hook = format!("{prefix}{id}");
            value = self
                .hooks
                .apply_filters(&hook, value, &[])
                .map_err(|source| ContainerError::Filter { hook, source })?;
        }

        debug!(service = %id, "Service constructed");
        self.cache.lock().insert(id.to_string(), value.clone());
        Ok(value)
    }
}

impl Container for PluginContainer {
    /// Resolves `id`, detecting circular dependencies.
    ///
    /// The fetch stack entry is released on *every* exit path — success,
    /// not-found, construction failure, or cycle — so one failed resolution
    /// cannot poison later ones.
    fn get(&self, id: &str) -> Result<ServiceValue, ContainerError> {
        {
            let stack = self.fetch_stack.lock();
            if let Some(first) = stack.iter().position(|entry| entry == id) {
                let mut chain: Vec<String> = stack[first..].to_vec();
                chain.push(id.to_string());
                return Err(ContainerError::CircularDependency { chain });
            }
        }

        self.fetch_stack.lock().push(id.to_string());
        let _guard = FetchGuard { stack: &self.fetch_stack };
        self.resolve(id)
    }

    fn has(&self, id: &str) -> bool {
        self.factories.contains_key(id)
    }
}

/// Pops the innermost fetch-stack entry when dropped.
struct FetchGuard<'a> {
    stack: &'a Mutex<Vec<String>>,
}

impl Drop for FetchGuard<'_> {
    fn drop(&mut self) {
        self.stack.lock().pop();
    }
}

/// Wraps a factory or extension failure with the id being constructed.
///
/// A circular-dependency error coming out of a nested `get` is passed
/// through untouched so the reported chain stays intact.
fn construction_error(id: &str, error: BoxError) -> ContainerError {
    match error.downcast::<ContainerError>() {
        Ok(inner) => match *inner {
            ContainerError::CircularDependency { chain } => {
                ContainerError::CircularDependency { chain }
            }
            other => ContainerError::Construction {
                id: id.to_string(),
                source: Box::new(other),
            },
        },
        Err(error) => ContainerError::Construction {
            id: id.to_string(),
            source: error,
        },
    }
}

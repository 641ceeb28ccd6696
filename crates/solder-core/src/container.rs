//! The service lookup contract shared by containers and scoped adapters.

use std::any::type_name;
use std::sync::Arc;

use crate::error::ContainerError;
use crate::service::ServiceValue;

/// Read-only lookup surface over a compiled set of services.
///
/// Implemented by the compiled plugin container and by the de-prefixing
/// adapter handed to scoped modules; factories, extensions, and handlers
/// depend only on this trait.
pub trait Container {
    /// Resolves the service registered under `id`.
    fn get(&self, id: &str) -> Result<ServiceValue, ContainerError>;

    /// Returns `true` if a factory exists for `id`.  Ids that only have
    /// extensions are not resolvable and report `false`.
    fn has(&self, id: &str) -> bool;
}

/// Typed convenience lookups for any [`Container`].
pub trait ContainerExt: Container {
    /// Resolves `id` and downcasts the value to `T`.
    fn get_as<T: Send + Sync + 'static>(&self, id: &str) -> Result<Arc<T>, ContainerError> {
        self.get(id)?
            .downcast::<T>()
            .map_err(|_| ContainerError::WrongType {
                id: id.to_string(),
                expected: type_name::<T>(),
            })
    }
}

impl<C: Container + ?Sized> ContainerExt for C {}

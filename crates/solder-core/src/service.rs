//! The service value model: dependency references, factories, and extensions.
//!
//! A [`Service`] pairs a body function with the ordered list of references
//! ([`Dep`]) it needs resolved first.  An [`Extension`] is the same shape but
//! its body additionally receives the previous value of the service it
//! extends.  Both are immutable after construction; the only derived form is
//! a copy-with-new-dependencies, used by the rescoping transform.

use std::any::{Any, type_name};
use std::fmt;
use std::sync::Arc;

use crate::container::Container;
use crate::error::BoxError;

/// The heterogeneous value type stored in a container.
///
/// Factories upcast their concrete results into this; consumers downcast
/// back via [`ContainerExt::get_as`](crate::container::ContainerExt::get_as)
/// or [`expect_dep`].
pub type ServiceValue = Arc<dyn Any + Send + Sync>;

/// Signature of a service factory body.  Receives the resolved dependency
/// values positionally, in declared order.
pub type ServiceBody =
    Arc<dyn Fn(&[ServiceValue]) -> Result<ServiceValue, BoxError> + Send + Sync>;

/// Signature of an extension body.  Receives the previous value of the
/// extended service, then the resolved dependency values.
pub type ExtensionBody =
    Arc<dyn Fn(ServiceValue, &[ServiceValue]) -> Result<ServiceValue, BoxError> + Send + Sync>;

// ─── Dep ─────────────────────────────────────────────────────────────────────

/// A reference to another service, as used in dependency lists.
#[derive(Clone)]
pub enum Dep {
    /// A container id.  Ids that start with the `@` marker opt out of
    /// rescoping: when a module is wrapped in a namespace prefix, the marker
    /// is stripped and no prefix is applied, letting the dependency point at
    /// a service outside the module.
    Id(String),
    /// An inline anonymous service.  Invoked directly during resolution;
    /// never registered with, or cached by, the container.
    Nested(Service),
}

impl Dep {
    /// Creates an id reference.
    pub fn id(id: impl Into<String>) -> Self {
        Dep::Id(id.into())
    }
}

impl From<&str> for Dep {
    fn from(id: &str) -> Self {
        Dep::Id(id.to_string())
    }
}

impl From<String> for Dep {
    fn from(id: String) -> Self {
        Dep::Id(id)
    }
}

impl From<Service> for Dep {
    fn from(service: Service) -> Self {
        Dep::Nested(service)
    }
}

impl fmt::Debug for Dep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Dep::Id(id) => write!(f, "Dep::Id({id:?})"),
            Dep::Nested(service) => {
                write!(f, "Dep::Nested({} deps)", service.dependencies().len())
            }
        }
    }
}

// ─── Service ─────────────────────────────────────────────────────────────────

/// A named function paired with the references it needs resolved first.
///
/// Cloning is cheap: the body is shared behind an `Arc`.
#[derive(Clone)]
pub struct Service {
    dependencies: Vec<Dep>,
    body: ServiceBody,
}

impl Service {
    /// Creates a service from a dependency list and a body.
    pub fn new<I, F>(dependencies: I, body: F) -> Self
    where
        I: IntoIterator,
        I::Item: Into<Dep>,
        F: Fn(&[ServiceValue]) -> Result<ServiceValue, BoxError> + Send + Sync + 'static,
    {
        Self {
            dependencies: dependencies.into_iter().map(Into::into).collect(),
            body: Arc::new(body),
        }
    }

    /// Creates a service that always yields the given value.
    pub fn value<T: Any + Send + Sync>(value: T) -> Self {
        Self::shared(Arc::new(value))
    }

    /// Creates a service that always yields the given shared value.
    pub fn shared<T: Any + Send + Sync>(value: Arc<T>) -> Self {
        let value: ServiceValue = value;
        Self {
            dependencies: Vec::new(),
            body: Arc::new(move |_| Ok(value.clone())),
        }
    }

    /// Creates a service that resolves to another service's value.
    pub fn alias(id: impl Into<String>) -> Self {
        Self::new([id.into()], |deps| Ok(deps[0].clone()))
    }

    /// The declared dependency references, in resolution order.
    pub fn dependencies(&self) -> &[Dep] {
        &self.dependencies
    }

    /// Returns a copy of this service with a new dependency list and the
    /// same body.  The receiver is left untouched; this is the only derived
    /// form of a service and exists for the rescoping transform.
    pub fn with_dependencies(&self, dependencies: Vec<Dep>) -> Self {
        Self {
            dependencies,
            body: Arc::clone(&self.body),
        }
    }

    /// Resolves every dependency against `container` and calls the body with
    /// the values positionally, in declared order.
    pub fn invoke(&self, container: &dyn Container) -> Result<ServiceValue, BoxError> {
        let deps = resolve_deps(container, &self.dependencies)?;
        (self.body)(&deps)
    }
}

// ─── Extension ───────────────────────────────────────────────────────────────

/// A transform applied to a previously built service value.
///
/// Extensions registered for the same id chain in module order: each
/// extension receives the previous extension's output (or the factory's
/// output for the first in the chain) as `prev`.
#[derive(Clone)]
pub struct Extension {
    dependencies: Vec<Dep>,
    body: ExtensionBody,
}

impl Extension {
    /// Creates an extension from a dependency list and a body.
    pub fn new<I, F>(dependencies: I, body: F) -> Self
    where
        I: IntoIterator,
        I::Item: Into<Dep>,
        F: Fn(ServiceValue, &[ServiceValue]) -> Result<ServiceValue, BoxError>
            + Send
            + Sync
            + 'static,
    {
        Self {
            dependencies: dependencies.into_iter().map(Into::into).collect(),
            body: Arc::new(body),
        }
    }

    /// The declared dependency references, in resolution order.
    pub fn dependencies(&self) -> &[Dep] {
        &self.dependencies
    }

    /// Returns a copy with a new dependency list and the same body.
    pub fn with_dependencies(&self, dependencies: Vec<Dep>) -> Self {
        Self {
            dependencies,
            body: Arc::clone(&self.body),
        }
    }

    /// Resolves the dependencies and calls the body with `prev` and the
    /// resolved values.
    pub fn invoke(
        &self,
        container: &dyn Container,
        prev: ServiceValue,
    ) -> Result<ServiceValue, BoxError> {
        let deps = resolve_deps(container, &self.dependencies)?;
        (self.body)(prev, &deps)
    }
}

// ─── Resolution helpers ──────────────────────────────────────────────────────

/// Resolves a dependency list against a container.
///
/// Id references go through [`Container::get`]; nested services are invoked
/// recursively with the same container.
pub fn resolve_deps(
    container: &dyn Container,
    deps: &[Dep],
) -> Result<Vec<ServiceValue>, BoxError> {
    deps.iter()
        .map(|dep| match dep {
            Dep::Id(id) => container.get(id).map_err(Into::into),
            Dep::Nested(service) => service.invoke(container),
        })
        .collect()
}

/// Downcasts the dependency at `index` to `T`.
///
/// Bodies receive dependencies type-erased; this produces a descriptive
/// error instead of a panic when a dependency is missing or has an
/// unexpected type.
pub fn expect_dep<T: Send + Sync + 'static>(
    deps: &[ServiceValue],
    index: usize,
) -> Result<Arc<T>, BoxError> {
    let value = deps
        .get(index)
        .ok_or_else(|| format!("missing dependency at position {index}"))?;
    value
        .clone()
        .downcast::<T>()
        .map_err(|_| format!("dependency at position {index} is not a {}", type_name::<T>()).into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::container::{Container, ContainerExt};
    use crate::error::ContainerError;
    use std::collections::HashMap;

    struct MapContainer(HashMap<String, ServiceValue>);

    impl MapContainer {
        fn with(entries: &[(&str, ServiceValue)]) -> Self {
            Self(
                entries
                    .iter()
                    .map(|(k, v)| (k.to_string(), v.clone()))
                    .collect(),
            )
        }
    }

    impl Container for MapContainer {
        fn get(&self, id: &str) -> Result<ServiceValue, ContainerError> {
            self.0
                .get(id)
                .cloned()
                .ok_or_else(|| ContainerError::NotFound(id.to_string()))
        }

        fn has(&self, id: &str) -> bool {
            self.0.contains_key(id)
        }
    }

    #[test]
    fn value_service_ignores_the_container() {
        let c = MapContainer::with(&[]);
        let service = Service::value("hello".to_string());

        let value = service.invoke(&c).unwrap();
        assert_eq!(*value.downcast::<String>().unwrap(), "hello");
    }

    #[test]
    fn dependencies_are_passed_positionally() {
        let c = MapContainer::with(&[
            ("one", Arc::new(1u32) as ServiceValue),
            ("two", Arc::new(2u32) as ServiceValue),
        ]);
        let service = Service::new(["one", "two"], |deps| {
            let a = expect_dep::<u32>(deps, 0)?;
            let b = expect_dep::<u32>(deps, 1)?;
            Ok(Arc::new(*a * 10 + *b) as ServiceValue)
        });

        let value = service.invoke(&c).unwrap();
        assert_eq!(*value.downcast::<u32>().unwrap(), 12);
    }

    #[test]
    fn alias_forwards_to_the_target() {
        let c = MapContainer::with(&[("target", Arc::new("x".to_string()) as ServiceValue)]);

        let value = Service::alias("target").invoke(&c).unwrap();
        assert_eq!(*value.downcast::<String>().unwrap(), "x");
    }

    #[test]
    fn nested_dependencies_resolve_without_registration() {
        let c = MapContainer::with(&[("base", Arc::new(5u32) as ServiceValue)]);
        let inner = Service::new(["base"], |deps| {
            let base = expect_dep::<u32>(deps, 0)?;
            Ok(Arc::new(*base + 1) as ServiceValue)
        });
        let outer = Service::new([Dep::from(inner)], |deps| {
            let nested = expect_dep::<u32>(deps, 0)?;
            Ok(Arc::new(*nested * 2) as ServiceValue)
        });

        let value = outer.invoke(&c).unwrap();
        assert_eq!(*value.downcast::<u32>().unwrap(), 12);
    }

    #[test]
    fn with_dependencies_leaves_the_receiver_untouched() {
        let service = Service::new(["a"], |deps| Ok(deps[0].clone()));
        let copy = service.with_dependencies(vec![Dep::id("b")]);

        assert!(matches!(&service.dependencies()[0], Dep::Id(id) if id == "a"));
        assert!(matches!(&copy.dependencies()[0], Dep::Id(id) if id == "b"));
    }

    #[test]
    fn missing_dependency_surfaces_as_an_error() {
        let c = MapContainer::with(&[]);
        let service = Service::new(["absent"], |deps| Ok(deps[0].clone()));

        let err = service.invoke(&c).unwrap_err();
        assert!(err.to_string().contains("absent"));
    }

    #[test]
    fn get_as_downcasts_or_reports_the_type() {
        let c = MapContainer::with(&[("n", Arc::new(7u32) as ServiceValue)]);

        assert_eq!(*c.get_as::<u32>("n").unwrap(), 7);
        assert!(matches!(
            c.get_as::<String>("n"),
            Err(ContainerError::WrongType { .. })
        ));
    }
}

//! Error types for the Solder container.

use thiserror::Error;

/// Boxed error type returned by service factories, extensions, and hook
/// callbacks.
///
/// Container-level failures ([`ContainerError`]) convert into this type
/// automatically, so a factory body can use `?` on a nested
/// [`Container::get`](crate::container::Container::get) call.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Errors surfaced by [`Container::get`](crate::container::Container::get).
///
/// None of these are retried anywhere in the toolkit; every failure
/// propagates to the caller of `get`.
#[derive(Debug, Error)]
pub enum ContainerError {
    /// No factory was compiled for the requested id.  Extension-only ids
    /// also report this: an extension needs a factory to extend.
    #[error("service \"{0}\" does not exist")]
    NotFound(String),

    /// The requested id was already being resolved further up the call
    /// stack.  The chain lists every id from the first occurrence of the
    /// repeated id up to and including the repetition, in the order the
    /// resolutions were entered.
    #[error("circular dependency detected: {}", .chain.join(" -> "))]
    CircularDependency {
        /// The in-progress resolution chain, e.g. `["foo", "bar", "foo"]`.
        chain: Vec<String>,
    },

    /// A factory or extension body failed while constructing a service.
    /// The original failure is preserved as the source.
    #[error("failed to create service \"{id}\": {source}")]
    Construction {
        /// Id of the service whose construction failed.
        id: String,
        /// The underlying failure.
        #[source]
        source: BoxError,
    },

    /// A named filter raised an error while post-processing a freshly
    /// constructed service value.
    #[error("filter \"{hook}\" failed for a new service value: {source}")]
    Filter {
        /// Full name of the failing filter hook (prefix + service id).
        hook: String,
        /// The underlying failure.
        #[source]
        source: BoxError,
    },

    /// A resolved value could not be downcast to the requested type.
    #[error("service \"{id}\" is not of type {expected}")]
    WrongType {
        /// Id of the resolved service.
        id: String,
        /// Name of the requested type.
        expected: &'static str,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn circular_dependency_display_joins_the_chain() {
        let err = ContainerError::CircularDependency {
            chain: vec!["foo".into(), "bar".into(), "baz".into(), "foo".into()],
        };

        assert!(err.to_string().contains("foo -> bar -> baz -> foo"));
    }

    #[test]
    fn construction_preserves_the_source() {
        let source: BoxError = "disk on fire".into();
        let err = ContainerError::Construction {
            id: "db".into(),
            source,
        };

        assert_eq!(
            err.to_string(),
            "failed to create service \"db\": disk on fire"
        );
        assert!(std::error::Error::source(&err).is_some());
    }
}

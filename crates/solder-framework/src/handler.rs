//! Hook handlers — services specialised for host event bindings.
//!
//! A [`Handler`] wraps a callback together with the service dependencies it
//! needs, a priority, and the number of hook-supplied arguments it accepts.
//! When the hook fires, the hook arguments come first and the resolved
//! dependencies second, in that order.

use std::sync::Arc;

use tracing::debug;

use solder_core::{
    BoxError, Container, ContainerError, ContainerExt, Dep, ServiceValue, resolve_deps,
};

use crate::container::PluginContainer;

/// Default hook priority, matching the host convention.
pub const DEFAULT_PRIORITY: i32 = 10;

/// Signature of a handler body.
///
/// Receives the hook-supplied arguments first, then the resolved dependency
/// values.  Returning `Some` replaces the value when the handler is attached
/// to a filter hook; action hooks ignore the return value.
pub type HandlerBody = Arc<
    dyn Fn(&[ServiceValue], &[ServiceValue]) -> Result<Option<ServiceValue>, BoxError>
        + Send
        + Sync,
>;

// ─── Priority ────────────────────────────────────────────────────────────────

/// A hook priority: either a literal integer or a service id resolved from
/// the container at attach time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Priority {
    /// A literal priority value.
    Int(i32),
    /// The id of a service that yields an `i32` priority.  Rescoped like any
    /// other service reference when the owning module is namespaced.
    Service(String),
}

impl Priority {
    /// Creates a deferred priority from a service id.
    pub fn service(id: impl Into<String>) -> Self {
        Priority::Service(id.into())
    }
}

impl Default for Priority {
    fn default() -> Self {
        Priority::Int(DEFAULT_PRIORITY)
    }
}

impl From<i32> for Priority {
    fn from(priority: i32) -> Self {
        Priority::Int(priority)
    }
}

// ─── Handler ─────────────────────────────────────────────────────────────────

/// A handler for a host hook.
///
/// # Example
///
/// ```rust,ignore
/// let handler = Handler::new(["greeting"], |_hook_args, deps| {
///     let greeting = expect_dep::<String>(deps, 0)?;
///     println!("{greeting}");
///     Ok(None)
/// })
/// .with_priority(20);
/// ```
#[derive(Clone)]
pub struct Handler {
    dependencies: Vec<Dep>,
    body: HandlerBody,
    priority: Priority,
    num_args: Option<usize>,
}

impl Handler {
    /// Creates a handler with the default priority and no hook arguments.
    ///
    /// Handler callbacks are not introspectable, so the number of
    /// hook-supplied arguments defaults to zero; declare it explicitly with
    /// [`with_num_args`](Self::with_num_args) when the handler consumes
    /// event arguments.
    pub fn new<I, F>(dependencies: I, body: F) -> Self
    where
        I: IntoIterator,
        I::Item: Into<Dep>,
        F: Fn(&[ServiceValue], &[ServiceValue]) -> Result<Option<ServiceValue>, BoxError>
            + Send
            + Sync
            + 'static,
    {
        Self {
            dependencies: dependencies.into_iter().map(Into::into).collect(),
            body: Arc::new(body),
            priority: Priority::default(),
            num_args: None,
        }
    }

    /// Sets the priority.
    pub fn with_priority(mut self, priority: impl Into<Priority>) -> Self {
        self.priority = priority.into();
        self
    }

    /// Declares how many hook-supplied arguments the body accepts.
    pub fn with_num_args(mut self, num_args: usize) -> Self {
        self.num_args = Some(num_args);
        self
    }

    /// The declared dependency references.
    pub fn dependencies(&self) -> &[Dep] {
        &self.dependencies
    }

    /// The configured priority.
    pub fn priority(&self) -> &Priority {
        &self.priority
    }

    /// The effective hook argument count (zero when undeclared).
    pub fn num_args(&self) -> usize {
        self.num_args.unwrap_or(0)
    }

    /// Returns a copy with a new dependency list and the same body,
    /// priority, and argument count.
    pub fn with_dependencies(&self, dependencies: Vec<Dep>) -> Self {
        Self {
            dependencies,
            body: Arc::clone(&self.body),
            priority: self.priority.clone(),
            num_args: self.num_args,
        }
    }

    /// Registers this handler with the container's hook registry under
    /// `hook`.
    ///
    /// A deferred [`Priority::Service`] is resolved here, once.  Dependencies
    /// are resolved each time the hook fires — the container memoizes, so
    /// repeat fires are cheap.  The registered callback holds only a weak
    /// container reference; if the container has been dropped by the time
    /// the hook fires, the callback is a silent no-op.
    pub fn attach(
        &self,
        hook: &str,
        container: &Arc<PluginContainer>,
    ) -> Result<(), ContainerError> {
        let priority = match &self.priority {
            Priority::Int(priority) => *priority,
            Priority::Service(id) => *container.get_as::<i32>(id)?,
        };

        let weak = Arc::downgrade(container);
        let dependencies = self.dependencies.clone();
        let body = Arc::clone(&self.body);
        let hook_name = hook.to_string();

        container.hooks().add_hook(
            hook,
            priority,
            self.num_args(),
            Arc::new(move |hook_args| {
                let Some(container) = weak.upgrade() else {
                    debug!(hook = %hook_name, "Hook fired after its container was dropped");
                    return Ok(None);
                };
                let deps = resolve_deps(&*container as &dyn Container, &dependencies)?;
                body(hook_args, &deps)
            }),
        );
        Ok(())
    }
}

//! Named hook dispatch — the host event system that handlers attach to.
//!
//! Mirrors the action/filter model of classic plugin hosts: callbacks are
//! registered under a hook name with a priority and a declared argument
//! count.  [`do_action`](HookRegistry::do_action) fires callbacks for their
//! side effects; [`apply_filters`](HookRegistry::apply_filters) threads a
//! value through the callbacks in order.
//!
//! # Ordering
//!
//! Callbacks run in ascending priority order; callbacks sharing a priority
//! run in registration order.
//!
//! # Error policy
//!
//! Action callbacks that fail are logged and skipped — one broken handler
//! must not silence the rest of the chain.  Filter callbacks that fail abort
//! the whole `apply_filters` call: a filter produces the value its caller
//! goes on to use, so there is nothing sensible to continue with.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;
use tracing::error;

use crate::error::BoxError;
use crate::service::ServiceValue;

/// Signature of a hook callback.
///
/// Receives the hook-supplied arguments, truncated to the callback's
/// declared argument count.  For filters, the first argument is the value
/// being filtered; returning `Some` replaces it, returning `None` keeps it.
pub type HookCallback =
    Arc<dyn Fn(&[ServiceValue]) -> Result<Option<ServiceValue>, BoxError> + Send + Sync>;

struct HookEntry {
    priority: i32,
    num_args: usize,
    callback: HookCallback,
}

/// Registry of named hooks with prioritised callbacks.
///
/// Registration is fire-and-forget; dispatch snapshots the callback list so
/// a callback may register further hooks without deadlocking.
#[derive(Default)]
pub struct HookRegistry {
    hooks: RwLock<HashMap<String, Vec<HookEntry>>>,
}

impl HookRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `callback` under `name`.
    ///
    /// `num_args` is how many hook-supplied arguments the callback receives;
    /// excess arguments are truncated at dispatch time.
    pub fn add_hook(&self, name: &str, priority: i32, num_args: usize, callback: HookCallback) {
        let mut hooks = self.hooks.write();
        let entries = hooks.entry(name.to_string()).or_default();
        // Insert after all entries with the same priority to keep
        // registration order stable within a priority.
        let pos = entries.partition_point(|e| e.priority <= priority);
        entries.insert(
            pos,
            HookEntry {
                priority,
                num_args,
                callback,
            },
        );
    }

    /// Returns `true` if at least one callback is registered under `name`.
    pub fn has_hook(&self, name: &str) -> bool {
        self.hooks.read().get(name).is_some_and(|e| !e.is_empty())
    }

    /// Returns the number of callbacks registered under `name`.
    pub fn hook_count(&self, name: &str) -> usize {
        self.hooks.read().get(name).map_or(0, Vec::len)
    }

    fn snapshot(&self, name: &str) -> Vec<(usize, HookCallback)> {
        self.hooks.read().get(name).map_or_else(Vec::new, |entries| {
            entries
                .iter()
                .map(|e| (e.num_args, Arc::clone(&e.callback)))
                .collect()
        })
    }

    /// Fires the callbacks registered under `name` for their side effects.
    ///
    /// Return values are ignored.  A failing callback is logged and the rest
    /// of the chain still runs.
    pub fn do_action(&self, name: &str, args: &[ServiceValue]) {
        for (num_args, callback) in self.snapshot(name) {
            let take = num_args.min(args.len());
            if let Err(e) = callback(&args[..take]) {
                error!(hook = %name, error = %e, "Hook callback failed");
            }
        }
    }

    /// Threads `value` through the callbacks registered under `name`.
    ///
    /// Each callback receives the current value first, followed by `args`;
    /// a callback always receives at least the value, regardless of its
    /// declared argument count.  A failing callback aborts the call.
    pub fn apply_filters(
        &self,
        name: &str,
        value: ServiceValue,
        args: &[ServiceValue],
    ) -> Result<ServiceValue, BoxError> {
        let mut value = value;
        for (num_args, callback) in self.snapshot(name) {
            let mut full = Vec::with_capacity(args.len() + 1);
            full.push(value.clone());
            full.extend(args.iter().cloned());
            let take = num_args.clamp(1, full.len());
            if let Some(next) = callback(&full[..take])? {
                value = next;
            }
        }
        Ok(value)
    }
}

//! The module contract.
//!
//! A module is the unit of composition: it contributes service factories,
//! extensions for other modules' services, and hook handlers, and gets one
//! [`run`](Module::run) call when the plugin starts.  The container and the
//! scoping decorator depend only on this trait, never on concrete module
//! types.

use solder_core::{BoxError, Container, Extension, Service};

use crate::handler::Handler;
use crate::plugin::Plugin;

/// A unit of plugin composition.
///
/// All collection methods default to empty and `run` defaults to a no-op, so
/// a module implements only what it contributes.  Collections are returned
/// as ordered lists; the container gives later entries (and later modules)
/// override/append semantics, so ordering is part of the contract.
pub trait Module: Send + Sync {
    /// Factories for the services this module defines, keyed by service id.
    fn factories(&self) -> Vec<(String, Service)> {
        Vec::new()
    }

    /// Extensions for services possibly defined in *other* modules, keyed by
    /// the extended service's id.
    fn extensions(&self) -> Vec<(String, Extension)> {
        Vec::new()
    }

    /// Hook handlers, keyed by host event name.
    fn hooks(&self) -> Vec<(String, Vec<Handler>)> {
        Vec::new()
    }

    /// Runs the module.  Called once, after this module's hooks have been
    /// attached.  The module may call [`Plugin::stop`] to halt the remaining
    /// module iteration.
    fn run(&self, _container: &dyn Container, _plugin: &Plugin) -> Result<(), BoxError> {
        Ok(())
    }
}

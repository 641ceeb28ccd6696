//! The built-in host base module.
//!
//! [`HostModule`] is intended as an extension target: it owns the shared
//! `registrables` list that other modules append to (via
//! [`extend_list`](crate::di::extend_list)), and a hook on the host's
//! startup event that registers every accumulated entry.  It also exposes
//! the hook registry itself as the `hooks` service, so factories can
//! construct values that need a handle on the host.

use std::sync::Arc;

use solder_core::{BoxError, HookRegistry, Service, expect_dep};

use crate::di::service_list;
use crate::handler::Handler;
use crate::module::Module;

/// Host startup event on which accumulated registrables are registered.
pub const INIT_HOOK: &str = "init";

/// Something a factory constructs that must announce itself to the host.
///
/// Entries are collected in the shared `registrables` list service and
/// registered in list order when the host fires [`INIT_HOOK`].
pub trait Registrable: Send + Sync {
    /// Registers this entry with the host.
    fn register(&self, hooks: &HookRegistry) -> Result<(), BoxError>;
}

/// The shared list type held by the `registrables` service.
pub type RegistrableList = Vec<Arc<dyn Registrable>>;

// ─── HostModule ──────────────────────────────────────────────────────────────

/// The built-in module providing host-integration base services.
///
/// Registered under the `host` key; other modules extend
/// `"host/registrables"` (an extension key is never rescoped, so the full
/// id is used directly).
pub struct HostModule {
    hooks: Arc<HookRegistry>,
}

impl HostModule {
    /// Creates the module around the plugin's hook registry.
    pub fn new(hooks: Arc<HookRegistry>) -> Self {
        Self { hooks }
    }
}

impl Module for HostModule {
    fn factories(&self) -> Vec<(String, Service)> {
        vec![
            ("hooks".to_string(), Service::shared(Arc::clone(&self.hooks))),
            (
                "registrables".to_string(),
                service_list::<Arc<dyn Registrable>>(),
            ),
        ]
    }

    fn hooks(&self) -> Vec<(String, Vec<Handler>)> {
        vec![(
            INIT_HOOK.to_string(),
            vec![Handler::new(["registrables", "hooks"], |_, deps| {
                let entries = expect_dep::<RegistrableList>(deps, 0)?;
                let hooks = expect_dep::<HookRegistry>(deps, 1)?;
                for entry in entries.iter() {
                    entry.register(&hooks)?;
                }
                Ok(None)
            })],
        )]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builtin::meta::PluginMeta;
    use crate::di::extend_list;
    use crate::plugin::Plugin;
    use solder_core::Extension;
    use std::sync::Mutex;

    struct Recorded {
        tag: &'static str,
        log: Arc<Mutex<Vec<&'static str>>>,
    }

    impl Registrable for Recorded {
        fn register(&self, _hooks: &HookRegistry) -> Result<(), BoxError> {
            self.log.lock().unwrap().push(self.tag);
            Ok(())
        }
    }

    struct ContributingModule {
        log: Arc<Mutex<Vec<&'static str>>>,
    }

    impl Module for ContributingModule {
        fn factories(&self) -> Vec<(String, Service)> {
            let log = Arc::clone(&self.log);
            let entries: RegistrableList = vec![
                Arc::new(Recorded { tag: "a", log: Arc::clone(&log) }),
                Arc::new(Recorded { tag: "b", log }),
            ];
            vec![("mine".into(), Service::value(entries))]
        }

        fn extensions(&self) -> Vec<(String, Extension)> {
            // Extension keys are not rescoped, so the host list is addressed
            // by its full id; the dependency stays module-local.
            vec![(
                "host/registrables".into(),
                extend_list::<Arc<dyn Registrable>, _>(["mine"]),
            )]
        }
    }

    #[test]
    fn registrables_accumulate_and_register_on_init() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let plugin = Plugin::builder(PluginMeta::default())
            .module("contrib", ContributingModule { log: Arc::clone(&log) })
            .build();

        plugin.run().unwrap();
        assert!(log.lock().unwrap().is_empty());

        plugin.hooks().do_action(INIT_HOOK, &[]);
        assert_eq!(*log.lock().unwrap(), vec!["a", "b"]);
    }
}

//! The plugin orchestrator.
//!
//! [`Plugin`] owns the compiled container and the ordered, scoped module
//! list.  [`run`](Plugin::run) attaches every module's hooks to the host
//! registry and invokes each module's `run`, with cooperative early
//! termination via [`stop`](Plugin::stop).
//!
//! # Assembling a plugin
//!
//! ```rust,ignore
//! use solder_framework::plugin::Plugin;
//!
//! let plugin = Plugin::builder(meta)
//!     .module("greeter", GreeterModule::default())
//!     .filter_prefix("myplugin/")
//!     .build();
//! plugin.run()?;
//! let greeting = plugin.get("greeter/message")?;
//! ```
//!
//! Every registered module is wrapped in a
//! [`ScopedModule`](crate::scoped::ScopedModule) using its key plus the
//! builder's delimiter as the namespace prefix, and two built-in modules are
//! seeded first: `plugin` (manifest metadata services) and `host` (the
//! shared extension-target lists and registration hooks).
//!
//! # Module discovery
//!
//! Statically linked modules can register themselves through the [`MODULES`]
//! distributed slice instead of being passed to the builder:
//!
//! ```rust,ignore
//! #[distributed_slice(MODULES)]
//! static GREETER: ModuleDescriptor = ModuleDescriptor {
//!     name: "greeter",
//!     load_order: 0,
//!     create: || Box::new(GreeterModule::default()),
//! };
//! ```

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use linkme::distributed_slice;
use tracing::{debug, info};

use solder_core::{BoxError, Container, ContainerError, HookRegistry, ServiceValue};

use crate::builtin::host::HostModule;
use crate::builtin::meta::{MetaModule, PluginMeta};
use crate::container::PluginContainer;
use crate::module::Module;
use crate::scoped::ScopedModule;

/// Default delimiter between a module's key and its service ids.
pub const DEFAULT_DELIMITER: &str = "/";

// ─── Module discovery ────────────────────────────────────────────────────────

/// A static descriptor contributing a module to [discovery](MODULES).
pub struct ModuleDescriptor {
    /// The module key, used as its namespace prefix (plus the delimiter).
    pub name: &'static str,
    /// Discovery sort key; ties are broken by `name`.  Order matters:
    /// later modules override earlier factories and append to extension
    /// chains.
    pub load_order: i32,
    /// Factory for the live module instance.
    pub create: fn() -> Box<dyn Module>,
}

/// Registry of statically linked module descriptors.
///
/// Link order is unspecified, so discovery sorts by `(load_order, name)` to
/// keep composition deterministic.
#[distributed_slice]
pub static MODULES: [ModuleDescriptor];

// ─── Plugin ──────────────────────────────────────────────────────────────────

/// The top-level orchestrator: one container, an ordered module list, and a
/// cooperative stop flag.
pub struct Plugin {
    container: Arc<PluginContainer>,
    hooks: Arc<HookRegistry>,
    modules: Vec<(String, Arc<dyn Module>)>,
    stopped: AtomicBool,
}

impl Plugin {
    /// Starts building a plugin from its manifest metadata.
    pub fn builder(meta: PluginMeta) -> PluginBuilder {
        PluginBuilder::new(meta)
    }

    /// Builds a plugin from its manifest metadata and the discovered
    /// [`MODULES`], with defaults for everything else.
    pub fn create(meta: PluginMeta) -> Self {
        Self::builder(meta).discover_modules().build()
    }

    /// The compiled service container.
    pub fn container(&self) -> &Arc<PluginContainer> {
        &self.container
    }

    /// The host hook registry this plugin attaches to.
    pub fn hooks(&self) -> &Arc<HookRegistry> {
        &self.hooks
    }

    /// Runs the plugin: for each module in order, attaches its hook handlers
    /// and invokes its `run`.  Iteration halts as soon as
    /// [`has_stopped`](Self::has_stopped) reports `true` — remaining
    /// modules are neither attached nor run.
    pub fn run(&self) -> Result<(), BoxError> {
        for (name, module) in &self.modules {
            for (hook, handlers) in module.hooks() {
                for handler in &handlers {
                    handler.attach(&hook, &self.container)?;
                }
            }

            module.run(&*self.container, self)?;
            info!(module = %name, "Module ran");

            if self.has_stopped() {
                debug!(module = %name, "Plugin stopped — skipping remaining modules");
                break;
            }
        }
        Ok(())
    }

    /// Requests cooperative termination.  Checked after each module's `run`;
    /// there is no finer-grained cancellation.
    pub fn stop(&self) {
        self.stopped.store(true, Ordering::SeqCst);
    }

    /// Returns `true` once [`stop`](Self::stop) has been called.
    pub fn has_stopped(&self) -> bool {
        self.stopped.load(Ordering::SeqCst)
    }
}

impl Container for Plugin {
    fn get(&self, id: &str) -> Result<ServiceValue, ContainerError> {
        self.container.get(id)
    }

    fn has(&self, id: &str) -> bool {
        self.container.has(id)
    }
}

// ─── PluginBuilder ───────────────────────────────────────────────────────────

/// Builder assembling the module list and container for a [`Plugin`].
pub struct PluginBuilder {
    meta: PluginMeta,
    delimiter: String,
    filter_prefixes: Vec<String>,
    hooks: Option<Arc<HookRegistry>>,
    modules: Vec<(String, Arc<dyn Module>)>,
    discover: bool,
}

impl PluginBuilder {
    fn new(meta: PluginMeta) -> Self {
        Self {
            meta,
            delimiter: DEFAULT_DELIMITER.to_string(),
            filter_prefixes: Vec::new(),
            hooks: None,
            modules: Vec::new(),
            discover: false,
        }
    }

    /// Sets the delimiter between module keys and service ids.
    pub fn delimiter(mut self, delimiter: impl Into<String>) -> Self {
        self.delimiter = delimiter.into();
        self
    }

    /// Adds a named-filter prefix applied to every freshly constructed
    /// service value, in registration order.
    pub fn filter_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.filter_prefixes.push(prefix.into());
        self
    }

    /// Uses an existing hook registry instead of a fresh one.
    pub fn hooks(mut self, hooks: Arc<HookRegistry>) -> Self {
        self.hooks = Some(hooks);
        self
    }

    /// Registers a module under `key`.  Registering the same key twice
    /// replaces the earlier module in place, keeping its position in the
    /// composition order.
    pub fn module(mut self, key: impl Into<String>, module: impl Module + 'static) -> Self {
        self.insert(key.into(), Arc::new(module));
        self
    }

    /// Also includes every module contributed to the [`MODULES`] slice.
    pub fn discover_modules(mut self) -> Self {
        self.discover = true;
        self
    }

    fn insert(&mut self, key: String, module: Arc<dyn Module>) {
        if let Some(entry) = self.modules.iter_mut().find(|(k, _)| *k == key) {
            entry.1 = module;
        } else {
            self.modules.push((key, module));
        }
    }

    /// Assembles the plugin: built-in modules first, then discovered and
    /// registered modules; everything wrapped in a scope prefix and compiled
    /// into one container.
    pub fn build(self) -> Plugin {
        let hooks = self.hooks.unwrap_or_else(|| Arc::new(HookRegistry::new()));

        let mut composed: Vec<(String, Arc<dyn Module>)> = vec![
            (
                "plugin".to_string(),
                Arc::new(MetaModule::new(self.meta)) as Arc<dyn Module>,
            ),
            (
                "host".to_string(),
                Arc::new(HostModule::new(Arc::clone(&hooks))) as Arc<dyn Module>,
            ),
        ];

        let mut insert = |key: String, module: Arc<dyn Module>| {
            if let Some(entry) = composed.iter_mut().find(|(k, _)| *k == key) {
                entry.1 = module;
            } else {
                composed.push((key, module));
            }
        };

        if self.discover {
            let mut descriptors: Vec<&ModuleDescriptor> = MODULES.iter().collect();
            descriptors.sort_by_key(|d| (d.load_order, d.name));
            for descriptor in descriptors {
                debug!(module = %descriptor.name, "Discovered module");
                insert(descriptor.name.to_string(), Arc::from((descriptor.create)()));
            }
        }

        for (key, module) in self.modules {
            insert(key, module);
        }

        let scoped: Vec<(String, Arc<dyn Module>)> = composed
            .into_iter()
            .map(|(key, module)| {
                let prefix = format!("{key}{}", self.delimiter);
                let scoped: Arc<dyn Module> = Arc::new(ScopedModule::from_arc(prefix, module));
                (key, scoped)
            })
            .collect();

        let container = PluginContainer::new(
            self.filter_prefixes,
            scoped.iter().map(|(_, module)| &**module),
            Arc::clone(&hooks),
        );

        Plugin {
            container: Arc::new(container),
            hooks,
            modules: scoped,
            stopped: AtomicBool::new(false),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use solder_core::{ContainerExt, Service};
    use std::sync::Mutex;

    fn meta() -> PluginMeta {
        PluginMeta {
            name: "Test Plugin".into(),
            slug: "test-plugin".into(),
            short_id: "tp".into(),
            version: "1.0.0".into(),
            ..PluginMeta::default()
        }
    }

    struct BarModule {
        output: Arc<Mutex<String>>,
    }

    impl Module for BarModule {
        fn factories(&self) -> Vec<(String, Service)> {
            vec![("bar".into(), Service::value("baz".to_string()))]
        }

        fn run(&self, container: &dyn Container, _plugin: &Plugin) -> Result<(), BoxError> {
            let value = container.get_as::<String>("bar")?;
            self.output.lock().unwrap().push_str(&value);
            Ok(())
        }
    }

    #[test]
    fn end_to_end_a_module_resolves_its_own_service_during_run() {
        let output = Arc::new(Mutex::new(String::new()));
        let plugin = Plugin::builder(meta())
            .module("foo", BarModule { output: Arc::clone(&output) })
            .build();

        plugin.run().unwrap();

        assert_eq!(*output.lock().unwrap(), "baz");
        assert_eq!(*plugin.get_as::<String>("foo/bar").unwrap(), "baz");
    }

    #[test]
    fn a_custom_delimiter_shapes_the_service_ids() {
        let output = Arc::new(Mutex::new(String::new()));
        let plugin = Plugin::builder(meta())
            .delimiter(".")
            .module("foo", BarModule { output })
            .build();

        assert!(plugin.has("foo.bar"));
        assert!(!plugin.has("foo/bar"));
    }

    #[test]
    fn get_and_has_delegate_to_the_container() {
        let plugin = Plugin::builder(meta()).build();

        assert!(plugin.has("plugin/meta"));
        assert!(!plugin.has("nope"));
        assert!(plugin.get("plugin/name").is_ok());
        assert!(matches!(
            plugin.get("nope"),
            Err(ContainerError::NotFound(_))
        ));
    }

    #[test]
    fn the_builtin_meta_module_exposes_manifest_fields() {
        let plugin = Plugin::builder(meta()).build();

        assert_eq!(*plugin.get_as::<String>("plugin/name").unwrap(), "Test Plugin");
        assert_eq!(*plugin.get_as::<String>("plugin/short_id").unwrap(), "tp");
    }

    struct RunRecorder {
        tag: &'static str,
        log: Arc<Mutex<Vec<&'static str>>>,
        stop: bool,
    }

    impl Module for RunRecorder {
        fn run(&self, _container: &dyn Container, plugin: &Plugin) -> Result<(), BoxError> {
            self.log.lock().unwrap().push(self.tag);
            if self.stop {
                plugin.stop();
            }
            Ok(())
        }
    }

    #[test]
    fn stopping_halts_the_remaining_module_iteration() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let module = |tag, stop| RunRecorder {
            tag,
            log: Arc::clone(&log),
            stop,
        };

        let plugin = Plugin::builder(meta())
            .module("m1", module("m1", false))
            .module("m2", module("m2", true))
            .module("m3", module("m3", false))
            .build();

        assert!(!plugin.has_stopped());
        plugin.run().unwrap();

        assert_eq!(*log.lock().unwrap(), vec!["m1", "m2"]);
        assert!(plugin.has_stopped());
    }

    #[test]
    fn registering_the_same_key_twice_replaces_in_place() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let plugin = Plugin::builder(meta())
            .module(
                "m",
                RunRecorder { tag: "first", log: Arc::clone(&log), stop: false },
            )
            .module(
                "m",
                RunRecorder { tag: "second", log: Arc::clone(&log), stop: false },
            )
            .build();

        plugin.run().unwrap();

        assert_eq!(*log.lock().unwrap(), vec!["second"]);
    }

    struct CrossModule;

    impl Module for CrossModule {
        fn factories(&self) -> Vec<(String, Service)> {
            // "@plugin/name" escapes this module's namespace.
            vec![(
                "label".into(),
                Service::new(["@plugin/name"], |deps| Ok(deps[0].clone())),
            )]
        }
    }

    #[test]
    fn escaped_references_reach_other_modules_services() {
        let plugin = Plugin::builder(meta()).module("x", CrossModule).build();

        assert_eq!(*plugin.get_as::<String>("x/label").unwrap(), "Test Plugin");
    }
}

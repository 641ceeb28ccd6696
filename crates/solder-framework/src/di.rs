//! Service and extension helpers for common wiring shapes.
//!
//! These cover the recurring patterns in module definitions: shared list
//! services that other modules append to, wholesale overrides, and services
//! backed by a JSON file on disk.

use std::sync::Arc;

use solder_core::{Dep, Extension, Service, ServiceValue, expect_dep};

/// A factory for an empty shared list of `T`.
///
/// Pair with [`extend_list`] from other modules to accumulate entries; the
/// list is stored as a single `Vec<T>` service value.
pub fn service_list<T: Send + Sync + 'static>() -> Service {
    Service::new(Vec::<Dep>::new(), |_| {
        Ok(Arc::new(Vec::<T>::new()) as ServiceValue)
    })
}

/// An extension that appends the resolved dependency lists onto the previous
/// list value.
///
/// Every dependency must resolve to a `Vec<T>`; the previous value and each
/// dependency list are concatenated in order.
pub fn extend_list<T, I>(lists: I) -> Extension
where
    T: Clone + Send + Sync + 'static,
    I: IntoIterator,
    I::Item: Into<Dep>,
{
    Extension::new(lists, |prev, deps| {
        let prev = prev
            .downcast::<Vec<T>>()
            .map_err(|_| "extended service is not a list of the expected type")?;
        let mut result: Vec<T> = prev.as_ref().clone();
        for index in 0..deps.len() {
            let list = expect_dep::<Vec<T>>(deps, index)?;
            result.extend(list.iter().cloned());
        }
        Ok(Arc::new(result) as ServiceValue)
    })
}

/// An extension that discards the previous value in favour of the service
/// registered under `replacement`.
pub fn override_with(replacement: impl Into<String>) -> Extension {
    Extension::new([replacement.into()], |_prev, deps| Ok(deps[0].clone()))
}

/// A service that reads and parses the JSON file named by `file_service`.
///
/// The file path is resolved as a `String` service.  When the file is
/// unreadable or malformed the service yields the value of
/// `default_service` instead (or JSON `null` when no default is given) —
/// a missing optional file is not an error.
pub fn json_file(file_service: &str, default_service: Option<&str>) -> Service {
    let mut deps = vec![Dep::id(file_service)];
    if let Some(default) = default_service {
        deps.push(Dep::id(default));
    }

    Service::new(deps, |deps| {
        let fallback = |deps: &[ServiceValue]| {
            deps.get(1)
                .cloned()
                .unwrap_or_else(|| Arc::new(serde_json::Value::Null) as ServiceValue)
        };

        let path = expect_dep::<String>(deps, 0)?;
        let Ok(raw) = std::fs::read_to_string(path.as_str()) else {
            return Ok(fallback(deps));
        };
        match serde_json::from_str::<serde_json::Value>(&raw) {
            Ok(parsed) => Ok(Arc::new(parsed) as ServiceValue),
            Err(_) => Ok(fallback(deps)),
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::container::PluginContainer;
    use crate::module::Module;
    use solder_core::{ContainerExt, HookRegistry};
    use std::io::Write;

    struct ListsModule;

    impl Module for ListsModule {
        fn factories(&self) -> Vec<(String, Service)> {
            vec![
                ("all".into(), service_list::<u32>()),
                ("some".into(), Service::value(vec![1u32, 2])),
                ("more".into(), Service::value(vec![3u32])),
                ("replacement".into(), Service::value("new".to_string())),
                ("old".into(), Service::value("old".to_string())),
            ]
        }

        fn extensions(&self) -> Vec<(String, Extension)> {
            vec![
                ("all".into(), extend_list::<u32, _>(["some", "more"])),
                ("old".into(), override_with("replacement")),
            ]
        }
    }

    fn container(module: &dyn Module) -> PluginContainer {
        PluginContainer::new(Vec::new(), [module], Arc::new(HookRegistry::new()))
    }

    #[test]
    fn extend_list_appends_in_dependency_order() {
        let c = container(&ListsModule);

        let all = c.get_as::<Vec<u32>>("all").unwrap();
        assert_eq!(*all, vec![1, 2, 3]);
    }

    #[test]
    fn override_with_replaces_the_previous_value() {
        let c = container(&ListsModule);

        assert_eq!(*c.get_as::<String>("old").unwrap(), "new");
    }

    struct JsonModule {
        path: String,
    }

    impl Module for JsonModule {
        fn factories(&self) -> Vec<(String, Service)> {
            vec![
                ("config_file".into(), Service::value(self.path.clone())),
                (
                    "fallback".into(),
                    Service::value(serde_json::json!({"fallback": true})),
                ),
                ("config".into(), json_file("config_file", Some("fallback"))),
                ("config_no_default".into(), json_file("config_file", None)),
            ]
        }
    }

    #[test]
    fn json_file_parses_an_existing_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{{\"answer\": 42}}").unwrap();

        let module = JsonModule {
            path: file.path().to_string_lossy().into_owned(),
        };
        let c = container(&module);

        let config = c.get_as::<serde_json::Value>("config").unwrap();
        assert_eq!(config["answer"], 42);
    }

    #[test]
    fn json_file_falls_back_when_the_file_is_missing() {
        let module = JsonModule {
            path: "/definitely/not/here.json".to_string(),
        };
        let c = container(&module);

        let config = c.get_as::<serde_json::Value>("config").unwrap();
        assert_eq!(config["fallback"], true);

        let bare = c.get_as::<serde_json::Value>("config_no_default").unwrap();
        assert!(bare.is_null());
    }

    #[test]
    fn json_file_falls_back_on_malformed_content() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "not json at all").unwrap();

        let module = JsonModule {
            path: file.path().to_string_lossy().into_owned(),
        };
        let c = container(&module);

        let config = c.get_as::<serde_json::Value>("config").unwrap();
        assert_eq!(config["fallback"], true);
    }
}

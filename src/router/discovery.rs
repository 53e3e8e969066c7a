use crate::error::TrackerError;
use crate::router::RouterSpec;
use tracing::{debug, info, warn};

const MODULE_SUFFIX: &str = "_routes";
const ROUTER_SUFFIX: &str = "_router";

/// Catalog entry: a named unit that can be loaded to obtain its exports.
#[derive(Clone, Copy)]
pub struct RouteModule {
    pub name: &'static str,
    pub load: fn() -> Result<ModuleExports, TrackerError>,
}

impl RouteModule {
    pub const fn new(
        name: &'static str,
        load: fn() -> Result<ModuleExports, TrackerError>,
    ) -> Self {
        Self { name, load }
    }
}

/// Named routers exported by a loaded module.
#[derive(Default)]
pub struct ModuleExports {
    routers: Vec<(String, RouterSpec)>,
}

impl ModuleExports {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn export(mut self, name: impl Into<String>, router: RouterSpec) -> Self {
        self.routers.push((name.into(), router));
        self
    }

    pub fn take(&mut self, name: &str) -> Option<RouterSpec> {
        let idx = self.routers.iter().position(|(n, _)| n == name)?;
        Some(self.routers.swap_remove(idx).1)
    }
}

pub struct DiscoveredRouter {
    pub module: &'static str,
    pub prefix: String,
    pub router: RouterSpec,
}

/// `user_routes` -> `Some("user")`. Anything not ending in `_routes`, or with
/// nothing before the first `_`, is not a route module.
pub fn route_prefix(module_name: &str) -> Option<&str> {
    if !module_name.ends_with(MODULE_SUFFIX) {
        return None;
    }
    let (prefix, _) = module_name.split_once('_')?;
    (!prefix.is_empty()).then_some(prefix)
}

/// Load every conforming module in catalog order and collect its
/// `<prefix>_router` export. Non-conforming entries are never loaded.
pub fn discover(catalog: &[RouteModule]) -> Result<Vec<DiscoveredRouter>, TrackerError> {
    let mut found = Vec::new();
    for module in catalog {
        let Some(prefix) = route_prefix(module.name) else {
            debug!(module = module.name, "not a route module; ignoring");
            continue;
        };

        let mut exports = (module.load)().map_err(|e| match e {
            err @ TrackerError::ModuleLoad { .. } => err,
            other => TrackerError::ModuleLoad {
                module: module.name.to_string(),
                reason: other.to_string(),
            },
        })?;

        let attr = format!("{prefix}{ROUTER_SUFFIX}");
        match exports.take(&attr) {
            Some(router) => {
                info!(module = module.name, prefix, "discovered router");
                found.push(DiscoveredRouter {
                    module: module.name,
                    prefix: prefix.to_string(),
                    router,
                });
            }
            None => {
                warn!(
                    module = module.name,
                    expected = %attr,
                    "route module exports no router; skipping"
                );
            }
        }
    }
    Ok(found)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prefix_is_text_before_first_underscore() {
        assert_eq!(route_prefix("user_routes"), Some("user"));
        assert_eq!(route_prefix("emotion_stats_routes"), Some("emotion"));
        assert_eq!(route_prefix("helpers"), None);
        assert_eq!(route_prefix("user_routes_old"), None);
        assert_eq!(route_prefix("_routes"), None);
        assert_eq!(route_prefix("routes"), None);
    }

    fn never_loaded() -> Result<ModuleExports, TrackerError> {
        panic!("non-conforming module must not be loaded");
    }

    fn broken() -> Result<ModuleExports, TrackerError> {
        Err(TrackerError::BadRequest("syntax error".to_string()))
    }

    fn empty() -> Result<ModuleExports, TrackerError> {
        Ok(ModuleExports::new().export("other_router", RouterSpec::new()))
    }

    #[test]
    fn non_conforming_entries_are_not_loaded() {
        let catalog = [RouteModule::new("helpers", never_loaded)];
        assert!(discover(&catalog).unwrap().is_empty());
    }

    #[test]
    fn missing_router_export_is_skipped() {
        let catalog = [RouteModule::new("bar_routes", empty)];
        assert!(discover(&catalog).unwrap().is_empty());
    }

    #[test]
    fn load_failure_is_fatal() {
        let catalog = [
            RouteModule::new("bar_routes", empty),
            RouteModule::new("baz_routes", broken),
        ];
        let err = discover(&catalog).err().unwrap();
        assert!(matches!(err, TrackerError::ModuleLoad { module, .. } if module == "baz_routes"));
    }
}

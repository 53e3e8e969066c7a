use axum::Router;
use axum::http::Method;
use axum::routing::get;
use std::collections::{HashMap, HashSet};
use std::path::PathBuf;
use tower_http::services::ServeDir;
use tracing::{debug, info};

use crate::error::TrackerError;
use crate::router::introspection::{self, RouteInfo, RouteTable};
use crate::router::{AppState, DiscoveredRouter, RouterSpec};

const STATIC_PREFIX: &str = "static";

/// Accumulates mounted routers; consumed by [`ApplicationBuilder::finish`].
pub struct ApplicationBuilder {
    router: Router<AppState>,
    table: Vec<RouteInfo>,
    prefixes: HashSet<String>,
    operations: HashSet<(Method, String)>,
    /// Capture-normalized path -> the first full path registered with that shape.
    shapes: HashMap<String, String>,
    static_dir: Option<PathBuf>,
}

impl Default for ApplicationBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ApplicationBuilder {
    pub fn new() -> Self {
        let mut prefixes = HashSet::new();
        prefixes.insert(introspection::PREFIX.to_string());
        Self {
            router: Router::new(),
            table: Vec::new(),
            prefixes,
            operations: HashSet::new(),
            shapes: HashMap::new(),
            static_dir: None,
        }
    }

    /// Serve `dir` under `/static`. Reserves the `static` prefix.
    pub fn with_static_dir(mut self, dir: impl Into<PathBuf>) -> Result<Self, TrackerError> {
        if !self.prefixes.insert(STATIC_PREFIX.to_string()) {
            return Err(TrackerError::DuplicatePrefix(STATIC_PREFIX.to_string()));
        }
        self.table.push(RouteInfo::new(format!("/{STATIC_PREFIX}"), STATIC_PREFIX));
        self.static_dir = Some(dir.into());
        Ok(self)
    }

    /// Mount every operation of `routes` under `/<prefix>`.
    pub fn mount(mut self, prefix: &str, routes: RouterSpec) -> Result<Self, TrackerError> {
        validate_prefix(prefix)?;
        if !self.prefixes.insert(prefix.to_string()) {
            return Err(TrackerError::DuplicatePrefix(prefix.to_string()));
        }

        for op in routes.operations() {
            let mount_error = |reason: String| TrackerError::Mount {
                prefix: prefix.to_string(),
                reason,
            };
            let shape = path_shape(&op.path).map_err(mount_error)?;
            let full_path = format!("/{prefix}{}", op.path);
            let full_shape = format!("/{prefix}{shape}");

            if let Some(existing) = self.shapes.get(&full_shape)
                && *existing != full_path
            {
                return Err(mount_error(format!(
                    "{full_path} conflicts with {existing}: capture names differ"
                )));
            }
            if !self.operations.insert((op.method.clone(), full_shape.clone())) {
                return Err(mount_error(format!(
                    "{} {full_path} is declared twice",
                    op.method
                )));
            }
            self.shapes.insert(full_shape, full_path.clone());
            debug!(method = %op.method, path = %full_path, name = %op.name, "mounting operation");
            self.router = self.router.route(&full_path, op.handler.clone());
            self.table.push(RouteInfo::new(full_path, op.name.clone()));
        }

        info!(prefix, operations = routes.operations().len(), "router mounted");
        Ok(self)
    }

    pub fn mount_all(
        self,
        discovered: impl IntoIterator<Item = DiscoveredRouter>,
    ) -> Result<Self, TrackerError> {
        discovered
            .into_iter()
            .try_fold(self, |builder, d| {
                debug!(module = d.module, prefix = %d.prefix, "mounting discovered router");
                builder.mount(&d.prefix, d.router)
            })
    }

    /// Freeze the route table, add `/url-list`, and bind `state`.
    pub fn finish(mut self, state: AppState) -> (Router, RouteTable) {
        self.table.push(RouteInfo::new(
            introspection::PATH,
            introspection::HANDLER_NAME,
        ));
        let table = RouteTable::from(self.table);

        let mut app: Router<RouteTable> = self.router.with_state(state);
        app = app.route(introspection::PATH, get(introspection::get_all_urls));
        if let Some(dir) = self.static_dir {
            app = app.nest_service(&format!("/{STATIC_PREFIX}"), ServeDir::new(dir));
        }

        (app.with_state(table.clone()), table)
    }
}

fn validate_prefix(prefix: &str) -> Result<(), TrackerError> {
    let valid = !prefix.is_empty()
        && prefix
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-');
    if valid {
        Ok(())
    } else {
        Err(TrackerError::Mount {
            prefix: prefix.to_string(),
            reason: "prefix must be non-empty ASCII alphanumerics or `-`".to_string(),
        })
    }
}

/// Check an operation path and return it with every capture name erased,
/// so `/{user_id}` and `/{id}` compare equal.
fn path_shape(path: &str) -> Result<String, String> {
    let Some(rest) = path.strip_prefix('/') else {
        return Err(format!("operation path `{path}` must start with `/`"));
    };
    let segments: Vec<&str> = rest.split('/').collect();
    let last = segments.len() - 1;
    let mut shape = String::with_capacity(path.len());

    for (idx, segment) in segments.into_iter().enumerate() {
        shape.push('/');
        if segment.starts_with(':') || segment.starts_with('*') {
            return Err(format!(
                "segment `{segment}` in `{path}` uses `:`/`*` syntax; write `{{name}}` instead"
            ));
        }
        if !segment.contains(['{', '}']) {
            shape.push_str(segment);
            continue;
        }

        let inner = segment
            .strip_prefix('{')
            .and_then(|s| s.strip_suffix('}'))
            .ok_or_else(|| format!("segment `{segment}` in `{path}` has unbalanced braces"))?;
        let (wildcard, name) = match inner.strip_prefix('*') {
            Some(name) => (true, name),
            None => (false, inner),
        };
        let valid_name =
            !name.is_empty() && name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_');
        if !valid_name {
            return Err(format!("segment `{segment}` in `{path}` is not a valid capture"));
        }
        if wildcard && idx != last {
            return Err(format!("wildcard `{segment}` in `{path}` must be the last segment"));
        }
        shape.push_str("{}");
    }
    Ok(shape)
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn ok() -> &'static str {
        "ok"
    }

    #[test]
    fn duplicate_prefix_is_rejected() {
        let routes = RouterSpec::new().get("/a", "a", ok);
        let builder = ApplicationBuilder::new().mount("foo", routes.clone()).unwrap();
        assert!(matches!(
            builder.mount("foo", routes),
            Err(TrackerError::DuplicatePrefix(p)) if p == "foo"
        ));
    }

    #[test]
    fn reserved_prefixes_are_rejected() {
        let routes = RouterSpec::new().get("/a", "a", ok);
        assert!(ApplicationBuilder::new().mount("url-list", routes.clone()).is_err());
        let builder = ApplicationBuilder::new().with_static_dir("assets").unwrap();
        assert!(builder.mount("static", routes).is_err());
    }

    #[test]
    fn relative_operation_path_is_rejected() {
        let routes = RouterSpec::new().get("a", "a", ok);
        assert!(matches!(
            ApplicationBuilder::new().mount("foo", routes),
            Err(TrackerError::Mount { .. })
        ));
    }

    #[test]
    fn same_method_and_path_twice_is_rejected() {
        let routes = RouterSpec::new().get("/a", "a", ok).get("/a", "b", ok);
        assert!(ApplicationBuilder::new().mount("foo", routes).is_err());
    }

    #[test]
    fn differently_named_captures_at_same_position_are_rejected() {
        let routes = RouterSpec::new()
            .get("/{user_id}", "get", ok)
            .delete("/{id}", "delete", ok);
        assert!(matches!(
            ApplicationBuilder::new().mount("foo", routes),
            Err(TrackerError::Mount { .. })
        ));
    }

    #[test]
    fn same_capture_name_with_other_method_mounts() {
        let routes = RouterSpec::new()
            .get("/{user_id}", "get", ok)
            .delete("/{user_id}", "delete", ok);
        assert!(ApplicationBuilder::new().mount("foo", routes).is_ok());
    }

    #[test]
    fn colon_and_star_segments_are_rejected() {
        for path in ["/:id", "/files/*rest"] {
            let routes = RouterSpec::new().get(path, "legacy", ok);
            assert!(
                matches!(
                    ApplicationBuilder::new().mount("foo", routes),
                    Err(TrackerError::Mount { .. })
                ),
                "{path}"
            );
        }
    }

    #[test]
    fn malformed_captures_are_rejected() {
        for path in ["/{id", "/id}", "/{}", "/{*rest}/tail", "/x{id}"] {
            let routes = RouterSpec::new().get(path, "bad", ok);
            assert!(ApplicationBuilder::new().mount("foo", routes).is_err(), "{path}");
        }
    }

    #[test]
    fn path_shape_erases_capture_names() {
        assert_eq!(path_shape("/{user_id}").unwrap(), "/{}");
        assert_eq!(path_shape("/a/{id}/b").unwrap(), "/a/{}/b");
        assert_eq!(path_shape("/files/{*rest}").unwrap(), "/files/{}");
        assert_eq!(path_shape("/register").unwrap(), "/register");
    }

    #[test]
    fn invalid_prefix_is_rejected() {
        let routes = RouterSpec::new().get("/a", "a", ok);
        assert!(ApplicationBuilder::new().mount("", routes.clone()).is_err());
        assert!(ApplicationBuilder::new().mount("a/b", routes).is_err());
    }
}

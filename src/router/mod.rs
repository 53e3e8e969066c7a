//! Route discovery, composition and introspection.
//!
//! Route modules describe their operations as a [`RouterSpec`]. Discovery
//! picks the specs out of the module catalog, the [`ApplicationBuilder`] mounts
//! them under their prefixes, and the frozen [`RouteTable`] backs `/url-list`.

pub mod composer;
pub mod discovery;
pub mod introspection;

pub use composer::ApplicationBuilder;
pub use discovery::{DiscoveredRouter, ModuleExports, RouteModule, discover, route_prefix};
pub use introspection::{RouteInfo, RouteTable};

use axum::handler::Handler;
use axum::http::Method;
use axum::routing::{MethodFilter, MethodRouter, on};

use crate::db::TrackerStorage;

/// Shared state handed to every router operation.
#[derive(Clone)]
pub struct AppState {
    pub storage: TrackerStorage,
}

impl AppState {
    pub fn new(storage: TrackerStorage) -> Self {
        Self { storage }
    }
}

/// A single HTTP operation, relative to its router's mount point.
#[derive(Clone)]
pub struct Operation {
    pub method: Method,
    pub path: String,
    pub name: String,
    pub(crate) handler: MethodRouter<AppState>,
}

/// A mountable collection of operations.
#[derive(Clone, Default)]
pub struct RouterSpec {
    operations: Vec<Operation>,
}

impl RouterSpec {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get<H, T>(self, path: &str, name: &str, handler: H) -> Self
    where
        H: Handler<T, AppState>,
        T: 'static,
    {
        self.operation(Method::GET, MethodFilter::GET, path, name, handler)
    }

    pub fn post<H, T>(self, path: &str, name: &str, handler: H) -> Self
    where
        H: Handler<T, AppState>,
        T: 'static,
    {
        self.operation(Method::POST, MethodFilter::POST, path, name, handler)
    }

    pub fn delete<H, T>(self, path: &str, name: &str, handler: H) -> Self
    where
        H: Handler<T, AppState>,
        T: 'static,
    {
        self.operation(Method::DELETE, MethodFilter::DELETE, path, name, handler)
    }

    fn operation<H, T>(
        mut self,
        method: Method,
        filter: MethodFilter,
        path: &str,
        name: &str,
        handler: H,
    ) -> Self
    where
        H: Handler<T, AppState>,
        T: 'static,
    {
        self.operations.push(Operation {
            method,
            path: path.to_string(),
            name: name.to_string(),
            handler: on(filter, handler),
        });
        self
    }

    pub fn operations(&self) -> &[Operation] {
        &self.operations
    }
}

use axum::{Json, extract::State};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

pub const PATH: &str = "/url-list";
pub const PREFIX: &str = "url-list";
pub const HANDLER_NAME: &str = "get_all_urls";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteInfo {
    pub path: String,
    pub name: String,
}

impl RouteInfo {
    pub fn new(path: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            name: name.into(),
        }
    }
}

/// Mounted routes in registration order. Immutable once built.
#[derive(Debug, Clone)]
pub struct RouteTable(Arc<[RouteInfo]>);

impl RouteTable {
    pub fn routes(&self) -> &[RouteInfo] {
        &self.0
    }
}

impl From<Vec<RouteInfo>> for RouteTable {
    fn from(routes: Vec<RouteInfo>) -> Self {
        Self(routes.into())
    }
}

/// GET /url-list
pub async fn get_all_urls(State(table): State<RouteTable>) -> Json<Vec<RouteInfo>> {
    Json(table.routes().to_vec())
}

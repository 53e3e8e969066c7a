//! Route modules shipped with the service.
//!
//! Each module is named `<prefix>_routes` and exports `<prefix>_router`;
//! discovery mounts it under `/<prefix>`. New modules are added to
//! [`catalog`].

pub mod emotion_routes;
pub mod user_routes;

use crate::router::RouteModule;

const CATALOG: &[RouteModule] = &[
    RouteModule::new("user_routes", user_routes::exports),
    RouteModule::new("emotion_routes", emotion_routes::exports),
];

pub fn catalog() -> &'static [RouteModule] {
    CATALOG
}

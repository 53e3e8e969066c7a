//! Database module: connection lifecycle, schema and row access.
//!
//! Layout:
//! - `lifecycle.rs`: owns the shared pool (`Uninitialized -> Connected -> Disconnected`)
//! - `schema.rs`: ordered SQL DDL for `users` and `emotions`
//! - `bootstrap.rs`: applies the schema through a `DdlExecutor`
//! - `models.rs`: Rust structs mirroring DB rows
//! - `sqlite.rs`: queries used by the route modules

pub mod bootstrap;
pub mod lifecycle;
pub mod models;
pub mod schema;
pub mod sqlite;

pub use bootstrap::{DdlExecutor, ensure_schema};
pub use lifecycle::{ConnectionManager, ConnectionState};
pub use models::{DbEmotion, DbUser, NewUser};
pub use schema::SCHEMA;
pub use sqlite::{SqlitePool, TrackerStorage};

pub mod config;
pub mod db;
pub mod error;
pub mod handlers;
pub mod router;
pub mod routes;
pub mod startup;
pub mod types;

pub use error::TrackerError;
pub use startup::{Phase, Service};

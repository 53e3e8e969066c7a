use crate::config::Config;
use crate::db::sqlite::SqlitePool;
use crate::error::TrackerError;
use crate::startup::Phase;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use std::str::FromStr;
use tracing::info;

/// `Uninitialized -> Connected -> Disconnected`, each edge taken at most once.
#[derive(Debug, Default)]
pub enum ConnectionState {
    #[default]
    Uninitialized,
    Connected(SqlitePool),
    Disconnected,
}

/// Sole owner of the process-wide pool. Handlers receive clones of the pool
/// but never open or close it.
#[derive(Debug, Default)]
pub struct ConnectionManager {
    state: ConnectionState,
}

impl ConnectionManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &ConnectionState {
        &self.state
    }

    pub fn is_connected(&self) -> bool {
        matches!(self.state, ConnectionState::Connected(_))
    }

    /// Open the pool. The first connection is established eagerly so an
    /// unreachable database fails here rather than on the first request.
    pub async fn connect(&mut self, cfg: &Config) -> Result<&SqlitePool, TrackerError> {
        match self.state {
            ConnectionState::Uninitialized => {}
            ConnectionState::Connected(_) => {
                return Err(TrackerError::InvalidTransition {
                    from: Phase::Connecting,
                    to: Phase::Connecting,
                });
            }
            ConnectionState::Disconnected => {
                return Err(TrackerError::InvalidTransition {
                    from: Phase::Closed,
                    to: Phase::Connecting,
                });
            }
        }

        let connection_error = |source| TrackerError::Connection {
            url: cfg.database_url.clone(),
            source,
        };
        let options = SqliteConnectOptions::from_str(&cfg.database_url)
            .map_err(connection_error)?
            .create_if_missing(true)
            .foreign_keys(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(cfg.max_connections)
            .acquire_timeout(cfg.connect_timeout())
            .connect_with(options)
            .await
            .map_err(connection_error)?;

        info!(database_url = %cfg.database_url, "database connected");
        self.state = ConnectionState::Connected(pool);
        self.pool()
    }

    pub fn pool(&self) -> Result<&SqlitePool, TrackerError> {
        match &self.state {
            ConnectionState::Connected(pool) => Ok(pool),
            _ => Err(TrackerError::ConnectionClosed),
        }
    }

    /// Close the pool, waiting for checked-out connections to be returned.
    pub async fn disconnect(&mut self) -> Result<(), TrackerError> {
        match std::mem::replace(&mut self.state, ConnectionState::Disconnected) {
            ConnectionState::Connected(pool) => {
                pool.close().await;
                info!("database disconnected");
                Ok(())
            }
            previous => {
                self.state = previous;
                Err(TrackerError::ConnectionClosed)
            }
        }
    }
}

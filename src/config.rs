use figment::{
    Figment,
    providers::{Env, Serialized},
};
use serde::{Deserialize, Serialize};
use std::{net::SocketAddr, path::PathBuf, time::Duration};

use crate::error::TrackerError;

/// Environment variable prefix, e.g. `TRACKER_DATABASE_URL`.
pub const ENV_PREFIX: &str = "TRACKER_";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub database_url: String,
    pub listen_addr: SocketAddr,
    pub loglevel: String,
    /// Directory served under `/static`; unset disables the mount.
    pub static_dir: Option<PathBuf>,
    pub max_connections: u32,
    pub connect_timeout_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_url: "sqlite://emotion-tracker.db".to_string(),
            listen_addr: SocketAddr::from(([0, 0, 0, 0], 8000)),
            loglevel: "info".to_string(),
            static_dir: None,
            max_connections: 5,
            connect_timeout_secs: 5,
        }
    }
}

impl Config {
    /// Defaults overlaid with `TRACKER_*` environment variables.
    pub fn load() -> Result<Self, TrackerError> {
        Ok(Self::figment().extract()?)
    }

    pub fn figment() -> Figment {
        Figment::from(Serialized::defaults(Config::default())).merge(Env::prefixed(ENV_PREFIX))
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn env_overrides_defaults() {
        figment::Jail::expect_with(|jail| {
            jail.set_env("TRACKER_DATABASE_URL", "sqlite://other.db");
            jail.set_env("TRACKER_MAX_CONNECTIONS", "2");
            let cfg: Config = Config::figment().extract()?;
            assert_eq!(cfg.database_url, "sqlite://other.db");
            assert_eq!(cfg.max_connections, 2);
            assert_eq!(cfg.loglevel, "info");
            assert!(cfg.static_dir.is_none());
            Ok(())
        });
    }
}

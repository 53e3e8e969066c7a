//! Process lifecycle: connect, bootstrap the schema, compose routes, serve,
//! shut down. Each step is a checked transition of [`Phase`].

use axum::Router;
use std::future::Future;
use tokio::net::TcpListener;
use tower_http::cors::{AllowHeaders, AllowMethods, AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{error, info};

use crate::config::Config;
use crate::db::{self, ConnectionManager, TrackerStorage};
use crate::error::TrackerError;
use crate::router::{self, AppState, ApplicationBuilder, RouteModule, RouteTable};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Uninitialized,
    Connecting,
    SchemaReady,
    Serving,
    ShuttingDown,
    Closed,
}

impl Phase {
    fn next(self) -> Option<Phase> {
        match self {
            Phase::Uninitialized => Some(Phase::Connecting),
            Phase::Connecting => Some(Phase::SchemaReady),
            Phase::SchemaReady => Some(Phase::Serving),
            Phase::Serving => Some(Phase::ShuttingDown),
            Phase::ShuttingDown => Some(Phase::Closed),
            Phase::Closed => None,
        }
    }
}

pub struct Service {
    cfg: Config,
    phase: Phase,
    connection: ConnectionManager,
    routes: Option<RouteTable>,
}

impl Service {
    pub fn new(cfg: Config) -> Self {
        Self {
            cfg,
            phase: Phase::Uninitialized,
            connection: ConnectionManager::new(),
            routes: None,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn connection(&self) -> &ConnectionManager {
        &self.connection
    }

    /// The composed route table; `None` until [`Service::compose`] succeeds.
    pub fn routes(&self) -> Option<&RouteTable> {
        self.routes.as_ref()
    }

    fn advance(&mut self, to: Phase) -> Result<(), TrackerError> {
        if self.phase.next() != Some(to) {
            return Err(TrackerError::InvalidTransition {
                from: self.phase,
                to,
            });
        }
        info!(from = ?self.phase, to = ?to, "lifecycle transition");
        self.phase = to;
        Ok(())
    }

    /// `Uninitialized -> Connecting`. A connection failure closes the service.
    pub async fn connect(&mut self) -> Result<(), TrackerError> {
        self.advance(Phase::Connecting)?;
        if let Err(e) = self.connection.connect(&self.cfg).await {
            error!(error = %e, "database connection failed");
            self.phase = Phase::Closed;
            return Err(e);
        }
        Ok(())
    }

    /// `Connecting -> SchemaReady`. On failure the pool is released first.
    pub async fn ensure_schema(&mut self) -> Result<(), TrackerError> {
        if self.phase != Phase::Connecting {
            return Err(TrackerError::InvalidTransition {
                from: self.phase,
                to: Phase::SchemaReady,
            });
        }
        let result = db::ensure_schema(self.connection.pool()?).await;
        if let Err(e) = result {
            error!(error = %e, "schema bootstrap failed");
            self.abort().await;
            return Err(e);
        }
        self.advance(Phase::SchemaReady)
    }

    /// `SchemaReady -> Serving`: discover route modules and build the
    /// immutable application. Any discovery or mount error aborts.
    pub async fn compose(&mut self, catalog: &[RouteModule]) -> Result<Router, TrackerError> {
        if self.phase != Phase::SchemaReady {
            return Err(TrackerError::InvalidTransition {
                from: self.phase,
                to: Phase::Serving,
            });
        }
        match self.build_app(catalog) {
            Ok((app, table)) => {
                self.routes = Some(table);
                self.advance(Phase::Serving)?;
                Ok(app)
            }
            Err(e) => {
                error!(error = %e, "route composition failed");
                self.abort().await;
                Err(e)
            }
        }
    }

    fn build_app(&self, catalog: &[RouteModule]) -> Result<(Router, RouteTable), TrackerError> {
        let storage = TrackerStorage::new(self.connection.pool()?.clone());
        let discovered = router::discover(catalog)?;

        let mut builder = ApplicationBuilder::new();
        if let Some(dir) = &self.cfg.static_dir {
            builder = builder.with_static_dir(dir)?;
        }
        let (app, table) = builder
            .mount_all(discovered)?
            .finish(AppState::new(storage));

        info!(routes = table.routes().len(), "route table composed");
        Ok((app.layer(cors_layer()).layer(TraceLayer::new_for_http()), table))
    }

    /// `Serving -> ShuttingDown -> Closed`.
    pub async fn shutdown(&mut self) -> Result<(), TrackerError> {
        self.advance(Phase::ShuttingDown)?;
        let result = self.connection.disconnect().await;
        self.advance(Phase::Closed)?;
        result
    }

    async fn abort(&mut self) {
        if self.connection.is_connected()
            && let Err(e) = self.connection.disconnect().await
        {
            error!(error = %e, "failed to release database connection");
        }
        self.phase = Phase::Closed;
    }
}

/// Any origin, method and header; credentials allowed. Origins are mirrored
/// because a literal `*` cannot be combined with credentials.
fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(AllowOrigin::mirror_request())
        .allow_methods(AllowMethods::mirror_request())
        .allow_headers(AllowHeaders::mirror_request())
        .allow_credentials(true)
}

/// Run every startup step and return the composed application.
pub async fn launch(
    cfg: Config,
    catalog: &[RouteModule],
) -> Result<(Service, Router), TrackerError> {
    let mut service = Service::new(cfg);
    service.connect().await?;
    service.ensure_schema().await?;
    let app = service.compose(catalog).await?;
    Ok((service, app))
}

/// Launch, serve until `shutdown_signal` resolves, then close the database.
/// The listener is only bound after startup has fully succeeded.
pub async fn run<F>(
    cfg: Config,
    catalog: &[RouteModule],
    shutdown_signal: F,
) -> Result<(), TrackerError>
where
    F: Future<Output = ()> + Send + 'static,
{
    let addr = cfg.listen_addr;
    let (mut service, app) = launch(cfg, catalog).await?;

    let listener = match TcpListener::bind(addr).await {
        Ok(l) => l,
        Err(e) => {
            service.shutdown().await?;
            return Err(e.into());
        }
    };
    info!("HTTP server listening on {}", addr);

    let served = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal)
        .await;
    info!("HTTP server stopped");
    service.shutdown().await?;
    served?;
    Ok(())
}

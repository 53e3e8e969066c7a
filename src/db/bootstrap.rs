use crate::db::schema::{self, SCHEMA, SchemaObject};
use crate::db::sqlite::SqlitePool;
use crate::error::TrackerError;
use std::future::Future;
use tracing::{debug, info};

/// Anything that can run a single DDL statement.
pub trait DdlExecutor {
    fn execute_ddl(&self, sql: &str) -> impl Future<Output = Result<(), sqlx::Error>> + Send;
}

impl DdlExecutor for SqlitePool {
    async fn execute_ddl(&self, sql: &str) -> Result<(), sqlx::Error> {
        sqlx::query(sql).execute(self).await?;
        Ok(())
    }
}

/// Create the bundled schema. Safe to call against an already-initialized database.
pub async fn ensure_schema<E: DdlExecutor>(executor: &E) -> Result<(), TrackerError> {
    apply(executor, SCHEMA).await
}

/// Apply `objects` in declaration order, stopping at the first failure.
pub async fn apply<E: DdlExecutor>(
    executor: &E,
    objects: &[SchemaObject],
) -> Result<(), TrackerError> {
    schema::validate_order(objects)?;
    for object in objects {
        debug!(object = object.name, "applying schema object");
        executor
            .execute_ddl(object.ddl.trim())
            .await
            .map_err(|source| TrackerError::SchemaBootstrap {
                object: object.name,
                source,
            })?;
    }
    info!(count = objects.len(), "schema ready");
    Ok(())
}

use jitsu_console_schema::StorageTable;
use sqlx::AnyPool;
use sqlx::any::AnyPoolOptions;
use std::sync::OnceLock;
use tracing::{debug, warn};

use super::schema;
use crate::config::DatabaseConfig;
use crate::error::ConsoleError;

const MISSING_DATABASE_URL: &str = "database url not configured; the console soft-deletes rows, \
     so re-creating an object with the same id requires database access to hard-delete stale rows \
     (set database.url or JITSU_DATABASE_URL)";

/// Rows removed by one [`SoftDeleteReconciler::purge_soft_deleted`] call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PurgeReport {
    pub table: StorageTable,
    /// Soft-deleted links that referenced the object (always 0 for the link table).
    pub links_removed: u64,
    /// 0 when no soft-deleted row with that id existed.
    pub rows_removed: u64,
}

/// Hard-deletes soft-deleted rows so their ids can be reused.
///
/// The pool is opened on first use and cached for the lifetime of the reconciler,
/// including a failure to open it, which is reported again on every later call.
pub struct SoftDeleteReconciler {
    settings: DatabaseConfig,
    pool: OnceLock<Result<AnyPool, String>>,
}

impl SoftDeleteReconciler {
    pub fn new(settings: DatabaseConfig) -> Self {
        Self {
            settings,
            pool: OnceLock::new(),
        }
    }

    fn pool(&self) -> Result<&AnyPool, ConsoleError> {
        self.pool
            .get_or_init(|| {
                let url = self
                    .settings
                    .connection_url()
                    .ok_or_else(|| MISSING_DATABASE_URL.to_string())?;
                sqlx::any::install_default_drivers();
                AnyPoolOptions::new()
                    .max_connections(self.settings.max_connections.max(1))
                    .acquire_timeout(self.settings.acquire_timeout())
                    .connect_lazy(url)
                    .map_err(|err| format!("invalid database url: {err}"))
            })
            .as_ref()
            .map_err(|msg| ConsoleError::Configuration(msg.clone()))
    }

    /// Removes the soft-deleted row `id` from `table`.
    ///
    /// For the object table, soft-deleted links pointing at or from the object go first.
    /// Both statements share one transaction; rows with `deleted = false` are never
    /// touched, so an active row blocking the id surfaces again as the original conflict.
    pub async fn purge_soft_deleted(
        &self,
        id: &str,
        table: StorageTable,
    ) -> Result<PurgeReport, ConsoleError> {
        let pool = self.pool()?;
        let schema_name = self.settings.qualified_schema();

        warn!(
            table = %table,
            id,
            "hard-deleting soft-deleted console row to unblock re-creation"
        );

        let mut tx = pool.begin().await?;

        let links_removed = if table == StorageTable::Object {
            sqlx::query(&schema::purge_referencing_links_sql(schema_name))
                .bind(id)
                .execute(&mut *tx)
                .await?
                .rows_affected()
        } else {
            0
        };

        let rows_removed = sqlx::query(&schema::purge_row_sql(table, schema_name))
            .bind(id)
            .execute(&mut *tx)
            .await?
            .rows_affected();

        tx.commit().await?;

        debug!(table = %table, id, links_removed, rows_removed, "purge committed");

        Ok(PurgeReport {
            table,
            links_removed,
            rows_removed,
        })
    }

    /// Closes the pool if it was ever opened.
    pub async fn close(&self) {
        if let Some(Ok(pool)) = self.pool.get() {
            pool.close().await;
        }
    }
}

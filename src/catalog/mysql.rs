//! MySQL catalog backed by `information_schema`.

use async_trait::async_trait;
use log::debug;
use sqlx::MySqlPool;

use super::{ViewCatalog, require_definition};
use crate::errors::CatalogError;
use crate::models::enums::DatabaseType;

pub struct MySqlCatalog {
    pool: MySqlPool,
}

impl MySqlCatalog {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ViewCatalog for MySqlCatalog {
    fn database_type(&self) -> DatabaseType {
        DatabaseType::MySQL
    }

    async fn view_definition(&self, database: &str, view: &str) -> Result<String, CatalogError> {
        debug!("MySqlCatalog: fetching definition of {}.{}", database, view);
        let row = sqlx::query_as::<_, (Option<String>,)>(
            "SELECT VIEW_DEFINITION FROM information_schema.views WHERE table_schema = ? AND table_name = ?",
        )
        .bind(database)
        .bind(view)
        .fetch_optional(&self.pool)
        .await?;
        require_definition(row.and_then(|(text,)| text), database, view)
    }

    async fn view_names(&self, database: &str, pattern: &str) -> Result<Vec<String>, CatalogError> {
        let rows = sqlx::query_as::<_, (String,)>(
            "SELECT table_name FROM information_schema.views WHERE table_schema = ? AND table_name LIKE ? ORDER BY table_name",
        )
        .bind(database)
        .bind(pattern)
        .fetch_all(&self.pool)
        .await?;
        debug!("MySqlCatalog: {} views match {}", rows.len(), pattern);
        Ok(rows.into_iter().map(|(name,)| name).collect())
    }

    async fn table_exists(&self, database: &str, table: &str) -> Result<bool, CatalogError> {
        let (count,) = sqlx::query_as::<_, (i64,)>(
            "SELECT COUNT(TABLE_NAME) FROM information_schema.TABLES WHERE TABLE_SCHEMA = ? AND TABLE_NAME = ?",
        )
        .bind(database)
        .bind(table)
        .fetch_one(&self.pool)
        .await?;
        Ok(count == 1)
    }
}

//! PostgreSQL catalog backed by `information_schema`.

use async_trait::async_trait;
use log::debug;
use sqlx::PgPool;

use super::{ViewCatalog, require_definition};
use crate::errors::CatalogError;
use crate::models::enums::DatabaseType;

pub struct PostgresCatalog {
    pool: PgPool,
}

impl PostgresCatalog {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ViewCatalog for PostgresCatalog {
    fn database_type(&self) -> DatabaseType {
        DatabaseType::PostgreSQL
    }

    async fn view_definition(&self, database: &str, view: &str) -> Result<String, CatalogError> {
        debug!("PostgresCatalog: fetching definition of {}.{}", database, view);
        let row = sqlx::query_as::<_, (Option<String>,)>(
            "SELECT view_definition::text FROM information_schema.views WHERE table_schema = $1 AND table_name = $2",
        )
        .bind(database)
        .bind(view)
        .fetch_optional(&self.pool)
        .await?;
        require_definition(row.and_then(|(text,)| text), database, view)
    }

    async fn view_names(&self, database: &str, pattern: &str) -> Result<Vec<String>, CatalogError> {
        let rows = sqlx::query_as::<_, (String,)>(
            "SELECT table_name::text FROM information_schema.views WHERE table_schema = $1 AND table_name LIKE $2 ORDER BY table_name",
        )
        .bind(database)
        .bind(pattern)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(|(name,)| name).collect())
    }

    async fn table_exists(&self, database: &str, table: &str) -> Result<bool, CatalogError> {
        let (count,) = sqlx::query_as::<_, (i64,)>(
            "SELECT COUNT(*) FROM information_schema.tables WHERE table_schema = $1 AND table_name = $2",
        )
        .bind(database)
        .bind(table)
        .fetch_one(&self.pool)
        .await?;
        Ok(count == 1)
    }
}

//! SQLite catalog backed by `sqlite_master`. The definition text is the full `CREATE VIEW`
//! statement; the parser front end accepts it as is.

use async_trait::async_trait;
use log::debug;
use sqlx::SqlitePool;

use super::{ViewCatalog, require_definition};
use crate::errors::CatalogError;
use crate::models::enums::DatabaseType;

pub struct SqliteCatalog {
    pool: SqlitePool,
}

impl SqliteCatalog {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// `sqlite_master` of an attached schema; an empty name means `main`.
    fn master_table(database: &str) -> String {
        let schema = if database.is_empty() { "main" } else { database };
        format!("\"{}\".sqlite_master", schema.replace('"', "\"\""))
    }
}

#[async_trait]
impl ViewCatalog for SqliteCatalog {
    fn database_type(&self) -> DatabaseType {
        DatabaseType::SQLite
    }

    async fn view_definition(&self, database: &str, view: &str) -> Result<String, CatalogError> {
        debug!("SqliteCatalog: fetching definition of {}.{}", database, view);
        let sql = format!("SELECT sql FROM {} WHERE type = 'view' AND name = ?", Self::master_table(database));
        let row = sqlx::query_as::<_, (Option<String>,)>(&sql)
            .bind(view)
            .fetch_optional(&self.pool)
            .await?;
        require_definition(row.and_then(|(text,)| text), database, view)
    }

    async fn view_names(&self, database: &str, pattern: &str) -> Result<Vec<String>, CatalogError> {
        let sql = format!(
            "SELECT name FROM {} WHERE type = 'view' AND name LIKE ? ORDER BY name",
            Self::master_table(database)
        );
        let rows = sqlx::query_as::<_, (String,)>(&sql)
            .bind(pattern)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows.into_iter().map(|(name,)| name).collect())
    }

    async fn table_exists(&self, database: &str, table: &str) -> Result<bool, CatalogError> {
        let sql = format!("SELECT COUNT(*) FROM {} WHERE type = 'table' AND name = ?", Self::master_table(database));
        let (count,) = sqlx::query_as::<_, (i64,)>(&sql)
            .bind(table)
            .fetch_one(&self.pool)
            .await?;
        Ok(count == 1)
    }
}

//! Schema catalog access: where view definition text comes from.
//!
//! Each database type gets its own catalog so new backends can be added without touching the
//! conversion logic.

pub mod memory;
pub mod mysql;
pub mod postgres;
pub mod sqlite;

use log::info;

pub use memory::StaticCatalog;
pub use mysql::MySqlCatalog;
pub use postgres::PostgresCatalog;
pub use sqlite::SqliteCatalog;

use crate::config::ReaderConfig;
use crate::errors::CatalogError;
use crate::models::enums::DatabaseType;

/// Read-only lookups against a database's schema catalog.
#[async_trait::async_trait]
pub trait ViewCatalog: Send + Sync {
    fn database_type(&self) -> DatabaseType;

    /// Raw SQL text defining `view` in `database`. Fails with [`CatalogError::NotFound`] when the
    /// view does not exist or carries no definition.
    async fn view_definition(&self, database: &str, view: &str) -> Result<String, CatalogError>;

    /// Names of the views in `database` matching a SQL `LIKE` pattern (`%` and `_` wildcards).
    async fn view_names(&self, database: &str, pattern: &str) -> Result<Vec<String>, CatalogError>;

    async fn table_exists(&self, database: &str, table: &str) -> Result<bool, CatalogError>;
}

/// Opens a pool for the configured database and wraps it in the matching catalog.
pub async fn connect(config: &ReaderConfig) -> Result<Box<dyn ViewCatalog>, CatalogError> {
    let url = config.database_url.as_deref().ok_or(CatalogError::MissingUrl)?;
    info!("connecting to {} catalog", config.database_type);
    let catalog: Box<dyn ViewCatalog> = match config.database_type {
        DatabaseType::MySQL => Box::new(MySqlCatalog::new(
            sqlx::mysql::MySqlPoolOptions::new()
                .max_connections(config.max_connections)
                .connect(url)
                .await?,
        )),
        DatabaseType::PostgreSQL => Box::new(PostgresCatalog::new(
            sqlx::postgres::PgPoolOptions::new()
                .max_connections(config.max_connections)
                .connect(url)
                .await?,
        )),
        DatabaseType::SQLite => Box::new(SqliteCatalog::new(
            sqlx::sqlite::SqlitePoolOptions::new()
                .max_connections(config.max_connections)
                .connect(url)
                .await?,
        )),
    };
    Ok(catalog)
}

/// Definition text, treating a missing row or an empty definition as not found.
pub(crate) fn require_definition(
    definition: Option<String>,
    database: &str,
    view: &str,
) -> Result<String, CatalogError> {
    match definition {
        Some(text) if !text.trim().is_empty() => Ok(text),
        _ => Err(CatalogError::NotFound {
            database: database.to_string(),
            view: view.to_string(),
        }),
    }
}

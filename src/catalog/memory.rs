//! In-memory catalog, for offline conversion and tests.

use std::collections::{BTreeMap, BTreeSet};

use async_trait::async_trait;
use regex::Regex;

use super::{ViewCatalog, require_definition};
use crate::errors::CatalogError;
use crate::models::enums::DatabaseType;

#[derive(Debug, Clone, Default)]
pub struct StaticCatalog {
    database_type: DatabaseType,
    views: BTreeMap<(String, String), String>,
    tables: BTreeSet<(String, String)>,
}

impl StaticCatalog {
    pub fn new(database_type: DatabaseType) -> Self {
        Self {
            database_type,
            ..Self::default()
        }
    }

    pub fn with_view(mut self, database: &str, view: &str, definition: &str) -> Self {
        self.views
            .insert((database.to_string(), view.to_string()), definition.to_string());
        self
    }

    pub fn with_table(mut self, database: &str, table: &str) -> Self {
        self.tables.insert((database.to_string(), table.to_string()));
        self
    }
}

/// Translates a SQL `LIKE` pattern into an anchored regex (`%` any run, `_` one character).
pub(crate) fn like_to_regex(pattern: &str) -> Result<Regex, regex::Error> {
    let mut expr = String::from("(?s)^");
    for ch in pattern.chars() {
        match ch {
            '%' => expr.push_str(".*"),
            '_' => expr.push('.'),
            other => expr.push_str(&regex::escape(&other.to_string())),
        }
    }
    expr.push('$');
    Regex::new(&expr)
}

#[async_trait]
impl ViewCatalog for StaticCatalog {
    fn database_type(&self) -> DatabaseType {
        self.database_type
    }

    async fn view_definition(&self, database: &str, view: &str) -> Result<String, CatalogError> {
        let definition = self
            .views
            .get(&(database.to_string(), view.to_string()))
            .cloned();
        require_definition(definition, database, view)
    }

    async fn view_names(&self, database: &str, pattern: &str) -> Result<Vec<String>, CatalogError> {
        let matcher = like_to_regex(pattern)?;
        Ok(self
            .views
            .keys()
            .filter(|(db, name)| db == database && matcher.is_match(name))
            .map(|(_, name)| name.clone())
            .collect())
    }

    async fn table_exists(&self, database: &str, table: &str) -> Result<bool, CatalogError> {
        Ok(self.tables.contains(&(database.to_string(), table.to_string())))
    }
}

//! Reconstruct structured query models from the SQL text of database views.
//!
//! Definition text comes from a [`catalog::ViewCatalog`], is parsed into a node-kind syntax tree
//! by [`syntax::SqlParserFrontend`] and converted clause by clause into a
//! [`models::QueryDefinition`] by [`convert`].

pub mod catalog;
pub mod config;
pub mod convert;
pub mod emitter;
pub mod errors;
pub mod models;
pub mod syntax;

pub use catalog::ViewCatalog;
pub use config::ReaderConfig;
pub use convert::{convert_query, convert_view, read_view};
pub use errors::{CatalogError, ConfigError, ViewDefinitionError};
pub use models::{Condition, JoinType, LogicalOperator, Operand, QueryDefinition, ViewDefinition};
pub use syntax::{SqlParserFrontend, SyntaxNode, SyntaxParser};

/// Installs the global logger. `filter` uses env_logger syntax; without one `RUST_LOG` applies,
/// falling back to info-level logs for this crate.
pub fn init_logging(filter: Option<&str>) {
    let mut builder = env_logger::Builder::from_default_env();
    match filter {
        Some(filter) => {
            builder.parse_filters(filter);
        }
        None if std::env::var_os("RUST_LOG").is_none() => {
            builder.filter_module("viewdef", log::LevelFilter::Info);
        }
        None => {}
    }
    let _ = builder.is_test(false).try_init();
}

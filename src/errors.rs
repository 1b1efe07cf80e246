use crate::syntax::NodeKind;

#[derive(thiserror::Error, Debug)]
pub enum ViewDefinitionError {
    #[error("retrieval error: {0}")] Retrieval(#[from] CatalogError),
    #[error("parse error: {0}")] Parse(String),
    #[error("parsed syntax tree is not a query (root is {found})")] UnexpectedRoot { found: NodeKind },
    #[error("invalid syntax tree for SELECT column {index}")] InvalidSelectSyntax { index: usize },
    #[error("invalid syntax tree for FROM clause")] InvalidFromSyntax,
    #[error("WHERE clause must hold exactly one condition node")] InvalidWhereSyntax,
    #[error("invalid syntax tree for {clause} clause")] InvalidClauseSyntax { clause: NodeKind },
    #[error("expected expression or sub condition at condition index {index} but found {found}")] InvalidConditionShape { index: usize, found: String },
    #[error("condition operator at index {index} has no operand")] TruncatedCondition { index: usize },
    #[error("condition operator must be AND / OR but found ({token})")] UnsupportedOperator { token: String },
    #[error("unsupported token found for JOIN type ({token})")] UnsupportedJoinType { token: String },
    #[error("JOIN has no source node ({join})")] MissingJoinSource { join: String },
    #[error("cannot find operand for JOIN condition ({join})")] MissingJoinOperand { join: String },
    #[error("cannot find operator for JOIN condition ({join})")] MissingJoinOperator { join: String },
    #[error("unexpected {found} node after JOIN condition ({join})")] TrailingJoinNode { found: NodeKind, join: String },
    #[error("unsupported token ({token})")] UnsupportedToken { token: String },
    #[error("node is not an expression ({found})")] NotAnExpression { found: NodeKind },
}

#[derive(thiserror::Error, Debug)]
pub enum CatalogError {
    #[error("no view definition found for {database}.{view}")] NotFound { database: String, view: String },
    #[error("no database url configured")] MissingUrl,
    #[error("invalid name pattern: {0}")] InvalidPattern(#[from] regex::Error),
    #[error("database error: {0}")] Database(#[from] sqlx::Error),
}

#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("config io error: {0}")] Io(#[from] std::io::Error),
    #[error("config format error: {0}")] Json(#[from] serde_json::Error),
    #[error("unsupported database type: {0}")] InvalidDatabaseType(String),
}

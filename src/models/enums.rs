use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::ConfigError;

#[derive(Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Debug, Default)]
#[serde(rename_all = "lowercase")]
pub enum DatabaseType {
    #[default]
    MySQL,
    PostgreSQL,
    SQLite,
}

impl FromStr for DatabaseType {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "mysql" | "mariadb" => Ok(DatabaseType::MySQL),
            "postgres" | "postgresql" | "pg" => Ok(DatabaseType::PostgreSQL),
            "sqlite" | "sqlite3" => Ok(DatabaseType::SQLite),
            other => Err(ConfigError::InvalidDatabaseType(other.to_string())),
        }
    }
}

impl fmt::Display for DatabaseType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            DatabaseType::MySQL => "mysql",
            DatabaseType::PostgreSQL => "postgresql",
            DatabaseType::SQLite => "sqlite",
        })
    }
}

/// Kind of a reconstructed JOIN clause.
#[derive(Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Debug)]
#[serde(rename_all = "snake_case")]
pub enum JoinType {
    Join,
    LeftJoin,
    RightJoin,
    InnerJoin,
    OuterJoin,
}

impl JoinType {
    /// Keyword used when the join is emitted back to SQL.
    pub fn keyword(&self) -> &'static str {
        match self {
            JoinType::Join => "JOIN",
            JoinType::LeftJoin => "LEFT JOIN",
            JoinType::RightJoin => "RIGHT JOIN",
            JoinType::InnerJoin => "INNER JOIN",
            JoinType::OuterJoin => "FULL OUTER JOIN",
        }
    }
}

impl fmt::Display for JoinType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}

/// Connective between two operands of a condition chain.
#[derive(Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Debug)]
#[serde(rename_all = "UPPERCASE")]
pub enum LogicalOperator {
    And,
    Or,
}

impl fmt::Display for LogicalOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            LogicalOperator::And => "AND",
            LogicalOperator::Or => "OR",
        })
    }
}

//! Renders a reconstructed query back to SQL text.

use std::fmt;

use crate::models::structs::{QueryDefinition, ViewDefinition};

pub fn emit_sql(query: &QueryDefinition) -> String {
    let projection = if query.select.is_empty() {
        "*".to_string()
    } else {
        query
            .select
            .iter()
            .map(|c| with_alias(&c.expression, &c.alias, true))
            .collect::<Vec<_>>()
            .join(", ")
    };
    let mut sql = if query.distinct {
        format!("SELECT DISTINCT {}", projection)
    } else {
        format!("SELECT {}", projection)
    };

    if let Some(from) = &query.from {
        sql.push_str(&format!(" FROM {}", with_alias(&from.source, &from.alias, false)));
    }
    for join in &query.joins {
        sql.push_str(&format!(" {} {}", join.join_type, with_alias(&join.source, &join.alias, false)));
        if !join.condition.is_empty() {
            sql.push_str(&format!(" ON {}", join.condition));
        }
    }
    if let Some(condition) = &query.where_condition {
        sql.push_str(&format!(" WHERE {}", condition));
    }
    if !query.group_by.is_empty() {
        sql.push_str(&format!(" GROUP BY {}", query.group_by.join(", ")));
    }
    if let Some(having) = &query.having {
        sql.push_str(&format!(" HAVING {}", having));
    }
    if !query.order_by.is_empty() {
        sql.push_str(&format!(" ORDER BY {}", query.order_by.join(", ")));
    }
    if let Some(limit) = &query.limit {
        if let Some(count) = &limit.count {
            sql.push_str(&format!(" LIMIT {}", count));
        }
        if let Some(offset) = &limit.offset {
            sql.push_str(&format!(" OFFSET {}", offset));
        }
    }
    sql
}

fn with_alias(item: &str, alias: &str, keyword: bool) -> String {
    match (alias.is_empty(), keyword) {
        (true, _) => item.to_string(),
        (false, true) => format!("{} AS {}", item, alias),
        (false, false) => format!("{} {}", item, alias),
    }
}

impl fmt::Display for QueryDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&emit_sql(self))
    }
}

impl ViewDefinition {
    /// `CREATE VIEW` statement recreating the view from the reconstructed query.
    pub fn create_sql(&self) -> String {
        format!("CREATE VIEW {} AS {}", self.name, emit_sql(&self.query))
    }
}

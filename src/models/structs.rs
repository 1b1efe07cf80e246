use std::fmt;

use serde::Serialize;

use crate::models::enums::{JoinType, LogicalOperator};

/// One projected column. `alias` is empty for bare columns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SelectColumn {
    pub expression: String,
    pub alias: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FromDefinition {
    pub source: String,
    pub alias: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct JoinDefinition {
    pub join_type: JoinType,
    pub source: String,
    pub alias: String,
    /// `lhs operator rhs`, empty when the join carries no ON condition.
    pub condition: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LimitDefinition {
    pub count: Option<String>,
    pub offset: Option<String>,
}

/// Operand of a condition chain: a literal expression or a parenthesised sub-condition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Operand {
    Expression(String),
    Nested(Box<Condition>),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConditionLink {
    pub operator: LogicalOperator,
    pub operand: Operand,
}

/// WHERE/HAVING predicate.
///
/// A `Complex` condition always carries at least one link after `first`; links are evaluated
/// strictly left to right and only nesting groups operands.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Condition {
    Expression(String),
    Complex {
        first: Operand,
        rest: Vec<ConditionLink>,
    },
}

impl Condition {
    pub fn expression(text: impl Into<String>) -> Self {
        Condition::Expression(text.into())
    }

    pub fn and(self, operand: impl Into<Operand>) -> Self {
        self.push(LogicalOperator::And, operand.into())
    }

    pub fn or(self, operand: impl Into<Operand>) -> Self {
        self.push(LogicalOperator::Or, operand.into())
    }

    pub fn push(self, operator: LogicalOperator, operand: Operand) -> Self {
        let link = ConditionLink { operator, operand };
        match self {
            Condition::Expression(text) => Condition::Complex {
                first: Operand::Expression(text),
                rest: vec![link],
            },
            Condition::Complex { first, mut rest } => {
                rest.push(link);
                Condition::Complex { first, rest }
            }
        }
    }

    /// Builds a condition from an already converted chain. A chain without links collapses to
    /// its single operand.
    pub(crate) fn from_chain(first: Operand, rest: Vec<ConditionLink>) -> Self {
        if !rest.is_empty() {
            return Condition::Complex { first, rest };
        }
        match first {
            Operand::Expression(text) => Condition::Expression(text),
            Operand::Nested(inner) => *inner,
        }
    }

    /// Number of operands at this level of the chain.
    pub fn operand_count(&self) -> usize {
        match self {
            Condition::Expression(_) => 1,
            Condition::Complex { rest, .. } => 1 + rest.len(),
        }
    }

    /// Nesting depth; a plain expression has depth 1.
    pub fn depth(&self) -> usize {
        match self {
            Condition::Expression(_) => 1,
            Condition::Complex { first, rest } => {
                let deepest = std::iter::once(first)
                    .chain(rest.iter().map(|link| &link.operand))
                    .map(|operand| match operand {
                        Operand::Expression(_) => 0,
                        Operand::Nested(inner) => inner.depth(),
                    })
                    .max()
                    .unwrap_or(0);
                1 + deepest
            }
        }
    }
}

impl From<Condition> for Operand {
    fn from(condition: Condition) -> Self {
        Operand::Nested(Box::new(condition))
    }
}

impl From<&str> for Operand {
    fn from(text: &str) -> Self {
        Operand::Expression(text.to_string())
    }
}

impl From<String> for Operand {
    fn from(text: String) -> Self {
        Operand::Expression(text)
    }
}

impl fmt::Display for Operand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operand::Expression(text) => f.write_str(text),
            Operand::Nested(inner) => write!(f, "({})", inner),
        }
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Condition::Expression(text) => f.write_str(text),
            Condition::Complex { first, rest } => {
                write!(f, "{}", first)?;
                for link in rest {
                    write!(f, " {} {}", link.operator, link.operand)?;
                }
                Ok(())
            }
        }
    }
}

/// Structured form of a SELECT statement, filled clause by clause.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct QueryDefinition {
    pub distinct: bool,
    pub select: Vec<SelectColumn>,
    pub from: Option<FromDefinition>,
    pub joins: Vec<JoinDefinition>,
    #[serde(rename = "where")]
    pub where_condition: Option<Condition>,
    pub group_by: Vec<String>,
    pub having: Option<Condition>,
    pub order_by: Vec<String>,
    pub limit: Option<LimitDefinition>,
}

impl QueryDefinition {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn select_column(&mut self, expression: impl Into<String>, alias: impl Into<String>) -> &mut Self {
        self.select.push(SelectColumn {
            expression: expression.into(),
            alias: alias.into(),
        });
        self
    }

    pub fn set_from(&mut self, source: impl Into<String>, alias: impl Into<String>) -> &mut Self {
        self.from = Some(FromDefinition {
            source: source.into(),
            alias: alias.into(),
        });
        self
    }

    pub fn add_join(
        &mut self,
        source: impl Into<String>,
        alias: impl Into<String>,
        join_type: JoinType,
        condition: impl Into<String>,
    ) -> &mut Self {
        self.joins.push(JoinDefinition {
            join_type,
            source: source.into(),
            alias: alias.into(),
            condition: condition.into(),
        });
        self
    }

    pub fn set_where(&mut self, condition: Condition) -> &mut Self {
        self.where_condition = Some(condition);
        self
    }

    pub fn set_distinct(&mut self, distinct: bool) -> &mut Self {
        self.distinct = distinct;
        self
    }

    pub fn group_by(&mut self, expression: impl Into<String>) -> &mut Self {
        self.group_by.push(expression.into());
        self
    }

    pub fn set_having(&mut self, condition: Condition) -> &mut Self {
        self.having = Some(condition);
        self
    }

    pub fn order_by(&mut self, expression: impl Into<String>) -> &mut Self {
        self.order_by.push(expression.into());
        self
    }

    pub fn set_limit(&mut self, limit: LimitDefinition) -> &mut Self {
        self.limit = Some(limit);
        self
    }
}

/// A view as stored in the catalog: its name, the raw definition text and the reconstructed query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ViewDefinition {
    pub name: String,
    pub definition: String,
    pub query: QueryDefinition,
}

impl ViewDefinition {
    pub fn new(name: impl Into<String>, definition: impl Into<String>, query: QueryDefinition) -> Self {
        Self {
            name: name.into(),
            definition: definition.into(),
            query,
        }
    }
}

//! SQL front end: parses view definition text with `sqlparser` and lowers the statement into the
//! node-kind syntax tree consumed by the converters.

use log::debug;
use sqlparser::ast as sq;
use sqlparser::dialect::{Dialect, MySqlDialect, PostgreSqlDialect, SQLiteDialect};
use sqlparser::parser::Parser;

use super::token::{Token, TokenKind};
use super::tree::{NodeKind, SyntaxNode};
use crate::errors::ViewDefinitionError;
use crate::models::enums::DatabaseType;

/// Turns raw SQL text into a syntax tree.
pub trait SyntaxParser: Send + Sync {
    fn parse(&self, sql: &str) -> Result<SyntaxNode, ViewDefinitionError>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SqlParserFrontend {
    database_type: DatabaseType,
}

impl SqlParserFrontend {
    pub fn new(database_type: DatabaseType) -> Self {
        Self { database_type }
    }

    fn dialect(&self) -> Box<dyn Dialect> {
        match self.database_type {
            DatabaseType::MySQL => Box::new(MySqlDialect {}),
            DatabaseType::PostgreSQL => Box::new(PostgreSqlDialect {}),
            DatabaseType::SQLite => Box::new(SQLiteDialect {}),
        }
    }
}

impl SyntaxParser for SqlParserFrontend {
    fn parse(&self, sql: &str) -> Result<SyntaxNode, ViewDefinitionError> {
        let dialect = self.dialect();
        let mut statements = Parser::parse_sql(dialect.as_ref(), sql)
            .map_err(|e| ViewDefinitionError::Parse(e.to_string()))?;
        if statements.len() != 1 {
            return Err(ViewDefinitionError::Parse(format!(
                "expected a single statement, found {}",
                statements.len()
            )));
        }
        debug!("lowering {} statement", self.database_type);
        match statements.remove(0) {
            sq::Statement::Query(query) => lower_query(&query),
            sq::Statement::CreateView { query, .. } => lower_query(&query),
            other => {
                let text = other.to_string();
                let head = text.split_whitespace().next().unwrap_or_default().to_string();
                Ok(SyntaxNode::new(NodeKind::Statement, Token::new(TokenKind::Term, head), text))
            }
        }
    }
}

fn lower_query(q: &sq::Query) -> Result<SyntaxNode, ViewDefinitionError> {
    if q.with.is_some() {
        return Err(ViewDefinitionError::Parse("common table expressions are not supported".into()));
    }
    let select = match q.body.as_ref() {
        sq::SetExpr::Select(select) => select,
        sq::SetExpr::Query(inner) => {
            if q.order_by.is_some() || q.limit.is_some() || q.offset.is_some() {
                return Err(ViewDefinitionError::Parse("ordering a parenthesised query is not supported".into()));
            }
            return lower_query(inner);
        }
        sq::SetExpr::SetOperation { op, .. } => {
            return Ok(SyntaxNode::new(
                NodeKind::Union,
                Token::new(TokenKind::Union, op.to_string()),
                q.body.to_string(),
            ));
        }
        other => return Err(ViewDefinitionError::Parse(format!("unsupported query body: {}", other))),
    };

    let mut clauses = vec![lower_select(select)?];
    lower_from_list(&select.from, &mut clauses)?;

    if let Some(selection) = &select.selection {
        clauses.push(SyntaxNode::where_clause(lower_condition(selection)));
    }

    let group_exprs: Vec<SyntaxNode> = match &select.group_by {
        sq::GroupByExpr::Expressions(exprs, _) => {
            exprs.iter().map(|e| SyntaxNode::expression(&e.to_string())).collect()
        }
        sq::GroupByExpr::All(_) => vec![SyntaxNode::expression("ALL")],
    };
    if !group_exprs.is_empty() {
        clauses.push(clause(NodeKind::GroupBy, TokenKind::GroupBy, group_exprs));
    }

    if let Some(having) = &select.having {
        clauses.push(clause(NodeKind::Having, TokenKind::Having, vec![lower_condition(having)]));
    }

    if let Some(order_by) = &q.order_by
        && !order_by.exprs.is_empty()
    {
        let items = order_by.exprs.iter().map(|o| SyntaxNode::expression(&o.to_string())).collect();
        clauses.push(clause(NodeKind::OrderBy, TokenKind::OrderBy, items));
    }

    let mut limit = Vec::new();
    if let Some(count) = &q.limit {
        limit.push(tagged_expression(TokenKind::Limit, count.to_string()));
    }
    if let Some(offset) = &q.offset {
        limit.push(tagged_expression(TokenKind::Offset, offset.value.to_string()));
    }
    if !limit.is_empty() {
        clauses.push(clause(NodeKind::Limit, TokenKind::Limit, limit));
    }

    Ok(SyntaxNode::query(clauses))
}

fn clause(kind: NodeKind, token: TokenKind, children: Vec<SyntaxNode>) -> SyntaxNode {
    SyntaxNode::new(kind, Token::keyword(token), "").with_children(children)
}

fn tagged_expression(kind: TokenKind, text: String) -> SyntaxNode {
    SyntaxNode::new(NodeKind::Expression, Token::new(kind, text.clone()), text)
}

fn lower_select(select: &sq::Select) -> Result<SyntaxNode, ViewDefinitionError> {
    let token = match &select.distinct {
        None => Token::keyword(TokenKind::Select),
        Some(sq::Distinct::Distinct) => Token::keyword(TokenKind::Distinct),
        Some(sq::Distinct::On(_)) => {
            return Err(ViewDefinitionError::Parse("DISTINCT ON is not supported".into()));
        }
    };
    let columns = select.projection.iter().map(lower_select_item).collect();
    Ok(SyntaxNode::new(NodeKind::Select, token, "").with_children(columns))
}

fn lower_select_item(item: &sq::SelectItem) -> SyntaxNode {
    match item {
        sq::SelectItem::UnnamedExpr(expr) => SyntaxNode::column(&expr.to_string(), None),
        sq::SelectItem::ExprWithAlias { expr, alias } => {
            SyntaxNode::column(&expr.to_string(), Some(&alias.to_string()))
        }
        sq::SelectItem::QualifiedWildcard(name, _) => SyntaxNode::column(&format!("{}.*", name), None),
        sq::SelectItem::Wildcard(_) => SyntaxNode::column("*", None),
    }
}

fn lower_from_list(from: &[sq::TableWithJoins], clauses: &mut Vec<SyntaxNode>) -> Result<(), ViewDefinitionError> {
    for (index, table) in from.iter().enumerate() {
        if index == 0 {
            lower_from(table, clauses)?;
            continue;
        }
        // Comma separated tables: a join without condition.
        let (source, alias) = table_factor_parts(&table.relation);
        clauses.push(SyntaxNode::join(
            Token::keyword(TokenKind::Join),
            table.relation.to_string(),
            named_children(&source, alias.as_deref()),
        ));
        for join in &table.joins {
            clauses.push(lower_join(join)?);
        }
    }
    Ok(())
}

fn lower_from(table: &sq::TableWithJoins, clauses: &mut Vec<SyntaxNode>) -> Result<(), ViewDefinitionError> {
    match &table.relation {
        sq::TableFactor::NestedJoin { table_with_joins, alias: None } => lower_from(table_with_joins, clauses)?,
        relation => {
            let (source, alias) = table_factor_parts(relation);
            clauses.push(SyntaxNode::from_clause(&source, alias.as_deref()));
        }
    }
    for join in &table.joins {
        clauses.push(lower_join(join)?);
    }
    Ok(())
}

fn table_factor_parts(relation: &sq::TableFactor) -> (String, Option<String>) {
    match relation {
        sq::TableFactor::Table { name, alias, .. } => (name.to_string(), alias.as_ref().map(|a| a.name.to_string())),
        sq::TableFactor::Derived { subquery, alias, .. } => {
            (format!("({})", subquery), alias.as_ref().map(|a| a.name.to_string()))
        }
        sq::TableFactor::NestedJoin { table_with_joins, alias } => {
            (format!("({})", table_with_joins), alias.as_ref().map(|a| a.name.to_string()))
        }
        other => (other.to_string(), None),
    }
}

fn named_children(source: &str, alias: Option<&str>) -> Vec<SyntaxNode> {
    let mut children = vec![SyntaxNode::source(source)];
    if let Some(alias) = alias {
        children.push(SyntaxNode::alias(alias));
    }
    children
}

fn lower_join(join: &sq::Join) -> Result<SyntaxNode, ViewDefinitionError> {
    let text = join.to_string().trim().to_string();
    let (token, constraint) = match &join.join_operator {
        sq::JoinOperator::Inner(c) => (Token::keyword(TokenKind::Join), Some(c)),
        sq::JoinOperator::LeftOuter(c) => (Token::keyword(TokenKind::LeftJoin), Some(c)),
        sq::JoinOperator::RightOuter(c) => (Token::keyword(TokenKind::RightJoin), Some(c)),
        sq::JoinOperator::FullOuter(c) => (Token::keyword(TokenKind::OuterJoin), Some(c)),
        sq::JoinOperator::CrossJoin => (Token::keyword(TokenKind::CrossJoin), None),
        _ => (Token::new(TokenKind::Term, text.clone()), None),
    };

    let (source, alias) = table_factor_parts(&join.relation);
    let mut children = named_children(&source, alias.as_deref());
    match constraint {
        Some(sq::JoinConstraint::On(expr)) => children.extend(lower_join_condition(expr)?),
        Some(sq::JoinConstraint::None) | None => {}
        Some(sq::JoinConstraint::Using(_)) | Some(sq::JoinConstraint::Natural) => {
            return Err(ViewDefinitionError::Parse(format!("only ON join constraints are supported ({})", text)));
        }
    }
    Ok(SyntaxNode::join(token, text, children))
}

/// ON conditions are kept as `lhs operator rhs`; other predicate forms (`IS NULL`, `IN`,
/// `BETWEEN`, `EXISTS`, bare columns) have no operator to split on.
fn lower_join_condition(expr: &sq::Expr) -> Result<Vec<SyntaxNode>, ViewDefinitionError> {
    match strip_nesting(expr) {
        sq::Expr::BinaryOp { left, op, right } => Ok(vec![
            chain_operand(left),
            SyntaxNode::operator(operator_token(op)),
            chain_operand(right),
        ]),
        other => Err(ViewDefinitionError::Parse(format!(
            "unsupported ON condition form, expected `lhs operator rhs` ({})",
            other
        ))),
    }
}

/// Lowers a predicate into a Condition node. The left-associative AND/OR spine becomes one flat
/// chain; parenthesised or right-nested AND/OR groups become nested Condition nodes.
fn lower_condition(expr: &sq::Expr) -> SyntaxNode {
    let mut children = Vec::new();
    flatten_chain(strip_nesting(expr), &mut children);
    SyntaxNode::condition(children)
}

fn flatten_chain(expr: &sq::Expr, out: &mut Vec<SyntaxNode>) {
    match expr {
        sq::Expr::BinaryOp { left, op: op @ (sq::BinaryOperator::And | sq::BinaryOperator::Or), right } => {
            flatten_chain(left, out);
            out.push(SyntaxNode::operator(operator_token(op)));
            out.push(chain_operand(right));
        }
        other => out.push(chain_operand(other)),
    }
}

/// Logical groups become nested Condition nodes; anything else is a leaf expression without its
/// redundant outer parentheses.
fn chain_operand(expr: &sq::Expr) -> SyntaxNode {
    let inner = strip_nesting(expr);
    if is_logical(inner) {
        lower_condition(inner)
    } else {
        SyntaxNode::expression(&inner.to_string())
    }
}

fn strip_nesting(mut expr: &sq::Expr) -> &sq::Expr {
    while let sq::Expr::Nested(inner) = expr {
        expr = inner;
    }
    expr
}

fn is_logical(expr: &sq::Expr) -> bool {
    matches!(
        expr,
        sq::Expr::BinaryOp { op: sq::BinaryOperator::And | sq::BinaryOperator::Or, .. }
    )
}

fn operator_token(op: &sq::BinaryOperator) -> Token {
    let kind = match op {
        sq::BinaryOperator::And => TokenKind::And,
        sq::BinaryOperator::Or => TokenKind::Or,
        sq::BinaryOperator::Eq => TokenKind::Equal,
        sq::BinaryOperator::NotEq => TokenKind::NotEqual,
        sq::BinaryOperator::Gt => TokenKind::Greater,
        sq::BinaryOperator::GtEq => TokenKind::GreaterEqual,
        sq::BinaryOperator::Lt => TokenKind::Lesser,
        sq::BinaryOperator::LtEq => TokenKind::LesserEqual,
        _ => TokenKind::Operator,
    };
    Token::new(kind, op.to_string())
}

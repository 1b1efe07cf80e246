use std::fmt;

use super::token::{Token, TokenKind};

/// Discriminant of a syntax tree node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    Query,
    /// Root of a set operation (`UNION`, `EXCEPT`, ...).
    Union,
    /// Root of a statement that is not a query.
    Statement,
    Select,
    /// One projected item inside a Select node.
    Column,
    ColumnName,
    Alias,
    From,
    Source,
    Join,
    Where,
    Condition,
    Expression,
    Operator,
    GroupBy,
    Having,
    OrderBy,
    Limit,
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            NodeKind::Query => "query",
            NodeKind::Union => "union",
            NodeKind::Statement => "statement",
            NodeKind::Select => "SELECT",
            NodeKind::Column => "column",
            NodeKind::ColumnName => "column name",
            NodeKind::Alias => "alias",
            NodeKind::From => "FROM",
            NodeKind::Source => "source",
            NodeKind::Join => "JOIN",
            NodeKind::Where => "WHERE",
            NodeKind::Condition => "condition",
            NodeKind::Expression => "expression",
            NodeKind::Operator => "operator",
            NodeKind::GroupBy => "GROUP BY",
            NodeKind::Having => "HAVING",
            NodeKind::OrderBy => "ORDER BY",
            NodeKind::Limit => "LIMIT",
        })
    }
}

/// A node of the syntax tree handed to the converters.
///
/// Child order carries the grammar: a Join node lists its source, optional alias, left operand,
/// operator and right operand in that order; a Condition node interleaves operands and AND/OR
/// operators.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyntaxNode {
    kind: NodeKind,
    token: Token,
    text: String,
    children: Vec<SyntaxNode>,
}

impl SyntaxNode {
    pub fn new(kind: NodeKind, token: Token, text: impl Into<String>) -> Self {
        Self {
            kind,
            token,
            text: text.into(),
            children: Vec::new(),
        }
    }

    pub fn with_children(mut self, children: Vec<SyntaxNode>) -> Self {
        self.children = children;
        self
    }

    pub fn push(&mut self, child: SyntaxNode) {
        self.children.push(child);
    }

    pub fn kind(&self) -> NodeKind {
        self.kind
    }

    /// Token the node originates from.
    pub fn token(&self) -> &Token {
        &self.token
    }

    /// Literal source text spanned by the node.
    pub fn raw_text(&self) -> &str {
        &self.text
    }

    pub fn children(&self) -> &[SyntaxNode] {
        &self.children
    }

    pub fn is(&self, kind: NodeKind) -> bool {
        self.kind == kind
    }

    // Shorthands used by the parser front end and by tests building trees by hand.

    pub fn query(children: Vec<SyntaxNode>) -> Self {
        Self::new(NodeKind::Query, Token::keyword(TokenKind::Select), "").with_children(children)
    }

    pub fn select(columns: Vec<SyntaxNode>) -> Self {
        Self::new(NodeKind::Select, Token::keyword(TokenKind::Select), "").with_children(columns)
    }

    pub fn column(name: &str, alias: Option<&str>) -> Self {
        let mut children = vec![Self::leaf(NodeKind::ColumnName, name)];
        if let Some(alias) = alias {
            children.push(Self::leaf(NodeKind::Alias, alias));
        }
        Self::new(NodeKind::Column, Token::new(TokenKind::Term, name), name).with_children(children)
    }

    pub fn from_clause(source: &str, alias: Option<&str>) -> Self {
        let mut children = vec![Self::leaf(NodeKind::Source, source)];
        if let Some(alias) = alias {
            children.push(Self::leaf(NodeKind::Alias, alias));
        }
        Self::new(NodeKind::From, Token::keyword(TokenKind::From), source).with_children(children)
    }

    pub fn join(token: Token, text: impl Into<String>, children: Vec<SyntaxNode>) -> Self {
        Self::new(NodeKind::Join, token, text).with_children(children)
    }

    pub fn where_clause(condition: SyntaxNode) -> Self {
        let text = condition.raw_text().to_string();
        Self::new(NodeKind::Where, Token::keyword(TokenKind::Where), text).with_children(vec![condition])
    }

    pub fn condition(children: Vec<SyntaxNode>) -> Self {
        let text = children
            .iter()
            .map(|c| match c.kind {
                NodeKind::Condition => format!("({})", c.text),
                _ => c.text.clone(),
            })
            .collect::<Vec<_>>()
            .join(" ");
        let token = children
            .first()
            .map(|c| c.token.clone())
            .unwrap_or_else(|| Token::new(TokenKind::Term, ""));
        Self::new(NodeKind::Condition, token, text).with_children(children)
    }

    pub fn expression(text: &str) -> Self {
        Self::leaf(NodeKind::Expression, text)
    }

    pub fn operator(token: Token) -> Self {
        let text = token.text.clone();
        Self::new(NodeKind::Operator, token, text)
    }

    pub fn source(text: &str) -> Self {
        Self::leaf(NodeKind::Source, text)
    }

    pub fn alias(text: &str) -> Self {
        Self::leaf(NodeKind::Alias, text)
    }

    pub fn column_name(text: &str) -> Self {
        Self::leaf(NodeKind::ColumnName, text)
    }

    fn leaf(kind: NodeKind, text: &str) -> Self {
        let token_kind = match kind {
            NodeKind::ColumnName | NodeKind::Alias | NodeKind::Source => TokenKind::Identifier,
            _ => TokenKind::Term,
        };
        Self::new(kind, Token::new(token_kind, text), text)
    }
}

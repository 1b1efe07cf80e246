//! Conversion of a view's syntax tree into a [`QueryDefinition`].
//!
//! The dispatcher walks the immediate children of the Query root in order and routes each clause
//! to its converter. Every shape mismatch aborts the conversion.

pub mod classify;
pub mod condition;
pub mod expression;
pub mod join;

use log::{debug, info};

pub use condition::convert_condition;
pub use expression::expression_text;
pub use join::convert_join;

use crate::catalog::ViewCatalog;
use crate::errors::ViewDefinitionError;
use crate::models::structs::{LimitDefinition, QueryDefinition, ViewDefinition};
use crate::syntax::{NodeKind, SyntaxNode, SyntaxParser, TokenKind};

/// Fetches a view's definition text from the catalog and reconstructs it.
pub async fn read_view(
    catalog: &dyn ViewCatalog,
    parser: &dyn SyntaxParser,
    database: &str,
    view: &str,
) -> Result<ViewDefinition, ViewDefinitionError> {
    let raw = catalog.view_definition(database, view).await?;
    info!("reconstructing view {}.{}", database, view);
    convert_view(view, &raw, parser)
}

/// Parses raw definition text and reconstructs the view.
pub fn convert_view(name: &str, raw: &str, parser: &dyn SyntaxParser) -> Result<ViewDefinition, ViewDefinitionError> {
    let root = parser.parse(raw)?;
    let query = convert_query(&root)?;
    Ok(ViewDefinition::new(name, raw, query))
}

pub fn convert_query(root: &SyntaxNode) -> Result<QueryDefinition, ViewDefinitionError> {
    if !root.is(NodeKind::Query) {
        return Err(ViewDefinitionError::UnexpectedRoot { found: root.kind() });
    }

    let mut query = QueryDefinition::new();
    for clause in root.children() {
        match clause.kind() {
            NodeKind::Select => convert_select(clause, &mut query)?,
            NodeKind::From => convert_from(clause, &mut query)?,
            NodeKind::Join => {
                let join = convert_join(clause)?;
                query.add_join(join.source, join.alias, join.join_type, join.condition);
            }
            NodeKind::Where => {
                let condition = single_condition(clause).ok_or(ViewDefinitionError::InvalidWhereSyntax)?;
                query.set_where(convert_condition(condition)?);
            }
            NodeKind::GroupBy => {
                for item in clause.children() {
                    query.group_by(clause_expression(item, NodeKind::GroupBy)?);
                }
            }
            NodeKind::Having => {
                let condition = single_condition(clause)
                    .ok_or(ViewDefinitionError::InvalidClauseSyntax { clause: NodeKind::Having })?;
                query.set_having(convert_condition(condition)?);
            }
            NodeKind::OrderBy => {
                for item in clause.children() {
                    query.order_by(clause_expression(item, NodeKind::OrderBy)?);
                }
            }
            NodeKind::Limit => {
                query.set_limit(convert_limit(clause)?);
            }
            NodeKind::Query
            | NodeKind::Union
            | NodeKind::Statement
            | NodeKind::Column
            | NodeKind::ColumnName
            | NodeKind::Alias
            | NodeKind::Source
            | NodeKind::Condition
            | NodeKind::Expression
            | NodeKind::Operator => {
                debug!("ignoring {} node under query root", clause.kind());
            }
        }
    }
    Ok(query)
}

fn convert_select(node: &SyntaxNode, query: &mut QueryDefinition) -> Result<(), ViewDefinitionError> {
    if node.token().kind == TokenKind::Distinct {
        query.set_distinct(true);
    }
    for (index, column) in node.children().iter().enumerate() {
        match column.children() {
            [name, alias] if name.is(NodeKind::ColumnName) && alias.is(NodeKind::Alias) => {
                query.select_column(name.raw_text(), alias.raw_text());
            }
            [name] if name.is(NodeKind::ColumnName) => {
                query.select_column(name.raw_text(), "");
            }
            _ => return Err(ViewDefinitionError::InvalidSelectSyntax { index }),
        }
    }
    Ok(())
}

fn convert_from(node: &SyntaxNode, query: &mut QueryDefinition) -> Result<(), ViewDefinitionError> {
    match node.children() {
        [source] if source.is(NodeKind::Source) => {
            query.set_from(source.raw_text(), "");
        }
        [source, alias] if source.is(NodeKind::Source) && alias.is(NodeKind::Alias) => {
            query.set_from(source.raw_text(), alias.raw_text());
        }
        _ => return Err(ViewDefinitionError::InvalidFromSyntax),
    }
    Ok(())
}

fn single_condition(node: &SyntaxNode) -> Option<&SyntaxNode> {
    match node.children() {
        [condition] if condition.is(NodeKind::Condition) => Some(condition),
        _ => None,
    }
}

fn clause_expression(node: &SyntaxNode, clause: NodeKind) -> Result<String, ViewDefinitionError> {
    expression_text(node)
        .map(str::to_string)
        .map_err(|_| ViewDefinitionError::InvalidClauseSyntax { clause })
}

fn convert_limit(node: &SyntaxNode) -> Result<LimitDefinition, ViewDefinitionError> {
    let mut limit = LimitDefinition::default();
    for item in node.children() {
        let text = clause_expression(item, NodeKind::Limit)?;
        match item.token().kind {
            TokenKind::Limit if limit.count.is_none() => limit.count = Some(text),
            TokenKind::Offset if limit.offset.is_none() => limit.offset = Some(text),
            _ => return Err(ViewDefinitionError::InvalidClauseSyntax { clause: NodeKind::Limit }),
        }
    }
    Ok(limit)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::enums::JoinType;
    use crate::models::structs::{Condition, SelectColumn};
    use crate::syntax::Token;

    fn col(expression: &str, alias: &str) -> SelectColumn {
        SelectColumn { expression: expression.into(), alias: alias.into() }
    }

    fn bare_column(children: Vec<SyntaxNode>) -> SyntaxNode {
        SyntaxNode::new(NodeKind::Column, Token::new(TokenKind::Term, ""), "").with_children(children)
    }

    #[test]
    fn bare_column_gets_empty_alias() {
        let root = SyntaxNode::query(vec![SyntaxNode::select(vec![bare_column(vec![SyntaxNode::column_name("id")])])]);
        let query = convert_query(&root).unwrap();
        assert_eq!(query.select, vec![col("id", "")]);
    }

    #[test]
    fn aliased_column_keeps_alias() {
        let root = SyntaxNode::query(vec![SyntaxNode::select(vec![bare_column(vec![
            SyntaxNode::column_name("id"),
            SyntaxNode::alias("pk"),
        ])])]);
        let query = convert_query(&root).unwrap();
        assert_eq!(query.select, vec![col("id", "pk")]);
    }

    #[test]
    fn select_preserves_column_order() {
        let names = ["a", "b", "c", "d"];
        let columns = names
            .iter()
            .enumerate()
            .map(|(i, n)| SyntaxNode::column(n, if i % 2 == 0 { Some("x") } else { None }))
            .collect();
        let query = convert_query(&SyntaxNode::query(vec![SyntaxNode::select(columns)])).unwrap();
        assert_eq!(query.select, vec![col("a", "x"), col("b", ""), col("c", "x"), col("d", "")]);
    }

    #[test]
    fn invalid_select_shapes() {
        let alias_first = bare_column(vec![SyntaxNode::alias("pk"), SyntaxNode::column_name("id")]);
        let root = SyntaxNode::query(vec![SyntaxNode::select(vec![SyntaxNode::column("ok", None), alias_first])]);
        assert!(matches!(convert_query(&root), Err(ViewDefinitionError::InvalidSelectSyntax { index: 1 })));

        let empty = SyntaxNode::query(vec![SyntaxNode::select(vec![bare_column(Vec::new())])]);
        assert!(matches!(convert_query(&empty), Err(ViewDefinitionError::InvalidSelectSyntax { index: 0 })));
    }

    #[test]
    fn from_clause_shapes() {
        let query = convert_query(&SyntaxNode::query(vec![SyntaxNode::from_clause("users", None)])).unwrap();
        let from = query.from.unwrap();
        assert_eq!((from.source.as_str(), from.alias.as_str()), ("users", ""));

        let query = convert_query(&SyntaxNode::query(vec![SyntaxNode::from_clause("users", Some("u"))])).unwrap();
        assert_eq!(query.from.unwrap().alias, "u");

        let bad = SyntaxNode::new(NodeKind::From, Token::keyword(TokenKind::From), "")
            .with_children(vec![SyntaxNode::alias("u")]);
        assert!(matches!(
            convert_query(&SyntaxNode::query(vec![bad])),
            Err(ViewDefinitionError::InvalidFromSyntax)
        ));
    }

    #[test]
    fn where_clause_sets_root_condition() {
        let condition = SyntaxNode::condition(vec![
            SyntaxNode::expression("a=1"),
            SyntaxNode::operator(Token::keyword(TokenKind::And)),
            SyntaxNode::expression("b=2"),
        ]);
        let root = SyntaxNode::query(vec![
            SyntaxNode::from_clause("t", None),
            SyntaxNode::where_clause(condition),
        ]);
        let query = convert_query(&root).unwrap();
        assert_eq!(query.where_condition, Some(Condition::expression("a=1").and("b=2")));
    }

    #[test]
    fn where_clause_requires_one_condition() {
        let bad = SyntaxNode::new(NodeKind::Where, Token::keyword(TokenKind::Where), "")
            .with_children(vec![SyntaxNode::expression("a=1")]);
        assert!(matches!(
            convert_query(&SyntaxNode::query(vec![bad])),
            Err(ViewDefinitionError::InvalidWhereSyntax)
        ));

        let two = SyntaxNode::new(NodeKind::Where, Token::keyword(TokenKind::Where), "").with_children(vec![
            SyntaxNode::condition(vec![SyntaxNode::expression("a")]),
            SyntaxNode::condition(vec![SyntaxNode::expression("b")]),
        ]);
        assert!(matches!(
            convert_query(&SyntaxNode::query(vec![two])),
            Err(ViewDefinitionError::InvalidWhereSyntax)
        ));
    }

    #[test]
    fn join_errors_propagate_unchanged() {
        let join = SyntaxNode::join(Token::keyword(TokenKind::LeftJoin), "LEFT JOIN", vec![SyntaxNode::alias("o")]);
        let root = SyntaxNode::query(vec![SyntaxNode::from_clause("t", None), join]);
        assert!(matches!(convert_query(&root), Err(ViewDefinitionError::MissingJoinSource { .. })));
    }

    #[test]
    fn joins_accumulate_in_order() {
        let join = |token: TokenKind, source: &str| {
            SyntaxNode::join(Token::keyword(token), source, vec![SyntaxNode::source(source)])
        };
        let root = SyntaxNode::query(vec![
            SyntaxNode::from_clause("a", None),
            join(TokenKind::RightJoin, "b"),
            join(TokenKind::OuterJoin, "c"),
        ]);
        let query = convert_query(&root).unwrap();
        let kinds: Vec<_> = query.joins.iter().map(|j| (j.join_type, j.source.as_str())).collect();
        assert_eq!(kinds, vec![(JoinType::RightJoin, "b"), (JoinType::OuterJoin, "c")]);
    }

    #[test]
    fn non_query_root_is_rejected() {
        let root = SyntaxNode::select(Vec::new());
        assert!(matches!(
            convert_query(&root),
            Err(ViewDefinitionError::UnexpectedRoot { found: NodeKind::Select })
        ));
    }

    #[test]
    fn stray_nodes_under_root_are_ignored() {
        let root = SyntaxNode::query(vec![SyntaxNode::expression("1"), SyntaxNode::from_clause("t", None)]);
        let query = convert_query(&root).unwrap();
        assert_eq!(query.from.unwrap().source, "t");
    }

    #[test]
    fn trailing_clauses_are_converted() {
        let clause = |kind: NodeKind, token: TokenKind, children: Vec<SyntaxNode>| {
            SyntaxNode::new(kind, Token::keyword(token), "").with_children(children)
        };
        let tagged = |token: TokenKind, text: &str| SyntaxNode::new(NodeKind::Expression, Token::new(token, text), text);
        let root = SyntaxNode::query(vec![
            SyntaxNode::new(NodeKind::Select, Token::keyword(TokenKind::Distinct), "")
                .with_children(vec![SyntaxNode::column("c", None)]),
            SyntaxNode::from_clause("t", None),
            clause(NodeKind::GroupBy, TokenKind::GroupBy, vec![SyntaxNode::expression("c")]),
            clause(
                NodeKind::Having,
                TokenKind::Having,
                vec![SyntaxNode::condition(vec![SyntaxNode::expression("count(*) > 1")])],
            ),
            clause(NodeKind::OrderBy, TokenKind::OrderBy, vec![SyntaxNode::expression("c DESC")]),
            clause(NodeKind::Limit, TokenKind::Limit, vec![tagged(TokenKind::Limit, "10"), tagged(TokenKind::Offset, "20")]),
        ]);
        let query = convert_query(&root).unwrap();
        assert!(query.distinct);
        assert_eq!(query.group_by, vec!["c".to_string()]);
        assert_eq!(query.having, Some(Condition::expression("count(*) > 1")));
        assert_eq!(query.order_by, vec!["c DESC".to_string()]);
        assert_eq!(
            query.limit,
            Some(LimitDefinition { count: Some("10".into()), offset: Some("20".into()) })
        );

        let bad_limit = SyntaxNode::query(vec![clause(
            NodeKind::Limit,
            TokenKind::Limit,
            vec![tagged(TokenKind::Limit, "1"), tagged(TokenKind::Limit, "2")],
        )]);
        assert!(matches!(
            convert_query(&bad_limit),
            Err(ViewDefinitionError::InvalidClauseSyntax { clause: NodeKind::Limit })
        ));
    }
}

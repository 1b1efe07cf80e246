use log::debug;

use super::classify;
use crate::errors::ViewDefinitionError;
use crate::models::structs::JoinDefinition;
use crate::syntax::{NodeKind, SyntaxNode};

/// Converts one Join node: source, optional alias, then `lhs operator rhs`.
pub fn convert_join(node: &SyntaxNode) -> Result<JoinDefinition, ViewDefinitionError> {
    let join_type = classify::join_type(node.token())
        .map_err(|_| ViewDefinitionError::UnsupportedJoinType { token: node.token().to_string() })?;

    let (source, rest) = match node.children() {
        [source, rest @ ..] if source.is(NodeKind::Source) => (source.raw_text(), rest),
        _ => return Err(ViewDefinitionError::MissingJoinSource { join: node.raw_text().to_string() }),
    };

    let (alias, rest) = match rest {
        [alias, rest @ ..] if alias.is(NodeKind::Alias) => (alias.raw_text(), rest),
        _ => ("", rest),
    };

    let condition = match rest {
        [] => {
            debug!("join on {} carries no condition", source);
            String::new()
        }
        [lhs, rest @ ..] => {
            let lhs = join_operand(lhs, node)?;
            let (operator, rest) = match rest {
                [operator, rest @ ..] if operator.is(NodeKind::Operator) => (operator.token().text.as_str(), rest),
                _ => return Err(ViewDefinitionError::MissingJoinOperator { join: node.raw_text().to_string() }),
            };
            let rhs = match rest {
                [rhs] => join_operand(rhs, node)?,
                [] => return Err(ViewDefinitionError::MissingJoinOperand { join: node.raw_text().to_string() }),
                [_, extra, ..] => {
                    return Err(ViewDefinitionError::TrailingJoinNode {
                        found: extra.kind(),
                        join: node.raw_text().to_string(),
                    });
                }
            };
            format!("{} {} {}", lhs, operator, rhs)
        }
    };

    Ok(JoinDefinition {
        join_type,
        source: source.to_string(),
        alias: alias.to_string(),
        condition,
    })
}

/// Operand text; a grouped condition keeps its parentheses so the joined text reads the same.
fn join_operand(operand: &SyntaxNode, join: &SyntaxNode) -> Result<String, ViewDefinitionError> {
    match operand.kind() {
        NodeKind::Expression => Ok(operand.raw_text().to_string()),
        NodeKind::Condition => Ok(format!("({})", operand.raw_text())),
        _ => Err(ViewDefinitionError::MissingJoinOperand { join: join.raw_text().to_string() }),
    }
}

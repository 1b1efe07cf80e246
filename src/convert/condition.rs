use super::{classify, expression::expression_text};
use crate::errors::ViewDefinitionError;
use crate::models::structs::{Condition, ConditionLink, Operand};
use crate::syntax::{NodeKind, SyntaxNode};

/// Converts a Condition node into a flat operand chain.
///
/// Children alternate operand, operator, operand, ...; operands are Expression or nested
/// Condition nodes and every operator must be AND or OR. Grouping comes only from nesting.
pub fn convert_condition(node: &SyntaxNode) -> Result<Condition, ViewDefinitionError> {
    if !node.is(NodeKind::Condition) {
        return Err(ViewDefinitionError::InvalidConditionShape { index: 0, found: node.kind().to_string() });
    }

    let (first, rest) = match node.children() {
        [first, rest @ ..] => (convert_operand(first, 0)?, rest),
        [] => {
            return Err(ViewDefinitionError::InvalidConditionShape { index: 0, found: "nothing".into() });
        }
    };

    let mut links = Vec::with_capacity(rest.len() / 2);
    for (pair_index, pair) in rest.chunks(2).enumerate() {
        let index = 1 + pair_index * 2;
        let operator = &pair[0];
        if !operator.is(NodeKind::Operator) {
            return Err(ViewDefinitionError::InvalidConditionShape {
                index,
                found: operator.kind().to_string(),
            });
        }
        let operator = classify::logical_operator(operator.token()).map_err(|_| {
            ViewDefinitionError::UnsupportedOperator { token: operator.token().to_string() }
        })?;
        let operand = match pair.get(1) {
            Some(operand) => convert_operand(operand, index + 1)?,
            None => return Err(ViewDefinitionError::TruncatedCondition { index }),
        };
        links.push(ConditionLink { operator, operand });
    }

    Ok(Condition::from_chain(first, links))
}

fn convert_operand(node: &SyntaxNode, index: usize) -> Result<Operand, ViewDefinitionError> {
    match node.kind() {
        NodeKind::Condition => Ok(Operand::Nested(Box::new(convert_condition(node)?))),
        NodeKind::Expression => Ok(Operand::Expression(expression_text(node)?.to_string())),
        found => Err(ViewDefinitionError::InvalidConditionShape { index, found: found.to_string() }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::enums::LogicalOperator;
    use crate::syntax::{Token, TokenKind};

    fn and() -> SyntaxNode {
        SyntaxNode::operator(Token::keyword(TokenKind::And))
    }

    fn or() -> SyntaxNode {
        SyntaxNode::operator(Token::keyword(TokenKind::Or))
    }

    fn expr(text: &str) -> SyntaxNode {
        SyntaxNode::expression(text)
    }

    #[test]
    fn flat_chain_keeps_order_and_tags() {
        let node = SyntaxNode::condition(vec![expr("a=1"), and(), expr("b=2"), or(), expr("c=3")]);
        let cond = convert_condition(&node).unwrap();
        assert_eq!(cond, Condition::expression("a=1").and("b=2").or("c=3"));

        let Condition::Complex { first, rest } = cond else { panic!("expected complex condition") };
        assert_eq!(first, Operand::Expression("a=1".into()));
        let tags: Vec<_> = rest.iter().map(|l| l.operator).collect();
        assert_eq!(tags, vec![LogicalOperator::And, LogicalOperator::Or]);
    }

    #[test]
    fn single_expression_is_a_leaf() {
        let node = SyntaxNode::condition(vec![expr("x IS NULL")]);
        assert_eq!(convert_condition(&node).unwrap(), Condition::expression("x IS NULL"));
    }

    #[test]
    fn nested_conditions_keep_their_depth() {
        let innermost = SyntaxNode::condition(vec![expr("c=3"), or(), expr("d=4")]);
        let inner = SyntaxNode::condition(vec![expr("b=2"), and(), innermost]);
        let node = SyntaxNode::condition(vec![inner, or(), expr("a=1")]);

        let cond = convert_condition(&node).unwrap();
        assert_eq!(cond.depth(), 3);
        assert_eq!(cond.operand_count(), 2);
        assert_eq!(cond.to_string(), "(b=2 AND (c=3 OR d=4)) OR a=1");
    }

    #[test]
    fn chain_length_matches_operands() {
        for k in 1..6 {
            let mut children = vec![expr("x0")];
            for i in 1..k {
                children.push(if i % 2 == 0 { or() } else { and() });
                children.push(expr(&format!("x{}", i)));
            }
            let cond = convert_condition(&SyntaxNode::condition(children)).unwrap();
            assert_eq!(cond.operand_count(), k);
        }
    }

    #[test]
    fn redundant_wrapper_is_unwrapped() {
        let inner = SyntaxNode::condition(vec![expr("a"), and(), expr("b")]);
        let node = SyntaxNode::condition(vec![inner]);
        assert_eq!(convert_condition(&node).unwrap(), Condition::expression("a").and("b"));
    }

    #[test]
    fn operator_without_operand_is_truncated() {
        let node = SyntaxNode::condition(vec![expr("a"), and(), expr("b"), or()]);
        assert!(matches!(
            convert_condition(&node),
            Err(ViewDefinitionError::TruncatedCondition { index: 3 })
        ));
    }

    #[test]
    fn comparison_operator_is_unsupported() {
        let eq = SyntaxNode::operator(Token::keyword(TokenKind::Equal));
        let node = SyntaxNode::condition(vec![expr("a"), eq, expr("b")]);
        let err = convert_condition(&node).unwrap_err();
        assert!(matches!(err, ViewDefinitionError::UnsupportedOperator { ref token } if token == "="));
    }

    #[test]
    fn bad_shapes_are_rejected() {
        let empty = SyntaxNode::condition(Vec::new());
        assert!(matches!(
            convert_condition(&empty),
            Err(ViewDefinitionError::InvalidConditionShape { index: 0, .. })
        ));

        let leading_alias = SyntaxNode::condition(vec![SyntaxNode::alias("x")]);
        assert!(matches!(
            convert_condition(&leading_alias),
            Err(ViewDefinitionError::InvalidConditionShape { index: 0, .. })
        ));

        let missing_operator = SyntaxNode::condition(vec![expr("a"), expr("b")]);
        assert!(matches!(
            convert_condition(&missing_operator),
            Err(ViewDefinitionError::InvalidConditionShape { index: 1, .. })
        ));

        let bad_operand = SyntaxNode::condition(vec![expr("a"), and(), SyntaxNode::source("t")]);
        assert!(matches!(
            convert_condition(&bad_operand),
            Err(ViewDefinitionError::InvalidConditionShape { index: 2, .. })
        ));

        assert!(matches!(
            convert_condition(&expr("a")),
            Err(ViewDefinitionError::InvalidConditionShape { .. })
        ));
    }
}

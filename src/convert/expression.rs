use crate::errors::ViewDefinitionError;
use crate::syntax::{NodeKind, SyntaxNode};

/// Literal text of an Expression node.
pub fn expression_text(node: &SyntaxNode) -> Result<&str, ViewDefinitionError> {
    match node.kind() {
        NodeKind::Expression => Ok(node.raw_text()),
        found => Err(ViewDefinitionError::NotAnExpression { found }),
    }
}

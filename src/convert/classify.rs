use crate::errors::ViewDefinitionError;
use crate::models::enums::{JoinType, LogicalOperator};
use crate::syntax::{Token, TokenKind};

pub fn join_type(token: &Token) -> Result<JoinType, ViewDefinitionError> {
    match token.kind {
        TokenKind::Join => Ok(JoinType::Join),
        TokenKind::LeftJoin => Ok(JoinType::LeftJoin),
        TokenKind::RightJoin => Ok(JoinType::RightJoin),
        TokenKind::InnerJoin => Ok(JoinType::InnerJoin),
        TokenKind::OuterJoin => Ok(JoinType::OuterJoin),
        _ => Err(ViewDefinitionError::UnsupportedToken { token: token.to_string() }),
    }
}

pub fn logical_operator(token: &Token) -> Result<LogicalOperator, ViewDefinitionError> {
    match token.kind {
        TokenKind::And => Ok(LogicalOperator::And),
        TokenKind::Or => Ok(LogicalOperator::Or),
        _ => Err(ViewDefinitionError::UnsupportedToken { token: token.to_string() }),
    }
}

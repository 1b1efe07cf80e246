//! Syntax tree handed to the converters, and the `sqlparser` front end producing it.

pub mod parser;
pub mod token;
pub mod tree;

pub use parser::{SqlParserFrontend, SyntaxParser};
pub use token::{Token, TokenKind};
pub use tree::{NodeKind, SyntaxNode};

use std::fmt;

/// Lexical class of the token a syntax node originates from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    Select,
    Distinct,
    From,
    Where,
    GroupBy,
    Having,
    OrderBy,
    Limit,
    Offset,
    Union,
    Join,
    LeftJoin,
    RightJoin,
    InnerJoin,
    OuterJoin,
    CrossJoin,
    And,
    Or,
    Equal,
    NotEqual,
    Greater,
    GreaterEqual,
    Lesser,
    LesserEqual,
    /// Any other binary operator (`LIKE`, `||`, arithmetic, ...).
    Operator,
    Identifier,
    /// Leading token of an expression or statement that has no dedicated class.
    Term,
}

impl TokenKind {
    /// Canonical spelling used when a token is built without literal text.
    pub fn keyword(&self) -> &'static str {
        match self {
            TokenKind::Select => "SELECT",
            TokenKind::Distinct => "SELECT DISTINCT",
            TokenKind::From => "FROM",
            TokenKind::Where => "WHERE",
            TokenKind::GroupBy => "GROUP BY",
            TokenKind::Having => "HAVING",
            TokenKind::OrderBy => "ORDER BY",
            TokenKind::Limit => "LIMIT",
            TokenKind::Offset => "OFFSET",
            TokenKind::Union => "UNION",
            TokenKind::Join => "JOIN",
            TokenKind::LeftJoin => "LEFT JOIN",
            TokenKind::RightJoin => "RIGHT JOIN",
            TokenKind::InnerJoin => "INNER JOIN",
            TokenKind::OuterJoin => "OUTER JOIN",
            TokenKind::CrossJoin => "CROSS JOIN",
            TokenKind::And => "AND",
            TokenKind::Or => "OR",
            TokenKind::Equal => "=",
            TokenKind::NotEqual => "<>",
            TokenKind::Greater => ">",
            TokenKind::GreaterEqual => ">=",
            TokenKind::Lesser => "<",
            TokenKind::LesserEqual => "<=",
            TokenKind::Operator | TokenKind::Identifier | TokenKind::Term => "",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub text: String,
}

impl Token {
    pub fn new(kind: TokenKind, text: impl Into<String>) -> Self {
        Self { kind, text: text.into() }
    }

    /// Token spelled with the canonical keyword of `kind`.
    pub fn keyword(kind: TokenKind) -> Self {
        Self::new(kind, kind.keyword())
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.text.is_empty() {
            write!(f, "{:?}", self.kind)
        } else {
            f.write_str(&self.text)
        }
    }
}

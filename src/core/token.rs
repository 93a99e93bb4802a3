// src/core/token.rs
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum TokenKind {
    Identifier,
    Keyword,         // let, const
    TypeName,        // int, float, bool, string
    Number,          // lexeme kept verbatim, `,` or `.` as separator
    StringLiteral,   // lexeme excludes the quotes
    BooleanLiteral,  // true, false
    BooleanOperator, // && || == != <= >= => !&& !|| !=> < > ! xor nxor
    Symbol,          // any other single character
    EOF,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Token {
    pub kind: TokenKind,
    pub lexeme: String,
    pub line: usize,
    pub column: usize,
}

impl Token {
    pub fn new(kind: TokenKind, lexeme: impl Into<String>, line: usize, column: usize) -> Self {
        Self {
            kind,
            lexeme: lexeme.into(),
            line,
            column,
        }
    }

    /// True when this token has the given kind and exact lexeme.
    pub fn is(&self, kind: TokenKind, lexeme: &str) -> bool {
        self.kind == kind && self.lexeme == lexeme
    }

    pub fn is_symbol(&self, lexeme: &str) -> bool {
        self.is(TokenKind::Symbol, lexeme)
    }

    /// Width of the token in characters, at least 1 (used for caret underlines).
    pub fn width(&self) -> usize {
        match self.kind {
            TokenKind::StringLiteral => self.lexeme.chars().count() + 2,
            _ => self.lexeme.chars().count().max(1),
        }
    }
}

impl std::fmt::Display for TokenKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            TokenKind::Identifier => "identifier",
            TokenKind::Keyword => "keyword",
            TokenKind::TypeName => "type",
            TokenKind::Number => "number",
            TokenKind::StringLiteral => "string",
            TokenKind::BooleanLiteral => "boolean",
            TokenKind::BooleanOperator => "boolean operator",
            TokenKind::Symbol => "symbol",
            TokenKind::EOF => "end of statement",
        };
        write!(f, "{}", name)
    }
}

impl std::fmt::Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.kind {
            TokenKind::Identifier => write!(f, "Identifier('{}') @{}:{}", self.lexeme, self.line, self.column),
            TokenKind::Keyword => write!(f, "Keyword({}) @{}:{}", self.lexeme, self.line, self.column),
            TokenKind::TypeName => write!(f, "Type({}) @{}:{}", self.lexeme, self.line, self.column),
            TokenKind::Number => write!(f, "Number({}) @{}:{}", self.lexeme, self.line, self.column),
            TokenKind::StringLiteral => write!(f, "String(\"{}\") @{}:{}", self.lexeme, self.line, self.column),
            TokenKind::BooleanLiteral => write!(f, "Boolean({}) @{}:{}", self.lexeme, self.line, self.column),
            TokenKind::BooleanOperator => write!(f, "BoolOp('{}') @{}:{}", self.lexeme, self.line, self.column),
            TokenKind::Symbol => write!(f, "Symbol('{}') @{}:{}", self.lexeme, self.line, self.column),
            TokenKind::EOF => write!(f, "{} @{}:{}", self.kind, self.line, self.column),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_includes_position() {
        let tok = Token::new(TokenKind::BooleanOperator, "!&&", 2, 7);
        assert_eq!(tok.to_string(), "BoolOp('!&&') @2:7");
        let eof = Token::new(TokenKind::EOF, "", 1, 4);
        assert_eq!(eof.to_string(), "end of statement @1:4");
    }

    #[test]
    fn string_width_counts_quotes() {
        let tok = Token::new(TokenKind::StringLiteral, "hi", 1, 1);
        assert_eq!(tok.width(), 4);
        assert_eq!(Token::new(TokenKind::EOF, "", 1, 1).width(), 1);
    }
}

// lexer.rs

use log::{debug, trace};
use unicode_ident::{is_xid_continue, is_xid_start};
use unicode_normalization::UnicodeNormalization;

use crate::core::token::{Token, TokenKind};

/// Boolean operators, longest first so `!&&` never lexes as `!` + `&&`.
const THREE_CHAR_OPERATORS: [&str; 3] = ["!&&", "!||", "!=>"];
const TWO_CHAR_OPERATORS: [&str; 7] = ["&&", "||", "==", "!=", "<=", ">=", "=>"];

/// Pull-based tokenizer. Never fails: anything it does not recognise comes
/// back as a single-character `Symbol` and is left for the parser to reject.
pub struct Lexer {
    chars: Vec<char>,
    pos: usize,
    line: usize,
    col: usize,
}

impl Lexer {
    pub fn new(input: &str) -> Self {
        Self::with_origin(input, 1, 1)
    }

    /// Start counting positions at `line:column`, so tokens of a statement cut
    /// out of a larger file report where they sit in that file.
    pub fn with_origin(input: &str, line: usize, column: usize) -> Self {
        Self {
            chars: input.nfc().collect(),
            pos: 0,
            line: line.max(1),
            col: column.max(1),
        }
    }

    #[inline]
    fn current(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    #[inline]
    fn peek_at(&self, offset: usize) -> Option<char> {
        self.chars.get(self.pos + offset).copied()
    }

    #[inline]
    fn advance_char(&mut self) -> Option<char> {
        let ch = self.current()?;
        self.pos += 1;
        if ch == '\n' {
            self.line += 1;
            self.col = 1;
        } else {
            self.col += 1;
        }
        Some(ch)
    }

    fn starts_with(&self, pattern: &str) -> bool {
        pattern
            .chars()
            .enumerate()
            .all(|(i, c)| self.peek_at(i) == Some(c))
    }

    /// Produce the next token. Once the input is exhausted every call yields `EOF`.
    pub fn next_token(&mut self) -> Token {
        self.skip_trivia();
        let (line, col) = (self.line, self.col);

        let ch = match self.current() {
            Some(ch) => ch,
            None => return Token::new(TokenKind::EOF, "", line, col),
        };

        let token = if let Some(op) = self.match_boolean_operator() {
            for _ in 0..op.chars().count() {
                self.advance_char();
            }
            Token::new(TokenKind::BooleanOperator, op, line, col)
        } else if is_identifier_start(ch) {
            self.lex_word(line, col)
        } else if ch == '"' {
            self.lex_string(line, col)
        } else if ch.is_ascii_digit() {
            self.lex_number(line, col)
        } else {
            self.advance_char();
            let kind = if matches!(ch, '<' | '>' | '!') {
                TokenKind::BooleanOperator
            } else {
                TokenKind::Symbol
            };
            Token::new(kind, ch.to_string(), line, col)
        };

        trace!("lexed {}", token);
        token
    }

    /// Tokenize the whole input, up to and including the first `EOF`.
    pub fn tokenize(&mut self) -> Vec<Token> {
        let mut tokens = Vec::new();
        loop {
            let token = self.next_token();
            let is_eof = token.kind == TokenKind::EOF;
            tokens.push(token);
            if is_eof {
                break;
            }
        }
        tokens
    }

    fn match_boolean_operator(&self) -> Option<&'static str> {
        THREE_CHAR_OPERATORS
            .iter()
            .chain(TWO_CHAR_OPERATORS.iter())
            .copied()
            .find(|op| self.starts_with(op))
    }

    fn skip_trivia(&mut self) {
        loop {
            match (self.current(), self.peek_at(1)) {
                (Some(c), _) if c.is_whitespace() => {
                    self.advance_char();
                }
                (Some('/'), Some('/')) => self.skip_line_comment(),
                (Some('/'), Some('*')) => self.skip_block_comment(),
                _ => break,
            }
        }
    }

    fn skip_line_comment(&mut self) {
        while let Some(c) = self.current() {
            if c == '\n' {
                break;
            }
            self.advance_char();
        }
    }

    fn skip_block_comment(&mut self) {
        let (line, col) = (self.line, self.col);
        self.advance_char();
        self.advance_char();
        while self.current().is_some() {
            if self.starts_with("*/") {
                self.advance_char();
                self.advance_char();
                return;
            }
            self.advance_char();
        }
        debug!("unterminated block comment starting at {}:{}", line, col);
    }

    fn lex_word(&mut self, line: usize, col: usize) -> Token {
        let mut word = String::new();
        while let Some(c) = self.current() {
            if !is_identifier_continue(c) {
                break;
            }
            word.push(c);
            self.advance_char();
        }
        let kind = match word.as_str() {
            "let" | "const" => TokenKind::Keyword,
            "int" | "float" | "bool" | "string" => TokenKind::TypeName,
            "true" | "false" => TokenKind::BooleanLiteral,
            "xor" | "nxor" => TokenKind::BooleanOperator,
            _ => TokenKind::Identifier,
        };
        Token::new(kind, word, line, col)
    }

    fn lex_string(&mut self, line: usize, col: usize) -> Token {
        self.advance_char(); // opening quote
        let mut text = String::new();
        loop {
            match self.advance_char() {
                Some('"') => break,
                Some(c) => text.push(c),
                None => {
                    debug!("unterminated string starting at {}:{}", line, col);
                    break;
                }
            }
        }
        Token::new(TokenKind::StringLiteral, text, line, col)
    }

    fn lex_number(&mut self, line: usize, col: usize) -> Token {
        let mut text = String::new();
        while let Some(c) = self.current() {
            if !(c.is_ascii_digit() || c == '.' || c == ',') {
                break;
            }
            text.push(c);
            self.advance_char();
        }

        // Exponent only when a digit actually follows the marker (and sign).
        if matches!(self.current(), Some('e' | 'E')) {
            let marker_len = match (self.peek_at(1), self.peek_at(2)) {
                (Some('+' | '-'), Some(d)) if d.is_ascii_digit() => 2,
                (Some(d), _) if d.is_ascii_digit() => 1,
                _ => 0,
            };
            if marker_len > 0 {
                for _ in 0..marker_len {
                    if let Some(c) = self.advance_char() {
                        text.push(c);
                    }
                }
                while let Some(c) = self.current() {
                    if !c.is_ascii_digit() {
                        break;
                    }
                    text.push(c);
                    self.advance_char();
                }
            }
        }

        Token::new(TokenKind::Number, text, line, col)
    }
}

fn is_identifier_start(ch: char) -> bool {
    ch == '_' || is_xid_start(ch)
}

fn is_identifier_continue(ch: char) -> bool {
    ch == '_' || is_xid_continue(ch)
}

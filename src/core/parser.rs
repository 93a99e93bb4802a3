//! Statement parser for Vyrn with two expression grammars:
//! - arithmetic: precedence climbing, rendered to fully parenthesized text
//! - boolean: its own precedence ladder, folded to a literal at parse time
//!   (unless `fold_booleans` is off)
//!
//! One parser handles one statement; failures carry the offending token's
//! position and never leave partial state behind.

use crate::core::ast::{
    ASTNode, ArithExpr, ArithOp, AssignSource, BoolExpr, BoolOp, BoolOpTree, BoolOperand,
    CompareOp, DeclValue, Literal, LogArg, ValueType,
};
use crate::core::diagnostics::Span;
use crate::core::fold::Folder;
use crate::core::symbols::SymbolTable;
use crate::core::token::{Token, TokenKind};

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("{message} at {line}:{column}")]
pub struct ParseFailure {
    pub message: String,
    pub line: usize,
    pub column: usize,
}

impl ParseFailure {
    pub fn new(message: impl Into<String>, line: usize, column: usize) -> Self {
        Self { message: message.into(), line, column }
    }

    pub fn at(message: impl Into<String>, span: Span) -> Self {
        Self::new(message, span.line, span.col)
    }

    pub fn span(&self) -> Span {
        Span::single(self.line, self.column)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParserOptions {
    /// Fold boolean expressions to `true`/`false`. When off they are kept as
    /// trees and emitted as C++ expressions.
    pub fold_booleans: bool,
}

impl Default for ParserOptions {
    fn default() -> Self {
        Self { fold_booleans: true }
    }
}

pub struct Parser<'a> {
    tokens: Vec<Token>,
    pos: usize,
    symbols: &'a SymbolTable,
    options: ParserOptions,
}

impl<'a> Parser<'a> {
    /// Create new parser instance; ensure trailing EOF token present.
    /// The symbol table is read to classify boolean variables and to fold.
    pub fn new(tokens: Vec<Token>, symbols: &'a SymbolTable) -> Self {
        Self::with_options(tokens, symbols, ParserOptions::default())
    }

    /// The token list always ends in `EOF`; one is appended when missing.
    pub fn with_options(mut tokens: Vec<Token>, symbols: &'a SymbolTable, options: ParserOptions) -> Self {
        let needs_eof = match tokens.last() {
            Some(t) => t.kind != TokenKind::EOF,
            None => true,
        };
        if needs_eof {
            let (line, column) = tokens
                .last()
                .map(|t| (t.line, t.column + t.width()))
                .unwrap_or((1, 1));
            tokens.push(Token::new(TokenKind::EOF, "", line, column));
        }
        Parser { tokens, pos: 0, symbols, options }
    }

    /// Parse exactly one statement. A trailing `;` is accepted; anything else
    /// after the statement is an error.
    pub fn parse_statement(&mut self) -> Result<ASTNode, ParseFailure> {
        let tok = self.peek().clone();
        let node = match tok.kind {
            TokenKind::Keyword => self.parse_declaration()?,
            TokenKind::Identifier if tok.lexeme == "log" && self.peek_next().is_symbol("(") => {
                self.parse_log()?
            }
            TokenKind::Identifier if self.peek_next().is_symbol("=") => self.parse_assignment()?,
            TokenKind::EOF => return Err(self.err_here("Empty statement")),
            _ => {
                return Err(self.err_at(
                    &format!("Unknown statement starting with {} '{}'", tok.kind, tok.lexeme),
                    &tok,
                ))
            }
        };
        self.match_symbol(";");
        if !self.is_at_end() {
            let extra = self.peek().clone();
            return Err(self.err_at(
                &format!("Unexpected {} '{}' after end of statement", extra.kind, extra.lexeme),
                &extra,
            ));
        }
        Ok(node)
    }

    /// Parse a complete arithmetic expression and nothing else.
    pub fn parse_arithmetic(&mut self) -> Result<ArithExpr, ParseFailure> {
        let expr = self.parse_arith_expression()?;
        if !self.is_at_end() {
            return Err(self.err_here("Unexpected token after arithmetic expression"));
        }
        Ok(expr)
    }

    /* ── Statements ─────────────────────────────────────── */

    fn parse_declaration(&mut self) -> Result<ASTNode, ParseFailure> {
        let keyword = self.advance();
        let is_const = keyword.lexeme == "const";

        let type_tok = self.consume(TokenKind::TypeName, "Expected a type (int, float, bool or string)")?;
        let declared_type = ValueType::from_keyword(&type_tok.lexeme)
            .ok_or_else(|| self.err_at("Unknown type", &type_tok))?;
        let name_tok = self.consume(TokenKind::Identifier, "Expected variable name")?;
        self.consume_symbol("=", "Expected '=' in declaration")?;

        let value = match declared_type {
            ValueType::Int | ValueType::Float => {
                let expr = self.parse_arith_expression()?;
                let literal = match expr.as_variable() {
                    Some((name, _)) => Literal::reference(declared_type, name),
                    None => Literal::new(declared_type, expr.render()),
                };
                DeclValue::Literal(literal)
            }
            ValueType::Bool => DeclValue::Boolean(self.parse_boolean_value()?),
            ValueType::String => {
                let tok = self.peek().clone();
                let literal = match tok.kind {
                    TokenKind::StringLiteral => Literal::new(ValueType::String, tok.lexeme.clone()),
                    TokenKind::Identifier => Literal::reference(ValueType::String, tok.lexeme.clone()),
                    _ => return Err(self.err_at("Expected string literal or identifier", &tok)),
                };
                self.advance();
                DeclValue::Literal(literal)
            }
        };

        Ok(ASTNode::new_declaration(
            is_const,
            declared_type,
            &name_tok.lexeme,
            value,
            span_of(&name_tok),
        ))
    }

    fn parse_assignment(&mut self) -> Result<ASTNode, ParseFailure> {
        let target = self.advance();
        self.consume_symbol("=", "Expected '=' in assignment")?;

        let tok = self.peek().clone();
        let next = self.peek_next();
        let single = next.kind == TokenKind::EOF || next.is_symbol(";");
        let target_type = self.symbols.declared_type(&target.lexeme);
        let target_is_numeric = target_type.is_some_and(ValueType::is_numeric);

        let source = match tok.kind {
            TokenKind::Identifier if single => {
                self.advance();
                AssignSource::Identifier(tok.lexeme)
            }
            TokenKind::Number | TokenKind::StringLiteral | TokenKind::BooleanLiteral if single => {
                self.advance();
                AssignSource::Literal(tok.lexeme)
            }
            _ if target_is_numeric => AssignSource::Literal(self.parse_arith_expression()?.render()),
            _ if target_type.is_none() => self.parse_unchecked_source()?,
            _ => AssignSource::BooleanExpr(self.parse_boolean_value()?),
        };

        Ok(ASTNode::new_assignment(&target.lexeme, source, span_of(&target)))
    }

    /// Right-hand side for a target the table does not know. The emitter
    /// rejects the assignment, so the value is only shaped, never folded.
    fn parse_unchecked_source(&mut self) -> Result<AssignSource, ParseFailure> {
        let start = self.pos;
        if let Ok(expr) = self.parse_arith_expression() {
            if self.is_at_end() || self.peek().is_symbol(";") {
                return Ok(AssignSource::Literal(expr.render()));
            }
        }
        self.pos = start;
        let tree = BoolOpTree::from_operand(self.parse_bool_or()?);
        Ok(AssignSource::BooleanExpr(BoolExpr::Deferred(tree)))
    }

    fn parse_log(&mut self) -> Result<ASTNode, ParseFailure> {
        self.advance(); // log
        self.consume_symbol("(", "Expected '(' after log")?;
        let tok = self.peek().clone();
        let arg = match tok.kind {
            TokenKind::Identifier => LogArg::Identifier(tok.lexeme.clone()),
            TokenKind::Number => {
                let kind = if tok.lexeme.contains(['.', ',']) {
                    ValueType::Float
                } else {
                    ValueType::Int
                };
                LogArg::Literal(Literal::new(kind, tok.lexeme.clone()))
            }
            TokenKind::StringLiteral => LogArg::Literal(Literal::new(ValueType::String, tok.lexeme.clone())),
            TokenKind::BooleanLiteral => LogArg::Literal(Literal::new(ValueType::Bool, tok.lexeme.clone())),
            _ => return Err(self.err_at("Expected identifier or literal inside log(...)", &tok)),
        };
        self.advance();
        self.consume_symbol(")", "Expected ')' after log argument")?;
        Ok(ASTNode::new_log(arg, span_of(&tok)))
    }

    /* ── Arithmetic ─────────────────────────────────────── */

    fn parse_arith_expression(&mut self) -> Result<ArithExpr, ParseFailure> {
        let mut left = self.parse_arith_factor()?;
        while let Some(op) = self.match_arith_op(&[ArithOp::Add, ArithOp::Sub]) {
            let right = self.parse_arith_factor()?;
            left = ArithExpr::binary(op, left, right);
        }
        Ok(left)
    }

    fn parse_arith_factor(&mut self) -> Result<ArithExpr, ParseFailure> {
        let mut left = self.parse_arith_primary()?;
        while let Some(op) = self.match_arith_op(&[ArithOp::Mul, ArithOp::Div, ArithOp::Rem]) {
            let right = self.parse_arith_primary()?;
            left = ArithExpr::binary(op, left, right);
        }
        Ok(left)
    }

    fn parse_arith_primary(&mut self) -> Result<ArithExpr, ParseFailure> {
        let tok = self.peek().clone();
        match tok.kind {
            TokenKind::Number => {
                self.advance();
                Ok(ArithExpr::Number { span: span_of(&tok), text: tok.lexeme })
            }
            TokenKind::Identifier if tok.lexeme == "sqrt" && self.peek_next().is_symbol("(") => {
                self.advance();
                self.advance();
                let inner = self.parse_arith_expression()?;
                self.consume_symbol(")", "Expected ')' after sqrt argument")?;
                Ok(ArithExpr::Sqrt(Box::new(inner)))
            }
            TokenKind::Identifier => {
                self.advance();
                Ok(ArithExpr::Variable { span: span_of(&tok), name: tok.lexeme })
            }
            TokenKind::Symbol if tok.lexeme == "(" => {
                self.advance();
                let inner = self.parse_arith_expression()?;
                self.consume_symbol(")", "Expected ')'")?;
                Ok(ArithExpr::Group(Box::new(inner)))
            }
            TokenKind::Symbol if tok.lexeme == "-" => {
                self.advance();
                Ok(ArithExpr::Neg(Box::new(self.parse_arith_primary()?)))
            }
            _ => Err(self.err_at(
                &format!("Expected number, variable, '(' or sqrt(...), found {} '{}'", tok.kind, tok.lexeme),
                &tok,
            )),
        }
    }

    fn match_arith_op(&mut self, ops: &[ArithOp]) -> Option<ArithOp> {
        let tok = self.peek();
        if tok.kind != TokenKind::Symbol {
            return None;
        }
        let op = ops.iter().copied().find(|op| op.symbol() == tok.lexeme)?;
        self.advance();
        Some(op)
    }

    /* ── Boolean ────────────────────────────────────────── */

    fn parse_boolean_value(&mut self) -> Result<BoolExpr, ParseFailure> {
        let tree = BoolOpTree::from_operand(self.parse_bool_or()?);
        if self.options.fold_booleans {
            Ok(BoolExpr::Folded(Folder::new(self.symbols).fold_tree(&tree)?))
        } else {
            Ok(BoolExpr::Deferred(tree))
        }
    }

    // ||, !||, xor, nxor, ==, !=, =>, !=>, <, <=, >, >= (one level, left to right)
    fn parse_bool_or(&mut self) -> Result<BoolOperand, ParseFailure> {
        let mut tree = BoolOpTree::new(self.parse_bool_and()?);
        while let Some(op) = self.match_bool_op(false) {
            tree.push(op, self.parse_bool_and()?);
        }
        Ok(tree.into_operand())
    }

    // &&, !&&
    fn parse_bool_and(&mut self) -> Result<BoolOperand, ParseFailure> {
        let mut tree = BoolOpTree::new(self.parse_bool_not()?);
        while let Some(op) = self.match_bool_op(true) {
            tree.push(op, self.parse_bool_not()?);
        }
        Ok(tree.into_operand())
    }

    fn parse_bool_not(&mut self) -> Result<BoolOperand, ParseFailure> {
        if self.peek().is(TokenKind::BooleanOperator, "!") {
            self.advance();
            return Ok(BoolOperand::Not(Box::new(self.parse_bool_not()?)));
        }
        self.parse_bool_primary()
    }

    fn parse_bool_primary(&mut self) -> Result<BoolOperand, ParseFailure> {
        let tok = self.peek().clone();
        match tok.kind {
            TokenKind::Symbol if tok.lexeme == "(" => {
                // `( bool )` first; `(5 + 3) < 10` is retried as a comparison.
                let start = self.pos;
                match self.parse_bool_group() {
                    Ok(operand) => Ok(operand),
                    Err(group_err) => {
                        self.pos = start;
                        self.parse_comparison().map_err(|_| group_err)
                    }
                }
            }
            TokenKind::BooleanLiteral => {
                self.advance();
                Ok(BoolOperand::Literal(tok.lexeme == "true"))
            }
            TokenKind::Identifier if self.symbols.declared_type(&tok.lexeme) == Some(ValueType::Bool) => {
                self.advance();
                Ok(BoolOperand::Variable { span: span_of(&tok), name: tok.lexeme })
            }
            TokenKind::Number | TokenKind::Identifier => self.parse_comparison(),
            TokenKind::Symbol if tok.lexeme == "-" => self.parse_comparison(),
            _ => Err(self.err_at(
                &format!("Expected boolean value, comparison or '(', found {} '{}'", tok.kind, tok.lexeme),
                &tok,
            )),
        }
    }

    fn parse_bool_group(&mut self) -> Result<BoolOperand, ParseFailure> {
        self.consume_symbol("(", "Expected '('")?;
        let inner = self.parse_bool_or()?;
        self.consume_symbol(")", "Expected ')' after boolean expression")?;
        Ok(inner)
    }

    /// `<arith> <relational> <arith>`, or a lone identifier used as a boolean.
    fn parse_comparison(&mut self) -> Result<BoolOperand, ParseFailure> {
        let left = self.parse_arith_expression()?;
        let tok = self.peek().clone();
        if tok.kind == TokenKind::BooleanOperator {
            if let Some(op) = CompareOp::from_lexeme(&tok.lexeme) {
                self.advance();
                let right = self.parse_arith_expression()?;
                return Ok(BoolOperand::Comparison { left, op, right });
            }
        }
        if let Some((name, span)) = left.as_variable() {
            return Ok(BoolOperand::Variable { name: name.to_string(), span });
        }
        Err(self.err_at(
            "unauthorized comparison operation: expected <, <=, >, >=, == or != after numeric operand",
            &tok,
        ))
    }

    fn match_bool_op(&mut self, conjunction: bool) -> Option<BoolOp> {
        let tok = self.peek();
        if tok.kind != TokenKind::BooleanOperator {
            return None;
        }
        let op = BoolOp::from_lexeme(&tok.lexeme)?;
        if op.is_conjunction() != conjunction {
            return None;
        }
        self.advance();
        Some(op)
    }

    /* ── Token utils ─────────────────────────────────────── */

    fn advance(&mut self) -> Token {
        let tok = self.peek().clone();
        if !self.is_at_end() {
            self.pos += 1;
        }
        tok
    }

    fn peek(&self) -> &Token {
        &self.tokens[self.pos.min(self.tokens.len() - 1)]
    }

    fn peek_next(&self) -> &Token {
        &self.tokens[(self.pos + 1).min(self.tokens.len() - 1)]
    }

    fn match_symbol(&mut self, lexeme: &str) -> bool {
        if self.peek().is_symbol(lexeme) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn consume(&mut self, kind: TokenKind, msg: &str) -> Result<Token, ParseFailure> {
        if self.peek().kind == kind {
            Ok(self.advance())
        } else {
            Err(self.err_here(msg))
        }
    }

    fn consume_symbol(&mut self, lexeme: &str, msg: &str) -> Result<Token, ParseFailure> {
        if self.peek().is_symbol(lexeme) {
            Ok(self.advance())
        } else {
            Err(self.err_here(msg))
        }
    }

    fn is_at_end(&self) -> bool {
        self.peek().kind == TokenKind::EOF
    }

    fn err_here(&self, msg: &str) -> ParseFailure {
        let tok = self.peek();
        ParseFailure::new(msg, tok.line, tok.column)
    }

    fn err_at(&self, msg: &str, tok: &Token) -> ParseFailure {
        ParseFailure::new(msg, tok.line, tok.column)
    }
}

fn span_of(tok: &Token) -> Span {
    Span::new(tok.line, tok.column, tok.width())
}

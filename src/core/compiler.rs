// src/core/compiler.rs
//! Vyrn translation pipeline.
//! Splits source into statements, then lexes, parses and emits each one
//! against a single per-request context. A bad statement becomes a
//! diagnostic; the run always finishes with a best-effort buffer.

use log::{debug, info};
use std::path::Path;

use crate::core::{
    ast::ASTNode,
    code_generator::CodeGenerator,
    diagnostics::{Diagnostic, DiagnosticKind, Span},
    error::CoreError,
    lexer::Lexer,
    parser::{ParseFailure, Parser, ParserOptions},
    splitter::{split_statements, Statement},
    symbols::SymbolTable,
};

/// Everything one translation request owns. Nothing is shared between runs.
#[derive(Debug, Default)]
pub struct TranslationContext {
    pub symbols: SymbolTable,
    pub output: String,
    pub diagnostics: Vec<Diagnostic>,
    statement: usize,
}

impl TranslationContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Index of the statement currently being translated; stamped on diagnostics.
    pub fn begin_statement(&mut self, index: usize) {
        self.statement = index;
    }

    pub fn report(&mut self, kind: DiagnosticKind, message: impl Into<String>, span: Span) {
        self.diagnostics.push(Diagnostic::new(kind, message, self.statement, span));
    }

    pub fn finish(self) -> Translation {
        Translation {
            code: self.output,
            diagnostics: self.diagnostics,
            symbols: self.symbols,
        }
    }
}

/// Result of a run: emitted statements, every diagnostic, final symbols.
#[derive(Debug, Clone)]
pub struct Translation {
    pub code: String,
    pub diagnostics: Vec<Diagnostic>,
    pub symbols: SymbolTable,
}

impl Translation {
    pub fn has_errors(&self) -> bool {
        self.diagnostics.iter().any(Diagnostic::is_error)
    }

    pub fn errors(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics.iter().filter(|d| d.is_error())
    }

    pub fn warnings(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics.iter().filter(|d| !d.is_error())
    }

    /// The statements wrapped into a complete C++ translation unit.
    pub fn program(&self) -> String {
        let mut out = String::from(PROGRAM_HEADER);
        for line in self.code.lines() {
            out.push_str("    ");
            out.push_str(line);
            out.push('\n');
        }
        out.push_str(PROGRAM_FOOTER);
        out
    }
}

const PROGRAM_HEADER: &str = "#include <iostream>\n\
#include <string>\n\
#include <cmath>\n\
\n\
int main() {\n    std::cout << std::boolalpha;\n";

const PROGRAM_FOOTER: &str = "    return 0;\n}\n";

#[derive(Debug, Clone, Copy, Default)]
pub struct CompilerOptions {
    pub parser: ParserOptions,
}

/// Represents the Vyrn translator
#[derive(Debug, Default)]
pub struct Compiler {
    options: CompilerOptions,
}

impl Compiler {
    pub fn new() -> Self {
        Compiler::default()
    }

    pub fn with_options(options: CompilerOptions) -> Self {
        Compiler { options }
    }

    pub fn translate(&self, source: &str) -> Translation {
        let statements = split_statements(source);
        debug!("split source into {} statements", statements.len());
        let mut ctx = TranslationContext::new();
        for (index, statement) in statements.iter().enumerate() {
            self.translate_statement(&mut ctx, index, statement);
        }
        let translation = ctx.finish();
        info!(
            "translated {} statements: {} errors, {} warnings",
            statements.len(),
            translation.errors().count(),
            translation.warnings().count()
        );
        translation
    }

    /// Parse one statement against the symbols declared so far.
    pub fn parse(&self, ctx: &TranslationContext, statement: &Statement) -> Result<ASTNode, ParseFailure> {
        let tokens = Lexer::with_origin(&statement.text, statement.line, statement.column).tokenize();
        Parser::with_options(tokens, &ctx.symbols, self.options.parser).parse_statement()
    }

    /// Lex, parse and emit one statement into `ctx`.
    pub fn translate_statement(&self, ctx: &mut TranslationContext, index: usize, statement: &Statement) {
        ctx.begin_statement(index);
        match self.parse(ctx, statement) {
            Ok(node) => {
                debug!("statement {} @{}:{} parsed", index, statement.line, statement.column);
                CodeGenerator::new(ctx).emit(&node);
            }
            Err(failure) => {
                debug!("statement {} rejected: {}", index, failure);
                let span = failure.span();
                ctx.report(DiagnosticKind::ParseFailure, failure.message, span);
            }
        }
    }

    pub fn translate_file(&self, path: &Path) -> Result<Translation, CoreError> {
        let source = std::fs::read_to_string(path).map_err(|e| CoreError::read(path, e))?;
        Ok(self.translate(&source))
    }

    /// Validates code before translation
    pub fn validate_and_summarize(&self, code: &str) -> Result<String, CoreError> {
        if code.trim().is_empty() {
            return Err(CoreError::EmptySource);
        }
        let lines = code.lines().count();
        let chars = code.chars().count();
        Ok(format!("Validation complete: {} lines, {} characters.", lines, chars))
    }
}

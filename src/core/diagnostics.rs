// src/core/diagnostics.rs
//! Diagnostic model plus pretty, colored, file+line rendering.

use colored::Colorize;
use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct Span {
    pub line: usize,
    pub col: usize,
    pub len: usize, // underline length (use 1 if unknown)
}

impl Span {
    pub fn new(line: usize, col: usize, len: usize) -> Self {
        Self { line, col, len: len.max(1) }
    }

    pub fn single(line: usize, col: usize) -> Self {
        Self { line, col, len: 1 }
    }
}

/// What went wrong, from the translator's point of view. Lexical oddities are
/// not listed: they pass through as `Symbol` tokens and surface as parse
/// failures if the grammar cannot use them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DiagnosticKind {
    ParseFailure,
    SemanticWarning,
    SemanticError,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
}

impl DiagnosticKind {
    pub fn severity(self) -> Severity {
        match self {
            DiagnosticKind::SemanticWarning => Severity::Warning,
            DiagnosticKind::ParseFailure | DiagnosticKind::SemanticError => Severity::Error,
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Error => write!(f, "error"),
            Severity::Warning => write!(f, "warning"),
        }
    }
}

/// One reported problem. `statement` is the zero-based index of the statement
/// that produced it; `span` points into the original source.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Diagnostic {
    pub kind: DiagnosticKind,
    pub severity: Severity,
    pub message: String,
    pub statement: usize,
    #[serde(flatten)]
    pub span: Span,
}

impl Diagnostic {
    pub fn new(kind: DiagnosticKind, message: impl Into<String>, statement: usize, span: Span) -> Self {
        Self {
            kind,
            severity: kind.severity(),
            message: message.into(),
            statement,
            span,
        }
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {} at {}:{}", self.severity, self.message, self.span.line, self.span.col)
    }
}

pub fn print_error(filename: &str, source: &str, title: &str, span: Span) {
    print_labeled(filename, source, "error:".bright_red().bold(), title, span);
}

pub fn print_warning(filename: &str, source: &str, title: &str, span: Span) {
    print_labeled(filename, source, "warning:".yellow().bold(), title, span);
}

/// Pretty-print a diagnostic with its source line and a caret underline.
pub fn print_diagnostic(filename: &str, source: &str, diag: &Diagnostic) {
    match diag.severity {
        Severity::Error => print_error(filename, source, &diag.message, diag.span),
        Severity::Warning => print_warning(filename, source, &diag.message, diag.span),
    }
}

/// One-line form used without `--pretty-errors`.
pub fn print_plain(filename: &str, diag: &Diagnostic) {
    let label = match diag.severity {
        Severity::Error => "error:".bright_red(),
        Severity::Warning => "warning:".yellow(),
    };
    eprintln!(
        "{} {}:{}:{}: {}",
        label, filename, diag.span.line, diag.span.col, diag.message
    );
}

fn print_labeled(filename: &str, source: &str, label: colored::ColoredString, title: &str, span: Span) {
    eprintln!("{} {}", label, title.bright_white());
    let (ln, col) = (span.line, span.col);
    let line_text = nth_line(source, ln).unwrap_or_default();

    // line number gutter
    let ln_str = format!("{:>4}", ln);
    eprintln!("{} {}", "-->".bright_blue(), format!("{}:{}:{}", filename, ln, col).bright_white());
    eprintln!(" {} {}", ln_str.dimmed(), "|".dimmed());
    eprintln!("{} {} {}", ln_str.dimmed(), "|".dimmed(), line_text);

    eprintln!(
        " {} {} {}",
        " ".repeat(ln_str.len()).dimmed(),
        "|".dimmed(),
        underline(col, span.len).bright_red()
    );
    eprintln!();
}

fn underline(col: usize, len: usize) -> String {
    " ".repeat(col.saturating_sub(1)) + &"^".repeat(len.max(1))
}

fn nth_line(src: &str, n: usize) -> Option<String> {
    src.lines().nth(n.saturating_sub(1)).map(|s| s.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn severity_follows_kind() {
        let warn = Diagnostic::new(DiagnosticKind::SemanticWarning, "variable 'x' already declared", 1, Span::single(2, 5));
        assert!(!warn.is_error());
        assert_eq!(warn.to_string(), "warning: variable 'x' already declared at 2:5");
        let err = Diagnostic::new(DiagnosticKind::ParseFailure, "Expected ')'", 0, Span::single(1, 1));
        assert!(err.is_error());
    }

    #[test]
    fn underline_starts_at_column() {
        assert_eq!(underline(3, 2), "  ^^");
        assert_eq!(underline(1, 0), "^");
    }

    #[test]
    fn json_shape_is_flat() {
        let d = Diagnostic::new(DiagnosticKind::SemanticError, "cannot assign to constant 'c'", 3, Span::new(4, 1, 1));
        let v = serde_json::to_value(&d).unwrap();
        assert_eq!(v["kind"], "semantic_error");
        assert_eq!(v["severity"], "error");
        assert_eq!(v["line"], 4);
        assert_eq!(v["statement"], 3);
    }
}

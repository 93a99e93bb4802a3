// src/core/semantic_analyzer.rs
//! Declaration and mutability rules over the flat symbol table:
//! - first declaration of a name wins; a same-kind repeat is a warning
//! - a declaration of the opposite kind replaces the entry, with a warning
//! - assignment to an undeclared name or to a constant is an error

use crate::core::ast::{AssignSource, DeclValue, ValueType};
use crate::core::diagnostics::{DiagnosticKind, Span};
use crate::core::fold::evaluate_text;
use crate::core::symbols::{SymbolInfo, SymbolKind, SymbolTable};

#[derive(Debug, Clone, PartialEq)]
pub struct SemanticDiagnostic {
    pub kind: DiagnosticKind,
    pub message: String,
    pub span: Span,
}

impl SemanticDiagnostic {
    fn warning(message: String, span: Span) -> Self {
        Self { kind: DiagnosticKind::SemanticWarning, message, span }
    }

    fn error(message: String, span: Span) -> Self {
        Self { kind: DiagnosticKind::SemanticError, message, span }
    }

    /// Non-executable form written into the output in place of (or ahead of) a statement.
    pub fn comment(&self) -> String {
        let label = match self.kind {
            DiagnosticKind::SemanticWarning => "Warning",
            DiagnosticKind::SemanticError | DiagnosticKind::ParseFailure => "Error",
        };
        format!("// {}: {}\n", label, self.message)
    }
}

pub struct SemanticAnalyzer<'a> {
    symbols: &'a mut SymbolTable,
}

impl<'a> SemanticAnalyzer<'a> {
    pub fn new(symbols: &'a mut SymbolTable) -> Self {
        Self { symbols }
    }

    /// Record a declaration. Returns a warning when the name already exists;
    /// the caller still emits the declaration either way.
    pub fn declare(
        &mut self,
        is_const: bool,
        declared_type: ValueType,
        name: &str,
        value: &DeclValue,
        span: Span,
    ) -> Option<SemanticDiagnostic> {
        let kind = SymbolKind::from_const(is_const);
        let numeric = match value {
            DeclValue::Literal(lit) => self.numeric_value(declared_type, &lit.raw),
            DeclValue::Boolean(_) => None,
        };
        let info = SymbolInfo {
            declared_type,
            value: value.text(),
            numeric,
            is_reference: value.is_reference(),
            kind,
        };

        match self.symbols.get(name).map(|s| s.kind) {
            Some(existing) if existing == kind => Some(SemanticDiagnostic::warning(
                format!("{} '{}' already declared", kind.noun(), name),
                span,
            )),
            Some(existing) => {
                self.symbols.insert(name, info);
                Some(SemanticDiagnostic::warning(
                    format!("{} '{}' redeclares {} '{}'", kind.noun(), name, existing.noun(), name),
                    span,
                ))
            }
            None => {
                self.symbols.insert(name, info);
                None
            }
        }
    }

    /// Check an assignment and, when allowed, update the tracked value.
    /// Returns the target's declared type for literal formatting.
    pub fn assign(
        &mut self,
        target: &str,
        source: &AssignSource,
        span: Span,
    ) -> Result<ValueType, SemanticDiagnostic> {
        let declared_type = match self.symbols.get(target) {
            None => {
                return Err(SemanticDiagnostic::error(
                    format!("variable '{}' is not declared", target),
                    span,
                ))
            }
            Some(info) if info.kind == SymbolKind::Constant => {
                return Err(SemanticDiagnostic::error(
                    format!("cannot assign to constant '{}'", target),
                    span,
                ))
            }
            Some(info) => info.declared_type,
        };

        let (value, numeric, is_reference) = match source {
            AssignSource::Identifier(name) => match self.symbols.get(name) {
                Some(src) if declared_type.is_numeric() => (src.value.clone(), src.numeric, true),
                Some(src) => (src.value.clone(), None, true),
                None => (name.clone(), None, true),
            },
            AssignSource::Literal(text) => (text.clone(), self.numeric_value(declared_type, text), false),
            AssignSource::BooleanExpr(expr) => (expr.render_cpp(), None, false),
        };

        if let Some(info) = self.symbols.get_mut(target) {
            info.value = value;
            info.numeric = numeric;
            info.is_reference = is_reference;
        }
        Ok(declared_type)
    }

    /// Value of numeric text as of now. Int names drop the fraction like a
    /// C++ conversion would.
    fn numeric_value(&self, declared_type: ValueType, text: &str) -> Option<f64> {
        let value = match declared_type {
            ValueType::Int | ValueType::Float => evaluate_text(&*self.symbols, text)?,
            ValueType::Bool | ValueType::String => return None,
        };
        Some(if declared_type == ValueType::Int { value.trunc() } else { value })
    }
}

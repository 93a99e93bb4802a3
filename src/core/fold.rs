//! Translation-time evaluation of boolean trees.
//!
//! Relational operands are evaluated as `f64`. Identifiers are resolved
//! through the symbol table: numeric ones by the value stored when they were
//! last declared or assigned, boolean ones by reading `true`/`false`.

use log::trace;

use crate::core::ast::{ArithExpr, ArithOp, BoolOpTree, BoolOperand, ValueType};
use crate::core::diagnostics::Span;
use crate::core::lexer::Lexer;
use crate::core::parser::{ParseFailure, Parser};
use crate::core::symbols::SymbolTable;

pub struct Folder<'a> {
    symbols: &'a SymbolTable,
}

/// Evaluate value text (a number, a name or rendered arithmetic) against the
/// table as it is now. `None` when the text is not numeric or names something
/// without a known value.
pub fn evaluate_text(symbols: &SymbolTable, text: &str) -> Option<f64> {
    let tokens = Lexer::new(text).tokenize();
    let expr = Parser::new(tokens, symbols).parse_arithmetic().ok()?;
    Folder::new(symbols).evaluate(&expr).ok()
}

impl<'a> Folder<'a> {
    pub fn new(symbols: &'a SymbolTable) -> Self {
        Self { symbols }
    }

    pub fn fold_tree(&self, tree: &BoolOpTree) -> Result<bool, ParseFailure> {
        let operands = tree.operands();
        let mut acc = self.fold_operand(&operands[0])?;
        for (op, operand) in tree.operators().iter().zip(&operands[1..]) {
            let rhs = self.fold_operand(operand)?;
            acc = op.apply(acc, rhs);
        }
        Ok(acc)
    }

    fn fold_operand(&self, operand: &BoolOperand) -> Result<bool, ParseFailure> {
        match operand {
            BoolOperand::Literal(b) => Ok(*b),
            BoolOperand::Variable { name, span } => self.bool_variable(name, *span),
            BoolOperand::Not(inner) => Ok(!self.fold_operand(inner)?),
            BoolOperand::Tree(tree) => self.fold_tree(tree),
            BoolOperand::Comparison { left, op, right } => {
                let l = self.evaluate(left)?;
                let r = self.evaluate(right)?;
                trace!("fold {} {} {}", l, op.symbol(), r);
                Ok(op.apply(l, r))
            }
        }
    }

    fn bool_variable(&self, name: &str, span: Span) -> Result<bool, ParseFailure> {
        let info = self
            .symbols
            .get(name)
            .ok_or_else(|| ParseFailure::at(format!("variable '{}' is not declared", name), span))?;
        if info.declared_type != ValueType::Bool {
            return Err(ParseFailure::at(
                format!("variable '{}' is {}, not bool", name, info.declared_type),
                span,
            ));
        }
        match info.value.as_str() {
            "true" => Ok(true),
            "false" => Ok(false),
            _ => Err(ParseFailure::at(
                format!("value of '{}' is not known at translation time", name),
                span,
            )),
        }
    }

    /// Numeric value of an arithmetic operand.
    pub fn evaluate(&self, expr: &ArithExpr) -> Result<f64, ParseFailure> {
        match expr {
            ArithExpr::Number { text, span } => parse_number(text)
                .ok_or_else(|| ParseFailure::at(format!("invalid number '{}'", text), *span)),
            ArithExpr::Variable { name, span } => self.numeric_variable(name, *span),
            ArithExpr::Neg(inner) => Ok(-self.evaluate(inner)?),
            ArithExpr::Sqrt(inner) => Ok(self.evaluate(inner)?.sqrt()),
            ArithExpr::Group(inner) => self.evaluate(inner),
            ArithExpr::Binary { op, left, right } => {
                let l = self.evaluate(left)?;
                let r = self.evaluate(right)?;
                Ok(match op {
                    ArithOp::Add => l + r,
                    ArithOp::Sub => l - r,
                    ArithOp::Mul => l * r,
                    ArithOp::Div => l / r,
                    ArithOp::Rem => l % r,
                })
            }
        }
    }

    fn numeric_variable(&self, name: &str, span: Span) -> Result<f64, ParseFailure> {
        let info = self
            .symbols
            .get(name)
            .ok_or_else(|| ParseFailure::at(format!("variable '{}' is not declared", name), span))?;
        if !info.declared_type.is_numeric() {
            return Err(ParseFailure::at(
                format!("variable '{}' is {}, not numeric", name, info.declared_type),
                span,
            ));
        }
        info.numeric.ok_or_else(|| {
            ParseFailure::at(format!("value of '{}' is not known at translation time", name), span)
        })
    }
}

/// `3,14` and `3.14` are the same number.
fn parse_number(text: &str) -> Option<f64> {
    text.replace(',', ".").parse::<f64>().ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::ast::{BoolOp, CompareOp};
    use crate::core::symbols::{SymbolInfo, SymbolKind};

    fn num(text: &str) -> ArithExpr {
        ArithExpr::Number { text: text.into(), span: Span::default() }
    }

    fn var(name: &str) -> ArithExpr {
        ArithExpr::Variable { name: name.into(), span: Span::single(3, 7) }
    }

    fn table(entries: &[(&str, ValueType, &str)]) -> SymbolTable {
        let mut t = SymbolTable::new();
        for (name, ty, value) in entries {
            let numeric = if ty.is_numeric() { parse_number(value) } else { None };
            t.insert(name, SymbolInfo { declared_type: *ty, value: value.to_string(), numeric, is_reference: false, kind: SymbolKind::Variable });
        }
        t
    }

    #[test]
    fn parse_number_accepts_both_separators() {
        assert_eq!(parse_number("3,14"), Some(3.14));
        assert_eq!(parse_number("2.5e1"), Some(25.0));
        assert_eq!(parse_number("1.2.3"), None);
    }

    #[test]
    fn evaluates_arithmetic_operators() {
        let symbols = SymbolTable::new();
        let folder = Folder::new(&symbols);
        let expr = ArithExpr::binary(
            ArithOp::Rem,
            ArithExpr::Neg(Box::new(num("7"))),
            ArithExpr::Sqrt(Box::new(num("9"))),
        );
        assert_eq!(folder.evaluate(&expr), Ok(-1.0));
    }

    #[test]
    fn reads_stored_numeric_values() {
        let mut symbols = table(&[("a", ValueType::Int, "4")]);
        symbols.insert(
            "b",
            SymbolInfo { declared_type: ValueType::Float, value: "(a * 2,5)".into(), numeric: Some(10.0), is_reference: false, kind: SymbolKind::Variable },
        );
        let folder = Folder::new(&symbols);
        assert_eq!(folder.evaluate(&var("b")), Ok(10.0));
        let expr = ArithExpr::binary(ArithOp::Add, var("a"), var("b"));
        assert_eq!(folder.evaluate(&expr), Ok(14.0));
    }

    #[test]
    fn unknown_value_is_reported_at_the_name() {
        let symbols = table(&[("a", ValueType::Int, "(a + 1)")]);
        let err = Folder::new(&symbols).evaluate(&var("a")).unwrap_err();
        assert_eq!(err.message, "value of 'a' is not known at translation time");
        assert_eq!((err.line, err.column), (3, 7));
    }

    #[test]
    fn evaluate_text_uses_current_values() {
        let symbols = table(&[("n", ValueType::Int, "2")]);
        assert_eq!(evaluate_text(&symbols, "(n * 2)"), Some(4.0));
        assert_eq!(evaluate_text(&symbols, "n"), Some(2.0));
        assert_eq!(evaluate_text(&symbols, "sqrt(2,25)"), Some(1.5));
        assert_eq!(evaluate_text(&symbols, "ghost + 1"), None);
        assert_eq!(evaluate_text(&symbols, "hello world"), None);
    }

    #[test]
    fn rejects_undeclared_and_mistyped_names() {
        let symbols = table(&[("s", ValueType::String, "hi"), ("n", ValueType::Int, "1")]);
        let folder = Folder::new(&symbols);
        let err = folder.evaluate(&var("missing")).unwrap_err();
        assert_eq!(err.message, "variable 'missing' is not declared");
        let err = folder.evaluate(&var("s")).unwrap_err();
        assert_eq!(err.message, "variable 's' is string, not numeric");
        let err = folder
            .fold_operand(&BoolOperand::Variable { name: "n".into(), span: Span::default() })
            .unwrap_err();
        assert_eq!(err.message, "variable 'n' is int, not bool");
    }

    #[test]
    fn folds_mixed_tree() {
        let symbols = table(&[("flag", ValueType::Bool, "false")]);
        let mut tree = BoolOpTree::new(BoolOperand::Comparison { left: num("1"), op: CompareOp::Ne, right: num("1,0") });
        tree.push(BoolOp::Nor, BoolOperand::Variable { name: "flag".into(), span: Span::default() });
        // (1 != 1.0) !|| false  =>  !(false || false)
        assert_eq!(Folder::new(&symbols).fold_tree(&tree), Ok(true));
    }
}

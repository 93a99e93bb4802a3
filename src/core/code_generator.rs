//! C++ code generation.
//! - one terminated statement per AST root, appended to the context buffer
//! - semantic problems become `// Warning:` / `// Error:` comments
//! - no program boilerplate; see `Translation::program`
use log::debug;

use crate::core::ast::{ASTNode, AssignSource, DeclValue, Literal, LogArg, ValueType};
use crate::core::compiler::TranslationContext;
use crate::core::semantic_analyzer::{SemanticAnalyzer, SemanticDiagnostic};

pub struct CodeGenerator<'ctx> {
    ctx: &'ctx mut TranslationContext,
}

impl<'ctx> CodeGenerator<'ctx> {
    pub fn new(ctx: &'ctx mut TranslationContext) -> Self {
        Self { ctx }
    }

    pub fn emit(&mut self, node: &ASTNode) {
        match node {
            ASTNode::Declaration { is_const, declared_type, name, value, span, .. } => {
                let warning = SemanticAnalyzer::new(&mut self.ctx.symbols)
                    .declare(*is_const, *declared_type, name, value, *span);
                if let Some(warning) = warning {
                    self.diagnostic(warning);
                }
                let rendered = match value {
                    DeclValue::Literal(lit) => format_literal(lit),
                    DeclValue::Boolean(expr) => expr.render_cpp(),
                };
                let prefix = if *is_const { "const " } else { "" };
                self.line(format!("{}{} {} = {};", prefix, cpp_type(*declared_type), name, rendered));
            }
            ASTNode::Assignment { target, source, span } => {
                let checked = SemanticAnalyzer::new(&mut self.ctx.symbols).assign(target, source, *span);
                match checked {
                    Ok(target_type) => {
                        let rendered = match source {
                            AssignSource::Identifier(name) => name.clone(),
                            AssignSource::Literal(text) => format_assigned(text, target_type),
                            AssignSource::BooleanExpr(expr) => expr.render_cpp(),
                        };
                        self.line(format!("{} = {};", target, rendered));
                    }
                    Err(error) => self.diagnostic(error),
                }
            }
            ASTNode::LogCall { arg, .. } => {
                let rendered = match arg {
                    LogArg::Identifier(name) if self.ctx.symbols.contains(name) => name.clone(),
                    LogArg::Identifier(name) => {
                        debug!("log of undeclared '{}'", name);
                        format!("\"[Undefined variable: {}]\"", name)
                    }
                    LogArg::Literal(lit) => format_literal(lit),
                };
                self.line(format!("std::cout << {} << std::endl;", rendered));
            }
        }
    }

    fn line(&mut self, text: String) {
        self.ctx.output.push_str(&text);
        self.ctx.output.push('\n');
    }

    fn diagnostic(&mut self, diag: SemanticDiagnostic) {
        self.ctx.output.push_str(&diag.comment());
        self.ctx.report(diag.kind, diag.message, diag.span);
    }
}

pub fn cpp_type(ty: ValueType) -> &'static str {
    match ty {
        ValueType::Int => "int",
        ValueType::Float => "float",
        ValueType::Bool => "bool",
        ValueType::String => "std::string",
    }
}

/// Strings quoted, floats with `.` as separator, everything else verbatim.
/// References are always emitted bare.
pub fn format_literal(lit: &Literal) -> String {
    if lit.is_reference {
        return lit.raw.clone();
    }
    match lit.kind {
        ValueType::String => format!("\"{}\"", lit.raw),
        ValueType::Float => lit.raw.replace(',', "."),
        ValueType::Int | ValueType::Bool => lit.raw.clone(),
    }
}

/// Assignment right-hand sides are re-quoted only for string targets and
/// only when the text carries no quote of its own.
fn format_assigned(text: &str, target: ValueType) -> String {
    match target {
        ValueType::String if !text.contains('"') => format!("\"{}\"", text),
        ValueType::Float => text.replace(',', "."),
        _ => text.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::ast::{BoolExpr, BoolOpTree, BoolOperand, BoolOp};
    use crate::core::diagnostics::{DiagnosticKind, Span};

    fn decl(is_const: bool, ty: ValueType, name: &str, value: DeclValue) -> ASTNode {
        ASTNode::new_declaration(is_const, ty, name, value, Span::single(1, 1))
    }

    fn emit_all(nodes: &[ASTNode]) -> TranslationContext {
        let mut ctx = TranslationContext::new();
        for node in nodes {
            CodeGenerator::new(&mut ctx).emit(node);
        }
        ctx
    }

    #[test]
    fn test_declarations_use_cpp_types() {
        let ctx = emit_all(&[
            decl(false, ValueType::String, "s", DeclValue::Literal(Literal::new(ValueType::String, "hi"))),
            decl(true, ValueType::Float, "pi", DeclValue::Literal(Literal::new(ValueType::Float, "3,14"))),
            decl(false, ValueType::Bool, "b", DeclValue::Boolean(BoolExpr::Folded(true))),
            decl(false, ValueType::String, "t", DeclValue::Literal(Literal::reference(ValueType::String, "s"))),
        ]);
        assert_eq!(
            ctx.output,
            "std::string s = \"hi\";\nconst float pi = 3.14;\nbool b = true;\nstd::string t = s;\n"
        );
        assert!(ctx.diagnostics.is_empty());
    }

    #[test]
    fn test_redeclaration_emits_warning_and_statement() {
        let one = DeclValue::Literal(Literal::new(ValueType::Int, "1"));
        let two = DeclValue::Literal(Literal::new(ValueType::Int, "2"));
        let ctx = emit_all(&[
            decl(false, ValueType::Int, "x", one),
            decl(false, ValueType::Int, "x", two),
        ]);
        assert_eq!(ctx.output, "int x = 1;\n// Warning: variable 'x' already declared\nint x = 2;\n");
        assert_eq!(ctx.diagnostics.len(), 1);
        assert_eq!(ctx.diagnostics[0].kind, DiagnosticKind::SemanticWarning);
        assert_eq!(ctx.symbols.get("x").map(|s| s.value.as_str()), Some("1"));
    }

    #[test]
    fn test_assignment_errors_replace_statement() {
        let ctx = emit_all(&[
            decl(true, ValueType::Int, "c", DeclValue::Literal(Literal::new(ValueType::Int, "1"))),
            ASTNode::new_assignment("c", AssignSource::Literal("2".into()), Span::single(2, 1)),
            ASTNode::new_assignment("y", AssignSource::Literal("5".into()), Span::single(3, 1)),
        ]);
        assert_eq!(
            ctx.output,
            "const int c = 1;\n// Error: cannot assign to constant 'c'\n// Error: variable 'y' is not declared\n"
        );
        assert!(ctx.diagnostics.iter().all(|d| d.kind == DiagnosticKind::SemanticError));
        assert_eq!(ctx.diagnostics[1].span.line, 3);
    }

    #[test]
    fn test_assignment_formats_for_target_type() {
        let ctx = emit_all(&[
            decl(false, ValueType::String, "s", DeclValue::Literal(Literal::new(ValueType::String, ""))),
            decl(false, ValueType::Float, "f", DeclValue::Literal(Literal::new(ValueType::Float, "0"))),
            ASTNode::new_assignment("s", AssignSource::Literal("hey".into()), Span::default()),
            ASTNode::new_assignment("f", AssignSource::Literal("2,5".into()), Span::default()),
            ASTNode::new_assignment("s", AssignSource::Identifier("f".into()), Span::default()),
        ]);
        let lines: Vec<&str> = ctx.output.lines().skip(2).collect();
        assert_eq!(lines, vec!["s = \"hey\";", "f = 2.5;", "s = f;"]);
    }

    #[test]
    fn test_log_forms() {
        let ctx = emit_all(&[
            decl(false, ValueType::Int, "x", DeclValue::Literal(Literal::new(ValueType::Int, "1"))),
            ASTNode::new_log(LogArg::Identifier("x".into()), Span::default()),
            ASTNode::new_log(LogArg::Identifier("ghost".into()), Span::default()),
            ASTNode::new_log(LogArg::Literal(Literal::new(ValueType::String, "hi")), Span::default()),
            ASTNode::new_log(LogArg::Literal(Literal::new(ValueType::Float, "1,5")), Span::default()),
        ]);
        let lines: Vec<&str> = ctx.output.lines().skip(1).collect();
        assert_eq!(
            lines,
            vec![
                "std::cout << x << std::endl;",
                "std::cout << \"[Undefined variable: ghost]\" << std::endl;",
                "std::cout << \"hi\" << std::endl;",
                "std::cout << 1.5 << std::endl;",
            ]
        );
    }

    #[test]
    fn test_deferred_boolean_renders_expression() {
        let mut tree = BoolOpTree::new(BoolOperand::Variable { name: "a".into(), span: Span::default() });
        tree.push(BoolOp::Implies, BoolOperand::Literal(false));
        let ctx = emit_all(&[decl(false, ValueType::Bool, "b", DeclValue::Boolean(BoolExpr::Deferred(tree)))]);
        assert_eq!(ctx.output, "bool b = (!a || false);\n");
    }
}

//! AST for Vyrn statements.
//!
//! Statement roots are [`ASTNode`]; everything below them is typed so the
//! emitter can match exhaustively without a catch-all arm.

use serde::Serialize;
use std::fmt;

use crate::core::diagnostics::Span;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueType {
    Int,
    Float,
    Bool,
    String,
}

impl ValueType {
    pub fn from_keyword(word: &str) -> Option<Self> {
        match word {
            "int" => Some(ValueType::Int),
            "float" => Some(ValueType::Float),
            "bool" => Some(ValueType::Bool),
            "string" => Some(ValueType::String),
            _ => None,
        }
    }

    pub fn keyword(self) -> &'static str {
        match self {
            ValueType::Int => "int",
            ValueType::Float => "float",
            ValueType::Bool => "bool",
            ValueType::String => "string",
        }
    }

    pub fn is_numeric(self) -> bool {
        matches!(self, ValueType::Int | ValueType::Float)
    }
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}

/// A value as written. `raw` is the literal text (strings without quotes,
/// numbers verbatim, arithmetic as rendered text, or a referenced name).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Literal {
    pub kind: ValueType,
    pub raw: String,
    pub is_reference: bool,
}

impl Literal {
    pub fn new(kind: ValueType, raw: impl Into<String>) -> Self {
        Self { kind, raw: raw.into(), is_reference: false }
    }

    pub fn reference(kind: ValueType, name: impl Into<String>) -> Self {
        Self { kind, raw: name.into(), is_reference: true }
    }
}

/* ── Arithmetic ─────────────────────────────────────── */

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ArithOp {
    Add,
    Sub,
    Mul,
    Div,
    Rem,
}

impl ArithOp {
    pub fn symbol(self) -> &'static str {
        match self {
            ArithOp::Add => "+",
            ArithOp::Sub => "-",
            ArithOp::Mul => "*",
            ArithOp::Div => "/",
            ArithOp::Rem => "%",
        }
    }
}

/// Arithmetic grammar tree. Emission only ever uses [`ArithExpr::render`];
/// numbers are evaluated solely for relational comparisons being folded.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum ArithExpr {
    Number { text: String, span: Span },
    Variable { name: String, span: Span },
    Neg(Box<ArithExpr>),
    Sqrt(Box<ArithExpr>),
    Group(Box<ArithExpr>),
    Binary {
        op: ArithOp,
        left: Box<ArithExpr>,
        right: Box<ArithExpr>,
    },
}

impl ArithExpr {
    pub fn binary(op: ArithOp, left: ArithExpr, right: ArithExpr) -> Self {
        ArithExpr::Binary { op, left: Box::new(left), right: Box::new(right) }
    }

    /// Fully parenthesized text: `1 + 2 * 3` renders as `(1 + (2 * 3))`.
    pub fn render(&self) -> String {
        match self {
            ArithExpr::Number { text, .. } => text.clone(),
            ArithExpr::Variable { name, .. } => name.clone(),
            ArithExpr::Neg(inner) => format!("-{}", inner.render()),
            ArithExpr::Sqrt(inner) => format!("sqrt({})", inner.render()),
            ArithExpr::Group(inner) => format!("({})", inner.render()),
            ArithExpr::Binary { op, left, right } => {
                format!("({} {} {})", left.render(), op.symbol(), right.render())
            }
        }
    }

    pub fn as_variable(&self) -> Option<(&str, Span)> {
        match self {
            ArithExpr::Variable { name, span } => Some((name, *span)),
            _ => None,
        }
    }
}

/* ── Boolean ────────────────────────────────────────── */

/// Relational operator between two arithmetic operands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum CompareOp {
    Lt,
    Le,
    Gt,
    Ge,
    Eq,
    Ne,
}

impl CompareOp {
    pub fn from_lexeme(lexeme: &str) -> Option<Self> {
        match lexeme {
            "<" => Some(CompareOp::Lt),
            "<=" => Some(CompareOp::Le),
            ">" => Some(CompareOp::Gt),
            ">=" => Some(CompareOp::Ge),
            "==" => Some(CompareOp::Eq),
            "!=" => Some(CompareOp::Ne),
            _ => None,
        }
    }

    pub fn symbol(self) -> &'static str {
        match self {
            CompareOp::Lt => "<",
            CompareOp::Le => "<=",
            CompareOp::Gt => ">",
            CompareOp::Ge => ">=",
            CompareOp::Eq => "==",
            CompareOp::Ne => "!=",
        }
    }

    pub fn apply(self, left: f64, right: f64) -> bool {
        match self {
            CompareOp::Lt => left < right,
            CompareOp::Le => left <= right,
            CompareOp::Gt => left > right,
            CompareOp::Ge => left >= right,
            CompareOp::Eq => left == right,
            CompareOp::Ne => left != right,
        }
    }
}

/// Binary boolean combinator. `&&` and `!&&` bind tighter than the rest,
/// which all share one precedence level and fold left to right.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum BoolOp {
    And,
    Nand,
    Or,
    Nor,
    Xor,
    Nxor,
    Eq,
    Ne,
    Implies,
    NotImplies,
    Lt,
    Le,
    Gt,
    Ge,
}

impl BoolOp {
    pub fn from_lexeme(lexeme: &str) -> Option<Self> {
        let op = match lexeme {
            "&&" => BoolOp::And,
            "!&&" => BoolOp::Nand,
            "||" => BoolOp::Or,
            "!||" => BoolOp::Nor,
            "xor" => BoolOp::Xor,
            "nxor" => BoolOp::Nxor,
            "==" => BoolOp::Eq,
            "!=" => BoolOp::Ne,
            "=>" => BoolOp::Implies,
            "!=>" => BoolOp::NotImplies,
            "<" => BoolOp::Lt,
            "<=" => BoolOp::Le,
            ">" => BoolOp::Gt,
            ">=" => BoolOp::Ge,
            _ => return None,
        };
        Some(op)
    }

    pub fn lexeme(self) -> &'static str {
        match self {
            BoolOp::And => "&&",
            BoolOp::Nand => "!&&",
            BoolOp::Or => "||",
            BoolOp::Nor => "!||",
            BoolOp::Xor => "xor",
            BoolOp::Nxor => "nxor",
            BoolOp::Eq => "==",
            BoolOp::Ne => "!=",
            BoolOp::Implies => "=>",
            BoolOp::NotImplies => "!=>",
            BoolOp::Lt => "<",
            BoolOp::Le => "<=",
            BoolOp::Gt => ">",
            BoolOp::Ge => ">=",
        }
    }

    pub fn is_conjunction(self) -> bool {
        matches!(self, BoolOp::And | BoolOp::Nand)
    }

    pub fn apply(self, l: bool, r: bool) -> bool {
        match self {
            BoolOp::And => l && r,
            BoolOp::Nand => !(l && r),
            BoolOp::Or => l || r,
            BoolOp::Nor => !(l || r),
            BoolOp::Xor | BoolOp::Ne => l != r,
            BoolOp::Nxor | BoolOp::Eq => l == r,
            BoolOp::Implies | BoolOp::Le => !l || r,
            BoolOp::NotImplies | BoolOp::Gt => l && !r,
            BoolOp::Lt => !l && r,
            BoolOp::Ge => l || !r,
        }
    }

    /// C++ spelling of `l <op> r`; every form is self-parenthesized.
    pub fn render_cpp(self, l: &str, r: &str) -> String {
        match self {
            BoolOp::And => format!("({l} && {r})"),
            BoolOp::Nand => format!("!({l} && {r})"),
            BoolOp::Or => format!("({l} || {r})"),
            BoolOp::Nor => format!("!({l} || {r})"),
            BoolOp::Xor | BoolOp::Ne => format!("({l} != {r})"),
            BoolOp::Nxor | BoolOp::Eq => format!("({l} == {r})"),
            BoolOp::Implies | BoolOp::Le => format!("(!{l} || {r})"),
            BoolOp::NotImplies | BoolOp::Gt => format!("({l} && !{r})"),
            BoolOp::Lt => format!("(!{l} && {r})"),
            BoolOp::Ge => format!("({l} || !{r})"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum BoolOperand {
    Literal(bool),
    Variable { name: String, span: Span },
    Not(Box<BoolOperand>),
    Tree(BoolOpTree),
    Comparison {
        left: ArithExpr,
        op: CompareOp,
        right: ArithExpr,
    },
}

impl BoolOperand {
    pub fn render_cpp(&self) -> String {
        match self {
            BoolOperand::Literal(b) => b.to_string(),
            BoolOperand::Variable { name, .. } => name.clone(),
            BoolOperand::Not(inner) => format!("!{}", inner.render_cpp()),
            BoolOperand::Tree(tree) => tree.render_cpp(),
            BoolOperand::Comparison { left, op, right } => {
                format!("({} {} {})", left.render(), op.symbol(), right.render())
            }
        }
    }
}

/// N-ary, pre-fold form of one precedence level: `operands[0] op[0]
/// operands[1] op[1] ...`. Always holds one more operand than operators.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BoolOpTree {
    operands: Vec<BoolOperand>,
    operators: Vec<BoolOp>,
}

impl BoolOpTree {
    pub fn new(first: BoolOperand) -> Self {
        Self { operands: vec![first], operators: Vec::new() }
    }

    pub fn push(&mut self, op: BoolOp, operand: BoolOperand) {
        self.operators.push(op);
        self.operands.push(operand);
    }

    pub fn operands(&self) -> &[BoolOperand] {
        &self.operands
    }

    pub fn operators(&self) -> &[BoolOp] {
        &self.operators
    }

    /// Collapse a tree with no operators back into its single operand.
    pub fn into_operand(mut self) -> BoolOperand {
        if self.operators.is_empty() && self.operands.len() == 1 {
            self.operands.remove(0)
        } else {
            BoolOperand::Tree(self)
        }
    }

    /// Wrap an operand as a tree, reusing it when it already is one.
    pub fn from_operand(operand: BoolOperand) -> Self {
        match operand {
            BoolOperand::Tree(tree) => tree,
            other => BoolOpTree::new(other),
        }
    }

    pub fn render_cpp(&self) -> String {
        let mut acc = self.operands[0].render_cpp();
        for (op, operand) in self.operators.iter().zip(&self.operands[1..]) {
            acc = op.render_cpp(&acc, &operand.render_cpp());
        }
        acc
    }
}

/// A boolean value: folded at translation time, or kept as a tree for the
/// C++ side to evaluate.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum BoolExpr {
    Folded(bool),
    Deferred(BoolOpTree),
}

impl BoolExpr {
    pub fn render_cpp(&self) -> String {
        match self {
            BoolExpr::Folded(b) => b.to_string(),
            BoolExpr::Deferred(tree) => tree.render_cpp(),
        }
    }
}

/* ── Statements ─────────────────────────────────────── */

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum DeclValue {
    Literal(Literal),
    Boolean(BoolExpr),
}

impl DeclValue {
    /// Text the symbol table tracks for this value.
    pub fn text(&self) -> String {
        match self {
            DeclValue::Literal(lit) => lit.raw.clone(),
            DeclValue::Boolean(expr) => expr.render_cpp(),
        }
    }

    pub fn is_reference(&self) -> bool {
        matches!(self, DeclValue::Literal(Literal { is_reference: true, .. }))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum AssignSource {
    Identifier(String),
    Literal(String),
    BooleanExpr(BoolExpr),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum LogArg {
    Identifier(String),
    Literal(Literal),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum ASTNode {
    Declaration {
        is_const: bool,
        declared_type: ValueType,
        name: String,
        value: DeclValue,
        is_reference: bool,
        span: Span,
    },
    Assignment {
        target: String,
        source: AssignSource,
        span: Span,
    },
    LogCall {
        arg: LogArg,
        span: Span,
    },
}

impl ASTNode {
    pub fn new_declaration(
        is_const: bool,
        declared_type: ValueType,
        name: &str,
        value: DeclValue,
        span: Span,
    ) -> Self {
        let is_reference = value.is_reference();
        ASTNode::Declaration {
            is_const,
            declared_type,
            name: name.to_string(),
            value,
            is_reference,
            span,
        }
    }

    pub fn new_assignment(target: &str, source: AssignSource, span: Span) -> Self {
        ASTNode::Assignment { target: target.to_string(), source, span }
    }

    pub fn new_log(arg: LogArg, span: Span) -> Self {
        ASTNode::LogCall { arg, span }
    }

    pub fn span(&self) -> Span {
        match self {
            ASTNode::Declaration { span, .. }
            | ASTNode::Assignment { span, .. }
            | ASTNode::LogCall { span, .. } => *span,
        }
    }
}

//! Core module tree for the Vyrn translator.

pub mod ast;
pub mod code_generator;
pub mod compiler;
pub mod diagnostics;
pub mod error;
pub mod fold;
pub mod lexer;
pub mod parser;
pub mod semantic_analyzer;
pub mod splitter;
pub mod symbols;
pub mod token;

pub use compiler::{Compiler, Translation, TranslationContext};
pub use token::TokenKind;

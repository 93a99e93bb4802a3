use std::path::Path;
use std::process::ExitCode;

use crate::core::code_generator::CodeGenerator;
use crate::core::splitter::split_statements;
use crate::core::{Compiler, TranslationContext};

use super::compile::read_source;

pub fn main(input: &Path, compiler: &Compiler) -> anyhow::Result<ExitCode> {
    let source = read_source(input)?;
    let failures = dump(&source, compiler);
    Ok(if failures == 0 { ExitCode::SUCCESS } else { ExitCode::FAILURE })
}

/// Print the AST of every statement. Statements are still emitted into a
/// scratch context so later ones see earlier declarations. Returns the
/// number of statements that failed to parse.
pub fn dump(source: &str, compiler: &Compiler) -> usize {
    let mut ctx = TranslationContext::new();
    let mut failures = 0;
    for (index, stmt) in split_statements(source).iter().enumerate() {
        ctx.begin_statement(index);
        match compiler.parse(&ctx, stmt) {
            Ok(node) => {
                println!("-- statement {}\n{:#?}", index, node);
                CodeGenerator::new(&mut ctx).emit(&node);
            }
            Err(failure) => {
                failures += 1;
                println!("-- statement {}\nparse failure: {}", index, failure);
            }
        }
    }
    failures
}

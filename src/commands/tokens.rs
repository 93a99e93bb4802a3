use std::path::Path;
use std::process::ExitCode;

use crate::core::lexer::Lexer;
use crate::core::splitter::split_statements;

use super::compile::read_source;

pub fn main(input: &Path) -> anyhow::Result<ExitCode> {
    let source = read_source(input)?;
    dump(&source);
    Ok(ExitCode::SUCCESS)
}

/// One header per statement, then its tokens with source positions.
pub fn dump(source: &str) {
    for (index, stmt) in split_statements(source).iter().enumerate() {
        println!("-- statement {} @{}:{}", index, stmt.line, stmt.column);
        for token in Lexer::with_origin(&stmt.text, stmt.line, stmt.column).tokenize() {
            println!("  {}", token);
        }
    }
}

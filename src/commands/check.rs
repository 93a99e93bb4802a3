use std::path::Path;
use std::process::ExitCode;

use colored::Colorize;
use serde::Serialize;

use crate::core::diagnostics::Diagnostic;
use crate::core::symbols::SymbolTable;
use crate::core::Compiler;

use super::compile::{exit_code, read_source, report};

#[derive(Serialize)]
struct CheckReport<'a> {
    diagnostics: &'a [Diagnostic],
    symbols: &'a SymbolTable,
}

pub fn main(input: &Path, json: bool, pretty: bool, compiler: &Compiler) -> anyhow::Result<ExitCode> {
    let source = read_source(input)?;
    let translation = compiler.translate(&source);

    if json {
        let report = CheckReport {
            diagnostics: &translation.diagnostics,
            symbols: &translation.symbols,
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(exit_code(&translation));
    }

    report(input, &source, &translation, pretty);
    let errors = translation.errors().count();
    let warnings = translation.warnings().count();
    if errors == 0 && warnings == 0 {
        println!("{} {}: no problems found", "ok:".green().bold(), input.display());
    } else {
        println!("{}: {} error(s), {} warning(s)", input.display(), errors, warnings);
    }
    Ok(exit_code(&translation))
}

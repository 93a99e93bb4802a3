use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use crate::config::{ensure_parent_dir, Config};
use crate::core::compiler::CompilerOptions;
use crate::core::diagnostics::{print_diagnostic, print_plain};
use crate::core::error::CoreError;
use crate::core::parser::ParserOptions;
use crate::core::{Compiler, Translation};

pub struct EmitOptions {
    pub out: PathBuf,
    /// Statements only, no includes or `main()`.
    pub bare: bool,
    pub print_tokens: bool,
    pub print_ast: bool,
    pub pretty: bool,
}

/// Folding is on unless the config or `--no-fold` turns it off.
pub fn compiler_for(config: &Config, no_fold: bool) -> Compiler {
    let fold_booleans = config.emit.fold_booleans && !no_fold;
    Compiler::with_options(CompilerOptions {
        parser: ParserOptions { fold_booleans },
    })
}

pub fn read_source(input: &Path) -> Result<String, CoreError> {
    fs::read_to_string(input).map_err(|e| CoreError::read(input, e))
}

/// Print every diagnostic of a run to stderr, in source order.
pub fn report(input: &Path, source: &str, translation: &Translation, pretty: bool) {
    let filename = input.display().to_string();
    for diag in &translation.diagnostics {
        if pretty {
            print_diagnostic(&filename, source, diag);
        } else {
            print_plain(&filename, diag);
        }
    }
}

pub fn exit_code(translation: &Translation) -> ExitCode {
    if translation.has_errors() {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}

/// Translate `input` and write the C++ to `opts.out`. The file is written
/// even when diagnostics were reported; the exit code says whether any of
/// them was an error.
pub fn compile_pipeline(input: &Path, opts: &EmitOptions, compiler: &Compiler) -> anyhow::Result<ExitCode> {
    let source = read_source(input)?;
    log::info!("{}", compiler.validate_and_summarize(&source)?);

    if opts.print_tokens {
        println!("=== Tokens ===");
        super::tokens::dump(&source);
        println!();
    }
    if opts.print_ast {
        println!("=== AST ===");
        super::ast::dump(&source, compiler);
        println!();
    }

    let translation = compiler.translate(&source);
    report(input, &source, &translation, opts.pretty);

    let output = if opts.bare { translation.code.clone() } else { translation.program() };
    ensure_parent_dir(&opts.out)?;
    fs::write(&opts.out, output).map_err(|e| CoreError::write(&opts.out, e))?;

    println!("ok: wrote C++ to '{}'.", opts.out.display());
    Ok(exit_code(&translation))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn opts(out: PathBuf, bare: bool) -> EmitOptions {
        EmitOptions { out, bare, print_tokens: false, print_ast: false, pretty: false }
    }

    #[test]
    fn writes_bare_statements() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("demo.vy");
        let out = dir.path().join("nested").join("demo.cpp");
        fs::write(&input, "let int x = 5; log(x);").unwrap();

        let code = compile_pipeline(&input, &opts(out.clone(), true), &Compiler::new()).unwrap();
        assert_eq!(code, ExitCode::SUCCESS);
        assert_eq!(
            fs::read_to_string(&out).unwrap(),
            "int x = 5;\nstd::cout << x << std::endl;\n"
        );
    }

    #[test]
    fn errors_still_write_output() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("bad.vy");
        let out = dir.path().join("bad.cpp");
        fs::write(&input, "y = 5; log(1);").unwrap();

        let code = compile_pipeline(&input, &opts(out.clone(), false), &Compiler::new()).unwrap();
        assert_eq!(code, ExitCode::FAILURE);
        let written = fs::read_to_string(&out).unwrap();
        assert!(written.contains("// Error: variable 'y' is not declared"));
        assert!(written.contains("int main() {"));
    }

    #[test]
    fn empty_source_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("empty.vy");
        fs::write(&input, "  \n").unwrap();
        let err = compile_pipeline(&input, &opts(dir.path().join("o.cpp"), true), &Compiler::new())
            .unwrap_err();
        assert!(err.to_string().contains("source is empty"));
    }

    #[test]
    fn no_fold_flag_wins_over_config() {
        let config = Config::default();
        let t = compiler_for(&config, true).translate("let bool b = true && false;");
        assert_eq!(t.code, "bool b = (true && false);\n");
        let t = compiler_for(&config, false).translate("let bool b = true && false;");
        assert_eq!(t.code, "bool b = false;\n");
    }
}

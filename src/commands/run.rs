use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, ExitCode, ExitStatus};

use anyhow::Context;
use colored::Colorize;

use super::compile::{exit_code, read_source, report};
use crate::config::{ensure_parent_dir, ToolchainConfig};
use crate::core::error::CoreError;
use crate::core::Compiler;

#[derive(Debug)]
pub struct RunOutput {
    pub status: ExitStatus,
    pub stdout: String,
    pub stderr: String,
}

/// Write `program` into `workdir`, compile it with the configured toolchain
/// and run the result, capturing its output.
pub fn build_and_run(program: &str, toolchain: &ToolchainConfig, workdir: &Path) -> Result<RunOutput, CoreError> {
    let src = workdir.join("vyrn_program.cpp");
    let exe = workdir.join(if cfg!(windows) { "vyrn_program.exe" } else { "vyrn_program" });
    fs::write(&src, program).map_err(|e| CoreError::write(&src, e))?;

    log::debug!("{} {} {} -o {}", toolchain.compiler, toolchain.flags.join(" "), src.display(), exe.display());
    let built = Command::new(&toolchain.compiler)
        .args(&toolchain.flags)
        .arg(&src)
        .arg("-o")
        .arg(&exe)
        .output()
        .map_err(|source| CoreError::ToolchainLaunch { program: toolchain.compiler.clone(), source })?;
    if !built.status.success() {
        return Err(CoreError::ToolchainFailed {
            program: toolchain.compiler.clone(),
            status: built.status,
            stderr: String::from_utf8_lossy(&built.stderr).into_owned(),
        });
    }

    let ran = Command::new(&exe)
        .output()
        .map_err(|source| CoreError::ProgramLaunch { path: exe.clone(), source })?;
    Ok(RunOutput {
        status: ran.status,
        stdout: String::from_utf8_lossy(&ran.stdout).into_owned(),
        stderr: String::from_utf8_lossy(&ran.stderr).into_owned(),
    })
}

pub fn main_with_opts(
    input: &Path,
    out: Option<PathBuf>,
    keep_temp: bool,
    pretty: bool,
    compiler: &Compiler,
    toolchain: &ToolchainConfig,
) -> anyhow::Result<ExitCode> {
    let source = read_source(input)?;
    let translation = compiler.translate(&source);
    report(input, &source, &translation, pretty);
    let program = translation.program();

    if let Some(out) = out {
        ensure_parent_dir(&out)?;
        fs::write(&out, &program).map_err(|e| CoreError::write(&out, e))?;
    }

    let scratch = tempfile::Builder::new()
        .prefix("vyrn-run")
        .tempdir()
        .context("Create scratch dir")?;
    let result = build_and_run(&program, toolchain, scratch.path());
    if keep_temp {
        let kept = scratch.keep();
        eprintln!("{} kept scratch dir '{}'", "note:".cyan().bold(), kept.display());
    }
    let run = result?;

    print!("{}", run.stdout);
    eprint!("{}", run.stderr);
    if !run.status.success() {
        eprintln!("{} program exited with status: {}", "warn:".yellow().bold(), run.status);
        return Ok(ExitCode::FAILURE);
    }
    Ok(exit_code(&translation))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_toolchain_is_a_launch_error() {
        let dir = tempfile::tempdir().unwrap();
        let toolchain = ToolchainConfig {
            compiler: "vyrn-no-such-compiler".into(),
            flags: vec![],
        };
        let err = build_and_run("int main() {}\n", &toolchain, dir.path()).unwrap_err();
        assert!(matches!(err, CoreError::ToolchainLaunch { .. }), "{err}");
        assert!(dir.path().join("vyrn_program.cpp").exists());
    }
}

use std::process::Command;

use vyrn::commands::run::build_and_run;
use vyrn::config::ToolchainConfig;
use vyrn::Compiler;

fn have_gxx() -> bool {
    Command::new("g++").arg("--version").output().map(|o| o.status.success()).unwrap_or(false)
}

#[test]
fn emitted_program_compiles_and_prints() {
    if !have_gxx() {
        eprintln!("skipping: g++ not available");
        return;
    }
    let src = r#"
        let int x = 2 * 3;
        let float half = 2,5;
        let bool ok = x > 5 xor false;
        let string s = "done";
        x = x + 1;
        log(x);
        log(half);
        log(ok);
        log(s);
        log(missing);
    "#;
    let translation = Compiler::new().translate(src);
    assert!(!translation.has_errors(), "{:?}", translation.diagnostics);

    let dir = tempfile::tempdir().unwrap();
    let run = build_and_run(&translation.program(), &ToolchainConfig::default(), dir.path()).unwrap();
    assert!(run.status.success(), "{}", run.stderr);
    assert_eq!(run.stdout, "7\n2.5\ntrue\ndone\n[Undefined variable: missing]\n");
}

#[test]
fn toolchain_failure_carries_stderr() {
    if !have_gxx() {
        eprintln!("skipping: g++ not available");
        return;
    }
    let dir = tempfile::tempdir().unwrap();
    let err = build_and_run("int main() { return undeclared; }\n", &ToolchainConfig::default(), dir.path())
        .unwrap_err();
    assert!(err.to_string().contains("failed"), "{err}");
}

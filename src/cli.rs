use clap::{ArgAction, Parser, Subcommand};
use log::LevelFilter;
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(
    name = "vyrn",
    about = "Vyrn: translate .vy statements into C++, check them, or run them",
    version,
    propagate_version = true,
    disable_help_subcommand = true
)]
pub struct VyrnCli {
    /// Global: pretty diagnostics (source line + caret)
    #[arg(long = "pretty-errors", action = ArgAction::SetTrue, global = true)]
    pub pretty_errors: bool,

    /// Global: keep boolean expressions for C++ to evaluate instead of folding them
    #[arg(long = "no-fold", action = ArgAction::SetTrue, global = true)]
    pub no_fold: bool,

    /// Global: path to config (TOML); default: ~/.vyrn/config.toml
    #[arg(long = "config", value_name = "FILE", global = true)]
    pub config: Option<PathBuf>,

    /// Global: log level (overrides VYRN_LOG)
    #[arg(long = "log-level", value_name = "LEVEL", global = true)]
    pub log_level: Option<LevelFilter>,

    /// `vyrn <file>` behaves like `vyrn emit <file>`
    #[arg(value_name = "input_pos")]
    pub input_pos: Option<PathBuf>,

    #[command(subcommand)]
    pub cmd: Option<Command>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Emit C++ for a .vy file
    ///
    /// Examples:
    ///   vyrn emit demo.vy -o demo.cpp
    ///   vyrn emit demo.vy --bare
    Emit {
        #[arg(value_name = "INPUT")]
        input: PathBuf,

        /// Output file path (short: -o)
        #[arg(short = 'o', long = "out", value_name = "FILE", default_value = "output.cpp")]
        out: PathBuf,

        /// Statements only, without includes and main()
        #[arg(long = "bare", action = ArgAction::SetTrue)]
        bare: bool,

        /// Dump tokens (debug)
        #[arg(long = "tokens", action = ArgAction::SetTrue)]
        tokens: bool,

        /// Dump AST (debug)
        #[arg(long = "ast", action = ArgAction::SetTrue)]
        ast: bool,
    },

    /// Translate, compile with the configured C++ toolchain, and run
    Run {
        #[arg(value_name = "INPUT")]
        input: PathBuf,
        /// Also write the generated C++ to FILE
        #[arg(long = "out", value_name = "FILE")]
        out: Option<PathBuf>,
        /// Keep the scratch directory with the source and executable
        #[arg(long = "keep-temp", action = ArgAction::SetTrue)]
        keep_temp: bool,
    },

    /// Report diagnostics without writing output
    Check {
        #[arg(value_name = "INPUT")]
        input: PathBuf,
        /// Print diagnostics and final symbols as JSON
        #[arg(long = "json", action = ArgAction::SetTrue)]
        json: bool,
    },

    /// Debug helpers
    Tokens {
        #[arg(value_name = "INPUT")]
        input: PathBuf,
    },
    Ast {
        #[arg(value_name = "INPUT")]
        input: PathBuf,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn positional_input_without_subcommand() {
        let cli = VyrnCli::try_parse_from(["vyrn", "demo.vy"]).unwrap();
        assert_eq!(cli.input_pos, Some(PathBuf::from("demo.vy")));
        assert!(cli.cmd.is_none());
    }

    #[test]
    fn emit_defaults_and_global_flags() {
        let cli = VyrnCli::try_parse_from(["vyrn", "emit", "a.vy", "--no-fold", "--bare"]).unwrap();
        assert!(cli.no_fold);
        match cli.cmd {
            Some(Command::Emit { out, bare, .. }) => {
                assert_eq!(out, PathBuf::from("output.cpp"));
                assert!(bare);
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn log_level_parses() {
        let cli = VyrnCli::try_parse_from(["vyrn", "--log-level", "debug", "check", "a.vy"]).unwrap();
        assert_eq!(cli.log_level, Some(LevelFilter::Debug));
    }
}

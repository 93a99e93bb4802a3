//! vyrn — translate `.vy` statements into C++, check them, or run them.
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{CommandFactory, Parser}; // trait imports enable VyrnCli::parse() / ::command()
use log::LevelFilter;

use vyrn::cli::{Command, VyrnCli};
use vyrn::commands;
use vyrn::commands::compile::EmitOptions;
use vyrn::config::load_config;

fn init_logging(level: Option<LevelFilter>) {
    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().filter_or("VYRN_LOG", "warn"));
    if let Some(level) = level {
        builder.filter_level(level);
    }
    builder.format_timestamp(None).init();
}

fn main() -> anyhow::Result<ExitCode> {
    let args = VyrnCli::parse();
    init_logging(args.log_level);

    let config = load_config(&args.config)?;
    let compiler = commands::compile::compiler_for(&config, args.no_fold);
    let pretty = args.pretty_errors;

    match args.cmd {
        // `vyrn <file>` behaves like `vyrn emit <file>`.
        None => match args.input_pos {
            Some(input) => {
                let opts = EmitOptions {
                    out: PathBuf::from("output.cpp"),
                    bare: !config.emit.wrap_program,
                    print_tokens: false,
                    print_ast: false,
                    pretty,
                };
                commands::compile::compile_pipeline(&input, &opts, &compiler)
            }
            None => {
                VyrnCli::command().print_help()?;
                Ok(ExitCode::from(2))
            }
        },

        Some(Command::Emit { input, out, bare, tokens, ast }) => {
            let opts = EmitOptions {
                out,
                bare: bare || !config.emit.wrap_program,
                print_tokens: tokens,
                print_ast: ast,
                pretty,
            };
            commands::compile::compile_pipeline(&input, &opts, &compiler)
        }

        Some(Command::Run { input, out, keep_temp }) => {
            commands::run::main_with_opts(&input, out, keep_temp, pretty, &compiler, &config.toolchain)
        }

        Some(Command::Check { input, json }) => commands::check::main(&input, json, pretty, &compiler),

        Some(Command::Tokens { input }) => commands::tokens::main(&input),

        Some(Command::Ast { input }) => commands::ast::main(&input, &compiler),
    }
}

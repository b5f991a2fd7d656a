//! Command line front end for follower-group expressions.

mod cli;
mod error;
mod logging;

use std::io;
use std::process::ExitCode;

use clap::{CommandFactory, Parser};

use crate::cli::Cli;

fn main() -> ExitCode {
    let args = Cli::parse();
    logging::init(args.verbose);

    let Some(expression) = args.expression.as_deref() else {
        eprintln!("{}", Cli::command().render_help());
        return ExitCode::FAILURE;
    };

    let stdout = io::stdout();
    let stderr = io::stderr();
    match cli::run(&args, expression, &mut stdout.lock(), &mut stderr.lock()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

use std::process::ExitCode;

use clap::Parser;
use termlab_cli::Args;

fn main() -> ExitCode {
    let args = Args::parse();

    match termlab_cli::run(&args) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(err) => {
            eprintln!("termlab: {}", err);
            ExitCode::from(2)
        }
    }
}

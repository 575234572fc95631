//! Binary entrypoint for the `recap` CLI.

use std::process::ExitCode;

fn main() -> ExitCode {
    match recap::run(std::env::args()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{err}");
            ExitCode::FAILURE
        }
    }
}

use airline_console::cli::{self, Cli};
use airline_console::core::ConsoleError;
use clap::Parser;
use std::process::ExitCode;

fn main() -> ExitCode {
    // Wrong arity prints usage and exits without connecting
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let _ = e.print();
            return ExitCode::SUCCESS;
        }
    };

    match cli::run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e @ ConsoleError::Connect(_)) => {
            eprintln!("Error - {}", e);
            eprintln!("Make sure the database file exists, or set bootstrap_schema = true in the config");
            ExitCode::FAILURE
        }
        Err(e) if e.is_fatal() => {
            eprintln!("Error - {}", e);
            ExitCode::FAILURE
        }
        Err(e) => {
            eprintln!("{}", e);
            ExitCode::SUCCESS
        }
    }
}

//! # Almacen CLI Entry Point
//!
//! The actual setup is in lib.rs so commands can be tested without a process.
//! Errors are printed to stderr and mapped to an exit status per error code.

use std::process::ExitCode;

#[tokio::main]
async fn main() -> ExitCode {
    match almacen_cli::run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {}", err.message);
            ExitCode::from(err.code.exit_code())
        }
    }
}

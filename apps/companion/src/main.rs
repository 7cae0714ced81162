//! # Candy Kush Companion Entry Point
//!
//! Parses arguments and hands off to `candykush_companion::run`, which
//! holds the actual startup sequence for better testability.

use clap::Parser;

use candykush_companion::{init_tracing, run, Cli};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(cli).await {
        Ok(output) => {
            if !output.is_empty() {
                println!("{}", output);
            }
        }
        Err(e) => {
            eprintln!("error: {}", e.message);
            std::process::exit(e.code.exit_code());
        }
    }
}

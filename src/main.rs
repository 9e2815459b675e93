mod ai;
mod app;
mod cli;
mod config;
mod export;
mod logging;
mod model;
mod orchestrator;
mod scoring;
mod store;
mod text_summary;
#[cfg(feature = "tui")]
mod tui;

use anyhow::Result;
use clap::Parser;

#[tokio::main]
async fn main() -> Result<()> {
    let args = cli::Cli::parse();
    let is_non_tui = !args.is_interactive() || cfg!(not(feature = "tui"));

    // Held until exit so buffered log lines reach the file.
    let _log_guard = if is_non_tui {
        logging::init_stderr();
        None
    } else {
        logging::init_tui()
    };

    match cli::run(args).await {
        Ok(()) => {
            // Explicitly exit with code 0 on success, especially for non-TUI modes
            if is_non_tui {
                std::process::exit(0);
            }
            Ok(())
        }
        Err(e) => {
            tracing::error!(error = %format!("{e:#}"), "exiting with error");
            Err(e)
        }
    }
}

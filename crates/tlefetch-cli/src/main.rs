use tlefetch_core::logging;

mod cli;

use crate::cli::Cli;

fn main() {
    // Initialize logging as early as possible; fall back to stderr if the state dir is unusable.
    if let Err(e) = logging::init_logging() {
        logging::init_logging_stderr();
        tracing::warn!("file logging unavailable: {:#}", e);
    }

    // Parse CLI and dispatch.
    if let Err(err) = Cli::run_from_args() {
        eprintln!("tlefetch error: {:#}", err);
        std::process::exit(1);
    }
}

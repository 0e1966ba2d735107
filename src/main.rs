//! pentest-memory CLI binary entry point.

use pentest_memory::cli::{memory, Cli, Commands};
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse_args();

    let result = match &cli.command {
        Commands::Show(args) => memory::handle_show(args),
        Commands::Stats(args) => memory::handle_stats(args),
        Commands::Clear(args) => memory::handle_clear(args),
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

//! InteriorRec - interactive room design service
//!
//! Serves the design session API and offers headless access to the
//! generation backend and configuration.

use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use interiorrec::cli::{self, CliError};
use interiorrec::constants::APP_NAME;

/// InteriorRec - interactive room design service
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the web API server
    #[cfg(feature = "web")]
    Serve(cli::ServeArgs),
    /// Generate design options for a room
    Generate(cli::GenerateArgs),
    /// Manage configuration
    Config(cli::ConfigArgs),
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Initialize tracing
    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let result: Result<(), CliError> = match &cli.command {
        #[cfg(feature = "web")]
        Command::Serve(args) => args.execute().await,
        Command::Generate(args) => args.execute().await,
        Command::Config(args) => args.execute(),
    };

    if let Err(e) = result {
        eprintln!("{APP_NAME}: {e}");
        std::process::exit(e.exit_code.code());
    }
}

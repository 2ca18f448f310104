mod cmd;
mod output;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "fanout",
    about = "Config-driven HTTP fan-out to Kubernetes pods",
    version,
    propagate_version = true
)]
struct Cli {
    /// Path to a config file. Can be passed multiple times; documents are
    /// merged section-wise in the order given.
    #[arg(long = "config", short = 'c', global = true)]
    config: Vec<PathBuf>,

    /// Output as JSON
    #[arg(long, global = true, short = 'j')]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Execute all configured actions in declaration order and exit
    Batch,

    /// Start the HTTP server exposing one route per action
    Serve {
        /// Port to listen on
        #[arg(long, default_value = "8645")]
        port: u16,
    },

    /// Validate the configuration and print a summary
    Check,
}

fn main() {
    let cli = Cli::parse();

    let default_level = match &cli.command {
        Commands::Batch | Commands::Serve { .. } => tracing::Level::INFO,
        Commands::Check => tracing::Level::WARN,
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(default_level.into()),
        )
        .with_target(false)
        // Logs go to stderr so `--json` output on stdout stays parseable.
        .with_writer(std::io::stderr)
        .init();

    let result = match cli.command {
        Commands::Batch => cmd::batch::run(&cli.config, cli.json),
        Commands::Serve { port } => cmd::serve::run(&cli.config, port),
        Commands::Check => cmd::check::run(&cli.config, cli.json),
    };

    if let Err(e) = result {
        // Print the full error chain (anyhow's alternate Display)
        eprintln!("error: {e:#}");
        std::process::exit(1);
    }
}

#![deny(missing_docs)]

//! # Routegen CLI
//!
//! Command Line Interface for the comment-directive route generator.
//!
//! Supported Commands:
//! - `generate`: Scan handler sources and rewrite router registration files.
//! - `list`: Print the effective route table.
//! - `clean`: Remove generated routers and the change marker.

use clap::{Parser, Subcommand};
use routegen_core::AppResult;

mod clean;
mod generate;
mod list;
mod project;

#[derive(Parser, Debug)]
#[clap(author, version, about = "Generate router registrations from @action/@router comments")]
struct Cli {
    /// Log at debug level unless RUST_LOG says otherwise.
    #[clap(long, short, global = true)]
    verbose: bool,

    #[clap(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Regenerate router files when handler directives changed.
    Generate(generate::GenerateArgs),
    /// Print the routes that would be registered.
    List(list::ListArgs),
    /// Delete generated router files and the change marker.
    Clean(clean::CleanArgs),
}

fn main() -> AppResult<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .try_init();
    tracing::debug!(command = ?cli.command, "running command");

    match &cli.command {
        Commands::Generate(args) => generate::execute(args)?,
        Commands::List(args) => list::execute(args)?,
        Commands::Clean(args) => clean::execute(args)?,
    }

    Ok(())
}

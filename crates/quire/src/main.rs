//! Quire CLI - static blog generator.

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, EnvFilter};

mod commands;

#[derive(Parser)]
#[command(name = "quire")]
#[command(about = "Turn a directory of Markdown posts into a static blog")]
#[command(version)]
pub struct Cli {
    /// Command to run (defaults to build)
    #[command(subcommand)]
    command: Option<Commands>,

    /// Site root containing site.yml, posts/ and templates/
    #[arg(short, long, default_value = ".", global = true)]
    root: PathBuf,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Build the site into dist/
    Build {
        /// Output directory (defaults to <root>/dist)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Create a starter site in the root directory
    Init {
        /// Overwrite existing files
        #[arg(short, long)]
        yes: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    // Execute command
    match cli.command.unwrap_or(Commands::Build { output: None }) {
        Commands::Build { output } => {
            commands::build::run(&cli.root, output)?;
        }
        Commands::Init { yes } => {
            commands::init::run(&cli.root, yes)?;
        }
    }

    Ok(())
}

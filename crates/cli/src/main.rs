//! Wayfinder CLI: the main entry point.
//!
//! Commands:
//! - `resolve`: run the agent on a location description
//! - `extract`: run the extraction engine alone
//! - `config`: show, locate, or validate the configuration

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(
    name = "wayfinder",
    about = "Wayfinder: resolve free-text place descriptions to structured locations",
    version,
    author
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Resolve a location description with the agent
    Resolve {
        /// The description to resolve (prompted for when omitted)
        #[arg(short, long)]
        query: Option<String>,

        /// Override the iteration budget
        #[arg(short, long)]
        max_iterations: Option<u32>,

        /// Suppress the step-by-step trace
        #[arg(long)]
        quiet: bool,

        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },

    /// Extract name, city, and country from text without the agent loop
    Extract {
        /// The text to extract from
        #[arg(short, long)]
        text: String,

        /// Skip the model pass and use only the text heuristics
        #[arg(long)]
        offline: bool,
    },

    /// Configuration management
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Print the effective configuration
    Show,
    /// Print the config file path
    Path,
    /// Check the configuration for errors
    Validate,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Initialize tracing
    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(filter)),
        )
        .with_target(false)
        .init();

    match cli.command {
        Commands::Resolve {
            query,
            max_iterations,
            quiet,
            json,
        } => {
            let options = commands::resolve::ResolveOptions {
                max_iterations,
                quiet,
                json,
                verbose: cli.verbose,
            };
            commands::resolve::run(query, options).await?
        }
        Commands::Extract { text, offline } => commands::extract::run(&text, offline).await?,
        Commands::Config { action } => match action {
            ConfigAction::Show => commands::config_cmd::show().await?,
            ConfigAction::Path => commands::config_cmd::path().await?,
            ConfigAction::Validate => commands::config_cmd::validate().await?,
        },
    }

    Ok(())
}

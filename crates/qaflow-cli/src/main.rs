//! `qaflow` -- CLI binary for the qaflow question-answering pipeline.
//!
//! Provides the following subcommands:
//!
//! - `qaflow ask` -- Run one question through the pipeline and print the result.
//! - `qaflow config` -- Show the resolved configuration.

use clap::{Parser, Subcommand};

mod commands;

/// qaflow question-answering pipeline CLI.
#[derive(Parser)]
#[command(name = "qaflow", about = "qaflow question-answering pipeline CLI", version)]
struct Cli {
    /// Enable verbose (debug-level) logging.
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Top-level subcommands.
#[derive(Subcommand)]
enum Commands {
    /// Answer a single question.
    Ask(commands::ask::AskArgs),

    /// Show resolved configuration.
    Config {
        /// Show only this section (e.g. "pipeline", "services").
        #[arg(long)]
        section: Option<String>,

        /// Config file path (overrides QAFLOW_CONFIG).
        #[arg(short, long)]
        config: Option<String>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let default_filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Ask(args) => {
            let code = commands::ask::run(args).await?;
            if code != 0 {
                std::process::exit(code);
            }
        }
        Commands::Config { section, config } => {
            let cfg = commands::load_config(config.as_deref())?;
            match section {
                Some(name) => commands::config_cmd::config_section(&cfg, &name)?,
                None => commands::config_cmd::config_show(&cfg)?,
            }
        }
    }

    Ok(())
}

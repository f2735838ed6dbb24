//! Threatforge CLI -- STRIDE threat modeling on model files

mod cli;
mod commands;
mod error;
mod logging;
mod output;

use clap::Parser;
use colored::Colorize;

use crate::cli::{Cli, Commands};
use crate::error::CliError;
use crate::output::OutputWriter;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        eprintln!("{} {}", "error:".red().bold(), e);
        std::process::exit(e.exit_code());
    }
}

async fn run(cli: Cli) -> Result<(), CliError> {
    let writer = OutputWriter::new(cli.output);
    let loaded = commands::load_config(cli.config.as_deref()).await;

    // a broken config still gets logging so `config validate` can report it
    let general = loaded
        .as_ref()
        .map(|c| c.general.clone())
        .unwrap_or_default();
    logging::init_tracing(&general, cli.log_level.as_deref())
        .map_err(|e| CliError::Config(e.to_string()))?;

    tracing::debug!(command = ?cli.command, "threatforge starting");

    match cli.command {
        Commands::Config(args) => {
            commands::config::execute(args, cli.config.as_deref(), &writer).await
        }
        Commands::New(args) => commands::new::execute(args, &loaded?, &writer).await,
        Commands::Add(args) => commands::add::execute(args, &loaded?, &writer).await,
        Commands::Connect(args) => commands::connect::execute(args, &loaded?, &writer).await,
        Commands::Template(args) => commands::template::execute(args, &loaded?, &writer).await,
        Commands::Summary(args) => {
            commands::report::execute_summary(args, &loaded?, &writer).await
        }
        Commands::Report(args) => commands::report::execute_report(args, &loaded?, &writer).await,
        Commands::Tree(args) => commands::tree::execute(args, &loaded?, &writer).await,
        Commands::Validate(args) => commands::validate::execute(args, &loaded?, &writer).await,
        Commands::Catalog(args) => commands::catalog::execute(args, &writer),
        Commands::Demo(args) => commands::demo::execute(args, &loaded?, &writer).await,
    }
}

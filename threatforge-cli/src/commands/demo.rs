//! `threatforge demo` command handler

use threatforge_core::config::ThreatforgeConfig;
use tracing::info;

use crate::cli::DemoArgs;
use crate::commands::{ModelWritten, ensure_writable, new_store};
use crate::error::CliError;
use crate::output::OutputWriter;

/// Execute the `demo` command.
pub async fn execute(
    args: DemoArgs,
    config: &ThreatforgeConfig,
    writer: &OutputWriter,
) -> Result<(), CliError> {
    let written = run(args, config).await?;
    writer.render(&written)
}

async fn run(args: DemoArgs, config: &ThreatforgeConfig) -> Result<ModelWritten, CliError> {
    ensure_writable(&args.model, args.force).await?;

    let mut store = new_store(config)?;
    let snapshot = store.load_demo()?;
    store.save_to_path(&args.model).await?;

    info!(path = %args.model.display(), "demo model written");
    Ok(ModelWritten::new(&args.model, &snapshot))
}

//! `threatforge new` command handler

use threatforge_core::config::ThreatforgeConfig;
use tracing::info;

use crate::cli::NewArgs;
use crate::commands::{ModelWritten, ensure_writable, new_store};
use crate::error::CliError;
use crate::output::OutputWriter;

/// Execute the `new` command.
pub async fn execute(
    args: NewArgs,
    config: &ThreatforgeConfig,
    writer: &OutputWriter,
) -> Result<(), CliError> {
    let written = run(args, config).await?;
    writer.render(&written)
}

async fn run(args: NewArgs, config: &ThreatforgeConfig) -> Result<ModelWritten, CliError> {
    ensure_writable(&args.model, args.force).await?;

    let mut store = new_store(config)?;
    if let Some(name) = args.name {
        store.set_model_name(name);
    }
    if let Some(description) = args.description {
        store.set_model_description(description);
    }
    store.save_to_path(&args.model).await?;

    info!(path = %args.model.display(), "model created");
    Ok(ModelWritten::new(&args.model, &store.snapshot()))
}

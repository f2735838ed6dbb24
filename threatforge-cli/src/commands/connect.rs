//! `threatforge connect` command handler

use std::io::Write;

use serde::Serialize;
use tracing::info;

use threatforge_core::config::ThreatforgeConfig;
use threatforge_store::{EdgePatch, Handles};

use crate::cli::ConnectArgs;
use crate::commands::open_model;
use crate::error::CliError;
use crate::output::{OutputWriter, Render};

/// Execute the `connect` command.
pub async fn execute(
    args: ConnectArgs,
    config: &ThreatforgeConfig,
    writer: &OutputWriter,
) -> Result<(), CliError> {
    let added = run(args, config).await?;
    writer.render(&added)
}

async fn run(args: ConnectArgs, config: &ThreatforgeConfig) -> Result<EdgeAdded, CliError> {
    let mut store = open_model(&args.model, config).await?;

    let inserted = store
        .connect(&args.source, &args.target, Handles::default())
        .ok_or_else(|| {
            CliError::Command(format!(
                "cannot connect {} -> {}: both nodes must exist",
                args.source, args.target
            ))
        })?;

    let patch = EdgePatch {
        label: args.label,
        protocol: args.protocol,
        encrypted: args.encrypted.then_some(true),
        authenticated: args.authenticated.then_some(true),
        ..EdgePatch::default()
    };
    let snapshot = store.update_edge(&inserted.id, patch);
    store.save_to_path(&args.model).await?;

    let edge = snapshot
        .edge(&inserted.id)
        .ok_or_else(|| CliError::Command(format!("edge {} vanished after insert", inserted.id)))?;
    info!(edge_id = %edge.id, source = %edge.source, target = %edge.target, "nodes connected");

    Ok(EdgeAdded {
        id: edge.id.clone(),
        source: edge.source.clone(),
        target: edge.target.clone(),
        label: edge.data.label.clone(),
        protocol: edge.data.protocol.clone(),
        encrypted: edge.data.encrypted,
        authenticated: edge.data.authenticated,
    })
}

#[derive(Debug, Serialize)]
pub struct EdgeAdded {
    pub id: String,
    pub source: String,
    pub target: String,
    pub label: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub protocol: Option<String>,
    pub encrypted: bool,
    pub authenticated: bool,
}

impl Render for EdgeAdded {
    fn render_text(&self, w: &mut dyn Write) -> std::io::Result<()> {
        use colored::Colorize;

        let flag = |on: bool| if on { "yes".green() } else { "no".yellow() };

        writeln!(
            w,
            "{} {} -> {}",
            "Connected".green().bold(),
            self.source,
            self.target
        )?;
        writeln!(w, "Edge id:       {}", self.id)?;
        writeln!(w, "Label:         {}", self.label)?;
        writeln!(
            w,
            "Protocol:      {}",
            self.protocol.as_deref().unwrap_or("-")
        )?;
        writeln!(w, "Encrypted:     {}", flag(self.encrypted))?;
        writeln!(w, "Authenticated: {}", flag(self.authenticated))?;
        Ok(())
    }
}

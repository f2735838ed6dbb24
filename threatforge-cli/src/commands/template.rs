//! `threatforge template` command handler

use std::io::Write;

use serde::Serialize;

use threatforge_core::config::ThreatforgeConfig;
use threatforge_core::diagram::Position;
use threatforge_engine::Catalog;

use crate::cli::TemplateArgs;
use crate::commands::open_model;
use crate::error::CliError;
use crate::output::{OutputWriter, Render};

/// Execute the `template` command.
pub async fn execute(
    args: TemplateArgs,
    config: &ThreatforgeConfig,
    writer: &OutputWriter,
) -> Result<(), CliError> {
    let placed = run(args, config).await?;
    writer.render(&placed)
}

async fn run(args: TemplateArgs, config: &ThreatforgeConfig) -> Result<TemplatePlaced, CliError> {
    let mut store = open_model(&args.model, config).await?;
    let placed = store.instantiate_template(&args.template, Position::new(args.x, args.y))?;
    store.save_to_path(&args.model).await?;

    let name = Catalog::global()
        .template(&args.template)
        .map(|t| t.name)
        .unwrap_or_default();

    let components = placed
        .component_ids
        .iter()
        .filter_map(|id| placed.snapshot.node(id))
        .map(|node| PlacedComponent {
            id: node.id.clone(),
            component_type: node.component_type().to_string(),
            label: node.data.label.clone(),
            position: node.position,
            threats: node.data.threats.len(),
        })
        .collect();

    Ok(TemplatePlaced {
        template: args.template,
        name: name.to_owned(),
        components,
        boundaries: placed.boundary_ids.len(),
        edges: placed.edge_ids.len(),
    })
}

#[derive(Debug, Serialize)]
pub struct TemplatePlaced {
    pub template: String,
    pub name: String,
    pub components: Vec<PlacedComponent>,
    pub boundaries: usize,
    pub edges: usize,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlacedComponent {
    pub id: String,
    pub component_type: String,
    pub label: String,
    pub position: Position,
    pub threats: usize,
}

impl Render for TemplatePlaced {
    fn render_text(&self, w: &mut dyn Write) -> std::io::Result<()> {
        use colored::Colorize;

        writeln!(
            w,
            "{} {} ({})",
            "Placed".green().bold(),
            self.name.bold(),
            self.template
        )?;
        writeln!(
            w,
            "{} components, {} trust boundaries, {} data flows",
            self.components.len(),
            self.boundaries,
            self.edges
        )?;
        writeln!(w)?;
        writeln!(
            w,
            "{:<38} {:<18} {:<20} {:>7}",
            "ID", "Type", "Position", "Threats"
        )?;
        writeln!(w, "{}", "-".repeat(86))?;
        for c in &self.components {
            writeln!(
                w,
                "{:<38} {:<18} {:<20} {:>7}",
                c.id,
                c.component_type,
                c.position.to_string(),
                c.threats
            )?;
        }
        Ok(())
    }
}

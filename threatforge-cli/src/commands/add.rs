//! `threatforge add` command handler

use std::io::Write;

use serde::Serialize;
use tracing::info;

use threatforge_core::config::ThreatforgeConfig;
use threatforge_core::diagram::Position;
use threatforge_core::types::{ComponentType, Severity, StrideCategory};
use threatforge_store::NodePatch;

use crate::cli::AddArgs;
use crate::commands::open_model;
use crate::error::CliError;
use crate::output::{OutputWriter, Render, severity_colored};

/// Execute the `add` command.
pub async fn execute(
    args: AddArgs,
    config: &ThreatforgeConfig,
    writer: &OutputWriter,
) -> Result<(), CliError> {
    let added = run(args, config).await?;
    writer.render(&added)
}

fn parse_component_type(s: &str) -> Result<ComponentType, CliError> {
    let component_type = ComponentType::parse(s);
    if component_type.is_known() {
        return Ok(component_type);
    }
    let known: Vec<&str> = ComponentType::KNOWN.iter().map(|t| t.as_str()).collect();
    Err(CliError::Command(format!(
        "unknown component type: {} (expected one of: {})",
        s,
        known.join(", ")
    )))
}

async fn run(args: AddArgs, config: &ThreatforgeConfig) -> Result<NodeAdded, CliError> {
    let component_type = parse_component_type(&args.component_type)?;
    let mut store = open_model(&args.model, config).await?;

    let inserted = store.add_node(component_type, Position::new(args.x, args.y));
    let snapshot = match args.label {
        Some(label) => store.update_node(
            &inserted.id,
            NodePatch {
                label: Some(label),
                ..NodePatch::default()
            },
        ),
        None => inserted.snapshot,
    };
    store.save_to_path(&args.model).await?;

    let node = snapshot
        .node(&inserted.id)
        .ok_or_else(|| CliError::Command(format!("node {} vanished after insert", inserted.id)))?;
    info!(node_id = %node.id, component_type = %node.component_type(), "node added");

    Ok(NodeAdded {
        id: node.id.clone(),
        component_type: node.component_type().to_string(),
        label: node.data.label.clone(),
        threats: node
            .data
            .threats
            .iter()
            .map(|t| ThreatLine {
                id: t.id.clone(),
                title: t.title.clone(),
                category: t.category,
                severity: t.severity,
            })
            .collect(),
        mitigations: node.data.mitigations.len(),
    })
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeAdded {
    pub id: String,
    pub component_type: String,
    pub label: String,
    pub threats: Vec<ThreatLine>,
    pub mitigations: usize,
}

#[derive(Debug, Serialize)]
pub struct ThreatLine {
    pub id: String,
    pub title: String,
    pub category: StrideCategory,
    pub severity: Severity,
}

impl Render for NodeAdded {
    fn render_text(&self, w: &mut dyn Write) -> std::io::Result<()> {
        use colored::Colorize;

        writeln!(
            w,
            "{} {} ({})",
            "Added".green().bold(),
            self.label.bold(),
            self.component_type
        )?;
        writeln!(w, "Node id: {}", self.id)?;
        writeln!(
            w,
            "Derived: {} threats, {} mitigations",
            self.threats.len(),
            self.mitigations
        )?;

        if !self.threats.is_empty() {
            writeln!(w)?;
            writeln!(w, "{:<10} {:<26} Threat", "Severity", "Category")?;
            writeln!(w, "{}", "-".repeat(72))?;
            for t in &self.threats {
                writeln!(
                    w,
                    "{:<10} {:<26} {}",
                    severity_colored(t.severity),
                    t.category.display_name(),
                    t.title
                )?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::new_store;

    async fn empty_model(dir: &tempfile::TempDir) -> std::path::PathBuf {
        let path = dir.path().join("model.json");
        let store = new_store(&ThreatforgeConfig::default()).expect("store");
        store.save_to_path(&path).await.expect("save");
        path
    }

    fn args(model: std::path::PathBuf, component_type: &str) -> AddArgs {
        AddArgs {
            model,
            component_type: component_type.to_owned(),
            x: 10.0,
            y: 20.0,
            label: None,
        }
    }

    #[tokio::test]
    async fn test_add_derives_security_and_persists() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = empty_model(&dir).await;

        let added = run(args(path.clone(), "webApplication"), &ThreatforgeConfig::default())
            .await
            .expect("add");
        assert_eq!(added.component_type, "webApplication");
        assert_eq!(added.label, "Web Application");
        assert_eq!(added.threats.len(), 5);
        assert!(added.mitigations >= 5);

        let store = crate::commands::open_model(&path, &ThreatforgeConfig::default())
            .await
            .expect("reopen");
        let snapshot = store.snapshot();
        let node = snapshot.node(&added.id).expect("persisted");
        assert_eq!(node.position, Position::new(10.0, 20.0));
    }

    #[tokio::test]
    async fn test_add_with_label() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = empty_model(&dir).await;
        let mut add_args = args(path, "database");
        add_args.label = Some("Orders DB".to_owned());

        let added = run(add_args, &ThreatforgeConfig::default())
            .await
            .expect("add");
        assert_eq!(added.label, "Orders DB");
    }

    #[tokio::test]
    async fn test_add_rejects_unknown_type_without_touching_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = empty_model(&dir).await;
        let before = tokio::fs::read_to_string(&path).await.expect("read");

        let err = run(args(path.clone(), "mainframe"), &ThreatforgeConfig::default())
            .await
            .expect_err("unknown type");
        assert!(err.to_string().contains("unknown component type: mainframe"));
        assert_eq!(tokio::fs::read_to_string(&path).await.expect("read"), before);
    }

    #[test]
    fn test_render_lists_threats() {
        let added = NodeAdded {
            id: "n1".to_owned(),
            component_type: "cache".to_owned(),
            label: "Redis".to_owned(),
            threats: vec![ThreatLine {
                id: "t1".to_owned(),
                title: "Cache Poisoning".to_owned(),
                category: StrideCategory::Tampering,
                severity: Severity::High,
            }],
            mitigations: 2,
        };
        let mut buf = Vec::new();
        added.render_text(&mut buf).expect("render");
        let text = String::from_utf8(buf).expect("utf8");
        assert!(text.contains("Node id: n1"));
        assert!(text.contains("Cache Poisoning"));
        assert!(text.contains("Derived: 1 threats, 2 mitigations"));
    }
}

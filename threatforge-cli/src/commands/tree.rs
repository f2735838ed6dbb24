//! `threatforge tree` command handler

use std::io::Write;

use serde::Serialize;

use threatforge_core::config::ThreatforgeConfig;
use threatforge_core::diagram::{AttackNodeKind, AttackTreeNode};
use threatforge_engine::open_attack_paths;

use crate::cli::TreeArgs;
use crate::commands::open_model;
use crate::error::CliError;
use crate::output::{OutputWriter, Render};

/// Execute the `tree` command.
pub async fn execute(
    args: TreeArgs,
    config: &ThreatforgeConfig,
    writer: &OutputWriter,
) -> Result<(), CliError> {
    let view = run(args, config).await?;
    writer.render(&view)
}

async fn run(args: TreeArgs, config: &ThreatforgeConfig) -> Result<AttackTreeView, CliError> {
    let store = open_model(&args.model, config).await?;
    let snapshot = store.snapshot();
    let node = snapshot
        .node(&args.node_id)
        .ok_or_else(|| CliError::Command(format!("node not found: {}", args.node_id)))?;

    let tree = store.attack_tree(&node.id);
    Ok(AttackTreeView {
        node_id: node.id.clone(),
        label: node.data.label.clone(),
        open_paths: tree.as_ref().map(open_attack_paths).unwrap_or(0),
        tree,
    })
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AttackTreeView {
    pub node_id: String,
    pub label: String,
    /// Attacks with no implemented mitigation.
    pub open_paths: usize,
    pub tree: Option<AttackTreeNode>,
}

fn render_node(
    node: &AttackTreeNode,
    prefix: &str,
    last: bool,
    w: &mut dyn Write,
) -> std::io::Result<()> {
    use colored::Colorize;

    let branch = if last { "`-- " } else { "|-- " };
    let line = match node.kind {
        AttackNodeKind::Attack => format!(
            "{} (p={:.1})",
            node.label.red(),
            node.probability.unwrap_or_default()
        ),
        AttackNodeKind::Mitigation if node.mitigated == Some(true) => {
            format!("{} {}", node.label, "[mitigated]".green())
        }
        AttackNodeKind::Mitigation => format!("{} {}", node.label, "[open]".yellow()),
        AttackNodeKind::Goal | AttackNodeKind::Subgoal => node.label.bold().to_string(),
    };
    writeln!(w, "{prefix}{branch}{line}")?;

    let child_prefix = format!("{prefix}{}", if last { "    " } else { "|   " });
    for (i, child) in node.children.iter().enumerate() {
        render_node(child, &child_prefix, i + 1 == node.children.len(), w)?;
    }
    Ok(())
}

impl Render for AttackTreeView {
    fn render_text(&self, w: &mut dyn Write) -> std::io::Result<()> {
        use colored::Colorize;

        let Some(tree) = &self.tree else {
            writeln!(
                w,
                "{} ({}) has no threats.",
                self.label.bold(),
                self.node_id
            )?;
            return Ok(());
        };

        writeln!(w, "{}", tree.label.bold())?;
        for (i, child) in tree.children.iter().enumerate() {
            render_node(child, "", i + 1 == tree.children.len(), w)?;
        }
        writeln!(w)?;
        writeln!(
            w,
            "{} of {} attack paths have no implemented mitigation",
            self.open_paths,
            tree.children.len()
        )?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::new_store;

    async fn demo_model(dir: &tempfile::TempDir) -> std::path::PathBuf {
        let path = dir.path().join("demo.json");
        let mut store = new_store(&ThreatforgeConfig::default()).expect("store");
        store.load_demo().expect("demo");
        store.save_to_path(&path).await.expect("save");
        path
    }

    fn args(model: std::path::PathBuf, node_id: &str) -> TreeArgs {
        TreeArgs {
            model,
            node_id: node_id.to_owned(),
        }
    }

    #[tokio::test]
    async fn test_tree_for_demo_auth_service() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = demo_model(&dir).await;

        let view = run(args(path, "auth-1"), &ThreatforgeConfig::default())
            .await
            .expect("tree");
        let tree = view.tree.as_ref().expect("auth-1 has threats");
        assert_eq!(tree.label, "Compromise Auth Service");
        assert_eq!(tree.children.len(), 2);
        // T2 is covered by an implemented mitigation, T5 is not
        assert_eq!(view.open_paths, 1);
    }

    #[tokio::test]
    async fn test_tree_without_threats() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = demo_model(&dir).await;

        let view = run(args(path, "cache-1"), &ThreatforgeConfig::default())
            .await
            .expect("tree");
        assert!(view.tree.is_none());
        assert_eq!(view.open_paths, 0);

        let mut buf = Vec::new();
        view.render_text(&mut buf).expect("render");
        assert!(String::from_utf8(buf).expect("utf8").contains("has no threats"));
    }

    #[tokio::test]
    async fn test_tree_unknown_node() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = demo_model(&dir).await;

        let err = run(args(path, "ghost"), &ThreatforgeConfig::default())
            .await
            .expect_err("no such node");
        assert_eq!(err.to_string(), "node not found: ghost");
    }

    #[tokio::test]
    async fn test_tree_text_marks_mitigations() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = demo_model(&dir).await;
        let view = run(args(path, "api-1"), &ThreatforgeConfig::default())
            .await
            .expect("tree");

        let mut buf = Vec::new();
        view.render_text(&mut buf).expect("render");
        let text = String::from_utf8(buf).expect("utf8");
        assert!(text.contains("SQL Injection"));
        assert!(text.contains("Parameterized Queries"));
        assert!(text.contains("2 of 2 attack paths"));
    }
}

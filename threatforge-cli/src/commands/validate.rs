//! `threatforge validate` command handler
//!
//! Runs the full import pipeline (size, syntax, shape, version, integrity)
//! on a document without replacing any model.

use std::io::Write;
use std::path::Path;

use serde::Serialize;
use tracing::info;

use threatforge_core::config::ThreatforgeConfig;
use threatforge_store::persist::read_document_bytes;
use threatforge_store::{StoreError, parse_document};

use crate::cli::ValidateArgs;
use crate::error::CliError;
use crate::output::{OutputWriter, Render};

/// Execute the `validate` command.
///
/// # Errors
///
/// Returns `CliError::Import` when the document is rejected, after rendering the report.
pub async fn execute(
    args: ValidateArgs,
    config: &ThreatforgeConfig,
    writer: &OutputWriter,
) -> Result<(), CliError> {
    let report = run(&args.path, config).await?;
    writer.render(&report)?;

    match report.error {
        Some(reason) => Err(CliError::Import(reason)),
        None => Ok(()),
    }
}

async fn run(
    path: &Path,
    config: &ThreatforgeConfig,
) -> Result<DocumentValidationReport, CliError> {
    info!(path = %path.display(), "validating document");
    let max_bytes = config.import.max_document_bytes;

    let parsed = match read_document_bytes(path, max_bytes).await {
        Ok(bytes) => parse_document(&bytes, max_bytes),
        Err(StoreError::Import(e)) => Err(e),
        Err(e) => return Err(e.into()),
    };

    let source = path.display().to_string();
    Ok(match parsed {
        Ok(model) => DocumentValidationReport {
            source,
            valid: true,
            name: Some(model.name),
            nodes: model.nodes.len(),
            edges: model.edges.len(),
            threats: model.nodes.iter().map(|n| n.data.threats.len()).sum(),
            error: None,
        },
        Err(e) => DocumentValidationReport {
            source,
            valid: false,
            name: None,
            nodes: 0,
            edges: 0,
            threats: 0,
            error: Some(e.to_string()),
        },
    })
}

#[derive(Debug, Serialize)]
pub struct DocumentValidationReport {
    pub source: String,
    pub valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub nodes: usize,
    pub edges: usize,
    pub threats: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl Render for DocumentValidationReport {
    fn render_text(&self, w: &mut dyn Write) -> std::io::Result<()> {
        use colored::Colorize;

        writeln!(w, "Document: {}", self.source.bold())?;
        match &self.error {
            None => {
                writeln!(w, "Status: {}", "VALID".green().bold())?;
                writeln!(w, "Model: {}", self.name.as_deref().unwrap_or_default())?;
                writeln!(
                    w,
                    "Content: {} nodes, {} edges, {} threats",
                    self.nodes, self.edges, self.threats
                )?;
            }
            Some(reason) => {
                writeln!(w, "Status: {}", "INVALID".red().bold())?;
                writeln!(w, "  - {}", reason.red())?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn write(dir: &tempfile::TempDir, name: &str, content: &str) -> std::path::PathBuf {
        let path = dir.path().join(name);
        tokio::fs::write(&path, content).await.expect("write");
        path
    }

    #[tokio::test]
    async fn test_validate_demo_document() {
        let dir = tempfile::tempdir().expect("tempdir");
        let json = serde_json::to_string(&threatforge_store::demo_document()).expect("json");
        let path = write(&dir, "demo.json", &json).await;

        let report = run(&path, &ThreatforgeConfig::default())
            .await
            .expect("validated");
        assert!(report.valid);
        assert_eq!(report.name.as_deref(), Some("Demo Architecture"));
        assert_eq!(report.nodes, 8);
        assert_eq!(report.edges, 7);
        assert_eq!(report.threats, 5);
    }

    #[tokio::test]
    async fn test_validate_reports_shape_path() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = write(
            &dir,
            "bad.json",
            r#"{"metadata":{"name":"x","version":"1.0.0"},"diagram":{"nodes":[
                {"id":"a","position":{"x":0,"y":0},"data":{"componentType":"cache"}}
            ],"edges":[]}}"#,
        )
        .await;

        let report = run(&path, &ThreatforgeConfig::default())
            .await
            .expect("validated");
        assert!(!report.valid);
        let error = report.error.expect("error message");
        assert!(error.contains("/diagram/nodes/0/data/label"), "{error}");
    }

    #[tokio::test]
    async fn test_validate_rejects_future_major_version() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = write(
            &dir,
            "v2.json",
            r#"{"metadata":{"name":"x","version":"2.0.0"},"diagram":{"nodes":[],"edges":[]}}"#,
        )
        .await;

        let report = run(&path, &ThreatforgeConfig::default())
            .await
            .expect("validated");
        assert!(!report.valid);
        assert!(report.error.expect("error").contains("2.0.0"));
    }

    #[tokio::test]
    async fn test_validate_size_limit_is_a_rejection() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = write(&dir, "big.json", &" ".repeat(4096)).await;
        let mut config = ThreatforgeConfig::default();
        config.import.max_document_bytes = 1024;

        let report = run(&path, &config).await.expect("validated");
        assert!(!report.valid);
        assert!(report.error.expect("error").contains("too large"));
    }

    #[tokio::test]
    async fn test_validate_missing_file_is_io_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        let err = run(&dir.path().join("absent.json"), &ThreatforgeConfig::default())
            .await
            .expect_err("missing file");
        assert_eq!(err.exit_code(), 10);
    }
}

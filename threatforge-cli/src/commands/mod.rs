//! Command handlers -- one module per subcommand
//!
//! Model commands share one workflow: load the model file into a
//! [`ThreatModelStore`], apply a single store command, write the file back.

pub mod add;
pub mod catalog;
pub mod config;
pub mod connect;
pub mod demo;
pub mod new;
pub mod report;
pub mod template;
pub mod tree;
pub mod validate;

use std::io::Write;
use std::path::Path;

use serde::Serialize;
use tracing::debug;

use threatforge_core::config::ThreatforgeConfig;
use threatforge_store::{ModelSnapshot, StoreConfig, ThreatModelStore};

use crate::error::CliError;
use crate::output::Render;

/// Config file looked up in the working directory when `--config` is absent.
pub const DEFAULT_CONFIG_FILE: &str = "threatforge.toml";

/// Load the effective configuration.
///
/// An explicit path must exist. Without one, `./threatforge.toml` is used when
/// present and built-in defaults (plus env overrides) otherwise.
pub async fn load_config(path: Option<&Path>) -> Result<ThreatforgeConfig, CliError> {
    if let Some(path) = path {
        return Ok(ThreatforgeConfig::load(path).await?);
    }

    let default_path = Path::new(DEFAULT_CONFIG_FILE);
    if tokio::fs::try_exists(default_path).await.unwrap_or(false) {
        return Ok(ThreatforgeConfig::load(default_path).await?);
    }

    let mut config = ThreatforgeConfig::default();
    config.apply_env_overrides();
    config.validate()?;
    Ok(config)
}

/// Build an empty store from the configuration.
pub fn new_store(config: &ThreatforgeConfig) -> Result<ThreatModelStore, CliError> {
    let store_config = StoreConfig::from_core(config);
    store_config.validate()?;
    Ok(ThreatModelStore::new(store_config))
}

/// Load a model file into a fresh store.
pub async fn open_model(
    path: &Path,
    config: &ThreatforgeConfig,
) -> Result<ThreatModelStore, CliError> {
    let mut store = new_store(config)?;
    store.load_from_path(path).await?;
    debug!(path = %path.display(), "model opened");
    Ok(store)
}

/// Refuse to clobber an existing file unless `force` is set.
pub async fn ensure_writable(path: &Path, force: bool) -> Result<(), CliError> {
    if !force && tokio::fs::try_exists(path).await.unwrap_or(false) {
        return Err(CliError::Command(format!(
            "{} already exists (use --force to overwrite)",
            path.display()
        )));
    }
    Ok(())
}

/// Result of a command that wrote a whole model file.
#[derive(Debug, Serialize)]
pub struct ModelWritten {
    pub path: String,
    pub name: String,
    pub nodes: usize,
    pub edges: usize,
    pub threats: usize,
}

impl ModelWritten {
    pub fn new(path: &Path, snapshot: &ModelSnapshot) -> Self {
        Self {
            path: path.display().to_string(),
            name: snapshot.model_name.clone(),
            nodes: snapshot.nodes.len(),
            edges: snapshot.edges.len(),
            threats: snapshot.all_threats().len(),
        }
    }
}

impl Render for ModelWritten {
    fn render_text(&self, w: &mut dyn Write) -> std::io::Result<()> {
        use colored::Colorize;

        writeln!(w, "{} {}", "Wrote".green().bold(), self.path)?;
        writeln!(w, "Model:   {}", self.name.bold())?;
        writeln!(
            w,
            "Content: {} nodes, {} edges, {} threats",
            self.nodes, self.edges, self.threats
        )?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[tokio::test]
    #[serial]
    async fn test_load_config_defaults_without_file() {
        let config = load_config(None).await.expect("defaults are valid");
        assert_eq!(config.model.default_name, "Untitled Threat Model");
        assert_eq!(config.template.spacing_multiplier, 1.5);
    }

    #[tokio::test]
    async fn test_load_config_explicit_missing_file_fails() {
        let err = load_config(Some(Path::new("/nonexistent/threatforge.toml")))
            .await
            .expect_err("explicit path must exist");
        assert_eq!(err.exit_code(), 2);
    }

    #[tokio::test]
    async fn test_load_config_explicit_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("tf.toml");
        tokio::fs::write(&path, "[template]\nspacing_multiplier = 2.5\n")
            .await
            .expect("write config");

        let config = load_config(Some(&path)).await.expect("valid config");
        assert_eq!(config.template.spacing_multiplier, 2.5);
    }

    #[tokio::test]
    async fn test_open_model_missing_file_is_io_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        let err = open_model(&dir.path().join("absent.json"), &ThreatforgeConfig::default())
            .await
            .err()
            .expect("missing model file");
        assert_eq!(err.exit_code(), 10);
    }

    #[tokio::test]
    async fn test_ensure_writable() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("model.json");
        ensure_writable(&path, false).await.expect("absent file is writable");

        tokio::fs::write(&path, "{}").await.expect("write");
        assert!(ensure_writable(&path, false).await.is_err());
        ensure_writable(&path, true).await.expect("force overrides");
    }
}

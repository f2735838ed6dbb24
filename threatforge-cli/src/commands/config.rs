//! `threatforge config` command handler

use std::io::Write;
use std::path::Path;

use serde::Serialize;
use tracing::info;

use threatforge_core::config::ThreatforgeConfig;

use crate::cli::{ConfigAction, ConfigArgs};
use crate::commands::{DEFAULT_CONFIG_FILE, load_config};
use crate::error::CliError;
use crate::output::{OutputWriter, Render};

/// Execute the `config` command.
pub async fn execute(
    args: ConfigArgs,
    config_path: Option<&Path>,
    writer: &OutputWriter,
) -> Result<(), CliError> {
    match args.action {
        ConfigAction::Validate => execute_validate(config_path, writer).await,
        ConfigAction::Show { section } => execute_show(config_path, section, writer).await,
    }
}

/// Human-readable name of where the configuration comes from.
async fn source_label(config_path: Option<&Path>) -> String {
    match config_path {
        Some(path) => path.display().to_string(),
        None if tokio::fs::try_exists(DEFAULT_CONFIG_FILE).await.unwrap_or(false) => {
            DEFAULT_CONFIG_FILE.to_owned()
        }
        None => "(built-in defaults)".to_owned(),
    }
}

/// Execute the config validate subcommand.
///
/// # Errors
///
/// Returns `CliError::Config` if validation fails (parse errors, out-of-range values).
async fn execute_validate(
    config_path: Option<&Path>,
    writer: &OutputWriter,
) -> Result<(), CliError> {
    let report = validate(config_path).await;
    writer.render(&report)?;

    if !report.valid {
        return Err(CliError::Config("configuration is invalid".to_owned()));
    }
    Ok(())
}

async fn validate(config_path: Option<&Path>) -> ConfigValidationReport {
    let source = source_label(config_path).await;
    info!(source = %source, "validating configuration");

    match load_config(config_path).await {
        Ok(_) => ConfigValidationReport {
            source,
            valid: true,
            errors: Vec::new(),
        },
        Err(e) => ConfigValidationReport {
            source,
            valid: false,
            errors: vec![e.to_string()],
        },
    }
}

/// Execute the config show subcommand.
///
/// Displays the effective configuration (file + env overrides + defaults).
///
/// # Errors
///
/// Returns `CliError::Config` if loading fails or `CliError::Command` if section name is invalid.
async fn execute_show(
    config_path: Option<&Path>,
    section: Option<String>,
    writer: &OutputWriter,
) -> Result<(), CliError> {
    let config = load_config(config_path).await?;
    let source = source_label(config_path).await;
    let report = show(&config, source, section)?;
    writer.render(&report)
}

fn section_report<T: Serialize>(
    source: String,
    section: Option<&str>,
    value: &T,
) -> Result<ConfigReport, CliError> {
    Ok(ConfigReport {
        source,
        section: section.map(str::to_owned),
        config: serde_json::to_value(value)?,
        config_toml: toml::to_string_pretty(value)
            .unwrap_or_else(|e| format!("(serialization error: {})", e)),
    })
}

fn show(
    config: &ThreatforgeConfig,
    source: String,
    section: Option<String>,
) -> Result<ConfigReport, CliError> {
    let Some(section) = section else {
        return section_report(source, None, config);
    };
    match section.as_str() {
        "general" => section_report(source, Some("general"), &config.general),
        "model" => section_report(source, Some("model"), &config.model),
        "template" => section_report(source, Some("template"), &config.template),
        "import" => section_report(source, Some("import"), &config.import),
        _ => Err(CliError::Command(format!(
            "unknown section: {} (expected: general, model, template, import)",
            section
        ))),
    }
}

/// Configuration display report.
#[derive(Serialize)]
pub struct ConfigReport {
    /// Configuration source
    pub source: String,
    /// Optional section name (None = full config)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub section: Option<String>,
    /// Effective configuration values
    pub config: serde_json::Value,
    /// Same values as TOML, for text rendering
    #[serde(skip)]
    pub config_toml: String,
}

impl Render for ConfigReport {
    fn render_text(&self, w: &mut dyn Write) -> std::io::Result<()> {
        use colored::Colorize;

        if let Some(ref section) = self.section {
            let section_label = format!("[{}]", section);
            writeln!(
                w,
                "Configuration {} (source: {})",
                section_label.bold(),
                self.source
            )?;
        } else {
            writeln!(w, "Configuration (source: {})", self.source.bold())?;
        }

        writeln!(w)?;
        write!(w, "{}", self.config_toml)?;

        Ok(())
    }
}

/// Configuration validation report.
#[derive(Serialize)]
pub struct ConfigValidationReport {
    /// Configuration source
    pub source: String,
    /// Whether the configuration is valid
    pub valid: bool,
    /// Validation error messages (empty if valid)
    pub errors: Vec<String>,
}

impl Render for ConfigValidationReport {
    fn render_text(&self, w: &mut dyn Write) -> std::io::Result<()> {
        use colored::Colorize;

        writeln!(w, "Config Validation: {}", self.source.bold())?;

        if self.valid {
            writeln!(w, "  Result: {}", "VALID".green().bold())?;
        } else {
            writeln!(w, "  Result: {}", "INVALID".red().bold())?;
            for err in &self.errors {
                writeln!(w, "  Error: {}", err.red())?;
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_show_full_config() {
        let report = show(&ThreatforgeConfig::default(), "test.toml".to_owned(), None)
            .expect("full config");
        assert!(report.section.is_none());
        assert!(report.config_toml.contains("[template]"));
        assert_eq!(report.config["template"]["spacing_multiplier"], 1.5);

        let mut buffer = Vec::new();
        report.render_text(&mut buffer).expect("render");
        let output = String::from_utf8(buffer).expect("valid UTF-8");
        assert!(output.contains("test.toml"));
        assert!(output.contains("max_document_bytes"));
    }

    #[test]
    fn test_show_single_section() {
        let report = show(
            &ThreatforgeConfig::default(),
            "test.toml".to_owned(),
            Some("model".to_owned()),
        )
        .expect("model section");
        assert_eq!(report.section.as_deref(), Some("model"));
        assert!(report.config_toml.contains("default_name"));
        assert!(!report.config_toml.contains("spacing_multiplier"));
    }

    #[test]
    fn test_show_unknown_section() {
        let err = show(
            &ThreatforgeConfig::default(),
            "test.toml".to_owned(),
            Some("network".to_owned()),
        )
        .err()
        .expect("unknown section");
        assert!(err.to_string().contains("unknown section: network"));
    }

    #[tokio::test]
    async fn test_validate_reports_out_of_range_value() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("threatforge.toml");
        tokio::fs::write(&path, "[template]\nspacing_multiplier = 9.0\n")
            .await
            .expect("write");

        let report = validate(Some(&path)).await;
        assert!(!report.valid);
        assert!(report.errors[0].contains("spacing_multiplier"));
    }

    #[tokio::test]
    async fn test_validate_malformed_toml() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("threatforge.toml");
        tokio::fs::write(&path, "[general\nlog_level = \"info\"\n")
            .await
            .expect("write");

        let report = validate(Some(&path)).await;
        assert!(!report.valid);
        assert_eq!(report.errors.len(), 1);
    }

    #[tokio::test]
    async fn test_validate_valid_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("threatforge.toml");
        tokio::fs::write(&path, "[model]\nauthor = \"appsec\"\n")
            .await
            .expect("write");

        let report = validate(Some(&path)).await;
        assert!(report.valid, "{:?}", report.errors);
        assert_eq!(report.source, path.display().to_string());
    }
}

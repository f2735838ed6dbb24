//! `threatforge summary` and `threatforge report` command handlers

use std::io::Write;

use serde::Serialize;

use threatforge_core::config::ThreatforgeConfig;
use threatforge_core::types::Severity;
use threatforge_engine::{RiskAssessment, rank_threats};
use threatforge_store::{Report, ReportSummary};

use crate::cli::{ModelArgs, ReportArgs};
use crate::commands::open_model;
use crate::error::CliError;
use crate::output::{OutputWriter, Render, severity_colored};

/// Number of threats listed under "Top risks".
const TOP_RISKS: usize = 5;

/// Execute the `summary` command.
pub async fn execute_summary(
    args: ModelArgs,
    config: &ThreatforgeConfig,
    writer: &OutputWriter,
) -> Result<(), CliError> {
    let view = summarize(args, config).await?;
    writer.render(&view)
}

/// Execute the `report` command.
pub async fn execute_report(
    args: ReportArgs,
    config: &ThreatforgeConfig,
    writer: &OutputWriter,
) -> Result<(), CliError> {
    let view = report(args, config).await?;
    writer.render(&view)
}

fn parse_severity(s: &str) -> Result<Severity, CliError> {
    Severity::from_str_loose(s).ok_or_else(|| {
        CliError::Command(format!(
            "invalid severity: {} (expected: info, low, medium, high, critical)",
            s
        ))
    })
}

async fn summarize(args: ModelArgs, config: &ThreatforgeConfig) -> Result<SummaryView, CliError> {
    let store = open_model(&args.model, config).await?;
    let doc = store.export();

    Ok(SummaryView {
        model_name: doc.metadata.name,
        nodes: doc.diagram.nodes.len(),
        edges: doc.diagram.edges.len(),
        mitigations: doc.mitigations.len(),
        summary: doc.summary,
    })
}

async fn report(args: ReportArgs, config: &ThreatforgeConfig) -> Result<ReportView, CliError> {
    let min_severity = parse_severity(&args.min_severity)?;
    let store = open_model(&args.model, config).await?;

    let mut report = store.report();
    report.threats.retain(|t| t.severity >= min_severity);

    let threats = store.all_threats();
    let mut top_risks = rank_threats(&threats);
    top_risks.truncate(TOP_RISKS);

    Ok(ReportView { report, top_risks })
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryView {
    pub model_name: String,
    pub nodes: usize,
    pub edges: usize,
    pub mitigations: usize,
    pub summary: ReportSummary,
}

fn render_summary(summary: &ReportSummary, w: &mut dyn Write) -> std::io::Result<()> {
    use colored::Colorize;

    writeln!(
        w,
        "Threats: {} total ({} {}, {} {}, {} {}, {} {})",
        summary.total_threats,
        summary.critical_threats,
        severity_colored(Severity::Critical),
        summary.high_threats,
        severity_colored(Severity::High),
        summary.medium_threats,
        severity_colored(Severity::Medium),
        summary.low_threats,
        severity_colored(Severity::Low),
    )?;

    let coverage = format!("{}%", summary.mitigation_coverage);
    let coverage = match summary.mitigation_coverage {
        80..=100 => coverage.green().bold(),
        50..=79 => coverage.yellow().bold(),
        _ => coverage.red().bold(),
    };
    writeln!(w, "Mitigation coverage: {}", coverage)?;
    Ok(())
}

impl Render for SummaryView {
    fn render_text(&self, w: &mut dyn Write) -> std::io::Result<()> {
        use colored::Colorize;

        writeln!(w, "Model: {}", self.model_name.bold())?;
        writeln!(
            w,
            "Diagram: {} nodes, {} data flows, {} mitigations",
            self.nodes, self.edges, self.mitigations
        )?;
        render_summary(&self.summary, w)
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportView {
    #[serde(flatten)]
    pub report: Report,
    pub top_risks: Vec<RiskAssessment>,
}

impl Render for ReportView {
    fn render_text(&self, w: &mut dyn Write) -> std::io::Result<()> {
        use colored::Colorize;

        writeln!(w, "Threat report: {}", self.report.model_name.bold())?;
        render_summary(&self.report.summary, w)?;
        writeln!(w)?;

        if self.report.threats.is_empty() {
            writeln!(w, "{}", "No threats at or above the requested severity.".green())?;
        } else {
            writeln!(w, "{:<10} {:<26} {:<36} Description", "Severity", "Category", "Threat")?;
            writeln!(w, "{}", "-".repeat(100))?;
            for t in &self.report.threats {
                writeln!(
                    w,
                    "{:<10} {:<26} {:<36} {}",
                    severity_colored(t.severity),
                    t.category.display_name(),
                    t.title,
                    t.description
                )?;
            }
        }

        if !self.top_risks.is_empty() {
            writeln!(w)?;
            writeln!(w, "Top risks (likelihood x impact):")?;
            for (rank, risk) in self.top_risks.iter().enumerate() {
                writeln!(
                    w,
                    "  {}. [{} {}] {}",
                    rank + 1,
                    risk.score,
                    severity_colored(risk.level),
                    risk.title
                )?;
            }
        }
        Ok(())
    }
}

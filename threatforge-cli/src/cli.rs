//! CLI argument parsing using clap derive API
//!
//! This module defines the command-line interface structure using clap's derive macros.
//! It is purely declarative with no side effects or I/O.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

/// Threatforge -- STRIDE threat modeling from the command line.
///
/// Every model command reads the model file, applies one change and writes it back.
/// Use `threatforge <COMMAND> --help` for subcommand details.
#[derive(Parser, Debug)]
#[command(name = "threatforge", version, about, long_about = None)]
pub struct Cli {
    /// Path to the threatforge.toml configuration file.
    ///
    /// When omitted, `./threatforge.toml` is used if present, otherwise defaults.
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Override log level (trace, debug, info, warn, error).
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    /// Output format.
    #[arg(long, global = true, default_value = "text")]
    pub output: OutputFormat,

    #[command(subcommand)]
    pub command: Commands,
}

/// Supported output formats.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable table / text output.
    Text,
    /// Machine-readable JSON.
    Json,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create an empty model file.
    New(NewArgs),

    /// Add a component node with its derived threats and mitigations.
    Add(AddArgs),

    /// Connect two nodes with a data flow.
    Connect(ConnectArgs),

    /// Place an architecture template into the model.
    Template(TemplateArgs),

    /// Show the threat summary of a model.
    Summary(ModelArgs),

    /// Show the threat report of a model.
    Report(ReportArgs),

    /// Show the attack tree of a node.
    Tree(TreeArgs),

    /// Validate a threat model document without loading it.
    Validate(ValidateArgs),

    /// List catalog entries.
    Catalog(CatalogArgs),

    /// Write the built-in demo model to a file.
    Demo(DemoArgs),

    /// Manage configuration.
    Config(ConfigArgs),
}

// ---- shared ----

/// A single model file argument.
#[derive(Args, Debug)]
pub struct ModelArgs {
    /// Model file (threat model export document).
    pub model: PathBuf,
}

// ---- new ----

#[derive(Args, Debug)]
pub struct NewArgs {
    /// Model file to create.
    pub model: PathBuf,

    /// Model name (default: `[model] default_name`).
    #[arg(long)]
    pub name: Option<String>,

    /// Model description.
    #[arg(long)]
    pub description: Option<String>,

    /// Overwrite an existing file.
    #[arg(short, long)]
    pub force: bool,
}

// ---- add ----

#[derive(Args, Debug)]
pub struct AddArgs {
    /// Model file.
    pub model: PathBuf,

    /// Component type (e.g. webApplication, database, apiGateway).
    pub component_type: String,

    /// X coordinate.
    #[arg(
        long,
        default_value_t = 0.0,
        allow_negative_numbers = true,
        value_parser = parse_coordinate
    )]
    pub x: f64,

    /// Y coordinate.
    #[arg(
        long,
        default_value_t = 0.0,
        allow_negative_numbers = true,
        value_parser = parse_coordinate
    )]
    pub y: f64,

    /// Node label (default: catalog name of the type).
    #[arg(long)]
    pub label: Option<String>,
}

/// Parse a canvas coordinate, rejecting NaN and infinities.
fn parse_coordinate(s: &str) -> Result<f64, String> {
    let value: f64 = s.parse().map_err(|e| format!("{e}"))?;
    if value.is_finite() {
        Ok(value)
    } else {
        Err(format!("coordinate must be a finite number, got {s}"))
    }
}

// ---- connect ----

#[derive(Args, Debug)]
pub struct ConnectArgs {
    /// Model file.
    pub model: PathBuf,

    /// Source node id.
    pub source: String,

    /// Target node id.
    pub target: String,

    /// Data flow label.
    #[arg(long)]
    pub label: Option<String>,

    /// Protocol (e.g. HTTPS, gRPC).
    #[arg(long)]
    pub protocol: Option<String>,

    /// Mark the flow as encrypted.
    #[arg(long)]
    pub encrypted: bool,

    /// Mark the flow as authenticated.
    #[arg(long)]
    pub authenticated: bool,
}

// ---- template ----

#[derive(Args, Debug)]
pub struct TemplateArgs {
    /// Model file.
    pub model: PathBuf,

    /// Template id (restApi, microservices, mobileBackend, threeTier, eventDriven, saasPlatform).
    pub template: String,

    /// Drop point X.
    #[arg(
        long,
        default_value_t = 500.0,
        allow_negative_numbers = true,
        value_parser = parse_coordinate
    )]
    pub x: f64,

    /// Drop point Y.
    #[arg(
        long,
        default_value_t = 500.0,
        allow_negative_numbers = true,
        value_parser = parse_coordinate
    )]
    pub y: f64,
}

// ---- report ----

#[derive(Args, Debug)]
pub struct ReportArgs {
    /// Model file.
    pub model: PathBuf,

    /// Minimum severity to list (info, low, medium, high, critical).
    #[arg(long, default_value = "info")]
    pub min_severity: String,
}

// ---- tree ----

#[derive(Args, Debug)]
pub struct TreeArgs {
    /// Model file.
    pub model: PathBuf,

    /// Node id.
    pub node_id: String,
}

// ---- validate ----

#[derive(Args, Debug)]
pub struct ValidateArgs {
    /// Document to validate.
    pub path: PathBuf,
}

// ---- catalog ----

#[derive(Args, Debug)]
pub struct CatalogArgs {
    /// What to list.
    #[arg(default_value = "components")]
    pub kind: CatalogKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum CatalogKind {
    /// Component types and their STRIDE categories.
    Components,
    /// Architecture templates.
    Templates,
    /// STRIDE categories.
    Stride,
}

// ---- demo ----

#[derive(Args, Debug)]
pub struct DemoArgs {
    /// Model file to write.
    pub model: PathBuf,

    /// Overwrite an existing file.
    #[arg(short, long)]
    pub force: bool,
}

// ---- config ----

/// Manage threatforge configuration.
#[derive(Args, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub action: ConfigAction,
}

#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Validate the configuration file and report errors.
    Validate,
    /// Show the effective configuration (file + env overrides + defaults).
    Show {
        /// Show only a specific section (general, model, template, import).
        #[arg(long)]
        section: Option<String>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_cli_parse_new_defaults() {
        let cli = Cli::try_parse_from(["threatforge", "new", "model.json"]).expect("parse");
        assert!(cli.config.is_none());
        assert!(matches!(cli.output, OutputFormat::Text));
        match cli.command {
            Commands::New(args) => {
                assert_eq!(args.model, PathBuf::from("model.json"));
                assert!(args.name.is_none());
                assert!(!args.force);
            }
            _ => panic!("expected New command"),
        }
    }

    #[test]
    fn test_cli_parse_add_with_position() {
        let cli = Cli::try_parse_from([
            "threatforge",
            "add",
            "m.json",
            "database",
            "--x",
            "-120.5",
            "--y",
            "40",
            "--label",
            "Orders DB",
        ])
        .expect("parse");
        match cli.command {
            Commands::Add(args) => {
                assert_eq!(args.component_type, "database");
                assert_eq!(args.x, -120.5);
                assert_eq!(args.y, 40.0);
                assert_eq!(args.label.as_deref(), Some("Orders DB"));
            }
            _ => panic!("expected Add command"),
        }
    }

    #[test]
    fn test_cli_parse_connect_flags() {
        let cli = Cli::try_parse_from([
            "threatforge",
            "connect",
            "m.json",
            "a",
            "b",
            "--protocol",
            "HTTPS",
            "--encrypted",
        ])
        .expect("parse");
        match cli.command {
            Commands::Connect(args) => {
                assert_eq!(args.source, "a");
                assert_eq!(args.target, "b");
                assert_eq!(args.protocol.as_deref(), Some("HTTPS"));
                assert!(args.encrypted);
                assert!(!args.authenticated);
            }
            _ => panic!("expected Connect command"),
        }
    }

    #[test]
    fn test_cli_parse_template_default_drop_point() {
        let cli =
            Cli::try_parse_from(["threatforge", "template", "m.json", "threeTier"]).expect("parse");
        match cli.command {
            Commands::Template(args) => {
                assert_eq!(args.template, "threeTier");
                assert_eq!((args.x, args.y), (500.0, 500.0));
            }
            _ => panic!("expected Template command"),
        }
    }

    #[test]
    fn test_cli_parse_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "threatforge",
            "summary",
            "m.json",
            "--output",
            "json",
            "--log-level",
            "debug",
            "--config",
            "/etc/threatforge.toml",
        ])
        .expect("parse");
        assert!(matches!(cli.output, OutputFormat::Json));
        assert_eq!(cli.log_level.as_deref(), Some("debug"));
        assert_eq!(cli.config, Some(PathBuf::from("/etc/threatforge.toml")));
    }

    #[test]
    fn test_cli_parse_catalog_kinds() {
        let cli = Cli::try_parse_from(["threatforge", "catalog"]).expect("parse");
        match cli.command {
            Commands::Catalog(args) => assert_eq!(args.kind, CatalogKind::Components),
            _ => panic!("expected Catalog command"),
        }
        let cli = Cli::try_parse_from(["threatforge", "catalog", "templates"]).expect("parse");
        match cli.command {
            Commands::Catalog(args) => assert_eq!(args.kind, CatalogKind::Templates),
            _ => panic!("expected Catalog command"),
        }
    }

    #[test]
    fn test_cli_parse_config_show_section() {
        let cli = Cli::try_parse_from(["threatforge", "config", "show", "--section", "template"])
            .expect("parse");
        match cli.command {
            Commands::Config(args) => match args.action {
                ConfigAction::Show { section } => assert_eq!(section.as_deref(), Some("template")),
                _ => panic!("expected Show action"),
            },
            _ => panic!("expected Config command"),
        }
    }

    #[test]
    fn test_cli_rejects_missing_model_argument() {
        assert!(Cli::try_parse_from(["threatforge", "tree"]).is_err());
        assert!(Cli::try_parse_from(["threatforge", "connect", "m.json", "a"]).is_err());
    }

    #[test]
    fn test_cli_rejects_unknown_output_format() {
        let result = Cli::try_parse_from(["threatforge", "--output", "xml", "catalog"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_cli_rejects_non_finite_coordinates() {
        for bad in ["NaN", "inf", "-inf"] {
            let x = format!("--x={bad}");
            let add = Cli::try_parse_from(["threatforge", "add", "m.json", "database", &x]);
            assert!(add.is_err(), "add accepted {bad}");

            let y = format!("--y={bad}");
            let template =
                Cli::try_parse_from(["threatforge", "template", "m.json", "restApi", &y]);
            assert!(template.is_err(), "template accepted {bad}");
        }
        assert_eq!(parse_coordinate("12.25"), Ok(12.25));
    }
}

//! Library module for the schemalift CLI
//!
//! This module exposes argument parsing and command execution so the binary
//! stays a thin wrapper and the commands can be tested without a process.

pub mod input;
pub mod ollama;
pub mod output;

use std::fmt::Write as _;
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use schemalift_core::{
    EnhancementOption, EnhancementOptions, EnrichmentConfig, Industry, IndustryContextTable,
    ModelInvoker, ProjectContext, Result, SchemaEnricher,
    chunking::DEFAULT_CHUNK_SIZE,
    enrichment::DEFAULT_MAX_RETRIES,
    reporting::{TargetPlatform, migration_checklist, validate_schema_names},
};
use tracing::{info, warn};

use crate::ollama::{OllamaClient, OllamaConfig};
use crate::output::{EnrichmentReport, load_report, save_report};

/// CLI argument structure
#[derive(Debug, Parser)]
#[command(name = "schemalift")]
#[command(about = "Business-ready schema enrichment for legacy migrations")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(long_about = "
SchemaLift - Schema enrichment for legacy-to-cloud migrations

Reads profiled column metadata, asks a language model for business-friendly
names, descriptions, quality rules and compliance notes, and writes an
enrichment report. Columns the model cannot describe are enriched with
deterministic heuristics, so every input column is always present in the
output.

EXAMPLES:
  schemalift enrich columns.json --industry \"Online Travel Agency (OTA)\"
  schemalift enrich columns.json --heuristic-only -o enriched.json
  schemalift checklist enriched.json
  schemalift validate-names enriched.json --platform BigQuery
")]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Args)]
pub struct GlobalArgs {
    /// Log level: INFO by default, DEBUG with `-v`, TRACE with `-vv` or more.
    /// `RUST_LOG` overrides these flags when set.
    #[arg(
        short,
        long,
        global = true,
        action = clap::ArgAction::Count,
        help = "Increase verbosity (-v, -vv, -vvv)"
    )]
    pub verbose: u8,

    /// Only log errors and skip the command summary; takes precedence over `-v`.
    #[arg(
        short,
        long,
        global = true,
        help = "Suppress all output except errors"
    )]
    pub quiet: bool,
}

/// Available CLI commands
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Enrich profiled columns and write an enrichment report
    Enrich(EnrichArgs),
    /// Print the migration checklist of an enrichment report
    Checklist(ReportArgs),
    /// Validate suggested names against a target platform
    ValidateNames(ValidateNamesArgs),
    /// Test the connection to the model endpoint
    Check(ModelArgs),
    /// List enhancement options and built-in industries
    List,
}

#[derive(Debug, Args)]
pub struct EnrichArgs {
    /// Column metadata file
    #[arg(help = "JSON file with profiled column records")]
    pub input: PathBuf,

    /// Output file path
    #[arg(
        short,
        long,
        default_value = "schema.enriched.json",
        help = "Output file path for the enrichment report"
    )]
    pub output: PathBuf,

    #[arg(long, default_value = "General", help = "Industry of the source system")]
    pub industry: String,

    #[arg(long, default_value = "Schema Migration Project")]
    pub project_name: String,

    #[arg(long, default_value = "Legacy System", help = "Source platform")]
    pub source: String,

    #[arg(long, default_value = "Snowflake", help = "Target platform")]
    pub target: String,

    /// Enhancement options
    #[arg(
        long = "option",
        value_delimiter = ',',
        help = "Enhancement options to request (default: all)"
    )]
    pub options: Vec<String>,

    #[arg(long, default_value_t = DEFAULT_CHUNK_SIZE, help = "Columns per model call")]
    pub chunk_size: usize,

    #[arg(long, default_value_t = DEFAULT_MAX_RETRIES, help = "Attempts per chunk before falling back")]
    pub max_retries: usize,

    /// Skip the model entirely
    #[arg(long, help = "Enrich with deterministic heuristics only")]
    pub heuristic_only: bool,

    #[command(flatten)]
    pub model: ModelArgs,
}

impl EnrichArgs {
    /// Project context described by the arguments.
    pub fn project_context(&self) -> ProjectContext {
        ProjectContext::for_industry(self.industry.as_str())
            .with_name(self.project_name.as_str())
            .with_source(self.source.as_str())
            .with_target(self.target.as_str())
    }

    /// Enrichment configuration described by the arguments.
    pub fn enrichment_config(&self) -> EnrichmentConfig {
        EnrichmentConfig::new()
            .with_chunk_size(self.chunk_size)
            .with_max_retries(self.max_retries)
    }

    /// Requested enhancement options, defaulting to all of them.
    pub fn enhancement_options(&self) -> EnhancementOptions {
        if self.options.is_empty() {
            EnhancementOptions::all()
        } else {
            EnhancementOptions::parse(&self.options)
        }
    }
}

#[derive(Debug, Args)]
pub struct ModelArgs {
    /// Model endpoint URL
    #[arg(
        long,
        env = "OLLAMA_BASE_URL",
        default_value = ollama::DEFAULT_BASE_URL,
        help = "Base URL of the Ollama-compatible endpoint"
    )]
    pub ollama_url: String,

    #[arg(long, env = "OLLAMA_MODEL", default_value = ollama::DEFAULT_MODEL)]
    pub model: String,

    #[arg(
        long,
        env = "OLLAMA_TIMEOUT",
        default_value_t = ollama::DEFAULT_TIMEOUT_SECS,
        help = "Request timeout in seconds"
    )]
    pub timeout: u64,

    #[arg(long, default_value_t = ollama::DEFAULT_MAX_TOKENS, help = "Maximum tokens per response")]
    pub max_tokens: u32,
}

impl ModelArgs {
    pub fn ollama_config(&self) -> OllamaConfig {
        OllamaConfig::new()
            .with_base_url(self.ollama_url.as_str())
            .with_model(self.model.as_str())
            .with_timeout_secs(self.timeout)
            .with_max_tokens(self.max_tokens)
    }
}

#[derive(Debug, Args)]
pub struct ReportArgs {
    /// Enrichment report written by `enrich`
    pub report: PathBuf,
}

#[derive(Debug, Args)]
pub struct ValidateNamesArgs {
    /// Enrichment report written by `enrich`
    pub report: PathBuf,

    #[arg(long, help = "Target platform (default: the report's target)")]
    pub platform: Option<String>,
}

/// Text output of a command and whether it succeeded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandOutput {
    pub text: String,
    pub success: bool,
}

impl CommandOutput {
    fn ok(text: String) -> Self {
        Self {
            text,
            success: true,
        }
    }
}

/// Execute the CLI command with the given arguments
///
/// # Errors
///
/// Returns errors for unreadable inputs, invalid configuration, unwritable
/// outputs, or a structurally incompatible model response.
pub async fn execute_cli(cli: &Cli) -> Result<CommandOutput> {
    match &cli.command {
        Commands::Enrich(args) => enrich(args).await,
        Commands::Checklist(args) => checklist(args).await,
        Commands::ValidateNames(args) => validate_names(args).await,
        Commands::Check(args) => check(args).await,
        Commands::List => Ok(CommandOutput::ok(list_supported())),
    }
}

async fn enrich(args: &EnrichArgs) -> Result<CommandOutput> {
    let columns = input::load_columns(&args.input).await?;
    let context = args.project_context();
    let enricher = SchemaEnricher::new(IndustryContextTable::builtin(), args.enrichment_config())?;

    info!("Starting enrichment of {} columns", columns.len());
    info!("Output: {}", args.output.display());

    let run = if args.heuristic_only {
        enricher.enhance_heuristically(&columns, &context)?
    } else {
        let client = OllamaClient::new(args.model.ollama_config())?;
        if !client.check_connection().await {
            warn!(
                "Model endpoint {} is not reachable; chunks will fall back to heuristics",
                client.config().base_url
            );
        }
        let options = args.enhancement_options();
        enricher
            .enhance(&columns, &options, &context, &client)
            .await?
    };

    let elapsed = run.completed_at - run.started_at;
    let report = EnrichmentReport::new(run, &context);
    save_report(&report, &args.output).await?;
    info!("Report saved to {}", args.output.display());

    let mut text = String::new();
    let _ = writeln!(text, "Enrichment completed successfully");
    let _ = writeln!(text, "Output: {}", args.output.display());
    let _ = writeln!(text, "Model: {}", report.run.model);
    let _ = writeln!(text, "Columns: {}", report.run.columns.len());
    let _ = writeln!(
        text,
        "Chunks: {} ({} fell back to heuristics)",
        report.run.chunk_reports.len(),
        report.run.fallback_chunk_count()
    );
    let _ = writeln!(text, "Model calls: {}", report.run.total_attempts());
    let _ = writeln!(
        text,
        "Readiness: {:?} ({:.2})",
        report.summary.migration_readiness.readiness_level,
        report.summary.migration_readiness.overall_score
    );
    let _ = write!(text, "Elapsed: {} ms", elapsed.num_milliseconds());

    Ok(CommandOutput::ok(text))
}

async fn checklist(args: &ReportArgs) -> Result<CommandOutput> {
    let report = load_report(&args.report).await?;

    let text = migration_checklist(&report.run.columns)
        .iter()
        .enumerate()
        .map(|(i, line)| format!("{}. {}", i.saturating_add(1), line))
        .collect::<Vec<_>>()
        .join("\n");

    Ok(CommandOutput::ok(text))
}

async fn validate_names(args: &ValidateNamesArgs) -> Result<CommandOutput> {
    let report = load_report(&args.report).await?;
    let platform = TargetPlatform::from_name(
        args.platform
            .as_deref()
            .unwrap_or(&report.summary.project.target),
    );
    let naming = validate_schema_names(&report.run.columns, &platform);

    let mut text = String::new();
    if naming.valid {
        let _ = write!(
            text,
            "All {} column names are valid for {}",
            report.run.columns.len(),
            naming.platform
        );
    } else {
        let _ = write!(
            text,
            "Naming validation failed for {} with {} errors",
            naming.platform,
            naming.errors.len()
        );
    }
    for error in &naming.errors {
        let _ = write!(text, "\nERROR: {}", error);
    }
    for warning in &naming.warnings {
        let _ = write!(text, "\nWARNING: {}", warning);
    }

    Ok(CommandOutput {
        text,
        success: naming.valid,
    })
}

async fn check(args: &ModelArgs) -> Result<CommandOutput> {
    info!("Testing model endpoint connection...");
    let client = OllamaClient::new(args.ollama_config())?;

    if !client.check_connection().await {
        return Ok(CommandOutput {
            text: format!(
                "Cannot reach model endpoint at {}",
                client.config().base_url
            ),
            success: false,
        });
    }

    let available = client.model_available().await?;
    let text = if available {
        format!(
            "Connection to {} successful; model '{}' is available",
            client.config().base_url,
            client.model_name()
        )
    } else {
        format!(
            "Connection to {} successful, but model '{}' is not installed",
            client.config().base_url,
            client.model_name()
        )
    };

    Ok(CommandOutput {
        text,
        success: available,
    })
}

/// Lists enhancement options and industries with a built-in profile.
pub fn list_supported() -> String {
    let mut text = String::from("Enhancement Options:\n");
    for option in EnhancementOption::ALL {
        let _ = writeln!(text, "  {}", option.key());
    }

    text.push_str("\nIndustries:\n");
    let table = IndustryContextTable::builtin();
    for industry in [
        Industry::FinancialServices,
        Industry::Healthcare,
        Industry::RetailEcommerce,
        Industry::OnlineTravelAgency,
    ] {
        if table.lookup(industry.label()).is_some() {
            let _ = writeln!(text, "  {}", industry);
        }
    }
    text.push_str("  General (no industry profile)");

    text
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(args).unwrap()
    }

    #[test]
    fn test_enrich_defaults() {
        temp_env::with_vars(
            [
                ("OLLAMA_BASE_URL", None::<&str>),
                ("OLLAMA_MODEL", None),
                ("OLLAMA_TIMEOUT", None),
            ],
            || {
                let cli = parse(&["schemalift", "enrich", "columns.json"]);
                let Commands::Enrich(args) = cli.command else {
                    panic!("expected enrich command");
                };

                assert_eq!(args.output, PathBuf::from("schema.enriched.json"));
                assert_eq!(args.chunk_size, 6);
                assert_eq!(args.max_retries, 3);
                assert!(!args.heuristic_only);
                assert_eq!(args.model.ollama_config(), OllamaConfig::default());
                assert_eq!(args.project_context(), ProjectContext::default());
                assert_eq!(args.enhancement_options(), EnhancementOptions::all());
            },
        );
    }

    #[test]
    fn test_model_args_from_env() {
        temp_env::with_vars(
            [
                ("OLLAMA_BASE_URL", Some("http://gpu-box:11434")),
                ("OLLAMA_MODEL", Some("mistral")),
                ("OLLAMA_TIMEOUT", Some("30")),
            ],
            || {
                let cli = parse(&["schemalift", "check"]);
                let Commands::Check(args) = cli.command else {
                    panic!("expected check command");
                };

                let config = args.ollama_config();
                assert_eq!(config.base_url, "http://gpu-box:11434");
                assert_eq!(config.model, "mistral");
                assert_eq!(config.timeout_secs, 30);
            },
        );
    }

    #[test]
    fn test_flags_override_env() {
        temp_env::with_var("OLLAMA_MODEL", Some("mistral"), || {
            let cli = parse(&["schemalift", "check", "--model", "llama3"]);
            let Commands::Check(args) = cli.command else {
                panic!("expected check command");
            };
            assert_eq!(args.model, "llama3");
        });
    }

    #[test]
    fn test_enrich_options_and_context() {
        let cli = parse(&[
            "schemalift",
            "-vv",
            "enrich",
            "columns.json",
            "--industry",
            "Healthcare",
            "--target",
            "BigQuery",
            "--option",
            "Data Quality Rules,business-kpi-identification",
            "--option",
            "emojis",
            "--chunk-size",
            "4",
        ]);
        assert_eq!(cli.global.verbose, 2);

        let Commands::Enrich(args) = cli.command else {
            panic!("expected enrich command");
        };
        let options = args.enhancement_options();
        assert_eq!(
            options.selected(),
            &[
                EnhancementOption::DataQualityRules,
                EnhancementOption::BusinessKpiIdentification
            ]
        );
        assert_eq!(options.unrecognized(), &["emojis".to_string()]);
        assert_eq!(args.project_context().industry, "Healthcare");
        assert_eq!(args.project_context().target, "BigQuery");
        assert_eq!(args.enrichment_config().chunk_size, 4);
    }

    #[test]
    fn test_zero_chunk_size_is_clamped() {
        let cli = parse(&["schemalift", "enrich", "in.json", "--chunk-size", "0"]);
        let Commands::Enrich(args) = cli.command else {
            panic!("expected enrich command");
        };
        assert_eq!(args.enrichment_config().chunk_size, 1);
    }

    #[test]
    fn test_missing_command_is_an_error() {
        assert!(Cli::try_parse_from(["schemalift"]).is_err());
    }

    #[test]
    fn test_list_supported() {
        let text = list_supported();
        assert!(text.contains("data_governance_&_compliance"));
        assert!(text.contains("Online Travel Agency (OTA)"));
        assert!(text.ends_with("General (no industry profile)"));
    }
}

use anyhow::Result;
use clap::{Parser, Subcommand};
use colored::Colorize;
use std::path::{Path, PathBuf};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use vaultsmith_core::{Config, GroupingIntent, Severity, ValidationReport, ValidationStatus};
use vaultsmith_engine::{propose_intent, ClassifiedTable, ColumnRole, MetadataError, Pipeline, RawTable};

/// Vaultsmith - Data Vault 2.0 model inference and validation
#[derive(Parser)]
#[command(name = "vaultsmith")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to config file (default: vaultsmith.toml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the role assigned to every source column
    Classify {
        /// Source metadata (table documents or catalog rows, JSON)
        #[arg(short, long)]
        metadata: PathBuf,
    },

    /// Draft a grouping intent from column classification
    Propose {
        #[arg(short, long)]
        metadata: PathBuf,

        /// Where to write the draft intent
        #[arg(short, long, default_value = "intent.json")]
        output: PathBuf,
    },

    /// Build, validate and emit a Data Vault model
    Generate {
        #[arg(short, long)]
        metadata: PathBuf,

        /// Grouping intent (.json or .toml)
        #[arg(short, long)]
        intent: PathBuf,

        /// Output file for the emitted model
        #[arg(short, long, default_value = "model.json")]
        output: PathBuf,

        /// Also write the validation report
        #[arg(short, long)]
        report: Option<PathBuf>,
    },

    /// Build and validate only
    Validate {
        #[arg(short, long)]
        metadata: PathBuf,

        #[arg(short, long)]
        intent: PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = load_config(cli.config.as_deref(), cli.verbose)?;
    let pipeline = Pipeline::new(config);

    match cli.command {
        Commands::Classify { metadata } => classify_command(&pipeline, &metadata),
        Commands::Propose { metadata, output } => propose_command(&pipeline, &metadata, &output, cli.verbose),
        Commands::Generate {
            metadata,
            intent,
            output,
            report,
        } => generate_command(&pipeline, &metadata, &intent, &output, report.as_deref(), cli.verbose),
        Commands::Validate { metadata, intent } => validate_command(&pipeline, &metadata, &intent),
    }
}

/// stderr fmt layer; `RUST_LOG` wins over `--verbose`
fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();
}

fn load_config(path: Option<&Path>, verbose: bool) -> Result<Config> {
    let default_path = Path::new("vaultsmith.toml");

    let config = if let Some(path) = path {
        Config::from_file(path)
            .map_err(|e| anyhow::anyhow!("Failed to load config {}: {}", path.display(), e))?
    } else if default_path.exists() {
        Config::from_file(default_path)?
    } else {
        if verbose {
            eprintln!("{}", "No config file found, using defaults".yellow());
        }
        Config::default()
    };

    tracing::debug!(
        source_schema = %config.source_schema,
        target_schema = %config.target_schema,
        "configuration loaded"
    );
    Ok(config)
}

fn load_metadata(path: &Path) -> Result<Vec<RawTable>> {
    Pipeline::load_metadata(path)
        .map_err(|e| anyhow::anyhow!("Failed to load metadata {}: {}", path.display(), e))
}

fn load_intent(path: &Path) -> Result<GroupingIntent> {
    let intent = GroupingIntent::from_file(path)?;
    if intent.is_empty() {
        return Err(anyhow::anyhow!(
            "Grouping intent {} declares no entities. Run 'vaultsmith propose' for a draft.",
            path.display()
        ));
    }
    Ok(intent)
}

/// Classify command - print each column's role and the rule that decided it
fn classify_command(pipeline: &Pipeline, metadata: &Path) -> Result<()> {
    let raw_tables = load_metadata(metadata)?;
    let (classified, rejected) = pipeline.classify(&raw_tables);

    print_banner("Column Classification");

    for table in &classified {
        print_classified_table(table);
    }

    print_rejected(&rejected);
    println!("{}", "=".repeat(60).bright_blue());

    Ok(())
}

fn print_classified_table(table: &ClassifiedTable) {
    println!("{} {}", "Table:".bold(), table.table.qualified_name().green());
    for column in &table.columns {
        let role = match column.role {
            ColumnRole::BusinessKey => column.role.to_string().green().bold(),
            ColumnRole::RelationshipKey => column.role.to_string().cyan(),
            ColumnRole::Descriptive => column.role.to_string().normal(),
        };
        println!("  {:<32} {:<18} ({})", column.column, role, column.source);
    }
    println!();
}

/// Propose command - write a draft grouping intent
fn propose_command(pipeline: &Pipeline, metadata: &Path, output: &Path, verbose: bool) -> Result<()> {
    let raw_tables = load_metadata(metadata)?;
    let (classified, rejected) = pipeline.classify(&raw_tables);
    print_rejected(&rejected);

    let intent = propose_intent(&classified, pipeline.config());
    std::fs::write(output, intent.to_json()?)?;

    println!(
        "{} {} hubs, {} links, {} satellites, {} link satellites",
        "Proposed".green().bold(),
        intent.hubs.len(),
        intent.links.len(),
        intent.satellites.len(),
        intent.link_satellites.len()
    );

    if verbose {
        eprintln!("{} {}", "Draft intent saved to:".green(), output.display());
    }

    Ok(())
}

/// Generate command - full pipeline
fn generate_command(
    pipeline: &Pipeline,
    metadata: &Path,
    intent: &Path,
    output: &Path,
    report_path: Option<&Path>,
    verbose: bool,
) -> Result<()> {
    let raw_tables = load_metadata(metadata)?;
    let intent = load_intent(intent)?;

    let result = pipeline.run(&raw_tables, &intent)?;
    print_rejected(&result.rejected);

    if let Some(path) = report_path {
        result.report.save_to_file(path)?;
        if verbose {
            eprintln!("{} {}", "Report saved to:".green(), path.display());
        }
    }

    print_report_summary(&result.report);

    match &result.emitted {
        Some(emitted) => {
            emitted.save_to_file(output)?;
            println!(
                "{} {} ({} mappings, fingerprint {})",
                "Model saved to:".green(),
                output.display(),
                emitted.mappings.len(),
                &emitted.metadata.fingerprint[..12.min(emitted.metadata.fingerprint.len())]
            );
        }
        None => {
            println!("{}", "Model is invalid; nothing was emitted".red().bold());
            std::process::exit(1);
        }
    }

    Ok(())
}

/// Validate command - print the report only
fn validate_command(pipeline: &Pipeline, metadata: &Path, intent: &Path) -> Result<()> {
    let raw_tables = load_metadata(metadata)?;
    let intent = load_intent(intent)?;

    let (classified, rejected) = pipeline.classify(&raw_tables);
    print_rejected(&rejected);

    let (_, report) = pipeline.build(&classified, &intent)?;
    print_report_summary(&report);

    if report.status == ValidationStatus::Invalid {
        std::process::exit(1);
    }

    Ok(())
}

fn print_banner(title: &str) {
    println!("\n{}", "=".repeat(60).bright_blue());
    println!("{}", title.bold().bright_blue());
    println!("{}", "=".repeat(60).bright_blue());
    println!();
}

fn print_rejected(rejected: &[MetadataError]) {
    if rejected.is_empty() {
        return;
    }

    eprintln!("{}", format!("{} table(s) rejected:", rejected.len()).yellow().bold());
    for err in rejected {
        eprintln!("  {}", err.to_string().yellow());
    }
}

fn print_report_summary(report: &ValidationReport) {
    print_banner("Data Vault Validation Report");

    println!("Version: {}", report.version);
    println!("Timestamp: {}", report.timestamp);
    println!();

    let status = match report.status {
        ValidationStatus::Clean => report.status.to_string().green().bold(),
        ValidationStatus::Warnings => report.status.to_string().yellow().bold(),
        ValidationStatus::Invalid => report.status.to_string().red().bold(),
    };

    println!("{}", "Summary:".bold());
    println!("  Status:   {}", status);
    println!("  Entities: {}", report.summary.entities_checked);

    if report.summary.errors > 0 {
        println!("  Errors:   {}", format!("{}", report.summary.errors).red().bold());
    } else {
        println!("  Errors:   {}", format!("{}", report.summary.errors).green());
    }

    if report.summary.warnings > 0 {
        println!("  Warnings: {}", format!("{}", report.summary.warnings).yellow());
    } else {
        println!("  Warnings: {}", format!("{}", report.summary.warnings).green());
    }
    println!();

    if report.issues.is_empty() {
        println!("{}", "✓ No issues found!".green().bold());
    } else {
        println!("{}", "Issues:".bold());
        for issue in &report.issues {
            let severity = match issue.severity {
                Severity::Error => "ERROR".red().bold(),
                Severity::Warning => "WARN".yellow().bold(),
            };

            println!("  [{}] {}: {}", severity, issue.code, issue.message);
            println!("    on {}", issue.entity);
            if !issue.columns.is_empty() {
                println!("    Columns: {}", issue.columns.join(", "));
            }
        }
    }

    println!();
    println!("{}", "=".repeat(60).bright_blue());
}

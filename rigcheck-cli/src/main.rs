//! RigCheck CLI - PC build compatibility and power checks from the command line.

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use rigcheck::{
    BuildReport, CompatibilityEngine, EvaluationOptions, IssueKind, IssueSeverity,
    RigCheckCore,
};
use std::path::{Path, PathBuf};
use std::process;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "rigcheck")]
#[command(about = "PC build compatibility and power budget checker", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check a single build file
    Check {
        /// Path to a build selection (.json)
        #[arg(value_name = "FILE")]
        file: PathBuf,

        #[command(flatten)]
        report: ReportArgs,
    },

    /// Check every build file in a directory
    Batch {
        /// Directory holding build selections
        #[arg(value_name = "DIR", default_value = ".")]
        dir: PathBuf,

        #[command(flatten)]
        report: ReportArgs,
    },

    /// List reference PSUs that can supply a wattage
    Psus {
        /// Required capacity in watts
        #[arg(value_name = "WATTS")]
        watts: u32,

        /// Output format
        #[arg(short, long, value_enum, default_value = "human")]
        format: OutputFormat,
    },

    /// List compatibility checks and their score weights (defaults unless --config)
    Rules {
        /// Show which parts each check needs
        #[arg(short, long)]
        verbose: bool,

        /// Evaluation options file (JSON) whose scoring weights to show
        #[arg(long, value_name = "FILE")]
        config: Option<PathBuf>,
    },
}

#[derive(Args)]
struct ReportArgs {
    /// Output format
    #[arg(short, long, value_enum, default_value = "human")]
    format: OutputFormat,

    /// Exit with error code if findings exist at this level or higher
    #[arg(long, value_enum)]
    fail_on: Option<FailOnSeverity>,

    /// Evaluation options file (JSON)
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Hours of use per day for the cost estimate
    #[arg(long)]
    hours: Option<f64>,

    /// Electricity price per kWh
    #[arg(long)]
    rate: Option<f64>,
}

#[derive(Clone, ValueEnum)]
enum OutputFormat {
    /// Human-readable output
    Human,
    /// JSON output for scripts
    Json,
    /// GitHub Actions format
    Github,
}

#[derive(Clone, ValueEnum)]
enum FailOnSeverity {
    Critical,
    High,
    Medium,
    Low,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Check { file, report } => handle_check(&file, &report),
        Commands::Batch { dir, report } => handle_batch(&dir, &report),
        Commands::Psus { watts, format } => handle_psus(watts, &format).map(|_| 0),
        Commands::Rules { verbose, config } => handle_rules(verbose, config.as_deref()).map(|_| 0),
    };

    let exit_code = match result {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            1
        }
    };
    process::exit(exit_code);
}

fn read_options(config: Option<&Path>) -> Result<EvaluationOptions> {
    match config {
        Some(path) => EvaluationOptions::load_from_file(path)
            .with_context(|| format!("failed to load options from {}", path.display())),
        None => Ok(EvaluationOptions::default()),
    }
}

fn load_options(args: &ReportArgs) -> Result<EvaluationOptions> {
    let mut options = read_options(args.config.as_deref())?;
    if let Some(hours) = args.hours {
        options.usage_hours_per_day = hours;
    }
    if let Some(rate) = args.rate {
        options.electricity_rate = rate;
    }
    tracing::debug!(?options, "evaluation options");
    Ok(options)
}

fn handle_check(file: &Path, args: &ReportArgs) -> Result<i32> {
    let options = load_options(args)?;
    let report = RigCheckCore::evaluate_file(file, &options)
        .with_context(|| format!("failed to check {}", file.display()))?;

    let reports = [report];
    output_results(&reports, &args.format)?;
    Ok(exit_code_for(&reports, args.fail_on.as_ref()))
}

fn handle_batch(dir: &Path, args: &ReportArgs) -> Result<i32> {
    let options = load_options(args)?;
    let reports = RigCheckCore::evaluate_directory(dir, &options)
        .with_context(|| format!("failed to check builds under {}", dir.display()))?;

    output_results(&reports, &args.format)?;
    Ok(exit_code_for(&reports, args.fail_on.as_ref()))
}

fn exit_code_for(reports: &[BuildReport], fail_on: Option<&FailOnSeverity>) -> i32 {
    match fail_on {
        Some(severity) if reports.iter().any(|r| should_fail(r, severity)) => 1,
        _ => 0,
    }
}

fn should_fail(report: &BuildReport, severity: &FailOnSeverity) -> bool {
    match severity {
        FailOnSeverity::Critical => report.has_critical(),
        FailOnSeverity::High => report.has_high_or_critical(),
        FailOnSeverity::Medium => report.has_high_or_critical() || report.stats.medium > 0,
        FailOnSeverity::Low => report.total_findings() > 0,
    }
}

fn output_results(reports: &[BuildReport], format: &OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Human => {
            output_human(reports);
            Ok(())
        }
        OutputFormat::Json => output_json(reports),
        OutputFormat::Github => {
            output_github(reports);
            Ok(())
        }
    }
}

fn report_name(report: &BuildReport) -> String {
    report
        .file
        .as_ref()
        .map(|p| p.display().to_string())
        .unwrap_or_else(|| "<selection>".to_string())
}

fn output_human(reports: &[BuildReport]) {
    for report in reports {
        let compat = &report.compatibility;
        let power = &report.power;

        println!("\nBuild: {}", report_name(report));
        println!("{}", "─".repeat(60));
        println!(
            "  Parts: {}   Total price: {}",
            report.part_count, report.total_price
        );
        println!(
            "  Compatibility: {}/100 ({})",
            compat.score,
            if compat.is_compatible { "compatible" } else { "not compatible" }
        );

        let critical: Vec<_> = compat.critical_issues().collect();
        let missing: Vec<_> = compat
            .issues
            .iter()
            .filter(|i| i.kind == IssueKind::MissingPart)
            .collect();
        let other: Vec<_> = compat
            .issues
            .iter()
            .filter(|i| i.severity == IssueSeverity::Warning && i.kind != IssueKind::MissingPart)
            .collect();

        if !critical.is_empty() {
            println!("\n  CRITICAL:");
            for issue in critical {
                println!("    - {}", issue.message);
                println!("      Fix: {}", issue.suggestion);
            }
        }
        if !other.is_empty() {
            println!("\n  ISSUES:");
            for issue in other {
                println!("    - {}", issue.message);
            }
        }
        if !compat.warnings.is_empty() {
            println!("\n  WARNINGS:");
            for warning in &compat.warnings {
                println!("    - [{:?}] {}", warning.priority, warning.message);
                println!("      {}", warning.recommendation);
            }
        }
        if !missing.is_empty() {
            println!("\n  NOT SELECTED:");
            for issue in missing {
                println!("    - {}", issue.message);
            }
        }

        println!("\n  Power:");
        println!(
            "    Draw: {}W idle / {}W typical / {}W peak",
            power.total_idle, power.total_base, power.total_max
        );
        println!("    Recommended PSU: {}W", power.recommended_psu);
        if let (Some(capacity), Some(load)) = (power.psu_capacity, power.psu_load_percent) {
            let rating = power
                .psu_rating
                .map(|r| r.to_string())
                .unwrap_or_else(|| "unrated".to_string());
            println!("    Selected PSU: {}W {} ({:.0}% load at peak)", capacity, rating, load);
        }
        for warning in &power.warnings {
            println!("    - [{:?}] {}", warning.severity, warning.message);
        }
        println!(
            "    Running cost: {:.2}/month",
            report.monthly_cost.total
        );

        println!("\n  Summary:");
        println!("    Critical: {}", report.stats.critical);
        println!("    High:     {}", report.stats.high);
        println!("    Medium:   {}", report.stats.medium);
        println!("    Low:      {}", report.stats.low);
    }
}

fn output_json(reports: &[BuildReport]) -> Result<()> {
    let output = serde_json::json!({
        "results": reports,
        "summary": {
            "total_builds": reports.len(),
            "compatible": reports.iter().filter(|r| r.compatibility.is_compatible).count(),
            "total_findings": reports.iter().map(|r| r.total_findings()).sum::<usize>(),
            "critical": reports.iter().map(|r| r.stats.critical).sum::<usize>(),
        }
    });
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

fn output_github(reports: &[BuildReport]) {
    for report in reports {
        let file = report_name(report);
        for issue in &report.compatibility.issues {
            let level = match (issue.severity, issue.kind) {
                (IssueSeverity::Critical, _) => "error",
                (_, IssueKind::MissingPart) => "notice",
                _ => "warning",
            };
            println!("::{} file={}::{}", level, file, issue.message.replace('\n', " "));
        }
        for warning in &report.compatibility.warnings {
            println!("::warning file={}::{}", file, warning.message.replace('\n', " "));
        }
        for warning in &report.power.warnings {
            let level = match warning.severity {
                rigcheck::power::PowerSeverity::Critical => "error",
                rigcheck::power::PowerSeverity::Low => "notice",
                _ => "warning",
            };
            println!("::{} file={}::{}", level, file, warning.message.replace('\n', " "));
        }
    }
}

fn handle_psus(watts: u32, format: &OutputFormat) -> Result<()> {
    let psus = rigcheck::recommend_psus(watts);
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&psus)?),
        _ => {
            if psus.is_empty() {
                println!("No reference PSU supplies {}W", watts);
                return Ok(());
            }
            println!("PSUs for {}W:\n", watts);
            for psu in &psus {
                println!(
                    "  {:>5}W  {:<14} {} {}{}",
                    psu.capacity,
                    psu.efficiency.to_string(),
                    psu.manufacturer,
                    psu.model,
                    if psu.modular { " (modular)" } else { "" }
                );
            }
        }
    }
    Ok(())
}

fn handle_rules(verbose: bool, config: Option<&Path>) -> Result<()> {
    let options = read_options(config)?;
    let engine = CompatibilityEngine::with_policy(options.scoring, options.balance);

    println!("Available compatibility checks:\n");
    for rule in engine.rules() {
        println!("  {}", rule.id);
        println!("    {} (weight {})", rule.name, rule.weight);
        if verbose {
            let needs: Vec<_> = rule.requires.iter().map(|c| c.display_name()).collect();
            println!("    Needs: {}", needs.join(", "));
        }
        println!();
    }
    Ok(())
}

use std::fmt::Write as _;
use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use chrono::{DateTime, Utc};
use clap::{ArgAction, Args, Parser, Subcommand, ValueEnum};

use crate::analysis::get_analyzer;
use crate::config::{AppConfig, CONFIG_FILE_NAME, load_config};
use crate::exporters::get_exporter;
use crate::models::{AnalysisReport, Conversation, Finding, Recency};
use crate::parsers::get_parser;
use crate::utils::{collect_export_files, expand_tilde, format_path_with_tilde, sanitize_for_terminal};

const SUMMARY_TOP_FINDINGS: usize = 5;
const TITLE_WIDTH: usize = 60;
const EXCERPT_WIDTH: usize = 160;

#[derive(Parser)]
#[command(name = "ai-history-analyser")]
#[command(version = "0.1.0")]
#[command(
    about = "Find unfinished projects in exported ChatGPT, Claude and Gemini conversations",
    long_about = None
)]
pub struct Cli {
    /// Increase log verbosity (-v info, -vv debug); RUST_LOG takes precedence
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Analyze exports and write or summarize the findings
    Analyze(AnalyzeArgs),
    /// Analyze exports and print the findings
    List(ListArgs),
    /// Write the default configuration file
    InitConfig(InitConfigArgs),
}

/// Inputs and analysis settings shared by `analyze` and `list`
#[derive(Args, Debug, Clone)]
pub struct InputArgs {
    /// Export files or directories of `*.json` exports
    #[arg(short, long = "input", required = true, num_args = 1..)]
    pub inputs: Vec<PathBuf>,

    /// Platform of each input, in the same order (chatgpt, claude, gemini)
    #[arg(short, long = "platform", required = true, num_args = 1..)]
    pub platforms: Vec<String>,

    /// Analyzer to run
    #[arg(short, long, default_value = "unfinished-projects")]
    pub analyzer: String,

    /// Configuration file (TOML)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Override `analysis.min_confidence`
    #[arg(long)]
    pub min_confidence: Option<f64>,

    /// Reference time for recency scoring (RFC 3339), defaults to the current time
    #[arg(long)]
    pub now: Option<String>,
}

#[derive(Args, Debug, Clone)]
pub struct AnalyzeArgs {
    #[command(flatten)]
    pub input: InputArgs,

    /// Output file or directory; a summary is printed when omitted
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Exporter used for `--output`
    #[arg(short, long, default_value = "json")]
    pub exporter: String,

    /// Export to an Obsidian vault
    #[arg(long)]
    pub obsidian: bool,

    /// Vault directory for `--obsidian`
    #[arg(long)]
    pub obsidian_path: Option<PathBuf>,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListFormat {
    Table,
    List,
    Json,
}

#[derive(Args, Debug, Clone)]
pub struct ListArgs {
    #[command(flatten)]
    pub input: InputArgs,

    /// Only show findings with at least this priority
    #[arg(long, default_value_t = 0.0)]
    pub min_priority: f64,

    #[arg(long, value_enum, default_value_t = ListFormat::Table)]
    pub format: ListFormat,
}

#[derive(Args, Debug, Clone)]
pub struct InitConfigArgs {
    /// Where to write the configuration
    #[arg(short, long, default_value = CONFIG_FILE_NAME)]
    pub output: PathBuf,

    /// Overwrite an existing file
    #[arg(long)]
    pub force: bool,
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose)?;

    match &cli.command {
        Some(Commands::Analyze(args)) => run_analyze(args)?,
        Some(Commands::List(args)) => run_list(args)?,
        Some(Commands::InitConfig(args)) => run_init_config(args)?,
        None => {
            println!("Use --help for usage information");
        }
    }

    Ok(())
}

/// Logs go to stderr so stdout stays clean for `list --format json`
fn init_tracing(verbose: u8) -> Result<()> {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|error| anyhow::anyhow!("Failed to initialize logging: {error}"))?;

    Ok(())
}

fn run_analyze(args: &AnalyzeArgs) -> Result<()> {
    let (config, report) = run_analysis(&args.input)?;

    let (exporter_name, output) = if args.obsidian || args.obsidian_path.is_some() {
        let vault = args
            .obsidian_path
            .clone()
            .or_else(|| args.output.clone())
            .or_else(|| config.obsidian.vault_path.as_deref().map(expand_tilde));
        match vault {
            Some(vault) => ("obsidian", Some(vault)),
            None => bail!(
                "--obsidian needs a vault: pass --obsidian-path, --output or set obsidian.vault_path"
            ),
        }
    } else {
        (args.exporter.as_str(), args.output.clone())
    };

    match output {
        Some(output) => {
            let exporter = get_exporter(exporter_name)?;
            let written = exporter.export(&report, &output, &config)?;
            println!(
                "Exported {} unfinished projects ({}) to {}",
                report.findings.len(),
                exporter.name(),
                format_path_with_tilde(&written)
            );
        }
        None => print!("{}", render_summary(&report)?),
    }

    Ok(())
}

fn run_list(args: &ListArgs) -> Result<()> {
    if !(0.0..=1.0).contains(&args.min_priority) {
        bail!("--min-priority must be between 0 and 1, got {}", args.min_priority);
    }

    let (_, report) = run_analysis(&args.input)?;
    let findings: Vec<&Finding> =
        report.findings.iter().filter(|f| f.priority >= args.min_priority).collect();

    let rendered = match args.format {
        ListFormat::Json => {
            let mut json = serde_json::to_string_pretty(&findings)
                .context("Failed to serialize findings")?;
            json.push('\n');
            json
        }
        _ if findings.is_empty() => "No unfinished projects found.\n".to_string(),
        ListFormat::Table => render_table(&findings)?,
        ListFormat::List => render_list(&findings)?,
    };
    print!("{}", rendered);

    Ok(())
}

fn run_init_config(args: &InitConfigArgs) -> Result<()> {
    let path = &args.output;
    if path.exists() && !args.force {
        bail!("{} already exists (use --force to overwrite)", path.display());
    }

    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }

    fs::write(path, AppConfig::default().to_toml()?)
        .with_context(|| format!("Failed to write configuration: {}", path.display()))?;
    println!("Wrote default configuration to {}", format_path_with_tilde(path));

    Ok(())
}

/// Load configuration and inputs, then run the selected analyzer
fn run_analysis(args: &InputArgs) -> Result<(AppConfig, AnalysisReport)> {
    let mut config = load_config(args.config.as_deref())?;
    if let Some(min_confidence) = args.min_confidence {
        config.analysis.min_confidence = min_confidence;
        config.validate().context("Invalid --min-confidence")?;
    }

    let now = parse_now(args.now.as_deref())?;
    let analyzer = get_analyzer(&args.analyzer)?;
    let conversations = load_conversations(&args.inputs, &args.platforms)?;

    let report = analyzer.analyze(&conversations, &config.analysis, now)?;
    Ok((config, report))
}

fn parse_now(raw: Option<&str>) -> Result<DateTime<Utc>> {
    match raw {
        Some(raw) => Ok(DateTime::parse_from_rfc3339(raw)
            .with_context(|| format!("Invalid --now timestamp (expected RFC 3339): {}", raw))?
            .with_timezone(&Utc)),
        None => Ok(Utc::now()),
    }
}

/// Parse every input with its platform's parser, in argument order
///
/// Files that fail to parse are logged and skipped. Fails only when nothing was parsed.
pub fn load_conversations(inputs: &[PathBuf], platforms: &[String]) -> Result<Vec<Conversation>> {
    if inputs.len() != platforms.len() {
        bail!(
            "Number of inputs ({}) must match number of platforms ({})",
            inputs.len(),
            platforms.len()
        );
    }

    let parsers = platforms.iter().map(|p| get_parser(p)).collect::<Result<Vec<_>>>()?;

    let mut conversations = Vec::new();
    let mut failed = 0;
    for (input, parser) in inputs.iter().zip(&parsers) {
        let files = match collect_export_files(input) {
            Ok(files) => files,
            Err(e) => {
                tracing::warn!(input = %input.display(), "skipping input: {:#}", e);
                failed += 1;
                continue;
            }
        };

        for file in files {
            match parser.parse_file(&file) {
                Ok(parsed) => {
                    tracing::info!(
                        file = %file.display(),
                        platform = %parser.platform(),
                        conversations = parsed.len(),
                        "parsed export"
                    );
                    conversations.extend(parsed);
                }
                Err(e) => {
                    tracing::warn!(file = %file.display(), "skipping file: {:#}", e);
                    failed += 1;
                }
            }
        }
    }

    if conversations.is_empty() {
        bail!("No conversations could be parsed from the given inputs ({} failed)", failed);
    }
    Ok(conversations)
}

fn last_active(finding: &Finding) -> String {
    match finding.evidence.recency {
        Recency::Known(at) => at.format("%Y-%m-%d").to_string(),
        Recency::Unknown => "unknown".to_string(),
    }
}

pub fn render_summary(report: &AnalysisReport) -> Result<String> {
    let mut out = String::new();
    writeln!(out, "Analysis Summary")?;
    writeln!(out, "================")?;
    writeln!(out, "Analyzer: {}", report.analyzer)?;
    writeln!(out, "Conversations analyzed: {}", report.conversations_analyzed)?;
    for count in &report.platforms {
        writeln!(out, "  {}: {}", count.platform, count.conversations)?;
    }
    writeln!(out, "Unfinished projects found: {}", report.findings.len())?;

    if !report.findings.is_empty() {
        writeln!(out)?;
        writeln!(out, "Top projects:")?;
        for (i, finding) in report.findings.iter().take(SUMMARY_TOP_FINDINGS).enumerate() {
            writeln!(
                out,
                "{:>2}. [{:.2}] {} ({})",
                i + 1,
                finding.priority,
                sanitize_for_terminal(&finding.title, TITLE_WIDTH),
                finding.platform
            )?;
        }
    }
    Ok(out)
}

pub fn render_table(findings: &[&Finding]) -> Result<String> {
    let mut out = String::new();
    writeln!(
        out,
        "{:<4} {:<8} {:<8} {:<10} {:<10} TITLE",
        "#", "PRIORITY", "CONF", "PLATFORM", "LAST"
    )?;
    for (i, finding) in findings.iter().enumerate() {
        writeln!(
            out,
            "{:<4} {:<8.2} {:<8.2} {:<10} {:<10} {}",
            i + 1,
            finding.priority,
            finding.confidence,
            finding.platform.as_str(),
            last_active(finding),
            sanitize_for_terminal(&finding.title, TITLE_WIDTH)
        )?;
    }
    Ok(out)
}

pub fn render_list(findings: &[&Finding]) -> Result<String> {
    let mut out = String::new();
    for (i, finding) in findings.iter().enumerate() {
        writeln!(out, "{}. {}", i + 1, sanitize_for_terminal(&finding.title, TITLE_WIDTH))?;
        writeln!(
            out,
            "   priority {:.2} | confidence {:.2} | {} | last active {}",
            finding.priority,
            finding.confidence,
            finding.platform,
            last_active(finding)
        )?;
        if !finding.evidence.keywords.is_empty() {
            writeln!(
                out,
                "   keywords: {}",
                sanitize_for_terminal(&finding.evidence.keywords.join(", "), TITLE_WIDTH)
            )?;
        }
        if !finding.evidence.excerpt.is_empty() {
            writeln!(
                out,
                "   {}",
                sanitize_for_terminal(&finding.evidence.excerpt, EXCERPT_WIDTH)
            )?;
        }
        writeln!(out)?;
    }
    Ok(out)
}

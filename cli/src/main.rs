//! noticegen CLI - per-bank notice generation tool

use std::fs;
use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand, ValueEnum};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use log::LevelFilter;

use noticegen::assemble::{DEFAULT_ANCHOR, DEFAULT_OUTPUT_DIR, DEFAULT_PLACEHOLDER};
use noticegen::{
    inspect_template, partition, read_records, GroupOutcome, GroupReport, NoticeAssembler,
    NoticeOptions, RunReport, Tone,
};

#[derive(Parser)]
#[command(name = "noticegen")]
#[command(author = "iyulab")]
#[command(version)]
#[command(
    about = "Generate one notice per bank from an account list and a Word template",
    long_about = None
)]
struct Cli {
    /// Account list (CSV or spreadsheet)
    #[arg(value_name = "DATA")]
    data: Option<PathBuf>,

    /// Notice template (.docx)
    #[arg(value_name = "TEMPLATE")]
    template: Option<PathBuf>,

    #[command(flatten)]
    generate: GenerateArgs,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate notices
    #[command(alias = "gen")]
    Generate {
        /// Account list (CSV or spreadsheet)
        #[arg(value_name = "DATA")]
        data: PathBuf,

        /// Notice template (.docx)
        #[arg(value_name = "TEMPLATE")]
        template: PathBuf,

        #[command(flatten)]
        args: GenerateArgs,
    },

    /// Show the style profile and anchors found in a template
    Inspect {
        /// Notice template (.docx)
        #[arg(value_name = "TEMPLATE")]
        template: PathBuf,

        /// Placeholder text to look for
        #[arg(long, default_value = DEFAULT_PLACEHOLDER)]
        placeholder: String,

        /// Anchor phrase to look for
        #[arg(long, default_value = DEFAULT_ANCHOR)]
        anchor: String,

        /// Print only the JSON inspection
        #[arg(long)]
        json: bool,
    },

    /// Show version information
    Version,
}

#[derive(Args, Clone)]
struct GenerateArgs {
    /// Output directory
    #[arg(short, long, value_name = "DIR", default_value = DEFAULT_OUTPUT_DIR)]
    output_dir: PathBuf,

    /// Template text replaced by the bank name
    #[arg(long, default_value = DEFAULT_PLACEHOLDER)]
    placeholder: String,

    /// Phrase after which the bank name is placed
    #[arg(long, default_value = DEFAULT_ANCHOR)]
    anchor: String,

    /// Emphasis mode
    #[arg(long, value_enum, default_value = "formal")]
    tone: ToneArg,

    /// Font used when the template defines none
    #[arg(long, default_value = "Bookman Old Style")]
    font_name: String,

    /// Font size (pt) used when the template defines none
    #[arg(long, default_value = "8")]
    font_size: f32,

    /// Write a JSON run report to this file
    #[arg(long, value_name = "FILE")]
    report: Option<PathBuf>,
}

impl GenerateArgs {
    fn options(&self) -> NoticeOptions {
        NoticeOptions::new()
            .with_output_dir(&self.output_dir)
            .with_placeholder(&self.placeholder)
            .with_anchor(&self.anchor)
            .with_tone(self.tone.into())
            .with_font_name(&self.font_name)
            .with_font_size(self.font_size)
    }
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
enum ToneArg {
    /// Leave emphasis as in the template
    Formal,
    /// Bold dark-red notice paragraphs
    Urgent,
    /// Italic courtesy paragraphs
    Friendly,
    /// Choose from the template wording
    Auto,
}

impl From<ToneArg> for Tone {
    fn from(tone: ToneArg) -> Self {
        match tone {
            ToneArg::Formal => Tone::Formal,
            ToneArg::Urgent => Tone::Urgent,
            ToneArg::Friendly => Tone::Friendly,
            ToneArg::Auto => Tone::Auto,
        }
    }
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = match cli.command {
        Some(Commands::Generate {
            data,
            template,
            args,
        }) => cmd_generate(&data, &template, &args),
        Some(Commands::Inspect {
            template,
            placeholder,
            anchor,
            json,
        }) => cmd_inspect(&template, placeholder, anchor, json).map(|_| true),
        Some(Commands::Version) => {
            cmd_version();
            Ok(true)
        }
        None => {
            // Default behavior: generate if both inputs are provided
            if let (Some(data), Some(template)) = (cli.data, cli.template) {
                cmd_generate(&data, &template, &cli.generate)
            } else {
                println!("{}", "Usage: noticegen <DATA> <TEMPLATE> [OPTIONS]".yellow());
                println!("       noticegen --help for more information");
                Ok(true)
            }
        }
    };

    match result {
        Ok(true) => {}
        Ok(false) => std::process::exit(1),
        Err(e) => {
            eprintln!("{}: {}", "Error".red().bold(), e);
            std::process::exit(1);
        }
    }
}

/// Returns whether every group produced a notice.
fn cmd_generate(
    data: &Path,
    template: &Path,
    args: &GenerateArgs,
) -> Result<bool, Box<dyn std::error::Error>> {
    println!("{} {}", "Reading".cyan(), data.display());
    let records = read_records(data)?;
    let assembler = NoticeAssembler::from_template_path(template, args.options())?;

    let partition = partition(records);
    print_rejected(&partition.rejected);
    if partition.groups.is_empty() {
        return Err("no valid records to generate notices for".into());
    }
    println!(
        "{} {} records in {} groups",
        "Found".cyan(),
        partition.valid_count(),
        partition.groups.len()
    );

    let pb = ProgressBar::new(partition.groups.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")?
            .progress_chars("#>-"),
    );

    let report = assembler.run_partition(partition, |group| {
        pb.println(group_line(group));
        pb.set_message(group.org_name.clone());
        pb.inc(1);
    })?;
    pb.finish_and_clear();

    print_summary(&report);

    if let Some(ref path) = args.report {
        fs::write(path, serde_json::to_string_pretty(&report)?)?;
        println!("{} {}", "Report saved to".green(), path.display());
    }

    Ok(report.is_success())
}

fn group_line(group: &GroupReport) -> String {
    match &group.outcome {
        GroupOutcome::Written { path, warnings } => {
            let mut line = format!(
                "  {} {} ({} records) -> {}",
                "✓".green(),
                group.org_name,
                group.record_count,
                path.display()
            );
            for warning in warnings {
                line.push_str(&format!("\n    {} {}", "warning:".yellow(), warning));
            }
            line
        }
        GroupOutcome::Failed { message, .. } => format!(
            "  {} {} ({}): {}",
            "✗".red(),
            group.org_name,
            group.routing_code,
            message
        ),
    }
}

fn print_rejected(rejected: &[noticegen::routing::RejectedRecord]) {
    if rejected.is_empty() {
        return;
    }
    println!(
        "{} {} invalid records skipped:",
        "Warning:".yellow().bold(),
        rejected.len()
    );
    for r in rejected.iter().take(noticegen::assemble::REJECTED_SAMPLE_SIZE) {
        println!("  - line {}: {}", r.record.line, r.reason);
    }
    if rejected.len() > noticegen::assemble::REJECTED_SAMPLE_SIZE {
        println!(
            "  ... and {} more",
            rejected.len() - noticegen::assemble::REJECTED_SAMPLE_SIZE
        );
    }
}

fn print_summary(report: &RunReport) {
    println!();
    let summary = report.summary();
    if report.is_success() {
        println!("{}", summary.green().bold());
    } else {
        println!("{}", summary.yellow().bold());
        println!(
            "{} {} groups failed",
            "Warning:".yellow().bold(),
            report.failure_count()
        );
    }
    println!("{}: {} ms", "Elapsed".dimmed(), report.elapsed_ms());
}

fn cmd_inspect(
    template: &Path,
    placeholder: String,
    anchor: String,
    json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let options = NoticeOptions::new()
        .with_placeholder(placeholder)
        .with_anchor(anchor);
    let inspection = inspect_template(template, &options)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&inspection)?);
        return Ok(());
    }

    let mark = |ok: bool| if ok { "yes".green() } else { "no".red() };

    println!("{}", "Template Information".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());
    println!("{}: {}", "File".bold(), template.display());
    println!("{}: {}", "Accounts table".bold(), mark(inspection.has_accounts_table));
    println!(
        "{}: {} ({})",
        "Anchor".bold(),
        mark(inspection.has_anchor),
        options.anchor
    );
    println!(
        "{}: {} occurrence(s) of '{}'",
        "Placeholder".bold(),
        inspection.placeholder_count,
        options.placeholder
    );

    println!();
    println!("{}", "Style Profile".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());
    println!("{}", serde_json::to_string_pretty(&inspection.profile)?);

    Ok(())
}

fn cmd_version() {
    println!("{} {}", "noticegen".cyan().bold(), env!("CARGO_PKG_VERSION"));
    println!("Per-bank notice generation tool");
    println!();
    println!("License: MIT");
}

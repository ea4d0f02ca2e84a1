//! pdf-outline CLI - heading outline extraction tool

use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};

use pdf_outline::batch::{self, DEFAULT_OUTPUT_DIR};
use pdf_outline::outline::config::{
    DEFAULT_LEFT_MARGIN, DEFAULT_LINE_TOLERANCE, DEFAULT_MAX_WORDS, DEFAULT_SIZE_LEVELS,
};
use pdf_outline::outline::{Analysis, OutlinePipeline};
use pdf_outline::parser::extract_file;
use pdf_outline::{BatchOptions, BatchReport, ExtractOptions, HeuristicConfig, JsonFormat};

#[derive(Parser)]
#[command(name = "pdf-outline")]
#[command(version)]
#[command(about = "Extract title and H1-H3 heading outlines from PDFs", long_about = None)]
struct Cli {
    /// Input PDF file or directory of PDFs
    #[arg(value_name = "INPUT")]
    input: Option<PathBuf>,

    /// Output directory
    #[arg(value_name = "OUTPUT")]
    output: Option<PathBuf>,

    #[command(flatten)]
    thresholds: Thresholds,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Write one JSON outline per PDF
    Run {
        /// Input PDF file or directory of PDFs
        #[arg(value_name = "INPUT")]
        input: PathBuf,

        /// Output directory
        #[arg(short, long, value_name = "DIR", default_value = DEFAULT_OUTPUT_DIR)]
        output: PathBuf,

        /// Output compact JSON
        #[arg(long)]
        compact: bool,

        /// Process one document at a time
        #[arg(long)]
        sequential: bool,

        #[command(flatten)]
        thresholds: Thresholds,
    },

    /// Print the outline of one PDF
    Show {
        /// Input PDF file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Output compact JSON
        #[arg(long)]
        compact: bool,

        #[command(flatten)]
        thresholds: Thresholds,
    },

    /// Show statistics and per-line heading signals
    Inspect {
        /// Input PDF file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        #[command(flatten)]
        thresholds: Thresholds,
    },

    /// Show version information
    Version,
}

/// Heading thresholds.
#[derive(Args)]
struct Thresholds {
    /// Baseline distance below which fragments share a line (points)
    #[arg(long, env = "PDF_OUTLINE_LINE_TOLERANCE", default_value_t = DEFAULT_LINE_TOLERANCE)]
    line_tolerance: f32,

    /// Headings must start left of this x coordinate (points)
    #[arg(long, env = "PDF_OUTLINE_LEFT_MARGIN", default_value_t = DEFAULT_LEFT_MARGIN)]
    left_margin: f32,

    /// Headings have fewer words than this
    #[arg(long, env = "PDF_OUTLINE_MAX_WORDS", default_value_t = DEFAULT_MAX_WORDS)]
    max_words: usize,

    /// Number of heading sizes that get their own level (1-3)
    #[arg(long, env = "PDF_OUTLINE_SIZE_LEVELS", default_value_t = DEFAULT_SIZE_LEVELS)]
    size_levels: usize,
}

impl From<&Thresholds> for HeuristicConfig {
    fn from(t: &Thresholds) -> Self {
        HeuristicConfig::new()
            .with_line_tolerance(t.line_tolerance)
            .with_left_margin(t.left_margin)
            .with_max_words(t.max_words)
            .with_size_levels(t.size_levels)
    }
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();

    let result = match cli.command {
        Some(Commands::Run {
            input,
            output,
            compact,
            sequential,
            thresholds,
        }) => cmd_run(&input, &output, compact, !sequential, &thresholds),
        Some(Commands::Show {
            input,
            compact,
            thresholds,
        }) => cmd_show(&input, compact, &thresholds),
        Some(Commands::Inspect { input, thresholds }) => cmd_inspect(&input, &thresholds),
        Some(Commands::Version) => {
            cmd_version();
            Ok(())
        }
        None => {
            // Default behavior: batch run if input is provided
            if let Some(input) = cli.input {
                let output = cli
                    .output
                    .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT_DIR));
                cmd_run(&input, &output, false, true, &cli.thresholds)
            } else {
                println!("{}", "Usage: pdf-outline <INPUT> [OUTPUT]".yellow());
                println!("       pdf-outline --help for more information");
                Ok(())
            }
        }
    };

    if let Err(e) = result {
        eprintln!("{}: {}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

fn json_format(compact: bool) -> JsonFormat {
    if compact {
        JsonFormat::Compact
    } else {
        JsonFormat::Pretty
    }
}

fn cmd_run(
    input: &Path,
    output: &Path,
    compact: bool,
    parallel: bool,
    thresholds: &Thresholds,
) -> Result<(), Box<dyn std::error::Error>> {
    let options = BatchOptions::new()
        .with_output_dir(output)
        .with_format(json_format(compact))
        .with_parallel(parallel)
        .with_extract_options(ExtractOptions::new().lenient())
        .with_heuristics(thresholds.into());
    log::debug!("Heuristics: {:?}", options.heuristics);

    let inputs = batch::collect_inputs(input)?;
    if inputs.is_empty() {
        println!("{} {}", "No PDF files in".yellow(), input.display());
        return Ok(());
    }

    let pb = ProgressBar::new(inputs.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")?
            .progress_chars("#>-"),
    );

    let report = batch::run_batch_with_progress(&inputs, &options, |path, _| {
        pb.set_message(file_name(path));
        pb.inc(1);
    })?;

    pb.finish_with_message("Done!");
    print_summary(&report, output);

    Ok(())
}

fn print_summary(report: &BatchReport, output: &Path) {
    println!("\n{}", "Summary".green().bold());
    println!(
        "  {} {} written to {}",
        "├─".dimmed(),
        report.written(),
        output.display()
    );
    println!("  {} {} without text", "├─".dimmed(), report.empty());
    println!("  {} {} failed", "└─".dimmed(), report.failed());

    for (path, error) in report.failures() {
        println!("     {} {}: {}", "✗".red(), file_name(path), error);
    }
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .unwrap_or(path.as_os_str())
        .to_string_lossy()
        .into_owned()
}

fn analyze(input: &Path, thresholds: &Thresholds) -> Result<Option<Analysis>, Box<dyn std::error::Error>> {
    let pipeline = OutlinePipeline::new(thresholds.into())?;
    let doc = extract_file(input, &ExtractOptions::new().lenient())?;
    Ok(pipeline.analyze(&doc))
}

fn cmd_show(
    input: &Path,
    compact: bool,
    thresholds: &Thresholds,
) -> Result<(), Box<dyn std::error::Error>> {
    match analyze(input, thresholds)? {
        Some(analysis) => {
            let json = pdf_outline::render::to_json(&analysis.into_outline(), json_format(compact))?;
            println!("{}", json);
        }
        None => println!("{} {}", "No text found in".yellow(), input.display()),
    }
    Ok(())
}

fn cmd_inspect(input: &Path, thresholds: &Thresholds) -> Result<(), Box<dyn std::error::Error>> {
    let version = pdf_outline::detect::sniff_file(input)?;

    println!("{}", "Document Statistics".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());
    println!("{}: {}", "File".bold(), input.display());
    println!("{}: PDF {}", "Format".bold(), version);

    let Some(analysis) = analyze(input, thresholds)? else {
        println!("{}: {}", "Fragments".bold(), 0);
        println!("{}", "No text found".yellow());
        return Ok(());
    };

    let sizes: Vec<String> = analysis
        .heading_sizes
        .iter()
        .map(|s| format!("{:.1}", s))
        .collect();

    println!("{}: {}", "Fragments".bold(), analysis.fragment_count);
    println!("{}: {}", "Lines".bold(), analysis.lines.len());
    println!("{}: {:.2}", "Median size".bold(), analysis.median_size);
    println!("{}: [{}]", "Heading sizes".bold(), sizes.join(", "));
    println!("{}: {}", "Headings".bold(), analysis.headings.len());
    println!("{}: {}", "Title".bold(), analysis.title);

    println!();
    println!("{}", "Lines".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());
    println!(
        "{}",
        "page  size   x0     flags  level  text   (T=table S=short L=left N=numbered G=large B=bold)"
            .dimmed()
    );

    for report in &analysis.lines {
        let s = report.signals;
        let flags: String = [
            (s.in_table, 'T'),
            (s.short, 'S'),
            (s.left_aligned, 'L'),
            (s.numbered, 'N'),
            (s.large, 'G'),
            (s.bold, 'B'),
        ]
        .iter()
        .map(|&(on, c)| if on { c } else { '.' })
        .collect();

        let level = report
            .level
            .map(|(level, _)| level.to_string())
            .unwrap_or_else(|| "-".to_string());

        let row = format!(
            "{:>4}  {:>5.1}  {:>5.1}  {}  {:>5}  {}",
            report.line.page, report.line.size, report.line.x0, flags, level, report.line.text
        );

        if report.level.is_some() {
            println!("{}", row.green());
        } else {
            println!("{}", row);
        }
    }

    Ok(())
}

fn cmd_version() {
    println!("{} {}", "pdf-outline".cyan().bold(), env!("CARGO_PKG_VERSION"));
    println!("PDF heading outline extraction tool");
    println!();
    println!("License: MIT");
}

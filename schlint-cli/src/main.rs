//! schlint CLI - lint legacy KiCad schematics and export fabrication files.

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use schlint::fabrication::{load_board, Board};
use schlint::keepout::KeepoutZone;
use schlint::{Issue, LintOptions, LintResult, RulesEngine, SchLintCore, Severity};
use std::path::{Path, PathBuf};
use std::process;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "schlint")]
#[command(about = "Legacy KiCad schematic linter and fabrication export tool", long_about = None)]
#[command(version)]
struct Cli {
    /// Print debug logs to stderr (RUST_LOG still applies)
    #[arg(long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Lint a single legacy schematic file
    Lint {
        /// Path to .sch file
        #[arg(value_name = "FILE")]
        file: PathBuf,

        #[command(flatten)]
        report: ReportArgs,
    },

    /// Lint all legacy schematics in a directory
    Project {
        /// Path to project directory
        #[arg(value_name = "DIR", default_value = ".")]
        dir: PathBuf,

        #[command(flatten)]
        report: ReportArgs,
    },

    /// Print the assembler BOM built from a BOM CSV and a placement file
    Bom {
        /// BOM spreadsheet exported as CSV
        #[arg(value_name = "BOM")]
        bom: PathBuf,

        /// Pcbnew placement file (.pos)
        #[arg(value_name = "CPL")]
        cpl: PathBuf,
    },

    /// Print the component placement list built from a BOM CSV and a placement file
    Cpl {
        /// BOM spreadsheet exported as CSV
        #[arg(value_name = "BOM")]
        bom: PathBuf,

        /// Pcbnew placement file (.pos)
        #[arg(value_name = "CPL")]
        cpl: PathBuf,
    },

    /// Print the points of a circular keepout zone in kicad_pcb format
    #[command(allow_negative_numbers = true)]
    Circle {
        /// Center X (mm)
        x: f64,

        /// Center Y (mm)
        y: f64,

        /// Radius (mm)
        radius: f64,

        /// Number of polygon points
        #[arg(long, default_value_t = schlint::keepout::DEFAULT_POINT_COUNT)]
        points: usize,

        /// Print a complete (zone ...) block instead of bare points
        #[arg(long)]
        zone: bool,

        /// Copper layer of the zone block
        #[arg(long, default_value = "F.Cu")]
        layer: String,
    },

    /// List available lint rules
    Rules {
        /// Show detailed rule descriptions
        #[arg(short, long)]
        verbose: bool,
    },
}

#[derive(clap::Args)]
struct ReportArgs {
    /// Output format
    #[arg(short, long, value_enum, default_value = "human")]
    format: OutputFormat,

    /// Exit with error code if any warning is reported
    #[arg(long)]
    fail_on_warning: bool,

    /// Only run these rules (repeatable)
    #[arg(long = "rule", value_name = "ID")]
    rules: Vec<String>,

    /// Disable coloured output
    #[arg(long)]
    no_color: bool,
}

impl ReportArgs {
    fn options(&self) -> LintOptions {
        LintOptions {
            rules: self.rules.clone(),
            fail_on_warning: self.fail_on_warning,
        }
    }
}

#[derive(Clone, ValueEnum)]
enum OutputFormat {
    /// Human-readable output
    Human,
    /// JSON output for CI/CD
    Json,
    /// GitHub Actions format
    Github,
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.debug);

    let exit_code = match cli.command {
        Commands::Lint { file, report } => handle_lint(&file, &report),
        Commands::Project { dir, report } => handle_project(&dir, &report),
        Commands::Bom { bom, cpl } => handle_board(&bom, &cpl, Board::bom_csv),
        Commands::Cpl { bom, cpl } => handle_board(&bom, &cpl, Board::cpl_csv),
        Commands::Circle {
            x,
            y,
            radius,
            points,
            zone,
            layer,
        } => handle_circle(x, y, radius, points, zone, &layer),
        Commands::Rules { verbose } => {
            handle_rules(verbose);
            0
        }
    };

    process::exit(exit_code);
}

fn init_tracing(debug: bool) {
    let rust_log = std::env::var(EnvFilter::DEFAULT_ENV).ok();

    tracing_subscriber::fmt()
        .with_env_filter(log_filter(debug, rust_log.as_deref()))
        .with_writer(std::io::stderr)
        .init();
}

/// `RUST_LOG` when set and valid, else `warn`. `--debug` raises the global level on top.
fn log_filter(debug: bool, rust_log: Option<&str>) -> EnvFilter {
    let filter = rust_log
        .and_then(|directives| EnvFilter::try_new(directives).ok())
        .unwrap_or_else(|| EnvFilter::new("warn"));

    if debug {
        filter.add_directive(tracing::Level::DEBUG.into())
    } else {
        filter
    }
}

fn handle_lint(file: &Path, report: &ReportArgs) -> i32 {
    if report.no_color {
        colored::control::set_override(false);
    }
    let options = report.options();

    match SchLintCore::lint_file(file, &options) {
        Ok(result) => {
            output_results(std::slice::from_ref(&result), &report.format, false);
            if result.fails(&options) {
                return 1;
            }
            0
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            1
        }
    }
}

fn handle_project(dir: &Path, report: &ReportArgs) -> i32 {
    if report.no_color {
        colored::control::set_override(false);
    }
    let options = report.options();

    match SchLintCore::lint_project(dir, &options) {
        Ok(results) => {
            output_results(&results, &report.format, true);
            if results.iter().any(|r| r.fails(&options)) {
                return 1;
            }
            0
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            1
        }
    }
}

fn handle_board(
    bom: &Path,
    cpl: &Path,
    render: fn(&Board) -> Result<String, schlint::FabricationError>,
) -> i32 {
    match load_board(bom, cpl).and_then(|board| render(&board)) {
        Ok(csv) => {
            print!("{}", csv);
            0
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            1
        }
    }
}

fn handle_circle(x: f64, y: f64, radius: f64, points: usize, zone: bool, layer: &str) -> i32 {
    match KeepoutZone::new(x, y, radius) {
        Ok(keepout) => {
            let keepout = keepout.with_points(points).with_layer(layer);
            if zone {
                println!("{}", keepout.to_sexp());
            } else {
                println!("{}", keepout.points_sexp());
            }
            0
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            1
        }
    }
}

fn output_results(results: &[LintResult], format: &OutputFormat, show_files: bool) {
    match format {
        OutputFormat::Human => output_human(results, show_files),
        OutputFormat::Json => output_json(results),
        OutputFormat::Github => output_github(results),
    }
}

fn severity_tag(issue: &Issue) -> colored::ColoredString {
    let tag = format!("{}:", issue.severity.label());
    match issue.severity {
        Severity::Error => tag.red(),
        Severity::Warning => tag.yellow(),
        Severity::Info => tag.blue(),
    }
}

fn output_human(results: &[LintResult], show_files: bool) {
    for result in results {
        if show_files {
            println!("{}", result.file.display().to_string().bold());
        }
        for issue in &result.issues {
            println!("{} {}", severity_tag(issue), issue.message);
        }
    }
}

fn output_json(results: &[LintResult]) {
    let output = serde_json::json!({
        "results": results.iter().map(LintResult::to_json).collect::<Vec<_>>(),
        "summary": {
            "total_files": results.len(),
            "total_issues": results.iter().map(|r| r.total_issues()).sum::<usize>(),
            "warnings": results.iter().map(|r| r.stats.warnings).sum::<usize>(),
        }
    });
    match serde_json::to_string_pretty(&output) {
        Ok(json) => println!("{}", json),
        Err(e) => eprintln!("Error: {}", e),
    }
}

fn severity_to_github(issue: &Issue) -> &'static str {
    match issue.severity {
        Severity::Error => "error",
        Severity::Warning => "warning",
        Severity::Info => "notice",
    }
}

fn output_github(results: &[LintResult]) {
    for result in results {
        for issue in &result.issues {
            println!(
                "::{} file={}::{}",
                severity_to_github(issue),
                result.file.display(),
                issue.message.replace('\n', " ")
            );
        }
    }
}

fn handle_rules(verbose: bool) {
    println!("Available lint rules:\n");

    let engine = RulesEngine::with_default_rules();
    for rule in engine.rules() {
        println!("  {}", rule.id());
        println!("    {}", rule.name());
        if verbose {
            println!("    {}", rule.description());
        }
        println!();
    }
}

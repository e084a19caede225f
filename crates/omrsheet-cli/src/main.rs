//! The `omrsheet` binary: sheets, answer keys, grading and analytics from the command line.

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};

use omrsheet_core::patterns::AnswerPattern;
use omrsheet_core::session::View;

mod commands;

use commands::SheetArgs;

#[derive(Parser)]
#[command(
    name = "omrsheet",
    version,
    about = "OMR answer sheets, answer keys and grading"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a starter config and sample files
    Init,

    /// Render a printable answer sheet
    Sheet {
        #[command(flatten)]
        sheet: SheetArgs,

        /// Output HTML file (default: <output_dir>/sheet_<id>.html)
        #[arg(long)]
        output: Option<PathBuf>,
    },

    /// Import an answer key and report parse diagnostics
    ImportKey {
        /// Answer key file (CSV, TSV, one answer per line, or letters)
        #[arg(long)]
        input: PathBuf,

        #[command(flatten)]
        sheet: SheetArgs,

        /// Write the key as CSV to the output directory
        #[arg(long)]
        csv: bool,

        /// Write a printable answer key to the output directory
        #[arg(long)]
        html: bool,
    },

    /// Generate an answer key from a pattern
    GenerateKey {
        /// sequential, alternating, random, all-same
        #[arg(long)]
        pattern: AnswerPattern,

        /// Seed for the random patterns
        #[arg(long)]
        seed: Option<u64>,

        #[command(flatten)]
        sheet: SheetArgs,

        /// Output CSV file (default: <output_dir>/<title>_answers.csv)
        #[arg(long)]
        output: Option<PathBuf>,
    },

    /// Compare two answer keys
    Compare {
        /// Primary answer key file
        #[arg(long)]
        primary: PathBuf,

        /// Secondary answer key file
        #[arg(long)]
        secondary: PathBuf,

        #[command(flatten)]
        sheet: SheetArgs,

        /// Output format: text, json, markdown
        #[arg(long, default_value = "text")]
        format: String,

        /// Write the comparison CSV to the output directory
        #[arg(long)]
        csv: bool,

        /// Exit code 1 if the keys disagree
        #[arg(long)]
        fail_on_mismatch: bool,
    },

    /// Grade a roster of student responses
    Grade {
        /// Answer key file
        #[arg(long)]
        key: PathBuf,

        /// Roster TOML file with student responses
        #[arg(long)]
        responses: PathBuf,

        #[command(flatten)]
        sheet: SheetArgs,

        /// Write the results CSV to the output directory
        #[arg(long)]
        csv: bool,
    },

    /// Compute class analytics
    Analyze {
        /// Answer key file
        #[arg(long)]
        key: PathBuf,

        /// Roster TOML file with student responses
        #[arg(long)]
        responses: PathBuf,

        #[command(flatten)]
        sheet: SheetArgs,

        /// Output directory (default: output_dir from config)
        #[arg(long)]
        output: Option<PathBuf>,

        /// Output format: json, html, all
        #[arg(long, default_value = "json")]
        format: String,
    },

    /// Scan a sheet image with the configured scanner and score it
    Scan {
        /// Sheet image file
        #[arg(long)]
        image: PathBuf,

        /// Student name
        #[arg(long)]
        name: String,

        /// Student roll number
        #[arg(long)]
        roll_number: String,

        /// Answer key file
        #[arg(long)]
        key: PathBuf,

        #[command(flatten)]
        sheet: SheetArgs,
    },

    /// Render any view as a printable HTML document
    Print {
        /// sheet, answer-key, comparison, results, analytics
        #[arg(long)]
        view: View,

        /// Primary answer key file
        #[arg(long)]
        key: Option<PathBuf>,

        /// Secondary answer key file
        #[arg(long)]
        secondary: Option<PathBuf>,

        /// Roster TOML file with student responses
        #[arg(long)]
        responses: Option<PathBuf>,

        #[command(flatten)]
        sheet: SheetArgs,

        /// Output HTML file (default: <output_dir>/<view>_<id>.html)
        #[arg(long)]
        output: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("omrsheet=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Init => commands::init::execute(),
        Commands::Sheet { sheet, output } => commands::sheet::execute(sheet, output),
        Commands::ImportKey {
            input,
            sheet,
            csv,
            html,
        } => commands::import_key::execute(input, sheet, csv, html),
        Commands::GenerateKey {
            pattern,
            seed,
            sheet,
            output,
        } => commands::generate_key::execute(pattern, seed, sheet, output),
        Commands::Compare {
            primary,
            secondary,
            sheet,
            format,
            csv,
            fail_on_mismatch,
        } => commands::compare::execute(primary, secondary, sheet, format, csv, fail_on_mismatch),
        Commands::Grade {
            key,
            responses,
            sheet,
            csv,
        } => commands::grade::execute(key, responses, sheet, csv),
        Commands::Analyze {
            key,
            responses,
            sheet,
            output,
            format,
        } => commands::analyze::execute(key, responses, sheet, output, format),
        Commands::Scan {
            image,
            name,
            roll_number,
            key,
            sheet,
        } => commands::scan::execute(image, name, roll_number, key, sheet).await,
        Commands::Print {
            view,
            key,
            secondary,
            responses,
            sheet,
            output,
        } => commands::print::execute(view, key, secondary, responses, sheet, output),
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}

//! redocx CLI - rename DOCX files in a zip archive after their first paragraph
//!
//! Reads a zip archive of Word documents, names every document after the
//! text of its first paragraph, and writes the renamed archive.

use clap::{Parser, Subcommand, ValueEnum};
use colored::*;
use indicatif::{ProgressBar, ProgressStyle};
use redocx::{ErrorPolicy, JsonFormat, RenameOptions, RenameOutcome, Renamer, SuffixStyle};
use std::fs;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Rename DOCX files after their first paragraph
#[derive(Parser)]
#[command(
    name = "redocx",
    author = "iyulab",
    version,
    about = "Rename DOCX files in a zip archive after their first paragraph",
    long_about = "redocx - name every Word document in a zip archive after its first paragraph.\n\n\
                  Colliding names get a \" (n)\" counter; characters that are not allowed in \
                  file names are replaced."
)]
struct Cli {
    /// Enable debug logging (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Rename the documents of an archive
    Rename {
        /// Input zip archive
        input: PathBuf,

        /// Output zip archive
        #[arg(short, long, default_value = redocx::DEFAULT_OUTPUT_NAME)]
        output: PathBuf,

        /// What to do when a document has no usable header
        #[arg(long, default_value = "continue")]
        on_error: OnError,

        /// Where the collision counter goes
        #[arg(long, default_value = "after-name")]
        suffix: Suffix,

        /// Show the renames without writing the output archive
        #[arg(long)]
        dry_run: bool,

        /// Print the renames as JSON
        #[arg(long)]
        json: bool,

        /// Output compact JSON (no indentation)
        #[arg(long, requires = "json")]
        compact: bool,
    },

    /// Print the header (first paragraph) of a single DOCX file
    Header {
        /// Input DOCX file
        input: PathBuf,
    },

    /// Show version information
    Version,
}

/// Failure handling mode
#[derive(Clone, ValueEnum)]
enum OnError {
    /// Keep the original file name for documents without a usable header
    Continue,
    /// Stop at the first document without a usable header
    Abort,
}

impl From<OnError> for ErrorPolicy {
    fn from(mode: OnError) -> Self {
        match mode {
            OnError::Continue => ErrorPolicy::Continue,
            OnError::Abort => ErrorPolicy::Abort,
        }
    }
}

/// Collision counter placement
#[derive(Clone, ValueEnum)]
enum Suffix {
    /// "Report.docx (1)"
    AfterName,
    /// "Report (1).docx"
    BeforeExtension,
}

impl From<Suffix> for SuffixStyle {
    fn from(mode: Suffix) -> Self {
        match mode {
            Suffix::AfterName => SuffixStyle::AfterName,
            Suffix::BeforeExtension => SuffixStyle::BeforeExtension,
        }
    }
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Err(e) = run(cli) {
        eprintln!("{}: {}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

fn init_logging(verbose: bool) {
    let default = if verbose { "warn,redocx=debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default)),
        )
        .with_writer(std::io::stderr)
        .init();
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Rename {
            input,
            output,
            on_error,
            suffix,
            dry_run,
            json,
            compact,
        } => {
            let options = RenameOptions::new()
                .with_error_policy(on_error.into())
                .with_suffix_style(suffix.into());

            let pb = create_spinner("Reading archive...");
            let data = fs::read(&input)?;
            tracing::debug!("read {} bytes from {}", data.len(), input.display());

            pb.set_message("Renaming documents...");
            let outcome = rename(options, &data)?;
            pb.finish_and_clear();

            if !dry_run {
                fs::write(&output, &outcome.data)?;
            }

            if json {
                let format = if compact {
                    JsonFormat::Compact
                } else {
                    JsonFormat::Pretty
                };
                println!("{}", redocx::to_json(&outcome.plan, format)?);
            } else {
                print_plan(&outcome);
                if dry_run {
                    println!("{} Dry run, nothing written", "!".yellow().bold());
                } else {
                    println!(
                        "{} Renamed {} documents: {}",
                        "✓".green().bold(),
                        outcome.plan.records.len(),
                        output.display()
                    );
                }
            }
        }

        Commands::Header { input } => {
            let data = fs::read(&input)?;
            let header = redocx::extract_header(&data)?;
            println!("{}", header);
        }

        Commands::Version => {
            print_version();
        }
    }

    Ok(())
}

/// Run the batch with concurrent extraction.
fn rename(options: RenameOptions, data: &[u8]) -> Result<RenameOutcome, Box<dyn std::error::Error>> {
    let runtime = tokio::runtime::Builder::new_multi_thread().build()?;
    let outcome = runtime.block_on(Renamer::new(options).rename_bytes_async(data))?;
    Ok(outcome)
}

fn print_plan(outcome: &RenameOutcome) {
    for record in &outcome.plan.records {
        match record.error {
            Some(ref error) => println!(
                "{} {} -> {} ({})",
                "!".yellow().bold(),
                record.original,
                record.renamed.bold(),
                error.dimmed()
            ),
            None => println!(
                "  {} -> {}",
                record.original,
                record.renamed.bold()
            ),
        }
    }
}

fn print_version() {
    println!("{} {}", "redocx".green().bold(), env!("CARGO_PKG_VERSION"));
    println!("Rename DOCX files in a zip archive after their first paragraph");
}

fn create_spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"])
            .template("{spinner:.blue} {msg}")
            .unwrap(),
    );
    pb.set_message(message.to_string());
    pb.enable_steady_tick(std::time::Duration::from_millis(100));
    pb
}

//! CLI for bbl2bib - Convert LaTeX .bbl bibliographies into BibTeX records.

use std::fmt;
use std::fs;
use std::io::{self, ErrorKind, IsTerminal, Read, Write};
use std::path::{Path, PathBuf};
use std::process;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use bbl2bib::{convert_document, derive_output_path, render, OutputFormat};

// ---------------------------------------------------------------------------
// CLI definition
// ---------------------------------------------------------------------------

/// Convert LaTeX .bbl bibliographies into BibTeX records
#[derive(Parser)]
#[command(name = "bbl2bib")]
#[command(version)]
#[command(after_help = "\
Examples:
  bbl2bib paper.bbl                 writes paper.bib
  bbl2bib paper.bbl refs.bib
  bbl2bib paper.bbl -o refs.json --format json
  cat paper.bbl | bbl2bib -         writes to stdout

Set RUST_LOG=debug to see why entries were skipped.")]
struct Cli {
    /// Input .bbl file (use '-' for stdin)
    input: PathBuf,

    /// Output file (default: the input path with .bbl replaced by .bib)
    #[arg(value_name = "OUTPUT", conflicts_with = "output")]
    output_path: Option<PathBuf>,

    /// Output file
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Bibtex)]
    format: OutputFormat,

    /// Write to stdout instead of a file
    #[arg(long, conflicts_with_all = ["output", "output_path"])]
    stdout: bool,

    /// Report every skipped entry
    #[arg(short, long, conflicts_with = "quiet")]
    verbose: bool,

    /// Only report fatal errors
    #[arg(short, long)]
    quiet: bool,
}

// ---------------------------------------------------------------------------
// AppError — semantic exit codes
// ---------------------------------------------------------------------------

enum AppError {
    /// Exit 10 — input file does not exist
    InputNotFound(String),
    /// Exit 11 — input file unreadable or not UTF-8
    InputFile(String),
    /// Exit 12 — cannot write output
    OutputFile(String),
    /// Exit 13 — records could not be serialized
    Render(String),
}

impl AppError {
    fn exit_code(&self) -> i32 {
        match self {
            AppError::InputNotFound(_) => 10,
            AppError::InputFile(_) => 11,
            AppError::OutputFile(_) => 12,
            AppError::Render(_) => 13,
        }
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::InputNotFound(msg) => {
                write!(f, "{}\n  hint: verify the file path is correct", msg)
            }
            AppError::InputFile(msg) => {
                write!(
                    f,
                    "{}\n  hint: the input must be a readable UTF-8 text file",
                    msg
                )
            }
            AppError::OutputFile(msg) => {
                write!(
                    f,
                    "{}\n  hint: check that the output directory exists and is writable",
                    msg
                )
            }
            AppError::Render(msg) => write!(f, "{}", msg),
        }
    }
}

/// Where the converted document goes.
enum Destination {
    Stdout,
    File(PathBuf),
}

impl Cli {
    fn destination(&self) -> Destination {
        if self.stdout {
            return Destination::Stdout;
        }
        if let Some(path) = self.output.as_ref().or(self.output_path.as_ref()) {
            return Destination::File(path.clone());
        }
        if self.input == Path::new("-") {
            Destination::Stdout
        } else {
            Destination::File(derive_output_path(&self.input, self.format))
        }
    }
}

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose, cli.quiet);

    if let Err(e) = run(&cli) {
        eprintln!("Error: {}", e);
        process::exit(e.exit_code());
    }
}

fn init_tracing(verbose: bool, quiet: bool) {
    let default_level = if verbose {
        "debug"
    } else if quiet {
        "error"
    } else {
        "warn"
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(io::stderr)
        .with_ansi(io::stderr().is_terminal())
        .with_target(false)
        .init();
}

fn run(cli: &Cli) -> Result<(), AppError> {
    // 1. Read the .bbl document (support '-' for stdin)
    let document = read_input(&cli.input)?;

    // 2. Convert entries
    let conversion = convert_document(&document);

    // 3. Render
    let result =
        render(&conversion.records, cli.format).map_err(|e| AppError::Render(e.to_string()))?;

    // 4. Write to file or stdout
    match cli.destination() {
        Destination::File(output_path) => {
            fs::write(&output_path, &result).map_err(|e| {
                AppError::OutputFile(format!("'{}': {}", output_path.display(), e))
            })?;
            if !cli.quiet {
                eprintln!(
                    "converted {}/{} entries, wrote {}",
                    conversion.stats.converted,
                    conversion.stats.total,
                    output_path.display()
                );
            }
        }
        Destination::Stdout => {
            let stdout = io::stdout();
            let mut handle = stdout.lock();
            handle
                .write_all(result.as_bytes())
                .and_then(|()| handle.flush())
                .map_err(|e| AppError::OutputFile(format!("stdout: {}", e)))?;
        }
    }

    Ok(())
}

fn read_input(input: &Path) -> Result<String, AppError> {
    if input == Path::new("-") {
        let mut buf = String::new();
        io::stdin()
            .read_to_string(&mut buf)
            .map_err(|e| AppError::InputFile(format!("failed to read from stdin: {}", e)))?;
        return Ok(buf);
    }

    fs::read_to_string(input).map_err(|e| {
        let msg = format!("'{}': {}", input.display(), e);
        if e.kind() == ErrorKind::NotFound {
            AppError::InputNotFound(msg)
        } else {
            AppError::InputFile(msg)
        }
    })
}

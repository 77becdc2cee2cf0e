//! inkwell CLI - minimal xlsx reader and writer
//!
//! Writes delimited text into worksheets and reads worksheets back as JSON.

use clap::{Args, Parser, Subcommand};
use colored::*;
use indicatif::{ProgressBar, ProgressStyle};
use inkwell_xlsx::{Compression, Excel, GapPolicy, ReadOptions, SheetSelector, WriteOptions};
use std::fs;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};

/// Minimal xlsx reader and writer
#[derive(Parser)]
#[command(
    name = "inkwell",
    version,
    about = "Read and write text-only xlsx workbooks",
    long_about = "inkwell - minimal OOXML spreadsheet reader and writer.\n\n\
                  Every cell is text. Sheets are written from delimited input \
                  and read back as JSON."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Append a sheet to a workbook, creating the file if needed
    Write {
        /// Workbook path
        file: PathBuf,

        /// Name of the new sheet
        #[arg(short, long)]
        sheet: String,

        /// Delimited input file (default: stdin)
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Field delimiter
        #[arg(short, long, default_value = ",")]
        delimiter: char,

        /// Store parts without compression
        #[arg(long)]
        stored: bool,
    },

    /// Print sheets as JSON
    Read {
        /// Workbook path
        file: PathBuf,

        #[command(flatten)]
        selector: SelectorArgs,

        /// Use the first row as keys
        #[arg(long)]
        header: bool,

        /// Keep empty cells between populated ones
        #[arg(long)]
        fill_gaps: bool,

        /// Output compact JSON (no indentation)
        #[arg(long)]
        compact: bool,
    },

    /// List sheet names in workbook order
    Sheets {
        /// Workbook path
        file: PathBuf,
    },

    /// Show version information
    Version,
}

#[derive(Args)]
#[group(multiple = false)]
struct SelectorArgs {
    /// Zero-based sheet position
    #[arg(long)]
    index: Option<usize>,

    /// Sheet name
    #[arg(long)]
    name: Option<String>,
}

impl From<SelectorArgs> for SheetSelector {
    fn from(args: SelectorArgs) -> Self {
        match (args.index, args.name) {
            (Some(index), _) => SheetSelector::ByIndex(index),
            (None, Some(name)) => SheetSelector::ByName(name),
            (None, None) => SheetSelector::All,
        }
    }
}

fn main() {
    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("{}: {}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Write {
            file,
            sheet,
            input,
            delimiter,
            stored,
        } => {
            let content = read_input(input.as_deref())?;
            let rows = parse_delimited(&content, delimiter)?;

            let pb = create_spinner("Writing workbook...");

            let compression = if stored {
                Compression::Stored
            } else {
                Compression::Deflated
            };
            let mut excel = if file.exists() {
                Excel::load(&file)?
            } else {
                let mut excel = Excel::new();
                excel.file(&file);
                excel
            }
            .with_write_options(WriteOptions::new().with_compression(compression));

            let row_count = rows.len();
            excel.write(sheet.as_str(), rows)?;

            pb.finish_and_clear();
            println!(
                "{} Wrote sheet '{}' ({} rows) to {}",
                "✓".green().bold(),
                sheet,
                row_count,
                file.display()
            );
        }

        Commands::Read {
            file,
            selector,
            header,
            fill_gaps,
            compact,
        } => {
            let pb = create_spinner("Reading workbook...");

            let gap_policy = if fill_gaps {
                GapPolicy::Fill
            } else {
                GapPolicy::Compact
            };
            let options = ReadOptions::new()
                .with_header(header)
                .with_gap_policy(gap_policy);

            let mut excel = Excel::new();
            excel.file(&file);
            let data = excel.read_with_options(SheetSelector::from(selector), &options)?;

            pb.finish_and_clear();

            let json = if compact {
                serde_json::to_string(&data)?
            } else {
                serde_json::to_string_pretty(&data)?
            };
            let stdout = io::stdout();
            let mut handle = stdout.lock();
            writeln!(handle, "{}", json)?;

            if data.is_empty() {
                eprintln!("{} No matching sheets", "!".yellow().bold());
            }
        }

        Commands::Sheets { file } => {
            let mut excel = Excel::new();
            excel.file(&file);

            let stdout = io::stdout();
            let mut handle = stdout.lock();
            for name in excel.sheets()? {
                writeln!(handle, "{}", name)?;
            }
        }

        Commands::Version => {
            print_version();
        }
    }

    Ok(())
}

fn print_version() {
    println!("{} {}", "inkwell".green().bold(), env!("CARGO_PKG_VERSION"));
    println!("Minimal OOXML spreadsheet reader and writer");
    println!();
    println!("Cells: inline strings on write, shared and inline strings on read");
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

fn read_input(path: Option<&Path>) -> io::Result<String> {
    match path {
        Some(p) => fs::read_to_string(p),
        None => {
            let mut content = String::new();
            io::stdin().lock().read_to_string(&mut content)?;
            Ok(content)
        }
    }
}

/// Parse delimited text into rows. Quoted fields may contain the delimiter
/// and line breaks; rows may differ in length.
fn parse_delimited(
    content: &str,
    delimiter: char,
) -> Result<Vec<Vec<String>>, Box<dyn std::error::Error>> {
    if !delimiter.is_ascii() {
        return Err(format!("delimiter must be an ASCII character, got {:?}", delimiter).into());
    }

    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter as u8)
        .has_headers(false)
        .flexible(true)
        .from_reader(content.as_bytes());

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        rows.push(record.iter().map(str::to_string).collect());
    }
    Ok(rows)
}

//! pdf2xlsx - Convert the text of PDF pages into a spreadsheet
//!
//! Each page's shown text becomes one highlighted row of the first column.

use anyhow::{Context, Result, bail};
use clap::{ArgAction, Parser};
use pdfsheet_core::extract::TextOperators;
use pdfsheet_core::{ConvertOptions, Converter, PageErrorPolicy, write_artifact};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

/// A command line tool for converting the text of PDF pages into an
/// xlsx workbook, one row per page.
#[derive(Parser, Debug)]
#[command(name = "pdf2xlsx")]
#[command(author, version, about, long_about = None)]
#[command(disable_version_flag = true)]
struct Args {
    /// One or more paths to PDF files
    #[arg(required = true)]
    files: Vec<PathBuf>,

    /// Print version information
    #[arg(short = 'v', long = "version", action = ArgAction::Version)]
    version: (),

    /// Use debug logging level
    #[arg(short = 'd', long, action = ArgAction::SetTrue)]
    debug: bool,

    // === Output options ===
    /// Path of the workbook to write (single input only)
    #[arg(short = 'o', long, conflicts_with = "output_dir")]
    outfile: Option<PathBuf>,

    /// Directory receiving uniquely named result-*.xlsx workbooks
    #[arg(short = 'O', long = "output-dir")]
    output_dir: Option<PathBuf>,

    /// Name of the sheet receiving page text
    #[arg(long = "sheet-name", default_value = pdfsheet_core::xlsx::DEFAULT_SHEET_NAME)]
    sheet_name: String,

    /// Highlight fill colour for populated rows (RRGGBB)
    #[arg(long = "fill-color", default_value = pdfsheet_core::api::DEFAULT_FILL_COLOR)]
    fill_color: String,

    // === Extraction options ===
    /// Also extract text shown with TJ, ' and "
    #[arg(short = 'x', long, action = ArgAction::SetTrue)]
    extended: bool,

    /// Leave malformed pages empty instead of failing
    #[arg(long = "skip-bad-pages", action = ArgAction::SetTrue)]
    skip_bad_pages: bool,

    /// Worker threads for page extraction (0 = available parallelism)
    #[arg(short = 't', long, default_value = "1")]
    threads: usize,
}

impl Args {
    fn convert_options(&self) -> ConvertOptions {
        let threads = match self.threads {
            0 => std::thread::available_parallelism().ok().map(|n| n.get()),
            n => Some(n),
        };
        ConvertOptions {
            sheet_name: self.sheet_name.clone(),
            fill_color: self.fill_color.clone(),
            text_operators: if self.extended {
                TextOperators::Extended
            } else {
                TextOperators::Minimal
            },
            on_page_error: if self.skip_bad_pages {
                PageErrorPolicy::SkipPage
            } else {
                PageErrorPolicy::Abort
            },
            threads,
        }
    }
}

fn init_logging(debug: bool) {
    let default = if debug { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Output path for `input` when neither -o nor -O is given.
fn default_outfile(input: &Path) -> PathBuf {
    input.with_extension("xlsx")
}

fn process_file(path: &Path, converter: &Converter, args: &Args) -> Result<PathBuf> {
    let pdf_data =
        std::fs::read(path).with_context(|| format!("failed to read {}", path.display()))?;
    let conversion = converter
        .convert(&pdf_data)
        .with_context(|| format!("failed to convert {}", path.display()))?;

    for page in &conversion.skipped_pages {
        eprintln!("Warning: {}: page {page} left empty", path.display());
    }

    let written = match (&args.outfile, &args.output_dir) {
        (Some(outfile), _) => {
            std::fs::write(outfile, &conversion.bytes)
                .with_context(|| format!("failed to write {}", outfile.display()))?;
            outfile.clone()
        }
        (None, Some(dir)) => write_artifact(&conversion.bytes, dir)
            .with_context(|| format!("failed to write into {}", dir.display()))?,
        (None, None) => {
            let outfile = default_outfile(path);
            std::fs::write(&outfile, &conversion.bytes)
                .with_context(|| format!("failed to write {}", outfile.display()))?;
            outfile
        }
    };

    tracing::info!(
        input = %path.display(),
        output = %written.display(),
        pages = conversion.pages,
        "workbook written"
    );
    Ok(written)
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.debug);

    if args.outfile.is_some() && args.files.len() > 1 {
        bail!("-o/--outfile accepts a single input; use -O/--output-dir for several");
    }

    let converter = Converter::new(args.convert_options());

    for path in &args.files {
        if !path.exists() {
            eprintln!("Error: File not found: {}", path.display());
            std::process::exit(1);
        }

        match process_file(path, &converter, &args) {
            Ok(written) => println!("{}", written.display()),
            Err(e) => {
                eprintln!("Error processing {}: {e:#}", path.display());
                std::process::exit(1);
            }
        }
    }

    Ok(())
}

//! dumpops - Dump the assembled content stream operations of PDF pages
//!
//! A command line tool for inspecting what the extractor sees: every
//! operator with its operands, as text lines or JSON.

use anyhow::{Context, Result};
use clap::{ArgAction, Parser};
use pdfsheet_core::document::{LopdfSource, PageContent, PageSource};
use pdfsheet_core::extract::decode_text;
use pdfsheet_core::model::{Operand, Operation};
use pdfsheet_core::parser::OperationParser;
use serde_json::{Map, Value, json};
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "dumpops")]
#[command(author, version, about = "Dump PDF content stream operations", long_about = None)]
struct Args {
    /// One or more paths to PDF files
    #[arg(required = true)]
    files: Vec<PathBuf>,

    /// Use debug logging level
    #[arg(short = 'd', long, action = ArgAction::SetTrue)]
    debug: bool,

    /// Comma-separated page numbers to dump (1-indexed)
    #[arg(short = 'p', long = "pages")]
    pages: Option<String>,

    /// Emit JSON instead of text lines
    #[arg(short = 'j', long, action = ArgAction::SetTrue)]
    json: bool,

    /// Write the raw decoded content stream instead of operations
    #[arg(short = 'r', long, action = ArgAction::SetTrue, conflicts_with = "json")]
    raw: bool,

    /// Output file name (default: stdout)
    #[arg(short = 'o', long, default_value = "-")]
    outfile: String,
}

/// Parse the page filter, ignoring entries that are not numbers.
fn parse_pages(spec: Option<&str>) -> Option<Vec<usize>> {
    let nums: Vec<usize> = spec?
        .split(',')
        .filter_map(|s| s.trim().parse::<usize>().ok())
        .collect();
    (!nums.is_empty()).then_some(nums)
}

/// JSON form of an operand. Strings carry both decoded text and hex bytes.
fn operand_json(operand: &Operand) -> Value {
    match operand {
        Operand::Int(n) => json!(n),
        Operand::Real(n) => json!(n),
        Operand::Bool(b) => json!(b),
        Operand::Null => Value::Null,
        Operand::Name(name) => json!({ "name": name }),
        Operand::String(bytes) => json!({
            "string": decode_text(bytes),
            "hex": bytes.iter().map(|b| format!("{b:02x}")).collect::<String>(),
        }),
        Operand::Array(items) => Value::Array(items.iter().map(operand_json).collect()),
        Operand::Dict(dict) => {
            let mut map = Map::new();
            for (key, value) in dict {
                map.insert(key.clone(), operand_json(value));
            }
            Value::Object(map)
        }
        Operand::InlineData(data) => json!({ "inline_data": data.len() }),
    }
}

fn operation_json(op: &Operation) -> Value {
    json!({
        "pos": op.pos,
        "operator": op.operator.to_string(),
        "operands": op.operands.iter().map(operand_json).collect::<Vec<_>>(),
    })
}

fn dump_page<W: Write>(out: &mut W, content: &PageContent, args: &Args) -> Result<()> {
    if args.raw {
        out.write_all(&content.data)?;
        writeln!(out)?;
        return Ok(());
    }

    let mut ops = Vec::new();
    let mut error = None;
    for result in OperationParser::new(&content.data) {
        match result {
            Ok(op) => ops.push(op),
            Err(e) => {
                error = Some(e);
                break;
            }
        }
    }

    if args.json {
        let value = json!({
            "page": content.page,
            "operations": ops.iter().map(operation_json).collect::<Vec<_>>(),
            "error": error.as_ref().map(ToString::to_string),
        });
        serde_json::to_writer(&mut *out, &value)?;
        writeln!(out)?;
        return Ok(());
    }

    writeln!(out, "% page {}", content.page)?;
    for op in &ops {
        writeln!(out, "{:>8}: {op}", op.pos)?;
    }
    if let Some(e) = error {
        writeln!(out, "% error: {e}")?;
    }
    Ok(())
}

fn dump_file<W: Write>(out: &mut W, path: &Path, args: &Args) -> Result<()> {
    let data = std::fs::read(path).with_context(|| format!("failed to read {}", path.display()))?;
    let pages = LopdfSource
        .pages(&data)
        .with_context(|| format!("failed to load {}", path.display()))?;
    let wanted = parse_pages(args.pages.as_deref());

    for content in &pages {
        if let Some(ref nums) = wanted
            && !nums.contains(&content.page)
        {
            continue;
        }
        dump_page(out, content, args)?;
    }
    Ok(())
}

fn main() -> Result<()> {
    let args = Args::parse();

    let default = if args.debug { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default)))
        .with_writer(io::stderr)
        .init();

    let mut out: Box<dyn Write> = if args.outfile == "-" {
        Box::new(BufWriter::new(io::stdout()))
    } else {
        let file = File::create(&args.outfile)
            .with_context(|| format!("failed to create output file {}", args.outfile))?;
        Box::new(BufWriter::new(file))
    };

    for path in &args.files {
        dump_file(&mut out, path, &args)?;
    }
    out.flush()?;

    Ok(())
}

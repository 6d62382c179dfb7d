use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::Parser;
use thiserror::Error;
use tracing::info;

use crate::process::{Summary, highlight_document};
use docmark_stem::Keywords;
use docmark_types::{DocumentFormat, UnsupportedFormat};

/// Largest accepted input, in bytes (50 MiB).
pub const DEFAULT_MAX_INPUT_BYTES: u64 = 52_428_800;
pub const MAX_INPUT_ENV: &str = "DOCMARK_MAX_INPUT_BYTES";
const OUTPUT_PREFIX: &str = "Processed_";

#[derive(Debug, Parser)]
#[command(name = "docmark")]
#[command(about = "Highlight stemmed keywords in PDF and HTML documents")]
pub struct Cli {
    /// Comma-separated keyword phrases.
    #[arg(short, long)]
    pub keywords: String,
    /// Document to highlight.
    pub input: PathBuf,
    /// Where to write the result. Defaults to `Processed_<name>` beside the input.
    #[arg(short, long)]
    pub output: Option<PathBuf>,
    /// Override the format implied by the input extension (`pdf`, `html`).
    #[arg(short, long)]
    pub format: Option<String>,
    /// Print a JSON summary of what was highlighted.
    #[arg(long, default_value_t = false)]
    pub summary: bool,
}

#[derive(Debug, Error)]
pub enum InputError {
    #[error("{} is empty", .0.display())]
    Empty(PathBuf),
    #[error("{} is {size} bytes, over the {limit} byte limit", .path.display())]
    TooLarge { path: PathBuf, size: u64, limit: u64 },
    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// `--format` when given, otherwise the input's extension.
pub fn resolve_format(
    input: &Path,
    explicit: Option<&str>,
) -> Result<DocumentFormat, UnsupportedFormat> {
    match explicit {
        Some(tag) => tag.parse(),
        None => {
            let ext = input.extension().and_then(|e| e.to_str()).unwrap_or("");
            DocumentFormat::from_extension(ext)
        }
    }
}

pub fn output_path(input: &Path) -> PathBuf {
    let name = input
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    input.with_file_name(format!("{OUTPUT_PREFIX}{name}"))
}

/// Input size limit, from `DOCMARK_MAX_INPUT_BYTES` when it parses.
pub fn max_input_bytes() -> u64 {
    env::var(MAX_INPUT_ENV)
        .ok()
        .and_then(|v| v.trim().parse::<u64>().ok())
        .unwrap_or(DEFAULT_MAX_INPUT_BYTES)
}

/// Read the whole input, refusing empty files and files over `limit`.
pub fn read_input(path: &Path, limit: u64) -> Result<Vec<u8>, InputError> {
    let io_error = |source| InputError::Io {
        path: path.to_path_buf(),
        source,
    };
    let size = fs::metadata(path).map_err(io_error)?.len();
    if size == 0 {
        return Err(InputError::Empty(path.to_path_buf()));
    }
    if size > limit {
        return Err(InputError::TooLarge {
            path: path.to_path_buf(),
            size,
            limit,
        });
    }
    fs::read(path).map_err(io_error)
}

/// Validate, highlight and write one document.
pub fn run(cli: &Cli) -> anyhow::Result<Summary> {
    let keywords = Keywords::parse(&cli.keywords)?;
    let format = resolve_format(&cli.input, cli.format.as_deref())?;
    let input = read_input(&cli.input, max_input_bytes())?;

    let processed = highlight_document(&input, &keywords, format)
        .with_context(|| format!("failed to highlight {}", cli.input.display()))?;

    let output = cli
        .output
        .clone()
        .unwrap_or_else(|| output_path(&cli.input));
    fs::write(&output, &processed.bytes)
        .with_context(|| format!("failed to write {}", output.display()))?;
    info!("wrote {}", output.display());
    Ok(processed.summary)
}

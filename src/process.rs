use docmark_pdf::PdfEngine;
use docmark_stem::Keywords;
use docmark_types::DocumentFormat;
use scraper::Html;
use serde::Serialize;
use tracing::info;

use crate::error::ProcessError;
use crate::markup::{MarkupReport, highlight_markup};
use crate::paginated::{PaginatedReport, highlight_pages};

/// What one call did to the document.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "format", rename_all = "lowercase")]
pub enum Summary {
    Paginated(PaginatedReport),
    Markup(MarkupReport),
}

#[derive(Debug, Clone)]
pub struct Processed {
    pub bytes: Vec<u8>,
    pub summary: Summary,
}

/// Highlight `keywords` in `input` and return the annotated document.
pub fn process(
    input: &[u8],
    keywords: &str,
    format: DocumentFormat,
) -> Result<Vec<u8>, ProcessError> {
    process_with_summary(input, keywords, format).map(|processed| processed.bytes)
}

pub fn process_with_summary(
    input: &[u8],
    keywords: &str,
    format: DocumentFormat,
) -> Result<Processed, ProcessError> {
    let keywords = Keywords::parse(keywords)?;
    highlight_document(input, &keywords, format)
}

/// Like [`process_with_summary`], with the format given as a tag
/// (`paginated`, `markup`) or a file extension (`pdf`, `html`, `htm`).
///
/// Keywords are checked first, so blank keywords win over a bad tag.
pub fn process_tagged(input: &[u8], keywords: &str, tag: &str) -> Result<Processed, ProcessError> {
    let keywords = Keywords::parse(keywords)?;
    let format: DocumentFormat = tag.parse()?;
    highlight_document(input, &keywords, format)
}

/// Parse, highlight and serialize one document.
///
/// Nothing is returned unless every step succeeds.
pub fn highlight_document(
    input: &[u8],
    keywords: &Keywords,
    format: DocumentFormat,
) -> Result<Processed, ProcessError> {
    let processed = match format {
        DocumentFormat::Paginated => {
            let engine = PdfEngine::bind().map_err(|e| ProcessError::Engine(e.to_string()))?;
            let mut doc = engine
                .load(input)
                .map_err(|e| ProcessError::Parse(e.to_string()))?;
            let report = highlight_pages(&mut doc, &keywords.flat_stems());
            let bytes = doc
                .into_bytes()
                .map_err(|e| ProcessError::Serialize(e.to_string()))?;
            Processed {
                bytes,
                summary: Summary::Paginated(report),
            }
        }
        DocumentFormat::Markup => {
            let source = decode_markup(input)?;
            let mut html = Html::parse_document(&source);
            let report = highlight_markup(&mut html, keywords)?;
            Processed {
                bytes: html.html().into_bytes(),
                summary: Summary::Markup(report),
            }
        }
    };
    info!(
        "processed {format} document: {} bytes in, {} bytes out",
        input.len(),
        processed.bytes.len()
    );
    Ok(processed)
}

/// Markup is read as UTF-8; a leading byte order mark is dropped.
fn decode_markup(input: &[u8]) -> Result<String, ProcessError> {
    let (text, _, had_errors) = encoding_rs::UTF_8.decode(input);
    if had_errors {
        return Err(ProcessError::Parse("markup is not valid UTF-8".to_string()));
    }
    Ok(text.into_owned())
}

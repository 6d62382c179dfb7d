//! PDF pages that can be searched for text and drawn on, backed by PDFium.
//!
//! [`PdfEngine`] binds the PDFium shared library once per call site; every
//! [`PdfDocument`] it loads borrows it. Text search goes through PDFium's own
//! page text layer, so font encodings and positioning are PDFium's concern.
//! Drawn rectangles become filled path objects on the page and are kept when
//! the document is saved.
//!
//! The library is looked up in the directory named by `DOCMARK_PDFIUM_DIR`
//! (default: the working directory), then in the system library path.
//!
//! # Example
//! ```no_run
//! use docmark_pdf::PdfEngine;
//! use docmark_types::{PageSurface, PaginatedDocument, Rgb};
//!
//! # fn main() -> Result<(), docmark_pdf::PdfError> {
//! let bytes = std::fs::read("report.pdf").unwrap();
//! let engine = PdfEngine::bind()?;
//! let mut doc = engine.load(&bytes)?;
//! for page in doc.pages_mut() {
//!     for rect in page.find_text("Курсов").unwrap_or_default() {
//!         page.draw_rect(rect, Rgb::RED);
//!     }
//! }
//! let out = doc.into_bytes()?;
//! # let _ = out;
//! # Ok(()) }
//! ```

use std::env;

use docmark_types::{PageSurface, PaginatedDocument, Rect, Rgb, SearchError};
use pdfium_render::prelude::{
    PdfColor, PdfDocument as PdfiumDocument, PdfPage as PdfiumPage, PdfPageObjectsCommon, PdfRect, PdfSearchDirection,
    PdfSearchOptions, Pdfium, PdfiumError,
};
use thiserror::Error;
use tracing::{debug, info, warn};

/// Directory holding the PDFium shared library.
pub const PDFIUM_DIR_ENV: &str = "DOCMARK_PDFIUM_DIR";

#[derive(Debug, Error)]
pub enum PdfError {
    #[error("failed to bind pdfium library: {0}")]
    Bind(#[source] PdfiumError),
    #[error("failed to load pdf: {0}")]
    Load(#[source] PdfiumError),
    #[error("failed to save pdf: {0}")]
    Save(#[source] PdfiumError),
}

/// A bound PDFium library.
pub struct PdfEngine {
    pdfium: Pdfium,
}

impl PdfEngine {
    pub fn bind() -> Result<Self, PdfError> {
        let dir = env::var(PDFIUM_DIR_ENV).unwrap_or_else(|_| "./".to_string());
        let bindings = Pdfium::bind_to_library(Pdfium::pdfium_platform_library_name_at_path(&dir))
            .or_else(|_| Pdfium::bind_to_system_library())
            .map_err(PdfError::Bind)?;
        Ok(Self {
            pdfium: Pdfium::new(bindings),
        })
    }

    pub fn load<'a>(&'a self, bytes: &'a [u8]) -> Result<PdfDocument<'a>, PdfError> {
        let doc = self
            .pdfium
            .load_pdf_from_byte_slice(bytes, None)
            .map_err(PdfError::Load)?;
        let doc_pages = doc.pages();
        let pages: Vec<PdfPage<'a>> = doc_pages
            .as_range()
            .map_while(|i| doc_pages.get(i).ok())
            .enumerate()
            .map(|(index, page)| PdfPage::new(index, page))
            .collect();
        info!("loaded pdf with {} pages", pages.len());
        Ok(PdfDocument { pages, doc })
    }
}

/// A loaded PDF and its open pages.
pub struct PdfDocument<'a> {
    // Declared first so pages close before their document.
    pages: Vec<PdfPage<'a>>,
    doc: PdfiumDocument<'a>,
}

impl<'a> PdfDocument<'a> {
    pub fn pages(&self) -> &[PdfPage<'a>] {
        &self.pages
    }

    /// Serialize the document with everything drawn so far.
    pub fn into_bytes(self) -> Result<Vec<u8>, PdfError> {
        let Self { pages, doc } = self;
        let marks: usize = pages.iter().map(|p| p.marks.len()).sum();
        drop(pages);
        let out = doc.save_to_bytes().map_err(PdfError::Save)?;
        debug!("saved pdf with {marks} marks, {} bytes", out.len());
        Ok(out)
    }
}

impl<'a> PaginatedDocument for PdfDocument<'a> {
    type Page = PdfPage<'a>;

    fn pages_mut(&mut self) -> &mut [PdfPage<'a>] {
        &mut self.pages
    }
}

/// One page plus the marks drawn on it.
pub struct PdfPage<'a> {
    index: usize,
    height: f32,
    page: PdfiumPage<'a>,
    marks: Vec<(Rect, Rgb)>,
}

impl<'a> PdfPage<'a> {
    fn new(index: usize, page: PdfiumPage<'a>) -> Self {
        Self {
            index,
            height: page.height().value,
            page,
            marks: Vec::new(),
        }
    }

    /// 0-based position in the document.
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn text(&self) -> Option<String> {
        self.page.text().ok().map(|text| text.all())
    }

    pub fn marks(&self) -> &[(Rect, Rgb)] {
        &self.marks
    }
}

impl PageSurface for PdfPage<'_> {
    /// One rectangle per matched line segment; a match that wraps onto the
    /// next line yields one rectangle for each line.
    fn find_text(&self, needle: &str) -> Result<Vec<Rect>, SearchError> {
        if needle.is_empty() {
            return Err(SearchError::EmptyTerm);
        }
        let text = self
            .page
            .text()
            .map_err(|e| SearchError::TextUnavailable(e.to_string()))?;
        let options = PdfSearchOptions::new()
            .match_case(true)
            .match_whole_word(false);
        let search = text
            .search(needle, &options)
            .map_err(|e| SearchError::Internal(e.to_string()))?;

        let mut hits = Vec::new();
        for segments in search.iter(PdfSearchDirection::SearchForward) {
            hits.extend(
                segments
                    .iter()
                    .map(|segment| to_page_space(&segment.bounds(), self.height)),
            );
        }
        Ok(hits)
    }

    fn draw_rect(&mut self, rect: Rect, color: Rgb) {
        let fill = PdfColor::new(color.r, color.g, color.b, 255);
        let bounds = to_user_space(&rect, self.height);
        match self
            .page
            .objects_mut()
            .create_path_object_rect(bounds, None, None, Some(fill))
        {
            Ok(_) => self.marks.push((rect, color)),
            Err(err) => warn!("page {}: failed to draw {rect:?}: {err}", self.index),
        }
    }
}

/// PDF user space (bottom-left origin) to page space (top-left origin).
fn to_page_space(bounds: &PdfRect, page_height: f32) -> Rect {
    Rect::from_corners(
        bounds.left().value,
        page_height - bounds.top().value,
        bounds.right().value,
        page_height - bounds.bottom().value,
    )
}

fn to_user_space(rect: &Rect, page_height: f32) -> PdfRect {
    PdfRect::new_from_values(
        page_height - rect.bottom(),
        rect.x,
        page_height - rect.y,
        rect.right(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_space_flips_to_top_left_origin() {
        // A 12pt line of text near the top of an A4 page.
        let bounds = PdfRect::new_from_values(700.0, 72.0, 712.0, 108.0);
        let rect = to_page_space(&bounds, 842.0);
        assert_eq!(rect, Rect::new(72.0, 130.0, 36.0, 12.0));
    }

    #[test]
    fn page_space_maps_back_to_user_space() {
        let underline = Rect::new(72.0, 139.0, 36.0, 3.0);
        let bounds = to_user_space(&underline, 842.0);
        assert_eq!(bounds.left().value, 72.0);
        assert_eq!(bounds.right().value, 108.0);
        assert_eq!(bounds.bottom().value, 700.0);
        assert_eq!(bounds.top().value, 703.0);
        assert_eq!(to_page_space(&bounds, 842.0), underline);
    }
}

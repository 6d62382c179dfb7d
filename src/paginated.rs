use docmark_stem::case_variants;
use docmark_types::{PageSurface, PaginatedDocument, Rect, Rgb};
use serde::Serialize;
use tracing::{debug, info, warn};

pub const UNDERLINE_HEIGHT: f32 = 3.0;
pub const UNDERLINE_OFFSET: f32 = 3.0;
pub const UNDERLINE_COLOR: Rgb = Rgb::RED;

/// A rectangle drawn under one occurrence of a search term.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Mark {
    /// 0-based page index.
    pub page: usize,
    pub term: String,
    pub rect: Rect,
}

/// A term whose search failed on one page and was passed over.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SkippedTerm {
    pub page: usize,
    pub term: String,
    pub reason: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PaginatedReport {
    pub marks: Vec<Mark>,
    pub skipped: Vec<SkippedTerm>,
}

/// Thin bar along the bottom edge of a match, full match width.
pub fn underline(bounds: &Rect) -> Rect {
    Rect::new(
        bounds.x,
        bounds.bottom() - UNDERLINE_OFFSET,
        bounds.width,
        UNDERLINE_HEIGHT,
    )
}

/// Underline every occurrence of every stem, page by page.
///
/// Each stem is searched in all of its case renderings, as a plain substring,
/// so a stem also matches inside longer inflected words. Overlapping hits
/// each get their own mark. A search that fails is recorded in
/// [`PaginatedReport::skipped`] and the walk continues with the next term.
pub fn highlight_pages<D: PaginatedDocument>(doc: &mut D, stems: &[&str]) -> PaginatedReport {
    let terms: Vec<String> = stems.iter().flat_map(|s| case_variants(s)).collect();
    let mut report = PaginatedReport::default();

    for (index, page) in doc.pages_mut().iter_mut().enumerate() {
        for term in &terms {
            let hits = match page.find_text(term) {
                Ok(hits) => hits,
                Err(err) => {
                    warn!("page {index}: skipping term {term:?}: {err}");
                    report.skipped.push(SkippedTerm {
                        page: index,
                        term: term.clone(),
                        reason: err.to_string(),
                    });
                    continue;
                }
            };
            for bounds in hits {
                let rect = underline(&bounds);
                page.draw_rect(rect, UNDERLINE_COLOR);
                debug!("page {index}: marked {term:?} at {rect:?}");
                report.marks.push(Mark {
                    page: index,
                    term: term.clone(),
                    rect,
                });
            }
        }
    }

    info!(
        "drew {} marks for {} search terms ({} skipped)",
        report.marks.len(),
        terms.len(),
        report.skipped.len()
    );
    report
}

//! Shared types for locating and marking text inside documents.
//!
//! Geometry uses a top-left origin with `y` growing downward, in the page's
//! own units (points for PDF). Backends convert to and from their native
//! coordinate space at the edge.
//!
//! The paginated highlighter never talks to a concrete PDF library; it is
//! generic over [`PaginatedDocument`] and [`PageSurface`], which is also what
//! lets tests drive it with in-memory pages.
//!
//! ```rust
//! use docmark_types::{DocumentFormat, Rect};
//!
//! let fmt: DocumentFormat = "pdf".parse().unwrap();
//! assert_eq!(fmt, DocumentFormat::Paginated);
//!
//! let r = Rect::new(10.0, 20.0, 30.0, 12.0);
//! assert_eq!(r.bottom(), 32.0);
//! ```

use std::fmt;
use std::str::FromStr;

use serde::Serialize;
use thiserror::Error;

/// Axis-aligned rectangle in page space (top-left origin, y down).
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Build from two opposite corners in any order.
    pub fn from_corners(x0: f32, y0: f32, x1: f32, y1: f32) -> Self {
        Self {
            x: x0.min(x1),
            y: y0.min(y1),
            width: (x1 - x0).abs(),
            height: (y1 - y0).abs(),
        }
    }

    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }
}

/// 8-bit RGB fill colour.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Serialize)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const RED: Rgb = Rgb { r: 255, g: 0, b: 0 };
}

/// The two document families that can be highlighted.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentFormat {
    /// Paged layout documents (PDF).
    Paginated,
    /// Tree-structured markup documents (HTML).
    Markup,
}

impl DocumentFormat {
    /// Map a file extension (with or without the leading dot) to a format.
    pub fn from_extension(ext: &str) -> Result<Self, UnsupportedFormat> {
        let trimmed = ext.trim().trim_start_matches('.');
        match trimmed.to_ascii_lowercase().as_str() {
            "pdf" => Ok(DocumentFormat::Paginated),
            "html" | "htm" => Ok(DocumentFormat::Markup),
            _ => Err(UnsupportedFormat(ext.to_string())),
        }
    }
}

impl FromStr for DocumentFormat {
    type Err = UnsupportedFormat;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "paginated" => Ok(DocumentFormat::Paginated),
            "markup" => Ok(DocumentFormat::Markup),
            _ => DocumentFormat::from_extension(s),
        }
    }
}

impl fmt::Display for DocumentFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            DocumentFormat::Paginated => "paginated",
            DocumentFormat::Markup => "markup",
        })
    }
}

/// A format tag that names neither supported family.
#[derive(Clone, Debug, Eq, PartialEq, Error)]
#[error("format not supported: {0:?}")]
pub struct UnsupportedFormat(pub String);

/// Failure of a single text search on one page.
#[derive(Clone, Debug, Eq, PartialEq, Error)]
pub enum SearchError {
    #[error("empty search term")]
    EmptyTerm,
    #[error("page text unavailable: {0}")]
    TextUnavailable(String),
    #[error("search failed: {0}")]
    Internal(String),
}

/// One page that can be searched for text and drawn on.
pub trait PageSurface {
    /// Case-sensitive substring search (not whole-word) over the page text.
    /// Returns the bounding rectangle of every non-overlapping occurrence.
    fn find_text(&self, needle: &str) -> Result<Vec<Rect>, SearchError>;

    /// Paint a filled rectangle over the page content.
    fn draw_rect(&mut self, rect: Rect, color: Rgb);
}

/// An ordered set of pages owned by one highlighting call.
pub trait PaginatedDocument {
    type Page: PageSurface;

    fn pages_mut(&mut self) -> &mut [Self::Page];
}

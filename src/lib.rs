pub mod cli;
pub mod error;
pub mod markup;
pub mod paginated;
pub mod process;

pub use error::ProcessError;
pub use markup::{MarkupReport, highlight_markup, phrase_pattern};
pub use paginated::{Mark, PaginatedReport, SkippedTerm, highlight_pages};
pub use process::{
    Processed, Summary, highlight_document, process, process_tagged, process_with_summary,
};

pub use docmark_stem::{KeywordError, Keywords};
pub use docmark_types::{DocumentFormat, UnsupportedFormat};

use docmark_stem::KeywordError;
use docmark_types::UnsupportedFormat;
use thiserror::Error;

/// Everything a highlighting call can fail with.
///
/// `InvalidArgument` and `NotSupported` are raised before the document is
/// touched; the rest abort the call without returning partial output.
#[derive(Debug, Error)]
pub enum ProcessError {
    #[error("invalid argument: {0}")]
    InvalidArgument(#[from] KeywordError),
    #[error(transparent)]
    NotSupported(#[from] UnsupportedFormat),
    #[error("failed to parse document: {0}")]
    Parse(String),
    #[error("failed to serialize document: {0}")]
    Serialize(String),
    #[error("failed to rebuild markup: {0}")]
    Markup(String),
    #[error("pdf engine unavailable: {0}")]
    Engine(String),
}

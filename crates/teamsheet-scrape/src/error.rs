//! Error types for teamsheet-scrape

use thiserror::Error;

/// Errors produced while fetching or parsing a source document.
///
/// These never cross an extractor boundary as hard errors; they are
/// converted to per-source entries in the harvest failure list.
#[derive(Error, Debug)]
pub enum ScrapeError {
    /// Transport-level failure (DNS, connect, timeout)
    #[error("request failed: {0}")]
    Network(String),

    /// The source answered with a non-success status
    #[error("unexpected status {status} from {url}")]
    Http { status: u16, url: String },

    /// Expected document structure was absent
    #[error("structure mismatch: {0}")]
    Parse(String),
}

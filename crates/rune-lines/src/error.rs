use thiserror::Error;

/// Errors raised while assembling lines from shaped runs.
///
/// Query operations never return these; passing an index outside a line to
/// a query is a caller bug and panics.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LayoutError {
    /// The log attribute array does not hold one entry per character plus a sentinel.
    #[error("expected {expected} log attrs (characters + 1), found {found}")]
    LogAttrsLength { expected: usize, found: usize },

    /// A byte range reaches past the end of the text.
    #[error("byte range {start}..{end} is outside text of length {len}")]
    RangeOutOfText { start: usize, end: usize, len: usize },

    /// A byte index falls inside a multi-byte character.
    #[error("byte index {0} is not on a character boundary")]
    NotCharBoundary(usize),

    /// The union of the runs' byte ranges does not match the line's range.
    #[error("runs cover bytes {run_start}..{run_end} but the line covers {start}..{end}")]
    RunCoverage {
        run_start: usize,
        run_end: usize,
        start: usize,
        end: usize,
    },

    /// The runs' character counts do not add up to the line's.
    #[error("runs hold {found} characters but the line holds {expected}")]
    CharCount { expected: usize, found: usize },
}

pub type Result<T> = std::result::Result<T, LayoutError>;

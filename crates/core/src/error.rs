//! Error types for the pdfsheet conversion pipeline.

use thiserror::Error;

/// A positioned failure while tokenizing or assembling a content stream.
///
/// `consumed` holds the bytes of the offending construct read before the
/// failure, for diagnostics.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{kind} at byte {pos}")]
pub struct LexError {
    pub pos: usize,
    pub kind: LexErrorKind,
    pub consumed: Vec<u8>,
}

impl LexError {
    pub fn new(pos: usize, kind: LexErrorKind, consumed: &[u8]) -> Self {
        Self {
            pos,
            kind,
            consumed: consumed.to_vec(),
        }
    }
}

/// What went wrong in a [`LexError`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LexErrorKind {
    #[error("unterminated literal string")]
    UnterminatedString,

    #[error("unterminated hex string")]
    UnterminatedHexString,

    #[error("invalid hex digit {0:#04x}")]
    InvalidHexDigit(u8),

    #[error("unterminated inline image data")]
    UnterminatedInlineData,

    #[error("unbalanced delimiter `{0}`")]
    UnbalancedDelimiter(&'static str),

    #[error("unterminated {0}")]
    UnterminatedComposite(&'static str),

    #[error("operator `{0}` inside {1}")]
    OperatorInComposite(String, &'static str),

    #[error("invalid number")]
    InvalidNumber,
}

/// Primary error type for conversion operations.
#[derive(Error, Debug)]
pub enum PdfError {
    #[error("page {page}: {source}")]
    Tokenize {
        page: usize,
        #[source]
        source: LexError,
    },

    #[error("document error: {0}")]
    Document(String),

    #[error("encrypted documents are not supported")]
    Encrypted,

    #[error("invalid sheet name {0:?}")]
    InvalidSheetName(String),

    #[error("invalid fill colour {0:?}, expected RRGGBB")]
    InvalidColor(String),

    #[error("row {got} out of sequence, expected {expected}")]
    InvalidRow { expected: u32, got: usize },

    #[error("unknown style id {0}")]
    UnknownStyle(u32),

    #[error("thread pool error: {0}")]
    ThreadPool(String),

    #[error("serialization error: {0}")]
    Serialization(String),

    #[error("zip error: {0}")]
    Zip(#[from] zip::result::ZipError),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<lopdf::Error> for PdfError {
    fn from(e: lopdf::Error) -> Self {
        PdfError::Document(e.to_string())
    }
}

/// Convenience Result type alias for PdfError.
pub type Result<T> = std::result::Result<T, PdfError>;

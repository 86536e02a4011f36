//! pdfsheet - PDF content-stream text extraction into styled spreadsheets.
//!
//! Pipeline: page bytes → [`parser::lexer`] → [`parser::operations`] →
//! [`extract`] → [`sheet::render`] → [`xlsx`].

pub mod api;
pub mod document;
pub mod error;
pub mod extract;
pub mod model;
pub mod parser;
pub mod sheet;
pub mod xlsx;

// Re-export high_level for convenience
pub use api::high_level;

pub use api::{Conversion, ConvertOptions, Converter, PageErrorPolicy, convert, write_artifact};
pub use error::{LexError, LexErrorKind, PdfError, Result};

//! High-level API module for PDF to spreadsheet conversion.
//!
//! # Example
//!
//! ```ignore
//! use pdfsheet_core::api::{ConvertOptions, Converter};
//!
//! let pdf_bytes = std::fs::read("document.pdf")?;
//! let conversion = Converter::new(ConvertOptions::default()).convert(&pdf_bytes)?;
//! std::fs::write("document.xlsx", &conversion.bytes)?;
//! ```

pub mod high_level;

// Re-export for convenience
pub use high_level::{
    Conversion, ConvertOptions, Converter, DEFAULT_FILL_COLOR, PageErrorPolicy, convert,
    write_artifact,
};

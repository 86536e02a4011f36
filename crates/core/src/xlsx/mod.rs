//! xlsx artifact writer.
//!
//! - `writer`: [`XlsxBuilder`], the [`SheetBuilder`](crate::sheet::SheetBuilder)
//!   that packages the workbook
//! - `parts`: XML part generators
//! - `escape`: XML escaping

pub mod escape;
mod parts;
pub mod writer;

pub use writer::{DEFAULT_SHEET_NAME, MAX_CELL_CHARS, MAX_COLUMNS, MAX_ROWS, XlsxBuilder};

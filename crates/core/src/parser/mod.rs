//! Content stream parsing modules.
//!
//! - `lexer`: byte-level tokenizer
//! - `operations`: groups tokens into operator + operands

pub mod lexer;
pub mod operations;

// Re-export main types for convenience
pub use lexer::{ContentLexer, Keyword, Token};
pub use operations::{OperationParser, parse_operations};

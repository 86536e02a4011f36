//! Text extraction from assembled operations.
//!
//! Text-show operators:
//! - Tj: show string
//! - ': move to next line and show string
//! - ": set word/char spacing, move to next line and show string
//! - TJ: show strings with individual glyph positioning
//!
//! [`TextOperators::Minimal`] recognizes `Tj` only. [`TextOperators::Extended`]
//! recognizes all four.

pub mod decode;

use crate::error::LexError;
use crate::model::{Operand, Operation};
use crate::parser::lexer::Keyword;
use crate::parser::operations::OperationParser;

pub use decode::decode_text;

/// Set of operators treated as text-show operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TextOperators {
    /// `Tj` with exactly one string operand
    #[default]
    Minimal,
    /// `Tj`, `'`, `"` and `TJ`
    Extended,
}

impl TextOperators {
    pub fn recognizes(self, keyword: &Keyword) -> bool {
        match self {
            TextOperators::Minimal => matches!(keyword, Keyword::Tj),
            TextOperators::Extended => matches!(
                keyword,
                Keyword::Tj | Keyword::Quote | Keyword::DoubleQuote | Keyword::TJ
            ),
        }
    }
}

/// Text recovered from one page.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PageText {
    /// 1-based page index
    pub page: usize,
    pub text: String,
}

impl PageText {
    pub fn new(page: usize, text: impl Into<String>) -> Self {
        Self {
            page,
            text: text.into(),
        }
    }
}

/// Counters collected while extracting a page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ExtractStats {
    /// Operations seen
    pub operations: usize,
    /// Text-show operations that contributed text
    pub shown: usize,
    /// Text-show operations skipped for an unexpected operand shape
    pub skipped: usize,
}

impl ExtractStats {
    pub fn merge(&mut self, other: &ExtractStats) {
        self.operations += other.operations;
        self.shown += other.shown;
        self.skipped += other.skipped;
    }
}

/// Accumulates the text of one page from its operations.
#[derive(Debug, Default)]
pub struct TextExtractor {
    operators: TextOperators,
    text: String,
    stats: ExtractStats,
}

impl TextExtractor {
    pub fn new(operators: TextOperators) -> Self {
        Self {
            operators,
            text: String::new(),
            stats: ExtractStats::default(),
        }
    }

    /// Feed the next operation in stream order.
    pub fn feed(&mut self, op: &Operation) {
        self.stats.operations += 1;
        if !self.operators.recognizes(&op.operator) {
            return;
        }

        match shown_bytes(op) {
            Some(bytes) => {
                self.text.push_str(&decode_text(&bytes));
                self.stats.shown += 1;
            }
            None => {
                self.stats.skipped += 1;
                let shape: Vec<&str> = op.operands.iter().map(Operand::type_name).collect();
                tracing::debug!(
                    operator = %op.operator,
                    operands = ?shape,
                    pos = op.pos,
                    "skipping text operator with unsupported operand shape"
                );
            }
        }
    }

    pub fn stats(&self) -> ExtractStats {
        self.stats
    }

    /// Finish the page and return its text.
    pub fn finish(self, page: usize) -> (PageText, ExtractStats) {
        (PageText::new(page, self.text), self.stats)
    }
}

/// String bytes painted by a recognized text operator, or None when the
/// operands do not have the expected shape.
fn shown_bytes(op: &Operation) -> Option<Vec<u8>> {
    match (&op.operator, op.operands.as_slice()) {
        (Keyword::Tj | Keyword::Quote, [text]) => text.as_string().map(<[u8]>::to_vec),
        (Keyword::DoubleQuote, [aw, ac, text])
            if aw.as_number().is_some() && ac.as_number().is_some() =>
        {
            text.as_string().map(<[u8]>::to_vec)
        }
        (Keyword::TJ, [array]) => {
            let mut bytes = Vec::new();
            for item in array.as_array()? {
                match item {
                    Operand::String(s) => bytes.extend_from_slice(s),
                    Operand::Int(_) | Operand::Real(_) => {}
                    _ => return None,
                }
            }
            Some(bytes)
        }
        _ => None,
    }
}

/// Tokenize, assemble and extract the text of one page's content stream.
///
/// Fails on the first malformed construct; nothing is extracted in that case.
pub fn extract_page_text(
    page: usize,
    content: &[u8],
    operators: TextOperators,
) -> Result<(PageText, ExtractStats), LexError> {
    let mut extractor = TextExtractor::new(operators);
    for op in OperationParser::new(content) {
        extractor.feed(&op?);
    }
    Ok(extractor.finish(page))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn op(operator: Keyword, operands: Vec<Operand>) -> Operation {
        Operation::new(operator, operands, 0)
    }

    #[test]
    fn test_minimal_ignores_extended_operators() {
        let mut extractor = TextExtractor::new(TextOperators::Minimal);
        extractor.feed(&op(Keyword::Quote, vec![Operand::String(b"x".to_vec())]));
        extractor.feed(&op(Keyword::Tj, vec![Operand::String(b"y".to_vec())]));
        let (text, stats) = extractor.finish(1);
        assert_eq!(text.text, "y");
        assert_eq!(stats.operations, 2);
        assert_eq!(stats.shown, 1);
        assert_eq!(stats.skipped, 0);
    }

    #[test]
    fn test_wrong_arity_is_skipped() {
        let mut extractor = TextExtractor::new(TextOperators::Minimal);
        extractor.feed(&op(Keyword::Tj, vec![]));
        extractor.feed(&op(
            Keyword::Tj,
            vec![Operand::String(b"a".to_vec()), Operand::String(b"b".to_vec())],
        ));
        extractor.feed(&op(Keyword::Tj, vec![Operand::Int(4)]));
        let (text, stats) = extractor.finish(3);
        assert_eq!(text, PageText::new(3, ""));
        assert_eq!(stats.skipped, 3);
    }

    #[test]
    fn test_tj_array_skips_on_foreign_element() {
        let mut extractor = TextExtractor::new(TextOperators::Extended);
        extractor.feed(&op(
            Keyword::TJ,
            vec![Operand::Array(vec![
                Operand::String(b"A".to_vec()),
                Operand::Name("oops".into()),
            ])],
        ));
        assert_eq!(extractor.stats().skipped, 1);
    }
}

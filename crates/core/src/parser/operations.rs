//! Operation assembler.
//!
//! Groups lexer tokens into [`Operation`]s: every operand preceding an
//! operator keyword belongs to that operator. Arrays and inline
//! dictionaries are collected into composite operands first.

use crate::error::{LexError, LexErrorKind};
use crate::model::{Operand, Operation};
use crate::parser::lexer::{ContentLexer, Token};
use indexmap::IndexMap;

/// Context frame for tracking array/dict construction
#[derive(Debug)]
enum Context {
    Array(usize, Vec<Operand>),
    Dict(usize, Vec<Operand>),
}

impl Context {
    const fn name(&self) -> &'static str {
        match self {
            Context::Array(..) => "array",
            Context::Dict(..) => "dictionary",
        }
    }

    const fn pos(&self) -> usize {
        match self {
            Context::Array(pos, _) | Context::Dict(pos, _) => *pos,
        }
    }
}

/// Parser turning a content stream into a sequence of operations.
pub struct OperationParser<'a> {
    data: &'a [u8],
    lexer: ContentLexer<'a>,
    /// Operands waiting for their operator
    operands: Vec<Operand>,
    /// Context stack for nested arrays/dicts
    context_stack: Vec<Context>,
    done: bool,
}

impl<'a> OperationParser<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self {
            data,
            lexer: ContentLexer::new(data),
            operands: Vec::new(),
            context_stack: Vec::new(),
            done: false,
        }
    }

    fn fail(&mut self, pos: usize, len: usize, kind: LexErrorKind) -> LexError {
        self.done = true;
        let end = (pos + len).min(self.data.len());
        LexError::new(pos, kind, &self.data[pos..end])
    }

    /// Push an operand to the innermost open context, or the accumulator
    fn push_operand(&mut self, operand: Operand) {
        match self.context_stack.last_mut() {
            Some(Context::Array(_, items)) | Some(Context::Dict(_, items)) => items.push(operand),
            None => self.operands.push(operand),
        }
    }

    /// Build dictionary from key-value pairs
    fn build_dict(items: Vec<Operand>) -> IndexMap<String, Operand> {
        let mut dict = IndexMap::new();
        let mut iter = items.into_iter();
        while let Some(key) = iter.next() {
            if let Operand::Name(name) = key
                && let Some(value) = iter.next()
            {
                dict.insert(name, value);
            }
        }
        dict
    }

    /// Get next operation
    pub fn next_operation(&mut self) -> Option<Result<Operation, LexError>> {
        if self.done {
            return None;
        }

        loop {
            let (pos, token) = match self.lexer.next_token() {
                Some(Ok(t)) => t,
                Some(Err(e)) => {
                    self.done = true;
                    return Some(Err(e));
                }
                None => {
                    self.done = true;
                    if let Some(open) = self.context_stack.pop() {
                        let pos = open.pos();
                        let len = self.data.len() - pos;
                        return Some(Err(self.fail(
                            pos,
                            len,
                            LexErrorKind::UnterminatedComposite(open.name()),
                        )));
                    }
                    if !self.operands.is_empty() {
                        tracing::trace!(
                            count = self.operands.len(),
                            "discarding trailing operands without operator"
                        );
                        self.operands.clear();
                    }
                    return None;
                }
            };

            match token {
                Token::ArrayStart => self.context_stack.push(Context::Array(pos, Vec::new())),
                Token::ArrayEnd => match self.context_stack.pop() {
                    Some(Context::Array(_, items)) => self.push_operand(Operand::Array(items)),
                    _ => {
                        return Some(Err(self.fail(
                            pos,
                            1,
                            LexErrorKind::UnbalancedDelimiter("]"),
                        )));
                    }
                },
                Token::DictStart => self.context_stack.push(Context::Dict(pos, Vec::new())),
                Token::DictEnd => match self.context_stack.pop() {
                    Some(Context::Dict(_, items)) => {
                        let dict = Self::build_dict(items);
                        self.push_operand(Operand::Dict(dict));
                    }
                    _ => {
                        return Some(Err(self.fail(
                            pos,
                            2,
                            LexErrorKind::UnbalancedDelimiter(">>"),
                        )));
                    }
                },
                Token::Operator(keyword) => {
                    if let Some(open) = self.context_stack.last() {
                        let kind = LexErrorKind::OperatorInComposite(keyword.to_string(), open.name());
                        let len = keyword.as_bytes().len();
                        return Some(Err(self.fail(pos, len, kind)));
                    }
                    let operands = std::mem::take(&mut self.operands);
                    return Some(Ok(Operation::new(keyword, operands, pos)));
                }
                Token::Int(n) => self.push_operand(Operand::Int(n)),
                Token::Real(n) => self.push_operand(Operand::Real(n)),
                Token::Bool(b) => self.push_operand(Operand::Bool(b)),
                Token::Null => self.push_operand(Operand::Null),
                Token::Name(name) => self.push_operand(Operand::Name(name)),
                Token::LiteralString(s) | Token::HexString(s) => {
                    self.push_operand(Operand::String(s))
                }
                Token::InlineData(data) => self.push_operand(Operand::InlineData(data)),
            }
        }
    }
}

impl Iterator for OperationParser<'_> {
    type Item = Result<Operation, LexError>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_operation()
    }
}

impl std::iter::FusedIterator for OperationParser<'_> {}

/// Parse a whole content stream, failing on the first malformed construct.
pub fn parse_operations(data: &[u8]) -> Result<Vec<Operation>, LexError> {
    OperationParser::new(data).collect()
}

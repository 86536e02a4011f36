//! Operand and operation types produced from content streams.

use crate::parser::lexer::Keyword;
use indexmap::IndexMap;
use std::fmt;

/// A typed operand attached to an [`Operation`].
#[derive(Debug, Clone, PartialEq)]
pub enum Operand {
    /// Integer value
    Int(i64),
    /// Real (floating point) value
    Real(f64),
    /// Boolean value
    Bool(bool),
    /// Null object
    Null,
    /// Name (e.g., /F1)
    Name(String),
    /// String bytes, from literal or hex form
    String(Vec<u8>),
    /// Array of operands
    Array(Vec<Self>),
    /// Inline dictionary, keys in source order
    Dict(IndexMap<String, Self>),
    /// Inline image data
    InlineData(Vec<u8>),
}

impl Operand {
    /// Get as string bytes
    pub fn as_string(&self) -> Option<&[u8]> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    /// Get as array
    pub fn as_array(&self) -> Option<&[Self]> {
        match self {
            Self::Array(items) => Some(items),
            _ => None,
        }
    }

    /// Get as a number, integers widened
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Int(n) => Some(*n as f64),
            Self::Real(n) => Some(*n),
            _ => None,
        }
    }

    /// Get the type name for diagnostics
    pub const fn type_name(&self) -> &'static str {
        match self {
            Self::Int(_) => "int",
            Self::Real(_) => "real",
            Self::Bool(_) => "bool",
            Self::Null => "null",
            Self::Name(_) => "name",
            Self::String(_) => "string",
            Self::Array(_) => "array",
            Self::Dict(_) => "dict",
            Self::InlineData(_) => "inline data",
        }
    }
}

impl fmt::Display for Operand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(n) => write!(f, "{n}"),
            Self::Real(n) => write!(f, "{n}"),
            Self::Bool(b) => write!(f, "{b}"),
            Self::Null => f.write_str("null"),
            Self::Name(name) => write!(f, "/{name}"),
            Self::String(bytes) => {
                f.write_str("<")?;
                for b in bytes {
                    write!(f, "{b:02X}")?;
                }
                f.write_str(">")
            }
            Self::Array(items) => {
                f.write_str("[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(" ")?;
                    }
                    write!(f, "{item}")?;
                }
                f.write_str("]")
            }
            Self::Dict(entries) => {
                f.write_str("<<")?;
                for (key, value) in entries {
                    write!(f, " /{key} {value}")?;
                }
                f.write_str(" >>")
            }
            Self::InlineData(data) => write!(f, "<{} bytes of inline data>", data.len()),
        }
    }
}

/// An operator keyword with the operands that preceded it.
#[derive(Debug, Clone, PartialEq)]
pub struct Operation {
    pub operator: Keyword,
    pub operands: Vec<Operand>,
    /// Byte offset of the operator keyword
    pub pos: usize,
}

impl Operation {
    pub fn new(operator: Keyword, operands: Vec<Operand>, pos: usize) -> Self {
        Self {
            operator,
            operands,
            pos,
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for operand in &self.operands {
            write!(f, "{operand} ")?;
        }
        write!(f, "{}", self.operator)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_operand_accessors() {
        assert_eq!(Operand::String(b"ab".to_vec()).as_string(), Some(&b"ab"[..]));
        assert_eq!(Operand::Int(3).as_string(), None);
        assert_eq!(Operand::Int(3).as_number(), Some(3.0));
        assert_eq!(Operand::Real(-1.5).as_number(), Some(-1.5));
        assert_eq!(Operand::Array(vec![]).as_array(), Some(&[][..]));
        assert_eq!(Operand::Null.as_array(), None);
        assert_eq!(Operand::Name("F1".into()).type_name(), "name");
    }

    #[test]
    fn test_operation_display() {
        let op = Operation::new(
            Keyword::Tf,
            vec![Operand::Name("F1".into()), Operand::Int(12)],
            7,
        );
        assert_eq!(op.to_string(), "/F1 12 Tf");

        let op = Operation::new(
            Keyword::TJ,
            vec![Operand::Array(vec![
                Operand::String(b"A".to_vec()),
                Operand::Real(-120.5),
            ])],
            0,
        );
        assert_eq!(op.to_string(), "[<41> -120.5] TJ");
    }
}

//! Content stream tokenizer.
//!
//! Splits the raw bytes of a page content stream into [`Token`]s. The
//! lexer is a lazy iterator of `(offset, Token)` pairs; on the first
//! malformed construct it yields a [`LexError`] and then stops for good.

use crate::error::{LexError, LexErrorKind};

macro_rules! keywords {
    ($($(#[$meta:meta])* $variant:ident => $bytes:literal,)*) => {
        /// Content stream operator keyword. Known operators are
        /// zero-allocation variants; anything else keeps its bytes.
        #[derive(Debug, Clone, PartialEq, Eq, Hash)]
        pub enum Keyword {
            $($(#[$meta])* $variant,)*
            /// Unknown operator (preserves original bytes)
            Unknown(Vec<u8>),
        }

        impl Keyword {
            pub fn from_bytes(b: &[u8]) -> Self {
                match b {
                    $($bytes => Keyword::$variant,)*
                    other => Keyword::Unknown(other.to_vec()),
                }
            }

            pub fn as_bytes(&self) -> &[u8] {
                match self {
                    $(Keyword::$variant => $bytes,)*
                    Keyword::Unknown(bytes) => bytes.as_slice(),
                }
            }
        }
    };
}

keywords! {
    // Graphics state
    /// q - save graphics state
    Qq => b"q",
    /// Q - restore graphics state
    Q => b"Q",
    Cm => b"cm",
    Ww => b"w",
    J => b"J",
    Jj => b"j",
    M => b"M",
    D => b"d",
    Ri => b"ri",
    I => b"i",
    Gs => b"gs",

    // Path construction
    Mm => b"m",
    L => b"l",
    C => b"c",
    V => b"v",
    Y => b"y",
    H => b"h",
    Re => b"re",

    // Path painting
    S => b"S",
    Ss => b"s",
    F => b"F",
    Ff => b"f",
    FStar => b"f*",
    B => b"B",
    BStar => b"B*",
    Bb => b"b",
    BbStar => b"b*",
    N => b"n",

    // Clipping
    WClip => b"W",
    WStar => b"W*",

    // Text object
    BT => b"BT",
    ET => b"ET",

    // Text state
    Tc => b"Tc",
    Tw => b"Tw",
    Tz => b"Tz",
    TL => b"TL",
    Tf => b"Tf",
    Tr => b"Tr",
    Ts => b"Ts",

    // Text positioning
    Td => b"Td",
    TD => b"TD",
    Tm => b"Tm",
    TStar => b"T*",

    // Text showing
    Tj => b"Tj",
    TJ => b"TJ",
    /// ' - move to next line and show string
    Quote => b"'",
    /// " - set spacing, move to next line and show string
    DoubleQuote => b"\"",

    // Type3 glyphs
    D0 => b"d0",
    D1 => b"d1",

    // Colour
    CS => b"CS",
    Cs => b"cs",
    SC => b"SC",
    SCN => b"SCN",
    Sc => b"sc",
    Scn => b"scn",
    G => b"G",
    Gg => b"g",
    RG => b"RG",
    Rg => b"rg",
    K => b"K",
    Kk => b"k",

    // Shading and XObjects
    Sh => b"sh",
    Do => b"Do",

    // Inline image
    BI => b"BI",
    ID => b"ID",
    EI => b"EI",

    // Marked content
    MP => b"MP",
    DP => b"DP",
    BMC => b"BMC",
    BDC => b"BDC",
    EMC => b"EMC",

    // Compatibility
    BX => b"BX",
    EX => b"EX",
}

impl std::fmt::Display for Keyword {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&String::from_utf8_lossy(self.as_bytes()))
    }
}

/// Content stream token types
#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    /// Integer value
    Int(i64),
    /// Real value
    Real(f64),
    /// `true` / `false`
    Bool(bool),
    /// `null`
    Null,
    /// Name (e.g., /F1), hex escapes resolved
    Name(String),
    /// Literal string `( ... )`, escapes resolved
    LiteralString(Vec<u8>),
    /// Hex string `< ... >`, decoded
    HexString(Vec<u8>),
    ArrayStart,
    ArrayEnd,
    DictStart,
    DictEnd,
    /// Operator keyword (e.g., BT, Tj)
    Operator(Keyword),
    /// Raw inline image bytes between `ID` and `EI`
    InlineData(Vec<u8>),
}

/// Lexer for PDF content streams.
pub struct ContentLexer<'a> {
    data: &'a [u8],
    pos: usize,
    inline_pending: bool,
    done: bool,
}

impl<'a> ContentLexer<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self {
            data,
            pos: 0,
            inline_pending: false,
            done: false,
        }
    }

    fn is_whitespace(b: u8) -> bool {
        matches!(b, b' ' | b'\t' | b'\r' | b'\n' | b'\x00' | b'\x0c')
    }

    fn is_delimiter(b: u8) -> bool {
        matches!(
            b,
            b'(' | b')' | b'<' | b'>' | b'[' | b']' | b'{' | b'}' | b'/' | b'%'
        )
    }

    fn is_keyword_end(b: u8) -> bool {
        Self::is_whitespace(b) || Self::is_delimiter(b)
    }

    fn fail(&mut self, start: usize, kind: LexErrorKind) -> LexError {
        self.done = true;
        let end = self.pos.min(self.data.len());
        LexError::new(start, kind, &self.data[start..end])
    }

    /// Skip whitespace and comments
    fn skip_whitespace(&mut self) {
        let data = self.data;
        while self.pos < data.len() {
            let b = data[self.pos];
            if b == b'%' {
                self.pos += 1;
                match find_line_end(&data[self.pos..]) {
                    Some(offset) => self.pos += offset + 1,
                    None => self.pos = data.len(),
                }
                continue;
            }
            if !Self::is_whitespace(b) {
                return;
            }
            self.pos += 1;
        }
    }

    /// Parse a name (/Name)
    fn parse_name(&mut self) -> Token {
        let data = self.data;
        let mut pos = self.pos + 1; // skip '/'
        let mut name = Vec::with_capacity(16);

        while pos < data.len() {
            let b = data[pos];
            if Self::is_keyword_end(b) {
                break;
            }
            if b == b'#' {
                if let (Some(h1), Some(h2)) = (
                    data.get(pos + 1).copied().and_then(hex_value),
                    data.get(pos + 2).copied().and_then(hex_value),
                ) {
                    name.push((h1 << 4) | h2);
                    pos += 3;
                    continue;
                }
                // Invalid escape: drop the '#', keep what follows
                pos += 1;
                continue;
            }
            name.push(b);
            pos += 1;
        }

        self.pos = pos;
        Token::Name(name_from_bytes(&name))
    }

    /// Parse a number (integer or real)
    fn parse_number(&mut self) -> Result<Token, LexError> {
        let data = self.data;
        let start = self.pos;
        let mut pos = start;
        if matches!(data[pos], b'+' | b'-') {
            pos += 1;
        }

        let mut has_dot = false;
        while pos < data.len() {
            match data[pos] {
                b'0'..=b'9' => pos += 1,
                b'.' if !has_dot => {
                    has_dot = true;
                    pos += 1;
                }
                _ => break,
            }
        }
        self.pos = pos;

        // Only ASCII digits, sign and dot were consumed
        let text = std::str::from_utf8(&data[start..pos])
            .map_err(|_| self.fail(start, LexErrorKind::InvalidNumber))?;
        if !has_dot && let Ok(value) = text.parse::<i64>() {
            return Ok(Token::Int(value));
        }
        text.parse::<f64>()
            .map(Token::Real)
            .map_err(|_| self.fail(start, LexErrorKind::InvalidNumber))
    }

    /// Parse a literal string (...)
    fn parse_string(&mut self) -> Result<Token, LexError> {
        let data = self.data;
        let len = data.len();
        let start = self.pos;
        let mut pos = start + 1; // skip '('
        let mut depth = 1;
        let mut result = Vec::with_capacity(32);

        while pos < len {
            let c = data[pos];
            pos += 1;
            match c {
                b'(' => {
                    depth += 1;
                    result.push(b'(');
                }
                b')' => {
                    depth -= 1;
                    if depth == 0 {
                        self.pos = pos;
                        return Ok(Token::LiteralString(result));
                    }
                    result.push(b')');
                }
                b'\\' => {
                    if pos >= len {
                        break;
                    }
                    let esc = data[pos];
                    pos += 1;
                    match esc {
                        b'n' => result.push(b'\n'),
                        b'r' => result.push(b'\r'),
                        b't' => result.push(b'\t'),
                        b'b' => result.push(0x08),
                        b'f' => result.push(0x0c),
                        b'(' | b')' | b'\\' => result.push(esc),
                        b'\r' => {
                            // Line continuation, \r\n counts as one EOL
                            if pos < len && data[pos] == b'\n' {
                                pos += 1;
                            }
                        }
                        b'\n' => {}
                        b'0'..=b'7' => {
                            let mut octal = u32::from(esc - b'0');
                            for _ in 0..2 {
                                match data.get(pos) {
                                    Some(&d @ b'0'..=b'7') => {
                                        octal = octal * 8 + u32::from(d - b'0');
                                        pos += 1;
                                    }
                                    _ => break,
                                }
                            }
                            result.push((octal & 0xFF) as u8);
                        }
                        other => result.push(other),
                    }
                }
                other => result.push(other),
            }
        }

        self.pos = len;
        Err(self.fail(start, LexErrorKind::UnterminatedString))
    }

    /// Parse a hex string <...>
    ///
    /// An odd digit count is completed with a trailing zero nibble.
    fn parse_hex_string(&mut self) -> Result<Token, LexError> {
        let data = self.data;
        let start = self.pos;
        let mut pos = start + 1; // skip '<'
        let mut result = Vec::with_capacity(32);
        let mut pending: Option<u8> = None;

        while pos < data.len() {
            let c = data[pos];
            if c == b'>' {
                if let Some(high) = pending {
                    result.push(high << 4);
                }
                self.pos = pos + 1;
                return Ok(Token::HexString(result));
            }
            if let Some(nibble) = hex_value(c) {
                match pending.take() {
                    Some(high) => result.push((high << 4) | nibble),
                    None => pending = Some(nibble),
                }
            } else if !Self::is_whitespace(c) {
                self.pos = pos;
                return Err(self.fail(start, LexErrorKind::InvalidHexDigit(c)));
            }
            pos += 1;
        }

        self.pos = pos;
        Err(self.fail(start, LexErrorKind::UnterminatedHexString))
    }

    /// Parse an operator keyword (or true/false/null)
    fn parse_keyword(&mut self) -> Token {
        let start = self.pos;
        let end = self.data[start..]
            .iter()
            .position(|&b| Self::is_keyword_end(b))
            .map_or(self.data.len(), |offset| start + offset);
        self.pos = end;

        match &self.data[start..end] {
            b"true" => Token::Bool(true),
            b"false" => Token::Bool(false),
            b"null" => Token::Null,
            bytes => Token::Operator(Keyword::from_bytes(bytes)),
        }
    }

    /// Read inline image bytes following `ID` up to the `EI` keyword.
    ///
    /// `EI` only counts when preceded by whitespace and followed by
    /// whitespace, a delimiter or end of data.
    fn read_inline_data(&mut self) -> Result<(usize, Token), LexError> {
        let data = self.data;
        // A single whitespace byte separates ID from the data
        if self.pos < data.len() && Self::is_whitespace(data[self.pos]) {
            self.pos += 1;
        }
        let start = self.pos;
        let mut pos = start;
        while pos + 1 < data.len() {
            let at_boundary = pos == start || Self::is_whitespace(data[pos - 1]);
            let closes = data.get(pos + 2).is_none_or(|&b| Self::is_keyword_end(b));
            if at_boundary && data[pos] == b'E' && data[pos + 1] == b'I' && closes {
                self.pos = pos;
                let end = if pos == start { start } else { pos - 1 };
                let payload = data[start..end].to_vec();
                return Ok((start, Token::InlineData(payload)));
            }
            pos += 1;
        }

        self.pos = data.len();
        Err(self.fail(start, LexErrorKind::UnterminatedInlineData))
    }

    /// Get next token
    pub fn next_token(&mut self) -> Option<Result<(usize, Token), LexError>> {
        if self.done {
            return None;
        }
        if self.inline_pending {
            self.inline_pending = false;
            return Some(self.read_inline_data());
        }

        self.skip_whitespace();
        let data = self.data;
        if self.pos >= data.len() {
            self.done = true;
            return None;
        }

        let token_pos = self.pos;
        let next = data.get(self.pos + 1).copied();

        let result = match data[self.pos] {
            b'/' => Ok(self.parse_name()),
            b'(' => self.parse_string(),
            b')' => {
                self.pos += 1;
                Err(self.fail(token_pos, LexErrorKind::UnbalancedDelimiter(")")))
            }
            b'<' if next == Some(b'<') => {
                self.pos += 2;
                Ok(Token::DictStart)
            }
            b'<' => self.parse_hex_string(),
            b'>' if next == Some(b'>') => {
                self.pos += 2;
                Ok(Token::DictEnd)
            }
            b'>' => {
                self.pos += 1;
                Err(self.fail(token_pos, LexErrorKind::UnbalancedDelimiter(">")))
            }
            b'[' => {
                self.pos += 1;
                Ok(Token::ArrayStart)
            }
            b']' => {
                self.pos += 1;
                Ok(Token::ArrayEnd)
            }
            b'{' | b'}' => {
                self.pos += 1;
                Ok(Token::Operator(Keyword::from_bytes(&data[token_pos..self.pos])))
            }
            b'+' | b'-' => {
                let after = data.get(self.pos + 2).copied();
                let numeric = matches!(next, Some(c) if c.is_ascii_digit())
                    || (next == Some(b'.') && matches!(after, Some(c) if c.is_ascii_digit()));
                if numeric {
                    self.parse_number()
                } else {
                    Ok(self.parse_keyword())
                }
            }
            b'.' if matches!(next, Some(c) if c.is_ascii_digit()) => self.parse_number(),
            c if c.is_ascii_digit() => self.parse_number(),
            _ => Ok(self.parse_keyword()),
        };

        if let Ok(Token::Operator(Keyword::ID)) = &result {
            self.inline_pending = true;
        }

        Some(result.map(|token| (token_pos, token)))
    }
}

impl Iterator for ContentLexer<'_> {
    type Item = Result<(usize, Token), LexError>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_token()
    }
}

impl std::iter::FusedIterator for ContentLexer<'_> {}

fn hex_value(c: u8) -> Option<u8> {
    match c {
        b'0'..=b'9' => Some(c - b'0'),
        b'a'..=b'f' => Some(c - b'a' + 10),
        b'A'..=b'F' => Some(c - b'A' + 10),
        _ => None,
    }
}

fn find_line_end(data: &[u8]) -> Option<usize> {
    data.iter().position(|&b| b == b'\r' || b == b'\n')
}

pub(crate) fn name_from_bytes(bytes: &[u8]) -> String {
    bytes.iter().map(|&b| char::from(b)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keyword_from_bytes_known() {
        assert_eq!(Keyword::from_bytes(b"BT"), Keyword::BT);
        assert_eq!(Keyword::from_bytes(b"Tj"), Keyword::Tj);
        assert_eq!(Keyword::from_bytes(b"TJ"), Keyword::TJ);
        assert_eq!(Keyword::from_bytes(b"'"), Keyword::Quote);
        assert_eq!(Keyword::from_bytes(b"\""), Keyword::DoubleQuote);
        assert_eq!(Keyword::from_bytes(b"f*"), Keyword::FStar);
    }

    #[test]
    fn test_keyword_from_bytes_unknown() {
        assert_eq!(
            Keyword::from_bytes(b"notakeyword"),
            Keyword::Unknown(b"notakeyword".to_vec())
        );
        assert_eq!(Keyword::from_bytes(b""), Keyword::Unknown(vec![]));
    }

    #[test]
    fn test_keyword_as_bytes() {
        assert_eq!(Keyword::Tj.as_bytes(), b"Tj");
        assert_eq!(Keyword::TStar.as_bytes(), b"T*");
        assert_eq!(Keyword::Unknown(b"xyz".to_vec()).as_bytes(), b"xyz");
        assert_eq!(Keyword::Qq.to_string(), "q");
    }

    #[test]
    fn test_lexer_is_fused_after_error() {
        let mut lexer = ContentLexer::new(b") (ok) Tj");
        assert!(matches!(lexer.next(), Some(Err(_))));
        assert!(lexer.next().is_none());
        assert!(lexer.next().is_none());
    }
}

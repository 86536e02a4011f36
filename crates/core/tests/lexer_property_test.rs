//! Property tests for string tokenization and text extraction.

use pdfsheet_core::extract::{TextOperators, extract_page_text};
use pdfsheet_core::parser::{ContentLexer, Token};
use proptest::prelude::*;

/// Write bytes as a literal string, escaping the delimiters.
fn literal(bytes: &[u8]) -> Vec<u8> {
    let mut out = vec![b'('];
    for &b in bytes {
        if matches!(b, b'(' | b')' | b'\\') {
            out.push(b'\\');
        }
        out.push(b);
    }
    out.push(b')');
    out
}

/// A literal string body: escaped bytes or an unescaped balanced group.
#[derive(Debug, Clone)]
enum Segment {
    Bytes(Vec<u8>),
    Group(Vec<Segment>),
}

fn segments() -> impl Strategy<Value = Vec<Segment>> {
    let bytes = || proptest::collection::vec(any::<u8>(), 0..8).prop_map(Segment::Bytes);
    let segment = bytes().prop_recursive(4, 32, 4, move |inner| {
        prop_oneof![
            bytes(),
            proptest::collection::vec(inner, 0..4).prop_map(Segment::Group),
        ]
    });
    proptest::collection::vec(segment, 0..6)
}

/// Append the source form of `segments` and the bytes the lexer should
/// recover from it.
fn write_segments(segments: &[Segment], source: &mut Vec<u8>, expected: &mut Vec<u8>) {
    for segment in segments {
        match segment {
            Segment::Bytes(bytes) => {
                let escaped = literal(bytes);
                source.extend_from_slice(&escaped[1..escaped.len() - 1]);
                expected.extend_from_slice(bytes);
            }
            Segment::Group(inner) => {
                source.push(b'(');
                expected.push(b'(');
                write_segments(inner, source, expected);
                source.push(b')');
                expected.push(b')');
            }
        }
    }
}

fn single_token(data: &[u8]) -> Token {
    let tokens: Vec<Token> = ContentLexer::new(data)
        .map(|r| r.expect("tokenize").1)
        .collect();
    assert_eq!(tokens.len(), 1, "{tokens:?}");
    tokens.into_iter().next().expect("one token")
}

proptest! {
    #[test]
    fn literal_string_round_trips(bytes in proptest::collection::vec(any::<u8>(), 0..64)) {
        let token = single_token(&literal(&bytes));
        prop_assert_eq!(token, Token::LiteralString(bytes));
    }

    #[test]
    fn nested_parentheses_round_trip(body in segments()) {
        let mut source = vec![b'('];
        let mut expected = Vec::new();
        write_segments(&body, &mut source, &mut expected);
        source.push(b')');

        let token = single_token(&source);
        prop_assert_eq!(token, Token::LiteralString(expected));
    }

    #[test]
    fn hex_string_round_trips(bytes in proptest::collection::vec(any::<u8>(), 0..64), upper in any::<bool>()) {
        let digits = if upper { hex::encode_upper(&bytes) } else { hex::encode(&bytes) };
        let token = single_token(format!("<{digits}>").as_bytes());
        prop_assert_eq!(token, Token::HexString(bytes));
    }

    #[test]
    fn odd_hex_digit_padded_with_zero(bytes in proptest::collection::vec(any::<u8>(), 0..32), nibble in 0u8..16) {
        let digits = format!("{}{:X}", hex::encode(&bytes), nibble);
        let mut expected = bytes.clone();
        expected.push(nibble << 4);
        let token = single_token(format!("<{digits}>").as_bytes());
        prop_assert_eq!(token, Token::HexString(expected));
    }

    #[test]
    fn shown_text_concatenates_in_order(words in proptest::collection::vec("[a-zA-Z0-9 ]{0,12}", 0..8)) {
        let mut content = b"BT /F1 12 Tf".to_vec();
        for word in &words {
            content.push(b' ');
            content.extend_from_slice(&literal(word.as_bytes()));
            content.extend_from_slice(b" Tj");
        }
        content.extend_from_slice(b" ET");

        let (page, stats) = extract_page_text(1, &content, TextOperators::Minimal).expect("extract");
        prop_assert_eq!(page.text, words.concat());
        prop_assert_eq!(stats.shown, words.len());
    }

    #[test]
    fn lexer_never_panics(data in proptest::collection::vec(any::<u8>(), 0..256)) {
        for result in ContentLexer::new(&data) {
            if result.is_err() {
                break;
            }
        }
    }
}

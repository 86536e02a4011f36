//! XML escaping for spreadsheet parts.

/// Escape XML special characters for text and attribute content.
///
/// Characters XML 1.0 cannot carry, and `\r` which readers would
/// normalize to `\n`, are written in the spreadsheet `_xHHHH_` form, and literal `_xHHHH_` sequences get their underscore
/// escaped so readers do not decode them.
pub fn escape_xml(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for (i, c) in s.char_indices() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            '_' if looks_like_escape(&s[i..]) => out.push_str("_x005F_"),
            '\t' | '\n' => out.push(c),
            c if (c as u32) < 0x20 || c == '\u{FFFE}' || c == '\u{FFFF}' => {
                out.push_str(&format!("_x{:04X}_", c as u32));
            }
            c => out.push(c),
        }
    }
    out
}

/// True when `s` starts with `_xHHHH_`.
fn looks_like_escape(s: &str) -> bool {
    let b = s.as_bytes();
    b.len() >= 7
        && b[0] == b'_'
        && b[1] == b'x'
        && b[2..6].iter().all(u8::is_ascii_hexdigit)
        && b[6] == b'_'
}

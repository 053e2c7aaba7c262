//! Storage key escaping
//!
//! Table-style stores forbid a handful of characters inside key values. Sort keys are
//! written with each forbidden character replaced by a two-character placeholder that
//! starts with `!`, and `!` itself is doubled so the mapping is reversible:
//!
//! | literal | stored |
//! |---------|--------|
//! | `!`     | `!!`   |
//! | `/`     | `!f`   |
//! | `?`     | `!q`   |
//! | `\`     | `!b`   |
//! | `#`     | `!h`   |
//!
//! `unescape_key(escape_key(s)) == s` holds for every string. `unescape_key` is total:
//! an unknown `!x` pair or a trailing `!` is kept as written.

const ESCAPE_CHAR: char = '!';

/// (literal, placeholder code) pairs
const ESCAPES: [(char, char); 5] = [('!', '!'), ('/', 'f'), ('?', 'q'), ('\\', 'b'), ('#', 'h')];

fn code_for(literal: char) -> Option<char> {
    ESCAPES
        .iter()
        .find(|(lit, _)| *lit == literal)
        .map(|(_, code)| *code)
}

fn literal_for(code: char) -> Option<char> {
    ESCAPES
        .iter()
        .find(|(_, c)| *c == code)
        .map(|(lit, _)| *lit)
}

/// Returns true if `raw` contains any character that must be escaped
pub fn needs_escape(raw: &str) -> bool {
    raw.chars().any(|c| code_for(c).is_some())
}

/// Escapes a key value for storage
pub fn escape_key(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match code_for(c) {
            Some(code) => {
                out.push(ESCAPE_CHAR);
                out.push(code);
            }
            None => out.push(c),
        }
    }
    out
}

/// Restores the literal characters of a stored key value
pub fn unescape_key(stored: &str) -> String {
    let mut out = String::with_capacity(stored.len());
    let mut chars = stored.chars().peekable();

    while let Some(c) = chars.next() {
        if c != ESCAPE_CHAR {
            out.push(c);
            continue;
        }
        match chars.peek().copied().and_then(literal_for) {
            Some(literal) => {
                out.push(literal);
                chars.next();
            }
            None => out.push(c),
        }
    }
    out
}

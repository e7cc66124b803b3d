//! String preparation for usernames and passwords (RFC 4013).
//!
//! This is the querying profile: code points are mapped and the result is
//! NFKC-normalized, but nothing is prohibited or rejected. The engine
//! authenticates against an existing store, it never persists identifiers,
//! so unassigned code points and bidi anomalies are passed through for the
//! server to judge.

use unicode_normalization::UnicodeNormalization;

/// Prepares a username or password for use in an authentication exchange.
///
/// Applies the RFC 4013 mapping steps (non-ASCII space to space,
/// "commonly mapped to nothing" removed) followed by Unicode NFKC.
pub fn saslprep(input: &str) -> String {
    input.chars().filter_map(map_char).nfkc().collect()
}

fn map_char(c: char) -> Option<char> {
    if is_non_ascii_space(c) {
        Some(' ')
    } else if is_mapped_to_nothing(c) {
        None
    } else {
        Some(c)
    }
}

// RFC 3454 table C.1.2
fn is_non_ascii_space(c: char) -> bool {
    matches!(
        c,
        '\u{00A0}' | '\u{1680}' | '\u{2000}'..='\u{200B}' | '\u{202F}' | '\u{205F}' | '\u{3000}'
    )
}

// RFC 3454 table B.1, except U+200B which C.1.2 already maps to space
fn is_mapped_to_nothing(c: char) -> bool {
    matches!(
        c,
        '\u{00AD}'
            | '\u{034F}'
            | '\u{1806}'
            | '\u{180B}'..='\u{180D}'
            | '\u{200C}'
            | '\u{200D}'
            | '\u{2060}'
            | '\u{FE00}'..='\u{FE0F}'
            | '\u{FEFF}'
    )
}

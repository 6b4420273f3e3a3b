// Copyright 2026 the Parley Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! XHTML character references.

/// Longest entity accepted, in bytes, including the leading `&` and trailing `;`.
const MAX_ENTITY_LENGTH: usize = 10;

const NAMED_ENTITIES: &[(&str, char)] = &[
    ("amp", '&'),
    ("lt", '<'),
    ("gt", '>'),
    ("quot", '"'),
    ("apos", '\''),
    ("nbsp", '\u{a0}'),
    ("cent", '\u{a2}'),
    ("pound", '\u{a3}'),
    ("yen", '\u{a5}'),
    ("sect", '\u{a7}'),
    ("copy", '\u{a9}'),
    ("laquo", '\u{ab}'),
    ("reg", '\u{ae}'),
    ("deg", '\u{b0}'),
    ("plusmn", '\u{b1}'),
    ("para", '\u{b6}'),
    ("middot", '\u{b7}'),
    ("raquo", '\u{bb}'),
    ("times", '\u{d7}'),
    ("divide", '\u{f7}'),
    ("ndash", '\u{2013}'),
    ("mdash", '\u{2014}'),
    ("lsquo", '\u{2018}'),
    ("rsquo", '\u{2019}'),
    ("ldquo", '\u{201c}'),
    ("rdquo", '\u{201d}'),
    ("bull", '\u{2022}'),
    ("hellip", '\u{2026}'),
    ("euro", '\u{20ac}'),
    ("trade", '\u{2122}'),
];

/// Decodes the body of an entity, i.e. the text between `&` and `;`.
pub(crate) fn decode_entity(body: &str) -> Option<char> {
    if let Some(number) = body.strip_prefix('#') {
        let code = match number.strip_prefix(['x', 'X']) {
            Some(hex) => u32::from_str_radix(hex, 16).ok()?,
            None => number.parse::<u32>().ok()?,
        };
        return match code {
            0x1..=0xD7FF | 0xE000..=0xFFFD | 0x10000..=0x10FFFF => char::from_u32(code),
            _ => None,
        };
    }
    NAMED_ENTITIES
        .iter()
        .find(|(name, _)| *name == body)
        .map(|(_, c)| *c)
}

/// Scans an entity starting at the `&` at byte `pos`.
///
/// Returns the decoded character, if any, and the byte position where scanning
/// resumes. A sequence with no `;` within [`MAX_ENTITY_LENGTH`] bytes, or one that
/// fails to decode, yields `None` and is skipped.
pub(crate) fn scan_entity(source: &str, pos: usize) -> (Option<char>, usize) {
    let bytes = source.as_bytes();
    let limit = (pos + MAX_ENTITY_LENGTH).min(bytes.len());

    let mut end = pos + 1;
    while end < limit {
        match bytes[end] {
            b';' => {
                let decoded = source.get(pos + 1..end).and_then(decode_entity);
                return (decoded, end + 1);
            }
            b'&' | b'<' => break,
            byte if byte <= b' ' => break,
            _ => end += 1,
        }
    }
    while !source.is_char_boundary(end) {
        end += 1;
    }
    (None, end)
}

#[cfg(test)]
mod tests {
    use super::{decode_entity, scan_entity};

    #[test]
    fn numeric_references() {
        assert_eq!(decode_entity("#65"), Some('A'));
        assert_eq!(decode_entity("#x41"), Some('A'));
        assert_eq!(decode_entity("#X1F600"), Some('\u{1F600}'));
        assert_eq!(decode_entity("#xD7FF"), Some('\u{D7FF}'));
        assert_eq!(decode_entity("#xE000"), Some('\u{E000}'));
    }

    #[test]
    fn numeric_references_outside_ranges() {
        assert_eq!(decode_entity("#0"), None);
        assert_eq!(decode_entity("#xD800"), None);
        assert_eq!(decode_entity("#xFFFE"), None);
        assert_eq!(decode_entity("#x110000"), None);
        assert_eq!(decode_entity("#x"), None);
        assert_eq!(decode_entity("#12a"), None);
    }

    #[test]
    fn named_references() {
        assert_eq!(decode_entity("lt"), Some('<'));
        assert_eq!(decode_entity("hellip"), Some('\u{2026}'));
        assert_eq!(decode_entity("LT"), None);
        assert_eq!(decode_entity("bogus"), None);
    }

    #[test]
    fn scanning_skips_malformed_sequences() {
        assert_eq!(scan_entity("&amp;x", 0), (Some('&'), 5));
        assert_eq!(scan_entity("&bogus;x", 0), (None, 7));
        assert_eq!(scan_entity("& x", 0), (None, 1));
        assert_eq!(scan_entity("&amp", 0), (None, 4));
        assert_eq!(scan_entity("&abcdefghijkl;", 0), (None, 10));
        // The limit never splits a multi-byte character.
        assert_eq!(scan_entity("&abcdefgh\u{e9}", 0), (None, 11));
    }
}

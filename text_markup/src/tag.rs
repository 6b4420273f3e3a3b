// Copyright 2026 the Parley Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tag and attribute tokenizer.

/// Whether a tag opens, closes, or opens and immediately closes an element.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum TagKind {
    /// `<name ...>`
    Open,
    /// `</name>`
    Close,
    /// `<name .../>`
    SelfClosing,
}

/// A markup tag found in the input.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct Tag<'a> {
    pub(crate) name: &'a str,
    pub(crate) kind: TagKind,
    attributes: &'a str,
}

impl<'a> Tag<'a> {
    /// Case-insensitive comparison of the tag name.
    pub(crate) fn is(&self, name: &str) -> bool {
        self.name.eq_ignore_ascii_case(name)
    }

    pub(crate) fn attributes(&self) -> Attributes<'a> {
        Attributes {
            source: self.attributes.as_bytes(),
            text: self.attributes,
            pos: 0,
        }
    }
}

/// A `name='value'` pair.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct Attribute<'a> {
    pub(crate) name: &'a str,
    pub(crate) value: &'a str,
}

impl Attribute<'_> {
    /// Case-insensitive comparison of the attribute name.
    pub(crate) fn is(&self, name: &str) -> bool {
        self.name.eq_ignore_ascii_case(name)
    }
}

fn is_white_space(byte: u8) -> bool {
    byte <= b' '
}

/// Scans a tag starting at the `<` at byte `pos`.
///
/// Returns the tag and the byte position following its `>`, or `None` if the input has
/// no closing `>` outside of quotes.
pub(crate) fn scan_tag(source: &str, pos: usize) -> Option<(Tag<'_>, usize)> {
    let bytes = source.as_bytes();
    debug_assert_eq!(bytes.get(pos), Some(&b'<'), "tags start with '<'");

    let mut quoted = false;
    let mut close = None;
    for (offset, &byte) in bytes.get(pos + 1..)?.iter().enumerate() {
        match byte {
            b'\'' => quoted = !quoted,
            b'>' if !quoted => {
                close = Some(pos + 1 + offset);
                break;
            }
            _ => {}
        }
    }
    let close = close?;

    let mut content = source.get(pos + 1..close)?.trim_matches(|c: char| c <= ' ');
    let mut kind = TagKind::Open;
    if let Some(rest) = content.strip_prefix('/') {
        kind = TagKind::Close;
        content = rest.trim_start_matches(|c: char| c <= ' ');
    } else if let Some(rest) = content.strip_suffix('/') {
        kind = TagKind::SelfClosing;
        content = rest.trim_end_matches(|c: char| c <= ' ');
    }

    let name_end = content
        .bytes()
        .position(is_white_space)
        .unwrap_or(content.len());
    let (name, attributes) = content.split_at(name_end);
    Some((
        Tag {
            name,
            kind,
            attributes,
        },
        close + 1,
    ))
}

/// Iterator over the attributes of a tag.
///
/// Values are single-quoted; white space inside the quotes is trimmed. Unquoted values
/// run to the next white space. An attribute without `=` is skipped.
#[derive(Clone, Debug)]
pub(crate) struct Attributes<'a> {
    source: &'a [u8],
    text: &'a str,
    pos: usize,
}

impl Attributes<'_> {
    fn skip_white_space(&mut self) {
        while self.pos < self.source.len() && is_white_space(self.source[self.pos]) {
            self.pos += 1;
        }
    }
}

impl<'a> Iterator for Attributes<'a> {
    type Item = Attribute<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            self.skip_white_space();
            if self.pos >= self.source.len() {
                return None;
            }

            let name_start = self.pos;
            while self.pos < self.source.len()
                && self.source[self.pos] != b'='
                && !is_white_space(self.source[self.pos])
            {
                self.pos += 1;
            }
            let name = self.text.get(name_start..self.pos)?;
            self.skip_white_space();
            if self.pos >= self.source.len() || self.source[self.pos] != b'=' {
                // A bare word; there is no value to report.
                continue;
            }
            self.pos += 1;
            self.skip_white_space();

            let value = if self.source.get(self.pos) == Some(&b'\'') {
                self.pos += 1;
                let value_start = self.pos;
                while self.pos < self.source.len() && self.source[self.pos] != b'\'' {
                    self.pos += 1;
                }
                let value = self.text.get(value_start..self.pos)?;
                // Step over the closing quote, if any.
                self.pos = (self.pos + 1).min(self.source.len());
                value.trim_matches(|c: char| c <= ' ')
            } else {
                let value_start = self.pos;
                while self.pos < self.source.len() && !is_white_space(self.source[self.pos]) {
                    self.pos += 1;
                }
                self.text.get(value_start..self.pos)?
            };

            if name.is_empty() {
                continue;
            }
            return Some(Attribute { name, value });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{scan_tag, Attribute, TagKind};

    #[test]
    fn open_close_and_self_closing() {
        let (tag, next) = scan_tag("<b>bold", 0).unwrap();
        assert_eq!((tag.name, tag.kind, next), ("b", TagKind::Open, 3));

        let (tag, next) = scan_tag("x</ color >", 1).unwrap();
        assert_eq!((tag.name, tag.kind, next), ("color", TagKind::Close, 11));

        let (tag, _) = scan_tag("<item url='a.png' />", 0).unwrap();
        assert_eq!((tag.name, tag.kind), ("item", TagKind::SelfClosing));
        assert!(tag.is("ITEM"));
    }

    #[test]
    fn unterminated_tag_is_not_a_tag() {
        assert!(scan_tag("<b", 0).is_none());
        assert!(scan_tag("<a href='>", 0).is_none());
    }

    #[test]
    fn greater_than_inside_quotes() {
        let (tag, next) = scan_tag("<a href='x>y'>", 0).unwrap();
        assert_eq!(next, 14);
        let attributes: Vec<_> = tag.attributes().collect();
        assert_eq!(
            attributes,
            [Attribute {
                name: "href",
                value: "x>y"
            }]
        );
    }

    #[test]
    fn attribute_values_are_trimmed() {
        let (tag, _) = scan_tag("<font family = '  DejaVu Sans '  size='12' bogus weight=bold>", 0)
            .unwrap();
        let attributes: Vec<_> = tag.attributes().map(|a| (a.name, a.value)).collect();
        assert_eq!(
            attributes,
            [("family", "DejaVu Sans"), ("size", "12"), ("weight", "bold")]
        );
    }
}

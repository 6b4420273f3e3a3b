// Copyright 2026 the Parley Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

/// Paired tag types, each with its own stack of open runs.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum TagType {
    Color,
    Font,
    Bold,
    Italic,
    Underline,
    Strikethrough,
    Background,
    Span,
    Paragraph,
    Anchor,
    CharacterSpacing,
}

impl TagType {
    const COUNT: usize = 11;

    pub(crate) fn from_name(name: &str) -> Option<Self> {
        const NAMES: [(&str, TagType); TagType::COUNT] = [
            ("color", TagType::Color),
            ("font", TagType::Font),
            ("b", TagType::Bold),
            ("i", TagType::Italic),
            ("u", TagType::Underline),
            ("s", TagType::Strikethrough),
            ("background", TagType::Background),
            ("span", TagType::Span),
            ("p", TagType::Paragraph),
            ("a", TagType::Anchor),
            ("char-spacing", TagType::CharacterSpacing),
        ];
        NAMES
            .iter()
            .find(|(tag, _)| tag.eq_ignore_ascii_case(name))
            .map(|(_, tag_type)| *tag_type)
    }

    fn index(self) -> usize {
        self as usize
    }
}

/// Indices of the runs a `<span>` realized, one optional slot per axis.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(crate) struct SpanRuns {
    pub(crate) color: Option<usize>,
    pub(crate) font: Option<usize>,
    pub(crate) background: Option<usize>,
    pub(crate) underline: Option<usize>,
    pub(crate) strikethrough: Option<usize>,
    pub(crate) character_spacing: Option<usize>,
}

/// A run opened by a tag and waiting for its closing tag.
///
/// The payloads are indices into the run lists being built.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum OpenRun {
    Color(usize),
    Font(usize),
    Underline(usize),
    Strikethrough(usize),
    Background(usize),
    CharacterSpacing(usize),
    Paragraph(usize),
    Span(SpanRuns),
    Anchor {
        anchor: usize,
        color: usize,
        underline: usize,
    },
    /// The tag opened nothing, e.g. `<color>` without a valid value; its closing tag
    /// still has to balance.
    Inert,
}

/// Per tag type stacks of open runs.
///
/// The depth of each stack is the nesting reference count of its tag type, so a closing
/// tag with nothing open is detected rather than popping another tag's run.
#[derive(Debug, Default)]
pub(crate) struct StyleStack {
    stacks: [Vec<OpenRun>; TagType::COUNT],
}

impl StyleStack {
    pub(crate) fn push(&mut self, tag_type: TagType, run: OpenRun) {
        self.stacks[tag_type.index()].push(run);
    }

    /// Pops the innermost open run of `tag_type`, or `None` for a stray closing tag.
    pub(crate) fn pop(&mut self, tag_type: TagType) -> Option<OpenRun> {
        self.stacks[tag_type.index()].pop()
    }

    /// Nesting depth of `tag_type`.
    pub(crate) fn references(&self, tag_type: TagType) -> usize {
        self.stacks[tag_type.index()].len()
    }

    /// Removes every open run, innermost first within each tag type.
    pub(crate) fn drain(&mut self) -> impl Iterator<Item = OpenRun> + '_ {
        self.stacks
            .iter_mut()
            .flat_map(|stack| core::mem::take(stack).into_iter().rev())
    }
}

#[cfg(test)]
mod tests {
    use super::{OpenRun, StyleStack, TagType};

    #[test]
    fn tag_types_are_case_insensitive() {
        assert_eq!(TagType::from_name("COLOR"), Some(TagType::Color));
        assert_eq!(TagType::from_name("Char-Spacing"), Some(TagType::CharacterSpacing));
        assert_eq!(TagType::from_name("shadow"), None);
    }

    #[test]
    fn stray_pop_is_detected_per_type() {
        let mut stack = StyleStack::default();
        stack.push(TagType::Bold, OpenRun::Font(0));
        assert_eq!(stack.pop(TagType::Italic), None);
        assert_eq!(stack.references(TagType::Bold), 1);
        assert_eq!(stack.pop(TagType::Bold), Some(OpenRun::Font(0)));
        assert_eq!(stack.pop(TagType::Bold), None);
    }

    #[test]
    fn drain_empties_every_stack() {
        let mut stack = StyleStack::default();
        stack.push(TagType::Color, OpenRun::Color(0));
        stack.push(TagType::Color, OpenRun::Color(1));
        stack.push(TagType::Span, OpenRun::Inert);
        let drained: Vec<_> = stack.drain().collect();
        assert_eq!(
            drained,
            [OpenRun::Color(1), OpenRun::Color(0), OpenRun::Inert]
        );
        assert_eq!(stack.references(TagType::Color), 0);
    }
}

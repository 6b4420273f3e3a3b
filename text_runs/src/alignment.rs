// Copyright 2026 the Parley Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

/// Horizontal alignment of lines within the layout box.
///
/// `Begin` and `End` are relative to the direction of each line's paragraph: `Begin` is
/// the left edge for left to right text and the right edge for right to left text.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum HorizontalAlignment {
    /// Align to the start edge of the paragraph.
    #[default]
    Begin,
    /// Center the line.
    Center,
    /// Align to the end edge of the paragraph.
    End,
}

impl HorizontalAlignment {
    /// Parses a markup `align` value: `begin`/`left`, `center`, `end`/`right`.
    pub fn parse(s: &str) -> Option<Self> {
        Some(match s.trim() {
            "begin" | "left" => Self::Begin,
            "center" => Self::Center,
            "end" | "right" => Self::End,
            _ => return None,
        })
    }
}

/// Vertical alignment of the laid out text within the control.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum VerticalAlignment {
    /// Text starts at the top of the control.
    #[default]
    Top,
    /// Text is centered vertically.
    Center,
    /// Text ends at the bottom of the control.
    Bottom,
}

impl VerticalAlignment {
    /// Parses `top`, `center` or `bottom`.
    pub fn parse(s: &str) -> Option<Self> {
        Some(match s.trim() {
            "top" => Self::Top,
            "center" => Self::Center,
            "bottom" => Self::Bottom,
            _ => return None,
        })
    }
}

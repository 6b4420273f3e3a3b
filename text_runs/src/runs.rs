// Copyright 2026 the Parley Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Style run payloads, one type per style axis.

use crate::{
    CharacterIndex, CharacterRun, Color, FontSlant, FontWeight, FontWidth, HorizontalAlignment,
    Run,
};

fn overlay<T: Clone>(outer: &mut Option<T>, inner: &Option<T>) {
    if inner.is_some() {
        outer.clone_from(inner);
    }
}

/// A text or background color applied to a range of characters.
#[derive(Clone, Debug, PartialEq)]
pub struct ColorRun {
    /// The characters covered.
    pub character_run: CharacterRun,
    /// The color.
    pub color: Color,
}

impl ColorRun {
    /// Creates a color run.
    pub fn new(character_run: CharacterRun, color: Color) -> Self {
        Self {
            character_run,
            color,
        }
    }
}

impl Run for ColorRun {
    fn character_run(&self) -> CharacterRun {
        self.character_run
    }

    fn character_run_mut(&mut self) -> &mut CharacterRun {
        &mut self.character_run
    }

    fn overlay(&mut self, inner: &Self) {
        self.color = inner.color;
    }

    fn same_style(&self, other: &Self) -> bool {
        self.color == other.color
    }
}

/// Font attributes applied to a range of characters.
///
/// Attributes left as `None` inherit from enclosing runs, and ultimately from the
/// default font description of the text instance.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FontDescriptionRun {
    /// The characters covered.
    pub character_run: CharacterRun,
    /// Font family name.
    pub family: Option<String>,
    /// Font weight.
    pub weight: Option<FontWeight>,
    /// Font width.
    pub width: Option<FontWidth>,
    /// Font slant.
    pub slant: Option<FontSlant>,
    /// Point size.
    pub size: Option<f32>,
}

impl FontDescriptionRun {
    /// Creates a run with no attribute defined.
    pub fn new(character_run: CharacterRun) -> Self {
        Self {
            character_run,
            ..Self::default()
        }
    }

    /// Whether at least one attribute is defined.
    pub fn is_defined(&self) -> bool {
        self.family.is_some()
            || self.weight.is_some()
            || self.width.is_some()
            || self.slant.is_some()
            || self.size.is_some()
    }
}

impl Run for FontDescriptionRun {
    fn character_run(&self) -> CharacterRun {
        self.character_run
    }

    fn character_run_mut(&mut self) -> &mut CharacterRun {
        &mut self.character_run
    }

    fn overlay(&mut self, inner: &Self) {
        overlay(&mut self.family, &inner.family);
        overlay(&mut self.weight, &inner.weight);
        overlay(&mut self.width, &inner.width);
        overlay(&mut self.slant, &inner.slant);
        overlay(&mut self.size, &inner.size);
    }

    fn same_style(&self, other: &Self) -> bool {
        self.family == other.family
            && self.weight == other.weight
            && self.width == other.width
            && self.slant == other.slant
            && self.size == other.size
    }
}

/// Line style of an underline.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum UnderlineType {
    /// A continuous line.
    #[default]
    Solid,
    /// A dashed line, see [`UnderlineStyleProperties::dash_gap`] and
    /// [`UnderlineStyleProperties::dash_width`].
    Dashed,
    /// Two continuous lines.
    Double,
}

impl UnderlineType {
    /// Parses `solid`, `dashed` or `double`.
    pub fn parse(s: &str) -> Option<Self> {
        Some(match s.trim() {
            "solid" => Self::Solid,
            "dashed" => Self::Dashed,
            "double" => Self::Double,
            _ => return None,
        })
    }
}

/// Underline attributes. `None` fields use the text instance defaults.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct UnderlineStyleProperties {
    /// Line style.
    pub kind: Option<UnderlineType>,
    /// Line color.
    pub color: Option<Color>,
    /// Line thickness in pixels.
    pub height: Option<f32>,
    /// Gap between dashes in pixels.
    pub dash_gap: Option<f32>,
    /// Length of a dash in pixels.
    pub dash_width: Option<f32>,
}

impl UnderlineStyleProperties {
    fn overlay(&mut self, inner: &Self) {
        overlay(&mut self.kind, &inner.kind);
        overlay(&mut self.color, &inner.color);
        overlay(&mut self.height, &inner.height);
        overlay(&mut self.dash_gap, &inner.dash_gap);
        overlay(&mut self.dash_width, &inner.dash_width);
    }
}

/// An underline applied to a range of characters.
#[derive(Clone, Debug, PartialEq)]
pub struct UnderlinedCharacterRun {
    /// The characters covered.
    pub character_run: CharacterRun,
    /// Underline attributes.
    pub properties: UnderlineStyleProperties,
}

impl Run for UnderlinedCharacterRun {
    fn character_run(&self) -> CharacterRun {
        self.character_run
    }

    fn character_run_mut(&mut self) -> &mut CharacterRun {
        &mut self.character_run
    }

    fn overlay(&mut self, inner: &Self) {
        self.properties.overlay(&inner.properties);
    }

    fn same_style(&self, other: &Self) -> bool {
        self.properties == other.properties
    }
}

/// Strikethrough attributes. `None` fields use the text instance defaults.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct StrikethroughStyleProperties {
    /// Line color.
    pub color: Option<Color>,
    /// Line thickness in pixels.
    pub height: Option<f32>,
}

/// A strikethrough applied to a range of characters.
#[derive(Clone, Debug, PartialEq)]
pub struct StrikethroughCharacterRun {
    /// The characters covered.
    pub character_run: CharacterRun,
    /// Strikethrough attributes.
    pub properties: StrikethroughStyleProperties,
}

impl Run for StrikethroughCharacterRun {
    fn character_run(&self) -> CharacterRun {
        self.character_run
    }

    fn character_run_mut(&mut self) -> &mut CharacterRun {
        &mut self.character_run
    }

    fn overlay(&mut self, inner: &Self) {
        overlay(&mut self.properties.color, &inner.properties.color);
        overlay(&mut self.properties.height, &inner.properties.height);
    }

    fn same_style(&self, other: &Self) -> bool {
        self.properties == other.properties
    }
}

/// Extra spacing added after each character of a range.
#[derive(Clone, Debug, PartialEq)]
pub struct CharacterSpacingCharacterRun {
    /// The characters covered.
    pub character_run: CharacterRun,
    /// Extra advance in pixels, may be negative.
    pub value: f32,
}

impl Run for CharacterSpacingCharacterRun {
    fn character_run(&self) -> CharacterRun {
        self.character_run
    }

    fn character_run_mut(&mut self) -> &mut CharacterRun {
        &mut self.character_run
    }

    fn overlay(&mut self, inner: &Self) {
        self.value = inner.value;
    }

    fn same_style(&self, other: &Self) -> bool {
        self.value == other.value
    }
}

/// A paragraph whose style is scoped by markup rather than inherited from the defaults.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct BoundedParagraphRun {
    /// The characters covered, including the closing new paragraph character.
    pub character_run: CharacterRun,
    /// Alignment override for the lines of this paragraph.
    pub horizontal_alignment: Option<HorizontalAlignment>,
    /// Line height relative to the font's natural line height.
    pub relative_line_size: Option<f32>,
}

impl Run for BoundedParagraphRun {
    fn character_run(&self) -> CharacterRun {
        self.character_run
    }

    fn character_run_mut(&mut self) -> &mut CharacterRun {
        &mut self.character_run
    }

    fn overlay(&mut self, inner: &Self) {
        overlay(&mut self.horizontal_alignment, &inner.horizontal_alignment);
        overlay(&mut self.relative_line_size, &inner.relative_line_size);
    }

    fn same_style(&self, other: &Self) -> bool {
        self.horizontal_alignment == other.horizontal_alignment
            && self.relative_line_size == other.relative_line_size
    }
}

/// A hyperlink.
///
/// The visual decoration of an anchor lives in the color and underline run lists; this
/// record only keeps the clickable range and its target.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Anchor {
    /// First character of the anchor.
    pub start_index: CharacterIndex,
    /// One past the last character of the anchor.
    pub end_index: CharacterIndex,
    /// Link target.
    pub href: Option<String>,
    /// Color of the anchor text.
    pub color: Option<Color>,
    /// Color of the anchor text while pressed.
    pub clicked_color: Option<Color>,
}

impl Anchor {
    /// The characters covered.
    pub fn character_run(&self) -> CharacterRun {
        CharacterRun::new(
            self.start_index,
            self.end_index.saturating_sub(self.start_index),
        )
    }
}

/// How an embedded item's pixels combine with the text color.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum ColorBlendingMode {
    /// The item is drawn as is.
    #[default]
    None,
    /// The item is multiplied by the text color.
    Multiply,
}

impl ColorBlendingMode {
    /// Parses `none` or `multiply`.
    pub fn parse(s: &str) -> Option<Self> {
        Some(match s.trim() {
            "none" => Self::None,
            "multiply" => Self::Multiply,
            _ => return None,
        })
    }
}

/// A non-text object laid out inline, occupying one placeholder character.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct EmbeddedItem {
    /// Index of the placeholder character.
    pub character_index: CharacterIndex,
    /// Resource locator of the item.
    pub url: Option<String>,
    /// Requested width in pixels; `None` uses the resource's natural size.
    pub width: Option<f32>,
    /// Requested height in pixels; `None` uses the resource's natural size.
    pub height: Option<f32>,
    /// Color blending mode.
    pub color_blending: ColorBlendingMode,
}

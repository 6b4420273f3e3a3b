// Copyright 2026 the Parley Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Conversion of tag attributes into run payloads.

use text_runs::{
    Anchor, BoundedParagraphRun, CharacterRun, Color, ColorBlendingMode, ColorRun, EmbeddedItem,
    FontDescriptionRun, FontSlant, FontWeight, FontWidth, HorizontalAlignment,
    StrikethroughStyleProperties, UnderlineStyleProperties, UnderlineType,
};

use crate::color::parse_color;
use crate::tag::Tag;

/// Parses a length such as `12`, `12.5` or `12px`.
pub(crate) fn parse_length(value: &str) -> Option<f32> {
    let value = value.trim();
    let value = value.strip_suffix("px").unwrap_or(value);
    value.trim().parse::<f32>().ok().filter(|v| v.is_finite())
}

fn keyword(value: &str) -> String {
    value.trim().to_ascii_lowercase()
}

/// Sets one font attribute; `name` has any `font-` prefix already stripped.
fn apply_font_attribute(run: &mut FontDescriptionRun, name: &str, value: &str) {
    match name {
        "family" => run.family = Some(value.to_owned()),
        "size" => run.size = parse_length(value),
        "weight" => run.weight = FontWeight::parse(&keyword(value)),
        "width" => run.width = FontWidth::parse(&keyword(value)),
        "slant" => run.slant = FontSlant::parse(&keyword(value)),
        _ => {}
    }
}

fn apply_underline_attribute(
    properties: &mut UnderlineStyleProperties,
    name: &str,
    value: &str,
) {
    match name {
        "color" => properties.color = parse_color(value),
        "height" => properties.height = parse_length(value),
        "type" => properties.kind = UnderlineType::parse(&keyword(value)),
        "dash-gap" => properties.dash_gap = parse_length(value),
        "dash-width" => properties.dash_width = parse_length(value),
        _ => {}
    }
}

fn apply_strikethrough_attribute(
    properties: &mut StrikethroughStyleProperties,
    name: &str,
    value: &str,
) {
    match name {
        "color" => properties.color = parse_color(value),
        "height" => properties.height = parse_length(value),
        _ => {}
    }
}

/// `<color value='...'>`
pub(crate) fn process_color_tag(tag: &Tag<'_>, character_index: usize) -> Option<ColorRun> {
    let color = tag
        .attributes()
        .filter(|attribute| attribute.is("value"))
        .find_map(|attribute| parse_color(attribute.value))?;
    Some(ColorRun::new(CharacterRun::new(character_index, 0), color))
}

/// `<background color='...'>`
pub(crate) fn process_background_tag(tag: &Tag<'_>, character_index: usize) -> Option<ColorRun> {
    let color = tag
        .attributes()
        .filter(|attribute| attribute.is("color"))
        .find_map(|attribute| parse_color(attribute.value))?;
    Some(ColorRun::new(CharacterRun::new(character_index, 0), color))
}

/// `<font family='...' size='...' weight='...' width='...' slant='...'>`
pub(crate) fn process_font_tag(tag: &Tag<'_>, run: &mut FontDescriptionRun) {
    for attribute in tag.attributes() {
        apply_font_attribute(run, &attribute.name.to_ascii_lowercase(), attribute.value);
    }
}

/// `<u color='...' height='...' type='...' dash-gap='...' dash-width='...'>`
pub(crate) fn process_underline_tag(tag: &Tag<'_>) -> UnderlineStyleProperties {
    let mut properties = UnderlineStyleProperties::default();
    for attribute in tag.attributes() {
        apply_underline_attribute(
            &mut properties,
            &attribute.name.to_ascii_lowercase(),
            attribute.value,
        );
    }
    properties
}

/// `<s color='...' height='...'>`
pub(crate) fn process_strikethrough_tag(tag: &Tag<'_>) -> StrikethroughStyleProperties {
    let mut properties = StrikethroughStyleProperties::default();
    for attribute in tag.attributes() {
        apply_strikethrough_attribute(
            &mut properties,
            &attribute.name.to_ascii_lowercase(),
            attribute.value,
        );
    }
    properties
}

/// `<char-spacing value='...'>`
pub(crate) fn process_character_spacing_tag(tag: &Tag<'_>) -> Option<f32> {
    tag.attributes()
        .filter(|attribute| attribute.is("value"))
        .find_map(|attribute| parse_length(attribute.value))
}

/// `<p align='...' rel-line-height='...'>`
pub(crate) fn process_paragraph_tag(
    tag: &Tag<'_>,
    character_index: usize,
) -> BoundedParagraphRun {
    let mut run = BoundedParagraphRun {
        character_run: CharacterRun::new(character_index, 0),
        ..BoundedParagraphRun::default()
    };
    for attribute in tag.attributes() {
        if attribute.is("align") {
            run.horizontal_alignment = HorizontalAlignment::parse(&keyword(attribute.value));
        } else if attribute.is("rel-line-height") {
            run.relative_line_size = parse_length(attribute.value).filter(|v| *v > 0.0);
        }
    }
    run
}

/// `<a href='...' color='...' clicked-color='...'>`
pub(crate) fn process_anchor_tag(tag: &Tag<'_>, character_index: usize) -> Anchor {
    let mut anchor = Anchor {
        start_index: character_index,
        end_index: character_index,
        ..Anchor::default()
    };
    for attribute in tag.attributes() {
        if attribute.is("href") {
            anchor.href = Some(attribute.value.to_owned());
        } else if attribute.is("color") {
            anchor.color = parse_color(attribute.value);
        } else if attribute.is("clicked-color") {
            anchor.clicked_color = parse_color(attribute.value);
        }
    }
    anchor
}

/// `<item url='...' width='...' height='...' color-blending='...'/>`
pub(crate) fn process_embedded_item_tag(tag: &Tag<'_>, character_index: usize) -> EmbeddedItem {
    let mut item = EmbeddedItem {
        character_index,
        ..EmbeddedItem::default()
    };
    for attribute in tag.attributes() {
        if attribute.is("url") {
            item.url = Some(attribute.value.to_owned());
        } else if attribute.is("width") {
            item.width = parse_length(attribute.value);
        } else if attribute.is("height") {
            item.height = parse_length(attribute.value);
        } else if attribute.is("color-blending") {
            item.color_blending =
                ColorBlendingMode::parse(&keyword(attribute.value)).unwrap_or_default();
        }
    }
    item
}

/// Candidate runs of a `<span>`; only the axes it actually sets are realized.
#[derive(Debug, Default)]
pub(crate) struct SpanAttributes {
    pub(crate) font: FontDescriptionRun,
    pub(crate) color: Option<Color>,
    pub(crate) background: Option<Color>,
    pub(crate) underline: Option<UnderlineStyleProperties>,
    pub(crate) strikethrough: Option<StrikethroughStyleProperties>,
    pub(crate) character_spacing: Option<f32>,
}

/// `<span font-*='...' text-color='...' background-color='...' u-*='...' s-*='...'
/// char-space-value='...'>`
pub(crate) fn process_span_tag(tag: &Tag<'_>) -> SpanAttributes {
    let mut span = SpanAttributes::default();
    for attribute in tag.attributes() {
        let name = attribute.name.to_ascii_lowercase();
        let value = attribute.value;
        if let Some(font_attribute) = name.strip_prefix("font-") {
            apply_font_attribute(&mut span.font, font_attribute, value);
        } else if let Some(underline_attribute) = name.strip_prefix("u-") {
            let properties = span.underline.get_or_insert_with(UnderlineStyleProperties::default);
            apply_underline_attribute(properties, underline_attribute, value);
        } else if let Some(strikethrough_attribute) = name.strip_prefix("s-") {
            let properties = span
                .strikethrough
                .get_or_insert_with(StrikethroughStyleProperties::default);
            apply_strikethrough_attribute(properties, strikethrough_attribute, value);
        } else {
            match name.as_str() {
                "text-color" => span.color = parse_color(value),
                "background-color" => span.background = parse_color(value),
                "char-space-value" => span.character_spacing = parse_length(value),
                _ => {}
            }
        }
    }
    span
}

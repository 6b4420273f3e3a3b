// Copyright 2026 the Parley Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use peniko::color::palette::css;
use text_runs::{
    CharacterRun, CharacterSpacingCharacterRun, ColorRun, FontDescriptionRun, FontSlant,
    FontWeight, StrikethroughCharacterRun, StyleRuns, UnderlineStyleProperties, UnderlineType,
    UnderlinedCharacterRun,
};

use crate::attributes::{
    process_anchor_tag, process_background_tag, process_character_spacing_tag, process_color_tag,
    process_embedded_item_tag, process_font_tag, process_paragraph_tag, process_span_tag,
    process_strikethrough_tag, process_underline_tag,
};
use crate::entity::scan_entity;
use crate::stack::{OpenRun, SpanRuns, StyleStack, TagType};
use crate::tag::{scan_tag, Tag, TagKind};
use crate::ProcessedMarkup;

/// Character inserted for an embedded item.
const EMBEDDED_ITEM_PLACEHOLDER: char = ' ';

/// Tags that are recognized but produce no runs.
const RESERVED_TAGS: [&str; 3] = ["shadow", "glow", "outline"];

#[derive(Debug, Default)]
pub(crate) struct MarkupProcessor {
    text: String,
    character_index: usize,
    runs: StyleRuns,
    stack: StyleStack,
}

impl MarkupProcessor {
    pub(crate) fn process(mut self, markup: &str) -> ProcessedMarkup {
        self.text.reserve(markup.len());
        let bytes = markup.as_bytes();
        let mut pos = 0;
        while pos < bytes.len() {
            match bytes[pos] {
                b'<' => {
                    if let Some((tag, next)) = scan_tag(markup, pos) {
                        self.process_tag(&tag);
                        pos = next;
                    } else {
                        self.push_character('<');
                        pos += 1;
                    }
                }
                b'&' => {
                    let (decoded, next) = scan_entity(markup, pos);
                    if let Some(character) = decoded {
                        self.push_character(character);
                    } else {
                        log::debug!(
                            "Dropping malformed entity {:?}",
                            markup.get(pos..next).unwrap_or_default()
                        );
                    }
                    pos = next;
                }
                b'\\' if matches!(bytes.get(pos + 1), Some(b'<' | b'>' | b'&')) => {
                    self.push_character(char::from(bytes[pos + 1]));
                    pos += 2;
                }
                _ => {
                    let Some(character) = markup.get(pos..).and_then(|rest| rest.chars().next())
                    else {
                        break;
                    };
                    self.push_character(character);
                    pos += character.len_utf8();
                }
            }
        }

        // Tags still open at the end of the input cover the rest of the text.
        let open: Vec<OpenRun> = self.stack.drain().collect();
        for run in open {
            self.close_run(run);
        }

        self.runs.normalize();
        ProcessedMarkup {
            text: self.text,
            runs: self.runs,
        }
    }

    fn push_character(&mut self, character: char) {
        self.text.push(character);
        self.character_index += 1;
    }

    fn ends_with_new_paragraph(&self) -> bool {
        matches!(self.text.chars().next_back(), Some('\n' | '\u{2029}'))
    }

    fn process_tag(&mut self, tag: &Tag<'_>) {
        if tag.is("item") {
            if tag.kind != TagKind::Close {
                let item = process_embedded_item_tag(tag, self.character_index);
                self.runs.embedded_items.push(item);
                self.push_character(EMBEDDED_ITEM_PLACEHOLDER);
            }
            return;
        }
        if RESERVED_TAGS.iter().any(|name| tag.is(name)) {
            return;
        }
        let Some(tag_type) = TagType::from_name(tag.name) else {
            log::trace!("Ignoring unknown markup tag <{}>", tag.name);
            return;
        };

        match tag.kind {
            TagKind::Open => {
                let run = self.open_run(tag_type, tag);
                self.stack.push(tag_type, run);
            }
            TagKind::Close => {
                if self.stack.references(tag_type) == 0 {
                    log::debug!("Ignoring stray closing tag </{}>", tag.name);
                    return;
                }
                if let Some(run) = self.stack.pop(tag_type) {
                    self.close_run(run);
                }
            }
            TagKind::SelfClosing => {
                // An element opened and closed at the same index covers nothing.
            }
        }
    }

    fn push_font_run(&mut self, run: FontDescriptionRun) -> OpenRun {
        self.runs.font_description_runs.push(run);
        OpenRun::Font(self.runs.font_description_runs.len() - 1)
    }

    fn push_underline(&mut self, properties: UnderlineStyleProperties) -> usize {
        self.runs
            .underlined_character_runs
            .push(UnderlinedCharacterRun {
                character_run: CharacterRun::new(self.character_index, 0),
                properties,
            });
        self.runs.underlined_character_runs.len() - 1
    }

    fn push_color(&mut self, run: ColorRun) -> usize {
        self.runs.color_runs.push(run);
        self.runs.color_runs.len() - 1
    }

    fn open_run(&mut self, tag_type: TagType, tag: &Tag<'_>) -> OpenRun {
        let index = self.character_index;
        let empty = CharacterRun::new(index, 0);
        match tag_type {
            TagType::Color => match process_color_tag(tag, index) {
                Some(run) => OpenRun::Color(self.push_color(run)),
                None => OpenRun::Inert,
            },
            TagType::Background => match process_background_tag(tag, index) {
                Some(run) => {
                    self.runs.background_color_runs.push(run);
                    OpenRun::Background(self.runs.background_color_runs.len() - 1)
                }
                None => OpenRun::Inert,
            },
            TagType::Font => {
                let mut run = FontDescriptionRun::new(empty);
                process_font_tag(tag, &mut run);
                if run.is_defined() {
                    self.push_font_run(run)
                } else {
                    OpenRun::Inert
                }
            }
            TagType::Bold => {
                let mut run = FontDescriptionRun::new(empty);
                run.weight = Some(FontWeight::BOLD);
                self.push_font_run(run)
            }
            TagType::Italic => {
                let mut run = FontDescriptionRun::new(empty);
                run.slant = Some(FontSlant::Italic);
                self.push_font_run(run)
            }
            TagType::Underline => {
                let properties = process_underline_tag(tag);
                OpenRun::Underline(self.push_underline(properties))
            }
            TagType::Strikethrough => {
                let properties = process_strikethrough_tag(tag);
                self.runs
                    .strikethrough_character_runs
                    .push(StrikethroughCharacterRun {
                        character_run: empty,
                        properties,
                    });
                OpenRun::Strikethrough(self.runs.strikethrough_character_runs.len() - 1)
            }
            TagType::CharacterSpacing => match process_character_spacing_tag(tag) {
                Some(value) => {
                    self.runs
                        .character_spacing_runs
                        .push(CharacterSpacingCharacterRun {
                            character_run: empty,
                            value,
                        });
                    OpenRun::CharacterSpacing(self.runs.character_spacing_runs.len() - 1)
                }
                None => OpenRun::Inert,
            },
            TagType::Paragraph => {
                if self.character_index > 0 && !self.ends_with_new_paragraph() {
                    self.push_character('\n');
                }
                let run = process_paragraph_tag(tag, self.character_index);
                self.runs.bounded_paragraph_runs.push(run);
                OpenRun::Paragraph(self.runs.bounded_paragraph_runs.len() - 1)
            }
            TagType::Anchor => {
                let anchor = process_anchor_tag(tag, index);
                let color = anchor.color.unwrap_or(css::BLUE);
                let color = self.push_color(ColorRun::new(empty, color));
                let underline = self.push_underline(UnderlineStyleProperties {
                    kind: Some(UnderlineType::Solid),
                    ..UnderlineStyleProperties::default()
                });
                self.runs.anchors.push(anchor);
                OpenRun::Anchor {
                    anchor: self.runs.anchors.len() - 1,
                    color,
                    underline,
                }
            }
            TagType::Span => self.open_span(tag),
        }
    }

    fn open_span(&mut self, tag: &Tag<'_>) -> OpenRun {
        let empty = CharacterRun::new(self.character_index, 0);
        let mut attributes = process_span_tag(tag);
        let mut span = SpanRuns::default();

        if attributes.font.is_defined() {
            attributes.font.character_run = empty;
            self.runs.font_description_runs.push(attributes.font);
            span.font = Some(self.runs.font_description_runs.len() - 1);
        }
        if let Some(color) = attributes.color {
            span.color = Some(self.push_color(ColorRun::new(empty, color)));
        }
        if let Some(color) = attributes.background {
            self.runs
                .background_color_runs
                .push(ColorRun::new(empty, color));
            span.background = Some(self.runs.background_color_runs.len() - 1);
        }
        if let Some(properties) = attributes.underline {
            span.underline = Some(self.push_underline(properties));
        }
        if let Some(properties) = attributes.strikethrough {
            self.runs
                .strikethrough_character_runs
                .push(StrikethroughCharacterRun {
                    character_run: empty,
                    properties,
                });
            span.strikethrough = Some(self.runs.strikethrough_character_runs.len() - 1);
        }
        if let Some(value) = attributes.character_spacing {
            self.runs
                .character_spacing_runs
                .push(CharacterSpacingCharacterRun {
                    character_run: empty,
                    value,
                });
            span.character_spacing = Some(self.runs.character_spacing_runs.len() - 1);
        }
        OpenRun::Span(span)
    }

    fn close_run(&mut self, run: OpenRun) {
        let end = self.character_index;
        let close = |character_run: &mut CharacterRun| {
            character_run.number_of_characters = end.saturating_sub(character_run.character_index);
        };
        let runs = &mut self.runs;
        match run {
            OpenRun::Color(i) => close(&mut runs.color_runs[i].character_run),
            OpenRun::Font(i) => close(&mut runs.font_description_runs[i].character_run),
            OpenRun::Underline(i) => close(&mut runs.underlined_character_runs[i].character_run),
            OpenRun::Strikethrough(i) => {
                close(&mut runs.strikethrough_character_runs[i].character_run);
            }
            OpenRun::Background(i) => close(&mut runs.background_color_runs[i].character_run),
            OpenRun::CharacterSpacing(i) => {
                close(&mut runs.character_spacing_runs[i].character_run);
            }
            OpenRun::Paragraph(i) => {
                if !self.text.is_empty() && !self.ends_with_new_paragraph() {
                    self.push_character('\n');
                }
                let end = self.character_index;
                let character_run = &mut self.runs.bounded_paragraph_runs[i].character_run;
                character_run.number_of_characters =
                    end.saturating_sub(character_run.character_index);
            }
            OpenRun::Span(span) => {
                if let Some(i) = span.font {
                    close(&mut runs.font_description_runs[i].character_run);
                }
                if let Some(i) = span.color {
                    close(&mut runs.color_runs[i].character_run);
                }
                if let Some(i) = span.background {
                    close(&mut runs.background_color_runs[i].character_run);
                }
                if let Some(i) = span.underline {
                    close(&mut runs.underlined_character_runs[i].character_run);
                }
                if let Some(i) = span.strikethrough {
                    close(&mut runs.strikethrough_character_runs[i].character_run);
                }
                if let Some(i) = span.character_spacing {
                    close(&mut runs.character_spacing_runs[i].character_run);
                }
            }
            OpenRun::Anchor {
                anchor,
                color,
                underline,
            } => {
                runs.anchors[anchor].end_index = end;
                close(&mut runs.color_runs[color].character_run);
                close(&mut runs.underlined_character_runs[underline].character_run);
            }
            OpenRun::Inert => {}
        }
    }
}

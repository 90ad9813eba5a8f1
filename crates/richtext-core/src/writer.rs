use std::ops::RangeInclusive;

use crate::attributed_string::AttributedString;
use crate::attributes::{
    AttributeKey, AttributeMap, AttributeValue, AttributeValueType as _, Color, ColorChannel, Font,
};
use crate::config::{DEFAULT_MAX_FONT_SIZE, DEFAULT_MIN_FONT_SIZE};
use crate::range::TextRange;
use crate::reader::{RichTextReader, styles_in};
use crate::style::{RichTextStyle, StyleSet};

const SUPERSCRIPT_LEVELS: RangeInclusive<i64> = -1..=1;

/// Write access to attributed text.
///
/// Implementors provide the two raw mutations; everything else is built on
/// top of them. Ranges passed to the raw mutations are already clamped.
///
/// Range semantics shared by the provided writers: `None` means the whole
/// text, a collapsed range edits the typing attributes, any other range is
/// edited inside one `begin_editing`/`end_editing` batch.
pub trait RichTextWriter: RichTextReader {
    fn replace_rich_text(&mut self, range: TextRange, with: &AttributedString);

    fn edit_rich_text_attributes(
        &mut self,
        range: TextRange,
        edit: &mut dyn FnMut(&mut AttributeMap),
    );

    fn begin_editing(&mut self) {}

    fn end_editing(&mut self) {}

    fn update_typing_attributes(&mut self, _edit: &mut dyn FnMut(&mut AttributeMap)) {}

    fn default_font(&self) -> Font {
        Font::default()
    }

    fn font_size_range(&self) -> RangeInclusive<f64> {
        DEFAULT_MIN_FONT_SIZE..=DEFAULT_MAX_FONT_SIZE
    }

    fn set_rich_text_attributes_with(
        &mut self,
        range: Option<TextRange>,
        edit: &mut dyn FnMut(&mut AttributeMap),
    ) {
        let range = match range {
            Some(range) => self.safe_range(range, false),
            None => TextRange::new(0, self.rich_text_len()),
        };
        if range.is_empty() {
            self.update_typing_attributes(edit);
            return;
        }

        let paragraph_fix = paragraph_style_edit(&*self, range, edit);
        self.begin_editing();
        self.edit_rich_text_attributes(range, edit);
        if let Some((start, style)) = paragraph_fix {
            self.edit_rich_text_attributes(TextRange::new(start, 1), &mut |attributes| {
                attributes.remove(&AttributeKey::ParagraphStyle);
                if let Some(style) = &style {
                    attributes.insert(AttributeKey::ParagraphStyle, style.clone());
                }
            });
        }
        self.end_editing();
    }

    fn set_rich_text_attribute(
        &mut self,
        key: AttributeKey,
        value: impl Into<AttributeValue>,
        range: Option<TextRange>,
    ) {
        let value = value.into();
        self.set_rich_text_attributes_with(range, &mut |attributes| {
            attributes.remove(&key);
            attributes.insert(key, value.clone());
        });
    }

    fn set_rich_text_attributes(&mut self, values: &AttributeMap, range: Option<TextRange>) {
        self.set_rich_text_attributes_with(range, &mut |attributes| {
            for (key, value) in values {
                attributes.remove(key);
                attributes.insert(*key, value.clone());
            }
        });
    }

    fn remove_rich_text_attribute(&mut self, key: AttributeKey, range: Option<TextRange>) {
        self.set_rich_text_attributes_with(range, &mut |attributes| {
            attributes.remove(&key);
        });
    }

    fn current_font(&self, range: TextRange) -> Font {
        self.current_attributes(range)
            .get(&AttributeKey::Font)
            .and_then(Font::from_attribute_value)
            .unwrap_or_else(|| self.default_font())
    }

    fn current_styles(&self, range: TextRange) -> StyleSet {
        styles_in(&self.current_attributes(range))
    }

    /// Rewrites the font of every run in `range`, falling back to the
    /// default font for runs without one.
    fn edit_rich_text_fonts(&mut self, range: TextRange, edit: &dyn Fn(Font) -> Font) {
        let default_font = self.default_font();
        self.set_rich_text_attributes_with(Some(range), &mut |attributes| {
            let font = attributes
                .remove(&AttributeKey::Font)
                .as_ref()
                .and_then(Font::from_attribute_value)
                .unwrap_or_else(|| default_font.clone());
            attributes.insert(AttributeKey::Font, edit(font).into());
        });
    }

    fn set_rich_text_font(&mut self, font: Font, range: TextRange) {
        self.set_rich_text_attribute(AttributeKey::Font, font, Some(range));
    }

    fn set_rich_text_font_name(&mut self, name: &str, range: TextRange) {
        if fonts_all_match(&*self, range, |font| font.name == name) {
            return;
        }
        self.edit_rich_text_fonts(range, &|font: Font| font.with_name(name));
    }

    fn set_rich_text_font_size(&mut self, size: f64, range: TextRange) {
        let limits = self.font_size_range();
        let size = size.clamp(*limits.start(), *limits.end());
        if fonts_all_match(&*self, range, |font| font.size == size) {
            return;
        }
        self.edit_rich_text_fonts(range, &|font: Font| font.with_size(size));
    }

    /// Steps the size of every font in `range` by `points`, each clamped to
    /// [`RichTextWriter::font_size_range`].
    fn step_rich_text_font_size(&mut self, points: f64, range: TextRange) {
        if points == 0.0 {
            return;
        }
        let limits = self.font_size_range();
        self.edit_rich_text_fonts(range, &|font: Font| {
            let size = (font.size + points).clamp(*limits.start(), *limits.end());
            font.with_size(size)
        });
    }

    fn set_rich_text_color(&mut self, channel: ColorChannel, color: Option<Color>, range: TextRange) {
        let key = channel.attribute_key();
        match color {
            Some(color) => self.set_rich_text_attribute(key, color, Some(range)),
            None => self.remove_rich_text_attribute(key, Some(range)),
        }
    }

    fn set_rich_text_style(&mut self, style: RichTextStyle, enabled: bool, range: TextRange) {
        if let Some(font_trait) = style.font_trait() {
            if self.current_styles(range).contains(&style) == enabled {
                return;
            }
            self.edit_rich_text_fonts(range, &|font: Font| font.with_trait(font_trait, enabled));
            return;
        }

        if let Some(key) = style.flag_key() {
            self.set_rich_text_attribute(key, i64::from(enabled), Some(range));
        }
    }

    fn toggle_rich_text_style(&mut self, style: RichTextStyle, range: TextRange) {
        let enabled = self.current_styles(range).contains(&style);
        self.set_rich_text_style(style, !enabled, range);
    }

    fn step_rich_text_superscript_level(&mut self, steps: i64, range: TextRange) {
        let current = self
            .current_attributes(range)
            .get(&AttributeKey::Superscript)
            .and_then(i64::from_attribute_value)
            .unwrap_or(0);
        let level = current
            .saturating_add(steps)
            .clamp(*SUPERSCRIPT_LEVELS.start(), *SUPERSCRIPT_LEVELS.end());
        if level == current {
            return;
        }
        if level == 0 {
            self.remove_rich_text_attribute(AttributeKey::Superscript, Some(range));
        } else {
            self.set_rich_text_attribute(AttributeKey::Superscript, level, Some(range));
        }
    }

    fn set_rich_text_link(&mut self, link: Option<String>, range: TextRange) {
        match link {
            Some(link) => self.set_rich_text_attribute(AttributeKey::Link, link, Some(range)),
            None => self.remove_rich_text_attribute(AttributeKey::Link, Some(range)),
        }
    }
}

/// The paragraph style `edit` gives a paragraph that `range` enters past
/// its first char. Paragraph styles follow the first char, so the result has
/// to be written at the paragraph start to stick.
fn paragraph_style_edit<W: RichTextWriter + ?Sized>(
    writer: &W,
    range: TextRange,
    edit: &mut dyn FnMut(&mut AttributeMap),
) -> Option<(usize, Option<AttributeValue>)> {
    let start = writer.current_paragraph_start(range.location);
    if start == range.location {
        return None;
    }
    let mut attributes = writer.rich_text_attributes(TextRange::cursor(range.location));
    let before = attributes.get(&AttributeKey::ParagraphStyle).cloned();
    edit(&mut attributes);
    let after = attributes.get(&AttributeKey::ParagraphStyle).cloned();
    (before != after).then_some((start, after))
}

/// Whether every font in `range` satisfies `matches`. A collapsed range
/// checks the font typing would use.
fn fonts_all_match<W: RichTextWriter + ?Sized>(
    writer: &W,
    range: TextRange,
    matches: impl Fn(&Font) -> bool,
) -> bool {
    let range = writer.safe_range(range, false);
    if range.is_empty() {
        return matches(&writer.current_font(range));
    }
    let default_font = writer.default_font();
    writer
        .rich_text()
        .attribute_runs(range)
        .all(|(_, attributes)| {
            attributes
                .get(&AttributeKey::Font)
                .and_then(Font::from_attribute_value)
                .map_or_else(|| matches(&default_font), |font| matches(&font))
        })
}

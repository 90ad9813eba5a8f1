use crate::attributed_string::AttributedString;
use crate::attributes::{
    AttributeKey, AttributeMap, AttributeValueType, Color, ColorChannel, Font, ParagraphStyle,
    TextAlignment,
};
use crate::range::{TextRange, safe_range};
use crate::rope_ext::RopeExt as _;
use crate::style::{RichTextStyle, StyleSet};

/// Read access to attributed text.
///
/// Every read resolves its range with [`safe_range`] as an attribute
/// operation, so reads at or past the end look at the last char, and an empty
/// buffer reads as "no attributes".
pub trait RichTextReader {
    fn rich_text(&self) -> &AttributedString;

    /// Attributes applied to text typed at a collapsed cursor, when the
    /// reader tracks any.
    fn typing_attributes(&self) -> Option<&AttributeMap> {
        None
    }

    fn rich_text_len(&self) -> usize {
        self.rich_text().len()
    }

    fn safe_range(&self, range: TextRange, is_attribute_operation: bool) -> TextRange {
        safe_range(range, self.rich_text_len(), is_attribute_operation)
    }

    fn rich_text_attributes(&self, range: TextRange) -> AttributeMap {
        if self.rich_text_len() == 0 {
            return AttributeMap::new();
        }
        let range = self.safe_range(range, true);
        self.rich_text()
            .attributes_at(range.location)
            .cloned()
            .unwrap_or_default()
    }

    fn rich_text_attribute<T: AttributeValueType>(
        &self,
        key: AttributeKey,
        range: TextRange,
    ) -> Option<T> {
        self.rich_text_attributes(range)
            .get(&key)
            .and_then(T::from_attribute_value)
    }

    /// The attributes editing operations act on: the typing attributes for
    /// a collapsed cursor, the text at `range` otherwise.
    fn current_attributes(&self, range: TextRange) -> AttributeMap {
        if range.is_empty() {
            if let Some(typing) = self.typing_attributes() {
                return typing.clone();
            }
        }
        self.rich_text_attributes(range)
    }

    /// Attributes for text typed at `index`: those of the char before it,
    /// or of the char at it when `index` starts a paragraph. Attachments are
    /// never inherited.
    fn typing_attributes_at(&self, index: usize) -> AttributeMap {
        let from = if index > 0
            && index <= self.rich_text_len()
            && self.current_paragraph_start(index) != index
        {
            index - 1
        } else {
            index
        };
        let mut attributes = self.rich_text_attributes(TextRange::cursor(from));
        attributes.remove(&AttributeKey::Attachment);
        attributes
    }

    fn rich_text_font(&self, range: TextRange) -> Option<Font> {
        self.rich_text_attribute(AttributeKey::Font, range)
    }

    fn rich_text_color(&self, channel: ColorChannel, range: TextRange) -> Option<Color> {
        self.rich_text_attribute(channel.attribute_key(), range)
    }

    fn rich_text_paragraph_style(&self, range: TextRange) -> Option<ParagraphStyle> {
        self.rich_text_attribute(AttributeKey::ParagraphStyle, range)
    }

    fn rich_text_alignment(&self, range: TextRange) -> Option<TextAlignment> {
        self.rich_text_paragraph_style(range)
            .map(|style| style.alignment)
    }

    fn rich_text_superscript_level(&self, range: TextRange) -> Option<i64> {
        self.rich_text_attribute(AttributeKey::Superscript, range)
    }

    fn rich_text_link(&self, range: TextRange) -> Option<String> {
        self.rich_text_attribute(AttributeKey::Link, range)
    }

    fn rich_text_styles(&self, range: TextRange) -> StyleSet {
        styles_in(&self.rich_text_attributes(range))
    }

    fn current_paragraph_start(&self, from: usize) -> usize {
        self.rich_text().rope().current_paragraph_start(from)
    }

    fn next_paragraph_start(&self, from: usize) -> usize {
        self.rich_text().rope().next_paragraph_start(from)
    }
}

/// Active styles described by an attribute map.
pub fn styles_in(attributes: &AttributeMap) -> StyleSet {
    let font = attributes
        .get(&AttributeKey::Font)
        .and_then(Font::from_attribute_value);

    RichTextStyle::ALL
        .into_iter()
        .filter(|style| {
            if let Some(font_trait) = style.font_trait() {
                return font.as_ref().is_some_and(|font| font.has_trait(font_trait));
            }
            style
                .flag_key()
                .and_then(|key| attributes.get(&key))
                .and_then(i64::from_attribute_value)
                .is_some_and(|flag| flag != 0)
        })
        .collect()
}

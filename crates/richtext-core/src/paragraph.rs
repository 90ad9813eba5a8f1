use crate::attributes::{
    AttributeKey, AttributeValueType as _, ParagraphStyle, TabStop, TextAlignment,
};
use crate::range::TextRange;
use crate::reader::RichTextReader;
use crate::rope_ext::{RopeExt as _, is_paragraph_separator};
use crate::writer::RichTextWriter;

/// Start indices of the paragraphs a paragraph-scoped write at `range`
/// applies to.
///
/// A non-empty range covers every paragraph it touches. A collapsed range
/// resolves to the single paragraph holding the cursor, taking care of the
/// cursor sitting right after or right before a separator.
pub fn paragraph_starts<R: RichTextReader + ?Sized>(reader: &R, range: TextRange) -> Vec<usize> {
    let range = reader.safe_range(range, false);
    let rope = reader.rich_text().rope();

    if range.length > 0 {
        let end = range.end();
        let mut location = rope.current_paragraph_start(range.location);
        let mut starts = vec![location];
        loop {
            let next = rope.next_paragraph_start(location);
            if next <= location || next >= end {
                break;
            }
            starts.push(next);
            location = next;
        }
        return starts;
    }

    let location = range.location;
    if location == 0 {
        return vec![0];
    }

    let before = rope.char_at(location - 1);
    let inside_crlf = before == Some('\r') && rope.char_at(location) == Some('\n');
    if !inside_crlf && before.is_some_and(is_paragraph_separator) {
        return vec![location];
    }
    // Before a separator or mid-paragraph: the paragraph holding the cursor.
    vec![rope.current_paragraph_start(location)]
}

/// Paragraph-scoped writers: alignment, indent, line spacing and tab stops.
///
/// The style is read at each paragraph start, updated and written back over
/// that single char; the buffer then spreads it across the paragraph. With
/// a collapsed range the typing attributes get the same update, so text typed
/// into an empty trailing paragraph keeps it too.
pub trait RichTextParagraphWriter: RichTextWriter {
    fn update_rich_text_paragraph_style(
        &mut self,
        range: TextRange,
        update: &dyn Fn(&mut ParagraphStyle),
    ) {
        let starts = paragraph_starts(&*self, range);
        let len = self.rich_text_len();
        let typing_style = self.safe_range(range, false).is_empty().then(|| {
            let mut style = self
                .current_attributes(range)
                .get(&AttributeKey::ParagraphStyle)
                .and_then(ParagraphStyle::from_attribute_value)
                .unwrap_or_default();
            update(&mut style);
            style
        });

        self.begin_editing();
        for start in starts {
            if start >= len {
                continue;
            }
            let slice = TextRange::new(start, 1);
            let mut style = self.rich_text_paragraph_style(slice).unwrap_or_default();
            update(&mut style);
            self.edit_rich_text_attributes(slice, &mut |attributes| {
                attributes.remove(&AttributeKey::ParagraphStyle);
                attributes.insert(AttributeKey::ParagraphStyle, style.clone().into());
            });
        }
        if let Some(style) = typing_style {
            self.update_typing_attributes(&mut |attributes| {
                attributes.remove(&AttributeKey::ParagraphStyle);
                attributes.insert(AttributeKey::ParagraphStyle, style.clone().into());
            });
        }
        self.end_editing();
    }

    fn set_rich_text_paragraph_style(&mut self, style: &ParagraphStyle, range: TextRange) {
        self.update_rich_text_paragraph_style(range, &|current| *current = style.clone());
    }

    fn set_rich_text_alignment(&mut self, alignment: TextAlignment, range: TextRange) {
        self.update_rich_text_paragraph_style(range, &|style| style.alignment = alignment);
    }

    /// Moves head and first-line head indent together to
    /// `max(head_indent + points, 0)`.
    fn step_rich_text_indent(&mut self, points: f64, range: TextRange) {
        self.update_rich_text_paragraph_style(range, &|style| {
            let indent = (style.head_indent + points).max(0.0);
            style.head_indent = indent;
            style.first_line_head_indent = indent;
        });
    }

    fn step_rich_text_line_spacing(&mut self, points: f64, range: TextRange) {
        self.update_rich_text_paragraph_style(range, &|style| {
            style.line_spacing = (style.line_spacing + points).max(0.0);
        });
    }

    fn set_rich_text_tab_stops(&mut self, tab_stops: &[TabStop], range: TextRange) {
        self.update_rich_text_paragraph_style(range, &|style| {
            style.tab_stops = tab_stops.to_vec();
        });
    }
}

impl<W: RichTextWriter + ?Sized> RichTextParagraphWriter for W {}

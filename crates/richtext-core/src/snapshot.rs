use std::collections::BTreeMap;

use crate::attributes::{AttributeKey, AttributeValueType as _, Color, ColorChannel, Font, ParagraphStyle};
use crate::context::ContextState;
use crate::range::TextRange;
use crate::reader::styles_in;
use crate::view::RichTextView;

/// The context state a view currently implies.
pub type ContextSnapshot = ContextState;

impl ContextState {
    /// Reads the state at the view's selection. A collapsed selection reads
    /// the typing attributes when the view has them.
    pub fn capture<V: RichTextView + ?Sized>(view: &V, highlighted_range: Option<TextRange>) -> Self {
        let selection = view.selected_range();
        let attributes = view.current_attributes(selection);

        let font = attributes
            .get(&AttributeKey::Font)
            .and_then(Font::from_attribute_value)
            .unwrap_or_else(|| view.default_font());
        let colors: BTreeMap<ColorChannel, Color> = ColorChannel::ALL
            .into_iter()
            .filter_map(|channel| {
                attributes
                    .get(&channel.attribute_key())
                    .and_then(Color::from_attribute_value)
                    .map(|color| (channel, color))
            })
            .collect();
        let paragraph_style = attributes
            .get(&AttributeKey::ParagraphStyle)
            .and_then(ParagraphStyle::from_attribute_value)
            .unwrap_or_default();

        Self {
            attributed_string: view.rich_text().clone(),
            selected_range: selection,
            can_copy: view.can_copy(),
            can_undo: view.can_undo(),
            can_redo: view.can_redo(),
            is_editing_text: view.is_editing_text(),
            font_name: font.name,
            font_size: font.size,
            colors,
            styles: styles_in(&attributes),
            text_alignment: paragraph_style.alignment,
            paragraph_style,
            highlighted_range,
        }
    }
}

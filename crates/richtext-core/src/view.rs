use crate::attributed_string::AttributedString;
use crate::attributes::AttributeMap;
use crate::config::ImageConfig;
use crate::range::TextRange;
use crate::writer::RichTextWriter;

/// What happened to a view since its changes were last taken.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BufferChange {
    /// One outermost edit batch finished.
    Edited { text_changed: bool },
    SelectionChanged,
    TypingAttributesChanged,
}

/// The editable text view the coordinator drives: a writer plus selection,
/// typing attributes, undo and change notifications.
pub trait RichTextView: RichTextWriter {
    fn selected_range(&self) -> TextRange;

    fn select_range(&mut self, range: TextRange);

    fn set_typing_attributes(&mut self, attributes: AttributeMap);

    /// Replaces the whole content in one step. Undo history is dropped.
    fn set_attributed_string(&mut self, string: AttributedString);

    fn can_undo(&self) -> bool;

    fn can_redo(&self) -> bool;

    fn undo(&mut self) -> bool;

    fn redo(&mut self) -> bool;

    fn is_editing_text(&self) -> bool;

    fn set_is_editing_text(&mut self, editing: bool);

    fn copy_selection(&mut self);

    fn take_changes(&mut self) -> Vec<BufferChange>;

    fn image_config(&self) -> &ImageConfig;

    /// While disabled, edits still apply but leave no undo record.
    fn set_undo_registration_enabled(&mut self, enabled: bool);

    fn can_copy(&self) -> bool {
        !self.selected_range().is_empty()
    }
}

use std::ops::{Range, RangeInclusive};

use crate::attributed_string::AttributedString;
use crate::attributes::{AttributeMap, Font};
use crate::config::{ImageConfig, RichTextConfig};
use crate::range::TextRange;
use crate::reader::RichTextReader;
use crate::rope_ext::RopeExt as _;
use crate::undo::{EditOp, UndoManager, UndoRecord};
use crate::view::{BufferChange, RichTextView};
use crate::writer::RichTextWriter;

/// The text view's storage: attributed text, selection, typing attributes
/// and undo history.
///
/// Mutations are grouped by `begin_editing`/`end_editing`. The outermost
/// batch becomes one undo record and one [`BufferChange::Edited`].
#[derive(Debug)]
pub struct RichTextBuffer {
    text: AttributedString,
    selection: TextRange,
    typing_attributes: Option<AttributeMap>,
    config: RichTextConfig,
    undo: UndoManager,
    registers_undo: bool,
    edit_depth: usize,
    pending_ops: Vec<EditOp>,
    selection_before: TextRange,
    batch_dirty: bool,
    batch_text_changed: bool,
    changes: Vec<BufferChange>,
    is_editing_text: bool,
    pasteboard: Option<AttributedString>,
}

impl Default for RichTextBuffer {
    fn default() -> Self {
        Self::new(AttributedString::default())
    }
}

impl RichTextBuffer {
    pub fn new(text: AttributedString) -> Self {
        Self::with_config(text, RichTextConfig::default())
    }

    pub fn with_config(text: AttributedString, config: RichTextConfig) -> Self {
        let config = config.with_defaults();
        let selection = TextRange::cursor(text.len());
        Self {
            text,
            selection,
            typing_attributes: None,
            undo: UndoManager::new(config.max_undo),
            config,
            registers_undo: true,
            edit_depth: 0,
            pending_ops: Vec::new(),
            selection_before: selection,
            batch_dirty: false,
            batch_text_changed: false,
            changes: Vec::new(),
            is_editing_text: false,
            pasteboard: None,
        }
    }

    pub fn text(&self) -> &AttributedString {
        &self.text
    }

    pub fn config(&self) -> &RichTextConfig {
        &self.config
    }

    /// The fragment last copied with [`RichTextView::copy_selection`].
    pub fn pasteboard(&self) -> Option<&AttributedString> {
        self.pasteboard.as_ref()
    }

    /// Types `text` over the selection with the typing attributes, or the
    /// attributes of the text before the cursor when none are set.
    pub fn insert_text(&mut self, text: &str) {
        let selection = self.selection;
        let attributes = self
            .typing_attributes
            .clone()
            .unwrap_or_else(|| self.typing_attributes_at(selection.location));
        let fragment = AttributedString::with_attributes(text, attributes);
        let inserted = fragment.len();

        self.begin_editing();
        self.replace_rich_text(selection, &fragment);
        self.set_selection(TextRange::cursor(selection.location + inserted));
        self.end_editing();
    }

    /// Deletes the selection, or the char before a collapsed cursor.
    pub fn delete_backward(&mut self) {
        let selection = self.selection;
        let range = if selection.is_empty() {
            if selection.location == 0 {
                return;
            }
            TextRange::new(selection.location - 1, 1)
        } else {
            selection
        };

        self.begin_editing();
        self.replace_rich_text(range, &AttributedString::default());
        self.set_selection(TextRange::cursor(range.location));
        self.end_editing();
    }

    fn set_selection(&mut self, range: TextRange) {
        let range = self.safe_range(range, false);
        if range == self.selection {
            return;
        }
        self.selection = range;
        self.typing_attributes = None;
        self.changes.push(BufferChange::SelectionChanged);
    }

    /// Applies `mutate` and records the op that reverts it. The recorded
    /// span is widened to whole paragraphs since paragraph styles are
    /// re-fixed around every mutation.
    fn apply_recorded(
        &mut self,
        range: Range<usize>,
        inserted: usize,
        mutate: impl FnOnce(&mut AttributedString),
    ) {
        let rope = self.text.rope();
        let start = rope.current_paragraph_start(range.start);
        let end = rope.paragraph_range(range.end).end.max(range.end);
        let removed = self.text.substring(TextRange::from_bounds(start, end));

        mutate(&mut self.text);

        let new_end = end - range.len() + inserted;
        self.pending_ops
            .push(EditOp::new(TextRange::from_bounds(start, new_end), removed));
        self.batch_dirty = true;
    }

    fn commit_batch(&mut self) {
        if !self.batch_dirty {
            return;
        }

        let mut inverse_ops = std::mem::take(&mut self.pending_ops);
        inverse_ops.reverse();
        if self.registers_undo {
            self.undo.push(UndoRecord {
                inverse_ops,
                selection_before: self.selection_before,
                selection_after: self.selection,
            });
        }

        let text_changed = std::mem::take(&mut self.batch_text_changed);
        self.batch_dirty = false;
        tracing::trace!(text_changed, "edit batch committed");
        self.changes.push(BufferChange::Edited { text_changed });
    }
}

impl RichTextReader for RichTextBuffer {
    fn rich_text(&self) -> &AttributedString {
        &self.text
    }

    fn typing_attributes(&self) -> Option<&AttributeMap> {
        self.typing_attributes.as_ref()
    }
}

impl RichTextWriter for RichTextBuffer {
    fn replace_rich_text(&mut self, range: TextRange, with: &AttributedString) {
        let range = self.safe_range(range, false);
        if range.is_empty() && with.is_empty() {
            return;
        }

        self.begin_editing();
        self.apply_recorded(range.to_range(), with.len(), |text| text.replace(range, with));
        self.batch_text_changed = true;
        let len = self.text.len();
        if self.selection.end() > len {
            let selection = self.safe_range(self.selection, false);
            self.set_selection(selection);
        }
        self.end_editing();
    }

    fn edit_rich_text_attributes(
        &mut self,
        range: TextRange,
        edit: &mut dyn FnMut(&mut AttributeMap),
    ) {
        let range = self.safe_range(range, false);
        if range.is_empty() {
            return;
        }

        self.begin_editing();
        self.apply_recorded(range.to_range(), range.length, |text| {
            text.edit_attributes(range, edit)
        });
        self.end_editing();
    }

    fn begin_editing(&mut self) {
        if self.edit_depth == 0 {
            self.selection_before = self.selection;
        }
        self.edit_depth += 1;
    }

    fn end_editing(&mut self) {
        match self.edit_depth {
            0 => tracing::debug!("end_editing without a matching begin_editing"),
            1 => {
                self.edit_depth = 0;
                self.commit_batch();
            }
            _ => self.edit_depth -= 1,
        }
    }

    fn update_typing_attributes(&mut self, edit: &mut dyn FnMut(&mut AttributeMap)) {
        let location = self.selection.location;
        let mut attributes = self
            .typing_attributes
            .take()
            .unwrap_or_else(|| self.typing_attributes_at(location));
        edit(&mut attributes);
        self.typing_attributes = Some(attributes);
        self.changes.push(BufferChange::TypingAttributesChanged);
    }

    fn default_font(&self) -> Font {
        self.config.default_font.clone()
    }

    fn font_size_range(&self) -> RangeInclusive<f64> {
        self.config.min_font_size..=self.config.max_font_size
    }
}

impl RichTextView for RichTextBuffer {
    fn selected_range(&self) -> TextRange {
        self.selection
    }

    fn select_range(&mut self, range: TextRange) {
        self.set_selection(range);
    }

    fn set_typing_attributes(&mut self, attributes: AttributeMap) {
        if self.typing_attributes.as_ref() == Some(&attributes) {
            return;
        }
        self.typing_attributes = Some(attributes);
        self.changes.push(BufferChange::TypingAttributesChanged);
    }

    fn set_attributed_string(&mut self, string: AttributedString) {
        self.text = string;
        self.undo.clear();
        self.pending_ops.clear();
        self.typing_attributes = None;
        let selection = self.safe_range(self.selection, false);
        self.selection = selection;
        tracing::debug!(len = self.text.len(), "attributed string replaced");
        self.changes.push(BufferChange::Edited { text_changed: true });
    }

    fn can_undo(&self) -> bool {
        self.undo.can_undo()
    }

    fn can_redo(&self) -> bool {
        self.undo.can_redo()
    }

    fn undo(&mut self) -> bool {
        let Some(selection) = self.undo.undo(&mut self.text) else {
            return false;
        };
        self.selection = self.safe_range(selection, false);
        self.typing_attributes = None;
        self.changes.push(BufferChange::Edited { text_changed: true });
        true
    }

    fn redo(&mut self) -> bool {
        let Some(selection) = self.undo.redo(&mut self.text) else {
            return false;
        };
        self.selection = self.safe_range(selection, false);
        self.typing_attributes = None;
        self.changes.push(BufferChange::Edited { text_changed: true });
        true
    }

    fn is_editing_text(&self) -> bool {
        self.is_editing_text
    }

    fn set_is_editing_text(&mut self, editing: bool) {
        self.is_editing_text = editing;
    }

    fn copy_selection(&mut self) {
        if self.selection.is_empty() {
            return;
        }
        self.pasteboard = Some(self.text.substring(self.selection));
    }

    fn take_changes(&mut self) -> Vec<BufferChange> {
        std::mem::take(&mut self.changes)
    }

    fn image_config(&self) -> &ImageConfig {
        &self.config.image
    }

    fn set_undo_registration_enabled(&mut self, enabled: bool) {
        self.registers_undo = enabled;
    }
}

use crate::attributed_string::AttributedString;
use crate::range::TextRange;

/// A single reversible buffer mutation.
#[derive(Debug, Clone, PartialEq)]
pub struct EditOp {
    pub range: TextRange,
    pub content: AttributedString,
}

impl EditOp {
    pub fn new(range: TextRange, content: AttributedString) -> Self {
        Self { range, content }
    }

    /// Applies the op to `text` and returns the op that reverts it.
    pub fn apply(self, text: &mut AttributedString) -> EditOp {
        let len = text.len();
        let location = self.range.location.min(len);
        let range = TextRange::from_bounds(location, self.range.end().min(len));
        let removed = text.substring(range);
        let inserted = self.content.len();
        text.replace(range, &self.content);
        EditOp::new(TextRange::new(location, inserted), removed)
    }
}

#[derive(Debug, Clone)]
pub struct UndoRecord {
    pub inverse_ops: Vec<EditOp>,
    pub selection_before: TextRange,
    pub selection_after: TextRange,
}

/// Undo and redo stacks for one buffer, bounded by `max_undo` records.
#[derive(Debug)]
pub struct UndoManager {
    undo_stack: Vec<UndoRecord>,
    redo_stack: Vec<UndoRecord>,
    max_undo: usize,
}

impl UndoManager {
    pub fn new(max_undo: usize) -> Self {
        Self {
            undo_stack: Vec::new(),
            redo_stack: Vec::new(),
            max_undo: max_undo.max(1),
        }
    }

    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    pub fn undo_len(&self) -> usize {
        self.undo_stack.len()
    }

    /// Records a new change. Any redo history is dropped.
    pub fn push(&mut self, record: UndoRecord) {
        if record.inverse_ops.is_empty() {
            return;
        }
        self.undo_stack.push(record);
        self.redo_stack.clear();
        if self.undo_stack.len() > self.max_undo {
            self.undo_stack.remove(0);
        }
        tracing::trace!(depth = self.undo_stack.len(), "undo record pushed");
    }

    pub fn clear(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
    }

    /// Reverts the latest change on `text` and returns the selection to
    /// restore, or `None` when there is nothing to undo.
    pub fn undo(&mut self, text: &mut AttributedString) -> Option<TextRange> {
        let UndoRecord {
            inverse_ops,
            selection_before,
            selection_after,
        } = self.undo_stack.pop()?;

        let redo_ops = apply_all(inverse_ops, text);
        self.redo_stack.push(UndoRecord {
            inverse_ops: redo_ops,
            selection_before,
            selection_after,
        });
        tracing::debug!(remaining = self.undo_stack.len(), "undo");
        Some(selection_before)
    }

    pub fn redo(&mut self, text: &mut AttributedString) -> Option<TextRange> {
        let UndoRecord {
            inverse_ops,
            selection_before,
            selection_after,
        } = self.redo_stack.pop()?;

        let undo_ops = apply_all(inverse_ops, text);
        self.undo_stack.push(UndoRecord {
            inverse_ops: undo_ops,
            selection_before,
            selection_after,
        });
        tracing::debug!(remaining = self.redo_stack.len(), "redo");
        Some(selection_after)
    }
}

fn apply_all(ops: Vec<EditOp>, text: &mut AttributedString) -> Vec<EditOp> {
    let mut inverse: Vec<EditOp> = ops.into_iter().map(|op| op.apply(text)).collect();
    inverse.reverse();
    inverse
}

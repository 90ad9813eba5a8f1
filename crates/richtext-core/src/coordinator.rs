use crate::action::RichTextAction;
use crate::attributed_string::AttributedString;
use crate::attributes::{AttributeKey, AttributeValueType as _, Color, ColorChannel, ParagraphStyle, TextAlignment};
use crate::buffer::RichTextBuffer;
use crate::config::RichTextConfig;
use crate::context::{ContextEvent, ContextProperty, ContextState, RichTextContext, Subscription};
use crate::insertion::RichTextInserter as _;
use crate::paragraph::RichTextParagraphWriter as _;
use crate::range::TextRange;
use crate::view::{BufferChange, RichTextView};

#[derive(Debug)]
struct Highlight {
    range: TextRange,
    saved: Vec<(TextRange, Option<Color>)>,
}

/// Keeps a [`RichTextContext`] and a view in sync.
///
/// Context events are drained and applied to the view on [`tick`]; view
/// changes are pulled back into the context at the end of the tick, or right
/// away when `defer_context_sync` is off. Undo and redo always pull
/// immediately so the undo flags are current before the next render.
///
/// [`tick`]: RichTextCoordinator::tick
pub struct RichTextCoordinator<V: RichTextView = RichTextBuffer> {
    context: RichTextContext,
    view: V,
    config: RichTextConfig,
    highlight: Option<Highlight>,
    sync_pending: bool,
    _events: Subscription,
}

impl RichTextCoordinator<RichTextBuffer> {
    pub fn with_text(context: RichTextContext, text: AttributedString, config: RichTextConfig) -> Self {
        let buffer = RichTextBuffer::with_config(text, config.clone());
        Self::with_config(context, buffer, config)
    }
}

impl<V: RichTextView> RichTextCoordinator<V> {
    pub fn new(context: RichTextContext, view: V) -> Self {
        Self::with_config(context, view, RichTextConfig::default())
    }

    pub fn with_config(context: RichTextContext, mut view: V, config: RichTextConfig) -> Self {
        let events = context.subscribe_events();
        view.take_changes();
        let mut coordinator = Self {
            context,
            view,
            config: config.with_defaults(),
            highlight: None,
            sync_pending: false,
            _events: events,
        };
        coordinator.sync_now();
        coordinator
    }

    pub fn context(&self) -> &RichTextContext {
        &self.context
    }

    pub fn view(&self) -> &V {
        &self.view
    }

    /// Direct access for host-driven edits such as typing. Changes made here
    /// reach the context on the next tick.
    pub fn view_mut(&mut self) -> &mut V {
        &mut self.view
    }

    /// Runs `f` against the view and handles the resulting changes as if they
    /// came from an action.
    pub fn edit<R>(&mut self, f: impl FnOnce(&mut V) -> R) -> R {
        let result = f(&mut self.view);
        self.after_change();
        result
    }

    pub fn is_sync_pending(&self) -> bool {
        self.sync_pending
    }

    /// Applies queued context events, then pulls the view state into the
    /// context if anything changed.
    pub fn tick(&mut self) {
        for event in self.context.take_events() {
            self.dispatch(event);
        }
        self.process_view_changes();
        if self.sync_pending {
            self.sync_now();
        }
    }

    /// Pulls the view state into the context. Only fields that differ are
    /// written.
    pub fn sync_now(&mut self) -> Vec<ContextProperty> {
        self.sync_pending = false;
        let highlighted_range = self.highlight.as_ref().map(|highlight| highlight.range);
        let snapshot = ContextState::capture(&self.view, highlighted_range);
        let changed = self.context.apply_snapshot(snapshot);
        tracing::trace!(changed = changed.len(), "context synced");
        changed
    }

    fn dispatch(&mut self, event: ContextEvent) {
        let selection = self.view.selected_range();
        match event {
            ContextEvent::Action(action) => self.handle_action(action),
            ContextEvent::FontName(name) => self.view.set_rich_text_font_name(&name, selection),
            ContextEvent::FontSize(size) => {
                self.view.set_rich_text_font_size(size, selection);
                // A clamped size still has to be mirrored back.
                self.sync_pending = true;
            }
            ContextEvent::TextAlignment(alignment) => {
                if self.current_alignment() != alignment {
                    self.view.set_rich_text_alignment(alignment, selection);
                }
            }
            ContextEvent::IsEditingText(editing) => {
                if self.view.is_editing_text() != editing {
                    self.view.set_is_editing_text(editing);
                    self.sync_pending = true;
                }
            }
        }
        self.after_change();
    }

    fn handle_action(&mut self, action: RichTextAction) {
        tracing::debug!(action = action.name(), "handling action");
        let selection = self.view.selected_range();
        match action {
            RichTextAction::Copy => self.view.copy_selection(),
            RichTextAction::DismissKeyboard => {
                if self.view.is_editing_text() {
                    self.view.set_is_editing_text(false);
                    self.sync_pending = true;
                }
            }
            RichTextAction::PasteText {
                text,
                index,
                move_cursor,
            } => self.view.paste_text(&text, index, move_cursor),
            RichTextAction::PasteImage {
                image,
                index,
                move_cursor,
            } => self.view.paste_image(&image, index, move_cursor),
            RichTextAction::PasteImages {
                images,
                index,
                move_cursor,
            } => self.view.paste_images(&images, index, move_cursor),
            RichTextAction::SetColor { channel, color } => {
                self.view.set_rich_text_color(channel, color, selection)
            }
            RichTextAction::SetStyle { style, enabled } => {
                self.view.set_rich_text_style(style, enabled, selection)
            }
            RichTextAction::ToggleStyle { style } => {
                self.view.toggle_rich_text_style(style, selection)
            }
            RichTextAction::StepFontSize { points } => {
                self.view.step_rich_text_font_size(points, selection)
            }
            RichTextAction::StepIndent { points } => {
                self.view.step_rich_text_indent(points, selection)
            }
            RichTextAction::StepLineSpacing { points } => {
                self.view.step_rich_text_line_spacing(points, selection)
            }
            RichTextAction::StepSuperscript { steps } => {
                self.view.step_rich_text_superscript_level(steps, selection)
            }
            RichTextAction::SetAlignment { alignment } => {
                self.view.set_rich_text_alignment(alignment, selection)
            }
            RichTextAction::SetHighlightedRange { range } => self.set_highlighted_range(range),
            RichTextAction::UndoLatestChange => {
                if self.view.undo() {
                    self.process_view_changes();
                    self.sync_now();
                }
            }
            RichTextAction::RedoLatestChange => {
                if self.view.redo() {
                    self.process_view_changes();
                    self.sync_now();
                }
            }
            RichTextAction::SelectRange { range } => self.view.select_range(range),
            RichTextAction::SetAttributedString { string } => {
                self.highlight = None;
                self.view.set_attributed_string(string);
            }
        }
    }

    fn current_alignment(&self) -> TextAlignment {
        self.view
            .current_attributes(self.view.selected_range())
            .get(&AttributeKey::ParagraphStyle)
            .and_then(ParagraphStyle::from_attribute_value)
            .unwrap_or_default()
            .alignment
    }

    /// Paints `range` with the highlight color. The background it covered is
    /// saved and put back once the highlight is cleared or moved. None of
    /// this is registered with undo.
    fn set_highlighted_range(&mut self, range: Option<TextRange>) {
        let range = range
            .map(|range| self.view.safe_range(range, false))
            .filter(|range| !range.is_empty());
        if self.highlight.as_ref().map(|highlight| highlight.range) == range {
            return;
        }

        self.view.set_undo_registration_enabled(false);
        self.view.begin_editing();
        if let Some(previous) = self.highlight.take() {
            for (range, color) in previous.saved {
                let range = self.view.safe_range(range, false);
                if !range.is_empty() {
                    self.view.set_rich_text_color(ColorChannel::Background, color, range);
                }
            }
        }
        if let Some(range) = range {
            let saved = self
                .view
                .rich_text()
                .attribute_runs(range)
                .map(|(run, attributes)| {
                    let color = attributes
                        .get(&AttributeKey::BackgroundColor)
                        .and_then(Color::from_attribute_value);
                    (run, color)
                })
                .collect();
            self.view.set_rich_text_color(
                ColorChannel::Background,
                Some(self.config.highlight_color),
                range,
            );
            self.highlight = Some(Highlight { range, saved });
        }
        self.view.end_editing();
        self.view.set_undo_registration_enabled(true);
        self.sync_pending = true;
    }

    fn after_change(&mut self) {
        self.process_view_changes();
        if self.sync_pending && !self.config.defer_context_sync {
            self.sync_now();
        }
    }

    fn process_view_changes(&mut self) {
        let changes = self.view.take_changes();
        if changes.is_empty() {
            return;
        }

        if changes.contains(&BufferChange::SelectionChanged) {
            self.refresh_typing_attributes();
        }
        self.sync_pending = true;
    }

    /// With a collapsed cursor, re-applies the attributes of the text the
    /// cursor continues as the typing attributes.
    fn refresh_typing_attributes(&mut self) {
        if !self.config.refresh_typing_attributes_at_cursor {
            return;
        }
        let selection = self.view.selected_range();
        if !selection.is_empty() {
            return;
        }
        let attributes = self.view.typing_attributes_at(selection.location);
        self.view.set_typing_attributes(attributes);
        self.view.take_changes();
    }
}

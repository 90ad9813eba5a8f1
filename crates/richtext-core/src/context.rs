use std::cell::RefCell;
use std::collections::{BTreeMap, VecDeque};
use std::rc::{Rc, Weak};

use crate::action::RichTextAction;
use crate::attributed_string::AttributedString;
use crate::attributes::{Color, ColorChannel, Font, ParagraphStyle, TextAlignment};
use crate::range::TextRange;
use crate::snapshot::ContextSnapshot;
use crate::style::{RichTextStyle, StyleSet};

/// Everything the context mirrors from the buffer.
#[derive(Debug, Clone, PartialEq)]
pub struct ContextState {
    pub attributed_string: AttributedString,
    pub selected_range: TextRange,
    pub can_copy: bool,
    pub can_undo: bool,
    pub can_redo: bool,
    pub is_editing_text: bool,
    pub font_name: String,
    pub font_size: f64,
    pub colors: BTreeMap<ColorChannel, Color>,
    pub styles: StyleSet,
    pub text_alignment: TextAlignment,
    pub paragraph_style: ParagraphStyle,
    pub highlighted_range: Option<TextRange>,
}

impl Default for ContextState {
    fn default() -> Self {
        let font = Font::default();
        Self {
            attributed_string: AttributedString::default(),
            selected_range: TextRange::default(),
            can_copy: false,
            can_undo: false,
            can_redo: false,
            is_editing_text: false,
            font_name: font.name,
            font_size: font.size,
            colors: BTreeMap::new(),
            styles: StyleSet::new(),
            text_alignment: TextAlignment::default(),
            paragraph_style: ParagraphStyle::default(),
            highlighted_range: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContextProperty {
    AttributedString,
    SelectedRange,
    CanCopy,
    CanUndo,
    CanRedo,
    IsEditingText,
    FontName,
    FontSize,
    Colors,
    Styles,
    TextAlignment,
    ParagraphStyle,
    HighlightedRange,
}

/// A write intent queued for the coordinator.
#[derive(Debug, Clone, PartialEq)]
pub enum ContextEvent {
    Action(RichTextAction),
    FontName(String),
    FontSize(f64),
    TextAlignment(TextAlignment),
    IsEditingText(bool),
}

type Observer = Rc<dyn Fn(ContextProperty)>;

struct ContextInner {
    state: ContextState,
    events: VecDeque<ContextEvent>,
    event_subscriber: Option<u64>,
    observers: Vec<(u64, Observer)>,
    next_subscription_id: u64,
    notification_count: u64,
}

/// Observable mirror of the buffer's formatting state, plus the queue of
/// write intents the coordinator drains.
///
/// Cloning the context clones the handle; all clones share one state.
#[derive(Clone)]
pub struct RichTextContext {
    inner: Rc<RefCell<ContextInner>>,
    pending_removals: Rc<RefCell<Vec<SubscriptionKind>>>,
}

impl Default for RichTextContext {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for RichTextContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let inner = self.inner.borrow();
        f.debug_struct("RichTextContext")
            .field("state", &inner.state)
            .field("pending_events", &inner.events.len())
            .field("observers", &inner.observers.len())
            .finish()
    }
}

impl RichTextContext {
    pub fn new() -> Self {
        Self {
            inner: Rc::new(RefCell::new(ContextInner {
                state: ContextState::default(),
                events: VecDeque::new(),
                event_subscriber: None,
                observers: Vec::new(),
                next_subscription_id: 0,
                notification_count: 0,
            })),
            pending_removals: Rc::default(),
        }
    }

    /// Queues `action` for the coordinator. Without a coordinator attached
    /// the action is dropped.
    pub fn handle(&self, action: RichTextAction) {
        self.push_event(ContextEvent::Action(action));
    }

    pub fn state(&self) -> ContextState {
        self.inner.borrow().state.clone()
    }

    pub fn with_state<R>(&self, f: impl FnOnce(&ContextState) -> R) -> R {
        f(&self.inner.borrow().state)
    }

    /// Calls `callback` for every property that changes. Dropping the
    /// returned subscription stops the calls.
    pub fn observe(&self, callback: impl Fn(ContextProperty) + 'static) -> Subscription {
        self.remove_pending_subscriptions();
        let mut inner = self.inner.borrow_mut();
        let id = inner.next_subscription_id;
        inner.next_subscription_id += 1;
        inner.observers.push((id, Rc::new(callback)));
        Subscription {
            context: Rc::downgrade(&self.inner),
            pending_removals: Rc::downgrade(&self.pending_removals),
            kind: SubscriptionKind::Observer(id),
        }
    }

    /// Number of property notifications sent so far.
    pub fn notification_count(&self) -> u64 {
        self.inner.borrow().notification_count
    }

    pub fn attributed_string(&self) -> AttributedString {
        self.with_state(|state| state.attributed_string.clone())
    }

    pub fn selected_range(&self) -> TextRange {
        self.with_state(|state| state.selected_range)
    }

    pub fn can_copy(&self) -> bool {
        self.with_state(|state| state.can_copy)
    }

    pub fn can_undo(&self) -> bool {
        self.with_state(|state| state.can_undo)
    }

    pub fn can_redo(&self) -> bool {
        self.with_state(|state| state.can_redo)
    }

    pub fn is_editing_text(&self) -> bool {
        self.with_state(|state| state.is_editing_text)
    }

    pub fn font_name(&self) -> String {
        self.with_state(|state| state.font_name.clone())
    }

    pub fn font_size(&self) -> f64 {
        self.with_state(|state| state.font_size)
    }

    pub fn color(&self, channel: ColorChannel) -> Option<Color> {
        self.with_state(|state| state.colors.get(&channel).copied())
    }

    pub fn styles(&self) -> StyleSet {
        self.with_state(|state| state.styles.clone())
    }

    pub fn has_style(&self, style: RichTextStyle) -> bool {
        self.with_state(|state| state.styles.contains(&style))
    }

    pub fn text_alignment(&self) -> TextAlignment {
        self.with_state(|state| state.text_alignment)
    }

    pub fn paragraph_style(&self) -> ParagraphStyle {
        self.with_state(|state| state.paragraph_style.clone())
    }

    pub fn highlighted_range(&self) -> Option<TextRange> {
        self.with_state(|state| state.highlighted_range)
    }

    pub fn set_font_name(&self, name: impl Into<String>) {
        let name = name.into();
        self.set_property(ContextProperty::FontName, |state| {
            if state.font_name == name {
                return false;
            }
            state.font_name = name.clone();
            true
        });
        self.push_event(ContextEvent::FontName(name));
    }

    pub fn set_font_size(&self, size: f64) {
        self.set_property(ContextProperty::FontSize, |state| {
            if state.font_size == size {
                return false;
            }
            state.font_size = size;
            true
        });
        self.push_event(ContextEvent::FontSize(size));
    }

    pub fn set_text_alignment(&self, alignment: TextAlignment) {
        self.set_property(ContextProperty::TextAlignment, |state| {
            if state.text_alignment == alignment {
                return false;
            }
            state.text_alignment = alignment;
            true
        });
        self.push_event(ContextEvent::TextAlignment(alignment));
    }

    pub fn set_is_editing_text(&self, editing: bool) {
        self.set_property(ContextProperty::IsEditingText, |state| {
            if state.is_editing_text == editing {
                return false;
            }
            state.is_editing_text = editing;
            true
        });
        self.push_event(ContextEvent::IsEditingText(editing));
    }

    pub fn toggle_style(&self, style: RichTextStyle) {
        self.handle(RichTextAction::ToggleStyle { style });
    }

    pub fn select_range(&self, range: TextRange) {
        self.handle(RichTextAction::SelectRange { range });
    }

    pub fn undo_latest_change(&self) {
        self.handle(RichTextAction::UndoLatestChange);
    }

    pub fn redo_latest_change(&self) {
        self.handle(RichTextAction::RedoLatestChange);
    }

    pub fn set_attributed_string(&self, string: AttributedString) {
        self.handle(RichTextAction::SetAttributedString { string });
    }

    pub(crate) fn subscribe_events(&self) -> Subscription {
        self.remove_pending_subscriptions();
        let mut inner = self.inner.borrow_mut();
        let id = inner.next_subscription_id;
        inner.next_subscription_id += 1;
        if inner.event_subscriber.replace(id).is_some() {
            tracing::debug!("context events taken over by a new coordinator");
        }
        Subscription {
            context: Rc::downgrade(&self.inner),
            pending_removals: Rc::downgrade(&self.pending_removals),
            kind: SubscriptionKind::Events(id),
        }
    }

    pub(crate) fn take_events(&self) -> Vec<ContextEvent> {
        self.remove_pending_subscriptions();
        self.inner.borrow_mut().events.drain(..).collect()
    }

    /// Writes every field of `snapshot` that differs from the current state
    /// and notifies observers once per changed property.
    pub(crate) fn apply_snapshot(&self, snapshot: ContextSnapshot) -> Vec<ContextProperty> {
        let changed = {
            let mut inner = self.inner.borrow_mut();
            let state = &mut inner.state;
            let mut changed = Vec::new();

            macro_rules! sync_field {
                ($field:ident, $property:ident) => {
                    if state.$field != snapshot.$field {
                        state.$field = snapshot.$field;
                        changed.push(ContextProperty::$property);
                    }
                };
            }

            sync_field!(attributed_string, AttributedString);
            sync_field!(selected_range, SelectedRange);
            sync_field!(can_copy, CanCopy);
            sync_field!(can_undo, CanUndo);
            sync_field!(can_redo, CanRedo);
            sync_field!(is_editing_text, IsEditingText);
            sync_field!(font_name, FontName);
            sync_field!(font_size, FontSize);
            sync_field!(colors, Colors);
            sync_field!(styles, Styles);
            sync_field!(text_alignment, TextAlignment);
            sync_field!(paragraph_style, ParagraphStyle);
            sync_field!(highlighted_range, HighlightedRange);
            changed
        };

        self.notify(&changed);
        changed
    }

    fn set_property(&self, property: ContextProperty, update: impl FnOnce(&mut ContextState) -> bool) {
        let changed = update(&mut self.inner.borrow_mut().state);
        if changed {
            self.notify(&[property]);
        }
    }

    fn push_event(&self, event: ContextEvent) {
        self.remove_pending_subscriptions();
        let mut inner = self.inner.borrow_mut();
        if inner.event_subscriber.is_none() {
            tracing::debug!(?event, "no coordinator attached, dropping context event");
            return;
        }
        inner.events.push_back(event);
    }

    /// Observers run without the state borrowed, so they may read the
    /// context or drop their own subscription.
    fn notify(&self, properties: &[ContextProperty]) {
        self.remove_pending_subscriptions();
        if properties.is_empty() {
            return;
        }
        let observers: Vec<(u64, Observer)> = self.inner.borrow().observers.clone();
        for property in properties {
            self.inner.borrow_mut().notification_count += 1;
            for (id, observer) in &observers {
                let subscribed = self
                    .inner
                    .borrow()
                    .observers
                    .iter()
                    .any(|(observer_id, _)| observer_id == id);
                if subscribed {
                    observer(*property);
                }
            }
            self.remove_pending_subscriptions();
        }
    }

    /// Finishes removals for subscriptions dropped while the context was
    /// borrowed.
    fn remove_pending_subscriptions(&self) {
        let pending = std::mem::take(&mut *self.pending_removals.borrow_mut());
        if pending.is_empty() {
            return;
        }
        let mut inner = self.inner.borrow_mut();
        for kind in pending {
            inner.remove_subscription(kind);
        }
    }
}

impl ContextInner {
    fn remove_subscription(&mut self, kind: SubscriptionKind) {
        match kind {
            SubscriptionKind::Events(id) => {
                if self.event_subscriber == Some(id) {
                    self.event_subscriber = None;
                    self.events.clear();
                }
            }
            SubscriptionKind::Observer(id) => {
                self.observers.retain(|(observer_id, _)| *observer_id != id);
            }
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum SubscriptionKind {
    Events(u64),
    Observer(u64),
}

/// Keeps an observer or the coordinator attached to a context until dropped.
#[must_use]
pub struct Subscription {
    context: Weak<RefCell<ContextInner>>,
    pending_removals: Weak<RefCell<Vec<SubscriptionKind>>>,
    kind: SubscriptionKind,
}

impl Drop for Subscription {
    fn drop(&mut self) {
        let Some(inner) = self.context.upgrade() else {
            return;
        };
        match inner.try_borrow_mut() {
            Ok(mut inner) => inner.remove_subscription(self.kind),
            Err(_) => {
                tracing::debug!(kind = ?self.kind, "context busy, deferring subscription removal");
                if let Some(pending) = self.pending_removals.upgrade() {
                    pending.borrow_mut().push(self.kind);
                }
            }
        }
    }
}

use std::cell::Cell;
use std::rc::Rc;

use pretty_assertions::assert_eq;
use richtext_core::{
    AttributeKey, AttributedString, Color, ColorChannel, ContextProperty, FontTrait, RichTextAction,
    RichTextConfig, RichTextContext, RichTextCoordinator, RichTextReader, RichTextStyle,
    RichTextView, RichTextWriter, TextAlignment, TextRange,
};

fn coordinator_with(text: &str, config: RichTextConfig) -> (RichTextContext, RichTextCoordinator) {
    let context = RichTextContext::new();
    let coordinator =
        RichTextCoordinator::with_text(context.clone(), AttributedString::new(text), config);
    (context, coordinator)
}

fn coordinator(text: &str) -> (RichTextContext, RichTextCoordinator) {
    coordinator_with(text, RichTextConfig::default())
}

fn count_property(context: &RichTextContext, property: ContextProperty) -> (Rc<Cell<usize>>, richtext_core::Subscription) {
    let count = Rc::new(Cell::new(0));
    let subscription = context.observe({
        let count = count.clone();
        move |changed| {
            if changed == property {
                count.set(count.get() + 1);
            }
        }
    });
    (count, subscription)
}

#[test]
fn construction_pulls_the_initial_state() {
    let (context, _coordinator) = coordinator("Hello world");
    assert_eq!(context.attributed_string().string(), "Hello world");
    assert_eq!(context.selected_range(), TextRange::cursor(11));
    assert!(!context.can_undo());
    assert!(!context.can_copy());
}

#[test]
fn actions_apply_on_tick() {
    let (context, mut coordinator) = coordinator("Hello world");
    context.select_range(TextRange::new(0, 5));
    context.toggle_style(RichTextStyle::Bold);
    assert!(!context.has_style(RichTextStyle::Bold));

    coordinator.tick();
    assert!(context.has_style(RichTextStyle::Bold));
    assert!(context.can_copy());
    assert!(context.can_undo());
    assert!(coordinator
        .view()
        .rich_text_styles(TextRange::new(0, 5))
        .contains(&RichTextStyle::Bold));
    assert!(!coordinator
        .view()
        .rich_text_styles(TextRange::new(6, 5))
        .contains(&RichTextStyle::Bold));
}

#[test]
fn deferred_sync_coalesces_changes_within_a_tick() {
    let (context, mut coordinator) = coordinator("Hello world");
    context.select_range(TextRange::new(0, 5));
    coordinator.tick();

    let (styles, _subscription) = count_property(&context, ContextProperty::Styles);
    context.toggle_style(RichTextStyle::Bold);
    context.toggle_style(RichTextStyle::Bold);
    coordinator.tick();
    assert_eq!(styles.get(), 0);
}

#[test]
fn inline_sync_reports_every_change() {
    let config = RichTextConfig {
        defer_context_sync: false,
        ..RichTextConfig::default()
    };
    let (context, mut coordinator) = coordinator_with("Hello world", config);
    context.select_range(TextRange::new(0, 5));
    coordinator.tick();

    let (styles, _subscription) = count_property(&context, ContextProperty::Styles);
    context.toggle_style(RichTextStyle::Bold);
    context.toggle_style(RichTextStyle::Bold);
    coordinator.tick();
    assert_eq!(styles.get(), 2);
}

#[test]
fn host_edits_reach_the_context_on_the_next_tick() {
    let (context, mut coordinator) = coordinator("Hello");
    coordinator.view_mut().insert_text("!");
    assert_eq!(context.attributed_string().string(), "Hello");

    coordinator.tick();
    assert_eq!(context.attributed_string().string(), "Hello!");
    assert_eq!(context.selected_range(), TextRange::cursor(6));
}

#[test]
fn repeated_pulls_do_not_notify() {
    let (context, mut coordinator) = coordinator("Hello world");
    context.select_range(TextRange::new(0, 5));
    context.toggle_style(RichTextStyle::Italic);
    coordinator.tick();

    let before = context.notification_count();
    let state = context.state();
    for _ in 0..3 {
        assert!(coordinator.sync_now().is_empty());
        coordinator.tick();
    }
    assert_eq!(context.notification_count(), before);
    assert_eq!(context.state(), state);
}

#[test]
fn undo_and_redo_update_flags() {
    let (context, mut coordinator) = coordinator("Hello world");
    context.select_range(TextRange::new(0, 5));
    context.toggle_style(RichTextStyle::Bold);
    coordinator.tick();
    assert!(context.can_undo());
    assert!(!context.can_redo());

    let redo_seen = Rc::new(Cell::new(false));
    let _subscription = context.observe({
        let context = context.clone();
        let redo_seen = redo_seen.clone();
        move |property| {
            if property == ContextProperty::CanRedo {
                redo_seen.set(context.can_redo());
            }
        }
    });

    context.undo_latest_change();
    coordinator.tick();
    assert!(redo_seen.get());
    assert!(!context.can_undo());
    assert!(!context.has_style(RichTextStyle::Bold));

    context.redo_latest_change();
    coordinator.tick();
    assert!(context.can_undo());
    assert!(!context.can_redo());
    assert!(context.has_style(RichTextStyle::Bold));
}

#[test]
fn idle_cursor_refreshes_typing_attributes() {
    let (context, mut coordinator) = coordinator("Hello world");
    coordinator
        .view_mut()
        .set_rich_text_style(RichTextStyle::Bold, true, TextRange::new(6, 5));
    coordinator.tick();

    context.select_range(TextRange::cursor(8));
    coordinator.tick();
    let typing = coordinator.view().typing_attributes().cloned().unwrap();
    assert!(typing.contains_key(&AttributeKey::Font));
    assert!(context.has_style(RichTextStyle::Bold));

    context.select_range(TextRange::new(6, 2));
    coordinator.tick();
    assert!(coordinator.view().typing_attributes().is_none());
}

#[test]
fn typed_text_keeps_the_toggled_style() {
    let (context, mut coordinator) = coordinator("abcd");
    context.select_range(TextRange::cursor(2));
    coordinator.tick();
    context.toggle_style(RichTextStyle::Bold);
    coordinator.tick();

    coordinator.edit(|view| view.insert_text("x"));
    coordinator.tick();
    assert!(context.has_style(RichTextStyle::Bold));

    coordinator.edit(|view| view.insert_text("y"));
    coordinator.tick();
    let view = coordinator.view();
    assert_eq!(view.text().string(), "abxycd");
    assert!(view.rich_text_styles(TextRange::cursor(3)).contains(&RichTextStyle::Bold));
    assert!(view.rich_text_styles(TextRange::cursor(4)).is_empty());
    assert!(context.has_style(RichTextStyle::Bold));
}

#[test]
fn font_size_from_the_context_covers_a_mixed_selection() {
    let (context, mut coordinator) = coordinator("ab");
    coordinator
        .view_mut()
        .set_rich_text_font_size(20.0, TextRange::new(1, 1));
    context.select_range(TextRange::new(0, 2));
    coordinator.tick();
    assert_eq!(context.font_size(), 16.0);

    context.set_font_size(16.0);
    coordinator.tick();
    assert_eq!(coordinator.view().current_font(TextRange::new(1, 1)).size, 16.0);
}

#[test]
fn idle_cursor_refresh_can_be_turned_off() {
    let config = RichTextConfig {
        refresh_typing_attributes_at_cursor: false,
        ..RichTextConfig::default()
    };
    let (context, mut coordinator) = coordinator_with("Hello world", config);
    context.select_range(TextRange::cursor(3));
    coordinator.tick();
    assert!(coordinator.view().typing_attributes().is_none());
}

#[test]
fn highlight_is_restored_and_not_undoable() {
    let blue = Color::rgb(0, 0, 255);
    let mut text = AttributedString::new("Hello world");
    text.set_rich_text_color(ColorChannel::Background, Some(blue), TextRange::new(0, 5));
    let context = RichTextContext::new();
    let mut coordinator =
        RichTextCoordinator::with_text(context.clone(), text, RichTextConfig::default());
    let highlight = RichTextConfig::default().highlight_color;

    context.handle(RichTextAction::SetHighlightedRange {
        range: Some(TextRange::new(3, 5)),
    });
    coordinator.tick();
    let view = coordinator.view();
    assert_eq!(view.rich_text_color(ColorChannel::Background, TextRange::cursor(1)), Some(blue));
    assert_eq!(view.rich_text_color(ColorChannel::Background, TextRange::cursor(3)), Some(highlight));
    assert_eq!(view.rich_text_color(ColorChannel::Background, TextRange::cursor(7)), Some(highlight));
    assert_eq!(view.rich_text_color(ColorChannel::Background, TextRange::cursor(8)), None);
    assert_eq!(context.highlighted_range(), Some(TextRange::new(3, 5)));
    assert!(!context.can_undo());

    context.handle(RichTextAction::SetHighlightedRange { range: None });
    coordinator.tick();
    let view = coordinator.view();
    assert_eq!(view.rich_text_color(ColorChannel::Background, TextRange::cursor(3)), Some(blue));
    assert_eq!(view.rich_text_color(ColorChannel::Background, TextRange::cursor(5)), None);
    assert_eq!(view.rich_text_color(ColorChannel::Background, TextRange::cursor(7)), None);
    assert_eq!(context.highlighted_range(), None);
    assert!(!context.can_undo());
}

#[test]
fn property_changes_are_pushed_to_the_view() {
    let (context, mut coordinator) = coordinator("Hello world");
    context.select_range(TextRange::new(0, 5));
    coordinator.tick();

    context.set_font_size(24.0);
    context.set_font_name("Georgia");
    coordinator.tick();
    let font = coordinator.view().rich_text_font(TextRange::new(0, 5)).unwrap();
    assert_eq!(font.name, "Georgia");
    assert_eq!(font.size, 24.0);
    assert!(!font.has_trait(FontTrait::Bold));
    assert_eq!(coordinator.view().rich_text_font(TextRange::new(6, 5)), None);

    context.set_font_size(1000.0);
    coordinator.tick();
    assert_eq!(context.font_size(), 512.0);

    context.set_text_alignment(TextAlignment::Center);
    coordinator.tick();
    assert_eq!(
        coordinator.view().rich_text_alignment(TextRange::cursor(10)),
        Some(TextAlignment::Center)
    );
    assert_eq!(context.text_alignment(), TextAlignment::Center);
}

#[test]
fn editing_focus_round_trips() {
    let (context, mut coordinator) = coordinator("Hello");
    context.set_is_editing_text(true);
    coordinator.tick();
    assert!(coordinator.view().is_editing_text());

    context.handle(RichTextAction::DismissKeyboard);
    coordinator.tick();
    assert!(!coordinator.view().is_editing_text());
    assert!(!context.is_editing_text());
}

#[test]
fn copy_paste_and_replace_through_actions() {
    let (context, mut coordinator) = coordinator("Hello world");
    context.select_range(TextRange::new(0, 5));
    context.handle(RichTextAction::Copy);
    context.handle(RichTextAction::PasteText {
        text: "Oh, ".to_string(),
        index: 0,
        move_cursor: false,
    });
    coordinator.tick();

    assert_eq!(
        coordinator.view().pasteboard().map(|copied| copied.string()),
        Some("Hello".to_string())
    );
    assert_eq!(context.attributed_string().string(), "Oh, Hello world");
    assert_eq!(context.selected_range(), TextRange::new(4, 5));

    context.set_attributed_string(AttributedString::new("New"));
    coordinator.tick();
    assert_eq!(context.attributed_string().string(), "New");
    assert!(!context.can_undo());
}

#[test]
fn dropping_the_coordinator_detaches_it() {
    let (context, coordinator) = coordinator("Hello");
    drop(coordinator);
    context.toggle_style(RichTextStyle::Bold);

    let mut coordinator = RichTextCoordinator::new(
        context.clone(),
        richtext_core::RichTextBuffer::new(AttributedString::new("Again")),
    );
    coordinator.tick();
    assert_eq!(context.attributed_string().string(), "Again");
    assert!(!context.has_style(RichTextStyle::Bold));
}

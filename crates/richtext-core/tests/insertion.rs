use richtext_core::{
    ATTACHMENT_CHAR, AttributeKey, AttributeMap, AttributedString, Font, FontTrait, ImageAttachment,
    Insertion, RichTextBuffer, RichTextImage, RichTextInserter, RichTextReader, RichTextView, Size,
    TextRange,
};

fn buffer(text: &str) -> RichTextBuffer {
    RichTextBuffer::new(AttributedString::new(text))
}

fn image(width: f64, height: f64, byte: u8) -> RichTextImage {
    RichTextImage::new(Size::new(width, height), vec![byte; 64])
}

fn attachment_at(buffer: &RichTextBuffer, index: usize) -> Option<ImageAttachment> {
    buffer.rich_text_attribute(AttributeKey::Attachment, TextRange::cursor(index))
}

#[test]
fn paste_with_move_cursor_lands_after_the_text() {
    let mut buffer = buffer("abcd");
    buffer.select_range(TextRange::cursor(0));

    buffer.paste_text("X", 2, true);
    assert_eq!(buffer.text().string(), "abXcd");
    assert_eq!(buffer.selected_range(), TextRange::cursor(3));
}

#[test]
fn paste_at_the_live_cursor_moves_past_itself() {
    let mut buffer = buffer("abcd");
    buffer.select_range(TextRange::cursor(2));

    buffer.paste_text("X", 2, false);
    assert_eq!(buffer.text().string(), "abXcd");
    assert_eq!(buffer.selected_range(), TextRange::cursor(3));
}

#[test]
fn paste_elsewhere_keeps_the_selection() {
    let mut buffer = buffer("abcd");
    buffer.select_range(TextRange::cursor(0));

    buffer.paste_text("XY", 2, false);
    assert_eq!(buffer.text().string(), "abXYcd");
    assert_eq!(buffer.selected_range(), TextRange::cursor(0));
}

#[test]
fn pasted_text_inherits_surrounding_attributes() {
    let bold = Font::default().with_trait(FontTrait::Bold, true);
    let mut buffer = RichTextBuffer::new(AttributedString::with_attributes(
        "ab",
        AttributeMap::from([(AttributeKey::Font, bold.clone().into())]),
    ));

    buffer.paste_text("X", 1, true);
    assert_eq!(buffer.text().string(), "aXb");
    assert_eq!(buffer.rich_text_font(TextRange::cursor(1)), Some(bold));
    assert_eq!(buffer.text().runs().len(), 1);
}

#[test]
fn paste_index_is_clamped() {
    let mut buffer = buffer("ab");
    buffer.insert(Insertion::text("c", 99, true));
    assert_eq!(buffer.text().string(), "abc");
    assert_eq!(buffer.selected_range(), TextRange::cursor(3));
}

#[test]
fn images_keep_input_order() {
    let mut buffer = buffer("");
    buffer.paste_images(&[image(10.0, 10.0, 1), image(20.0, 20.0, 2)], 0, true);

    let expected: String = [ATTACHMENT_CHAR, '\n', ATTACHMENT_CHAR, '\n'].iter().collect();
    assert_eq!(buffer.text().string(), expected);
    assert_eq!(buffer.selected_range(), TextRange::cursor(4));

    let first = attachment_at(&buffer, 0).unwrap();
    let second = attachment_at(&buffer, 2).unwrap();
    assert_eq!(first.image_size, Size::new(10.0, 10.0));
    assert_eq!(second.image_size, Size::new(20.0, 20.0));
    assert_eq!(first.image().unwrap().data, vec![1; 64]);
    assert!(attachment_at(&buffer, 1).is_none());
}

#[test]
fn image_replaces_selection_starting_at_the_index() {
    let mut buffer = buffer("hello world");
    buffer.select_range(TextRange::new(0, 5));

    buffer.paste_image(&image(10.0, 10.0, 7), 0, false);
    let expected = format!("{ATTACHMENT_CHAR}\n world");
    assert_eq!(buffer.text().string(), expected);
    assert_eq!(buffer.selected_range(), TextRange::cursor(2));
}

#[test]
fn oversized_images_are_scaled_to_fit() {
    let mut buffer = buffer("");
    buffer.insert(Insertion::image(image(1600.0, 400.0, 3), 0, true));

    let attachment = attachment_at(&buffer, 0).unwrap();
    assert_eq!(attachment.image_size, Size::new(1600.0, 400.0));
    assert_eq!(attachment.bounds, Size::new(800.0, 200.0));
}

#[test]
fn text_pasted_next_to_an_image_is_not_an_attachment() {
    let mut buffer = buffer("");
    buffer.paste_image(&image(10.0, 10.0, 1), 0, true);
    buffer.paste_text("caption", 0, false);

    assert!(buffer.text().string().starts_with("caption"));
    assert!(attachment_at(&buffer, 0).is_none());
    assert!(attachment_at(&buffer, 7).is_some());
}

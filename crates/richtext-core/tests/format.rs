use pretty_assertions::assert_eq;
use richtext_core::{
    ATTACHMENT_CHAR, AttributedString, Color, ColorChannel, Font, FontTrait, RichTextArchive,
    RichTextBuffer, RichTextDataError, RichTextDataFormat, RichTextImage, RichTextInserter,
    RichTextParagraphWriter, RichTextStyle, RichTextWriter, Size, TextAlignment, TextRange,
};

fn formatted() -> AttributedString {
    let mut buffer = RichTextBuffer::new(AttributedString::new("Title\nbody text\n"));
    buffer.set_rich_text_alignment(TextAlignment::Center, TextRange::cursor(0));
    buffer.set_rich_text_font(
        Font::new("Georgia", 28.0).with_trait(FontTrait::Bold, true),
        TextRange::new(0, 5),
    );
    buffer.set_rich_text_style(RichTextStyle::Underlined, true, TextRange::new(6, 4));
    buffer.set_rich_text_color(
        ColorChannel::Foreground,
        Some(Color::rgba(10, 20, 30, 128)),
        TextRange::new(11, 4),
    );
    buffer.paste_image(
        &RichTextImage::new(Size::new(32.0, 16.0), vec![9; 128]),
        16,
        true,
    );
    buffer.text().clone()
}

#[test]
fn archive_round_trip_keeps_attributes() -> anyhow::Result<()> {
    let original = formatted();
    let data = original.data(RichTextDataFormat::Archive)?;
    let decoded = AttributedString::from_data(&data, RichTextDataFormat::Archive)?;

    assert_eq!(decoded, original);
    assert_eq!(decoded.runs(), original.runs());
    Ok(())
}

#[test]
fn archive_is_versioned_json() -> anyhow::Result<()> {
    let data = AttributedString::new("hi").data(RichTextDataFormat::Archive)?;
    let value: serde_json::Value = serde_json::from_slice(&data)?;
    assert_eq!(
        value,
        serde_json::json!({
            "schema": "richtext-core",
            "version": 1,
            "text": "hi",
            "runs": [{ "len": 2 }],
        })
    );

    let archive = RichTextArchive::from_json_str(r#"{ "text": "defaults" }"#)?;
    assert_eq!(archive.into_attributed_string()?.string(), "defaults");
    Ok(())
}

#[test]
fn plain_text_drops_attachments() -> anyhow::Result<()> {
    let text = formatted();
    assert!(text.string().contains(ATTACHMENT_CHAR));

    let data = text.data(RichTextDataFormat::PlainText)?;
    assert_eq!(String::from_utf8(data)?, "Title\nbody text\n\n");

    let decoded = AttributedString::from_data("plain".as_bytes(), RichTextDataFormat::PlainText)?;
    assert_eq!(decoded, AttributedString::new("plain"));
    Ok(())
}

#[test]
fn corrupt_archives_are_reported() {
    let err = AttributedString::from_data(b"not json", RichTextDataFormat::Archive).unwrap_err();
    assert!(matches!(err, RichTextDataError::InvalidArchive(_)));

    let err = AttributedString::from_data(
        br#"{ "schema": "other", "version": 1, "text": "x" }"#,
        RichTextDataFormat::Archive,
    )
    .unwrap_err();
    assert!(matches!(err, RichTextDataError::UnexpectedSchema(schema) if schema == "other"));

    let err = AttributedString::from_data(
        br#"{ "schema": "richtext-core", "version": 2, "text": "x" }"#,
        RichTextDataFormat::Archive,
    )
    .unwrap_err();
    assert!(matches!(err, RichTextDataError::UnsupportedVersion(2)));

    let err = AttributedString::from_data(
        br#"{ "text": "abc", "runs": [{ "len": 5 }] }"#,
        RichTextDataFormat::Archive,
    )
    .unwrap_err();
    assert!(matches!(
        err,
        RichTextDataError::RunLengthMismatch { runs: 5, text: 3 }
    ));

    let err = AttributedString::from_data(&[0xff, 0xfe], RichTextDataFormat::PlainText).unwrap_err();
    assert!(matches!(err, RichTextDataError::InvalidPlainText(_)));
}

#[test]
fn empty_and_corrupt_are_distinguishable() -> anyhow::Result<()> {
    let empty = AttributedString::default().data(RichTextDataFormat::Archive)?;
    assert!(AttributedString::from_data(&empty, RichTextDataFormat::Archive)?.is_empty());
    assert!(AttributedString::from_data(b"", RichTextDataFormat::Archive).is_err());
    Ok(())
}

use richtext_core::{AttributedString, RichTextReader, TextRange, paragraph_starts};

#[test]
fn selection_covers_every_touched_paragraph() {
    let text = AttributedString::new("foo\nbar\nbaz");
    assert_eq!(paragraph_starts(&text, TextRange::new(0, 11)), vec![0, 4, 8]);
    assert_eq!(paragraph_starts(&text, TextRange::new(1, 8)), vec![0, 4, 8]);
    assert_eq!(paragraph_starts(&text, TextRange::new(5, 1)), vec![4]);
    assert_eq!(paragraph_starts(&text, TextRange::new(0, 4)), vec![0]);
    assert_eq!(paragraph_starts(&text, TextRange::new(2, 3)), vec![0, 4]);
}

#[test]
fn cursor_resolves_to_its_paragraph() {
    let text = AttributedString::new("foo\nbar\nbaz");
    assert_eq!(paragraph_starts(&text, TextRange::cursor(0)), vec![0]);
    // Right after a separator: the paragraph that starts there.
    assert_eq!(paragraph_starts(&text, TextRange::cursor(4)), vec![4]);
    // Right before a separator: the paragraph it ends.
    assert_eq!(paragraph_starts(&text, TextRange::cursor(3)), vec![0]);
    assert_eq!(paragraph_starts(&text, TextRange::cursor(6)), vec![4]);
    assert_eq!(paragraph_starts(&text, TextRange::cursor(11)), vec![8]);
    assert_eq!(paragraph_starts(&text, TextRange::cursor(40)), vec![8]);
}

#[test]
fn crlf_is_a_single_separator() {
    let text = AttributedString::new("ab\r\ncd");
    assert_eq!(paragraph_starts(&text, TextRange::cursor(3)), vec![0]);
    assert_eq!(paragraph_starts(&text, TextRange::cursor(4)), vec![4]);
    assert_eq!(paragraph_starts(&text, TextRange::new(0, 6)), vec![0, 4]);
    assert_eq!(text.next_paragraph_start(0), 4);
    assert_eq!(text.current_paragraph_start(5), 4);
}

#[test]
fn trailing_separator_opens_an_empty_paragraph() {
    let text = AttributedString::new("ab\n");
    assert_eq!(paragraph_starts(&text, TextRange::cursor(3)), vec![3]);
    assert_eq!(text.next_paragraph_start(3), 3);

    let empty = AttributedString::new("");
    assert_eq!(paragraph_starts(&empty, TextRange::cursor(0)), vec![0]);
    assert_eq!(empty.current_paragraph_start(0), 0);
    assert_eq!(empty.next_paragraph_start(0), 0);
}

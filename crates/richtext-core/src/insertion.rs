use crate::attributed_string::AttributedString;
use crate::attributes::{AttributeKey, AttributeMap};
use crate::image::{ImageAttachment, RichTextImage};
use crate::range::TextRange;
use crate::view::RichTextView;

#[derive(Debug, Clone, PartialEq)]
pub enum InsertionContent {
    Text(String),
    Image(RichTextImage),
    Images(Vec<RichTextImage>),
}

/// Content to insert at `index`. With `move_cursor` the cursor ends up right
/// after the inserted content.
#[derive(Debug, Clone, PartialEq)]
pub struct Insertion {
    pub content: InsertionContent,
    pub index: usize,
    pub move_cursor: bool,
}

impl Insertion {
    pub fn text(text: impl Into<String>, index: usize, move_cursor: bool) -> Self {
        Self {
            content: InsertionContent::Text(text.into()),
            index,
            move_cursor,
        }
    }

    pub fn image(image: RichTextImage, index: usize, move_cursor: bool) -> Self {
        Self {
            content: InsertionContent::Image(image),
            index,
            move_cursor,
        }
    }

    pub fn images(images: Vec<RichTextImage>, index: usize, move_cursor: bool) -> Self {
        Self {
            content: InsertionContent::Images(images),
            index,
            move_cursor,
        }
    }
}

/// Pasting text and images into a view.
pub trait RichTextInserter: RichTextView {
    fn insert(&mut self, insertion: Insertion) {
        let Insertion {
            content,
            index,
            move_cursor,
        } = insertion;
        match content {
            InsertionContent::Text(text) => self.paste_text(&text, index, move_cursor),
            InsertionContent::Image(image) => {
                self.paste_images(std::slice::from_ref(&image), index, move_cursor)
            }
            InsertionContent::Images(images) => self.paste_images(&images, index, move_cursor),
        }
    }

    /// Inserts `text` with the attributes found at `index`.
    fn paste_text(&mut self, text: &str, index: usize, move_cursor: bool) {
        if text.is_empty() {
            return;
        }
        let index = self.safe_range(TextRange::cursor(index), false).location;
        let fragment = AttributedString::with_attributes(text, inherited_attributes(&*self, index));
        let selection = self.selected_range();

        self.begin_editing();
        self.replace_rich_text(TextRange::cursor(index), &fragment);
        move_cursor_after_insertion(self, selection, index, fragment.len(), move_cursor);
        self.end_editing();
    }

    fn paste_image(&mut self, image: &RichTextImage, index: usize, move_cursor: bool) {
        self.paste_images(std::slice::from_ref(image), index, move_cursor);
    }

    /// Inserts each image as an attachment char followed by a newline. A
    /// non-empty selection starting at `index` is replaced.
    fn paste_images(&mut self, images: &[RichTextImage], index: usize, move_cursor: bool) {
        if images.is_empty() {
            return;
        }
        let index = self.safe_range(TextRange::cursor(index), false).location;

        self.begin_editing();
        let mut selection = self.selected_range();
        if !selection.is_empty() && selection.location == index {
            self.replace_rich_text(selection, &AttributedString::default());
            selection = TextRange::cursor(index);
            self.select_range(selection);
        }

        let attributes = inherited_attributes(&*self, index);
        let config = self.image_config().clone();
        let mut inserted = 0;
        for image in images.iter().rev() {
            let attachment = match ImageAttachment::new(image, &config) {
                Ok(attachment) => attachment,
                Err(err) => {
                    tracing::warn!(%err, "skipping image that could not be attached");
                    continue;
                }
            };
            let mut fragment = AttributedString::attachment(attachment, attributes.clone());
            fragment.append(&AttributedString::with_attributes("\n", attributes.clone()));
            inserted += fragment.len();
            self.replace_rich_text(TextRange::cursor(index), &fragment);
        }

        if inserted > 0 {
            move_cursor_after_insertion(self, selection, index, inserted, move_cursor);
        }
        self.end_editing();
    }
}

impl<V: RichTextView + ?Sized> RichTextInserter for V {}

fn inherited_attributes<V: RichTextView + ?Sized>(view: &V, index: usize) -> AttributeMap {
    let mut attributes = view.rich_text_attributes(TextRange::cursor(index));
    attributes.remove(&AttributeKey::Attachment);
    attributes
}

fn move_cursor_after_insertion<V: RichTextView + ?Sized>(
    view: &mut V,
    selection: TextRange,
    index: usize,
    inserted: usize,
    move_cursor: bool,
) {
    if move_cursor {
        view.select_range(TextRange::cursor(index + inserted));
    } else if selection.location == index {
        view.select_range(TextRange::new(index + inserted, selection.length));
    }
}

use std::ops::Range;

use ropey::Rope;
use serde::{Deserialize, Serialize};

use crate::attributes::{AttributeKey, AttributeMap};
use crate::error::RichTextDataError;
use crate::image::{ATTACHMENT_CHAR, ImageAttachment};
use crate::range::TextRange;
use crate::reader::RichTextReader;
use crate::rope_ext::RopeExt as _;
use crate::runs::{AttributeRun, AttributeRuns};
use crate::writer::RichTextWriter;

/// Text with per-char attributes, stored as a rope plus attribute runs.
///
/// Used as the buffer's storage, as the fragment type for insertions and as
/// the snapshot handed to the context and to exporters.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "AttributedStringValue", into = "AttributedStringValue")]
pub struct AttributedString {
    text: Rope,
    runs: AttributeRuns,
}

impl Default for AttributedString {
    fn default() -> Self {
        Self {
            text: Rope::new(),
            runs: AttributeRuns::default(),
        }
    }
}

impl PartialEq for AttributedString {
    fn eq(&self, other: &Self) -> bool {
        self.text.len() == other.text.len()
            && self.runs == other.runs
            && self.text.to_string() == other.text.to_string()
    }
}

impl From<&str> for AttributedString {
    fn from(text: &str) -> Self {
        Self::new(text)
    }
}

impl AttributedString {
    pub fn new(text: &str) -> Self {
        Self::with_attributes(text, AttributeMap::new())
    }

    pub fn with_attributes(text: &str, attributes: AttributeMap) -> Self {
        let text = Rope::from_str(text);
        let runs = AttributeRuns::new(text.char_len(), attributes);
        let mut string = Self { text, runs };
        let len = string.len();
        string.fix_paragraph_styles(0..len);
        string
    }

    /// An attachment char carrying `attachment` on top of `attributes`.
    pub fn attachment(attachment: ImageAttachment, mut attributes: AttributeMap) -> Self {
        attributes.insert(AttributeKey::Attachment, attachment.into());
        Self::with_attributes(&ATTACHMENT_CHAR.to_string(), attributes)
    }

    pub fn from_parts(text: &str, runs: Vec<AttributeRun>) -> Result<Self, RichTextDataError> {
        let rope = Rope::from_str(text);
        let text_len = rope.char_len();
        if runs.is_empty() {
            return Ok(Self::new(text));
        }

        let runs = AttributeRuns::from_runs(runs);
        let runs_len = runs.total_len();
        if runs_len != text_len {
            return Err(RichTextDataError::RunLengthMismatch {
                runs: runs_len,
                text: text_len,
            });
        }

        let mut string = Self { text: rope, runs };
        string.fix_paragraph_styles(0..text_len);
        Ok(string)
    }

    /// Length in chars.
    pub fn len(&self) -> usize {
        self.text.char_len()
    }

    pub fn is_empty(&self) -> bool {
        self.text.len() == 0
    }

    pub fn string(&self) -> String {
        self.text.to_string()
    }

    pub fn rope(&self) -> &Rope {
        &self.text
    }

    pub fn runs(&self) -> &[AttributeRun] {
        self.runs.runs()
    }

    pub fn attributes_at(&self, index: usize) -> Option<&AttributeMap> {
        self.runs.attributes_at(index)
    }

    pub fn attribute_runs(
        &self,
        range: TextRange,
    ) -> impl Iterator<Item = (TextRange, &AttributeMap)> {
        self.runs
            .iter_runs_in_range(range.to_range())
            .map(|(range, attributes)| (TextRange::from(range), attributes))
    }

    pub fn substring(&self, range: TextRange) -> AttributedString {
        let range = self.clamp(range);
        let text = self.text.slice_chars(range.clone());
        let runs = AttributeRuns::from_runs(self.runs.slice(range));
        Self {
            text: Rope::from_str(&text),
            runs,
        }
    }

    pub fn append(&mut self, other: &AttributedString) {
        let len = self.len();
        self.replace(TextRange::cursor(len), other);
    }

    /// Replaces the chars in `range` with `with`, text and attributes alike.
    pub fn replace(&mut self, range: TextRange, with: &AttributedString) {
        let range = self.clamp(range);
        let bytes = self.text.byte_range(range.clone());
        if !bytes.is_empty() {
            self.text.remove(bytes.clone());
        }
        self.runs.delete_range(range.clone());

        if !with.is_empty() {
            self.text.insert(bytes.start, &with.string());
            self.runs.insert_runs(range.start, with.runs());
        }
        self.fix_paragraph_styles(range.start..range.start + with.len());
    }

    pub fn edit_attributes(&mut self, range: TextRange, edit: impl FnMut(&mut AttributeMap)) {
        let range = self.clamp(range);
        if range.is_empty() {
            return;
        }
        self.runs.update_range(range.clone(), edit);
        self.fix_paragraph_styles(range);
    }

    /// Every paragraph takes the paragraph style of its first char.
    fn fix_paragraph_styles(&mut self, range: Range<usize>) {
        for paragraph in self.text.paragraph_ranges(range) {
            if paragraph.is_empty() {
                continue;
            }
            let style = self
                .runs
                .attributes_at(paragraph.start)
                .and_then(|attributes| attributes.get(&AttributeKey::ParagraphStyle))
                .cloned();
            self.runs.update_range(paragraph, |attributes| {
                attributes.remove(&AttributeKey::ParagraphStyle);
                if let Some(style) = &style {
                    attributes.insert(AttributeKey::ParagraphStyle, style.clone());
                }
            });
        }
    }

    fn clamp(&self, range: TextRange) -> Range<usize> {
        let len = self.len();
        let start = range.location.min(len);
        let end = range.end().min(len);
        start..end
    }
}

impl RichTextReader for AttributedString {
    fn rich_text(&self) -> &AttributedString {
        self
    }
}

impl RichTextWriter for AttributedString {
    fn replace_rich_text(&mut self, range: TextRange, with: &AttributedString) {
        self.replace(range, with);
    }

    fn edit_rich_text_attributes(
        &mut self,
        range: TextRange,
        edit: &mut dyn FnMut(&mut AttributeMap),
    ) {
        self.edit_attributes(range, edit);
    }
}

#[derive(Serialize, Deserialize)]
struct AttributedStringValue {
    text: String,
    #[serde(default)]
    runs: Vec<AttributeRun>,
}

impl TryFrom<AttributedStringValue> for AttributedString {
    type Error = RichTextDataError;

    fn try_from(value: AttributedStringValue) -> Result<Self, Self::Error> {
        AttributedString::from_parts(&value.text, value.runs)
    }
}

impl From<AttributedString> for AttributedStringValue {
    fn from(string: AttributedString) -> Self {
        Self {
            text: string.string(),
            runs: string.runs().to_vec(),
        }
    }
}

use serde::{Deserialize, Serialize};

use crate::attributed_string::AttributedString;
use crate::attributes::{Color, ColorChannel, TextAlignment};
use crate::image::RichTextImage;
use crate::range::TextRange;
use crate::style::RichTextStyle;

/// A one-shot editing intent submitted through the context.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum RichTextAction {
    Copy,
    DismissKeyboard,
    PasteText {
        text: String,
        index: usize,
        move_cursor: bool,
    },
    PasteImage {
        image: RichTextImage,
        index: usize,
        move_cursor: bool,
    },
    PasteImages {
        images: Vec<RichTextImage>,
        index: usize,
        move_cursor: bool,
    },
    SetColor {
        channel: ColorChannel,
        color: Option<Color>,
    },
    SetStyle {
        style: RichTextStyle,
        enabled: bool,
    },
    ToggleStyle {
        style: RichTextStyle,
    },
    StepFontSize {
        points: f64,
    },
    StepIndent {
        points: f64,
    },
    StepLineSpacing {
        points: f64,
    },
    StepSuperscript {
        steps: i64,
    },
    SetAlignment {
        alignment: TextAlignment,
    },
    SetHighlightedRange {
        range: Option<TextRange>,
    },
    UndoLatestChange,
    RedoLatestChange,
    SelectRange {
        range: TextRange,
    },
    SetAttributedString {
        string: AttributedString,
    },
}

impl RichTextAction {
    pub fn name(&self) -> &'static str {
        match self {
            RichTextAction::Copy => "copy",
            RichTextAction::DismissKeyboard => "dismiss_keyboard",
            RichTextAction::PasteText { .. } => "paste_text",
            RichTextAction::PasteImage { .. } => "paste_image",
            RichTextAction::PasteImages { .. } => "paste_images",
            RichTextAction::SetColor { .. } => "set_color",
            RichTextAction::SetStyle { .. } => "set_style",
            RichTextAction::ToggleStyle { .. } => "toggle_style",
            RichTextAction::StepFontSize { .. } => "step_font_size",
            RichTextAction::StepIndent { .. } => "step_indent",
            RichTextAction::StepLineSpacing { .. } => "step_line_spacing",
            RichTextAction::StepSuperscript { .. } => "step_superscript",
            RichTextAction::SetAlignment { .. } => "set_alignment",
            RichTextAction::SetHighlightedRange { .. } => "set_highlighted_range",
            RichTextAction::UndoLatestChange => "undo_latest_change",
            RichTextAction::RedoLatestChange => "redo_latest_change",
            RichTextAction::SelectRange { .. } => "select_range",
            RichTextAction::SetAttributedString { .. } => "set_attributed_string",
        }
    }
}

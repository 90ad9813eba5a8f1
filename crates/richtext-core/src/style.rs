use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::attributes::{AttributeKey, FontTrait};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RichTextStyle {
    Bold,
    Italic,
    Underlined,
    Strikethrough,
}

pub type StyleSet = BTreeSet<RichTextStyle>;

impl RichTextStyle {
    pub const ALL: [RichTextStyle; 4] = [
        RichTextStyle::Bold,
        RichTextStyle::Italic,
        RichTextStyle::Underlined,
        RichTextStyle::Strikethrough,
    ];

    /// Styles carried by the font descriptor.
    pub fn font_trait(self) -> Option<FontTrait> {
        match self {
            RichTextStyle::Bold => Some(FontTrait::Bold),
            RichTextStyle::Italic => Some(FontTrait::Italic),
            RichTextStyle::Underlined | RichTextStyle::Strikethrough => None,
        }
    }

    /// Styles stored as an integer flag attribute.
    pub fn flag_key(self) -> Option<AttributeKey> {
        match self {
            RichTextStyle::Underlined => Some(AttributeKey::Underline),
            RichTextStyle::Strikethrough => Some(AttributeKey::Strikethrough),
            RichTextStyle::Bold | RichTextStyle::Italic => None,
        }
    }
}

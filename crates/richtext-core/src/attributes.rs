use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::InvalidColor;
use crate::image::ImageAttachment;

pub type AttributeMap = BTreeMap<AttributeKey, AttributeValue>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttributeKey {
    Font,
    ForegroundColor,
    BackgroundColor,
    StrikethroughColor,
    StrokeColor,
    UnderlineColor,
    ParagraphStyle,
    /// Integer flag, 1 when underlined.
    Underline,
    /// Integer flag, 1 when struck through.
    Strikethrough,
    /// Integer level: -1 subscript, 0 baseline, 1 superscript.
    Superscript,
    Link,
    Attachment,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum AttributeValue {
    Font(Font),
    Color(Color),
    ParagraphStyle(ParagraphStyle),
    Integer(i64),
    Link(String),
    Attachment(ImageAttachment),
}

/// Conversion between a typed attribute and the [`AttributeValue`] union.
///
/// A value of another variant converts to `None` instead of failing.
pub trait AttributeValueType: Sized {
    fn from_attribute_value(value: &AttributeValue) -> Option<Self>;
    fn into_attribute_value(self) -> AttributeValue;
}

macro_rules! attribute_value_type {
    ($ty:ty, $variant:ident) => {
        impl AttributeValueType for $ty {
            fn from_attribute_value(value: &AttributeValue) -> Option<Self> {
                match value {
                    AttributeValue::$variant(inner) => Some(inner.clone()),
                    _ => None,
                }
            }

            fn into_attribute_value(self) -> AttributeValue {
                AttributeValue::$variant(self)
            }
        }

        impl From<$ty> for AttributeValue {
            fn from(value: $ty) -> Self {
                AttributeValue::$variant(value)
            }
        }
    };
}

attribute_value_type!(Font, Font);
attribute_value_type!(Color, Color);
attribute_value_type!(ParagraphStyle, ParagraphStyle);
attribute_value_type!(i64, Integer);
attribute_value_type!(String, Link);
attribute_value_type!(ImageAttachment, Attachment);

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FontTraits {
    #[serde(default)]
    pub bold: bool,
    #[serde(default)]
    pub italic: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FontTrait {
    Bold,
    Italic,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Font {
    pub name: String,
    pub size: f64,
    #[serde(default)]
    pub traits: FontTraits,
}

impl Default for Font {
    fn default() -> Self {
        Self {
            name: "System".to_string(),
            size: 16.0,
            traits: FontTraits::default(),
        }
    }
}

impl Font {
    pub fn new(name: impl Into<String>, size: f64) -> Self {
        Self {
            name: name.into(),
            size,
            traits: FontTraits::default(),
        }
    }

    pub fn with_size(mut self, size: f64) -> Self {
        self.size = size;
        self
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn has_trait(&self, font_trait: FontTrait) -> bool {
        match font_trait {
            FontTrait::Bold => self.traits.bold,
            FontTrait::Italic => self.traits.italic,
        }
    }

    /// Same family and point size, with `font_trait` switched on or off.
    pub fn with_trait(mut self, font_trait: FontTrait, enabled: bool) -> Self {
        match font_trait {
            FontTrait::Bold => self.traits.bold = enabled,
            FontTrait::Italic => self.traits.italic = enabled,
        }
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const BLACK: Color = Color::rgb(0, 0, 0);
    pub const WHITE: Color = Color::rgb(255, 255, 255);
    pub const YELLOW: Color = Color::rgb(255, 235, 59);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub fn from_hex(hex: &str) -> Result<Self, InvalidColor> {
        let digits = hex.strip_prefix('#').unwrap_or(hex);
        let invalid = || InvalidColor(hex.to_string());
        if !matches!(digits.len(), 6 | 8) || !digits.is_ascii() {
            return Err(invalid());
        }

        let channel = |ix: usize| u8::from_str_radix(&digits[ix..ix + 2], 16).map_err(|_| invalid());
        let a = if digits.len() == 8 { channel(6)? } else { 255 };
        Ok(Self {
            r: channel(0)?,
            g: channel(2)?,
            b: channel(4)?,
            a,
        })
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)?;
        if self.a != 255 {
            write!(f, "{:02x}", self.a)?;
        }
        Ok(())
    }
}

impl TryFrom<String> for Color {
    type Error = InvalidColor;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Color::from_hex(&value)
    }
}

impl From<Color> for String {
    fn from(color: Color) -> Self {
        color.to_string()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColorChannel {
    Foreground,
    Background,
    Strikethrough,
    Stroke,
    Underline,
}

impl ColorChannel {
    pub const ALL: [ColorChannel; 5] = [
        ColorChannel::Foreground,
        ColorChannel::Background,
        ColorChannel::Strikethrough,
        ColorChannel::Stroke,
        ColorChannel::Underline,
    ];

    pub fn attribute_key(self) -> AttributeKey {
        match self {
            ColorChannel::Foreground => AttributeKey::ForegroundColor,
            ColorChannel::Background => AttributeKey::BackgroundColor,
            ColorChannel::Strikethrough => AttributeKey::StrikethroughColor,
            ColorChannel::Stroke => AttributeKey::StrokeColor,
            ColorChannel::Underline => AttributeKey::UnderlineColor,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TextAlignment {
    #[default]
    Left,
    Center,
    Right,
    Justified,
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct TabStop {
    pub location: f64,
    #[serde(default)]
    pub alignment: TextAlignment,
}

impl TabStop {
    pub fn new(location: f64) -> Self {
        Self {
            location,
            alignment: TextAlignment::Left,
        }
    }
}

/// Paragraph-wide formatting. Always applies to a whole paragraph.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ParagraphStyle {
    pub alignment: TextAlignment,
    pub head_indent: f64,
    pub first_line_head_indent: f64,
    pub line_spacing: f64,
    pub tab_stops: Vec<TabStop>,
}

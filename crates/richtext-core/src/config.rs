use serde::{Deserialize, Serialize};

use crate::attributes::{Color, Font};
use crate::error::ConfigError;
use crate::image::Size;

const DEFAULT_MAX_UNDO: usize = 200;
pub(crate) const DEFAULT_MIN_FONT_SIZE: f64 = 1.0;
pub(crate) const DEFAULT_MAX_FONT_SIZE: f64 = 512.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImageConfig {
    pub max_size: Size,
    /// 0.0 to 1.0, higher keeps more of the original bytes.
    pub compression_quality: f64,
}

impl Default for ImageConfig {
    fn default() -> Self {
        Self {
            max_size: Size::new(800.0, 800.0),
            compression_quality: 0.7,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RichTextConfig {
    pub max_undo: usize,
    pub default_font: Font,
    pub min_font_size: f64,
    pub max_font_size: f64,
    pub image: ImageConfig,
    pub highlight_color: Color,
    /// Pull buffer state into the context on the next tick instead of inline.
    pub defer_context_sync: bool,
    /// Re-apply the attributes at a collapsed cursor as typing attributes
    /// whenever the selection moves.
    pub refresh_typing_attributes_at_cursor: bool,
}

impl Default for RichTextConfig {
    fn default() -> Self {
        Self {
            max_undo: DEFAULT_MAX_UNDO,
            default_font: Font::default(),
            min_font_size: DEFAULT_MIN_FONT_SIZE,
            max_font_size: DEFAULT_MAX_FONT_SIZE,
            image: ImageConfig::default(),
            highlight_color: Color::YELLOW,
            defer_context_sync: true,
            refresh_typing_attributes_at_cursor: true,
        }
    }
}

impl RichTextConfig {
    pub fn with_defaults(mut self) -> Self {
        if self.max_undo == 0 {
            self.max_undo = DEFAULT_MAX_UNDO;
        }
        if self.min_font_size.is_nan() || self.min_font_size <= 0.0 {
            self.min_font_size = DEFAULT_MIN_FONT_SIZE;
        }
        if self.max_font_size.is_nan() || self.max_font_size < self.min_font_size {
            self.max_font_size = self.min_font_size.max(DEFAULT_MAX_FONT_SIZE);
        }
        if self.default_font.size.is_nan() || self.default_font.size <= 0.0 {
            self.default_font.size = Font::default().size;
        }
        self.default_font.size = self
            .default_font
            .size
            .clamp(self.min_font_size, self.max_font_size);
        self.image.compression_quality = self.image.compression_quality.clamp(0.0, 1.0);
        self
    }

    pub fn from_json_str(s: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(s)?;
        Ok(config.with_defaults())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_json_keeps_defaults() {
        let config = RichTextConfig::from_json_str(r#"{ "max_undo": 0, "defer_context_sync": false }"#)
            .unwrap();
        assert_eq!(config.max_undo, DEFAULT_MAX_UNDO);
        assert!(!config.defer_context_sync);
        assert_eq!(config.default_font, Font::default());
        assert_eq!(config.image, ImageConfig::default());
    }

    #[test]
    fn invalid_json_is_reported() {
        assert!(RichTextConfig::from_json_str("{ max_undo: }").is_err());
    }
}

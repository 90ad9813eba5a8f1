use std::io::{Read as _, Write as _};

use flate2::Compression;
use flate2::read::DeflateDecoder;
use flate2::write::DeflateEncoder;
use serde::{Deserialize, Serialize};

use crate::config::ImageConfig;
use crate::error::RichTextDataError;

/// Object replacement character standing in for an attachment in the text.
pub const ATTACHMENT_CHAR: char = '\u{FFFC}';

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

/// Encoded image bytes as handed over by the host, plus their pixel size.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RichTextImage {
    pub size: Size,
    #[serde(with = "base64_bytes")]
    pub data: Vec<u8>,
}

impl RichTextImage {
    pub fn new(size: Size, data: Vec<u8>) -> Self {
        Self { size, data }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageAttachment {
    /// Deflate-compressed image bytes.
    #[serde(with = "base64_bytes")]
    pub data: Vec<u8>,
    pub image_size: Size,
    pub bounds: Size,
    pub compression_quality: f64,
}

impl ImageAttachment {
    pub fn new(image: &RichTextImage, config: &ImageConfig) -> Result<Self, RichTextDataError> {
        let quality = config.compression_quality.clamp(0.0, 1.0);
        let mut encoder = DeflateEncoder::new(Vec::new(), compression_for_quality(quality));
        encoder.write_all(&image.data)?;
        let data = encoder.finish()?;

        Ok(Self {
            data,
            image_size: image.size,
            bounds: attachment_bounds(image.size, config.max_size),
            compression_quality: quality,
        })
    }

    pub fn image(&self) -> Result<RichTextImage, RichTextDataError> {
        let mut decoder = DeflateDecoder::new(self.data.as_slice());
        let mut data = Vec::new();
        decoder.read_to_end(&mut data)?;
        Ok(RichTextImage::new(self.image_size, data))
    }
}

/// Quality 1.0 stores the bytes as they are; lower quality compresses harder.
fn compression_for_quality(quality: f64) -> Compression {
    let level = ((1.0 - quality) * 9.0).round() as u32;
    Compression::new(level.min(9))
}

/// Scales `image` down to fit `max`, keeping the aspect ratio. Images that
/// already fit keep their size.
pub fn attachment_bounds(image: Size, max: Size) -> Size {
    if image.width <= max.width && image.height <= max.height {
        return image;
    }
    if image.width <= 0.0 || image.height <= 0.0 {
        return image;
    }

    let scale = (max.width / image.width).min(max.height / image.height);
    Size::new(image.width * scale, image.height * scale)
}

mod base64_bytes {
    use base64::Engine as _;
    use base64::engine::general_purpose::STANDARD;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&STANDARD.encode(bytes))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
        let encoded = String::deserialize(deserializer)?;
        STANDARD.decode(encoded).map_err(serde::de::Error::custom)
    }
}

use serde::{Deserialize, Serialize};

use crate::attributed_string::AttributedString;
use crate::error::RichTextDataError;
use crate::image::ATTACHMENT_CHAR;
use crate::runs::AttributeRun;

const ARCHIVE_SCHEMA: &str = "richtext-core";
const ARCHIVE_VERSION: u32 = 1;

fn default_schema() -> String {
    ARCHIVE_SCHEMA.to_string()
}

fn default_version() -> u32 {
    ARCHIVE_VERSION
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RichTextDataFormat {
    /// Versioned JSON with text and attribute runs. Lossless.
    Archive,
    /// UTF-8 text only. Attachments are dropped.
    PlainText,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RichTextArchive {
    #[serde(default = "default_schema")]
    pub schema: String,
    #[serde(default = "default_version")]
    pub version: u32,
    pub text: String,
    #[serde(default)]
    pub runs: Vec<AttributeRun>,
}

impl RichTextArchive {
    pub fn from_attributed_string(string: &AttributedString) -> Self {
        Self {
            schema: default_schema(),
            version: default_version(),
            text: string.string(),
            runs: string.runs().to_vec(),
        }
    }

    pub fn into_attributed_string(self) -> Result<AttributedString, RichTextDataError> {
        if self.schema != ARCHIVE_SCHEMA {
            return Err(RichTextDataError::UnexpectedSchema(self.schema));
        }
        if self.version != ARCHIVE_VERSION {
            return Err(RichTextDataError::UnsupportedVersion(self.version));
        }
        AttributedString::from_parts(&self.text, self.runs)
    }

    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    pub fn from_json_str(s: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(s)
    }
}

impl AttributedString {
    pub fn data(&self, format: RichTextDataFormat) -> Result<Vec<u8>, RichTextDataError> {
        match format {
            RichTextDataFormat::Archive => {
                let archive = RichTextArchive::from_attributed_string(self);
                Ok(serde_json::to_vec(&archive)?)
            }
            RichTextDataFormat::PlainText => Ok(self
                .string()
                .chars()
                .filter(|ch| *ch != ATTACHMENT_CHAR)
                .collect::<String>()
                .into_bytes()),
        }
    }

    pub fn from_data(bytes: &[u8], format: RichTextDataFormat) -> Result<Self, RichTextDataError> {
        match format {
            RichTextDataFormat::Archive => {
                let archive: RichTextArchive = serde_json::from_slice(bytes)?;
                archive.into_attributed_string()
            }
            RichTextDataFormat::PlainText => {
                let text = String::from_utf8(bytes.to_vec())?;
                Ok(AttributedString::new(&text))
            }
        }
    }
}

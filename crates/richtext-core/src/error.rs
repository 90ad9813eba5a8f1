use thiserror::Error;

/// Failure to decode or encode rich text data.
#[derive(Debug, Error)]
pub enum RichTextDataError {
    #[error("invalid rich text archive: {0}")]
    InvalidArchive(#[from] serde_json::Error),

    #[error("unexpected archive schema '{0}'")]
    UnexpectedSchema(String),

    #[error("unsupported archive version {0}")]
    UnsupportedVersion(u32),

    #[error("attribute runs cover {runs} chars but the text has {text}")]
    RunLengthMismatch { runs: usize, text: usize },

    #[error("plain text is not valid UTF-8")]
    InvalidPlainText(#[from] std::string::FromUtf8Error),

    #[error("image data could not be processed")]
    ImageData(#[from] std::io::Error),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid rich text config: {0}")]
    Invalid(#[from] serde_json::Error),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid color '{0}', expected #rrggbb or #rrggbbaa")]
pub struct InvalidColor(pub String);

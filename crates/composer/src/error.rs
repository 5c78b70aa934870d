#[derive(Debug, thiserror::Error)]
pub enum ComposerError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid command payload: {0}")]
    InvalidPayload(String),

    #[error("Upload failed for {tag_id}: {message}")]
    Upload { tag_id: String, message: String },

    #[error("Option {0} is disabled")]
    OptionDisabled(usize),

    #[error("Option index {index} out of range ({len} visible)")]
    OptionOutOfRange { index: usize, len: usize },

    #[error("Nothing to select")]
    EmptySelection,

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

pub type Result<T> = std::result::Result<T, ComposerError>;

//! Tag parsing and serialization for composer message text.
//!
//! This module provides:
//! - Tag types (resource references, command invocations, segments)
//! - A scanner and fail-open parser for `@kind://id` and `[cmd:...]`
//! - Exact serialization back to source text
//! - A tag registry for staged uploads and configured commands
//! - Submission export through a pluggable uploader
//! - Slash command trigger detection and catalog

mod parser;
mod payload;
mod registry;
mod scanner;
mod serialize;
mod slash;
mod submission;
mod types;

// Re-export public types
pub use parser::{parse_text, TagParser};
pub use payload::encode_command_payload;
pub use registry::TagRegistry;
pub use serialize::serialize_content;
pub use slash::{
    detect_slash_trigger, find_slash_command, slash_command_options, slash_commands,
    SlashCategory, SlashCommand, SlashTrigger,
};
pub use submission::{export_for_submission, ResourceUploader};
pub use types::{
    AspectRatio, CommandConfig, CommandKind, CommandTag, EditorContent, PendingFile,
    ResourceKind, ResourceTag, Segment, Tag,
};

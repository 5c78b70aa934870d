//! Composer text processing library.
//!
//! This crate provides the text layer behind the chat composer:
//! - Tag parsing of message text into literal segments and typed tags
//! - Serialization of parsed content back to its exact source text
//! - A tag registry for staged uploads and configured commands
//! - Submission export that uploads staged files and renders final text
//! - Fuzzy option filtering and ranking for typeahead dropdowns

pub mod config;
pub mod error;
pub mod options;
pub mod tags;

// Re-export main types
pub use config::{ComposerConfig, OptionsConfig, TagConfig};
pub use error::{ComposerError, Result};
pub use options::{
    filter_options, resolve_selection, select_option, DropdownOption, FilterOutcome, MaxVisible,
    OptionFilter, Selection,
};
pub use tags::{
    detect_slash_trigger, export_for_submission, parse_text, serialize_content,
    slash_command_options, AspectRatio, CommandConfig, CommandKind, CommandTag, EditorContent,
    PendingFile, ResourceKind, ResourceTag, ResourceUploader, Segment, SlashCommand, SlashTrigger,
    Tag, TagParser, TagRegistry,
};

//! Slash command trigger detection and the command catalog.

use serde::Serialize;

use crate::options::DropdownOption;

use super::types::CommandKind;

const SLASH: char = '/';

/// An open `/query` right before the cursor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SlashTrigger {
    /// Byte offset of the `/`.
    pub offset: usize,
    pub query: String,
}

/// Detects a slash trigger ending at byte offset `cursor`.
///
/// The query may hold ASCII letters, `_` and CJK ideographs. Returns `None`
/// when `cursor` is out of range or not on a char boundary.
pub fn detect_slash_trigger(text: &str, cursor: usize) -> Option<SlashTrigger> {
    let before = text.get(..cursor)?;
    let (offset, ch) = before
        .char_indices()
        .rev()
        .find(|(_, ch)| !is_query_char(*ch))?;
    if ch != SLASH {
        return None;
    }
    Some(SlashTrigger {
        offset,
        query: before[offset + SLASH.len_utf8()..].to_string(),
    })
}

fn is_query_char(ch: char) -> bool {
    ch.is_ascii_alphabetic() || ch == '_' || ('\u{4e00}'..='\u{9fa5}').contains(&ch)
}

// ---------------------------------------------------------------------------
// Catalog
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SlashCategory {
    Ai,
    Media,
    File,
    Workflow,
    Custom,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SlashCommand {
    pub kind: CommandKind,
    pub name: &'static str,
    pub display_name: &'static str,
    pub description: &'static str,
    pub category: SlashCategory,
    pub keywords: &'static [&'static str],
    pub has_config: bool,
}

static SLASH_COMMANDS: [SlashCommand; 2] = [
    SlashCommand {
        kind: CommandKind::TextToImage,
        name: "text_to_image",
        display_name: "Text to image",
        description: "Generate an image from a text prompt",
        category: SlashCategory::Ai,
        keywords: &["image", "generate", "draw", "picture"],
        has_config: true,
    },
    SlashCommand {
        kind: CommandKind::ImageToImage,
        name: "image_to_image",
        display_name: "Image to image",
        description: "Transform a reference image with a prompt",
        category: SlashCategory::Ai,
        keywords: &["image", "transform", "restyle", "edit"],
        has_config: true,
    },
];

pub fn slash_commands() -> &'static [SlashCommand] {
    &SLASH_COMMANDS
}

pub fn find_slash_command(kind: CommandKind) -> Option<&'static SlashCommand> {
    SLASH_COMMANDS.iter().find(|command| command.kind == kind)
}

/// Dropdown options for the slash menu, labelled by display name.
pub fn slash_command_options() -> Vec<DropdownOption<CommandKind>> {
    SLASH_COMMANDS
        .iter()
        .map(|command| {
            DropdownOption::new(command.kind, command.display_name)
                .with_description(command.description)
        })
        .collect()
}

//! Tag and segment types produced by the tag parser.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Resource kinds
// ---------------------------------------------------------------------------

/// Closed set of resource kinds accepted in `@kind://id` references.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceKind {
    Image,
    Text,
    Doc,
}

impl ResourceKind {
    pub const ALL: [ResourceKind; 3] = [Self::Image, Self::Text, Self::Doc];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Image => "image",
            Self::Text => "text",
            Self::Doc => "doc",
        }
    }

    /// Case-sensitive lookup; anything outside the closed set is `None`.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.as_str() == name)
    }

    /// Infers the kind from a MIME type. Unknown types are documents.
    pub fn from_mime(mime_type: &str) -> Self {
        match mime_type.trim().to_ascii_lowercase().as_str() {
            "image/jpeg" | "image/jpg" | "image/png" | "image/gif" | "image/webp"
            | "image/svg+xml" => Self::Image,
            "text/plain" | "text/csv" | "application/json" | "text/markdown" => Self::Text,
            _ => Self::Doc,
        }
    }

    pub fn icon(self) -> &'static str {
        match self {
            Self::Image => "🖼️",
            Self::Text => "📄",
            Self::Doc => "📎",
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Command kinds and configuration
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CommandKind {
    TextToImage,
    ImageToImage,
}

impl CommandKind {
    pub const ALL: [CommandKind; 2] = [Self::TextToImage, Self::ImageToImage];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::TextToImage => "text_to_image",
            Self::ImageToImage => "image_to_image",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.as_str() == name)
    }

    /// Resolves a command id such as `cmd_42_text_to_image` to its kind.
    pub fn infer_from_id(id: &str) -> Option<Self> {
        Self::from_name(id).or_else(|| Self::ALL.into_iter().find(|kind| id.contains(kind.as_str())))
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::TextToImage => "Text to image",
            Self::ImageToImage => "Image to image",
        }
    }

    pub fn icon(self) -> &'static str {
        match self {
            Self::TextToImage => "🎨",
            Self::ImageToImage => "🖼️",
        }
    }

    pub fn default_display(self) -> String {
        format!("{} command", self.label())
    }
}

impl fmt::Display for CommandKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AspectRatio {
    #[serde(rename = "1:1")]
    Square,
    #[serde(rename = "4:3")]
    Landscape4x3,
    #[serde(rename = "3:4")]
    Portrait3x4,
    #[serde(rename = "16:9")]
    Wide16x9,
    #[serde(rename = "9:16")]
    Tall9x16,
    #[serde(rename = "21:9")]
    Ultrawide21x9,
    #[serde(rename = "3:2")]
    Landscape3x2,
    #[serde(rename = "2:3")]
    Portrait2x3,
}

impl AspectRatio {
    pub const ALL: [AspectRatio; 8] = [
        Self::Square,
        Self::Landscape4x3,
        Self::Portrait3x4,
        Self::Wide16x9,
        Self::Tall9x16,
        Self::Ultrawide21x9,
        Self::Landscape3x2,
        Self::Portrait2x3,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Square => "1:1",
            Self::Landscape4x3 => "4:3",
            Self::Portrait3x4 => "3:4",
            Self::Wide16x9 => "16:9",
            Self::Tall9x16 => "9:16",
            Self::Ultrawide21x9 => "21:9",
            Self::Landscape3x2 => "3:2",
            Self::Portrait2x3 => "2:3",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|ratio| ratio.as_str() == raw)
    }
}

/// Settings attached to a command tag.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CommandConfig {
    pub prompt: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub style_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aspect_ratio: Option<AspectRatio>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,
    /// Pending id or uploaded resource id of the reference image.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_image: Option<String>,
    /// 0.1 to 1.0, image_to_image only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub strength: Option<f32>,
    /// Keys outside the known set, kept verbatim.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub extra: BTreeMap<String, String>,
}

impl CommandConfig {
    pub fn with_prompt(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            ..Self::default()
        }
    }
}

// ---------------------------------------------------------------------------
// Tags
// ---------------------------------------------------------------------------

/// A staged file waiting for upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingFile {
    pub name: String,
    pub mime_type: String,
    pub data: Vec<u8>,
}

impl PendingFile {
    pub fn new(name: impl Into<String>, mime_type: impl Into<String>, data: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            mime_type: mime_type.into(),
            data,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResourceTag {
    pub kind: ResourceKind,
    /// Pending id before upload, resource id after.
    pub id: String,
    pub name: String,
    pub is_pending: bool,
    #[serde(skip)]
    pub pending_file: Option<PendingFile>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommandTag {
    pub kind: CommandKind,
    pub id: String,
    pub display: String,
    pub config: CommandConfig,
    pub is_pending: bool,
    /// Exact text between `[cmd:` and `]`.
    pub payload: String,
    #[serde(skip)]
    pub pending_source: Option<PendingFile>,
}

impl CommandTag {
    /// Marks the staged source image as uploaded under `resource_id`.
    pub fn resolve_source_image(&mut self, resource_id: &str) {
        self.config.source_image = Some(resource_id.to_string());
        self.is_pending = false;
        self.pending_source = None;
        // Inline payloads carry their config, keep the source text in sync.
        if self.payload != self.id {
            if let Ok(payload) = super::payload::encode_command_payload(&self.id, &self.config) {
                self.payload = payload;
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Tag {
    Resource(ResourceTag),
    Command(CommandTag),
}

impl Tag {
    pub fn id(&self) -> &str {
        match self {
            Self::Resource(tag) => tag.id.as_str(),
            Self::Command(tag) => tag.id.as_str(),
        }
    }

    pub fn is_pending(&self) -> bool {
        match self {
            Self::Resource(tag) => tag.is_pending,
            Self::Command(tag) => tag.is_pending,
        }
    }

    /// The tag's source syntax.
    pub fn source_text(&self) -> String {
        match self {
            Self::Resource(tag) => format!("@{}://{}", tag.kind, tag.id),
            Self::Command(tag) => format!("[cmd:{}]", tag.payload),
        }
    }
}

// ---------------------------------------------------------------------------
// Segments
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "segment", content = "value", rename_all = "lowercase")]
pub enum Segment {
    Text(String),
    Tag(Tag),
}

impl Segment {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text.as_str()),
            Self::Tag(_) => None,
        }
    }

    pub fn as_tag(&self) -> Option<&Tag> {
        match self {
            Self::Text(_) => None,
            Self::Tag(tag) => Some(tag),
        }
    }
}

/// Parsed message content: literal runs and tags in source order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EditorContent {
    pub segments: Vec<Segment>,
}

impl EditorContent {
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn tags(&self) -> impl Iterator<Item = &Tag> {
        self.segments.iter().filter_map(Segment::as_tag)
    }

    pub fn has_pending(&self) -> bool {
        self.tags().any(Tag::is_pending)
    }

    /// Appends literal text, merging with a trailing text segment.
    pub(crate) fn push_text(&mut self, text: &str) {
        if text.is_empty() {
            return;
        }
        if let Some(Segment::Text(last)) = self.segments.last_mut() {
            last.push_str(text);
            return;
        }
        self.segments.push(Segment::Text(text.to_string()));
    }

    pub(crate) fn push_tag(&mut self, tag: Tag) {
        self.segments.push(Segment::Tag(tag));
    }
}

impl fmt::Display for EditorContent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for segment in &self.segments {
            match segment {
                Segment::Text(text) => f.write_str(text)?,
                Segment::Tag(tag) => f.write_str(&tag.source_text())?,
            }
        }
        Ok(())
    }
}

//! Registry of tags created in the composer.
//!
//! Holds staged files for pending resources and the full definition of
//! configured command tags, so that parsing `[cmd:<id>]` can recover the
//! display text and settings. Shared by reference; no global state.

use std::collections::HashMap;

use chrono::Utc;
use parking_lot::RwLock;
use uuid::Uuid;

use crate::config::TagConfig;

use super::parser::TagParser;
use super::types::{
    CommandConfig, CommandKind, CommandTag, EditorContent, PendingFile, ResourceKind,
    ResourceTag, Tag,
};

const COMMAND_ID_PREFIX: &str = "cmd_";
const ID_SUFFIX_LEN: usize = 9;

#[derive(Debug, Default)]
struct RegistryState {
    tags: HashMap<String, Tag>,
    pending_files: HashMap<String, PendingFile>,
}

#[derive(Debug, Default)]
pub struct TagRegistry {
    config: TagConfig,
    state: RwLock<RegistryState>,
}

impl TagRegistry {
    pub fn new(config: TagConfig) -> Self {
        Self {
            config,
            state: RwLock::new(RegistryState::default()),
        }
    }

    pub fn config(&self) -> &TagConfig {
        &self.config
    }

    /// Stages a file and returns the resource tag text to insert.
    pub fn add_pending_resource(&self, file: PendingFile) -> String {
        let id = format!("{}{}", self.config.pending_id_prefix, unique_suffix());
        let kind = ResourceKind::from_mime(&file.mime_type);
        let tag = ResourceTag {
            kind,
            id: id.clone(),
            name: file.name.clone(),
            is_pending: true,
            pending_file: Some(file.clone()),
        };

        let mut state = self.state.write();
        state.pending_files.insert(id.clone(), file);
        state.tags.insert(id.clone(), Tag::Resource(tag));
        tracing::debug!(id = %id, kind = %kind, "staged pending resource");

        format!("@{kind}://{id}")
    }

    /// Registers a configured command and returns the tag text to insert.
    pub fn add_command_tag(
        &self,
        kind: CommandKind,
        display: impl Into<String>,
        config: CommandConfig,
        pending_source: Option<PendingFile>,
    ) -> String {
        let id = format!("{COMMAND_ID_PREFIX}{}_{kind}", unique_suffix());
        let tag = CommandTag {
            kind,
            id: id.clone(),
            display: display.into(),
            config,
            is_pending: pending_source.is_some(),
            payload: id.clone(),
            pending_source,
        };

        self.state.write().tags.insert(id.clone(), Tag::Command(tag));
        tracing::debug!(id = %id, kind = %kind, "registered command tag");

        format!("[cmd:{id}]")
    }

    pub fn get(&self, id: &str) -> Option<Tag> {
        self.state.read().tags.get(id).cloned()
    }

    pub fn pending_file(&self, id: &str) -> Option<PendingFile> {
        self.state.read().pending_files.get(id).cloned()
    }

    /// Stores `tag` under its id, replacing any earlier entry.
    pub fn register(&self, tag: Tag) {
        let id = tag.id().to_string();
        self.state.write().tags.insert(id, tag);
    }

    /// Drops staged files and every tag still waiting for upload.
    pub fn clear_pending(&self) {
        let mut state = self.state.write();
        state.pending_files.clear();
        state.tags.retain(|_, tag| !tag.is_pending());
    }

    pub fn len(&self) -> usize {
        self.state.read().tags.len()
    }

    pub fn is_empty(&self) -> bool {
        self.state.read().tags.is_empty()
    }

    /// Parses text, enriching tags from this registry.
    pub fn parse(&self, text: &str) -> EditorContent {
        TagParser::new(&self.config).with_registry(self).parse(text)
    }
}

/// `<millis>_<9 random chars>`.
fn unique_suffix() -> String {
    let random = Uuid::new_v4().simple().to_string();
    format!(
        "{}_{}",
        Utc::now().timestamp_millis(),
        &random[..ID_SUFFIX_LEN]
    )
}

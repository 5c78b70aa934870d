//! Composer configuration, loaded from JSON.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{ComposerError, Result};
use crate::options::MaxVisible;

pub const DEFAULT_NAME_DISPLAY_LIMIT: usize = 20;
pub const DEFAULT_PENDING_ID_PREFIX: &str = "tmp_";
pub const DEFAULT_TEMP_SESSION_ID: &str = "temp-session";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ComposerConfig {
    pub tags: TagConfig,
    pub options: OptionsConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TagConfig {
    /// Resource names longer than this are shortened with a trailing `...`.
    pub name_display_limit: usize,
    /// Resource ids carrying this prefix have not been uploaded yet.
    pub pending_id_prefix: String,
    /// Session id for which submission export skips uploads.
    pub temp_session_id: String,
}

impl Default for TagConfig {
    fn default() -> Self {
        Self {
            name_display_limit: DEFAULT_NAME_DISPLAY_LIMIT,
            pending_id_prefix: DEFAULT_PENDING_ID_PREFIX.to_string(),
            temp_session_id: DEFAULT_TEMP_SESSION_ID.to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OptionsConfig {
    pub max_visible_items: MaxVisible,
}

impl ComposerConfig {
    pub fn from_json_str(raw: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(raw)
            .map_err(|error| ComposerError::Config(format!("invalid config json: {error}")))?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        let config = Self::from_json_str(&raw)?;
        tracing::debug!(path = %path.display(), "loaded composer config");
        Ok(config)
    }

    pub fn to_json_string(&self) -> Result<String> {
        serde_json::to_string_pretty(self)
            .map_err(|error| ComposerError::Serialization(error.to_string()))
    }

    fn validate(&self) -> Result<()> {
        // Room for at least one character plus the ellipsis.
        if self.tags.name_display_limit < 4 {
            return Err(ComposerError::Config(format!(
                "tags.name_display_limit must be at least 4, got {}",
                self.tags.name_display_limit
            )));
        }
        if self.tags.pending_id_prefix.is_empty() {
            return Err(ComposerError::Config(
                "tags.pending_id_prefix must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}

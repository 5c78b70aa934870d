//! Command payload codec for `[cmd:<payload>]` tags.
//!
//! A payload is a command id optionally followed by `|key=value` fields:
//! `text_to_image|prompt=a red fox|width=1024|height=768`.

use std::collections::BTreeSet;

use crate::error::{ComposerError, Result};

use super::types::{AspectRatio, CommandConfig};

const FIELD_SEPARATOR: char = '|';
const KEY_VALUE_SEPARATOR: char = '=';

const MIN_STRENGTH: f32 = 0.1;
const MAX_STRENGTH: f32 = 1.0;

/// A payload split into its command id and decoded configuration.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct DecodedPayload {
    pub head: String,
    pub config: CommandConfig,
    /// Whether the payload carried any `key=value` fields.
    pub inline: bool,
}

pub(crate) fn decode_command_payload(payload: &str) -> Result<DecodedPayload> {
    let mut parts = payload.split(FIELD_SEPARATOR);
    let head = parts.next().unwrap_or_default();
    validate_head(head)?;

    let mut config = CommandConfig::default();
    let mut seen = BTreeSet::new();
    let mut inline = false;

    for field in parts {
        inline = true;
        let Some((key, value)) = field.split_once(KEY_VALUE_SEPARATOR) else {
            return Err(ComposerError::InvalidPayload(format!(
                "field '{field}' is missing '='"
            )));
        };
        if key.is_empty() {
            return Err(ComposerError::InvalidPayload(
                "field key must not be empty".to_string(),
            ));
        }
        if !seen.insert(key) {
            return Err(ComposerError::InvalidPayload(format!(
                "duplicate field '{key}'"
            )));
        }
        apply_field(&mut config, key, value)?;
    }

    Ok(DecodedPayload {
        head: head.to_string(),
        config,
        inline,
    })
}

fn apply_field(config: &mut CommandConfig, key: &str, value: &str) -> Result<()> {
    match key {
        "prompt" => config.prompt = value.to_string(),
        "style_id" => config.style_id = Some(require_value(key, value)?),
        "source_image" => config.source_image = Some(require_value(key, value)?),
        "aspect_ratio" => {
            let ratio = AspectRatio::parse(value).ok_or_else(|| {
                ComposerError::InvalidPayload(format!("unknown aspect ratio: {value}"))
            })?;
            config.aspect_ratio = Some(ratio);
        }
        "width" => config.width = Some(parse_dimension(key, value)?),
        "height" => config.height = Some(parse_dimension(key, value)?),
        "strength" => config.strength = Some(parse_strength(value)?),
        _ => {
            config.extra.insert(key.to_string(), value.to_string());
        }
    }
    Ok(())
}

fn require_value(key: &str, value: &str) -> Result<String> {
    if value.is_empty() {
        return Err(ComposerError::InvalidPayload(format!(
            "{key} requires a value"
        )));
    }
    Ok(value.to_string())
}

fn parse_dimension(key: &str, value: &str) -> Result<u32> {
    match value.parse::<u32>() {
        Ok(parsed) if parsed > 0 => Ok(parsed),
        _ => Err(ComposerError::InvalidPayload(format!(
            "{key} must be a positive integer, got '{value}'"
        ))),
    }
}

fn parse_strength(value: &str) -> Result<f32> {
    let parsed = value.parse::<f32>().map_err(|_| {
        ComposerError::InvalidPayload(format!("strength must be a number, got '{value}'"))
    })?;
    if !(MIN_STRENGTH..=MAX_STRENGTH).contains(&parsed) {
        return Err(ComposerError::InvalidPayload(format!(
            "strength must be between {MIN_STRENGTH} and {MAX_STRENGTH}, got {parsed}"
        )));
    }
    Ok(parsed)
}

fn validate_head(head: &str) -> Result<()> {
    if head.is_empty() {
        return Err(ComposerError::InvalidPayload(
            "command id must not be empty".to_string(),
        ));
    }
    if head.contains(KEY_VALUE_SEPARATOR) {
        return Err(ComposerError::InvalidPayload(format!(
            "command id '{head}' must not contain '='"
        )));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Encoding
// ---------------------------------------------------------------------------

/// Writes the canonical inline payload for a command.
///
/// Known fields come first in a fixed order, then extra fields by key.
/// The result decodes back to the same id and config.
pub fn encode_command_payload(id: &str, config: &CommandConfig) -> Result<String> {
    validate_head(id)?;
    ensure_encodable("command id", id)?;

    let mut payload = id.to_string();
    let mut push = |key: &str, value: &str| -> Result<()> {
        ensure_encodable(key, value)?;
        payload.push(FIELD_SEPARATOR);
        payload.push_str(key);
        payload.push(KEY_VALUE_SEPARATOR);
        payload.push_str(value);
        Ok(())
    };

    if !config.prompt.is_empty() {
        push("prompt", &config.prompt)?;
    }
    if let Some(style_id) = &config.style_id {
        push("style_id", style_id)?;
    }
    if let Some(ratio) = config.aspect_ratio {
        push("aspect_ratio", ratio.as_str())?;
    }
    if let Some(width) = config.width {
        push("width", &width.to_string())?;
    }
    if let Some(height) = config.height {
        push("height", &height.to_string())?;
    }
    if let Some(source_image) = &config.source_image {
        push("source_image", source_image)?;
    }
    if let Some(strength) = config.strength {
        push("strength", &strength.to_string())?;
    }
    for (key, value) in &config.extra {
        if key.is_empty() || key.contains(KEY_VALUE_SEPARATOR) {
            return Err(ComposerError::InvalidInput(format!(
                "extra field key '{key}' cannot be encoded"
            )));
        }
        push(key, value)?;
    }

    Ok(payload)
}

fn ensure_encodable(name: &str, value: &str) -> Result<()> {
    if value.contains([FIELD_SEPARATOR, ']']) {
        return Err(ComposerError::InvalidInput(format!(
            "{name} must not contain '|' or ']'"
        )));
    }
    Ok(())
}

//! Submission export: upload staged files, then render the final text.

use async_trait::async_trait;

use crate::error::{ComposerError, Result};

use super::registry::TagRegistry;
use super::types::{CommandKind, CommandTag, EditorContent, PendingFile, Segment, Tag};

const SOURCE_IMAGE_LABEL: &str = "source_image";
const TERMINATORS: [char; 4] = ['.', '!', '?', '。'];

/// Uploads a staged file to a session and returns the new resource id.
#[async_trait]
pub trait ResourceUploader: Send + Sync {
    async fn upload(&self, session_id: &str, file: &PendingFile, labels: &[&str])
        -> Result<String>;
}

/// Uploads every pending file in `content`, swaps in the uploaded ids and
/// returns the text to submit.
///
/// For the configured temp session nothing is uploaded and pending ids stay
/// in the output. The first failed upload aborts the export; tags settled
/// before the failure keep their uploaded ids.
pub async fn export_for_submission(
    registry: &TagRegistry,
    content: &mut EditorContent,
    session_id: &str,
    uploader: &dyn ResourceUploader,
) -> Result<String> {
    if session_id == registry.config().temp_session_id {
        tracing::debug!(session_id, "temp session, skipping uploads");
        return Ok(final_text(content));
    }

    let pending = content
        .segments
        .iter()
        .filter(|segment| matches!(segment, Segment::Tag(tag) if has_staged_file(tag)))
        .count();
    if pending > 0 {
        tracing::info!(session_id, pending, "uploading staged files");
    }

    for segment in content.segments.iter_mut() {
        let Segment::Tag(tag) = segment else {
            continue;
        };
        match tag {
            Tag::Resource(resource) => {
                let Some(file) = resource.pending_file.as_ref().filter(|_| resource.is_pending)
                else {
                    continue;
                };
                let uploaded = upload(
                    uploader,
                    session_id,
                    &resource.id,
                    file,
                    &[resource.kind.as_str()],
                )
                .await?;
                resource.id = uploaded;
                resource.is_pending = false;
                resource.pending_file = None;
            }
            Tag::Command(command) => {
                let Some(file) = command.pending_source.as_ref().filter(|_| command.is_pending)
                else {
                    continue;
                };
                let uploaded =
                    upload(uploader, session_id, &command.id, file, &[SOURCE_IMAGE_LABEL]).await?;
                command.resolve_source_image(&uploaded);
            }
        }
        registry.register(tag.clone());
    }

    Ok(final_text(content))
}

async fn upload(
    uploader: &dyn ResourceUploader,
    session_id: &str,
    tag_id: &str,
    file: &PendingFile,
    labels: &[&str],
) -> Result<String> {
    match uploader.upload(session_id, file, labels).await {
        Ok(resource_id) => {
            tracing::debug!(tag_id, resource_id = %resource_id, "uploaded staged file");
            Ok(resource_id)
        }
        Err(error) => {
            tracing::warn!(tag_id, %error, "upload failed");
            Err(ComposerError::Upload {
                tag_id: tag_id.to_string(),
                message: error.to_string(),
            })
        }
    }
}

fn has_staged_file(tag: &Tag) -> bool {
    match tag {
        Tag::Resource(resource) => resource.is_pending && resource.pending_file.is_some(),
        Tag::Command(command) => command.is_pending && command.pending_source.is_some(),
    }
}

/// Literal text verbatim, resources as references, commands as readable
/// instructions.
fn final_text(content: &EditorContent) -> String {
    content
        .segments
        .iter()
        .map(|segment| match segment {
            Segment::Text(text) => text.clone(),
            Segment::Tag(Tag::Command(command)) => command_text(command),
            Segment::Tag(tag) => tag.source_text(),
        })
        .collect()
}

fn command_text(tag: &CommandTag) -> String {
    let config = &tag.config;
    let mut text = match tag.kind {
        CommandKind::TextToImage => format!("Generate an image from text: {}", config.prompt),
        CommandKind::ImageToImage => format!("Transform the image: {}", config.prompt),
    };

    if tag.kind == CommandKind::ImageToImage {
        if let Some(source) = &config.source_image {
            text.push_str(&format!(", reference image id: {source}"));
        }
    }
    if let (Some(width), Some(height)) = (config.width, config.height) {
        text.push_str(&format!(", size: {width}×{height}"));
    }
    if let Some(style) = &config.style_id {
        text.push_str(&format!(", style: {style}, finetune_id: {style}"));
    }
    if !text.ends_with(TERMINATORS) {
        text.push('.');
    }
    text
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tags::types::CommandConfig;
    use parking_lot::Mutex;

    #[derive(Default)]
    struct RecordingUploader {
        calls: Mutex<Vec<(String, String, Vec<String>)>>,
        fail_on: Option<String>,
    }

    #[async_trait]
    impl ResourceUploader for RecordingUploader {
        async fn upload(
            &self,
            session_id: &str,
            file: &PendingFile,
            labels: &[&str],
        ) -> Result<String> {
            if self.fail_on.as_deref() == Some(file.name.as_str()) {
                return Err(ComposerError::InvalidInput("rejected".to_string()));
            }
            let mut calls = self.calls.lock();
            calls.push((
                session_id.to_string(),
                file.name.clone(),
                labels.iter().map(|label| label.to_string()).collect(),
            ));
            Ok(format!("res_{}", calls.len()))
        }
    }

    fn png(name: &str) -> PendingFile {
        PendingFile::new(name, "image/png", vec![0u8; 4])
    }

    #[tokio::test]
    async fn uploads_pending_resources_and_commands() {
        let registry = TagRegistry::default();
        let image = registry.add_pending_resource(png("cat.png"));
        let command = registry.add_command_tag(
            CommandKind::ImageToImage,
            "Restyle",
            CommandConfig::with_prompt("oil painting"),
            Some(png("ref.png")),
        );
        let mut content = registry.parse(&format!("{image} then {command}"));
        let uploader = RecordingUploader::default();

        let text = export_for_submission(&registry, &mut content, "s-1", &uploader)
            .await
            .expect("export succeeds");

        assert_eq!(
            text,
            "@image://res_1 then Transform the image: oil painting, reference image id: res_2."
        );
        let calls = uploader.calls.lock();
        assert_eq!(calls[0], ("s-1".to_string(), "cat.png".to_string(), vec!["image".to_string()]));
        assert_eq!(calls[1].2, vec!["source_image".to_string()]);
        assert!(!content.has_pending());
        assert!(registry.get("res_1").is_some());
    }

    #[tokio::test]
    async fn temp_session_skips_uploads() {
        let registry = TagRegistry::default();
        let image = registry.add_pending_resource(png("cat.png"));
        let mut content = registry.parse(&image);
        let uploader = RecordingUploader::default();

        let text = export_for_submission(&registry, &mut content, "temp-session", &uploader)
            .await
            .expect("export succeeds");

        assert_eq!(text, image);
        assert!(uploader.calls.lock().is_empty());
        assert!(content.has_pending());
    }

    #[tokio::test]
    async fn upload_failure_aborts_export() {
        let registry = TagRegistry::default();
        let image = registry.add_pending_resource(png("bad.png"));
        let mut content = registry.parse(&image);
        let uploader = RecordingUploader {
            fail_on: Some("bad.png".to_string()),
            ..RecordingUploader::default()
        };

        let err = export_for_submission(&registry, &mut content, "s-1", &uploader)
            .await
            .expect_err("upload fails");
        assert!(matches!(err, ComposerError::Upload { ref tag_id, .. } if tag_id.starts_with("tmp_")));
        assert!(content.has_pending());
    }

    #[tokio::test]
    async fn inline_commands_render_as_instructions() {
        let registry = TagRegistry::default();
        let mut content = registry.parse(
            "Please [cmd:text_to_image|prompt=a fox|width=512|height=512|style_id=s1]",
        );
        let uploader = RecordingUploader::default();

        let text = export_for_submission(&registry, &mut content, "s-1", &uploader)
            .await
            .expect("export succeeds");
        assert_eq!(
            text,
            "Please Generate an image from text: a fox, size: 512×512, style: s1, finetune_id: s1."
        );
    }

    #[test]
    fn command_text_keeps_existing_terminator() {
        let tag = CommandTag {
            kind: CommandKind::TextToImage,
            id: "text_to_image".to_string(),
            display: String::new(),
            config: CommandConfig::with_prompt("a cat!"),
            is_pending: false,
            payload: "text_to_image".to_string(),
            pending_source: None,
        };
        assert_eq!(command_text(&tag), "Generate an image from text: a cat!");
    }
}

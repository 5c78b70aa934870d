//! Tag parser: message text to [`EditorContent`].
//!
//! Parsing never fails. Text that looks like a tag but does not decode is
//! kept as literal text so the message always renders.

use crate::config::TagConfig;

use super::payload::decode_command_payload;
use super::registry::TagRegistry;
use super::scanner::{TagMatchKind, TagScanner};
use super::types::{CommandKind, CommandTag, EditorContent, ResourceKind, ResourceTag, Tag};

const ELLIPSIS: &str = "...";

/// Parser with optional registry enrichment.
///
/// The session id is carried for the host's tracing only; it never changes
/// the parse result.
#[derive(Debug, Clone, Copy)]
pub struct TagParser<'a> {
    config: &'a TagConfig,
    registry: Option<&'a TagRegistry>,
    session_id: Option<&'a str>,
}

impl<'a> TagParser<'a> {
    pub fn new(config: &'a TagConfig) -> Self {
        Self {
            config,
            registry: None,
            session_id: None,
        }
    }

    pub fn with_registry(mut self, registry: &'a TagRegistry) -> Self {
        self.registry = Some(registry);
        self
    }

    pub fn with_session(mut self, session_id: &'a str) -> Self {
        self.session_id = Some(session_id);
        self
    }

    pub fn parse(&self, text: &str) -> EditorContent {
        let _span = tracing::trace_span!("parse_tags", session = ?self.session_id).entered();

        let mut content = EditorContent::default();
        let mut last_end = 0usize;

        for found in TagScanner::new(text) {
            content.push_text(&text[last_end..found.span.start]);

            let raw = &text[found.span.clone()];
            let tag = match found.kind {
                TagMatchKind::Resource { kind, id } => Some(self.resource_tag(kind, &text[id])),
                TagMatchKind::Command { payload } => self.command_tag(&text[payload]),
            };
            match tag {
                Some(tag) => content.push_tag(tag),
                None => content.push_text(raw),
            }
            last_end = found.span.end;
        }
        content.push_text(&text[last_end..]);

        tracing::trace!(
            segments = content.segments.len(),
            bytes = text.len(),
            "parsed message text"
        );
        content
    }

    fn resource_tag(&self, kind: ResourceKind, id: &str) -> Tag {
        let is_pending = id.starts_with(self.config.pending_id_prefix.as_str());
        let pending_file = if is_pending {
            self.registry.and_then(|registry| registry.pending_file(id))
        } else {
            None
        };

        Tag::Resource(ResourceTag {
            kind,
            id: id.to_string(),
            name: display_name(id, self.config.name_display_limit),
            is_pending,
            pending_file,
        })
    }

    fn command_tag(&self, payload: &str) -> Option<Tag> {
        let decoded = match decode_command_payload(payload) {
            Ok(decoded) => decoded,
            Err(error) => {
                tracing::debug!(%error, payload, "command tag kept as literal text");
                return None;
            }
        };

        if !decoded.inline {
            if let Some(registered) = self.registered_command(&decoded.head) {
                return Some(Tag::Command(registered));
            }
        }

        let kind = CommandKind::infer_from_id(&decoded.head).or_else(|| {
            self.registered_command(&decoded.head)
                .map(|registered| registered.kind)
        });
        let Some(kind) = kind else {
            tracing::debug!(payload, "unknown command kind, kept as literal text");
            return None;
        };

        Some(Tag::Command(CommandTag {
            kind,
            display: kind.default_display(),
            id: decoded.head,
            config: decoded.config,
            is_pending: false,
            payload: payload.to_string(),
            pending_source: None,
        }))
    }

    fn registered_command(&self, id: &str) -> Option<CommandTag> {
        match self.registry?.get(id)? {
            Tag::Command(tag) => Some(tag),
            Tag::Resource(_) => None,
        }
    }
}

/// Parses text with the default tag settings and no registry.
pub fn parse_text(text: &str) -> EditorContent {
    TagParser::new(&TagConfig::default()).parse(text)
}

/// Last path component of `id`, shortened to `limit` characters.
fn display_name(id: &str, limit: usize) -> String {
    let name = id.rsplit('/').find(|part| !part.is_empty()).unwrap_or(id);
    if name.chars().count() <= limit {
        return name.to_string();
    }
    let keep = limit.saturating_sub(ELLIPSIS.len());
    let mut shortened = name.chars().take(keep).collect::<String>();
    shortened.push_str(ELLIPSIS);
    shortened
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tags::types::Segment;

    fn text(value: &str) -> Segment {
        Segment::Text(value.to_string())
    }

    fn resource(segment: &Segment) -> &ResourceTag {
        match segment {
            Segment::Tag(Tag::Resource(tag)) => tag,
            other => panic!("expected resource tag, got {other:?}"),
        }
    }

    fn command(segment: &Segment) -> &CommandTag {
        match segment {
            Segment::Tag(Tag::Command(tag)) => tag,
            other => panic!("expected command tag, got {other:?}"),
        }
    }

    #[test]
    fn empty_input_has_no_segments() {
        assert!(parse_text("").is_empty());
    }

    #[test]
    fn plain_text_is_single_segment() {
        let content = parse_text("just words");
        assert_eq!(content.segments, vec![text("just words")]);
    }

    #[test]
    fn mixed_message() {
        let content = parse_text("hello @image://img1 world [cmd:text_to_image|prompt=cat]");
        assert_eq!(content.segments.len(), 4);
        assert_eq!(content.segments[0], text("hello "));

        let image = resource(&content.segments[1]);
        assert_eq!(image.kind, ResourceKind::Image);
        assert_eq!(image.id, "img1");
        assert!(!image.is_pending);

        assert_eq!(content.segments[2], text(" world "));

        let cmd = command(&content.segments[3]);
        assert_eq!(cmd.kind, CommandKind::TextToImage);
        assert_eq!(cmd.id, "text_to_image");
        assert_eq!(cmd.config.prompt, "cat");
        assert_eq!(cmd.display, "Text to image command");
    }

    #[test]
    fn tag_only_input() {
        let content = parse_text("@doc://spec.pdf");
        assert_eq!(content.segments.len(), 1);
        assert_eq!(resource(&content.segments[0]).kind, ResourceKind::Doc);
    }

    #[test]
    fn malformed_resources_stay_literal() {
        for input in ["@image://", "@foo://x", "mail me @ home", "@text:/x"] {
            let content = parse_text(input);
            assert_eq!(content.segments, vec![text(input)], "input: {input}");
        }
    }

    #[test]
    fn malformed_command_span_is_literal_and_merged() {
        let content = parse_text("a [cmd:text_to_image|width=wide] b");
        assert_eq!(
            content.segments,
            vec![text("a [cmd:text_to_image|width=wide] b")]
        );
    }

    #[test]
    fn unknown_command_kind_is_literal() {
        let content = parse_text("[cmd:cmd_123_abc]");
        assert_eq!(content.segments, vec![text("[cmd:cmd_123_abc]")]);
    }

    #[test]
    fn command_kind_inferred_from_generated_id() {
        let content = parse_text("[cmd:cmd_1700000000000_abc_image_to_image]");
        let cmd = command(&content.segments[0]);
        assert_eq!(cmd.kind, CommandKind::ImageToImage);
        assert_eq!(cmd.config.prompt, "");
    }

    #[test]
    fn command_wins_over_nested_resource() {
        let content = parse_text("[cmd:text_to_image|source_image=@image://x]");
        assert_eq!(content.segments.len(), 1);
        let cmd = command(&content.segments[0]);
        assert_eq!(cmd.config.source_image.as_deref(), Some("@image://x"));
    }

    #[test]
    fn resource_wins_when_it_starts_first() {
        let content = parse_text("@image://a[cmd:text_to_image]");
        assert_eq!(content.segments.len(), 1);
        assert_eq!(resource(&content.segments[0]).id, "a[cmd:text_to_image]");
    }

    #[test]
    fn pending_prefix_marks_resource_pending() {
        let content = parse_text("@image://tmp_1_abc");
        let image = resource(&content.segments[0]);
        assert!(image.is_pending);
        assert!(image.pending_file.is_none());
    }

    #[test]
    fn display_name_uses_last_path_part_and_truncates() {
        assert_eq!(display_name("folder/report.pdf", 20), "report.pdf");
        assert_eq!(display_name("folder/", 20), "folder");
        assert_eq!(
            display_name("a_really_long_file_name_here.txt", 20),
            "a_really_long_fil..."
        );
        assert_eq!(display_name("一二三四五六七八九十", 8), "一二三四五...");
    }

    #[test]
    fn resource_name_respects_config_limit() {
        let config = TagConfig {
            name_display_limit: 8,
            ..TagConfig::default()
        };
        let content = TagParser::new(&config).parse("@doc://quarterly.pdf");
        assert_eq!(resource(&content.segments[0]).name, "quart...");
    }

    #[test]
    fn session_does_not_change_result() {
        let config = TagConfig::default();
        let input = "x @text://t1 [cmd:text_to_image]";
        let with_session = TagParser::new(&config).with_session("s-1").parse(input);
        assert_eq!(with_session, parse_text(input));
    }
}

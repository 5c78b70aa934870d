//! Serialization of parsed content back to message text.

use super::types::EditorContent;

/// Rebuilds the source text: literal runs verbatim, tags in their own
/// syntax. `serialize_content(&parse_text(s)) == s` for every `s`.
pub fn serialize_content(content: &EditorContent) -> String {
    content.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tags::parse_text;
    use crate::tags::types::Segment;

    const SAMPLES: &[&str] = &[
        "",
        "plain",
        "hello @image://img1 world [cmd:text_to_image|prompt=cat]",
        "@image://",
        "@foo://x and @doc://",
        "[cmd:] [cmd:open [cmd:x]]",
        "[cmd:text_to_image|width=0]",
        "@@image://a@@text://b@",
        "[cmd:image_to_image|prompt=x|strength=0.50]",
        "  leading and trailing  ",
        "line one\n@text://notes.md\nline three",
        "多字节 @image://图片.png 🔥 [cmd:text_to_image|prompt=猫]",
        "[cmd:text_to_image|source_image=@image://x] tail",
    ];

    #[test]
    fn round_trip_is_exact() {
        for input in SAMPLES {
            assert_eq!(serialize_content(&parse_text(input)), *input, "input: {input:?}");
        }
    }

    #[test]
    fn segments_cover_input_without_loss() {
        for input in SAMPLES {
            let content = parse_text(input);
            let covered = content
                .segments
                .iter()
                .map(|segment| match segment {
                    Segment::Text(text) => text.len(),
                    Segment::Tag(tag) => tag.source_text().len(),
                })
                .sum::<usize>();
            assert_eq!(covered, input.len(), "input: {input:?}");
        }
    }

    #[test]
    fn non_empty_input_never_yields_empty_content() {
        for input in SAMPLES.iter().filter(|input| !input.is_empty()) {
            assert!(!parse_text(input).is_empty(), "input: {input:?}");
        }
    }

    #[test]
    fn parse_is_idempotent_over_serialization() {
        for input in SAMPLES {
            let once = parse_text(input);
            let twice = parse_text(&serialize_content(&once));
            assert_eq!(once, twice, "input: {input:?}");
        }
    }

    #[test]
    fn no_adjacent_text_segments() {
        for input in SAMPLES {
            let content = parse_text(input);
            let adjacent = content
                .segments
                .windows(2)
                .any(|pair| matches!(pair, [Segment::Text(_), Segment::Text(_)]));
            assert!(!adjacent, "input: {input:?}");
        }
    }
}

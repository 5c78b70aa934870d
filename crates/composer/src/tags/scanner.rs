//! Left-to-right scanner for tag syntax.
//!
//! Recognizes `@<kind>://<id>` resource references and `[cmd:<payload>]`
//! command invocations. Matches never overlap: the scan resumes after the
//! end of each match, so the earliest match start wins.

use std::ops::Range;

use super::types::ResourceKind;

const RESOURCE_MARKER: u8 = b'@';
const COMMAND_MARKER: u8 = b'[';
const RESOURCE_SEPARATOR: &str = "://";
const COMMAND_OPEN: &str = "[cmd:";
const COMMAND_CLOSE: u8 = b']';

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum TagMatchKind {
    Resource { kind: ResourceKind, id: Range<usize> },
    Command { payload: Range<usize> },
}

/// A syntactic tag match; `span` covers the whole tag text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct TagMatch {
    pub span: Range<usize>,
    pub kind: TagMatchKind,
}

pub(crate) struct TagScanner<'a> {
    input: &'a str,
    cursor: usize,
}

impl<'a> TagScanner<'a> {
    pub fn new(input: &'a str) -> Self {
        Self { input, cursor: 0 }
    }
}

impl Iterator for TagScanner<'_> {
    type Item = TagMatch;

    fn next(&mut self) -> Option<TagMatch> {
        let bytes = self.input.as_bytes();
        while self.cursor < bytes.len() {
            let offset = memchr::memchr2(RESOURCE_MARKER, COMMAND_MARKER, &bytes[self.cursor..])?;
            let start = self.cursor + offset;

            // Resource family first; the markers differ so at most one applies.
            let found = match bytes[start] {
                RESOURCE_MARKER => match_resource(self.input, start),
                _ => match_command(self.input, start),
            };
            match found {
                Some(found) => {
                    self.cursor = found.span.end;
                    return Some(found);
                }
                // Both markers are ASCII, so start + 1 is a char boundary.
                None => self.cursor = start + 1,
            }
        }
        None
    }
}

fn match_resource(input: &str, start: usize) -> Option<TagMatch> {
    let rest = &input[start + 1..];
    let (kind, kind_len) = ResourceKind::ALL.into_iter().find_map(|kind| {
        let name = kind.as_str();
        (rest.starts_with(name) && rest[name.len()..].starts_with(RESOURCE_SEPARATOR))
            .then_some((kind, name.len()))
    })?;

    let id_start = start + 1 + kind_len + RESOURCE_SEPARATOR.len();
    let id_len = input[id_start..]
        .char_indices()
        .find(|(_, ch)| ch.is_whitespace() || *ch == '@')
        .map(|(index, _)| index)
        .unwrap_or(input.len() - id_start);
    if id_len == 0 {
        return None;
    }

    let id_end = id_start + id_len;
    Some(TagMatch {
        span: start..id_end,
        kind: TagMatchKind::Resource {
            kind,
            id: id_start..id_end,
        },
    })
}

fn match_command(input: &str, start: usize) -> Option<TagMatch> {
    if !input[start..].starts_with(COMMAND_OPEN) {
        return None;
    }
    let payload_start = start + COMMAND_OPEN.len();
    let payload_len = memchr::memchr(COMMAND_CLOSE, &input.as_bytes()[payload_start..])?;
    if payload_len == 0 {
        return None;
    }

    let payload_end = payload_start + payload_len;
    Some(TagMatch {
        span: start..payload_end + 1,
        kind: TagMatchKind::Command {
            payload: payload_start..payload_end,
        },
    })
}

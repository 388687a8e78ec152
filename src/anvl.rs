//! ANVL (`tag: value`) text output.

use crate::dict::{Content, MetadataDict};

/// Column at which ANVL values wrap.
pub const ANVL_WIDTH: usize = 79;

/// Wraps `text` into lines of at most `width` characters where possible.
///
/// The first line has `first_line_offset` fewer columns available, leaving
/// room for a key written before it. A line breaks at the rightmost space
/// at or before the boundary whose neighbours are both non-space. The space
/// starts the continuation, which is wrapped again at the full width. Text
/// with no usable space stays on one over-width line.
#[must_use]
pub fn break_string(text: &str, width: usize, first_line_offset: usize) -> String {
    let chars: Vec<char> = text.chars().collect();
    let mut lines: Vec<String> = Vec::new();
    let mut start = 0;
    let mut limit = width.saturating_sub(first_line_offset);
    loop {
        let rest = &chars[start..];
        if rest.len() <= limit {
            lines.push(rest.iter().collect());
            break;
        }
        match break_point(rest, limit) {
            Some(index) => {
                lines.push(rest[..index].iter().collect());
                start += index;
                limit = width;
            }
            None => {
                lines.push(rest.iter().collect());
                break;
            }
        }
    }
    lines.join("\n")
}

/// `chars` is longer than `limit`, so `chars[limit]` exists.
fn break_point(chars: &[char], limit: usize) -> Option<usize> {
    (1..=limit).rev().find(|&index| {
        chars[index] == ' '
            && !chars[index - 1].is_whitespace()
            && chars.get(index + 1).is_some_and(|next| !next.is_whitespace())
    })
}

/// Writes one wrapped `tag: value` line per entry, tags in `ordering`.
///
/// Compound content is written as its child values joined by `"; "`.
#[must_use]
pub fn write_anvl(dict: &MetadataDict, ordering: &[&str]) -> String {
    let mut lines = Vec::new();
    for tag in ordering {
        let Some(entries) = dict.get(*tag) else {
            continue;
        };
        for entry in entries {
            let value = entry.content.as_ref().map(Content::render).unwrap_or_default();
            let offset = tag.chars().count() + 1;
            lines.push(format!(
                "{tag}: {}",
                break_string(&value, ANVL_WIDTH, offset)
            ));
        }
    }
    lines.join("\n")
}

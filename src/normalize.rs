//! Subject heading normalization.

use lazy_static::lazy_static;
use regex::Regex;

use crate::dict::{Content, MetadataDict};

lazy_static! {
    static ref WHITESPACE_RUN: Regex = Regex::new(r"\s+").expect("whitespace pattern is valid");
}

/// Normalizers applied by default: element → qualifiers.
pub const DEFAULT_NORMALIZATIONS: &[(&str, &[&str])] = &[("subject", &["LCSH", "UNTL-BS"])];

/// Normalizes an LCSH heading: `--` separated parts are trimmed and rejoined
/// with `" -- "`, and a period is appended unless the heading already ends
/// in punctuation.
#[must_use]
pub fn normalize_lcsh(subject: &str) -> String {
    let mut joined = subject
        .trim()
        .split("--")
        .map(str::trim)
        .collect::<Vec<_>>()
        .join(" -- ");
    if joined.ends_with(|c: char| c.is_ascii_alphanumeric()) {
        joined.push('.');
    }
    joined
}

/// Trims a UNTL browse subject and collapses whitespace runs to one space.
#[must_use]
pub fn normalize_untl(subject: &str) -> String {
    WHITESPACE_RUN.replace_all(subject.trim(), " ").into_owned()
}

/// Encodes a UNTL browse subject for use as an index token.
#[must_use]
pub fn untl_to_encoded_untl(subject: &str) -> String {
    normalize_untl(subject).replace(' ', "_").replace("_-_", "/")
}

/// Inverse of [`untl_to_encoded_untl`].
#[must_use]
pub fn encoded_untl_to_untl(subject: &str) -> String {
    subject.replace('/', "_-_").replace('_', " ")
}

fn normalizer(tag: &str, qualifier: &str) -> Option<fn(&str) -> String> {
    match (tag, qualifier) {
        ("subject", "LCSH") => Some(normalize_lcsh),
        ("subject", "UNTL-BS") => Some(normalize_untl),
        _ => None,
    }
}

/// Normalizes the text content of entries whose tag and qualifier are listed
/// in `rules` and have a known normalizer.
pub fn normalize_dict(dict: &mut MetadataDict, rules: &[(&str, &[&str])]) {
    for (tag, qualifiers) in rules {
        let Some(entries) = dict.get_mut(*tag) else {
            continue;
        };
        for entry in entries {
            let Some(qualifier) = entry.qualifier.as_deref() else {
                continue;
            };
            if !qualifiers.contains(&qualifier) {
                continue;
            }
            let Some(normalize) = normalizer(tag, qualifier) else {
                continue;
            };
            if let Some(Content::Text(text)) = &mut entry.content {
                if !text.is_empty() {
                    *text = normalize(text);
                }
            }
        }
    }
}

//! Content fingerprints for detecting record changes.
//!
//! Each top-level field is hashed on its own so two versions of a record can
//! be compared field by field. The per-field hashes are then hashed together
//! into one version string. Hashing works on a canonical form where
//! compound children are sorted by tag, so reordering a `creator`'s children
//! does not produce a new version.
//!
//! # Examples
//!
//! ```ignore
//! use untl::version::{compare_hashes, untl_to_hash_dict, HashOptions};
//!
//! let before = untl_to_hash_dict(&old_record, &HashOptions::default())?;
//! let after = untl_to_hash_dict(&new_record, &HashOptions::default())?;
//! for (tag, change) in compare_hashes(&before, &after) {
//!     println!("{tag}: {change}");
//! }
//! # Ok::<(), untl::UntlError>(())
//! ```

use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;
use serde_json::{json, Value};
use sha2::{Digest, Sha256};
use tracing::debug;

use crate::dict::{tree_to_dict, Content, Entry, MetadataDict};
use crate::element::Element;
use crate::error::{Result, UntlError};

/// `meta` qualifiers that change on every edit without changing the record.
pub const MODIFICATION_META_QUALIFIERS: &[&str] = &["metadataModifier", "metadataModificationDate"];

/// Tag → hex SHA-256 of the field's canonical form.
pub type HashDict = BTreeMap<String, String>;

/// Options for [`hash_dict`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HashOptions {
    /// Leave modifier and modification-date `meta` entries out of the hash.
    pub exclude_modification_meta: bool,
}

impl Default for HashOptions {
    fn default() -> Self {
        Self {
            exclude_modification_meta: true,
        }
    }
}

impl HashOptions {
    /// Sets whether modification `meta` entries are excluded.
    #[must_use]
    pub const fn with_exclude_modification_meta(mut self, exclude: bool) -> Self {
        self.exclude_modification_meta = exclude;
        self
    }

    fn includes(&self, tag: &str, entry: &Entry) -> bool {
        !(self.exclude_modification_meta
            && tag == "meta"
            && entry
                .qualifier
                .as_deref()
                .is_some_and(|qualifier| MODIFICATION_META_QUALIFIERS.contains(&qualifier)))
    }
}

/// Canonical form of one entry: `[key, value]` pairs in qualifier, role,
/// scheme, content order, compound content as tag-sorted pairs.
#[must_use]
pub fn canonical_entry(entry: &Entry) -> Value {
    let mut pairs = Vec::new();
    let attributes = [
        ("qualifier", &entry.qualifier),
        ("role", &entry.role),
        ("scheme", &entry.scheme),
    ];
    for (key, value) in attributes {
        if let Some(value) = value {
            pairs.push(json!([key, value]));
        }
    }
    match &entry.content {
        Some(Content::Text(text)) => pairs.push(json!(["content", text])),
        Some(Content::Children(children)) => {
            let sorted: BTreeMap<&String, &String> = children.iter().collect();
            let children: Vec<Value> = sorted
                .into_iter()
                .map(|(tag, text)| json!([tag, text]))
                .collect();
            pairs.push(json!(["content", children]));
        }
        None => {}
    }
    Value::Array(pairs)
}

fn sha256_json<T: Serialize>(value: &T) -> Result<String> {
    let bytes = serde_json::to_vec(value)
        .map_err(|e| UntlError::ParseError(format!("Failed to serialize for hashing: {e}")))?;
    Ok(format!("{:x}", Sha256::digest(&bytes)))
}

/// Hashes each field of a dictionary.
///
/// Fields left without entries after exclusion are omitted.
///
/// # Errors
///
/// Returns an error if a field cannot be serialized.
pub fn hash_dict(dict: &MetadataDict, options: &HashOptions) -> Result<HashDict> {
    let mut hashes = HashDict::new();
    for (tag, entries) in dict {
        let canonical: Vec<Value> = entries
            .iter()
            .filter(|entry| options.includes(tag, entry))
            .map(canonical_entry)
            .collect();
        if canonical.is_empty() {
            continue;
        }
        hashes.insert(tag.clone(), sha256_json(&canonical)?);
    }
    Ok(hashes)
}

/// Hashes each field of a UNTL record.
///
/// # Errors
///
/// As [`hash_dict`].
pub fn untl_to_hash_dict(untl: &Element, options: &HashOptions) -> Result<HashDict> {
    hash_dict(&tree_to_dict(untl), options)
}

/// Combines per-field hashes into one fingerprint.
///
/// # Errors
///
/// Returns an error if the hashes cannot be serialized.
pub fn version_hash(hashes: &HashDict) -> Result<String> {
    sha256_json(hashes)
}

/// Fingerprint of a UNTL record.
///
/// # Errors
///
/// As [`hash_dict`].
pub fn record_version(untl: &Element, options: &HashOptions) -> Result<String> {
    let hashes = untl_to_hash_dict(untl, options)?;
    let version = version_hash(&hashes)?;
    debug!(fields = hashes.len(), version = %version, "computed record version");
    Ok(version)
}

/// How a field differs between two versions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Change {
    /// Only in the newer version.
    Added,
    /// Only in the older version.
    Deleted,
    /// In both, with different hashes.
    Changed,
}

impl fmt::Display for Change {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Added => write!(f, "added"),
            Self::Deleted => write!(f, "deleted"),
            Self::Changed => write!(f, "changed"),
        }
    }
}

/// Lists the fields that differ from `old` to `new`.
#[must_use]
pub fn compare_hashes(old: &HashDict, new: &HashDict) -> BTreeMap<String, Change> {
    let mut changes = BTreeMap::new();
    for (tag, hash) in old {
        match new.get(tag) {
            None => {
                changes.insert(tag.clone(), Change::Deleted);
            }
            Some(other) if other != hash => {
                changes.insert(tag.clone(), Change::Changed);
            }
            Some(_) => {}
        }
    }
    for tag in new.keys().filter(|tag| !old.contains_key(*tag)) {
        changes.insert(tag.clone(), Change::Added);
    }
    changes
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bronco() -> MetadataDict {
        let mut dict = MetadataDict::new();
        dict.insert(
            "title".to_string(),
            vec![Entry::text("The Bronco").with_qualifier("serialtitle")],
        );
        dict.insert(
            "meta".to_string(),
            vec![
                Entry::text("2007-09-20, 13:46:15").with_qualifier("metadataModificationDate"),
                Entry::text("Daniel").with_qualifier("metadataModifier"),
                Entry::text("simple").with_qualifier("objectType"),
            ],
        );
        dict
    }

    #[test]
    fn test_canonical_entry() {
        let entry = Entry::children([("type", "per"), ("name", "Case, Justin")]).with_qualifier("aut");
        assert_eq!(
            serde_json::to_string(&canonical_entry(&entry)).unwrap(),
            r#"[["qualifier","aut"],["content",[["name","Case, Justin"],["type","per"]]]]"#
        );
    }

    #[test]
    fn test_hash_dict_excludes_modification_meta() {
        let hashes = hash_dict(&bronco(), &HashOptions::default()).unwrap();
        let mut plain = bronco();
        plain["meta"].truncate(0);
        plain["meta"].push(Entry::text("simple").with_qualifier("objectType"));
        assert_eq!(hashes, hash_dict(&plain, &HashOptions::default()).unwrap());

        let all = hash_dict(&bronco(), &HashOptions::default().with_exclude_modification_meta(false))
            .unwrap();
        assert_eq!(all["title"], hashes["title"]);
        assert_ne!(all["meta"], hashes["meta"]);
        assert_eq!(hashes["title"].len(), 64);
    }

    #[test]
    fn test_version_stable_under_reordering() {
        let mut first = MetadataDict::new();
        first.insert("collection".to_string(), vec![Entry::text("UNT")]);
        first.insert(
            "creator".to_string(),
            vec![Entry::children([("name", "Case, Justin"), ("type", "per")])],
        );
        let mut second = MetadataDict::new();
        second.insert(
            "creator".to_string(),
            vec![Entry::children([("type", "per"), ("name", "Case, Justin")])],
        );
        second.insert("collection".to_string(), vec![Entry::text("UNT")]);

        let options = HashOptions::default();
        let a = version_hash(&hash_dict(&first, &options).unwrap()).unwrap();
        let b = version_hash(&hash_dict(&second, &options).unwrap()).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_compare_hashes() {
        let old: HashDict = [("title", "1"), ("date", "2"), ("note", "3")]
            .into_iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        let new: HashDict = [("title", "1"), ("date", "x"), ("format", "4")]
            .into_iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        let changes = compare_hashes(&old, &new);
        assert_eq!(changes.len(), 3);
        assert_eq!(changes["date"], Change::Changed);
        assert_eq!(changes["note"], Change::Deleted);
        assert_eq!(changes["format"], Change::Added);
        assert_eq!(Change::Added.to_string(), "added");
    }
}

//! JSON serialization and deserialization of metadata dictionaries.
//!
//! Output always has sorted keys. With an indent the output is
//! pretty-printed; without one it is a single line using `", "` and `": "`
//! separators. Non-ASCII text is written as raw UTF-8.
//!
//! # Examples
//!
//! ```ignore
//! use untl::{json, Schema};
//!
//! let dict = json::json_to_dict(r#"{"title": [{"content": "The Bronco", "qualifier": "serialtitle"}]}"#)?;
//! let tree = json::json_to_tree(r#"{"collection": [{"content": "UNT"}]}"#, Schema::Untl)?;
//!
//! assert_eq!(
//!     json::dict_to_json(&dict, None)?,
//!     r#"{"title": [{"content": "The Bronco", "qualifier": "serialtitle"}]}"#
//! );
//! # Ok::<(), untl::UntlError>(())
//! ```

use std::io;

use serde::Serialize;
use serde_json::ser::{Formatter, PrettyFormatter, Serializer};
use serde_json::Value;

use crate::dict::{dict_to_tree, tree_to_dict, FormattedDict, MetadataDict};
use crate::element::Element;
use crate::error::{Result, UntlError};
use crate::schema::Schema;

/// Indent used by the formatted DC and Highwire exports.
pub const FORMATTED_INDENT: usize = 4;

/// Single-line formatter with a space after every separator.
struct SpacedFormatter;

impl Formatter for SpacedFormatter {
    fn begin_array_value<W>(&mut self, writer: &mut W, first: bool) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        if first {
            Ok(())
        } else {
            writer.write_all(b", ")
        }
    }

    fn begin_object_key<W>(&mut self, writer: &mut W, first: bool) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        if first {
            Ok(())
        } else {
            writer.write_all(b", ")
        }
    }

    fn begin_object_value<W>(&mut self, writer: &mut W) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        writer.write_all(b": ")
    }
}

/// Converts a dictionary to a JSON value with sorted keys.
///
/// # Errors
///
/// Returns an error if the dictionary cannot be represented as JSON.
pub fn dict_to_value(dict: &MetadataDict) -> Result<Value> {
    serde_json::to_value(dict)
        .map_err(|e| UntlError::ParseError(format!("Failed to convert dictionary to JSON: {e}")))
}

/// Serializes any value with sorted keys, pretty-printed with `indent`
/// spaces or on one line.
pub(crate) fn to_json_string<T: Serialize>(value: &T, indent: Option<usize>) -> Result<String> {
    // Going through `Value` sorts every object's keys.
    let value = serde_json::to_value(value)
        .map_err(|e| UntlError::ParseError(format!("Failed to convert to JSON: {e}")))?;
    let bytes = match indent {
        Some(width) => {
            let indent = vec![b' '; width];
            let mut serializer =
                Serializer::with_formatter(Vec::new(), PrettyFormatter::with_indent(&indent));
            value
                .serialize(&mut serializer)
                .map_err(|e| UntlError::ParseError(format!("Failed to write JSON: {e}")))?;
            serializer.into_inner()
        }
        None => {
            let mut serializer = Serializer::with_formatter(Vec::new(), SpacedFormatter);
            value
                .serialize(&mut serializer)
                .map_err(|e| UntlError::ParseError(format!("Failed to write JSON: {e}")))?;
            serializer.into_inner()
        }
    };
    String::from_utf8(bytes)
        .map_err(|e| UntlError::ParseError(format!("Failed to encode JSON as UTF-8: {e}")))
}

/// Serializes a dictionary to a JSON string.
///
/// # Errors
///
/// Returns an error if serialization fails.
pub fn dict_to_json(dict: &MetadataDict, indent: Option<usize>) -> Result<String> {
    to_json_string(dict, indent)
}

/// Serializes a formatted dictionary with a four-space indent.
///
/// # Errors
///
/// Returns an error if serialization fails.
pub fn formatted_to_json(formatted: &FormattedDict) -> Result<String> {
    to_json_string(formatted, Some(FORMATTED_INDENT))
}

/// Parses a dictionary from a JSON string.
///
/// # Errors
///
/// Returns [`UntlError::ParseError`] if the JSON is malformed or not
/// dictionary-shaped.
pub fn json_to_dict(json: &str) -> Result<MetadataDict> {
    serde_json::from_str(json)
        .map_err(|e| UntlError::ParseError(format!("Failed to parse JSON: {e}")))
}

/// Converts a JSON value to a dictionary.
///
/// # Errors
///
/// Returns [`UntlError::ParseError`] if the value is not dictionary-shaped.
pub fn value_to_dict(value: Value) -> Result<MetadataDict> {
    serde_json::from_value(value)
        .map_err(|e| UntlError::ParseError(format!("Failed to parse JSON: {e}")))
}

/// Parses a JSON dictionary and builds a tree of `schema` from it.
///
/// # Errors
///
/// Returns an error if the JSON is malformed or does not fit the schema.
pub fn json_to_tree(json: &str, schema: Schema) -> Result<Element> {
    dict_to_tree(&json_to_dict(json)?, schema)
}

/// Serializes a tree's dictionary form as JSON.
///
/// # Errors
///
/// Returns an error if serialization fails.
pub fn tree_to_json(root: &Element, indent: Option<usize>) -> Result<String> {
    dict_to_json(&tree_to_dict(root), indent)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dict::Entry;

    fn bronco() -> MetadataDict {
        let mut dict = MetadataDict::new();
        dict.insert(
            "title".to_string(),
            vec![Entry::text("The Bronco").with_qualifier("serialtitle")],
        );
        dict
    }

    #[test]
    fn test_dict_to_json_indented() {
        let json = dict_to_json(&bronco(), Some(4)).unwrap();
        assert_eq!(
            json,
            "{\n    \"title\": [\n        {\n            \"content\": \"The Bronco\",\n            \"qualifier\": \"serialtitle\"\n        }\n    ]\n}"
        );
    }

    #[test]
    fn test_dict_to_json_compact() {
        let json = dict_to_json(&bronco(), None).unwrap();
        assert_eq!(
            json,
            r#"{"title": [{"content": "The Bronco", "qualifier": "serialtitle"}]}"#
        );
    }

    #[test]
    fn test_keys_are_sorted() {
        let mut dict = bronco();
        dict.insert("collection".to_string(), vec![Entry::text("UNT")]);
        let json = dict_to_json(&dict, None).unwrap();
        assert!(json.starts_with(r#"{"collection""#));
    }

    #[test]
    fn test_json_roundtrip() {
        let mut dict = bronco();
        dict.insert(
            "creator".to_string(),
            vec![Entry::children([("name", "Case, Justin"), ("type", "per")]).with_qualifier("aut")],
        );
        let json = dict_to_json(&dict, Some(2)).unwrap();
        assert_eq!(json_to_dict(&json).unwrap(), dict);
    }

    #[test]
    fn test_json_to_tree() {
        let tree = json_to_tree(r#"{"collection": [{"content": "UNT"}]}"#, Schema::Untl).unwrap();
        assert_eq!(tree.children()[0].tag(), "collection");
        assert_eq!(tree.children()[0].content(), Some("UNT"));
    }

    #[test]
    fn test_json_to_dict_malformed() {
        assert!(matches!(
            json_to_dict("{\"title\": 3}"),
            Err(UntlError::ParseError(_))
        ));
    }

    #[test]
    fn test_formatted_to_json() {
        let mut formatted = FormattedDict::new();
        formatted.insert("title".to_string(), vec!["Tres Actos".to_string()]);
        formatted.insert("date".to_string(), vec!["1944".to_string()]);
        assert_eq!(
            formatted_to_json(&formatted).unwrap(),
            "{\n    \"date\": [\n        \"1944\"\n    ],\n    \"title\": [\n        \"Tres Actos\"\n    ]\n}"
        );
    }
}

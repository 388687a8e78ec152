//! Round-trip tests across the dictionary, tree, XML and JSON forms.

mod common;

use proptest::prelude::*;
use untl::dict::{add_empty_fields, dict_to_tree, format_dict, tree_to_dict};
use untl::json::{dict_to_json, json_to_dict};
use untl::xml::{dict_to_xml_string, xml_str_to_tree, XmlOptions};
use untl::{Entry, MetadataDict, Schema, UntlError};

const QUALIFIED_LEAVES: &[&str] = &["title", "date", "description", "subject", "coverage", "note"];
const PLAIN_LEAVES: &[&str] = &["collection", "institution", "language", "format"];

fn text() -> impl Strategy<Value = String> {
    "[A-Za-z0-9][A-Za-z0-9 ,.&<>-]{0,24}[A-Za-z0-9.]"
}

fn qualifier() -> impl Strategy<Value = String> {
    "[a-zA-Z]{1,12}"
}

fn qualified_leaf() -> impl Strategy<Value = (String, Entry)> {
    (prop::sample::select(QUALIFIED_LEAVES), text(), qualifier())
        .prop_map(|(tag, content, qualifier)| (tag.to_string(), Entry::text(content).with_qualifier(qualifier)))
}

fn plain_leaf() -> impl Strategy<Value = (String, Entry)> {
    (prop::sample::select(PLAIN_LEAVES), text())
        .prop_map(|(tag, content)| (tag.to_string(), Entry::text(content)))
}

fn agent() -> impl Strategy<Value = (String, Entry)> {
    (
        prop::sample::select(&["creator", "contributor"][..]),
        text(),
        prop::option::of(prop::sample::select(&["per", "org"][..])),
        prop::option::of(qualifier()),
    )
        .prop_map(|(tag, name, kind, qualifier)| {
            let mut children = vec![("name", name)];
            if let Some(kind) = kind {
                children.push(("type", kind.to_string()));
            }
            let mut entry = Entry::children(children);
            if let Some(qualifier) = qualifier {
                entry = entry.with_qualifier(qualifier);
            }
            (tag.to_string(), entry)
        })
}

fn untl_dict() -> impl Strategy<Value = MetadataDict> {
    prop::collection::vec(prop_oneof![qualified_leaf(), plain_leaf(), agent()], 0..12).prop_map(
        |entries| {
            let mut dict = MetadataDict::new();
            for (tag, entry) in entries {
                dict.entry(tag).or_default().push(entry);
            }
            dict
        },
    )
}

proptest! {
    #[test]
    fn prop_dict_tree_roundtrip(dict in untl_dict()) {
        let tree = dict_to_tree(&dict, Schema::Untl).unwrap();
        prop_assert_eq!(tree_to_dict(&tree), dict);
    }

    #[test]
    fn prop_xml_roundtrip(dict in untl_dict()) {
        let xml = dict_to_xml_string(&dict, &XmlOptions::untl()).unwrap();
        let tree = xml_str_to_tree(&xml, Schema::Untl).unwrap();
        prop_assert_eq!(tree_to_dict(&tree), dict);
    }

    #[test]
    fn prop_json_roundtrip(dict in untl_dict()) {
        let json = dict_to_json(&dict, Some(4)).unwrap();
        prop_assert_eq!(json_to_dict(&json).unwrap(), dict);
    }

    #[test]
    fn prop_xml_follows_canonical_order(dict in untl_dict()) {
        let xml = dict_to_xml_string(&dict, &XmlOptions::untl()).unwrap();
        let tree = xml_str_to_tree(&xml, Schema::Untl).unwrap();
        let positions: Vec<usize> = tree
            .children()
            .iter()
            .map(|child| Schema::Untl.order_index(child.tag()))
            .collect();
        prop_assert!(positions.windows(2).all(|pair| pair[0] <= pair[1]));
    }
}

#[test]
fn test_fixture_survives_xml_roundtrip() {
    let dict = common::metatest_dict();
    let xml = dict_to_xml_string(&dict, &XmlOptions::untl()).unwrap();
    let reparsed = tree_to_dict(&xml_str_to_tree(&xml, Schema::Untl).unwrap());
    assert_eq!(reparsed, dict);
    assert_eq!(dict["meta"].len(), 5);
}

#[test]
fn test_tree_xml_roundtrip_with_namespace() {
    let record = common::metatest_record();
    let xml = record.to_xml_string(true).unwrap();
    let reparsed = xml_str_to_tree(&xml, Schema::Untl).unwrap();
    assert_eq!(tree_to_dict(&reparsed), tree_to_dict(&record));
}

#[test]
fn test_schema_violation_is_an_error() {
    let dict = common::dict_of(vec![("collection", Entry::text("UNT").with_qualifier("x"))]);
    assert!(matches!(
        dict_to_tree(&dict, Schema::Untl),
        Err(UntlError::Structure(_))
    ));

    let dict = common::dict_of(vec![("publisher", Entry::children([("type", "per")]))]);
    let err = dict_to_tree(&dict, Schema::Untl).unwrap_err();
    assert_eq!(err.to_string(), "Invalid child \"type\" for parent \"publisher\"");
}

#[test]
fn test_padding_shapes() {
    let mut dict = common::tres_actos();
    add_empty_fields(&mut dict, Schema::Untl);
    assert_eq!(dict.len(), Schema::Untl.ordering().len());
    assert_eq!(dict["title"][0].qualifier.as_deref(), Some("officialtitle"));
    assert_eq!(dict["note"], vec![Entry::text("").with_qualifier("")]);
    assert_eq!(dict["format"], vec![Entry::text("")]);
    assert_eq!(
        dict["contributor"],
        vec![Entry::children([("info", ""), ("type", ""), ("name", "")])]
    );

    let formatted = format_dict(&dict);
    assert_eq!(formatted["contributor"], vec!["; ; ".to_string()]);
}

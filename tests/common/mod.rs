//! Common test helpers and fixtures shared across the test suite.

#![allow(dead_code)]

use untl::{dict, xml, Element, Entry, MetadataDict, Schema};

/// Path of the full UNTL fixture record.
pub const METATEST_PATH: &str = "tests/data/metatest.untl.xml";

/// Loads the full UNTL fixture record as a tree.
pub fn metatest_record() -> Element {
    xml::xml_file_to_tree(METATEST_PATH, Schema::Untl).expect("fixture parses")
}

/// Loads the full UNTL fixture record as a dictionary.
pub fn metatest_dict() -> MetadataDict {
    dict::tree_to_dict(&metatest_record())
}

/// Builds a dictionary from `(tag, entry)` pairs, grouping repeated tags.
pub fn dict_of(entries: Vec<(&str, Entry)>) -> MetadataDict {
    let mut dict = MetadataDict::new();
    for (tag, entry) in entries {
        dict.entry(tag.to_string()).or_default().push(entry);
    }
    dict
}

/// Builds a UNTL tree from `(tag, entry)` pairs.
pub fn untl_of(entries: Vec<(&str, Entry)>) -> Element {
    dict::dict_to_tree(&dict_of(entries), Schema::Untl).expect("entries fit UNTL")
}

/// The small record used by most format examples.
pub fn tres_actos() -> MetadataDict {
    dict_of(vec![
        ("title", Entry::text("Tres Actos").with_qualifier("officialtitle")),
        (
            "creator",
            Entry::children([("name", "Last, Furston, 1807-1865."), ("type", "per")])
                .with_qualifier("aut"),
        ),
        ("publisher", Entry::children([("name", "Fake Publishing")])),
        ("collection", Entry::text("UNT")),
        ("date", Entry::text("1944").with_qualifier("creation")),
    ])
}

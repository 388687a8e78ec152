//! RDF export of projected Dublin Core records.

#![cfg(feature = "rdf")]

mod common;

use untl::dublin_core::{untl_to_dc_dict, DcOptions};
use untl::rdf::{dc_dict_to_triples, generate_rdf, generate_rdf_xml, RdfFormat};

#[test]
fn test_fixture_triples_named_by_ark() {
    let options = DcOptions::default()
        .with_ark("ark:/67531/metatest2")
        .with_domain_name("digital.library.unt.edu");
    let dc = untl_to_dc_dict(&common::metatest_record(), &options).unwrap();
    let expected: usize = dc.values().map(Vec::len).sum();

    let triples = dc_dict_to_triples(&dc).unwrap();
    assert_eq!(triples.len(), expected);

    let nt = generate_rdf(&dc, RdfFormat::NTriples).unwrap();
    assert_eq!(nt.lines().count(), expected);
    assert!(nt.lines().all(|line| line.starts_with("<info:ark/67531/metatest2> ")));
    assert!(nt.contains(
        "<http://purl.org/dc/elements/1.1/identifier> <http://digital.library.unt.edu/ark:/67531/metatest2/> ."
    ));
    assert!(nt.contains("<http://purl.org/dc/elements/1.1/coverage> \"1943-1944\" ."));
}

#[test]
fn test_rdf_xml_without_ark() {
    let dc = untl_to_dc_dict(&common::metatest_record(), &DcOptions::default()).unwrap();
    let xml = generate_rdf_xml(&dc).unwrap();
    assert!(xml.contains("<rdf:RDF"));
    assert!(xml.contains("<dc:title>Tres Actos</dc:title>"));
    assert!(!xml.contains("info:ark"));
    assert_eq!(RdfFormat::default().mime_type(), "application/rdf+xml");
}

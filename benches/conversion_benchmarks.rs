#![allow(missing_docs)]
//! Benchmarks for UNTL record conversion.
//!
//! Measures parsing, serialization and cross-schema projection of the test
//! fixture record using Criterion.rs.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use untl::batch::parse_xml_batch;
use untl::dict::{dict_to_tree, tree_to_dict};
use untl::dublin_core::{generate_dc_xml, untl_to_dc_dict, DcOptions};
use untl::highwire::{untl_to_highwire, HighwireOptions};
use untl::version::{record_version, HashOptions};
use untl::xml::{dict_to_xml_string, xml_str_to_tree, XmlOptions};
use untl::Schema;

/// Load the fixture record from the test data directory.
fn load_fixture() -> String {
    let path = "tests/data/metatest.untl.xml";
    std::fs::read_to_string(path).unwrap_or_else(|_| panic!("Failed to load fixture: {path}"))
}

fn benchmark_parse(c: &mut Criterion) {
    let xml = load_fixture();
    c.bench_function("parse_untl_xml", |b| {
        b.iter(|| xml_str_to_tree(black_box(&xml), Schema::Untl).unwrap());
    });
}

fn benchmark_serialize(c: &mut Criterion) {
    let dict = tree_to_dict(&xml_str_to_tree(&load_fixture(), Schema::Untl).unwrap());
    c.bench_function("dict_to_untl_xml", |b| {
        b.iter(|| dict_to_xml_string(black_box(&dict), &XmlOptions::untl()).unwrap());
    });
    c.bench_function("dict_to_tree", |b| {
        b.iter(|| dict_to_tree(black_box(&dict), Schema::Untl).unwrap());
    });
}

fn benchmark_projections(c: &mut Criterion) {
    let record = xml_str_to_tree(&load_fixture(), Schema::Untl).unwrap();
    let options = DcOptions::default()
        .with_ark("ark:/67531/metatest2")
        .with_domain_name("digital.library.unt.edu");

    c.bench_function("untl_to_dc_xml", |b| {
        b.iter(|| generate_dc_xml(&untl_to_dc_dict(black_box(&record), &options).unwrap()).unwrap());
    });
    c.bench_function("untl_to_highwire", |b| {
        b.iter(|| untl_to_highwire(black_box(&record), &HighwireOptions::default()));
    });
    c.bench_function("record_version", |b| {
        b.iter(|| record_version(black_box(&record), &HashOptions::default()).unwrap());
    });
}

fn benchmark_batch(c: &mut Criterion) {
    let documents = vec![load_fixture(); 1_000];
    c.bench_function("parse_1k_records_parallel", |b| {
        b.iter(|| parse_xml_batch(black_box(&documents)).unwrap().len());
    });
}

criterion_group!(
    benches,
    benchmark_parse,
    benchmark_serialize,
    benchmark_projections,
    benchmark_batch
);
criterion_main!(benches);

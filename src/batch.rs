//! Parallel conversion of many records using Rayon.
//!
//! Every conversion in this crate is a pure function of one record, so a
//! batch is converted by mapping over Rayon's work-stealing pool. Results
//! keep input order and the first failure aborts the batch.
//!
//! # Examples
//!
//! ```ignore
//! use untl::batch::{parse_xml_batch, dc_xml_batch};
//! use untl::DcOptions;
//!
//! let records = vec![std::fs::read_to_string("a.untl.xml")?, std::fs::read_to_string("b.untl.xml")?];
//! let dicts = parse_xml_batch(&records)?;
//! let dc = dc_xml_batch(&dicts, &DcOptions::default())?;
//! assert_eq!(dc.len(), 2);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

use rayon::prelude::*;
use tracing::debug;

use crate::dict::{dict_to_tree, tree_to_dict, MetadataDict};
use crate::dublin_core::{generate_dc_xml, untl_to_dc_dict, DcOptions};
use crate::error::Result;
use crate::schema::Schema;
use crate::version::{hash_dict, version_hash, HashOptions};
use crate::xml::xml_str_to_tree;

/// Parses UNTL XML documents into dictionaries in parallel.
///
/// # Errors
///
/// Returns the first parse error encountered.
pub fn parse_xml_batch<S: AsRef<str> + Sync>(documents: &[S]) -> Result<Vec<MetadataDict>> {
    let dicts = documents
        .par_iter()
        .map(|xml| xml_str_to_tree(xml.as_ref(), Schema::Untl).map(|tree| tree_to_dict(&tree)))
        .collect::<Result<Vec<_>>>()?;
    debug!(records = dicts.len(), "parsed XML batch");
    Ok(dicts)
}

/// Projects UNTL dictionaries to Dublin Core XML in parallel.
///
/// # Errors
///
/// Returns the first conversion or serialization error encountered.
pub fn dc_xml_batch(dicts: &[MetadataDict], options: &DcOptions) -> Result<Vec<String>> {
    dicts
        .par_iter()
        .map(|dict| {
            let untl = dict_to_tree(dict, Schema::Untl)?;
            generate_dc_xml(&untl_to_dc_dict(&untl, options)?)
        })
        .collect()
}

/// Computes the version fingerprint of each dictionary in parallel.
///
/// # Errors
///
/// Returns the first hashing error encountered.
pub fn version_batch(dicts: &[MetadataDict], options: &HashOptions) -> Result<Vec<String>> {
    dicts
        .par_iter()
        .map(|dict| version_hash(&hash_dict(dict, options)?))
        .collect()
}

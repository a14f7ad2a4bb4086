//! Shared fixture: the ten-document, ten-term toy index sketched in
//! spec.md §8. Term `v` ("one"=1, "two"=2, ..., "ten"=10) appears in the
//! last `v` documents (docid `10-v..10`) with impact `11-v` — "one" is the
//! rarest term and gets the highest impact, "ten" appears everywhere and
//! gets the lowest.

use std::io::Write;
use std::path::Path;

use saat_search::codec::{gaps_from_docids, group_varint};
use saat_search::index::{DeserialisedIndex, IndexPaths};
use saat_search::primitives::query_buffer::term_cmp;

pub const TERM_NAMES: [&str; 10] =
    ["one", "two", "three", "four", "five", "six", "seven", "eight", "nine", "ten"];

fn leb128(value: u64) -> Vec<u8> {
    let mut bytes = Vec::new();
    let mut v = value;
    loop {
        let mut byte = (v & 0x7f) as u8;
        v >>= 7;
        if v != 0 {
            byte |= 0x80;
        }
        bytes.push(byte);
        if v == 0 {
            break;
        }
    }
    bytes
}

/// Builds the toy index on disk under `dir` and opens it (v2 layout,
/// group-varint codec).
pub fn build_toy_index(dir: &Path) -> DeserialisedIndex {
    let document_count = 10u32;

    let primary_keys_path = dir.join("CIdoclist.bin");
    {
        let mut blob = Vec::new();
        for id in 1..=document_count {
            blob.extend_from_slice(id.to_string().as_bytes());
            blob.push(0);
        }
        blob.extend_from_slice(&(document_count as u64).to_le_bytes());
        std::fs::File::create(&primary_keys_path).unwrap().write_all(&blob).unwrap();
    }

    // Vocabulary must be written in `term_cmp` order so the reader's binary
    // search over it works.
    let mut names: Vec<&str> = TERM_NAMES.to_vec();
    names.sort_by(|a, b| term_cmp(a.as_bytes(), b.as_bytes()));

    let mut postings_body = Vec::new();
    let mut vocab_blob = Vec::new();
    let mut terms_blob = Vec::new();

    for name in names {
        let v = (TERM_NAMES.iter().position(|n| *n == name).unwrap() + 1) as u32;
        let impact = 11 - v;
        let docids: Vec<u32> = ((document_count - v)..document_count).collect();

        let term_offset = terms_blob.len() as u64;
        terms_blob.extend_from_slice(name.as_bytes());
        terms_blob.push(0);

        // One segment per posting (a quantum of size 1), so a budget can
        // cut a term off mid-postings-list exactly as spec.md §8 scenario 3
        // exercises, and so Q3's "first 3 postings" has a well-defined
        // meaning independent of any single real segment's internal size.
        let postings_offset = postings_body.len() as u64;
        for &docid in &docids {
            let encoded = group_varint::encode(&gaps_from_docids(&[docid]));
            postings_body.extend(leb128(impact as u64));
            postings_body.extend(leb128(0)); // relative offset: payload right after the tuple
            postings_body.extend(leb128(encoded.len() as u64));
            postings_body.extend(leb128(1)); // segment_frequency
            postings_body.extend_from_slice(&encoded);
        }

        vocab_blob.extend(leb128(term_offset));
        vocab_blob.extend(leb128(postings_offset));
        vocab_blob.extend(leb128(docids.len() as u64));
    }

    let vocab_path = dir.join("CIvocab.bin");
    std::fs::File::create(&vocab_path).unwrap().write_all(&vocab_blob).unwrap();
    let vocab_terms_path = dir.join("CIvocab_terms.bin");
    std::fs::File::create(&vocab_terms_path).unwrap().write_all(&terms_blob).unwrap();
    let postings_path = dir.join("CIpostings.bin");
    let mut postings_file = vec![b'q'];
    postings_file.extend_from_slice(&postings_body);
    std::fs::File::create(&postings_path).unwrap().write_all(&postings_file).unwrap();

    DeserialisedIndex::open(
        IndexPaths {
            primary_keys: &primary_keys_path,
            vocabulary: &vocab_path,
            vocabulary_terms: &vocab_terms_path,
            postings: &postings_path,
        },
        2,
    )
    .unwrap()
}

/// `impact` for the term named by its ordinal ("one" = 1, ..., "ten" = 10).
pub fn impact_of(v: u32) -> u32 {
    11 - v
}

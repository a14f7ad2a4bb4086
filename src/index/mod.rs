//! C4: impact-ordered index reader. Loads the four on-disk files described
//! in spec.md §4.3/§6 and exposes vocabulary lookup plus segment-header
//! extraction. Immutable after `open`; shared by reference across workers.

pub mod postings;
pub mod primary_keys;
pub mod vocabulary;

use std::fs::File;
use std::path::Path;

use memmap2::{Mmap, MmapOptions};

use crate::codec::{self, IntegerCodec};
use crate::core::config::MAX_DOCUMENT_COUNT;
use crate::core::error::{Error, ErrorKind, Result};
use crate::primitives::query_buffer::term_cmp;

pub use postings::SegmentHeader;
pub use vocabulary::VocabEntry;

/// On-disk layout; selects header encoding and primary-key table format
/// (spec.md §4.3). Not stored in the files — the caller passes it in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndexVersion {
    V1,
    V2,
}

impl IndexVersion {
    pub fn from_u8(version: u8) -> Result<Self> {
        match version {
            1 => Ok(IndexVersion::V1),
            2 => Ok(IndexVersion::V2),
            other => Err(Error::new(
                ErrorKind::BadIndexVersion,
                format!("unsupported index version {}, expected 1 or 2", other),
            )),
        }
    }
}

/// Paths to the four conventional index files (spec.md §6).
pub struct IndexPaths<'a> {
    pub primary_keys: &'a Path,
    pub vocabulary: &'a Path,
    pub vocabulary_terms: &'a Path,
    pub postings: &'a Path,
}

/// The loaded, immutable index. Owns its backing buffers — the postings
/// file is memory-mapped since it dominates total size at full scale (up to
/// 55M documents); the smaller vocabulary and primary-key files are read
/// fully into owned buffers.
pub struct DeserialisedIndex {
    version: IndexVersion,
    primary_key_blob: Vec<u8>,
    primary_key_entries: Vec<(u32, u32)>,
    vocabulary: Vec<VocabEntry>,
    vocab_terms: Vec<u8>,
    postings: Mmap,
    codec: Box<dyn IntegerCodec>,
}

impl DeserialisedIndex {
    pub fn open(paths: IndexPaths, version: u8) -> Result<Self> {
        let version = IndexVersion::from_u8(version)?;

        let primary_key_blob = std::fs::read(paths.primary_keys)?;
        let primary_key_entries = primary_keys::parse(version, &primary_key_blob)?;
        if primary_key_entries.len() as u64 > MAX_DOCUMENT_COUNT {
            return Err(Error::new(
                ErrorKind::TooManyDocuments,
                format!(
                    "index reports {} documents, ceiling is {}",
                    primary_key_entries.len(),
                    MAX_DOCUMENT_COUNT
                ),
            ));
        }

        let vocab_index_blob = std::fs::read(paths.vocabulary)?;
        let vocab_terms = std::fs::read(paths.vocabulary_terms)?;
        let vocabulary = vocabulary::parse(version, &vocab_index_blob, &vocab_terms)?;

        let postings_file = File::open(paths.postings)?;
        let postings = unsafe { MmapOptions::new().map(&postings_file)? };
        if postings.is_empty() {
            return Err(Error::new(
                ErrorKind::Malformed,
                "postings file is empty, missing codec identifier byte",
            ));
        }
        let codec = codec::codec_for_id(postings[0])?;

        log::info!(
            "index loaded: {} documents, {} vocabulary terms, codec {:?}",
            primary_key_entries.len(),
            vocabulary.len(),
            codec.name()
        );

        Ok(DeserialisedIndex {
            version,
            primary_key_blob,
            primary_key_entries,
            vocabulary,
            vocab_terms,
            postings,
            codec,
        })
    }

    pub fn version(&self) -> IndexVersion {
        self.version
    }

    pub fn document_count(&self) -> usize {
        self.primary_key_entries.len()
    }

    /// The primary key (external document id) for `docid`.
    pub fn primary_key(&self, docid: u32) -> &str {
        let (offset, len) = self.primary_key_entries[docid as usize];
        let bytes = &self.primary_key_blob[offset as usize..offset as usize + len as usize];
        std::str::from_utf8(bytes).unwrap_or("")
    }

    pub fn codec(&self) -> &dyn IntegerCodec {
        self.codec.as_ref()
    }

    /// The postings blob after its leading codec-identifier byte — the
    /// coordinate space every stored segment offset is relative to.
    pub fn postings_body(&self) -> &[u8] {
        &self.postings[1..]
    }

    fn term_bytes(&self, entry: &VocabEntry) -> &[u8] {
        let start = entry.term_offset as usize;
        let end = start + entry.term_len as usize;
        &self.vocab_terms[start..end]
    }

    /// Binary search the vocabulary for `term` (spec.md §4.3).
    pub fn postings_details(&self, term: &[u8]) -> Option<&VocabEntry> {
        let idx = self
            .vocabulary
            .binary_search_by(|entry| term_cmp(self.term_bytes(entry), term))
            .ok()?;
        self.vocabulary.get(idx)
    }

    /// Decode every segment header for `term_meta`, with `impact` already
    /// scaled by `query_frequency` (spec.md §4.3).
    pub fn get_segment_list(
        &self,
        term_meta: &VocabEntry,
        query_frequency: u32,
    ) -> Result<(Vec<SegmentHeader>, u32, u32, u64)> {
        postings::get_segment_list(self.version, self.postings_body(), term_meta, query_frequency)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::group_varint;
    use std::io::Write;

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

    /// Builds a tiny v2 index on disk: two terms, "one" (docs [9]) and "ten"
    /// (docs [0..10)), matching the toy index sketched in spec.md §8.
    #[test]
    fn v2_index_round_trips_lookup_and_segment_list() {
        let dir = tempfile::tempdir().unwrap();

        let primary_keys_path = dir.path().join("CIdoclist.bin");
        {
            let mut blob = Vec::new();
            for id in 1..=10u32 {
                blob.extend_from_slice(id.to_string().as_bytes());
                blob.push(0);
            }
            blob.extend_from_slice(&10u64.to_le_bytes());
            std::fs::File::create(&primary_keys_path).unwrap().write_all(&blob).unwrap();
        }

        let postings_path = dir.path().join("CIpostings.bin");
        let mut postings_body = Vec::new();
        let one_docids = group_varint::encode(&crate::codec::gaps_from_docids(&[9]));
        let one_tuple_start = postings_body.len();
        // placeholder, patched after encoding length is known
        let one_header_len_guess = leb128(10).len() + leb128(0).len() + leb128(0).len() + leb128(1).len();
        let _ = one_header_len_guess;
        // impact=10, offset=<relative>, length, freq=1
        let one_payload_offset_field = postings_body.len(); // filled below
        let _ = one_payload_offset_field;

        // Build term "one": header tuple then payload immediately after.
        let header_prefix_len = {
            let mut probe = Vec::new();
            probe.extend(leb128(10));
            probe.extend(leb128(0));
            probe.extend(leb128(one_docids.len() as u64));
            probe.extend(leb128(1));
            probe.len()
        };
        postings_body.extend(leb128(10)); // impact
        postings_body.extend(leb128(0)); // relative offset = 0 (payload right after tuple)
        postings_body.extend(leb128(one_docids.len() as u64)); // length
        postings_body.extend(leb128(1)); // segment_frequency
        assert_eq!(postings_body.len() - one_tuple_start, header_prefix_len);
        postings_body.extend_from_slice(&one_docids);

        let ten_docids = group_varint::encode(&crate::codec::gaps_from_docids(&(0u32..10).collect::<Vec<_>>()));
        postings_body.extend(leb128(1)); // impact
        postings_body.extend(leb128(0)); // relative offset
        postings_body.extend(leb128(ten_docids.len() as u64));
        postings_body.extend(leb128(10)); // segment_frequency
        postings_body.extend_from_slice(&ten_docids);

        let mut postings_file_bytes = vec![b'q']; // QMX JASS v1 codec id
        postings_file_bytes.extend_from_slice(&postings_body);
        std::fs::File::create(&postings_path).unwrap().write_all(&postings_file_bytes).unwrap();

        // vocab terms: "one\0ten\0"
        let vocab_terms_path = dir.path().join("CIvocab_terms.bin");
        let mut terms_blob = Vec::new();
        let one_term_offset = terms_blob.len() as u64;
        terms_blob.extend_from_slice(b"one\0");
        let ten_term_offset = terms_blob.len() as u64;
        terms_blob.extend_from_slice(b"ten\0");
        std::fs::File::create(&vocab_terms_path).unwrap().write_all(&terms_blob).unwrap();

        let vocab_index_path = dir.path().join("CIvocab.bin");
        let one_postings_offset = 0u64;
        let ten_postings_offset = one_tuple_start as u64 + header_prefix_len as u64 + one_docids.len() as u64;
        let mut vocab_blob = Vec::new();
        vocab_blob.extend(leb128(one_term_offset));
        vocab_blob.extend(leb128(one_postings_offset));
        vocab_blob.extend(leb128(1));
        vocab_blob.extend(leb128(ten_term_offset));
        vocab_blob.extend(leb128(ten_postings_offset));
        vocab_blob.extend(leb128(1));
        std::fs::File::create(&vocab_index_path).unwrap().write_all(&vocab_blob).unwrap();

        let index = DeserialisedIndex::open(
            IndexPaths {
                primary_keys: &primary_keys_path,
                vocabulary: &vocab_index_path,
                vocabulary_terms: &vocab_terms_path,
                postings: &postings_path,
            },
            2,
        )
        .unwrap();

        assert_eq!(index.document_count(), 10);
        assert_eq!(index.primary_key(0), "1");
        assert_eq!(index.primary_key(9), "10");

        let one_meta = index.postings_details(b"one").unwrap();
        let (segments, smallest, largest, df) = index.get_segment_list(one_meta, 1).unwrap();
        assert_eq!(segments.len(), 1);
        assert_eq!(segments[0].impact, 10);
        assert_eq!(segments[0].segment_frequency, 1);
        assert_eq!(smallest, 10);
        assert_eq!(largest, 10);
        assert_eq!(df, 1);

        assert!(index.postings_details(b"missing").is_none());
    }
}

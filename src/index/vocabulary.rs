//! Vocabulary index + vocabulary strings parsing (spec.md §4.3).

use crate::core::error::{Error, ErrorKind, Result};
use crate::primitives::byte_reader::ByteReader;

use super::IndexVersion;

/// One parsed vocabulary entry. `postings_offset` is already absolute
/// within the postings blob's body (the bytes after the codec identifier).
#[derive(Debug, Clone, Copy)]
pub struct VocabEntry {
    pub term_offset: u32,
    pub term_len: u32,
    pub postings_offset: u64,
    pub segment_count: u64,
}

const V1_TRIPLE_WIDTH: usize = 24;

pub fn parse(version: IndexVersion, vocab_index: &[u8], vocab_terms: &[u8]) -> Result<Vec<VocabEntry>> {
    let raw = match version {
        IndexVersion::V1 => parse_v1(vocab_index)?,
        IndexVersion::V2 => parse_v2(vocab_index)?,
    };

    let mut entries = Vec::with_capacity(raw.len());
    for (term_offset, postings_offset, segment_count) in raw {
        let term_offset = u32::try_from(term_offset)
            .map_err(|_| Error::new(ErrorKind::Malformed, "vocabulary term offset overflows u32"))?;
        let term_len = find_nul_terminated_len(vocab_terms, term_offset as usize)?;
        entries.push(VocabEntry {
            term_offset,
            term_len,
            postings_offset,
            segment_count,
        });
    }
    Ok(entries)
}

fn find_nul_terminated_len(blob: &[u8], start: usize) -> Result<u32> {
    let tail = blob.get(start..).ok_or_else(|| {
        Error::new(
            ErrorKind::Malformed,
            format!("vocabulary term offset {} is past the end of the terms file", start),
        )
    })?;
    let len = tail
        .iter()
        .position(|&b| b == 0)
        .ok_or_else(|| Error::new(ErrorKind::Malformed, "vocabulary term is not NUL-terminated"))?;
    Ok(len as u32)
}

fn parse_v1(data: &[u8]) -> Result<Vec<(u64, u64, u64)>> {
    if data.len() % V1_TRIPLE_WIDTH != 0 {
        return Err(Error::new(
            ErrorKind::Malformed,
            format!(
                "v1 vocabulary index length {} is not a multiple of {}",
                data.len(),
                V1_TRIPLE_WIDTH
            ),
        ));
    }
    let mut reader = ByteReader::new(data);
    let mut out = Vec::with_capacity(data.len() / V1_TRIPLE_WIDTH);
    while reader.remaining() > 0 {
        let term_offset = reader.read_u64()?;
        let postings_offset = reader.read_u64()?;
        let segment_count = reader.read_u64()?;
        out.push((term_offset, postings_offset, segment_count));
    }
    Ok(out)
}

fn parse_v2(data: &[u8]) -> Result<Vec<(u64, u64, u64)>> {
    let mut reader = ByteReader::new(data);
    let mut out = Vec::new();
    while reader.remaining() > 0 {
        let term_offset = reader.read_varint()?;
        let postings_offset = reader.read_varint()?;
        let segment_count = reader.read_varint()?;
        out.push((term_offset, postings_offset, segment_count));
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn build_v1(terms: &[(&str, u64, u64)]) -> (Vec<u8>, Vec<u8>) {
        let mut terms_blob = Vec::new();
        let mut index_blob = Vec::new();
        for (term, postings_offset, segment_count) in terms {
            let term_offset = terms_blob.len() as u64;
            terms_blob.extend_from_slice(term.as_bytes());
            terms_blob.push(0);
            index_blob.extend_from_slice(&term_offset.to_le_bytes());
            index_blob.extend_from_slice(&postings_offset.to_le_bytes());
            index_blob.extend_from_slice(&segment_count.to_le_bytes());
        }
        (index_blob, terms_blob)
    }

    #[test]
    fn v1_roundtrips_entries_in_order() {
        let terms = [("one", 0u64, 3u64), ("ten", 40u64, 1u64)];
        let (index_blob, terms_blob) = build_v1(&terms);
        let entries = parse(IndexVersion::V1, &index_blob, &terms_blob).unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(&terms_blob[entries[0].term_offset as usize..][..entries[0].term_len as usize], b"one");
        assert_eq!(entries[0].postings_offset, 0);
        assert_eq!(entries[1].segment_count, 1);
    }

    #[test]
    fn v1_rejects_truncated_triples() {
        let err = parse_v1(&[0u8; 10]).unwrap_err();
        assert_eq!(err.kind, ErrorKind::Malformed);
    }

    #[test]
    fn missing_nul_terminator_is_malformed() {
        let terms_blob = b"noterminator".to_vec();
        let mut index_blob = Vec::new();
        index_blob.extend_from_slice(&0u64.to_le_bytes());
        index_blob.extend_from_slice(&0u64.to_le_bytes());
        index_blob.extend_from_slice(&1u64.to_le_bytes());
        let err = parse(IndexVersion::V1, &index_blob, &terms_blob).unwrap_err();
        assert_eq!(err.kind, ErrorKind::Malformed);
    }
}

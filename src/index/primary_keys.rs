//! Primary key file parsing (spec.md §4.3). Both layouts store the document
//! count at a fixed position relative to the end of the file — the literal
//! ordering in spec.md ("blob, then count, then offsets") is unparseable as
//! stated (the count's position can't be located without already knowing
//! the offsets table's length); this follows the original JASS
//! `deserialised_jass_v{1,2}::read_primary_keys`, which stores the count as
//! the trailing 8 bytes of the file in both layouts.

use crate::core::error::{Error, ErrorKind, Result};
use crate::primitives::byte_reader::ByteReader;

use super::IndexVersion;

/// Returns `(offset, len)` pairs into `blob`, one per document, in docid order.
pub fn parse(version: IndexVersion, blob: &[u8]) -> Result<Vec<(u32, u32)>> {
    match version {
        IndexVersion::V1 => parse_v1(blob),
        IndexVersion::V2 => parse_v2(blob),
    }
}

fn parse_v1(blob: &[u8]) -> Result<Vec<(u32, u32)>> {
    if blob.len() < 8 {
        return Err(Error::new(ErrorKind::Malformed, "primary key file shorter than document count field"));
    }
    let count_pos = blob.len() - 8;
    let document_count = ByteReader::at(blob, count_pos).read_u64()?;

    let offsets_bytes = (document_count as usize)
        .checked_mul(8)
        .ok_or_else(|| Error::new(ErrorKind::Malformed, "primary key offset table size overflows"))?;
    let offsets_start = count_pos.checked_sub(offsets_bytes).ok_or_else(|| {
        Error::new(
            ErrorKind::Malformed,
            format!("primary key file too short for {} document offsets", document_count),
        )
    })?;

    let mut reader = ByteReader::at(blob, offsets_start);
    let mut raw_offsets = Vec::with_capacity(document_count as usize);
    for _ in 0..document_count {
        raw_offsets.push(reader.read_u64()? as usize);
    }

    let blob_end = offsets_start;
    let mut entries = Vec::with_capacity(raw_offsets.len());
    for (i, &start) in raw_offsets.iter().enumerate() {
        if start > blob_end {
            return Err(Error::new(
                ErrorKind::Malformed,
                format!("primary key offset {} for document {} exceeds blob bounds", start, i),
            ));
        }
        let end = blob[start..blob_end]
            .iter()
            .position(|&b| b == 0)
            .map(|p| start + p)
            .unwrap_or(blob_end);
        entries.push((start as u32, (end - start) as u32));
    }
    Ok(entries)
}

fn parse_v2(blob: &[u8]) -> Result<Vec<(u32, u32)>> {
    if blob.len() < 8 {
        return Err(Error::new(ErrorKind::Malformed, "primary key file shorter than document count field"));
    }
    let count_pos = blob.len() - 8;
    let document_count = ByteReader::at(blob, count_pos).read_u64()? as usize;

    let strings = &blob[..count_pos];
    let mut entries = Vec::with_capacity(document_count);
    let mut start = 0usize;
    for (i, &byte) in strings.iter().enumerate() {
        if byte == 0 {
            entries.push((start as u32, (i - start) as u32));
            start = i + 1;
        }
    }
    if start < strings.len() {
        entries.push((start as u32, (strings.len() - start) as u32));
    }

    if entries.len() != document_count {
        return Err(Error::new(
            ErrorKind::Malformed,
            format!(
                "primary key file declares {} documents but {} NUL-delimited strings were found",
                document_count,
                entries.len()
            ),
        ));
    }
    Ok(entries)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn build_v1(docs: &[&str]) -> Vec<u8> {
        let mut blob = Vec::new();
        let mut offsets = Vec::new();
        for doc in docs {
            offsets.push(blob.len() as u64);
            blob.extend_from_slice(doc.as_bytes());
        }
        blob.extend_from_slice(&(docs.len() as u64).to_le_bytes());
        for offset in offsets {
            blob.extend_from_slice(&offset.to_le_bytes());
        }
        blob
    }

    fn build_v2(docs: &[&str]) -> Vec<u8> {
        let mut blob = Vec::new();
        for doc in docs {
            blob.extend_from_slice(doc.as_bytes());
            blob.push(0);
        }
        blob.extend_from_slice(&(docs.len() as u64).to_le_bytes());
        blob
    }

    #[test]
    fn v1_roundtrips_primary_keys() {
        let docs = ["1", "2", "3", "doc-four"];
        let blob = build_v1(&docs);
        let entries = parse(IndexVersion::V1, &blob).unwrap();
        assert_eq!(entries.len(), docs.len());
        for (i, doc) in docs.iter().enumerate() {
            let (offset, len) = entries[i];
            assert_eq!(&blob[offset as usize..offset as usize + len as usize], doc.as_bytes());
        }
    }

    #[test]
    fn v2_roundtrips_primary_keys() {
        let docs = ["1", "2", "3", "doc-four"];
        let blob = build_v2(&docs);
        let entries = parse(IndexVersion::V2, &blob).unwrap();
        assert_eq!(entries.len(), docs.len());
        for (i, doc) in docs.iter().enumerate() {
            let (offset, len) = entries[i];
            assert_eq!(&blob[offset as usize..offset as usize + len as usize], doc.as_bytes());
        }
    }

    #[test]
    fn v2_rejects_mismatched_count() {
        let mut blob = build_v2(&["a", "b"]);
        let len = blob.len();
        blob[len - 8..].copy_from_slice(&5u64.to_le_bytes());
        let err = parse(IndexVersion::V2, &blob).unwrap_err();
        assert_eq!(err.kind, ErrorKind::Malformed);
    }
}

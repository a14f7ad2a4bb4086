//! Segment header parsing (spec.md §4.3). `get_segment_list` is the one
//! entry point both layouts funnel through; headers come back already
//! scaled by `query_frequency` and with absolute offsets into the postings
//! body (the bytes after the one-byte codec identifier).

use crate::core::error::{Error, ErrorKind, Result};
use crate::primitives::byte_reader::ByteReader;

use super::vocabulary::VocabEntry;
use super::IndexVersion;

/// One decoded segment (spec.md §3): all documents within it share `impact`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SegmentHeader {
    pub impact: u32,
    pub offset: u64,
    pub end: u64,
    pub segment_frequency: u32,
}

/// Returns `(segments, smallest_impact, largest_impact, document_frequency)`.
pub fn get_segment_list(
    version: IndexVersion,
    postings_body: &[u8],
    term_meta: &VocabEntry,
    query_frequency: u32,
) -> Result<(Vec<SegmentHeader>, u32, u32, u64)> {
    let segments = match version {
        IndexVersion::V1 => decode_v1(postings_body, term_meta, query_frequency)?,
        IndexVersion::V2 => decode_v2(postings_body, term_meta, query_frequency)?,
    };

    if segments.is_empty() {
        return Ok((segments, 0, 0, 0));
    }
    let mut smallest = u32::MAX;
    let mut largest = 0u32;
    let mut document_frequency = 0u64;
    for segment in &segments {
        smallest = smallest.min(segment.impact);
        largest = largest.max(segment.impact);
        document_frequency += segment.segment_frequency as u64;
    }
    Ok((segments, smallest, largest, document_frequency))
}

fn decode_v1(
    postings_body: &[u8],
    term_meta: &VocabEntry,
    query_frequency: u32,
) -> Result<Vec<SegmentHeader>> {
    let mut pointer_reader = ByteReader::at(postings_body, term_meta.postings_offset as usize);
    let mut segments = Vec::with_capacity(term_meta.segment_count as usize);

    for _ in 0..term_meta.segment_count {
        let header_offset = pointer_reader.read_u64()?;
        let mut header_reader = ByteReader::at(postings_body, header_offset as usize);
        let impact = header_reader.read_u16()? as u32;
        let offset = header_reader.read_u64()?;
        let end = header_reader.read_u64()?;
        let segment_frequency = header_reader.read_u32()?;
        segments.push(SegmentHeader {
            impact: impact * query_frequency,
            offset,
            end,
            segment_frequency,
        });
    }
    Ok(segments)
}

fn decode_v2(
    postings_body: &[u8],
    term_meta: &VocabEntry,
    query_frequency: u32,
) -> Result<Vec<SegmentHeader>> {
    let mut reader = ByteReader::at(postings_body, term_meta.postings_offset as usize);
    let mut segments = Vec::with_capacity(term_meta.segment_count as usize);

    for _ in 0..term_meta.segment_count {
        let impact = reader.read_varint()?;
        let relative_offset = reader.read_varint()?;
        let length = reader.read_varint()?;
        let segment_frequency = reader.read_varint()?;

        // v2 offsets are relative to the byte right after this tuple.
        let offset = relative_offset + reader.position() as u64;
        let end = offset + length;

        let impact = u32::try_from(impact)
            .map_err(|_| Error::new(ErrorKind::Malformed, "v2 segment impact overflows u32"))?;
        let segment_frequency = u32::try_from(segment_frequency)
            .map_err(|_| Error::new(ErrorKind::Malformed, "v2 segment frequency overflows u32"))?;

        segments.push(SegmentHeader {
            impact: impact * query_frequency,
            offset,
            end,
            segment_frequency,
        });
    }
    Ok(segments)
}

//! C2: integer codec interface. A codec turns a byte-compressed d1-gap
//! sequence (spec.md §4.1) back into `u32` docid gaps; the reader recognises
//! exactly two codecs, selected by the one-byte identifier at the start of
//! the postings file.

pub mod group_varint;
pub mod none;

use crate::core::error::{Error, ErrorKind, Result};

/// Receives decoded, already-cumulative-summed docids during the fused
/// decode/process path. Implemented by the accumulator engine (C5).
pub trait PostingSink {
    fn add_with_impact(&mut self, docid: u32, impact: u32);
}

/// A pluggable integer codec (spec.md §4.1). Implementations must be
/// referentially transparent: `decode` never mutates `source`.
pub trait IntegerCodec: Send + Sync {
    /// The one-byte identifier stored in the postings file header.
    fn id(&self) -> u8;

    fn name(&self) -> &'static str;

    /// Decode exactly `count` gap-encoded `u32`s from `source` into the
    /// first `count` slots of `destination`. Callers guarantee
    /// `destination.len() >= count + SCRATCH_SLACK`.
    fn decode(&self, destination: &mut [u32], count: usize, source: &[u8]) -> Result<()>;

    /// Decode, cumulative-sum, and push each resulting docid into `sink`
    /// with the segment's `impact`. `scratch` must have length `>= count`.
    /// The default implementation composes `decode` with
    /// `cumulative_sum_from_gaps`; a codec may override this only to fuse
    /// the two steps for throughput — the observable result is identical.
    fn decode_and_process(
        &self,
        impact: u32,
        count: usize,
        source: &[u8],
        scratch: &mut [u32],
        sink: &mut dyn PostingSink,
    ) -> Result<()> {
        self.decode(scratch, count, source)?;
        cumulative_sum_from_gaps(&mut scratch[..count]);
        for &docid in &scratch[..count] {
            sink.add_with_impact(docid, impact);
        }
        Ok(())
    }
}

/// Extra destination slots callers must provide beyond `count` — some
/// codecs (none of ours, but the interface must allow it) write past the
/// logical end during decode.
pub const SCRATCH_SLACK: usize = 1024;

/// ASCII identifier bytes stored in the postings file (spec.md §4.1).
pub const CODEC_ID_NONE: u8 = b's';
pub const CODEC_ID_GROUP_VARINT: u8 = b'q';

/// Resolve the postings file's codec identifier byte to an implementation.
/// An unrecognised byte is a fatal load error (`UnknownCodec`).
pub fn codec_for_id(id: u8) -> Result<Box<dyn IntegerCodec>> {
    match id {
        CODEC_ID_NONE => Ok(Box::new(none::NoneCodec)),
        CODEC_ID_GROUP_VARINT => Ok(Box::new(group_varint::GroupVarintCodec)),
        other => Err(Error::new(
            ErrorKind::UnknownCodec,
            format!("unrecognised codec identifier byte {:#04x} ({:?})", other, other as char),
        )),
    }
}

/// Apply d1-gap cumulative sum in place: `gaps[0]` is already an absolute
/// docid (spec.md §4.1); every subsequent element is a delta from its
/// predecessor's *absolute* value.
pub fn cumulative_sum_from_gaps(gaps: &mut [u32]) {
    for i in 1..gaps.len() {
        gaps[i] = gaps[i - 1].wrapping_add(gaps[i]);
    }
}

/// Inverse of `cumulative_sum_from_gaps`, used only to build test/bench
/// fixtures (index *construction* is out of scope for the library proper).
pub fn gaps_from_docids(docids: &[u32]) -> Vec<u32> {
    if docids.is_empty() {
        return Vec::new();
    }
    let mut gaps = Vec::with_capacity(docids.len());
    gaps.push(docids[0]);
    for i in 1..docids.len() {
        gaps.push(docids[i].wrapping_sub(docids[i - 1]));
    }
    gaps
}

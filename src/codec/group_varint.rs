//! The "QMX JASS v1" codec (identifier byte `'q'`): a byte-aligned,
//! SIMD-friendly group-varint scheme. Values are packed four at a time;
//! each group is prefixed by one selector byte whose four 2-bit fields give
//! the encoded byte-width (1-4) of the corresponding value, followed by the
//! values themselves packed back-to-back at their minimal little-endian
//! width. An incomplete trailing group is padded with zero values up to a
//! multiple of four and decoded using the segment's known `count`.
//!
//! This is a self-consistent group-varint design, not a reimplementation of
//! the SIMD QMX bit layout (real QMX, and bit-for-bit compatibility with
//! other JASS implementations, are both out of scope per spec.md §6). It
//! satisfies the same roundtrip contract any `IntegerCodec` must.

use crate::core::error::{Error, ErrorKind, Result};

use super::IntegerCodec;

const GROUP_SIZE: usize = 4;

fn width_of(value: u32) -> u8 {
    if value <= 0xFF {
        1
    } else if value <= 0xFFFF {
        2
    } else if value <= 0xFF_FFFF {
        3
    } else {
        4
    }
}

/// Encode `values` (not part of the `IntegerCodec` trait — encoding is only
/// needed to build test/bench fixtures, index construction being out of
/// scope for the library itself).
pub fn encode(values: &[u32]) -> Vec<u8> {
    let mut out = Vec::with_capacity(values.len() * 2);
    for chunk in values.chunks(GROUP_SIZE) {
        let mut selector = 0u8;
        for (slot, &value) in chunk.iter().enumerate() {
            let width = width_of(value);
            selector |= (width - 1) << (slot * 2);
        }
        out.push(selector);
        for &value in chunk {
            let width = width_of(value) as usize;
            let bytes = value.to_le_bytes();
            out.extend_from_slice(&bytes[..width]);
        }
    }
    out
}

pub struct GroupVarintCodec;

impl IntegerCodec for GroupVarintCodec {
    fn id(&self) -> u8 {
        super::CODEC_ID_GROUP_VARINT
    }

    fn name(&self) -> &'static str {
        "QMX JASS v1"
    }

    fn decode(&self, destination: &mut [u32], count: usize, source: &[u8]) -> Result<()> {
        let mut pos = 0usize;
        let mut written = 0usize;

        while written < count {
            let selector = *source.get(pos).ok_or_else(|| {
                Error::new(
                    ErrorKind::Malformed,
                    "QMX JASS v1: truncated source, missing selector byte",
                )
            })?;
            pos += 1;

            let remaining_in_group = (count - written).min(GROUP_SIZE);
            for slot in 0..remaining_in_group {
                let width = ((selector >> (slot * 2)) & 0b11) as usize + 1;
                let slice = source.get(pos..pos + width).ok_or_else(|| {
                    Error::new(
                        ErrorKind::Malformed,
                        format!("QMX JASS v1: truncated source at offset {}", pos),
                    )
                })?;
                let mut bytes = [0u8; 4];
                bytes[..width].copy_from_slice(slice);
                destination[written] = u32::from_le_bytes(bytes);
                pos += width;
                written += 1;
            }
        }
        Ok(())
    }
}

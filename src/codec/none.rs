//! The "None" codec (identifier byte `'s'`): docid gaps are stored as raw
//! little-endian `u32`s with no compression at all. Used as a baseline and
//! as the fallback when an index is built without a compressor.

use crate::core::error::{Error, ErrorKind, Result};

use super::IntegerCodec;

pub struct NoneCodec;

impl IntegerCodec for NoneCodec {
    fn id(&self) -> u8 {
        super::CODEC_ID_NONE
    }

    fn name(&self) -> &'static str {
        "None"
    }

    fn decode(&self, destination: &mut [u32], count: usize, source: &[u8]) -> Result<()> {
        let needed = count * 4;
        if source.len() < needed {
            return Err(Error::new(
                ErrorKind::Malformed,
                format!(
                    "None codec: need {} bytes for {} values, got {}",
                    needed,
                    count,
                    source.len()
                ),
            ));
        }
        for i in 0..count {
            let bytes = [
                source[i * 4],
                source[i * 4 + 1],
                source[i * 4 + 2],
                source[i * 4 + 3],
            ];
            destination[i] = u32::from_le_bytes(bytes);
        }
        Ok(())
    }
}

//! C1: primitive support shared by the codec, index reader, and query
//! parser — a byte-level cursor for little-endian file formats, a bump
//! arena for per-query scratch allocation, and the fixed-capacity parsed
//! query buffer.

pub mod arena;
pub mod byte_reader;
pub mod query_buffer;

pub use arena::TermArena;
pub use byte_reader::ByteReader;
pub use query_buffer::{ParsedQuery, TermEntry, MAX_QUERY_TERMS};

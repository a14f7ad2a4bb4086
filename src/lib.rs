//! An anytime, impact-ordered Score-at-a-Time (SaaT) search engine.
//!
//! Given a precomputed-impact inverted index (`index`), a query is
//! tokenised (`query`), its per-term impact segments are assembled and
//! processed highest-impact-first by the accumulator/top-k engine
//! (`engine`) under a postings budget (`processor`), optionally across a
//! pool of worker threads (`pool`), and emitted in TREC run format
//! (`collector`).

pub mod codec;
pub mod collector;
pub mod core;
pub mod engine;
pub mod index;
pub mod oracle;
pub mod pool;
pub mod primitives;
pub mod processor;
pub mod query;

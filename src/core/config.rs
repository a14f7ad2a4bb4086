use std::path::PathBuf;

use crate::core::error::{Error, ErrorKind, Result};
use crate::query::ParserMode;

/// Hard ceilings enforced by `Config::validate` (spec.md §6/§7).
pub const MAX_TOP_K: usize = 1000;
pub const MAX_ACCUMULATOR_WIDTH: u8 = 32;
pub const MAX_DOCUMENT_COUNT: u64 = 55_000_000;

/// How many postings the processor is allowed to touch before it must stop.
///
/// Mirrors the mutually-exclusive `--postings-to-process` /
/// `--postings-to-process-proportion` CLI flags of spec.md §6.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PostingsBudget {
    /// No limit; process every collected segment.
    Unlimited,
    /// An absolute number of postings.
    Absolute(u64),
    /// A fraction (0.0..=1.0, though not clamped) of `total_postings` for the query.
    Proportion(f32),
}

impl Default for PostingsBudget {
    fn default() -> Self {
        PostingsBudget::Unlimited
    }
}

/// Which accumulator/top-k policy (spec.md §4.4) a worker should instantiate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineKind {
    /// Policy A: dense accumulator array + min-heap.
    DenseHeap,
    /// Policy B: per-page dirty-max table + min-heap.
    DirtyPage,
    /// Policy C: impact-bucketed ring buffers.
    Bucket,
}

impl Default for EngineKind {
    fn default() -> Self {
        EngineKind::DenseHeap
    }
}

/// Engine-wide configuration. Field-for-field, this corresponds to the CLI
/// surface documented in spec.md §6 — a driver program need only parse
/// arguments into one of these.
#[derive(Debug, Clone)]
pub struct Config {
    /// On-disk index layout: 1 or 2.
    pub index_version: u8,
    /// Maximum number of ranked results returned per query.
    pub top_k: usize,
    /// Work budget for the SaaT processor.
    pub postings_budget: PostingsBudget,
    /// Oracle early-exit threshold (`postings_to_process_min`); 0 disables
    /// the early-exit check regardless of the oracle table.
    pub postings_to_process_min: u64,
    /// Accumulator width in bits (1..=32); default 16.
    pub accumulator_width: u8,
    /// Query tokenisation mode.
    pub parser_mode: ParserMode,
    /// Optional path to a query-id → rsv-threshold oracle file.
    pub oracle_path: Option<PathBuf>,
    /// Number of worker threads.
    pub threads: usize,
    /// Accumulator/top-k policy.
    pub engine: EngineKind,
    /// Caller-supplied tag emitted in the TREC run format (spec.md §4.7).
    pub tag: String,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            index_version: 2,
            top_k: 10,
            postings_budget: PostingsBudget::Unlimited,
            postings_to_process_min: 0,
            accumulator_width: 16,
            parser_mode: ParserMode::Query,
            oracle_path: None,
            threads: 1,
            engine: EngineKind::DenseHeap,
            tag: "saat-search".to_string(),
        }
    }
}

impl Config {
    /// Validate limits from spec.md §7 (`TooLarge`, `BadIndexVersion`).
    /// Called by the index loader and by anyone constructing a worker pool
    /// directly from a hand-built `Config`.
    pub fn validate(&self) -> Result<()> {
        if self.index_version != 1 && self.index_version != 2 {
            return Err(Error::new(
                ErrorKind::BadIndexVersion,
                format!("unsupported index version {}", self.index_version),
            ));
        }
        if self.top_k > MAX_TOP_K {
            return Err(Error::new(
                ErrorKind::TooLarge,
                format!("top_k {} exceeds maximum {}", self.top_k, MAX_TOP_K),
            ));
        }
        if self.accumulator_width == 0 || self.accumulator_width > MAX_ACCUMULATOR_WIDTH {
            return Err(Error::new(
                ErrorKind::TooLarge,
                format!(
                    "accumulator_width {} outside 1..={}",
                    self.accumulator_width, MAX_ACCUMULATOR_WIDTH
                ),
            ));
        }
        Ok(())
    }

    /// `MAX_RSV = 2^width - 1`, saturating so a 32-bit width doesn't overflow.
    pub fn max_rsv(&self) -> u32 {
        if self.accumulator_width >= 32 {
            u32::MAX
        } else {
            (1u32 << self.accumulator_width) - 1
        }
    }
}

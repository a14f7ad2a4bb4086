//! C5: accumulator / top-k engine. Three interchangeable policies share
//! the same external contract (spec.md §4.4); the SaaT processor (C6)
//! selects one per `Config::engine` and drives it only through this trait.

pub mod bucket;
pub mod dense_heap;
pub mod dirty_page;
mod heap;

use crate::codec::PostingSink;

/// One finalised top-k hit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScoredDoc {
    pub docid: u32,
    pub score: u32,
}

/// Common contract implemented by all three accumulator/top-k policies
/// (spec.md §4.4). A single instance is owned by one worker and reused,
/// never reallocated, across every query that worker processes.
pub trait AccumulatorEngine: PostingSink {
    /// `&mut self` viewed through its `PostingSink` supertrait. A boxed
    /// `dyn AccumulatorEngine` can't be passed where `&mut dyn PostingSink`
    /// is expected (the codec's `decode_and_process`) without this: each
    /// concrete engine returns `self`, which coerces trivially since the
    /// concrete type is known at the impl site.
    fn as_sink(&mut self) -> &mut dyn PostingSink;

    /// Allocate per-worker storage. Called once, before any query.
    fn init(&mut self, document_count: usize, top_k: usize, accumulator_width: u8, page_width: usize);

    /// Prepare for a new query: every accumulator logically reads zero and
    /// the top-k structure is empty. `largest_possible_rsv` bounds the
    /// range any accumulator can reach this query, after rescaling
    /// (spec.md §4.5 step 4).
    fn rewind(&mut self, smallest_possible_rsv: u32, largest_possible_rsv: u32);

    /// At least `top_k` distinct documents have a nonzero accumulator this
    /// query. Drives the processor's oracle early-exit check (spec.md §4.5
    /// step 10); the base JASS query classes expose this as `size()` — no
    /// filtered source file in this corpus shows its body, so here it is a
    /// plain counter of first-touch docids, common to all three policies.
    fn is_full(&self) -> bool;

    /// Fill any remaining top-k slots from the current accumulator state.
    /// A no-op in every policy implemented here: Policy A's heap is
    /// already complete by construction at all times, and Policies B/C
    /// only ever build their ranking lazily inside `sort`, which always
    /// scans the full touched state regardless of why segment processing
    /// stopped.
    fn top_up(&mut self) {}

    /// Finalise the top-k ordering: descending score, ties broken by
    /// descending docid (spec.md §4.4).
    fn sort(&mut self);

    /// Valid only after `sort`.
    fn results(&self) -> &[ScoredDoc];
}

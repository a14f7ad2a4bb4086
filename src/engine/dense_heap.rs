//! Policy A: one `u32` accumulator per document plus a min-heap that is
//! kept correct on every `add_with_impact` call (spec.md §4.4). Simplest of
//! the three policies and the natural choice when `top_k` is small relative
//! to postings volume, since every touch does O(log top_k) heap work.

use super::heap::{HeapKey, ScoreHeap};
use super::{AccumulatorEngine, ScoredDoc};
use crate::codec::PostingSink;

#[derive(Default)]
pub struct DenseHeapEngine {
    accumulators: Vec<u32>,
    page_generation: Vec<u32>,
    current_generation: u32,
    page_width: usize,
    top_k: usize,
    heap: ScoreHeap,
    distinct_touched: u64,
    results: Vec<ScoredDoc>,
}

impl DenseHeapEngine {
    /// Clear `docid`'s page if it hasn't been touched yet this query — the
    /// lazy-rewind trick that makes `rewind` itself O(1) (spec.md §4.4).
    fn touch_page(&mut self, docid: u32) {
        let page = docid as usize / self.page_width;
        if self.page_generation[page] != self.current_generation {
            let start = page * self.page_width;
            let end = (start + self.page_width).min(self.accumulators.len());
            for slot in &mut self.accumulators[start..end] {
                *slot = 0;
            }
            self.page_generation[page] = self.current_generation;
        }
    }
}

impl PostingSink for DenseHeapEngine {
    fn add_with_impact(&mut self, docid: u32, impact: u32) {
        self.touch_page(docid);

        let prior = self.accumulators[docid as usize];
        if prior == 0 {
            self.distinct_touched += 1;
        }
        let updated = prior.saturating_add(impact);
        self.accumulators[docid as usize] = updated;

        let key = HeapKey { score: updated, docid };
        if let Some(idx) = self.heap.find(docid) {
            self.heap.update_key(idx, updated);
        } else if !self.heap.is_full() {
            self.heap.push(key);
        } else if let Some(root) = self.heap.root() {
            if key > root {
                self.heap.replace_root(key);
            }
        }
    }
}

impl AccumulatorEngine for DenseHeapEngine {
    fn as_sink(&mut self) -> &mut dyn PostingSink {
        self
    }

    fn init(&mut self, document_count: usize, top_k: usize, _accumulator_width: u8, page_width: usize) {
        let page_width = page_width.max(1);
        let page_count = document_count.div_ceil(page_width);
        self.accumulators = vec![0; document_count];
        self.page_generation = vec![0; page_count];
        self.current_generation = 0;
        self.page_width = page_width;
        self.top_k = top_k;
        self.heap = ScoreHeap::with_capacity(top_k);
        self.distinct_touched = 0;
        self.results = Vec::with_capacity(top_k);
    }

    fn rewind(&mut self, _smallest_possible_rsv: u32, _largest_possible_rsv: u32) {
        self.current_generation = self.current_generation.wrapping_add(1);
        self.heap.clear();
        self.distinct_touched = 0;
        self.results.clear();
    }

    fn is_full(&self) -> bool {
        self.distinct_touched >= self.top_k as u64
    }

    fn sort(&mut self) {
        self.results = self
            .heap
            .sorted_descending()
            .into_iter()
            .map(|key| ScoredDoc { docid: key.docid, score: key.score })
            .collect();
    }

    fn results(&self) -> &[ScoredDoc] {
        &self.results
    }
}

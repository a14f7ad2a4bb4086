//! Policy B: a dense accumulator array plus a per-page running maximum.
//! `add_with_impact` never touches a heap — it is pure array writes. The
//! top-k ranking is reconstructed lazily in `sort`, walking pages in
//! descending order of their maximum and stopping as soon as no remaining
//! page can possibly beat the current top-k (spec.md §4.4, grounded on
//! `query_maxblock_heap.h`'s `page_maximum` design).

use super::heap::{HeapKey, ScoreHeap};
use super::{AccumulatorEngine, ScoredDoc};
use crate::codec::PostingSink;

#[derive(Default)]
pub struct DirtyPageEngine {
    accumulators: Vec<u32>,
    page_generation: Vec<u32>,
    page_maximum: Vec<u32>,
    touched_pages: Vec<usize>,
    current_generation: u32,
    page_width: usize,
    document_count: usize,
    top_k: usize,
    distinct_touched: u64,
    results: Vec<ScoredDoc>,
}

impl DirtyPageEngine {
    fn touch_page(&mut self, page: usize) {
        if self.page_generation[page] != self.current_generation {
            let start = page * self.page_width;
            let end = (start + self.page_width).min(self.document_count);
            for slot in &mut self.accumulators[start..end] {
                *slot = 0;
            }
            self.page_maximum[page] = 0;
            self.page_generation[page] = self.current_generation;
            self.touched_pages.push(page);
        }
    }
}

impl PostingSink for DirtyPageEngine {
    fn add_with_impact(&mut self, docid: u32, impact: u32) {
        let page = docid as usize / self.page_width;
        self.touch_page(page);

        let prior = self.accumulators[docid as usize];
        if prior == 0 {
            self.distinct_touched += 1;
        }
        let updated = prior.saturating_add(impact);
        self.accumulators[docid as usize] = updated;
        if updated > self.page_maximum[page] {
            self.page_maximum[page] = updated;
        }
    }
}

impl AccumulatorEngine for DirtyPageEngine {
    fn as_sink(&mut self) -> &mut dyn PostingSink {
        self
    }

    fn init(&mut self, document_count: usize, top_k: usize, _accumulator_width: u8, page_width: usize) {
        let page_width = page_width.max(1);
        let page_count = document_count.div_ceil(page_width);
        self.accumulators = vec![0; document_count];
        self.page_generation = vec![0; page_count];
        self.page_maximum = vec![0; page_count];
        self.touched_pages = Vec::new();
        self.current_generation = 0;
        self.page_width = page_width;
        self.document_count = document_count;
        self.top_k = top_k;
        self.distinct_touched = 0;
        self.results = Vec::with_capacity(top_k);
    }

    fn rewind(&mut self, _smallest_possible_rsv: u32, _largest_possible_rsv: u32) {
        self.current_generation = self.current_generation.wrapping_add(1);
        self.touched_pages.clear();
        self.distinct_touched = 0;
        self.results.clear();
    }

    fn is_full(&self) -> bool {
        self.distinct_touched >= self.top_k as u64
    }

    fn sort(&mut self) {
        let mut pages = std::mem::take(&mut self.touched_pages);
        pages.sort_unstable_by_key(|&page| std::cmp::Reverse(self.page_maximum[page]));

        let mut heap = ScoreHeap::with_capacity(self.top_k);
        for page in &pages {
            let page = *page;
            if heap.is_full() {
                if let Some(root) = heap.root() {
                    if self.page_maximum[page] < root.score {
                        break;
                    }
                }
            }

            let start = page * self.page_width;
            let end = (start + self.page_width).min(self.document_count);
            for docid in start..end {
                let score = self.accumulators[docid];
                if score == 0 {
                    continue;
                }
                let key = HeapKey { score, docid: docid as u32 };
                if !heap.is_full() {
                    heap.push(key);
                } else if let Some(root) = heap.root() {
                    if key > root {
                        heap.replace_root(key);
                    }
                }
            }
        }
        self.touched_pages = pages;

        self.results = heap
            .sorted_descending()
            .into_iter()
            .map(|key| ScoredDoc { docid: key.docid, score: key.score })
            .collect();
    }

    fn results(&self) -> &[ScoredDoc] {
        &self.results
    }
}

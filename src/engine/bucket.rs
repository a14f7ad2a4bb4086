//! Policy C: documents are filed into impact-value buckets as they're
//! touched, each bucket a small fixed-depth ring buffer of docids
//! (spec.md §4.4, grounded on `query_bucket.h`). `add_with_impact` only
//! ever writes a ring slot and bumps the dense accumulator; `sort` walks
//! buckets from the highest value down, re-checking each ring entry
//! against the live accumulator to discard ones a later, higher touch
//! made stale.
//!
//! Bucket count is capped at 65536 regardless of `accumulator_width`
//! (spec.md's accumulator-width ceiling is 32 bits, but a full 2^32-entry
//! bucket table is not a reasonable in-memory structure); values above the
//! cap collapse into the top bucket, so this policy's practical precision
//! tops out at 16 bits.

use super::heap::{HeapKey, ScoreHeap};
use super::{AccumulatorEngine, ScoredDoc};
use crate::codec::PostingSink;

const MAX_BUCKETS: usize = 1 << 16;

#[derive(Default)]
pub struct BucketEngine {
    accumulators: Vec<u32>,
    page_generation: Vec<u32>,
    page_width: usize,
    document_count: usize,

    buckets: Vec<Vec<u32>>,
    bucket_write_count: Vec<u32>,
    bucket_generation: Vec<u32>,
    touched_buckets: Vec<usize>,
    ring_depth: usize,
    num_buckets: usize,

    current_generation: u32,
    top_k: usize,
    distinct_touched: u64,
    results: Vec<ScoredDoc>,
}

impl BucketEngine {
    fn touch_page(&mut self, page: usize) {
        if self.page_generation[page] != self.current_generation {
            let start = page * self.page_width;
            let end = (start + self.page_width).min(self.document_count);
            for slot in &mut self.accumulators[start..end] {
                *slot = 0;
            }
            self.page_generation[page] = self.current_generation;
        }
    }

    fn touch_bucket(&mut self, bucket: usize) {
        if self.bucket_generation[bucket] != self.current_generation {
            self.bucket_write_count[bucket] = 0;
            self.bucket_generation[bucket] = self.current_generation;
            self.touched_buckets.push(bucket);
        }
    }

    /// The value `docid` currently, truly holds this query — zero if its
    /// page hasn't been touched yet this generation, regardless of what
    /// garbage is still sitting in the dense array from a prior query.
    fn live_value(&self, docid: u32) -> u32 {
        let page = docid as usize / self.page_width;
        if self.page_generation[page] == self.current_generation {
            self.accumulators[docid as usize]
        } else {
            0
        }
    }
}

impl PostingSink for BucketEngine {
    fn add_with_impact(&mut self, docid: u32, impact: u32) {
        let page = docid as usize / self.page_width;
        self.touch_page(page);

        let prior = self.accumulators[docid as usize];
        if prior == 0 {
            self.distinct_touched += 1;
        }
        let updated = prior.saturating_add(impact).min(self.num_buckets as u32 - 1);
        self.accumulators[docid as usize] = updated;

        let bucket = updated as usize;
        self.touch_bucket(bucket);
        let depth = self.ring_depth;
        let slot = (self.bucket_write_count[bucket] as usize) % depth;
        self.buckets[bucket][slot] = docid;
        self.bucket_write_count[bucket] += 1;
    }
}

impl AccumulatorEngine for BucketEngine {
    fn as_sink(&mut self) -> &mut dyn PostingSink {
        self
    }

    fn init(&mut self, document_count: usize, top_k: usize, accumulator_width: u8, page_width: usize) {
        let page_width = page_width.max(1);
        let page_count = document_count.div_ceil(page_width);
        self.accumulators = vec![0; document_count];
        self.page_generation = vec![0; page_count];
        self.page_width = page_width;
        self.document_count = document_count;

        // One bucket per representable accumulator value, capped at 65536
        // regardless of `accumulator_width` (see module docs).
        let representable: u64 = if accumulator_width >= 32 {
            1u64 << 32
        } else {
            1u64 << accumulator_width
        };
        let num_buckets = representable.min(MAX_BUCKETS as u64).max(1) as usize;
        self.num_buckets = num_buckets;
        self.ring_depth = top_k.max(1).next_power_of_two();
        self.buckets = vec![vec![0; self.ring_depth]; num_buckets];
        self.bucket_write_count = vec![0; num_buckets];
        self.bucket_generation = vec![0; num_buckets];
        self.touched_buckets = Vec::new();

        self.current_generation = 0;
        self.top_k = top_k;
        self.distinct_touched = 0;
        self.results = Vec::with_capacity(top_k);
    }

    fn rewind(&mut self, _smallest_possible_rsv: u32, largest_possible_rsv: u32) {
        self.current_generation = self.current_generation.wrapping_add(1);
        self.touched_buckets.clear();
        self.distinct_touched = 0;
        self.results.clear();
        let _ = largest_possible_rsv; // bucket count is fixed at init, not per-query
    }

    fn is_full(&self) -> bool {
        self.distinct_touched >= self.top_k as u64
    }

    fn sort(&mut self) {
        let mut buckets = std::mem::take(&mut self.touched_buckets);
        buckets.sort_unstable_by(|a, b| b.cmp(a));

        let mut heap = ScoreHeap::with_capacity(self.top_k);
        for bucket in &buckets {
            let bucket = *bucket;
            if heap.is_full() {
                if let Some(root) = heap.root() {
                    if (bucket as u32) < root.score {
                        break;
                    }
                }
            }

            let count = (self.bucket_write_count[bucket] as usize).min(self.ring_depth);
            for slot in 0..count {
                let docid = self.buckets[bucket][slot];
                if self.live_value(docid) != bucket as u32 {
                    continue; // stale: a later touch moved this docid to another bucket
                }
                let key = HeapKey { score: bucket as u32, docid };
                if !heap.is_full() {
                    heap.push(key);
                } else if let Some(root) = heap.root() {
                    if key > root {
                        heap.replace_root(key);
                    }
                }
            }
        }
        self.touched_buckets = buckets;

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

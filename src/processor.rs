//! C6: Score-at-a-Time query processor. Runs the thirteen-step pipeline of
//! spec.md §4.5, gluing the query parser (C3), index reader (C4), and
//! accumulator/top-k engine (C5) together for one query at a time. One
//! instance is owned per worker thread and reused across every query that
//! worker claims.

use crate::codec::PostingSink;
use crate::core::config::{Config, EngineKind, PostingsBudget};
use crate::engine::bucket::BucketEngine;
use crate::engine::dense_heap::DenseHeapEngine;
use crate::engine::dirty_page::DirtyPageEngine;
use crate::engine::{AccumulatorEngine, ScoredDoc};
use crate::index::{DeserialisedIndex, SegmentHeader};
use crate::oracle::Oracle;
use crate::primitives::TermArena;
use crate::query;

/// `⌈√document_count⌉` rounded up to a power of two (spec.md §4.4).
pub fn default_page_width(document_count: usize) -> usize {
    let root = (document_count as f64).sqrt().ceil() as usize;
    root.max(1).next_power_of_two()
}

/// The outcome of processing one query.
#[derive(Debug, Clone)]
pub struct ProcessedQuery {
    pub query_id: String,
    pub hits: Vec<ScoredDoc>,
    pub postings_processed: u64,
}

/// Split `text` on the first run of `{space, tab, colon}` (spec.md §4.5
/// step 1): everything before is the query id, everything after the run is
/// the search text.
fn split_query_id(text: &str) -> (&str, &str) {
    let is_delim = |c: char| c == ' ' || c == '\t' || c == ':';
    match text.find(is_delim) {
        None => (text, ""),
        Some(start) => {
            let rest = &text[start..];
            let search_start = rest.find(|c: char| !is_delim(c)).map(|n| start + n).unwrap_or(text.len());
            (&text[..start], &text[search_start..])
        }
    }
}

fn build_engine(kind: EngineKind) -> Box<dyn AccumulatorEngine> {
    match kind {
        EngineKind::DenseHeap => Box::new(DenseHeapEngine::default()),
        EngineKind::DirtyPage => Box::new(DirtyPageEngine::default()),
        EngineKind::Bucket => Box::new(BucketEngine::default()),
    }
}

/// Owns everything one worker needs across its lifetime: the selected
/// accumulator/top-k engine, the parser arena, and the decode scratch
/// buffer. None of these are reallocated per query (spec.md §5).
pub struct QueryProcessor {
    engine: Box<dyn AccumulatorEngine>,
    arena: TermArena,
    scratch: Vec<u32>,
    config: Config,
}

impl QueryProcessor {
    pub fn new(config: Config, document_count: usize) -> Self {
        let mut engine = build_engine(config.engine);
        let page_width = default_page_width(document_count);
        engine.init(document_count, config.top_k, config.accumulator_width, page_width);
        QueryProcessor {
            engine,
            arena: TermArena::new(),
            scratch: vec![0; document_count + crate::codec::SCRATCH_SLACK],
            config,
        }
    }

    /// Run the full thirteen-step pipeline for one query line.
    pub fn process(&mut self, query_text: &str, index: &DeserialisedIndex, oracle: &Oracle) -> ProcessedQuery {
        let (query_id, search_text) = split_query_id(query_text);
        let query_id = query_id.to_string();

        self.arena.rewind();
        let parsed = query::tokenize(self.config.parser_mode, search_text, &mut self.arena);

        let mut segments: Vec<SegmentHeader> = Vec::new();
        let mut largest_possible_rsv: u64 = 0;
        let mut smallest_possible_rsv: u32 = u32::MAX;
        let mut total_postings: u64 = 0;

        for term in &parsed.terms {
            let term_bytes = self.arena.get(term.term);
            let Some(meta) = index.postings_details(term_bytes) else {
                continue;
            };
            let Ok((term_segments, smallest, largest, _document_frequency)) =
                index.get_segment_list(meta, term.query_frequency)
            else {
                continue; // malformed vocabulary entry: skip this term only
            };
            if term_segments.is_empty() {
                continue;
            }
            largest_possible_rsv += largest as u64;
            smallest_possible_rsv = smallest_possible_rsv.min(smallest);
            for segment in &term_segments {
                total_postings += segment.segment_frequency as u64;
            }
            segments.extend(term_segments);
        }

        if segments.is_empty() {
            self.engine.rewind(0, 0);
            self.engine.sort();
            return ProcessedQuery { query_id, hits: Vec::new(), postings_processed: 0 };
        }

        // Step 4: rescale if the accumulator can't hold the worst case.
        let max_rsv = self.config.max_rsv() as u64;
        let scale = if largest_possible_rsv > max_rsv {
            let scale = max_rsv as f64 / largest_possible_rsv as f64;
            smallest_possible_rsv = ((smallest_possible_rsv as f64 * scale).floor() as u32).max(1);
            largest_possible_rsv = max_rsv;
            Some(scale)
        } else {
            None
        };

        // Step 5.
        let rsv_at_k = oracle.rsv_at_k(&query_id);

        // Step 6: descending impact, ties broken by ascending segment_frequency.
        segments.sort_by(|a, b| b.impact.cmp(&a.impact).then_with(|| a.segment_frequency.cmp(&b.segment_frequency)));
        // Step 7 (sentinel) is implicit: the loop below simply ends when the
        // vector is exhausted, which is what the sentinel header achieves
        // in an unbounded C-style scan.

        // Step 8.
        self.engine.rewind(smallest_possible_rsv, largest_possible_rsv as u32);

        // Step 9.
        let budget = match self.config.postings_budget {
            PostingsBudget::Unlimited => u64::MAX,
            PostingsBudget::Absolute(n) => n,
            PostingsBudget::Proportion(fraction) => (total_postings as f64 * fraction as f64) as u64,
        };

        // Step 10.
        let mut postings_processed: u64 = 0;
        let postings_body = index.postings_body();
        for segment in &segments {
            // A zero budget never processes anything; otherwise the first
            // segment is processed unconditionally even if it overshoots —
            // every later segment is skipped if it would (spec.md §8: "one
            // segment may tip over the budget only if it is the first one").
            if budget == 0 {
                break;
            }
            if postings_processed > 0 && postings_processed + segment.segment_frequency as u64 > budget {
                log::debug!(
                    "{}: budget exhausted after {} of {} collected postings",
                    query_id,
                    postings_processed,
                    total_postings
                );
                break;
            }

            let impact = match scale {
                Some(scale) => ((segment.impact as f64) * scale) as u32,
                None => segment.impact,
            };
            let count = segment.segment_frequency as usize;
            let start = segment.offset as usize;
            let end = segment.end as usize;
            let Some(source) = postings_body.get(start..end) else {
                continue; // malformed segment: treated as segment_frequency == 0
            };

            if index
                .codec()
                .decode_and_process(impact, count, source, &mut self.scratch, self.engine.as_sink())
                .is_err()
            {
                continue; // malformed segment, processing continues
            }
            postings_processed += segment.segment_frequency as u64;

            if rsv_at_k > 1 && self.engine.is_full() && postings_processed >= self.config.postings_to_process_min {
                log::debug!("{}: oracle early exit after {} postings", query_id, postings_processed);
                break;
            }
        }

        // Step 11.
        if rsv_at_k > 1 && !self.engine.is_full() {
            self.engine.top_up();
        }

        // Step 12.
        self.engine.sort();

        ProcessedQuery { query_id, hits: self.engine.results().to_vec(), postings_processed }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_query_id_on_space_tab_or_colon() {
        assert_eq!(split_query_id("Q1 one two"), ("Q1", "one two"));
        assert_eq!(split_query_id("Q1\tone"), ("Q1", "one"));
        assert_eq!(split_query_id("Q1:one"), ("Q1", "one"));
        assert_eq!(split_query_id("Q1   one"), ("Q1", "one"));
        assert_eq!(split_query_id("Q1"), ("Q1", ""));
    }

    #[test]
    fn default_page_width_is_a_power_of_two_covering_the_square_root() {
        assert_eq!(default_page_width(1), 1);
        assert_eq!(default_page_width(10), 4); // ceil(sqrt(10)) = 4, already a power of two
        assert_eq!(default_page_width(50), 8); // ceil(sqrt(50)) = 8
        assert_eq!(default_page_width(17), 8); // ceil(sqrt(17)) = 5 -> next_power_of_two = 8
    }
}

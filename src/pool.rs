//! C7: worker pool. A thread-safe work queue of queries; each worker
//! repeatedly CAS-claims the next query and drives it through the
//! processor (C6) to completion (spec.md §4.6). Workers borrow the shared,
//! immutable index and oracle table for the scope's lifetime.

use std::sync::atomic::{AtomicBool, Ordering};

use crate::collector::{QueryResult, TrecFormatter};
use crate::core::config::Config;
use crate::index::DeserialisedIndex;
use crate::oracle::Oracle;
use crate::processor::QueryProcessor;

/// One query awaiting a worker. `claimed` starts false; a worker CAS-flips
/// it true before processing.
pub struct Query {
    claimed: AtomicBool,
    text: String,
}

impl Query {
    pub fn new(text: impl Into<String>) -> Self {
        Query { claimed: AtomicBool::new(false), text: text.into() }
    }
}

/// Sweep `queries` forward from `*cursor`, CAS-claiming the first
/// unclaimed one. A spurious CAS failure is retried on the same slot
/// before advancing (spec.md §4.6); a full sweep with nothing claimable
/// returns `None`.
pub fn next_query<'a>(queries: &'a [Query], cursor: &mut usize) -> Option<&'a str> {
    while *cursor < queries.len() {
        let slot = &queries[*cursor];
        match slot.claimed.compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst) {
            Ok(_) => return Some(slot.text.as_str()),
            Err(already_claimed) => {
                if already_claimed {
                    *cursor += 1;
                }
                // else: spurious failure, retry the same slot.
            }
        }
    }
    None
}

/// Run `queries` to completion across `config.threads` worker threads,
/// each owning one `QueryProcessor`. Returns one `QueryResult` per query,
/// in per-thread claim order (spec.md §5: overall order across threads is
/// unspecified).
pub fn run(queries: &[Query], index: &DeserialisedIndex, oracle: &Oracle, config: Config) -> Vec<QueryResult> {
    let thread_count = config.threads.max(1);
    let formatter = TrecFormatter::new(config.tag.clone());
    let document_count = index.document_count();

    log::info!("worker pool starting: {} threads, {} queries queued", thread_count, queries.len());

    crossbeam::thread::scope(|scope| {
        let handles: Vec<_> = (0..thread_count)
            .map(|worker_id| {
                let config = config.clone();
                let formatter = &formatter;
                scope.spawn(move |_| {
                    let mut processor = QueryProcessor::new(config, document_count);
                    let mut results = Vec::new();
                    // Every thread sweeps the whole queue from the front; the
                    // CAS on each `Query::claimed` flag is what guarantees
                    // each query is processed by exactly one thread.
                    let mut cursor = 0usize;
                    while let Some(text) = next_query(queries, &mut cursor) {
                        let start = std::time::Instant::now();
                        let outcome = processor.process(text, index, oracle);
                        let elapsed_nanos = start.elapsed().as_nanos();
                        let lines = formatter.format(&outcome.query_id, &outcome.hits, index);
                        results.push(QueryResult {
                            query_id: outcome.query_id,
                            query_text: text.to_string(),
                            lines,
                            postings_processed: outcome.postings_processed,
                            elapsed_nanos,
                        });
                    }
                    log::debug!("worker {} claimed {} queries", worker_id, results.len());
                    results
                })
            })
            .collect();

        let collected: Vec<_> =
            handles.into_iter().flat_map(|h| h.join().expect("worker thread panicked")).collect();
        log::info!("worker pool finished: {} queries processed", collected.len());
        collected
    })
    .expect("worker scope panicked")
}

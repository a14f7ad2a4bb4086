//! C8: result collector. Renders a finished query's top-k into TREC run
//! format (spec.md §4.7) and records the per-query timing and postings-
//! processed counters the caller needs for evaluation.

use crate::engine::ScoredDoc;
use crate::index::DeserialisedIndex;

/// One query's complete, formatted outcome.
#[derive(Debug, Clone)]
pub struct QueryResult {
    pub query_id: String,
    pub query_text: String,
    pub lines: Vec<String>,
    pub postings_processed: u64,
    pub elapsed_nanos: u128,
}

/// Measures wall-clock time from just before parsing to just after `sort`
/// (spec.md §4.7) and renders hits as they come in.
pub struct TrecFormatter {
    tag: String,
}

impl TrecFormatter {
    pub fn new(tag: impl Into<String>) -> Self {
        TrecFormatter { tag: tag.into() }
    }

    /// Render `hits` (already sorted, descending score) as TREC run lines:
    /// `<query_id> Q0 <primary_key> <rank> <score> <tag>`.
    pub fn format(&self, query_id: &str, hits: &[ScoredDoc], index: &DeserialisedIndex) -> Vec<String> {
        hits.iter()
            .enumerate()
            .map(|(i, hit)| {
                format!(
                    "{} Q0 {} {} {} {}",
                    query_id,
                    index.primary_key(hit.docid),
                    i + 1,
                    hit.score,
                    self.tag
                )
            })
            .collect()
    }
}

//! Oracle table: an optional, immutable `query-id -> rsv_at_k` lookup
//! (spec.md §4.5 step 5, §6). Used by the processor to decide how
//! aggressively to early-exit a query once the top-k is full.

use std::collections::HashMap;
use std::path::Path;

use crate::core::error::Result;

/// Predicted minimum score needed to enter the top-k, per query id.
/// Missing entries default to 1 (spec.md §4.5 step 5).
#[derive(Debug, Clone, Default)]
pub struct Oracle {
    thresholds: HashMap<String, u32>,
}

impl Oracle {
    pub fn empty() -> Self {
        Oracle { thresholds: HashMap::new() }
    }

    /// Parse a plain-text oracle file: one `<query-id> <threshold>` pair per
    /// line (spec.md §6). Blank lines are skipped; malformed lines are
    /// logged and skipped rather than aborting the whole load, since a bad
    /// oracle line is not a reason to fail an otherwise-successful index load.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        let mut thresholds = HashMap::new();
        for (lineno, line) in text.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            let mut parts = line.split_whitespace();
            let (Some(query_id), Some(threshold_text)) = (parts.next(), parts.next()) else {
                log::warn!("oracle file {}: line {} has too few fields, skipping", path.display(), lineno + 1);
                continue;
            };
            match threshold_text.parse::<u32>() {
                Ok(threshold) => {
                    thresholds.insert(query_id.to_string(), threshold);
                }
                Err(_) => {
                    log::warn!(
                        "oracle file {}: line {} has a non-integer threshold {:?}, skipping",
                        path.display(),
                        lineno + 1,
                        threshold_text
                    );
                }
            }
        }
        Ok(Oracle { thresholds })
    }

    /// `rsv_at_k` for `query_id`, clamped to at least 1 (spec.md §4.5 step 5).
    pub fn rsv_at_k(&self, query_id: &str) -> u32 {
        self.thresholds.get(query_id).copied().unwrap_or(1).max(1)
    }
}

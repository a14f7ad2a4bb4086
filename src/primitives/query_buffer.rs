use std::cmp::Ordering;

use super::arena::ArenaSlice;

/// Fixed capacity from spec.md §3 ("Parsed query: a fixed-capacity sequence
/// (cap 4,096 unique tokens)"). Overflow silently truncates (spec.md §4.2).
pub const MAX_QUERY_TERMS: usize = 4096;

/// One deduplicated query term and how many times it occurred in the query.
#[derive(Debug, Clone, Copy)]
pub struct TermEntry {
    pub term: ArenaSlice,
    pub query_frequency: u32,
}

/// The sorted, deduplicated, capacity-bounded term list produced by the
/// query parser (C3). Term bytes live in a caller-supplied `TermArena`.
#[derive(Debug, Clone, Default)]
pub struct ParsedQuery {
    pub terms: Vec<TermEntry>,
}

impl ParsedQuery {
    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    pub fn len(&self) -> usize {
        self.terms.len()
    }
}

/// Vocabulary total order from spec.md §3: shorter string is less; on equal
/// length, lexicographic by unsigned bytes. Binary search over the
/// vocabulary, and sorting of the parsed-query buffer, both use this order.
pub fn term_cmp(a: &[u8], b: &[u8]) -> Ordering {
    match a.len().cmp(&b.len()) {
        Ordering::Equal => a.cmp(b),
        other => other,
    }
}

/// Sort `raw` (arena-slice, frequency=1 occurrences) by `term_cmp` and merge
/// adjacent duplicates, summing their frequencies. Truncates to
/// `MAX_QUERY_TERMS` *before* sorting, matching "tokens are appended... up
/// to 4,096 tokens per query; overflow silently truncates" in spec.md §4.2 —
/// truncation happens as tokens arrive, sorting/dedup happens after.
pub fn finalize(arena: &super::arena::TermArena, mut raw: Vec<ArenaSlice>) -> ParsedQuery {
    raw.truncate(MAX_QUERY_TERMS);
    raw.sort_by(|a, b| term_cmp(arena.get(*a), arena.get(*b)));

    let mut terms: Vec<TermEntry> = Vec::with_capacity(raw.len());
    for slice in raw {
        if let Some(last) = terms.last_mut() {
            if arena.get(last.term) == arena.get(slice) {
                last.query_frequency += 1;
                continue;
            }
        }
        terms.push(TermEntry {
            term: slice,
            query_frequency: 1,
        });
    }
    ParsedQuery { terms }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::primitives::arena::TermArena;

    #[test]
    fn term_cmp_orders_by_length_then_bytes() {
        assert_eq!(term_cmp(b"a", b"bb"), Ordering::Less);
        assert_eq!(term_cmp(b"zz", b"aa"), Ordering::Greater);
        assert_eq!(term_cmp(b"cat", b"cat"), Ordering::Equal);
        assert_eq!(term_cmp(b"cat", b"cab"), Ordering::Greater);
    }

    #[test]
    fn finalize_sorts_and_merges_duplicates() {
        let mut arena = TermArena::new();
        let raw = vec![
            arena.push(b"ten"),
            arena.push(b"one"),
            arena.push(b"ten"),
            arena.push(b"a"),
        ];
        let parsed = finalize(&arena, raw);
        let rendered: Vec<(&[u8], u32)> = parsed
            .terms
            .iter()
            .map(|e| (arena.get(e.term), e.query_frequency))
            .collect();
        assert_eq!(rendered, vec![(b"a".as_slice(), 1), (b"one".as_slice(), 1), (b"ten".as_slice(), 2)]);
    }

    #[test]
    fn finalize_truncates_to_capacity() {
        let mut arena = TermArena::new();
        let raw: Vec<ArenaSlice> = (0..MAX_QUERY_TERMS + 10)
            .map(|i| arena.push(i.to_string().as_bytes()))
            .collect();
        let parsed = finalize(&arena, raw);
        assert!(parsed.len() <= MAX_QUERY_TERMS);
    }
}

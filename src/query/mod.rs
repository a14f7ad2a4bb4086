//! C3: query parser. Tokenises a query's search text into a deduplicated,
//! sorted `ParsedQuery`, per spec.md §4.2.

mod fold;

use crate::primitives::arena::{ArenaSlice, TermArena};
use crate::primitives::query_buffer::{finalize, ParsedQuery, MAX_QUERY_TERMS};

/// Which tokenisation mode a query set uses (spec.md §4.2, CLI `--parser`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParserMode {
    /// Unicode-aware: case-folds, splits alphabetic runs from numeric runs.
    Query,
    /// Whitespace-delimited tokens, no normalisation.
    Raw,
}

/// Tokenise `text` into `arena`, returning the sorted, deduplicated term
/// list. `arena` should be rewound by the caller between queries.
pub fn tokenize(mode: ParserMode, text: &str, arena: &mut TermArena) -> ParsedQuery {
    let raw = match mode {
        ParserMode::Query => tokenize_query_mode(text, arena),
        ParserMode::Raw => tokenize_raw_mode(text, arena),
    };
    finalize(arena, raw)
}

fn tokenize_query_mode(text: &str, arena: &mut TermArena) -> Vec<ArenaSlice> {
    let mut tokens = Vec::new();
    let mut chars = text.chars().peekable();
    let mut scratch = String::new();

    while let Some(&c) = chars.peek() {
        if !c.is_alphabetic() && !c.is_numeric() {
            chars.next();
            continue;
        }

        let is_alpha = c.is_alphabetic();
        scratch.clear();
        while let Some(&c) = chars.peek() {
            if is_alpha && c.is_alphabetic() {
                fold::fold_into(c, &mut scratch);
                chars.next();
            } else if !is_alpha && c.is_numeric() {
                fold::fold_into(c, &mut scratch);
                chars.next();
            } else {
                break;
            }
        }

        if tokens.len() >= MAX_QUERY_TERMS {
            continue;
        }
        if !scratch.is_empty() {
            tokens.push(arena.push(scratch.as_bytes()));
        }
    }

    tokens
}

fn tokenize_raw_mode(text: &str, arena: &mut TermArena) -> Vec<ArenaSlice> {
    let mut tokens = Vec::new();
    for word in text.split_whitespace() {
        if tokens.len() >= MAX_QUERY_TERMS {
            break;
        }
        tokens.push(arena.push(word.as_bytes()));
    }
    tokens
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render(parsed: &ParsedQuery, arena: &TermArena) -> Vec<(String, u32)> {
        parsed
            .terms
            .iter()
            .map(|e| {
                (
                    String::from_utf8(arena.get(e.term).to_vec()).unwrap(),
                    e.query_frequency,
                )
            })
            .collect()
    }

    #[test]
    fn query_mode_splits_alpha_and_numeric_runs() {
        let mut arena = TermArena::new();
        let parsed = tokenize(ParserMode::Query, "rust2024 Rocks!", &mut arena);
        assert_eq!(
            render(&parsed, &arena),
            vec![
                ("2024".to_string(), 1),
                ("rocks".to_string(), 1),
                ("rust".to_string(), 1),
            ]
        );
    }

    #[test]
    fn query_mode_case_folds() {
        let mut arena = TermArena::new();
        let parsed = tokenize(ParserMode::Query, "RUST Rust rust", &mut arena);
        assert_eq!(render(&parsed, &arena), vec![("rust".to_string(), 3)]);
    }

    #[test]
    fn raw_mode_preserves_case_and_splits_on_whitespace() {
        let mut arena = TermArena::new();
        let parsed = tokenize(ParserMode::Raw, "Rust\tProgramming  Language", &mut arena);
        assert_eq!(
            render(&parsed, &arena),
            vec![
                ("Language".to_string(), 1),
                ("Programming".to_string(), 1),
                ("Rust".to_string(), 1),
            ]
        );
    }

    #[test]
    fn overflow_truncates_silently() {
        let mut arena = TermArena::new();
        let mut text = String::new();
        for i in 0..MAX_QUERY_TERMS + 50 {
            text.push_str(&format!("w{} ", i));
        }
        let parsed = tokenize(ParserMode::Query, &text, &mut arena);
        assert!(parsed.len() <= MAX_QUERY_TERMS);
    }

    #[test]
    fn vulgar_fraction_folds_to_multiple_digits() {
        let mut arena = TermArena::new();
        let parsed = tokenize(ParserMode::Query, "½", &mut arena);
        assert_eq!(render(&parsed, &arena), vec![("1⁄2".to_string(), 1)]);
    }
}

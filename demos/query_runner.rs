//! Minimal end-to-end driver: load an index, run a query file through the
//! worker pool, print TREC run lines. Argument parsing here is deliberately
//! unceremonious — CLI parsing is out of scope for the library (spec.md
//! §1) and a real deployment would plug in `clap` or similar around
//! `Config`, whose fields mirror the flags in spec.md §6 one-to-one.

use saat_search::core::config::Config;
use saat_search::index::{DeserialisedIndex, IndexPaths};
use saat_search::oracle::Oracle;
use saat_search::pool::{self, Query};

fn usage() -> ! {
    eprintln!("usage: query_runner <index-dir> <index-version: 1|2> <query-file> [oracle-file]");
    std::process::exit(3);
}

fn main() {
    env_logger::init();

    let mut args = std::env::args().skip(1);
    let index_dir = args.next().unwrap_or_else(|| usage());
    let version: u8 = args.next().unwrap_or_else(|| usage()).parse().unwrap_or_else(|_| usage());
    let query_file = args.next().unwrap_or_else(|| usage());
    let oracle_file = args.next();

    let index_dir = std::path::PathBuf::from(index_dir);
    let primary_keys = index_dir.join("CIdoclist.bin");
    let vocabulary = index_dir.join("CIvocab.bin");
    let vocabulary_terms = index_dir.join("CIvocab_terms.bin");
    let postings = index_dir.join("CIpostings.bin");

    let index = match DeserialisedIndex::open(
        IndexPaths { primary_keys: &primary_keys, vocabulary: &vocabulary, vocabulary_terms: &vocabulary_terms, postings: &postings },
        version,
    ) {
        Ok(index) => index,
        Err(err) => {
            log::error!("index load failed: {err}");
            std::process::exit(1);
        }
    };
    log::info!("loaded index: {} documents", index.document_count());

    let oracle = match oracle_file {
        Some(path) => match Oracle::load(std::path::Path::new(&path)) {
            Ok(oracle) => oracle,
            Err(err) => {
                log::error!("oracle load failed: {err}");
                std::process::exit(1);
            }
        },
        None => Oracle::empty(),
    };

    let query_text = match std::fs::read_to_string(&query_file) {
        Ok(text) => text,
        Err(err) => {
            log::error!("query file read failed: {err}");
            std::process::exit(2);
        }
    };
    let queries: Vec<Query> = query_text.lines().filter(|line| !line.trim().is_empty()).map(Query::new).collect();
    log::info!("running {} queries", queries.len());

    let config = Config::default();
    let mut results = pool::run(&queries, &index, &oracle, config);
    results.sort_by(|a, b| a.query_id.cmp(&b.query_id));

    for result in &results {
        log::debug!("{} processed {} postings in {}ns", result.query_id, result.postings_processed, result.elapsed_nanos);
        for line in &result.lines {
            println!("{line}");
        }
    }
}

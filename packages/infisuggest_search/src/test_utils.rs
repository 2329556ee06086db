use std::sync::Arc;

use infisuggest_common::index::MemoryIndex;
use infisuggest_common::tokenize::{AnalyzerRef, PerFieldAnalyzer};
use infisuggest_lang_ascii::ascii::Tokenizer;
use infisuggest_lang_ascii::reverse::ReverseFilter;
use infisuggest_lang_ascii::shingle::{ShingleFilter, ShingleOptions};
use infisuggest_lang_ascii::synonym::SynonymFilter;

use crate::candidate::{Candidate, Provenance};

pub const SUMMITS: [&str; 14] = [
    "mont blanc",
    "mont blanc",
    "mont blanc",
    "mont blanc du tacul",
    "mont blaac",
    "mont dolent",
    "aiguille de triolet",
    "aiguille de triolet",
    "aiguille verte",
    "aiguilles rouges",
    "piz bernina",
    "piz palu",
    "dent blanche",
    "grand combin",
];

/// Number of words in `SUMMITS`
pub const BODY_TERM_COUNT: u64 = 32;

pub struct Fixture {
    pub index: MemoryIndex,
    pub analyzers: PerFieldAnalyzer,
}

/// Indexes `SUMMITS` into a plain field `body`, its reversed form `body_reverse`
/// and its 1 to 3 word shingles `body_ngram`.
///
/// The `synonyms` analyzer maps `piz` onto `piz` and `bernina`, the `empty` field has no documents.
pub fn summit_fixture() -> Fixture {
    let tokenizer: AnalyzerRef = Arc::new(Tokenizer::default());
    let analyzers = PerFieldAnalyzer::new(tokenizer.clone())
        .with_field("body", tokenizer.clone())
        .with_field("body_reverse", Arc::new(ReverseFilter::new(tokenizer.clone())))
        .with_field("body_ngram", Arc::new(ShingleFilter::new(tokenizer.clone(), ShingleOptions::default())))
        .with_field("synonyms", Arc::new(SynonymFilter::new(tokenizer, &["piz => piz, bernina"])));

    let mut index = MemoryIndex::new();
    for summit in SUMMITS.iter() {
        for field in &["body", "body_reverse", "body_ngram"] {
            index.add_field_text(field, analyzers.get(field), summit);
        }
    }
    index.add_field("empty");

    Fixture { index, analyzers }
}

/// The user's own term with the given frequency.
pub fn candidate(term: &str, frequency: u64) -> Candidate {
    Candidate {
        term: term.to_owned(),
        frequency,
        string_distance: 1.0,
        score: 0.0,
        provenance: Provenance::UserInput,
    }
}

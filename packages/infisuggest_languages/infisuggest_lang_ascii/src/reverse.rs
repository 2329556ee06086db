use infisuggest_common::tokenize::{Analyzer, AnalyzerRef, Token};

/// Reverses the characters of every term, for fields used to correct the start of words.
pub struct ReverseFilter {
    inner: AnalyzerRef,
}

impl ReverseFilter {
    pub fn new(inner: AnalyzerRef) -> Self {
        ReverseFilter { inner }
    }
}

impl Analyzer for ReverseFilter {
    fn analyze(&self, text: &str) -> Vec<Token> {
        self.inner
            .analyze(text)
            .into_iter()
            .map(|token| Token {
                term: token.term.chars().rev().collect(),
                ..token
            })
            .collect()
    }
}

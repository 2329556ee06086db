use regex::Regex;
use rustc_hash::FxHashMap;

use infisuggest_common::tokenize::{Analyzer, AnalyzerRef, Token, TokenKind};

lazy_static! {
    static ref MAPPING_ARROW: Regex = Regex::new(r"\s*=>\s*").unwrap();
    static ref TERM_SEPARATOR: Regex = Regex::new(r"\s*,\s*").unwrap();
}

fn split_terms(rule_part: &str) -> Vec<String> {
    TERM_SEPARATOR
        .split(rule_part.trim())
        .filter(|term| !term.is_empty())
        .map(|term| term.to_lowercase())
        .collect()
}

fn push_unique(outputs: &mut Vec<String>, term: &str) {
    if !outputs.iter().any(|output| output == term) {
        outputs.push(term.to_owned());
    }
}

/// Expands single-term synonyms written in the Solr rule format.
///
/// `a, b, c` makes the terms equivalent, while `a => b, c` replaces `a` with `b` and `c`.
/// The first output keeps the position of the input token and the remaining outputs
/// are stacked onto it as synonym tokens.
pub struct SynonymFilter {
    inner: AnalyzerRef,
    mappings: FxHashMap<String, Vec<String>>,
}

impl SynonymFilter {
    pub fn new<S: AsRef<str>>(inner: AnalyzerRef, rules: &[S]) -> Self {
        let mut mappings: FxHashMap<String, Vec<String>> = FxHashMap::default();

        for rule in rules {
            let rule = rule.as_ref().trim();
            if rule.is_empty() || rule.starts_with('#') {
                continue;
            }

            let parts: Vec<&str> = MAPPING_ARROW.splitn(rule, 2).collect();
            if parts.len() == 2 {
                let outputs = split_terms(parts[1]);
                if outputs.is_empty() {
                    continue;
                }

                for input in split_terms(parts[0]) {
                    let existing = mappings.entry(input).or_default();
                    for output in outputs.iter() {
                        push_unique(existing, output);
                    }
                }
            } else {
                let terms = split_terms(rule);
                for input in terms.iter() {
                    let existing = mappings.entry(input.clone()).or_default();
                    push_unique(existing, input);
                    for output in terms.iter() {
                        push_unique(existing, output);
                    }
                }
            }
        }

        SynonymFilter { inner, mappings }
    }
}

impl Analyzer for SynonymFilter {
    fn analyze(&self, text: &str) -> Vec<Token> {
        let mut output = Vec::new();

        for token in self.inner.analyze(text) {
            match self.mappings.get(&token.term) {
                Some(synonyms) => {
                    for (idx, synonym) in synonyms.iter().enumerate() {
                        let is_input = *synonym == token.term;
                        output.push(Token {
                            term: synonym.clone(),
                            start_offset: token.start_offset,
                            end_offset: token.end_offset,
                            position_increment: if idx == 0 { token.position_increment } else { 0 },
                            kind: if idx == 0 && is_input { token.kind } else { TokenKind::Synonym },
                        });
                    }
                }
                None => output.push(token),
            }
        }

        output
    }
}

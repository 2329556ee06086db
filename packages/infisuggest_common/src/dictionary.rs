use std::collections::BTreeMap;
use std::ops::Bound::{Included, Unbounded};

use rustc_hash::FxHashSet;
use smartstring::alias::String as SmartString;

use crate::stats::{FuzzyTerm, TermFrequency};

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct TermInfo {
    pub doc_freq: u64,
    pub total_freq: u64,
}

impl From<TermInfo> for TermFrequency {
    fn from(term_info: TermInfo) -> Self {
        TermFrequency {
            doc_freq: term_info.doc_freq,
            total_freq: term_info.total_freq,
        }
    }
}

/// Sorted term dictionary of a single field.
#[derive(Default)]
pub struct Dictionary {
    pub term_infos: BTreeMap<SmartString, TermInfo>,
    pub num_docs: u64,
    pub sum_total_term_freq: u64,
}

impl Dictionary {
    /// Adds the terms of one document. Documents without terms are not counted.
    pub fn add_document<'t, I>(&mut self, terms: I)
    where
        I: IntoIterator<Item = &'t str>,
    {
        let mut seen: FxHashSet<&str> = FxHashSet::default();

        for term in terms {
            let term_info = self.term_infos.entry(SmartString::from(term)).or_default();
            term_info.total_freq += 1;
            if seen.insert(term) {
                term_info.doc_freq += 1;
            }
            self.sum_total_term_freq += 1;
        }

        if !seen.is_empty() {
            self.num_docs += 1;
        }
    }

    pub fn get(&self, term: &str) -> Option<&TermInfo> {
        self.term_infos.get(term)
    }

    pub fn num_terms(&self) -> u64 {
        self.term_infos.len() as u64
    }

    pub fn is_empty(&self) -> bool {
        self.term_infos.is_empty()
    }

    /// Terms within `max_edits` optimal string alignment edits of `term`,
    /// sharing its first `prefix_length` characters.
    ///
    /// Only the prefix range of the tree is walked, and terms whose length
    /// differs by more than `max_edits` are skipped before measuring.
    pub fn fuzzy_terms<'a>(
        &'a self,
        term: &str,
        max_edits: u32,
        prefix_length: usize,
        min_doc_freq: u64,
    ) -> impl Iterator<Item = FuzzyTerm> + 'a {
        let term = term.to_owned();
        let term_char_count = term.chars().count();
        let prefix: SmartString = term.chars().take(prefix_length).collect();
        let max_edits = max_edits as usize;

        self.term_infos
            .range((Included(prefix.clone()), Unbounded))
            .take_while(move |(dict_term, _)| dict_term.starts_with(prefix.as_str()))
            .filter(move |(dict_term, term_info)| {
                term_info.doc_freq >= min_doc_freq
                    && dict_term.chars().count().abs_diff(term_char_count) <= max_edits
            })
            .filter_map(move |(dict_term, term_info)| {
                let edits = strsim::osa_distance(dict_term, &term);
                if edits <= max_edits {
                    Some(FuzzyTerm {
                        term: dict_term.to_string(),
                        edits: edits as u32,
                        frequency: TermFrequency::from(*term_info),
                    })
                } else {
                    None
                }
            })
    }
}

#[cfg(test)]
mod test {
    use pretty_assertions::assert_eq;

    use super::{Dictionary, TermInfo};

    fn summit_dictionary() -> Dictionary {
        let mut dictionary = Dictionary::default();
        dictionary.add_document(vec!["mont", "blanc", "mont", "blanc"]);
        dictionary.add_document(vec!["mont", "blanc"]);
        dictionary.add_document(vec!["mont", "blaac"]);
        dictionary.add_document(vec!["dent", "blanche"]);
        dictionary.add_document(Vec::new());
        dictionary
    }

    #[test]
    fn test_frequencies() {
        let dictionary = summit_dictionary();

        assert_eq!(dictionary.num_docs, 4);
        assert_eq!(dictionary.sum_total_term_freq, 10);
        assert_eq!(dictionary.num_terms(), 5);
        assert_eq!(dictionary.get("mont"), Some(&TermInfo { doc_freq: 3, total_freq: 4 }));
        assert_eq!(dictionary.get("blanche"), Some(&TermInfo { doc_freq: 1, total_freq: 1 }));
        assert_eq!(dictionary.get("piz"), None);
    }

    fn fuzzy(dictionary: &Dictionary, term: &str, max_edits: u32, prefix_length: usize) -> Vec<(String, u32)> {
        dictionary
            .fuzzy_terms(term, max_edits, prefix_length, 0)
            .map(|fuzzy_term| (fuzzy_term.term, fuzzy_term.edits))
            .collect()
    }

    #[test]
    fn test_fuzzy_terms() {
        let dictionary = summit_dictionary();

        assert_eq!(
            fuzzy(&dictionary, "blanc", 1, 1),
            vec![("blaac".to_owned(), 1), ("blanc".to_owned(), 0)],
        );
        assert_eq!(
            fuzzy(&dictionary, "blanc", 2, 1),
            vec![("blaac".to_owned(), 1), ("blanc".to_owned(), 0), ("blanche".to_owned(), 2)],
        );

        // Transpositions count as a single edit
        assert_eq!(fuzzy(&dictionary, "mnot", 1, 1), vec![("mont".to_owned(), 1)]);

        // The prefix must match exactly
        assert_eq!(fuzzy(&dictionary, "vlanc", 1, 1), Vec::<(String, u32)>::new());
        assert_eq!(fuzzy(&dictionary, "vlanc", 1, 0), vec![("blanc".to_owned(), 1)]);
    }

    #[test]
    fn test_fuzzy_terms_min_doc_freq() {
        let dictionary = summit_dictionary();

        let terms: Vec<String> = dictionary
            .fuzzy_terms("blanc", 1, 1, 2)
            .map(|fuzzy_term| fuzzy_term.term)
            .collect();
        assert_eq!(terms, vec!["blanc".to_owned()]);
    }
}

use rustc_hash::FxHashMap;

use crate::dictionary::Dictionary;
use crate::stats::{
    FieldStats, FuzzyQuery, FuzzyTermIter, StatsError, StatsResult, TermFrequency, TermStatistics,
};
use crate::tokenize::Analyzer;

/// An in-memory inverted index holding only term statistics, one dictionary per field.
#[derive(Default)]
pub struct MemoryIndex {
    fields: FxHashMap<String, Dictionary>,
}

impl MemoryIndex {
    pub fn new() -> Self {
        MemoryIndex::default()
    }

    /// Registers a field so that it is known even before any text is added.
    pub fn add_field(&mut self, field: &str) -> &mut Dictionary {
        self.fields.entry(field.to_owned()).or_default()
    }

    /// Indexes one document's value of `field`.
    pub fn add_field_text(&mut self, field: &str, analyzer: &dyn Analyzer, text: &str) {
        let tokens = analyzer.analyze(text);
        self.add_field(field)
            .add_document(tokens.iter().map(|token| token.term.as_str()));
    }

    pub fn dictionary(&self, field: &str) -> StatsResult<&Dictionary> {
        self.fields
            .get(field)
            .ok_or_else(|| StatsError::UnknownField(field.to_owned()))
    }
}

impl TermStatistics for MemoryIndex {
    fn field_stats(&self, field: &str) -> StatsResult<FieldStats> {
        let dictionary = self.dictionary(field)?;
        Ok(FieldStats {
            num_docs: dictionary.num_docs,
            sum_total_term_freq: dictionary.sum_total_term_freq,
            num_terms: dictionary.num_terms(),
        })
    }

    fn term_frequency(&self, field: &str, term: &str) -> StatsResult<TermFrequency> {
        Ok(self
            .dictionary(field)?
            .get(term)
            .map(|term_info| TermFrequency::from(*term_info))
            .unwrap_or_default())
    }

    fn terms_within_edit_distance<'a>(
        &'a self,
        field: &str,
        query: &FuzzyQuery<'_>,
    ) -> StatsResult<FuzzyTermIter<'a>> {
        let dictionary = self.dictionary(field)?;
        Ok(Box::new(dictionary.fuzzy_terms(
            query.term,
            query.max_edits,
            query.prefix_length,
            query.min_doc_freq,
        )))
    }
}

use std::error::Error;

use thiserror::Error;

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct TermFrequency {
    /// Number of documents containing the term
    pub doc_freq: u64,
    /// Number of occurrences across all documents
    pub total_freq: u64,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct FieldStats {
    pub num_docs: u64,
    pub sum_total_term_freq: u64,
    /// Distinct terms in the field
    pub num_terms: u64,
}

pub struct FuzzyQuery<'q> {
    pub term: &'q str,
    pub max_edits: u32,
    /// Leading characters that must match exactly
    pub prefix_length: usize,
    pub min_doc_freq: u64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FuzzyTerm {
    pub term: String,
    pub edits: u32,
    pub frequency: TermFrequency,
}

pub type FuzzyTermIter<'a> = Box<dyn Iterator<Item = FuzzyTerm> + 'a>;

#[derive(Debug, Error)]
pub enum StatsError {
    #[error("unknown field `{0}`")]
    UnknownField(String),
    #[error("term statistics backend failure: {0}")]
    Backend(#[source] Box<dyn Error + Send + Sync>),
}

pub type StatsResult<T> = Result<T, StatsError>;

/// Read-only view of an inverted index's term statistics.
///
/// Implementations are shared across concurrent requests.
pub trait TermStatistics: Send + Sync {
    fn field_stats(&self, field: &str) -> StatsResult<FieldStats>;

    fn term_frequency(&self, field: &str, term: &str) -> StatsResult<TermFrequency>;

    /// Frequency of an n-gram key (tokens joined by a separator) in a shingled field.
    fn ngram_frequency(&self, field: &str, key: &str) -> StatsResult<u64> {
        Ok(self.term_frequency(field, key)?.total_freq)
    }

    /// Enumerates the field's terms within `query.max_edits` Damerau edits of `query.term`.
    /// No ordering is guaranteed.
    fn terms_within_edit_distance<'a>(
        &'a self,
        field: &str,
        query: &FuzzyQuery<'_>,
    ) -> StatsResult<FuzzyTermIter<'a>>;

    fn vocabulary_size(&self, field: &str) -> StatsResult<u64> {
        Ok(self.field_stats(field)?.num_terms)
    }
}

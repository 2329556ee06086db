use infisuggest_common::i_debug;
use infisuggest_common::stats::{FuzzyQuery, FuzzyTerm, StatsResult, TermStatistics};
use infisuggest_common::tokenize::Analyzer;

use crate::candidate::{Candidate, CandidateSet, Provenance};
use crate::config::DirectGeneratorConfig;
use crate::error::{self, invalid_parameter, SuggestResult};
use crate::generator::{CandidateGenerator, SuggestMode};

fn resolve_doc_freq_threshold(value: f64, num_docs: u64) -> u64 {
    if value >= 1.0 {
        value as u64
    } else {
        (value * num_docs as f64).ceil() as u64
    }
}

/// Draws candidates from the edit distance neighbourhood of a term in one field's dictionary.
pub struct DirectCandidateGenerator<'a> {
    stats: &'a dyn TermStatistics,
    field: String,
    suggest_mode: SuggestMode,
    accuracy: f64,
    size: usize,
    max_edits: u32,
    max_inspections: usize,
    prefix_length: usize,
    min_word_length: usize,
    min_doc_freq: u64,
    max_term_freq: u64,
    non_error_likelihood: f64,
    dictionary_size: u64,
    pre_filter: Option<&'a dyn Analyzer>,
    post_filter: Option<&'a dyn Analyzer>,
}

impl<'a> DirectCandidateGenerator<'a> {
    pub fn new(
        stats: &'a dyn TermStatistics,
        config: &DirectGeneratorConfig,
        non_error_likelihood: f64,
    ) -> SuggestResult<Self> {
        if !(1..=2).contains(&config.max_edits) {
            return invalid_parameter("max_edits", format!("must be 1 or 2, got {}", config.max_edits));
        }
        if !(0.0..=1.0).contains(&config.accuracy) {
            return invalid_parameter("accuracy", format!("must be within [0, 1], got {}", config.accuracy));
        }
        if config.size == 0 {
            return invalid_parameter("size", "must be at least 1");
        }
        if config.max_inspections == 0 {
            return invalid_parameter("max_inspections", "must be at least 1");
        }
        if !(config.min_doc_freq >= 0.0) {
            return invalid_parameter("min_doc_freq", format!("must not be negative, got {}", config.min_doc_freq));
        }
        if !(config.max_term_freq >= 0.0) {
            return invalid_parameter("max_term_freq", format!("must not be negative, got {}", config.max_term_freq));
        }
        if !(non_error_likelihood > 0.0 && non_error_likelihood <= 1.0) {
            return invalid_parameter(
                "real_word_error_likelihood",
                format!("must be within (0, 1], got {}", non_error_likelihood),
            );
        }

        let field_stats = error::field_stats(stats, &config.field)?;

        Ok(DirectCandidateGenerator {
            stats,
            field: config.field.clone(),
            suggest_mode: config.suggest_mode,
            accuracy: config.accuracy,
            size: config.size,
            max_edits: config.max_edits,
            max_inspections: config.max_inspections,
            prefix_length: config.prefix_length,
            min_word_length: config.min_word_length,
            min_doc_freq: resolve_doc_freq_threshold(config.min_doc_freq, field_stats.num_docs),
            max_term_freq: resolve_doc_freq_threshold(config.max_term_freq, field_stats.num_docs),
            non_error_likelihood,
            dictionary_size: field_stats.sum_total_term_freq,
            pre_filter: None,
            post_filter: None,
        })
    }

    pub fn with_pre_filter(mut self, analyzer: &'a dyn Analyzer) -> Self {
        self.pre_filter = Some(analyzer);
        self
    }

    pub fn with_post_filter(mut self, analyzer: &'a dyn Analyzer) -> Self {
        self.post_filter = Some(analyzer);
        self
    }

    /// The last token the pre filter produces for `term`, or `term` itself.
    fn pre_filter_term(&self, term: &str) -> String {
        self.pre_filter
            .and_then(|analyzer| analyzer.analyze(term).pop())
            .map(|token| token.term)
            .unwrap_or_else(|| term.to_owned())
    }

    /// Ranked candidates for an already pre filtered term, at most `size` of them.
    fn suggest_similar(&self, term: &str) -> StatsResult<Vec<Candidate>> {
        let term_char_count = term.chars().count();
        if term_char_count < self.min_word_length {
            return Ok(Vec::new());
        }

        let original = self.stats.term_frequency(&self.field, term)?;
        if (self.suggest_mode == SuggestMode::Missing && original.total_freq > 0)
            || original.doc_freq > self.max_term_freq
        {
            return Ok(Vec::new());
        }

        let query = FuzzyQuery {
            term,
            max_edits: self.max_edits,
            prefix_length: self.prefix_length,
            min_doc_freq: self.min_doc_freq,
        };
        let mut matches: Vec<FuzzyTerm> = self.stats
            .terms_within_edit_distance(&self.field, &query)?
            .filter(|fuzzy_term| {
                fuzzy_term.term != term
                    && (self.suggest_mode != SuggestMode::Popular
                        || fuzzy_term.frequency.total_freq > original.total_freq)
            })
            .collect();

        // Inspect the closest, most frequent terms first
        matches.sort_by(|a, b| {
            a.edits
                .cmp(&b.edits)
                .then_with(|| b.frequency.total_freq.cmp(&a.frequency.total_freq))
                .then_with(|| a.term.cmp(&b.term))
        });
        matches.truncate(self.size.saturating_mul(self.max_inspections));

        let mut candidates = CandidateSet::new(
            self.create_candidate(term.to_owned(), original.total_freq, 1.0, Provenance::UserInput),
            0,
            0,
        );
        for fuzzy_term in matches {
            let string_distance = 1.0 - fuzzy_term.edits as f64 / term_char_count as f64;
            if string_distance < self.accuracy || string_distance <= 0.0 {
                continue;
            }

            candidates.add_candidate(self.create_candidate(
                fuzzy_term.term,
                fuzzy_term.frequency.total_freq,
                string_distance,
                Provenance::Correction,
            ));
        }
        candidates.sort_and_truncate(self.size);

        Ok(candidates.candidates)
    }

    fn add_post_filtered(&self, candidate: Candidate, set: &mut CandidateSet) {
        let post_filter = match self.post_filter {
            Some(post_filter) => post_filter,
            None => {
                set.add_candidate(candidate);
                return;
            }
        };

        for token in post_filter.analyze(&candidate.term) {
            if !token.is_stacked() && token.term == candidate.term {
                set.add_candidate(candidate.clone());
                continue;
            }

            let string_distance = if token.is_stacked() {
                self.non_error_likelihood
            } else {
                candidate.string_distance
            };
            set.add_candidate(self.create_candidate(
                token.term,
                candidate.frequency,
                string_distance,
                Provenance::Correction,
            ));
        }
    }
}

impl<'a> CandidateGenerator for DirectCandidateGenerator<'a> {
    fn frequency(&self, term: &str) -> StatsResult<u64> {
        Ok(self.stats.term_frequency(&self.field, &self.pre_filter_term(term))?.total_freq)
    }

    fn create_candidate(
        &self,
        term: String,
        frequency: u64,
        string_distance: f64,
        provenance: Provenance,
    ) -> Candidate {
        let score = string_distance * (frequency as f64 + 1.0) / (self.dictionary_size as f64 + 1.0);
        Candidate {
            term,
            frequency,
            string_distance,
            score,
            provenance,
        }
    }

    fn draw_candidates(&self, set: &mut CandidateSet) -> StatsResult<()> {
        let term = self.pre_filter_term(&set.original.term);
        let suggestions = self.suggest_similar(&term)?;

        i_debug!("{} candidates for {} in {}", suggestions.len(), term, self.field);

        for candidate in suggestions {
            self.add_post_filtered(candidate, set);
        }
        set.sort_and_truncate(usize::MAX);

        Ok(())
    }
}

use log::debug;

use infisuggest_common::tokenize::{Analyzer, TokenKind};

use crate::candidate::{Candidate, CandidateSet, Provenance};
use crate::candidate_scorer::CandidateScorer;
use crate::correction::{Correction, CorrectionResult, NO_IMPROVEMENT_CUTOFF};
use crate::error::{invalid_parameter, SuggestError, SuggestResult};
use crate::generator::CandidateGenerator;
use crate::scorer::WordScorer;

pub const DEFAULT_TOKEN_LIMIT: usize = 10;

/// Number of positions a correction may change.
///
/// `max_errors >= 1` is an absolute count, smaller values are a fraction of the phrase length.
fn error_budget(max_errors: f64, num_positions: usize) -> usize {
    let budget = if max_errors >= 1.0 {
        max_errors.floor()
    } else {
        (max_errors * num_positions as f64).round()
    };

    (budget as usize).max(1)
}

/// Corrects whole phrases by combining a channel model (how likely the user typed
/// the original term when meaning a candidate) with a language model over the
/// resulting candidate sequence.
pub struct NoisyChannelSpellChecker {
    real_word_error_likelihood: f64,
    require_unigram: bool,
    token_limit: usize,
}

impl NoisyChannelSpellChecker {
    pub fn new(real_word_error_likelihood: f64) -> Self {
        NoisyChannelSpellChecker {
            real_word_error_likelihood,
            require_unigram: true,
            token_limit: DEFAULT_TOKEN_LIMIT,
        }
    }

    /// Whether shingle tokens of the query analyzer are skipped.
    pub fn with_require_unigram(mut self, require_unigram: bool) -> Self {
        self.require_unigram = require_unigram;
        self
    }

    /// Phrases with at least this many positions are returned uncorrected.
    pub fn with_token_limit(mut self, token_limit: usize) -> Self {
        self.token_limit = token_limit;
        self
    }

    fn validate(&self, max_errors: f64, size: usize, confidence: f64, gram_size: usize) -> SuggestResult<()> {
        if !(1..=3).contains(&gram_size) {
            return invalid_parameter("gram_size", format!("must be within [1, 3], got {}", gram_size));
        }
        if size == 0 {
            return invalid_parameter("size", "must be at least 1");
        }
        if !(max_errors.is_finite() && max_errors > 0.0) {
            return invalid_parameter("max_errors", format!("must be positive, got {}", max_errors));
        }
        if !(confidence.is_finite() && confidence >= 0.0) {
            return invalid_parameter("confidence", format!("must not be negative, got {}", confidence));
        }
        if !(self.real_word_error_likelihood > 0.0 && self.real_word_error_likelihood <= 1.0) {
            return invalid_parameter(
                "real_word_error_likelihood",
                format!("must be within (0, 1], got {}", self.real_word_error_likelihood),
            );
        }

        Ok(())
    }

    /// One candidate set per position of the analyzed phrase.
    ///
    /// Synonyms stacked onto a position join its candidates when the generator's field knows them.
    fn build_candidate_sets(
        &self,
        analyzer: &dyn Analyzer,
        phrase: &str,
        generator: &dyn CandidateGenerator,
    ) -> SuggestResult<Vec<CandidateSet>> {
        let mut sets: Vec<CandidateSet> = Vec::new();
        let mut skipped_shingles = false;

        for token in analyzer.analyze(phrase) {
            if self.require_unigram && token.kind == TokenKind::Shingle {
                skipped_shingles = true;
                continue;
            }

            if token.is_stacked() && token.kind == TokenKind::Synonym {
                if let Some(set) = sets.last_mut() {
                    let frequency = generator.frequency(&token.term)?;
                    if frequency > 0 {
                        set.add_candidate(generator.create_candidate(
                            token.term,
                            frequency,
                            self.real_word_error_likelihood,
                            Provenance::Synonym,
                        ));
                    }
                    continue;
                }
            }

            let original = generator.original_candidate(&token.term)?;
            sets.push(CandidateSet::new(original, token.start_offset, token.end_offset));
        }

        if sets.is_empty() && skipped_shingles {
            return Err(SuggestError::NoUnigrams);
        }

        Ok(sets)
    }

    /// Ranks corrections of `phrase`, best first.
    ///
    /// Only corrections scoring above `confidence` times the score of the unchanged phrase
    /// are returned. A `confidence` of 0 returns the best `size` paths, the unchanged phrase
    /// included. When nothing qualifies, the unchanged phrase is returned alone with
    /// [`NO_IMPROVEMENT_CUTOFF`] as the cutoff.
    #[allow(clippy::too_many_arguments)]
    pub fn get_corrections(
        &self,
        analyzer: &dyn Analyzer,
        phrase: &str,
        generator: &dyn CandidateGenerator,
        max_errors: f64,
        size: usize,
        scorer: &WordScorer,
        confidence: f64,
        gram_size: usize,
    ) -> SuggestResult<CorrectionResult> {
        self.validate(max_errors, size, confidence, gram_size)?;

        let mut sets = self.build_candidate_sets(analyzer, phrase, generator)?;
        if sets.is_empty() {
            return Ok(CorrectionResult::empty());
        }

        let candidate_scorer = CandidateScorer::new(scorer, self.real_word_error_likelihood, size, gram_size);
        let token_offsets: Vec<(usize, usize)> = sets.iter().map(|set| (set.start_offset, set.end_offset)).collect();
        let original_score = {
            let original_path: Vec<&Candidate> = sets.iter().map(|set| &set.original).collect();
            candidate_scorer.score_path(&original_path)?.exp()
        };
        let original = Correction::new(sets.iter().map(|set| set.original.clone()).collect(), original_score);

        if sets.len() >= self.token_limit {
            debug!("{} positions reach the token limit of {}", sets.len(), self.token_limit);
            return Ok(CorrectionResult::no_improvement(original, token_offsets));
        }

        for set in sets.iter_mut() {
            generator.draw_candidates(set)?;
        }

        let cutoff_score = if confidence > 0.0 {
            confidence * original_score
        } else {
            NO_IMPROVEMENT_CUTOFF
        };
        let max_errors = error_budget(max_errors, sets.len());
        debug!("cutoff {} for \"{}\", at most {} errors", cutoff_score, original.join(" "), max_errors);

        let corrections = candidate_scorer.find_best_candidates(&sets, max_errors, cutoff_score)?;
        debug!("{} corrections above the cutoff", corrections.len());

        if corrections.is_empty() {
            return Ok(CorrectionResult::no_improvement(original, token_offsets));
        }

        Ok(CorrectionResult {
            corrections,
            cutoff_score,
            token_offsets,
        })
    }
}

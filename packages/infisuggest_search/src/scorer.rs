#[cfg(feature = "config")]
use serde::{Deserialize, Serialize};

use infisuggest_common::stats::{StatsResult, TermStatistics};

use crate::candidate::Candidate;
use crate::error::{self, SuggestError, SuggestResult};

pub const DEFAULT_LAPLACE_ALPHA: f64 = 1.0;
pub const DEFAULT_BACKOFF_DISCOUNT: f64 = 0.4;

const WEIGHT_SUM_TOLERANCE: f64 = 1e-6;

fn get_default_alpha() -> f64 {
    DEFAULT_LAPLACE_ALPHA
}

fn get_default_discount() -> f64 {
    DEFAULT_BACKOFF_DISCOUNT
}

/// Estimates n-gram probabilities from possibly sparse counts.
#[cfg_attr(feature = "config", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "config", serde(tag = "type", rename_all = "snake_case"))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Smoothing {
    /// Adds `alpha` to every count
    Laplace {
        #[cfg_attr(feature = "config", serde(default = "get_default_alpha"))]
        alpha: f64,
    },
    /// Weighted sum of the relative frequencies of every order, the weights summing to 1
    LinearInterpolation {
        trigram_lambda: f64,
        bigram_lambda: f64,
        unigram_lambda: f64,
    },
    /// Relative frequency of the highest order seen, discounted once per order backed off
    StupidBackoff {
        #[cfg_attr(feature = "config", serde(default = "get_default_discount"))]
        discount: f64,
    },
}

impl Default for Smoothing {
    fn default() -> Self {
        Smoothing::StupidBackoff { discount: get_default_discount() }
    }
}

impl Smoothing {
    pub fn laplace() -> Self {
        Smoothing::Laplace { alpha: get_default_alpha() }
    }

    pub fn validate(&self) -> SuggestResult<()> {
        match *self {
            Smoothing::Laplace { alpha } => {
                if !(alpha.is_finite() && alpha > 0.0) {
                    return Err(SuggestError::InvalidSmoothing(format!("alpha must be positive, got {}", alpha)));
                }
            }
            Smoothing::LinearInterpolation { trigram_lambda, bigram_lambda, unigram_lambda } => {
                let lambdas = [trigram_lambda, bigram_lambda, unigram_lambda];
                if lambdas.iter().any(|lambda| !(lambda.is_finite() && *lambda >= 0.0)) {
                    return Err(SuggestError::InvalidSmoothing(format!(
                        "interpolation weights must not be negative, got {:?}",
                        lambdas,
                    )));
                }

                let sum: f64 = lambdas.iter().sum();
                if (sum - 1.0).abs() > WEIGHT_SUM_TOLERANCE {
                    return Err(SuggestError::InvalidSmoothing(format!(
                        "interpolation weights must sum to 1, got {}",
                        sum,
                    )));
                }
            }
            Smoothing::StupidBackoff { discount } => {
                if !(discount > 0.0 && discount <= 1.0) {
                    return Err(SuggestError::InvalidSmoothing(format!(
                        "discount must be within (0, 1], got {}",
                        discount,
                    )));
                }
            }
        }

        Ok(())
    }
}

#[inline]
fn ratio(numerator: f64, denominator: f64) -> f64 {
    if denominator > 0.0 {
        numerator / denominator
    } else {
        0.0
    }
}

/// `count / context`, never above 1 even if the context count is smaller or missing.
#[inline]
fn relative_frequency(count: f64, context: f64) -> f64 {
    if count > 0.0 {
        count / count.max(context)
    } else {
        0.0
    }
}

/// Language model over the n-gram counts of one (shingled) field.
pub struct WordScorer<'a> {
    stats: &'a dyn TermStatistics,
    field: String,
    separator: String,
    vocabulary_size: f64,
    total_term_freq: f64,
    smoothing: Smoothing,
}

impl<'a> WordScorer<'a> {
    pub fn new(
        stats: &'a dyn TermStatistics,
        field: &str,
        separator: &str,
        smoothing: Smoothing,
    ) -> SuggestResult<Self> {
        smoothing.validate()?;
        let field_stats = error::field_stats(stats, field)?;

        Ok(WordScorer {
            stats,
            field: field.to_owned(),
            separator: separator.to_owned(),
            vocabulary_size: field_stats.num_terms as f64,
            total_term_freq: field_stats.sum_total_term_freq as f64,
            smoothing,
        })
    }

    fn count(&self, ngram: &[&Candidate]) -> StatsResult<f64> {
        let key = ngram
            .iter()
            .map(|candidate| candidate.term.as_str())
            .collect::<Vec<_>>()
            .join(&self.separator);
        Ok(self.stats.ngram_frequency(&self.field, &key)? as f64)
    }

    pub fn unigram_probability(&self, word: &Candidate) -> StatsResult<f64> {
        let alpha = match self.smoothing {
            Smoothing::Laplace { alpha } => alpha,
            _ => 1.0,
        };

        Ok(ratio(
            self.count(&[word])? + alpha,
            self.total_term_freq + alpha * self.vocabulary_size,
        ))
    }

    fn bigram_probability(&self, w1: &Candidate, word: &Candidate) -> StatsResult<f64> {
        let bigram_count = self.count(&[w1, word])?;
        let context_count = w1.frequency as f64;

        Ok(match self.smoothing {
            Smoothing::Laplace { alpha } => ratio(
                bigram_count + alpha,
                context_count + alpha * self.vocabulary_size,
            ),
            Smoothing::LinearInterpolation { bigram_lambda, unigram_lambda, .. } => {
                bigram_lambda * relative_frequency(bigram_count, context_count)
                    + unigram_lambda * self.unigram_probability(word)?
            }
            Smoothing::StupidBackoff { discount } => {
                if bigram_count > 0.0 {
                    relative_frequency(bigram_count, context_count)
                } else {
                    discount * self.unigram_probability(word)?
                }
            }
        })
    }

    fn trigram_probability(&self, w2: &Candidate, w1: &Candidate, word: &Candidate) -> StatsResult<f64> {
        let trigram_count = self.count(&[w2, w1, word])?;

        Ok(match self.smoothing {
            Smoothing::Laplace { alpha } => {
                let context_count = self.count(&[w2, w1])?;
                ratio(trigram_count + alpha, context_count + alpha * self.vocabulary_size)
            }
            Smoothing::LinearInterpolation { trigram_lambda, .. } => {
                let context_count = self.count(&[w2, w1])?;
                trigram_lambda * relative_frequency(trigram_count, context_count)
                    + self.bigram_probability(w1, word)?
            }
            Smoothing::StupidBackoff { discount } => {
                if trigram_count > 0.0 {
                    relative_frequency(trigram_count, self.count(&[w2, w1])?)
                } else {
                    discount * self.bigram_probability(w1, word)?
                }
            }
        })
    }

    /// Probability of the last candidate of `window` given the ones before it,
    /// clamped into `[f64::MIN_POSITIVE, 1]`. Only the last three candidates are considered.
    pub fn probability(&self, window: &[&Candidate]) -> StatsResult<f64> {
        let probability = match window {
            [] => 1.0,
            [word] => self.unigram_probability(word)?,
            [w1, word] => self.bigram_probability(w1, word)?,
            [.., w2, w1, word] => self.trigram_probability(w2, w1, word)?,
        };

        Ok(probability.max(f64::MIN_POSITIVE).min(1.0))
    }

    /// Log probability of `path[at]`, conditioned on up to `gram_size - 1` preceding candidates.
    pub fn score(&self, path: &[&Candidate], at: usize, gram_size: usize) -> StatsResult<f64> {
        let window_len = gram_size.max(1).min(at + 1);
        Ok(self.probability(&path[at + 1 - window_len..=at])?.ln())
    }
}

use thiserror::Error;

use infisuggest_common::stats::{FieldStats, StatsError, TermStatistics};

#[derive(Debug, Error)]
pub enum SuggestError {
    #[error("no such field `{0}`")]
    UnknownField(String),
    #[error("invalid `{name}`: {reason}")]
    InvalidParameter { name: &'static str, reason: String },
    #[error("invalid smoothing model: {0}")]
    InvalidSmoothing(String),
    #[error("the query analyzer produced only shingles, at least one unigram is required")]
    NoUnigrams,
    #[error(transparent)]
    Stats(#[from] StatsError),
}

pub type SuggestResult<T> = Result<T, SuggestError>;

pub(crate) fn invalid_parameter<T>(name: &'static str, reason: impl Into<String>) -> SuggestResult<T> {
    Err(SuggestError::InvalidParameter { name, reason: reason.into() })
}

/// Resolves a field's statistics, reporting unknown fields as configuration errors.
pub(crate) fn field_stats(stats: &dyn TermStatistics, field: &str) -> SuggestResult<FieldStats> {
    match stats.field_stats(field) {
        Ok(field_stats) => Ok(field_stats),
        Err(StatsError::UnknownField(field)) => Err(SuggestError::UnknownField(field)),
        Err(e) => Err(SuggestError::Stats(e)),
    }
}

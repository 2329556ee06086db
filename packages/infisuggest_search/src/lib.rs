pub mod candidate;
pub mod candidate_scorer;
pub mod config;
pub mod correction;
pub mod error;
pub mod generator;
pub mod scorer;
pub mod spell_checker;
pub mod suggester;

#[cfg(test)]
mod test_utils;

pub use candidate::{Candidate, CandidateSet, Provenance};
pub use correction::{Correction, CorrectionResult, NO_IMPROVEMENT_CUTOFF};
pub use error::{SuggestError, SuggestResult};
pub use scorer::{Smoothing, WordScorer};
pub use spell_checker::NoisyChannelSpellChecker;
pub use suggester::{PhraseSuggester, PhraseSuggestion, SuggestOption};

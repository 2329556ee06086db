pub mod direct;
pub mod multi;

#[cfg(feature = "config")]
use serde::{Deserialize, Serialize};

use infisuggest_common::stats::StatsResult;

use crate::candidate::{Candidate, CandidateSet, Provenance};

pub use direct::DirectCandidateGenerator;
pub use multi::MultiCandidateGenerator;

/// When a generator proposes replacements for a term.
#[cfg_attr(feature = "config", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "config", serde(rename_all = "snake_case"))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SuggestMode {
    /// Only for terms missing from the field
    Missing,
    /// Only candidates more frequent than the term
    Popular,
    Always,
}

impl Default for SuggestMode {
    fn default() -> Self {
        SuggestMode::Popular
    }
}

/// Proposes replacement candidates for a single position of the phrase.
pub trait CandidateGenerator {
    /// Collection frequency of `term` in the generator's field.
    fn frequency(&self, term: &str) -> StatsResult<u64>;

    fn create_candidate(
        &self,
        term: String,
        frequency: u64,
        string_distance: f64,
        provenance: Provenance,
    ) -> Candidate;

    /// Adds this generator's candidates for `set.original` to `set`.
    fn draw_candidates(&self, set: &mut CandidateSet) -> StatsResult<()>;

    fn is_known_word(&self, term: &str) -> StatsResult<bool> {
        Ok(self.frequency(term)? > 0)
    }

    /// The unchanged user term, scored as a perfect match.
    fn original_candidate(&self, term: &str) -> StatsResult<Candidate> {
        let frequency = self.frequency(term)?;
        Ok(self.create_candidate(term.to_owned(), frequency, 1.0, Provenance::UserInput))
    }
}

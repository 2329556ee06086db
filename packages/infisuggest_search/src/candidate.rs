use std::cmp::Ordering;

/// Where a candidate term came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Provenance {
    /// The term as the user typed it (after analysis)
    UserInput,
    /// Produced by the query analyzer at the same position as the user's term
    Synonym,
    /// Proposed by a candidate generator
    Correction,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Candidate {
    pub term: String,
    /// Collection frequency in the generator's field
    pub frequency: u64,
    /// Similarity to the user's term, in (0, 1]
    pub string_distance: f64,
    pub score: f64,
    pub provenance: Provenance,
}

impl Candidate {
    #[inline]
    pub fn is_correction(&self) -> bool {
        self.provenance == Provenance::Correction
    }

    /// Probability that the user meant this candidate when typing the original term.
    #[inline]
    pub fn channel_probability(&self, real_word_error_likelihood: f64) -> f64 {
        if self.is_correction() {
            self.string_distance
        } else {
            real_word_error_likelihood
        }
    }
}

/// The unchanged term at one position of the phrase plus its replacement candidates.
#[derive(Debug, Clone)]
pub struct CandidateSet {
    pub original: Candidate,
    pub candidates: Vec<Candidate>,
    pub start_offset: usize,
    pub end_offset: usize,
}

impl CandidateSet {
    pub fn new(original: Candidate, start_offset: usize, end_offset: usize) -> Self {
        CandidateSet {
            original,
            candidates: Vec::new(),
            start_offset,
            end_offset,
        }
    }

    /// Adds a candidate unless it repeats the original term.
    ///
    /// Of two candidates with the same term the higher scored one is kept,
    /// but a synonym of the user's input is never replaced by a correction.
    pub fn add_candidate(&mut self, candidate: Candidate) -> bool {
        if candidate.term == self.original.term {
            return false;
        }

        if let Some(existing) = self.candidates.iter_mut().find(|existing| existing.term == candidate.term) {
            if existing.is_correction() && candidate.score > existing.score {
                *existing = candidate;
                return true;
            }
            return false;
        }

        self.candidates.push(candidate);
        true
    }

    /// Stable sort by descending score, then keep the first `size` candidates.
    pub fn sort_and_truncate(&mut self, size: usize) {
        self.candidates.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(Ordering::Equal));
        self.candidates.truncate(size);
    }

    /// Highest channel probability among the original and the candidates.
    pub fn max_channel_probability(&self, real_word_error_likelihood: f64) -> f64 {
        self.candidates
            .iter()
            .map(|candidate| candidate.channel_probability(real_word_error_likelihood))
            .fold(
                self.original.channel_probability(real_word_error_likelihood),
                f64::max,
            )
    }
}

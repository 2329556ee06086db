use std::cmp::Ordering;

use crate::candidate::{Candidate, Provenance};

/// Cutoff reported when no correction scored above the original phrase.
pub const NO_IMPROVEMENT_CUTOFF: f64 = f64::MIN_POSITIVE;

/// One complete choice of candidates, one per position of the phrase.
#[derive(Debug, Clone, PartialEq)]
pub struct Correction {
    pub candidates: Vec<Candidate>,
    pub score: f64,
}

impl Correction {
    pub fn new(candidates: Vec<Candidate>, score: f64) -> Self {
        Correction { candidates, score }
    }

    pub fn terms(&self) -> impl Iterator<Item = &str> {
        self.candidates.iter().map(|candidate| candidate.term.as_str())
    }

    /// Whether each position holds a correction rather than the user's own input or its synonym.
    pub fn changed(&self) -> Vec<bool> {
        self.candidates.iter().map(Candidate::is_correction).collect()
    }

    pub fn join(&self, separator: &str) -> String {
        self.terms().collect::<Vec<_>>().join(separator)
    }

    /// Joins the terms, wrapping each run of adjacent corrected terms in a single pair of tags.
    pub fn join_highlighted(&self, separator: &str, pre_tag: &str, post_tag: &str) -> String {
        let changed = self.changed();
        let mut output = String::new();

        for (idx, candidate) in self.candidates.iter().enumerate() {
            if idx > 0 {
                output.push_str(separator);
            }

            let opens_run = changed[idx] && (idx == 0 || !changed[idx - 1]);
            let closes_run = changed[idx] && (idx + 1 == changed.len() || !changed[idx + 1]);

            if opens_run {
                output.push_str(pre_tag);
            }
            output.push_str(&candidate.term);
            if closes_run {
                output.push_str(post_tag);
            }
        }

        output
    }

    /// Splices the corrected terms into the user's text.
    ///
    /// `offsets` holds the byte range of every position in `source`. Positions holding the
    /// user's input keep the user's spelling, synonyms are written out without tags.
    /// The text between tokens is preserved. Returns `None`
    /// if the offsets do not line up with `source`.
    pub fn highlight_source(
        &self,
        source: &str,
        offsets: &[(usize, usize)],
        pre_tag: &str,
        post_tag: &str,
    ) -> Option<String> {
        if offsets.len() != self.candidates.len() {
            return None;
        }

        let changed = self.changed();
        let mut output = String::with_capacity(source.len() + pre_tag.len() + post_tag.len());
        let mut cursor = 0;

        for (idx, (&(start, end), candidate)) in offsets.iter().zip(self.candidates.iter()).enumerate() {
            if start < cursor {
                return None;
            }

            let between = source.get(cursor..start)?;
            if changed[idx] {
                if idx == 0 || !changed[idx - 1] {
                    output.push_str(between);
                    output.push_str(pre_tag);
                } else {
                    output.push_str(between);
                }
                output.push_str(&candidate.term);
                if idx + 1 == changed.len() || !changed[idx + 1] {
                    output.push_str(post_tag);
                }
            } else {
                output.push_str(between);
                if candidate.provenance == Provenance::Synonym {
                    output.push_str(&candidate.term);
                } else {
                    output.push_str(source.get(start..end)?);
                }
            }

            cursor = end;
        }

        output.push_str(source.get(cursor..)?);
        Some(output)
    }

    /// `Ordering::Greater` if `self` is the better correction.
    ///
    /// Higher scores are better, equal scores prefer lexicographically earlier terms.
    pub fn cmp_quality(&self, other: &Correction) -> Ordering {
        self.score
            .partial_cmp(&other.score)
            .unwrap_or(Ordering::Equal)
            .then_with(|| other.terms().cmp(self.terms()))
    }
}

/// Ranked corrections of one phrase.
#[derive(Debug, Clone)]
pub struct CorrectionResult {
    /// Best first
    pub corrections: Vec<Correction>,
    /// Score a correction had to exceed, or [`NO_IMPROVEMENT_CUTOFF`]
    pub cutoff_score: f64,
    /// Byte range of each position in the analyzed text
    pub token_offsets: Vec<(usize, usize)>,
}

impl CorrectionResult {
    pub fn empty() -> Self {
        CorrectionResult {
            corrections: Vec::new(),
            cutoff_score: NO_IMPROVEMENT_CUTOFF,
            token_offsets: Vec::new(),
        }
    }

    /// The original phrase as the only correction.
    pub fn no_improvement(original: Correction, token_offsets: Vec<(usize, usize)>) -> Self {
        CorrectionResult {
            corrections: vec![original],
            cutoff_score: NO_IMPROVEMENT_CUTOFF,
            token_offsets,
        }
    }
}

use std::cmp::Ordering;

use binary_heap_plus::BinaryHeap;

use infisuggest_common::stats::StatsResult;

use crate::candidate::{Candidate, CandidateSet};
use crate::correction::Correction;
use crate::scorer::WordScorer;

pub type CorrectionComparator = dyn Fn(&Correction, &Correction) -> Ordering;

/// Absorbs rounding differences between a pruning bound and the exact path score
const PRUNING_SLACK: f64 = 1e-9;

fn new_correction_heap(capacity: usize) -> BinaryHeap<Correction, Box<CorrectionComparator>> {
    // The worst kept correction sits at the top
    BinaryHeap::from_vec_cmp(
        Vec::with_capacity(capacity + 1),
        Box::new(|a: &Correction, b: &Correction| b.cmp_quality(a)),
    )
}

struct SearchState<'c> {
    path: Vec<&'c Candidate>,
    heap: BinaryHeap<Correction, Box<CorrectionComparator>>,
    /// Upper bound of the log score positions `at..` can still add
    remaining_bounds: Vec<f64>,
    cutoff_score: f64,
    log_cutoff: f64,
}

impl<'c> SearchState<'c> {
    /// Log score a complete path must reach to be kept.
    fn threshold(&self, max_num_corrections: usize) -> f64 {
        if self.heap.len() < max_num_corrections {
            return self.log_cutoff;
        }

        self.heap
            .peek()
            .map(|worst| worst.score.ln().max(self.log_cutoff))
            .unwrap_or(self.log_cutoff)
    }
}

/// Searches the combinations of candidates for the best scoring corrections.
///
/// Every position takes either its original term or, while the error budget lasts,
/// one of its candidates. Branches whose optimistic bound cannot reach the current
/// threshold are pruned, which never changes the result compared to full enumeration
/// as language model probabilities are at most 1.
pub struct CandidateScorer<'s, 'a> {
    scorer: &'s WordScorer<'a>,
    real_word_error_likelihood: f64,
    max_num_corrections: usize,
    gram_size: usize,
}

impl<'s, 'a> CandidateScorer<'s, 'a> {
    pub fn new(
        scorer: &'s WordScorer<'a>,
        real_word_error_likelihood: f64,
        max_num_corrections: usize,
        gram_size: usize,
    ) -> Self {
        CandidateScorer {
            scorer,
            real_word_error_likelihood,
            max_num_corrections,
            gram_size,
        }
    }

    /// Corrections scoring strictly above `cutoff_score`, best first.
    pub fn find_best_candidates(
        &self,
        sets: &[CandidateSet],
        max_errors: usize,
        cutoff_score: f64,
    ) -> StatsResult<Vec<Correction>> {
        if sets.is_empty() || self.max_num_corrections == 0 {
            return Ok(Vec::new());
        }

        let mut remaining_bounds = vec![0.0; sets.len() + 1];
        for (idx, set) in sets.iter().enumerate().rev() {
            remaining_bounds[idx] = remaining_bounds[idx + 1]
                + set.max_channel_probability(self.real_word_error_likelihood).ln();
        }

        let mut state = SearchState {
            path: Vec::with_capacity(sets.len()),
            heap: new_correction_heap(self.max_num_corrections),
            remaining_bounds,
            cutoff_score,
            log_cutoff: cutoff_score.ln(),
        };
        self.search(sets, 0, max_errors, 0.0, &mut state)?;

        Ok(state.heap.into_sorted_vec())
    }

    /// Log score of a complete path.
    pub fn score_path(&self, path: &[&Candidate]) -> StatsResult<f64> {
        let mut log_score = 0.0;
        for at in 0..path.len() {
            log_score += self.position_score(path, at)?;
        }
        Ok(log_score)
    }

    fn position_score(&self, path: &[&Candidate], at: usize) -> StatsResult<f64> {
        Ok(path[at].channel_probability(self.real_word_error_likelihood).ln()
            + self.scorer.score(path, at, self.gram_size)?)
    }

    fn search<'c>(
        &self,
        sets: &'c [CandidateSet],
        at: usize,
        errors_left: usize,
        log_score: f64,
        state: &mut SearchState<'c>,
    ) -> StatsResult<()> {
        if at == sets.len() {
            self.offer(state, log_score);
            return Ok(());
        }

        if log_score + state.remaining_bounds[at] + PRUNING_SLACK < state.threshold(self.max_num_corrections) {
            return Ok(());
        }

        let set = &sets[at];
        self.descend(sets, at, &set.original, errors_left, log_score, state)?;

        if errors_left > 0 {
            for candidate in set.candidates.iter() {
                self.descend(sets, at, candidate, errors_left - 1, log_score, state)?;
            }
        }

        Ok(())
    }

    fn descend<'c>(
        &self,
        sets: &'c [CandidateSet],
        at: usize,
        candidate: &'c Candidate,
        errors_left: usize,
        log_score: f64,
        state: &mut SearchState<'c>,
    ) -> StatsResult<()> {
        state.path.push(candidate);
        let result = self
            .position_score(&state.path, at)
            .and_then(|position_score| self.search(sets, at + 1, errors_left, log_score + position_score, state));
        state.path.pop();
        result
    }

    fn offer(&self, state: &mut SearchState, log_score: f64) {
        let score = log_score.exp();
        if !(score > state.cutoff_score) {
            return;
        }

        let correction = Correction::new(state.path.iter().map(|&candidate| candidate.clone()).collect(), score);
        if state.heap.len() < self.max_num_corrections {
            state.heap.push(correction);
            return;
        }

        let replaces_worst = state.heap
            .peek()
            .map_or(false, |worst| correction.cmp_quality(worst) == Ordering::Greater);
        if replaces_worst {
            state.heap.pop();
            state.heap.push(correction);
        }
    }
}

#[cfg(test)]
mod test {
    use pretty_assertions::assert_eq;

    use super::CandidateScorer;
    use crate::candidate::{Candidate, CandidateSet};
    use crate::config::DirectGeneratorConfig;
    use crate::correction::{Correction, NO_IMPROVEMENT_CUTOFF};
    use crate::generator::{CandidateGenerator, DirectCandidateGenerator, SuggestMode};
    use crate::scorer::{Smoothing, WordScorer};
    use crate::test_utils::{summit_fixture, Fixture};

    fn candidate_sets(fixture: &Fixture, phrase: &[&str]) -> Vec<CandidateSet> {
        let config = DirectGeneratorConfig {
            suggest_mode: SuggestMode::Always,
            max_term_freq: 100.0,
            min_word_length: 2,
            ..DirectGeneratorConfig::for_field("body")
        };
        let generator = DirectCandidateGenerator::new(&fixture.index, &config, 0.95).unwrap();

        phrase
            .iter()
            .map(|term| {
                let mut set = CandidateSet::new(generator.original_candidate(term).unwrap(), 0, 0);
                generator.draw_candidates(&mut set).unwrap();
                set
            })
            .collect()
    }

    /// Scores every path within the error budget.
    fn enumerate_all(
        candidate_scorer: &CandidateScorer,
        sets: &[CandidateSet],
        max_errors: usize,
        cutoff_score: f64,
        size: usize,
    ) -> Vec<Correction> {
        let mut paths: Vec<(Vec<&Candidate>, usize)> = vec![(Vec::new(), 0)];
        for set in sets {
            let mut extended = Vec::new();
            for (path, errors) in paths {
                let mut with_original = path.clone();
                with_original.push(&set.original);
                extended.push((with_original, errors));

                if errors < max_errors {
                    for candidate in set.candidates.iter() {
                        let mut with_candidate = path.clone();
                        with_candidate.push(candidate);
                        extended.push((with_candidate, errors + 1));
                    }
                }
            }
            paths = extended;
        }

        let mut corrections: Vec<Correction> = paths
            .into_iter()
            .map(|(path, _)| {
                let score = candidate_scorer.score_path(&path).unwrap().exp();
                Correction::new(path.into_iter().cloned().collect(), score)
            })
            .filter(|correction| correction.score > cutoff_score)
            .collect();
        corrections.sort_by(|a, b| b.cmp_quality(a));
        corrections.truncate(size);
        corrections
    }

    fn summarize(corrections: &[Correction]) -> Vec<(String, f64)> {
        corrections.iter().map(|correction| (correction.join(" "), correction.score)).collect()
    }

    #[test]
    fn test_pruned_search_matches_enumeration() {
        let fixture = summit_fixture();
        let phrases: [&[&str]; 3] = [
            &["aiguill", "de", "trioled"],
            &["mont", "blaac", "du", "tacl"],
            &["piz", "berina", "dent", "blance"],
        ];

        for smoothing in [Smoothing::laplace(), Smoothing::default()].iter() {
            let scorer = WordScorer::new(&fixture.index, "body_ngram", " ", *smoothing).unwrap();

            for phrase in phrases.iter() {
                let sets = candidate_sets(&fixture, phrase);
                assert!(sets.iter().any(|set| !set.candidates.is_empty()));

                for &gram_size in &[1, 2, 3] {
                    for &size in &[1, 3, 10] {
                        let candidate_scorer = CandidateScorer::new(&scorer, 0.95, size, gram_size);
                        let original: Vec<&Candidate> = sets.iter().map(|set| &set.original).collect();
                        let original_score = candidate_scorer.score_path(&original).unwrap().exp();

                        for &max_errors in &[1, 2, 4] {
                            for &cutoff in &[NO_IMPROVEMENT_CUTOFF, original_score, 0.5 * original_score] {
                                let pruned = candidate_scorer.find_best_candidates(&sets, max_errors, cutoff).unwrap();
                                let expected = enumerate_all(&candidate_scorer, &sets, max_errors, cutoff, size);
                                assert_eq!(summarize(&pruned), summarize(&expected));
                            }
                        }
                    }
                }
            }
        }
    }

    #[test]
    fn test_original_path_does_not_beat_its_own_score() {
        let fixture = summit_fixture();
        let scorer = WordScorer::new(&fixture.index, "body_ngram", " ", Smoothing::laplace()).unwrap();
        let candidate_scorer = CandidateScorer::new(&scorer, 0.95, 5, 2);

        let sets = candidate_sets(&fixture, &["mont", "blanc"]);
        let without_candidates: Vec<CandidateSet> = sets
            .into_iter()
            .map(|set| CandidateSet::new(set.original, 0, 0))
            .collect();
        let original: Vec<&Candidate> = without_candidates.iter().map(|set| &set.original).collect();
        let original_score = candidate_scorer.score_path(&original).unwrap().exp();

        assert!(candidate_scorer.find_best_candidates(&without_candidates, 1, original_score).unwrap().is_empty());
        assert_eq!(
            summarize(&candidate_scorer.find_best_candidates(&without_candidates, 1, NO_IMPROVEMENT_CUTOFF).unwrap()),
            vec![("mont blanc".to_owned(), original_score)],
        );
    }

    #[test]
    fn test_no_positions() {
        let fixture = summit_fixture();
        let scorer = WordScorer::new(&fixture.index, "body_ngram", " ", Smoothing::default()).unwrap();

        let candidate_scorer = CandidateScorer::new(&scorer, 0.95, 5, 2);
        assert!(candidate_scorer.find_best_candidates(&[], 1, NO_IMPROVEMENT_CUTOFF).unwrap().is_empty());
    }
}

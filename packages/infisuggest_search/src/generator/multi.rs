use infisuggest_common::stats::StatsResult;

use crate::candidate::{Candidate, CandidateSet, Provenance};
use crate::error::{invalid_parameter, SuggestResult};
use crate::generator::CandidateGenerator;

/// Merges the candidates of several generators, e.g. a forward and a reversed field.
///
/// Duplicate terms keep their highest score, so the order of the generators
/// does not change the score of any surviving candidate.
pub struct MultiCandidateGenerator<'a> {
    size: usize,
    generators: Vec<Box<dyn CandidateGenerator + 'a>>,
}

impl<'a> MultiCandidateGenerator<'a> {
    pub fn new(size: usize, generators: Vec<Box<dyn CandidateGenerator + 'a>>) -> SuggestResult<Self> {
        if generators.is_empty() {
            return invalid_parameter("direct_generators", "at least one generator is required");
        }
        if size == 0 {
            return invalid_parameter("size", "must be at least 1");
        }

        Ok(MultiCandidateGenerator { size, generators })
    }
}

impl<'a> CandidateGenerator for MultiCandidateGenerator<'a> {
    fn frequency(&self, term: &str) -> StatsResult<u64> {
        self.generators[0].frequency(term)
    }

    fn create_candidate(
        &self,
        term: String,
        frequency: u64,
        string_distance: f64,
        provenance: Provenance,
    ) -> Candidate {
        self.generators[0].create_candidate(term, frequency, string_distance, provenance)
    }

    fn draw_candidates(&self, set: &mut CandidateSet) -> StatsResult<()> {
        for generator in self.generators.iter() {
            generator.draw_candidates(set)?;
        }
        set.sort_and_truncate(self.size);

        Ok(())
    }
}

#[cfg(test)]
mod test {
    use pretty_assertions::assert_eq;

    use infisuggest_common::stats::StatsResult;

    use super::MultiCandidateGenerator;
    use crate::candidate::{Candidate, CandidateSet, Provenance};
    use crate::error::SuggestError;
    use crate::generator::CandidateGenerator;

    /// Proposes a fixed list of (term, score) pairs.
    struct Fixed(Vec<(&'static str, f64)>);

    impl CandidateGenerator for Fixed {
        fn frequency(&self, term: &str) -> StatsResult<u64> {
            Ok(term.len() as u64)
        }

        fn create_candidate(
            &self,
            term: String,
            frequency: u64,
            string_distance: f64,
            provenance: Provenance,
        ) -> Candidate {
            Candidate { term, frequency, string_distance, score: string_distance, provenance }
        }

        fn draw_candidates(&self, set: &mut CandidateSet) -> StatsResult<()> {
            for (term, score) in self.0.iter() {
                set.add_candidate(self.create_candidate(term.to_string(), 1, *score, Provenance::Correction));
            }
            Ok(())
        }
    }

    fn merged(generators: Vec<Box<dyn CandidateGenerator>>, size: usize) -> Vec<(String, f64)> {
        let generator = MultiCandidateGenerator::new(size, generators).unwrap();
        let mut set = CandidateSet::new(generator.original_candidate("blaac").unwrap(), 0, 5);
        generator.draw_candidates(&mut set).unwrap();
        set.candidates.into_iter().map(|candidate| (candidate.term, candidate.score)).collect()
    }

    #[test]
    fn test_duplicates_keep_higher_score() {
        let forward = || Box::new(Fixed(vec![("blanc", 0.6), ("blanche", 0.5)])) as Box<dyn CandidateGenerator>;
        let reverse = || Box::new(Fixed(vec![("blanc", 0.8), ("black", 0.55)])) as Box<dyn CandidateGenerator>;

        let expected = vec![
            ("blanc".to_owned(), 0.8),
            ("black".to_owned(), 0.55),
            ("blanche".to_owned(), 0.5),
        ];
        assert_eq!(merged(vec![forward(), reverse()], 5), expected);
        assert_eq!(merged(vec![reverse(), forward()], 5), expected);
        assert_eq!(merged(vec![forward(), reverse()], 2), expected[..2].to_vec());
    }

    #[test]
    fn test_delegates_to_first_generator() {
        let generator = MultiCandidateGenerator::new(
            5,
            vec![
                Box::new(Fixed(Vec::new())) as Box<dyn CandidateGenerator>,
                Box::new(Fixed(vec![("blanc", 0.6)])),
            ],
        )
        .unwrap();

        let original = generator.original_candidate("blaac").unwrap();
        assert_eq!(original.frequency, 5);
        assert_eq!(original.provenance, Provenance::UserInput);
        assert!(generator.is_known_word("mont").unwrap());
    }

    #[test]
    fn test_requires_generators() {
        assert!(matches!(
            MultiCandidateGenerator::new(5, Vec::new()),
            Err(SuggestError::InvalidParameter { name: "direct_generators", .. })
        ));
    }
}

#[cfg(feature = "config")]
use serde::Serialize;

use infisuggest_common::i_debug;
use infisuggest_common::stats::TermStatistics;
use infisuggest_common::tokenize::{Analyzer, PerFieldAnalyzer};

use crate::candidate::Provenance;
use crate::config::{DirectGeneratorConfig, PhraseSuggestConfig};
use crate::correction::{Correction, CorrectionResult};
use crate::error::{invalid_parameter, SuggestError, SuggestResult};
use crate::generator::{CandidateGenerator, DirectCandidateGenerator, MultiCandidateGenerator};
use crate::scorer::WordScorer;
use crate::spell_checker::NoisyChannelSpellChecker;

const OPTION_SEPARATOR: &str = " ";

#[cfg_attr(feature = "config", derive(Serialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct SuggestOption {
    pub text: String,
    #[cfg_attr(feature = "config", serde(skip_serializing_if = "Option::is_none"))]
    pub highlighted: Option<String>,
    pub score: f64,
}

#[cfg_attr(feature = "config", derive(Serialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct PhraseSuggestion {
    pub cutoff_score: f64,
    /// Best first
    pub options: Vec<SuggestOption>,
}

/// Answers phrase suggestion requests against one set of term statistics and field analyzers.
pub struct PhraseSuggester<'a> {
    stats: &'a dyn TermStatistics,
    analyzers: &'a PerFieldAnalyzer,
}

impl<'a> PhraseSuggester<'a> {
    pub fn new(stats: &'a dyn TermStatistics, analyzers: &'a PerFieldAnalyzer) -> Self {
        PhraseSuggester { stats, analyzers }
    }

    /// An analyzer referenced by name, which unlike the query analyzer has no fallback.
    fn named_analyzer(&self, name: &str) -> SuggestResult<&'a dyn Analyzer> {
        if self.analyzers.has_field(name) {
            Ok(self.analyzers.get(name))
        } else {
            Err(SuggestError::UnknownField(name.to_owned()))
        }
    }

    fn build_direct_generator(
        &self,
        config: &DirectGeneratorConfig,
        real_word_error_likelihood: f64,
    ) -> SuggestResult<DirectCandidateGenerator<'a>> {
        let mut generator = DirectCandidateGenerator::new(self.stats, config, real_word_error_likelihood)?;
        if let Some(pre_filter) = &config.pre_filter {
            generator = generator.with_pre_filter(self.named_analyzer(pre_filter)?);
        }
        if let Some(post_filter) = &config.post_filter {
            generator = generator.with_post_filter(self.named_analyzer(post_filter)?);
        }

        Ok(generator)
    }

    fn build_generator(&self, config: &PhraseSuggestConfig) -> SuggestResult<Box<dyn CandidateGenerator + 'a>> {
        let mut generators: Vec<Box<dyn CandidateGenerator + 'a>> = Vec::with_capacity(config.direct_generators.len());
        for generator_config in config.direct_generators.iter() {
            generators.push(Box::new(
                self.build_direct_generator(generator_config, config.real_word_error_likelihood)?,
            ));
        }

        match generators.len() {
            0 => invalid_parameter("direct_generators", "at least one generator is required"),
            1 => Ok(generators.remove(0)),
            _ => {
                let size = config
                    .direct_generators
                    .iter()
                    .map(|generator_config| generator_config.size)
                    .max()
                    .unwrap_or(1);
                Ok(Box::new(MultiCandidateGenerator::new(size, generators)?))
            }
        }
    }

    fn to_option(config: &PhraseSuggestConfig, text: &str, result: &CorrectionResult, correction: &Correction) -> SuggestOption {
        let highlighted = config.highlight.as_ref().map(|highlight| {
            correction
                .highlight_source(text, &result.token_offsets, &highlight.pre_tag, &highlight.post_tag)
                .unwrap_or_else(|| correction.join_highlighted(OPTION_SEPARATOR, &highlight.pre_tag, &highlight.post_tag))
        });

        SuggestOption {
            text: correction.join(OPTION_SEPARATOR),
            highlighted,
            score: correction.score,
        }
    }

    /// Corrections of `text`, best first.
    ///
    /// With a positive confidence the unchanged phrase is never an option, so a correctly
    /// spelled phrase yields no options.
    pub fn suggest(&self, config: &PhraseSuggestConfig, text: &str) -> SuggestResult<PhraseSuggestion> {
        let generator = self.build_generator(config)?;
        let scorer = WordScorer::new(self.stats, config.scorer_field(), &config.separator, config.smoothing)?;
        let analyzer = self.analyzers.get(config.analyzer_field());

        let spell_checker = NoisyChannelSpellChecker::new(config.real_word_error_likelihood)
            .with_require_unigram(config.force_unigrams)
            .with_token_limit(config.token_limit);
        let result = spell_checker.get_corrections(
            analyzer,
            text,
            generator.as_ref(),
            config.max_errors,
            config.size,
            &scorer,
            config.confidence,
            config.gram_size,
        )?;

        let options: Vec<SuggestOption> = result
            .corrections
            .iter()
            .filter(|correction| {
                config.confidence <= 0.0
                    || correction.candidates.iter().any(|candidate| candidate.provenance != Provenance::UserInput)
            })
            .map(|correction| PhraseSuggester::to_option(config, text, &result, correction))
            .collect();

        i_debug!("{} options for \"{}\"", options.len(), text);

        Ok(PhraseSuggestion {
            cutoff_score: result.cutoff_score,
            options,
        })
    }
}

#[cfg(test)]
mod test {
    use pretty_assertions::assert_eq;

    use super::{PhraseSuggester, PhraseSuggestion};
    use crate::config::{DirectGeneratorConfig, HighlightConfig, PhraseSuggestConfig};
    use crate::correction::NO_IMPROVEMENT_CUTOFF;
    use crate::error::SuggestError;
    use crate::test_utils::summit_fixture;

    fn config() -> PhraseSuggestConfig {
        PhraseSuggestConfig {
            scorer_field: Some("body_ngram".to_owned()),
            highlight: Some(HighlightConfig::default()),
            ..PhraseSuggestConfig::default()
        }
    }

    fn reverse_generator() -> DirectGeneratorConfig {
        DirectGeneratorConfig {
            max_edits: 1,
            pre_filter: Some("body_reverse".to_owned()),
            post_filter: Some("body_reverse".to_owned()),
            ..DirectGeneratorConfig::for_field("body_reverse")
        }
    }

    fn texts(suggestion: &PhraseSuggestion) -> Vec<&str> {
        suggestion.options.iter().map(|option| option.text.as_str()).collect()
    }

    #[test]
    fn test_suggest() {
        let fixture = summit_fixture();
        let suggester = PhraseSuggester::new(&fixture.index, &fixture.analyzers);

        let suggestion = suggester.suggest(&config(), "Mont Blaac").unwrap();
        assert_eq!(texts(&suggestion), vec!["mont blanc"]);
        assert_eq!(suggestion.options[0].highlighted.as_deref(), Some("Mont <em>blanc</em>"));
        assert!(suggestion.options[0].score > suggestion.cutoff_score);

        let without_highlight = PhraseSuggestConfig { highlight: None, ..config() };
        let suggestion = suggester.suggest(&without_highlight, "Mont Blaac").unwrap();
        assert_eq!(suggestion.options[0].highlighted, None);
    }

    #[test]
    fn test_correct_phrase_has_no_options() {
        let fixture = summit_fixture();
        let suggester = PhraseSuggester::new(&fixture.index, &fixture.analyzers);

        let suggestion = suggester.suggest(&config(), "mont blanc").unwrap();
        assert!(suggestion.options.is_empty());
        assert_eq!(suggestion.cutoff_score, NO_IMPROVEMENT_CUTOFF);

        let suggestion = suggester.suggest(&config(), "").unwrap();
        assert!(suggestion.options.is_empty());
    }

    #[test]
    fn test_multiple_generators() {
        let fixture = summit_fixture();
        let suggester = PhraseSuggester::new(&fixture.index, &fixture.analyzers);

        let forward_only = config();
        assert!(suggester.suggest(&forward_only, "mont vlanc").unwrap().options.is_empty());

        let with_reverse = PhraseSuggestConfig {
            direct_generators: vec![DirectGeneratorConfig::for_field("body"), reverse_generator()],
            ..config()
        };
        let suggestion = suggester.suggest(&with_reverse, "mont vlanc").unwrap();
        assert_eq!(texts(&suggestion)[0], "mont blanc");
        assert_eq!(suggestion.options[0].highlighted.as_deref(), Some("mont <em>blanc</em>"));
    }

    #[test]
    fn test_synonym_options() {
        let fixture = summit_fixture();
        let suggester = PhraseSuggester::new(&fixture.index, &fixture.analyzers);

        let with_synonyms = PhraseSuggestConfig {
            analyzer: Some("synonyms".to_owned()),
            confidence: 0.0,
            ..config()
        };
        let suggestion = suggester.suggest(&with_synonyms, "Piz").unwrap();
        assert_eq!(texts(&suggestion), vec!["piz", "bernina"]);
        assert_eq!(suggestion.options[1].highlighted.as_deref(), Some("bernina"));
    }

    #[test]
    fn test_configuration_errors() {
        let fixture = summit_fixture();
        let suggester = PhraseSuggester::new(&fixture.index, &fixture.analyzers);

        let unknown_field = PhraseSuggestConfig {
            direct_generators: vec![DirectGeneratorConfig::for_field("missing")],
            ..config()
        };
        match suggester.suggest(&unknown_field, "mont blaac") {
            Err(SuggestError::UnknownField(field)) => assert_eq!(field, "missing"),
            other => panic!("expected an unknown field, got {:?}", other),
        }

        let unknown_scorer_field = PhraseSuggestConfig {
            scorer_field: Some("missing_ngram".to_owned()),
            ..config()
        };
        assert!(matches!(
            suggester.suggest(&unknown_scorer_field, "mont blaac"),
            Err(SuggestError::UnknownField(_))
        ));

        let unknown_filter = PhraseSuggestConfig {
            direct_generators: vec![DirectGeneratorConfig {
                pre_filter: Some("missing_analyzer".to_owned()),
                ..reverse_generator()
            }],
            ..config()
        };
        assert!(matches!(
            suggester.suggest(&unknown_filter, "mont blaac"),
            Err(SuggestError::UnknownField(_))
        ));

        let no_generators = PhraseSuggestConfig { direct_generators: Vec::new(), ..config() };
        assert!(matches!(
            suggester.suggest(&no_generators, "mont blaac"),
            Err(SuggestError::InvalidParameter { name: "direct_generators", .. })
        ));

        let large_grams = PhraseSuggestConfig { gram_size: 4, ..config() };
        assert!(matches!(
            suggester.suggest(&large_grams, "mont blaac"),
            Err(SuggestError::InvalidParameter { name: "gram_size", .. })
        ));
    }
}

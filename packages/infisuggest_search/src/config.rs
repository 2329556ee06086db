#[cfg(feature = "config")]
use serde::{Deserialize, Serialize};

use crate::generator::SuggestMode;
use crate::scorer::Smoothing;

fn get_default_field() -> String {
    "body".to_owned()
}

fn get_default_gram_size() -> usize {
    2
}

fn get_default_real_word_error_likelihood() -> f64 {
    0.95
}

fn get_default_confidence() -> f64 {
    1.0
}

fn get_default_max_errors() -> f64 {
    1.0
}

fn get_default_size() -> usize {
    5
}

fn get_default_separator() -> String {
    " ".to_owned()
}

fn get_default_token_limit() -> usize {
    10
}

fn get_default_force_unigrams() -> bool {
    true
}

fn get_default_direct_generators() -> Vec<DirectGeneratorConfig> {
    vec![DirectGeneratorConfig::default()]
}

fn get_default_pre_tag() -> String {
    "<em>".to_owned()
}

fn get_default_post_tag() -> String {
    "</em>".to_owned()
}

fn get_default_accuracy() -> f64 {
    0.5
}

fn get_default_max_edits() -> u32 {
    2
}

fn get_default_max_inspections() -> usize {
    5
}

fn get_default_prefix_length() -> usize {
    1
}

fn get_default_min_word_length() -> usize {
    4
}

fn get_default_max_term_freq() -> f64 {
    0.01
}

#[cfg_attr(feature = "config", derive(Serialize, Deserialize))]
#[derive(Debug, Clone)]
pub struct HighlightConfig {
    #[cfg_attr(feature = "config", serde(default = "get_default_pre_tag"))]
    pub pre_tag: String,
    #[cfg_attr(feature = "config", serde(default = "get_default_post_tag"))]
    pub post_tag: String,
}

impl Default for HighlightConfig {
    fn default() -> Self {
        HighlightConfig {
            pre_tag: get_default_pre_tag(),
            post_tag: get_default_post_tag(),
        }
    }
}

/// Options of one phrase suggestion request.
#[cfg_attr(feature = "config", derive(Serialize, Deserialize))]
#[derive(Debug, Clone)]
pub struct PhraseSuggestConfig {
    /// Field whose dictionary provides the candidates and the unigram frequencies
    #[cfg_attr(feature = "config", serde(default = "get_default_field"))]
    pub field: String,
    /// Field whose analyzer tokenizes the query, defaults to `field`
    #[cfg_attr(feature = "config", serde(default))]
    pub analyzer: Option<String>,
    /// Shingled field the language model reads n-gram counts from, defaults to `field`
    #[cfg_attr(feature = "config", serde(default))]
    pub scorer_field: Option<String>,
    #[cfg_attr(feature = "config", serde(default = "get_default_gram_size"))]
    pub gram_size: usize,
    #[cfg_attr(feature = "config", serde(default = "get_default_real_word_error_likelihood"))]
    pub real_word_error_likelihood: f64,
    #[cfg_attr(feature = "config", serde(default = "get_default_confidence"))]
    pub confidence: f64,
    /// Absolute number of corrected terms when >= 1, otherwise a fraction of the query's terms
    #[cfg_attr(feature = "config", serde(default = "get_default_max_errors"))]
    pub max_errors: f64,
    #[cfg_attr(feature = "config", serde(default = "get_default_size"))]
    pub size: usize,
    #[cfg_attr(feature = "config", serde(default = "get_default_separator"))]
    pub separator: String,
    #[cfg_attr(feature = "config", serde(default = "get_default_token_limit"))]
    pub token_limit: usize,
    #[cfg_attr(feature = "config", serde(default = "get_default_force_unigrams"))]
    pub force_unigrams: bool,
    #[cfg_attr(feature = "config", serde(default))]
    pub highlight: Option<HighlightConfig>,
    #[cfg_attr(feature = "config", serde(default))]
    pub smoothing: Smoothing,
    #[cfg_attr(feature = "config", serde(default = "get_default_direct_generators"))]
    pub direct_generators: Vec<DirectGeneratorConfig>,
}

impl Default for PhraseSuggestConfig {
    fn default() -> Self {
        PhraseSuggestConfig {
            field: get_default_field(),
            analyzer: None,
            scorer_field: None,
            gram_size: get_default_gram_size(),
            real_word_error_likelihood: get_default_real_word_error_likelihood(),
            confidence: get_default_confidence(),
            max_errors: get_default_max_errors(),
            size: get_default_size(),
            separator: get_default_separator(),
            token_limit: get_default_token_limit(),
            force_unigrams: get_default_force_unigrams(),
            highlight: None,
            smoothing: Smoothing::default(),
            direct_generators: get_default_direct_generators(),
        }
    }
}

impl PhraseSuggestConfig {
    pub fn analyzer_field(&self) -> &str {
        self.analyzer.as_deref().unwrap_or(&self.field)
    }

    pub fn scorer_field(&self) -> &str {
        self.scorer_field.as_deref().unwrap_or(&self.field)
    }
}

#[cfg_attr(feature = "config", derive(Serialize, Deserialize))]
#[derive(Debug, Clone)]
pub struct DirectGeneratorConfig {
    #[cfg_attr(feature = "config", serde(default = "get_default_field"))]
    pub field: String,
    #[cfg_attr(feature = "config", serde(default))]
    pub suggest_mode: SuggestMode,
    /// Minimum string distance of a candidate
    #[cfg_attr(feature = "config", serde(default = "get_default_accuracy"))]
    pub accuracy: f64,
    #[cfg_attr(feature = "config", serde(default = "get_default_size"))]
    pub size: usize,
    #[cfg_attr(feature = "config", serde(default = "get_default_max_edits"))]
    pub max_edits: u32,
    #[cfg_attr(feature = "config", serde(default = "get_default_max_inspections"))]
    pub max_inspections: usize,
    #[cfg_attr(feature = "config", serde(default = "get_default_prefix_length"))]
    pub prefix_length: usize,
    #[cfg_attr(feature = "config", serde(default = "get_default_min_word_length"))]
    pub min_word_length: usize,
    /// Absolute doc freq when >= 1, otherwise a fraction of the field's documents
    #[cfg_attr(feature = "config", serde(default))]
    pub min_doc_freq: f64,
    /// Terms more frequent than this are assumed to be spelled correctly.
    /// Absolute doc freq when >= 1, otherwise a fraction of the field's documents
    #[cfg_attr(feature = "config", serde(default = "get_default_max_term_freq"))]
    pub max_term_freq: f64,
    /// Field whose analyzer is applied to the user's term before lookup
    #[cfg_attr(feature = "config", serde(default))]
    pub pre_filter: Option<String>,
    /// Field whose analyzer is applied to each candidate after lookup
    #[cfg_attr(feature = "config", serde(default))]
    pub post_filter: Option<String>,
}

impl Default for DirectGeneratorConfig {
    fn default() -> Self {
        DirectGeneratorConfig {
            field: get_default_field(),
            suggest_mode: SuggestMode::default(),
            accuracy: get_default_accuracy(),
            size: get_default_size(),
            max_edits: get_default_max_edits(),
            max_inspections: get_default_max_inspections(),
            prefix_length: get_default_prefix_length(),
            min_word_length: get_default_min_word_length(),
            min_doc_freq: 0.0,
            max_term_freq: get_default_max_term_freq(),
            pre_filter: None,
            post_filter: None,
        }
    }
}

impl DirectGeneratorConfig {
    pub fn for_field(field: &str) -> Self {
        DirectGeneratorConfig {
            field: field.to_owned(),
            ..DirectGeneratorConfig::default()
        }
    }
}

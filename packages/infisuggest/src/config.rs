use std::path::Path;
use std::sync::Arc;

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use infisuggest_common::tokenize::{AnalyzerRef, PerFieldAnalyzer};
use infisuggest_lang_ascii::ascii::{self, TokenizerOptions};
use infisuggest_lang_ascii::reverse::ReverseFilter;
use infisuggest_lang_ascii::shingle::{ShingleFilter, ShingleOptions};
use infisuggest_lang_ascii::synonym::SynonymFilter;
use infisuggest_search::config::PhraseSuggestConfig;

pub const STANDARD_ANALYZER: &str = "standard";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("configuration does not match the schema: {0}")]
    Json(#[from] serde_json::Error),
    #[error("no analyzer named `{0}`")]
    UnknownAnalyzer(String),
    #[error("analyzer `{0}` is defined in terms of itself")]
    AnalyzerCycle(String),
}

/// Analyzer definitions, named in `InfiSuggestConfig::analyzers`.
///
/// Filters wrap another named analyzer, the standard tokenizer if `base` is omitted.
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AnalyzerConfig {
    Standard(TokenizerOptions),
    Shingle {
        #[serde(default)]
        base: Option<String>,
        #[serde(flatten)]
        options: ShingleOptions,
    },
    Reverse {
        #[serde(default)]
        base: Option<String>,
    },
    Synonym {
        #[serde(default)]
        base: Option<String>,
        rules: Vec<String>,
    },
}

impl AnalyzerConfig {
    fn base(&self) -> Option<&str> {
        match self {
            AnalyzerConfig::Standard(_) => None,
            AnalyzerConfig::Shingle { base, .. }
            | AnalyzerConfig::Reverse { base }
            | AnalyzerConfig::Synonym { base, .. } => base.as_deref(),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct FieldConfig {
    pub name: String,
    pub analyzer: String,
}

fn get_default_analyzers() -> FxHashMap<String, AnalyzerConfig> {
    let mut analyzers = FxHashMap::default();

    analyzers.insert(STANDARD_ANALYZER.to_owned(), AnalyzerConfig::Standard(TokenizerOptions::default()));
    analyzers.insert("shingle".to_owned(), AnalyzerConfig::Shingle { base: None, options: ShingleOptions::default() });
    analyzers.insert("reverse".to_owned(), AnalyzerConfig::Reverse { base: None });

    analyzers
}

fn get_default_fields() -> Vec<FieldConfig> {
    vec![
        FieldConfig { name: "body".to_owned(), analyzer: STANDARD_ANALYZER.to_owned() },
        FieldConfig { name: "body_ngram".to_owned(), analyzer: "shingle".to_owned() },
        FieldConfig { name: "body_reverse".to_owned(), analyzer: "reverse".to_owned() },
    ]
}

fn get_default_suggest_config() -> PhraseSuggestConfig {
    PhraseSuggestConfig {
        scorer_field: Some("body_ngram".to_owned()),
        ..PhraseSuggestConfig::default()
    }
}

fn get_default_num_threads() -> usize {
    std::cmp::max(std::cmp::min(num_cpus::get_physical(), num_cpus::get()) - 1, 1)
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct InfiSuggestConfig {
    #[serde(default = "get_default_analyzers")]
    pub analyzers: FxHashMap<String, AnalyzerConfig>,

    /// Every corpus line is indexed into each of these fields
    #[serde(default = "get_default_fields")]
    pub fields: Vec<FieldConfig>,

    #[serde(default = "get_default_suggest_config")]
    pub suggest_config: PhraseSuggestConfig,

    #[serde(default = "get_default_num_threads", skip_serializing)]
    pub num_threads: usize,
}

impl Default for InfiSuggestConfig {
    fn default() -> Self {
        InfiSuggestConfig {
            analyzers: get_default_analyzers(),
            fields: get_default_fields(),
            suggest_config: get_default_suggest_config(),
            num_threads: get_default_num_threads(),
        }
    }
}

impl InfiSuggestConfig {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let raw_config = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_string_lossy().into_owned(),
            source,
        })?;

        Ok(serde_json::from_str(&raw_config)?)
    }

    fn resolve_analyzer(
        &self,
        name: &str,
        resolved: &mut FxHashMap<String, AnalyzerRef>,
        resolving: &mut Vec<String>,
    ) -> Result<AnalyzerRef, ConfigError> {
        if let Some(analyzer) = resolved.get(name) {
            return Ok(Arc::clone(analyzer));
        }
        if resolving.iter().any(|pending| pending == name) {
            return Err(ConfigError::AnalyzerCycle(name.to_owned()));
        }

        let analyzer_config = match self.analyzers.get(name) {
            Some(analyzer_config) => analyzer_config,
            None if name == STANDARD_ANALYZER => return Ok(Arc::new(ascii::Tokenizer::default())),
            None => return Err(ConfigError::UnknownAnalyzer(name.to_owned())),
        };

        resolving.push(name.to_owned());
        let base = match analyzer_config.base() {
            Some(base) => Some(self.resolve_analyzer(base, resolved, resolving)?),
            None => None,
        };
        resolving.pop();

        let inner = || base.clone().unwrap_or_else(|| Arc::new(ascii::Tokenizer::default()) as AnalyzerRef);
        let analyzer: AnalyzerRef = match analyzer_config {
            AnalyzerConfig::Standard(options) => Arc::new(ascii::new_with_options(options.clone())),
            AnalyzerConfig::Shingle { options, .. } => Arc::new(ShingleFilter::new(inner(), options.clone())),
            AnalyzerConfig::Reverse { .. } => Arc::new(ReverseFilter::new(inner())),
            AnalyzerConfig::Synonym { rules, .. } => Arc::new(SynonymFilter::new(inner(), rules.as_slice())),
        };

        resolved.insert(name.to_owned(), Arc::clone(&analyzer));
        Ok(analyzer)
    }

    /// Analyzers keyed by field name, and additionally by analyzer name where that
    /// does not shadow a field, so suggest requests may reference either.
    pub fn build_analyzers(&self) -> Result<PerFieldAnalyzer, ConfigError> {
        let mut resolved: FxHashMap<String, AnalyzerRef> = FxHashMap::default();
        let mut resolving = Vec::new();

        let default_analyzer = self.resolve_analyzer(STANDARD_ANALYZER, &mut resolved, &mut resolving)?;
        let mut per_field = PerFieldAnalyzer::new(default_analyzer);

        for field in self.fields.iter() {
            let analyzer = self.resolve_analyzer(&field.analyzer, &mut resolved, &mut resolving)?;
            per_field.add_field(&field.name, analyzer);
        }

        let mut names: Vec<&String> = self.analyzers.keys().collect();
        names.sort();
        for name in names {
            let analyzer = self.resolve_analyzer(name, &mut resolved, &mut resolving)?;
            if !per_field.has_field(name) {
                per_field.add_field(name, analyzer);
            }
        }

        Ok(per_field)
    }
}

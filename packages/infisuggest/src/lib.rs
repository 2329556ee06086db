pub mod config;
pub mod loader;
pub mod utils;
pub mod worker;

use std::io::BufRead;
use std::sync::Arc;

use infisuggest_common::index::MemoryIndex;
use infisuggest_common::tokenize::PerFieldAnalyzer;
use infisuggest_search::config::PhraseSuggestConfig;
use infisuggest_search::{PhraseSuggester, PhraseSuggestion, SuggestResult};

pub use config::{ConfigError, InfiSuggestConfig};

pub const INFISUGGEST_VERSION: &str = env!("CARGO_PKG_VERSION");

/// A loaded corpus together with the request configuration, cheap to clone across threads.
#[derive(Clone)]
pub struct Suggester {
    index: Arc<MemoryIndex>,
    analyzers: Arc<PerFieldAnalyzer>,
    suggest_config: Arc<PhraseSuggestConfig>,
}

impl Suggester {
    pub fn new(index: MemoryIndex, analyzers: PerFieldAnalyzer, suggest_config: PhraseSuggestConfig) -> Self {
        Suggester {
            index: Arc::new(index),
            analyzers: Arc::new(analyzers),
            suggest_config: Arc::new(suggest_config),
        }
    }

    /// Builds the analyzers of `config` and indexes the corpus read from `reader` with them.
    pub fn from_corpus<R: BufRead>(config: &InfiSuggestConfig, reader: R) -> Result<Self, ConfigError> {
        let analyzers = config.build_analyzers()?;
        let index = loader::load_corpus(reader, &config.fields, &analyzers).map_err(|source| ConfigError::Io {
            path: "corpus".to_owned(),
            source,
        })?;

        Ok(Suggester::new(index, analyzers, config.suggest_config.clone()))
    }

    pub fn suggest(&self, text: &str) -> SuggestResult<PhraseSuggestion> {
        PhraseSuggester::new(self.index.as_ref(), self.analyzers.as_ref()).suggest(&self.suggest_config, text)
    }
}

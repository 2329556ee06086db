use regex::Regex;
#[cfg(feature = "config")]
use serde::{Deserialize, Serialize};

use infisuggest_common::tokenize::{Analyzer, Token};

lazy_static! {
    static ref WORD_MATCHER: Regex = Regex::new(r"[\p{L}\p{N}]+(?:['’][\p{L}\p{N}]+)*").unwrap();
}

fn get_default_lowercase() -> bool {
    true
}

fn get_default_max_term_len() -> usize {
    80
}

#[cfg_attr(feature = "config", derive(Serialize, Deserialize))]
#[derive(Debug, Clone)]
pub struct TokenizerOptions {
    #[cfg_attr(feature = "config", serde(default = "get_default_lowercase"))]
    pub lowercase: bool,
    #[cfg_attr(feature = "config", serde(default = "get_default_max_term_len"))]
    pub max_term_len: usize,
}

impl Default for TokenizerOptions {
    fn default() -> Self {
        TokenizerOptions {
            lowercase: get_default_lowercase(),
            max_term_len: get_default_max_term_len(),
        }
    }
}

/// Splits text into runs of letters and digits (allowing inner apostrophes),
/// keeping the byte offsets of every run.
pub struct Tokenizer {
    lowercase: bool,
    max_term_len: usize,
}

impl Default for Tokenizer {
    fn default() -> Tokenizer {
        new_with_options(TokenizerOptions::default())
    }
}

pub fn new_with_options(options: TokenizerOptions) -> Tokenizer {
    Tokenizer {
        lowercase: options.lowercase,
        max_term_len: options.max_term_len,
    }
}

impl Analyzer for Tokenizer {
    fn analyze(&self, text: &str) -> Vec<Token> {
        WORD_MATCHER
            .find_iter(text)
            .filter(|word| word.as_str().len() <= self.max_term_len)
            .map(|word| {
                let term = if self.lowercase {
                    word.as_str().to_lowercase()
                } else {
                    word.as_str().to_owned()
                };
                Token::word(term, word.start(), word.end())
            })
            .collect()
    }
}

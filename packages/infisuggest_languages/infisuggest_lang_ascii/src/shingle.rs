#[cfg(feature = "config")]
use serde::{Deserialize, Serialize};

use infisuggest_common::tokenize::{Analyzer, AnalyzerRef, Token, TokenKind};

fn get_default_min_shingle_size() -> usize {
    2
}

fn get_default_max_shingle_size() -> usize {
    3
}

fn get_default_output_unigrams() -> bool {
    true
}

fn get_default_token_separator() -> String {
    " ".to_owned()
}

#[cfg_attr(feature = "config", derive(Serialize, Deserialize))]
#[derive(Debug, Clone)]
pub struct ShingleOptions {
    #[cfg_attr(feature = "config", serde(default = "get_default_min_shingle_size"))]
    pub min_shingle_size: usize,
    #[cfg_attr(feature = "config", serde(default = "get_default_max_shingle_size"))]
    pub max_shingle_size: usize,
    #[cfg_attr(feature = "config", serde(default = "get_default_output_unigrams"))]
    pub output_unigrams: bool,
    #[cfg_attr(feature = "config", serde(default = "get_default_token_separator"))]
    pub token_separator: String,
}

impl Default for ShingleOptions {
    fn default() -> Self {
        ShingleOptions {
            min_shingle_size: get_default_min_shingle_size(),
            max_shingle_size: get_default_max_shingle_size(),
            output_unigrams: get_default_output_unigrams(),
            token_separator: get_default_token_separator(),
        }
    }
}

/// Emits word n-grams of the wrapped analyzer's output.
///
/// Shingles are stacked on the position of their first word.
pub struct ShingleFilter {
    inner: AnalyzerRef,
    min_shingle_size: usize,
    max_shingle_size: usize,
    output_unigrams: bool,
    token_separator: String,
}

impl ShingleFilter {
    pub fn new(inner: AnalyzerRef, options: ShingleOptions) -> Self {
        let min_shingle_size = options.min_shingle_size.max(2);
        ShingleFilter {
            inner,
            min_shingle_size,
            max_shingle_size: options.max_shingle_size.max(min_shingle_size),
            output_unigrams: options.output_unigrams,
            token_separator: options.token_separator,
        }
    }
}

impl Analyzer for ShingleFilter {
    fn analyze(&self, text: &str) -> Vec<Token> {
        let words: Vec<Token> = self.inner
            .analyze(text)
            .into_iter()
            .filter(|token| !token.is_stacked())
            .collect();

        let mut output = Vec::with_capacity(words.len() * (self.max_shingle_size - self.min_shingle_size + 2));
        let mut pending_increment = 0;

        for (idx, word) in words.iter().enumerate() {
            pending_increment += word.position_increment;

            if self.output_unigrams {
                output.push(Token {
                    position_increment: pending_increment,
                    ..word.clone()
                });
                pending_increment = 0;
            }

            for size in self.min_shingle_size..=self.max_shingle_size {
                if idx + size > words.len() {
                    break;
                }

                let window = &words[idx..idx + size];
                let term = window
                    .iter()
                    .map(|token| token.term.as_str())
                    .collect::<Vec<_>>()
                    .join(&self.token_separator);

                output.push(Token {
                    term,
                    start_offset: word.start_offset,
                    end_offset: window[size - 1].end_offset,
                    position_increment: pending_increment,
                    kind: TokenKind::Shingle,
                });
                pending_increment = 0;
            }
        }

        output
    }
}

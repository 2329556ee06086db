use std::sync::Arc;

use rustc_hash::FxHashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    Word,
    Shingle,
    Synonym,
}

/// One output unit of an analyzer.
///
/// Offsets are byte offsets into the analyzed text, so the user's original
/// spelling can be recovered with `&text[start_offset..end_offset]`.
/// A `position_increment` of 0 stacks the token on the previous position.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub term: String,
    pub start_offset: usize,
    pub end_offset: usize,
    pub position_increment: u32,
    pub kind: TokenKind,
}

impl Token {
    pub fn word(term: String, start_offset: usize, end_offset: usize) -> Self {
        Token {
            term,
            start_offset,
            end_offset,
            position_increment: 1,
            kind: TokenKind::Word,
        }
    }

    #[inline]
    pub fn is_stacked(&self) -> bool {
        self.position_increment == 0
    }
}

pub trait Analyzer: Send + Sync {
    fn analyze(&self, text: &str) -> Vec<Token>;
}

pub type AnalyzerRef = Arc<dyn Analyzer>;

/// Field name to analyzer lookup, falling back to a default analyzer for unknown fields.
pub struct PerFieldAnalyzer {
    default_analyzer: AnalyzerRef,
    analyzers: FxHashMap<String, AnalyzerRef>,
}

impl PerFieldAnalyzer {
    pub fn new(default_analyzer: AnalyzerRef) -> Self {
        PerFieldAnalyzer {
            default_analyzer,
            analyzers: FxHashMap::default(),
        }
    }

    pub fn with_field(mut self, field: &str, analyzer: AnalyzerRef) -> Self {
        self.add_field(field, analyzer);
        self
    }

    pub fn add_field(&mut self, field: &str, analyzer: AnalyzerRef) {
        self.analyzers.insert(field.to_owned(), analyzer);
    }

    pub fn has_field(&self, field: &str) -> bool {
        self.analyzers.contains_key(field)
    }

    pub fn get(&self, field: &str) -> &dyn Analyzer {
        self.analyzers
            .get(field)
            .map(|analyzer| analyzer.as_ref())
            .unwrap_or_else(|| self.default_analyzer.as_ref())
    }
}

impl Analyzer for PerFieldAnalyzer {
    fn analyze(&self, text: &str) -> Vec<Token> {
        self.default_analyzer.analyze(text)
    }
}

#[cfg(test)]
mod test {
    use std::sync::Arc;

    use pretty_assertions::assert_eq;

    use super::{Analyzer, PerFieldAnalyzer, Token};

    struct Whitespace;

    impl Analyzer for Whitespace {
        fn analyze(&self, text: &str) -> Vec<Token> {
            let mut offset = 0;
            text.split(' ')
                .map(|part| {
                    let token = Token::word(part.to_owned(), offset, offset + part.len());
                    offset += part.len() + 1;
                    token
                })
                .collect()
        }
    }

    struct Upper;

    impl Analyzer for Upper {
        fn analyze(&self, text: &str) -> Vec<Token> {
            vec![Token::word(text.to_uppercase(), 0, text.len())]
        }
    }

    #[test]
    fn test_per_field_lookup() {
        let analyzers = PerFieldAnalyzer::new(Arc::new(Whitespace)).with_field("title", Arc::new(Upper));

        assert!(analyzers.has_field("title"));
        assert!(!analyzers.has_field("body"));
        assert_eq!(analyzers.get("title").analyze("mont blanc")[0].term, "MONT BLANC");

        let body_tokens = analyzers.get("body").analyze("mont blanc");
        assert_eq!(body_tokens.len(), 2);
        assert_eq!(body_tokens[1], Token::word("blanc".to_owned(), 5, 10));
    }
}

use regex::{Regex, RegexBuilder};

use crate::errors::{SearchError, SearchResult};

/// Suffixes accepted after the word, in alternation order
pub const SUFFIXES: [&str; 13] = [
    "s", "z", "d", "es", "ed", "er", "rs", "ers", "or", "ors", "ing", "in", "-",
];

/// Builds the pattern source for a word.
///
/// The word must start on a word boundary, may carry one suffix from
/// [`SUFFIXES`], and must be followed by a word boundary, whitespace, a hyphen,
/// an underscore or the end of the line. With `literal` unset the word is
/// embedded as-is, so metacharacters keep their regex meaning.
pub fn build_pattern(word: &str, literal: bool) -> String {
    let word = if literal {
        regex::escape(word)
    } else {
        word.to_string()
    };
    format!(r"\b({})({})?(\b|\s|-|_|$)", word, SUFFIXES.join("|"))
}

/// Matches log lines against the morphological variants of one word
#[derive(Debug, Clone)]
pub struct PatternMatcher {
    word: String,
    regex: Regex,
}

impl PatternMatcher {
    /// Compiles the case-insensitive pattern for `word`
    pub fn new(word: &str, literal: bool) -> SearchResult<Self> {
        let source = build_pattern(word, literal);
        let regex = RegexBuilder::new(&source)
            .case_insensitive(true)
            .build()
            .map_err(|e| SearchError::invalid_pattern(e.to_string()))?;

        Ok(Self {
            word: word.to_string(),
            regex,
        })
    }

    /// The word this matcher was built from
    pub fn word(&self) -> &str {
        &self.word
    }

    /// The compiled pattern source
    pub fn as_str(&self) -> &str {
        self.regex.as_str()
    }

    /// Returns true if the pattern occurs anywhere in `line`
    pub fn is_match(&self, line: &str) -> bool {
        self.regex.is_match(line)
    }

    /// Returns every line of `text` containing a match, verbatim
    pub fn matching_lines<'a>(&self, text: &'a str) -> Vec<&'a str> {
        text.lines().filter(|line| self.is_match(line)).collect()
    }
}

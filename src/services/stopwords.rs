// Stopword Dictionary
// Static word list used to filter low-signal tokens

use std::collections::HashSet;
use std::fs;
use std::path::Path;

const ENGLISH_STOPWORDS: &str = include_str!("../../resources/stopwords/english.txt");

/// Immutable set of stopwords, built once at startup and only read afterwards.
#[derive(Debug, Clone, Default)]
pub struct StopwordSet {
    words: HashSet<String>,
}

impl StopwordSet {
    /// The bundled English list (179 words)
    pub fn english() -> Self {
        Self::parse(ENGLISH_STOPWORDS)
    }

    /// Load a word list from disk, one word per line.
    /// Blank lines and `#` comments are skipped.
    pub fn from_file(path: &Path) -> Result<Self, std::io::Error> {
        let content = fs::read_to_string(path)?;
        Ok(Self::parse(&content))
    }

    pub fn parse(content: &str) -> Self {
        let words = content
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty() && !l.starts_with('#'))
            .map(str::to_lowercase)
            .collect();
        Self { words }
    }

    pub fn contains(&self, word: &str) -> bool {
        self.words.contains(word)
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}

impl<S: Into<String>> FromIterator<S> for StopwordSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self {
            words: iter.into_iter().map(Into::into).collect(),
        }
    }
}

use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Number of ranked words kept per analysis.
pub const TOP_N: usize = 10;

lazy_static! {
    // candidate runs only; `words` checks the neighbours
    static ref WORD: Regex = Regex::new(r"[a-z]{2,}").expect("valid regex");
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WordCount {
    pub word: String,
    pub count: u32,
}

impl WordCount {
    pub fn new(word: impl Into<String>, count: u32) -> Self {
        Self { word: word.into(), count }
    }
}

/// Ranked word counts: count descending, ties in first-seen order, at most [`TOP_N`] entries.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WordFrequency(Vec<WordCount>);

impl WordFrequency {
    /// Wraps rows that are already ranked, e.g. rows read back from a store.
    pub fn from_ranked(rows: Vec<WordCount>) -> Self {
        Self(rows)
    }

    pub fn as_slice(&self) -> &[WordCount] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, WordCount> {
        self.0.iter()
    }
}

impl<'a> IntoIterator for &'a WordFrequency {
    type Item = &'a WordCount;
    type IntoIter = std::slice::Iter<'a, WordCount>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// Runs of ASCII letters with no letter, digit or underscore on either side, so "caf" is not
/// pulled out of "café" and "note" is not pulled out of "note¹". Combining marks are not word
/// characters.
fn words(lowered: &str) -> impl Iterator<Item = &str> {
    WORD.find_iter(lowered)
        .filter(|m| {
            let before = lowered[..m.start()].chars().next_back();
            let after = lowered[m.end()..].chars().next();
            !before.is_some_and(is_word_char) && !after.is_some_and(is_word_char)
        })
        .map(|m| m.as_str())
}

/// Lowercased words of two or more ASCII letters, in source order.
pub fn tokenize(text: &str) -> Vec<String> {
    let lowered = text.to_lowercase();
    words(&lowered).map(str::to_string).collect()
}

/// The `n` most frequent words of `text`.
pub fn top_words(text: &str, n: usize) -> WordFrequency {
    let lowered = text.to_lowercase();
    let mut slots: HashMap<&str, usize> = HashMap::new();
    let mut counts: Vec<WordCount> = Vec::new();
    for word in words(&lowered) {
        match slots.get(word) {
            Some(&i) => counts[i].count += 1,
            None => {
                slots.insert(word, counts.len());
                counts.push(WordCount::new(word, 1));
            }
        }
    }
    // stable: equal counts keep first-seen order
    counts.sort_by(|a, b| b.count.cmp(&a.count));
    counts.truncate(n);
    WordFrequency(counts)
}

/// [`top_words`] with the standard cutoff of [`TOP_N`].
pub fn top_ten(text: &str) -> WordFrequency {
    top_words(text, TOP_N)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn basic_tokenize() {
        let t = tokenize("Running, runner's run! a 42 x9 ab12");
        assert_eq!(t, vec!["running", "runner", "run"]);
    }

    #[test]
    fn counts_are_exact() {
        let top = top_ten("whale whale WHALE ship");
        assert_eq!(top.as_slice()[0], WordCount::new("whale", 3));
        assert_eq!(top.as_slice()[1], WordCount::new("ship", 1));
    }

    #[test]
    fn neighbours_decide_word_boundaries() {
        assert_eq!(tokenize("_ab ab_ ab"), vec!["ab"]);
        assert_eq!(tokenize("\u{e9}ab ab\u{e9} (ab)"), vec!["ab"]);
    }

    #[test]
    fn empty_text_has_no_words() {
        assert!(top_ten("1 2 3 ... !").is_empty());
    }
}

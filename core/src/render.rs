//! Plain-text and row views of query results for front ends.

use crate::analyzer::DocumentRecord;
use crate::orchestrator::TitleOutcome;
use crate::tokenizer::WordFrequency;
use serde::Serialize;
use std::fmt::Write;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RankedWord {
    pub rank: usize,
    pub word: String,
    pub count: u32,
}

/// Serializable form of a [`TitleOutcome`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TitleView {
    Cached { title: String, words: Vec<RankedWord> },
    Located { title: String, location: String },
}

impl From<&TitleOutcome> for TitleView {
    fn from(outcome: &TitleOutcome) -> Self {
        match outcome {
            TitleOutcome::Cached { title, words } => TitleView::Cached { title: title.clone(), words: ranked(words) },
            TitleOutcome::Located { title, location } => {
                TitleView::Located { title: title.clone(), location: location.clone() }
            }
        }
    }
}

/// Serializable form of a [`DocumentRecord`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DocumentView {
    pub title: String,
    pub words: Vec<RankedWord>,
}

impl From<&DocumentRecord> for DocumentView {
    fn from(record: &DocumentRecord) -> Self {
        Self { title: record.title.clone(), words: ranked(&record.words) }
    }
}

/// Rows numbered from 1.
pub fn ranked(words: &WordFrequency) -> Vec<RankedWord> {
    words
        .iter()
        .enumerate()
        .map(|(i, wc)| RankedWord { rank: i + 1, word: wc.word.clone(), count: wc.count })
        .collect()
}

fn push_rows(out: &mut String, words: &WordFrequency) {
    for row in ranked(words) {
        let _ = writeln!(out, "{}) {}: {}", row.rank, row.word, row.count);
    }
}

pub fn title_outcome_text(outcome: &TitleOutcome) -> String {
    let mut out = String::new();
    match outcome {
        TitleOutcome::Cached { title, words } => {
            let _ = writeln!(out, "Top 10 Most Frequent Words in '{title}':\n");
            push_rows(&mut out, words);
        }
        TitleOutcome::Located { location, .. } => {
            let _ = writeln!(out, "Book Found Online:\n{location}\n");
            out.push_str("Copy and paste the link above into your browser\n");
        }
    }
    out
}

pub fn document_text(record: &DocumentRecord) -> String {
    let mut out = format!("{}\n\nTop 10 Most Frequent Words:\n\n", record.title);
    push_rows(&mut out, &record.words);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tokenizer::WordCount;

    fn words() -> WordFrequency {
        WordFrequency::from_ranked(vec![WordCount::new("the", 3), WordCount::new("cat", 2)])
    }

    #[test]
    fn cached_layout() {
        let text = title_outcome_text(&TitleOutcome::Cached { title: "Cats".into(), words: words() });
        assert_eq!(text, "Top 10 Most Frequent Words in 'Cats':\n\n1) the: 3\n2) cat: 2\n");
    }

    #[test]
    fn located_layout() {
        let outcome = TitleOutcome::Located { title: "Cats".into(), location: "https://www.gutenberg.org/ebooks/9".into() };
        assert_eq!(
            title_outcome_text(&outcome),
            "Book Found Online:\nhttps://www.gutenberg.org/ebooks/9\n\nCopy and paste the link above into your browser\n"
        );
    }

    #[test]
    fn document_layout() {
        let record = DocumentRecord { title: "Cats".into(), words: words() };
        assert_eq!(document_text(&record), "Cats\n\nTop 10 Most Frequent Words:\n\n1) the: 3\n2) cat: 2\n");
    }
}

use crate::error::{Error, Result};
use crate::fetch::Fetch;
use crate::tokenizer::{top_ten, WordFrequency};
use serde::{Deserialize, Serialize};
use tracing::info;

pub const TITLE_MARKER: &str = "Title:";
pub const UNKNOWN_TITLE: &str = "Unknown Title";
/// How far into a document the all-caps fallback looks.
pub const TITLE_SCAN_LINES: usize = 300;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentRecord {
    pub title: String,
    pub words: WordFrequency,
}

/// Title from a `Title:` header line, else the first all-caps line near the top, else [`UNKNOWN_TITLE`].
pub fn derive_title(text: &str) -> String {
    let marked = text
        .lines()
        .filter_map(|line| line.strip_prefix(TITLE_MARKER))
        .map(str::trim)
        .find(|rest| !rest.is_empty());
    if let Some(title) = marked {
        return title.to_string();
    }
    text.lines()
        .take(TITLE_SCAN_LINES)
        .map(str::trim)
        .find(|line| is_caps_heading(line))
        .unwrap_or(UNKNOWN_TITLE)
        .to_string()
}

/// Has a cased character, no lower-case ones, and 6 to 99 characters.
fn is_caps_heading(line: &str) -> bool {
    let len = line.chars().count();
    len > 5
        && len < 100
        && line.chars().any(char::is_uppercase)
        && !line.chars().any(char::is_lowercase)
}

/// Title and ranked words of an already decoded document. Boilerplate is counted along with the body.
pub fn analyze_text(text: &str) -> DocumentRecord {
    DocumentRecord { title: derive_title(text), words: top_ten(text) }
}

pub struct DocumentAnalyzer<'a, F> {
    fetcher: &'a F,
}

impl<'a, F: Fetch> DocumentAnalyzer<'a, F> {
    pub fn new(fetcher: &'a F) -> Self {
        Self { fetcher }
    }

    pub async fn analyze(&self, url: &str) -> Result<DocumentRecord> {
        let raw = self.fetcher.fetch(url).await.map_err(|e| Error::fetch(url, e))?;
        let text = String::from_utf8_lossy(&raw);
        let record = analyze_text(&text);
        info!(url, title = %record.title, bytes = raw.len(), "document analyzed");
        Ok(record)
    }
}

use crate::analyzer::{DocumentAnalyzer, DocumentRecord};
use crate::cache::{CacheStore, EntryId, ResultCache};
use crate::catalog::Catalog;
use crate::error::{Error, InputKind, Result};
use crate::fetch::Fetch;
use crate::resolver::TitleResolver;
use crate::tokenizer::WordFrequency;
use tracing::{info, warn};

/// What a title query produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TitleOutcome {
    /// Answered from the cache without touching the network.
    Cached { title: String, words: WordFrequency },
    /// Not cached; the catalog's landing page for the title. Nothing is fetched or saved.
    Located { title: String, location: String },
}

/// The two user-facing operations, wired to a fetcher, a store and a catalog.
pub struct QueryService<F, S> {
    fetcher: F,
    cache: ResultCache<S>,
    catalog: Catalog,
}

impl<F: Fetch, S: CacheStore> QueryService<F, S> {
    pub fn new(fetcher: F, store: S, catalog: Catalog) -> Self {
        Self { fetcher, cache: ResultCache::new(store), catalog }
    }

    pub fn cache(&self) -> &ResultCache<S> {
        &self.cache
    }

    pub async fn resolve_by_title(&self, input: &str) -> Result<TitleOutcome> {
        let title = input.trim();
        if title.is_empty() {
            return Err(Error::EmptyInput(InputKind::Title));
        }
        match self.cache.lookup(title)? {
            // an entry saved with no words is treated like a miss
            Some(words) if !words.is_empty() => {
                info!(title, "answered from cache");
                return Ok(TitleOutcome::Cached { title: title.to_string(), words });
            }
            _ => {}
        }
        let location = TitleResolver::new(&self.fetcher, &self.catalog)
            .resolve(title)
            .await
            .inspect_err(|e| warn!(title, error = %e, "title lookup failed"))?;
        Ok(TitleOutcome::Located { title: title.to_string(), location })
    }

    /// Analyzes the document and saves it under its derived title, even if that title is already cached.
    pub async fn resolve_by_url(&self, input: &str) -> Result<DocumentRecord> {
        let url = input.trim();
        if url.is_empty() {
            return Err(Error::EmptyInput(InputKind::Url));
        }
        let record = DocumentAnalyzer::new(&self.fetcher)
            .analyze(url)
            .await
            .inspect_err(|e| warn!(url, error = %e, "document analysis failed"))?;
        self.cache.save(&record.title, &record.words)?;
        Ok(record)
    }

    pub fn saved(&self) -> Result<Vec<(EntryId, String)>> {
        self.cache.entries()
    }
}

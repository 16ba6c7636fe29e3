use crate::error::{Result, StorageError};
use crate::tokenizer::{WordCount, WordFrequency};
use parking_lot::Mutex;
use std::collections::HashMap;
use tracing::{debug, info};

/// Ordinal key tying a saved title to its word rows. Assigned once, never reused.
pub type EntryId = u64;

/// Title and word-row tables behind the [`ResultCache`].
pub trait CacheStore: Send + Sync {
    /// Existing id for `title`, or max id + 1 (1 when empty), assigned atomically.
    fn upsert_title(&self, title: &str) -> std::result::Result<EntryId, StorageError>;
    /// Drops every row stored for `id` and stores `words` in their place.
    fn replace_words(&self, id: EntryId, words: &[WordCount]) -> std::result::Result<(), StorageError>;
    fn find_id(&self, title: &str) -> std::result::Result<Option<EntryId>, StorageError>;
    /// Rows for `id`, count descending.
    fn words_for(&self, id: EntryId) -> std::result::Result<Vec<WordCount>, StorageError>;
    /// All saved titles in id order.
    fn entries(&self) -> std::result::Result<Vec<(EntryId, String)>, StorageError>;
}

#[derive(Default)]
struct Tables {
    titles: HashMap<String, EntryId>,
    words: HashMap<EntryId, Vec<WordCount>>,
}

/// Process-local store, used by tests and throwaway sessions.
#[derive(Default)]
pub struct MemoryStore {
    tables: Mutex<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl CacheStore for MemoryStore {
    fn upsert_title(&self, title: &str) -> std::result::Result<EntryId, StorageError> {
        let mut tables = self.tables.lock();
        if let Some(&id) = tables.titles.get(title) {
            return Ok(id);
        }
        let id = tables.titles.values().max().map_or(1, |max| max + 1);
        tables.titles.insert(title.to_string(), id);
        Ok(id)
    }

    fn replace_words(&self, id: EntryId, words: &[WordCount]) -> std::result::Result<(), StorageError> {
        self.tables.lock().words.insert(id, words.to_vec());
        Ok(())
    }

    fn find_id(&self, title: &str) -> std::result::Result<Option<EntryId>, StorageError> {
        Ok(self.tables.lock().titles.get(title).copied())
    }

    fn words_for(&self, id: EntryId) -> std::result::Result<Vec<WordCount>, StorageError> {
        let mut rows = self.tables.lock().words.get(&id).cloned().unwrap_or_default();
        rows.sort_by(|a, b| b.count.cmp(&a.count));
        Ok(rows)
    }

    fn entries(&self) -> std::result::Result<Vec<(EntryId, String)>, StorageError> {
        let mut entries: Vec<(EntryId, String)> =
            self.tables.lock().titles.iter().map(|(title, &id)| (id, title.clone())).collect();
        entries.sort_by_key(|(id, _)| *id);
        Ok(entries)
    }
}

/// Title → top words memo that spares repeated title queries a network round trip.
pub struct ResultCache<S> {
    store: S,
}

impl<S: CacheStore> ResultCache<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Exact, case-sensitive title match. `None` is a miss, not a failure.
    pub fn lookup(&self, title: &str) -> Result<Option<WordFrequency>> {
        let Some(id) = self.store.find_id(title)? else {
            debug!(title, "cache miss");
            return Ok(None);
        };
        let mut rows = self.store.words_for(id)?;
        // stores are not trusted to keep row order
        rows.sort_by(|a, b| b.count.cmp(&a.count));
        debug!(title, id, rows = rows.len(), "cache hit");
        Ok(Some(WordFrequency::from_ranked(rows)))
    }

    /// Upserts `title`, replacing whatever rows it had before.
    pub fn save(&self, title: &str, words: &WordFrequency) -> Result<EntryId> {
        let id = self.store.upsert_title(title)?;
        self.store.replace_words(id, words.as_slice())?;
        info!(title, id, rows = words.len(), "cache entry saved");
        Ok(id)
    }

    pub fn entries(&self) -> Result<Vec<(EntryId, String)>> {
        Ok(self.store.entries()?)
    }
}

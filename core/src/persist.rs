use crate::cache::{CacheStore, EntryId};
use crate::error::StorageError;
use crate::tokenizer::WordCount;
use serde::{Deserialize, Serialize};
use sled::transaction::{ConflictableTransactionError, ConflictableTransactionResult, TransactionError};
use sled::Transactional;
use std::path::Path;
use time::format_description::well_known::Rfc3339;

const MAX_ID_KEY: &[u8] = b"max_id";

/// Value stored under an entry id in the `words` tree.
#[derive(Debug, Serialize, Deserialize)]
pub struct StoredWords {
    pub saved_at: String,
    pub rows: Vec<WordCount>,
}

/// One stored title with the time its rows were last replaced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SavedEntry {
    pub id: EntryId,
    pub title: String,
    /// `None` when the title has no rows yet.
    pub saved_at: Option<String>,
}

/// [`CacheStore`] on sled. Trees: `titles` (title → id), `words` (id → [`StoredWords`]),
/// `meta` (highest id handed out).
pub struct SledStore {
    db: sled::Db,
    titles: sled::Tree,
    words: sled::Tree,
    meta: sled::Tree,
}

impl SledStore {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, StorageError> {
        Self::from_db(sled::open(path)?)
    }

    /// Store deleted when dropped.
    pub fn temporary() -> Result<Self, StorageError> {
        Self::from_db(sled::Config::new().temporary(true).open()?)
    }

    fn from_db(db: sled::Db) -> Result<Self, StorageError> {
        let titles = db.open_tree("titles")?;
        let words = db.open_tree("words")?;
        let meta = db.open_tree("meta")?;
        Ok(Self { db, titles, words, meta })
    }

    /// When the rows for `id` were last replaced.
    pub fn saved_at(&self, id: EntryId) -> Result<Option<String>, StorageError> {
        Ok(self.load_words(id)?.map(|stored| stored.saved_at))
    }

    /// Every stored title in id order, with its save time. A row that cannot be read fails the
    /// whole listing.
    pub fn saved_entries(&self) -> Result<Vec<SavedEntry>, StorageError> {
        self.entries()?
            .into_iter()
            .map(|(id, title)| -> Result<SavedEntry, StorageError> {
                Ok(SavedEntry { id, title, saved_at: self.saved_at(id)? })
            })
            .collect()
    }

    fn load_words(&self, id: EntryId) -> Result<Option<StoredWords>, StorageError> {
        match self.words.get(id.to_be_bytes())? {
            Some(raw) => Ok(Some(bincode::deserialize(&raw)?)),
            None => Ok(None),
        }
    }
}

impl CacheStore for SledStore {
    fn upsert_title(&self, title: &str) -> Result<EntryId, StorageError> {
        let outcome = (&self.titles, &self.meta).transaction(
            |(titles, meta)| -> ConflictableTransactionResult<EntryId, StorageError> {
                if let Some(raw) = titles.get(title.as_bytes())? {
                    return decode_id(&raw).map_err(ConflictableTransactionError::Abort);
                }
                let max = match meta.get(MAX_ID_KEY)? {
                    Some(raw) => decode_id(&raw).map_err(ConflictableTransactionError::Abort)?,
                    None => 0,
                };
                let id = max + 1;
                meta.insert(MAX_ID_KEY, id.to_be_bytes().to_vec())?;
                titles.insert(title.as_bytes(), id.to_be_bytes().to_vec())?;
                Ok(id)
            },
        );
        match outcome {
            Ok(id) => Ok(id),
            Err(TransactionError::Abort(e)) => Err(e),
            Err(TransactionError::Storage(e)) => Err(e.into()),
        }
    }

    fn replace_words(&self, id: EntryId, words: &[WordCount]) -> Result<(), StorageError> {
        let stored = StoredWords {
            saved_at: time::OffsetDateTime::now_utc().format(&Rfc3339)?,
            rows: words.to_vec(),
        };
        self.words.insert(id.to_be_bytes(), bincode::serialize(&stored)?)?;
        self.db.flush()?;
        Ok(())
    }

    fn find_id(&self, title: &str) -> Result<Option<EntryId>, StorageError> {
        self.titles.get(title.as_bytes())?.map(|raw| decode_id(&raw)).transpose()
    }

    fn words_for(&self, id: EntryId) -> Result<Vec<WordCount>, StorageError> {
        let mut rows = self.load_words(id)?.map(|stored| stored.rows).unwrap_or_default();
        rows.sort_by(|a, b| b.count.cmp(&a.count));
        Ok(rows)
    }

    fn entries(&self) -> Result<Vec<(EntryId, String)>, StorageError> {
        let mut entries = Vec::new();
        for item in self.titles.iter() {
            let (key, raw) = item?;
            let title = String::from_utf8(key.to_vec())
                .map_err(|_| StorageError::Corrupt("title is not valid UTF-8".to_string()))?;
            entries.push((decode_id(&raw)?, title));
        }
        entries.sort_by_key(|(id, _)| *id);
        Ok(entries)
    }
}

fn decode_id(raw: &[u8]) -> Result<EntryId, StorageError> {
    <[u8; 8]>::try_from(raw)
        .map(EntryId::from_be_bytes)
        .map_err(|_| StorageError::Corrupt(format!("entry id has {} bytes", raw.len())))
}

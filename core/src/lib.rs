pub mod analyzer;
pub mod cache;
pub mod catalog;
pub mod error;
pub mod fetch;
pub mod links;
pub mod orchestrator;
pub mod persist;
pub mod render;
pub mod resolver;
pub mod tokenizer;

pub use analyzer::{DocumentAnalyzer, DocumentRecord};
pub use cache::{CacheStore, EntryId, MemoryStore, ResultCache};
pub use catalog::Catalog;
pub use error::{Error, InputKind, Result, StorageError, TransportError};
pub use fetch::Fetch;
pub use orchestrator::{QueryService, TitleOutcome};
pub use persist::{SavedEntry, SledStore};
pub use resolver::TitleResolver;
pub use tokenizer::{WordCount, WordFrequency};

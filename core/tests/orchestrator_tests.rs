use bookworm_core::{
    Catalog, CacheStore, Error, Fetch, InputKind, MemoryStore, QueryService, SledStore, TitleOutcome, TransportError,
};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// Serves canned bodies and counts requests.
#[derive(Default)]
struct StubFetcher {
    pages: HashMap<String, Vec<u8>>,
    calls: Arc<AtomicUsize>,
}

impl StubFetcher {
    fn with(mut self, url: &str, body: impl Into<Vec<u8>>) -> Self {
        self.pages.insert(url.to_string(), body.into());
        self
    }
}

impl Fetch for StubFetcher {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>, TransportError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.pages
            .get(url)
            .cloned()
            .ok_or_else(|| TransportError::Status { url: url.to_string(), status: 404 })
    }
}

const MOBY_URL: &str = "https://www.gutenberg.org/cache/epub/2701/pg2701.txt";
const MOBY_SEARCH: &str = "https://www.gutenberg.org/ebooks/search/?query=Moby%20Dick";

fn moby_text() -> String {
    let mut text = String::from("The Project Gutenberg eBook of Moby Dick\n\nTitle: Moby Dick\n\nAuthor: Herman Melville\n\n");
    for _ in 0..20 {
        text.push_str("Call me Ishmael. The whale, the whale! The sea and the ship.\n");
    }
    text
}

fn service(fetcher: StubFetcher) -> QueryService<StubFetcher, MemoryStore> {
    QueryService::new(fetcher, MemoryStore::new(), Catalog::default())
}

#[tokio::test]
async fn url_analysis_is_saved_and_served_from_cache() {
    let fetcher = StubFetcher::default().with(MOBY_URL, moby_text());
    let calls = fetcher.calls.clone();
    let svc = service(fetcher);

    let record = svc.resolve_by_url(&format!("  {MOBY_URL}\n")).await.unwrap();
    assert_eq!(record.title, "Moby Dick");
    assert_eq!(record.words.as_slice()[0].word, "the");
    assert_eq!(calls.load(Ordering::SeqCst), 1);

    let outcome = svc.resolve_by_title("Moby Dick").await.unwrap();
    assert_eq!(outcome, TitleOutcome::Cached { title: "Moby Dick".to_string(), words: record.words.clone() });
    assert_eq!(calls.load(Ordering::SeqCst), 1, "cache hit must not fetch");
}

#[tokio::test]
async fn title_miss_returns_location_without_saving() {
    let page = r#"<ul><li class="booklink"><a class="link" href="/ebooks/2701">Moby Dick</a></li></ul>"#;
    let fetcher = StubFetcher::default().with(MOBY_SEARCH, page);
    let calls = fetcher.calls.clone();
    let svc = service(fetcher);

    let outcome = svc.resolve_by_title(" Moby Dick ").await.unwrap();
    assert_eq!(
        outcome,
        TitleOutcome::Located { title: "Moby Dick".to_string(), location: "https://www.gutenberg.org/ebooks/2701".to_string() }
    );
    assert_eq!(calls.load(Ordering::SeqCst), 1, "only the search page is fetched");
    assert!(svc.cache().entries().unwrap().is_empty());
}

#[tokio::test]
async fn no_search_hits_is_not_found() {
    let fetcher = StubFetcher::default().with(MOBY_SEARCH, "<html><body>No results</body></html>");
    let err = service(fetcher).resolve_by_title("Moby Dick").await.unwrap_err();
    assert!(matches!(err, Error::NotFound { ref title } if title == "Moby Dick"));
}

#[tokio::test]
async fn failed_search_keeps_its_cause() {
    let err = service(StubFetcher::default()).resolve_by_title("Moby Dick").await.unwrap_err();
    assert!(matches!(err, Error::Lookup { .. }));
    let msg = err.to_string();
    assert!(msg.contains("Moby Dick"), "{msg}");
    assert!(msg.contains("HTTP 404"), "{msg}");
}

#[tokio::test]
async fn undecodable_search_page_is_a_lookup_error() {
    let fetcher = StubFetcher::default().with(MOBY_SEARCH, vec![0xff, 0xfe, b'<']);
    let err = service(fetcher).resolve_by_title("Moby Dick").await.unwrap_err();
    assert!(matches!(err, Error::Lookup { .. }));
}

#[tokio::test]
async fn failed_document_fetch_is_a_fetch_error_and_saves_nothing() {
    let svc = service(StubFetcher::default());
    let err = svc.resolve_by_url(MOBY_URL).await.unwrap_err();
    assert!(matches!(err, Error::Fetch { ref url, .. } if url == MOBY_URL));
    assert!(svc.cache().entries().unwrap().is_empty());
}

#[tokio::test]
async fn blank_input_is_a_user_error() {
    let fetcher = StubFetcher::default();
    let calls = fetcher.calls.clone();
    let svc = service(fetcher);
    let err = svc.resolve_by_title("   ").await.unwrap_err();
    assert!(matches!(err, Error::EmptyInput(InputKind::Title)));
    assert!(err.is_user_error());
    let err = svc.resolve_by_url("\t").await.unwrap_err();
    assert_eq!(err.to_string(), "Please enter a Project Gutenberg URL.");
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn document_bytes_are_decoded_lossily() {
    let mut body = b"Title: Broken \xff Bytes\n".to_vec();
    body.extend_from_slice(b"word word other\n");
    let url = "https://example.org/broken.txt";
    let record = service(StubFetcher::default().with(url, body)).resolve_by_url(url).await.unwrap();
    assert_eq!(record.title, "Broken \u{fffd} Bytes");
    assert_eq!(record.words.as_slice()[0].word, "word");
}

#[tokio::test]
async fn reanalysis_replaces_the_cached_words() {
    let url = "https://example.org/emma.txt";
    let fetcher = StubFetcher::default().with(url, "Title: Emma\nemma emma knightley\n");
    let svc = QueryService::new(fetcher, SledStore::temporary().unwrap(), Catalog::default());
    svc.resolve_by_url(url).await.unwrap();
    svc.resolve_by_url(url).await.unwrap();
    assert_eq!(svc.saved().unwrap(), vec![(1, "Emma".to_string())]);
    assert_eq!(svc.cache().store().find_id("Emma").unwrap(), Some(1));
}

#[tokio::test]
async fn empty_cached_entry_falls_back_to_the_catalog() {
    let url = "https://example.org/digits.txt";
    let search = "https://www.gutenberg.org/ebooks/search/?query=A%20B%20C%20D%20E%20F";
    let page = r#"<li class="booklink"><a href="/ebooks/31">n</a></li>"#;
    let fetcher = StubFetcher::default().with(url, "A B C D E F\n1 2 3\n").with(search, page);
    let svc = service(fetcher);
    let record = svc.resolve_by_url(url).await.unwrap();
    assert_eq!(record.title, "A B C D E F");
    assert!(record.words.is_empty());
    let outcome = svc.resolve_by_title("A B C D E F").await.unwrap();
    assert!(matches!(outcome, TitleOutcome::Located { .. }));
}

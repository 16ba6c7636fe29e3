use crate::links::LinkRules;
use url::{form_urlencoded, Url};

pub const DEFAULT_BASE_URL: &str = "https://www.gutenberg.org/";

/// Where and how to search the remote catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Catalog {
    pub base_url: Url,
    /// Search endpoint, relative to `base_url`.
    pub search_path: String,
    pub query_param: String,
    pub links: LinkRules,
}

impl Default for Catalog {
    fn default() -> Self {
        Self {
            base_url: Url::parse(DEFAULT_BASE_URL).expect("valid catalog url"),
            search_path: "ebooks/search/".to_string(),
            query_param: "query".to_string(),
            links: LinkRules::default(),
        }
    }
}

impl Catalog {
    /// The default catalog layout served from another host (a mirror, or a test server).
    pub fn with_base_url(base: &str) -> Result<Self, url::ParseError> {
        let base = if base.ends_with('/') { base.to_string() } else { format!("{base}/") };
        Ok(Self { base_url: Url::parse(&base)?, ..Self::default() })
    }

    /// The title is percent-encoded, spaces as `%20`.
    pub fn search_url(&self, title: &str) -> Result<Url, url::ParseError> {
        let mut url = self.base_url.join(&self.search_path)?;
        url.set_query(Some(&format!("{}={}", percent_encode(&self.query_param), percent_encode(title))));
        Ok(url)
    }

    /// Landing page for a catalog link, keyed by the link's last path segment.
    pub fn document_url(&self, link: &str) -> Option<Url> {
        let id = link.trim_end_matches('/').rsplit('/').next().filter(|s| !s.is_empty())?;
        let prefix = self.links.document_prefix.trim_start_matches('/');
        self.base_url.join(&format!("{prefix}{id}")).ok()
    }
}

fn percent_encode(value: &str) -> String {
    // a literal '+' comes out as %2B, so every '+' left is a space
    form_urlencoded::byte_serialize(value.as_bytes()).collect::<String>().replace('+', "%20")
}

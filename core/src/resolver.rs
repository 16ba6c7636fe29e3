use crate::catalog::Catalog;
use crate::error::{Error, Result};
use crate::fetch::Fetch;
use crate::links::LinkExtractor;
use tracing::{debug, info};

/// Turns a human-entered title into the landing page of the catalog's first hit.
pub struct TitleResolver<'a, F> {
    fetcher: &'a F,
    catalog: &'a Catalog,
}

impl<'a, F: Fetch> TitleResolver<'a, F> {
    pub fn new(fetcher: &'a F, catalog: &'a Catalog) -> Self {
        Self { fetcher, catalog }
    }

    /// Only the first search hit is used; the catalog's ranking decides.
    pub async fn resolve(&self, title: &str) -> Result<String> {
        let search_url = self.catalog.search_url(title).map_err(|e| Error::lookup(title, e))?;
        debug!(%search_url, "catalog search");
        let body = self.fetcher.fetch(search_url.as_str()).await.map_err(|e| Error::lookup(title, e))?;
        let html = String::from_utf8(body).map_err(|e| Error::lookup(title, e))?;

        let links = {
            let mut extractor = LinkExtractor::new(self.catalog.links.clone());
            extractor.feed(&html);
            extractor.finish()
        };
        debug!(title, links = links.len(), "search results scanned");

        let Some(first) = links.first() else {
            return Err(Error::NotFound { title: title.to_string() });
        };
        let location = self
            .catalog
            .document_url(first)
            .ok_or_else(|| Error::lookup(title, format!("unusable catalog link '{first}'")))?;
        info!(title, %location, "title resolved");
        Ok(location.to_string())
    }
}

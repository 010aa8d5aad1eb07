// src/fetch/mod.rs

use anyhow::{Context, Result};
use reqwest::Client;
use tracing::debug;
use url::Url;

pub mod paginate;

pub use paginate::fetch_all;

/// One request per page number, returning the raw markup of that page.
///
/// Any non-success response must surface as `Err`; the driver treats it as fatal.
#[allow(async_fn_in_trait)]
pub trait PageFetcher {
    async fn fetch_page(&self, page: u32) -> Result<String>;
}

/// Build the URL of a 1-based `page` by appending it as the `page` query value.
pub fn page_url(base: &Url, page: u32) -> Url {
    let mut url = base.clone();
    url.query_pairs_mut().append_pair("page", &page.to_string());
    url
}

/// `PageFetcher` backed by a shared `reqwest::Client`.
pub struct HttpPageFetcher {
    client: Client,
    base: Url,
}

impl HttpPageFetcher {
    pub fn new(client: Client, base_url: &str) -> Result<Self> {
        let base = Url::parse(base_url).with_context(|| format!("parsing base URL {}", base_url))?;
        Ok(Self { client, base })
    }
}

impl PageFetcher for HttpPageFetcher {
    async fn fetch_page(&self, page: u32) -> Result<String> {
        let url = page_url(&self.base, page);
        debug!(page, %url, "fetching page");
        self.client
            .get(url.clone())
            .send()
            .await
            .with_context(|| format!("GET {} failed", url))?
            .error_for_status()
            .with_context(|| format!("Non-success status for page {} ({})", page, url))?
            .text()
            .await
            .with_context(|| format!("Reading text from {}", url))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_is_appended_to_existing_query() -> Result<()> {
        let base = Url::parse("https://example.test/table?items_per_page=500&sort_order=ASC")?;
        let url = page_url(&base, 3);
        assert_eq!(
            url.as_str(),
            "https://example.test/table?items_per_page=500&sort_order=ASC&page=3"
        );
        // base is untouched, so the next page starts clean
        assert_eq!(page_url(&base, 4).query(), Some("items_per_page=500&sort_order=ASC&page=4"));
        Ok(())
    }

    #[test]
    fn bad_base_url_is_rejected() {
        assert!(HttpPageFetcher::new(Client::new(), "not a url").is_err());
    }
}

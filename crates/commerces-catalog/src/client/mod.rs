//! HTTP client for the paginated catalog `records` endpoint.

mod fetch_all;

use std::time::Duration;

use reqwest::{Client, Url};

use crate::error::FetchError;
use crate::types::CatalogPage;

/// Records requested per page. This is the server-enforced maximum.
pub const PAGE_SIZE: usize = 100;

/// Default number of pages fetched before giving up.
/// Guards against servers that ignore `offset` and keep returning full pages.
pub(super) const MAX_PAGES: usize = 1000;

/// HTTP client for the catalog API.
///
/// Non-2xx responses and undecodable bodies are typed errors. No request is
/// ever retried.
pub struct CatalogClient {
    pub(super) client: Client,
    pub(super) max_pages: usize,
}

impl CatalogClient {
    /// Creates a `CatalogClient` with a per-request timeout and `User-Agent`.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(timeout_secs: u64, user_agent: &str) -> Result<Self, FetchError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()?;
        Ok(Self {
            client,
            max_pages: MAX_PAGES,
        })
    }

    /// Overrides the pagination safety limit.
    #[must_use]
    pub fn with_max_pages(mut self, max_pages: usize) -> Self {
        self.max_pages = max_pages;
        self
    }

    /// Fetches one page of up to [`PAGE_SIZE`] records starting at `offset`.
    ///
    /// # Errors
    ///
    /// - [`FetchError::InvalidBaseUrl`]: `base_url` is not an http(s) URL.
    /// - [`FetchError::UnexpectedStatus`]: any non-2xx status.
    /// - [`FetchError::Http`]: network or TLS failure.
    /// - [`FetchError::Deserialize`]: response body is not a valid page.
    pub async fn fetch_page(
        &self,
        base_url: &str,
        offset: usize,
    ) -> Result<CatalogPage, FetchError> {
        let url = Self::page_url(base_url, PAGE_SIZE, offset)?;

        let response = self
            .client
            .get(&url)
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await?;
        let status = response.status();

        if !status.is_success() {
            return Err(FetchError::UnexpectedStatus {
                status: status.as_u16(),
                url,
            });
        }

        let body = response.text().await?;
        serde_json::from_str::<CatalogPage>(&body).map_err(|e| FetchError::Deserialize {
            context: format!("records page at offset {offset} from {base_url}"),
            source: e,
        })
    }

    /// Builds the page URL from `base_url`, replacing any `limit`/`offset`
    /// already present and keeping every other query parameter.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::InvalidBaseUrl`] if `base_url` does not parse or
    /// is not http(s).
    fn page_url(base_url: &str, limit: usize, offset: usize) -> Result<String, FetchError> {
        let mut url = Url::parse(base_url).map_err(|e| FetchError::InvalidBaseUrl {
            url: base_url.to_owned(),
            reason: e.to_string(),
        })?;

        if !matches!(url.scheme(), "http" | "https") {
            return Err(FetchError::InvalidBaseUrl {
                url: base_url.to_owned(),
                reason: format!("unsupported scheme \"{}\"", url.scheme()),
            });
        }

        let retained: Vec<(String, String)> = url
            .query_pairs()
            .filter(|(key, _)| key != "limit" && key != "offset")
            .map(|(key, value)| (key.into_owned(), value.into_owned()))
            .collect();

        url.query_pairs_mut()
            .clear()
            .extend_pairs(&retained)
            .append_pair("limit", &limit.to_string())
            .append_pair("offset", &offset.to_string());

        Ok(url.to_string())
    }
}

#[cfg(test)]
#[path = "../client_test.rs"]
mod tests;

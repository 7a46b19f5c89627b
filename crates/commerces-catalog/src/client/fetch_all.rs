//! Multi-page fetch loop for `CatalogClient`.

use commerces_core::{Dataset, Record};

use crate::error::FetchError;
use crate::normalize::normalize_all;

use super::{CatalogClient, PAGE_SIZE};

impl CatalogClient {
    /// Fetches every record from the catalog and normalizes it.
    ///
    /// # Errors
    ///
    /// Propagates any error from [`Self::fetch_all_records`].
    pub async fn fetch_all(&self, base_url: &str) -> Result<Dataset, FetchError> {
        let records = self.fetch_all_records(base_url).await?;
        Ok(normalize_all(records))
    }

    /// Fetches every raw record by walking `offset` in steps of [`PAGE_SIZE`].
    ///
    /// Stops after an empty page, or after a page shorter than [`PAGE_SIZE`]
    /// (which is kept). Pages are requested one at a time.
    ///
    /// **All-or-nothing semantics**: on any page failure, records from
    /// earlier pages are discarded and the error is returned.
    ///
    /// # Errors
    ///
    /// Propagates any error from [`Self::fetch_page`].
    /// Returns [`FetchError::PaginationLimit`] if more than the configured
    /// number of pages would be requested.
    pub async fn fetch_all_records(&self, base_url: &str) -> Result<Vec<Record>, FetchError> {
        let mut all_records: Vec<Record> = Vec::new();
        let mut offset = 0usize;
        let mut page_count = 0usize;

        loop {
            page_count += 1;
            if page_count > self.max_pages {
                return Err(FetchError::PaginationLimit {
                    url: base_url.to_owned(),
                    max_pages: self.max_pages,
                });
            }

            let page = self.fetch_page(base_url, offset).await?;
            let received = page.results.len();
            tracing::debug!(
                base_url,
                offset,
                received,
                total_count = page.total_count,
                "fetched catalog page"
            );

            if received == 0 {
                break;
            }

            all_records.extend(page.results);

            if received < PAGE_SIZE {
                break;
            }

            offset += PAGE_SIZE;
        }

        tracing::info!(
            base_url,
            records = all_records.len(),
            pages = page_count,
            "catalog fetch complete"
        );
        Ok(all_records)
    }
}

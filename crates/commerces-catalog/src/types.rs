//! Response types for the Opendatasoft `records` endpoint.
//!
//! Observed shape:
//!
//! ```text
//! {"total_count": 412, "results": [{"commerce": "Presse", "dea_nom_commerce": "...", ...}]}
//! ```
//!
//! Record fields differ between dataset revisions (`commerce` vs
//! `tco_libelle`, `geocodage_ban` as an object or a `"lat,lon"` string), so
//! records are kept as untyped JSON objects and reconciled in
//! [`crate::normalize`].

use commerces_core::Record;
use serde::Deserialize;

/// One page of `GET <records>?limit=&offset=`.
#[derive(Debug, Deserialize)]
pub struct CatalogPage {
    /// Total matching records as reported by the server. Logged only; the
    /// fetch loop stops on short pages instead.
    #[serde(default)]
    pub total_count: Option<u64>,

    /// A body without `results` is treated as an empty page.
    #[serde(default)]
    pub results: Vec<Record>,
}

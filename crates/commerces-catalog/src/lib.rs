pub mod cache;
pub mod catalog;
pub mod client;
pub mod error;
pub mod normalize;
pub mod types;

pub use cache::FetchCache;
pub use catalog::Catalog;
pub use client::{CatalogClient, PAGE_SIZE};
pub use error::FetchError;
pub use normalize::{normalize, normalize_all};
pub use types::CatalogPage;

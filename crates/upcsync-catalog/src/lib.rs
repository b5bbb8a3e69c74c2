pub mod client;
pub mod error;
pub mod flatten;
pub mod pagination;
pub(crate) mod retry;
pub mod types;

pub use client::{CatalogClient, RawResponse};
pub use error::CatalogError;
pub use flatten::flatten;
pub use pagination::{catalog_url, PageCursor};
pub use types::{CatalogPage, RawBarcode, Sku, Style, StyleColor};

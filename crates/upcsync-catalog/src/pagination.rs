//! Catalog URL construction and cursor-link page traversal.
//!
//! The first page of a unit is addressed by URL; every later page is reached
//! through the literal `_links.next.href` of the page before it. The loop is
//! bounded by the `totalPages` reported on the first page, counting only
//! pages that parsed successfully.

use reqwest::Url;

use crate::error::CatalogError;
use crate::types::CatalogPage;

/// Builds the first-page URL for a business unit:
/// `{base}/catalog/{unit}?size={page_size}&includeSkus=true&approvalStatus=APPROVED`.
///
/// # Errors
///
/// Returns [`CatalogError::InvalidBaseUrl`] if `base_url` does not form a
/// valid absolute URL.
pub fn catalog_url(base_url: &str, unit_code: &str, page_size: u32) -> Result<String, CatalogError> {
    let raw = format!(
        "{}/catalog/{}",
        base_url.trim_end_matches('/'),
        unit_code.trim_matches('/')
    );
    let mut url = Url::parse(&raw).map_err(|e| CatalogError::InvalidBaseUrl {
        base_url: base_url.to_owned(),
        reason: e.to_string(),
    })?;

    url.query_pairs_mut()
        .append_pair("size", &page_size.to_string())
        .append_pair("includeSkus", "true")
        .append_pair("approvalStatus", "APPROVED");

    Ok(url.to_string())
}

/// Traversal state for the pages after the first.
///
/// Only created when the first page carried a next link; without one the
/// unit is finished after a single page no matter what `totalPages` says.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageCursor {
    total_pages: u32,
    current_index: u32,
    next_link: String,
}

impl PageCursor {
    /// Starts the cursor from a successfully parsed first page.
    #[must_use]
    pub fn after_first_page(first: &CatalogPage) -> Option<Self> {
        first.next_href().map(|href| Self {
            total_pages: first.total_pages(),
            current_index: 1,
            next_link: href.to_owned(),
        })
    }

    /// URL of the next page to fetch, or `None` once `totalPages` is reached.
    #[must_use]
    pub fn next_url(&self) -> Option<&str> {
        (self.current_index < self.total_pages).then_some(self.next_link.as_str())
    }

    /// Records a successfully parsed page.
    ///
    /// The stored link is replaced only when the page carries a new one.
    pub fn advance(&mut self, page: &CatalogPage) {
        if let Some(href) = page.next_href() {
            href.clone_into(&mut self.next_link);
        }
        self.current_index += 1;
    }

    #[must_use]
    pub fn pages_seen(&self) -> u32 {
        self.current_index
    }

    #[must_use]
    pub fn total_pages(&self) -> u32 {
        self.total_pages
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn page(total_pages: u32, next: Option<&str>) -> CatalogPage {
        let links = match next {
            Some(href) => json!({ "next": { "href": href } }),
            None => json!({}),
        };
        let body = json!({
            "page": { "totalPages": total_pages },
            "_embedded": { "styles": [] },
            "_links": links
        });
        CatalogPage::parse(&body.to_string()).unwrap()
    }

    #[test]
    fn catalog_url_has_fixed_query() {
        let url = catalog_url("https://api.gap.com/commerce/product-catalogs", "br/us", 200)
            .unwrap();
        assert_eq!(
            url,
            "https://api.gap.com/commerce/product-catalogs/catalog/br/us?size=200&includeSkus=true&approvalStatus=APPROVED"
        );
    }

    #[test]
    fn catalog_url_tolerates_trailing_slash() {
        let url = catalog_url("http://127.0.0.1:9999/", "gpfs/us", 50).unwrap();
        assert_eq!(
            url,
            "http://127.0.0.1:9999/catalog/gpfs/us?size=50&includeSkus=true&approvalStatus=APPROVED"
        );
    }

    #[test]
    fn catalog_url_rejects_relative_base() {
        let err = catalog_url("not a url", "br/us", 200).unwrap_err();
        assert!(matches!(err, CatalogError::InvalidBaseUrl { .. }));
    }

    #[test]
    fn no_next_link_means_no_cursor() {
        assert!(PageCursor::after_first_page(&page(12, None)).is_none());
    }

    #[test]
    fn cursor_yields_total_minus_one_more_pages() {
        let mut cursor = PageCursor::after_first_page(&page(3, Some("p2"))).unwrap();

        assert_eq!(cursor.next_url(), Some("p2"));
        cursor.advance(&page(3, Some("p3")));
        assert_eq!(cursor.next_url(), Some("p3"));
        cursor.advance(&page(3, None));
        assert_eq!(cursor.next_url(), None);
        assert_eq!(cursor.pages_seen(), 3);
    }

    #[test]
    fn cursor_with_single_total_page_stops_immediately() {
        let cursor = PageCursor::after_first_page(&page(1, Some("p2"))).unwrap();
        assert_eq!(cursor.next_url(), None);
    }

    #[test]
    fn missing_link_on_later_page_keeps_previous_link() {
        let mut cursor = PageCursor::after_first_page(&page(4, Some("p2"))).unwrap();
        cursor.advance(&page(4, None));
        assert_eq!(cursor.next_url(), Some("p2"));
    }
}

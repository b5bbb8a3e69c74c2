//! Response types for `GET /catalog/{businessUnit}`.
//!
//! ## Observed shape
//!
//! ```text
//! {
//!   "page":      { "totalPages": 37, ... },
//!   "_embedded": { "styles": [ { "styleColors": [ { "skus": [ {...} ] } ] } ] },
//!   "_links":    { "self": {...}, "next": { "href": "https://..." } }
//! }
//! ```
//!
//! `page`, `_embedded.styles` and `_links` must be present; anything else is
//! a malformed response. `_links.next` is absent on the last page.
//!
//! SKU identifiers arrive as JSON numbers on most units and as numeric
//! strings on some. Both are accepted; anything else fails the page.
//!
//! Barcodes are kept as delivered ([`RawBarcode`]) and only converted when a
//! business unit's variant reads that field, so junk in the field a unit
//! ignores never fails the page. An empty string barcode is treated as
//! absent.

use serde::de::{self, Deserializer};
use serde::Deserialize;

use crate::error::CatalogError;

/// One page of the catalog, as returned by the API.
#[derive(Debug, Deserialize)]
pub struct CatalogPage {
    pub page: PageMetadata,

    #[serde(rename = "_embedded")]
    pub embedded: Embedded,

    #[serde(rename = "_links")]
    pub links: Links,
}

#[derive(Debug, Deserialize)]
pub struct PageMetadata {
    #[serde(rename = "totalPages")]
    pub total_pages: u32,
}

#[derive(Debug, Deserialize)]
pub struct Embedded {
    pub styles: Vec<Style>,
}

#[derive(Debug, Deserialize)]
pub struct Links {
    #[serde(default)]
    pub next: Option<Link>,
}

#[derive(Debug, Deserialize)]
pub struct Link {
    pub href: String,
}

#[derive(Debug, Deserialize)]
pub struct Style {
    #[serde(rename = "styleColors", default)]
    pub style_colors: Vec<StyleColor>,
}

#[derive(Debug, Deserialize)]
pub struct StyleColor {
    #[serde(default)]
    pub skus: Vec<Sku>,
}

#[derive(Debug, Deserialize)]
pub struct Sku {
    #[serde(rename = "businessId", deserialize_with = "de_numeric")]
    pub business_id: i64,

    /// Barcode printed on in-store tickets. Only legacy units carry a
    /// separate value here.
    #[serde(rename = "storeUPC", default)]
    pub raw_store_upc: Option<RawBarcode>,

    #[serde(rename = "onlineUPC", default)]
    pub raw_online_upc: Option<RawBarcode>,
}

/// A barcode field exactly as the API sent it.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum RawBarcode {
    Int(i64),
    Text(String),
    Other(serde_json::Value),
}

impl RawBarcode {
    /// `Ok(None)` for an empty string. `Err` carries the offending value.
    fn to_upc(&self) -> Result<Option<i64>, String> {
        match self {
            RawBarcode::Int(n) => Ok(Some(*n)),
            RawBarcode::Text(text) if text.trim().is_empty() => Ok(None),
            RawBarcode::Text(text) => text.trim().parse().map(Some).map_err(|_| text.clone()),
            RawBarcode::Other(value) => Err(value.to_string()),
        }
    }
}

impl Sku {
    /// The store-scoped barcode as an integer, if present.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::InvalidUpc`] when the field holds something
    /// other than an integer or a numeric string.
    pub fn store_upc(&self) -> Result<Option<i64>, CatalogError> {
        self.barcode("storeUPC", self.raw_store_upc.as_ref())
    }

    /// The online-scoped barcode as an integer, if present.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::InvalidUpc`] when the field holds something
    /// other than an integer or a numeric string.
    pub fn online_upc(&self) -> Result<Option<i64>, CatalogError> {
        self.barcode("onlineUPC", self.raw_online_upc.as_ref())
    }

    fn barcode(
        &self,
        field: &'static str,
        raw: Option<&RawBarcode>,
    ) -> Result<Option<i64>, CatalogError> {
        match raw {
            None => Ok(None),
            Some(raw) => raw.to_upc().map_err(|value| CatalogError::InvalidUpc {
                business_id: self.business_id,
                field,
                value,
            }),
        }
    }
}

impl CatalogPage {
    /// Parses a raw response body.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::Malformed`] when the body is not JSON or is
    /// missing a required key.
    pub fn parse(body: &str) -> Result<Self, CatalogError> {
        serde_json::from_str(body).map_err(|source| CatalogError::Malformed { source })
    }

    #[must_use]
    pub fn total_pages(&self) -> u32 {
        self.page.total_pages
    }

    /// The literal `_links.next.href`, if the API returned one.
    #[must_use]
    pub fn next_href(&self) -> Option<&str> {
        self.links.next.as_ref().map(|link| link.href.as_str())
    }

    /// Every SKU on the page, in delivery order (style, then style-color).
    pub fn skus(&self) -> impl Iterator<Item = &Sku> {
        self.embedded
            .styles
            .iter()
            .flat_map(|style| style.style_colors.iter())
            .flat_map(|color| color.skus.iter())
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum NumericField {
    Int(i64),
    Text(String),
}

fn parse_numeric_text<E: de::Error>(text: &str) -> Result<i64, E> {
    text.trim()
        .parse::<i64>()
        .map_err(|_| E::custom(format!("expected a numeric identifier, got {text:?}")))
}

fn de_numeric<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    match NumericField::deserialize(deserializer)? {
        NumericField::Int(n) => Ok(n),
        NumericField::Text(s) => parse_numeric_text(&s),
    }
}

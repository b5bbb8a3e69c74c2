use thiserror::Error;

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("unexpected HTTP status {status} from {url}")]
    UnexpectedStatus { status: u16, url: String },

    /// Body was not JSON, or was JSON of the wrong shape.
    #[error("malformed catalog response: {source}")]
    Malformed {
        #[source]
        source: serde_json::Error,
    },

    #[error("SKU {business_id} has no online UPC")]
    MissingOnlineUpc { business_id: i64 },

    #[error("SKU {business_id} has a non-numeric {field}: {value}")]
    InvalidUpc {
        business_id: i64,
        field: &'static str,
        value: String,
    },

    #[error("{name} header value is not valid")]
    InvalidHeader { name: &'static str },

    #[error("invalid catalog base URL \"{base_url}\": {reason}")]
    InvalidBaseUrl { base_url: String, reason: String },
}

impl CatalogError {
    /// `true` for errors that describe the response payload rather than the
    /// transport. The sync driver logs these and abandons the business unit.
    #[must_use]
    pub fn is_malformed_response(&self) -> bool {
        matches!(
            self,
            CatalogError::Malformed { .. }
                | CatalogError::MissingOnlineUpc { .. }
                | CatalogError::InvalidUpc { .. }
        )
    }
}

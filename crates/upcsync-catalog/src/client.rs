//! HTTP client for the product catalog API.

use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderName, HeaderValue, FROM};
use reqwest::{Client, StatusCode};
use upcsync_core::ClientConfig;

use crate::error::CatalogError;
use crate::retry::retry_until_ok;

const API_KEY_HEADER: &str = "ApiKey";

/// A 200 response body, not yet parsed.
#[derive(Debug, Clone)]
pub struct RawResponse {
    pub url: String,
    pub body: String,
}

/// Client for `GET` requests against the catalog API.
///
/// Every request carries the `ApiKey`, `User-Agent` and `From` headers.
/// [`CatalogClient::fetch`] never gives up: transport errors and non-200
/// statuses are retried until a 200 arrives.
pub struct CatalogClient {
    client: Client,
    retry_delay_ms: u64,
    retry_max_delay_ms: u64,
}

impl CatalogClient {
    /// Creates a client with the configured per-attempt timeout, identification
    /// headers and retry pacing.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::InvalidHeader`] if the API key or contact are
    /// not valid header values, or [`CatalogError::Http`] if the underlying
    /// `reqwest::Client` cannot be constructed.
    pub fn new(config: &ClientConfig) -> Result<Self, CatalogError> {
        let mut headers = HeaderMap::new();

        let mut api_key = HeaderValue::from_str(&config.api_key).map_err(|_| {
            CatalogError::InvalidHeader {
                name: API_KEY_HEADER,
            }
        })?;
        api_key.set_sensitive(true);
        headers.insert(HeaderName::from_static("apikey"), api_key);

        if !config.contact.is_empty() {
            let contact = HeaderValue::from_str(&config.contact)
                .map_err(|_| CatalogError::InvalidHeader { name: "From" })?;
            headers.insert(FROM, contact);
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .user_agent(config.user_agent.as_str())
            .default_headers(headers)
            .build()?;

        Ok(Self {
            client,
            retry_delay_ms: config.retry_delay_ms,
            retry_max_delay_ms: config.retry_max_delay_ms,
        })
    }

    /// Fetches `url`, retrying until the server answers `200 OK`.
    ///
    /// The body is returned as-is; a 200 with an unparseable body is the
    /// caller's problem, not a reason to retry.
    pub async fn fetch(&self, url: &str) -> RawResponse {
        retry_until_ok(url, self.retry_delay_ms, self.retry_max_delay_ms, || async move {
            let response = self.client.get(url).send().await?;
            let status = response.status();

            if status != StatusCode::OK {
                return Err(CatalogError::UnexpectedStatus {
                    status: status.as_u16(),
                    url: url.to_owned(),
                });
            }

            let body = response.text().await?;
            Ok(RawResponse {
                url: url.to_owned(),
                body,
            })
        })
        .await
    }
}

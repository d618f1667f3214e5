use crate::domain::model::{AttributeDictionary, RawStore, RequestOptions};
use crate::utils::error::{EtlError, Result};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;

// The upstream rejects requests that do not look like they come from a browser.
const DEFAULT_HEADERS: [(&str, &str); 5] = [
    ("DNT", "1"),
    ("Sec-Fetch-Dest", "empty"),
    ("Sec-Fetch-Mode", "cors"),
    ("Sec-Fetch-Site", "same-origin"),
    (
        "User-Agent",
        "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/127.0.0.0 Safari/537.36",
    ),
];

/// Fetches the store list and the attribute dictionary.
#[derive(Debug, Clone)]
pub struct StoreLocatorClient {
    client: Client,
    headers: HeaderMap,
    options: RequestOptions,
}

impl StoreLocatorClient {
    pub fn new(options: RequestOptions) -> Result<Self> {
        let mut headers = HeaderMap::new();
        let configured = options
            .headers
            .iter()
            .map(|(name, value)| (name.as_str(), value.as_str()));

        for (name, value) in DEFAULT_HEADERS.into_iter().chain(configured) {
            let header_name = HeaderName::from_bytes(name.as_bytes()).map_err(|e| {
                EtlError::InvalidConfigValueError {
                    field: "headers".to_string(),
                    value: name.to_string(),
                    reason: e.to_string(),
                }
            })?;
            let header_value =
                HeaderValue::from_str(value).map_err(|e| EtlError::InvalidConfigValueError {
                    field: format!("headers.{}", name),
                    value: value.to_string(),
                    reason: e.to_string(),
                })?;
            // Later entries (configured headers) replace the defaults.
            headers.insert(header_name, header_value);
        }

        let client = Client::builder().timeout(options.timeout).build()?;

        Ok(Self {
            client,
            headers,
            options,
        })
    }

    pub async fn fetch_stores(&self, url: &str) -> Result<Vec<RawStore>> {
        let stores: Vec<RawStore> = self.get_json(url).await?;
        tracing::info!("📥 Fetched {} stores", stores.len());
        Ok(stores)
    }

    pub async fn fetch_attributes(&self, url: &str) -> Result<AttributeDictionary> {
        let dictionary: AttributeDictionary = self.get_json(url).await?;
        tracing::info!(
            "📥 Fetched attribute dictionary ({} business hours, {} services, {} products, {} payments)",
            dictionary.business_hours.len(),
            dictionary.services.len(),
            dictionary.products.len(),
            dictionary.payments.len()
        );
        Ok(dictionary)
    }

    async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T> {
        let body = self.get_with_retry(url).await?;
        Ok(serde_json::from_slice(&body)?)
    }

    async fn get_with_retry(&self, url: &str) -> Result<Vec<u8>> {
        let mut attempt = 0;
        loop {
            match self.get_once(url).await {
                Ok(body) => return Ok(body),
                Err(e) if attempt < self.options.retry_attempts && is_retryable(&e) => {
                    attempt += 1;
                    tracing::warn!(
                        "⚠️ Request to {} failed ({}), retry {}/{}",
                        url,
                        e,
                        attempt,
                        self.options.retry_attempts
                    );
                    tokio::time::sleep(self.options.retry_delay).await;
                }
                Err(e) => return Err(e),
            }
        }
    }

    async fn get_once(&self, url: &str) -> Result<Vec<u8>> {
        tracing::debug!("Making API request to: {}", url);
        let response = self
            .client
            .get(url)
            .headers(self.headers.clone())
            .send()
            .await?;

        let status = response.status();
        tracing::debug!("API response status: {}", status);
        if !status.is_success() {
            return Err(EtlError::HttpStatus {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        Ok(response.bytes().await?.to_vec())
    }
}

fn is_retryable(error: &EtlError) -> bool {
    match error {
        EtlError::ApiError(_) => true,
        EtlError::HttpStatus { status, .. } => StatusCode::from_u16(*status)
            .map(|s| s.is_server_error())
            .unwrap_or(false),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;
    use std::time::Duration;

    fn options(retry_attempts: u32) -> RequestOptions {
        RequestOptions {
            timeout: Duration::from_secs(5),
            retry_attempts,
            retry_delay: Duration::from_millis(0),
            headers: vec![],
        }
    }

    #[tokio::test]
    async fn test_fetch_stores_sends_browser_headers() {
        let server = MockServer::start();
        let api_mock = server.mock(|when, then| {
            when.method(GET)
                .path("/stores.json")
                .header("DNT", "1")
                .header("Sec-Fetch-Mode", "cors");
            then.status(200)
                .header("Content-Type", "application/json")
                .json_body(serde_json::json!([
                    {"id": 1, "name": "A", "services": "01"},
                    {"id": 2, "name": "B", "services": "10"}
                ]));
        });

        let client = StoreLocatorClient::new(options(0)).unwrap();
        let stores = client.fetch_stores(&server.url("/stores.json")).await.unwrap();

        api_mock.assert();
        assert_eq!(stores.len(), 2);
        assert_eq!(stores[1].services, "10");
    }

    #[tokio::test]
    async fn test_configured_headers_override_defaults() {
        let server = MockServer::start();
        let api_mock = server.mock(|when, then| {
            when.method(GET)
                .path("/attrs.json")
                .header("User-Agent", "store-locator-test")
                .header("X-Extra", "yes");
            then.status(200).json_body(serde_json::json!({
                "services": [["s1", "Delivery", "d.png"]]
            }));
        });

        let mut opts = options(0);
        opts.headers = vec![
            ("User-Agent".to_string(), "store-locator-test".to_string()),
            ("X-Extra".to_string(), "yes".to_string()),
        ];
        let client = StoreLocatorClient::new(opts).unwrap();
        let dictionary = client
            .fetch_attributes(&server.url("/attrs.json"))
            .await
            .unwrap();

        api_mock.assert();
        assert_eq!(dictionary.services.len(), 1);
    }

    #[tokio::test]
    async fn test_server_errors_are_retried() {
        let server = MockServer::start();
        let api_mock = server.mock(|when, then| {
            when.method(GET).path("/stores.json");
            then.status(503);
        });

        let client = StoreLocatorClient::new(options(2)).unwrap();
        let result = client.fetch_stores(&server.url("/stores.json")).await;

        api_mock.assert_hits(3);
        assert!(matches!(result, Err(EtlError::HttpStatus { status: 503, .. })));
    }

    #[tokio::test]
    async fn test_client_errors_are_not_retried() {
        let server = MockServer::start();
        let api_mock = server.mock(|when, then| {
            when.method(GET).path("/stores.json");
            then.status(404);
        });

        let client = StoreLocatorClient::new(options(3)).unwrap();
        let result = client.fetch_stores(&server.url("/stores.json")).await;

        api_mock.assert_hits(1);
        assert!(matches!(result, Err(EtlError::HttpStatus { status: 404, .. })));
    }

    #[tokio::test]
    async fn test_malformed_dictionary_is_serialization_error() {
        let server = MockServer::start();
        let _api_mock = server.mock(|when, then| {
            when.method(GET).path("/attrs.json");
            then.status(200).json_body(serde_json::json!({
                "services": [["s1", 42, "d.png"]]
            }));
        });

        let client = StoreLocatorClient::new(options(0)).unwrap();
        let result = client.fetch_attributes(&server.url("/attrs.json")).await;

        assert!(matches!(result, Err(EtlError::SerializationError(_))));
    }

    #[test]
    fn test_invalid_header_name_is_rejected() {
        let mut opts = options(0);
        opts.headers = vec![("bad header".to_string(), "x".to_string())];
        assert!(matches!(
            StoreLocatorClient::new(opts),
            Err(EtlError::InvalidConfigValueError { .. })
        ));
    }
}

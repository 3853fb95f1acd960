use reqwest::{header, Client, RequestBuilder, StatusCode, Url};
use serde::de::DeserializeOwned;
use std::time::Duration;

use crate::error::{Error, Result};

/// Thin wrapper over `reqwest::Client` shared by every adapter. No retry,
/// no caching, no rate limiting.
#[derive(Clone)]
pub struct UpstreamClient {
    client: Client,
}

/// A fully read upstream response.
#[derive(Debug, Clone)]
pub struct Payload {
    pub url: String,
    pub status: StatusCode,
    pub body: String,
}

impl UpstreamClient {
    pub fn new(timeout_secs: u64) -> Result<Self> {
        let mut headers = header::HeaderMap::new();
        headers.insert(
            header::ACCEPT,
            header::HeaderValue::from_static("application/json"),
        );
        headers.insert(
            header::USER_AGENT,
            header::HeaderValue::from_static(concat!("profilecheck/", env!("CARGO_PKG_VERSION"))),
        );

        let client = Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(timeout_secs))
            .build()?;

        Ok(Self { client })
    }

    pub fn client(&self) -> &Client {
        &self.client
    }

    pub async fn get(&self, url: &str) -> Result<Payload> {
        self.send(self.client.get(url)).await
    }

    pub async fn send(&self, request: RequestBuilder) -> Result<Payload> {
        let response = request.send().await?;
        let url = response.url().to_string();
        let status = response.status();
        tracing::debug!("{} -> {}", url, status);

        let body = response.text().await?;
        Ok(Payload { url, status, body })
    }
}

impl Payload {
    pub fn decode<T: DeserializeOwned>(&self) -> Result<T> {
        serde_json::from_str(&self.body)
            .map_err(|e| Error::ParseError(format!("{}: {}", self.url, e)))
    }

    pub fn upstream_error(&self) -> Error {
        let mut body: String = self.body.chars().take(200).collect();
        if body.len() < self.body.len() {
            body.push('…');
        }
        Error::Upstream(format!("{} returned {} - {}", self.url, self.status, body))
    }
}

/// Appends percent-encoded path segments and query pairs to a base URL.
pub fn endpoint(base: &str, segments: &[&str], query: &[(&str, &str)]) -> Result<String> {
    let mut url = Url::parse(base)
        .map_err(|e| Error::Config(format!("invalid base URL {}: {}", base, e)))?;

    if !segments.is_empty() {
        let mut path = url
            .path_segments_mut()
            .map_err(|_| Error::Config(format!("base URL cannot have a path: {}", base)))?;
        path.pop_if_empty().extend(segments);
    }

    if !query.is_empty() {
        url.query_pairs_mut().extend_pairs(query);
    }

    Ok(url.to_string())
}

use std::time::Duration;

use anyhow::{Context as _, Result};
use async_trait::async_trait;
use reqwest::{Client, header::CONTENT_TYPE};

use crate::sitewise::{JSON_CONTENT_TYPE, SiteWiseEndpoint};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportResponse {
    pub status: u16,

    pub body: String,
}

impl TransportResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Delivers a signed payload. Implementations enforce their own timeout.
#[async_trait]
pub trait Transport {
    async fn send(&self, payload: Vec<u8>, headers: &[(String, String)]) -> Result<TransportResponse>;
}

#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
    url: String,
}

impl HttpTransport {
    pub fn new(endpoint: &SiteWiseEndpoint) -> Result<Self> {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .redirect(reqwest::redirect::Policy::none())
            .build()
            .context("failed to build HTTP client")?;

        Ok(Self {
            client,
            url: endpoint.batch_put_url(),
        })
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send(&self, payload: Vec<u8>, headers: &[(String, String)]) -> Result<TransportResponse> {
        let mut request = self
            .client
            .post(&self.url)
            .header(CONTENT_TYPE, JSON_CONTENT_TYPE)
            .body(payload);
        for (name, value) in headers {
            request = request.header(name.as_str(), value.as_str());
        }

        let response = request
            .send()
            .await
            .with_context(|| format!("failed to send request to {}", self.url))?;

        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .context("failed to read response body")?;

        Ok(TransportResponse { status, body })
    }
}

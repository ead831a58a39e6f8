// HTTP transport for the Dribbble API.
// Sends one authenticated request and records its outcome without interpreting the status.

use std::future::Future;

use reqwest::Client;
use tracing::debug;

use crate::config::ClientConfig;
use crate::error::{DribbbleError, Result};

use super::types::RequestOutcome;

/// One outbound API call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiRequest {
    pub url: String,
    pub token: String,
    /// Issue a HEAD request and skip reading the body.
    pub no_body: bool,
}

/// Performs API calls. Never fails: transport problems are part of the outcome.
pub trait Transport {
    fn send(&self, request: ApiRequest) -> impl Future<Output = RequestOutcome>;
}

/// Class of transport failure, stored as `error_no` in a [`RequestOutcome`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportFailure {
    /// Request could not be built (bad URL, header value).
    Request = 1,
    Connect = 2,
    Timeout = 3,
    Redirect = 4,
    /// Response arrived but its body could not be read.
    Body = 5,
    Other = 6,
}

impl TransportFailure {
    pub fn code(self) -> u32 {
        self as u32
    }

    fn classify(error: &reqwest::Error) -> Self {
        if error.is_builder() {
            TransportFailure::Request
        } else if error.is_timeout() {
            TransportFailure::Timeout
        } else if error.is_connect() {
            TransportFailure::Connect
        } else if error.is_redirect() {
            TransportFailure::Redirect
        } else if error.is_body() || error.is_decode() {
            TransportFailure::Body
        } else {
            TransportFailure::Other
        }
    }
}

fn failure(error: reqwest::Error) -> RequestOutcome {
    let kind = TransportFailure::classify(&error);
    RequestOutcome::transport_failure(kind.code(), error.to_string())
}

/// Transport backed by a shared `reqwest` client.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    pub fn new(config: &ClientConfig) -> Result<Self> {
        let mut builder = Client::builder().user_agent(config.user_agent.clone());
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }

        let client = builder
            .build()
            .map_err(|e| DribbbleError::Other(format!("failed to build HTTP client: {e}")))?;

        Ok(Self { client })
    }
}

impl Transport for ReqwestTransport {
    async fn send(&self, request: ApiRequest) -> RequestOutcome {
        let builder = if request.no_body {
            self.client.head(&request.url)
        } else {
            self.client.get(&request.url)
        };

        let response = match builder.bearer_auth(&request.token).send().await {
            Ok(response) => response,
            Err(e) => return failure(e),
        };

        let status = response.status().as_u16();
        debug!("{} responded with HTTP {status}", request.url);

        if request.no_body {
            return RequestOutcome::response(status, None);
        }

        match response.text().await {
            Ok(body) => RequestOutcome::response(status, Some(body)),
            Err(e) => failure(e),
        }
    }
}

// Dribbble API data types.
// Request outcomes as recorded in the cache, and shots as returned by the API.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{DribbbleError, Result};

/// Result of one HTTP call, live or cached.
///
/// `error_no == 0` means the transport delivered a response, which carries a
/// status code and (unless the request was body-less) a body. A non-zero
/// `error_no` identifies the transport failure, described by `error`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestOutcome {
    pub error_no: u32,
    #[serde(default)]
    pub response_code: Option<u16>,
    #[serde(default)]
    pub body: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

impl RequestOutcome {
    /// Outcome of a request that reached the server.
    pub fn response(status: u16, body: Option<String>) -> Self {
        Self {
            error_no: 0,
            response_code: Some(status),
            body,
            error: None,
        }
    }

    /// Outcome of a request the transport could not complete.
    pub fn transport_failure(error_no: u32, message: impl Into<String>) -> Self {
        debug_assert!(error_no != 0);
        Self {
            error_no,
            response_code: None,
            body: None,
            error: Some(message.into()),
        }
    }

    pub fn is_transport_error(&self) -> bool {
        self.error_no != 0
    }

    /// Transport succeeded and the server answered 200.
    pub fn is_ok(&self) -> bool {
        !self.is_transport_error() && self.response_code == Some(200)
    }

    /// Whether this outcome may be written to the cache.
    ///
    /// Only a transport error without a 200 status is refused; a transport
    /// error that still carries status 200 is cached.
    pub fn is_cacheable(&self) -> bool {
        !(self.is_transport_error() && self.response_code != Some(200))
    }

    /// Classify the outcome, yielding the body of a 200 response.
    pub fn into_body(self) -> Result<String> {
        if self.is_transport_error() {
            return Err(DribbbleError::Transport {
                code: self.error_no,
                message: self.error.unwrap_or_default(),
            });
        }

        match self.response_code {
            Some(200) => Ok(self.body.unwrap_or_default()),
            Some(status) => Err(DribbbleError::Http(status)),
            None => Err(DribbbleError::Other(
                "response carried no status code".to_string(),
            )),
        }
    }
}

/// A shot record exactly as the API returned it.
///
/// Any JSON value is accepted. Accessors return `None` for records that are
/// not objects.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Shot(pub Value);

impl Shot {
    pub fn fields(&self) -> Option<&Map<String, Value>> {
        self.0.as_object()
    }

    pub fn into_value(self) -> Value {
        self.0
    }

    pub fn id(&self) -> Option<u64> {
        self.0.get("id").and_then(Value::as_u64)
    }

    pub fn title(&self) -> Option<&str> {
        self.0.get("title").and_then(Value::as_str)
    }

    /// Public page of the shot on dribbble.com.
    pub fn html_url(&self) -> Option<&str> {
        self.0.get("html_url").and_then(Value::as_str)
    }

    /// Normal-size image, falling back to the teaser.
    pub fn image_url(&self) -> Option<&str> {
        let images = self.0.get("images")?;
        images
            .get("normal")
            .and_then(Value::as_str)
            .or_else(|| images.get("teaser").and_then(Value::as_str))
    }

    pub fn width(&self) -> Option<u64> {
        self.0.get("width").and_then(Value::as_u64)
    }

    pub fn height(&self) -> Option<u64> {
        self.0.get("height").and_then(Value::as_u64)
    }
}

/// Parse a shots listing body into unmodified shot records.
pub fn parse_shots(body: &str) -> Result<Vec<Shot>> {
    Ok(serde_json::from_str(body)?)
}

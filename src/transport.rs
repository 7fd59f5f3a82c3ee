//! One-shot HTTP exchange boundary.
//!
//! [`Transport`] is the seam between protocol logic and the network: one
//! request/response exchange per call, stateless between calls. The
//! shipped implementation posts over a shared [`reqwest::Client`]
//! connection pool; tests substitute a scripted transport behind the same
//! trait.

use crate::error::PhoenixError;
use crate::options::RequestOptions;
use async_trait::async_trait;
use bytes::Bytes;
use std::time::Instant;
use tracing::{debug, warn};
use url::Url;

pub(crate) const PROTOBUF_CONTENT_TYPE: &str = "application/x-google-protobuf";

/// Sends one serialized request and returns the raw response body.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn exchange(
        &self,
        url: Url,
        body: Vec<u8>,
        options: &RequestOptions,
    ) -> Result<Bytes, PhoenixError>;
}

/// HTTP Basic material for gateway-fronted clusters. Obtaining and
/// refreshing credentials is the caller's concern; the transport only
/// applies them.
#[derive(Clone)]
pub struct Credentials {
    username: String,
    password: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Never expose the password through Debug output.
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .finish_non_exhaustive()
    }
}

/// [`Transport`] over HTTP POST with a pooled client.
#[derive(Clone, Debug, Default)]
pub struct HttpTransport {
    http: reqwest::Client,
    credentials: Option<Credentials>,
}

impl HttpTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_credentials(credentials: Credentials) -> Self {
        Self {
            http: reqwest::Client::new(),
            credentials: Some(credentials),
        }
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn exchange(
        &self,
        url: Url,
        body: Vec<u8>,
        options: &RequestOptions,
    ) -> Result<Bytes, PhoenixError> {
        let mut builder = self
            .http
            .post(url.clone())
            .header(reqwest::header::CONTENT_TYPE, PROTOBUF_CONTENT_TYPE)
            .timeout(options.timeout)
            .body(body);

        if let Some(credentials) = &self.credentials {
            builder = builder.basic_auth(&credentials.username, Some(&credentials.password));
        }
        for (name, value) in &options.headers {
            builder = builder.header(name, value);
        }

        let start = Instant::now();
        let response = builder.send().await?;
        let status = response.status();
        debug!(
            url = %url,
            status = status.as_u16(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "exchange complete"
        );

        let payload = response.bytes().await?;

        // The query server answers protocol faults with a decodable
        // ErrorResponse, frequently under a 500 status; the codec owns
        // that classification. Only an undecodable body is a plain HTTP
        // failure.
        if !status.is_success() && !looks_like_wire_message(&payload) {
            warn!(status = status.as_u16(), "non-protocol error body");
            return Err(PhoenixError::Http {
                status: status.as_u16(),
                body: String::from_utf8_lossy(&payload).into_owned(),
            });
        }

        Ok(payload)
    }
}

/// A wire envelope always begins with field 1 (`name`), wire type 2.
fn looks_like_wire_message(payload: &[u8]) -> bool {
    payload.first() == Some(&0x0a)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn envelope_sniffing_accepts_tagged_bodies() {
        let wire = crate::codec::encode_request(&crate::avatica::CommitRequest {
            connection_id: "c0ffee00".to_string(),
        });
        assert!(looks_like_wire_message(&wire));
        assert!(!looks_like_wire_message(b"<html>502 Bad Gateway</html>"));
        assert!(!looks_like_wire_message(b""));
    }

    #[test]
    fn credentials_debug_hides_password() {
        let credentials = Credentials::new("admin", "hunter2");
        let rendered = format!("{:?}", credentials);
        assert!(rendered.contains("admin"));
        assert!(!rendered.contains("hunter2"));
    }
}

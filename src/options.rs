//! Per-call request options and endpoint resolution.
//!
//! Every protocol operation takes a [`RequestOptions`] describing the one
//! exchange it is about to make: how long to wait, which extra headers to
//! send, and optionally which gateway path segment to route through.
//! Options never persist across calls.

use crate::error::PhoenixError;
use std::collections::HashMap;
use std::time::Duration;
use url::Url;

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Configuration for a single request/response exchange.
#[derive(Clone, Debug)]
pub struct RequestOptions {
    /// Alternative path segment appended to the base URL, used to route a
    /// request to a specific worker-node gateway instance in multi-tenant
    /// clusters (e.g. `"hbasephoenix0/"`).
    pub alternative_endpoint: Option<String>,
    /// Upper bound on the whole exchange. A timeout does not guarantee
    /// the server-side operation did not complete.
    pub timeout: Duration,
    /// Extra headers for this exchange only.
    pub headers: HashMap<String, String>,
}

impl Default for RequestOptions {
    fn default() -> Self {
        Self {
            alternative_endpoint: None,
            timeout: DEFAULT_TIMEOUT,
            headers: HashMap::new(),
        }
    }
}

impl RequestOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Route this request through a gateway instance path segment.
    pub fn alternative_endpoint(mut self, segment: impl Into<String>) -> Self {
        self.alternative_endpoint = Some(segment.into());
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }
}

/// Compute the target URL for one exchange.
///
/// The base URL is expected to end in a slash; a relative alternative
/// segment is resolved against it, so `https://host/` plus
/// `hbasephoenix0/` targets `https://host/hbasephoenix0/`.
pub(crate) fn resolve_endpoint(base: &Url, options: &RequestOptions) -> Result<Url, PhoenixError> {
    match options.alternative_endpoint.as_deref() {
        None => Ok(base.clone()),
        Some(segment) => base.join(segment).map_err(Into::into),
    }
}

/// Parse and normalize a base URL so relative gateway segments resolve
/// under it instead of replacing its last path component.
pub(crate) fn parse_base_url(raw: &str) -> Result<Url, PhoenixError> {
    let normalized = if raw.ends_with('/') {
        raw.to_string()
    } else {
        format!("{}/", raw)
    };
    let url = Url::parse(&normalized)?;
    if url.cannot_be_a_base() {
        return Err(PhoenixError::InvalidEndpoint(format!(
            "not a usable base URL: {}",
            raw
        )));
    }
    Ok(url)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_options_have_no_routing() {
        let options = RequestOptions::default();
        assert!(options.alternative_endpoint.is_none());
        assert_eq!(options.timeout, DEFAULT_TIMEOUT);
        assert!(options.headers.is_empty());
    }

    #[test]
    fn resolves_base_when_no_alternative_given() {
        let base = parse_base_url("https://cluster.example.net").unwrap();
        let url = resolve_endpoint(&base, &RequestOptions::default()).unwrap();
        assert_eq!(url.as_str(), "https://cluster.example.net/");
    }

    #[test]
    fn resolves_gateway_segment_under_base() {
        let base = parse_base_url("https://cluster.example.net").unwrap();
        let options = RequestOptions::new().alternative_endpoint("hbasephoenix0/");
        let url = resolve_endpoint(&base, &options).unwrap();
        assert_eq!(url.as_str(), "https://cluster.example.net/hbasephoenix0/");
    }

    #[test]
    fn base_with_path_keeps_its_prefix() {
        let base = parse_base_url("https://cluster.example.net/gateway").unwrap();
        let options = RequestOptions::new().alternative_endpoint("hbasephoenix2/");
        let url = resolve_endpoint(&base, &options).unwrap();
        assert_eq!(
            url.as_str(),
            "https://cluster.example.net/gateway/hbasephoenix2/"
        );
    }

    #[test]
    fn rejects_non_base_urls() {
        assert!(parse_base_url("mailto:pqs@example.net").is_err());
    }

    #[test]
    fn builder_accumulates_headers() {
        let options = RequestOptions::new()
            .header("X-Requested-By", "phoenix-connect")
            .timeout(Duration::from_secs(5));
        assert_eq!(options.headers.len(), 1);
        assert_eq!(options.timeout, Duration::from_secs(5));
    }
}

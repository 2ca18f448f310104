use crate::config::Method;
use crate::error::{FanoutError, Result};
use futures::future::BoxFuture;
use std::collections::HashMap;
use std::time::Duration;

// ---------------------------------------------------------------------------
// HttpCall capability
// ---------------------------------------------------------------------------

/// Result of one HTTP call. Any status is returned as `Ok`; only transport
/// failures (connect, timeout, invalid URL) surface as `Err`.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// The HTTP transport capability consumed by the request invoker.
pub trait HttpCall: Send + Sync {
    fn call<'a>(
        &'a self,
        method: Method,
        url: &'a str,
        headers: &'a HashMap<String, String>,
        body: Option<&'a serde_json::Value>,
    ) -> BoxFuture<'a, Result<HttpResponse>>;
}

// ---------------------------------------------------------------------------
// ReqwestCaller — production implementation
// ---------------------------------------------------------------------------

/// Per-request deadline. A pod that accepts the connection but never
/// responds surfaces as a transport error and goes through the retry
/// policy like any other failure.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// [`HttpCall`] backed by a shared `reqwest::Client`.
#[derive(Debug, Clone)]
pub struct ReqwestCaller {
    client: reqwest::Client,
}

impl ReqwestCaller {
    pub fn new() -> Self {
        Self::with_timeout(DEFAULT_TIMEOUT)
    }

    pub fn with_timeout(timeout: Duration) -> Self {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .expect("http client");
        Self { client }
    }
}

impl Default for ReqwestCaller {
    fn default() -> Self {
        Self::new()
    }
}

impl HttpCall for ReqwestCaller {
    fn call<'a>(
        &'a self,
        method: Method,
        url: &'a str,
        headers: &'a HashMap<String, String>,
        body: Option<&'a serde_json::Value>,
    ) -> BoxFuture<'a, Result<HttpResponse>> {
        Box::pin(async move {
            let method = match method {
                Method::Get => reqwest::Method::GET,
                Method::Post => reqwest::Method::POST,
                Method::Put => reqwest::Method::PUT,
                Method::Delete => reqwest::Method::DELETE,
            };

            let mut request = self.client.request(method, url);
            for (name, value) in headers {
                request = request.header(name, value);
            }
            if let Some(body) = body {
                request = request.json(body);
            }

            let response = request
                .send()
                .await
                .map_err(|e| FanoutError::Transport(e.to_string()))?;
            let status = response.status().as_u16();
            let body = response
                .text()
                .await
                .map_err(|e| FanoutError::Transport(e.to_string()))?;

            Ok(HttpResponse { status, body })
        })
    }
}

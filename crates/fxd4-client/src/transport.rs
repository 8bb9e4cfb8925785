//! HTTP transport seam.
//!
//! [`RemoteClient`](crate::RemoteClient) builds [`ApiRequest`] values and hands
//! them to a [`Transport`]. Production code uses [`UreqTransport`]; tests and
//! offline tooling can use [`RecordingTransport`].

use std::{
    collections::VecDeque,
    fmt,
    sync::{Mutex, MutexGuard},
};

use serde::de::DeserializeOwned;
use serde_json::Value;
use ureq::{http::HeaderMap, Agent, RequestBuilder};
use url::Url;

use crate::{
    error::{ApiError, ClientError},
    http_client::{apply_headers, ClientConfig},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Patch,
    Delete,
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Patch => "PATCH",
            Method::Delete => "DELETE",
        };
        f.write_str(name)
    }
}

/// A fully built request, independent of the HTTP library.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    pub method: Method,
    pub url: Url,
    pub headers: Vec<(String, String)>,
    pub body: Option<Value>,
}

impl ApiRequest {
    pub fn new(method: Method, url: Url) -> Self {
        Self {
            method,
            url,
            headers: Vec::new(),
            body: None,
        }
    }

    /// Sets a header, replacing any existing value with the same
    /// (case-insensitive) name.
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        let name = name.into();
        self.headers.retain(|(k, _)| !k.eq_ignore_ascii_case(&name));
        self.headers.push((name, value.into()));
        self
    }

    pub fn json(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    pub fn header_value(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Values of the query parameter `name`, in order.
    pub fn query_values(&self, name: &str) -> Vec<String> {
        self.url
            .query_pairs()
            .filter(|(k, _)| k == name)
            .map(|(_, v)| v.into_owned())
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse {
    pub status: u16,
    pub body: String,
}

impl ApiResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Converts a non-2xx response into [`ClientError::Api`].
    pub fn error_for_status(self) -> Result<Self, ClientError> {
        if self.is_success() {
            Ok(self)
        } else {
            Err(ApiError::from_body(self.status, &self.body).into())
        }
    }

    pub fn json<T: DeserializeOwned>(&self) -> Result<T, ClientError> {
        Ok(serde_json::from_str(&self.body)?)
    }
}

/// Sends requests to the remote API.
pub trait Transport: Send + Sync {
    fn send(&self, request: &ApiRequest) -> Result<ApiResponse, ClientError>;
}

/// Blocking transport backed by a `ureq` agent.
pub struct UreqTransport {
    agent: Agent,
    headers: Option<HeaderMap>,
}

impl UreqTransport {
    pub fn new(config: &ClientConfig) -> Self {
        Self {
            agent: config.build(),
            headers: config.headers.clone(),
        }
    }

    /// Configured headers first, then the request's own. A header set on
    /// the request replaces a configured one with the same name.
    fn headers_for<B>(&self, req: RequestBuilder<B>, request: &ApiRequest) -> RequestBuilder<B> {
        let mut req = apply_headers(req, &self.headers, |name| {
            request.header_value(name).is_some()
        });
        for (key, value) in &request.headers {
            req = req.header(key.as_str(), value.as_str());
        }
        req
    }
}

impl Default for UreqTransport {
    fn default() -> Self {
        Self::new(&ClientConfig::default())
    }
}

impl Transport for UreqTransport {
    fn send(&self, request: &ApiRequest) -> Result<ApiResponse, ClientError> {
        let uri = request.url.as_str();

        let mut response = match request.method {
            Method::Get | Method::Delete => {
                let req = match request.method {
                    Method::Get => self.agent.get(uri),
                    _ => self.agent.delete(uri),
                };
                self.headers_for(req, request).call()?
            }
            Method::Post | Method::Patch => {
                let req = match request.method {
                    Method::Post => self.agent.post(uri),
                    _ => self.agent.patch(uri),
                };
                let req = self.headers_for(req, request);
                match &request.body {
                    Some(body) => req.send_json(body)?,
                    None => req.send_empty()?,
                }
            }
        };

        let status = response.status().as_u16();
        let body = response.body_mut().read_to_string()?;

        Ok(ApiResponse {
            status,
            body,
        })
    }
}

/// In-memory transport that records every request and replays queued
/// responses in FIFO order.
///
/// Useful in tests to verify exactly what would be sent over the wire.
#[derive(Default)]
pub struct RecordingTransport {
    responses: Mutex<VecDeque<Result<ApiResponse, ClientError>>>,
    requests: Mutex<Vec<ApiRequest>>,
}

impl RecordingTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_response(&self, status: u16, body: impl Into<String>) {
        lock(&self.responses).push_back(Ok(ApiResponse::new(status, body)));
    }

    pub fn push_json(&self, status: u16, body: Value) {
        self.push_response(status, body.to_string());
    }

    pub fn push_error(&self, error: ClientError) {
        lock(&self.responses).push_back(Err(error));
    }

    pub fn requests(&self) -> Vec<ApiRequest> {
        lock(&self.requests).clone()
    }

    pub fn last_request(&self) -> Option<ApiRequest> {
        lock(&self.requests).last().cloned()
    }

    pub fn pending(&self) -> usize {
        lock(&self.responses).len()
    }
}

impl Transport for RecordingTransport {
    fn send(&self, request: &ApiRequest) -> Result<ApiResponse, ClientError> {
        lock(&self.requests).push(request.clone());
        lock(&self.responses).pop_front().unwrap_or_else(|| {
            Err(ClientError::InvalidResponse(format!(
                "no response queued for {} {}",
                request.method, request.url
            )))
        })
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

//! HTTP request and response types exchanged with the transport.
//!
//! # Design
//! The mappers build `HttpRequest` values and read `HttpResponse` values as
//! plain data; only a `Transport` touches the network. This keeps request
//! construction and response normalization deterministic and testable
//! without a server.

use serde_json::Value;

/// HTTP method for a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HttpMethod {
    #[default]
    Get,
    Post,
    Put,
    Delete,
}

impl HttpMethod {
    pub fn as_str(self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Delete => "DELETE",
        }
    }
}

impl std::fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An HTTP request described as plain data.
///
/// `body` is already serialized JSON when present.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    pub method: HttpMethod,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: Option<String>,
}

impl HttpRequest {
    /// A bare `GET` with the default JSON accept header.
    pub fn get(url: String) -> Self {
        Self {
            method: HttpMethod::Get,
            url,
            headers: vec![accept_json()],
            body: None,
        }
    }
}

pub(crate) fn accept_json() -> (String, String) {
    ("accept".to_string(), "application/json".to_string())
}

pub(crate) fn content_type_json() -> (String, String) {
    ("content-type".to_string(), "application/json".to_string())
}

/// An HTTP response as resolved by a `Transport`.
///
/// `json` is the parsed body, or `Value::Null` when the body was empty or
/// not JSON; `body` keeps the raw text.
#[derive(Debug, Clone, PartialEq)]
pub struct HttpResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub json: Value,
    pub body: String,
}

impl HttpResponse {
    /// A 200 response carrying `json`, mostly for fakes and fixtures.
    pub fn ok(json: Value) -> Self {
        Self {
            status: 200,
            headers: Vec::new(),
            body: json.to_string(),
            json,
        }
    }

    pub fn with_header(mut self, name: &str, value: &str) -> Self {
        self.headers.push((name.to_string(), value.to_string()));
        self
    }

    /// Case-insensitive header lookup; first match wins.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    pub fn has_header(&self, name: &str) -> bool {
        self.header(name).is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn header_lookup_ignores_case() {
        let response = HttpResponse::ok(json!([])).with_header("content-range", "items 0-0/1");
        assert_eq!(response.header("Content-Range"), Some("items 0-0/1"));
        assert!(response.has_header("CONTENT-RANGE"));
        assert!(!response.has_header("Link"));
    }

    #[test]
    fn get_defaults_to_json_accept_without_body() {
        let req = HttpRequest::get("http://localhost/posts/1".to_string());
        assert_eq!(req.method, HttpMethod::Get);
        assert_eq!(req.headers, vec![accept_json()]);
        assert!(req.body.is_none());
    }
}

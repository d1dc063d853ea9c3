//! The seam between the domain client and the network.
//!
//! [`Transport`] performs one authorized call against a named Web API path
//! and hands back parsed JSON. [`Credentials`] exposes the token cache's
//! expiry check and refresh. The reqwest implementation of both lives in
//! [`super::http`]; tests substitute an in-memory fake.

use std::fmt;

use serde_json::Value;

use crate::error::Result;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    Get,
    Post,
    Put,
    Delete,
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Delete => "DELETE",
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Body {
    Json(Value),
    /// Base64 encoded JPEG, sent verbatim.
    Jpeg(String),
}

/// One call against the Web API, relative to the API base url.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    pub method: Method,
    pub path: String,
    pub query: Vec<(String, String)>,
    pub body: Option<Body>,
}

impl ApiRequest {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: Vec::new(),
            body: None,
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::Get, path)
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::Post, path)
    }

    pub fn put(path: impl Into<String>) -> Self {
        Self::new(Method::Put, path)
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::Delete, path)
    }

    pub fn query(mut self, key: &str, value: impl ToString) -> Self {
        self.query.push((key.to_string(), value.to_string()));
        self
    }

    pub fn query_opt<V: ToString>(self, key: &str, value: Option<V>) -> Self {
        match value {
            Some(value) => self.query(key, value),
            None => self,
        }
    }

    pub fn json(mut self, body: Value) -> Self {
        self.body = Some(Body::Json(body));
        self
    }

    pub fn jpeg(mut self, base64: impl Into<String>) -> Self {
        self.body = Some(Body::Jpeg(base64.into()));
        self
    }

    pub fn query_value(&self, key: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

impl fmt::Display for ApiRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.method, self.path)
    }
}

#[allow(async_fn_in_trait)]
pub trait Transport {
    /// Performs the call and returns the parsed body, or `Value::Null` when
    /// the provider answered without one.
    async fn send(&self, request: ApiRequest) -> Result<Value>;
}

#[allow(async_fn_in_trait)]
pub trait Credentials {
    async fn token_expired(&self) -> Result<bool>;

    /// Replaces the cached token with a fresh one.
    async fn refresh_token(&self) -> Result<()>;
}

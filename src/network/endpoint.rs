use crate::error::NetworkError;
use reqwest::{Method, Url};
use std::collections::BTreeMap;
use std::time::Duration;

/// Fully-formed request handed to a [`Transport`](super::Transport)
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    pub method: Method,
    pub url: Url,
    pub headers: BTreeMap<String, String>,
    pub body: Option<Vec<u8>>,
    pub timeout: Option<Duration>,
}

impl ApiRequest {
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}

/// Request definition relative to an API base address
#[derive(Debug, Clone, PartialEq)]
pub struct Endpoint {
    pub path: String,
    pub method: Method,
    pub query: Vec<(String, String)>,
    pub headers: BTreeMap<String, String>,
    pub body: Option<Vec<u8>>,
}

impl Endpoint {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            method,
            query: Vec::new(),
            headers: BTreeMap::new(),
            body: None,
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    /// Append a query pair. Duplicate keys are kept in insertion order.
    pub fn query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((key.into(), value.into()));
        self
    }

    /// Set a header; a later value for the same key replaces the earlier one.
    /// Names are case-insensitive and stored lowercased.
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        let mut key = key.into();
        key.make_ascii_lowercase();
        self.headers.insert(key, value.into());
        self
    }

    pub fn body(mut self, body: Vec<u8>) -> Self {
        self.body = Some(body);
        self
    }

    /// Join with `base_url`, keeping exactly one `/` between the two paths
    pub fn to_request(&self, base_url: &str) -> Result<ApiRequest, NetworkError> {
        let mut url =
            Url::parse(base_url).map_err(|e| NetworkError::InvalidUrl(format!("{base_url}: {e}")))?;
        if url.cannot_be_a_base() {
            return Err(NetworkError::InvalidUrl(base_url.to_string()));
        }

        let joined = format!(
            "{}/{}",
            url.path().trim_end_matches('/'),
            self.path.trim_start_matches('/')
        );
        url.set_path(&joined);

        if !self.query.is_empty() {
            url.query_pairs_mut().extend_pairs(self.query.iter());
        }

        Ok(ApiRequest {
            method: self.method.clone(),
            url,
            headers: self.headers.clone(),
            body: self.body.clone(),
            timeout: None,
        })
    }
}

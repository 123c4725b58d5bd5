//! Inbound request descriptor handed to the proxy authentication gate.
//!
//! The gate never looks at the raw `axum` request. It works on a
//! [`ProxyRequest`]: the path, the parsed query string and the text headers,
//! captured once and left untouched while the request is verified.

use std::borrow::Cow;
use std::collections::HashMap;

use axum::http::{HeaderMap, Uri};
use url::form_urlencoded;

use crate::error::AuthError;
use crate::services::shop_domain::SHOP_HEADERS;

/// Value of a query parameter. A key that appears more than once becomes a list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryValue {
    Single(String),
    List(Vec<String>),
}

impl QueryValue {
    /// Value as it takes part in a signing message: list elements joined by commas.
    pub fn joined(&self) -> Cow<'_, str> {
        match self {
            QueryValue::Single(value) => Cow::Borrowed(value.as_str()),
            QueryValue::List(values) => Cow::Owned(values.join(",")),
        }
    }

    /// First value that is not blank. For lists, blank elements are skipped.
    pub fn first_non_blank(&self) -> Option<&str> {
        let non_blank = |value: &&String| !value.trim().is_empty();
        let found = match self {
            QueryValue::Single(value) => Some(value).filter(non_blank),
            QueryValue::List(values) => values.iter().find(non_blank),
        };
        found.map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        match self {
            QueryValue::Single(value) => value.is_empty(),
            QueryValue::List(values) => values.is_empty(),
        }
    }

    fn push(&mut self, value: String) {
        match self {
            QueryValue::Single(existing) => {
                let first = std::mem::take(existing);
                *self = QueryValue::List(vec![first, value]);
            }
            QueryValue::List(values) => values.push(value),
        }
    }
}

/// Query parameters in the order their keys first appeared.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryParams {
    entries: Vec<(String, QueryValue)>,
}

impl QueryParams {
    /// Parse an `application/x-www-form-urlencoded` query string (without `?`).
    pub fn parse(raw: &str) -> Self {
        form_urlencoded::parse(raw.as_bytes())
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect()
    }

    /// Add a value, turning the key into a list if it is already present.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some((_, existing)) => existing.push(value),
            None => self.entries.push((key, QueryValue::Single(value))),
        }
    }

    pub fn get(&self, key: &str) -> Option<&QueryValue> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, value)| value)
    }

    /// First non-blank value for `key`.
    pub fn first(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(QueryValue::first_non_blank)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &QueryValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for QueryParams {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut params = QueryParams::default();
        for (key, value) in iter {
            params.insert(key, value);
        }
        params
    }
}

/// Everything the gate needs to know about an inbound proxied request.
#[derive(Debug, Clone)]
pub struct ProxyRequest {
    path: String,
    query: QueryParams,
    /// Lower-cased header names to text values. The first occurrence wins.
    headers: HashMap<String, String>,
}

impl ProxyRequest {
    pub fn new(
        path: impl Into<String>,
        query: QueryParams,
        headers: impl IntoIterator<Item = (String, String)>,
    ) -> Self {
        let mut map = HashMap::new();
        for (name, value) in headers {
            map.entry(name.to_ascii_lowercase()).or_insert(value);
        }
        Self {
            path: path.into(),
            query,
            headers: map,
        }
    }

    /// Capture the descriptor of an HTTP request.
    ///
    /// Headers that are not visible ASCII are skipped, except for the headers
    /// the shop domain is read from: those fail the whole request with
    /// [`AuthError::UnexpectedFailure`] instead of silently falling through to
    /// a lower-priority source.
    pub fn from_parts(uri: &Uri, headers: &HeaderMap) -> Result<Self, AuthError> {
        let mut collected = Vec::with_capacity(headers.len());
        for (name, value) in headers {
            match value.to_str() {
                Ok(text) => collected.push((name.as_str().to_owned(), text.to_owned())),
                Err(_) if SHOP_HEADERS.contains(&name.as_str()) => {
                    return Err(AuthError::UnexpectedFailure(format!(
                        "header {name} is not valid text"
                    )));
                }
                Err(_) => continue,
            }
        }

        let query = QueryParams::parse(uri.query().unwrap_or_default());
        Ok(Self::new(uri.path(), query, collected))
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn query(&self) -> &QueryParams {
        &self.query
    }

    /// Header lookup, case-insensitive on the name.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .get(&name.to_ascii_lowercase())
            .map(String::as_str)
    }
}

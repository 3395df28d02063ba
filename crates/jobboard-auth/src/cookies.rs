//! `Cookie` request header parsing.

use std::collections::HashMap;

use axum::http::{HeaderMap, header::COOKIE};
use cookie::Cookie;

/// Name/value view over the cookies a client sent.
///
/// Only the first occurrence of a name is kept. Pairs that fail to parse
/// (no `=`, empty name) are skipped.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestCookies {
    pairs: HashMap<String, String>,
}

impl RequestCookies {
    /// Collects cookies from every `Cookie` header on the request.
    ///
    /// Non-ASCII bytes are decoded lossily, so one odd cookie never hides
    /// the others sent alongside it.
    pub fn from_headers(headers: &HeaderMap) -> Self {
        let mut jar = Self::default();
        for value in headers.get_all(COOKIE) {
            jar.extend_from_str(&String::from_utf8_lossy(value.as_bytes()));
        }
        jar
    }

    /// Parses a single `Cookie` header value such as `a=1; b=2`.
    pub fn parse(raw: &str) -> Self {
        let mut jar = Self::default();
        jar.extend_from_str(raw);
        jar
    }

    fn extend_from_str(&mut self, raw: &str) {
        for cookie in Cookie::split_parse(raw).flatten() {
            self.pairs
                .entry(cookie.name().to_string())
                .or_insert_with(|| cookie.value().to_string());
        }
    }

    /// Returns `true` if a cookie with this name was sent, whatever its value.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.pairs.contains_key(name)
    }

    /// Returns the value of the named cookie.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.pairs.get(name).map(String::as_str)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }
}

impl<K, V> FromIterator<(K, V)> for RequestCookies
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut pairs = HashMap::new();
        for (name, value) in iter {
            pairs.entry(name.into()).or_insert_with(|| value.into());
        }
        Self { pairs }
    }
}

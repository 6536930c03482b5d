//! Request parameters and query-string construction.
//!
//! `Params` keeps its entries sorted by key so that the same mapping always
//! serializes to the same query string, which keeps outgoing URLs stable in
//! logs and tests. Values are stored as strings; anything `Display` can be
//! inserted and is coerced on the way in.

use std::collections::btree_map;
use std::collections::BTreeMap;
use std::fmt;

use url::form_urlencoded;

/// Key-ordered request parameters.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Params(BTreeMap<String, String>);

impl Params {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn with(mut self, key: impl Into<String>, value: impl fmt::Display) -> Self {
        self.insert(key, value);
        self
    }

    /// Insert a parameter, returning the value it replaced.
    pub fn insert(&mut self, key: impl Into<String>, value: impl fmt::Display) -> Option<String> {
        self.0.insert(key.into(), value.to_string())
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    pub fn remove(&mut self, key: &str) -> Option<String> {
        self.0.remove(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> btree_map::Iter<'_, String, String> {
        self.0.iter()
    }

    /// Percent-encode every pair (form encoding) and join them with `&`.
    pub fn to_query_string(&self) -> String {
        let mut serializer = form_urlencoded::Serializer::new(String::new());
        for (key, value) in &self.0 {
            serializer.append_pair(key, value);
        }
        serializer.finish()
    }

    /// Parse a query string (with or without a leading `?`). A key repeated
    /// in the input keeps its last value.
    pub fn from_query_string(query: &str) -> Self {
        let query = query.strip_prefix('?').unwrap_or(query);
        form_urlencoded::parse(query.as_bytes())
            .map(|(key, value)| (key.into_owned(), value.into_owned()))
            .collect()
    }
}

impl<K, V> FromIterator<(K, V)> for Params
where
    K: Into<String>,
    V: fmt::Display,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut params = Params::new();
        for (key, value) in iter {
            params.insert(key, value);
        }
        params
    }
}

impl<'a> IntoIterator for &'a Params {
    type Item = (&'a String, &'a String);
    type IntoIter = btree_map::Iter<'a, String, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// Join a base URL and its parameters. Surrounding whitespace is stripped
/// from `base`; the `?` is only added when there is something to append.
pub fn build_url(base: &str, params: &Params) -> String {
    let base = base.trim();
    if params.is_empty() {
        return base.to_string();
    }
    format!("{base}?{}", params.to_query_string())
}

/// Recover the parameters of a URL produced by [`build_url`].
pub fn decode_query(url: &str) -> Params {
    match url.split_once('?') {
        Some((_, query)) => Params::from_query_string(query),
        None => Params::new(),
    }
}

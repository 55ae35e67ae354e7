//! Query strings and the per-session URL they live in.

use indexmap::IndexMap;
use url::form_urlencoded;

use crate::options::HistoryMode;

/// Ordered query parameters, decoded as `application/x-www-form-urlencoded`.
///
/// Like `URLSearchParams.get`, the first occurrence of a repeated key wins.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchParams {
    entries: IndexMap<String, String>,
}

impl SearchParams {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a query string, with or without its leading `?`.
    pub fn parse(query: &str) -> Self {
        let query = query.strip_prefix('?').unwrap_or(query);
        let mut entries = IndexMap::new();
        for (key, value) in form_urlencoded::parse(query.as_bytes()) {
            entries
                .entry(key.into_owned())
                .or_insert_with(|| value.into_owned());
        }
        Self { entries }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    /// Set a value, keeping the key's position if it already exists.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.entries.insert(key.into(), value.into());
    }

    pub fn remove(&mut self, key: &str) -> Option<String> {
        self.entries.shift_remove(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Render without the leading `?`.
    pub fn to_query_string(&self) -> String {
        form_urlencoded::Serializer::new(String::new())
            .extend_pairs(self.entries.iter())
            .finish()
    }
}

/// Session-scoped URL state.
///
/// One context exists per tab or request and is passed explicitly to every
/// binding that reads or writes it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UrlContext {
    path: String,
    params: SearchParams,
    history_len: usize,
}

impl UrlContext {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            params: SearchParams::new(),
            history_len: 1,
        }
    }

    /// Build a context from a path-relative URL such as `/0xabc/send?owners=...`.
    pub fn from_href(href: &str) -> Self {
        let mut context = Self::new("");
        context.load(href);
        context
    }

    fn load(&mut self, href: &str) {
        let href = href.split_once('#').map_or(href, |(before, _)| before);
        let (path, query) = href.split_once('?').unwrap_or((href, ""));
        self.path = path.to_string();
        self.params = SearchParams::parse(query);
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn params(&self) -> &SearchParams {
        &self.params
    }

    /// Number of history entries this session has produced.
    pub fn history_len(&self) -> usize {
        self.history_len
    }

    pub fn href(&self) -> String {
        let query = self.params.to_query_string();
        if query.is_empty() {
            self.path.clone()
        } else {
            format!("{}?{query}", self.path)
        }
    }

    /// Navigate to a new URL. Always adds a history entry.
    pub fn navigate(&mut self, href: &str) {
        self.load(href);
        self.history_len += 1;
    }

    /// Write one parameter. `None` removes it.
    pub fn write(&mut self, key: &str, value: Option<&str>, history: HistoryMode) {
        match value {
            Some(value) => self.params.set(key, value),
            None => {
                self.params.remove(key);
            }
        }
        if history == HistoryMode::Push {
            self.history_len += 1;
        }
    }
}

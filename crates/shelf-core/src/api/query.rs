//! Free-text `q` parameter assembly for the volumes search endpoint.
//!
//! Present fields become `intitle:`, `inauthor:` and `isbn:` terms, always in
//! that order, joined with a literal `+`:
//!
//! ```text
//! title="frankenstein", author="", isbn="123456789"
//!   -> intitle:frankenstein+isbn:123456789
//! ```

use crate::config::ApiConfig;
use crate::error::ShelfError;
use crate::isbn;
use serde::{Deserialize, Serialize};
use std::fmt::Write as _;

pub const TITLE_PREFIX: &str = "intitle:";
pub const AUTHOR_PREFIX: &str = "inauthor:";
pub const ISBN_PREFIX: &str = "isbn:";

/// Title/author/ISBN fragments for one search. Blank fields are absent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchQuery {
    pub title: String,
    pub author: String,
    pub isbn: String,
}

impl SearchQuery {
    #[must_use]
    pub fn new(title: impl Into<String>, author: impl Into<String>, isbn: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            author: author.into(),
            isbn: isbn.into(),
        }
    }

    #[must_use]
    pub fn by_isbn(isbn: impl Into<String>) -> Self {
        Self {
            isbn: isbn.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.terms().is_empty()
    }

    /// `(prefix, value)` pairs for the present fields, in fixed order.
    #[must_use]
    pub fn terms(&self) -> Vec<(&'static str, String)> {
        let mut terms = Vec::with_capacity(3);
        let title = self.title.trim();
        if !title.is_empty() {
            terms.push((TITLE_PREFIX, title.to_string()));
        }
        let author = self.author.trim();
        if !author.is_empty() {
            terms.push((AUTHOR_PREFIX, author.to_string()));
        }
        let isbn = isbn::normalize(&self.isbn);
        if !isbn.is_empty() {
            terms.push((ISBN_PREFIX, isbn));
        }
        terms
    }

    /// The raw, unencoded `q` value.
    #[must_use]
    pub fn to_query_string(&self) -> String {
        self.terms()
            .iter()
            .map(|(prefix, value)| format!("{prefix}{value}"))
            .collect::<Vec<_>>()
            .join("+")
    }

    /// Full request URL for this query against the configured endpoint.
    ///
    /// Term values are percent-encoded; the `+` separators and prefix colons
    /// stay literal so the API sees them as query operators.
    ///
    /// # Errors
    ///
    /// Returns [`ShelfError::EmptyQuery`] when no field is set.
    pub fn request_url(&self, api: &ApiConfig) -> Result<String, ShelfError> {
        let terms = self.terms();
        if terms.is_empty() {
            return Err(ShelfError::EmptyQuery);
        }

        let q = terms
            .iter()
            .map(|(prefix, value)| format!("{prefix}{}", urlencoding::encode(value)))
            .collect::<Vec<_>>()
            .join("+");

        let separator = if api.endpoint.contains('?') { '&' } else { '?' };
        let mut url = format!(
            "{}{separator}q={q}&maxResults={}",
            api.endpoint,
            api.effective_max_results()
        );
        if let Some(key) = api.api_key.as_deref().filter(|k| !k.is_empty()) {
            let _ = write!(url, "&key={}", urlencoding::encode(key));
        }
        Ok(url)
    }
}

/// Replace every `key=` parameter value so URLs, and messages quoting them,
/// can be logged or shown.
#[must_use]
pub fn redact_key(text: &str) -> String {
    const PARAM: &str = "key=";
    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(pos) = rest.find(PARAM) {
        let starts_param = rest[..pos].ends_with(['?', '&']);
        out.push_str(&rest[..pos + PARAM.len()]);
        rest = &rest[pos + PARAM.len()..];
        if starts_param {
            let end = rest
                .find(|c: char| c == '&' || c == '#' || c.is_whitespace())
                .unwrap_or(rest.len());
            out.push_str("REDACTED");
            rest = &rest[end..];
        }
    }
    out.push_str(rest);
    out
}

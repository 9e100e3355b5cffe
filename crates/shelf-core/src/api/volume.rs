//! Volumes search response model and the flattener that turns nested volume
//! info into table rows.

use crate::error::ShelfError;
use serde::{Deserialize, Serialize};

pub const ISBN_10: &str = "ISBN_10";
pub const ISBN_13: &str = "ISBN_13";

/// Top-level search response. A response without `items` is an empty result
/// set, not an error.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VolumesResponse {
    #[serde(default)]
    pub total_items: u64,
    #[serde(default)]
    pub items: Vec<Volume>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Volume {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub volume_info: VolumeInfo,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VolumeInfo {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub subtitle: Option<String>,
    #[serde(default)]
    pub authors: Vec<String>,
    #[serde(default)]
    pub publisher: Option<String>,
    #[serde(default)]
    pub published_date: Option<String>,
    #[serde(default)]
    pub industry_identifiers: Vec<IndustryIdentifier>,
    #[serde(default)]
    pub page_count: Option<u32>,
    #[serde(default)]
    pub categories: Vec<String>,
}

/// `{type, identifier}` pair; `type` is `ISBN_10`, `ISBN_13`, `ISSN` or `OTHER`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct IndustryIdentifier {
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default)]
    pub identifier: String,
}

/// One flattened search result.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookRow {
    pub volume_id: String,
    pub title: String,
    pub author: String,
    pub published: String,
    pub isbn10: Option<String>,
    pub isbn13: Option<String>,
}

/// Descriptive extras shown next to a search result. They are not cataloged.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct VolumeDetails {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subtitle: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub publisher: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page_count: Option<u32>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub categories: Vec<String>,
}

impl VolumeDetails {
    /// One-line summary such as `Penguin, 273 pages, Fiction`.
    #[must_use]
    pub fn summary(&self) -> String {
        let mut parts = Vec::new();
        if let Some(publisher) = self.publisher.as_deref().filter(|p| !p.is_empty()) {
            parts.push(publisher.to_string());
        }
        if let Some(pages) = self.page_count.filter(|&n| n > 0) {
            parts.push(format!("{pages} pages"));
        }
        if !self.categories.is_empty() {
            parts.push(self.categories.join(" / "));
        }
        parts.join(", ")
    }
}

impl BookRow {
    /// Leading four-digit year of `published` (`"1818-01-01"` → `"1818"`).
    #[must_use]
    pub fn publication_year(&self) -> Option<String> {
        let year: String = self.published.chars().take(4).collect();
        (year.len() == 4 && year.bytes().all(|b| b.is_ascii_digit())).then_some(year)
    }
}

impl VolumeInfo {
    /// First identifier of the given type, if any.
    #[must_use]
    pub fn identifier(&self, kind: &str) -> Option<&str> {
        self.industry_identifiers
            .iter()
            .find(|id| id.kind == kind && !id.identifier.trim().is_empty())
            .map(|id| id.identifier.trim())
    }

    #[must_use]
    pub fn details(&self) -> VolumeDetails {
        let present = |s: &Option<String>| {
            s.as_deref()
                .map(str::trim)
                .filter(|v| !v.is_empty())
                .map(str::to_string)
        };
        VolumeDetails {
            subtitle: present(&self.subtitle),
            publisher: present(&self.publisher),
            page_count: self.page_count,
            categories: self.categories.clone(),
        }
    }
}

impl Volume {
    #[must_use]
    pub fn to_row(&self) -> BookRow {
        let info = &self.volume_info;
        BookRow {
            volume_id: self.id.clone(),
            title: info.title.clone().unwrap_or_default(),
            author: info.authors.join(", "),
            published: info.published_date.clone().unwrap_or_default(),
            isbn10: info.identifier(ISBN_10).map(str::to_string),
            isbn13: info.identifier(ISBN_13).map(str::to_string),
        }
    }
}

/// Decode a raw response body.
///
/// # Errors
///
/// Returns [`ShelfError::Decode`] when the body is not a volumes response.
pub fn parse_volumes(body: &str) -> Result<VolumesResponse, ShelfError> {
    Ok(serde_json::from_str(body)?)
}

/// One row per volume, in API order.
#[must_use]
pub fn flatten(response: &VolumesResponse) -> Vec<BookRow> {
    response.items.iter().map(Volume::to_row).collect()
}

//! Blocking HTTP client for the volumes search endpoint.

use super::query::{SearchQuery, redact_key};
use super::volume::{BookRow, VolumesResponse, flatten, parse_volumes};
use crate::config::ApiConfig;
use crate::error::ShelfError;

pub const USER_AGENT: &str = concat!("shelf/", env!("CARGO_PKG_VERSION"));

/// Anything that can answer a volumes search. Views depend on this rather
/// than on the HTTP client so they can run against canned responses.
pub trait VolumeSource {
    /// Run one search.
    ///
    /// # Errors
    ///
    /// Returns [`ShelfError::EmptyQuery`] for an empty query, or a remote
    /// failure classified as network, HTTP status, or decode error.
    fn search(&self, query: &SearchQuery) -> Result<VolumesResponse, ShelfError>;

    /// Run one search and flatten the result into table rows.
    ///
    /// # Errors
    ///
    /// Same as [`VolumeSource::search`].
    fn search_rows(&self, query: &SearchQuery) -> Result<Vec<BookRow>, ShelfError> {
        self.search(query).map(|response| flatten(&response))
    }
}

/// One GET per search, no retries.
pub struct BooksClient {
    agent: ureq::Agent,
    api: ApiConfig,
}

impl BooksClient {
    #[must_use]
    pub fn new(api: ApiConfig) -> Self {
        let agent = ureq::AgentBuilder::new()
            .timeout(api.timeout())
            .user_agent(USER_AGENT)
            .build();
        Self { agent, api }
    }

    #[must_use]
    pub const fn api(&self) -> &ApiConfig {
        &self.api
    }
}

impl VolumeSource for BooksClient {
    fn search(&self, query: &SearchQuery) -> Result<VolumesResponse, ShelfError> {
        let url = query.request_url(&self.api)?;
        let logged_url = redact_key(&url);
        tracing::debug!(url = %logged_url, "fetching volumes");

        let response = match self.agent.get(&url).set("Accept", "application/json").call() {
            Ok(response) => response,
            Err(ureq::Error::Status(status, _)) => {
                tracing::warn!(url = %logged_url, status, "volumes request rejected");
                return Err(ShelfError::HttpStatus {
                    status,
                    url: logged_url,
                });
            }
            Err(ureq::Error::Transport(transport)) => {
                let message = redact_key(&transport.to_string());
                tracing::warn!(url = %logged_url, error = %message, "volumes request failed");
                return Err(ShelfError::Network {
                    url: logged_url,
                    message,
                });
            }
        };

        let body = response.into_string().map_err(|err| ShelfError::Network {
            url: logged_url.clone(),
            message: format!("failed to read response body: {err}"),
        })?;

        let volumes = parse_volumes(&body)?;
        tracing::info!(
            q = %query.to_query_string(),
            results = volumes.items.len(),
            total = volumes.total_items,
            "volume search complete"
        );
        Ok(volumes)
    }
}

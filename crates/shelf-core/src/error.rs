use std::fmt;
use std::path::PathBuf;

/// Machine-readable error codes for scripts consuming `--format json`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    ConfigParseError,
    EmptyQuery,
    NoMatch,
    NetworkUnavailable,
    HttpStatus,
    MalformedResponse,
    InvalidIsbn,
    InvalidBook,
    BookNotFound,
    GenreNotFound,
    DuplicateBook,
    DatabaseFailure,
}

impl ErrorCode {
    /// Stable code identifier (`E####`) for machine parsing.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::ConfigParseError => "E1001",
            Self::EmptyQuery => "E2001",
            Self::NoMatch => "E2002",
            Self::NetworkUnavailable => "E3001",
            Self::HttpStatus => "E3002",
            Self::MalformedResponse => "E3003",
            Self::InvalidIsbn => "E4001",
            Self::InvalidBook => "E4002",
            Self::BookNotFound => "E4003",
            Self::GenreNotFound => "E4004",
            Self::DuplicateBook => "E4005",
            Self::DatabaseFailure => "E5001",
        }
    }

    /// Short human-facing summary for logs and terminal output.
    #[must_use]
    pub const fn message(self) -> &'static str {
        match self {
            Self::ConfigParseError => "Config file parse error",
            Self::EmptyQuery => "Search query is empty",
            Self::NoMatch => "No matching volume",
            Self::NetworkUnavailable => "Book API unreachable",
            Self::HttpStatus => "Book API returned an error status",
            Self::MalformedResponse => "Malformed book API response",
            Self::InvalidIsbn => "Invalid ISBN",
            Self::InvalidBook => "Invalid book record",
            Self::BookNotFound => "Book not found",
            Self::GenreNotFound => "Genre not found",
            Self::DuplicateBook => "Book already in catalog",
            Self::DatabaseFailure => "Catalog database error",
        }
    }

    /// Optional remediation hint surfaced next to the error.
    #[must_use]
    pub const fn hint(self) -> Option<&'static str> {
        match self {
            Self::ConfigParseError => Some("Fix syntax in shelf/config.toml and retry."),
            Self::EmptyQuery => Some("Provide at least one of --title, --author or --isbn."),
            Self::NoMatch => Some("Try `shelf search` with a title or author instead."),
            Self::NetworkUnavailable => Some("Check your connection and the [api] endpoint setting."),
            Self::HttpStatus => Some("Check the API key and quota in the [api] config section."),
            Self::MalformedResponse => Some("Verify [api] endpoint points at a volumes search API."),
            Self::InvalidIsbn => Some("Use a 10- or 13-digit ISBN; hyphens are allowed."),
            Self::InvalidBook => Some("Title and author are required."),
            Self::BookNotFound => Some("Run `shelf list` to see catalog IDs."),
            Self::GenreNotFound => Some("Run `shelf genre list` to see known genres."),
            Self::DuplicateBook => None,
            Self::DatabaseFailure => Some("Check that the catalog path is writable."),
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Classified failures raised by the search pipeline and the catalog.
#[derive(Debug, thiserror::Error)]
pub enum ShelfError {
    #[error("search query is empty: set a title, author or ISBN")]
    EmptyQuery,

    #[error("no volume matches {0}")]
    NoMatch(String),

    #[error("request to {url} failed: {message}")]
    Network { url: String, message: String },

    #[error("book API returned HTTP {status} for {url}")]
    HttpStatus { status: u16, url: String },

    #[error("malformed book API response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("invalid ISBN '{input}': {reason}")]
    InvalidIsbn { input: String, reason: &'static str },

    #[error("invalid book: {0}")]
    InvalidBook(String),

    #[error("book {0} not found")]
    BookNotFound(i64),

    #[error("genre '{0}' not found")]
    GenreNotFound(String),

    #[error("ISBN {isbn13} is already cataloged as book {id}")]
    DuplicateBook { id: i64, isbn13: String },

    #[error("failed to load config {}: {message}", path.display())]
    Config { path: PathBuf, message: String },

    #[error("catalog database error: {0}")]
    Database(#[from] rusqlite::Error),
}

impl ShelfError {
    #[must_use]
    pub const fn error_code(&self) -> ErrorCode {
        match self {
            Self::EmptyQuery => ErrorCode::EmptyQuery,
            Self::NoMatch(_) => ErrorCode::NoMatch,
            Self::Network { .. } => ErrorCode::NetworkUnavailable,
            Self::HttpStatus { .. } => ErrorCode::HttpStatus,
            Self::Decode(_) => ErrorCode::MalformedResponse,
            Self::InvalidIsbn { .. } => ErrorCode::InvalidIsbn,
            Self::InvalidBook(_) => ErrorCode::InvalidBook,
            Self::BookNotFound(_) => ErrorCode::BookNotFound,
            Self::GenreNotFound(_) => ErrorCode::GenreNotFound,
            Self::DuplicateBook { .. } => ErrorCode::DuplicateBook,
            Self::Config { .. } => ErrorCode::ConfigParseError,
            Self::Database(_) => ErrorCode::DatabaseFailure,
        }
    }

    /// Remediation text, falling back to the code's summary.
    #[must_use]
    pub fn suggestion(&self) -> String {
        match self {
            Self::DuplicateBook { id, .. } => format!("Run `shelf show {id}` to view it."),
            other => other
                .error_code()
                .hint()
                .unwrap_or_else(|| other.error_code().message())
                .to_string(),
        }
    }

    /// True for failures of the remote lookup rather than local state.
    #[must_use]
    pub const fn is_remote(&self) -> bool {
        matches!(
            self,
            Self::Network { .. } | Self::HttpStatus { .. } | Self::Decode(_)
        )
    }

    /// One-line label for the TUI status bar.
    #[must_use]
    pub fn status_label(&self) -> String {
        match self {
            Self::Network { message, .. } => format!("Network error: {message}"),
            Self::HttpStatus { status, .. } => format!("API error: HTTP {status}"),
            Self::Decode(err) => format!("Bad response: {err}"),
            other => other.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{ErrorCode, ShelfError};
    use std::collections::HashSet;

    #[test]
    fn all_codes_are_unique() {
        let all = [
            ErrorCode::ConfigParseError,
            ErrorCode::EmptyQuery,
            ErrorCode::NoMatch,
            ErrorCode::NetworkUnavailable,
            ErrorCode::HttpStatus,
            ErrorCode::MalformedResponse,
            ErrorCode::InvalidIsbn,
            ErrorCode::InvalidBook,
            ErrorCode::BookNotFound,
            ErrorCode::GenreNotFound,
            ErrorCode::DuplicateBook,
            ErrorCode::DatabaseFailure,
        ];

        let mut seen = HashSet::new();
        for code in all {
            assert!(seen.insert(code.code()), "duplicate code {}", code.code());
        }
    }

    #[test]
    fn code_format_is_machine_friendly() {
        let code = ErrorCode::MalformedResponse.code();
        assert_eq!(code.len(), 5);
        assert!(code.starts_with('E'));
        assert!(code.chars().skip(1).all(|c| c.is_ascii_digit()));
    }

    #[test]
    fn remote_failures_are_classified_separately() {
        let network = ShelfError::Network {
            url: "http://localhost".into(),
            message: "connection refused".into(),
        };
        let status = ShelfError::HttpStatus {
            status: 503,
            url: "http://localhost".into(),
        };
        let decode = ShelfError::Decode(
            serde_json::from_str::<serde_json::Value>("{").expect_err("truncated json"),
        );

        assert!(network.is_remote());
        assert!(status.is_remote());
        assert!(decode.is_remote());
        assert!(!ShelfError::EmptyQuery.is_remote());

        assert_eq!(network.error_code(), ErrorCode::NetworkUnavailable);
        assert_eq!(status.error_code(), ErrorCode::HttpStatus);
        assert_eq!(decode.error_code(), ErrorCode::MalformedResponse);
        assert!(network.status_label().starts_with("Network error"));
        assert_eq!(status.status_label(), "API error: HTTP 503");
    }

    #[test]
    fn duplicate_suggestion_points_at_existing_book() {
        let err = ShelfError::DuplicateBook {
            id: 7,
            isbn13: "9780141439471".into(),
        };
        assert_eq!(err.suggestion(), "Run `shelf show 7` to view it.");
    }
}

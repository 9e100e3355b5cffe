//! Catalog entities.

use crate::api::BookRow;
use crate::error::ShelfError;
use crate::isbn::Isbn;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A saved book.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Book {
    pub id: i64,
    pub title: String,
    pub author: String,
    pub pub_year: Option<String>,
    pub isbn10: Option<String>,
    pub isbn13: Option<String>,
    pub genre: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// A book about to be inserted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewBook {
    pub title: String,
    pub author: String,
    pub pub_year: Option<String>,
    pub isbn10: Option<String>,
    pub isbn13: Option<String>,
    pub genre: Option<String>,
}

/// A genre with the number of books filed under it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Genre {
    pub id: i64,
    pub name: String,
    pub book_count: u64,
}

impl NewBook {
    #[must_use]
    pub fn from_row(row: &BookRow) -> Self {
        Self {
            title: row.title.trim().to_string(),
            author: row.author.trim().to_string(),
            pub_year: row.publication_year(),
            isbn10: row.isbn10.clone(),
            isbn13: row.isbn13.clone(),
            genre: None,
        }
    }

    /// Set the ISBN from a single user-supplied value, filling both columns
    /// when the input is an ISBN-10.
    ///
    /// # Errors
    ///
    /// Returns [`ShelfError::InvalidIsbn`] if the value fails validation.
    pub fn with_isbn(mut self, raw: &str) -> Result<Self, ShelfError> {
        match Isbn::parse(raw)? {
            isbn @ Isbn::Isbn10(_) => {
                self.isbn13 = Some(isbn.to_isbn13());
                self.isbn10 = Some(isbn.as_str().to_string());
            }
            Isbn::Isbn13(value) => self.isbn13 = Some(value),
        }
        Ok(self)
    }

    /// Check required fields and ISBN check digits, and normalize the ISBN
    /// columns. A missing ISBN-13 is derived from the ISBN-10.
    ///
    /// # Errors
    ///
    /// Returns [`ShelfError::InvalidBook`] for a blank title/author and
    /// [`ShelfError::InvalidIsbn`] for bad identifiers.
    pub fn validate(mut self) -> Result<Self, ShelfError> {
        self.title = self.title.trim().to_string();
        self.author = self.author.trim().to_string();
        if self.title.is_empty() {
            return Err(ShelfError::InvalidBook("title is required".into()));
        }
        if self.author.is_empty() {
            return Err(ShelfError::InvalidBook("author is required".into()));
        }

        self.pub_year = self
            .pub_year
            .map(|y| y.trim().to_string())
            .filter(|y| !y.is_empty());
        self.genre = self
            .genre
            .map(|g| g.trim().to_string())
            .filter(|g| !g.is_empty());

        let isbn10 = match self.isbn10.as_deref().filter(|s| !s.trim().is_empty()) {
            Some(raw) => match Isbn::parse(raw)? {
                isbn @ Isbn::Isbn10(_) => Some(isbn),
                Isbn::Isbn13(_) => {
                    return Err(ShelfError::InvalidIsbn {
                        input: raw.to_string(),
                        reason: "expected an ISBN-10 in the ISBN-10 column",
                    });
                }
            },
            None => None,
        };
        let isbn13 = match self.isbn13.as_deref().filter(|s| !s.trim().is_empty()) {
            Some(raw) => match Isbn::parse(raw)? {
                Isbn::Isbn13(value) => Some(value),
                Isbn::Isbn10(_) => {
                    return Err(ShelfError::InvalidIsbn {
                        input: raw.to_string(),
                        reason: "expected an ISBN-13 in the ISBN-13 column",
                    });
                }
            },
            None => None,
        };

        self.isbn13 = isbn13.or_else(|| isbn10.as_ref().map(Isbn::to_isbn13));
        self.isbn10 = isbn10.map(|isbn| isbn.as_str().to_string());
        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row() -> BookRow {
        BookRow {
            volume_id: "v1".into(),
            title: " Frankenstein ".into(),
            author: "Mary Shelley".into(),
            published: "2003-05-01".into(),
            isbn10: Some("0141439475".into()),
            isbn13: Some("9780141439471".into()),
        }
    }

    #[test]
    fn from_row_takes_year_and_identifiers() {
        let book = NewBook::from_row(&row());
        assert_eq!(book.title, "Frankenstein");
        assert_eq!(book.pub_year.as_deref(), Some("2003"));
        assert_eq!(book.isbn10.as_deref(), Some("0141439475"));
        assert_eq!(book.isbn13.as_deref(), Some("9780141439471"));
    }

    #[test]
    fn validate_requires_title_and_author() {
        let err = NewBook {
            title: "  ".into(),
            author: "x".into(),
            ..NewBook::default()
        }
        .validate()
        .expect_err("blank title");
        assert!(matches!(err, ShelfError::InvalidBook(_)));

        let err = NewBook {
            title: "x".into(),
            ..NewBook::default()
        }
        .validate()
        .expect_err("blank author");
        assert!(matches!(err, ShelfError::InvalidBook(_)));
    }

    #[test]
    fn validate_derives_isbn13_from_isbn10() {
        let book = NewBook {
            title: "Frankenstein".into(),
            author: "Mary Shelley".into(),
            isbn10: Some("0-14-143947-5".into()),
            ..NewBook::default()
        }
        .validate()
        .expect("valid");
        assert_eq!(book.isbn10.as_deref(), Some("0141439475"));
        assert_eq!(book.isbn13.as_deref(), Some("9780141439471"));
    }

    #[test]
    fn validate_rejects_swapped_columns() {
        let err = NewBook {
            title: "t".into(),
            author: "a".into(),
            isbn10: Some("9780141439471".into()),
            ..NewBook::default()
        }
        .validate()
        .expect_err("isbn13 in isbn10 column");
        assert!(matches!(err, ShelfError::InvalidIsbn { .. }));
    }

    #[test]
    fn with_isbn_fills_both_columns_for_isbn10() {
        let book = NewBook::default().with_isbn("0141439475").expect("valid");
        assert_eq!(book.isbn10.as_deref(), Some("0141439475"));
        assert_eq!(book.isbn13.as_deref(), Some("9780141439471"));

        let book = NewBook::default().with_isbn("9780141439471").expect("valid");
        assert!(book.isbn10.is_none());
        assert_eq!(book.isbn13.as_deref(), Some("9780141439471"));
    }

    #[test]
    fn blank_optional_fields_become_none() {
        let book = NewBook {
            title: "t".into(),
            author: "a".into(),
            pub_year: Some(" ".into()),
            genre: Some(String::new()),
            isbn10: Some(String::new()),
            isbn13: None,
        }
        .validate()
        .expect("valid");
        assert!(book.pub_year.is_none());
        assert!(book.genre.is_none());
        assert!(book.isbn10.is_none());
        assert!(book.isbn13.is_none());
    }
}

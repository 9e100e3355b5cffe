//! Book queries and writes.
//!
//! Every insert binds all seven columns explicitly; genres are resolved
//! through [`super::genres::ensure_genre`] inside the same transaction.

use super::genres;
use crate::error::ShelfError;
use crate::isbn::{self, Isbn};
use crate::model::{Book, NewBook};
use anyhow::bail;
use chrono::{DateTime, Utc};
use rusqlite::{Connection, OptionalExtension, params, params_from_iter};
use std::fmt;
use std::str::FromStr;

const BOOK_COLUMNS: &str = "b.id, b.title, b.author, b.pub_year, b.isbn10, b.isbn13, \
                            g.name, b.created_at_us";

// ---------------------------------------------------------------------------
// Sorting and filtering
// ---------------------------------------------------------------------------

/// Sort order for catalog listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BookSort {
    #[default]
    Title,
    Author,
    /// Publication year ascending; books without a year last.
    Year,
    /// Most recently added first.
    Added,
}

impl BookSort {
    const fn sql_clause(self) -> &'static str {
        match self {
            Self::Title => "ORDER BY b.title COLLATE NOCASE ASC, b.id ASC",
            Self::Author => "ORDER BY b.author COLLATE NOCASE ASC, b.title COLLATE NOCASE ASC, b.id ASC",
            Self::Year => "ORDER BY b.pub_year IS NULL, b.pub_year ASC, b.title COLLATE NOCASE ASC, b.id ASC",
            Self::Added => "ORDER BY b.created_at_us DESC, b.id DESC",
        }
    }
}

impl fmt::Display for BookSort {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Title => f.write_str("title"),
            Self::Author => f.write_str("author"),
            Self::Year => f.write_str("year"),
            Self::Added => f.write_str("added"),
        }
    }
}

impl FromStr for BookSort {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> anyhow::Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "title" => Ok(Self::Title),
            "author" => Ok(Self::Author),
            "year" | "published" => Ok(Self::Year),
            "added" | "recent" | "newest" => Ok(Self::Added),
            other => bail!("unknown sort order '{other}': expected one of title, author, year, added"),
        }
    }
}

/// Filter criteria for catalog listings, combined with AND.
#[derive(Debug, Clone, Default)]
pub struct BookFilter {
    /// Case-insensitive substring of title or author.
    pub text: Option<String>,
    /// Genre name (case-insensitive exact match).
    pub genre: Option<String>,
    pub sort: BookSort,
    pub limit: Option<u32>,
}

// ---------------------------------------------------------------------------
// Reads
// ---------------------------------------------------------------------------

fn row_to_book(row: &rusqlite::Row<'_>) -> rusqlite::Result<Book> {
    let created_at_us: i64 = row.get(7)?;
    Ok(Book {
        id: row.get(0)?,
        title: row.get(1)?,
        author: row.get(2)?,
        pub_year: row.get(3)?,
        isbn10: row.get(4)?,
        isbn13: row.get(5)?,
        genre: row.get(6)?,
        created_at: DateTime::<Utc>::from_timestamp_micros(created_at_us).unwrap_or_default(),
    })
}

/// Fetch one book by id.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn get_book(conn: &Connection, id: i64) -> Result<Option<Book>, ShelfError> {
    let sql = format!(
        "SELECT {BOOK_COLUMNS} FROM books b LEFT JOIN genres g ON g.id = b.genre_id WHERE b.id = ?1"
    );
    Ok(conn.query_row(&sql, params![id], row_to_book).optional()?)
}

/// Fetch one book by id, treating absence as an error.
///
/// # Errors
///
/// Returns [`ShelfError::BookNotFound`] if no book has this id.
pub fn require_book(conn: &Connection, id: i64) -> Result<Book, ShelfError> {
    get_book(conn, id)?.ok_or(ShelfError::BookNotFound(id))
}

/// Find a cataloged book by ISBN-10 or ISBN-13 (hyphens allowed).
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn find_by_isbn(conn: &Connection, raw: &str) -> Result<Option<Book>, ShelfError> {
    let normalized = isbn::normalize(raw);
    if normalized.is_empty() {
        return Ok(None);
    }
    let as_isbn13 = Isbn::parse(&normalized)
        .map(|parsed| parsed.to_isbn13())
        .unwrap_or_else(|_| normalized.clone());

    let sql = format!(
        "SELECT {BOOK_COLUMNS} FROM books b LEFT JOIN genres g ON g.id = b.genre_id \
         WHERE b.isbn13 = ?1 OR b.isbn10 = ?2 ORDER BY b.id LIMIT 1"
    );
    Ok(conn
        .query_row(&sql, params![as_isbn13, normalized], row_to_book)
        .optional()?)
}

/// List books matching the filter.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn list_books(conn: &Connection, filter: &BookFilter) -> Result<Vec<Book>, ShelfError> {
    let mut conditions: Vec<String> = Vec::new();
    let mut param_values: Vec<String> = Vec::new();

    if let Some(text) = filter.text.as_deref().map(str::trim).filter(|t| !t.is_empty()) {
        param_values.push(format!("%{}%", escape_like(text)));
        let n = param_values.len();
        conditions.push(format!(
            "(b.title LIKE ?{n} ESCAPE '\\' OR b.author LIKE ?{n} ESCAPE '\\')"
        ));
    }

    if let Some(genre) = filter.genre.as_deref().map(str::trim).filter(|g| !g.is_empty()) {
        param_values.push(genre.to_string());
        conditions.push(format!("g.name = ?{} COLLATE NOCASE", param_values.len()));
    }

    let where_clause = if conditions.is_empty() {
        String::new()
    } else {
        format!(" WHERE {}", conditions.join(" AND "))
    };
    let limit_clause = filter
        .limit
        .map_or_else(String::new, |limit| format!(" LIMIT {limit}"));

    let sql = format!(
        "SELECT {BOOK_COLUMNS} FROM books b LEFT JOIN genres g ON g.id = b.genre_id\
         {where_clause} {}{limit_clause}",
        filter.sort.sql_clause()
    );

    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map(params_from_iter(param_values.iter()), row_to_book)?;

    let mut books = Vec::new();
    for row in rows {
        books.push(row?);
    }
    Ok(books)
}

/// Total number of cataloged books.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn count_books(conn: &Connection) -> Result<u64, ShelfError> {
    let count: i64 = conn.query_row("SELECT COUNT(*) FROM books", [], |row| row.get(0))?;
    Ok(u64::try_from(count).unwrap_or(0))
}

fn escape_like(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        if matches!(c, '%' | '_' | '\\') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

// ---------------------------------------------------------------------------
// Writes
// ---------------------------------------------------------------------------

/// Validate and insert a book, creating its genre if needed.
///
/// # Errors
///
/// Returns [`ShelfError::InvalidBook`]/[`ShelfError::InvalidIsbn`] for bad
/// input, [`ShelfError::DuplicateBook`] if the ISBN-13 is already cataloged,
/// or a database error.
pub fn insert_book(conn: &Connection, book: NewBook) -> Result<Book, ShelfError> {
    let book = book.validate()?;

    if let Some(isbn13) = book.isbn13.as_deref() {
        if let Some(existing) = find_by_isbn(conn, isbn13)? {
            return Err(ShelfError::DuplicateBook {
                id: existing.id,
                isbn13: isbn13.to_string(),
            });
        }
    }

    let id = match insert_validated(conn, &book) {
        Ok(id) => id,
        Err(ShelfError::Database(err)) if is_isbn13_conflict(&err) => {
            return Err(duplicate_after_conflict(conn, &book, err));
        }
        Err(err) => return Err(err),
    };

    tracing::info!(id, title = %book.title, author = %book.author, "book cataloged");
    require_book(conn, id)
}

fn insert_validated(conn: &Connection, book: &NewBook) -> Result<i64, ShelfError> {
    let tx = conn.unchecked_transaction()?;
    let genre_id = match book.genre.as_deref() {
        Some(name) => Some(genres::ensure_genre(&tx, name)?.id),
        None => None,
    };
    tx.execute(
        "INSERT INTO books (title, author, pub_year, isbn10, isbn13, genre_id, created_at_us) \
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        params![
            book.title,
            book.author,
            book.pub_year,
            book.isbn10,
            book.isbn13,
            genre_id,
            Utc::now().timestamp_micros(),
        ],
    )?;
    let id = tx.last_insert_rowid();
    tx.commit()?;
    Ok(id)
}

/// Another writer cataloged the same ISBN-13 between the duplicate check
/// and the insert.
fn is_isbn13_conflict(err: &rusqlite::Error) -> bool {
    matches!(
        err,
        rusqlite::Error::SqliteFailure(failure, Some(message))
            if failure.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE
                && message.contains("books.isbn13")
    )
}

fn duplicate_after_conflict(conn: &Connection, book: &NewBook, err: rusqlite::Error) -> ShelfError {
    let Some(isbn13) = book.isbn13.as_deref() else {
        return err.into();
    };
    match find_by_isbn(conn, isbn13) {
        Ok(Some(existing)) => {
            tracing::debug!(id = existing.id, isbn13, "concurrent insert of the same isbn");
            ShelfError::DuplicateBook {
                id: existing.id,
                isbn13: isbn13.to_string(),
            }
        }
        _ => err.into(),
    }
}

/// Delete a book and return what was removed.
///
/// # Errors
///
/// Returns [`ShelfError::BookNotFound`] if no book has this id.
pub fn delete_book(conn: &Connection, id: i64) -> Result<Book, ShelfError> {
    let book = require_book(conn, id)?;
    conn.execute("DELETE FROM books WHERE id = ?1", params![id])?;
    tracing::info!(id, title = %book.title, "book removed");
    Ok(book)
}

/// File a book under a genre (created on demand), or clear it with `None`.
///
/// # Errors
///
/// Returns [`ShelfError::BookNotFound`] if no book has this id.
pub fn set_book_genre(
    conn: &Connection,
    id: i64,
    genre: Option<&str>,
) -> Result<Book, ShelfError> {
    require_book(conn, id)?;

    let tx = conn.unchecked_transaction()?;
    let genre_id = match genre.map(str::trim).filter(|g| !g.is_empty()) {
        Some(name) => Some(genres::ensure_genre(&tx, name)?.id),
        None => None,
    };
    tx.execute(
        "UPDATE books SET genre_id = ?1 WHERE id = ?2",
        params![genre_id, id],
    )?;
    tx.commit()?;

    tracing::info!(id, genre = ?genre, "book genre updated");
    require_book(conn, id)
}

//! Canonical SQLite schema for the book catalog.
//!
//! - `books` holds one row per saved book; ISBN-10 and ISBN-13 live in
//!   separate nullable columns
//! - `genres` is a case-insensitive lookup table referenced by `books.genre_id`
//! - `catalog_meta` mirrors the schema version for inspection tools

/// Migration v1: core tables plus catalog metadata.
pub const MIGRATION_V1_SQL: &str = r"
CREATE TABLE IF NOT EXISTS genres (
    id INTEGER PRIMARY KEY,
    name TEXT NOT NULL UNIQUE COLLATE NOCASE CHECK (length(trim(name)) > 0)
);

CREATE TABLE IF NOT EXISTS books (
    id INTEGER PRIMARY KEY,
    title TEXT NOT NULL CHECK (length(trim(title)) > 0),
    author TEXT NOT NULL CHECK (length(trim(author)) > 0),
    pub_year TEXT,
    isbn10 TEXT CHECK (isbn10 IS NULL OR length(isbn10) = 10),
    isbn13 TEXT CHECK (isbn13 IS NULL OR length(isbn13) = 13),
    genre_id INTEGER REFERENCES genres(id) ON DELETE SET NULL,
    created_at_us INTEGER NOT NULL
);

CREATE TABLE IF NOT EXISTS catalog_meta (
    id INTEGER PRIMARY KEY CHECK (id = 1),
    schema_version INTEGER NOT NULL
);

INSERT OR IGNORE INTO catalog_meta (id, schema_version) VALUES (1, 1);
";

/// Migration v2: read-path indexes and ISBN-13 uniqueness.
pub const MIGRATION_V2_SQL: &str = r"
CREATE INDEX IF NOT EXISTS idx_books_title
    ON books(title COLLATE NOCASE);

CREATE INDEX IF NOT EXISTS idx_books_author
    ON books(author COLLATE NOCASE);

CREATE INDEX IF NOT EXISTS idx_books_genre
    ON books(genre_id);

CREATE UNIQUE INDEX IF NOT EXISTS idx_books_isbn13
    ON books(isbn13) WHERE isbn13 IS NOT NULL;
";

/// Indexes the latest schema must contain.
pub const REQUIRED_INDEXES: &[&str] = &[
    "idx_books_title",
    "idx_books_author",
    "idx_books_genre",
    "idx_books_isbn13",
];

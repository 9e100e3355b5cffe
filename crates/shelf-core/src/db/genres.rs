//! Genre lookup table helpers.

use crate::error::ShelfError;
use crate::model::Genre;
use rusqlite::{Connection, OptionalExtension, params};

fn row_to_genre(row: &rusqlite::Row<'_>) -> rusqlite::Result<Genre> {
    let count: i64 = row.get(2)?;
    Ok(Genre {
        id: row.get(0)?,
        name: row.get(1)?,
        book_count: u64::try_from(count).unwrap_or(0),
    })
}

/// Look up a genre by name, case-insensitively.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn find_genre(conn: &Connection, name: &str) -> Result<Option<Genre>, ShelfError> {
    let genre = conn
        .query_row(
            "SELECT g.id, g.name, \
             (SELECT COUNT(*) FROM books b WHERE b.genre_id = g.id) \
             FROM genres g WHERE g.name = ?1 COLLATE NOCASE",
            params![name.trim()],
            row_to_genre,
        )
        .optional()?;
    Ok(genre)
}

/// Return the genre with this name, creating it if needed. The stored
/// spelling of an existing genre wins over `name`.
///
/// # Errors
///
/// Returns [`ShelfError::InvalidBook`] for a blank name, or a database error.
pub fn ensure_genre(conn: &Connection, name: &str) -> Result<Genre, ShelfError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(ShelfError::InvalidBook("genre name must not be blank".into()));
    }
    if let Some(existing) = find_genre(conn, name)? {
        return Ok(existing);
    }

    conn.execute("INSERT INTO genres (name) VALUES (?1)", params![name])?;
    let id = conn.last_insert_rowid();
    tracing::info!(id, name, "genre created");
    Ok(Genre {
        id,
        name: name.to_string(),
        book_count: 0,
    })
}

/// All genres with their book counts, alphabetically.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn list_genres(conn: &Connection) -> Result<Vec<Genre>, ShelfError> {
    let mut stmt = conn.prepare(
        "SELECT g.id, g.name, COUNT(b.id) \
         FROM genres g LEFT JOIN books b ON b.genre_id = g.id \
         GROUP BY g.id, g.name \
         ORDER BY g.name COLLATE NOCASE",
    )?;
    let rows = stmt.query_map([], row_to_genre)?;

    let mut genres = Vec::new();
    for row in rows {
        genres.push(row?);
    }
    Ok(genres)
}

/// Delete a genre. Books filed under it keep existing with no genre.
///
/// Returns the deleted genre (with the number of books it held).
///
/// # Errors
///
/// Returns [`ShelfError::GenreNotFound`] if no genre has this name.
pub fn delete_genre(conn: &Connection, name: &str) -> Result<Genre, ShelfError> {
    let Some(genre) = find_genre(conn, name)? else {
        return Err(ShelfError::GenreNotFound(name.trim().to_string()));
    };
    conn.execute("DELETE FROM genres WHERE id = ?1", params![genre.id])?;
    tracing::info!(id = genre.id, name = %genre.name, books = genre.book_count, "genre deleted");
    Ok(genre)
}

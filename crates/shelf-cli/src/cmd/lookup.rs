//! `shelf lookup` — save a book by ISBN.

use crate::cmd::show::render_book;
use crate::context::Context;
use clap::Args;
use rusqlite::Connection;
use shelf_core::ShelfError;
use shelf_core::api::{SearchQuery, VolumeSource};
use shelf_core::db::books;
use shelf_core::isbn::Isbn;
use shelf_core::model::{Book, NewBook};

#[derive(Args, Debug)]
pub struct LookupArgs {
    /// ISBN-10 or ISBN-13; hyphens allowed.
    pub isbn: String,

    /// Genre to file the book under.
    #[arg(short, long)]
    pub genre: Option<String>,
}

/// Resolve `raw` against the source and catalog the first match.
///
/// The local catalog is checked first so an already-saved ISBN never costs a
/// request.
///
/// # Errors
///
/// Returns [`ShelfError::InvalidIsbn`], [`ShelfError::DuplicateBook`],
/// [`ShelfError::NoMatch`], or a classified remote failure.
pub fn lookup_and_save(
    conn: &Connection,
    source: &dyn VolumeSource,
    raw: &str,
    genre: Option<&str>,
) -> Result<Book, ShelfError> {
    let isbn = Isbn::parse(raw)?;
    if let Some(existing) = books::find_by_isbn(conn, isbn.as_str())? {
        return Err(ShelfError::DuplicateBook {
            id: existing.id,
            isbn13: isbn.to_isbn13(),
        });
    }

    let rows = source.search_rows(&SearchQuery::by_isbn(isbn.as_str()))?;
    let Some(first) = rows.first() else {
        return Err(ShelfError::NoMatch(format!("ISBN {isbn}")));
    };
    tracing::debug!(volume = %first.volume_id, matches = rows.len(), "isbn resolved");

    let mut new_book = NewBook::from_row(first);
    if new_book.isbn10.is_none() && new_book.isbn13.is_none() {
        new_book = new_book.with_isbn(isbn.as_str())?;
    }
    new_book.genre = genre.map(str::to_string);
    books::insert_book(conn, new_book)
}

/// Look up one ISBN and save the first match.
///
/// # Errors
///
/// See [`lookup_and_save`].
pub fn run_lookup(args: &LookupArgs, ctx: &Context) -> anyhow::Result<()> {
    let conn = ctx.open_catalog()?;
    let client = ctx.client();
    let book = lookup_and_save(&conn, &client, &args.isbn, args.genre.as_deref())?;
    render_book(ctx.output, &book)
}

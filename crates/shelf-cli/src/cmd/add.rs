//! `shelf add` — manual catalog entry.

use crate::cmd::show::render_book;
use crate::context::Context;
use clap::Args;
use shelf_core::db::books;
use shelf_core::model::NewBook;

#[derive(Args, Debug)]
pub struct AddArgs {
    /// Book title.
    #[arg(short, long)]
    pub title: String,

    /// Author(s), as they should be displayed.
    #[arg(short, long)]
    pub author: String,

    /// Publication year.
    #[arg(short, long)]
    pub year: Option<String>,

    /// ISBN-10 or ISBN-13; hyphens allowed.
    #[arg(short, long)]
    pub isbn: Option<String>,

    /// Genre to file the book under (created if new).
    #[arg(short, long)]
    pub genre: Option<String>,
}

impl AddArgs {
    fn into_new_book(self) -> Result<NewBook, shelf_core::ShelfError> {
        let book = NewBook {
            title: self.title,
            author: self.author,
            pub_year: self.year,
            genre: self.genre,
            ..NewBook::default()
        };
        match self.isbn.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
            Some(raw) => book.with_isbn(raw),
            None => Ok(book),
        }
    }
}

/// Insert a hand-entered book.
///
/// # Errors
///
/// Returns an error for a blank title/author, an invalid ISBN, or an ISBN
/// that is already cataloged.
pub fn run_add(args: AddArgs, ctx: &Context) -> anyhow::Result<()> {
    let new_book = args.into_new_book()?;
    let conn = ctx.open_catalog()?;
    let book = books::insert_book(&conn, new_book)?;
    render_book(ctx.output, &book)
}

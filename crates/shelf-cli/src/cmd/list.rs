//! `shelf list` — list saved books with filtering.

use crate::context::Context;
use crate::output::{OutputMode, Renderable, pretty_section, render_list, truncate};
use clap::Args;
use shelf_core::db::{BookFilter, BookSort, books};
use shelf_core::model::Book;
use std::io::{self, Write};

#[derive(Args, Debug)]
pub struct ListArgs {
    /// Case-insensitive text to match in title or author.
    #[arg(short, long)]
    pub query: Option<String>,

    /// Only books filed under this genre.
    #[arg(short, long)]
    pub genre: Option<String>,

    /// Sort order: title, author, year, added.
    #[arg(short, long, default_value_t = BookSort::Title)]
    pub sort: BookSort,

    /// Maximum books to show.
    #[arg(short = 'n', long)]
    pub limit: Option<u32>,
}

impl ListArgs {
    fn filter(&self) -> BookFilter {
        BookFilter {
            text: self.query.clone(),
            genre: self.genre.clone(),
            sort: self.sort,
            limit: self.limit,
        }
    }
}

impl Renderable for Book {
    fn render_human(&self, w: &mut dyn Write) -> io::Result<()> {
        writeln!(
            w,
            "{:>5}  {:<36} {:<24} {:<6} {}",
            format!("#{}", self.id),
            truncate(&self.title, 36),
            truncate(&self.author, 24),
            self.pub_year.as_deref().unwrap_or("-"),
            self.genre.as_deref().unwrap_or(""),
        )
    }

    fn render_json(&self, w: &mut dyn Write) -> io::Result<()> {
        serde_json::to_writer_pretty(w, self).map_err(io::Error::other)
    }

    fn render_table(&self, w: &mut dyn Write) -> io::Result<()> {
        writeln!(
            w,
            "{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}",
            self.id,
            self.title,
            self.author,
            self.pub_year.as_deref().unwrap_or(""),
            self.isbn10.as_deref().unwrap_or(""),
            self.isbn13.as_deref().unwrap_or(""),
            self.genre.as_deref().unwrap_or(""),
            self.created_at.to_rfc3339(),
        )
    }

    fn table_headers() -> &'static [&'static str] {
        &["id", "title", "author", "year", "isbn10", "isbn13", "genre", "added"]
    }
}

/// List books matching the filter.
///
/// # Errors
///
/// Returns an error if the catalog cannot be opened or queried.
pub fn run_list(args: &ListArgs, ctx: &Context) -> anyhow::Result<()> {
    let conn = ctx.open_catalog()?;
    let found = books::list_books(&conn, &args.filter())?;

    if ctx.output == OutputMode::Pretty {
        let stdout = io::stdout();
        let mut out = stdout.lock();
        if found.is_empty() {
            writeln!(out, "No books found.")?;
            return Ok(());
        }
        pretty_section(&mut out, &format!("Catalog ({} books, by {})", found.len(), args.sort))?;
    }

    render_list(&found, ctx.output)?;
    Ok(())
}

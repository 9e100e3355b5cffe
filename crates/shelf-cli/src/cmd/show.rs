//! `shelf show` — display one saved book.

use crate::context::Context;
use crate::output::{OutputMode, pretty_kv, pretty_section, render_mode, write_list};
use chrono::Local;
use clap::Args;
use shelf_core::db::books;
use shelf_core::model::Book;
use std::io::{self, Write};

#[derive(Args, Debug)]
pub struct ShowArgs {
    /// Catalog ID (see `shelf list`).
    pub id: i64,
}

fn or_dash(value: Option<&str>) -> &str {
    value.unwrap_or("-")
}

/// Multi-line human block for a single book.
pub fn write_book_detail(w: &mut dyn Write, book: &Book) -> io::Result<()> {
    pretty_section(w, &format!("#{}  {}", book.id, book.title))?;
    pretty_kv(w, "Author", &book.author)?;
    pretty_kv(w, "Published", or_dash(book.pub_year.as_deref()))?;
    pretty_kv(w, "ISBN-10", or_dash(book.isbn10.as_deref()))?;
    pretty_kv(w, "ISBN-13", or_dash(book.isbn13.as_deref()))?;
    pretty_kv(w, "Genre", or_dash(book.genre.as_deref()))?;
    pretty_kv(
        w,
        "Added",
        book.created_at
            .with_timezone(&Local)
            .format("%Y-%m-%d %H:%M:%S")
            .to_string(),
    )
}

/// Render one book in any mode: detail block, single text row, or object.
pub fn render_book(mode: OutputMode, book: &Book) -> anyhow::Result<()> {
    render_mode(
        mode,
        book,
        |b, w| write_list(w, std::slice::from_ref(b), OutputMode::Text),
        |b, w| write_book_detail(w, b),
    )
}

/// Show one book.
///
/// # Errors
///
/// Returns [`shelf_core::ShelfError::BookNotFound`] for an unknown ID.
pub fn run_show(args: &ShowArgs, ctx: &Context) -> anyhow::Result<()> {
    let conn = ctx.open_catalog()?;
    let book = books::require_book(&conn, args.id)?;
    render_book(ctx.output, &book)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn sample() -> Book {
        Book {
            id: 3,
            title: "Frankenstein".into(),
            author: "Mary Shelley".into(),
            pub_year: Some("2003".into()),
            isbn10: None,
            isbn13: Some("9780141439471".into()),
            genre: None,
            created_at: Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).single().expect("valid ts"),
        }
    }

    #[test]
    fn show_args_take_numeric_id() {
        use clap::Parser;

        #[derive(Parser)]
        struct Wrapper {
            #[command(flatten)]
            args: ShowArgs,
        }
        assert_eq!(Wrapper::parse_from(["test", "12"]).args.id, 12);
        assert!(Wrapper::try_parse_from(["test", "twelve"]).is_err());
    }

    #[test]
    fn detail_marks_missing_fields() {
        let mut buf = Vec::new();
        write_book_detail(&mut buf, &sample()).expect("render");
        let out = String::from_utf8(buf).expect("utf8");

        assert!(out.starts_with("#3  Frankenstein\n"));
        assert!(out.contains("Author:      Mary Shelley"));
        assert!(out.contains("ISBN-10:     -"));
        assert!(out.contains("ISBN-13:     9780141439471"));
        assert!(out.contains("Genre:       -"));
    }
}

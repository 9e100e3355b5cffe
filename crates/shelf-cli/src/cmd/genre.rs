//! `shelf genre`, `shelf tag`, `shelf untag` — genre management.

use crate::cmd::show::render_book;
use crate::context::Context;
use crate::output::{OutputMode, Renderable, pretty_section, render_list, render_success};
use clap::{Args, Subcommand};
use shelf_core::db::{books, genres};
use shelf_core::model::Genre;
use std::io::{self, Write};

#[derive(Subcommand, Debug)]
pub enum GenreCommand {
    /// List genres with book counts.
    List,
    /// Create a genre.
    Add {
        /// Genre name (case-insensitive).
        name: String,
    },
    /// Delete a genre; its books stay in the catalog untagged.
    Remove {
        /// Genre name (case-insensitive).
        name: String,
    },
}

#[derive(Args, Debug)]
pub struct TagArgs {
    /// Catalog ID of the book.
    pub id: i64,
    /// Genre name, created if new.
    pub genre: String,
}

#[derive(Args, Debug)]
pub struct UntagArgs {
    /// Catalog ID of the book.
    pub id: i64,
}

impl Renderable for Genre {
    fn render_human(&self, w: &mut dyn Write) -> io::Result<()> {
        writeln!(w, "{:<24} {:>5}", self.name, self.book_count)
    }

    fn render_json(&self, w: &mut dyn Write) -> io::Result<()> {
        serde_json::to_writer_pretty(w, self).map_err(io::Error::other)
    }

    fn render_table(&self, w: &mut dyn Write) -> io::Result<()> {
        writeln!(w, "{}\t{}\t{}", self.id, self.name, self.book_count)
    }

    fn table_headers() -> &'static [&'static str] {
        &["id", "name", "books"]
    }
}

/// Dispatch a `shelf genre` subcommand.
///
/// # Errors
///
/// Returns an error if the catalog fails or a removed genre does not exist.
pub fn run_genre(command: &GenreCommand, ctx: &Context) -> anyhow::Result<()> {
    let conn = ctx.open_catalog()?;
    match command {
        GenreCommand::List => {
            let all = genres::list_genres(&conn)?;
            if ctx.output == OutputMode::Pretty {
                let mut out = io::stdout().lock();
                if all.is_empty() {
                    writeln!(out, "No genres yet.")?;
                    return Ok(());
                }
                pretty_section(&mut out, "Genres")?;
            }
            render_list(&all, ctx.output)?;
            Ok(())
        }
        GenreCommand::Add { name } => {
            let genre = genres::ensure_genre(&conn, name)?;
            render_success(ctx.output, &format!("Genre '{}' ready", genre.name))
        }
        GenreCommand::Remove { name } => {
            let removed = genres::delete_genre(&conn, name)?;
            render_success(
                ctx.output,
                &format!(
                    "Removed genre '{}' ({} books untagged)",
                    removed.name, removed.book_count
                ),
            )
        }
    }
}

/// File a book under a genre.
///
/// # Errors
///
/// Returns [`shelf_core::ShelfError::BookNotFound`] for an unknown ID.
pub fn run_tag(args: &TagArgs, ctx: &Context) -> anyhow::Result<()> {
    let conn = ctx.open_catalog()?;
    let book = books::set_book_genre(&conn, args.id, Some(&args.genre))?;
    render_book(ctx.output, &book)
}

/// Clear a book's genre.
///
/// # Errors
///
/// Returns [`shelf_core::ShelfError::BookNotFound`] for an unknown ID.
pub fn run_untag(args: &UntagArgs, ctx: &Context) -> anyhow::Result<()> {
    let conn = ctx.open_catalog()?;
    let book = books::set_book_genre(&conn, args.id, None)?;
    render_book(ctx.output, &book)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::write_list;
    use clap::Parser;

    #[derive(Parser)]
    struct TagWrapper {
        #[command(flatten)]
        args: TagArgs,
    }

    #[test]
    fn tag_args_take_id_then_genre() {
        let w = TagWrapper::parse_from(["test", "7", "Science Fiction"]);
        assert_eq!(w.args.id, 7);
        assert_eq!(w.args.genre, "Science Fiction");
        assert!(TagWrapper::try_parse_from(["test", "7"]).is_err());
    }

    #[test]
    fn genre_rows_render_counts() {
        let rows = vec![
            Genre {
                id: 1,
                name: "Gothic".into(),
                book_count: 2,
            },
            Genre {
                id: 2,
                name: "Poetry".into(),
                book_count: 0,
            },
        ];
        let mut buf = Vec::new();
        write_list(&mut buf, &rows, OutputMode::Text).expect("render");
        assert_eq!(
            String::from_utf8(buf).expect("utf8"),
            "id\tname\tbooks\n1\tGothic\t2\n2\tPoetry\t0\n"
        );
    }
}

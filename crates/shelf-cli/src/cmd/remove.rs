//! `shelf remove` — delete a saved book.

use crate::context::Context;
use crate::output::render_success;
use clap::Args;
use shelf_core::db::books;

#[derive(Args, Debug)]
pub struct RemoveArgs {
    /// Catalog ID of the book to remove.
    pub id: i64,
}

/// Delete one book by ID.
///
/// # Errors
///
/// Returns [`shelf_core::ShelfError::BookNotFound`] for an unknown ID.
pub fn run_remove(args: &RemoveArgs, ctx: &Context) -> anyhow::Result<()> {
    let conn = ctx.open_catalog()?;
    let removed = books::delete_book(&conn, args.id)?;
    render_success(
        ctx.output,
        &format!("Removed #{} {} ({})", removed.id, removed.title, removed.author),
    )
}

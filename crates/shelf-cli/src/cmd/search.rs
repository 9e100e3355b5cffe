//! `shelf search` — query the volumes API and optionally save results.

use crate::context::Context;
use crate::output::{pretty_section, render_mode, truncate};
use clap::Args;
use rusqlite::Connection;
use serde::Serialize;
use shelf_core::ShelfError;
use shelf_core::api::{BookRow, BooksClient, SearchQuery, VolumeDetails, VolumeSource, flatten};
use shelf_core::db::books;
use shelf_core::model::{Book, NewBook};
use std::io::{self, Write};

#[derive(Args, Debug)]
pub struct SearchArgs {
    /// Match in the title.
    #[arg(short, long)]
    pub title: Option<String>,

    /// Match in the author.
    #[arg(short, long)]
    pub author: Option<String>,

    /// Match an ISBN-10 or ISBN-13.
    #[arg(short, long)]
    pub isbn: Option<String>,

    /// Maximum results to request (1-40; default from config).
    #[arg(short = 'n', long)]
    pub limit: Option<u32>,

    /// Save these results (1-based indexes) to the catalog.
    #[arg(long, value_name = "INDEX", num_args = 1..)]
    pub save: Vec<usize>,

    /// Genre for saved results.
    #[arg(short, long, requires = "save")]
    pub genre: Option<String>,
}

impl SearchArgs {
    fn query(&self) -> SearchQuery {
        SearchQuery::new(
            self.title.clone().unwrap_or_default(),
            self.author.clone().unwrap_or_default(),
            self.isbn.clone().unwrap_or_default(),
        )
    }
}

#[derive(Debug, Serialize)]
pub struct IndexedRow {
    pub index: usize,
    #[serde(flatten)]
    pub row: BookRow,
    #[serde(flatten)]
    pub details: VolumeDetails,
}

#[derive(Debug, Serialize)]
pub struct SkippedRow {
    pub index: usize,
    pub reason: String,
}

#[derive(Debug, Serialize)]
pub struct SearchReport {
    pub query: String,
    pub total_items: u64,
    pub results: Vec<IndexedRow>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub saved: Vec<Book>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub skipped: Vec<SkippedRow>,
}

/// Save the selected rows. Rows that cannot be cataloged (out of range,
/// missing title/author, already saved) are skipped with a reason; other
/// failures abort.
fn save_rows(
    conn: &Connection,
    rows: &[BookRow],
    indexes: &[usize],
    genre: Option<&str>,
) -> Result<(Vec<Book>, Vec<SkippedRow>), ShelfError> {
    let mut saved = Vec::new();
    let mut skipped = Vec::new();

    for &index in indexes {
        let Some(row) = index.checked_sub(1).and_then(|i| rows.get(i)) else {
            skipped.push(SkippedRow {
                index,
                reason: format!("no result #{index}"),
            });
            continue;
        };

        let mut new_book = NewBook::from_row(row);
        new_book.genre = genre.map(str::to_string);
        match books::insert_book(conn, new_book) {
            Ok(book) => saved.push(book),
            Err(
                err @ (ShelfError::DuplicateBook { .. }
                | ShelfError::InvalidBook(_)
                | ShelfError::InvalidIsbn { .. }),
            ) => {
                tracing::debug!(index, error = %err, "result not saved");
                skipped.push(SkippedRow {
                    index,
                    reason: err.to_string(),
                });
            }
            Err(err) => return Err(err),
        }
    }

    Ok((saved, skipped))
}

fn write_text(report: &SearchReport, w: &mut dyn Write) -> io::Result<()> {
    if !report.results.is_empty() {
        writeln!(w, "index\ttitle\tauthor\tpublished\tisbn10\tisbn13")?;
    }
    for r in &report.results {
        writeln!(
            w,
            "{}\t{}\t{}\t{}\t{}\t{}",
            r.index,
            r.row.title,
            r.row.author,
            r.row.published,
            r.row.isbn10.as_deref().unwrap_or(""),
            r.row.isbn13.as_deref().unwrap_or(""),
        )?;
    }
    for book in &report.saved {
        writeln!(w, "saved\t{}\t{}", book.id, book.title)?;
    }
    for skip in &report.skipped {
        writeln!(w, "skipped\t{}\t{}", skip.index, skip.reason)?;
    }
    Ok(())
}

fn write_pretty(report: &SearchReport, w: &mut dyn Write) -> io::Result<()> {
    if report.results.is_empty() {
        writeln!(w, "No results for {}", report.query)?;
        return Ok(());
    }

    pretty_section(
        w,
        &format!(
            "{} of {} results for {}",
            report.results.len(),
            report.total_items,
            report.query
        ),
    )?;
    writeln!(
        w,
        "{:>3}  {:<34} {:<22} {:<10} {:<10} {}",
        "#", "Title", "Author", "Published", "ISBN-10", "ISBN-13"
    )?;
    for r in &report.results {
        writeln!(
            w,
            "{:>3}  {:<34} {:<22} {:<10} {:<10} {}",
            r.index,
            truncate(&r.row.title, 34),
            truncate(&r.row.author, 22),
            truncate(&r.row.published, 10),
            r.row.isbn10.as_deref().unwrap_or("-"),
            r.row.isbn13.as_deref().unwrap_or("-"),
        )?;
        let summary = r.details.summary();
        if !summary.is_empty() {
            writeln!(w, "     {}", truncate(&summary, 66))?;
        }
    }

    for book in &report.saved {
        writeln!(w, "✓ saved #{} {}", book.id, book.title)?;
    }
    for skip in &report.skipped {
        writeln!(w, "✗ skipped result {}: {}", skip.index, skip.reason)?;
    }
    Ok(())
}

/// Run one search and print the flattened rows.
///
/// # Errors
///
/// Returns [`ShelfError::EmptyQuery`] when no field is given, or the
/// classified remote failure.
pub fn run_search(args: &SearchArgs, ctx: &Context) -> anyhow::Result<()> {
    let query = args.query();
    let mut api = ctx.config.api.clone();
    if let Some(limit) = args.limit {
        api.max_results = limit;
    }

    let response = BooksClient::new(api).search(&query)?;
    let rows = flatten(&response);

    let (saved, skipped) = if args.save.is_empty() {
        (Vec::new(), Vec::new())
    } else {
        let conn = ctx.open_catalog()?;
        save_rows(&conn, &rows, &args.save, args.genre.as_deref())?
    };

    let report = SearchReport {
        query: query.to_query_string(),
        total_items: response.total_items,
        results: rows
            .into_iter()
            .zip(&response.items)
            .enumerate()
            .map(|(i, (row, volume))| IndexedRow {
                index: i + 1,
                row,
                details: volume.volume_info.details(),
            })
            .collect(),
        saved,
        skipped,
    };

    render_mode(ctx.output, &report, write_text, write_pretty)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use shelf_core::db::open_catalog_in_memory;

    #[derive(Parser)]
    struct Wrapper {
        #[command(flatten)]
        args: SearchArgs,
    }

    fn row(title: &str, author: &str, isbn13: Option<&str>) -> BookRow {
        BookRow {
            volume_id: format!("vol-{title}"),
            title: title.into(),
            author: author.into(),
            published: "1818-01-01".into(),
            isbn10: None,
            isbn13: isbn13.map(str::to_string),
        }
    }

    #[test]
    fn args_build_query_in_fixed_order() {
        let w = Wrapper::parse_from(["test", "--isbn", "123456789", "--title", "frankenstein"]);
        assert_eq!(
            w.args.query().to_query_string(),
            "intitle:frankenstein+isbn:123456789"
        );
    }

    #[test]
    fn no_fields_is_an_empty_query() {
        let w = Wrapper::parse_from(["test"]);
        assert!(w.args.query().is_empty());
    }

    #[test]
    fn save_takes_several_indexes() {
        let w = Wrapper::parse_from(["test", "-t", "dune", "--save", "2", "1", "-g", "SF"]);
        assert_eq!(w.args.save, vec![2, 1]);
        assert_eq!(w.args.genre.as_deref(), Some("SF"));
        assert!(Wrapper::try_parse_from(["test", "-t", "dune", "-g", "SF"]).is_err());
    }

    #[test]
    fn save_rows_skips_bad_indexes_and_incomplete_rows() {
        let conn = open_catalog_in_memory().expect("catalog");
        let rows = vec![
            row("Frankenstein", "Mary Shelley", Some("9780141439471")),
            row("Untitled pamphlet", "", None),
        ];

        let (saved, skipped) =
            save_rows(&conn, &rows, &[1, 2, 0, 9], Some("Gothic")).expect("save");
        assert_eq!(saved.len(), 1);
        assert_eq!(saved[0].genre.as_deref(), Some("Gothic"));
        assert_eq!(saved[0].pub_year.as_deref(), Some("1818"));

        let indexes: Vec<usize> = skipped.iter().map(|s| s.index).collect();
        assert_eq!(indexes, vec![2, 0, 9]);
        assert!(skipped[0].reason.contains("author"));
    }

    #[test]
    fn saving_twice_reports_duplicate() {
        let conn = open_catalog_in_memory().expect("catalog");
        let rows = vec![row("Frankenstein", "Mary Shelley", Some("9780141439471"))];

        save_rows(&conn, &rows, &[1], None).expect("first save");
        let (saved, skipped) = save_rows(&conn, &rows, &[1], None).expect("second save");
        assert!(saved.is_empty());
        assert!(skipped[0].reason.contains("already cataloged"));
    }

    #[test]
    fn pretty_rows_show_publisher_line() {
        let report = SearchReport {
            query: "intitle:frankenstein".into(),
            total_items: 1,
            results: vec![IndexedRow {
                index: 1,
                row: row("Frankenstein", "Mary Shelley", Some("9780141439471")),
                details: VolumeDetails {
                    publisher: Some("Penguin".into()),
                    page_count: Some(273),
                    ..VolumeDetails::default()
                },
            }],
            saved: Vec::new(),
            skipped: Vec::new(),
        };
        let mut buf = Vec::new();
        write_pretty(&report, &mut buf).expect("render");
        let out = String::from_utf8(buf).expect("utf8");
        assert!(out.contains("     Penguin, 273 pages\n"), "{out}");

        let json = serde_json::to_value(&report).expect("json");
        assert_eq!(json["results"][0]["publisher"], "Penguin");
        assert_eq!(json["results"][0]["page_count"], 273);
        assert!(json["results"][0].get("categories").is_none());
    }

    #[test]
    fn empty_report_says_no_results() {
        let report = SearchReport {
            query: "intitle:zzzz".into(),
            total_items: 0,
            results: Vec::new(),
            saved: Vec::new(),
            skipped: Vec::new(),
        };
        let mut buf = Vec::new();
        write_pretty(&report, &mut buf).expect("render");
        assert_eq!(String::from_utf8(buf).expect("utf8"), "No results for intitle:zzzz\n");

        let json = serde_json::to_value(&report).expect("json");
        assert!(json.get("saved").is_none());
        assert_eq!(json["results"], serde_json::json!([]));
    }
}

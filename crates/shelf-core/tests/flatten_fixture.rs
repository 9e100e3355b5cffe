//! Flattening a recorded volumes response into catalog-ready rows.

use shelf_core::api::{BookRow, flatten, parse_volumes};
use shelf_core::db::{books, open_catalog_in_memory};
use shelf_core::model::NewBook;

const FIXTURE: &str = include_str!("fixtures/volumes_frankenstein.json");

fn rows() -> Vec<BookRow> {
    flatten(&parse_volumes(FIXTURE).expect("fixture parses"))
}

#[test]
fn fixture_flattens_in_api_order() {
    let response = parse_volumes(FIXTURE).expect("fixture parses");
    assert_eq!(response.total_items, 1214);

    let titles: Vec<String> = flatten(&response).into_iter().map(|r| r.title).collect();
    assert_eq!(
        titles,
        [
            "Frankenstein",
            "Frankenstein Unbound",
            "Frankenstein: A Cultural History",
            "",
        ]
    );
}

#[test]
fn fixture_rows_carry_split_isbns() {
    let rows = rows();

    assert_eq!(rows[0].author, "Mary Wollstonecraft Shelley");
    assert_eq!(rows[0].isbn10.as_deref(), Some("0141439475"));
    assert_eq!(rows[0].isbn13.as_deref(), Some("9780141439471"));

    assert!(rows[1].isbn10.is_none());
    assert_eq!(rows[1].isbn13.as_deref(), Some("9780575079007"));
    assert_eq!(rows[1].publication_year().as_deref(), Some("1973"));

    assert!(rows[2].isbn10.is_none());
    assert!(rows[2].isbn13.is_none());
    assert_eq!(rows[2].author, "");

    assert_eq!(rows[3].volume_id, "NOINFO000001");
    assert_eq!(rows[3], BookRow {
        volume_id: "NOINFO000001".into(),
        ..BookRow::default()
    });
}

#[test]
fn flattened_row_saves_to_catalog() {
    let conn = open_catalog_in_memory().expect("catalog");
    let row = &rows()[0];

    let book = books::insert_book(&conn, NewBook::from_row(row)).expect("insert");
    assert_eq!(book.title, "Frankenstein");
    assert_eq!(book.pub_year.as_deref(), Some("2003"));
    assert_eq!(book.isbn13.as_deref(), Some("9780141439471"));

    let again = books::insert_book(&conn, NewBook::from_row(row));
    assert!(again.is_err(), "same volume must not be cataloged twice");
}

#[test]
fn row_without_author_cannot_be_saved() {
    let conn = open_catalog_in_memory().expect("catalog");
    let row = &rows()[2];
    let err = books::insert_book(&conn, NewBook::from_row(row)).expect_err("no author");
    assert_eq!(err.error_code(), shelf_core::ErrorCode::InvalidBook);
}

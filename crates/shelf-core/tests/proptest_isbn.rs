//! Property tests for ISBN check digits and query assembly.

use proptest::prelude::*;
use shelf_core::api::SearchQuery;
use shelf_core::isbn::{Isbn, normalize};

/// Append a valid ISBN-13 check digit to twelve digits.
fn complete_isbn13(first12: &[u8]) -> String {
    let sum: u32 = first12
        .iter()
        .enumerate()
        .map(|(i, d)| u32::from(*d) * if i % 2 == 0 { 1 } else { 3 })
        .sum();
    let check = (10 - sum % 10) % 10;
    let mut out: String = first12.iter().map(|d| char::from(b'0' + d)).collect();
    out.push_str(&check.to_string());
    out
}

proptest! {
    #[test]
    fn valid_isbn13_round_trips(digits in prop::collection::vec(0u8..10, 12)) {
        let isbn = complete_isbn13(&digits);
        let parsed = Isbn::parse(&isbn).expect("constructed isbn is valid");
        prop_assert_eq!(parsed.as_str(), isbn.as_str());
        prop_assert_eq!(parsed.to_isbn13(), isbn);
    }

    #[test]
    fn single_digit_change_breaks_isbn13(
        digits in prop::collection::vec(0u8..10, 12),
        position in 0usize..13,
        delta in 1u8..10,
    ) {
        let isbn = complete_isbn13(&digits);
        let mut bytes = isbn.into_bytes();
        bytes[position] = b'0' + (bytes[position] - b'0' + delta) % 10;
        let corrupted = String::from_utf8(bytes).expect("ascii");
        prop_assert!(Isbn::parse(&corrupted).is_err());
    }

    #[test]
    fn converted_isbn10_is_valid_isbn13(digits in prop::collection::vec(0u8..10, 9)) {
        let body: String = digits.iter().map(|d| char::from(b'0' + d)).collect();
        let sum: u32 = digits
            .iter()
            .enumerate()
            .map(|(i, d)| u32::from(*d) * (10 - u32::try_from(i).expect("small index")))
            .sum();
        let check = (11 - sum % 11) % 11;
        let isbn10 = if check == 10 { format!("{body}X") } else { format!("{body}{check}") };

        let parsed = Isbn::parse(&isbn10).expect("constructed isbn10 is valid");
        let isbn13 = parsed.to_isbn13();
        prop_assert!(isbn13.starts_with("978"));
        prop_assert!(Isbn::parse(&isbn13).is_ok());
    }

    #[test]
    fn hyphenation_does_not_matter(digits in prop::collection::vec(0u8..10, 12)) {
        let isbn = complete_isbn13(&digits);
        let hyphenated = format!("{}-{}-{}", &isbn[..3], &isbn[3..8], &isbn[8..]);
        prop_assert_eq!(normalize(&hyphenated), isbn.clone());
        prop_assert!(Isbn::parse(&hyphenated).is_ok());
    }

    #[test]
    fn query_string_has_one_term_per_present_field(
        title in "[a-z]{0,8}",
        author in "[a-z]{0,8}",
        isbn in "[0-9]{0,13}",
    ) {
        let query = SearchQuery::new(title.clone(), author.clone(), isbn.clone());
        let q = query.to_query_string();
        let present = [&title, &author, &isbn].iter().filter(|f| !f.is_empty()).count();

        if present == 0 {
            prop_assert_eq!(q, "");
        } else {
            prop_assert_eq!(q.split('+').count(), present);
            prop_assert!(!q.starts_with('+') && !q.ends_with('+'));
        }
    }
}

proptest! {
    #[test]
    fn arbitrary_input_never_panics(raw in any::<String>()) {
        if let Ok(isbn) = Isbn::parse(&raw) {
            prop_assert!(isbn.as_str().bytes().all(|b| b.is_ascii_digit() || b == b'X'));
        }
    }

    #[test]
    fn ten_chars_with_trailing_non_ascii_are_rejected(
        body in "[0-9]{8,9}",
        tail in "[^\\x00-\\x7F]",
    ) {
        let raw = format!("{body}{tail}");
        prop_assert!(Isbn::parse(&raw).is_err());
    }
}

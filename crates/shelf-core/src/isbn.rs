//! ISBN normalization, check-digit validation, and ISBN-10 → ISBN-13 conversion.

use crate::error::ShelfError;
use std::fmt;

/// A validated ISBN in normalized form (digits only, `X` check digit allowed
/// for ISBN-10).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Isbn {
    Isbn10(String),
    Isbn13(String),
}

/// Strip hyphens and whitespace and uppercase a trailing `x`.
#[must_use]
pub fn normalize(raw: &str) -> String {
    raw.chars()
        .filter(|c| !c.is_whitespace() && *c != '-')
        .map(|c| c.to_ascii_uppercase())
        .collect()
}

impl Isbn {
    /// Parse and validate an ISBN-10 or ISBN-13.
    ///
    /// # Errors
    ///
    /// Returns [`ShelfError::InvalidIsbn`] when the input has the wrong
    /// length, contains non-digit characters, or fails its check digit.
    pub fn parse(raw: &str) -> Result<Self, ShelfError> {
        let normalized = normalize(raw);
        let invalid = |reason| ShelfError::InvalidIsbn {
            input: raw.to_string(),
            reason,
        };

        if !normalized.is_ascii() {
            return Err(invalid("ISBN may contain only digits and X"));
        }

        match normalized.len() {
            10 => {
                let (body, check) = normalized.split_at(9);
                if !body.bytes().all(|b| b.is_ascii_digit()) {
                    return Err(invalid("ISBN-10 must be 9 digits plus a check digit"));
                }
                if !(check == "X" || check.bytes().all(|b| b.is_ascii_digit())) {
                    return Err(invalid("ISBN-10 check digit must be 0-9 or X"));
                }
                if isbn10_checksum(&normalized) != 0 {
                    return Err(invalid("ISBN-10 check digit does not match"));
                }
                Ok(Self::Isbn10(normalized))
            }
            13 => {
                if !normalized.bytes().all(|b| b.is_ascii_digit()) {
                    return Err(invalid("ISBN-13 must contain only digits"));
                }
                if isbn13_check_digit(&normalized[..12]) != digit_at(&normalized, 12) {
                    return Err(invalid("ISBN-13 check digit does not match"));
                }
                Ok(Self::Isbn13(normalized))
            }
            _ => Err(invalid("expected 10 or 13 characters")),
        }
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Isbn10(s) | Self::Isbn13(s) => s,
        }
    }

    /// Canonical ISBN-13 form. ISBN-10 values gain the `978` prefix and a
    /// recomputed check digit.
    #[must_use]
    pub fn to_isbn13(&self) -> String {
        match self {
            Self::Isbn13(s) => s.clone(),
            Self::Isbn10(s) => {
                let mut out = format!("978{}", &s[..9]);
                let check = isbn13_check_digit(&out);
                out.push(char::from(b'0' + check));
                out
            }
        }
    }
}

impl fmt::Display for Isbn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

fn digit_at(s: &str, index: usize) -> u8 {
    s.as_bytes()[index] - b'0'
}

/// Weighted sum mod 11; zero for a valid ISBN-10.
fn isbn10_checksum(s: &str) -> u32 {
    s.bytes()
        .enumerate()
        .map(|(i, b)| {
            let value = if b == b'X' { 10 } else { u32::from(b - b'0') };
            // weights run 10 down to 1
            value * (10 - u32::try_from(i).unwrap_or(0))
        })
        .sum::<u32>()
        % 11
}

/// Check digit for the first twelve digits of an ISBN-13.
fn isbn13_check_digit(first12: &str) -> u8 {
    let sum: u32 = first12
        .bytes()
        .enumerate()
        .map(|(i, b)| {
            let d = u32::from(b - b'0');
            if i % 2 == 0 { d } else { d * 3 }
        })
        .sum();
    u8::try_from((10 - sum % 10) % 10).unwrap_or(0)
}

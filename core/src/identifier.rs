//! Splitting and normalizing source-side field identifiers.
//!
//! Validation engines report failures against the field identifier as written
//! in code (`UserName`, `PDFLoader`). Clients only know the JSON property name
//! (`user_name`, `pdf_loader`). This module recovers the latter from the
//! former.
//!
//! # Algorithm
//!
//! 1. Classify every code point as lowercase, uppercase, digit or other.
//! 2. Group consecutive code points of the same class into runs.
//! 3. Walk adjacent runs left to right: when a run starting with an uppercase
//!    letter is followed by a run starting with a lowercase letter, hand the
//!    last code point of the first run over to the second (`PDFL` + `oader`
//!    becomes `PDF` + `Loader`).
//! 4. Drop runs left empty by step 3.
//!
//! Runs are always contiguous, so segments are borrowed slices of the input.

use crate::constants::PROPERTY_SEPARATOR;

/// Code point classes used to form runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CharClass {
    Lower,
    Upper,
    /// Any numeric char (`Nd`, `Nl`, `No`), so `²` and `¾` count too.
    Digit,
    Other,
}

impl CharClass {
    fn of(c: char) -> Self {
        if c.is_lowercase() {
            Self::Lower
        } else if c.is_uppercase() {
            Self::Upper
        } else if c.is_numeric() {
            Self::Digit
        } else {
            Self::Other
        }
    }
}

fn starts_with(segment: &str, predicate: fn(char) -> bool) -> bool {
    segment.chars().next().is_some_and(predicate)
}

/// Split a camel or Pascal case identifier into its word segments.
///
/// # Examples
///
/// ```
/// use apicore::identifier::split;
///
/// assert_eq!(split("UserName"), ["User", "Name"]);
/// assert_eq!(split("PDFLoader"), ["PDF", "Loader"]);
/// assert!(split("").is_empty());
/// ```
#[must_use]
pub fn split(identifier: &str) -> Vec<&str> {
    // Byte offset where each run starts, closed by the input length.
    let mut bounds = Vec::new();
    let mut previous = None;
    for (offset, c) in identifier.char_indices() {
        let class = CharClass::of(c);
        if previous != Some(class) {
            bounds.push(offset);
        }
        previous = Some(class);
    }
    bounds.push(identifier.len());

    for i in 0..bounds.len().saturating_sub(2) {
        let current = &identifier[bounds[i]..bounds[i + 1]];
        let next = &identifier[bounds[i + 1]..bounds[i + 2]];
        if starts_with(current, char::is_uppercase) && starts_with(next, char::is_lowercase) {
            if let Some(moved) = current.chars().next_back() {
                bounds[i + 1] -= moved.len_utf8();
            }
        }
    }

    bounds
        .windows(2)
        .map(|run| &identifier[run[0]..run[1]])
        .filter(|segment| !segment.is_empty())
        .collect()
}

/// Split raw identifier bytes, tolerating invalid UTF-8.
///
/// Input that is not valid UTF-8 is returned unchanged as a single segment.
#[must_use]
pub fn split_bytes(raw: &[u8]) -> Vec<&[u8]> {
    match std::str::from_utf8(raw) {
        Ok(identifier) => split(identifier).into_iter().map(str::as_bytes).collect(),
        Err(_) => vec![raw],
    }
}

/// Canonical external property name for a field identifier.
///
/// # Examples
///
/// ```
/// use apicore::identifier::normalize;
///
/// assert_eq!(normalize("UserName"), "user_name");
/// assert_eq!(normalize("PDFLoader"), "pdf_loader");
/// ```
#[must_use]
pub fn normalize(identifier: &str) -> String {
    // Per-char mapping; `str::to_lowercase` would turn a final Σ into ς.
    split(identifier)
        .join(PROPERTY_SEPARATOR)
        .chars()
        .flat_map(char::to_lowercase)
        .collect()
}

//! Structure sequence numbers.
//!
//! Every report identifies a pole by a four-digit "sequence". The reports
//! disagree on decoration (`SEQ 0042`, `0042 & 0043`, `0042`), so each raw
//! identifier is reduced to a [`SequenceKey`] before any join happens.

use std::cmp::Ordering;
use std::fmt;

use serde::{Serialize, Serializer};

use crate::error::ReconError;

/// Canonical identifier for one structure.
///
/// Keys order by the integer value of their digits, never lexicographically,
/// so `"0009"` sorts before `"10"`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SequenceKey {
    text: String,
    number: u64,
}

impl SequenceKey {
    /// Wrap text that is already a sequence identifier.
    ///
    /// Lenient counterpart of [`normalize`]: accepts any text containing a
    /// digit run and orders it by that run's value. Returns `None` when the
    /// text has no digits.
    pub fn new(text: impl Into<String>) -> Option<Self> {
        let text = text.into().trim().to_string();
        let number = first_digit_run(&text)?.parse().ok()?;
        Some(Self { text, number })
    }

    /// Canonical key for a bare structure number (`42` -> `"0042"`).
    pub fn from_number(number: u64) -> Result<Self, ReconError> {
        normalize(&format!("{number:04}"))
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn number(&self) -> u64 {
        self.number
    }
}

impl Ord for SequenceKey {
    fn cmp(&self, other: &Self) -> Ordering {
        self.number
            .cmp(&other.number)
            .then_with(|| self.text.cmp(&other.text))
    }
}

impl PartialOrd for SequenceKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for SequenceKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

impl Serialize for SequenceKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.text)
    }
}

/// Reduce a raw report identifier to its canonical key.
///
/// Strips a leading `SEQ` label, keeps only the part before an `&` (the
/// secondary structure of a shared stake is dropped), then requires the
/// first digit run to be exactly four digits.
pub fn normalize(raw: &str) -> Result<SequenceKey, ReconError> {
    let malformed = || ReconError::MalformedKey { raw: raw.to_string() };

    let mut text = raw.trim();
    if let Some(rest) = text.strip_prefix("SEQ") {
        text = rest.trim_start();
    }
    if let Some((primary, _secondary)) = text.split_once('&') {
        text = primary.trim();
    }

    let digits = first_digit_run(text).ok_or_else(malformed)?;
    if digits.len() != 4 {
        return Err(malformed());
    }
    let number = digits.parse().map_err(|_| malformed())?;

    Ok(SequenceKey { text: digits.to_string(), number })
}

fn first_digit_run(text: &str) -> Option<&str> {
    let start = text.find(|c: char| c.is_ascii_digit())?;
    let rest = &text[start..];
    let end = rest
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(rest.len());
    Some(&rest[..end])
}

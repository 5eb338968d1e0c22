//! Age normalization
//!
//! Raw ages arrive in one of four encodings:
//!
//! | Encoding    | Example  | Candidate age         |
//! |-------------|----------|-----------------------|
//! | Generation  | `30代`   | 30                    |
//! | Approximate | `35ca`   | 35                    |
//! | Range       | `64-65`  | 64 (lower bound only) |
//! | Exact       | `35`     | 35                    |
//!
//! Ranges in the corpus never cross a decade boundary, so the lower bound
//! alone decides the bucket.

use serde::Serialize;
use std::fmt;
use std::ops::RangeInclusive;

/// Trailing glyph marking a generation ("the thirties")
pub const GENERATION_MARKER: char = '代';

/// Trailing marker for an approximated age
pub const APPROX_MARKER: &str = "ca";

/// Separator of a ranged age
pub const RANGE_SEPARATOR: char = '-';

/// Canonical decade bucket
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum AgeBucket {
    Teens,
    Twenties,
    Thirties,
    Forties,
    Fifties,
    Sixties,
    Seventies,
}

impl AgeBucket {
    /// All buckets in ascending order
    pub const ALL: [AgeBucket; 7] = [
        AgeBucket::Teens,
        AgeBucket::Twenties,
        AgeBucket::Thirties,
        AgeBucket::Forties,
        AgeBucket::Fifties,
        AgeBucket::Sixties,
        AgeBucket::Seventies,
    ];

    /// Label stored in the `*_AgeRange` columns
    pub fn label(self) -> &'static str {
        match self {
            AgeBucket::Teens => "10-19",
            AgeBucket::Twenties => "20-29",
            AgeBucket::Thirties => "30-39",
            AgeBucket::Forties => "40-49",
            AgeBucket::Fifties => "50-59",
            AgeBucket::Sixties => "60-69",
            AgeBucket::Seventies => "70-79",
        }
    }

    /// Closed set of integer ages covered by this bucket
    pub fn members(self) -> RangeInclusive<i64> {
        let start = match self {
            AgeBucket::Teens => 10,
            AgeBucket::Twenties => 20,
            AgeBucket::Thirties => 30,
            AgeBucket::Forties => 40,
            AgeBucket::Fifties => 50,
            AgeBucket::Sixties => 60,
            AgeBucket::Seventies => 70,
        };
        start..=start + 9
    }

    /// The unique bucket containing `age`, if any
    pub fn containing(age: i64) -> Option<AgeBucket> {
        Self::ALL
            .iter()
            .copied()
            .find(|bucket| bucket.members().contains(&age))
    }
}

impl fmt::Display for AgeBucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Which encoding a raw age was recognised as
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum AgeEncoding {
    Generation,
    Approximate,
    Range,
    Exact,
}

/// Result of normalizing one age field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AgeOutcome {
    /// Candidate age falls inside a bucket
    Bucketed(AgeBucket),
    /// Encoding recognised but no bucket contains the candidate
    Unresolved(AgeEncoding),
    /// No marker matched and the value is not a number
    NonNumeric,
}

impl AgeOutcome {
    /// Bucket label to store, `None` for unresolved ages
    pub fn label(&self) -> Option<&'static str> {
        match self {
            AgeOutcome::Bucketed(bucket) => Some(bucket.label()),
            _ => None,
        }
    }
}

/// Strip the first matching marker and return the candidate text
///
/// Checks run generation, approximate, range; first match wins. Falls back
/// to treating the whole value as an exact age.
fn split_encoding(raw: &str) -> (AgeEncoding, &str) {
    if let Some(rest) = raw.strip_suffix(GENERATION_MARKER) {
        return (AgeEncoding::Generation, rest);
    }
    if let Some(rest) = raw.strip_suffix(APPROX_MARKER) {
        return (AgeEncoding::Approximate, rest);
    }
    if let Some((lower, _upper)) = raw.split_once(RANGE_SEPARATOR) {
        return (AgeEncoding::Range, lower);
    }
    (AgeEncoding::Exact, raw)
}

/// Numeric reading of a candidate age
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Candidate {
    /// Integer, or a decimal with no fractional part (`35.0`)
    Whole(i64),
    /// Finite number with a fractional part
    Fractional,
    NotANumber,
}

fn parse_candidate(text: &str) -> Candidate {
    let text = text.trim();
    if let Ok(age) = text.parse::<i64>() {
        return Candidate::Whole(age);
    }

    match text.parse::<f64>() {
        Ok(value) if value.is_finite() && value.fract() == 0.0 => Candidate::Whole(value as i64),
        Ok(value) if value.is_finite() => Candidate::Fractional,
        _ => Candidate::NotANumber,
    }
}

/// Normalize a raw age string into a bucket
pub fn normalize_age(raw: &str) -> AgeOutcome {
    let raw = raw.trim();
    let (encoding, candidate) = split_encoding(raw);

    match parse_candidate(candidate) {
        Candidate::Whole(age) => match AgeBucket::containing(age) {
            Some(bucket) => AgeOutcome::Bucketed(bucket),
            None => AgeOutcome::Unresolved(encoding),
        },
        Candidate::Fractional => AgeOutcome::Unresolved(encoding),
        Candidate::NotANumber if encoding == AgeEncoding::Exact => AgeOutcome::NonNumeric,
        Candidate::NotANumber => AgeOutcome::Unresolved(encoding),
    }
}

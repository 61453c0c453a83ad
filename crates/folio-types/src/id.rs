use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, TimeZone, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::TypeError;

const BASE36: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// Width of the base36 timestamp prefix. Seven digits cover every second
/// until the year 4000, so lexicographic order follows issue time.
const TIMESTAMP_WIDTH: usize = 7;

/// Number of random base36 characters after the timestamp.
const SUFFIX_WIDTH: usize = 8;

/// Longest id accepted by [`VersionId::parse`] (one DNS label).
const MAX_LEN: usize = 63;

/// Identifier of an immutable project version.
///
/// Generated ids are a fixed-width base36 timestamp (seconds since the Unix
/// epoch) followed by a random base36 suffix, e.g. `t3k9qz1x8m2p0cd7`. The
/// alphabet is `[0-9a-z]`, so an id can be embedded in a hostname label next
/// to a project name (`project_version.domain`).
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct VersionId(String);

impl VersionId {
    /// Generate a fresh id stamped with the current time.
    pub fn generate() -> Self {
        Self::generate_at(Utc::now())
    }

    /// Generate a fresh id stamped with `at`.
    pub fn generate_at(at: DateTime<Utc>) -> Self {
        let mut id = String::with_capacity(TIMESTAMP_WIDTH + SUFFIX_WIDTH);
        id.push_str(&encode_base36(at.timestamp().max(0) as u64, TIMESTAMP_WIDTH));

        let mut rng = rand::thread_rng();
        for _ in 0..SUFFIX_WIDTH {
            id.push(BASE36[rng.gen_range(0..BASE36.len())] as char);
        }
        Self(id)
    }

    /// Parse and validate an externally supplied id.
    pub fn parse(s: &str) -> Result<Self, TypeError> {
        let valid = !s.is_empty()
            && s.len() <= MAX_LEN
            && s.bytes().all(|b| b.is_ascii_lowercase() || b.is_ascii_digit());
        if !valid {
            return Err(TypeError::InvalidVersionId(s.to_string()));
        }
        Ok(Self(s.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The coarse issue time embedded in a generated id.
    ///
    /// Returns `None` for ids that were not produced by [`VersionId::generate`].
    pub fn issued_at(&self) -> Option<DateTime<Utc>> {
        if self.0.len() != TIMESTAMP_WIDTH + SUFFIX_WIDTH {
            return None;
        }
        let secs = decode_base36(&self.0[..TIMESTAMP_WIDTH])?;
        Utc.timestamp_opt(i64::try_from(secs).ok()?, 0).single()
    }
}

fn encode_base36(mut value: u64, width: usize) -> String {
    let mut digits = vec![b'0'; width];
    for slot in digits.iter_mut().rev() {
        *slot = BASE36[(value % 36) as usize];
        value /= 36;
    }
    // Digits only come from BASE36.
    String::from_utf8(digits).unwrap_or_default()
}

fn decode_base36(s: &str) -> Option<u64> {
    s.chars().try_fold(0u64, |acc, c| {
        let digit = c.to_digit(36)? as u64;
        acc.checked_mul(36)?.checked_add(digit)
    })
}

impl fmt::Debug for VersionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "VersionId({})", self.0)
    }
}

impl fmt::Display for VersionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for VersionId {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for VersionId {
    type Error = TypeError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<VersionId> for String {
    fn from(id: VersionId) -> Self {
        id.0
    }
}

/// Identity of a page, stable across versions while the page keeps its name
/// (UUID v7 for time-ordering).
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PageId(uuid::Uuid);

impl PageId {
    /// Generate a new time-ordered page id.
    pub fn new() -> Self {
        Self(uuid::Uuid::now_v7())
    }

    /// Short representation (first 8 characters of the UUID).
    pub fn short_id(&self) -> String {
        self.0.to_string()[..8].to_string()
    }
}

impl Default for PageId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for PageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PageId({})", self.short_id())
    }
}

impl fmt::Display for PageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn generated_ids_are_hostname_safe() {
        let id = VersionId::generate();
        assert_eq!(id.as_str().len(), TIMESTAMP_WIDTH + SUFFIX_WIDTH);
        assert!(id
            .as_str()
            .bytes()
            .all(|b| b.is_ascii_lowercase() || b.is_ascii_digit()));
        assert!(VersionId::parse(id.as_str()).is_ok());
    }

    #[test]
    fn generated_ids_are_unique() {
        let a = VersionId::generate();
        let b = VersionId::generate();
        assert_ne!(a, b);
    }

    #[test]
    fn issued_at_recovers_timestamp() {
        let at = Utc.timestamp_opt(1_700_000_000, 0).unwrap();
        let id = VersionId::generate_at(at);
        assert_eq!(id.issued_at(), Some(at));
    }

    #[test]
    fn later_ids_sort_after_earlier_ones() {
        let early = VersionId::generate_at(Utc.timestamp_opt(1_000, 0).unwrap());
        let late = VersionId::generate_at(Utc.timestamp_opt(2_000, 0).unwrap());
        assert!(early < late);
    }

    #[test]
    fn parse_rejects_separators_and_uppercase() {
        assert!(VersionId::parse("").is_err());
        assert!(VersionId::parse("abc_def").is_err());
        assert!(VersionId::parse("abc-def").is_err());
        assert!(VersionId::parse("ABC").is_err());
        assert!(VersionId::parse(&"a".repeat(64)).is_err());
    }

    #[test]
    fn foreign_ids_have_no_issue_time() {
        let id = VersionId::parse("legacy1").unwrap();
        assert_eq!(id.issued_at(), None);
    }

    #[test]
    fn version_id_serde_validates() {
        assert!(serde_json::from_str::<VersionId>("\"ok123\"").is_ok());
        assert!(serde_json::from_str::<VersionId>("\"Not_Ok\"").is_err());
    }

    #[test]
    fn page_ids_are_unique() {
        assert_ne!(PageId::new(), PageId::new());
    }

    proptest! {
        #[test]
        fn base36_roundtrip(value in 0u64..36u64.pow(7)) {
            let encoded = encode_base36(value, TIMESTAMP_WIDTH);
            prop_assert_eq!(encoded.len(), TIMESTAMP_WIDTH);
            prop_assert_eq!(decode_base36(&encoded), Some(value));
        }
    }
}

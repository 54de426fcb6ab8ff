//! Opaque identifiers for elements, events, actions and data sources

use std::fmt;

use serde::{Deserialize, Serialize};
use ulid::Ulid;

/// Symbols used by generated identifiers
const ALPHABET: &[u8; 53] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ_abcdefghijklmnopqrstuvwxyz";

/// Length of a generated identifier
const ID_LEN: usize = 16;

/// Opaque identifier
///
/// Generated ids are 16 symbols from a 53-letter alphabet. Ids read back from
/// a page file are kept verbatim, whatever their shape.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Id(String);

impl Id {
    /// Generate a fresh identifier
    pub fn new() -> Self {
        // Low digits come from the ULID's 80 random bits.
        let mut value = u128::from(Ulid::new());
        let base = ALPHABET.len() as u128;
        let mut out = String::with_capacity(ID_LEN);
        for _ in 0..ID_LEN {
            out.push(ALPHABET[(value % base) as usize] as char);
            value /= base;
        }
        Self(out)
    }

    /// Borrow the identifier text
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for Id {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for Id {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for Id {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&str> for Id {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl PartialEq<str> for Id {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for Id {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_generated_shape() {
        let id = Id::new();
        assert_eq!(id.as_str().len(), ID_LEN);
        assert!(id.as_str().bytes().all(|b| ALPHABET.contains(&b)));
    }

    #[test]
    fn test_generated_ids_are_distinct() {
        let ids: HashSet<Id> = (0..10_000).map(|_| Id::new()).collect();
        assert_eq!(ids.len(), 10_000);
    }

    #[test]
    fn test_wraps_existing_text() {
        let id = Id::from("a1");
        assert_eq!(id, "a1");
        assert_eq!(id.to_string(), "a1");
        assert_eq!(serde_json::to_value(&id).unwrap(), serde_json::json!("a1"));
    }
}

//! Category identifiers and the category catalog
//!
//! Category maps are keyed by [`CategoryKey`], a validated slug rather than
//! free text. A [`CategoryCatalog`] is the closed set of keys a plan may use;
//! anything outside it is rejected when the plan is validated.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use crate::error::CalendarError;

const MAX_KEY_LEN: usize = 48;

/// Validated category identifier (e.g. `dining`, `coffee`, `rent`)
///
/// Keys are lowercase ASCII letters, digits, `_` and `-`, starting with a
/// letter. Input is trimmed and lowercased before validation.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CategoryKey(String);

impl CategoryKey {
    pub fn new(raw: impl AsRef<str>) -> Result<Self, CategoryKeyError> {
        let key = raw.as_ref().trim().to_ascii_lowercase();

        if key.is_empty() {
            return Err(CategoryKeyError::Empty);
        }
        if key.len() > MAX_KEY_LEN {
            return Err(CategoryKeyError::TooLong(key.len()));
        }
        if !key.starts_with(|c: char| c.is_ascii_lowercase()) {
            return Err(CategoryKeyError::BadStart(key));
        }
        if let Some(bad) = key
            .chars()
            .find(|c| !(c.is_ascii_lowercase() || c.is_ascii_digit() || *c == '_' || *c == '-'))
        {
            return Err(CategoryKeyError::BadChar(bad));
        }

        Ok(Self(key))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CategoryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(&self.0)
    }
}

impl FromStr for CategoryKey {
    type Err = CategoryKeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for CategoryKey {
    type Error = CategoryKeyError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<CategoryKey> for String {
    fn from(key: CategoryKey) -> Self {
        key.0
    }
}

impl AsRef<str> for CategoryKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Why a category key was rejected
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CategoryKeyError {
    Empty,
    TooLong(usize),
    BadStart(String),
    BadChar(char),
}

impl fmt::Display for CategoryKeyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "category key cannot be empty"),
            Self::TooLong(len) => write!(
                f,
                "category key too long ({} chars, max {})",
                len, MAX_KEY_LEN
            ),
            Self::BadStart(key) => write!(f, "category key must start with a letter: {}", key),
            Self::BadChar(c) => write!(f, "category key contains invalid character '{}'", c),
        }
    }
}

impl std::error::Error for CategoryKeyError {}

/// Parse a category key, mapping failures into the crate error type
pub fn parse_key(raw: &str) -> Result<CategoryKey, CalendarError> {
    CategoryKey::new(raw).map_err(|e| CalendarError::InvalidCategory {
        key: raw.to_string(),
        reason: e.to_string(),
    })
}

/// The closed set of categories a plan may reference
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CategoryCatalog {
    keys: BTreeSet<CategoryKey>,
}

impl CategoryCatalog {
    pub fn new(keys: impl IntoIterator<Item = CategoryKey>) -> Self {
        Self {
            keys: keys.into_iter().collect(),
        }
    }

    /// Build a catalog from raw names, rejecting malformed keys
    pub fn from_names<I, S>(names: I) -> Result<Self, CalendarError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let keys = names
            .into_iter()
            .map(|name| parse_key(name.as_ref()))
            .collect::<Result<BTreeSet<_>, _>>()?;
        Ok(Self { keys })
    }

    pub fn contains(&self, key: &CategoryKey) -> bool {
        self.keys.contains(key)
    }

    /// Fail with [`CalendarError::UnknownCategory`] if `key` is not listed
    pub fn require(&self, key: &CategoryKey) -> Result<(), CalendarError> {
        if self.contains(key) {
            Ok(())
        } else {
            Err(CalendarError::UnknownCategory(key.to_string()))
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &CategoryKey> {
        self.keys.iter()
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}

impl Default for CategoryCatalog {
    /// Discretionary and fixed-expense categories used by a fresh install
    fn default() -> Self {
        let names = [
            "coffee",
            "dining",
            "entertainment",
            "groceries",
            "health",
            "insurance",
            "internet",
            "personal",
            "phone",
            "rent",
            "shopping",
            "subscriptions",
            "transport",
            "travel",
            "utilities",
        ];
        Self::new(names.iter().filter_map(|n| CategoryKey::new(n).ok()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_normalizes() {
        let key = CategoryKey::new("  Dining ").unwrap();
        assert_eq!(key.as_str(), "dining");
    }

    #[test]
    fn test_key_rejects_bad_input() {
        assert_eq!(CategoryKey::new("   "), Err(CategoryKeyError::Empty));
        assert_eq!(
            CategoryKey::new("dining out"),
            Err(CategoryKeyError::BadChar(' '))
        );
        assert!(matches!(
            CategoryKey::new("1coffee"),
            Err(CategoryKeyError::BadStart(_))
        ));
        assert!(matches!(
            CategoryKey::new("a".repeat(49)),
            Err(CategoryKeyError::TooLong(49))
        ));
    }

    #[test]
    fn test_key_serde_validates() {
        let key: CategoryKey = serde_json::from_str("\"eating_out\"").unwrap();
        assert_eq!(key.as_str(), "eating_out");
        assert!(serde_json::from_str::<CategoryKey>("\"eating out\"").is_err());
    }

    #[test]
    fn test_catalog_require() {
        let catalog = CategoryCatalog::from_names(["dining", "coffee"]).unwrap();
        assert!(catalog
            .require(&CategoryKey::new("dining").unwrap())
            .is_ok());
        let err = catalog
            .require(&CategoryKey::new("yachts").unwrap())
            .unwrap_err();
        assert!(matches!(err, CalendarError::UnknownCategory(ref k) if k == "yachts"));
    }

    #[test]
    fn test_catalog_from_names_rejects_malformed() {
        let err = CategoryCatalog::from_names(["ok", "not ok"]).unwrap_err();
        assert!(matches!(err, CalendarError::InvalidCategory { .. }));
    }

    #[test]
    fn test_default_catalog_has_core_categories() {
        let catalog = CategoryCatalog::default();
        for name in ["dining", "coffee", "rent", "groceries"] {
            assert!(catalog.contains(&CategoryKey::new(name).unwrap()));
        }
    }
}

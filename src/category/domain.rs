//! Core category domain types.

use std::fmt::Display;

use serde::{Deserialize, Serialize};

use crate::{Error, validation::validate_text};

/// The longest allowed category name, in characters.
pub const CATEGORY_NAME_MAX_LENGTH: usize = 50;

/// A validated category name, trimmed and between 1 and 50 characters long.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, Hash)]
pub struct CategoryName(String);

impl CategoryName {
    /// Create a category name.
    ///
    /// # Errors
    ///
    /// Returns an [Error::Validation] if the trimmed `name` is empty or too long.
    pub fn new(name: &str) -> Result<Self, Error> {
        validate_text("category name", name, 1, CATEGORY_NAME_MAX_LENGTH).map(Self)
    }

    /// Create a category name without validation.
    ///
    /// The caller should ensure that the string is a valid name, e.g. because it was read
    /// from the database.
    pub fn new_unchecked(name: &str) -> Self {
        Self(name.to_string())
    }
}

impl AsRef<str> for CategoryName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Display for CategoryName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Database identifier for a category.
pub type CategoryId = i64;

/// A label for grouping expenses, e.g. "Housing" or "Groceries".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Hash)]
pub struct Category {
    pub id: CategoryId,
    pub name: CategoryName,
}

/// Request body for creating and renaming categories.
#[derive(Debug, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CategoryData {
    pub name: String,
}

#[cfg(test)]
mod category_name_tests {
    use crate::{Error, category::CategoryName};

    #[test]
    fn new_fails_on_empty_string() {
        assert!(matches!(CategoryName::new(""), Err(Error::Validation(_))));
    }

    #[test]
    fn new_fails_on_just_whitespace() {
        assert!(matches!(
            CategoryName::new("\n\t \r"),
            Err(Error::Validation(_))
        ));
    }

    #[test]
    fn new_fails_on_long_name() {
        assert!(CategoryName::new(&"x".repeat(51)).is_err());
        assert!(CategoryName::new(&"x".repeat(50)).is_ok());
    }

    #[test]
    fn new_trims_name() {
        assert_eq!(
            CategoryName::new("  Food ").unwrap(),
            CategoryName::new_unchecked("Food")
        );
    }
}

//! Product handle type.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Errors that can occur when parsing a [`ProductHandle`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum HandleError {
    /// The input string is empty.
    #[error("handle cannot be empty")]
    Empty,
    /// The input string is too long.
    #[error("handle must be at most {max} characters")]
    TooLong {
        /// Maximum allowed length.
        max: usize,
    },
    /// The input contains a character that cannot appear in a handle.
    #[error("handle contains invalid character {0:?}")]
    InvalidCharacter(char),
}

/// A URL-friendly unique slug identifying a product.
///
/// ## Constraints
///
/// - Length: 1-255 characters
/// - Lowercase letters, digits, `-` and `_` only
///
/// ## Examples
///
/// ```
/// use omg_beauty_core::ProductHandle;
///
/// assert!(ProductHandle::parse("red-hoodie").is_ok());
/// assert!(ProductHandle::parse("").is_err());
/// assert!(ProductHandle::parse("Red Hoodie").is_err());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(try_from = "String", into = "String")]
pub struct ProductHandle(String);

impl ProductHandle {
    /// Maximum length of a product handle.
    pub const MAX_LENGTH: usize = 255;

    /// Parse a `ProductHandle` from a string.
    ///
    /// # Errors
    ///
    /// Returns an error if the input:
    /// - Is empty
    /// - Is longer than 255 characters
    /// - Contains anything other than lowercase alphanumerics, `-` or `_`
    pub fn parse(s: &str) -> Result<Self, HandleError> {
        if s.is_empty() {
            return Err(HandleError::Empty);
        }

        if s.chars().count() > Self::MAX_LENGTH {
            return Err(HandleError::TooLong {
                max: Self::MAX_LENGTH,
            });
        }

        if let Some(c) = s
            .chars()
            .find(|c| !(c.is_alphanumeric() && !c.is_uppercase()) && *c != '-' && *c != '_')
        {
            return Err(HandleError::InvalidCharacter(c));
        }

        Ok(Self(s.to_owned()))
    }

    /// Returns the handle as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the `ProductHandle` and returns its inner string.
    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }

    /// Canonical storefront path for this product (`/products/{handle}`).
    #[must_use]
    pub fn canonical_path(&self) -> String {
        format!("/products/{}", self.0)
    }
}

impl fmt::Display for ProductHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for ProductHandle {
    type Err = HandleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for ProductHandle {
    type Error = HandleError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<ProductHandle> for String {
    fn from(handle: ProductHandle) -> Self {
        handle.0
    }
}

impl AsRef<str> for ProductHandle {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_valid_handles() {
        assert!(ProductHandle::parse("red-hoodie").is_ok());
        assert!(ProductHandle::parse("lip_gloss_02").is_ok());
        assert!(ProductHandle::parse("a").is_ok());
        assert!(ProductHandle::parse("crème-brûlée").is_ok());
    }

    #[test]
    fn test_parse_empty() {
        assert_eq!(ProductHandle::parse(""), Err(HandleError::Empty));
    }

    #[test]
    fn test_parse_too_long() {
        let long = "a".repeat(256);
        assert!(matches!(
            ProductHandle::parse(&long),
            Err(HandleError::TooLong { max: 255 })
        ));
    }

    #[test]
    fn test_parse_rejects_uppercase_and_separators() {
        assert_eq!(
            ProductHandle::parse("Red-hoodie"),
            Err(HandleError::InvalidCharacter('R'))
        );
        assert_eq!(
            ProductHandle::parse("red hoodie"),
            Err(HandleError::InvalidCharacter(' '))
        );
        assert_eq!(
            ProductHandle::parse("../etc"),
            Err(HandleError::InvalidCharacter('.'))
        );
    }

    #[test]
    fn test_canonical_path() {
        let handle = ProductHandle::parse("red-hoodie").unwrap();
        assert_eq!(handle.canonical_path(), "/products/red-hoodie");
    }

    #[test]
    fn test_serde_rejects_invalid() {
        let parsed: Result<ProductHandle, _> = serde_json::from_str("\"Not A Handle\"");
        assert!(parsed.is_err());

        let handle: ProductHandle = serde_json::from_str("\"red-hoodie\"").unwrap();
        assert_eq!(handle.as_str(), "red-hoodie");
    }
}

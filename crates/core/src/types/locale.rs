//! Storefront locale (language + country) parsed from the URL prefix.

use core::fmt;

/// Errors that can occur when parsing a [`Locale`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum LocaleError {
    /// The segment is not of the form `{language}-{country}`.
    #[error("locale must look like `en-us`, got {0:?}")]
    Malformed(String),
}

/// Language and country context for Storefront API queries.
///
/// Parsed from the optional `/{locale}` path prefix, e.g. `/en-ca/products/...`.
/// Both parts are stored as uppercase ISO codes, matching the `LanguageCode`
/// and `CountryCode` enums of the Storefront API.
///
/// ```
/// use omg_beauty_core::Locale;
///
/// let locale = Locale::parse("fr-ca").unwrap();
/// assert_eq!(locale.language(), "FR");
/// assert_eq!(locale.country(), "CA");
/// assert!(Locale::parse("products").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Locale {
    language: String,
    country: String,
}

impl Locale {
    /// Parse a locale path segment.
    ///
    /// # Errors
    ///
    /// Returns [`LocaleError::Malformed`] unless the input is two ASCII
    /// letters, a dash, and two more ASCII letters.
    pub fn parse(segment: &str) -> Result<Self, LocaleError> {
        let malformed = || LocaleError::Malformed(segment.to_owned());

        let (language, country) = segment.split_once('-').ok_or_else(malformed)?;
        let is_code = |part: &str| part.len() == 2 && part.bytes().all(|b| b.is_ascii_alphabetic());

        if !is_code(language) || !is_code(country) {
            return Err(malformed());
        }

        Ok(Self {
            language: language.to_ascii_uppercase(),
            country: country.to_ascii_uppercase(),
        })
    }

    /// ISO 639-1 language code, uppercase.
    #[must_use]
    pub fn language(&self) -> &str {
        &self.language
    }

    /// ISO 3166-1 alpha-2 country code, uppercase.
    #[must_use]
    pub fn country(&self) -> &str {
        &self.country
    }

    /// Path prefix for this locale, e.g. `/en-us`.
    #[must_use]
    pub fn path_prefix(&self) -> String {
        format!(
            "/{}-{}",
            self.language.to_ascii_lowercase(),
            self.country.to_ascii_lowercase()
        )
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.language, self.country)
    }
}

impl std::str::FromStr for Locale {
    type Err = LocaleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_is_case_insensitive() {
        assert_eq!(Locale::parse("en-us").unwrap(), Locale::parse("EN-US").unwrap());
    }

    #[test]
    fn test_parse_rejects_malformed() {
        for input in ["", "en", "en_us", "eng-us", "en-usa", "e1-us", "en-"] {
            assert!(
                matches!(Locale::parse(input), Err(LocaleError::Malformed(_))),
                "{input} should be rejected"
            );
        }
    }

    #[test]
    fn test_path_prefix() {
        let locale = Locale::parse("EN-ca").unwrap();
        assert_eq!(locale.path_prefix(), "/en-ca");
        assert_eq!(locale.to_string(), "EN-CA");
    }
}

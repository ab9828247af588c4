//! Variant option selections carried in the request query string.
//!
//! A shopper's choice of variant lives in the URL (`?Color=Red&Size=M`). The
//! same selection is sent to the Storefront API as `selectedOptions` and
//! matched locally against candidate variants, so both sides agree on which
//! variant is on screen.

use serde::{Deserialize, Serialize};
use url::form_urlencoded;

/// A single option name/value pair (e.g. `Color` = `Red`).
///
/// Serializes as the Storefront API `SelectedOptionInput`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SelectedOption {
    /// Option name (e.g., "Size", "Color").
    pub name: String,
    /// Selected value (e.g., "Large", "Blue").
    pub value: String,
}

impl SelectedOption {
    /// Create a new option pair.
    #[must_use]
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// Ordered set of option selections parsed from a query string.
///
/// Names are unique case-insensitively; the first occurrence wins.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct OptionSelection(Vec<SelectedOption>);

impl OptionSelection {
    /// Parse the raw query string (without the leading `?`).
    ///
    /// Every pair becomes a selected option; the Storefront API ignores the
    /// ones that do not name a product option.
    #[must_use]
    pub fn from_query(query: &str) -> Self {
        let mut options: Vec<SelectedOption> = Vec::new();

        for (name, value) in form_urlencoded::parse(query.as_bytes()) {
            if name.is_empty() || options.iter().any(|o| eq_ignore_case(&o.name, &name)) {
                continue;
            }
            options.push(SelectedOption::new(name, value));
        }

        Self(options)
    }

    /// Whether the query string carried no selections at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of selections.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Iterate over the selections in query-string order.
    pub fn iter(&self) -> impl Iterator<Item = &SelectedOption> {
        self.0.iter()
    }

    /// Selected value for an option name, compared case-insensitively.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|o| eq_ignore_case(&o.name, name))
            .map(|o| o.value.as_str())
    }

    /// Selections as the `selectedOptions` query variable.
    #[must_use]
    pub fn as_slice(&self) -> &[SelectedOption] {
        &self.0
    }

    /// Whether this selection pins down exactly the given variant options.
    ///
    /// Every variant option must be present with an equal value (names and
    /// values compared case-insensitively). Selections naming options the
    /// variant does not have are ignored.
    #[must_use]
    pub fn matches(&self, variant_options: &[SelectedOption]) -> bool {
        !variant_options.is_empty()
            && variant_options.iter().all(|option| {
                self.get(&option.name)
                    .is_some_and(|value| eq_ignore_case(value, &option.value))
            })
    }

    /// Stable cache key fragment (lowercased, sorted by name).
    #[must_use]
    pub fn cache_key(&self) -> String {
        let mut pairs: Vec<String> = self
            .0
            .iter()
            .map(|o| format!("{}={}", o.name.to_lowercase(), o.value.to_lowercase()))
            .collect();
        pairs.sort();
        pairs.join("&")
    }

    /// Encode the selection as a query string (without the leading `?`).
    #[must_use]
    pub fn to_query_string(&self) -> String {
        query_string_for(&self.0)
    }
}

impl From<Vec<SelectedOption>> for OptionSelection {
    fn from(options: Vec<SelectedOption>) -> Self {
        let mut selection = Self::default();
        for option in options {
            if selection.get(&option.name).is_none() && !option.name.is_empty() {
                selection.0.push(option);
            }
        }
        selection
    }
}

/// Encode option pairs as `Name=Value&...`, preserving order.
#[must_use]
pub fn query_string_for(options: &[SelectedOption]) -> String {
    let mut serializer = form_urlencoded::Serializer::new(String::new());
    for option in options {
        serializer.append_pair(&option.name, &option.value);
    }
    serializer.finish()
}

fn eq_ignore_case(a: &str, b: &str) -> bool {
    a.eq_ignore_ascii_case(b) || a.to_lowercase() == b.to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hoodie_m_red() -> Vec<SelectedOption> {
        vec![
            SelectedOption::new("Color", "Red"),
            SelectedOption::new("Size", "M"),
        ]
    }

    #[test]
    fn test_from_query_decodes_pairs_in_order() {
        let selection = OptionSelection::from_query("Color=Dusty+Rose&Size=M%2FL");
        let pairs: Vec<_> = selection.iter().map(|o| (o.name.as_str(), o.value.as_str())).collect();
        assert_eq!(pairs, vec![("Color", "Dusty Rose"), ("Size", "M/L")]);
    }

    #[test]
    fn test_from_query_empty() {
        assert!(OptionSelection::from_query("").is_empty());
        assert!(OptionSelection::from_query("=orphan").is_empty());
    }

    #[test]
    fn test_from_query_keeps_first_duplicate() {
        let selection = OptionSelection::from_query("color=Red&Color=Blue");
        assert_eq!(selection.len(), 1);
        assert_eq!(selection.get("COLOR"), Some("Red"));
    }

    #[test]
    fn test_matches_is_case_insensitive() {
        let selection = OptionSelection::from_query("color=red&SIZE=m");
        assert!(selection.matches(&hoodie_m_red()));
    }

    #[test]
    fn test_matches_ignores_unknown_options() {
        let selection = OptionSelection::from_query("Color=Red&Size=M&utm_source=mail");
        assert!(selection.matches(&hoodie_m_red()));
    }

    #[test]
    fn test_matches_requires_every_variant_option() {
        let partial = OptionSelection::from_query("Color=Red");
        assert!(!partial.matches(&hoodie_m_red()));

        let wrong = OptionSelection::from_query("Color=Red&Size=L");
        assert!(!wrong.matches(&hoodie_m_red()));
    }

    #[test]
    fn test_matches_never_matches_optionless_variant() {
        let selection = OptionSelection::from_query("Color=Red");
        assert!(!selection.matches(&[]));
    }

    #[test]
    fn test_query_string_roundtrip_preserves_order() {
        let encoded = query_string_for(&[
            SelectedOption::new("Size", "M"),
            SelectedOption::new("Color", "Dusty Rose"),
        ]);
        assert_eq!(encoded, "Size=M&Color=Dusty+Rose");
        assert_eq!(
            OptionSelection::from_query(&encoded).to_query_string(),
            encoded
        );
    }

    #[test]
    fn test_cache_key_is_order_and_case_insensitive() {
        let a = OptionSelection::from_query("Size=M&Color=Red");
        let b = OptionSelection::from_query("color=red&size=m");
        assert_eq!(a.cache_key(), b.cache_key());
    }

    #[test]
    fn test_from_vec_dedupes() {
        let selection = OptionSelection::from(vec![
            SelectedOption::new("Size", "M"),
            SelectedOption::new("size", "L"),
        ]);
        assert_eq!(selection.len(), 1);
    }
}

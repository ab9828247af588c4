//! Cache types for Storefront API responses.

use omg_beauty_core::{Locale, OptionSelection};

use crate::shopify::types::{Product, ProductCard};

/// Cache key for a product page query.
///
/// The selection is normalized so `?color=red` and `?Color=Red` share an
/// entry, matching the case-insensitive resolution on the API side.
#[must_use]
pub fn product_key(handle: &str, selection: &OptionSelection, locale: Option<&Locale>) -> String {
    format!(
        "product:{handle}:{}:{}",
        locale.map(ToString::to_string).unwrap_or_default(),
        selection.cache_key()
    )
}

/// Cache key for recommendations of a product.
#[must_use]
pub fn recommendations_key(product_id: &str, locale: Option<&Locale>) -> String {
    format!(
        "recommendations:{product_id}:{}",
        locale.map(ToString::to_string).unwrap_or_default()
    )
}

/// Cached value types.
///
/// `Product(None)` records a handle the API reported as missing, so repeated
/// 404s do not hit Shopify.
#[derive(Debug, Clone)]
pub enum CacheValue {
    Product(Option<Box<Product>>),
    Recommendations(Vec<ProductCard>),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_product_key_normalizes_selection() {
        let a = product_key("red-hoodie", &OptionSelection::from_query("Size=M&Color=Red"), None);
        let b = product_key("red-hoodie", &OptionSelection::from_query("color=red&size=m"), None);
        assert_eq!(a, b);
    }

    #[test]
    fn test_product_key_separates_locales() {
        let selection = OptionSelection::default();
        let us = Locale::parse("en-us").ok();
        let ca = Locale::parse("en-ca").ok();
        assert_ne!(
            product_key("red-hoodie", &selection, us.as_ref()),
            product_key("red-hoodie", &selection, ca.as_ref())
        );
    }
}

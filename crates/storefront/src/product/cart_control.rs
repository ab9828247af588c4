//! Add-to-cart control state for the resolved variant.

use crate::shopify::ProductVariant;

/// Largest quantity offered in the quantity picker.
pub const MAX_QUANTITY: i64 = 10;

/// What the add-to-cart form needs to render.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddToCartControl {
    /// Whether the button is disabled.
    pub disabled: bool,
    /// Variant posted as the cart line's merchandise.
    pub variant_id: String,
    /// Quantities offered in the picker (empty when disabled).
    pub quantities: Vec<i64>,
}

impl AddToCartControl {
    /// Build the control for `variant`.
    ///
    /// Disabled when the variant is not for sale or its stock is exhausted.
    #[must_use]
    pub fn for_variant(variant: &ProductVariant) -> Self {
        let disabled = !variant.purchasable();

        let quantities = if disabled {
            Vec::new()
        } else {
            let max = variant
                .quantity_available
                .map_or(MAX_QUANTITY, |qty| qty.clamp(1, MAX_QUANTITY));
            (1..=max).collect()
        };

        Self {
            disabled,
            variant_id: variant.id.clone(),
            quantities,
        }
    }

    /// Label for the submit button.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        if self.disabled {
            "Sold out"
        } else {
            "Add to cart"
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::product::variants::tests::variant;

    #[test]
    fn test_available_variant_is_enabled() {
        let control = AddToCartControl::for_variant(&variant("1", "Red", "M", true));
        assert!(!control.disabled);
        assert_eq!(control.variant_id, "gid://shopify/ProductVariant/1");
        assert_eq!(control.quantities, vec![1, 2, 3, 4, 5]);
        assert_eq!(control.label(), "Add to cart");
    }

    #[test]
    fn test_unavailable_variant_is_disabled() {
        let mut v = variant("2", "Red", "L", false);
        v.quantity_available = Some(12);
        let control = AddToCartControl::for_variant(&v);
        assert!(control.disabled);
        assert!(control.quantities.is_empty());
        assert_eq!(control.label(), "Sold out");
    }

    #[test]
    fn test_zero_stock_is_disabled_even_when_for_sale() {
        let mut v = variant("1", "Red", "M", true);
        v.quantity_available = Some(0);
        assert!(AddToCartControl::for_variant(&v).disabled);
    }

    #[test]
    fn test_oversold_stock_is_disabled() {
        let mut v = variant("1", "Red", "M", true);
        v.quantity_available = Some(-3);
        let control = AddToCartControl::for_variant(&v);
        assert!(control.disabled);
        assert!(control.quantities.is_empty());
        assert_eq!(control.label(), "Sold out");
    }

    #[test]
    fn test_unknown_stock_offers_default_range() {
        let mut v = variant("1", "Red", "M", true);
        v.quantity_available = None;
        let control = AddToCartControl::for_variant(&v);
        assert!(!control.disabled);
        assert_eq!(control.quantities.len(), 10);
    }

    #[test]
    fn test_large_stock_is_capped() {
        let mut v = variant("1", "Red", "M", true);
        v.quantity_available = Some(250);
        assert_eq!(AddToCartControl::for_variant(&v).quantities.last(), Some(&10));
    }
}

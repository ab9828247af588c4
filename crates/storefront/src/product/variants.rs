//! Variant resolution for the product page.
//!
//! The Storefront API returns the selected-or-first-available variant plus
//! the variants one option away from it. Everything here works on that
//! candidate set: which variant to show for the URL's selection, what the
//! address bar should say, and where each option value in the picker leads.

use omg_beauty_core::{OptionSelection, SelectedOption, query_string_for};

use crate::shopify::{Product, ProductVariant, Swatch};

/// Candidate variants known for a product, deduplicated by id.
///
/// Order: the server's selected variant, each option value's first
/// selectable variant, then the adjacent variants.
#[must_use]
pub fn adjacent_and_first_available_variants(product: &Product) -> Vec<ProductVariant> {
    let first_selectable = product
        .options
        .iter()
        .flat_map(|option| option.option_values.iter())
        .filter_map(|value| value.first_selectable_variant.as_ref());

    let all = std::iter::once(&product.selected_or_first_available_variant)
        .chain(first_selectable)
        .chain(product.adjacent_variants.iter());

    let mut variants: Vec<ProductVariant> = Vec::new();
    for variant in all {
        if !variants.iter().any(|v| v.id == variant.id) {
            variants.push(variant.clone());
        }
    }
    variants
}

/// Variant to render for the URL's current selection.
///
/// Returns the first candidate whose options the selection pins down, or
/// `selected` when nothing matches (including when the URL has no options).
#[must_use]
pub fn optimistic_variant(
    selected: &ProductVariant,
    variants: &[ProductVariant],
    selection: &OptionSelection,
) -> ProductVariant {
    if selection.is_empty() {
        return selected.clone();
    }

    variants
        .iter()
        .find(|variant| selection.matches(&variant.selected_options))
        .unwrap_or(selected)
        .clone()
}

/// URL the address bar should be replaced with, if any.
///
/// Only a request without any query parameters is rewritten, so the page
/// and the URL agree on the variant being shown.
#[must_use]
pub fn url_sync(path: &str, selection: &OptionSelection, variant: &ProductVariant) -> Option<String> {
    if !selection.is_empty() || variant.selected_options.is_empty() {
        return None;
    }

    Some(format!(
        "{path}?{}",
        query_string_for(&variant.selected_options)
    ))
}

/// A product option prepared for the variant picker.
#[derive(Debug, Clone)]
pub struct MappedProductOption {
    /// Option name (e.g., "Color").
    pub name: String,
    /// Values in merchant-defined order.
    pub values: Vec<MappedOptionValue>,
}

/// One clickable option value in the variant picker.
#[derive(Debug, Clone)]
pub struct MappedOptionValue {
    /// Value name (e.g., "Red").
    pub name: String,
    /// Whether the resolved variant has this value.
    pub selected: bool,
    /// Whether the exact combination with this value exists.
    pub exists: bool,
    /// Whether that combination exists and can be purchased.
    pub available: bool,
    /// Whether the target variant belongs to another product (combined listings).
    pub is_different_product: bool,
    /// Handle of the product the target variant belongs to.
    pub handle: String,
    /// Query string selecting the target variant (without the leading `?`).
    pub variant_uri_query: String,
    /// Swatch for the value, if configured.
    pub swatch: Option<Swatch>,
}

/// Map every option value of `product` to the variant clicking it would select.
///
/// The target keeps the resolved variant's other options and swaps in this
/// value. When that combination is not among the candidates, the value's
/// first selectable variant is used instead and `exists` is false.
#[must_use]
pub fn product_options(product: &Product, resolved: &ProductVariant) -> Vec<MappedProductOption> {
    let candidates = adjacent_and_first_available_variants(product);

    product
        .options
        .iter()
        .map(|option| {
            let values = option
                .option_values
                .iter()
                .map(|value| {
                    let wanted = swap_option(&resolved.selected_options, &option.name, &value.name);
                    let exact = candidates
                        .iter()
                        .find(|v| same_options(&v.selected_options, &wanted));

                    let exists = exact.is_some();
                    let target = exact.or(value.first_selectable_variant.as_ref());

                    let selected = resolved
                        .selected_options
                        .iter()
                        .any(|o| o.name == option.name && o.value == value.name);

                    let (handle, variant_uri_query, available) = target.map_or_else(
                        || (product.handle.clone(), query_string_for(&wanted), false),
                        |variant| {
                            (
                                variant.product.handle.clone(),
                                query_string_for(&variant.selected_options),
                                exists && variant.available_for_sale,
                            )
                        },
                    );

                    MappedOptionValue {
                        name: value.name.clone(),
                        selected,
                        exists,
                        available,
                        is_different_product: handle != product.handle,
                        handle,
                        variant_uri_query,
                        swatch: value.swatch.clone(),
                    }
                })
                .collect();

            MappedProductOption {
                name: option.name.clone(),
                values,
            }
        })
        .collect()
}

/// Copy of `options` with `name` set to `value` (appended if missing).
fn swap_option(options: &[SelectedOption], name: &str, value: &str) -> Vec<SelectedOption> {
    let mut swapped: Vec<SelectedOption> = options
        .iter()
        .map(|o| {
            if o.name == name {
                SelectedOption::new(name, value)
            } else {
                o.clone()
            }
        })
        .collect();

    if !swapped.iter().any(|o| o.name == name) {
        swapped.push(SelectedOption::new(name, value));
    }
    swapped
}

/// Whether two option sets contain the same pairs, ignoring order.
fn same_options(a: &[SelectedOption], b: &[SelectedOption]) -> bool {
    a.len() == b.len() && b.iter().all(|o| a.contains(o))
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
pub(crate) mod tests {
    use super::*;
    use crate::shopify::{Money, ProductOption, ProductOptionValue, Seo, VariantProduct};
    use omg_beauty_core::CurrencyCode;
    use rust_decimal::Decimal;

    pub(crate) fn variant(id: &str, color: &str, size: &str, available: bool) -> ProductVariant {
        ProductVariant {
            id: format!("gid://shopify/ProductVariant/{id}"),
            title: format!("{color} / {size}"),
            available_for_sale: available,
            quantity_available: Some(if available { 5 } else { 0 }),
            sku: Some(format!("RH-{color}-{size}")),
            price: Money {
                amount: Decimal::new(4800, 2),
                currency_code: CurrencyCode::new("USD"),
            },
            compare_at_price: None,
            unit_price: None,
            selected_options: vec![
                SelectedOption::new("Color", color),
                SelectedOption::new("Size", size),
            ],
            image: None,
            product: VariantProduct {
                title: "Red Hoodie".to_string(),
                handle: "red-hoodie".to_string(),
            },
        }
    }

    fn option_value(name: &str, first: Option<ProductVariant>) -> ProductOptionValue {
        ProductOptionValue {
            name: name.to_string(),
            first_selectable_variant: first,
            swatch: None,
        }
    }

    /// Red/Blue x M/L; Blue/L does not exist; Red/L is sold out.
    pub(crate) fn hoodie() -> Product {
        let red_m = variant("1", "Red", "M", true);
        let red_l = variant("2", "Red", "L", false);
        let blue_m = variant("3", "Blue", "M", true);

        Product {
            id: "gid://shopify/Product/100".to_string(),
            handle: "red-hoodie".to_string(),
            title: "Red Hoodie".to_string(),
            vendor: "OMG Beauty".to_string(),
            description: "Soft.".to_string(),
            description_html: "<p>Soft.</p>".to_string(),
            category: Some("Hoodies".to_string()),
            seo: Seo::default(),
            images: Vec::new(),
            options: vec![
                ProductOption {
                    name: "Color".to_string(),
                    option_values: vec![
                        option_value("Red", Some(red_m.clone())),
                        option_value("Blue", Some(blue_m.clone())),
                    ],
                },
                ProductOption {
                    name: "Size".to_string(),
                    option_values: vec![
                        option_value("M", Some(red_m.clone())),
                        option_value("L", Some(red_l.clone())),
                    ],
                },
            ],
            selected_or_first_available_variant: red_m,
            adjacent_variants: vec![red_l, blue_m],
        }
    }

    #[test]
    fn test_candidates_are_deduplicated_in_order() {
        let ids: Vec<_> = adjacent_and_first_available_variants(&hoodie())
            .into_iter()
            .map(|v| v.id)
            .collect();
        assert_eq!(
            ids,
            vec![
                "gid://shopify/ProductVariant/1",
                "gid://shopify/ProductVariant/3",
                "gid://shopify/ProductVariant/2",
            ]
        );
    }

    #[test]
    fn test_optimistic_variant_matches_selection_case_insensitively() {
        let product = hoodie();
        let candidates = adjacent_and_first_available_variants(&product);
        let selection = OptionSelection::from_query("color=blue&size=m");

        let resolved = optimistic_variant(
            &product.selected_or_first_available_variant,
            &candidates,
            &selection,
        );
        assert_eq!(resolved.id, "gid://shopify/ProductVariant/3");
    }

    #[test]
    fn test_optimistic_variant_falls_back_to_selected() {
        let product = hoodie();
        let candidates = adjacent_and_first_available_variants(&product);

        for query in ["", "Color=Green", "Color=Blue", "Fabric=Wool"] {
            let resolved = optimistic_variant(
                &product.selected_or_first_available_variant,
                &candidates,
                &OptionSelection::from_query(query),
            );
            assert_eq!(resolved.id, "gid://shopify/ProductVariant/1", "query {query:?}");
        }
    }

    #[test]
    fn test_url_sync_only_without_query() {
        let product = hoodie();
        let red_m = &product.selected_or_first_available_variant;

        assert_eq!(
            url_sync("/products/red-hoodie", &OptionSelection::default(), red_m).as_deref(),
            Some("/products/red-hoodie?Color=Red&Size=M")
        );
        assert_eq!(
            url_sync(
                "/products/red-hoodie",
                &OptionSelection::from_query("Color=Red"),
                red_m
            ),
            None
        );
    }

    #[test]
    fn test_url_sync_skips_optionless_variant() {
        let mut single = variant("9", "Red", "M", true);
        single.selected_options.clear();
        assert_eq!(
            url_sync("/products/lip-oil", &OptionSelection::default(), &single),
            None
        );
    }

    #[test]
    fn test_product_options_marks_selected_and_availability() {
        let product = hoodie();
        let options = product_options(&product, &product.selected_or_first_available_variant);

        let color = &options[0];
        assert_eq!(color.name, "Color");
        assert!(color.values[0].selected);
        assert!(!color.values[1].selected);
        assert!(color.values[1].exists);
        assert!(color.values[1].available);
        assert_eq!(color.values[1].variant_uri_query, "Color=Blue&Size=M");

        let size = &options[1];
        let large = &size.values[1];
        assert!(large.exists);
        assert!(!large.available);
        assert_eq!(large.variant_uri_query, "Color=Red&Size=L");
    }

    #[test]
    fn test_product_options_missing_combination_uses_first_selectable() {
        let product = hoodie();
        let blue_m = variant("3", "Blue", "M", true);
        let options = product_options(&product, &blue_m);

        // Blue / L does not exist: the L value falls back to its first selectable variant.
        let large = &options[1].values[1];
        assert!(!large.exists);
        assert!(!large.available);
        assert_eq!(large.variant_uri_query, "Color=Red&Size=L");
        assert!(!large.is_different_product);
    }

    #[test]
    fn test_product_options_flags_combined_listing() {
        let mut product = hoodie();
        let mut other = variant("7", "Green", "M", true);
        other.product.handle = "green-hoodie".to_string();
        product.options[0]
            .option_values
            .push(option_value("Green", Some(other)));

        let options = product_options(&product, &product.selected_or_first_available_variant);
        let green = &options[0].values[2];
        assert!(green.is_different_product);
        assert_eq!(green.handle, "green-hoodie");
    }
}

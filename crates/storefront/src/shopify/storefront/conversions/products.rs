//! Product type conversion functions.

use crate::shopify::ShopifyError;
use crate::shopify::types::{
    Image, Product, ProductCard, ProductOption, ProductOptionValue, ProductVariant, Seo, Swatch,
    VariantProduct,
};

use super::super::queries::{
    ImageFields, ProductVariantFields, get_product, get_product_recommendations,
};

// =============================================================================
// get_product conversions
// =============================================================================

/// Convert the raw product selection into a [`Product`].
///
/// # Errors
///
/// Returns [`ShopifyError::InvalidResponse`] when the product has no
/// selected-or-first-available variant. Every product has at least one
/// variant, so this only happens on a malformed response.
pub fn convert_product(product: get_product::ProductFields) -> Result<Product, ShopifyError> {
    let selected = product
        .selected_or_first_available_variant
        .ok_or_else(|| {
            ShopifyError::InvalidResponse(format!("product {} has no variants", product.handle))
        })?;

    Ok(Product {
        id: product.id,
        handle: product.handle,
        title: product.title,
        vendor: product.vendor,
        description: product.description,
        description_html: product.description_html,
        category: product.category.map(|c| c.name),
        seo: Seo {
            title: product.seo.title,
            description: product.seo.description,
        },
        images: product
            .images
            .edges
            .into_iter()
            .map(|e| convert_image(e.node))
            .collect(),
        options: product.options.into_iter().map(convert_option).collect(),
        selected_or_first_available_variant: convert_variant(selected),
        adjacent_variants: product
            .adjacent_variants
            .into_iter()
            .map(convert_variant)
            .collect(),
    })
}

fn convert_option(option: get_product::OptionFields) -> ProductOption {
    ProductOption {
        name: option.name,
        option_values: option
            .option_values
            .into_iter()
            .map(|value| ProductOptionValue {
                name: value.name,
                first_selectable_variant: value.first_selectable_variant.map(convert_variant),
                swatch: value.swatch.map(|s| Swatch {
                    color: s.color,
                    image_url: s.image.and_then(|i| i.preview_image).map(|p| p.url),
                }),
            })
            .collect(),
    }
}

fn convert_variant(v: ProductVariantFields) -> ProductVariant {
    ProductVariant {
        id: v.id,
        title: v.title,
        available_for_sale: v.available_for_sale,
        quantity_available: v.quantity_available,
        sku: v.sku.filter(|sku| !sku.is_empty()),
        price: v.price,
        compare_at_price: v.compare_at_price,
        unit_price: v.unit_price,
        selected_options: v.selected_options,
        image: v.image.map(convert_image),
        product: VariantProduct {
            title: v.product.title,
            handle: v.product.handle,
        },
    }
}

fn convert_image(i: ImageFields) -> Image {
    Image {
        url: i.url,
        alt_text: i.alt_text,
        width: i.width,
        height: i.height,
    }
}

// =============================================================================
// get_product_recommendations conversions
// =============================================================================

pub fn convert_recommendation(
    p: get_product_recommendations::RecommendationFields,
) -> ProductCard {
    ProductCard {
        id: p.id,
        handle: p.handle,
        title: p.title,
        vendor: p.vendor,
        price: p.price_range.min_variant_price,
        image: p.featured_image.map(convert_image),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    const PRODUCT_JSON: &str = r##"{
        "id": "gid://shopify/Product/1",
        "title": "Red Hoodie",
        "vendor": "OMG",
        "handle": "red-hoodie",
        "descriptionHtml": "<p>Cozy</p>",
        "description": "Cozy",
        "category": { "name": "Hoodies" },
        "images": { "edges": [
            { "node": { "url": "https://cdn.shopify.com/a.jpg", "altText": null, "width": 800, "height": 800 } }
        ] },
        "options": [
            { "name": "Color", "optionValues": [
                { "name": "Red", "firstSelectableVariant": null,
                  "swatch": { "color": "#ff0000", "image": { "previewImage": { "url": "https://cdn.shopify.com/red.png" } } } }
            ] }
        ],
        "selectedOrFirstAvailableVariant": {
            "id": "gid://shopify/ProductVariant/11",
            "title": "Red",
            "availableForSale": true,
            "quantityAvailable": 4,
            "sku": "",
            "price": { "amount": "25.0", "currencyCode": "USD" },
            "compareAtPrice": null,
            "unitPrice": null,
            "selectedOptions": [ { "name": "Color", "value": "Red" } ],
            "image": null,
            "product": { "title": "Red Hoodie", "handle": "red-hoodie" }
        },
        "adjacentVariants": [],
        "seo": { "title": null, "description": "A cozy hoodie" }
    }"##;

    #[test]
    fn test_convert_product_flattens_connections() {
        let raw: get_product::ProductFields = serde_json::from_str(PRODUCT_JSON).unwrap();
        let product = convert_product(raw).unwrap();

        assert_eq!(product.category.as_deref(), Some("Hoodies"));
        assert_eq!(product.images.len(), 1);
        assert_eq!(product.seo.description.as_deref(), Some("A cozy hoodie"));
        assert_eq!(
            product.options[0].option_values[0]
                .swatch
                .as_ref()
                .unwrap()
                .image_url
                .as_deref(),
            Some("https://cdn.shopify.com/red.png")
        );
    }

    #[test]
    fn test_convert_product_drops_empty_sku() {
        let raw: get_product::ProductFields = serde_json::from_str(PRODUCT_JSON).unwrap();
        let product = convert_product(raw).unwrap();
        assert!(product.selected_or_first_available_variant.sku.is_none());
    }

    #[test]
    fn test_convert_product_without_variant_is_invalid() {
        let mut raw: get_product::ProductFields = serde_json::from_str(PRODUCT_JSON).unwrap();
        raw.selected_or_first_available_variant = None;
        assert!(matches!(
            convert_product(raw),
            Err(ShopifyError::InvalidResponse(_))
        ));
    }
}

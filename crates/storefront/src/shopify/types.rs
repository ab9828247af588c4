//! Domain types for Shopify Storefront API.
//!
//! These types provide a clean, ergonomic API separate from the raw
//! GraphQL response shapes in `storefront::queries`.

use serde::{Deserialize, Serialize};

pub use omg_beauty_core::{Money, SelectedOption};

// =============================================================================
// Image Types
// =============================================================================

/// Product or variant image.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Image {
    /// Image URL.
    pub url: String,
    /// Alt text for accessibility.
    pub alt_text: Option<String>,
    /// Image width in pixels.
    pub width: Option<i64>,
    /// Image height in pixels.
    pub height: Option<i64>,
}

// =============================================================================
// SEO Types
// =============================================================================

/// SEO metadata.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Seo {
    /// Page title for search engines.
    pub title: Option<String>,
    /// Meta description.
    pub description: Option<String>,
}

// =============================================================================
// Product Types
// =============================================================================

/// Visual swatch attached to an option value (e.g. a color chip).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Swatch {
    /// CSS color for the swatch.
    pub color: Option<String>,
    /// Preview image URL for the swatch.
    pub image_url: Option<String>,
}

/// One value of a product option, e.g. `Red` for `Color`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductOptionValue {
    /// Value name.
    pub name: String,
    /// First variant with this value that can be selected.
    pub first_selectable_variant: Option<ProductVariant>,
    /// Swatch for the value, if configured.
    pub swatch: Option<Swatch>,
}

/// Product option definition.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductOption {
    /// Option name (e.g., "Size").
    pub name: String,
    /// Values in merchant-defined order.
    pub option_values: Vec<ProductOptionValue>,
}

/// Product identity as seen from a variant.
///
/// With combined listings a variant may belong to a different product than
/// the one being viewed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VariantProduct {
    /// Product title.
    pub title: String,
    /// Product URL handle.
    pub handle: String,
}

/// A product variant (specific combination of options).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductVariant {
    /// Variant ID.
    pub id: String,
    /// Variant title (combination of option values).
    pub title: String,
    /// Whether this variant is available for sale.
    pub available_for_sale: bool,
    /// Quantity available (if inventory is exposed to the storefront).
    pub quantity_available: Option<i64>,
    /// SKU code.
    pub sku: Option<String>,
    /// Current price.
    pub price: Money,
    /// Compare-at price (original price if on sale).
    pub compare_at_price: Option<Money>,
    /// Price per unit of measure.
    pub unit_price: Option<Money>,
    /// Selected options for this variant.
    pub selected_options: Vec<SelectedOption>,
    /// Variant image.
    pub image: Option<Image>,
    /// Owning product.
    pub product: VariantProduct,
}

impl ProductVariant {
    /// Whether reported stock is used up.
    ///
    /// Oversold inventory comes back negative. `None` means inventory is not
    /// exposed to the storefront and never counts as exhausted.
    #[must_use]
    pub fn stock_exhausted(&self) -> bool {
        self.quantity_available.is_some_and(|qty| qty <= 0)
    }

    /// Whether the variant can be added to a cart.
    #[must_use]
    pub fn purchasable(&self) -> bool {
        self.available_for_sale && !self.stock_exhausted()
    }
}

/// A product in the store, as loaded for its detail page.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    /// Product ID.
    pub id: String,
    /// URL handle.
    pub handle: String,
    /// Product title.
    pub title: String,
    /// Vendor name.
    pub vendor: String,
    /// Plain text description.
    pub description: String,
    /// HTML description.
    pub description_html: String,
    /// Standard product taxonomy category name.
    pub category: Option<String>,
    /// SEO metadata.
    pub seo: Seo,
    /// All product images, in gallery order.
    pub images: Vec<Image>,
    /// Product options.
    pub options: Vec<ProductOption>,
    /// Variant matching the requested options, or the first available one.
    pub selected_or_first_available_variant: ProductVariant,
    /// Variants one option away from the selected one.
    pub adjacent_variants: Vec<ProductVariant>,
}

/// Compact product summary used for recommendations.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductCard {
    /// Product ID.
    pub id: String,
    /// URL handle.
    pub handle: String,
    /// Product title.
    pub title: String,
    /// Vendor name.
    pub vendor: String,
    /// Lowest variant price.
    pub price: Money,
    /// Featured image.
    pub image: Option<Image>,
}

// =============================================================================
// Cart Types
// =============================================================================

/// A shopping cart.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Cart {
    /// Cart ID.
    pub id: String,
    /// Checkout URL.
    pub checkout_url: String,
    /// Total item quantity.
    pub total_quantity: i64,
}

/// Input for adding a line to cart.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLineInput {
    /// Product variant ID.
    pub merchandise_id: String,
    /// Quantity to add.
    pub quantity: i64,
}

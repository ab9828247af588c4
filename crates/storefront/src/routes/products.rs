//! Product route handlers.
//!
//! A product page loads in two phases. The critical phase runs the single
//! product query and fails the request when it cannot produce a product.
//! The deferred phase (recommendations) is kicked off in the background and
//! delivered later as an HTMX fragment; its failures never reach the page.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{Path, Query, RawQuery, State},
    http::{HeaderMap, HeaderValue},
    response::{IntoResponse, Response},
};
use omg_beauty_core::{Locale, OptionSelection, ProductHandle};
use serde::Deserialize;
use tracing::{instrument, warn};

use crate::error::{AppError, Result, add_breadcrumb};
use crate::filters;
use crate::product::{
    AddToCartControl, Gallery, MainImage, MappedOptionValue, MappedProductOption,
    adjacent_and_first_available_variants, optimistic_variant, product_options, url_sync,
};
use crate::shopify::{Money, Product, ProductCard, ProductVariant};
use crate::state::AppState;

/// Header telling HTMX to replace the address bar without navigating.
const HX_REPLACE_URL: &str = "hx-replace-url";

/// Path parameters shared by the plain and locale-prefixed product routes.
#[derive(Debug, Deserialize)]
pub struct ProductPath {
    pub locale: Option<String>,
    pub handle: String,
}

/// Gallery fragment query parameters.
#[derive(Debug, Deserialize)]
pub struct GalleryQuery {
    #[serde(default)]
    pub image: usize,
}

// =============================================================================
// View Types
// =============================================================================

/// Product display data for templates.
#[derive(Clone)]
pub struct ProductView {
    pub handle: String,
    pub title: String,
    pub vendor: String,
    pub category: Option<String>,
    pub description_html: String,
}

impl From<&Product> for ProductView {
    fn from(product: &Product) -> Self {
        Self {
            handle: product.handle.clone(),
            title: product.title.clone(),
            vendor: product.vendor.clone(),
            category: product.category.clone(),
            description_html: product.description_html.clone(),
        }
    }
}

/// Resolved variant display data for templates.
#[derive(Clone)]
pub struct VariantView {
    pub title: String,
    pub price: String,
    pub compare_at_price: Option<String>,
    pub sku: Option<String>,
    pub in_stock: bool,
}

impl From<&ProductVariant> for VariantView {
    fn from(variant: &ProductVariant) -> Self {
        Self {
            title: variant.title.clone(),
            price: variant.price.display(),
            compare_at_price: variant
                .compare_at_price
                .as_ref()
                .filter(|compare| compare.is_greater_than(&variant.price))
                .map(Money::display),
            sku: variant.sku.clone(),
            in_stock: variant.purchasable(),
        }
    }
}

/// Thumbnail button in the gallery strip.
#[derive(Clone)]
pub struct ThumbnailView {
    pub index: usize,
    pub url: String,
    pub alt: String,
    pub selected: bool,
}

/// Gallery display data for templates.
#[derive(Clone)]
pub struct GalleryView {
    pub main: MainImage,
    pub thumbnails: Vec<ThumbnailView>,
    /// Gallery fragment URL, without the `image` query parameter.
    pub fragment_url: String,
}

impl GalleryView {
    fn new(gallery: &Gallery, product_title: &str, fragment_url: String) -> Self {
        let thumbnails = gallery
            .images()
            .iter()
            .enumerate()
            .map(|(index, image)| ThumbnailView {
                index,
                url: image.url.clone(),
                alt: image
                    .alt_text
                    .clone()
                    .unwrap_or_else(|| product_title.to_string()),
                selected: index == gallery.selected_index(),
            })
            .collect();

        Self {
            main: gallery.main_image(product_title),
            thumbnails,
            fragment_url,
        }
    }
}

/// Recommended product card for templates.
#[derive(Clone)]
pub struct RecommendationView {
    pub url: String,
    pub title: String,
    pub vendor: String,
    pub price: String,
    pub image_url: Option<String>,
    pub image_alt: String,
}

impl RecommendationView {
    fn new(card: &ProductCard, locale: Option<&Locale>) -> Self {
        Self {
            url: format!("{}/products/{}", locale_prefix(locale), card.handle),
            title: card.title.clone(),
            vendor: card.vendor.clone(),
            price: card.price.display(),
            image_url: card.image.as_ref().map(|i| i.url.clone()),
            image_alt: card
                .image
                .as_ref()
                .and_then(|i| i.alt_text.clone())
                .unwrap_or_else(|| card.title.clone()),
        }
    }
}

// =============================================================================
// Templates
// =============================================================================

/// Product detail page template.
#[derive(Template, WebTemplate)]
#[template(path = "products/show.html")]
pub struct ProductShowTemplate {
    pub page_title: String,
    pub brand: String,
    pub canonical_url: String,
    pub meta_description: Option<String>,
    pub product: ProductView,
    pub variant: VariantView,
    pub options: Vec<MappedProductOption>,
    pub locale_prefix: String,
    pub product_base_path: String,
    pub gallery: GalleryView,
    pub cart: AddToCartControl,
    pub replace_url: Option<String>,
    pub recommendations_url: String,
}

impl ProductShowTemplate {
    /// Link selecting `value` in the option picker.
    fn option_href(&self, value: &MappedOptionValue) -> String {
        option_href(&self.locale_prefix, &self.product_base_path, value)
    }
}

/// Combined-listing values link to the other product, in the same locale.
fn option_href(locale_prefix: &str, product_base_path: &str, value: &MappedOptionValue) -> String {
    if value.is_different_product {
        format!(
            "{locale_prefix}/products/{}?{}",
            value.handle, value.variant_uri_query
        )
    } else {
        format!("{product_base_path}?{}", value.variant_uri_query)
    }
}

/// Gallery fragment template (HTMX thumbnail clicks).
#[derive(Template, WebTemplate)]
#[template(path = "partials/product_gallery.html")]
pub struct GalleryTemplate {
    pub gallery: GalleryView,
}

/// Recommendations fragment template (deferred).
#[derive(Template, WebTemplate)]
#[template(path = "partials/recommendations.html")]
pub struct RecommendationsTemplate {
    pub products: Vec<RecommendationView>,
}

// =============================================================================
// Loaders
// =============================================================================

/// Load everything the page cannot render without.
///
/// Issues exactly one product query for `handle` and `selection`.
///
/// # Errors
///
/// - `AppError::Internal` when `handle` is missing (no query is made)
/// - `AppError::NotFound` when `handle` is malformed (no query is made) or
///   Shopify has no such product
/// - `AppError::Shopify` when the query itself fails
pub async fn load_critical_data(
    state: &AppState,
    handle: Option<&str>,
    locale: Option<&Locale>,
    selection: &OptionSelection,
) -> Result<Product> {
    let raw = handle
        .filter(|h| !h.is_empty())
        .ok_or_else(|| AppError::Internal("Expected product handle to be defined".to_string()))?;

    let handle = ProductHandle::parse(raw)
        .map_err(|e| AppError::NotFound(format!("product {raw}: {e}")))?;

    state
        .storefront()
        .get_product(&handle, selection, locale)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("product {handle}")))
}

/// Start loading data the page can live without.
///
/// Prefetches recommendations into the client cache on a background task so
/// the deferred fragment is usually served from cache. Never fails; errors
/// are logged and dropped. Returns the URL of the deferred fragment.
pub fn load_deferred_data(state: &AppState, product: &Product, locale: Option<&Locale>) -> String {
    let storefront = state.storefront().clone();
    let product_id = product.id.clone();
    let task_locale = locale.cloned();

    tokio::spawn(async move {
        if let Err(e) = storefront
            .get_product_recommendations(&product_id, task_locale.as_ref())
            .await
        {
            warn!(error = %e, product_id = %product_id, "Recommendations prefetch failed");
        }
    });

    format!(
        "{}/products/{}/recommendations",
        locale_prefix(locale),
        product.handle
    )
}

// =============================================================================
// Handlers
// =============================================================================

/// Display product detail page.
///
/// Serves both `/products/{handle}` and `/{locale}/products/{handle}`.
#[instrument(skip_all, fields(handle = %path.handle, locale = ?path.locale))]
pub async fn show(
    State(state): State<AppState>,
    Path(path): Path<ProductPath>,
    RawQuery(query): RawQuery,
    headers: HeaderMap,
) -> Result<Response> {
    let locale = parse_locale(path.locale.as_deref())?;
    render_page(&state, Some(&path.handle), locale.as_ref(), query.as_deref(), &headers).await
}

/// Display product detail page for a request without a handle (`/products/`).
#[instrument(skip_all)]
pub async fn show_without_handle(
    State(state): State<AppState>,
    RawQuery(query): RawQuery,
    headers: HeaderMap,
) -> Result<Response> {
    render_page(&state, None, None, query.as_deref(), &headers).await
}

async fn render_page(
    state: &AppState,
    handle: Option<&str>,
    locale: Option<&Locale>,
    query: Option<&str>,
    headers: &HeaderMap,
) -> Result<Response> {
    let selection = OptionSelection::from_query(query.unwrap_or_default());

    let product = load_critical_data(state, handle, locale, &selection).await?;
    let recommendations_url = load_deferred_data(state, &product, locale);

    let candidates = adjacent_and_first_available_variants(&product);
    let variant = optimistic_variant(
        &product.selected_or_first_available_variant,
        &candidates,
        &selection,
    );

    add_breadcrumb(
        "navigation",
        "Viewed product page",
        Some(&[
            ("handle", product.handle.as_str()),
            ("variant_id", variant.id.as_str()),
        ]),
    );

    let product_base_path = format!("{}/products/{}", locale_prefix(locale), product.handle);
    let replace_url = url_sync(&product_base_path, &selection, &variant);

    let gallery = GalleryView::new(
        &Gallery::new(product.images.clone()),
        &product.title,
        format!("{product_base_path}/gallery"),
    );

    let template = ProductShowTemplate {
        page_title: format!("{} | {}", state.config().brand, product.title),
        brand: state.config().brand.clone(),
        canonical_url: format!("/products/{}", product.handle),
        meta_description: product.seo.description.clone(),
        product: ProductView::from(&product),
        variant: VariantView::from(&variant),
        options: product_options(&product, &variant),
        locale_prefix: locale_prefix(locale),
        product_base_path,
        gallery,
        cart: AddToCartControl::for_variant(&variant),
        replace_url: replace_url.clone(),
        recommendations_url,
    };

    let mut response = template.into_response();

    if is_htmx(headers)
        && let Some(value) = replace_url.and_then(|url| HeaderValue::from_str(&url).ok())
    {
        response.headers_mut().insert(HX_REPLACE_URL, value);
    }

    Ok(response)
}

/// Display the gallery with image `image` selected (HTMX fragment).
#[instrument(skip_all, fields(handle = %path.handle, image = query.image))]
pub async fn gallery(
    State(state): State<AppState>,
    Path(path): Path<ProductPath>,
    Query(query): Query<GalleryQuery>,
) -> Result<GalleryTemplate> {
    let locale = parse_locale(path.locale.as_deref())?;
    let product = load_critical_data(
        &state,
        Some(&path.handle),
        locale.as_ref(),
        &OptionSelection::default(),
    )
    .await?;

    let mut gallery = Gallery::new(product.images.clone());
    gallery
        .select(query.image)
        .map_err(|e| AppError::NotFound(e.to_string()))?;

    let fragment_url = format!(
        "{}/products/{}/gallery",
        locale_prefix(locale.as_ref()),
        product.handle
    );

    Ok(GalleryTemplate {
        gallery: GalleryView::new(&gallery, &product.title, fragment_url),
    })
}

/// Display recommended products (deferred HTMX fragment).
///
/// Always renders; on any error the fragment is empty.
#[instrument(skip_all, fields(handle = %path.handle))]
pub async fn recommendations(
    State(state): State<AppState>,
    Path(path): Path<ProductPath>,
) -> RecommendationsTemplate {
    let products = match fetch_recommendations(&state, &path).await {
        Ok(products) => products,
        Err(e) => {
            warn!(error = %e, "Recommendations unavailable");
            Vec::new()
        }
    };

    RecommendationsTemplate { products }
}

async fn fetch_recommendations(
    state: &AppState,
    path: &ProductPath,
) -> Result<Vec<RecommendationView>> {
    let locale = parse_locale(path.locale.as_deref())?;
    let product = load_critical_data(
        state,
        Some(&path.handle),
        locale.as_ref(),
        &OptionSelection::default(),
    )
    .await?;

    let cards = state
        .storefront()
        .get_product_recommendations(&product.id, locale.as_ref())
        .await?;

    Ok(cards
        .iter()
        .filter(|card| card.id != product.id)
        .map(|card| RecommendationView::new(card, locale.as_ref()))
        .collect())
}

// =============================================================================
// Helpers
// =============================================================================

/// Parse the optional `/{locale}` path segment; unknown shapes are a 404.
fn parse_locale(segment: Option<&str>) -> Result<Option<Locale>> {
    segment
        .map(Locale::parse)
        .transpose()
        .map_err(|e| AppError::NotFound(e.to_string()))
}

fn locale_prefix(locale: Option<&Locale>) -> String {
    locale.map(Locale::path_prefix).unwrap_or_default()
}

/// Whether the request was issued by HTMX.
pub(crate) fn is_htmx(headers: &HeaderMap) -> bool {
    headers
        .get("hx-request")
        .is_some_and(|v| v.as_bytes() == b"true")
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::product::variants::tests::variant;
    use omg_beauty_core::CurrencyCode;
    use rust_decimal::Decimal;

    fn usd(cents: i64) -> Money {
        Money::new(Decimal::new(cents, 2), CurrencyCode::new("USD"))
    }

    #[test]
    fn test_variant_view_shows_compare_at_only_when_greater() {
        let mut v = variant("1", "Red", "M", true);
        v.compare_at_price = Some(usd(6000));
        let view = VariantView::from(&v);
        assert_eq!(view.price, "$48.00");
        assert_eq!(view.compare_at_price.as_deref(), Some("$60.00"));

        v.compare_at_price = Some(usd(4800));
        assert!(VariantView::from(&v).compare_at_price.is_none());
    }

    #[test]
    fn test_variant_view_stock_status() {
        assert!(VariantView::from(&variant("1", "Red", "M", true)).in_stock);
        assert!(!VariantView::from(&variant("2", "Red", "L", false)).in_stock);

        let mut oversold = variant("1", "Red", "M", true);
        oversold.quantity_available = Some(-3);
        assert!(!VariantView::from(&oversold).in_stock);
    }

    #[test]
    fn test_option_href_keeps_locale_for_other_products() {
        let mut value = MappedOptionValue {
            name: "Blue".to_string(),
            selected: false,
            exists: true,
            available: true,
            is_different_product: false,
            handle: "red-hoodie".to_string(),
            variant_uri_query: "Color=Blue&Size=M".to_string(),
            swatch: None,
        };
        assert_eq!(
            option_href("/en-ca", "/en-ca/products/red-hoodie", &value),
            "/en-ca/products/red-hoodie?Color=Blue&Size=M"
        );

        value.is_different_product = true;
        value.handle = "blue-hoodie".to_string();
        assert_eq!(
            option_href("/en-ca", "/en-ca/products/red-hoodie", &value),
            "/en-ca/products/blue-hoodie?Color=Blue&Size=M"
        );
        assert_eq!(
            option_href("", "/products/red-hoodie", &value),
            "/products/blue-hoodie?Color=Blue&Size=M"
        );
    }

    #[test]
    fn test_parse_locale() {
        assert!(parse_locale(None).unwrap().is_none());
        assert_eq!(
            parse_locale(Some("en-ca")).unwrap().unwrap().path_prefix(),
            "/en-ca"
        );
        assert!(matches!(
            parse_locale(Some("favicon.ico")),
            Err(AppError::NotFound(_))
        ));
    }

    #[test]
    fn test_is_htmx() {
        let mut headers = HeaderMap::new();
        assert!(!is_htmx(&headers));
        headers.insert("hx-request", HeaderValue::from_static("true"));
        assert!(is_htmx(&headers));
    }
}

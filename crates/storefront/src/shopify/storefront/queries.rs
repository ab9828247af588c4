//! GraphQL documents and response shapes for the Shopify Storefront API.
//!
//! Each operation is a unit struct implementing [`GraphQLQuery`], with its
//! `Variables` and `ResponseData` modelled by hand in a module of the same
//! (snake case) name. Response structs mirror the selection sets exactly;
//! `conversions` turns them into domain types.

use graphql_client::{GraphQLQuery, QueryBody};
use serde::{Deserialize, Serialize};

use crate::shopify::types::{Money, SelectedOption};

// =============================================================================
// Shared fragments
// =============================================================================

/// Raw `Image` selection.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageFields {
    pub url: String,
    pub alt_text: Option<String>,
    pub width: Option<i64>,
    pub height: Option<i64>,
}

/// Raw `Product` identity selection on a variant.
#[derive(Debug, Clone, Deserialize)]
pub struct VariantProductFields {
    pub title: String,
    pub handle: String,
}

/// Raw `ProductVariant` fragment.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductVariantFields {
    pub id: String,
    pub title: String,
    pub available_for_sale: bool,
    pub quantity_available: Option<i64>,
    pub sku: Option<String>,
    pub price: Money,
    pub compare_at_price: Option<Money>,
    pub unit_price: Option<Money>,
    pub selected_options: Vec<SelectedOption>,
    pub image: Option<ImageFields>,
    pub product: VariantProductFields,
}

/// Generic `edges { node }` connection wrapper.
#[derive(Debug, Clone, Deserialize)]
pub struct Connection<T> {
    pub edges: Vec<Edge<T>>,
}

/// A single connection edge.
#[derive(Debug, Clone, Deserialize)]
pub struct Edge<T> {
    pub node: T,
}

/// Cart mutation user error.
#[derive(Debug, Clone, Deserialize)]
pub struct CartUserErrorFields {
    pub field: Option<Vec<String>>,
    pub message: String,
}

/// Raw cart selection returned by the cart mutations.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartFields {
    pub id: String,
    pub checkout_url: String,
    pub total_quantity: i64,
}

/// Mutation payload shared by `cartCreate` and `cartLinesAdd`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartPayload {
    pub cart: Option<CartFields>,
    pub user_errors: Vec<CartUserErrorFields>,
}

/// Input for a single cart line.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLineInput {
    pub merchandise_id: String,
    pub quantity: i64,
}

const PRODUCT_QUERY: &str = r"
query Product(
  $country: CountryCode
  $handle: String!
  $language: LanguageCode
  $selectedOptions: [SelectedOptionInput!]!
) @inContext(country: $country, language: $language) {
  product(handle: $handle) {
    ...Product
  }
}

fragment Product on Product {
  id
  title
  vendor
  handle
  descriptionHtml
  description
  category {
    name
  }
  images(first: 100) {
    edges {
      node {
        url
        altText
        width
        height
      }
    }
  }
  options {
    name
    optionValues {
      name
      firstSelectableVariant {
        ...ProductVariant
      }
      swatch {
        color
        image {
          previewImage {
            url
          }
        }
      }
    }
  }
  selectedOrFirstAvailableVariant(
    selectedOptions: $selectedOptions
    ignoreUnknownOptions: true
    caseInsensitiveMatch: true
  ) {
    ...ProductVariant
  }
  adjacentVariants(selectedOptions: $selectedOptions) {
    ...ProductVariant
  }
  seo {
    description
    title
  }
}

fragment ProductVariant on ProductVariant {
  availableForSale
  quantityAvailable
  compareAtPrice {
    amount
    currencyCode
  }
  id
  image {
    url
    altText
    width
    height
  }
  price {
    amount
    currencyCode
  }
  product {
    title
    handle
  }
  selectedOptions {
    name
    value
  }
  sku
  title
  unitPrice {
    amount
    currencyCode
  }
}
";

const PRODUCT_RECOMMENDATIONS_QUERY: &str = r"
query ProductRecommendations(
  $country: CountryCode
  $language: LanguageCode
  $productId: ID!
) @inContext(country: $country, language: $language) {
  productRecommendations(productId: $productId) {
    id
    handle
    title
    vendor
    featuredImage {
      url
      altText
      width
      height
    }
    priceRange {
      minVariantPrice {
        amount
        currencyCode
      }
    }
  }
}
";

const CART_CREATE_MUTATION: &str = r"
mutation CartCreate($lines: [CartLineInput!]!) {
  cartCreate(input: { lines: $lines }) {
    cart {
      id
      checkoutUrl
      totalQuantity
    }
    userErrors {
      field
      message
    }
  }
}
";

const CART_LINES_ADD_MUTATION: &str = r"
mutation CartLinesAdd($cartId: ID!, $lines: [CartLineInput!]!) {
  cartLinesAdd(cartId: $cartId, lines: $lines) {
    cart {
      id
      checkoutUrl
      totalQuantity
    }
    userErrors {
      field
      message
    }
  }
}
";

// =============================================================================
// Product query
// =============================================================================

/// Product detail query: one product by handle, scoped to selected options.
pub struct GetProduct;

pub mod get_product {
    use super::{Connection, ImageFields, ProductVariantFields, SelectedOption};
    use serde::{Deserialize, Serialize};

    #[derive(Debug, Clone, Serialize)]
    #[serde(rename_all = "camelCase")]
    pub struct Variables {
        pub handle: String,
        pub selected_options: Vec<SelectedOption>,
        pub country: Option<String>,
        pub language: Option<String>,
    }

    #[derive(Debug, Clone, Deserialize)]
    pub struct ResponseData {
        pub product: Option<ProductFields>,
    }

    #[derive(Debug, Clone, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct ProductFields {
        pub id: String,
        pub title: String,
        pub vendor: String,
        pub handle: String,
        pub description_html: String,
        pub description: String,
        pub category: Option<CategoryFields>,
        pub images: Connection<ImageFields>,
        pub options: Vec<OptionFields>,
        pub selected_or_first_available_variant: Option<ProductVariantFields>,
        pub adjacent_variants: Vec<ProductVariantFields>,
        pub seo: SeoFields,
    }

    #[derive(Debug, Clone, Deserialize)]
    pub struct CategoryFields {
        pub name: String,
    }

    #[derive(Debug, Clone, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct OptionFields {
        pub name: String,
        pub option_values: Vec<OptionValueFields>,
    }

    #[derive(Debug, Clone, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct OptionValueFields {
        pub name: String,
        pub first_selectable_variant: Option<ProductVariantFields>,
        pub swatch: Option<SwatchFields>,
    }

    #[derive(Debug, Clone, Deserialize)]
    pub struct SwatchFields {
        pub color: Option<String>,
        pub image: Option<SwatchImageFields>,
    }

    #[derive(Debug, Clone, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct SwatchImageFields {
        pub preview_image: Option<PreviewImageFields>,
    }

    #[derive(Debug, Clone, Deserialize)]
    pub struct PreviewImageFields {
        pub url: String,
    }

    #[derive(Debug, Clone, Deserialize)]
    pub struct SeoFields {
        pub title: Option<String>,
        pub description: Option<String>,
    }
}

impl GraphQLQuery for GetProduct {
    type Variables = get_product::Variables;
    type ResponseData = get_product::ResponseData;

    fn build_query(variables: Self::Variables) -> QueryBody<Self::Variables> {
        QueryBody {
            variables,
            query: PRODUCT_QUERY,
            operation_name: "Product",
        }
    }
}

// =============================================================================
// Recommendations query
// =============================================================================

/// Product recommendations for the deferred section of the page.
pub struct GetProductRecommendations;

pub mod get_product_recommendations {
    use super::{ImageFields, Money};
    use serde::{Deserialize, Serialize};

    #[derive(Debug, Clone, Serialize)]
    #[serde(rename_all = "camelCase")]
    pub struct Variables {
        pub product_id: String,
        pub country: Option<String>,
        pub language: Option<String>,
    }

    #[derive(Debug, Clone, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct ResponseData {
        pub product_recommendations: Option<Vec<RecommendationFields>>,
    }

    #[derive(Debug, Clone, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct RecommendationFields {
        pub id: String,
        pub handle: String,
        pub title: String,
        pub vendor: String,
        pub featured_image: Option<ImageFields>,
        pub price_range: PriceRangeFields,
    }

    #[derive(Debug, Clone, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct PriceRangeFields {
        pub min_variant_price: Money,
    }
}

impl GraphQLQuery for GetProductRecommendations {
    type Variables = get_product_recommendations::Variables;
    type ResponseData = get_product_recommendations::ResponseData;

    fn build_query(variables: Self::Variables) -> QueryBody<Self::Variables> {
        QueryBody {
            variables,
            query: PRODUCT_RECOMMENDATIONS_QUERY,
            operation_name: "ProductRecommendations",
        }
    }
}

// =============================================================================
// Cart mutations
// =============================================================================

/// Create a cart with initial lines.
pub struct CreateCart;

pub mod create_cart {
    use super::{CartLineInput, CartPayload};
    use serde::{Deserialize, Serialize};

    #[derive(Debug, Clone, Serialize)]
    pub struct Variables {
        pub lines: Vec<CartLineInput>,
    }

    #[derive(Debug, Clone, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct ResponseData {
        pub cart_create: Option<CartPayload>,
    }
}

impl GraphQLQuery for CreateCart {
    type Variables = create_cart::Variables;
    type ResponseData = create_cart::ResponseData;

    fn build_query(variables: Self::Variables) -> QueryBody<Self::Variables> {
        QueryBody {
            variables,
            query: CART_CREATE_MUTATION,
            operation_name: "CartCreate",
        }
    }
}

/// Add lines to an existing cart.
pub struct AddToCart;

pub mod add_to_cart {
    use super::{CartLineInput, CartPayload};
    use serde::{Deserialize, Serialize};

    #[derive(Debug, Clone, Serialize)]
    #[serde(rename_all = "camelCase")]
    pub struct Variables {
        pub cart_id: String,
        pub lines: Vec<CartLineInput>,
    }

    #[derive(Debug, Clone, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct ResponseData {
        pub cart_lines_add: Option<CartPayload>,
    }
}

impl GraphQLQuery for AddToCart {
    type Variables = add_to_cart::Variables;
    type ResponseData = add_to_cart::ResponseData;

    fn build_query(variables: Self::Variables) -> QueryBody<Self::Variables> {
        QueryBody {
            variables,
            query: CART_LINES_ADD_MUTATION,
            operation_name: "CartLinesAdd",
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_product_variables_serialize_as_graphql_names() {
        let body = GetProduct::build_query(get_product::Variables {
            handle: "red-hoodie".to_string(),
            selected_options: vec![SelectedOption::new("Color", "Red")],
            country: Some("CA".to_string()),
            language: None,
        });

        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["operationName"], "Product");
        assert_eq!(json["variables"]["handle"], "red-hoodie");
        assert_eq!(json["variables"]["selectedOptions"][0]["name"], "Color");
        assert_eq!(json["variables"]["country"], "CA");
        assert!(json["variables"]["language"].is_null());
        assert!(
            json["query"]
                .as_str()
                .unwrap()
                .contains("caseInsensitiveMatch: true")
        );
    }

    #[test]
    fn test_product_response_deserializes_null_product() {
        let data: get_product::ResponseData = serde_json::from_str(r#"{"product":null}"#).unwrap();
        assert!(data.product.is_none());
    }
}

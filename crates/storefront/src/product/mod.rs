//! Product page logic independent of HTTP.
//!
//! - [`variants`]: which variant is shown and where each option value leads
//! - [`gallery`]: image gallery selection
//! - [`cart_control`]: add-to-cart form state

pub mod cart_control;
pub mod gallery;
pub mod variants;

pub use cart_control::AddToCartControl;
pub use gallery::{Gallery, GalleryError, MainImage};
pub use variants::{
    MappedOptionValue, MappedProductOption, adjacent_and_first_available_variants,
    optimistic_variant, product_options, url_sync,
};

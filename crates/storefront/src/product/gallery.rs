//! Product image gallery with a selected-image index.

use thiserror::Error;

use crate::shopify::Image;

/// Image shown when a product has no usable images.
pub const PLACEHOLDER_IMAGE_URL: &str = "/api/placeholder/400/400";

/// Gallery selection errors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum GalleryError {
    /// The requested index has no image.
    #[error("image index {index} out of range (gallery has {len} images)")]
    OutOfRange { index: usize, len: usize },
}

/// Main image as rendered: URL and alt text, placeholder included.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MainImage {
    pub url: String,
    pub alt: String,
}

/// Ordered product images and the index of the one on display.
///
/// The index always points at an existing image (or is 0 for an empty gallery).
#[derive(Debug, Clone)]
pub struct Gallery {
    images: Vec<Image>,
    selected: usize,
}

impl Gallery {
    /// Create a gallery showing the first image.
    #[must_use]
    pub const fn new(images: Vec<Image>) -> Self {
        Self {
            images,
            selected: 0,
        }
    }

    /// Show the image at `index`.
    ///
    /// # Errors
    ///
    /// Returns `GalleryError::OutOfRange` and keeps the current selection if
    /// there is no image at `index`.
    pub fn select(&mut self, index: usize) -> Result<(), GalleryError> {
        if index >= self.images.len() {
            return Err(GalleryError::OutOfRange {
                index,
                len: self.images.len(),
            });
        }
        self.selected = index;
        Ok(())
    }

    /// Index of the image on display.
    #[must_use]
    pub const fn selected_index(&self) -> usize {
        self.selected
    }

    /// All images, in gallery order.
    #[must_use]
    pub fn images(&self) -> &[Image] {
        &self.images
    }

    /// Image on display, or the placeholder.
    #[must_use]
    pub fn main_image(&self, product_title: &str) -> MainImage {
        match self.images.get(self.selected) {
            Some(image) if !image.url.is_empty() => MainImage {
                url: image.url.clone(),
                alt: image
                    .alt_text
                    .clone()
                    .unwrap_or_else(|| product_title.to_string()),
            },
            _ => MainImage {
                url: PLACEHOLDER_IMAGE_URL.to_string(),
                alt: product_title.to_string(),
            },
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn image(n: u32) -> Image {
        Image {
            url: format!("https://cdn.shopify.com/s/files/hoodie-{n}.jpg"),
            alt_text: Some(format!("Hoodie view {n}")),
            width: Some(800),
            height: Some(800),
        }
    }

    #[test]
    fn test_new_selects_first_image() {
        let gallery = Gallery::new(vec![image(0), image(1)]);
        assert_eq!(gallery.selected_index(), 0);
        assert_eq!(
            gallery.main_image("Red Hoodie").url,
            "https://cdn.shopify.com/s/files/hoodie-0.jpg"
        );
    }

    #[test]
    fn test_select_changes_main_image() {
        let mut gallery = Gallery::new(vec![image(0), image(1), image(2)]);
        gallery.select(2).unwrap();
        assert_eq!(gallery.selected_index(), 2);
        assert_eq!(gallery.main_image("Red Hoodie").alt, "Hoodie view 2");
    }

    #[test]
    fn test_select_out_of_range_keeps_index() {
        let mut gallery = Gallery::new(vec![image(0), image(1)]);
        gallery.select(1).unwrap();

        assert_eq!(
            gallery.select(2),
            Err(GalleryError::OutOfRange { index: 2, len: 2 })
        );
        assert_eq!(gallery.selected_index(), 1);
    }

    #[test]
    fn test_empty_gallery_shows_placeholder() {
        let mut gallery = Gallery::new(Vec::new());
        assert!(gallery.select(0).is_err());

        let main = gallery.main_image("Red Hoodie");
        assert_eq!(main.url, PLACEHOLDER_IMAGE_URL);
        assert_eq!(main.alt, "Red Hoodie");
    }

    #[test]
    fn test_missing_alt_text_uses_title() {
        let mut untitled = image(0);
        untitled.alt_text = None;
        let gallery = Gallery::new(vec![untitled]);
        assert_eq!(gallery.main_image("Red Hoodie").alt, "Red Hoodie");
    }
}

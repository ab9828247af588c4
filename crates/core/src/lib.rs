//! OMG Beauty Core - Shared domain types.
//!
//! This crate provides the types shared by the storefront and its tests:
//! - `storefront` - Public-facing product pages and cart endpoint
//!
//! # Architecture
//!
//! The core crate contains only types and pure functions - no I/O, no HTTP
//! clients. This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for product handles, locales, money, and
//!   variant option selections

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;

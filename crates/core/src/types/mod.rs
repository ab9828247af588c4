//! Core types for OMG Beauty.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod handle;
pub mod locale;
pub mod money;
pub mod selection;

pub use handle::{HandleError, ProductHandle};
pub use locale::{Locale, LocaleError};
pub use money::{CurrencyCode, Money};
pub use selection::{OptionSelection, SelectedOption, query_string_for};

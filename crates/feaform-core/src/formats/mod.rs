//! # Formats
//!
//! On-disk representation of serialized forms.

pub mod persistence;

pub use persistence::{SaveFormat, form_from_str, form_to_string, save, save_form};

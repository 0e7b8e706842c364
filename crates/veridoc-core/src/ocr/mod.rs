//! Best-of-N OCR: preprocessing variants and max-confidence selection.

mod selector;
mod variants;

pub use selector::{OcrSelector, SelectedOcr};
pub use variants::{OcrVariant, PrepProfile, apply_profile, variant_set};

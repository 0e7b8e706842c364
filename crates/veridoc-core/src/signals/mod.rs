//! Verification signal generators.
//!
//! Each generator is an independent check producing one [`Signal`]; all
//! generators tolerate missing or garbled upstream fields (treated as "no
//! match", never as errors) and external failures degrade to neutral
//! signals with an explanatory note.

mod consistency;
mod fraud;
mod pdf_meta;
pub mod registry;
mod text_presence;

pub use consistency::consistency_signal;
pub use fraud::fraud_signal;
pub use pdf_meta::pdf_metadata_signal;
pub use registry::{
    CompaniesHouseAdapter, CountryCode, CountryDetector, KeywordCountryDetector,
    MoroccoRegistryAdapter, RegistryAdapter, RegistryClient, RegistryRecord,
};
pub use text_presence::text_presence_signal;

use crate::models::run::Signal;

/// Signal type tags, shared with the decision aggregator's weight table.
pub const DOC_OCR_TEXT: &str = "doc_ocr_text";
pub const PDF_METADATA_CHECK: &str = "pdf_metadata_check";
pub const DOC_CONTENT_CONSISTENCY: &str = "doc_content_consistency";
pub const FRAUD_HEURISTICS: &str = "fraud_heuristics";
pub const REGISTRY_LOOKUP: &str = "registry_lookup";

/// Case- and whitespace-normalized exact match; absent sides never match.
pub(crate) fn soft_eq(a: Option<&str>, b: Option<&str>) -> bool {
    match (a, b) {
        (Some(a), Some(b)) => {
            let na = normalize_for_match(a);
            let nb = normalize_for_match(b);
            !na.is_empty() && na == nb
        }
        _ => false,
    }
}

pub(crate) fn normalize_for_match(s: &str) -> String {
    s.to_lowercase().split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Debug helper: render a signal as a one-line summary.
pub fn summarize(signal: &Signal) -> String {
    format!(
        "{}: passed={} score={} ({})",
        signal.signal_type,
        signal.passed,
        signal
            .score
            .map(|s| format!("{:.2}", s))
            .unwrap_or_else(|| "-".to_string()),
        signal.explanation
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn soft_eq_ignores_case_and_whitespace() {
        assert!(soft_eq(Some("Acme  SARL"), Some("ACME SARL")));
        assert!(soft_eq(Some(" acme sarl "), Some("Acme Sarl")));
        assert!(!soft_eq(Some("Acme"), Some("Acme SARL")));
        assert!(!soft_eq(None, Some("Acme")));
        assert!(!soft_eq(Some(""), Some("")));
    }
}

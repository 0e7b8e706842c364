//! Fraud heuristics.

use lazy_static::lazy_static;
use regex::Regex;

use super::FRAUD_HEURISTICS;
use crate::models::parsed::NormalizedCompanyFields;
use crate::models::run::{Signal, SignalPayload};

lazy_static! {
    // Loose shape check: alphanumerics, dashes, slashes, spaces, >= 4 chars
    static ref REGISTRATION_SHAPE: Regex = Regex::new(r"^[A-Za-z0-9\-/ ]{4,}$").unwrap();
}

/// Score starts at 1.0 and is reduced by each indicator: a failed metadata
/// check caps the score at the metadata score, and a malformed
/// registration number subtracts 0.2.
pub fn fraud_signal(
    metadata: &Signal,
    parsed: &NormalizedCompanyFields,
    sha256: &str,
) -> Signal {
    let mut reasons: Vec<String> = Vec::new();
    let mut score: f32 = 1.0;

    if !metadata.passed {
        score = score.min(metadata.score.unwrap_or(0.0));
        reasons.push("PDF metadata flags present".to_string());
    }

    if let Some(registration) = parsed.registration_number.as_deref() {
        if !REGISTRATION_SHAPE.is_match(registration) {
            score -= 0.2;
            reasons.push("Registration number format looks off".to_string());
        }
    }

    let score = score.clamp(0.0, 1.0);
    let explanation = if reasons.is_empty() {
        "No fraud indicators detected".to_string()
    } else {
        reasons.join("; ")
    };

    Signal::scored(
        FRAUD_HEURISTICS,
        score >= 0.6,
        score,
        explanation,
        SignalPayload::FraudHeuristics {
            sha256: sha256.to_string(),
            parsed: parsed.clone(),
            reasons,
        },
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::run::SignalPayload;
    use crate::signals::PDF_METADATA_CHECK;

    fn metadata(passed: bool, score: f32) -> Signal {
        Signal::scored(
            PDF_METADATA_CHECK,
            passed,
            score,
            "",
            SignalPayload::Opaque(serde_json::json!({})),
        )
    }

    fn fields(registration: Option<&str>) -> NormalizedCompanyFields {
        NormalizedCompanyFields {
            company_name: Some("ACME".to_string()),
            registration_number: registration.map(str::to_string),
            address: None,
        }
    }

    #[test]
    fn clean_document_scores_full() {
        let signal = fraud_signal(&metadata(true, 1.0), &fields(Some("4521/B-77")), "hash");
        assert!(signal.passed);
        assert_eq!(signal.score, Some(1.0));
        assert_eq!(signal.explanation, "No fraud indicators detected");
    }

    #[test]
    fn failed_metadata_caps_the_score() {
        let signal = fraud_signal(&metadata(false, 0.0), &fields(Some("4521/B")), "hash");
        assert!(!signal.passed);
        assert_eq!(signal.score, Some(0.0));
    }

    #[test]
    fn malformed_registration_number_is_flagged() {
        let signal = fraud_signal(&metadata(true, 1.0), &fields(Some("@!")), "hash");
        assert!(signal.passed); // 0.8 is still above the 0.6 bar
        assert_eq!(signal.score, Some(0.8));
        assert!(signal.explanation.contains("Registration number"));
    }

    #[test]
    fn missing_registration_number_is_not_flagged() {
        let signal = fraud_signal(&metadata(true, 1.0), &fields(None), "hash");
        assert_eq!(signal.score, Some(1.0));
    }
}

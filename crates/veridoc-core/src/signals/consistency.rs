//! Content consistency against the expected profile.

use super::{DOC_CONTENT_CONSISTENCY, soft_eq};
use crate::models::document::ExpectedProfile;
use crate::models::parsed::NormalizedCompanyFields;
use crate::models::run::{Signal, SignalPayload};

/// Compare the parsed company fields against the caller-supplied profile.
///
/// Without a profile the check is a neutral pass; with one, each of the
/// three fields contributes 1/3 on a case/whitespace-normalized exact
/// match.
pub fn consistency_signal(
    parsed: &NormalizedCompanyFields,
    expected: Option<&ExpectedProfile>,
) -> Signal {
    let Some(expected) = expected else {
        return Signal::scored(
            DOC_CONTENT_CONSISTENCY,
            true,
            0.5,
            "No expected profile to compare",
            SignalPayload::ContentConsistency {
                parsed: parsed.clone(),
                expected: None,
            },
        );
    };

    let hits = [
        soft_eq(
            parsed.company_name.as_deref(),
            expected.company_name.as_deref(),
        ),
        soft_eq(
            parsed.registration_number.as_deref(),
            expected.registration_number.as_deref(),
        ),
        soft_eq(parsed.address.as_deref(), expected.address.as_deref()),
    ];
    let matches = hits.iter().filter(|hit| **hit).count();
    let score = matches as f32 / 3.0;

    Signal::scored(
        DOC_CONTENT_CONSISTENCY,
        score >= 0.6,
        score,
        format!("Matched {}/3 fields", matches),
        SignalPayload::ContentConsistency {
            parsed: parsed.clone(),
            expected: Some(expected.clone()),
        },
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parsed(name: &str) -> NormalizedCompanyFields {
        NormalizedCompanyFields {
            company_name: Some(name.to_string()),
            registration_number: None,
            address: None,
        }
    }

    #[test]
    fn no_profile_is_a_neutral_pass() {
        let signal = consistency_signal(&parsed("ACME"), None);
        assert!(signal.passed);
        assert_eq!(signal.score, Some(0.5));
    }

    #[test]
    fn case_and_space_differences_still_match() {
        // "Acme SARL" vs "ACME SARL" earns full credit for the name field.
        let expected = ExpectedProfile {
            company_name: Some("Acme  SARL".to_string()),
            ..ExpectedProfile::default()
        };
        let signal = consistency_signal(&parsed("ACME SARL"), Some(&expected));
        assert_eq!(signal.score, Some(1.0 / 3.0));
        assert!(!signal.passed);
    }

    #[test]
    fn all_three_fields_matching_passes() {
        let fields = NormalizedCompanyFields {
            company_name: Some("ACME SARL".to_string()),
            registration_number: Some("123456789012345".to_string()),
            address: Some("12 Rue Mohammed V, Casablanca".to_string()),
        };
        let expected = ExpectedProfile {
            company_name: Some("acme sarl".to_string()),
            registration_number: Some("123456789012345".to_string()),
            address: Some("12 rue mohammed v, casablanca".to_string()),
        };
        let signal = consistency_signal(&fields, Some(&expected));
        assert_eq!(signal.score, Some(1.0));
        assert!(signal.passed);
    }

    #[test]
    fn two_of_three_passes_the_threshold() {
        let fields = NormalizedCompanyFields {
            company_name: Some("ACME SARL".to_string()),
            registration_number: Some("123456".to_string()),
            address: Some("elsewhere".to_string()),
        };
        let expected = ExpectedProfile {
            company_name: Some("ACME SARL".to_string()),
            registration_number: Some("123456".to_string()),
            address: Some("12 Rue Mohammed V".to_string()),
        };
        let signal = consistency_signal(&fields, Some(&expected));
        assert_eq!(signal.score, Some(2.0 / 3.0));
        assert!(signal.passed);
    }

    #[test]
    fn missing_parsed_fields_count_as_no_match() {
        let fields = NormalizedCompanyFields::default();
        let expected = ExpectedProfile {
            company_name: Some("ACME".to_string()),
            registration_number: Some("123".to_string()),
            address: Some("somewhere".to_string()),
        };
        let signal = consistency_signal(&fields, Some(&expected));
        assert_eq!(signal.score, Some(0.0));
        assert!(!signal.passed);
    }
}

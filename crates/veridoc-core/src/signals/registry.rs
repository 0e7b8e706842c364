//! External registry lookup.
//!
//! Country detection is a pluggable strategy; lookups go through per-country
//! adapters so new regions can be added without touching the aggregator.
//! Every failure path degrades to a neutral 0.5 signal with an explanatory
//! note — a dead registry never aborts a verification run.

use async_trait::async_trait;
use tracing::{debug, warn};

use super::{REGISTRY_LOOKUP, normalize_for_match};
use crate::error::RegistryError;
use crate::models::document::ExpectedProfile;
use crate::models::parsed::NormalizedCompanyFields;
use crate::models::run::{Signal, SignalPayload};

/// Countries with registry coverage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CountryCode {
    /// Morocco.
    Ma,
    /// United Kingdom.
    Gb,
}

impl CountryCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Ma => "MA",
            Self::Gb => "GB",
        }
    }
}

/// Strategy for picking the registry country from document/profile text.
pub trait CountryDetector: Send + Sync {
    fn detect(
        &self,
        parsed: &NormalizedCompanyFields,
        expected: Option<&ExpectedProfile>,
    ) -> Option<CountryCode>;
}

/// Default detector: keyword match over the expected headquarters address,
/// falling back to the parsed address.
pub struct KeywordCountryDetector;

impl CountryDetector for KeywordCountryDetector {
    fn detect(
        &self,
        parsed: &NormalizedCompanyFields,
        expected: Option<&ExpectedProfile>,
    ) -> Option<CountryCode> {
        let text = expected
            .and_then(|e| e.address.as_deref())
            .or(parsed.address.as_deref())
            .unwrap_or("")
            .to_lowercase();

        if ["maroc", "morocco", "casablanca"]
            .iter()
            .any(|kw| text.contains(kw))
        {
            return Some(CountryCode::Ma);
        }
        if ["united kingdom", "uk", "london"]
            .iter()
            .any(|kw| text.contains(kw))
        {
            return Some(CountryCode::Gb);
        }
        None
    }
}

/// What a registry answered for a company.
#[derive(Debug, Clone, Default)]
pub struct RegistryRecord {
    pub registration_number: Option<String>,
    pub company_name: Option<String>,
}

/// One country's registry backend.
#[async_trait]
pub trait RegistryAdapter: Send + Sync {
    /// Which country this adapter answers for.
    fn country(&self) -> CountryCode;

    /// Short source label for explanations.
    fn source(&self) -> &'static str;

    /// Look a company up by registration number and/or name.
    async fn lookup(
        &self,
        registration_number: Option<&str>,
        company_name: Option<&str>,
    ) -> Result<RegistryRecord, RegistryError>;
}

/// Moroccan registry adapter.
///
/// TODO: wire to the OMPIC directory API; until then this echoes the query
/// so downstream scoring and plumbing stay exercisable.
pub struct MoroccoRegistryAdapter;

#[async_trait]
impl RegistryAdapter for MoroccoRegistryAdapter {
    fn country(&self) -> CountryCode {
        CountryCode::Ma
    }

    fn source(&self) -> &'static str {
        "Morocco-registry"
    }

    async fn lookup(
        &self,
        registration_number: Option<&str>,
        company_name: Option<&str>,
    ) -> Result<RegistryRecord, RegistryError> {
        Ok(RegistryRecord {
            registration_number: Some(
                registration_number.unwrap_or("123456").to_string(),
            ),
            company_name: Some(company_name.unwrap_or("TECHNOVISION SARL").to_string()),
        })
    }
}

/// UK Companies House adapter.
///
/// TODO: wire to the Companies House REST API (needs an API key in config).
pub struct CompaniesHouseAdapter;

#[async_trait]
impl RegistryAdapter for CompaniesHouseAdapter {
    fn country(&self) -> CountryCode {
        CountryCode::Gb
    }

    fn source(&self) -> &'static str {
        "UK-CompaniesHouse"
    }

    async fn lookup(
        &self,
        registration_number: Option<&str>,
        company_name: Option<&str>,
    ) -> Result<RegistryRecord, RegistryError> {
        Ok(RegistryRecord {
            registration_number: registration_number.map(str::to_string),
            company_name: company_name.map(str::to_string),
        })
    }
}

/// Detector + adapters, producing the registry-lookup signal.
pub struct RegistryClient {
    detector: Box<dyn CountryDetector>,
    adapters: Vec<Box<dyn RegistryAdapter>>,
}

impl RegistryClient {
    /// Client with a custom detector and no adapters.
    pub fn new(detector: Box<dyn CountryDetector>) -> Self {
        Self {
            detector,
            adapters: Vec::new(),
        }
    }

    /// Keyword detection plus the two shipped adapters.
    pub fn with_default_adapters() -> Self {
        Self::new(Box::new(KeywordCountryDetector))
            .register(Box::new(MoroccoRegistryAdapter))
            .register(Box::new(CompaniesHouseAdapter))
    }

    /// Add an adapter.
    pub fn register(mut self, adapter: Box<dyn RegistryAdapter>) -> Self {
        self.adapters.push(adapter);
        self
    }

    /// Run the registry check for one document.
    pub async fn check(
        &self,
        parsed: &NormalizedCompanyFields,
        expected: Option<&ExpectedProfile>,
    ) -> Signal {
        let country = self.detector.detect(parsed, expected);

        let Some(country) = country else {
            return neutral(None, "none", None, "No registry adapter for country");
        };

        let Some(adapter) = self.adapters.iter().find(|a| a.country() == country) else {
            return neutral(
                Some(country),
                "none",
                None,
                "No registry adapter for country",
            );
        };

        debug!("Registry lookup via {}", adapter.source());

        let record = match adapter
            .lookup(
                parsed.registration_number.as_deref(),
                parsed.company_name.as_deref(),
            )
            .await
        {
            Ok(record) => record,
            Err(e) => {
                warn!("Registry lookup failed: {}", e);
                return neutral(
                    Some(country),
                    adapter.source(),
                    Some(e.to_string()),
                    "Registry lookup failed",
                );
            }
        };

        let mut matched = 0u32;
        let mut compared = 0u32;

        if let (Some(ours), Some(theirs)) = (
            parsed.registration_number.as_deref(),
            record.registration_number.as_deref(),
        ) {
            compared += 1;
            if normalize_for_match(ours) == normalize_for_match(theirs) {
                matched += 1;
            }
        }
        if let (Some(ours), Some(theirs)) = (
            parsed.company_name.as_deref(),
            record.company_name.as_deref(),
        ) {
            compared += 1;
            if normalize_for_match(ours) == normalize_for_match(theirs) {
                matched += 1;
            }
        }

        let score = if compared > 0 {
            matched as f32 / compared as f32
        } else {
            0.5
        };

        Signal::scored(
            REGISTRY_LOOKUP,
            score >= 0.7,
            score,
            format!(
                "Registry {} matched {}/{}",
                adapter.source(),
                matched,
                compared
            ),
            SignalPayload::RegistryLookup {
                country: Some(country.as_str().to_string()),
                source: adapter.source().to_string(),
                matched,
                compared,
                error: None,
            },
        )
    }
}

fn neutral(
    country: Option<CountryCode>,
    source: &str,
    error: Option<String>,
    explanation: &str,
) -> Signal {
    Signal::scored(
        REGISTRY_LOOKUP,
        false,
        0.5,
        explanation,
        SignalPayload::RegistryLookup {
            country: country.map(|c| c.as_str().to_string()),
            source: source.to_string(),
            matched: 0,
            compared: 0,
            error,
        },
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn moroccan_fields() -> NormalizedCompanyFields {
        NormalizedCompanyFields {
            company_name: Some("ACME SARL".to_string()),
            registration_number: Some("123456789012345".to_string()),
            address: Some("12 Rue Mohammed V, Casablanca".to_string()),
        }
    }

    #[tokio::test]
    async fn unknown_country_is_neutral() {
        let client = RegistryClient::with_default_adapters();
        let fields = NormalizedCompanyFields {
            address: Some("123 Main Street, Springfield".to_string()),
            ..NormalizedCompanyFields::default()
        };
        let signal = client.check(&fields, None).await;
        assert!(!signal.passed);
        assert_eq!(signal.score, Some(0.5));
    }

    #[tokio::test]
    async fn detected_country_without_adapter_is_neutral() {
        let client = RegistryClient::new(Box::new(KeywordCountryDetector));
        let signal = client.check(&moroccan_fields(), None).await;
        assert!(!signal.passed);
        assert_eq!(signal.score, Some(0.5));
    }

    #[tokio::test]
    async fn echo_adapter_matches_both_fields() {
        let client = RegistryClient::with_default_adapters();
        let signal = client.check(&moroccan_fields(), None).await;
        assert!(signal.passed);
        assert_eq!(signal.score, Some(1.0));
        assert!(signal.explanation.contains("Morocco-registry"));
    }

    #[tokio::test]
    async fn adapter_failure_degrades_to_neutral() {
        struct FailingAdapter;

        #[async_trait]
        impl RegistryAdapter for FailingAdapter {
            fn country(&self) -> CountryCode {
                CountryCode::Ma
            }

            fn source(&self) -> &'static str {
                "failing"
            }

            async fn lookup(
                &self,
                _registration_number: Option<&str>,
                _company_name: Option<&str>,
            ) -> Result<RegistryRecord, RegistryError> {
                Err(RegistryError::Unavailable("connection refused".to_string()))
            }
        }

        let client =
            RegistryClient::new(Box::new(KeywordCountryDetector)).register(Box::new(FailingAdapter));
        let signal = client.check(&moroccan_fields(), None).await;
        assert!(!signal.passed);
        assert_eq!(signal.score, Some(0.5));
        assert_eq!(signal.explanation, "Registry lookup failed");
    }

    #[tokio::test]
    async fn expected_headquarters_drives_detection() {
        let client = RegistryClient::with_default_adapters();
        let fields = NormalizedCompanyFields {
            company_name: Some("NORTHWIND LTD".to_string()),
            registration_number: Some("09876543".to_string()),
            address: None,
        };
        let expected = ExpectedProfile {
            address: Some("1 Poultry, London".to_string()),
            ..ExpectedProfile::default()
        };
        let signal = client.check(&fields, Some(&expected)).await;
        assert!(signal.explanation.contains("UK-CompaniesHouse"));
        assert!(signal.passed);
    }
}

//! Structured records produced by the field extractors.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Identifier families recognized on company registration documents,
/// ordered by how much trust each pattern carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RegistrationIdType {
    /// Identifiant Commun de l'Entreprise (15 digits, Morocco).
    Ice,
    /// Registre du Commerce number.
    Rc,
    /// Identifiant Fiscal.
    If,
    /// Patente number.
    Patente,
    /// VAT / TVA number.
    Vat,
    /// Generic "company number" label.
    CompanyNo,
    /// Matched no known family.
    Unknown,
}

/// A registration number with the identifier family it matched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistrationNumber {
    /// Which identifier family matched.
    pub id_type: RegistrationIdType,
    /// The cleaned value (alphanumerics, dashes, slashes).
    pub value: String,
}

/// Per-field extraction confidence for a company document.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CompanyConfidence {
    pub company_name: f32,
    pub registration_number: f32,
    pub address: f32,
    pub issue_dates: f32,
}

/// Structured fields extracted from a company registration document.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ParsedCompanyDoc {
    /// Registered company name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company_name: Option<String>,

    /// Best registration number found, by identifier priority.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub registration_number: Option<RegistrationNumber>,

    /// Registered address / siège social.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,

    /// Issuance dates found on the document, deduplicated, ISO calendar dates.
    pub issue_dates: Vec<NaiveDate>,

    /// Per-field confidence (0–1).
    pub confidence: CompanyConfidence,

    /// Which heuristic produced each field, for audit/debugging.
    pub notes: Vec<String>,
}

/// Contact and identity block of a parsed CV.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PersonInfo {
    /// Candidate full name guess.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,

    /// Distinct lowercase email addresses, in order of appearance.
    pub emails: Vec<String>,

    /// Distinct phone numbers, in order of appearance.
    pub phones: Vec<String>,

    /// Portfolio / LinkedIn / GitHub links.
    pub links: Vec<String>,

    /// Spoken languages listed in the languages section.
    pub languages: Vec<String>,
}

/// One education entry.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EducationEntry {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub school: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub degree: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub period: Option<String>,
}

/// One experience entry.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExperienceEntry {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub period: Option<String>,
    /// Mission bullet points, in document order.
    pub bullets: Vec<String>,
}

/// Per-field extraction confidence for a CV.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CvConfidence {
    pub full_name: f32,
    pub skills: f32,
    pub education: f32,
    pub experience: f32,
}

/// Structured fields extracted from a CV.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ParsedCv {
    /// Contact and identity block.
    pub person: PersonInfo,

    /// Skills, in document order.
    pub skills: Vec<String>,

    /// Education entries.
    pub education: Vec<EducationEntry>,

    /// Experience entries.
    pub experience: Vec<ExperienceEntry>,

    /// Per-field confidence (0–1).
    pub confidence: CvConfidence,
}

/// Flat view of the company fields the signal generators compare.
///
/// Collapses the typed registration number to its raw value so exact-match
/// checks against an [`ExpectedProfile`](super::document::ExpectedProfile)
/// stay shape-agnostic. Missing upstream fields stay `None` and compare as
/// "no match", never as errors.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NormalizedCompanyFields {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub registration_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
}

impl From<&ParsedCompanyDoc> for NormalizedCompanyFields {
    fn from(parsed: &ParsedCompanyDoc) -> Self {
        Self {
            company_name: parsed.company_name.clone(),
            registration_number: parsed.registration_number.as_ref().map(|r| r.value.clone()),
            address: parsed.address.clone(),
        }
    }
}

/// Either parsed family, tagged for serialization.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ParsedDocument {
    Cv(ParsedCv),
    CompanyDoc(ParsedCompanyDoc),
}

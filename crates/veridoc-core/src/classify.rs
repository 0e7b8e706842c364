//! Heuristic document-type classification.
//!
//! Two independent scores (CV cues vs. corporate cues) plus a margin rule:
//! a document only classifies as a company document when the corporate
//! score clearly wins AND a hard corporate identifier is present. Ambiguous
//! input defaults to CV, the lower-stakes path.

use lazy_static::lazy_static;
use regex::Regex;

use crate::models::document::DocumentType;

/// Classification reads at most this many characters, for cost control.
const MAX_CLASSIFY_CHARS: usize = 40_000;

lazy_static! {
    static ref CV_HINTS: Vec<Regex> = vec![
        // Sections (FR/EN)
        Regex::new(r"(?i)\b(comp[ée]tence|skills?)\b").unwrap(),
        Regex::new(r"(?i)\b(formation|education|dipl[oô]me|degree)\b").unwrap(),
        Regex::new(r"(?i)\b(exp[ée]riences?|work\s+experience|employment|projects?)\b").unwrap(),
        Regex::new(r"(?i)\b(langues?|languages?)\b").unwrap(),
        // Contact / portfolio
        Regex::new(r"(?i)\blinkedin\.com\b").unwrap(),
        Regex::new(r"(?i)\bgithub\.com\b").unwrap(),
        Regex::new(r"(?i)\bportfolio\b").unwrap(),
        // CV titles
        Regex::new(r"(?i)\b(curriculum\s*vit[aeé]|resume)\b").unwrap(),
    ];

    static ref COMPANY_HINTS: Vec<Regex> = vec![
        // Tight corporate markers only (FR/EN)
        Regex::new(r"(?i)\braison\s*sociale\b").unwrap(),
        Regex::new(r"(?i)\bd[’']?entreprise\b").unwrap(),
        Regex::new(r"(?i)\bd[ée]nomination\s+sociale\b").unwrap(),
        Regex::new(r"(?i)\bcompany\s+name\b").unwrap(),
        Regex::new(r"(?i)\bICE\b").unwrap(),
        Regex::new(r"(?i)\bR\.?C\.?\b|\bReg(?:istre)?\s+du\s+commerce\b").unwrap(),
        Regex::new(r"(?i)\bIdentifiant\s+Fiscal\b|\bIF\b").unwrap(),
        Regex::new(r"(?i)\bPatente\b").unwrap(),
        Regex::new(r"(?i)\bVAT\b|\bTVA\b").unwrap(),
        Regex::new(r"(?i)\bsi[eè]ge\s+social\b").unwrap(),
        // Issuance phrases typical for certificates
        Regex::new(r"(?i)\b(date\s+d['eé]mission|date\s+d['eé]livrance|issued\s+on|registration\s+date|date\s+de\s+publication)\b").unwrap(),
    ];

    static ref EMAIL_RE: Regex =
        Regex::new(r"(?i)[A-Z0-9._%+-]+@[A-Z0-9.-]+\.[A-Z]{2,}").unwrap();

    static ref PHONE_RE: Regex = Regex::new(
        r"(?:\+\d{1,3}\s*)?(?:\(?\d{2,3}\)?[\s.-]?)?\d{2,3}[\s.-]?\d{2}[\s.-]?\d{2}[\s.-]?\d{2}"
    )
    .unwrap();

    static ref SKILLS_SECTION: Regex = Regex::new(r"(?i)\b(comp[ée]tence|skills?)\b").unwrap();
    static ref EDUCATION_SECTION: Regex =
        Regex::new(r"(?i)\b(formation|education|dipl[oô]me|degree)\b").unwrap();
    static ref EXPERIENCE_SECTION: Regex =
        Regex::new(r"(?i)\b(exp[ée]riences?|work\s+experience|employment|projects?)\b").unwrap();

    static ref HARD_CORPORATE_ID: Regex =
        Regex::new(r"(?i)\b(ICE|R\.?C\.?|Identifiant\s+Fiscal|IF|Patente|VAT|TVA)\b").unwrap();
    static ref RAISON_SOCIALE: Regex = Regex::new(r"(?i)\braison\s*sociale\b").unwrap();
}

/// Classify extracted text as CV or company document.
///
/// Pure and deterministic: the same text always yields the same type.
pub fn classify(text: &str) -> DocumentType {
    let t = bounded_prefix(text, MAX_CLASSIFY_CHARS);

    let cv_base = CV_HINTS.iter().filter(|r| r.is_match(t)).count() as f32;
    let company_base = COMPANY_HINTS.iter().filter(|r| r.is_match(t)).count() as f32;

    // CVs usually show contact details and multiple sections
    let has_email = EMAIL_RE.is_match(t);
    let has_phone = PHONE_RE.is_match(t);
    let cv_sections = [&*SKILLS_SECTION, &*EDUCATION_SECTION, &*EXPERIENCE_SECTION]
        .iter()
        .filter(|r| r.is_match(t))
        .count();

    let cv_score = cv_base
        + if has_email { 1.0 } else { 0.0 }
        + if has_phone { 0.5 } else { 0.0 }
        + if cv_sections >= 2 { 1.0 } else { 0.0 };

    // A company classification requires a hard corporate identifier
    // (ICE/RC/IF/Patente/VAT) or a literal "raison sociale"
    let has_hard_id = HARD_CORPORATE_ID.is_match(t);
    let has_raison_sociale = RAISON_SOCIALE.is_match(t);

    let company_score = company_base
        + if has_hard_id { 2.0 } else { 0.0 }
        + if has_raison_sociale { 1.0 } else { 0.0 };

    if company_score >= cv_score + 1.0 && (has_hard_id || has_raison_sociale) {
        DocumentType::CompanyDoc
    } else {
        DocumentType::Cv
    }
}

fn bounded_prefix(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn company_document_with_hard_identifier() {
        let text = "ICE: 123456789012345\nRaison Sociale: ACME SARL\nSiège social: Casablanca";
        assert_eq!(classify(text), DocumentType::CompanyDoc);
    }

    #[test]
    fn resume_with_sections_and_contact() {
        let text = "Skills: Python, Go\nExperience: 2020-2022 Backend Engineer at Acme\njohn@acme.io";
        assert_eq!(classify(text), DocumentType::Cv);
    }

    #[test]
    fn ambiguous_text_defaults_to_cv() {
        assert_eq!(classify(""), DocumentType::Cv);
        assert_eq!(classify("quarterly report 2024"), DocumentType::Cv);
    }

    #[test]
    fn corporate_words_without_hard_identifier_stay_cv() {
        // Mentions a company but carries no ICE/RC/IF/Patente/VAT and no
        // raison sociale: the margin rule refuses the company branch.
        let text = "Portfolio\nSkills: design\ncontact@studio.io\nsiège social: Paris";
        assert_eq!(classify(text), DocumentType::Cv);
    }

    #[test]
    fn classification_is_deterministic() {
        let text = "Raison sociale: Jaanga SARL\nRC: 4521/B";
        let first = classify(text);
        for _ in 0..5 {
            assert_eq!(classify(text), first);
        }
    }

    #[test]
    fn long_text_is_bounded_without_panic() {
        let mut text = "é".repeat(50_000);
        text.push_str("ICE: 123456789012345 raison sociale: ACME");
        // Identifier lies past the bounded prefix: not seen, stays CV.
        assert_eq!(classify(&text), DocumentType::Cv);
    }
}

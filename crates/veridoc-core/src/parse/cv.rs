//! Section-based CV field extraction.
//!
//! Section header lines are located by regex; the text between one header
//! and the earliest following header is that section's block. A header line
//! that carries inline content after a colon ("Skills: Python, Go")
//! contributes that remainder to its own block. Contact details are
//! extracted document-wide.

use tracing::debug;

use super::patterns::*;
use super::normalize_ws;
use crate::models::parsed::{
    CvConfidence, EducationEntry, ExperienceEntry, ParsedCv, PersonInfo,
};

/// Parse a CV from extracted text.
pub fn parse_cv(ocr_text: &str) -> ParsedCv {
    let text = normalize_ws(ocr_text);
    let lines: Vec<String> = text
        .lines()
        .map(normalize_ws)
        .filter(|l| !l.is_empty())
        .collect();

    let emails = dedup_matches(EMAIL.find_iter(&text).map(|m| m.as_str().to_lowercase()));
    let phones = dedup_matches(PHONE.find_iter(&text).map(|m| normalize_ws(m.as_str())));
    let links = dedup_matches(LINK.find_iter(&text).map(|m| normalize_ws(m.as_str())));

    let full_name = guess_full_name(&lines);

    let sections = SectionIndex::locate(&lines);

    let skills = sections
        .block(&lines, sections.skills, &[sections.education, sections.experience, sections.languages])
        .map(|block| {
            SKILL_SPLIT
                .split(&block.join(" "))
                .map(str::trim)
                .filter(|s| s.chars().count() >= 2)
                .take(50)
                .map(str::to_string)
                .collect::<Vec<_>>()
        })
        .unwrap_or_default();

    let education = sections
        .block(&lines, sections.education, &[sections.experience, sections.skills, sections.languages])
        .map(|block| extract_education(&block))
        .unwrap_or_default();

    let experience = sections
        .block(&lines, sections.experience, &[sections.education, sections.skills, sections.languages])
        .map(|block| extract_experience(&block))
        .unwrap_or_default();

    let languages = sections
        .block(&lines, sections.languages, &[sections.education, sections.experience, sections.skills])
        .map(|block| {
            LANGUAGE_SPLIT
                .split(&block.join(" "))
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .take(12)
                .map(str::to_string)
                .collect::<Vec<_>>()
        })
        .unwrap_or_default();

    debug!(
        "Parsed CV: name={:?}, {} skills, {} education, {} experience",
        full_name,
        skills.len(),
        education.len(),
        experience.len()
    );

    ParsedCv {
        confidence: CvConfidence {
            full_name: if full_name.is_some() { 0.8 } else { 0.3 },
            skills: if skills.is_empty() { 0.3 } else { 0.8 },
            education: if education.is_empty() { 0.3 } else { 0.75 },
            experience: if experience.is_empty() { 0.3 } else { 0.75 },
        },
        person: PersonInfo {
            full_name,
            emails,
            phones,
            links,
            languages,
        },
        skills,
        education,
        experience,
    }
}

fn dedup_matches(iter: impl Iterator<Item = String>) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    for item in iter {
        if !out.contains(&item) {
            out.push(item);
        }
    }
    out
}

/// First title-shaped line among the first 6 that carries no contact
/// details and no digits.
fn guess_full_name(lines: &[String]) -> Option<String> {
    for line in lines.iter().take(6) {
        if EMAIL.is_match(line) || PHONE.is_match(line) {
            continue;
        }
        let words = line.split_whitespace().count();
        let has_digits = line.chars().any(|c| c.is_ascii_digit());
        if !has_digits && (2..=6).contains(&words) {
            let name: String = line
                .chars()
                .filter(|c| !matches!(c, ',' | ':' | ';' | '(' | ')'))
                .collect();
            return Some(name.trim().to_string());
        }
    }
    None
}

/// Located section header line indices.
struct SectionIndex {
    skills: Option<usize>,
    education: Option<usize>,
    experience: Option<usize>,
    languages: Option<usize>,
}

impl SectionIndex {
    fn locate(lines: &[String]) -> Self {
        Self {
            skills: lines.iter().position(|l| SKILLS_SECTION.is_match(l)),
            education: lines.iter().position(|l| EDUCATION_SECTION.is_match(l)),
            experience: lines.iter().position(|l| EXPERIENCE_SECTION.is_match(l)),
            languages: lines.iter().position(|l| LANGUAGES_SECTION.is_match(l)),
        }
    }

    /// Lines belonging to the section starting at `start`: the header's
    /// inline remainder (if any) followed by every line up to the earliest
    /// subsequent section header.
    fn block(
        &self,
        lines: &[String],
        start: Option<usize>,
        others: &[Option<usize>],
    ) -> Option<Vec<String>> {
        let start = start?;
        let end = others
            .iter()
            .flatten()
            .copied()
            .filter(|&n| n > start)
            .min()
            .unwrap_or(lines.len());

        let mut block = Vec::new();
        if let Some((_, inline)) = lines[start].split_once([':', '：']) {
            let inline = normalize_ws(inline);
            if !inline.is_empty() {
                block.push(inline);
            }
        }
        block.extend(lines[start + 1..end].iter().cloned());
        Some(block)
    }
}

/// Education lines: a 4-digit year (or range) or an institution keyword.
fn extract_education(block: &[String]) -> Vec<EducationEntry> {
    let bucket: Vec<&String> = block
        .iter()
        .filter(|l| YEAR_OR_RANGE.is_match(l) || SCHOOL_KEYWORD.is_match(l))
        .collect();

    if bucket.is_empty() {
        return Vec::new();
    }

    vec![EducationEntry {
        school: bucket
            .iter()
            .find(|l| SCHOOL_KEYWORD.is_match(l))
            .map(|l| l.to_string()),
        degree: bucket
            .iter()
            .find(|l| DEGREE_KEYWORD.is_match(l))
            .map(|l| l.to_string()),
        period: bucket
            .iter()
            .find(|l| YEAR_OR_RANGE.is_match(l))
            .map(|l| l.to_string()),
    }]
}

/// Experience block: bullet-split missions, with title/company/period
/// pulled from the first few lines.
fn extract_experience(block: &[String]) -> Vec<ExperienceEntry> {
    if block.is_empty() {
        return Vec::new();
    }

    let bullets: Vec<String> = BULLET_SPLIT
        .split(&block.join("\n"))
        .map(normalize_ws)
        .filter(|s| !s.is_empty())
        .take(8)
        .collect();

    let head = block
        .iter()
        .take(3)
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join(" ");

    vec![ExperienceEntry {
        title: JOB_TITLE.find(&head).map(|m| m.as_str().to_string()),
        company: KNOWN_EMPLOYER.find(&head).map(|m| m.as_str().to_string()),
        period: EXPERIENCE_PERIOD.find(&head).map(|m| m.as_str().to_string()),
        bullets,
    }]
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn inline_sections_parse_skills_and_experience() {
        let text = "Skills: Python, Go\nExperience: 2020-2022 Backend Engineer at Acme\njohn@acme.io";
        let parsed = parse_cv(text);

        assert_eq!(parsed.skills, vec!["Python", "Go"]);
        assert_eq!(parsed.experience.len(), 1);
        assert_eq!(parsed.experience[0].period.as_deref(), Some("2020-2022"));
        assert_eq!(parsed.experience[0].title.as_deref(), Some("Engineer"));
        assert_eq!(parsed.person.emails, vec!["john@acme.io"]);
    }

    #[test]
    fn full_name_from_header_lines() {
        let text = "Yasmine El Alaoui\nyasmine@example.com\nCompétences: Python";
        let parsed = parse_cv(text);
        assert_eq!(parsed.person.full_name.as_deref(), Some("Yasmine El Alaoui"));
        assert!((parsed.confidence.full_name - 0.8).abs() < 1e-6);
    }

    #[test]
    fn emails_are_deduplicated_and_lowercased() {
        let text = "Contact: John@Acme.io\nAlt: john@acme.io";
        let parsed = parse_cv(text);
        assert_eq!(parsed.person.emails, vec!["john@acme.io"]);
    }

    #[test]
    fn education_entry_collects_school_degree_period() {
        let text = "Formation\nENSAM Casablanca, Diplôme d'ingénieur\n2017 - 2020\nExpériences\nStagiaire chez inwi";
        let parsed = parse_cv(text);

        assert_eq!(parsed.education.len(), 1);
        let entry = &parsed.education[0];
        assert_eq!(
            entry.school.as_deref(),
            Some("ENSAM Casablanca, Diplôme d'ingénieur")
        );
        assert_eq!(
            entry.degree.as_deref(),
            Some("ENSAM Casablanca, Diplôme d'ingénieur")
        );
        assert_eq!(entry.period.as_deref(), Some("2017 - 2020"));
    }

    #[test]
    fn experience_bullets_split_on_markers() {
        let text = "Expérience\nDéveloppeur chez Jaanga 06/2023 - 09/2023\n• Built the ingestion service\n• Migrated the reporting stack";
        let parsed = parse_cv(text);

        let entry = &parsed.experience[0];
        assert_eq!(entry.period.as_deref(), Some("06/2023 - 09/2023"));
        assert_eq!(entry.company.as_deref(), Some("Jaanga"));
        assert!(entry.bullets.iter().any(|b| b == "Built the ingestion service"));
    }

    #[test]
    fn languages_section_fills_person_block() {
        let text = "Langues: Français, Anglais; Arabe";
        let parsed = parse_cv(text);
        assert_eq!(parsed.person.languages, vec!["Français", "Anglais", "Arabe"]);
    }

    #[test]
    fn empty_text_yields_defaults_with_low_confidence() {
        let parsed = parse_cv("");
        assert_eq!(parsed.person.full_name, None);
        assert!(parsed.skills.is_empty());
        assert!((parsed.confidence.skills - 0.3).abs() < 1e-6);
    }
}

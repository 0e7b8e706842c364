//! Field extraction for company registration documents.
//!
//! Every field is computed independently and carries an explicit confidence
//! plus a note naming the heuristic that fired, so reviewers can audit why
//! a value was chosen.

use std::collections::BTreeSet;

use chrono::NaiveDate;
use tracing::debug;

use super::dates::normalize_date;
use super::patterns::*;
use super::{deburr, normalize_ws};
use crate::models::parsed::{
    CompanyConfidence, ParsedCompanyDoc, RegistrationIdType, RegistrationNumber,
};

/// One extracted field with its confidence and the heuristic that found it.
struct FieldMatch<T> {
    value: Option<T>,
    score: f32,
    note: Option<&'static str>,
}

impl<T> FieldMatch<T> {
    fn found(value: T, score: f32, note: &'static str) -> Self {
        Self {
            value: Some(value),
            score,
            note: Some(note),
        }
    }

    fn missing() -> Self {
        Self {
            value: None,
            score: 0.1,
            note: None,
        }
    }
}

/// Parse a company registration document from extracted text.
pub fn parse_company_doc(ocr_text: &str) -> ParsedCompanyDoc {
    let text = normalize_ws(&ocr_text.replace('|', " "));
    let lines: Vec<String> = text
        .lines()
        .map(normalize_ws)
        .filter(|l| !l.is_empty())
        .collect();

    let name = extract_company_name(&lines);
    let registration = extract_registration(&text);
    let address = extract_address(&lines);
    let (issue_dates, dates_score) = extract_issue_dates(&text, &lines);

    let mut notes = Vec::new();
    if let Some(note) = name.note {
        notes.push(format!("company_name:{}", note));
    }
    if let Some(note) = address.note {
        notes.push(format!("address:{}", note));
    }

    debug!(
        "Parsed company doc: name={:?}, reg={:?}, {} dates",
        name.value,
        registration.value.as_ref().map(|r| r.id_type),
        issue_dates.len()
    );

    ParsedCompanyDoc {
        confidence: CompanyConfidence {
            company_name: name.score,
            registration_number: registration.score,
            address: address.score,
            issue_dates: dates_score,
        },
        company_name: name.value,
        registration_number: registration.value,
        address: address.value,
        issue_dates,
        notes,
    }
}

/// Company name, by strategy priority:
/// 1. explicit label with an inline value (0.95) or a value on the next
///    line (0.93)
/// 2. the most title-shaped line of the document header, before the first
///    numbered section, skipping issuing-authority and title noise (0.80)
/// 3. best title-shaped line among the first 10 lines (0.75)
fn extract_company_name(lines: &[String]) -> FieldMatch<String> {
    for (i, line) in lines.iter().enumerate() {
        if !COMPANY_NAME_HINTS.iter().any(|r| r.is_match(line)) {
            continue;
        }

        let after = inline_value(line);
        let candidate = clean_name_candidate(&after);
        if candidate.chars().count() >= 3 {
            return FieldMatch::found(candidate, 0.95, "from_hint_same_line");
        }

        // Structured documents often put the value on the line below the label
        if let Some(next) = lines.get(i + 1) {
            let next = next.trim();
            let count = next.chars().count();
            if count >= 3 && count < 100 && !NUMBERED_SECTION.is_match(next) {
                return FieldMatch::found(next.to_string(), 0.93, "from_hint_next_line");
            }
        }
    }

    // Prominent header line before the first numbered section
    let mut header_lines = Vec::new();
    for line in lines.iter().take(15) {
        if NUMBERED_SECTION.is_match(line) {
            break;
        }
        if AUTHORITY_LINE.is_match(line) || GENERIC_HEADER.is_match(line) {
            continue;
        }
        header_lines.push(line.as_str());
    }

    let mut candidates: Vec<&str> = header_lines
        .into_iter()
        .filter(|line| {
            let words = line.split_whitespace().count();
            let chars = line.chars().count();
            chars >= 5
                && chars < 80
                && (2..=10).contains(&words)
                && !line.contains('@')
                && !has_year(line)
        })
        .collect();

    if !candidates.is_empty() {
        candidates.sort_by(|a, b| {
            score_title_like(b)
                .partial_cmp(&score_title_like(a))
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        if candidates[0].chars().count() >= 5 {
            return FieldMatch::found(
                candidates[0].to_string(),
                0.80,
                "prominent_before_sections",
            );
        }
    }

    // Final fallback: title-shaped line near the top
    let mut titleish: Vec<&str> = lines
        .iter()
        .take(10)
        .map(String::as_str)
        .filter(|line| {
            let words: Vec<&str> = line.split_whitespace().collect();
            let has_digits = line.chars().any(|c| c.is_ascii_digit());
            let has_long_word = words.iter().any(|w| w.chars().count() >= 3);
            !has_digits && has_long_word && (2..=8).contains(&words.len())
        })
        .collect();

    if !titleish.is_empty() {
        titleish.sort_by(|a, b| {
            score_title_like(b)
                .partial_cmp(&score_title_like(a))
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        return FieldMatch::found(titleish[0].to_string(), 0.75, "title_like");
    }

    FieldMatch::missing()
}

/// Inline value after a label's colon, with trailing identifier blocks
/// (RC/ICE/...) cut off.
fn inline_value(line: &str) -> String {
    let after = line
        .split_once([':', '：'])
        .map(|(_, rest)| rest)
        .unwrap_or("");
    let after = normalize_ws(after);
    match IDENTIFIER_TOKEN.find(&after) {
        Some(m) => after[..m.start()].to_string(),
        None => after,
    }
}

fn clean_name_candidate(candidate: &str) -> String {
    let stripped: String = candidate
        .trim_start_matches(['-', '–', '—', ' '])
        .chars()
        .filter(|c| {
            c.is_alphanumeric() || c.is_whitespace() || matches!(c, '&' | '\'' | '’' | '.' | '-')
        })
        .collect();
    normalize_ws(&stripped)
}

fn has_year(line: &str) -> bool {
    let mut run = 0;
    for c in line.chars() {
        if c.is_ascii_digit() {
            run += 1;
            if run >= 4 {
                return true;
            }
        } else {
            run = 0;
        }
    }
    false
}

/// Title likeness: uppercase ratio, an "&"/"et" connector, and length.
fn score_title_like(s: &str) -> f32 {
    let letters = s.chars().filter(|c| c.is_ascii_alphabetic()).count();
    let uppers = s.chars().filter(|c| c.is_ascii_uppercase()).count();
    let upper_ratio = uppers as f32 / letters.max(1) as f32;
    let has_connector = s.contains('&') || s.to_lowercase().contains("et");

    let mut score = 0.0;
    if upper_ratio > 0.6 {
        score += 0.2;
    }
    if has_connector {
        score += 0.1;
    }
    score + (s.chars().count() as f32 / 60.0).min(0.7)
}

/// Registration number: first match wins, in identifier trust order.
fn extract_registration(text: &str) -> FieldMatch<RegistrationNumber> {
    let families: [(&regex::Regex, RegistrationIdType, f32); 6] = [
        (&ICE_NUMBER, RegistrationIdType::Ice, 1.0),
        (&RC_NUMBER, RegistrationIdType::Rc, 0.9),
        (&IF_NUMBER, RegistrationIdType::If, 0.85),
        (&PATENTE_NUMBER, RegistrationIdType::Patente, 0.8),
        (&VAT_NUMBER, RegistrationIdType::Vat, 0.7),
        (&COMPANY_NO_NUMBER, RegistrationIdType::CompanyNo, 0.6),
    ];

    for (pattern, id_type, weight) in families {
        if let Some(caps) = pattern.captures(text) {
            let value: String = caps[1]
                .chars()
                .filter(|c| c.is_alphanumeric() || matches!(c, '/' | '-' | '_'))
                .collect();
            if value.is_empty() {
                continue;
            }
            return FieldMatch {
                value: Some(RegistrationNumber { id_type, value }),
                score: (0.6 + 0.4 * weight).min(0.99),
                note: None,
            };
        }
    }

    FieldMatch::missing()
}

/// Address, by strategy priority: explicit siège-social line, labeled line
/// (inline value, table header, or following lines), then the best
/// address-shaped line anywhere in the document.
fn extract_address(lines: &[String]) -> FieldMatch<String> {
    for line in lines {
        if SIEGE_SOCIAL.is_match(line) {
            let after = line
                .split_once([':', '：'])
                .map(|(_, rest)| rest)
                .unwrap_or("");
            let value = normalize_ws(after);
            if value.chars().count() > 10 {
                return FieldMatch::found(value, 0.9, "from_siege_social");
            }
        }
    }

    for (i, line) in lines.iter().enumerate() {
        if !ADDRESS_HINTS.iter().any(|r| r.is_match(line)) {
            continue;
        }

        let after_colon = line
            .split_once([':', '：'])
            .map(|(_, rest)| normalize_ws(rest))
            .unwrap_or_default();
        if after_colon.chars().count() > 10 && looks_like_address(&after_colon) {
            return FieldMatch::found(after_colon, 0.9, "from_hint_same_line");
        }

        // A bare column header ("Adresse | Activité | Ville") carries no
        // value itself; the data sits on the following rows.
        let is_table_header = TABLE_HEADER_WORDS.is_match(line)
            && line.split_whitespace().count() <= 5
            && line.chars().count() < 50;

        if is_table_header {
            let mut collected: Vec<&str> = Vec::new();
            for next in lines.iter().skip(i + 1).take(4) {
                if next.chars().count() < 5 {
                    continue;
                }
                if NUMBERED_SECTION.is_match(next) {
                    break;
                }
                if looks_like_address(next) {
                    collected.push(next);
                } else if !collected.is_empty() {
                    break;
                }
            }
            if !collected.is_empty() {
                let joined = normalize_ws(&collected.join(", "));
                return FieldMatch::found(joined, 0.88, "from_table_content");
            }
        } else {
            let mut collected = vec![strip_address_label(line)];
            for next in lines.iter().skip(i + 1).take(3) {
                if looks_like_address(next) {
                    collected.push(next.clone());
                } else {
                    break;
                }
            }
            let joined = normalize_ws(
                &collected
                    .iter()
                    .filter(|s| s.chars().count() > 3)
                    .map(String::as_str)
                    .collect::<Vec<_>>()
                    .join(", "),
            );
            if joined.chars().count() > 10 {
                return FieldMatch::found(joined, 0.85, "from_hint_multiline");
            }
        }
    }

    // Document-wide fallback: best address-looking run of lines
    let mut best = FieldMatch::missing();
    for (i, line) in lines.iter().enumerate() {
        if !looks_like_address(line) || line.chars().count() <= 15 {
            continue;
        }
        let mut collected = vec![line.as_str()];
        for next in lines.iter().skip(i + 1).take(2) {
            if looks_like_address(next) && next.chars().count() > 5 {
                collected.push(next);
            } else {
                break;
            }
        }
        let joined = normalize_ws(&collected.join(", "));
        let score = score_address(&joined);
        if score > best.score {
            best = FieldMatch {
                value: Some(joined),
                score,
                note: None,
            };
        }
    }

    best
}

/// Address-shaped: a street keyword, a number, a postal code, or a known
/// city — bare labels are explicitly excluded.
fn looks_like_address(s: &str) -> bool {
    if ADDRESS_LABEL_ONLY.is_match(s.trim()) {
        return false;
    }

    let deb = deburr(&s.to_lowercase());
    let has_street = STREET_KEYWORD.is_match(&deb);
    let has_number = SMALL_NUMBER.is_match(&deb);
    let has_postcode = POSTAL_CODE.is_match(&deb);
    let has_city = CITY_HINT.is_match(&deb);

    (has_street && has_number) || (has_number && has_city) || (has_street && has_city) || has_postcode
}

fn strip_address_label(s: &str) -> String {
    normalize_ws(&ADDRESS_LABEL_PREFIX.replace(s, ""))
}

fn score_address(s: &str) -> f32 {
    let mut score: f32 = 0.5;
    if POSTAL_CODE.is_match(s) {
        score += 0.15;
    }
    if s.contains(',') {
        score += 0.1;
    }
    if CITY_HINT.is_match(&deburr(&s.to_lowercase())) {
        score += 0.1;
    }
    score.min(0.95)
}

/// Issue dates: lines carrying an issuance-context phrase first; if none
/// match, the first few date tokens anywhere in the document at lower
/// confidence. Deduplicated by normalized calendar date.
fn extract_issue_dates(text: &str, lines: &[String]) -> (Vec<NaiveDate>, f32) {
    let mut dates = Vec::new();
    let mut seen = BTreeSet::new();

    for line in lines {
        if !DATE_CONTEXT.iter().any(|r| r.is_match(line)) {
            continue;
        }
        if let Some(caps) = DATE_CANDIDATE.captures(line) {
            if let Some(date) = normalize_date(&caps[1]) {
                if seen.insert(date) {
                    dates.push(date);
                }
            }
        }
    }

    if dates.is_empty() {
        for caps in DATE_CANDIDATE.captures_iter(text) {
            if let Some(date) = normalize_date(&caps[1]) {
                if seen.insert(date) {
                    dates.push(date);
                }
            }
            if dates.len() >= 3 {
                break;
            }
        }
    }

    let has_context = lines
        .iter()
        .any(|l| DATE_CONTEXT.iter().any(|r| r.is_match(l)));

    let score = if dates.is_empty() {
        0.1
    } else if has_context {
        0.85
    } else {
        0.7
    };

    (dates, score)
}

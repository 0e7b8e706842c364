//! Locale-aware date normalization.
//!
//! Date tokens are normalized through an explicit format list: numeric
//! formats first, then day/month-name/year with French month names tried
//! before English ones. There is deliberately no free-form fallback — a
//! token that matches none of the supported shapes is dropped rather than
//! best-effort parsed.

use chrono::{Datelike, NaiveDate};
use lazy_static::lazy_static;
use regex::Regex;

use super::normalize_ws;

/// Numeric formats tried in order.
pub const DATE_FORMATS: &[&str] = &[
    "%d/%m/%Y",
    "%d-%m-%Y",
    "%d.%m.%Y",
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%Y.%m.%d",
];

lazy_static! {
    // "1 févr. 2023", "15 janvier 2023", "3 August 2021"
    static ref NAMED_MONTH_DATE: Regex =
        Regex::new(r"(?i)^(\d{1,2})\s+([[:alpha:]éûà]+)\.?\s+(\d{2,4})$").unwrap();

    // Leading weekday abbreviation, e.g. "lun. 15/01/2024"
    static ref WEEKDAY_PREFIX: Regex = Regex::new(r"^[[:alpha:]]{3}\.\s*").unwrap();
}

/// Normalize a raw date token to a calendar date.
///
/// Returns `None` for tokens outside the supported format list.
pub fn normalize_date(raw: &str) -> Option<NaiveDate> {
    let clean = normalize_ws(&raw.to_lowercase());
    let clean = WEEKDAY_PREFIX.replace(&clean, "").to_string();

    for format in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(&clean, format) {
            return window_year(date);
        }
    }

    parse_named_month(&clean)
}

fn parse_named_month(clean: &str) -> Option<NaiveDate> {
    let caps = NAMED_MONTH_DATE.captures(clean)?;
    let day: u32 = caps[1].parse().ok()?;
    let year: i32 = caps[3].parse().ok()?;
    let name = super::deburr(&caps[2]);

    // French locale first, then English
    let month = french_month(&name).or_else(|| english_month(&name))?;
    window_year(NaiveDate::from_ymd_opt(year, month, day)?)
}

/// Two-digit years window to 2000s for 00–50, 1900s for 51–99.
fn window_year(date: NaiveDate) -> Option<NaiveDate> {
    let year = date.year();
    if year >= 100 {
        return Some(date);
    }
    let windowed = if year <= 50 { 2000 + year } else { 1900 + year };
    NaiveDate::from_ymd_opt(windowed, date.month(), date.day())
}

fn french_month(name: &str) -> Option<u32> {
    let prefixes = [
        ("janv", 1),
        ("fevr", 2),
        ("mars", 3),
        ("avr", 4),
        ("mai", 5),
        ("juin", 6),
        ("juil", 7),
        ("aout", 8),
        ("sept", 9),
        ("oct", 10),
        ("nov", 11),
        ("dec", 12),
    ];
    prefixes
        .iter()
        .find(|(prefix, _)| name.starts_with(prefix))
        .map(|(_, month)| *month)
}

fn english_month(name: &str) -> Option<u32> {
    let prefixes = [
        ("jan", 1),
        ("feb", 2),
        ("mar", 3),
        ("apr", 4),
        ("may", 5),
        ("jun", 6),
        ("jul", 7),
        ("aug", 8),
        ("sep", 9),
        ("oct", 10),
        ("nov", 11),
        ("dec", 12),
    ];
    prefixes
        .iter()
        .find(|(prefix, _)| name.starts_with(prefix))
        .map(|(_, month)| *month)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn numeric_formats_round_trip() {
        // Every supported numeric format reproduces the same calendar date.
        let date = NaiveDate::from_ymd_opt(2023, 2, 1).unwrap();
        for format in DATE_FORMATS {
            let rendered = date.format(format).to_string();
            assert_eq!(
                normalize_date(&rendered),
                Some(date),
                "format {} failed",
                format
            );
        }
    }

    #[test]
    fn french_month_names_parse() {
        let expected = NaiveDate::from_ymd_opt(2023, 2, 1);
        assert_eq!(normalize_date("1 février 2023"), expected);
        assert_eq!(normalize_date("1 févr. 2023"), expected);
        assert_eq!(normalize_date("15 janvier 2024"), NaiveDate::from_ymd_opt(2024, 1, 15));
        assert_eq!(normalize_date("3 août 2021"), NaiveDate::from_ymd_opt(2021, 8, 3));
    }

    #[test]
    fn english_month_names_parse() {
        assert_eq!(
            normalize_date("3 August 2021"),
            NaiveDate::from_ymd_opt(2021, 8, 3)
        );
        assert_eq!(
            normalize_date("15 Jan 2024"),
            NaiveDate::from_ymd_opt(2024, 1, 15)
        );
    }

    #[test]
    fn french_wins_over_english_for_shared_prefixes() {
        // "mars" is French March, not a prefix mishap
        assert_eq!(normalize_date("1 mars 2023"), NaiveDate::from_ymd_opt(2023, 3, 1));
    }

    #[test]
    fn malformed_tokens_are_dropped_not_guessed() {
        assert_eq!(normalize_date("banana"), None);
        assert_eq!(normalize_date("99/99/2023"), None);
        assert_eq!(normalize_date("sometime in 2023"), None);
    }

    #[test]
    fn weekday_prefix_is_stripped() {
        assert_eq!(
            normalize_date("lun. 15/01/2024"),
            NaiveDate::from_ymd_opt(2024, 1, 15)
        );
    }
}

//! Field extraction for the two document families.

pub mod company;
pub mod cv;
pub mod dates;
pub mod patterns;

pub use company::parse_company_doc;
pub use cv::parse_cv;
pub use dates::normalize_date;

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref HORIZONTAL_WS: Regex = Regex::new(r"[^\S\r\n]+").unwrap();
    static ref MULTI_WS: Regex = Regex::new(r"\s{2,}").unwrap();
}

/// Light whitespace normalization: non-breaking spaces, runs of horizontal
/// whitespace, and runs of mixed whitespace collapse to single spaces.
/// Single newlines survive so line-based heuristics keep working.
pub(crate) fn normalize_ws(s: &str) -> String {
    let s = s.replace('\u{00A0}', " ");
    let s = HORIZONTAL_WS.replace_all(&s, " ");
    let s = MULTI_WS.replace_all(&s, " ");
    s.trim().to_string()
}

/// Strip French diacritics so keyword matching survives OCR accent loss.
pub(crate) fn deburr(s: &str) -> String {
    s.chars()
        .map(|c| match c {
            'à' | 'â' | 'ä' => 'a',
            'é' | 'è' | 'ê' | 'ë' => 'e',
            'î' | 'ï' => 'i',
            'ô' | 'ö' => 'o',
            'ù' | 'û' | 'ü' => 'u',
            'ç' => 'c',
            'À' | 'Â' | 'Ä' => 'A',
            'É' | 'È' | 'Ê' | 'Ë' => 'E',
            'Î' | 'Ï' => 'I',
            'Ô' | 'Ö' => 'O',
            'Ù' | 'Û' | 'Ü' => 'U',
            'Ç' => 'C',
            other => other,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_collapses_horizontal_whitespace_only() {
        let s = "a\u{00A0} b\nc   d";
        assert_eq!(normalize_ws(s), "a b\nc d");
    }

    #[test]
    fn deburr_strips_french_accents() {
        assert_eq!(deburr("siège émis çà"), "siege emis ca");
    }
}

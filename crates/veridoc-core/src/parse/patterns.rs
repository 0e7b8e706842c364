//! Common regex patterns for document field extraction.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    // Corporate name labels (FR/EN)
    pub static ref COMPANY_NAME_HINTS: Vec<Regex> = vec![
        Regex::new(r"(?i)raison\s*sociale").unwrap(),
        Regex::new(r"(?i)d[’']entreprise").unwrap(),
        Regex::new(r"(?i)d[ée]nomination\s+sociale").unwrap(),
        Regex::new(r"(?i)company\s+name").unwrap(),
        Regex::new(r"(?i)nom\s+de\s+la\s+societe").unwrap(),
        Regex::new(r"(?i)nom\s+de\s+l'?entreprise").unwrap(),
        Regex::new(r"(?i)^societe\s*:").unwrap(),
        Regex::new(r"(?i)^entreprise\s*:").unwrap(),
    ];

    // Address labels
    pub static ref ADDRESS_HINTS: Vec<Regex> = vec![
        Regex::new(r"(?i)adresse").unwrap(),
        Regex::new(r"(?i)si[eè]ge\s+social").unwrap(),
        Regex::new(r"(?i)head\s*office").unwrap(),
        Regex::new(r"(?i)address").unwrap(),
    ];

    pub static ref SIEGE_SOCIAL: Regex = Regex::new(r"(?i)si[eè]ge\s+social").unwrap();

    // Registration number families, in trust order
    pub static ref ICE_NUMBER: Regex =
        Regex::new(r"(?i)\b(?:ICE)\s*[:\-]?\s*(\d{15})\b").unwrap();
    pub static ref RC_NUMBER: Regex = Regex::new(
        r"(?i)\b(?:RC|R\.C\.|Reg(?:istration)?\s*No\.?|Reg(?:istre)?\s+du\s+commerce)\s*[:\-]?\s*([A-Z0-9/\-]{3,})\b"
    )
    .unwrap();
    pub static ref IF_NUMBER: Regex =
        Regex::new(r"(?i)\b(?:IF|Identifiant\s+Fiscal)\s*[:\-]?\s*([A-Z0-9/\-]{4,})\b").unwrap();
    pub static ref PATENTE_NUMBER: Regex =
        Regex::new(r"(?i)\b(?:Patente)\s*[:\-]?\s*([A-Z0-9/\-]{4,})\b").unwrap();
    pub static ref VAT_NUMBER: Regex = Regex::new(
        r"(?i)\b(?:TVA|VAT|Num[eé]ro\s+de\s+TVA|VAT\s+Number)\s*[:\-]?\s*([A-Z0-9\-]{6,})\b"
    )
    .unwrap();
    pub static ref COMPANY_NO_NUMBER: Regex = Regex::new(
        r"(?i)\b(?:Company\s*(?:No|Number)|Num[eé]ro\s+d['e]\s*entreprise)\s*[:\-]?\s*([A-Z0-9\-/]{4,})\b"
    )
    .unwrap();

    // Splits an inline name candidate off a trailing identifier block
    pub static ref IDENTIFIER_TOKEN: Regex =
        Regex::new(r"(?i)\b(RC|ICE|IF|PATENTE|TVA|VAT)\b").unwrap();

    // FR/EN date token: 01/02/2023, 2023-02-01, 1 févr. 2023, 1 February 2023
    pub static ref DATE_CANDIDATE: Regex = Regex::new(
        r"(?i)\b(\d{1,2}[/\-.]\d{1,2}[/\-.]\d{2,4}|\d{4}[/\-.]\d{1,2}[/\-.]\d{1,2}|(?:\d{1,2}\s+(?:janv(?:ier)?|f[eé]vr(?:ier)?|mars|avr(?:il)?|mai|juin|juil(?:let)?|ao[uû]t|sept(?:embre)?|oct(?:obre)?|nov(?:embre)?|d[eé]c(?:embre)?|january|february|march|april|may|june|july|august|september|october|november|december)\.?\s+\d{2,4}))\b"
    )
    .unwrap();

    // Issuance context phrases
    pub static ref DATE_CONTEXT: Vec<Regex> = vec![
        Regex::new(r"(?i)date\s*d['’e]\s*[ée]mission").unwrap(),
        Regex::new(r"(?i)date\s*d['’e]\s*d[eé]livrance").unwrap(),
        Regex::new(r"(?i)date\s*d['’e]\s*issue").unwrap(),
        Regex::new(r"(?i)issued?\s*on").unwrap(),
        Regex::new(r"(?i)date\s*d['’e]\s*cr[eé]ation").unwrap(),
        Regex::new(r"(?i)registration\s*date").unwrap(),
        Regex::new(r"(?i)date\s*d['’e]\s*publication").unwrap(),
    ];

    // Document header noise to skip when hunting for a prominent name
    pub static ref NUMBERED_SECTION: Regex = Regex::new(r"^\d+[|)]").unwrap();
    pub static ref AUTHORITY_LINE: Regex =
        Regex::new(r"(?i)(office|minist[eè]re|tribunal|administration|gouvernement)").unwrap();
    pub static ref GENERIC_HEADER: Regex =
        Regex::new(r"(?i)(fiche|certificat|document|legal|registre)").unwrap();

    // Address shape cues (run against deburred lowercase text)
    pub static ref ADDRESS_LABEL_ONLY: Regex =
        Regex::new(r"(?i)^(adresse|address|activit[ée]|enseigne|ville|city)(\s|$)").unwrap();
    pub static ref TABLE_HEADER_WORDS: Regex =
        Regex::new(r"(?i)\b(adresse|activit[ée]|enseigne|ville|city|address)\b").unwrap();
    pub static ref STREET_KEYWORD: Regex = Regex::new(
        r"(?i)(rue|avenue|av\.?|bd|boulevard|quartier|route|lot|bloc|immeuble|appartement|apartment|street|st\.?|road|rd\.?|hay|n°|num[ée]ro)"
    )
    .unwrap();
    pub static ref SMALL_NUMBER: Regex = Regex::new(r"\b\d{1,5}\b").unwrap();
    pub static ref POSTAL_CODE: Regex = Regex::new(r"\b\d{4,6}\b").unwrap();
    pub static ref CITY_HINT: Regex = Regex::new(
        r"(?i)(casablanca|rabat|tanger|marrakech|fes|agadir|dakhla|ouad|oued|paris|marseille|lyon|london|madrid|city|ville|morocco|maroc|france|uk|espagne|spain)"
    )
    .unwrap();
    pub static ref ADDRESS_LABEL_PREFIX: Regex =
        Regex::new(r"(?i)^\s*(adresse|address|si[eè]ge\s+social)\s*[:：-]\s*").unwrap();

    // Contact details
    pub static ref EMAIL: Regex =
        Regex::new(r"(?i)[A-Z0-9._%+-]+@[A-Z0-9.-]+\.[A-Z]{2,}").unwrap();
    pub static ref PHONE: Regex = Regex::new(
        r"(?:\+\d{1,3}\s*)?(?:\(?\d{2,3}\)?[\s.-]?)?\d{2,3}[\s.-]?\d{2}[\s.-]?\d{2}[\s.-]?\d{2}"
    )
    .unwrap();
    pub static ref LINK: Regex = Regex::new(
        r"(?i)\b(?:https?://)?(?:www\.)?(?:github\.com|linkedin\.com|portfolio|behance\.net|dribbble\.com)/[A-Za-z0-9._/\-]+"
    )
    .unwrap();

    // CV section headers (FR/EN)
    pub static ref SKILLS_SECTION: Regex =
        Regex::new(r"(?i)(comp[ée]tences|skills)").unwrap();
    pub static ref EDUCATION_SECTION: Regex =
        Regex::new(r"(?i)(formation|education|dipl[oô]me)").unwrap();
    pub static ref EXPERIENCE_SECTION: Regex =
        Regex::new(r"(?i)(exp[ée]riences?|work\s+experience|employment)").unwrap();
    pub static ref LANGUAGES_SECTION: Regex =
        Regex::new(r"(?i)(langues?|languages?)").unwrap();

    // CV entry cues
    pub static ref YEAR_OR_RANGE: Regex =
        Regex::new(r"\d{4}\s*[-–]\s*\d{4}|\b20\d{2}\b").unwrap();
    pub static ref SCHOOL_KEYWORD: Regex =
        Regex::new(r"(?i)(ENSAM|universit[eé]|school|lyc[ée]e|iut|ensias|insa)").unwrap();
    pub static ref DEGREE_KEYWORD: Regex =
        Regex::new(r"(?i)(licence|master|ing[ée]nieur|bachelor|m1|m2|phd|doctorat)").unwrap();
    pub static ref EXPERIENCE_PERIOD: Regex = Regex::new(
        r"(?i)\b(\d{2}/\d{4}|\d{4})\s*[-–]\s*(\d{2}/\d{4}|\d{4}|present|aujourd'hui)\b"
    )
    .unwrap();
    pub static ref JOB_TITLE: Regex = Regex::new(
        r"(?i)\b(developer|d[eé]veloppeur|data\s*scientist|engineer|analyst|stagiaire)\b"
    )
    .unwrap();
    pub static ref KNOWN_EMPLOYER: Regex = Regex::new(
        r"(?i)\b(inwi|orange|jaanga|arakea|capgemini|atos|ibm|sqli|accenture)\b"
    )
    .unwrap();
    pub static ref BULLET_SPLIT: Regex = Regex::new(r"\n?\s*[•\-–]\s+").unwrap();
    pub static ref SKILL_SPLIT: Regex = Regex::new(r"[,•;·\-\n]+").unwrap();
    pub static ref LANGUAGE_SPLIT: Regex = Regex::new(r"[,;•\-\n]+").unwrap();
}

//! Cell content classifiers
//!
//! Each check answers "does this one cell look like X". They are cheap,
//! deliberately loose, and never fail: anything odd is simply "no".

use chrono::{DateTime, NaiveDate};
use serde::Deserialize;

/// Kinds of content a role can be scored against
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellKind {
    Email,
    Phone,
    Product,
    PersonName,
    Date,
    Number,
}

/// Date layouts accepted by [`looks_like_date`]
const DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d", "%Y/%m/%d", "%d/%m/%Y", "%m/%d/%Y", "%d-%m-%Y", "%d.%m.%Y",
];

/// Minimum digit count for a bare phone number
const MIN_PHONE_DIGITS: usize = 7;

/// Longest cell still considered a person name
const MAX_NAME_WORDS: usize = 6;

/// Marker-driven classifiers, tunable from configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Classifier {
    /// Prefixes placed in front of phone numbers by lead-ad exports (`p:+34...`)
    pub phone_prefixes: Vec<String>,
    /// Prefixes that mark a product/category label (`product: Gold`)
    pub product_markers: Vec<String>,
    /// Whole words that mark a product/category label
    pub product_keywords: Vec<String>,
}

impl Default for Classifier {
    fn default() -> Self {
        Self {
            phone_prefixes: vec!["p:".to_string()],
            product_markers: vec![
                "product:".to_string(),
                "service:".to_string(),
                "plan:".to_string(),
            ],
            product_keywords: [
                "plan", "package", "course", "membership", "subscription", "premium", "basic",
                "gold", "silver", "paquete", "curso", "membresia", "membresía", "suscripcion",
                "suscripción",
            ]
            .iter()
            .map(|keyword| keyword.to_string())
            .collect(),
        }
    }
}

impl Classifier {
    pub fn matches(&self, kind: CellKind, cell: &str) -> bool {
        match kind {
            CellKind::Email => looks_like_email(cell),
            CellKind::Phone => self.looks_like_phone(cell),
            CellKind::Product => self.looks_like_product(cell),
            CellKind::PersonName => looks_like_person_name(cell),
            CellKind::Date => looks_like_date(cell),
            CellKind::Number => looks_like_number(cell),
        }
    }

    /// Seven or more digits with only phone punctuation around them, or a
    /// recognized phone prefix. Calendar dates are not phones.
    pub fn looks_like_phone(&self, cell: &str) -> bool {
        let lowered = cell.trim().to_lowercase();
        if self
            .phone_prefixes
            .iter()
            .any(|prefix| !prefix.is_empty() && lowered.starts_with(&prefix.to_lowercase()))
        {
            return true;
        }

        let digits = lowered.chars().filter(char::is_ascii_digit).count();
        let punctuation_only = lowered
            .chars()
            .all(|c| c.is_ascii_digit() || matches!(c, '+' | '-' | '(' | ')' | '.' | ' ' | '/'));
        digits >= MIN_PHONE_DIGITS && punctuation_only && !looks_like_date(&lowered)
    }

    /// Starts with a product marker or contains a product keyword as a word
    pub fn looks_like_product(&self, cell: &str) -> bool {
        let lowered = cell.trim().to_lowercase();
        if lowered.is_empty() || looks_like_email(&lowered) {
            return false;
        }
        if self
            .product_markers
            .iter()
            .any(|marker| !marker.is_empty() && lowered.starts_with(&marker.to_lowercase()))
        {
            return true;
        }
        words(&lowered).any(|word| {
            self.product_keywords
                .iter()
                .any(|keyword| keyword.eq_ignore_ascii_case(word))
        })
    }
}

/// Text before the last `@`, a dot inside the domain with text on both sides
pub fn looks_like_email(cell: &str) -> bool {
    let cell = cell.trim();
    if cell.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = cell.rsplit_once('@') else {
        return false;
    };
    if local.is_empty() {
        return false;
    }
    match domain.rfind('.') {
        Some(dot) => dot > 0 && dot + 1 < domain.len(),
        None => false,
    }
}

/// One to six words made only of letters and name punctuation
pub fn looks_like_person_name(cell: &str) -> bool {
    let cell = cell.trim();
    let word_count = cell.split_whitespace().count();
    if word_count == 0 || word_count > MAX_NAME_WORDS {
        return false;
    }
    cell.chars().any(char::is_alphabetic)
        && cell
            .chars()
            .all(|c| c.is_alphabetic() || c.is_whitespace() || matches!(c, '\'' | '-' | '.' | ','))
}

/// Parses as a calendar date in one of the common sheet layouts
pub fn looks_like_date(cell: &str) -> bool {
    let cell = cell.trim();
    if cell.is_empty() {
        return false;
    }
    DATE_FORMATS
        .iter()
        .any(|format| NaiveDate::parse_from_str(cell, format).is_ok())
        || DateTime::parse_from_rfc3339(cell).is_ok()
}

/// Parses as a finite number once separators and a trailing `%` are removed
pub fn looks_like_number(cell: &str) -> bool {
    normalize_number(cell)
        .parse::<f64>()
        .map(f64::is_finite)
        .unwrap_or(false)
}

/// Strip thousands separators, spaces and a trailing percent sign
pub fn normalize_number(cell: &str) -> String {
    let trimmed = cell.trim();
    let trimmed = trimmed.strip_suffix('%').unwrap_or(trimmed);
    trimmed
        .chars()
        .filter(|c| !matches!(c, ',' | '_') && !c.is_whitespace())
        .collect()
}

fn words(text: &str) -> impl Iterator<Item = &str> {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|word| !word.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_email() {
        assert!(looks_like_email("jane@x.com"));
        assert!(looks_like_email("  first.last+tag@mail.example.org "));
        assert!(!looks_like_email("@x.com"));
        assert!(!looks_like_email("jane@com"));
        assert!(!looks_like_email("jane@.com"));
        assert!(!looks_like_email("jane@x."));
        assert!(!looks_like_email("jane x@y.com"));
        assert!(!looks_like_email("Doe, Jane"));
    }

    #[test]
    fn test_phone() {
        let classifier = Classifier::default();
        assert!(classifier.looks_like_phone("555-1234"));
        assert!(classifier.looks_like_phone("+34 (600) 123 456"));
        assert!(classifier.looks_like_phone("p:+34600123456"));
        assert!(classifier.looks_like_phone("P:600"));
        assert!(!classifier.looks_like_phone("12345"));
        assert!(!classifier.looks_like_phone("order 1234567"));
        assert!(!classifier.looks_like_phone("jane@x.com"));
        assert!(!classifier.looks_like_phone(""));
    }

    #[test]
    fn test_dates_are_not_phones() {
        let classifier = Classifier::default();
        for date in ["2024-03-01", "2024/03/01", "01/03/2024", "01.03.2024", "15-03-2024"] {
            assert!(!classifier.looks_like_phone(date), "{date} taken as a phone");
        }
        assert!(classifier.looks_like_phone("600-12-2024"));
    }

    #[test]
    fn test_product() {
        let classifier = Classifier::default();
        assert!(classifier.looks_like_product("Premium Plan"));
        assert!(classifier.looks_like_product("product: Widgets"));
        assert!(classifier.looks_like_product("Curso intensivo"));
        assert!(!classifier.looks_like_product("Jane Doe"));
        assert!(!classifier.looks_like_product("planet"));
        assert!(!classifier.looks_like_product("plan@x.com"));
    }

    #[test]
    fn test_custom_markers() {
        let classifier = Classifier {
            phone_prefixes: vec!["tel:".to_string()],
            product_markers: vec!["sku-".to_string()],
            product_keywords: Vec::new(),
        };
        assert!(classifier.looks_like_phone("TEL:123"));
        assert!(!classifier.looks_like_phone("p:123"));
        assert!(classifier.looks_like_product("SKU-991"));
        assert!(!classifier.looks_like_product("Premium Plan"));
    }

    #[test]
    fn test_person_name() {
        assert!(looks_like_person_name("Jane"));
        assert!(looks_like_person_name("Doe, Jane"));
        assert!(looks_like_person_name("María José O'Neil-Pérez"));
        assert!(!looks_like_person_name("jane@x.com"));
        assert!(!looks_like_person_name("R2D2"));
        assert!(!looks_like_person_name("- -"));
        assert!(!looks_like_person_name("one two three four five six seven"));
    }

    #[test]
    fn test_date() {
        assert!(looks_like_date("2024-03-01"));
        assert!(looks_like_date("01/03/2024"));
        assert!(looks_like_date("12/31/2024"));
        assert!(looks_like_date("01.03.2024"));
        assert!(looks_like_date("2024-03-01T10:00:00Z"));
        assert!(!looks_like_date("yesterday"));
        assert!(!looks_like_date("1200"));
        assert!(!looks_like_date(""));
    }

    #[test]
    fn test_number() {
        assert!(looks_like_number("0"));
        assert!(looks_like_number("1,234"));
        assert!(looks_like_number(" 12.5% "));
        assert!(looks_like_number("-3"));
        assert!(!looks_like_number("NaN"));
        assert!(!looks_like_number("inf"));
        assert!(!looks_like_number("abc"));
        assert!(!looks_like_number(""));
    }

    #[test]
    fn test_classifier_dispatch() {
        let classifier = Classifier::default();
        assert!(classifier.matches(CellKind::Email, "a@b.co"));
        assert!(classifier.matches(CellKind::Number, "42"));
        assert!(!classifier.matches(CellKind::Date, "42"));
    }
}

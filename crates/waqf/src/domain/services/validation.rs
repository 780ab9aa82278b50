//! Validation - Saudi identity and contact formats
//!
//! Each validator returns the canonical form of the value on success.

use std::sync::OnceLock;

use regex::Regex;

use crate::domain::errors::DomainError;

fn national_id_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[12]\d{9}$").expect("national id pattern"))
}

fn iban_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^SA\d{22}$").expect("iban pattern"))
}

fn phone_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^5\d{8}$").expect("phone pattern"))
}

fn email_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern"))
}

/// Exactly 10 digits starting with 1 (citizen) or 2 (resident)
pub fn validate_national_id(value: &str) -> Result<String, DomainError> {
    let value = value.trim();
    if national_id_re().is_match(value) {
        Ok(value.to_string())
    } else {
        Err(DomainError::validation(
            "national_id must be 10 digits starting with 1 or 2",
        ))
    }
}

/// `SA` followed by 22 digits; spaces are dropped and letters upper-cased
pub fn validate_iban(value: &str) -> Result<String, DomainError> {
    let compact: String = value
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect::<String>()
        .to_uppercase();
    if iban_re().is_match(&compact) {
        Ok(compact)
    } else {
        Err(DomainError::validation(
            "iban must be SA followed by 22 digits",
        ))
    }
}

/// Normalize a Saudi mobile number to `5XXXXXXXX`
pub fn normalize_phone(value: &str) -> Result<String, DomainError> {
    let compact: String = value
        .chars()
        .filter(|c| !matches!(c, ' ' | '-' | '(' | ')'))
        .collect();

    let local = ["+966", "00966", "966", "0"]
        .iter()
        .find_map(|prefix| compact.strip_prefix(prefix))
        .unwrap_or(&compact);

    if phone_re().is_match(local) {
        Ok(local.to_string())
    } else {
        Err(DomainError::validation(
            "phone must be a Saudi mobile number (5XXXXXXXX)",
        ))
    }
}

pub fn validate_email(value: &str) -> Result<String, DomainError> {
    let value = value.trim();
    if email_re().is_match(value) {
        Ok(value.to_lowercase())
    } else {
        Err(DomainError::validation("email is invalid"))
    }
}

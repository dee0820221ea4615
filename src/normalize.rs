//! Field-level cleaning rules for the client and sales sheets.
//!
//! Every function here is total: inputs that cannot be cleaned degrade to a
//! sentinel ([`UNKNOWN`], [`INVALID_EMAIL`]), the epoch date, or a zero amount.
//! Nothing is rejected and nothing panics.

use std::sync::OnceLock;

use chrono::NaiveDate;
use regex::Regex;
use rust_decimal::{Decimal, RoundingStrategy};

use crate::{
    data::{Cell, DATE_FORMAT},
    transform::string_ops,
};

pub const UNKNOWN: &str = "desconhecido";
pub const INVALID_EMAIL: &str = "email_invalido";

pub const PERSON_INDIVIDUAL: &str = "Fisica";
pub const PERSON_COMPANY: &str = "Juridica";
pub const CONTACT_EMAIL: &str = "Email";

pub const INDIVIDUAL_DOCUMENT_LEN: usize = 11;
pub const COMPANY_DOCUMENT_LEN: usize = 14;

pub const AMOUNT_SCALE: u32 = 2;

const HONORIFICS: &[&str] = &["Dra.", "Srta.", "Sr.", "Sra."];
const DOCUMENT_PUNCTUATION: &[char] = &['.', ',', '-', '/'];
const EMAIL_PATTERN: &str = r"(?i)^\b[a-z0-9._%+-]+@[a-z0-9.-]+\.[a-z]{2,7}\b$";

fn email_regex() -> &'static Regex {
    static EMAIL: OnceLock<Regex> = OnceLock::new();
    EMAIL.get_or_init(|| Regex::new(EMAIL_PATTERN).expect("email pattern is valid"))
}

pub fn epoch_date() -> NaiveDate {
    NaiveDate::default()
}

/// Strips the first matching honorific and surrounding whitespace.
///
/// Returns `None` when the cell carries nothing usable, leaving the gap to be
/// filled with [`UNKNOWN`] once the whole row is cleaned.
pub fn clean_name(raw: &Cell) -> Option<String> {
    let text = raw.to_text()?;
    let stripped = string_ops::strip_first_prefix(&text, HONORIFICS);
    let cleaned = string_ops::trim(&stripped);
    if cleaned.is_empty() {
        None
    } else {
        Some(cleaned.into_owned())
    }
}

pub fn is_valid_email(raw: &str) -> bool {
    email_regex().is_match(raw)
}

/// Removes punctuation from a CPF/CNPJ and keeps it only at 11 or 14 characters.
pub fn clean_document(raw: &Cell) -> String {
    let Some(text) = raw.to_text() else {
        return UNKNOWN.to_string();
    };
    let digits = string_ops::remove_chars(&text, DOCUMENT_PUNCTUATION);
    match digits.chars().count() {
        INDIVIDUAL_DOCUMENT_LEN | COMPANY_DOCUMENT_LEN => digits.into_owned(),
        _ => UNKNOWN.to_string(),
    }
}

pub fn resolve_person_type(raw: &Cell, cleaned_document: &str) -> String {
    if cleaned_document == UNKNOWN {
        return UNKNOWN.to_string();
    }
    if let Some(text) = raw.as_text() {
        return string_ops::title_case(text).into_owned();
    }
    match cleaned_document.chars().count() {
        COMPANY_DOCUMENT_LEN => PERSON_COMPANY.to_string(),
        INDIVIDUAL_DOCUMENT_LEN => PERSON_INDIVIDUAL.to_string(),
        _ => UNKNOWN.to_string(),
    }
}

/// Title-cases a supplied contact type, otherwise infers `Email` from a usable address.
pub fn resolve_contact_type(raw: &Cell, email: &Cell) -> String {
    if let Some(text) = raw.as_text() {
        return string_ops::title_case(text).into_owned();
    }
    let usable_email = email.as_text().is_some_and(|address| {
        address != INVALID_EMAIL && address != UNKNOWN && is_valid_email(address)
    });
    if usable_email {
        CONTACT_EMAIL.to_string()
    } else {
        UNKNOWN.to_string()
    }
}

/// Absolute value rounded to two decimals, ties to even on the exact binary
/// value of a float. Non-numeric or out-of-range input yields `0.00`.
pub fn normalize_amount(raw: &Cell) -> Decimal {
    let mut amount = raw
        .as_decimal()
        .map(|value| {
            value
                .abs()
                .round_dp_with_strategy(AMOUNT_SCALE, RoundingStrategy::MidpointNearestEven)
        })
        .unwrap_or(Decimal::ZERO);
    amount.rescale(AMOUNT_SCALE);
    amount
}

pub fn normalize_date(raw: &Cell) -> NaiveDate {
    match raw {
        Cell::Text(text) => {
            NaiveDate::parse_from_str(text.trim(), DATE_FORMAT).unwrap_or_else(|_| epoch_date())
        }
        Cell::DateTime(timestamp) => timestamp.date(),
        _ => epoch_date(),
    }
}

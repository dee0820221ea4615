//! Raw spreadsheet cell model.
//!
//! Workbook cells arrive as "maybe text, maybe a number, maybe nothing". The
//! [`Cell`] tagged union captures that once at extraction time so the field
//! normalizers can pattern-match instead of inspecting types at runtime.

use anyhow::{Result, anyhow};
use calamine::Data;
use chrono::{Duration, NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;

pub const DATE_FORMAT: &str = "%Y-%m-%d";

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S",
];

const SECONDS_PER_DAY: f64 = 86_400.0;

#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Empty,
    Text(String),
    Int(i64),
    Float(f64),
    Bool(bool),
    DateTime(NaiveDateTime),
}

impl Cell {
    pub fn text(value: impl Into<String>) -> Self {
        let value = value.into();
        if value.trim().is_empty() {
            Cell::Empty
        } else {
            Cell::Text(value)
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Cell::Empty)
    }

    /// Returns the string payload only when the cell holds text.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Cell::Text(s) => Some(s.as_str()),
            _ => None,
        }
    }

    /// Int, Float and Bool cells. Text is never treated as numeric.
    pub fn is_numeric(&self) -> bool {
        matches!(self, Cell::Int(_) | Cell::Float(_) | Cell::Bool(_))
    }

    /// Numeric payload as a decimal holding the exact binary value of a float.
    ///
    /// `None` for non-numeric cells and for floats outside the `Decimal` range
    /// (NaN, infinities, magnitudes above ~7.9e28). Bools count as 0 and 1.
    pub fn as_decimal(&self) -> Option<Decimal> {
        match self {
            Cell::Int(i) => Some(Decimal::from(*i)),
            Cell::Bool(b) => Some(Decimal::from(u8::from(*b))),
            Cell::Float(f) => Decimal::from_f64_retain(*f),
            _ => None,
        }
    }

    /// Integer identifier carried by the cell, accepting integral floats and numeric text.
    pub fn as_integer(&self) -> Option<i64> {
        match self {
            Cell::Int(i) => Some(*i),
            Cell::Float(f) => float_to_integer(*f),
            Cell::Text(s) => {
                let trimmed = s.trim();
                trimmed
                    .parse::<i64>()
                    .ok()
                    .or_else(|| trimmed.parse::<f64>().ok().and_then(float_to_integer))
            }
            _ => None,
        }
    }

    /// Text rendering of any non-empty cell. Whole floats render without a fraction.
    pub fn to_text(&self) -> Option<String> {
        match self {
            Cell::Empty => None,
            Cell::Text(s) => Some(s.clone()),
            Cell::Int(i) => Some(i.to_string()),
            Cell::Float(f) => Some(match float_to_integer(*f) {
                Some(whole) => whole.to_string(),
                None => f.to_string(),
            }),
            Cell::Bool(b) => Some(if *b { "True" } else { "False" }.to_string()),
            Cell::DateTime(dt) => Some(dt.format("%Y-%m-%d %H:%M:%S").to_string()),
        }
    }
}

impl From<&Data> for Cell {
    fn from(data: &Data) -> Self {
        match data {
            Data::Empty => Cell::Empty,
            Data::String(s) => Cell::text(s.as_str()),
            Data::Int(i) => Cell::Int(*i),
            Data::Float(f) => Cell::Float(*f),
            Data::Bool(b) => Cell::Bool(*b),
            Data::DateTime(dt) => {
                let serial = dt.as_f64();
                excel_serial_to_datetime(serial)
                    .map(Cell::DateTime)
                    .unwrap_or(Cell::Float(serial))
            }
            Data::DateTimeIso(s) => parse_iso_datetime(s)
                .map(Cell::DateTime)
                .unwrap_or_else(|_| Cell::text(s.as_str())),
            Data::DurationIso(s) => Cell::text(s.as_str()),
            Data::Error(_) => Cell::Empty,
        }
    }
}

fn float_to_integer(value: f64) -> Option<i64> {
    if value.is_finite()
        && value.fract() == 0.0
        && value >= i64::MIN as f64
        && value <= i64::MAX as f64
    {
        Some(value as i64)
    } else {
        None
    }
}

/// Converts a 1900-system Excel serial (days since 1899-12-30) into a timestamp.
pub fn excel_serial_to_datetime(serial: f64) -> Option<NaiveDateTime> {
    if !serial.is_finite() || serial < 0.0 {
        return None;
    }
    let epoch = NaiveDate::from_ymd_opt(1899, 12, 30)?.and_hms_opt(0, 0, 0)?;
    let days = serial.trunc() as i64;
    let seconds = (serial.fract() * SECONDS_PER_DAY).round() as i64;
    epoch
        .checked_add_signed(Duration::try_days(days)?)?
        .checked_add_signed(Duration::try_seconds(seconds)?)
}

pub fn parse_iso_datetime(value: &str) -> Result<NaiveDateTime> {
    let trimmed = value.trim();
    for fmt in DATETIME_FORMATS {
        if let Ok(parsed) = NaiveDateTime::parse_from_str(trimmed, fmt) {
            return Ok(parsed);
        }
    }
    if let Ok(date) = NaiveDate::parse_from_str(trimmed, DATE_FORMAT) {
        if let Some(midnight) = date.and_hms_opt(0, 0, 0) {
            return Ok(midnight);
        }
    }
    Err(anyhow!("Failed to parse '{value}' as datetime"))
}

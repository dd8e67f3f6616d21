use chrono::NaiveDateTime;

use crate::{CellErrorKind, CellValue, serial_to_datetime};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Native content of a physical cell, as classified by a sheet backend.
///
/// `Number` keeps the backend's display rendering (if it has one) so the
/// numeric-vs-date heuristic can run during normalization.
#[derive(Debug, Clone, PartialEq)]
pub enum RawCell {
    Blank,
    Text(String),
    Number { value: f64, display: Option<String> },
    Boolean(bool),
    DateTime(NaiveDateTime),
    Error(CellErrorKind),
}

impl RawCell {
    pub fn number(value: f64) -> Self {
        RawCell::Number {
            value,
            display: None,
        }
    }

    pub fn number_with_display(value: f64, display: impl Into<String>) -> Self {
        RawCell::Number {
            value,
            display: Some(display.into()),
        }
    }
}

/// How numeric cells with a date-like display are classified.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DateDetection {
    /// A numeric cell whose display text contains `-` or `:` is read as a
    /// date/time serial.
    ///
    /// Known weak spot: a negative number, or a custom format that happens
    /// to print a colon, is misread as a date. Columns that hit this should
    /// declare their type on the profile.
    #[default]
    DisplayPunctuation,
    /// Numeric cells always stay numbers.
    Off,
}

impl DateDetection {
    pub fn looks_like_date(&self, display: &str) -> bool {
        match self {
            DateDetection::DisplayPunctuation => display.contains('-') || display.contains(':'),
            DateDetection::Off => false,
        }
    }
}

impl CellValue {
    /// Normalize a backend cell into a `CellValue`.
    pub fn from_raw(raw: RawCell, detection: DateDetection) -> CellValue {
        match raw {
            RawCell::Blank => CellValue::Empty,
            RawCell::Text(s) => CellValue::Text(s),
            RawCell::Number { value, display } => match display {
                Some(d) if detection.looks_like_date(&d) => serial_to_datetime(value)
                    .map(CellValue::DateTime)
                    .unwrap_or(CellValue::Number(value)),
                _ => CellValue::Number(value),
            },
            RawCell::Boolean(b) => CellValue::Boolean(b),
            RawCell::DateTime(dt) => CellValue::DateTime(dt),
            RawCell::Error(e) => CellValue::Error(e),
        }
    }
}

impl From<CellValue> for RawCell {
    fn from(value: CellValue) -> Self {
        match value {
            CellValue::Empty => RawCell::Blank,
            CellValue::Text(s) => RawCell::Text(s),
            CellValue::Number(n) => RawCell::number(n),
            CellValue::Boolean(b) => RawCell::Boolean(b),
            CellValue::DateTime(dt) => RawCell::DateTime(dt),
            CellValue::Error(e) => RawCell::Error(e),
        }
    }
}

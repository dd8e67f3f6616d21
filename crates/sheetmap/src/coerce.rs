//! Type-directed conversion between [`CellValue`] and Rust field types.
//!
//! Used whenever a profile supplies no explicit conversion. Specific targets
//! parse the cell's invariant text with the type's canonical parser; blank
//! cells yield the target's default.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};
use sheetmap_common::CellValue;
use uuid::Uuid;

use crate::convert::ConvertError;

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y/%m/%d %H:%M:%S",
    "%Y/%m/%d %H:%M",
];

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d"];

/// Read-direction coercion.
pub trait FromCell: Sized {
    /// Name reported in conversion errors.
    const TARGET: &'static str;

    fn from_cell(value: &CellValue) -> Result<Self, ConvertError>;
}

/// Write-direction coercion: the native value handed to the backend.
pub trait IntoCell {
    fn into_cell(self) -> CellValue;
}

impl FromCell for CellValue {
    const TARGET: &'static str = "cell value";

    fn from_cell(value: &CellValue) -> Result<Self, ConvertError> {
        Ok(value.clone())
    }
}

impl FromCell for String {
    const TARGET: &'static str = "string";

    fn from_cell(value: &CellValue) -> Result<Self, ConvertError> {
        Ok(match value {
            CellValue::Text(s) => s.clone(),
            other => other.to_text(),
        })
    }
}

macro_rules! parsed_from_cell {
    ($($ty:ty => $name:literal),* $(,)?) => {
        $(
            impl FromCell for $ty {
                const TARGET: &'static str = $name;

                fn from_cell(value: &CellValue) -> Result<Self, ConvertError> {
                    if value.is_blank() {
                        return Ok(<$ty>::default());
                    }
                    let text = value.to_text();
                    text.trim()
                        .parse::<$ty>()
                        .map_err(|_| ConvertError::new(Self::TARGET, text))
                }
            }
        )*
    };
}

parsed_from_cell! {
    i32 => "i32",
    i64 => "i64",
    u32 => "u32",
    u64 => "u64",
    f32 => "f32",
    f64 => "f64",
}

impl FromCell for bool {
    const TARGET: &'static str = "bool";

    fn from_cell(value: &CellValue) -> Result<Self, ConvertError> {
        match value {
            CellValue::Boolean(b) => Ok(*b),
            v if v.is_blank() => Ok(false),
            v => v
                .to_text()
                .trim()
                .to_ascii_lowercase()
                .parse::<bool>()
                .map_err(|_| ConvertError::for_value(Self::TARGET, v)),
        }
    }
}

impl FromCell for NaiveDateTime {
    const TARGET: &'static str = "datetime";

    fn from_cell(value: &CellValue) -> Result<Self, ConvertError> {
        match value {
            CellValue::DateTime(dt) => Ok(*dt),
            v if v.is_blank() => Ok(NaiveDateTime::default()),
            v => parse_datetime(v.to_text().trim())
                .ok_or_else(|| ConvertError::for_value(Self::TARGET, v)),
        }
    }
}

impl FromCell for NaiveDate {
    const TARGET: &'static str = "date";

    fn from_cell(value: &CellValue) -> Result<Self, ConvertError> {
        match value {
            CellValue::DateTime(dt) => Ok(dt.date()),
            v if v.is_blank() => Ok(NaiveDate::default()),
            v => parse_datetime(v.to_text().trim())
                .map(|dt| dt.date())
                .ok_or_else(|| ConvertError::for_value(Self::TARGET, v)),
        }
    }
}

impl FromCell for Uuid {
    const TARGET: &'static str = "uuid";

    fn from_cell(value: &CellValue) -> Result<Self, ConvertError> {
        if value.is_blank() {
            return Ok(Uuid::nil());
        }
        let text = value.to_text();
        Uuid::parse_str(text.trim()).map_err(|_| ConvertError::new(Self::TARGET, text))
    }
}

impl<T: FromCell> FromCell for Option<T> {
    const TARGET: &'static str = T::TARGET;

    fn from_cell(value: &CellValue) -> Result<Self, ConvertError> {
        if value.is_blank() {
            Ok(None)
        } else {
            T::from_cell(value).map(Some)
        }
    }
}

fn parse_datetime(text: &str) -> Option<NaiveDateTime> {
    DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(text, fmt).ok())
        .or_else(|| {
            DATE_FORMATS
                .iter()
                .find_map(|fmt| NaiveDate::parse_from_str(text, fmt).ok())
                .map(|d| d.and_time(NaiveTime::MIN))
        })
}

impl IntoCell for CellValue {
    fn into_cell(self) -> CellValue {
        self
    }
}

impl IntoCell for String {
    fn into_cell(self) -> CellValue {
        CellValue::Text(self)
    }
}

impl IntoCell for &str {
    fn into_cell(self) -> CellValue {
        CellValue::Text(self.to_string())
    }
}

macro_rules! numeric_into_cell {
    ($($ty:ty),*) => {
        $(
            impl IntoCell for $ty {
                fn into_cell(self) -> CellValue {
                    CellValue::Number(self as f64)
                }
            }
        )*
    };
}

numeric_into_cell!(i32, i64, u32, u64, f32, f64);

impl IntoCell for bool {
    fn into_cell(self) -> CellValue {
        CellValue::Boolean(self)
    }
}

impl IntoCell for NaiveDateTime {
    fn into_cell(self) -> CellValue {
        CellValue::DateTime(self)
    }
}

impl IntoCell for NaiveDate {
    fn into_cell(self) -> CellValue {
        CellValue::DateTime(self.and_time(NaiveTime::MIN))
    }
}

impl IntoCell for Uuid {
    fn into_cell(self) -> CellValue {
        CellValue::Text(self.hyphenated().to_string())
    }
}

impl<T: IntoCell> IntoCell for Option<T> {
    fn into_cell(self) -> CellValue {
        self.map(IntoCell::into_cell).unwrap_or(CellValue::Empty)
    }
}

/// Declared type of an untyped column.
///
/// Drives coercion for [`crate::DataTable`] columns and overrides the
/// numeric-vs-date display heuristic when set on a profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValueKind {
    Text,
    Number,
    Integer,
    Boolean,
    DateTime,
    Uuid,
}

impl ValueKind {
    pub fn name(&self) -> &'static str {
        match self {
            ValueKind::Text => "text",
            ValueKind::Number => "number",
            ValueKind::Integer => "integer",
            ValueKind::Boolean => "boolean",
            ValueKind::DateTime => "datetime",
            ValueKind::Uuid => "uuid",
        }
    }
}

/// Coerce a cell value to the declared kind, keeping it a `CellValue`.
///
/// Blank input stays `Empty`; a table cell has no type default to fall
/// back to.
pub fn coerce(value: &CellValue, kind: ValueKind) -> Result<CellValue, ConvertError> {
    if matches!(value, CellValue::Empty) {
        return Ok(CellValue::Empty);
    }
    Ok(match kind {
        ValueKind::Text => String::from_cell(value)?.into_cell(),
        ValueKind::Number => f64::from_cell(value)?.into_cell(),
        ValueKind::Integer => i64::from_cell(value)
            .map_err(|_| ConvertError::for_value(kind.name(), value))?
            .into_cell(),
        ValueKind::Boolean => bool::from_cell(value)?.into_cell(),
        ValueKind::DateTime => NaiveDateTime::from_cell(value)?.into_cell(),
        ValueKind::Uuid => Uuid::from_cell(value)?.into_cell(),
    })
}

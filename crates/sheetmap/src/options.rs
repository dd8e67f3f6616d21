use std::fmt;

use sheetmap_common::DateDetection;

use crate::convert::Locale;
use crate::error::MapError;
use crate::profile::{ColumnMapRegistry, eq_ignore_case};

pub const DEFAULT_SHEET_NAME: &str = "Sheet1";

/// Options for the read path.
///
/// Immutable for the duration of an operation; share one instance across
/// threads by reference or `Arc`.
#[derive(Clone, Debug)]
pub struct ReadOptions {
    /// 1-based row holding the column headers.
    pub header_row_number: u32,
    /// 1-based column at which header scanning starts.
    pub first_column_number: u32,
    /// Maximum number of items to produce; `None` reads every row.
    pub row_count: Option<usize>,
    /// Header names to skip, compared case-insensitively.
    pub ignore_names: Vec<String>,
    pub profiles: ColumnMapRegistry,
    pub locale: Locale,
    pub date_detection: DateDetection,
}

impl Default for ReadOptions {
    fn default() -> Self {
        Self {
            header_row_number: 1,
            first_column_number: 1,
            row_count: None,
            ignore_names: Vec::new(),
            profiles: ColumnMapRegistry::default(),
            locale: Locale::invariant(),
            date_detection: DateDetection::default(),
        }
    }
}

impl ReadOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_profiles(mut self, profiles: ColumnMapRegistry) -> Self {
        self.profiles = profiles;
        self
    }

    pub fn with_header_row(mut self, header_row_number: u32) -> Self {
        self.header_row_number = header_row_number;
        self
    }

    pub fn with_first_column(mut self, first_column_number: u32) -> Self {
        self.first_column_number = first_column_number;
        self
    }

    pub fn with_row_count(mut self, row_count: usize) -> Self {
        self.row_count = Some(row_count);
        self
    }

    pub fn ignore(mut self, name: impl Into<String>) -> Self {
        self.ignore_names.push(name.into());
        self
    }

    pub fn is_ignored(&self, name: &str) -> bool {
        self.ignore_names.iter().any(|n| eq_ignore_case(n, name))
    }

    pub fn validate(&self) -> Result<(), MapError> {
        validate_number("header_row_number", self.header_row_number)?;
        validate_number("first_column_number", self.first_column_number)
    }
}

/// Options for the write path.
#[derive(Clone, Debug)]
pub struct WriteOptions {
    /// 1-based row the header is written to; data follows directly below.
    pub header_row_number: u32,
    /// 1-based column of the first output column.
    pub first_column_number: u32,
    pub profiles: ColumnMapRegistry,
    pub locale: Locale,
    pub sheet_name: String,
    pub write_header: bool,
}

impl Default for WriteOptions {
    fn default() -> Self {
        Self {
            header_row_number: 1,
            first_column_number: 1,
            profiles: ColumnMapRegistry::default(),
            locale: Locale::invariant(),
            sheet_name: DEFAULT_SHEET_NAME.to_string(),
            write_header: true,
        }
    }
}

impl WriteOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_profiles(mut self, profiles: ColumnMapRegistry) -> Self {
        self.profiles = profiles;
        self
    }

    /// Blank names keep the default sheet name.
    pub fn with_sheet_name(mut self, name: impl Into<String>) -> Self {
        let name = name.into();
        if !name.trim().is_empty() {
            self.sheet_name = name;
        }
        self
    }

    pub fn with_first_column(mut self, first_column_number: u32) -> Self {
        self.first_column_number = first_column_number;
        self
    }

    pub fn validate(&self) -> Result<(), MapError> {
        validate_number("header_row_number", self.header_row_number)?;
        validate_number("first_column_number", self.first_column_number)
    }
}

pub(crate) fn validate_number(field: &'static str, value: u32) -> Result<(), MapError> {
    if value < 1 {
        return Err(MapError::InvalidOptions {
            field,
            value: value as i64,
        });
    }
    Ok(())
}

/// Which sheet an operation targets.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub enum SheetRef {
    /// 0-based position.
    Index(usize),
    Name(String),
    /// The first sheet of the workbook.
    #[default]
    First,
}

impl SheetRef {
    /// Blank or whitespace names resolve to the first sheet.
    pub fn name(name: impl Into<String>) -> Self {
        let name = name.into();
        if name.trim().is_empty() {
            SheetRef::First
        } else {
            SheetRef::Name(name)
        }
    }
}

impl From<usize> for SheetRef {
    fn from(index: usize) -> Self {
        SheetRef::Index(index)
    }
}

impl From<&str> for SheetRef {
    fn from(name: &str) -> Self {
        SheetRef::name(name)
    }
}

impl From<String> for SheetRef {
    fn from(name: String) -> Self {
        SheetRef::name(name)
    }
}

impl From<Option<&str>> for SheetRef {
    fn from(name: Option<&str>) -> Self {
        name.map(SheetRef::name).unwrap_or_default()
    }
}

impl fmt::Display for SheetRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SheetRef::Index(i) => write!(f, "#{i}"),
            SheetRef::Name(n) => f.write_str(n),
            SheetRef::First => f.write_str("#0"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let o = ReadOptions::default();
        assert_eq!(o.header_row_number, 1);
        assert_eq!(o.first_column_number, 1);
        assert_eq!(o.row_count, None);
        assert!(o.validate().is_ok());
        assert_eq!(WriteOptions::default().sheet_name, "Sheet1");
    }

    #[test]
    fn zero_numbers_fail_closed() {
        let err = ReadOptions::new().with_header_row(0).validate().unwrap_err();
        assert!(matches!(
            err,
            MapError::InvalidOptions {
                field: "header_row_number",
                value: 0
            }
        ));
        let err = WriteOptions::new().with_first_column(0).validate().unwrap_err();
        assert!(matches!(
            err,
            MapError::InvalidOptions {
                field: "first_column_number",
                ..
            }
        ));
    }

    #[test]
    fn ignore_set_is_case_insensitive() {
        let o = ReadOptions::new().ignore("Remark");
        assert!(o.is_ignored("REMARK"));
        assert!(!o.is_ignored("Remarks"));
    }

    #[test]
    fn blank_sheet_names_mean_first() {
        assert_eq!(SheetRef::from("  "), SheetRef::First);
        assert_eq!(SheetRef::from(None), SheetRef::First);
        assert_eq!(SheetRef::from("Data"), SheetRef::Name("Data".into()));
        assert_eq!(SheetRef::from(2usize).to_string(), "#2");
        assert_eq!(WriteOptions::new().with_sheet_name(" ").sheet_name, "Sheet1");
    }
}

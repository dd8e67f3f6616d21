//! Column map profiles and the registry that holds them.

use std::fmt;
use std::sync::Arc;

use sheetmap_common::CellValue;

use crate::coerce::ValueKind;
use crate::convert::{ConvertError, ConvertFn, Locale, ValueConverter, convert_fn};
use crate::error::MapError;

/// Association between a logical field and a spreadsheet column.
#[derive(Clone)]
pub struct ColumnMapProfile {
    name: String,
    column: String,
    index: Option<u32>,
    read: Option<ConvertFn>,
    write: Option<ConvertFn>,
    converter: Option<Arc<dyn ValueConverter>>,
    declared: Option<ValueKind>,
}

impl ColumnMapProfile {
    /// Map logical field `name` to the column headed `column`.
    pub fn new(name: impl Into<String>, column: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            column: column.into(),
            index: None,
            read: None,
            write: None,
            converter: None,
            declared: None,
        }
    }

    /// Source name equals target name, no conversion.
    pub fn pass_through(name: impl Into<String>) -> Self {
        let name = name.into();
        Self::new(name.clone(), name)
    }

    /// Bind to a fixed 1-based column number instead of matching header text.
    pub fn at_index(mut self, column_number: u32) -> Self {
        self.index = Some(column_number);
        self
    }

    pub fn with_read<F>(mut self, f: F) -> Self
    where
        F: Fn(&CellValue, &Locale) -> Result<CellValue, ConvertError> + Send + Sync + 'static,
    {
        self.read = Some(convert_fn(f));
        self
    }

    pub fn with_write<F>(mut self, f: F) -> Self
    where
        F: Fn(&CellValue, &Locale) -> Result<CellValue, ConvertError> + Send + Sync + 'static,
    {
        self.write = Some(convert_fn(f));
        self
    }

    pub fn with_converter(mut self, converter: Arc<dyn ValueConverter>) -> Self {
        self.converter = Some(converter);
        self
    }

    pub fn with_declared(mut self, kind: ValueKind) -> Self {
        self.declared = Some(kind);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn column(&self) -> &str {
        &self.column
    }

    pub fn index(&self) -> Option<u32> {
        self.index
    }

    pub fn declared(&self) -> Option<ValueKind> {
        self.declared
    }

    pub fn has_conversion(&self) -> bool {
        self.read.is_some() || self.write.is_some() || self.converter.is_some()
    }

    /// Apply the read-direction hook: explicit function, else named converter.
    ///
    /// Returns `None` when the profile has neither.
    pub fn convert_read(
        &self,
        value: &CellValue,
        locale: &Locale,
    ) -> Option<Result<CellValue, ConvertError>> {
        if let Some(f) = &self.read {
            return Some(f(value, locale));
        }
        self.converter.as_ref().map(|c| c.convert(value, locale))
    }

    /// Apply the write-direction hook: explicit function, else named converter.
    pub fn convert_write(
        &self,
        value: &CellValue,
        locale: &Locale,
    ) -> Option<Result<CellValue, ConvertError>> {
        if let Some(f) = &self.write {
            return Some(f(value, locale));
        }
        self.converter
            .as_ref()
            .map(|c| c.convert_back(value, locale))
    }
}

impl fmt::Debug for ColumnMapProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ColumnMapProfile")
            .field("name", &self.name)
            .field("column", &self.column)
            .field("index", &self.index)
            .field("read", &self.read.is_some())
            .field("write", &self.write.is_some())
            .field("converter", &self.converter.is_some())
            .field("declared", &self.declared)
            .finish()
    }
}

/// Ordered set of column map profiles.
///
/// Column names are unique case-insensitively and explicit indices are
/// unique; a second registration of either fails with
/// [`MapError::DuplicateProfile`]. Registration order is the write-path
/// column order.
#[derive(Clone, Debug, Default)]
pub struct ColumnMapRegistry {
    profiles: Vec<ColumnMapProfile>,
}

impl ColumnMapRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, profile: ColumnMapProfile) -> Result<&mut Self, MapError> {
        if self.resolve(&profile.column).is_some() {
            return Err(MapError::DuplicateProfile(profile.column));
        }
        if let Some(index) = profile.index {
            if self.resolve_index(index).is_some() {
                return Err(MapError::DuplicateProfile(format!("#{index}")));
            }
        }
        self.profiles.push(profile);
        Ok(self)
    }

    /// Builder-style [`register`](Self::register).
    pub fn with(mut self, profile: ColumnMapProfile) -> Result<Self, MapError> {
        self.register(profile)?;
        Ok(self)
    }

    /// Case-insensitive exact match on the column name.
    pub fn resolve(&self, column: &str) -> Option<&ColumnMapProfile> {
        self.profiles
            .iter()
            .find(|p| eq_ignore_case(&p.column, column))
    }

    /// Profile bound to a 1-based column number.
    pub fn resolve_index(&self, column_number: u32) -> Option<&ColumnMapProfile> {
        self.profiles
            .iter()
            .find(|p| p.index == Some(column_number))
    }

    /// All profiles in registration order.
    pub fn profiles(&self) -> &[ColumnMapProfile] {
        &self.profiles
    }

    pub fn len(&self) -> usize {
        self.profiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.profiles.is_empty()
    }
}

/// Case-insensitive name comparison used for headers, sheets and fields.
pub fn eq_ignore_case(a: &str, b: &str) -> bool {
    a.eq_ignore_ascii_case(b) || a.to_lowercase() == b.to_lowercase()
}

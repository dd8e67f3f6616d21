//! Explicit conversion hooks attached to column map profiles.

use std::fmt;
use std::sync::Arc;

use sheetmap_common::CellValue;
use thiserror::Error;

/// Culture handed to conversion hooks.
///
/// The engine itself formats and parses locale-invariantly; the locale only
/// travels to caller-supplied conversions so they can render values the way
/// their users expect.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Locale {
    tag: String,
}

impl Locale {
    pub fn new(tag: impl Into<String>) -> Self {
        Self { tag: tag.into() }
    }

    pub fn invariant() -> Self {
        Self { tag: String::new() }
    }

    /// BCP-47 style tag (`zh-CN`, `en-US`); empty for the invariant locale.
    pub fn tag(&self) -> &str {
        &self.tag
    }

    pub fn is_invariant(&self) -> bool {
        self.tag.is_empty()
    }
}

impl Default for Locale {
    fn default() -> Self {
        Self::invariant()
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.tag.is_empty() {
            f.write_str("invariant")
        } else {
            f.write_str(&self.tag)
        }
    }
}

/// A value could not be turned into the requested type.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("cannot convert `{text}` to {target}")]
pub struct ConvertError {
    pub target: String,
    pub text: String,
}

impl ConvertError {
    pub fn new(target: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            target: target.into(),
            text: text.into(),
        }
    }

    pub(crate) fn for_value(target: impl Into<String>, value: &CellValue) -> Self {
        Self::new(target, value.to_text())
    }
}

/// Function form of a conversion, in either direction.
pub type ConvertFn =
    Arc<dyn Fn(&CellValue, &Locale) -> Result<CellValue, ConvertError> + Send + Sync>;

pub fn convert_fn<F>(f: F) -> ConvertFn
where
    F: Fn(&CellValue, &Locale) -> Result<CellValue, ConvertError> + Send + Sync + 'static,
{
    Arc::new(f)
}

/// Named, reusable two-way conversion.
pub trait ValueConverter: Send + Sync {
    /// Cell → field direction.
    fn convert(&self, value: &CellValue, locale: &Locale) -> Result<CellValue, ConvertError>;

    /// Field → cell direction. Defaults to passing the value through.
    fn convert_back(&self, value: &CellValue, _locale: &Locale) -> Result<CellValue, ConvertError> {
        Ok(value.clone())
    }
}

/// Two-way lookup converter: a fixed table of cell text ↔ field value pairs.
///
/// Unmatched values fall through unchanged in both directions.
#[derive(Debug, Clone, Default)]
pub struct LookupConverter {
    pairs: Vec<(String, CellValue)>,
}

impl LookupConverter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Map cell text `cell` to field value `field`.
    pub fn pair(mut self, cell: impl Into<String>, field: impl Into<CellValue>) -> Self {
        self.pairs.push((cell.into(), field.into()));
        self
    }
}

impl ValueConverter for LookupConverter {
    fn convert(&self, value: &CellValue, _locale: &Locale) -> Result<CellValue, ConvertError> {
        let text = value.to_text();
        Ok(self
            .pairs
            .iter()
            .find(|(cell, _)| *cell == text)
            .map(|(_, field)| field.clone())
            .unwrap_or_else(|| value.clone()))
    }

    fn convert_back(&self, value: &CellValue, _locale: &Locale) -> Result<CellValue, ConvertError> {
        let text = value.to_text();
        Ok(self
            .pairs
            .iter()
            .find(|(_, field)| field.to_text() == text)
            .map(|(cell, _)| CellValue::Text(cell.clone()))
            .unwrap_or_else(|| value.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gender() -> LookupConverter {
        LookupConverter::new().pair("男", 1.0).pair("女", 2.0)
    }

    #[test]
    fn lookup_converts_both_ways() {
        let loc = Locale::new("zh-CN");
        let c = gender();
        assert_eq!(
            c.convert(&CellValue::from("女"), &loc).unwrap(),
            CellValue::Number(2.0)
        );
        assert_eq!(
            c.convert_back(&CellValue::Number(1.0), &loc).unwrap(),
            CellValue::from("男")
        );
    }

    #[test]
    fn lookup_passes_unknown_values_through() {
        let c = gender();
        let v = CellValue::from("unknown");
        assert_eq!(c.convert(&v, &Locale::invariant()).unwrap(), v);
    }

    #[test]
    fn locale_display() {
        assert_eq!(Locale::invariant().to_string(), "invariant");
        assert_eq!(Locale::new("en-US").to_string(), "en-US");
    }
}

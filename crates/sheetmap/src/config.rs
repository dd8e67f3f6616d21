//! Declarative option sets loaded from YAML or JSON.
//!
//! Conversion hooks cannot be serialized, so profiles name their converter
//! and the name is looked up in a [`ConverterRegistry`] when the config is
//! turned into [`ReadOptions`] or [`WriteOptions`].

use std::fmt;
use std::sync::Arc;

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use sheetmap_common::DateDetection;

use crate::coerce::ValueKind;
use crate::convert::{Locale, ValueConverter};
use crate::error::MapError;
use crate::options::{DEFAULT_SHEET_NAME, ReadOptions, WriteOptions};
use crate::profile::{ColumnMapProfile, ColumnMapRegistry};

/// Named converters available to configuration files.
#[derive(Clone, Default)]
pub struct ConverterRegistry {
    converters: FxHashMap<String, Arc<dyn ValueConverter>>,
}

impl ConverterRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `converter` under `name`, replacing any previous entry.
    pub fn register(&mut self, name: impl Into<String>, converter: Arc<dyn ValueConverter>) -> &mut Self {
        self.converters.insert(name.into(), converter);
        self
    }

    pub fn with(mut self, name: impl Into<String>, converter: Arc<dyn ValueConverter>) -> Self {
        self.register(name, converter);
        self
    }

    pub fn get(&self, name: &str) -> Option<&Arc<dyn ValueConverter>> {
        self.converters.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.converters.contains_key(name)
    }
}

impl fmt::Debug for ConverterRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<_> = self.converters.keys().collect();
        names.sort();
        f.debug_struct("ConverterRegistry")
            .field("converters", &names)
            .finish()
    }
}

/// One column map profile as written in a config file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProfileConfig {
    /// Logical field name.
    pub name: String,
    /// Column header text; defaults to `name`.
    #[serde(default)]
    pub column: Option<String>,
    /// 1-based column number.
    #[serde(default)]
    pub index: Option<u32>,
    /// Name of a converter in the [`ConverterRegistry`].
    #[serde(default)]
    pub converter: Option<String>,
    #[serde(default)]
    pub declared_type: Option<ValueKind>,
}

impl ProfileConfig {
    fn to_profile(&self, converters: &ConverterRegistry) -> Result<ColumnMapProfile, MapError> {
        let column = self.column.clone().unwrap_or_else(|| self.name.clone());
        let mut profile = ColumnMapProfile::new(self.name.clone(), column);
        if let Some(index) = self.index {
            profile = profile.at_index(index);
        }
        if let Some(kind) = self.declared_type {
            profile = profile.with_declared(kind);
        }
        if let Some(name) = &self.converter {
            let converter = converters.get(name).ok_or_else(|| {
                MapError::Config(format!(
                    "profile '{}' references unknown converter '{name}'",
                    self.name
                ))
            })?;
            profile = profile.with_converter(Arc::clone(converter));
        }
        Ok(profile)
    }
}

fn one() -> u32 {
    1
}

fn default_sheet_name() -> String {
    DEFAULT_SHEET_NAME.to_string()
}

fn yes() -> bool {
    true
}

/// Serializable read/write option set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OptionsConfig {
    #[serde(default = "one")]
    pub header_row_number: u32,
    #[serde(default = "one")]
    pub first_column_number: u32,
    /// Maximum items to read; `0` means unlimited.
    #[serde(default)]
    pub row_count: usize,
    #[serde(default)]
    pub ignore_names: Vec<String>,
    #[serde(default)]
    pub profiles: Vec<ProfileConfig>,
    #[serde(default)]
    pub locale: Option<String>,
    #[serde(default)]
    pub date_detection: DateDetection,
    #[serde(default = "default_sheet_name")]
    pub sheet_name: String,
    #[serde(default = "yes")]
    pub write_header: bool,
}

impl Default for OptionsConfig {
    fn default() -> Self {
        Self {
            header_row_number: 1,
            first_column_number: 1,
            row_count: 0,
            ignore_names: Vec::new(),
            profiles: Vec::new(),
            locale: None,
            date_detection: DateDetection::default(),
            sheet_name: default_sheet_name(),
            write_header: true,
        }
    }
}

impl OptionsConfig {
    pub fn from_yaml_str(yaml: &str) -> Result<Self, MapError> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    pub fn from_json_str(json: &str) -> Result<Self, MapError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_yaml(&self) -> Result<String, MapError> {
        Ok(serde_yaml::to_string(self)?)
    }

    /// Build the profile registry, resolving converter names.
    pub fn registry(&self, converters: &ConverterRegistry) -> Result<ColumnMapRegistry, MapError> {
        let mut registry = ColumnMapRegistry::new();
        for profile in &self.profiles {
            registry.register(profile.to_profile(converters)?)?;
        }
        Ok(registry)
    }

    fn locale(&self) -> Locale {
        self.locale.as_deref().map(Locale::new).unwrap_or_default()
    }

    pub fn to_read_options(&self, converters: &ConverterRegistry) -> Result<ReadOptions, MapError> {
        let options = ReadOptions {
            header_row_number: self.header_row_number,
            first_column_number: self.first_column_number,
            row_count: (self.row_count > 0).then_some(self.row_count),
            ignore_names: self.ignore_names.clone(),
            profiles: self.registry(converters)?,
            locale: self.locale(),
            date_detection: self.date_detection,
        };
        options.validate()?;
        Ok(options)
    }

    pub fn to_write_options(&self, converters: &ConverterRegistry) -> Result<WriteOptions, MapError> {
        let options = WriteOptions {
            header_row_number: self.header_row_number,
            first_column_number: self.first_column_number,
            profiles: self.registry(converters)?,
            locale: self.locale(),
            sheet_name: default_sheet_name(),
            write_header: self.write_header,
        }
        .with_sheet_name(self.sheet_name.clone());
        options.validate()?;
        Ok(options)
    }
}

//! Write path: items → addressed cell writes.

use std::borrow::{Borrow, Cow};

use rustc_hash::FxHashSet;
use sheetmap_common::CellValue;

use crate::backend::{CellRole, CellSink, CellWrite};
use crate::cancel::CancellationToken;
use crate::coerce::IntoCell;
use crate::convert::{ConvertError, Locale};
use crate::error::MapError;
use crate::item::ItemSource;
use crate::options::{WriteOptions, validate_number};
use crate::profile::ColumnMapProfile;

/// Write-direction conversion for the single-column path.
pub type CellConvert<'f> =
    &'f (dyn Fn(&CellValue, &Locale) -> Result<CellValue, ConvertError> + Sync);

/// One output column: 0-based position plus the profile that fills it.
#[derive(Debug, Clone)]
pub struct LayoutColumn<'a> {
    pub position: u32,
    pub profile: Cow<'a, ColumnMapProfile>,
}

/// Emits a header row and one body row per item into a [`CellSink`].
pub struct RowSerializer<'o> {
    options: &'o WriteOptions,
    cancel: Option<&'o CancellationToken>,
}

impl<'o> RowSerializer<'o> {
    pub fn new(options: &'o WriteOptions) -> Self {
        Self {
            options,
            cancel: None,
        }
    }

    pub fn with_cancellation(mut self, token: &'o CancellationToken) -> Self {
        self.cancel = Some(token);
        self
    }

    /// Output columns in registration order.
    ///
    /// A profile with an explicit index writes there; the others take the
    /// running cursor, which resumes after the last used column and skips
    /// every explicitly indexed one. An empty registry falls back to the
    /// source's field names.
    pub fn layout<T, S>(&self, source: &S) -> Vec<LayoutColumn<'o>>
    where
        S: ItemSource<T> + ?Sized,
    {
        let profiles: Vec<Cow<'o, ColumnMapProfile>> = if self.options.profiles.is_empty() {
            source
                .field_names()
                .into_iter()
                .map(|name| Cow::Owned(ColumnMapProfile::pass_through(name)))
                .collect()
        } else {
            self.options.profiles.profiles().iter().map(Cow::Borrowed).collect()
        };

        let reserved: FxHashSet<u32> = profiles
            .iter()
            .filter_map(|p| p.index().map(|n| n.saturating_sub(1)))
            .collect();

        let mut cursor = self.options.first_column_number.saturating_sub(1);
        profiles
            .into_iter()
            .map(|profile| {
                let position = match profile.index() {
                    Some(n) => n.saturating_sub(1),
                    None => {
                        while reserved.contains(&cursor) {
                            cursor += 1;
                        }
                        cursor
                    }
                };
                cursor = cursor.max(position + 1);
                LayoutColumn { position, profile }
            })
            .collect()
    }

    /// Serialize `items` and return the number of body rows written.
    pub fn serialize<T, S, I, K>(&self, items: I, source: &S, sink: &mut K) -> Result<usize, MapError>
    where
        S: ItemSource<T> + ?Sized,
        I: IntoIterator,
        I::Item: Borrow<T>,
        K: CellSink + ?Sized,
    {
        self.serialize_with(|| items, source, sink)
    }

    /// Like [`serialize`](Self::serialize), but the items are obtained from
    /// `supplier` once options are validated and before the header is emitted.
    pub fn serialize_with<T, S, F, I, K>(
        &self,
        supplier: F,
        source: &S,
        sink: &mut K,
    ) -> Result<usize, MapError>
    where
        S: ItemSource<T> + ?Sized,
        F: FnOnce() -> I,
        I: IntoIterator,
        I::Item: Borrow<T>,
        K: CellSink + ?Sized,
    {
        self.options.validate()?;
        let items = supplier();
        let layout = self.layout(source);

        #[cfg(feature = "tracing")]
        let _span = tracing::info_span!(
            "sheetmap_write",
            sheet = %self.options.sheet_name,
            columns = layout.len()
        )
        .entered();

        let header_row = self.options.header_row_number - 1;
        if self.options.write_header {
            for column in &layout {
                sink.put(CellWrite {
                    row: header_row,
                    column: column.position,
                    value: CellValue::Text(column.profile.column().to_string()),
                    role: CellRole::Header,
                })?;
            }
        }

        let mut row = if self.options.write_header {
            header_row + 1
        } else {
            header_row
        };
        let mut written = 0;
        for item in items {
            CancellationToken::check(self.cancel)?;
            let item = item.borrow();
            for column in &layout {
                let profile = column.profile.as_ref();
                let native = source.get(item, profile.name()).unwrap_or_default();
                let value = match profile.convert_write(&native, &self.options.locale) {
                    Some(result) => result.map_err(|e| MapError::Conversion {
                        row: row + 1,
                        column: column.position + 1,
                        field: profile.name().to_string(),
                        text: e.text,
                        target: e.target,
                    })?,
                    None => native,
                };
                sink.put(CellWrite {
                    row,
                    column: column.position,
                    value,
                    role: CellRole::Body,
                })?;
            }
            row += 1;
            written += 1;
        }

        #[cfg(feature = "tracing")]
        tracing::debug!(rows = written, "serialized rows");

        Ok(written)
    }

    /// Write `values` down one column starting at a fixed 1-based origin.
    /// No header is emitted.
    pub fn serialize_column<I, K>(
        &self,
        values: I,
        first_row_number: u32,
        column_number: u32,
        convert: Option<CellConvert<'_>>,
        sink: &mut K,
    ) -> Result<usize, MapError>
    where
        I: IntoIterator,
        I::Item: IntoCell,
        K: CellSink + ?Sized,
    {
        self.serialize_column_with(|| values, first_row_number, column_number, convert, sink)
    }

    /// Like [`serialize_column`](Self::serialize_column), but the values are
    /// obtained from `supplier` once the origin is validated.
    pub fn serialize_column_with<F, I, K>(
        &self,
        supplier: F,
        first_row_number: u32,
        column_number: u32,
        convert: Option<CellConvert<'_>>,
        sink: &mut K,
    ) -> Result<usize, MapError>
    where
        F: FnOnce() -> I,
        I: IntoIterator,
        I::Item: IntoCell,
        K: CellSink + ?Sized,
    {
        validate_number("first_row_number", first_row_number)?;
        validate_number("column_number", column_number)?;
        let values = supplier();
        let column = column_number - 1;

        let mut row = first_row_number - 1;
        let mut written = 0;
        for value in values {
            CancellationToken::check(self.cancel)?;
            let native = value.into_cell();
            let value = match convert {
                Some(f) => f(&native, &self.options.locale).map_err(|e| MapError::Conversion {
                    row: row + 1,
                    column: column_number,
                    field: String::new(),
                    text: e.text,
                    target: e.target,
                })?,
                None => native,
            };
            sink.put(CellWrite {
                row,
                column,
                value,
                role: CellRole::Body,
            })?;
            row += 1;
            written += 1;
        }
        Ok(written)
    }
}

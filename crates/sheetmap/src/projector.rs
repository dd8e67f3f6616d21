//! Read path: sheet rows → items.

use sheetmap_common::{CellValue, RawCell, serial_to_datetime};

use crate::backend::{Workbook, Worksheet, resolve_sheet};
use crate::cancel::CancellationToken;
use crate::coerce::{FromCell, ValueKind, coerce};
use crate::convert::{ConvertError, Locale};
use crate::error::MapError;
#[cfg(feature = "tracing")]
use crate::error::col_to_a1;
use crate::header::{HeaderMap, ResolvedColumn, resolve_header};
use crate::item::{DataTable, ItemBuilder};
use crate::options::{ReadOptions, SheetRef, validate_number};
use crate::profile::ColumnMapProfile;

/// Conversion applied by the single-column fast path.
pub type ColumnConvert<'f, T> = &'f (dyn Fn(&CellValue, &Locale) -> Result<T, ConvertError> + Sync);

/// Drives row iteration for one read operation.
pub struct RowProjector<'o> {
    options: &'o ReadOptions,
    cancel: Option<&'o CancellationToken>,
}

impl<'o> RowProjector<'o> {
    pub fn new(options: &'o ReadOptions) -> Self {
        Self {
            options,
            cancel: None,
        }
    }

    pub fn with_cancellation(mut self, token: &'o CancellationToken) -> Self {
        self.cancel = Some(token);
        self
    }

    /// Resolve `sheet` and project its data rows through `builder`.
    pub fn project<W, B>(&self, workbook: &W, sheet: &SheetRef, builder: &B) -> Result<Vec<B::Item>, MapError>
    where
        W: Workbook + ?Sized,
        B: ItemBuilder,
    {
        self.options.validate()?;
        let ws = resolve_sheet(workbook, sheet)?;
        let header = resolve_header(ws, self.options);
        self.project_rows(ws, &header, builder)
    }

    /// Read `sheet` into a table whose columns are the mapped field names.
    pub fn project_table<W>(&self, workbook: &W, sheet: &SheetRef) -> Result<DataTable, MapError>
    where
        W: Workbook + ?Sized,
    {
        self.options.validate()?;
        let ws = resolve_sheet(workbook, sheet)?;
        let header = resolve_header(ws, self.options);
        let mut table = DataTable::new(header.field_names());
        let rows = self.project_rows(ws, &header, &table)?;
        table.set_rows(rows);
        Ok(table)
    }

    /// Project data rows of an already-resolved sheet.
    pub fn project_rows<B: ItemBuilder>(
        &self,
        sheet: &dyn Worksheet,
        header: &HeaderMap<'_>,
        builder: &B,
    ) -> Result<Vec<B::Item>, MapError> {
        let mut items = Vec::new();
        if header.is_empty() {
            return Ok(items);
        }
        let Some(last_row) = sheet.last_row() else {
            return Ok(items);
        };

        #[cfg(feature = "tracing")]
        let _span = tracing::info_span!(
            "sheetmap_read",
            sheet = sheet.name(),
            columns = header.len()
        )
        .entered();

        // header_row_number is 1-based, so it is also the 0-based first data row
        let first_data_row = self.options.header_row_number;
        for row in first_data_row..=last_row {
            if self.options.row_count.is_some_and(|limit| items.len() >= limit) {
                break;
            }
            CancellationToken::check(self.cancel)?;
            if !sheet.row_exists(row) {
                continue;
            }

            let mut item = builder.new_item();
            for column in header.columns() {
                let value = self.read_value(sheet, row, column)?;
                builder
                    .assign(&mut item, column.profile.name(), value)
                    .map_err(|e| conversion_error(row, column.position, column.profile.name(), e))?;
            }

            #[cfg(feature = "tracing")]
            tracing::trace!(row = row + 1, "projected row");

            items.push(item);
        }

        Ok(items)
    }

    fn read_value(
        &self,
        sheet: &dyn Worksheet,
        row: u32,
        column: &ResolvedColumn<'_>,
    ) -> Result<CellValue, MapError> {
        let profile = column.profile.as_ref();
        let raw = sheet.cell(row, column.position).unwrap_or(RawCell::Blank);
        let value = normalize(raw, profile, self.options);

        let converted = match profile.convert_read(&value, &self.options.locale) {
            Some(result) => result,
            None => match profile.declared() {
                Some(kind) => coerce(&value, kind),
                None => Ok(value),
            },
        };
        converted.map_err(|e| conversion_error(row, column.position, profile.name(), e))
    }

    /// Single-column fast path: no header discovery, numbers are data-relative.
    ///
    /// Reads column `column_number` from `first_row_number` to the sheet's
    /// last row inclusive (both 1-based). Absent rows are skipped.
    pub fn read_column<W, T>(
        &self,
        workbook: &W,
        sheet: &SheetRef,
        first_row_number: u32,
        column_number: u32,
        convert: Option<ColumnConvert<'_, T>>,
    ) -> Result<Vec<T>, MapError>
    where
        W: Workbook + ?Sized,
        T: FromCell,
    {
        validate_number("first_row_number", first_row_number)?;
        validate_number("column_number", column_number)?;
        let ws = resolve_sheet(workbook, sheet)?;

        let mut values = Vec::new();
        let Some(last_row) = ws.last_row() else {
            return Ok(values);
        };
        let col = column_number - 1;
        for row in (first_row_number - 1)..=last_row {
            if self.options.row_count.is_some_and(|limit| values.len() >= limit) {
                break;
            }
            CancellationToken::check(self.cancel)?;
            if !ws.row_exists(row) {
                continue;
            }
            let raw = ws.cell(row, col).unwrap_or(RawCell::Blank);
            let value = CellValue::from_raw(raw, self.options.date_detection);
            let converted = match convert {
                Some(f) => f(&value, &self.options.locale),
                None => T::from_cell(&value),
            };
            values.push(converted.map_err(|e| conversion_error(row, col, T::TARGET, e))?);
        }
        Ok(values)
    }
}

/// Normalize a raw cell, letting a declared numeric kind override the
/// date display heuristic.
fn normalize(raw: RawCell, profile: &ColumnMapProfile, options: &ReadOptions) -> CellValue {
    match (profile.declared(), raw) {
        (Some(ValueKind::Number | ValueKind::Integer), RawCell::Number { value, .. }) => {
            CellValue::Number(value)
        }
        (Some(ValueKind::DateTime), RawCell::Number { value, .. }) => serial_to_datetime(value)
            .map(CellValue::DateTime)
            .unwrap_or(CellValue::Number(value)),
        (_, raw) => CellValue::from_raw(raw, options.date_detection),
    }
}

fn conversion_error(row: u32, col: u32, field: &str, e: ConvertError) -> MapError {
    #[cfg(feature = "tracing")]
    tracing::debug!(
        cell = %format!("{}{}", col_to_a1(col + 1), row + 1),
        field,
        target = %e.target,
        "cell conversion failed"
    );
    MapError::Conversion {
        row: row + 1,
        column: col + 1,
        field: field.to_string(),
        text: e.text,
        target: e.target,
    }
}

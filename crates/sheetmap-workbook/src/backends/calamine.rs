#![cfg(feature = "calamine")]

use std::io::Cursor;

use calamine::{Data, Range, Reader, Xlsx, open_workbook_from_rs};
use chrono::NaiveDateTime;
use sheetmap::{OpenBytes, Workbook, Worksheet};
use sheetmap_common::{CellErrorKind, RawCell, serial_to_datetime};

use crate::error::BackendError;
use crate::grid::{GridBook, SheetGrid};

/// Read-only xlsx backend over `calamine`.
///
/// calamine reports a dense range, so a row whose cells are all empty is
/// indistinguishable from a missing row and is treated as absent.
#[derive(Debug, Clone, Default)]
pub struct CalamineAdapter {
    grids: GridBook,
}

impl CalamineAdapter {
    pub fn grids(&self) -> &GridBook {
        &self.grids
    }

    fn convert_value(data: &Data) -> Option<RawCell> {
        Some(match data {
            Data::Empty => return None,
            Data::String(s) => RawCell::Text(s.clone()),
            Data::Float(f) => RawCell::number(*f),
            Data::Int(i) => RawCell::number(*i as f64),
            Data::Bool(b) => RawCell::Boolean(*b),
            Data::Error(e) => RawCell::Error(match e {
                calamine::CellErrorType::Div0 => CellErrorKind::Div,
                calamine::CellErrorType::NA => CellErrorKind::Na,
                calamine::CellErrorType::Name => CellErrorKind::Name,
                calamine::CellErrorType::Null => CellErrorKind::Null,
                calamine::CellErrorType::Num => CellErrorKind::Num,
                calamine::CellErrorType::Ref => CellErrorKind::Ref,
                calamine::CellErrorType::Value => CellErrorKind::Value,
                _ => CellErrorKind::GettingData,
            }),
            Data::DateTime(dt) => match serial_to_datetime(dt.as_f64()) {
                Some(value) => RawCell::DateTime(value),
                None => RawCell::number(dt.as_f64()),
            },
            Data::DateTimeIso(s) => NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f")
                .map(RawCell::DateTime)
                .unwrap_or_else(|_| RawCell::Text(s.clone())),
            Data::DurationIso(s) => RawCell::Text(s.clone()),
        })
    }

    fn range_to_grid(name: &str, range: &Range<Data>) -> SheetGrid {
        let mut grid = SheetGrid::new(name);
        let (start_row, start_col) = range.start().unwrap_or_default();
        for (ri, row) in range.rows().enumerate() {
            let r = start_row + ri as u32;
            for (ci, value) in row.iter().enumerate() {
                if let Some(cell) = Self::convert_value(value) {
                    grid.set(r, start_col + ci as u32, cell);
                }
            }
        }
        grid
    }
}

impl OpenBytes for CalamineAdapter {
    type Error = BackendError;

    const NAME: &'static str = "calamine";

    fn open_bytes(data: &[u8]) -> Result<Self, Self::Error> {
        let mut workbook: Xlsx<_> = open_workbook_from_rs(Cursor::new(data))
            .map_err(|e| BackendError::Calamine(calamine::Error::from(e)))?;
        let mut grids = GridBook::new();
        for name in workbook.sheet_names() {
            let range = workbook
                .worksheet_range(&name)
                .map_err(|e| BackendError::Calamine(calamine::Error::from(e)))?;
            grids.push(Self::range_to_grid(&name, &range));
        }

        #[cfg(feature = "tracing")]
        tracing::debug!(sheets = grids.sheet_count(), "calamine workbook decoded");

        Ok(Self { grids })
    }
}

impl Workbook for CalamineAdapter {
    fn sheet_count(&self) -> usize {
        self.grids.sheet_count()
    }

    fn sheet_name(&self, index: usize) -> Option<String> {
        self.grids.sheet_name(index)
    }

    fn sheet(&self, index: usize) -> Option<&dyn Worksheet> {
        self.grids.sheet(index)
    }
}

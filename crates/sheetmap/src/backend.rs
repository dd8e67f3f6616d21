//! Capability contract required from a sheet backend.
//!
//! All row and column indices at this seam are 0-based. The engine never
//! opens containers or touches styles itself; it only walks rows and cells
//! through these traits.

use std::io::Write;

use sheetmap_common::{CellValue, RawCell};

use crate::error::MapError;
use crate::options::SheetRef;
use crate::profile::eq_ignore_case;

/// A decoded document that can be opened from bytes.
pub trait OpenBytes: Sized {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Short backend name used in error messages.
    const NAME: &'static str;

    fn open_bytes(data: &[u8]) -> Result<Self, Self::Error>;
}

/// Read access to a workbook.
pub trait Workbook {
    fn sheet_count(&self) -> usize;

    fn sheet_name(&self, index: usize) -> Option<String>;

    /// `None` for an index below `sheet_count` is a backend inconsistency.
    fn sheet(&self, index: usize) -> Option<&dyn Worksheet>;
}

/// Read access to one sheet.
pub trait Worksheet {
    fn name(&self) -> &str;

    /// Index of the last populated row, or `None` for an empty sheet.
    fn last_row(&self) -> Option<u32>;

    /// Whether the row is physically present, even if all its cells are blank.
    fn row_exists(&self, row: u32) -> bool;

    /// Index of the last populated column in `row`.
    fn last_column(&self, row: u32) -> Option<u32>;

    /// `None` is a missing cell; `Some(RawCell::Blank)` is a present, blank one.
    fn cell(&self, row: u32, col: u32) -> Option<RawCell>;
}

/// Mapping-time style role of a written cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CellRole {
    Header,
    Body,
}

/// One addressed cell write produced by the serializer.
#[derive(Debug, Clone, PartialEq)]
pub struct CellWrite {
    pub row: u32,
    pub column: u32,
    pub value: CellValue,
    pub role: CellRole,
}

/// Write access to a workbook under construction.
pub trait WorkbookSink {
    type Error: std::error::Error + Send + Sync + 'static;

    const NAME: &'static str;

    /// Create (or reuse) a sheet and return its index.
    fn add_sheet(&mut self, name: &str) -> Result<usize, Self::Error>;

    fn write_cell(&mut self, sheet: usize, cell: &CellWrite) -> Result<(), Self::Error>;

    /// Finalize the document into `writer`.
    fn save_to_writer(&mut self, writer: &mut dyn Write) -> Result<(), Self::Error>;

    fn save_to_bytes(&mut self) -> Result<Vec<u8>, Self::Error> {
        let mut buf = Vec::new();
        self.save_to_writer(&mut buf)?;
        Ok(buf)
    }
}

/// Receiver of serializer output.
pub trait CellSink {
    fn put(&mut self, cell: CellWrite) -> Result<(), MapError>;
}

impl CellSink for Vec<CellWrite> {
    fn put(&mut self, cell: CellWrite) -> Result<(), MapError> {
        self.push(cell);
        Ok(())
    }
}

/// Routes serializer output into one sheet of a backend.
pub struct SheetCursor<'a, S: WorkbookSink> {
    sink: &'a mut S,
    sheet: usize,
}

impl<'a, S: WorkbookSink> SheetCursor<'a, S> {
    /// Create (or reuse) sheet `name` and target it.
    pub fn open(sink: &'a mut S, name: &str) -> Result<Self, MapError> {
        let sheet = sink
            .add_sheet(name)
            .map_err(|e| MapError::from_backend(S::NAME, e))?;
        Ok(Self { sink, sheet })
    }

    pub fn sheet(&self) -> usize {
        self.sheet
    }
}

impl<S: WorkbookSink> CellSink for SheetCursor<'_, S> {
    fn put(&mut self, cell: CellWrite) -> Result<(), MapError> {
        self.sink
            .write_cell(self.sheet, &cell)
            .map_err(|e| MapError::from_backend(S::NAME, e))
    }
}

/// Resolve a sheet reference once per operation.
pub fn resolve_sheet<'w, W: Workbook + ?Sized>(
    workbook: &'w W,
    sheet: &SheetRef,
) -> Result<&'w dyn Worksheet, MapError> {
    let count = workbook.sheet_count();
    let index = match sheet {
        SheetRef::Index(i) if *i < count => *i,
        SheetRef::Index(_) => return Err(MapError::SheetNotFound(sheet.to_string())),
        SheetRef::First if count > 0 => 0,
        SheetRef::First => return Err(MapError::SheetNotFound(sheet.to_string())),
        SheetRef::Name(name) => (0..count)
            .find(|i| {
                workbook
                    .sheet_name(*i)
                    .is_some_and(|n| eq_ignore_case(&n, name))
            })
            .ok_or_else(|| MapError::SheetNotFound(name.clone()))?,
    };
    workbook
        .sheet(index)
        .ok_or(MapError::NullSource { index })
}

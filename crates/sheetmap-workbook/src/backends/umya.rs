#![cfg(feature = "umya")]

use std::io::{Cursor, Write};

use chrono::NaiveTime;
use sheetmap::{CellRole, CellValue, CellWrite, OpenBytes, Workbook, WorkbookSink, Worksheet};
use sheetmap_common::{CellErrorKind, RawCell, datetime_to_serial};
use umya_spreadsheet::{Cell, CellRawValue, NumberingFormat, Spreadsheet, reader::xlsx};

use crate::error::BackendError;
use crate::grid::{GridBook, SheetGrid};

const DATETIME_FORMAT_CODE: &str = "yyyy-mm-dd hh:mm:ss";

/// xlsx read/write through `umya-spreadsheet`.
///
/// Opening decodes every sheet into a [`GridBook`] snapshot that serves all
/// reads; writes go to both the document and the snapshot.
pub struct UmyaAdapter {
    book: Spreadsheet,
    grids: GridBook,
}

impl Default for UmyaAdapter {
    fn default() -> Self {
        Self::new()
    }
}

impl UmyaAdapter {
    /// An empty document with no sheets.
    pub fn new() -> Self {
        Self {
            book: umya_spreadsheet::new_file_empty_worksheet(),
            grids: GridBook::new(),
        }
    }

    pub fn grids(&self) -> &GridBook {
        &self.grids
    }

    fn snapshot(book: &Spreadsheet) -> Result<GridBook, BackendError> {
        let mut grids = GridBook::new();
        for i in 0..book.get_sheet_count() {
            let ws = book.get_sheet(&i).ok_or(BackendError::NoSheet(i))?;
            let mut grid = SheetGrid::new(ws.get_name());
            for cell in ws.get_cell_collection() {
                let coord = cell.get_coordinate();
                let col = *coord.get_col_num();
                let row = *coord.get_row_num();
                if row == 0 || col == 0 {
                    continue;
                }
                grid.set(row - 1, col - 1, Self::convert_cell(cell));
            }
            grids.push(grid);
        }
        Ok(grids)
    }

    fn convert_cell(cell: &Cell) -> RawCell {
        let cv = cell.get_cell_value();
        match cv.get_raw_value() {
            CellRawValue::Empty => RawCell::Blank,
            CellRawValue::Numeric(n) => RawCell::Number {
                value: *n,
                display: Some(cell.get_formatted_value()),
            },
            CellRawValue::Bool(b) => RawCell::Boolean(*b),
            CellRawValue::String(s) => RawCell::Text(s.to_string()),
            CellRawValue::RichText(rt) => RawCell::Text(rt.get_text().to_string()),
            CellRawValue::Lazy(s) => {
                let txt = s.as_ref();
                if let Ok(n) = txt.parse::<f64>() {
                    RawCell::Number {
                        value: n,
                        display: Some(cell.get_formatted_value()),
                    }
                } else if txt.eq_ignore_ascii_case("TRUE") {
                    RawCell::Boolean(true)
                } else if txt.eq_ignore_ascii_case("FALSE") {
                    RawCell::Boolean(false)
                } else {
                    RawCell::Text(txt.to_string())
                }
            }
            CellRawValue::Error(_) => RawCell::Error(
                CellErrorKind::parse(&cv.get_value()).unwrap_or(CellErrorKind::Value),
            ),
        }
    }
}

impl OpenBytes for UmyaAdapter {
    type Error = BackendError;

    const NAME: &'static str = "umya";

    fn open_bytes(data: &[u8]) -> Result<Self, Self::Error> {
        let book = xlsx::read_reader(Cursor::new(data), true)?;
        let grids = Self::snapshot(&book)?;
        Ok(Self { book, grids })
    }
}

impl Workbook for UmyaAdapter {
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

impl WorkbookSink for UmyaAdapter {
    type Error = BackendError;

    const NAME: &'static str = "umya";

    fn add_sheet(&mut self, name: &str) -> Result<usize, Self::Error> {
        if let Some(idx) = self.grids.position(name) {
            return Ok(idx);
        }
        self.book
            .new_sheet(name)
            .map_err(|e| BackendError::unsupported(format!("cannot add sheet '{name}': {e}")))?;
        Ok(self.grids.push(SheetGrid::new(name)))
    }

    fn write_cell(&mut self, sheet: usize, cell: &CellWrite) -> Result<(), Self::Error> {
        let ws = self
            .book
            .get_sheet_mut(&sheet)
            .ok_or(BackendError::NoSheet(sheet))?;
        // umya uses 1-based (col, row)
        let coord = (cell.column + 1, cell.row + 1);
        match &cell.value {
            CellValue::Empty => {
                ws.get_cell_mut(coord).set_blank();
            }
            CellValue::Text(s) => {
                ws.get_cell_mut(coord).set_value_string(s.clone());
            }
            CellValue::Number(n) => {
                ws.get_cell_mut(coord).set_value_number(*n);
            }
            CellValue::Boolean(b) => {
                ws.get_cell_mut(coord).set_value_bool(*b);
            }
            CellValue::DateTime(dt) => {
                ws.get_cell_mut(coord)
                    .set_value_number(datetime_to_serial(dt));
                let code = if dt.time() == NaiveTime::MIN {
                    NumberingFormat::FORMAT_DATE_YYYYMMDD2
                } else {
                    DATETIME_FORMAT_CODE
                };
                ws.get_style_mut(coord)
                    .get_number_format_mut()
                    .set_format_code(code);
            }
            CellValue::Error(e) => {
                ws.get_cell_mut(coord).set_value(e.code());
            }
        }
        if cell.role == CellRole::Header {
            ws.get_style_mut(coord).get_font_mut().set_bold(true);
        }

        let grid = self
            .grids
            .sheet_mut(sheet)
            .ok_or(BackendError::NoSheet(sheet))?;
        grid.set(cell.row, cell.column, RawCell::from(cell.value.clone()));
        Ok(())
    }

    fn save_to_writer(&mut self, writer: &mut dyn Write) -> Result<(), Self::Error> {
        let mut buf: Vec<u8> = Vec::new();
        umya_spreadsheet::writer::xlsx::write_writer(&self.book, Cursor::new(&mut buf))?;
        writer.write_all(&buf)?;
        Ok(())
    }
}

use std::io::Write;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use sheetmap::{CellWrite, OpenBytes, Workbook, WorkbookSink, Worksheet};
use sheetmap_common::{CellErrorKind, RawCell};

use crate::error::BackendError;
use crate::grid::{GridBook, SheetGrid};

const DATETIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.f";

#[derive(Serialize, Deserialize, Debug, Default, Clone)]
struct JsonWorkbook {
    #[serde(default = "default_version")]
    version: u32,
    #[serde(default)]
    sheets: Vec<JsonSheet>,
}

fn default_version() -> u32 {
    1
}

#[derive(Serialize, Deserialize, Debug, Default, Clone)]
struct JsonSheet {
    name: String,
    #[serde(default)]
    rows: Vec<JsonRow>,
}

#[derive(Serialize, Deserialize, Debug, Default, Clone)]
struct JsonRow {
    row: u32,
    #[serde(default)]
    cells: Vec<JsonCell>,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
struct JsonCell {
    col: u32,
    #[serde(flatten)]
    value: JsonValue,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(tag = "type", rename_all = "lowercase")]
enum JsonValue {
    Blank,
    Text {
        text: String,
    },
    Number {
        number: f64,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        display: Option<String>,
    },
    Boolean {
        boolean: bool,
    },
    DateTime {
        datetime: String,
    },
    Error {
        code: String,
    },
}

fn raw_to_json(cell: &RawCell) -> JsonValue {
    match cell {
        RawCell::Blank => JsonValue::Blank,
        RawCell::Text(s) => JsonValue::Text { text: s.clone() },
        RawCell::Number { value, display } => JsonValue::Number {
            number: *value,
            display: display.clone(),
        },
        RawCell::Boolean(b) => JsonValue::Boolean { boolean: *b },
        RawCell::DateTime(dt) => JsonValue::DateTime {
            datetime: dt.format(DATETIME_FORMAT).to_string(),
        },
        RawCell::Error(e) => JsonValue::Error {
            code: e.code().to_string(),
        },
    }
}

fn json_to_raw(value: &JsonValue) -> Result<RawCell, BackendError> {
    Ok(match value {
        JsonValue::Blank => RawCell::Blank,
        JsonValue::Text { text } => RawCell::Text(text.clone()),
        JsonValue::Number { number, display } => RawCell::Number {
            value: *number,
            display: display.clone(),
        },
        JsonValue::Boolean { boolean } => RawCell::Boolean(*boolean),
        JsonValue::DateTime { datetime } => RawCell::DateTime(
            NaiveDateTime::parse_from_str(datetime, DATETIME_FORMAT).map_err(|e| {
                BackendError::unsupported(format!("invalid datetime `{datetime}`: {e}"))
            })?,
        ),
        JsonValue::Error { code } => RawCell::Error(
            CellErrorKind::parse(code)
                .ok_or_else(|| BackendError::unsupported(format!("unknown error code `{code}`")))?,
        ),
    })
}

/// Workbook stored as a JSON document.
///
/// Sheets keep their order; rows are listed explicitly so a present row
/// with no cells survives a save/open cycle.
#[derive(Debug, Clone, Default)]
pub struct JsonAdapter {
    book: GridBook,
}

impl JsonAdapter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_book(book: GridBook) -> Self {
        Self { book }
    }

    pub fn book(&self) -> &GridBook {
        &self.book
    }

    pub fn book_mut(&mut self) -> &mut GridBook {
        &mut self.book
    }

    pub fn to_json_string(&self) -> Result<String, BackendError> {
        Ok(serde_json::to_string_pretty(&self.to_document())?)
    }

    fn to_document(&self) -> JsonWorkbook {
        let sheets = self
            .book
            .sheets()
            .iter()
            .map(|sheet| JsonSheet {
                name: sheet.name().to_string(),
                rows: sheet
                    .rows()
                    .map(|(row, cells)| JsonRow {
                        row,
                        cells: cells
                            .iter()
                            .map(|(col, cell)| JsonCell {
                                col: *col,
                                value: raw_to_json(cell),
                            })
                            .collect(),
                    })
                    .collect(),
            })
            .collect();
        JsonWorkbook {
            version: default_version(),
            sheets,
        }
    }

    fn from_document(doc: JsonWorkbook) -> Result<Self, BackendError> {
        let mut book = GridBook::new();
        for js in doc.sheets {
            let mut grid = SheetGrid::new(js.name);
            for jr in js.rows {
                grid.touch_row(jr.row);
                for jc in jr.cells {
                    grid.set(jr.row, jc.col, json_to_raw(&jc.value)?);
                }
            }
            book.push(grid);
        }
        Ok(Self { book })
    }
}

impl OpenBytes for JsonAdapter {
    type Error = BackendError;

    const NAME: &'static str = "json";

    fn open_bytes(data: &[u8]) -> Result<Self, Self::Error> {
        let doc: JsonWorkbook = serde_json::from_slice(data)?;
        Self::from_document(doc)
    }
}

impl Workbook for JsonAdapter {
    fn sheet_count(&self) -> usize {
        self.book.sheet_count()
    }

    fn sheet_name(&self, index: usize) -> Option<String> {
        self.book.sheet_name(index)
    }

    fn sheet(&self, index: usize) -> Option<&dyn Worksheet> {
        self.book.sheet(index)
    }
}

impl WorkbookSink for JsonAdapter {
    type Error = BackendError;

    const NAME: &'static str = "json";

    fn add_sheet(&mut self, name: &str) -> Result<usize, Self::Error> {
        Ok(self.book.ensure_sheet(name))
    }

    fn write_cell(&mut self, sheet: usize, cell: &CellWrite) -> Result<(), Self::Error> {
        let grid = self
            .book
            .sheet_mut(sheet)
            .ok_or(BackendError::NoSheet(sheet))?;
        grid.set(cell.row, cell.column, RawCell::from(cell.value.clone()));
        Ok(())
    }

    fn save_to_writer(&mut self, writer: &mut dyn Write) -> Result<(), Self::Error> {
        serde_json::to_writer_pretty(writer, &self.to_document())?;
        Ok(())
    }
}

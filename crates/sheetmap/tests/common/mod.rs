// Shared in-memory backend for the integration tests.
#![allow(dead_code)]

use std::collections::BTreeMap;

use sheetmap::{CellWrite, RawCell, Workbook, Worksheet};

#[derive(Debug, Clone, Default)]
pub struct MemSheet {
    name: String,
    rows: BTreeMap<u32, BTreeMap<u32, RawCell>>,
}

impl MemSheet {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            rows: BTreeMap::new(),
        }
    }

    /// Fill 0-based `row` from column 0.
    pub fn row<I>(mut self, row: u32, cells: I) -> Self
    where
        I: IntoIterator<Item = RawCell>,
    {
        let entry = self.rows.entry(row).or_default();
        for (col, cell) in cells.into_iter().enumerate() {
            entry.insert(col as u32, cell);
        }
        self
    }

    pub fn text_row(self, row: u32, cells: &[&str]) -> Self {
        self.row(row, cells.iter().map(|s| text(s)))
    }

    pub fn from_writes(name: &str, writes: &[CellWrite]) -> Self {
        let mut sheet = Self::new(name);
        for w in writes {
            sheet
                .rows
                .entry(w.row)
                .or_default()
                .insert(w.column, RawCell::from(w.value.clone()));
        }
        sheet
    }
}

impl Worksheet for MemSheet {
    fn name(&self) -> &str {
        &self.name
    }

    fn last_row(&self) -> Option<u32> {
        self.rows.keys().next_back().copied()
    }

    fn row_exists(&self, row: u32) -> bool {
        self.rows.contains_key(&row)
    }

    fn last_column(&self, row: u32) -> Option<u32> {
        self.rows.get(&row)?.keys().next_back().copied()
    }

    fn cell(&self, row: u32, col: u32) -> Option<RawCell> {
        self.rows.get(&row)?.get(&col).cloned()
    }
}

#[derive(Debug, Default)]
pub struct MemBook {
    pub sheets: Vec<MemSheet>,
    /// Report sheets but hand back none of them.
    pub broken: bool,
}

impl MemBook {
    pub fn single(sheet: MemSheet) -> Self {
        Self {
            sheets: vec![sheet],
            broken: false,
        }
    }
}

impl Workbook for MemBook {
    fn sheet_count(&self) -> usize {
        self.sheets.len()
    }

    fn sheet_name(&self, index: usize) -> Option<String> {
        self.sheets.get(index).map(|s| s.name.clone())
    }

    fn sheet(&self, index: usize) -> Option<&dyn Worksheet> {
        if self.broken {
            return None;
        }
        self.sheets.get(index).map(|s| s as &dyn Worksheet)
    }
}

pub fn text(s: &str) -> RawCell {
    RawCell::Text(s.to_string())
}

pub fn num(n: f64) -> RawCell {
    RawCell::number(n)
}

//! Decoded sheet contents shared by the bundled backends.

use std::collections::BTreeMap;

use sheetmap::{Workbook, Worksheet, eq_ignore_case};
use sheetmap_common::RawCell;

/// Sparse row-major cell store, 0-based.
///
/// A row key with no cells is a present, blank row; a missing row key is an
/// absent row.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SheetGrid {
    name: String,
    rows: BTreeMap<u32, BTreeMap<u32, RawCell>>,
}

impl SheetGrid {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            rows: BTreeMap::new(),
        }
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    /// Mark `row` present without adding cells.
    pub fn touch_row(&mut self, row: u32) {
        self.rows.entry(row).or_default();
    }

    pub fn set(&mut self, row: u32, col: u32, cell: RawCell) {
        self.rows.entry(row).or_default().insert(col, cell);
    }

    pub fn get(&self, row: u32, col: u32) -> Option<&RawCell> {
        self.rows.get(&row)?.get(&col)
    }

    /// Present rows with their cells, ascending.
    pub fn rows(&self) -> impl Iterator<Item = (u32, &BTreeMap<u32, RawCell>)> {
        self.rows.iter().map(|(r, cells)| (*r, cells))
    }

    pub fn cell_count(&self) -> usize {
        self.rows.values().map(BTreeMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

impl Worksheet for SheetGrid {
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
        self.get(row, col).cloned()
    }
}

/// Ordered sheets of one decoded document.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GridBook {
    sheets: Vec<SheetGrid>,
}

impl GridBook {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sheets(&self) -> &[SheetGrid] {
        &self.sheets
    }

    pub fn push(&mut self, sheet: SheetGrid) -> usize {
        self.sheets.push(sheet);
        self.sheets.len() - 1
    }

    /// Index of the sheet named `name` (case-insensitive), creating it if needed.
    pub fn ensure_sheet(&mut self, name: &str) -> usize {
        match self.position(name) {
            Some(idx) => idx,
            None => self.push(SheetGrid::new(name)),
        }
    }

    pub fn position(&self, name: &str) -> Option<usize> {
        self.sheets
            .iter()
            .position(|s| eq_ignore_case(&s.name, name))
    }

    pub fn sheet_mut(&mut self, index: usize) -> Option<&mut SheetGrid> {
        self.sheets.get_mut(index)
    }
}

impl Workbook for GridBook {
    fn sheet_count(&self) -> usize {
        self.sheets.len()
    }

    fn sheet_name(&self, index: usize) -> Option<String> {
        self.sheets.get(index).map(|s| s.name.clone())
    }

    fn sheet(&self, index: usize) -> Option<&dyn Worksheet> {
        self.sheets.get(index).map(|s| s as &dyn Worksheet)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn touched_rows_exist_without_cells() {
        let mut grid = SheetGrid::new("S");
        grid.set(0, 2, RawCell::Text("h".into()));
        grid.touch_row(4);
        assert_eq!(grid.last_row(), Some(4));
        assert!(grid.row_exists(4));
        assert!(!grid.row_exists(3));
        assert_eq!(grid.last_column(0), Some(2));
        assert_eq!(grid.last_column(4), None);
        assert_eq!(grid.cell(0, 1), None);
        assert_eq!(grid.cell_count(), 1);
    }

    #[test]
    fn sheets_are_found_case_insensitively() {
        let mut book = GridBook::new();
        let a = book.ensure_sheet("Data");
        assert_eq!(book.ensure_sheet("DATA"), a);
        assert_eq!(book.ensure_sheet("Other"), 1);
        assert_eq!(book.sheet_count(), 2);
    }
}

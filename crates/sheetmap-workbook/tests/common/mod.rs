// Shared helpers for the xlsx backend tests.
#![allow(dead_code)]

use std::path::PathBuf;

/// Build an xlsx file on disk with one sheet named `Sheet1`.
pub fn build_workbook<F>(f: F) -> (tempfile::TempDir, PathBuf)
where
    F: FnOnce(&mut umya_spreadsheet::Spreadsheet),
{
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("fixture.xlsx");
    let mut book = umya_spreadsheet::new_file();
    f(&mut book);
    umya_spreadsheet::writer::xlsx::write(&book, &path).unwrap();
    (dir, path)
}

pub fn build_bytes<F>(f: F) -> Vec<u8>
where
    F: FnOnce(&mut umya_spreadsheet::Spreadsheet),
{
    let (_dir, path) = build_workbook(f);
    std::fs::read(&path).unwrap()
}

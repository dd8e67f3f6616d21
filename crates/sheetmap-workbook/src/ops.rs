//! Stream-level operations: bytes in, items out, and back.
//!
//! Each call opens its own document, runs one read or write, and drops the
//! document before returning, on success and on every error path.

use std::borrow::Borrow;

use sheetmap::{
    CancellationToken, CellConvert, ColumnConvert, DataTable, FromCell, IntoCell, ItemBuilder,
    ItemSource, MapError, OpenBytes, ReadOptions, RowProjector, RowSerializer, SheetCursor,
    SheetRef, Workbook, WorkbookSink, WriteOptions,
};

fn open<W: OpenBytes>(data: &[u8]) -> Result<W, MapError> {
    #[cfg(feature = "tracing")]
    let _span = tracing::debug_span!("sheetmap_open", backend = W::NAME, bytes = data.len()).entered();

    W::open_bytes(data).map_err(|e| MapError::from_backend(W::NAME, e))
}

fn projector<'a>(options: &'a ReadOptions, cancel: Option<&'a CancellationToken>) -> RowProjector<'a> {
    let projector = RowProjector::new(options);
    match cancel {
        Some(token) => projector.with_cancellation(token),
        None => projector,
    }
}

fn serializer<'a>(options: &'a WriteOptions, cancel: Option<&'a CancellationToken>) -> RowSerializer<'a> {
    let serializer = RowSerializer::new(options);
    match cancel {
        Some(token) => serializer.with_cancellation(token),
        None => serializer,
    }
}

/// Read typed items from a document held in memory.
pub fn read_list<W, B>(
    data: &[u8],
    sheet: &SheetRef,
    options: &ReadOptions,
    builder: &B,
    cancel: Option<&CancellationToken>,
) -> Result<Vec<B::Item>, MapError>
where
    W: Workbook + OpenBytes,
    B: ItemBuilder,
{
    options.validate()?;
    let book = open::<W>(data)?;
    projector(options, cancel).project(&book, sheet, builder)
}

pub fn read_table<W>(
    data: &[u8],
    sheet: &SheetRef,
    options: &ReadOptions,
    cancel: Option<&CancellationToken>,
) -> Result<DataTable, MapError>
where
    W: Workbook + OpenBytes,
{
    options.validate()?;
    let book = open::<W>(data)?;
    projector(options, cancel).project_table(&book, sheet)
}

/// Read one column from a 1-based origin, without header discovery.
///
/// `convert` replaces the type-directed coercion for every cell.
pub fn read_column<W, T>(
    data: &[u8],
    sheet: &SheetRef,
    first_row_number: u32,
    column_number: u32,
    convert: Option<ColumnConvert<'_, T>>,
    options: &ReadOptions,
    cancel: Option<&CancellationToken>,
) -> Result<Vec<T>, MapError>
where
    W: Workbook + OpenBytes,
    T: FromCell,
{
    let book = open::<W>(data)?;
    projector(options, cancel).read_column(&book, sheet, first_row_number, column_number, convert)
}

/// Serialize items obtained from `supplier` into a new document.
pub fn write_with<S, T, Src, F, I>(
    supplier: F,
    source: &Src,
    options: &WriteOptions,
    cancel: Option<&CancellationToken>,
) -> Result<Vec<u8>, MapError>
where
    S: WorkbookSink + Default,
    Src: ItemSource<T> + ?Sized,
    F: FnOnce() -> I,
    I: IntoIterator,
    I::Item: Borrow<T>,
{
    options.validate()?;
    let mut sink = S::default();
    let mut cursor = SheetCursor::open(&mut sink, &options.sheet_name)?;
    serializer(options, cancel).serialize_with(supplier, source, &mut cursor)?;
    sink.save_to_bytes()
        .map_err(|e| MapError::from_backend(S::NAME, e))
}

pub fn write_list<S, T, Src>(
    items: &[T],
    source: &Src,
    options: &WriteOptions,
    cancel: Option<&CancellationToken>,
) -> Result<Vec<u8>, MapError>
where
    S: WorkbookSink + Default,
    Src: ItemSource<T> + ?Sized,
{
    write_with::<S, T, Src, _, _>(|| items.iter(), source, options, cancel)
}

pub fn write_table<S>(
    table: &DataTable,
    options: &WriteOptions,
    cancel: Option<&CancellationToken>,
) -> Result<Vec<u8>, MapError>
where
    S: WorkbookSink + Default,
{
    write_with::<S, Vec<_>, DataTable, _, _>(|| table.rows(), table, options, cancel)
}

/// Write values obtained from `supplier` down one column from a 1-based
/// origin, without a header.
pub fn write_column_with<S, F, I>(
    supplier: F,
    first_row_number: u32,
    column_number: u32,
    convert: Option<CellConvert<'_>>,
    options: &WriteOptions,
    cancel: Option<&CancellationToken>,
) -> Result<Vec<u8>, MapError>
where
    S: WorkbookSink + Default,
    F: FnOnce() -> I,
    I: IntoIterator,
    I::Item: IntoCell,
{
    let mut sink = S::default();
    let mut cursor = SheetCursor::open(&mut sink, &options.sheet_name)?;
    serializer(options, cancel).serialize_column_with(
        supplier,
        first_row_number,
        column_number,
        convert,
        &mut cursor,
    )?;
    sink.save_to_bytes()
        .map_err(|e| MapError::from_backend(S::NAME, e))
}

pub fn write_column<S, I>(
    values: I,
    first_row_number: u32,
    column_number: u32,
    convert: Option<CellConvert<'_>>,
    options: &WriteOptions,
    cancel: Option<&CancellationToken>,
) -> Result<Vec<u8>, MapError>
where
    S: WorkbookSink + Default,
    I: IntoIterator,
    I::Item: IntoCell,
{
    write_column_with::<S, _, _>(|| values, first_row_number, column_number, convert, options, cancel)
}

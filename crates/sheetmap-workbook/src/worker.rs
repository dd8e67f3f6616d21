//! Run an operation on a dedicated thread so the calling thread stays free.

use std::sync::Arc;
use std::thread::{self, JoinHandle};

use sheetmap::{
    CancellationToken, DataTable, ItemBuilder, ItemSource, MapError, OpenBytes, ReadOptions,
    SheetRef, Workbook, WorkbookSink, WriteOptions,
};

use crate::ops;

/// A running operation.
pub struct OperationHandle<R> {
    handle: JoinHandle<Result<R, MapError>>,
    token: CancellationToken,
}

impl<R> OperationHandle<R> {
    /// Request a stop; the operation ends with [`MapError::Cancelled`] before
    /// its next row.
    pub fn cancel(&self) {
        self.token.cancel();
    }

    pub fn token(&self) -> &CancellationToken {
        &self.token
    }

    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }

    /// Wait for the result.
    pub fn join(self) -> Result<R, MapError> {
        self.handle.join().map_err(|_| MapError::Backend {
            backend: "worker",
            message: "operation thread panicked".to_string(),
        })?
    }
}

/// Spawn `op` on a named thread with a fresh cancellation token.
pub fn spawn<R, F>(name: &str, op: F) -> Result<OperationHandle<R>, MapError>
where
    R: Send + 'static,
    F: FnOnce(&CancellationToken) -> Result<R, MapError> + Send + 'static,
{
    let token = CancellationToken::new();
    let inner = token.clone();
    let handle = thread::Builder::new()
        .name(name.to_string())
        .spawn(move || op(&inner))
        .map_err(|e| MapError::from_backend("worker", e))?;
    Ok(OperationHandle { handle, token })
}

pub fn spawn_read_list<W, B>(
    data: Vec<u8>,
    sheet: SheetRef,
    options: Arc<ReadOptions>,
    builder: B,
) -> Result<OperationHandle<Vec<B::Item>>, MapError>
where
    W: Workbook + OpenBytes + 'static,
    B: ItemBuilder + Send + 'static,
    B::Item: Send + 'static,
{
    spawn("sheetmap-read", move |token| {
        ops::read_list::<W, B>(&data, &sheet, &options, &builder, Some(token))
    })
}

pub fn spawn_read_table<W>(
    data: Vec<u8>,
    sheet: SheetRef,
    options: Arc<ReadOptions>,
) -> Result<OperationHandle<DataTable>, MapError>
where
    W: Workbook + OpenBytes + 'static,
{
    spawn("sheetmap-read", move |token| {
        ops::read_table::<W>(&data, &sheet, &options, Some(token))
    })
}

pub fn spawn_write_list<S, T, Src>(
    items: Vec<T>,
    source: Src,
    options: Arc<WriteOptions>,
) -> Result<OperationHandle<Vec<u8>>, MapError>
where
    S: WorkbookSink + Default + 'static,
    T: Send + 'static,
    Src: ItemSource<T> + Send + 'static,
{
    spawn("sheetmap-write", move |token| {
        ops::write_list::<S, T, Src>(&items, &source, &options, Some(token))
    })
}

pub fn spawn_write_table<S>(
    table: DataTable,
    options: Arc<WriteOptions>,
) -> Result<OperationHandle<Vec<u8>>, MapError>
where
    S: WorkbookSink + Default + 'static,
{
    spawn("sheetmap-write", move |token| {
        ops::write_table::<S>(&table, &options, Some(token))
    })
}

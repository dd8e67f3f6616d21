//! Backends and byte-level operations for `sheetmap`.
//!
//! The JSON backend is always built with the default features; the xlsx
//! backends sit behind the `umya` (read/write) and `calamine` (read) features.

pub mod backends;
pub mod error;
pub mod grid;
pub mod ops;
pub mod worker;

#[cfg(feature = "calamine")]
pub use backends::CalamineAdapter;
#[cfg(feature = "json")]
pub use backends::JsonAdapter;
#[cfg(feature = "umya")]
pub use backends::UmyaAdapter;
pub use error::BackendError;
pub use grid::{GridBook, SheetGrid};
pub use ops::{
    read_column, read_list, read_table, write_column, write_column_with, write_list, write_table,
    write_with,
};
pub use worker::{
    OperationHandle, spawn, spawn_read_list, spawn_read_table, spawn_write_list,
    spawn_write_table,
};

pub use sheetmap;

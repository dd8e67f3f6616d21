//! Column mapping between spreadsheet rows and typed Rust data.
//!
//! The read path resolves a header row against a [`ColumnMapRegistry`] and
//! projects each data row into an item through an [`ItemBuilder`]. The write
//! path lays the same profiles out as columns and serializes items through an
//! [`ItemSource`] into addressed [`CellWrite`]s. Physical decode and encode
//! belong to a backend implementing the traits in [`backend`].

pub mod backend;
pub mod cancel;
pub mod coerce;
pub mod config;
pub mod convert;
pub mod error;
pub mod header;
pub mod item;
pub mod options;
pub mod profile;
pub mod projector;
pub mod serializer;

pub use backend::{
    CellRole, CellSink, CellWrite, OpenBytes, SheetCursor, Workbook, WorkbookSink, Worksheet,
    resolve_sheet,
};
pub use cancel::CancellationToken;
pub use coerce::{FromCell, IntoCell, ValueKind, coerce};
pub use config::{ConverterRegistry, OptionsConfig, ProfileConfig};
pub use convert::{ConvertError, ConvertFn, Locale, LookupConverter, ValueConverter, convert_fn};
pub use error::{MapError, col_to_a1};
pub use header::{HeaderMap, ResolvedColumn, resolve_header};
pub use item::{DataTable, FieldAccessors, ItemBuilder, ItemSource};
pub use options::{DEFAULT_SHEET_NAME, ReadOptions, SheetRef, WriteOptions};
pub use profile::{ColumnMapProfile, ColumnMapRegistry, eq_ignore_case};
pub use projector::{ColumnConvert, RowProjector};
pub use serializer::{CellConvert, LayoutColumn, RowSerializer};

pub use sheetmap_common::{
    CellErrorKind, CellValue, DateDetection, RawCell, datetime_to_serial, serial_to_datetime,
};

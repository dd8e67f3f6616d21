//! Header discovery for the read path.

use std::borrow::Cow;

use sheetmap_common::{CellValue, RawCell};

use crate::backend::Worksheet;
use crate::options::ReadOptions;
use crate::profile::ColumnMapProfile;

/// One mapped column: its 0-based position and the profile it resolved to.
#[derive(Debug, Clone)]
pub struct ResolvedColumn<'a> {
    pub position: u32,
    pub header: String,
    pub profile: Cow<'a, ColumnMapProfile>,
}

/// Column position → profile mapping, ascending by position.
#[derive(Debug, Clone, Default)]
pub struct HeaderMap<'a> {
    columns: Vec<ResolvedColumn<'a>>,
}

impl<'a> HeaderMap<'a> {
    pub fn columns(&self) -> &[ResolvedColumn<'a>] {
        &self.columns
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Logical field names in column order.
    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|c| c.profile.name())
    }

    /// `(position, field)` pairs, for comparing two resolutions.
    pub fn signature(&self) -> Vec<(u32, String)> {
        self.columns
            .iter()
            .map(|c| (c.position, c.profile.name().to_string()))
            .collect()
    }
}

/// Header text of a cell; anything that cannot be read as text is empty.
pub fn header_text(cell: Option<RawCell>) -> String {
    match cell {
        Some(RawCell::Text(s)) => s,
        Some(RawCell::Number { value, .. }) => CellValue::Number(value).to_text(),
        Some(RawCell::Boolean(b)) => b.to_string(),
        Some(RawCell::DateTime(dt)) => CellValue::DateTime(dt).to_text(),
        Some(RawCell::Error(_)) | Some(RawCell::Blank) | None => String::new(),
    }
}

/// Scan the header row and bind each non-blank, non-ignored column to a
/// registered profile, or to a synthesized pass-through profile.
///
/// Explicit-index profiles bind to their column even when the header cell
/// is blank or lies past the last header cell. Without them, an absent or
/// entirely blank header row yields an empty map.
pub fn resolve_header<'a>(sheet: &dyn Worksheet, options: &'a ReadOptions) -> HeaderMap<'a> {
    let header_row = options.header_row_number.saturating_sub(1);
    let mut columns = Vec::new();

    let header_end = sheet
        .last_column(header_row)
        .filter(|_| sheet.row_exists(header_row));
    let indexed_end = options
        .profiles
        .profiles()
        .iter()
        .filter_map(|p| p.index())
        .max()
        .map(|n| n.saturating_sub(1));
    let Some(last_col) = header_end.max(indexed_end) else {
        return HeaderMap { columns };
    };

    let first = options.first_column_number.saturating_sub(1);
    for position in first..=last_col {
        let header = header_text(sheet.cell(header_row, position));
        let trimmed = header.trim();
        if !trimmed.is_empty() && options.is_ignored(&header) {
            continue;
        }

        // A name owned by an indexed profile only binds at that index.
        let profile = match options.profiles.resolve_index(position + 1) {
            Some(p) => Cow::Borrowed(p),
            None if trimmed.is_empty() => continue,
            None => match options.profiles.resolve(&header) {
                Some(p) if p.index().is_some() => continue,
                Some(p) => Cow::Borrowed(p),
                None => Cow::Owned(ColumnMapProfile::pass_through(header.clone())),
            },
        };

        columns.push(ResolvedColumn {
            position,
            header,
            profile,
        });
    }

    #[cfg(feature = "tracing")]
    tracing::debug!(
        sheet = sheet.name(),
        header_row = options.header_row_number,
        mapped = columns.len(),
        "resolved header"
    );

    HeaderMap { columns }
}

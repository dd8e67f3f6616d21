//! Item construction and field access for the projector and serializer.
//!
//! Both capabilities address fields by logical name. [`FieldAccessors`] is
//! the per-type accessor table for typed items; [`DataTable`] is the untyped
//! table whose rows are `Vec<CellValue>`.

use rustc_hash::FxHashMap;
use sheetmap_common::CellValue;

use crate::coerce::{FromCell, IntoCell};
use crate::convert::ConvertError;
use crate::profile::eq_ignore_case;

/// Read-path capability pair: build an empty item, assign a field by name.
pub trait ItemBuilder {
    type Item;

    fn new_item(&self) -> Self::Item;

    /// Unknown field names are ignored.
    fn assign(&self, item: &mut Self::Item, field: &str, value: CellValue)
    -> Result<(), ConvertError>;
}

/// Write-path capability: read a field by name.
pub trait ItemSource<T> {
    /// Field names in declaration order, used when no profiles are registered.
    fn field_names(&self) -> Vec<String>;

    /// `None` when the item has no such field.
    fn get(&self, item: &T, field: &str) -> Option<CellValue>;
}

type Getter<T> = Box<dyn Fn(&T) -> CellValue + Send + Sync>;
type Setter<T> = Box<dyn Fn(&mut T, &CellValue) -> Result<(), ConvertError> + Send + Sync>;

struct FieldAccessor<T> {
    name: String,
    get: Option<Getter<T>>,
    set: Option<Setter<T>>,
}

/// Accessor table for a typed item, built once and reused.
///
/// ```
/// use sheetmap::FieldAccessors;
///
/// #[derive(Default)]
/// struct Employee {
///     name: String,
///     age: i32,
/// }
///
/// let fields = FieldAccessors::<Employee>::new()
///     .field("Name", |e| e.name.clone(), |e, v| e.name = v)
///     .field("Age", |e| e.age, |e, v| e.age = v);
/// assert_eq!(fields.len(), 2);
/// ```
pub struct FieldAccessors<T> {
    fields: Vec<FieldAccessor<T>>,
    lookup: FxHashMap<String, usize>,
}

impl<T> Default for FieldAccessors<T> {
    fn default() -> Self {
        Self {
            fields: Vec::new(),
            lookup: FxHashMap::default(),
        }
    }
}

impl<T> FieldAccessors<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a readable and writable field.
    pub fn field<V, G, S>(self, name: impl Into<String>, get: G, set: S) -> Self
    where
        V: FromCell + IntoCell + 'static,
        G: Fn(&T) -> V + Send + Sync + 'static,
        S: Fn(&mut T, V) + Send + Sync + 'static,
    {
        self.insert(name.into(), Some(Self::boxed_get(get)), Some(Self::boxed_set(set)))
    }

    /// Register a field that is only written to sheets.
    pub fn getter<V, G>(self, name: impl Into<String>, get: G) -> Self
    where
        V: IntoCell + 'static,
        G: Fn(&T) -> V + Send + Sync + 'static,
    {
        self.insert(name.into(), Some(Self::boxed_get(get)), None)
    }

    /// Register a field that is only read from sheets.
    pub fn setter<V, S>(self, name: impl Into<String>, set: S) -> Self
    where
        V: FromCell + 'static,
        S: Fn(&mut T, V) + Send + Sync + 'static,
    {
        self.insert(name.into(), None, Some(Self::boxed_set(set)))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    fn boxed_get<V, G>(get: G) -> Getter<T>
    where
        V: IntoCell + 'static,
        G: Fn(&T) -> V + Send + Sync + 'static,
    {
        Box::new(move |item| get(item).into_cell())
    }

    fn boxed_set<V, S>(set: S) -> Setter<T>
    where
        V: FromCell + 'static,
        S: Fn(&mut T, V) + Send + Sync + 'static,
    {
        Box::new(move |item, value| {
            set(item, V::from_cell(value)?);
            Ok(())
        })
    }

    fn insert(mut self, name: String, get: Option<Getter<T>>, set: Option<Setter<T>>) -> Self {
        let accessor = FieldAccessor {
            name: name.clone(),
            get,
            set,
        };
        match self.lookup.get(&name) {
            Some(&idx) => self.fields[idx] = accessor,
            None => {
                self.lookup.insert(name, self.fields.len());
                self.fields.push(accessor);
            }
        }
        self
    }

    /// Exact name first, then a case-insensitive match.
    fn find(&self, name: &str) -> Option<&FieldAccessor<T>> {
        match self.lookup.get(name) {
            Some(&idx) => self.fields.get(idx),
            None => self.fields.iter().find(|f| eq_ignore_case(&f.name, name)),
        }
    }
}

impl<T: Default> ItemBuilder for FieldAccessors<T> {
    type Item = T;

    fn new_item(&self) -> T {
        T::default()
    }

    fn assign(&self, item: &mut T, field: &str, value: CellValue) -> Result<(), ConvertError> {
        match self.find(field).and_then(|f| f.set.as_ref()) {
            Some(set) => set(item, &value),
            None => Ok(()),
        }
    }
}

impl<T> ItemSource<T> for FieldAccessors<T> {
    fn field_names(&self) -> Vec<String> {
        self.fields
            .iter()
            .filter(|f| f.get.is_some())
            .map(|f| f.name.clone())
            .collect()
    }

    fn get(&self, item: &T, field: &str) -> Option<CellValue> {
        self.find(field)
            .and_then(|f| f.get.as_ref())
            .map(|get| get(item))
    }
}

/// Generic table of cell values with named columns.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DataTable {
    columns: Vec<String>,
    rows: Vec<Vec<CellValue>>,
}

impl DataTable {
    pub fn new<I, S>(columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut table = Self::default();
        for c in columns {
            table.add_column(c);
        }
        table
    }

    /// Add a column unless one with the same name (case-insensitive) exists.
    /// Returns the column position either way.
    pub fn add_column(&mut self, name: impl Into<String>) -> usize {
        let name = name.into();
        if let Some(idx) = self.column_index(&name) {
            return idx;
        }
        self.columns.push(name);
        for row in &mut self.rows {
            row.push(CellValue::Empty);
        }
        self.columns.len() - 1
    }

    /// Append a row, padding or truncating it to the column count.
    pub fn push_row(&mut self, mut row: Vec<CellValue>) {
        row.resize(self.columns.len(), CellValue::Empty);
        self.rows.push(row);
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<CellValue>] {
        &self.rows
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns
            .iter()
            .position(|c| c == name)
            .or_else(|| self.columns.iter().position(|c| eq_ignore_case(c, name)))
    }

    pub fn get(&self, row: usize, column: &str) -> Option<&CellValue> {
        let idx = self.column_index(column)?;
        self.rows.get(row).and_then(|r| r.get(idx))
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub(crate) fn set_rows(&mut self, rows: Vec<Vec<CellValue>>) {
        self.rows = rows;
    }
}

impl ItemBuilder for DataTable {
    type Item = Vec<CellValue>;

    fn new_item(&self) -> Vec<CellValue> {
        vec![CellValue::Empty; self.columns.len()]
    }

    fn assign(
        &self,
        item: &mut Vec<CellValue>,
        field: &str,
        value: CellValue,
    ) -> Result<(), ConvertError> {
        if let Some(slot) = self.column_index(field).and_then(|idx| item.get_mut(idx)) {
            *slot = value;
        }
        Ok(())
    }
}

impl ItemSource<Vec<CellValue>> for DataTable {
    fn field_names(&self) -> Vec<String> {
        self.columns.clone()
    }

    fn get(&self, item: &Vec<CellValue>, field: &str) -> Option<CellValue> {
        self.column_index(field)
            .map(|idx| item.get(idx).cloned().unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Default, PartialEq)]
    struct Person {
        name: String,
        age: i32,
        nickname: Option<String>,
    }

    fn accessors() -> FieldAccessors<Person> {
        FieldAccessors::new()
            .field("Name", |p: &Person| p.name.clone(), |p, v| p.name = v)
            .field("Age", |p: &Person| p.age, |p, v| p.age = v)
            .setter("Nickname", |p: &mut Person, v| p.nickname = v)
    }

    #[test]
    fn assigns_by_name_with_coercion() {
        let acc = accessors();
        let mut p = acc.new_item();
        acc.assign(&mut p, "Name", CellValue::from("Ada")).unwrap();
        acc.assign(&mut p, "age", CellValue::Number(36.0)).unwrap();
        acc.assign(&mut p, "Nickname", CellValue::Empty).unwrap();
        acc.assign(&mut p, "Unknown", CellValue::from("x")).unwrap();
        assert_eq!(
            p,
            Person {
                name: "Ada".into(),
                age: 36,
                nickname: None
            }
        );
    }

    #[test]
    fn assign_reports_parse_failure() {
        let acc = accessors();
        let mut p = acc.new_item();
        let err = acc.assign(&mut p, "Age", CellValue::from("abc")).unwrap_err();
        assert_eq!(err, ConvertError::new("i32", "abc"));
    }

    #[test]
    fn getters_expose_native_values() {
        let acc = accessors();
        let p = Person {
            name: "Bo".into(),
            age: 3,
            nickname: None,
        };
        assert_eq!(acc.get(&p, "Age"), Some(CellValue::Number(3.0)));
        assert_eq!(acc.get(&p, "Nickname"), None);
        assert_eq!(acc.field_names(), ["Name", "Age"]);
    }

    #[test]
    fn table_columns_dedupe_and_pad() {
        let mut t = DataTable::new(["Id", "Name"]);
        assert_eq!(t.add_column("name"), 1);
        t.push_row(vec![CellValue::Number(1.0)]);
        assert_eq!(t.get(0, "NAME"), Some(&CellValue::Empty));
        assert_eq!(t.add_column("Age"), 2);
        assert_eq!(t.rows()[0].len(), 3);
    }
}

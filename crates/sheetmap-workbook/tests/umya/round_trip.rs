// Run with: `cargo test -p sheetmap-workbook --features umya --test umya`

use crate::common::build_bytes;
use chrono::NaiveDate;
use sheetmap::{
    CellValue, ColumnMapProfile, ColumnMapRegistry, DataTable, FieldAccessors, MapError,
    ReadOptions, SheetRef, ValueKind, WriteOptions,
};
use sheetmap_workbook::{UmyaAdapter, ops};

#[derive(Debug, Default, Clone, PartialEq)]
struct Employee {
    name: String,
    age: i32,
    hired: NaiveDate,
    manager: bool,
}

fn fields() -> FieldAccessors<Employee> {
    FieldAccessors::new()
        .field("Name", |e: &Employee| e.name.clone(), |e, v| e.name = v)
        .field("Age", |e: &Employee| e.age, |e, v| e.age = v)
        .field("Hired", |e: &Employee| e.hired, |e, v| e.hired = v)
        .field("Manager", |e: &Employee| e.manager, |e, v| e.manager = v)
}

fn employees() -> Vec<Employee> {
    vec![
        Employee {
            name: "Ada".into(),
            age: 36,
            hired: NaiveDate::from_ymd_opt(2018, 5, 14).unwrap(),
            manager: true,
        },
        Employee {
            name: "Bo".into(),
            age: 41,
            hired: NaiveDate::from_ymd_opt(2020, 6, 18).unwrap(),
            manager: false,
        },
    ]
}

#[test]
fn umya_list_round_trip() {
    let options = WriteOptions::new().with_sheet_name("Staff");
    let bytes = ops::write_list::<UmyaAdapter, _, _>(&employees(), &fields(), &options, None).unwrap();
    assert!(bytes.len() > 100, "expected non-trivial xlsx output");

    let back = ops::read_list::<UmyaAdapter, _>(
        &bytes,
        &SheetRef::name("Staff"),
        &ReadOptions::default(),
        &fields(),
        None,
    )
    .unwrap();
    assert_eq!(back, employees());
}

#[test]
fn date_formatted_numbers_read_as_dates() {
    let bytes = build_bytes(|book| {
        let sh = book.get_sheet_by_name_mut("Sheet1").unwrap();
        sh.get_cell_mut((1, 1)).set_value("Joined");
        sh.get_cell_mut((2, 1)).set_value("Amount");
        sh.get_cell_mut((1, 2)).set_value_number(44000);
        let _ = sh
            .get_style_mut((1, 2))
            .get_number_format_mut()
            .set_format_code(umya_spreadsheet::NumberingFormat::FORMAT_DATE_YYYYMMDD2);
        sh.get_cell_mut((2, 2)).set_value_number(44000);
    });

    let table = ops::read_table::<UmyaAdapter>(&bytes, &SheetRef::First, &ReadOptions::default(), None)
        .unwrap();
    let joined = NaiveDate::from_ymd_opt(2020, 6, 18)
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .unwrap();
    assert_eq!(table.get(0, "Joined"), Some(&CellValue::DateTime(joined)));
    assert_eq!(table.get(0, "Amount"), Some(&CellValue::Number(44000.0)));

    let profiles = ColumnMapRegistry::new()
        .with(ColumnMapProfile::pass_through("Joined").with_declared(ValueKind::Number))
        .unwrap();
    let table = ops::read_table::<UmyaAdapter>(
        &bytes,
        &SheetRef::First,
        &ReadOptions::new().with_profiles(profiles),
        None,
    )
    .unwrap();
    assert_eq!(table.get(0, "Joined"), Some(&CellValue::Number(44000.0)));
}

#[test]
fn missing_sheet_and_bad_cells_are_reported() {
    let bytes = build_bytes(|book| {
        let sh = book.get_sheet_by_name_mut("Sheet1").unwrap();
        sh.get_cell_mut((1, 1)).set_value("Age");
        sh.get_cell_mut((1, 2)).set_value_number(30);
        sh.get_cell_mut((1, 3)).set_value_string("abc");
    });

    let err = ops::read_table::<UmyaAdapter>(
        &bytes,
        &SheetRef::name("Nonexistent"),
        &ReadOptions::default(),
        None,
    )
    .unwrap_err();
    assert!(matches!(err, MapError::SheetNotFound(ref n) if n == "Nonexistent"));

    let err = ops::read_list::<UmyaAdapter, _>(
        &bytes,
        &SheetRef::First,
        &ReadOptions::default(),
        &fields(),
        None,
    )
    .unwrap_err();
    assert!(matches!(err, MapError::Conversion { row: 3, column: 1, .. }), "{err}");
}

#[test]
fn table_write_styles_header_and_keeps_text() {
    let mut table = DataTable::new(["Code"]);
    table.push_row(vec![CellValue::from("0042")]);
    let bytes = ops::write_table::<UmyaAdapter>(&table, &WriteOptions::default(), None).unwrap();

    let book = umya_spreadsheet::reader::xlsx::read_reader(std::io::Cursor::new(bytes.clone()), true)
        .unwrap();
    let sheet = book.get_sheet_by_name("Sheet1").unwrap();
    assert_eq!(sheet.get_value((1, 1)), "Code");
    assert!(sheet.get_style((1, 1)).get_font().is_some());

    let back = ops::read_table::<UmyaAdapter>(&bytes, &SheetRef::First, &ReadOptions::default(), None)
        .unwrap();
    assert_eq!(back.get(0, "Code"), Some(&CellValue::from("0042")));
}

// Run with: `cargo test -p sheetmap-workbook --features calamine --test calamine`

use crate::common::build_bytes;
use chrono::NaiveDate;
use sheetmap::{CellValue, FieldAccessors, MapError, OpenBytes, ReadOptions, SheetRef, Workbook};
use sheetmap_workbook::{CalamineAdapter, ops};
use umya_spreadsheet::NumberingFormat;

#[derive(Debug, Default, Clone, PartialEq)]
struct Shipment {
    code: String,
    shipped: NaiveDate,
    weight: f64,
}

fn fields() -> FieldAccessors<Shipment> {
    FieldAccessors::new()
        .field("Code", |s: &Shipment| s.code.clone(), |s, v| s.code = v)
        .field("Shipped", |s: &Shipment| s.shipped, |s, v| s.shipped = v)
        .field("Weight", |s: &Shipment| s.weight, |s, v| s.weight = v)
}

fn fixture() -> Vec<u8> {
    build_bytes(|book| {
        let sh = book.get_sheet_by_name_mut("Sheet1").unwrap();
        sh.get_cell_mut((1, 1)).set_value("Code");
        sh.get_cell_mut((2, 1)).set_value("Shipped");
        sh.get_cell_mut((3, 1)).set_value("Weight");

        sh.get_cell_mut((1, 2)).set_value("A-1");
        sh.get_cell_mut((2, 2)).set_value_number(44986);
        let _ = sh
            .get_style_mut((2, 2))
            .get_number_format_mut()
            .set_format_code(NumberingFormat::FORMAT_DATE_XLSX14);
        sh.get_cell_mut((3, 2)).set_value_number(12.5);

        sh.get_cell_mut((1, 3)).set_value("B-2");
        sh.get_cell_mut((2, 3)).set_value_number(45000);
        let _ = sh
            .get_style_mut((2, 3))
            .get_number_format_mut()
            .set_format_code(NumberingFormat::FORMAT_DATE_XLSX14);
        sh.get_cell_mut((3, 3)).set_value_number(3);
    })
}

#[test]
fn calamine_reads_date_formatted_serials() {
    let table =
        ops::read_table::<CalamineAdapter>(&fixture(), &SheetRef::First, &ReadOptions::default(), None)
            .unwrap();
    let expected = NaiveDate::from_ymd_opt(2023, 3, 1)
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .unwrap();
    assert_eq!(table.get(0, "Shipped"), Some(&CellValue::DateTime(expected)));
    assert_eq!(table.get(0, "Weight"), Some(&CellValue::Number(12.5)));
}

#[test]
fn calamine_typed_read() {
    let shipments = ops::read_list::<CalamineAdapter, _>(
        &fixture(),
        &SheetRef::name("sheet1"),
        &ReadOptions::default(),
        &fields(),
        None,
    )
    .unwrap();
    assert_eq!(
        shipments,
        vec![
            Shipment {
                code: "A-1".into(),
                shipped: NaiveDate::from_ymd_opt(2023, 3, 1).unwrap(),
                weight: 12.5,
            },
            Shipment {
                code: "B-2".into(),
                shipped: NaiveDate::from_ymd_opt(2023, 3, 15).unwrap(),
                weight: 3.0,
            },
        ]
    );
}

#[test]
fn calamine_lists_sheets_and_rejects_garbage() {
    let adapter = CalamineAdapter::open_bytes(&fixture()).unwrap();
    assert_eq!(adapter.sheet_count(), 1);
    assert_eq!(adapter.sheet_name(0).as_deref(), Some("Sheet1"));

    let err = ops::read_table::<CalamineAdapter>(
        b"not a zip archive",
        &SheetRef::First,
        &ReadOptions::default(),
        None,
    )
    .unwrap_err();
    assert!(matches!(err, MapError::Backend { backend: "calamine", .. }), "{err}");
}

#![cfg(feature = "json")]

use std::sync::Arc;

use chrono::NaiveDate;
use sheetmap::{
    CancellationToken, CellValue, ColumnMapProfile, ColumnMapRegistry, ConvertError, DataTable,
    FieldAccessors, Locale, MapError, ReadOptions, SheetRef, WriteOptions,
};
use sheetmap_workbook::{JsonAdapter, ops, worker};

#[derive(Debug, Default, Clone, PartialEq)]
struct Order {
    id: u32,
    customer: String,
    placed: NaiveDate,
    total: f64,
}

fn order_fields() -> FieldAccessors<Order> {
    FieldAccessors::new()
        .field("Id", |o: &Order| o.id, |o, v| o.id = v)
        .field("Customer", |o: &Order| o.customer.clone(), |o, v| o.customer = v)
        .field("Placed", |o: &Order| o.placed, |o, v| o.placed = v)
        .field("Total", |o: &Order| o.total, |o, v| o.total = v)
}

fn orders() -> Vec<Order> {
    (1..=4)
        .map(|i| Order {
            id: i,
            customer: format!("c{i}"),
            placed: NaiveDate::from_ymd_opt(2024, 1, i).unwrap(),
            total: f64::from(i) * 10.5,
        })
        .collect()
}

fn profiles() -> ColumnMapRegistry {
    ColumnMapRegistry::new()
        .with(ColumnMapProfile::new("Id", "Order #"))
        .unwrap()
        .with(ColumnMapProfile::new("Customer", "Customer Name"))
        .unwrap()
        .with(ColumnMapProfile::new("Placed", "Placed On"))
        .unwrap()
        .with(ColumnMapProfile::new("Total", "Total"))
        .unwrap()
}

#[test]
fn json_list_round_trip() {
    let write_options = WriteOptions::new()
        .with_profiles(profiles())
        .with_sheet_name("Orders");
    let bytes =
        ops::write_list::<JsonAdapter, _, _>(&orders(), &order_fields(), &write_options, None)
            .unwrap();

    let read_options = ReadOptions::new().with_profiles(profiles());
    let back = ops::read_list::<JsonAdapter, _>(
        &bytes,
        &SheetRef::name("orders"),
        &read_options,
        &order_fields(),
        None,
    )
    .unwrap();
    assert_eq!(back, orders());

    let limited = ops::read_list::<JsonAdapter, _>(
        &bytes,
        &SheetRef::First,
        &read_options.clone().with_row_count(2),
        &order_fields(),
        None,
    )
    .unwrap();
    assert_eq!(limited, &orders()[..2]);
}

#[test]
fn json_table_and_column_round_trip() {
    let mut table = DataTable::new(["Code", "Qty"]);
    table.push_row(vec![CellValue::from("A-1"), CellValue::Number(3.0)]);
    table.push_row(vec![CellValue::from("B-2"), CellValue::Empty]);
    let bytes = ops::write_table::<JsonAdapter>(&table, &WriteOptions::default(), None).unwrap();
    let back =
        ops::read_table::<JsonAdapter>(&bytes, &SheetRef::First, &ReadOptions::default(), None)
            .unwrap();
    assert_eq!(back, table);

    let bytes = ops::write_column::<JsonAdapter, _>(
        [5_i64, 6, 7],
        3,
        2,
        None,
        &WriteOptions::default(),
        None,
    )
    .unwrap();
    let values: Vec<i64> = ops::read_column::<JsonAdapter, _>(
        &bytes,
        &SheetRef::First,
        3,
        2,
        None,
        &ReadOptions::default(),
        None,
    )
    .unwrap();
    assert_eq!(values, vec![5, 6, 7]);
}

#[test]
fn json_column_conversions_and_supplier() {
    let to_code = |v: &CellValue, _: &Locale| -> Result<CellValue, ConvertError> {
        Ok(CellValue::Text(format!("SKU-{}", v.to_text())))
    };
    let bytes = ops::write_column_with::<JsonAdapter, _, _>(
        || vec![10_u32, 20],
        2,
        1,
        Some(&to_code),
        &WriteOptions::default(),
        None,
    )
    .unwrap();

    let from_code = |v: &CellValue, _: &Locale| -> Result<u32, ConvertError> {
        let text = v.to_text();
        text.strip_prefix("SKU-")
            .and_then(|n| n.parse().ok())
            .ok_or_else(|| ConvertError::new("u32", text.clone()))
    };
    let values = ops::read_column::<JsonAdapter, u32>(
        &bytes,
        &SheetRef::First,
        2,
        1,
        Some(&from_code),
        &ReadOptions::default(),
        None,
    )
    .unwrap();
    assert_eq!(values, vec![10, 20]);

    let raw = ops::read_column::<JsonAdapter, String>(
        &bytes,
        &SheetRef::First,
        2,
        1,
        None,
        &ReadOptions::default(),
        None,
    )
    .unwrap();
    assert_eq!(raw, vec!["SKU-10", "SKU-20"]);
}

#[test]
fn malformed_bytes_are_backend_errors() {
    let err = ops::read_table::<JsonAdapter>(
        b"not json",
        &SheetRef::First,
        &ReadOptions::default(),
        None,
    )
    .unwrap_err();
    assert!(matches!(err, MapError::Backend { backend: "json", .. }));
}

#[test]
fn invalid_options_fail_before_decoding() {
    let err = ops::read_table::<JsonAdapter>(
        b"not json",
        &SheetRef::First,
        &ReadOptions::new().with_first_column(0),
        None,
    )
    .unwrap_err();
    assert!(matches!(err, MapError::InvalidOptions { .. }));
}

#[test]
fn cancelled_read_reports_cancellation() {
    let bytes = ops::write_list::<JsonAdapter, _, _>(
        &orders(),
        &order_fields(),
        &WriteOptions::default(),
        None,
    )
    .unwrap();
    let token = CancellationToken::new();
    token.cancel();
    let err = ops::read_list::<JsonAdapter, _>(
        &bytes,
        &SheetRef::First,
        &ReadOptions::default(),
        &order_fields(),
        Some(&token),
    )
    .unwrap_err();
    assert!(err.is_cancelled());
}

#[test]
fn worker_runs_read_and_write_off_thread() {
    let options = Arc::new(WriteOptions::new().with_profiles(profiles()));
    let bytes = worker::spawn_write_list::<JsonAdapter, _, _>(orders(), order_fields(), options)
        .unwrap()
        .join()
        .unwrap();

    let read_options = Arc::new(ReadOptions::new().with_profiles(profiles()));
    let handle = worker::spawn_read_list::<JsonAdapter, _>(
        bytes,
        SheetRef::First,
        read_options,
        order_fields(),
    )
    .unwrap();
    assert_eq!(handle.join().unwrap(), orders());
}

#[test]
fn worker_cancellation_is_observed() {
    let handle = worker::spawn::<(), _>("sheetmap-test", |token| {
        while !token.is_cancelled() {
            std::thread::yield_now();
        }
        Err(MapError::Cancelled)
    })
    .unwrap();
    handle.cancel();
    assert!(handle.join().unwrap_err().is_cancelled());
}

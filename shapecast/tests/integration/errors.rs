//! Error message snapshots.

use shapecast::{Config, ErrorKind, RecordType, Type, from_value, from_value_with, value};

use crate::{line, point};

#[test]
fn wrong_type_message() {
    shapecast_testhelpers::setup();

    let point = point();
    let err = from_value(&line(&point), &value!({"start": {"x": 0, "y": "0"}, "end": {}})).unwrap_err();
    insta::assert_snapshot!(err, @r#"at start.y: wrong value type: expected `int`, got "0" (str)"#);
}

#[test]
fn missing_value_message() {
    shapecast_testhelpers::setup();

    let err = from_value(&point(), &value!({"y": 1})).unwrap_err();
    insta::assert_snapshot!(err, @"at x: missing value for required field");
}

#[test]
fn union_match_message() {
    shapecast_testhelpers::setup();

    let record = RecordType::builder("Id")
        .field("id", Type::union([Type::INT, Type::STR]))
        .build();
    let err = from_value(&record, &value!({"id": 1.5})).unwrap_err();
    insta::assert_snapshot!(err, @"at id: cannot match 1.5 (float) to any member of `int | str`");
}

#[test]
fn strict_union_message() {
    shapecast_testhelpers::setup();

    let a = RecordType::builder("A").field("x", Type::INT).build();
    let b = RecordType::builder("B").field("x", Type::INT).build();
    let record = RecordType::builder("Holder")
        .field("v", Type::union([Type::record(&a), Type::record(&b)]))
        .build();
    let config = Config::new().strict_unions_match(true);
    let err = from_value_with(&record, &value!({"v": {"x": 1}}), &config).unwrap_err();
    insta::assert_snapshot!(err, @"at v: ambiguous union match between `A`, `B`");
}

#[test]
fn unexpected_data_message() {
    shapecast_testhelpers::setup();

    let config = Config::new().strict(true);
    let err = from_value_with(&point(), &value!({"x": 1, "y": 2, "z": 3, "a": 4}), &config).unwrap_err();
    insta::assert_snapshot!(err, @"unexpected data for `Point`: `a`, `z`");
}

#[test]
fn cast_message() {
    shapecast_testhelpers::setup();

    let record = RecordType::builder("Count").field("n", Type::INT).build();
    let config = Config::new().cast(Type::INT);
    let err = from_value_with(&record, &value!({"n": "many"}), &config).unwrap_err();
    insta::assert_snapshot!(err, @r#"at n: cannot cast "many" (str) to `int`: invalid integer literal "many""#);
}

#[test]
fn error_codes_are_stable() {
    shapecast_testhelpers::setup();

    let err = from_value(&point(), &value!([])).unwrap_err();
    assert!(matches!(err.kind(), ErrorKind::WrongType { .. }));
    assert_eq!(err.kind().code(), "shapecast::wrong_type");
    insta::assert_snapshot!(err, @"wrong value type: expected `Point`, got [] (list)");
}

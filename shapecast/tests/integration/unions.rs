use core::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use shapecast::{Config, ErrorKind, RecordType, Type, Value, from_value, from_value_with, value};

use crate::point;

fn twins() -> (RecordType, RecordType) {
    let a = RecordType::builder("A").field("x", Type::INT).build();
    let b = RecordType::builder("B").field("x", Type::INT).build();
    (a, b)
}

#[shapecast_testhelpers::test]
fn optional_null_never_reaches_the_hook() {
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&calls);
    let config = Config::new().type_hook(Type::INT, move |value| {
        counter.fetch_add(1, Ordering::SeqCst);
        value.clone()
    });
    let record = RecordType::builder("R")
        .field("n", Type::optional(Type::INT))
        .build();

    let instance = from_value_with(&record, &value!({"n": null}), &config).unwrap();
    assert_eq!(instance.get("n"), Some(&Value::Null));
    let instance = from_value_with(&record, &value!({}), &config).unwrap();
    assert_eq!(instance.get("n"), Some(&Value::Null));
    assert_eq!(calls.load(Ordering::SeqCst), 0);

    from_value_with(&record, &value!({"n": 5}), &config).unwrap();
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[shapecast_testhelpers::test]
fn lenient_union_picks_first_declared_match() {
    let (a, b) = twins();
    let record = RecordType::builder("Holder")
        .field("v", Type::union([Type::record(&a), Type::record(&b)]))
        .build();

    let instance = from_value(&record, &value!({"v": {"x": 1}})).unwrap();
    let inner = instance.get("v").and_then(Value::as_record).unwrap();
    assert_eq!(inner.record(), &a);
}

#[shapecast_testhelpers::test]
fn strict_union_fails_naming_every_match() {
    let (a, b) = twins();
    let record = RecordType::builder("Holder")
        .field("v", Type::union([Type::record(&a), Type::record(&b)]))
        .build();
    let config = Config::new().strict_unions_match(true);

    let err = from_value_with(&record, &value!({"v": {"x": 1}}), &config).unwrap_err();
    assert_eq!(err.path().to_string(), "v");
    let ErrorKind::StrictUnionMatch { matches } = err.kind() else {
        panic!("unexpected error: {err}");
    };
    let types: Vec<&Type> = matches.iter().map(|(ty, _)| ty).collect();
    assert_eq!(types, [&Type::record(&a), &Type::record(&b)]);
}

#[shapecast_testhelpers::test]
fn union_members_that_fail_are_skipped() {
    let with_a = RecordType::builder("WithA").field("a", Type::INT).build();
    let with_b = RecordType::builder("WithB").field("b", Type::STR).build();
    let record = RecordType::builder("Holder")
        .field(
            "v",
            Type::union([Type::record(&with_a), Type::record(&with_b), Type::list(Type::INT)]),
        )
        .build();

    let instance = from_value(&record, &value!({"v": {"b": "x"}})).unwrap();
    assert_eq!(
        instance.get("v").and_then(Value::as_record).map(|i| i.record()),
        Some(&with_b)
    );

    let instance = from_value(&record, &value!({"v": [1, 2]})).unwrap();
    assert_eq!(instance.get("v"), Some(&value!([1, 2])));

    let err = from_value(&record, &value!({"v": "nope"})).unwrap_err();
    assert!(matches!(err.kind(), ErrorKind::UnionMatch { value, .. } if *value == Value::from("nope")));
}

#[shapecast_testhelpers::test]
fn unmatched_union_passes_through_without_type_checks() {
    let record = RecordType::builder("R")
        .field("v", Type::union([Type::INT, Type::STR]))
        .build();
    let config = Config::new().check_types(false);
    let instance = from_value_with(&record, &value!({"v": 1.5}), &config).unwrap();
    assert_eq!(instance.get("v"), Some(&Value::Float(1.5)));
}

#[shapecast_testhelpers::test]
fn optional_record_errors_propagate() {
    let point = point();
    let record = RecordType::builder("Marker")
        .field("at", Type::optional(Type::record(&point)))
        .build();

    let instance = from_value(&record, &value!({"at": {"x": 1, "y": 2}})).unwrap();
    assert!(instance.get("at").and_then(Value::as_record).is_some());

    let err = from_value(&record, &value!({"at": {"x": 1}})).unwrap_err();
    assert_eq!(err.path().to_string(), "at.y");
    assert!(matches!(err.kind(), ErrorKind::MissingValue));
}

use core::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use shapecast::{
    Config, DefaultReflector, Engine, ErrorKind, FieldDef, FrozenAssignment, Hints, Namespace,
    RecordType, Reflector, Type, UnresolvedReference, Value, from_value, from_value_with,
    is_instance, value,
};

use crate::{line, point};

#[shapecast_testhelpers::test]
fn conforming_record_round_trips() {
    let point = point();
    let data = value!({"x": 1, "y": 2});
    let instance = from_value(&point, &data).unwrap();
    assert_eq!(instance.get("x"), Some(&Value::Int(1)));
    assert_eq!(instance.get("y"), Some(&Value::Int(2)));
    assert_eq!(instance.to_value(), data);
}

#[shapecast_testhelpers::test]
fn rematerializing_a_flattened_instance_is_idempotent() {
    let point = point();
    let line = line(&point);
    let data = value!({
        "start": {"x": 0, "y": 0},
        "end": {"x": 3, "y": 4},
        "label": "diagonal"
    });

    let first = from_value(&line, &data).unwrap();
    let flat = Value::Record(first.clone()).flatten();
    assert_eq!(flat, data);

    let second = from_value(&line, &flat).unwrap();
    assert_eq!(first, second);
    assert!(is_instance(&Value::Record(second), &Type::record(&line)));
}

#[shapecast_testhelpers::test]
fn nested_errors_carry_the_full_path() {
    let point = point();
    let line = line(&point);
    let data = value!({"start": {"x": 0, "y": "0"}, "end": {"x": 3, "y": 4}});
    let err = from_value(&line, &data).unwrap_err();
    assert_eq!(err.path().segments(), ["start", "y"]);
    assert!(matches!(
        err.kind(),
        ErrorKind::WrongType { expected, value } if *expected == Type::INT && *value == Value::from("0")
    ));

    let data = value!({"start": {"x": 0}, "end": {"x": 3, "y": 4}});
    let err = from_value(&line, &data).unwrap_err();
    assert_eq!(err.path().to_string(), "start.y");
    assert!(matches!(err.kind(), ErrorKind::MissingValue));
}

#[shapecast_testhelpers::test]
fn default_factory_runs_fresh_every_call() {
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&calls);
    let record = RecordType::builder("Bag")
        .field_def(
            FieldDef::new("items", Type::list(Type::INT)).with_default_factory(move || {
                counter.fetch_add(1, Ordering::SeqCst);
                Value::list(Vec::<Value>::new())
            }),
        )
        .field_def(FieldDef::new("size", Type::INT).with_default(0))
        .build();

    let a = from_value(&record, &value!({})).unwrap();
    let b = from_value(&record, &value!({})).unwrap();
    assert_eq!(calls.load(Ordering::SeqCst), 2);
    assert_eq!(a.get("items"), Some(&Value::list(Vec::<Value>::new())));
    assert_eq!(b.get("size"), Some(&Value::Int(0)));

    // a provided value means the factory is not consulted
    from_value(&record, &value!({"items": [1]})).unwrap();
    assert_eq!(calls.load(Ordering::SeqCst), 2);
}

#[shapecast_testhelpers::test]
fn inherited_fields_come_first() {
    let base = RecordType::builder("Base")
        .field("id", Type::INT)
        .field_def(FieldDef::new("name", Type::STR).with_default("anon"))
        .build();
    let user = RecordType::builder("User")
        .extends(&base)
        .field("email", Type::STR)
        .field("name", Type::STR)
        .build();

    let names: Vec<&str> = user.fields().iter().map(FieldDef::name).collect();
    assert_eq!(names, ["id", "name", "email"]);

    let instance = from_value(&user, &value!({"id": 1, "name": "a", "email": "a@b"})).unwrap();
    assert!(is_instance(&Value::Record(instance.clone()), &Type::record(&base)));

    let err = from_value(&user, &value!({"id": 1, "email": "a@b"})).unwrap_err();
    assert_eq!(err.path().to_string(), "name");
}

fn scaled() -> RecordType {
    RecordType::builder("Scaled")
        .field("value", Type::INT)
        .field("factor", Type::init_var(Type::INT))
        .field_def(FieldDef::new("scaled", Type::INT).no_init())
        .post_init(|fields, init_vars| {
            let value = fields
                .get("value")
                .and_then(Value::as_int)
                .ok_or("value must be an int")?;
            let factor = init_vars
                .get("factor")
                .and_then(Value::as_int)
                .ok_or("factor must be an int")?;
            if factor == 0 {
                return Err("factor must not be zero".to_string());
            }
            fields.insert("scaled".to_string(), Value::Int(value * factor));
            Ok(())
        })
        .build()
}

#[shapecast_testhelpers::test]
fn init_only_fields_reach_post_init() {
    let instance = from_value(&scaled(), &value!({"value": 3, "factor": 4})).unwrap();
    assert_eq!(instance.get("scaled"), Some(&Value::Int(12)));
    assert_eq!(instance.get("factor"), None);
}

#[shapecast_testhelpers::test]
fn post_init_failure_is_a_construct_error() {
    let err = from_value(&scaled(), &value!({"value": 3, "factor": 0})).unwrap_err();
    assert!(err.path().is_empty());
    assert!(matches!(
        err.kind(),
        ErrorKind::Construct { record, message }
            if record == "Scaled" && message == "post-init failed: factor must not be zero"
    ));
}

#[shapecast_testhelpers::test]
fn frozen_records_drop_post_construction_values() {
    let record = RecordType::builder("Settings")
        .field("mode", Type::STR)
        .field_def(FieldDef::new("cached", Type::BOOL).with_default(false).no_init())
        .frozen()
        .build();
    let data = value!({"mode": "fast", "cached": true});

    let mut instance = from_value(&record, &data).unwrap();
    assert_eq!(instance.get("cached"), Some(&Value::Bool(false)));
    assert!(instance.set("mode", Value::from("slow")).is_err());

    let config = Config::new().frozen_assignment(FrozenAssignment::Error);
    let err = from_value_with(&record, &data, &config).unwrap_err();
    assert_eq!(err.path().to_string(), "cached");
    assert!(matches!(err.kind(), ErrorKind::FrozenAssignment { record } if record == "Settings"));
}

/// Answers `is_frozen` with a fixed value, delegating everything else.
struct FrozenOverride(bool);

impl Reflector for FrozenOverride {
    fn fields(&self, record: &RecordType) -> Vec<FieldDef> {
        DefaultReflector.fields(record)
    }

    fn resolve_hints(
        &self,
        record: &RecordType,
        namespace: Option<&Namespace>,
    ) -> Result<Hints, UnresolvedReference> {
        DefaultReflector.resolve_hints(record, namespace)
    }

    fn is_frozen(&self, _record: &RecordType) -> bool {
        self.0
    }
}

#[shapecast_testhelpers::test]
fn reflector_cannot_unfreeze_a_frozen_record() {
    let record = RecordType::builder("Settings")
        .field("mode", Type::STR)
        .field_def(FieldDef::new("cached", Type::BOOL).with_default(false).no_init())
        .frozen()
        .build();
    let engine = Engine::default().with_reflector(FrozenOverride(false));

    let instance = engine
        .from_value(&record, &value!({"mode": "fast", "cached": true}), &Config::default())
        .unwrap();
    assert_eq!(instance.get("cached"), Some(&Value::Bool(false)));
}

#[shapecast_testhelpers::test]
fn reflector_can_freeze_a_mutable_record() {
    let record = RecordType::builder("Counter")
        .field("start", Type::INT)
        .field_def(FieldDef::new("hits", Type::INT).with_default(0).no_init())
        .build();
    let engine = Engine::default().with_reflector(FrozenOverride(true));
    let data = value!({"start": 1, "hits": 7});

    let instance = engine.from_value(&record, &data, &Config::default()).unwrap();
    assert_eq!(instance.get("hits"), Some(&Value::Int(0)));

    let config = Config::new().frozen_assignment(FrozenAssignment::Error);
    let err = engine.from_value(&record, &data, &config).unwrap_err();
    assert_eq!(err.path().to_string(), "hits");
    assert!(matches!(err.kind(), ErrorKind::FrozenAssignment { record } if record == "Counter"));
}

#[shapecast_testhelpers::test]
fn non_frozen_records_assign_non_init_fields() {
    let record = RecordType::builder("Counter")
        .field("start", Type::INT)
        .field_def(FieldDef::new("hits", Type::INT).with_default(0).no_init())
        .build();
    let instance = from_value(&record, &value!({"start": 1, "hits": 7})).unwrap();
    assert_eq!(instance.get("hits"), Some(&Value::Int(7)));
    let instance = from_value(&record, &value!({"start": 1})).unwrap();
    assert_eq!(instance.get("hits"), Some(&Value::Int(0)));
}

#[shapecast_testhelpers::test]
fn non_map_input_fails_at_the_root() {
    let err = from_value(&point(), &Value::list([1, 2])).unwrap_err();
    assert!(err.path().is_empty());
    assert!(matches!(err.kind(), ErrorKind::WrongType { .. }));
}

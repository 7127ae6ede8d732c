use shapecast::{Config, ErrorKind, Namespace, RecordType, Type, Value, from_value, from_value_with, value};

#[shapecast_testhelpers::test]
fn self_referential_records() {
    let node = RecordType::builder("Node")
        .field("value", Type::INT)
        .field("next", Type::optional(Type::forward("Node")))
        .build();
    let data = value!({"value": 1, "next": {"value": 2, "next": {"value": 3}}});

    let instance = from_value(&node, &data).unwrap();
    let mut values = Vec::new();
    let mut current = Some(&instance);
    while let Some(node) = current {
        values.push(node.get("value").and_then(Value::as_int));
        current = node.get("next").and_then(Value::as_record);
    }
    assert_eq!(values, [Some(1), Some(2), Some(3)]);
}

#[shapecast_testhelpers::test]
fn config_namespace_supplies_missing_names() {
    let leaf = RecordType::builder("Leaf").field("id", Type::INT).build();
    let tree = RecordType::builder("Tree")
        .field("children", Type::list(Type::forward("Leaf")))
        .build();
    let data = value!({"children": [{"id": 1}, {"id": 2}]});

    let err = from_value(&tree, &data).unwrap_err();
    assert!(err.path().is_empty());
    assert!(matches!(err.kind(), ErrorKind::ForwardReference { name } if name == "Leaf"));

    let config = Config::new().forward_references(Namespace::new().with("Leaf", &leaf));
    let instance = from_value_with(&tree, &data, &config).unwrap();
    assert_eq!(instance.to_value(), data);
}

#[shapecast_testhelpers::test]
fn unresolved_names_in_nested_records_report_no_path() {
    let inner = RecordType::builder("Inner")
        .field("x", Type::forward("Nowhere"))
        .build();
    let outer = RecordType::builder("Outer")
        .field("inner", Type::record(&inner))
        .build();

    let err = from_value(&outer, &value!({"inner": {"x": 1}})).unwrap_err();
    assert!(err.path().is_empty());
    assert_eq!(err.to_string(), "cannot resolve forward reference `Nowhere`");
}

#[shapecast_testhelpers::test]
fn record_namespaces_are_inherited() {
    let leaf = RecordType::builder("Leaf").field("id", Type::INT).build();
    let base = RecordType::builder("Base")
        .namespace(Namespace::new().with("Child", &leaf))
        .build();
    let derived = RecordType::builder("Derived")
        .extends(&base)
        .field("child", Type::forward("Child"))
        .build();

    let instance = from_value(&derived, &value!({"child": {"id": 7}})).unwrap();
    let child = instance.get("child").and_then(Value::as_record).unwrap();
    assert_eq!(child.record(), &leaf);
}

use hoplite_core::{
    ConfigFailure, ConfigLoader, DecoderRegistry, RecordShape, Shape, Value, decode,
};
use hoplite_json::{JsonParser, parse_node};
use std::fs;
use tempfile::TempDir;

fn shape() -> Shape {
    Shape::record(
        RecordShape::new("Cluster")
            .field("name", Shape::string())
            .field("nodes", Shape::set(Shape::string()))
            .field("limits", Shape::map(Shape::long()))
            .field_with_default("replicas", Shape::int(), || Value::Long(1)),
    )
}

#[test]
fn decodes_record_from_json() {
    let node = parse_node(
        r#"{"name": "east", "nodes": ["a", "b", "a"], "limits": {"cpu": 4, "mem": 16}}"#,
        "cluster.json",
    )
    .unwrap();

    let Value::Record { name, fields } =
        decode(&node, &shape(), &DecoderRegistry::defaults()).unwrap()
    else {
        panic!("expected a record");
    };
    assert_eq!(name, "Cluster");
    assert_eq!(fields["name"], Value::String("east".into()));
    assert_eq!(
        fields["nodes"],
        Value::set_of(vec![Value::String("a".into()), Value::String("b".into())])
    );
    assert_eq!(fields["replicas"], Value::Long(1));
    let Value::Map(limits) = &fields["limits"] else {
        panic!("expected a map");
    };
    assert_eq!(limits["mem"], Value::Long(16));
}

#[test]
fn nested_path_from_json() {
    let node = parse_node(r#"{"outer": {"inner": true}}"#, "nested.json").unwrap();
    let shape = Shape::record(RecordShape::new("Outer").field(
        "outer",
        Shape::record(RecordShape::new("Inner").field("inner", Shape::long())),
    ));

    let err = decode(&node, &shape, &DecoderRegistry::defaults()).unwrap_err();
    let report = err.report();
    assert!(report.contains("Could not decode Boolean at <root>.outer.inner as Long"));
    assert!(report.contains("(nested.json:"));
}

#[test]
fn map_entry_failures_are_keyed() {
    let node = parse_node(
        r#"{"name": "x", "nodes": "a,b", "limits": {"cpu": "many", "mem": 1}}"#,
        "cluster.json",
    )
    .unwrap();

    let err = decode(&node, &shape(), &DecoderRegistry::defaults()).unwrap_err();
    let ConfigFailure::StructuredDecodeFailure { failures, .. } = err.first() else {
        panic!("expected a structured failure");
    };
    let ConfigFailure::FieldFailure { field, failures } = failures.first() else {
        panic!("expected a field failure");
    };
    assert_eq!(field, "limits");
    let ConfigFailure::CollectionElementErrors { kind, failures, .. } = failures.first() else {
        panic!("expected collection errors");
    };
    assert_eq!(kind, "Map");
    assert!(matches!(
        failures.first(),
        ConfigFailure::FieldFailure { field, .. } if field == "cpu"
    ));
}

#[test]
fn loader_selects_json_parser_by_extension() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("cluster.JSON");
    fs::write(&path, r#"{"name": "w", "nodes": [], "limits": {}}"#).unwrap();

    let loader = ConfigLoader::builder().add_parser(JsonParser).build();
    let value = loader.load_value(&path, &shape()).unwrap();
    let Value::Record { fields, .. } = value else {
        panic!("expected a record");
    };
    assert_eq!(fields["nodes"], Value::Set(vec![]));
}

use composer_core::catalog;
use composer_core::{ComposeError, PrimitiveRegistry, PrimitiveSpec, TypeName};

const LIBRARY: &str = r#"
primitives:
  - name: add
    inputs:
      - { name: x, type: int }
      - { name: y, type: int }
    outputs: [int]
  - name: split
    inputs:
      - { name: s, type: str }
    outputs: [str, str]
"#;

#[test]
fn yaml_registry_preserves_order_and_signatures() {
    let registry = PrimitiveRegistry::from_yaml_str(LIBRARY).unwrap();
    assert_eq!(registry.len(), 2);
    let (id, spec) = registry.by_name("split").unwrap();
    assert_eq!(id.index(), 1);
    assert_eq!(spec.outputs, vec![TypeName::new("str"), TypeName::new("str")]);
    assert_eq!(registry.get(id).unwrap().inputs[0].name, "s");
    assert!(registry.produces(&TypeName::new("int")));
    assert!(!registry.produces(&TypeName::new("bool")));
}

#[test]
fn json_round_trip_keeps_catalog_identical() {
    let registry = catalog::standard();
    let json = registry.to_json_string().unwrap();
    let decoded = PrimitiveRegistry::from_json_str(&json).unwrap();
    let names: Vec<_> = decoded.iter().map(|(_, spec)| spec.name.clone()).collect();
    let expected: Vec<_> = registry.iter().map(|(_, spec)| spec.name.clone()).collect();
    assert_eq!(names, expected);
    let yaml = registry.to_yaml_string().unwrap();
    assert_eq!(PrimitiveRegistry::from_yaml_str(&yaml).unwrap().len(), registry.len());
}

#[test]
fn duplicate_names_are_rejected() {
    let err = PrimitiveRegistry::from_specs([
        PrimitiveSpec::new("add").input("x", "int").output("int"),
        PrimitiveSpec::new("add").input("y", "int").output("int"),
    ])
    .unwrap_err();
    assert!(matches!(err, ComposeError::InvalidSpecification(ref info) if info.code == "duplicate-primitive"));
}

#[test]
fn primitives_need_outputs_and_unique_parameters() {
    let mut registry = PrimitiveRegistry::new();
    let err = registry
        .push(PrimitiveSpec::new("sink").input("x", "int"))
        .unwrap_err();
    assert_eq!(err.code(), "primitive-without-outputs");

    let err = registry
        .push(PrimitiveSpec::new("pair").input("x", "int").input("x", "int").output("int"))
        .unwrap_err();
    assert_eq!(err.code(), "duplicate-parameter");
    assert!(registry.is_empty());
}

#[test]
fn unknown_ids_surface_as_specification_errors() {
    let registry = catalog::standard();
    let missing = composer_core::PrimitiveId::from_raw(registry.len() as u32);
    assert!(registry.get(missing).is_none());
    assert_eq!(registry.spec(missing).unwrap_err().code(), "unknown-primitive");
}

#[test]
fn catalog_mixes_the_three_base_types() {
    let registry = catalog::standard();
    for ty in [catalog::INT, catalog::FLOAT, catalog::STR] {
        assert!(registry.produces(&TypeName::new(ty)), "nothing produces {ty}");
    }
    let (_, repeat) = registry.by_name("str_repeat").unwrap();
    assert_eq!(repeat.input_types().count(&TypeName::new("int")), 1);
}

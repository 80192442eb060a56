use composer_core::{RunProvenance, SchemaVersion};

#[test]
fn minor_upgrades_stay_readable() {
    let reader = SchemaVersion::new(1, 2, 0);
    assert!(reader.is_compatible_with(&SchemaVersion::new(1, 0, 7)));
    assert!(reader.is_compatible_with(&SchemaVersion::new(1, 2, 3)));
    assert!(!reader.is_compatible_with(&SchemaVersion::new(1, 3, 0)));
    assert!(!reader.is_compatible_with(&SchemaVersion::new(2, 0, 0)));
}

#[test]
fn versions_render_dotted() {
    assert_eq!(SchemaVersion::default().to_string(), "1.0.0");
    assert_eq!(SchemaVersion::new(3, 1, 4).to_string(), "3.1.4");
}

#[test]
fn provenance_serializes_its_fingerprints() {
    let mut provenance = RunProvenance {
        seed: 11,
        registry_hash: "ab".into(),
        config_hash: "cd".into(),
        ..RunProvenance::default()
    };
    provenance
        .tool_versions
        .insert("composer-search".into(), "0.1.0".into());
    let json = serde_json::to_value(&provenance).unwrap();
    assert_eq!(json["seed"], 11);
    assert_eq!(json["registry_hash"], "ab");
    assert_eq!(json["tool_versions"]["composer-search"], "0.1.0");
    let back: RunProvenance = serde_json::from_value(json).unwrap();
    assert_eq!(back, provenance);
}

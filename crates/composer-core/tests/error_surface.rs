use composer_core::errors::{ComposeError, ErrorInfo};

fn sample_info(code: &str, message: &str) -> ErrorInfo {
    ErrorInfo::new(code, message)
        .with_context("depth", "2")
        .with_context("reason", "example")
}

#[test]
fn every_family_exposes_its_payload() {
    let errors = [
        ComposeError::EmptyRegistry(sample_info("R001", "no primitives")),
        ComposeError::UnsatisfiableFrontier(sample_info("U001", "stuck")),
        ComposeError::InvalidSpecification(sample_info("S001", "bad depth")),
        ComposeError::Graph(sample_info("G001", "cycle")),
        ComposeError::Serde(sample_info("J001", "bad json")),
    ];
    for err in &errors {
        assert!(err.info().context.contains_key("depth"));
        assert!(err.to_string().contains(err.code()));
    }
    assert!(errors[0].unresolved_types().is_empty());
}

#[test]
fn errors_round_trip_as_tagged_json() {
    let err = ComposeError::unsatisfiable(&["bool".into()], 3, 3);
    let json = serde_json::to_string(&err).unwrap();
    assert!(json.contains(r#""family":"UnsatisfiableFrontier""#));
    let back: ComposeError = serde_json::from_str(&json).unwrap();
    assert_eq!(back, err);
}

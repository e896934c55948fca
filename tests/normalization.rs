use json_ld_processing::rdf::parse_nquads;
use json_ld_processing::{normalize, normalize_dataset, ErrorCode, JsonLdOptions};
use serde_json::json;

#[test]
fn symmetric_blank_nodes_get_stable_labels() {
	let expected = "_:c14n0 <http://example.org/p> _:c14n1 .\n\
		_:c14n1 <http://example.org/p> _:c14n0 .\n";

	for input in [
		"_:x1 <http://example.org/p> _:x2 .\n_:x2 <http://example.org/p> _:x1 .\n",
		"_:x2 <http://example.org/p> _:x1 .\n_:x1 <http://example.org/p> _:x2 .\n",
		"_:other1 <http://example.org/p> _:other2 .\n_:other2 <http://example.org/p> _:other1 .\n",
	] {
		let dataset = parse_nquads(input).unwrap();
		let output = normalize_dataset(&dataset, &JsonLdOptions::new()).unwrap();
		assert_eq!(output, expected);
	}
}

#[test]
fn normalizes_documents_through_the_rdf_pipeline() {
	let doc = json!({
		"@context": {"@vocab": "http://example.org/"},
		"p": "v"
	});

	let output = normalize(&doc, &JsonLdOptions::new()).unwrap();
	assert_eq!(output, "_:c14n0 <http://example.org/p> \"v\" .\n");
}

#[test]
fn normalization_ignores_input_label_choice() {
	let doc_anonymous = json!({
		"@context": {"@vocab": "http://example.org/"},
		"knows": {"name": "Jane"}
	});
	let doc_labeled = json!({
		"@context": {"@vocab": "http://example.org/"},
		"@id": "_:someone",
		"knows": {"@id": "_:friend", "name": "Jane"}
	});

	let options = JsonLdOptions::new();
	assert_eq!(
		normalize(&doc_anonymous, &options).unwrap(),
		normalize(&doc_labeled, &options).unwrap()
	);
}

#[test]
fn unknown_formats_are_rejected() {
	let dataset = parse_nquads("_:a <http://example.org/p> \"x\" .\n").unwrap();
	let options = JsonLdOptions {
		format: Some("text/turtle".to_string()),
		..JsonLdOptions::default()
	};
	let err = normalize_dataset(&dataset, &options).unwrap_err();
	assert_eq!(err.code(), ErrorCode::UnknownFormat);
}

#[test]
fn nquads_format_is_accepted() {
	let dataset = parse_nquads("<http://a/s> <http://a/p> \"x\" .\n").unwrap();
	let options = JsonLdOptions {
		format: Some("application/nquads".to_string()),
		..JsonLdOptions::default()
	};
	let output = normalize_dataset(&dataset, &options).unwrap();
	assert_eq!(output, "<http://a/s> <http://a/p> \"x\" .\n");
}

#[test]
fn shared_structure_is_distinguished_by_paths() {
	// a three-node cycle: all first-degree hashes collide, path hashes must
	// resolve the labels deterministically
	let input = "\
		_:e0 <http://example.org/next> _:e1 .\n\
		_:e1 <http://example.org/next> _:e2 .\n\
		_:e2 <http://example.org/next> _:e0 .\n";
	let rotated = "\
		_:e1 <http://example.org/next> _:e2 .\n\
		_:e2 <http://example.org/next> _:e0 .\n\
		_:e0 <http://example.org/next> _:e1 .\n";

	let options = JsonLdOptions::new();
	let a = normalize_dataset(&parse_nquads(input).unwrap(), &options).unwrap();
	let b = normalize_dataset(&parse_nquads(rotated).unwrap(), &options).unwrap();
	assert_eq!(a, b);
	assert_eq!(a.matches("_:c14n").count(), 6);
}

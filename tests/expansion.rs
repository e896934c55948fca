use json_ld_processing::{
	expand, DocumentLoader, Error, ErrorCode, JsonLdOptions, RemoteDocument,
};
use serde_json::{json, Value};

/// Serves a vocabulary context for `http://schema.org/` without touching the
/// network.
struct SchemaLoader;

impl DocumentLoader for SchemaLoader {
	fn load_document(&self, url: &str) -> Result<RemoteDocument, Error> {
		assert_eq!(url, "http://schema.org/");
		Ok(RemoteDocument {
			document_url: url.to_string(),
			document: json!({"@context": {"@vocab": "http://schema.org/"}}),
			context_url: None,
		})
	}
}

fn options_with_schema_loader() -> JsonLdOptions {
	JsonLdOptions {
		document_loader: Some(Box::new(SchemaLoader)),
		..JsonLdOptions::default()
	}
}

#[test]
fn expands_document_with_remote_context() {
	let doc = json!({
		"@context": "http://schema.org/",
		"@type": "Person",
		"name": "Jane Doe"
	});

	let expanded = expand(&doc, &options_with_schema_loader()).unwrap();
	assert_eq!(
		expanded,
		json!([{
			"@type": ["http://schema.org/Person"],
			"http://schema.org/name": [{"@value": "Jane Doe"}]
		}])
	);
}

#[test]
fn expansion_is_idempotent() {
	let doc = json!({
		"@context": "http://schema.org/",
		"@type": "Person",
		"name": "Jane Doe"
	});
	let options = options_with_schema_loader();

	let once = expand(&doc, &options).unwrap();
	let twice = expand(&once, &JsonLdOptions::new()).unwrap();
	assert_eq!(once, twice);
}

#[test]
fn expands_coerced_list() {
	let doc = json!({
		"@context": {
			"ex": "http://example.org/",
			"ex:ls": {"@container": "@list"}
		},
		"ex:ls": [1, 2, 3]
	});

	let expanded = expand(&doc, &JsonLdOptions::new()).unwrap();
	assert_eq!(
		expanded,
		json!([{
			"http://example.org/ls": [{
				"@list": [{"@value": 1}, {"@value": 2}, {"@value": 3}]
			}]
		}])
	);
}

#[test]
fn nested_arrays_under_list_container_are_rejected() {
	let doc = json!({
		"@context": {
			"ex": "http://example.org/",
			"ex:ls": {"@container": "@list"}
		},
		"ex:ls": [[1]]
	});

	let err = expand(&doc, &JsonLdOptions::new()).unwrap_err();
	assert_eq!(err.code(), ErrorCode::ListOfLists);
}

#[test]
fn list_object_inside_list_is_rejected() {
	let doc = json!({
		"http://example.org/p": {"@list": [{"@list": ["x"]}]}
	});

	let err = expand(&doc, &JsonLdOptions::new()).unwrap_err();
	assert_eq!(err.code(), ErrorCode::ListOfLists);
}

#[test]
fn id_must_be_a_string() {
	let doc = json!({"@id": 5, "http://example.org/p": "x"});
	let err = expand(&doc, &JsonLdOptions::new()).unwrap_err();
	assert_eq!(err.code(), ErrorCode::InvalidIdValue);
}

#[test]
fn aliased_keyword_collides_with_the_real_one() {
	let doc = json!({
		"@context": {"id": "@id"},
		"@id": "http://example.org/a",
		"id": "http://example.org/b"
	});
	let err = expand(&doc, &JsonLdOptions::new()).unwrap_err();
	assert_eq!(err.code(), ErrorCode::CollidingKeywords);
}

#[test]
fn free_floating_scalar_expands_to_empty_list() {
	assert_eq!(expand(&json!(42), &JsonLdOptions::new()).unwrap(), json!([]));
	assert_eq!(expand(&json!(true), &JsonLdOptions::new()).unwrap(), json!([]));

	// scalars directly under @graph are free-floating too
	let doc = json!({"@graph": ["loose"]});
	assert_eq!(
		expand(&doc, &JsonLdOptions::new()).unwrap(),
		json!([])
	);
}

#[test]
fn id_coercion_produces_node_references() {
	let doc = json!({
		"@context": {
			"ex": "http://example.org/vocab#",
			"ex:contains": {"@type": "@id"}
		},
		"@id": "http://example.org/test#library",
		"ex:contains": "http://example.org/test#book"
	});

	let expanded = expand(&doc, &JsonLdOptions::new()).unwrap();
	assert_eq!(
		expanded,
		json!([{
			"@id": "http://example.org/test#library",
			"http://example.org/vocab#contains": [
				{"@id": "http://example.org/test#book"}
			]
		}])
	);
}

#[test]
fn reverse_terms_build_a_reverse_map() {
	let doc = json!({
		"@context": {
			"children": {"@reverse": "http://example.org/parent"}
		},
		"@id": "http://example.org/a",
		"children": {"@id": "http://example.org/b"}
	});

	let expanded = expand(&doc, &JsonLdOptions::new()).unwrap();
	assert_eq!(
		expanded,
		json!([{
			"@id": "http://example.org/a",
			"@reverse": {
				"http://example.org/parent": [{"@id": "http://example.org/b"}]
			}
		}])
	);
}

#[test]
fn language_maps_expand_to_tagged_strings() {
	let doc = json!({
		"@context": {
			"label": {"@id": "http://example.org/label", "@container": "@language"}
		},
		"@id": "http://example.org/x",
		"label": {"en": "The cat", "de": "Die Katze"}
	});

	let expanded = expand(&doc, &JsonLdOptions::new()).unwrap();
	assert_eq!(
		expanded,
		json!([{
			"@id": "http://example.org/x",
			"http://example.org/label": [
				{"@value": "Die Katze", "@language": "de"},
				{"@value": "The cat", "@language": "en"}
			]
		}])
	);
}

#[test]
fn default_language_applies_to_plain_strings() {
	let doc = json!({
		"@context": {"@vocab": "http://example.org/", "@language": "en"},
		"name": "The cat"
	});

	let expanded = expand(&doc, &JsonLdOptions::new()).unwrap();
	assert_eq!(
		expanded,
		json!([{
			"http://example.org/name": [{"@value": "The cat", "@language": "en"}]
		}])
	);
}

#[test]
fn output_is_stable_under_key_reordering() {
	let a = json!({
		"@context": {"@vocab": "http://example.org/"},
		"b": "2",
		"a": "1",
		"@id": "http://example.org/x"
	});
	let b = json!({
		"@id": "http://example.org/x",
		"a": "1",
		"b": "2",
		"@context": {"@vocab": "http://example.org/"}
	});

	let options = JsonLdOptions::new();
	let expanded_a = expand(&a, &options).unwrap();
	let expanded_b = expand(&b, &options).unwrap();
	assert_eq!(
		serde_json::to_string(&expanded_a).unwrap(),
		serde_json::to_string(&expanded_b).unwrap()
	);
}

#[test]
fn recursive_remote_contexts_are_detected() {
	struct CyclicLoader;
	impl DocumentLoader for CyclicLoader {
		fn load_document(&self, url: &str) -> Result<RemoteDocument, Error> {
			Ok(RemoteDocument {
				document_url: url.to_string(),
				document: json!({"@context": url}),
				context_url: None,
			})
		}
	}

	let options = JsonLdOptions {
		document_loader: Some(Box::new(CyclicLoader)),
		..JsonLdOptions::default()
	};
	let doc = json!({"@context": "http://example.org/ctx", "http://example.org/p": "x"});
	let err = expand(&doc, &options).unwrap_err();
	assert_eq!(err.code(), ErrorCode::RecursiveContextInclusion);
}

#[test]
fn unknown_at_prefixed_keys_are_dropped() {
	let doc = json!({
		"@context": {"@vocab": "http://example.org/"},
		"@nest": {"name": "hidden"},
		"name": "visible"
	});

	let expanded = expand(&doc, &JsonLdOptions::new()).unwrap();
	assert_eq!(
		expanded,
		json!([{
			"http://example.org/name": [{"@value": "visible"}]
		}])
	);
}

#[test]
fn base_resolves_relative_ids() {
	let doc = json!({
		"@id": "fragment",
		"http://example.org/p": "x"
	});
	let options = JsonLdOptions::with_base("http://example.org/base/doc");

	let expanded = expand(&doc, &options).unwrap();
	let id = expanded
		.as_array()
		.and_then(|nodes| nodes.first())
		.and_then(|node| node.get("@id"))
		.and_then(Value::as_str)
		.unwrap();
	assert_eq!(id, "http://example.org/base/fragment");
}

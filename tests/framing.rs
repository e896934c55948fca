use json_ld_processing::{frame, JsonLdOptions};
use serde_json::json;

fn library_doc() -> serde_json::Value {
	json!({
		"@context": {
			"dc": "http://purl.org/dc/elements/1.1/",
			"ex": "http://example.org/vocab#",
			"ex:contains": {"@type": "@id"}
		},
		"@graph": [
			{
				"@id": "http://example.org/test/#library",
				"@type": "ex:Library",
				"ex:contains": "http://example.org/test#book"
			},
			{
				"@id": "http://example.org/test#book",
				"@type": "ex:Book",
				"dc:contributor": "Writer",
				"dc:title": "My Book",
				"ex:contains": "http://example.org/test#chapter"
			},
			{
				"@id": "http://example.org/test#chapter",
				"@type": "ex:Chapter",
				"dc:description": "Fun",
				"dc:title": "Chapter One"
			}
		]
	})
}

fn library_frame() -> serde_json::Value {
	json!({
		"@context": {
			"dc": "http://purl.org/dc/elements/1.1/",
			"ex": "http://example.org/vocab#"
		},
		"@type": "ex:Library",
		"ex:contains": {
			"@type": "ex:Book",
			"ex:contains": {
				"@type": "ex:Chapter"
			}
		}
	})
}

#[test]
fn frames_nested_embeds() {
	let framed = frame(&library_doc(), &library_frame(), &JsonLdOptions::new()).unwrap();

	assert_eq!(
		framed,
		json!({
			"@context": {
				"dc": "http://purl.org/dc/elements/1.1/",
				"ex": "http://example.org/vocab#"
			},
			"@graph": [{
				"@id": "http://example.org/test/#library",
				"@type": "ex:Library",
				"ex:contains": {
					"@id": "http://example.org/test#book",
					"@type": "ex:Book",
					"dc:contributor": "Writer",
					"dc:title": "My Book",
					"ex:contains": {
						"@id": "http://example.org/test#chapter",
						"@type": "ex:Chapter",
						"dc:description": "Fun",
						"dc:title": "Chapter One"
					}
				}
			}]
		})
	);
}

#[test]
fn embed_off_emits_references() {
	let options = JsonLdOptions {
		embed: false,
		..JsonLdOptions::default()
	};
	let framed = frame(&library_doc(), &library_frame(), &options).unwrap();

	let graph = framed.get("@graph").and_then(|g| g.as_array()).unwrap();
	assert_eq!(graph, &vec![json!({"@id": "http://example.org/test/#library"})]);
}

#[test]
fn per_frame_embed_flag_overrides_options() {
	let mut frame_doc = library_frame();
	frame_doc
		.as_object_mut()
		.unwrap()
		.insert("@embed".to_string(), json!(false));

	let framed = frame(&library_doc(), &frame_doc, &JsonLdOptions::new()).unwrap();
	let graph = framed.get("@graph").and_then(|g| g.as_array()).unwrap();
	assert_eq!(graph, &vec![json!({"@id": "http://example.org/test/#library"})]);
}

#[test]
fn explicit_restricts_output_to_frame_properties() {
	let options = JsonLdOptions {
		explicit: true,
		..JsonLdOptions::default()
	};
	let frame_doc = json!({
		"@context": {
			"dc": "http://purl.org/dc/elements/1.1/",
			"ex": "http://example.org/vocab#"
		},
		"@type": "ex:Book",
		"dc:title": {}
	});

	let framed = frame(&library_doc(), &frame_doc, &options).unwrap();
	let graph = framed.get("@graph").and_then(|g| g.as_array()).unwrap();
	assert_eq!(graph.len(), 1);
	let book = &graph[0];
	assert_eq!(book.get("dc:title"), Some(&json!("My Book")));
	assert_eq!(book.get("dc:contributor"), None);
	assert_eq!(book.get("ex:contains"), None);
}

#[test]
fn missing_properties_get_defaults() {
	let frame_doc = json!({
		"@context": {"ex": "http://example.org/vocab#"},
		"@type": "ex:Library",
		"ex:shelf": {"@default": "unknown"}
	});

	let framed = frame(&library_doc(), &frame_doc, &JsonLdOptions::new()).unwrap();
	let graph = framed.get("@graph").and_then(|g| g.as_array()).unwrap();
	assert_eq!(graph[0].get("ex:shelf"), Some(&json!("unknown")));
}

#[test]
fn absent_default_becomes_null() {
	let frame_doc = json!({
		"@context": {"ex": "http://example.org/vocab#"},
		"@type": "ex:Library",
		"ex:shelf": {}
	});

	let framed = frame(&library_doc(), &frame_doc, &JsonLdOptions::new()).unwrap();
	let graph = framed.get("@graph").and_then(|g| g.as_array()).unwrap();
	assert_eq!(graph[0].get("ex:shelf"), Some(&json!(null)));
}

#[test]
fn omit_default_suppresses_insertion() {
	let options = JsonLdOptions {
		omit_default: true,
		..JsonLdOptions::default()
	};
	let frame_doc = json!({
		"@context": {"ex": "http://example.org/vocab#"},
		"@type": "ex:Library",
		"ex:shelf": {}
	});

	let framed = frame(&library_doc(), &frame_doc, &options).unwrap();
	let graph = framed.get("@graph").and_then(|g| g.as_array()).unwrap();
	assert_eq!(graph[0].get("ex:shelf"), None);
}

#[test]
fn empty_type_pattern_matches_any_typed_node() {
	let frame_doc = json!({
		"@context": {"ex": "http://example.org/vocab#"},
		"@type": [{}]
	});

	let framed = frame(&library_doc(), &frame_doc, &JsonLdOptions::new()).unwrap();
	let graph = framed.get("@graph").and_then(|g| g.as_array()).unwrap();
	// all three nodes carry a type
	assert_eq!(graph.len(), 3);
}

use json_ld_processing::{flatten, JsonLdOptions};
use serde_json::json;

#[test]
fn nested_nodes_surface_in_the_default_graph() {
	let doc = json!({
		"@context": {"@vocab": "http://example.org/"},
		"@id": "http://example.org/a",
		"knows": {"name": "Jane"}
	});

	let flattened = flatten(&doc, None, &JsonLdOptions::new()).unwrap();
	assert_eq!(
		flattened,
		json!([
			{
				"@id": "_:b0",
				"http://example.org/name": [{"@value": "Jane"}]
			},
			{
				"@id": "http://example.org/a",
				"http://example.org/knows": [{"@id": "_:b0"}]
			}
		])
	);
}

#[test]
fn duplicate_descriptions_merge() {
	let doc = json!([
		{"@id": "http://example.org/a", "http://example.org/p": [{"@value": "x"}]},
		{"@id": "http://example.org/a", "http://example.org/p": [{"@value": "x"}, {"@value": "y"}]}
	]);

	let flattened = flatten(&doc, None, &JsonLdOptions::new()).unwrap();
	assert_eq!(
		flattened,
		json!([{
			"@id": "http://example.org/a",
			"http://example.org/p": [{"@value": "x"}, {"@value": "y"}]
		}])
	);
}

#[test]
fn named_graphs_fold_into_graph_entries() {
	let doc = json!([{
		"@id": "http://example.org/g",
		"@graph": [
			{"@id": "http://example.org/inner", "http://example.org/p": [{"@value": "x"}]}
		],
		"http://example.org/q": [{"@value": "outer"}]
	}]);

	let flattened = flatten(&doc, None, &JsonLdOptions::new()).unwrap();
	assert_eq!(
		flattened,
		json!([{
			"@id": "http://example.org/g",
			"http://example.org/q": [{"@value": "outer"}],
			"@graph": [{
				"@id": "http://example.org/inner",
				"http://example.org/p": [{"@value": "x"}]
			}]
		}])
	);
}

#[test]
fn flatten_with_context_compacts_the_output() {
	let doc = json!({
		"@context": {"@vocab": "http://example.org/"},
		"@id": "http://example.org/a",
		"knows": {"name": "Jane"}
	});
	let context = json!({"@vocab": "http://example.org/"});

	let flattened = flatten(&doc, Some(&context), &JsonLdOptions::new()).unwrap();
	assert_eq!(
		flattened,
		json!({
			"@context": {"@vocab": "http://example.org/"},
			"@graph": [
				{"@id": "_:b0", "name": "Jane"},
				{"@id": "http://example.org/a", "knows": {"@id": "_:b0"}}
			]
		})
	);
}

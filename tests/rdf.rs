use json_ld_processing::util::deep_compare;
use json_ld_processing::{
	expand, from_rdf, from_rdf_nquads, to_rdf, JsonLdOptions, RdfOutput,
};
use serde_json::json;

fn dataset_of(doc: &serde_json::Value, options: &JsonLdOptions) -> json_ld_processing::RdfDataset {
	match to_rdf(doc, options).unwrap() {
		RdfOutput::Dataset(dataset) => dataset,
		RdfOutput::NQuads(_) => panic!("expected a dataset"),
	}
}

#[test]
fn lists_become_first_rest_chains() {
	let doc = json!({
		"@context": {
			"ex": "http://example.org/",
			"ex:ls": {"@container": "@list"}
		},
		"@id": "http://example.org/x",
		"ex:ls": [1, 2, 3]
	});

	let options = JsonLdOptions {
		format: Some("application/nquads".to_string()),
		..JsonLdOptions::default()
	};
	let nquads = to_rdf(&doc, &options).unwrap().into_nquads().unwrap();

	let expected = "\
		<http://example.org/x> <http://example.org/ls> _:b0 .\n\
		_:b0 <http://www.w3.org/1999/02/22-rdf-syntax-ns#first> \"1\"^^<http://www.w3.org/2001/XMLSchema#integer> .\n\
		_:b0 <http://www.w3.org/1999/02/22-rdf-syntax-ns#rest> _:b1 .\n\
		_:b1 <http://www.w3.org/1999/02/22-rdf-syntax-ns#first> \"2\"^^<http://www.w3.org/2001/XMLSchema#integer> .\n\
		_:b1 <http://www.w3.org/1999/02/22-rdf-syntax-ns#rest> _:b2 .\n\
		_:b2 <http://www.w3.org/1999/02/22-rdf-syntax-ns#first> \"3\"^^<http://www.w3.org/2001/XMLSchema#integer> .\n\
		_:b2 <http://www.w3.org/1999/02/22-rdf-syntax-ns#rest> <http://www.w3.org/1999/02/22-rdf-syntax-ns#nil> .\n";
	assert_eq!(nquads, expected);
}

#[test]
fn literals_use_canonical_lexical_forms() {
	let doc = json!({
		"@id": "http://example.org/x",
		"http://example.org/b": true,
		"http://example.org/d": 1.25,
		"http://example.org/i": 42,
		"http://example.org/s": "text"
	});

	let options = JsonLdOptions {
		format: Some("application/nquads".to_string()),
		..JsonLdOptions::default()
	};
	let nquads = to_rdf(&doc, &options).unwrap().into_nquads().unwrap();

	assert!(nquads.contains("\"true\"^^<http://www.w3.org/2001/XMLSchema#boolean>"));
	assert!(nquads.contains("\"1.25E0\"^^<http://www.w3.org/2001/XMLSchema#double>"));
	assert!(nquads.contains("\"42\"^^<http://www.w3.org/2001/XMLSchema#integer>"));
	assert!(nquads.contains("<http://example.org/s> \"text\" .\n"));
}

#[test]
fn language_tagged_strings_round_trip() {
	let doc = json!({
		"@id": "http://example.org/x",
		"http://example.org/label": {"@value": "chat", "@language": "fr"}
	});
	let options = JsonLdOptions::new();

	let dataset = dataset_of(&doc, &options);
	let rebuilt = from_rdf(&dataset, &options).unwrap();
	assert_eq!(
		rebuilt,
		json!([{
			"@id": "http://example.org/x",
			"http://example.org/label": [{"@value": "chat", "@language": "fr"}]
		}])
	);
}

#[test]
fn rdf_round_trip_preserves_expanded_form() {
	let doc = json!({
		"@context": {"@vocab": "http://schema.org/"},
		"@id": "http://example.org/jane",
		"@type": "Person",
		"name": "Jane Doe"
	});
	let options = JsonLdOptions::new();

	let expanded = expand(&doc, &options).unwrap();
	let dataset = dataset_of(&doc, &options);
	let rebuilt = from_rdf(&dataset, &options).unwrap();

	assert!(
		deep_compare(&expanded, &rebuilt, false),
		"expected {expanded} to equal {rebuilt} up to ordering"
	);
}

#[test]
fn list_round_trip_with_native_types() {
	let doc = json!({
		"@context": {
			"ex": "http://example.org/",
			"ex:ls": {"@container": "@list"}
		},
		"@id": "http://example.org/x",
		"ex:ls": [1, 2, 3]
	});
	let options = JsonLdOptions {
		use_native_types: true,
		..JsonLdOptions::default()
	};

	let expanded = expand(&doc, &options).unwrap();
	let dataset = dataset_of(&doc, &options);
	let rebuilt = from_rdf(&dataset, &options).unwrap();

	assert!(
		deep_compare(&expanded, &rebuilt, false),
		"expected {expanded} to equal {rebuilt} up to ordering"
	);
}

#[test]
fn nquads_input_rebuilds_lists() {
	let nquads = "\
		<http://a/x> <http://a/p> _:b0 .\n\
		_:b0 <http://www.w3.org/1999/02/22-rdf-syntax-ns#first> \"1\"^^<http://www.w3.org/2001/XMLSchema#integer> .\n\
		_:b0 <http://www.w3.org/1999/02/22-rdf-syntax-ns#rest> _:b1 .\n\
		_:b1 <http://www.w3.org/1999/02/22-rdf-syntax-ns#first> \"2\"^^<http://www.w3.org/2001/XMLSchema#integer> .\n\
		_:b1 <http://www.w3.org/1999/02/22-rdf-syntax-ns#rest> <http://www.w3.org/1999/02/22-rdf-syntax-ns#nil> .\n";

	let rebuilt = from_rdf_nquads(nquads, &JsonLdOptions::new()).unwrap();
	assert_eq!(
		rebuilt,
		json!([{
			"@id": "http://a/x",
			"http://a/p": [{
				"@list": [
					{"@value": "1", "@type": "http://www.w3.org/2001/XMLSchema#integer"},
					{"@value": "2", "@type": "http://www.w3.org/2001/XMLSchema#integer"}
				]
			}]
		}])
	);
}

#[test]
fn named_graphs_fold_into_graph_entries() {
	let nquads = "\
		<http://a/s> <http://a/p> \"inside\" <http://a/g> .\n\
		<http://a/s2> <http://a/p> \"outside\" .\n";

	let rebuilt = from_rdf_nquads(nquads, &JsonLdOptions::new()).unwrap();
	assert_eq!(
		rebuilt,
		json!([
			{
				"@id": "http://a/g",
				"@graph": [{
					"@id": "http://a/s",
					"http://a/p": [{"@value": "inside"}]
				}]
			},
			{
				"@id": "http://a/s2",
				"http://a/p": [{"@value": "outside"}]
			}
		])
	);
}

#[test]
fn rdf_type_becomes_type_keyword() {
	let nquads =
		"<http://a/s> <http://www.w3.org/1999/02/22-rdf-syntax-ns#type> <http://a/T> .\n";

	let rebuilt = from_rdf_nquads(nquads, &JsonLdOptions::new()).unwrap();
	assert_eq!(rebuilt, json!([{"@id": "http://a/s", "@type": ["http://a/T"]}]));

	let options = JsonLdOptions {
		use_rdf_type: true,
		..JsonLdOptions::default()
	};
	let rebuilt = from_rdf_nquads(nquads, &options).unwrap();
	assert_eq!(
		rebuilt,
		json!([{
			"@id": "http://a/s",
			"http://www.w3.org/1999/02/22-rdf-syntax-ns#type": [{"@id": "http://a/T"}]
		}])
	);
}

#[test]
fn relative_graph_names_are_skipped() {
	let expanded = json!([{
		"@id": "http://example.org/node",
		"@graph": [
			{"@id": "http://example.org/inner", "http://example.org/p": [{"@value": "x"}]}
		]
	}]);

	// use the expanded form directly; the graph name stays absolute and the
	// quad is emitted
	let options = JsonLdOptions::new();
	let dataset = dataset_of(&expanded, &options);
	assert_eq!(dataset.graph("http://example.org/node").len(), 1);

	// a relative graph name produces no quads at all
	let relative = json!([{
		"@id": "relative-name",
		"@graph": [
			{"@id": "http://example.org/inner", "http://example.org/p": [{"@value": "x"}]}
		]
	}]);
	let dataset = dataset_of(&relative, &options);
	assert!(dataset.is_empty());
}

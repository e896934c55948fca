//! Serializing an RDF dataset back into expanded JSON-LD.

use std::collections::HashMap;

use indexmap::IndexMap;
use serde_json::{Map, Value};

use super::{
	RdfDataset, RdfLiteral, RdfNode, RDF_FIRST, RDF_LIST, RDF_NIL, RDF_REST, RDF_TYPE,
	XSD_BOOLEAN, XSD_DOUBLE, XSD_INTEGER, XSD_STRING,
};
use crate::error::Error;
use crate::options::JsonLdOptions;
use crate::util::{contains_value, is_blank_node};

type NodeMap = IndexMap<String, Map<String, Value>>;

/// A recorded reference to a blank node (or `rdf:nil`): the node and
/// property holding the `{"@id": target}` object.
#[derive(Debug, Clone)]
struct Usage {
	node_id: String,
	property: String,
	target_id: String,
}

/// Converts an RDF dataset into an expanded JSON-LD document, rebuilding
/// `@list` arrays from well-formed `rdf:first`/`rdf:rest` chains.
pub fn from_rdf(dataset: &RdfDataset, options: &JsonLdOptions) -> Result<Value, Error> {
	let mut graph_map: IndexMap<String, NodeMap> = IndexMap::new();
	graph_map.insert("@default".to_string(), NodeMap::new());
	let mut usage_map: HashMap<String, HashMap<String, Vec<Usage>>> = HashMap::new();

	for graph_name in dataset.graph_names() {
		if graph_name != "@default" {
			ensure_node(
				graph_map
					.entry("@default".to_string())
					.or_default(),
				graph_name,
			);
		}

		let node_map = graph_map.entry(graph_name.to_string()).or_default();
		let usages = usage_map.entry(graph_name.to_string()).or_default();

		for quad in dataset.graph(graph_name) {
			let source = quad.subject.value().to_string();
			ensure_node(node_map, &source);

			if !quad.object.is_literal() {
				ensure_node(node_map, quad.object.value());
			}

			let predicate = quad.predicate.value().to_string();

			if predicate == RDF_TYPE && !options.use_rdf_type && !quad.object.is_literal() {
				let node = node_mut(node_map, &source);
				let types = node
					.entry("@type")
					.or_insert_with(|| Value::Array(Vec::new()));
				if let Value::Array(types) = types {
					let type_value = Value::String(quad.object.value().to_string());
					if !contains_value(types, &type_value) {
						types.push(type_value);
					}
				}
				continue;
			}

			let value = rdf_to_object(&quad.object, options.use_native_types)?;
			let node = node_mut(node_map, &source);
			let entry = node
				.entry(predicate.clone())
				.or_insert_with(|| Value::Array(Vec::new()));
			if let Value::Array(items) = entry {
				if !contains_value(items, &value) {
					items.push(value);
				}
			}

			// track references to blank nodes and rdf:nil for list rebuilding
			let target = quad.object.value();
			if quad.object.is_blank() || (quad.object.is_iri() && target == RDF_NIL) {
				usages.entry(target.to_string()).or_default().push(Usage {
					node_id: source,
					property: predicate,
					target_id: target.to_string(),
				});
			}
		}
	}

	// fold well-formed rdf:first/rdf:rest chains into @list arrays
	for (graph_name, node_map) in graph_map.iter_mut() {
		let Some(usages) = usage_map.get(graph_name) else {
			continue;
		};
		let Some(nil_usages) = usages.get(RDF_NIL) else {
			continue;
		};

		for usage in nil_usages {
			let mut node_id = usage.node_id.clone();
			let mut property = usage.property.clone();
			let mut head_target = usage.target_id.clone();
			let mut list: Vec<Value> = Vec::new();
			let mut list_nodes: Vec<String> = Vec::new();

			while property == RDF_REST {
				let reference_count = usages.get(&node_id).map(Vec::len).unwrap_or(0);
				let well_formed = is_blank_node(&node_id)
					&& reference_count == 1
					&& node_map
						.get(&node_id)
						.map(is_well_formed_list_node)
						.unwrap_or(false);
				if !well_formed {
					break;
				}

				let node = &node_map[&node_id];
				let first = node
					.get(RDF_FIRST)
					.and_then(Value::as_array)
					.and_then(|items| items.first())
					.cloned()
					.unwrap_or(Value::Null);
				list.push(first);
				list_nodes.push(node_id.clone());

				let next = usages[&node_id][0].clone();
				head_target = next.target_id;
				node_id = next.node_id;
				property = next.property;
			}

			// a chain referenced through rdf:first nests a list inside a
			// list, which JSON-LD cannot express; leave it as raw nodes
			if property == RDF_FIRST {
				continue;
			}

			list.reverse();

			if let Some(node) = node_map.get_mut(&node_id) {
				if let Some(Value::Array(items)) = node.get_mut(&property) {
					for item in items.iter_mut() {
						let is_head = item
							.as_object()
							.map(|map| {
								map.len() == 1
									&& map.get("@id").and_then(Value::as_str)
										== Some(head_target.as_str())
							})
							.unwrap_or(false);
						if is_head {
							let mut wrapper = Map::new();
							wrapper.insert("@list".to_string(), Value::Array(list));
							*item = Value::Object(wrapper);
							break;
						}
					}
				}
			}

			for list_node in &list_nodes {
				node_map.shift_remove(list_node);
			}
		}
	}

	// assemble the default graph, folding named graphs into `@graph`
	let mut result = Vec::new();
	let default_graph = graph_map
		.get("@default")
		.cloned()
		.unwrap_or_default();
	let mut subjects: Vec<&String> = default_graph.keys().collect();
	subjects.sort();

	for subject in subjects {
		let mut node = default_graph[subject].clone();

		if let Some(graph) = graph_map.get(subject) {
			let mut ids: Vec<&String> = graph.keys().collect();
			ids.sort();
			let mut nodes = Vec::new();
			for id in ids {
				let graph_node = &graph[id];
				if graph_node.len() > 1 {
					nodes.push(Value::Object(graph_node.clone()));
				}
			}
			node.insert("@graph".to_string(), Value::Array(nodes));
		}

		if node.len() > 1 {
			result.push(Value::Object(node));
		}
	}

	Ok(Value::Array(result))
}

fn ensure_node(node_map: &mut NodeMap, id: &str) {
	node_map.entry(id.to_string()).or_insert_with(|| {
		let mut node = Map::new();
		node.insert("@id".to_string(), Value::String(id.to_string()));
		node
	});
}

fn node_mut<'a>(node_map: &'a mut NodeMap, id: &str) -> &'a mut Map<String, Value> {
	ensure_node(node_map, id);
	node_map
		.get_mut(id)
		.expect("the node was just ensured")
}

/// A list node carries exactly one `rdf:first` and one `rdf:rest` value and
/// nothing else but its identifier and an optional `rdf:List` type.
fn is_well_formed_list_node(node: &Map<String, Value>) -> bool {
	let mut keys = 0;
	for (key, value) in node {
		match key.as_str() {
			"@id" => keys += 1,
			"@type" => {
				let only_list_type = value
					.as_array()
					.map(|types| {
						types.len() == 1
							&& types[0].as_str() == Some(RDF_LIST)
					})
					.unwrap_or(false);
				if !only_list_type {
					return false;
				}
				keys += 1;
			}
			key if key == RDF_FIRST || key == RDF_REST => {
				let single = value.as_array().map(|v| v.len() == 1).unwrap_or(false);
				if !single {
					return false;
				}
				keys += 1;
			}
			_ => return false,
		}
	}
	keys >= 3 && node.contains_key(RDF_FIRST) && node.contains_key(RDF_REST)
}

/// Converts an RDF node into the value object or node reference it
/// serializes in expanded JSON-LD.
fn rdf_to_object(node: &RdfNode, use_native_types: bool) -> Result<Value, Error> {
	let literal = match node {
		RdfNode::Iri(iri) => {
			let mut reference = Map::new();
			reference.insert("@id".to_string(), Value::String(iri.clone()));
			return Ok(Value::Object(reference));
		}
		RdfNode::Blank(id) => {
			let mut reference = Map::new();
			reference.insert("@id".to_string(), Value::String(id.clone()));
			return Ok(Value::Object(reference));
		}
		RdfNode::Literal(literal) => literal,
	};

	let mut result = Map::new();

	if let Some(language) = &literal.language {
		result.insert("@value".to_string(), Value::String(literal.value.clone()));
		result.insert("@language".to_string(), Value::String(language.clone()));
		return Ok(Value::Object(result));
	}

	let (value, converted) = if use_native_types {
		native_value(literal)
	} else {
		(Value::String(literal.value.clone()), false)
	};

	result.insert("@value".to_string(), value);

	let keep_type = if use_native_types && converted {
		false
	} else {
		literal.datatype != XSD_STRING
	};
	if keep_type {
		result.insert(
			"@type".to_string(),
			Value::String(literal.datatype.clone()),
		);
	}

	Ok(Value::Object(result))
}

/// Converts canonical XSD lexical forms back to native JSON scalars.
/// Returns the value and whether a conversion took place.
fn native_value(literal: &RdfLiteral) -> (Value, bool) {
	match literal.datatype.as_str() {
		XSD_BOOLEAN => match literal.value.as_str() {
			"true" => (Value::Bool(true), true),
			"false" => (Value::Bool(false), true),
			_ => (Value::String(literal.value.clone()), false),
		},
		XSD_INTEGER => match literal.value.parse::<i64>() {
			Ok(integer) => (Value::from(integer), true),
			Err(_) => (Value::String(literal.value.clone()), false),
		},
		XSD_DOUBLE => match literal.value.parse::<f64>() {
			Ok(double) => match serde_json::Number::from_f64(double) {
				Some(number) => (Value::Number(number), true),
				None => (Value::String(literal.value.clone()), false),
			},
			Err(_) => (Value::String(literal.value.clone()), false),
		},
		_ => (Value::String(literal.value.clone()), false),
	}
}

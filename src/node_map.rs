//! Node-map generation: flattens an expanded document into a
//! `{graph → {id → node}}` mapping, issuing blank node identifiers for
//! anonymous nodes. After generation every node property value is a list.

use serde_json::{Map, Value};

use crate::error::Error;
use crate::id::IdentifierIssuer;
use crate::syntax::is_keyword;
use crate::util::{as_array, contains_value, is_blank_node, is_value, ordered_keys};

/// Creates a node map holding only the default graph.
pub fn new_node_map() -> Map<String, Value> {
	let mut node_map = Map::new();
	node_map.insert("@default".to_string(), Value::Object(Map::new()));
	node_map
}

/// Deposits every node of `element` under `(graph, id)` in `node_map`.
pub fn generate_node_map(
	element: &Value,
	node_map: &mut Map<String, Value>,
	active_graph: &str,
	active_subject: Option<&Value>,
	active_property: Option<&str>,
	issuer: &mut IdentifierIssuer,
) -> Result<(), Error> {
	generate(
		element,
		node_map,
		active_graph,
		active_subject,
		active_property,
		None,
		issuer,
	)
}

fn generate(
	element: &Value,
	node_map: &mut Map<String, Value>,
	active_graph: &str,
	active_subject: Option<&Value>,
	active_property: Option<&str>,
	mut list: Option<&mut Vec<Value>>,
	issuer: &mut IdentifierIssuer,
) -> Result<(), Error> {
	if let Value::Array(items) = element {
		for item in items {
			generate(
				item,
				node_map,
				active_graph,
				active_subject,
				active_property,
				list.as_mut().map(|l| &mut **l),
				issuer,
			)?;
		}
		return Ok(());
	}

	let Value::Object(object) = element else {
		return Ok(());
	};

	// rename blank node types before anything else
	let types: Option<Vec<Value>> = object.get("@type").map(|types| {
		as_array(types.clone())
			.into_iter()
			.map(|t| match t.as_str() {
				Some(t) if is_blank_node(t) => Value::String(issuer.issue(Some(t))),
				_ => t,
			})
			.collect()
	});

	if is_value(element) {
		let mut value = object.clone();
		if let Some(types) = types.clone() {
			// a value object carries a single type
			let single = types.into_iter().next().unwrap_or(Value::Null);
			value.insert("@type".to_string(), single);
		}
		let value = Value::Object(value);
		match list {
			Some(list) => list.push(value),
			None => {
				let (subject, property) = subject_and_property(active_subject, active_property)?;
				let node = graph_node_mut(node_map, active_graph, subject);
				merge_value(node, property, value);
			}
		}
		return Ok(());
	}

	if let Some(items) = object.get("@list") {
		let mut result = Vec::new();
		generate(
			items,
			node_map,
			active_graph,
			active_subject,
			active_property,
			Some(&mut result),
			issuer,
		)?;
		let mut wrapper = Map::new();
		wrapper.insert("@list".to_string(), Value::Array(result));
		let wrapper = Value::Object(wrapper);
		match list {
			Some(list) => list.push(wrapper),
			None => {
				let (subject, property) = subject_and_property(active_subject, active_property)?;
				let node = graph_node_mut(node_map, active_graph, subject);
				merge_value(node, property, wrapper);
			}
		}
		return Ok(());
	}

	// node object
	let id = match object.get("@id").and_then(Value::as_str) {
		Some(id) if is_blank_node(id) => issuer.issue(Some(id)),
		Some(id) => id.to_string(),
		None => issuer.issue(None),
	};

	ensure_node(node_map, active_graph, &id);

	match active_subject {
		// a reverse reference: the active subject is merged into this node
		Some(Value::Object(reference)) => {
			let property = active_property.unwrap_or_default();
			let node = graph_node_mut(node_map, active_graph, &id);
			merge_value(node, property, Value::Object(reference.clone()));
		}
		Some(Value::String(subject)) => {
			let mut reference = Map::new();
			reference.insert("@id".to_string(), Value::String(id.clone()));
			let reference = Value::Object(reference);
			match &mut list {
				Some(list) => list.push(reference),
				None => {
					let property = active_property.unwrap_or_default();
					let node = graph_node_mut(node_map, active_graph, subject.as_str());
					merge_value(node, property, reference);
				}
			}
		}
		_ => {}
	}

	if let Some(types) = types {
		let node = graph_node_mut(node_map, active_graph, &id);
		let merged = node
			.entry("@type")
			.or_insert_with(|| Value::Array(Vec::new()));
		if let Value::Array(existing) = merged {
			for t in types {
				if !contains_value(existing, &t) {
					existing.push(t);
				}
			}
		}
	}

	if let Some(index) = object.get("@index") {
		let node = graph_node_mut(node_map, active_graph, &id);
		match node.get("@index") {
			Some(existing) if existing != index => {
				return Err(Error::ConflictingIndexes(id));
			}
			_ => {
				node.insert("@index".to_string(), index.clone());
			}
		}
	}

	if let Some(reverse_map) = object.get("@reverse").and_then(Value::as_object) {
		let mut referenced = Map::new();
		referenced.insert("@id".to_string(), Value::String(id.clone()));
		let referenced = Value::Object(referenced);
		for property in ordered_keys(reverse_map) {
			let values = as_array(reverse_map.get(&property).cloned().unwrap_or(Value::Null));
			for value in values {
				generate(
					&value,
					node_map,
					active_graph,
					Some(&referenced),
					Some(&property),
					None,
					issuer,
				)?;
			}
		}
	}

	if let Some(graph) = object.get("@graph") {
		node_map
			.entry(id.clone())
			.or_insert_with(|| Value::Object(Map::new()));
		generate(graph, node_map, &id, None, None, None, issuer)?;
	}

	let subject = Value::String(id.clone());
	for key in ordered_keys(object) {
		if is_keyword(&key) {
			continue;
		}
		let property = if is_blank_node(&key) {
			issuer.issue(Some(&key))
		} else {
			key.clone()
		};

		{
			let node = graph_node_mut(node_map, active_graph, &id);
			node.entry(property.clone())
				.or_insert_with(|| Value::Array(Vec::new()));
		}

		let values = object.get(&key).cloned().unwrap_or(Value::Null);
		generate(
			&values,
			node_map,
			active_graph,
			Some(&subject),
			Some(&property),
			None,
			issuer,
		)?;
	}

	Ok(())
}

fn subject_and_property<'a>(
	active_subject: Option<&'a Value>,
	active_property: Option<&'a str>,
) -> Result<(&'a str, &'a str), Error> {
	match (active_subject.and_then(Value::as_str), active_property) {
		(Some(subject), Some(property)) => Ok((subject, property)),
		_ => Err(Error::InvalidInput(
			"free-floating value in node-map generation".to_string(),
		)),
	}
}

fn ensure_node(node_map: &mut Map<String, Value>, graph: &str, id: &str) {
	let graph = node_map
		.entry(graph)
		.or_insert_with(|| Value::Object(Map::new()));
	if let Value::Object(graph) = graph {
		graph.entry(id).or_insert_with(|| {
			let mut node = Map::new();
			node.insert("@id".to_string(), Value::String(id.to_string()));
			Value::Object(node)
		});
	}
}

fn graph_node_mut<'a>(
	node_map: &'a mut Map<String, Value>,
	graph: &str,
	id: &str,
) -> &'a mut Map<String, Value> {
	ensure_node(node_map, graph, id);
	node_map
		.get_mut(graph)
		.and_then(Value::as_object_mut)
		.and_then(|graph| graph.get_mut(id))
		.and_then(Value::as_object_mut)
		.expect("the node was just ensured")
}

/// Appends `value` to `node[property]` unless a structurally equal entry is
/// already present.
fn merge_value(node: &mut Map<String, Value>, property: &str, value: Value) {
	let entry = node
		.entry(property)
		.or_insert_with(|| Value::Array(Vec::new()));
	if let Value::Array(items) = entry {
		if !contains_value(items, &value) {
			items.push(value);
		}
	}
}

/// Flattens an expanded document: named graphs are folded into
/// `@graph`-bearing nodes of the default graph and the default graph is
/// emitted as a sorted node array.
pub fn flatten(expanded: &Value) -> Result<Value, Error> {
	let mut issuer = IdentifierIssuer::new("_:b");
	let mut node_map = new_node_map();
	generate_node_map(expanded, &mut node_map, "@default", None, None, &mut issuer)?;

	let mut default_graph = match node_map.shift_remove("@default") {
		Some(Value::Object(graph)) => graph,
		_ => Map::new(),
	};

	for graph_name in ordered_keys(&node_map) {
		let graph = match node_map.get(&graph_name).and_then(Value::as_object) {
			Some(graph) => graph,
			None => continue,
		};

		let entry = default_graph
			.entry(graph_name.clone())
			.or_insert_with(|| {
				let mut node = Map::new();
				node.insert("@id".to_string(), Value::String(graph_name.clone()));
				Value::Object(node)
			});

		let mut nodes = Vec::new();
		for id in ordered_keys(graph) {
			if let Some(node) = graph.get(&id) {
				if node.as_object().map(|n| n.len() > 1).unwrap_or(false) {
					nodes.push(node.clone());
				}
			}
		}
		if let Some(entry) = entry.as_object_mut() {
			entry.insert("@graph".to_string(), Value::Array(nodes));
		}
	}

	let mut flattened = Vec::new();
	for id in ordered_keys(&default_graph) {
		if let Some(node) = default_graph.get(&id) {
			if node.as_object().map(|n| n.len() > 1).unwrap_or(false) {
				flattened.push(node.clone());
			}
		}
	}

	Ok(Value::Array(flattened))
}

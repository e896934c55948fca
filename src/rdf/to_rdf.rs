//! Deserializing JSON-LD into an RDF dataset.

use serde_json::{Map, Value};

use super::{
	RdfDataset, RdfLiteral, RdfNode, RDF_FIRST, RDF_NIL, RDF_REST, RDF_TYPE, XSD_BOOLEAN,
	XSD_DOUBLE, XSD_INTEGER, XSD_STRING,
};
use crate::error::Error;
use crate::id::IdentifierIssuer;
use crate::node_map::{generate_node_map, new_node_map};
use crate::options::JsonLdOptions;
use crate::syntax::is_keyword;
use crate::util::{
	as_array, canonical_double, canonical_integer, is_blank_node, is_list, is_relative_iri,
	ordered_keys,
};

/// Converts an expanded document into an RDF dataset.
pub fn to_rdf(expanded: &Value, options: &JsonLdOptions) -> Result<RdfDataset, Error> {
	let mut issuer = IdentifierIssuer::new("_:b");
	let mut node_map = new_node_map();
	generate_node_map(expanded, &mut node_map, "@default", None, None, &mut issuer)?;

	let mut dataset = RdfDataset::new();
	for graph_name in ordered_keys(&node_map) {
		// relative graph names are skipped altogether
		if is_relative_iri(&graph_name) {
			continue;
		}
		if let Some(graph) = node_map.get(&graph_name).and_then(Value::as_object) {
			graph_to_rdf(&mut dataset, &graph_name, graph, &mut issuer, options)?;
		}
	}

	Ok(dataset)
}

fn graph_to_rdf(
	dataset: &mut RdfDataset,
	graph_name: &str,
	graph: &Map<String, Value>,
	issuer: &mut IdentifierIssuer,
	options: &JsonLdOptions,
) -> Result<(), Error> {
	for id in ordered_keys(graph) {
		if is_relative_iri(&id) {
			continue;
		}
		let node = match graph.get(&id).and_then(Value::as_object) {
			Some(node) => node,
			None => continue,
		};

		for property in ordered_keys(node) {
			let values = node.get(&property).cloned().unwrap_or(Value::Null);

			if property == "@type" {
				for type_value in as_array(values) {
					if let Some(type_value) = type_value.as_str() {
						if is_relative_iri(type_value) {
							continue;
						}
						dataset.add(
							graph_name,
							RdfNode::from_id(&id),
							RdfNode::Iri(RDF_TYPE.to_string()),
							RdfNode::from_id(type_value),
						);
					}
				}
				continue;
			}

			if is_keyword(&property) {
				continue;
			}
			// blank node predicates only appear in generalized RDF
			if is_blank_node(&property) && !options.produce_generalized_rdf {
				continue;
			}
			if is_relative_iri(&property) {
				continue;
			}

			for item in as_array(values) {
				let subject = RdfNode::from_id(&id);
				let predicate = RdfNode::from_id(&property);

				if is_list(&item) {
					let list = item
						.get("@list")
						.and_then(Value::as_array)
						.cloned()
						.unwrap_or_default();
					let head = list_to_rdf(dataset, graph_name, &list, issuer)?;
					dataset.add(graph_name, subject, predicate, head);
				} else if let Some(object) = object_to_rdf(&item)? {
					dataset.add(graph_name, subject, predicate, object);
				}
			}
		}
	}

	Ok(())
}

/// Emits the `rdf:first`/`rdf:rest` chain of a list and returns its head.
fn list_to_rdf(
	dataset: &mut RdfDataset,
	graph_name: &str,
	list: &[Value],
	issuer: &mut IdentifierIssuer,
) -> Result<RdfNode, Error> {
	if list.is_empty() {
		return Ok(RdfNode::Iri(RDF_NIL.to_string()));
	}

	let bnodes: Vec<String> = list.iter().map(|_| issuer.issue(None)).collect();

	for (index, item) in list.iter().enumerate() {
		let subject = RdfNode::Blank(bnodes[index].clone());
		if let Some(object) = object_to_rdf(item)? {
			dataset.add(
				graph_name,
				subject.clone(),
				RdfNode::Iri(RDF_FIRST.to_string()),
				object,
			);
		}
		let rest = match bnodes.get(index + 1) {
			Some(next) => RdfNode::Blank(next.clone()),
			None => RdfNode::Iri(RDF_NIL.to_string()),
		};
		dataset.add(
			graph_name,
			subject,
			RdfNode::Iri(RDF_REST.to_string()),
			rest,
		);
	}

	Ok(RdfNode::Blank(bnodes[0].clone()))
}

/// Converts a value object or node reference into an RDF node. Returns
/// `None` for relative node references, which emit no triple.
fn object_to_rdf(item: &Value) -> Result<Option<RdfNode>, Error> {
	if let Some(id) = item.get("@id").and_then(Value::as_str) {
		if !item.as_object().map(|m| m.contains_key("@value")).unwrap_or(false) {
			if is_relative_iri(id) {
				return Ok(None);
			}
			return Ok(Some(RdfNode::from_id(id)));
		}
	}

	let value = item.get("@value").cloned().unwrap_or(Value::Null);
	let datatype = item.get("@type").and_then(Value::as_str);

	let literal = match value {
		Value::Bool(boolean) => RdfLiteral::new(
			if boolean { "true" } else { "false" },
			datatype.unwrap_or(XSD_BOOLEAN),
		),
		Value::Number(number) => {
			if let Some(integer) = number.as_i64() {
				if datatype == Some(XSD_DOUBLE) {
					RdfLiteral::new(canonical_double(integer as f64), XSD_DOUBLE)
				} else {
					RdfLiteral::new(integer.to_string(), datatype.unwrap_or(XSD_INTEGER))
				}
			} else if let Some(unsigned) = number.as_u64() {
				RdfLiteral::new(unsigned.to_string(), datatype.unwrap_or(XSD_INTEGER))
			} else {
				let double = number.as_f64().unwrap_or(0.0);
				if datatype == Some(XSD_INTEGER) && double.fract() == 0.0 {
					RdfLiteral::new(canonical_integer(double), XSD_INTEGER)
				} else {
					RdfLiteral::new(canonical_double(double), datatype.unwrap_or(XSD_DOUBLE))
				}
			}
		}
		Value::String(string) => match item.get("@language").and_then(Value::as_str) {
			Some(language) => RdfLiteral::lang_tagged(string, language),
			None => RdfLiteral::new(string, datatype.unwrap_or(XSD_STRING)),
		},
		other => {
			return Err(Error::InvalidInput(format!(
				"cannot convert `{other}` to an RDF literal"
			)));
		}
	};

	Ok(Some(RdfNode::Literal(literal)))
}

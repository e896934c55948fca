//! The compaction algorithm: collapses expanded form back to terms and
//! compact IRIs under an active context.

use serde_json::{Map, Value};

use crate::context::Context;
use crate::error::Error;
use crate::syntax::{is_keyword, ContainerKind};
use crate::util::{add_value, as_array, is_list, is_value, ordered_keys};

/// Compacts an expanded element under the given active context.
pub fn compact(
	active_context: &Context,
	active_property: Option<&str>,
	element: Value,
	compact_arrays: bool,
) -> Result<Value, Error> {
	match element {
		Value::Array(items) => {
			let mut result = Vec::new();
			for item in items {
				let compacted = compact(active_context, active_property, item, compact_arrays)?;
				if !compacted.is_null() {
					result.push(compacted);
				}
			}

			let container = active_property
				.and_then(|property| active_context.term(property))
				.and_then(|definition| definition.container_mapping);
			let keep_array = !compact_arrays
				|| matches!(
					container,
					Some(ContainerKind::List) | Some(ContainerKind::Set)
				) || active_property == Some("@graph")
				|| active_property == Some("@set");

			if result.len() == 1 && !keep_array {
				Ok(result.into_iter().next().unwrap_or(Value::Null))
			} else {
				Ok(Value::Array(result))
			}
		}
		Value::Object(map) => compact_object(active_context, active_property, map, compact_arrays),
		scalar => Ok(scalar),
	}
}

fn compact_object(
	active_context: &Context,
	active_property: Option<&str>,
	map: Map<String, Value>,
	compact_arrays: bool,
) -> Result<Value, Error> {
	let element = Value::Object(map);

	if is_value(&element) || is_node_reference_value(&element) {
		if let Some(compacted) = compact_value(active_context, active_property, &element) {
			return Ok(compacted);
		}
	}

	let map = match element {
		Value::Object(map) => map,
		_ => unreachable!("the element was built from a map"),
	};

	let inside_reverse = active_property == Some("@reverse");
	let mut result = Map::new();

	for expanded_property in ordered_keys(&map) {
		let expanded_value = map.get(&expanded_property).cloned().unwrap_or(Value::Null);

		match expanded_property.as_str() {
			"@id" => {
				let compacted = match expanded_value.as_str() {
					Some(id) => Value::String(active_context.compact_iri(id, None, false)),
					None => expanded_value.clone(),
				};
				let alias = active_context.compact_iri("@id", None, true);
				result.insert(alias, compacted);
			}
			"@type" => {
				let types: Vec<Value> = as_array(expanded_value)
					.into_iter()
					.map(|t| match t.as_str() {
						Some(t) => Value::String(active_context.compact_iri(t, None, true)),
						None => t,
					})
					.collect();
				let alias = active_context.compact_iri("@type", None, true);
				let compacted = if types.len() == 1 && compact_arrays {
					types.into_iter().next().unwrap_or(Value::Null)
				} else {
					Value::Array(types)
				};
				result.insert(alias, compacted);
			}
			"@reverse" => {
				let Value::Object(reverse_map) = expanded_value else {
					continue;
				};
				let mut remaining = Map::new();
				for property in ordered_keys(&reverse_map) {
					let items =
						as_array(reverse_map.get(&property).cloned().unwrap_or(Value::Null));
					match select_reverse_term(active_context, &property) {
						// reverse terms hoist their values onto the node
						Some(term) => {
							let term = term.to_string();
							let as_array_entry = !compact_arrays
								|| active_context
									.term(&term)
									.and_then(|d| d.container_mapping)
									== Some(ContainerKind::Set);
							for item in items {
								let compacted = compact(
									active_context,
									Some(&term),
									item,
									compact_arrays,
								)?;
								add_value(&mut result, &term, compacted, as_array_entry);
							}
						}
						None => {
							compact_property(
								active_context,
								&mut remaining,
								&property,
								items,
								true,
								compact_arrays,
							)?;
						}
					}
				}
				if !remaining.is_empty() {
					let alias = active_context.compact_iri("@reverse", None, true);
					result.insert(alias, Value::Object(remaining));
				}
			}
			"@preserve" => {
				// framing output: compact the contents, the wrapper is
				// removed by the cleanup pass
				let compacted =
					compact(active_context, active_property, expanded_value, compact_arrays)?;
				if !matches!(&compacted, Value::Array(items) if items.is_empty()) {
					result.insert("@preserve".to_string(), compacted);
				}
			}
			"@index" => {
				let container = active_property
					.and_then(|property| active_context.term(property))
					.and_then(|definition| definition.container_mapping);
				if container != Some(ContainerKind::Index) {
					let alias = active_context.compact_iri("@index", None, true);
					result.insert(alias, expanded_value);
				}
			}
			"@value" | "@language" => {
				// a value object that could not be simplified keeps its
				// keyword entries, compacted to their aliases
				let alias = active_context.compact_iri(&expanded_property, None, true);
				result.insert(alias, expanded_value);
			}
			"@graph" => {
				let compacted =
					compact(active_context, Some("@graph"), expanded_value, compact_arrays)?;
				let alias = active_context.compact_iri("@graph", None, true);
				result.insert(alias, Value::Array(as_array(compacted)));
			}
			"@list" => {
				let compacted =
					compact(active_context, active_property, expanded_value, compact_arrays)?;
				let alias = active_context.compact_iri("@list", None, true);
				result.insert(alias, Value::Array(as_array(compacted)));
			}
			property if is_keyword(property) => {
				// framing flags and defaults pass through under their alias
				let alias = active_context.compact_iri(property, None, true);
				result.insert(alias, expanded_value);
			}
			property => {
				compact_property(
					active_context,
					&mut result,
					property,
					as_array(expanded_value),
					inside_reverse,
					compact_arrays,
				)?;
			}
		}
	}

	Ok(Value::Object(result))
}

fn compact_property(
	active_context: &Context,
	result: &mut Map<String, Value>,
	expanded_property: &str,
	items: Vec<Value>,
	_inside_reverse: bool,
	compact_arrays: bool,
) -> Result<(), Error> {
	// an empty property set still round-trips
	if items.is_empty() {
		let term = active_context.compact_iri(expanded_property, None, true);
		add_value(result, &term, Value::Array(Vec::new()), true);
		return Ok(());
	}

	for item in items {
		let term = active_context.compact_iri(expanded_property, Some(&item), true);
		let definition = active_context.term(&term);
		let container = definition.and_then(|d| d.container_mapping);

		let compacted_item = if is_list(&item) {
			let list_value = item
				.get("@list")
				.cloned()
				.unwrap_or(Value::Array(Vec::new()));
			let index = item.get("@index").cloned();
			let compacted = compact(active_context, Some(&term), list_value, compact_arrays)?;
			let compacted = Value::Array(as_array(compacted));

			if container == Some(ContainerKind::List) {
				// at most one list object per list-container property
				if result.contains_key(&term) {
					return Err(Error::CompactionToListOfLists(term));
				}
				result.insert(term, compacted);
				continue;
			} else {
				let mut wrapper = Map::new();
				let alias = active_context.compact_iri("@list", None, true);
				wrapper.insert(alias, compacted);
				if let Some(index) = index {
					let alias = active_context.compact_iri("@index", None, true);
					wrapper.insert(alias, index);
				}
				Value::Object(wrapper)
			}
		} else {
			compact(active_context, Some(&term), item.clone(), compact_arrays)?
		};

		match container {
			Some(ContainerKind::Language) | Some(ContainerKind::Index) => {
				let key = if container == Some(ContainerKind::Language) {
					item.get("@language").and_then(Value::as_str)
				} else {
					item.get("@index").and_then(Value::as_str)
				};
				let key = key.unwrap_or_default().to_string();

				// inside a language map only the bare value remains
				let map_value = if container == Some(ContainerKind::Language) {
					match compacted_item {
						Value::Object(mut object) => object
							.remove("@value")
							.unwrap_or(Value::Null),
						other => other,
					}
				} else {
					compacted_item
				};

				let entry = result
					.entry(term.clone())
					.or_insert_with(|| Value::Object(Map::new()));
				if let Some(entry) = entry.as_object_mut() {
					add_value(entry, &key, map_value, false);
				}
			}
			_ => {
				let as_array_entry = !compact_arrays
					|| matches!(
						container,
						Some(ContainerKind::Set) | Some(ContainerKind::List)
					) || matches!(expanded_property, "@list" | "@graph");
				add_value(result, &term, compacted_item, as_array_entry);
			}
		}
	}

	Ok(())
}

fn is_node_reference_value(element: &Value) -> bool {
	element
		.as_object()
		.map(|map| map.len() == 1 && map.contains_key("@id"))
		.unwrap_or(false)
}

/// Attempts to collapse a value object or node reference to a scalar.
/// Returns `None` when the object must keep its explicit form.
fn compact_value(
	active_context: &Context,
	active_property: Option<&str>,
	element: &Value,
) -> Option<Value> {
	let map = element.as_object()?;
	let definition = active_property.and_then(|property| active_context.term(property));
	let type_mapping = definition.and_then(|d| d.type_mapping.as_deref());
	let container = definition.and_then(|d| d.container_mapping);

	let mut members = map.len();
	if map.contains_key("@index") && container == Some(ContainerKind::Index) {
		members -= 1;
	}
	if members > 2 {
		return None;
	}

	if let Some(id) = map.get("@id").and_then(Value::as_str) {
		if members == 1 && type_mapping == Some("@id") {
			return Some(Value::String(active_context.compact_iri(id, None, false)));
		}
		if members == 1 && type_mapping == Some("@vocab") {
			return Some(Value::String(active_context.compact_iri(id, None, true)));
		}
		return None;
	}

	let value = map.get("@value")?;

	if let Some(value_type) = map.get("@type").and_then(Value::as_str) {
		if type_mapping == Some(value_type) {
			return Some(value.clone());
		}
		return None;
	}

	if let Some(language) = map.get("@language").and_then(Value::as_str) {
		let effective = match definition.and_then(|d| d.language_mapping.as_ref()) {
			Some(Some(language)) => Some(language.as_str()),
			Some(None) => None,
			None => active_context.language(),
		};
		if effective == Some(language) {
			return Some(value.clone());
		}
		return None;
	}

	if members == 1 {
		// a bare string would pick up the default language, anything else is
		// always safe
		let language_free = match definition.and_then(|d| d.language_mapping.as_ref()) {
			Some(mapping) => mapping.is_none(),
			None => active_context.language().is_none(),
		};
		if !value.is_string() || language_free {
			return Some(value.clone());
		}
	}

	None
}

/// The shortest reverse term bound to `iri`, ties broken by code-point
/// order.
fn select_reverse_term<'a>(active_context: &'a Context, iri: &str) -> Option<&'a str> {
	let mut best: Option<&str> = None;
	for (term, definition) in active_context.terms() {
		if !definition.reverse || definition.iri_mapping != iri {
			continue;
		}
		let better = best
			.map(|b| term.len() < b.len() || (term.len() == b.len() && term < b))
			.unwrap_or(true);
		if better {
			best = Some(term);
		}
	}
	best
}

//! The expansion algorithm: rewrites any JSON-LD input into fully-qualified
//! form, where every key is an IRI or keyword and every value a value
//! object, list object, node object or `@graph` wrapper.

use log::warn;
use serde_json::{Map, Value};

use crate::context::Context;
use crate::error::Error;
use crate::options::JsonLdOptions;
use crate::syntax::{is_keyword, ContainerKind};
use crate::util::{as_array, is_absolute_iri, is_list, is_scalar, is_value, ordered_keys};

/// Expands a whole document: the result is always an array of node objects.
pub fn expand_document(
	active_context: &Context,
	element: Value,
	options: &JsonLdOptions,
) -> Result<Value, Error> {
	let expanded = expand(active_context, None, element, options)?;

	let expanded = match expanded {
		None => Value::Array(Vec::new()),
		Some(Value::Object(map)) if map.len() == 1 && map.contains_key("@graph") => {
			map.into_iter().next().map(|(_, v)| v).unwrap_or(Value::Null)
		}
		Some(other) => other,
	};

	Ok(Value::Array(as_array(expanded)))
}

/// Recursively expands `element` under `active_property`. `None` results are
/// dropped by the caller (free-floating values, nulls).
pub fn expand(
	active_context: &Context,
	active_property: Option<&str>,
	element: Value,
	options: &JsonLdOptions,
) -> Result<Option<Value>, Error> {
	match element {
		Value::Null => Ok(None),
		Value::Array(items) => {
			let inside_list = active_property == Some("@list")
				|| active_property
					.and_then(|property| active_context.term(property))
					.map(|definition| {
						definition.container_mapping == Some(ContainerKind::List)
					})
					.unwrap_or(false);

			let mut result = Vec::new();
			for item in items {
				let expanded = expand(active_context, active_property, item, options)?;
				match expanded {
					None => {}
					Some(expanded) => {
						if inside_list && (expanded.is_array() || is_list(&expanded)) {
							return Err(Error::ListOfLists);
						}
						match expanded {
							Value::Array(items) => result.extend(items),
							other => result.push(other),
						}
					}
				}
			}
			Ok(Some(Value::Array(result)))
		}
		Value::Object(map) => expand_object(active_context, active_property, map, options),
		scalar => {
			// a free-floating scalar expands to nothing
			if active_property.is_none() || active_property == Some("@graph") {
				return Ok(None);
			}
			Ok(Some(expand_value(
				active_context,
				active_property.unwrap_or_default(),
				scalar,
			)))
		}
	}
}

fn expand_object(
	active_context: &Context,
	active_property: Option<&str>,
	mut map: Map<String, Value>,
	options: &JsonLdOptions,
) -> Result<Option<Value>, Error> {
	let processed;
	let active_context = match map.remove("@context") {
		Some(local) => {
			processed = active_context.process(&local, options, &mut Vec::new())?;
			&processed
		}
		None => active_context,
	};

	let mut result = Map::new();

	for key in ordered_keys(&map) {
		let value = map.remove(&key).unwrap_or(Value::Null);

		let expanded_property = active_context.expand_iri(&key, false, true);
		if !is_keyword(&expanded_property) && !is_absolute_iri(&expanded_property) {
			warn!("dropping key `{key}` that does not expand to a keyword or absolute IRI");
			continue;
		}

		if is_keyword(&expanded_property) {
			if active_property == Some("@reverse") {
				return Err(Error::InvalidReversePropertyMap);
			}
			if result.contains_key(&expanded_property) {
				return Err(Error::CollidingKeywords(expanded_property));
			}

			match expanded_property.as_str() {
				"@id" => match value {
					Value::String(id) => {
						result.insert(
							"@id".to_string(),
							Value::String(active_context.expand_iri(&id, true, false)),
						);
					}
					other => return Err(Error::InvalidIdValue(other.to_string())),
				},
				"@type" => {
					let expanded = expand_type_value(active_context, value)?;
					result.insert("@type".to_string(), expanded);
				}
				"@graph" => {
					let expanded =
						expand(active_context, Some("@graph"), value, options)?
							.unwrap_or(Value::Array(Vec::new()));
					result.insert("@graph".to_string(), Value::Array(as_array(expanded)));
				}
				"@value" => {
					if !value.is_null() && !is_scalar(&value) {
						return Err(Error::InvalidValueObjectValue);
					}
					result.insert("@value".to_string(), value);
				}
				"@language" => match value {
					Value::String(language) => {
						result.insert(
							"@language".to_string(),
							Value::String(language.to_lowercase()),
						);
					}
					_ => return Err(Error::InvalidLanguageTaggedString),
				},
				"@index" => match value {
					Value::String(index) => {
						result.insert("@index".to_string(), Value::String(index));
					}
					other => return Err(Error::InvalidIndexValue(other.to_string())),
				},
				"@list" => {
					// a free-floating list is dropped with its contents
					if active_property.is_none() || active_property == Some("@graph") {
						continue;
					}
					let expanded = expand(active_context, active_property, value, options)?
						.unwrap_or(Value::Array(Vec::new()));
					let items = as_array(expanded);
					// a list object as a direct list element cannot be
					// represented
					if items.iter().any(is_list) {
						return Err(Error::ListOfLists);
					}
					result.insert("@list".to_string(), Value::Array(items));
				}
				"@set" => {
					let expanded = expand(active_context, active_property, value, options)?
						.unwrap_or(Value::Array(Vec::new()));
					result.insert("@set".to_string(), expanded);
				}
				"@reverse" => {
					if !value.is_object() {
						return Err(Error::InvalidReverseValue);
					}
					let expanded = expand(active_context, Some("@reverse"), value, options)?;
					if let Some(Value::Object(expanded)) = expanded {
						merge_reverse_value(&mut result, expanded)?;
					}
				}
				// framing keywords survive expansion so frames can carry
				// their flags and defaults
				"@default" | "@embed" | "@explicit" | "@omitDefault" | "@preserve" => {
					let expanded = expand(
						active_context,
						Some(expanded_property.as_str()),
						value,
						options,
					)?
					.unwrap_or(Value::Null);
					result.insert(
						expanded_property.clone(),
						Value::Array(as_array(expanded)),
					);
				}
				_ => {
					warn!("dropping unhandled keyword `{expanded_property}`");
				}
			}
			continue;
		}

		let definition = active_context.term(&key);
		let container = definition.and_then(|d| d.container_mapping);
		let reverse = definition.map(|d| d.reverse).unwrap_or(false);

		let expanded_value = match (&value, container) {
			(Value::Object(language_map), Some(ContainerKind::Language)) => {
				Some(expand_language_map(language_map)?)
			}
			(Value::Object(index_map), Some(ContainerKind::Index)) => {
				Some(expand_index_map(active_context, &key, index_map, options)?)
			}
			_ => expand(active_context, Some(&key), value, options)?,
		};

		let Some(mut expanded_value) = expanded_value else {
			continue;
		};

		if container == Some(ContainerKind::List) && !is_list(&expanded_value) {
			let mut list = Map::new();
			list.insert(
				"@list".to_string(),
				Value::Array(as_array(expanded_value)),
			);
			expanded_value = Value::Object(list);
		}

		if reverse {
			let reverse_map = result
				.entry("@reverse")
				.or_insert_with(|| Value::Object(Map::new()));
			let reverse_map = reverse_map
				.as_object_mut()
				.expect("the `@reverse` entry is always an object");
			for item in as_array(expanded_value) {
				if is_list(&item) || is_value(&item) {
					return Err(Error::InvalidReversePropertyValue);
				}
				append_values(reverse_map, &expanded_property, vec![item]);
			}
		} else {
			append_values(&mut result, &expanded_property, as_array(expanded_value));
		}
	}

	finalize_expanded_object(active_property, result)
}

fn expand_type_value(active_context: &Context, value: Value) -> Result<Value, Error> {
	match value {
		Value::String(t) => Ok(Value::String(active_context.expand_iri(&t, true, true))),
		Value::Array(items) => {
			let mut types = Vec::new();
			for item in items {
				types.push(expand_type_value(active_context, item)?);
			}
			Ok(Value::Array(types))
		}
		// an empty object is the framing wildcard for "has any type"
		Value::Object(map) if map.is_empty() => Ok(Value::Object(map)),
		_ => Err(Error::InvalidTypeValue),
	}
}

fn expand_language_map(language_map: &Map<String, Value>) -> Result<Value, Error> {
	let mut result = Vec::new();
	for language in ordered_keys(language_map) {
		for item in as_array(language_map.get(&language).cloned().unwrap_or(Value::Null)) {
			match item {
				Value::Null => {}
				Value::String(text) => {
					let mut object = Map::new();
					object.insert("@value".to_string(), Value::String(text));
					object.insert(
						"@language".to_string(),
						Value::String(language.to_lowercase()),
					);
					result.push(Value::Object(object));
				}
				_ => return Err(Error::InvalidLanguageMapValue),
			}
		}
	}
	Ok(Value::Array(result))
}

fn expand_index_map(
	active_context: &Context,
	key: &str,
	index_map: &Map<String, Value>,
	options: &JsonLdOptions,
) -> Result<Value, Error> {
	let mut result = Vec::new();
	for index in ordered_keys(index_map) {
		let items = as_array(index_map.get(&index).cloned().unwrap_or(Value::Null));
		let expanded = expand(active_context, Some(key), Value::Array(items), options)?
			.unwrap_or(Value::Array(Vec::new()));
		for item in as_array(expanded) {
			let mut item = match item {
				Value::Object(map) => map,
				other => {
					return Err(Error::InvalidIndexValue(other.to_string()));
				}
			};
			item.entry("@index")
				.or_insert_with(|| Value::String(index.clone()));
			result.push(Value::Object(item));
		}
	}
	Ok(Value::Array(result))
}

fn merge_reverse_value(
	result: &mut Map<String, Value>,
	expanded: Map<String, Value>,
) -> Result<(), Error> {
	for (property, items) in expanded {
		if property == "@reverse" {
			// double reverse: the properties point forward again
			if let Value::Object(forward) = items {
				for (property, items) in forward {
					append_values(result, &property, as_array(items));
				}
			}
		} else {
			let reverse_map = result
				.entry("@reverse")
				.or_insert_with(|| Value::Object(Map::new()));
			let reverse_map = reverse_map
				.as_object_mut()
				.expect("the `@reverse` entry is always an object");
			for item in as_array(items) {
				if is_list(&item) || is_value(&item) {
					return Err(Error::InvalidReversePropertyValue);
				}
				append_values(reverse_map, &property, vec![item]);
			}
		}
	}
	Ok(())
}

fn append_values(map: &mut Map<String, Value>, property: &str, values: Vec<Value>) {
	let entry = map
		.entry(property)
		.or_insert_with(|| Value::Array(Vec::new()));
	if !entry.is_array() {
		let existing = entry.take();
		*entry = Value::Array(vec![existing]);
	}
	if let Value::Array(items) = entry {
		items.extend(values);
	}
}

fn finalize_expanded_object(
	active_property: Option<&str>,
	mut result: Map<String, Value>,
) -> Result<Option<Value>, Error> {
	if result.contains_key("@value") {
		for key in result.keys() {
			if !matches!(key.as_str(), "@value" | "@language" | "@type" | "@index") {
				return Err(Error::InvalidValueObject(key.clone()));
			}
		}
		if result.contains_key("@language") && result.contains_key("@type") {
			return Err(Error::InvalidValueObject(
				"both `@type` and `@language`".to_string(),
			));
		}

		let value = result.get("@value").cloned().unwrap_or(Value::Null);
		if value.is_null() {
			return Ok(None);
		}
		if !value.is_string() && result.contains_key("@language") {
			return Err(Error::InvalidLanguageTaggedValue);
		}
		if let Some(type_value) = result.get("@type") {
			let valid = type_value
				.as_str()
				.map(is_absolute_iri)
				.unwrap_or(false);
			if !valid {
				return Err(Error::InvalidTypedValue);
			}
		}
	} else if let Some(type_value) = result.get_mut("@type") {
		if !type_value.is_array() {
			let single = type_value.take();
			*type_value = Value::Array(vec![single]);
		}
	} else if result.contains_key("@set") || result.contains_key("@list") {
		if result.len() > 1 && !(result.len() == 2 && result.contains_key("@index")) {
			return Err(Error::InvalidSetOrListObject);
		}
		if let Some(set) = result.remove("@set") {
			return Ok(Some(set));
		}
	}

	if result.len() == 1 && result.contains_key("@language") {
		return Ok(None);
	}

	if active_property.is_none() || active_property == Some("@graph") {
		let free_floating = result.is_empty()
			|| result.contains_key("@value")
			|| result.contains_key("@list")
			|| (result.len() == 1 && result.contains_key("@id"));
		if free_floating {
			return Ok(None);
		}
	}

	Ok(Some(Value::Object(result)))
}

/// Expands a scalar value against the coercion rules of `active_property`.
fn expand_value(active_context: &Context, active_property: &str, value: Value) -> Value {
	let definition = active_context.term(active_property);
	let type_mapping = definition.and_then(|d| d.type_mapping.as_deref());

	if let Value::String(string) = &value {
		match type_mapping {
			Some("@id") => {
				let mut result = Map::new();
				result.insert(
					"@id".to_string(),
					Value::String(active_context.expand_iri(string, true, false)),
				);
				return Value::Object(result);
			}
			Some("@vocab") => {
				let mut result = Map::new();
				result.insert(
					"@id".to_string(),
					Value::String(active_context.expand_iri(string, true, true)),
				);
				return Value::Object(result);
			}
			_ => {}
		}
	}

	let is_string = value.is_string();
	let mut result = Map::new();
	result.insert("@value".to_string(), value);

	match type_mapping {
		Some(type_mapping) if type_mapping != "@id" && type_mapping != "@vocab" => {
			result.insert(
				"@type".to_string(),
				Value::String(type_mapping.to_string()),
			);
		}
		_ => {
			if is_string {
				let language = match definition.and_then(|d| d.language_mapping.as_ref()) {
					Some(Some(language)) => Some(language.as_str()),
					Some(None) => None,
					None => active_context.language(),
				};
				if let Some(language) = language {
					result.insert(
						"@language".to_string(),
						Value::String(language.to_string()),
					);
				}
			}
		}
	}

	Value::Object(result)
}

//! Structural predicates and helpers over the polymorphic JSON tree.

use serde_json::{Map, Value};

use crate::syntax::is_keyword;

/// Checks if the given value is a node object: an object that is neither a
/// value object, a list object nor a set wrapper, and that carries more than
/// a lone `@id`.
pub fn is_node(value: &Value) -> bool {
	match value.as_object() {
		Some(map) => {
			!map.contains_key("@value")
				&& !map.contains_key("@list")
				&& !map.contains_key("@set")
				&& (map.len() > 1 || !map.contains_key("@id"))
		}
		None => false,
	}
}

/// Checks if the given value is a node reference: an object whose only key is
/// `@id`.
pub fn is_node_reference(value: &Value) -> bool {
	match value.as_object() {
		Some(map) => map.len() == 1 && map.contains_key("@id"),
		None => false,
	}
}

/// Checks if the given value is a value object.
pub fn is_value(value: &Value) -> bool {
	value
		.as_object()
		.map(|map| map.contains_key("@value"))
		.unwrap_or(false)
}

/// Checks if the given value is a list object.
pub fn is_list(value: &Value) -> bool {
	value
		.as_object()
		.map(|map| map.contains_key("@list"))
		.unwrap_or(false)
}

/// Checks if the given string is a blank node identifier.
pub fn is_blank_node(value: &str) -> bool {
	value.starts_with("_:")
}

/// Lenient absolute-IRI test used to drive keep/skip decisions in the
/// algorithms: anything carrying a scheme (or blank node) separator counts.
/// Strict IRI validation happens at the `iref` boundary where required.
pub fn is_absolute_iri(value: &str) -> bool {
	value.contains(':')
}

/// A string is a relative IRI unless it is a keyword or an absolute IRI.
pub fn is_relative_iri(value: &str) -> bool {
	!is_keyword(value) && !is_absolute_iri(value)
}

/// Checks if the given value is a JSON scalar (string, number or boolean).
pub fn is_scalar(value: &Value) -> bool {
	matches!(
		value,
		Value::String(_) | Value::Number(_) | Value::Bool(_)
	)
}

/// Returns the keys of the map in code-point order. Every algorithm that
/// iterates over object keys does so through this function to keep output
/// byte-identical across runs.
pub fn ordered_keys(map: &Map<String, Value>) -> Vec<String> {
	let mut keys: Vec<String> = map.keys().cloned().collect();
	keys.sort();
	keys
}

/// Wraps the value into an array if it is not one already.
pub fn as_array(value: Value) -> Vec<Value> {
	match value {
		Value::Array(items) => items,
		other => vec![other],
	}
}

/// Deep structural comparison.
///
/// When `list_order` is false, arrays compare as unordered multisets. This is
/// the comparison the transforms use to de-duplicate property values and the
/// test oracles use to compare documents up to set order.
pub fn deep_compare(v1: &Value, v2: &Value, list_order: bool) -> bool {
	match (v1, v2) {
		(Value::Array(a), Value::Array(b)) => {
			if a.len() != b.len() {
				return false;
			}
			if list_order {
				a.iter().zip(b).all(|(x, y)| deep_compare(x, y, true))
			} else {
				let mut used = vec![false; b.len()];
				for x in a {
					let mut found = false;
					for (i, y) in b.iter().enumerate() {
						if !used[i] && deep_compare(x, y, false) {
							used[i] = true;
							found = true;
							break;
						}
					}
					if !found {
						return false;
					}
				}
				true
			}
		}
		(Value::Object(a), Value::Object(b)) => {
			a.len() == b.len()
				&& a.iter().all(|(key, value)| {
					b.get(key)
						.map(|other| deep_compare(value, other, list_order))
						.unwrap_or(false)
				})
		}
		_ => v1 == v2,
	}
}

/// Checks whether `values` already holds an entry structurally equal to
/// `value`.
pub fn contains_value(values: &[Value], value: &Value) -> bool {
	values.iter().any(|v| deep_compare(v, value, false))
}

/// Adds a value to the entry of `subject` under `property`, mirroring the
/// merge rules of the node-map and compaction algorithms: existing scalars
/// become arrays when a second value arrives, and `as_array` forces array
/// shape from the first value on.
pub fn add_value(subject: &mut Map<String, Value>, property: &str, value: Value, as_array: bool) {
	if as_array && !subject.contains_key(property) {
		subject.insert(property.to_string(), Value::Array(Vec::new()));
	}

	match subject.get_mut(property) {
		Some(Value::Array(items)) => items.push(value),
		Some(other) => {
			let existing = other.take();
			*other = Value::Array(vec![existing, value]);
		}
		None => {
			subject.insert(property.to_string(), value);
		}
	}
}

/// Canonical lexical form of an XSD double: `d.dddddddddddddddE±n` with
/// trailing zeros removed from the mantissa.
pub fn canonical_double(value: f64) -> String {
	if value == 0.0 {
		return "0.0E0".to_string();
	}

	let formatted = format!("{value:.15e}");
	let (mantissa, exponent) = formatted
		.split_once('e')
		.expect("exponential format always contains an exponent");

	let mantissa = mantissa.trim_end_matches('0');
	let mantissa = if mantissa.ends_with('.') {
		format!("{mantissa}0")
	} else {
		mantissa.to_string()
	};

	format!("{mantissa}E{exponent}")
}

/// Canonical lexical form of an XSD integer.
pub fn canonical_integer(value: f64) -> String {
	format!("{}", value.trunc() as i64)
}

#[cfg(test)]
mod tests {
	use super::*;
	use serde_json::json;

	#[test]
	fn node_predicates() {
		assert!(is_node(&json!({"@id": "ex:a", "ex:p": []})));
		assert!(!is_node(&json!({"@id": "ex:a"})));
		assert!(is_node_reference(&json!({"@id": "ex:a"})));
		assert!(!is_node(&json!({"@value": 1})));
		assert!(is_value(&json!({"@value": 1})));
		assert!(is_list(&json!({"@list": []})));
	}

	#[test]
	fn iri_predicates() {
		assert!(is_absolute_iri("http://example.org/"));
		assert!(is_absolute_iri("_:b0"));
		assert!(is_relative_iri("relative/path"));
		assert!(!is_relative_iri("@default"));
	}

	#[test]
	fn unordered_array_comparison() {
		let a = json!([{"@id": "ex:a"}, {"@id": "ex:b"}]);
		let b = json!([{"@id": "ex:b"}, {"@id": "ex:a"}]);
		assert!(deep_compare(&a, &b, false));
		assert!(!deep_compare(&a, &b, true));
	}

	#[test]
	fn canonical_doubles() {
		assert_eq!(canonical_double(1.1e1), "1.1E1");
		assert_eq!(canonical_double(1.0), "1.0E0");
		assert_eq!(canonical_double(0.0), "0.0E0");
		assert_eq!(canonical_double(-0.25), "-2.5E-1");
		assert_eq!(canonical_double(5.3e-10), "5.3E-10");
	}
}

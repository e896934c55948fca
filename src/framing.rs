//! Framing: selects and embeds nodes matching a frame pattern.
//!
//! The output tree is built in an arena of nodes so that an already-placed
//! embed can later be revoked by mutating the container it was placed into,
//! without cyclic ownership.

use std::collections::BTreeMap;

use indexmap::IndexMap;
use serde_json::{Map, Value};

use crate::error::Error;
use crate::options::JsonLdOptions;
use crate::syntax::is_keyword;
use crate::util::{as_array, deep_compare, is_list, is_node_reference, ordered_keys};

/// A value held by a frame node entry: either a finished JSON value or a
/// reference to another arena node.
#[derive(Debug, Clone)]
enum FrameItem {
	Value(Value),
	Node(usize),
}

/// A single entry of a frame node: keyword copies are fixed values, property
/// values accumulate items.
#[derive(Debug, Clone)]
enum FrameEntry {
	Fixed(Value),
	Items(Vec<FrameItem>),
}

type FrameNode = IndexMap<String, FrameEntry>;

/// Where an embedded node was placed.
#[derive(Debug, Clone, PartialEq, Eq)]
enum FrameParent {
	/// The top-level output array.
	Top,
	/// An arena node.
	Node(usize),
}

/// Meta information recorded for every embedded node, so that a stronger
/// claim can revoke the embed later.
#[derive(Debug, Clone)]
struct EmbedRecord {
	parent: FrameParent,
	property: String,
}

struct FramingState {
	embed: bool,
	explicit: bool,
	omit_default: bool,
	embeds: IndexMap<String, EmbedRecord>,
	arena: Vec<FrameNode>,
	top: Vec<FrameItem>,
}

impl FramingState {
	fn new(options: &JsonLdOptions) -> Self {
		Self {
			embed: options.embed,
			explicit: options.explicit,
			omit_default: options.omit_default,
			embeds: IndexMap::new(),
			arena: Vec::new(),
			top: Vec::new(),
		}
	}

	fn new_node(&mut self) -> usize {
		self.arena.push(FrameNode::new());
		self.arena.len() - 1
	}

	fn add_output(&mut self, parent: &FrameParent, property: &str, item: FrameItem) {
		match parent {
			FrameParent::Top => self.top.push(item),
			FrameParent::Node(index) => {
				let entry = self.arena[*index]
					.entry(property.to_string())
					.or_insert_with(|| FrameEntry::Items(Vec::new()));
				match entry {
					FrameEntry::Items(items) => items.push(item),
					FrameEntry::Fixed(_) => {}
				}
			}
		}
	}

	fn node_id(&self, index: usize) -> Option<&str> {
		match self.arena[index].get("@id") {
			Some(FrameEntry::Fixed(Value::String(id))) => Some(id),
			_ => None,
		}
	}

	fn item_references(&self, item: &FrameItem, id: &str) -> bool {
		match item {
			FrameItem::Value(value) => {
				value.get("@id").and_then(Value::as_str) == Some(id)
			}
			FrameItem::Node(index) => self.node_id(*index) == Some(id),
		}
	}
}

/// Frames an expanded input against an expanded frame. `node_map` is the
/// default graph of the input's node map.
pub fn frame_document(
	node_map: &Map<String, Value>,
	frame: &Map<String, Value>,
	options: &JsonLdOptions,
) -> Result<Value, Error> {
	let mut state = FramingState::new(options);

	let subjects: IndexMap<String, Value> = node_map
		.iter()
		.map(|(id, node)| (id.clone(), node.clone()))
		.collect();

	frame_subjects(
		&mut state,
		&subjects,
		node_map,
		frame,
		FrameParent::Top,
		None,
	)?;

	let top = state.top.clone();
	let framed: Vec<Value> = top.iter().map(|item| materialize(&state, item)).collect();
	Ok(Value::Array(framed))
}

fn frame_subjects(
	state: &mut FramingState,
	subjects: &IndexMap<String, Value>,
	node_map: &Map<String, Value>,
	frame: &Map<String, Value>,
	parent: FrameParent,
	property: Option<&str>,
) -> Result<(), Error> {
	let matches = filter_subjects(subjects, frame)?;

	let embed_flag = get_frame_flag(frame, "@embed", state.embed);
	let explicit_flag = get_frame_flag(frame, "@explicit", state.explicit);

	for (id, element) in matches {
		if property.is_none() {
			state.embeds.clear();
		}

		let record = EmbedRecord {
			parent: parent.clone(),
			property: property.unwrap_or_default().to_string(),
		};

		let mut embed_active = embed_flag;
		if embed_active {
			if let Some(existing) = state.embeds.get(&id).cloned() {
				embed_active = false;
				// only revoke when the earlier embed is really in place
				match &existing.parent {
					FrameParent::Top => {
						let top = state.top.clone();
						for item in &top {
							let reference_only = match item {
								FrameItem::Value(value) => value
									.as_object()
									.map(|map| {
										map.len() == 1
											&& map.get("@id").and_then(Value::as_str)
												== Some(id.as_str())
									})
									.unwrap_or(false),
								FrameItem::Node(_) => false,
							};
							if reference_only {
								embed_active = true;
								break;
							}
						}
					}
					FrameParent::Node(index) => {
						if let Some(FrameEntry::Items(items)) =
							state.arena[*index].get(&existing.property)
						{
							let items = items.clone();
							if items
								.iter()
								.any(|item| state.item_references(item, &id))
							{
								embed_active = true;
							}
						}
					}
				}

				if embed_active {
					remove_embed(state, &id);
				}
			}
		}

		if !embed_active {
			let mut reference = Map::new();
			reference.insert("@id".to_string(), Value::String(id.clone()));
			state.add_output(
				&parent,
				property.unwrap_or_default(),
				FrameItem::Value(Value::Object(reference)),
			);
			continue;
		}

		state.embeds.insert(id.clone(), record);

		let output = state.new_node();
		state.arena[output].insert(
			"@id".to_string(),
			FrameEntry::Fixed(Value::String(id.clone())),
		);

		let element_map = element.as_object().cloned().unwrap_or_default();

		for prop in ordered_keys(&element_map) {
			let values = element_map.get(&prop).cloned().unwrap_or(Value::Null);

			if is_keyword(&prop) {
				if prop != "@id" {
					state.arena[output].insert(prop.clone(), FrameEntry::Fixed(values));
				}
				continue;
			}

			if !frame.contains_key(&prop) {
				// properties absent from the frame are embedded verbatim,
				// unless explicit inclusion was requested
				if !explicit_flag {
					embed_values(state, node_map, &element_map, &prop, FrameParent::Node(output));
				}
				continue;
			}

			let subframe = property_frame(frame, &prop);

			for item in as_array(values) {
				if is_list(&item) {
					let list_node = state.new_node();
					state.arena[list_node]
						.insert("@list".to_string(), FrameEntry::Items(Vec::new()));
					state.add_output(
						&FrameParent::Node(output),
						&prop,
						FrameItem::Node(list_node),
					);

					let list_items = item
						.get("@list")
						.and_then(Value::as_array)
						.cloned()
						.unwrap_or_default();
					for list_item in list_items {
						if is_node_reference(&list_item) {
							let item_id = list_item
								.get("@id")
								.and_then(Value::as_str)
								.unwrap_or_default()
								.to_string();
							let selection = select_subject(node_map, &item_id);
							frame_subjects(
								state,
								&selection,
								node_map,
								&subframe,
								FrameParent::Node(list_node),
								Some("@list"),
							)?;
						} else {
							state.add_output(
								&FrameParent::Node(list_node),
								"@list",
								FrameItem::Value(list_item),
							);
						}
					}
				} else if is_node_reference(&item) {
					let item_id = item
						.get("@id")
						.and_then(Value::as_str)
						.unwrap_or_default()
						.to_string();
					let selection = select_subject(node_map, &item_id);
					frame_subjects(
						state,
						&selection,
						node_map,
						&subframe,
						FrameParent::Node(output),
						Some(&prop),
					)?;
				} else {
					state.add_output(&FrameParent::Node(output), &prop, FrameItem::Value(item));
				}
			}
		}

		// insert defaults for frame properties the subject does not carry
		for prop in ordered_keys(frame) {
			if is_keyword(&prop) {
				continue;
			}
			let subframe = property_frame(frame, &prop);
			let omit = get_frame_flag(&subframe, "@omitDefault", state.omit_default);
			if omit || state.arena[output].contains_key(&prop) {
				continue;
			}

			let default = match subframe.get("@default") {
				Some(default) => as_array(default.clone()),
				None => vec![Value::String("@null".to_string())],
			};
			let mut preserve = Map::new();
			preserve.insert("@preserve".to_string(), Value::Array(default));
			state.arena[output].insert(
				prop.clone(),
				FrameEntry::Fixed(Value::Array(vec![Value::Object(preserve)])),
			);
		}

		state.add_output(&parent, property.unwrap_or_default(), FrameItem::Node(output));
	}

	Ok(())
}

/// The nodes of `node_map` matching the frame, in code-point id order.
fn filter_subjects(
	subjects: &IndexMap<String, Value>,
	frame: &Map<String, Value>,
) -> Result<BTreeMap<String, Value>, Error> {
	let mut matches = BTreeMap::new();
	for (id, node) in subjects {
		if let Some(node_map) = node.as_object() {
			if filter_subject(node_map, frame)? {
				matches.insert(id.clone(), node.clone());
			}
		}
	}
	Ok(matches)
}

/// Frame matching: a frame `@type` matches by set intersection (the empty
/// object pattern means "has any type"); without `@type`, the frame's
/// non-keyword properties must all be present.
fn filter_subject(
	node: &Map<String, Value>,
	frame: &Map<String, Value>,
) -> Result<bool, Error> {
	if let Some(types) = frame.get("@type") {
		let types = types
			.as_array()
			.ok_or_else(|| Error::SyntaxError("frame `@type` must be an array".to_string()))?;
		let node_types = node
			.get("@type")
			.cloned()
			.map(as_array)
			.unwrap_or_default();

		if types.len() == 1 {
			if let Some(map) = types[0].as_object() {
				if map.is_empty() {
					return Ok(!node_types.is_empty());
				}
			}
		}

		for node_type in &node_types {
			for frame_type in types {
				if deep_compare(node_type, frame_type, false) {
					return Ok(true);
				}
			}
		}
		return Ok(false);
	}

	for key in frame.keys() {
		let node_contains = node.contains_key(key);
		if key == "@id" || (!is_keyword(key) && !node_contains) {
			return Ok(false);
		}
	}
	Ok(true)
}

/// The sub-frame to apply to values of `property`, defaulting to the
/// wildcard frame.
fn property_frame(frame: &Map<String, Value>, property: &str) -> Map<String, Value> {
	frame
		.get(property)
		.map(|value| as_array(value.clone()))
		.and_then(|values| values.into_iter().next())
		.and_then(|value| value.as_object().cloned())
		.unwrap_or_default()
}

fn select_subject(node_map: &Map<String, Value>, id: &str) -> IndexMap<String, Value> {
	let mut selection = IndexMap::new();
	let node = node_map.get(id).cloned().unwrap_or_else(|| {
		let mut reference = Map::new();
		reference.insert("@id".to_string(), Value::String(id.to_string()));
		Value::Object(reference)
	});
	selection.insert(id.to_string(), node);
	selection
}

/// Reads a framing flag, accepting bare booleans, arrays and value objects.
fn get_frame_flag(frame: &Map<String, Value>, name: &str, default: bool) -> bool {
	let mut value = match frame.get(name) {
		Some(value) => value.clone(),
		None => return default,
	};

	if let Value::Array(items) = &value {
		if let Some(first) = items.first() {
			value = first.clone();
		}
	}
	if let Value::Object(map) = &value {
		if let Some(inner) = map.get("@value") {
			value = inner.clone();
		}
	}

	value.as_bool().unwrap_or(default)
}

/// Replaces a previously placed embed with a bare reference and cascades the
/// revocation to embeds parented by the revoked node.
fn remove_embed(state: &mut FramingState, id: &str) {
	let Some(record) = state.embeds.get(id).cloned() else {
		return;
	};

	if let FrameParent::Node(index) = record.parent {
		if let Some(FrameEntry::Items(items)) =
			state.arena[index].get(&record.property).cloned().as_ref()
		{
			let replaced: Vec<FrameItem> = items
				.iter()
				.map(|item| {
					if state.item_references(item, id) {
						let mut reference = Map::new();
						reference.insert("@id".to_string(), Value::String(id.to_string()));
						FrameItem::Value(Value::Object(reference))
					} else {
						item.clone()
					}
				})
				.collect();
			state.arena[index]
				.insert(record.property.clone(), FrameEntry::Items(replaced));
		}
	}

	remove_dependents(state, id);
}

fn remove_dependents(state: &mut FramingState, id: &str) {
	let dependents: Vec<String> = state
		.embeds
		.iter()
		.filter_map(|(dependent, record)| match &record.parent {
			FrameParent::Node(index) => {
				if state.node_id(*index) == Some(id) {
					Some(dependent.clone())
				} else {
					None
				}
			}
			FrameParent::Top => None,
		})
		.collect();

	for dependent in dependents {
		if state.embeds.shift_remove(&dependent).is_some() {
			remove_dependents(state, &dependent);
		}
	}
}

/// Embeds the values of `element[property]` into the output, recursing into
/// node references that are not embedded elsewhere yet.
fn embed_values(
	state: &mut FramingState,
	node_map: &Map<String, Value>,
	element: &Map<String, Value>,
	property: &str,
	output: FrameParent,
) {
	let values = element
		.get(property)
		.cloned()
		.map(as_array)
		.unwrap_or_default();

	for value in values {
		if is_list(&value) {
			let list_node = state.new_node();
			state.arena[list_node].insert("@list".to_string(), FrameEntry::Items(Vec::new()));
			if let Some(list_map) = value.as_object() {
				embed_values(state, node_map, list_map, "@list", FrameParent::Node(list_node));
			}
			state.add_output(&output, property, FrameItem::Node(list_node));
		} else if is_node_reference(&value) {
			let subject_id = value
				.get("@id")
				.and_then(Value::as_str)
				.unwrap_or_default()
				.to_string();

			if !state.embeds.contains_key(&subject_id) {
				state.embeds.insert(
					subject_id.clone(),
					EmbedRecord {
						parent: output.clone(),
						property: property.to_string(),
					},
				);

				let subject = node_map
					.get(&subject_id)
					.and_then(Value::as_object)
					.cloned()
					.unwrap_or_else(|| {
						let mut reference = Map::new();
						reference
							.insert("@id".to_string(), Value::String(subject_id.clone()));
						reference
					});

				let embedded = state.new_node();
				for prop in ordered_keys(&subject) {
					if is_keyword(&prop) {
						let copied = subject.get(&prop).cloned().unwrap_or(Value::Null);
						state.arena[embedded].insert(prop.clone(), FrameEntry::Fixed(copied));
						continue;
					}
					embed_values(
						state,
						node_map,
						&subject,
						&prop,
						FrameParent::Node(embedded),
					);
				}
				state.add_output(&output, property, FrameItem::Node(embedded));
			} else {
				state.add_output(&output, property, FrameItem::Value(value));
			}
		} else {
			state.add_output(&output, property, FrameItem::Value(value));
		}
	}
}

/// Resolves arena references into a finished JSON tree.
fn materialize(state: &FramingState, item: &FrameItem) -> Value {
	match item {
		FrameItem::Value(value) => value.clone(),
		FrameItem::Node(index) => {
			let mut result = Map::new();
			for (key, entry) in &state.arena[*index] {
				match entry {
					FrameEntry::Fixed(value) => {
						result.insert(key.clone(), value.clone());
					}
					FrameEntry::Items(items) => {
						let values: Vec<Value> =
							items.iter().map(|item| materialize(state, item)).collect();
						result.insert(key.clone(), Value::Array(values));
					}
				}
			}
			Value::Object(result)
		}
	}
}

/// Unwraps `@preserve` wrappers after compaction: the wrapped default value
/// replaces the wrapper, `@null` markers become JSON nulls.
pub fn remove_preserve(value: Value) -> Value {
	match value {
		Value::Array(items) => {
			Value::Array(items.into_iter().map(remove_preserve).collect())
		}
		Value::Object(mut map) => {
			if let Some(preserved) = map.remove("@preserve") {
				let preserved = remove_preserve(preserved);
				let unwrapped = match preserved {
					Value::Array(mut items) if items.len() == 1 => items.remove(0),
					other => other,
				};
				if unwrapped == Value::String("@null".to_string()) {
					return Value::Null;
				}
				return unwrapped;
			}

			let mut result = Map::new();
			for (key, entry) in map {
				result.insert(key, remove_preserve(entry));
			}
			Value::Object(result)
		}
		other => other,
	}
}

//! JSON-LD transforms and RDF dataset canonicalization.
//!
//! This crate implements the JSON-LD processing pipeline (expansion,
//! node-map generation, compaction, framing, and the bidirectional
//! conversion between expanded JSON-LD and RDF datasets) together with a
//! deterministic, signature-friendly canonical serialization of any RDF
//! dataset as N-Quads.
//!
//! Documents are plain [`serde_json::Value`] trees; every transform is
//! synchronous and only the configured [`DocumentLoader`] ever performs I/O.
//!
//! ```
//! use serde_json::json;
//! use json_ld_processing::{expand, JsonLdOptions};
//!
//! let doc = json!({
//! 	"@context": {"name": "http://schema.org/name"},
//! 	"name": "Jane Doe"
//! });
//! let expanded = expand(&doc, &JsonLdOptions::new()).unwrap();
//! assert_eq!(
//! 	expanded,
//! 	json!([{"http://schema.org/name": [{"@value": "Jane Doe"}]}])
//! );
//! ```

use serde_json::{Map, Value};

pub mod canon;
pub mod compaction;
pub mod context;
pub mod error;
pub mod expansion;
pub mod framing;
pub mod id;
pub mod loader;
pub mod node_map;
pub mod options;
pub mod rdf;
pub mod syntax;
pub mod util;

pub use context::{Context, TermDefinition};
pub use error::{Error, ErrorCode};
pub use id::IdentifierIssuer;
pub use loader::{CachingLoader, DocumentLoader, NoLoader, RemoteDocument};
pub use options::{Algorithm, JsonLdOptions, ProcessingMode};
pub use rdf::{RdfDataset, RdfLiteral, RdfNode, RdfQuad};
pub use syntax::Keyword;

/// The result of [`to_rdf`]: a dataset, or its N-Quads serialization when
/// the `format` option asked for one.
#[derive(Debug, Clone)]
pub enum RdfOutput {
	Dataset(RdfDataset),
	NQuads(String),
}

impl RdfOutput {
	pub fn into_dataset(self) -> Option<RdfDataset> {
		match self {
			Self::Dataset(dataset) => Some(dataset),
			Self::NQuads(_) => None,
		}
	}

	pub fn into_nquads(self) -> Option<String> {
		match self {
			Self::Dataset(_) => None,
			Self::NQuads(string) => Some(string),
		}
	}
}

/// Resolves the input document: a string input is an IRI to dereference,
/// anything else is the parsed document itself.
fn resolve_input(
	input: &Value,
	options: &JsonLdOptions,
) -> Result<(Value, Option<String>, Option<String>), Error> {
	match input.as_str() {
		Some(url) => {
			let remote = options.loader().load_document(url)?;
			Ok((
				remote.document,
				Some(remote.document_url),
				remote.context_url,
			))
		}
		None => Ok((input.clone(), None, None)),
	}
}

/// Extracts the context value from a context document: documents wrapping a
/// `@context` entry contribute that entry.
fn context_value(context: &Value) -> Value {
	match context.get("@context") {
		Some(inner) => inner.clone(),
		None => context.clone(),
	}
}

/// Builds the initial active context for a transform.
fn initial_context(
	options: &JsonLdOptions,
	document_url: Option<&str>,
	remote_context: Option<&str>,
) -> Result<Context, Error> {
	let base = options.base.as_deref().or(document_url);
	let mut active_context = Context::new(base)?;

	if let Some(expand_context) = &options.expand_context {
		let local = context_value(expand_context);
		active_context = active_context.process(&local, options, &mut Vec::new())?;
	}

	if let Some(url) = remote_context {
		let local = Value::String(url.to_string());
		active_context = active_context.process(&local, options, &mut Vec::new())?;
	}

	Ok(active_context)
}

/// Expands a document (or the document behind an IRI) into a list of fully
/// qualified node objects.
pub fn expand(input: &Value, options: &JsonLdOptions) -> Result<Value, Error> {
	let (document, document_url, remote_context) = resolve_input(input, options)?;
	let active_context =
		initial_context(options, document_url.as_deref(), remote_context.as_deref())?;
	expansion::expand_document(&active_context, document, options)
}

/// Compacts a document under the given context.
pub fn compact(input: &Value, context: &Value, options: &JsonLdOptions) -> Result<Value, Error> {
	let expanded = expand(input, options)?;
	let local = context_value(context);
	let active_context =
		Context::new(options.base.as_deref())?.process(&local, options, &mut Vec::new())?;

	let compacted = compaction::compact(&active_context, None, expanded, options.compact_arrays)?;

	let mut result = Map::new();
	if !is_empty_context(&local) {
		result.insert("@context".to_string(), local);
	}

	match compacted {
		Value::Array(items) if items.is_empty() => {}
		Value::Array(items) => {
			let alias = active_context.compact_iri("@graph", None, true);
			result.insert(alias, Value::Array(items));
		}
		Value::Object(map) => {
			for (key, value) in map {
				result.insert(key, value);
			}
		}
		other => return Ok(other),
	}

	Ok(Value::Object(result))
}

/// Flattens a document: every node surfaces in the default graph, named
/// graphs fold into `@graph` entries. With a context the result is
/// compacted.
pub fn flatten(
	input: &Value,
	context: Option<&Value>,
	options: &JsonLdOptions,
) -> Result<Value, Error> {
	let expanded = expand(input, options)?;
	let flattened = node_map::flatten(&expanded)?;

	let Some(context) = context.filter(|c| !c.is_null()) else {
		return Ok(flattened);
	};

	let local = context_value(context);
	let active_context =
		Context::new(options.base.as_deref())?.process(&local, options, &mut Vec::new())?;
	let compacted =
		compaction::compact(&active_context, None, flattened, options.compact_arrays)?;

	let mut result = Map::new();
	if !is_empty_context(&local) {
		result.insert("@context".to_string(), local);
	}
	let alias = active_context.compact_iri("@graph", None, true);
	result.insert(
		alias,
		Value::Array(util::as_array(compacted)),
	);
	Ok(Value::Object(result))
}

/// Frames a document: selects and embeds the nodes matching the frame,
/// compacts the result under the frame's context and wraps it in `@graph`.
pub fn frame(input: &Value, frame: &Value, options: &JsonLdOptions) -> Result<Value, Error> {
	let expanded_input = expand(input, options)?;

	let (frame_document, _, _) = resolve_input(frame, options)?;
	let expanded_frame = expand(&frame_document, options)?;

	let mut issuer = IdentifierIssuer::new("_:b");
	let mut node_map = node_map::new_node_map();
	node_map::generate_node_map(
		&expanded_input,
		&mut node_map,
		"@default",
		None,
		None,
		&mut issuer,
	)?;
	let default_graph = node_map
		.get("@default")
		.and_then(Value::as_object)
		.cloned()
		.unwrap_or_default();

	let frame_object = expanded_frame
		.as_array()
		.and_then(|frames| frames.first())
		.and_then(Value::as_object)
		.cloned()
		.unwrap_or_default();

	let framed = framing::frame_document(&default_graph, &frame_object, options)?;

	let frame_context = frame_document
		.get("@context")
		.cloned()
		.unwrap_or(Value::Null);
	let active_context = Context::new(options.base.as_deref())?.process(
		&frame_context,
		options,
		&mut Vec::new(),
	)?;

	let compacted =
		compaction::compact(&active_context, None, framed, options.compact_arrays)?;
	let compacted = Value::Array(util::as_array(compacted));

	let mut result = Map::new();
	if !is_empty_context(&frame_context) {
		result.insert("@context".to_string(), frame_context);
	}
	let alias = active_context.compact_iri("@graph", None, true);
	result.insert(alias, compacted);

	Ok(framing::remove_preserve(Value::Object(result)))
}

/// Converts a document into an RDF dataset, or N-Quads when the `format`
/// option is `application/nquads`.
pub fn to_rdf(input: &Value, options: &JsonLdOptions) -> Result<RdfOutput, Error> {
	let expanded = expand(input, options)?;
	let dataset = rdf::to_rdf(&expanded, options)?;

	match options.format.as_deref() {
		None => Ok(RdfOutput::Dataset(dataset)),
		Some("application/nquads") => Ok(RdfOutput::NQuads(rdf::serialize_nquads(&dataset))),
		Some(other) => Err(Error::UnknownFormat(other.to_string())),
	}
}

/// Rebuilds expanded JSON-LD from an RDF dataset.
pub fn from_rdf(dataset: &RdfDataset, options: &JsonLdOptions) -> Result<Value, Error> {
	rdf::from_rdf(dataset, options)
}

/// Rebuilds expanded JSON-LD from an N-Quads document.
pub fn from_rdf_nquads(input: &str, options: &JsonLdOptions) -> Result<Value, Error> {
	let dataset = rdf::parse_nquads(input)?;
	rdf::from_rdf(&dataset, options)
}

/// Canonicalizes the RDF form of a document: deterministic `_:c14n` blank
/// node labels, sorted N-Quads output.
pub fn normalize(input: &Value, options: &JsonLdOptions) -> Result<String, Error> {
	let expanded = expand(input, options)?;
	let dataset = rdf::to_rdf(&expanded, options)?;
	canon::normalize(&dataset, options)
}

/// Canonicalizes an RDF dataset directly.
pub fn normalize_dataset(
	dataset: &RdfDataset,
	options: &JsonLdOptions,
) -> Result<String, Error> {
	canon::normalize(dataset, options)
}

fn is_empty_context(context: &Value) -> bool {
	match context {
		Value::Null => true,
		Value::Object(map) => map.is_empty(),
		Value::Array(items) => items.is_empty(),
		_ => false,
	}
}

//! RDF dataset model and the conversions between JSON-LD and RDF.

use indexmap::IndexMap;

pub mod from_rdf;
pub mod nquads;
pub mod to_rdf;

pub use from_rdf::from_rdf;
pub use nquads::{parse_nquads, serialize_nquads};
pub use to_rdf::to_rdf;

pub const RDF_SYNTAX_NS: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#";
pub const XSD_NS: &str = "http://www.w3.org/2001/XMLSchema#";

pub const XSD_BOOLEAN: &str = "http://www.w3.org/2001/XMLSchema#boolean";
pub const XSD_DOUBLE: &str = "http://www.w3.org/2001/XMLSchema#double";
pub const XSD_INTEGER: &str = "http://www.w3.org/2001/XMLSchema#integer";
pub const XSD_STRING: &str = "http://www.w3.org/2001/XMLSchema#string";

pub const RDF_TYPE: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#type";
pub const RDF_FIRST: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#first";
pub const RDF_REST: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#rest";
pub const RDF_NIL: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#nil";
pub const RDF_LIST: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#List";
pub const RDF_LANG_STRING: &str =
	"http://www.w3.org/1999/02/22-rdf-syntax-ns#langString";

/// The name under which the default graph is stored in datasets and node
/// maps.
pub const DEFAULT_GRAPH: &str = "@default";

/// An RDF literal: a lexical value, a datatype IRI and an optional language
/// tag (in which case the datatype is `rdf:langString`).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RdfLiteral {
	pub value: String,
	pub datatype: String,
	pub language: Option<String>,
}

impl RdfLiteral {
	pub fn new(value: impl Into<String>, datatype: impl Into<String>) -> Self {
		Self {
			value: value.into(),
			datatype: datatype.into(),
			language: None,
		}
	}

	pub fn lang_tagged(value: impl Into<String>, language: impl Into<String>) -> Self {
		Self {
			value: value.into(),
			datatype: RDF_LANG_STRING.to_string(),
			language: Some(language.into()),
		}
	}
}

/// An RDF node: an IRI, a blank node identifier or a literal.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum RdfNode {
	Iri(String),
	Blank(String),
	Literal(RdfLiteral),
}

impl RdfNode {
	/// Builds the node for an identifier coming out of a node map: a blank
	/// node for `_:`-prefixed identifiers, an IRI otherwise.
	pub fn from_id(id: &str) -> Self {
		if id.starts_with("_:") {
			Self::Blank(id.to_string())
		} else {
			Self::Iri(id.to_string())
		}
	}

	/// The IRI, blank node identifier or literal lexical value.
	pub fn value(&self) -> &str {
		match self {
			Self::Iri(iri) => iri,
			Self::Blank(id) => id,
			Self::Literal(literal) => &literal.value,
		}
	}

	pub fn is_iri(&self) -> bool {
		matches!(self, Self::Iri(_))
	}

	pub fn is_blank(&self) -> bool {
		matches!(self, Self::Blank(_))
	}

	pub fn is_literal(&self) -> bool {
		matches!(self, Self::Literal(_))
	}

	pub fn as_literal(&self) -> Option<&RdfLiteral> {
		match self {
			Self::Literal(literal) => Some(literal),
			_ => None,
		}
	}
}

/// An RDF quad. The graph component is `None` for the default graph.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RdfQuad {
	pub subject: RdfNode,
	pub predicate: RdfNode,
	pub object: RdfNode,
	pub graph: Option<RdfNode>,
}

/// An RDF dataset: one ordered, duplicate-free quad sequence per graph, the
/// default graph always present under [`DEFAULT_GRAPH`].
#[derive(Debug, Clone, Default)]
pub struct RdfDataset {
	graphs: IndexMap<String, Vec<RdfQuad>>,
}

impl RdfDataset {
	pub fn new() -> Self {
		let mut graphs = IndexMap::new();
		graphs.insert(DEFAULT_GRAPH.to_string(), Vec::new());
		Self { graphs }
	}

	/// Adds a triple to the named graph, silently dropping exact duplicates.
	pub fn add(&mut self, graph_name: &str, subject: RdfNode, predicate: RdfNode, object: RdfNode) {
		let graph = if graph_name == DEFAULT_GRAPH {
			None
		} else {
			Some(RdfNode::from_id(graph_name))
		};
		let quad = RdfQuad {
			subject,
			predicate,
			object,
			graph,
		};
		let quads = self.graphs.entry(graph_name.to_string()).or_default();
		if !quads.contains(&quad) {
			quads.push(quad);
		}
	}

	/// Graph names in code-point order, the default graph first.
	pub fn graph_names(&self) -> Vec<&str> {
		let mut names: Vec<&str> = self
			.graphs
			.keys()
			.map(String::as_str)
			.filter(|name| *name != DEFAULT_GRAPH)
			.collect();
		names.sort_unstable();
		names.insert(0, DEFAULT_GRAPH);
		names
	}

	pub fn graph(&self, name: &str) -> &[RdfQuad] {
		self.graphs.get(name).map(Vec::as_slice).unwrap_or(&[])
	}

	/// All quads of the dataset, default graph first, named graphs in
	/// code-point order.
	pub fn quads(&self) -> impl Iterator<Item = &RdfQuad> + '_ {
		self.graph_names()
			.into_iter()
			.flat_map(|name| self.graph(name).iter())
			.collect::<Vec<_>>()
			.into_iter()
	}

	pub fn len(&self) -> usize {
		self.graphs.values().map(Vec::len).sum()
	}

	pub fn is_empty(&self) -> bool {
		self.len() == 0
	}
}

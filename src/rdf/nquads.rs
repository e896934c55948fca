//! Line-oriented N-Quads codec.

use std::sync::OnceLock;

use regex::Regex;

use super::{
	RdfDataset, RdfLiteral, RdfNode, RdfQuad, DEFAULT_GRAPH, RDF_LANG_STRING, XSD_STRING,
};
use crate::error::Error;

/// Serializes a dataset into an N-Quads string, one sorted line per quad.
pub fn serialize_nquads(dataset: &RdfDataset) -> String {
	let mut lines: Vec<String> = dataset.quads().map(|quad| to_nquad(quad, None)).collect();
	lines.sort_unstable();
	lines.concat()
}

/// Serializes a single quad as an N-Quads line, newline included.
///
/// In normalization mode (`bnode` set), blank nodes serialize as the
/// placeholder `_:a` when they match the node being hashed and `_:z`
/// otherwise, and blank graph labels as `_:g`.
pub fn to_nquad(quad: &RdfQuad, bnode: Option<&str>) -> String {
	let mut line = String::new();

	match &quad.subject {
		RdfNode::Iri(iri) => {
			line.push('<');
			line.push_str(&escape(iri));
			line.push('>');
		}
		subject => match bnode {
			Some(reference) => {
				line.push_str(if reference == subject.value() { "_:a" } else { "_:z" })
			}
			None => line.push_str(subject.value()),
		},
	}

	line.push(' ');
	match &quad.predicate {
		RdfNode::Iri(iri) => {
			line.push('<');
			line.push_str(&escape(iri));
			line.push('>');
		}
		// a blank node predicate only appears in generalized RDF
		predicate => line.push_str(&escape(predicate.value())),
	}
	line.push(' ');

	match &quad.object {
		RdfNode::Iri(iri) => {
			line.push('<');
			line.push_str(&escape(iri));
			line.push('>');
		}
		RdfNode::Blank(id) => match bnode {
			Some(reference) => line.push_str(if reference == id { "_:a" } else { "_:z" }),
			None => line.push_str(id),
		},
		RdfNode::Literal(literal) => {
			line.push('"');
			line.push_str(&escape(&literal.value));
			line.push('"');
			if literal.datatype == RDF_LANG_STRING {
				line.push('@');
				line.push_str(literal.language.as_deref().unwrap_or(""));
			} else if literal.datatype != XSD_STRING {
				line.push_str("^^<");
				line.push_str(&escape(&literal.datatype));
				line.push('>');
			}
		}
	}

	match &quad.graph {
		Some(RdfNode::Iri(iri)) => {
			line.push_str(" <");
			line.push_str(&escape(iri));
			line.push('>');
		}
		Some(graph) => {
			line.push(' ');
			line.push_str(if bnode.is_some() { "_:g" } else { graph.value() });
		}
		None => {}
	}

	line.push_str(" .\n");
	line
}

fn escape(str: &str) -> String {
	str.replace('\\', "\\\\")
		.replace('"', "\\\"")
		.replace('\n', "\\n")
		.replace('\r', "\\r")
		.replace('\t', "\\t")
}

fn unescape(str: &str) -> String {
	let mut result = String::with_capacity(str.len());
	let mut chars = str.chars();
	while let Some(c) = chars.next() {
		if c != '\\' {
			result.push(c);
			continue;
		}
		match chars.next() {
			Some('\\') => result.push('\\'),
			Some('"') => result.push('"'),
			Some('n') => result.push('\n'),
			Some('r') => result.push('\r'),
			Some('t') => result.push('\t'),
			Some(other) => {
				result.push('\\');
				result.push(other);
			}
			None => result.push('\\'),
		}
	}
	result
}

const WSO: &str = "[ \\t]*";
const WS: &str = "[ \\t]+";
const IRI: &str = "(?:<([^>]*)>)";
const BNODE: &str = "(_:(?:[A-Za-z][A-Za-z0-9]*))";
const PLAIN: &str = "\"([^\"\\\\]*(?:\\\\.[^\"\\\\]*)*)\"";
const LANGUAGE: &str = "(?:@([a-z]+(?:-[a-zA-Z0-9]+)*))";

fn quad_regex() -> &'static Regex {
	static REGEX: OnceLock<Regex> = OnceLock::new();
	REGEX.get_or_init(|| {
		let bnode = BNODE;
		let datatype = format!("(?:\\^\\^{IRI})");
		let literal = format!("(?:{PLAIN}(?:{datatype}|{LANGUAGE})?)");
		let subject = format!("(?:{IRI}|{bnode}){WS}");
		// blank node predicates occur in generalized RDF
		let property = format!("(?:{IRI}|{bnode}){WS}");
		let object = format!("(?:{IRI}|{bnode}|{literal}){WSO}");
		let graph = format!("(?:\\.|(?:(?:{IRI}|{bnode}){WSO}\\.))");
		Regex::new(&format!("^{WSO}{subject}{property}{object}{graph}{WSO}$"))
			.expect("the quad pattern is a valid expression")
	})
}

fn empty_regex() -> &'static Regex {
	static REGEX: OnceLock<Regex> = OnceLock::new();
	REGEX.get_or_init(|| Regex::new("^[ \\t]*$").expect("the blank-line pattern is valid"))
}

/// Parses RDF in the form of N-Quads. Duplicate quads within a graph are
/// silently de-duplicated on ingest.
pub fn parse_nquads(input: &str) -> Result<RdfDataset, Error> {
	let mut dataset = RdfDataset::new();

	for (index, line) in input.lines().enumerate() {
		let line_number = index + 1;

		if empty_regex().is_match(line) {
			continue;
		}

		let captures = quad_regex()
			.captures(line)
			.ok_or(Error::ParseError(line_number))?;

		let subject = match captures.get(1) {
			Some(iri) => RdfNode::Iri(unescape(iri.as_str())),
			None => RdfNode::Blank(captures[2].to_string()),
		};

		let predicate = match captures.get(3) {
			Some(iri) => RdfNode::Iri(unescape(iri.as_str())),
			None => RdfNode::Blank(captures[4].to_string()),
		};

		let object = if let Some(iri) = captures.get(5) {
			RdfNode::Iri(unescape(iri.as_str()))
		} else if let Some(id) = captures.get(6) {
			RdfNode::Blank(id.as_str().to_string())
		} else {
			let value = unescape(&captures[7]);
			match (captures.get(8), captures.get(9)) {
				(Some(datatype), _) => {
					RdfNode::Literal(RdfLiteral::new(value, unescape(datatype.as_str())))
				}
				(None, Some(language)) => {
					RdfNode::Literal(RdfLiteral::lang_tagged(value, language.as_str()))
				}
				(None, None) => RdfNode::Literal(RdfLiteral::new(value, XSD_STRING)),
			}
		};

		let graph_name = if let Some(iri) = captures.get(10) {
			unescape(iri.as_str())
		} else if let Some(id) = captures.get(11) {
			id.as_str().to_string()
		} else {
			DEFAULT_GRAPH.to_string()
		};

		dataset.add(&graph_name, subject, predicate, object);
	}

	Ok(dataset)
}

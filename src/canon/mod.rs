//! RDF dataset canonicalization: deterministic blank node labeling so that
//! isomorphic datasets produce byte-identical N-Quads output.

use std::collections::BTreeMap;

use indexmap::IndexMap;
use log::debug;
use md5::Md5;
use sha1::{Digest, Sha1};

use crate::error::Error;
use crate::id::IdentifierIssuer;
use crate::options::{Algorithm, JsonLdOptions};
use crate::rdf::nquads::to_nquad;
use crate::rdf::{RdfDataset, RdfNode, RdfQuad};

mod permutator;

pub use permutator::Permutator;

/// The digest behind the hash computations: SHA-1 for `URDNA2015`, MD5 for
/// `URGNA2012`.
enum MessageDigest {
	Sha1(Sha1),
	Md5(Md5),
}

impl MessageDigest {
	fn new(algorithm: Algorithm) -> Self {
		match algorithm {
			Algorithm::Urdna2015 => Self::Sha1(Sha1::new()),
			Algorithm::Urgna2012 => Self::Md5(Md5::new()),
		}
	}

	fn update(&mut self, data: &[u8]) {
		match self {
			Self::Sha1(digest) => digest.update(data),
			Self::Md5(digest) => digest.update(data),
		}
	}

	fn finalize_hex(self) -> String {
		match self {
			Self::Sha1(digest) => hex::encode(digest.finalize()),
			Self::Md5(digest) => hex::encode(digest.finalize()),
		}
	}
}

/// Checks the format option and produces the canonical N-Quads string of the
/// dataset.
pub fn normalize(dataset: &RdfDataset, options: &JsonLdOptions) -> Result<String, Error> {
	if let Some(format) = options.format.as_deref() {
		if format != "application/nquads" {
			return Err(Error::UnknownFormat(format.to_string()));
		}
	}
	Ok(canonize(dataset, options.algorithm))
}

/// Assigns every blank node a `_:c14n` label and serializes the dataset as
/// sorted N-Quads. The output is invariant under reordering of the input
/// quads and relabeling of its blank nodes.
pub fn canonize(dataset: &RdfDataset, algorithm: Algorithm) -> String {
	// map each blank node to the quads it participates in
	let mut quads: Vec<RdfQuad> = Vec::new();
	let mut bnodes: IndexMap<String, Vec<RdfQuad>> = IndexMap::new();
	for name in dataset.graph_names() {
		for quad in dataset.graph(name) {
			quads.push(quad.clone());
			for node in [Some(&quad.subject), Some(&quad.object), quad.graph.as_ref()] {
				if let Some(RdfNode::Blank(id)) = node {
					bnodes.entry(id.clone()).or_default().push(quad.clone());
				}
			}
		}
	}

	// first-degree hashes never change, compute them once
	let ids: Vec<String> = bnodes.keys().cloned().collect();
	let mut hashes: IndexMap<String, String> = IndexMap::new();
	for id in &ids {
		hashes.insert(id.clone(), hash_first_degree(id, &bnodes, algorithm));
	}

	let mut canonical = IdentifierIssuer::new("_:c14n");
	let mut unnamed = ids;

	loop {
		let mut next_unnamed: Vec<String> = Vec::new();
		let mut duplicates: BTreeMap<String, Vec<String>> = BTreeMap::new();
		let mut unique: BTreeMap<String, String> = BTreeMap::new();

		for bnode in &unnamed {
			let hash = hashes
				.get(bnode)
				.cloned()
				.unwrap_or_default();
			if let Some(group) = duplicates.get_mut(&hash) {
				group.push(bnode.clone());
				next_unnamed.push(bnode.clone());
			} else if let Some(existing) = unique.remove(&hash) {
				next_unnamed.push(existing.clone());
				next_unnamed.push(bnode.clone());
				duplicates.insert(hash, vec![existing, bnode.clone()]);
			} else {
				unique.insert(hash, bnode.clone());
			}
		}

		// name nodes with a unique hash, in sorted-hash order
		let mut named = false;
		for bnode in unique.values() {
			canonical.issue(Some(bnode));
			named = true;
		}

		// as long as names were assigned, the remaining nodes are re-examined
		if named {
			unnamed = next_unnamed;
			continue;
		}

		// name duplicate-hash groups through their path hashes
		for group in duplicates.values() {
			let mut results: Vec<HashResult> = Vec::new();
			for bnode in group {
				if canonical.has(bnode) {
					continue;
				}
				let mut path_issuer = IdentifierIssuer::new("_:b");
				path_issuer.issue(Some(bnode));
				debug!("hashing paths for `{bnode}`");
				results.push(hash_paths(
					bnode,
					&bnodes,
					&hashes,
					&canonical,
					path_issuer,
					algorithm,
				));
			}

			results.sort_by(|a, b| a.hash.cmp(&b.hash));
			for result in &results {
				// commit the path-issuer ordering into the canonical issuer
				let order: Vec<String> =
					result.issuer.existing_order().map(str::to_string).collect();
				for key in order {
					canonical.issue(Some(&key));
				}
			}
		}
		break;
	}

	// rewrite every quad with canonical labels and serialize
	let mut lines: Vec<String> = Vec::with_capacity(quads.len());
	for quad in &quads {
		let mut quad = quad.clone();
		for node in [&mut quad.subject, &mut quad.object] {
			relabel(node, &mut canonical);
		}
		if let Some(graph) = &mut quad.graph {
			relabel(graph, &mut canonical);
		}
		lines.push(to_nquad(&quad, None));
	}
	lines.sort_unstable();
	lines.concat()
}

fn relabel(node: &mut RdfNode, canonical: &mut IdentifierIssuer) {
	if let RdfNode::Blank(id) = node {
		if !id.starts_with("_:c14n") {
			*id = canonical.issue(Some(id));
		}
	}
}

/// Serializes every quad the blank node participates in, substituting `_:a`
/// for the node itself, `_:z` for any other blank node and `_:g` for blank
/// graph labels, then hashes the sorted serialization.
fn hash_first_degree(
	id: &str,
	bnodes: &IndexMap<String, Vec<RdfQuad>>,
	algorithm: Algorithm,
) -> String {
	let mut nquads: Vec<String> = bnodes
		.get(id)
		.map(|quads| quads.iter().map(|quad| to_nquad(quad, Some(id))).collect())
		.unwrap_or_default();
	nquads.sort_unstable();

	let mut digest = MessageDigest::new(algorithm);
	for line in &nquads {
		digest.update(line.as_bytes());
	}
	digest.finalize_hex()
}

struct HashResult {
	hash: String,
	issuer: IdentifierIssuer,
}

fn adjacent_blank<'a>(node: &'a RdfNode, id: &str) -> Option<&'a str> {
	match node {
		RdfNode::Blank(value) if value != id => Some(value),
		_ => None,
	}
}

/// Produces a hash incorporating all information about a blank node's
/// subgraph of blank nodes, recursively picking the adjacent-node
/// permutations that produce the lexicographically-least path
/// serializations.
fn hash_paths(
	id: &str,
	bnodes: &IndexMap<String, Vec<RdfQuad>>,
	hashes: &IndexMap<String, String>,
	canonical: &IdentifierIssuer,
	mut path_issuer: IdentifierIssuer,
	algorithm: Algorithm,
) -> HashResult {
	// group adjacent blank nodes by the hash of (direction, predicate, name)
	let mut groups: BTreeMap<String, Vec<String>> = BTreeMap::new();
	let empty = Vec::new();
	for quad in bnodes.get(id).unwrap_or(&empty) {
		let (adjacent, direction) = match adjacent_blank(&quad.subject, id) {
			Some(adjacent) => (adjacent, "p"),
			None => match adjacent_blank(&quad.object, id) {
				Some(adjacent) => (adjacent, "r"),
				None => continue,
			},
		};

		// canonical name if known, path name if seen, first-degree hash
		// otherwise
		let name = canonical
			.get(adjacent)
			.or_else(|| path_issuer.get(adjacent))
			.map(str::to_string)
			.unwrap_or_else(|| hashes.get(adjacent).cloned().unwrap_or_default());

		let mut digest = MessageDigest::new(algorithm);
		digest.update(direction.as_bytes());
		digest.update(quad.predicate.value().as_bytes());
		digest.update(name.as_bytes());
		groups
			.entry(digest.finalize_hex())
			.or_default()
			.push(adjacent.to_string());
	}

	let mut digest = MessageDigest::new(algorithm);

	for (group_hash, group) in &groups {
		digest.update(group_hash.as_bytes());

		let mut chosen_path = String::new();
		let mut chosen_issuer: Option<IdentifierIssuer> = None;

		let mut permutator = Permutator::new(group.clone());
		'permutations: while permutator.has_next() {
			let permutation = permutator.next();
			let mut issuer_copy = path_issuer.clone();
			let mut path = String::new();
			let mut recurse: Vec<String> = Vec::new();

			for bnode in &permutation {
				match canonical.get(bnode) {
					Some(name) => path.push_str(name),
					None => {
						if !issuer_copy.has(bnode) {
							recurse.push(bnode.clone());
						}
						path.push_str(&issuer_copy.issue(Some(bnode)));
					}
				}

				// skip this permutation if the path can no longer win
				if !chosen_path.is_empty()
					&& path.len() >= chosen_path.len()
					&& path > chosen_path
				{
					continue 'permutations;
				}
			}

			for bnode in &recurse {
				let result = hash_paths(
					bnode,
					bnodes,
					hashes,
					canonical,
					issuer_copy.clone(),
					algorithm,
				);
				path.push_str(&issuer_copy.issue(Some(bnode)));
				path.push('<');
				path.push_str(&result.hash);
				path.push('>');
				issuer_copy = result.issuer;

				if !chosen_path.is_empty()
					&& path.len() >= chosen_path.len()
					&& path > chosen_path
				{
					continue 'permutations;
				}
			}

			if chosen_path.is_empty() || path < chosen_path {
				chosen_path = path;
				chosen_issuer = Some(issuer_copy);
			}
		}

		digest.update(chosen_path.as_bytes());
		if let Some(issuer) = chosen_issuer {
			path_issuer = issuer;
		}
	}

	HashResult {
		hash: digest.finalize_hex(),
		issuer: path_issuer,
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::rdf::parse_nquads;

	fn canonize_nquads(input: &str) -> String {
		canonize(&parse_nquads(input).unwrap(), Algorithm::Urdna2015)
	}

	#[test]
	fn symmetric_two_node_cycle() {
		let expected = "_:c14n0 <http://example.org/p> _:c14n1 .\n\
			_:c14n1 <http://example.org/p> _:c14n0 .\n";

		let output = canonize_nquads(
			"_:x1 <http://example.org/p> _:x2 .\n_:x2 <http://example.org/p> _:x1 .\n",
		);
		assert_eq!(output, expected);

		// swapping labels or line order must not change a byte
		let relabeled = canonize_nquads(
			"_:x2 <http://example.org/p> _:x1 .\n_:x1 <http://example.org/p> _:x2 .\n",
		);
		assert_eq!(relabeled, expected);
	}

	#[test]
	fn unique_hashes_short_circuit() {
		let output = canonize_nquads(
			"_:a <http://example.org/p> \"x\" .\n\
			_:b <http://example.org/q> _:a .\n",
		);
		assert_eq!(
			output,
			"_:c14n0 <http://example.org/q> _:c14n1 .\n\
			_:c14n1 <http://example.org/p> \"x\" .\n"
		);
	}

	#[test]
	fn stable_under_quad_reordering() {
		let a = canonize_nquads(
			"_:e0 <http://example.org/next> _:e1 .\n\
			_:e1 <http://example.org/next> _:e2 .\n\
			_:e2 <http://example.org/next> _:e0 .\n",
		);
		let b = canonize_nquads(
			"_:e2 <http://example.org/next> _:e0 .\n\
			_:e0 <http://example.org/next> _:e1 .\n\
			_:e1 <http://example.org/next> _:e2 .\n",
		);
		assert_eq!(a, b);
	}

	#[test]
	fn blank_graph_labels_are_canonicalized() {
		let output = canonize_nquads("<http://a/s> <http://a/p> \"v\" _:g0 .\n");
		assert_eq!(output, "<http://a/s> <http://a/p> \"v\" _:c14n0 .\n");
	}

	#[test]
	fn urgna2012_is_also_deterministic() {
		let input = "_:x1 <http://example.org/p> _:x2 .\n_:x2 <http://example.org/p> _:x1 .\n";
		let a = canonize(&parse_nquads(input).unwrap(), Algorithm::Urgna2012);
		let swapped =
			"_:x2 <http://example.org/p> _:x1 .\n_:x1 <http://example.org/p> _:x2 .\n";
		let b = canonize(&parse_nquads(swapped).unwrap(), Algorithm::Urgna2012);
		assert_eq!(a, b);
		assert!(a.contains("_:c14n0"));
	}
}

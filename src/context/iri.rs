//! IRI expansion and compaction against an active context.

use std::collections::HashMap;

use serde_json::{Map, Value};

use super::{Context, TermDefinition};
use crate::error::Error;
use crate::syntax::{is_keyword, is_keyword_like, ContainerKind};
use crate::util::{is_list, is_value};

impl Context {
	/// Expands `value` to an IRI, blank node identifier or keyword.
	///
	/// Precedence: keyword, then term definition (when `vocab`), then compact
	/// IRI prefix, then vocabulary or base resolution (when
	/// `document_relative`). Values that expand to nothing are returned
	/// unchanged; callers drop the ones that are neither keywords nor
	/// absolute.
	pub fn expand_iri(&self, value: &str, document_relative: bool, vocab: bool) -> String {
		if is_keyword(value) {
			return value.to_string();
		}

		// keyword-shaped but not reserved: never treated as a term or IRI
		if is_keyword_like(value) {
			return value.to_string();
		}

		if vocab {
			if let Some(entry) = self.terms.get(value) {
				return match entry {
					Some(definition) => definition.iri_mapping.clone(),
					None => value.to_string(),
				};
			}
		}

		if let Some(colon) = value.find(':') {
			let prefix = &value[..colon];
			let suffix = &value[colon + 1..];

			// blank node identifiers and IRIs with an authority part are
			// already absolute
			if prefix == "_" || suffix.starts_with("//") {
				return value.to_string();
			}

			if let Some(definition) = self.term(prefix) {
				return format!("{}{}", definition.iri_mapping, suffix);
			}

			return value.to_string();
		}

		if vocab {
			if let Some(vocab_mapping) = self.vocab() {
				return format!("{vocab_mapping}{value}");
			}
		}

		if document_relative {
			return self.resolve(value);
		}

		value.to_string()
	}

	/// Variant of [`Context::expand_iri`] used during context processing:
	/// terms of the local context referenced before their definition are
	/// defined on the fly.
	pub(crate) fn expand_iri_with(
		&mut self,
		value: &str,
		document_relative: bool,
		vocab: bool,
		local: &Map<String, Value>,
		defined: &mut HashMap<String, bool>,
	) -> Result<String, Error> {
		if is_keyword(value) {
			return Ok(value.to_string());
		}

		if local.contains_key(value) && defined.get(value) != Some(&true) {
			self.create_term_definition(local, value, defined)?;
		}

		if let Some(colon) = value.find(':') {
			let prefix = &value[..colon];
			if prefix != "_"
				&& local.contains_key(prefix)
				&& defined.get(prefix) != Some(&true)
			{
				self.create_term_definition(local, prefix, defined)?;
			}
		}

		Ok(self.expand_iri(value, document_relative, vocab))
	}

	/// Compacts `iri` to a term, compact IRI, vocabulary-relative or
	/// base-relative form.
	///
	/// `value` is the expanded value the compacted key will hold; the
	/// selected term must be consistent with any type or language coercion
	/// the value specifies. The shortest consistent candidate wins, ties
	/// broken by code-point order.
	pub fn compact_iri(&self, iri: &str, value: Option<&Value>, vocab: bool) -> String {
		if vocab {
			let mut best: Option<(i32, &str)> = None;
			for (term, definition) in self.terms() {
				if definition.reverse || definition.iri_mapping != iri {
					continue;
				}
				let rank = term_rank(self, definition, value);
				if rank == 0 {
					continue;
				}
				let better = match best {
					None => true,
					Some((best_rank, best_term)) => {
						rank > best_rank
							|| (rank == best_rank && shorter(term, best_term))
					}
				};
				if better {
					best = Some((rank, term));
				}
			}
			if let Some((_, term)) = best {
				return term.to_string();
			}
		}

		// try to build a compact IRI from a prefix term
		let mut candidate: Option<String> = None;
		for (term, definition) in self.terms() {
			if definition.reverse
				|| term.contains(':')
				|| definition.iri_mapping.is_empty()
				|| iri == definition.iri_mapping
				|| !iri.starts_with(&definition.iri_mapping)
			{
				continue;
			}
			let compacted = format!("{term}:{}", &iri[definition.iri_mapping.len()..]);
			// a compact IRI is only usable if it is not itself a term bound
			// to a different IRI
			let usable = match self.terms.get(&compacted) {
				Some(Some(definition)) => definition.iri_mapping == iri,
				Some(None) => false,
				None => true,
			};
			if usable && candidate.as_deref().map_or(true, |c| shorter(&compacted, c)) {
				candidate = Some(compacted);
			}
		}
		if let Some(candidate) = candidate {
			return candidate;
		}

		if vocab {
			if let Some(vocab_mapping) = self.vocab() {
				if iri.len() > vocab_mapping.len() && iri.starts_with(vocab_mapping) {
					let suffix = &iri[vocab_mapping.len()..];
					if !self.has_term(suffix) {
						return suffix.to_string();
					}
				}
			}
		} else if let Some(base) = self.base() {
			if let Some(relative) = iri.strip_prefix(base.as_str()) {
				if !relative.is_empty() {
					return relative.to_string();
				}
			}
		}

		iri.to_string()
	}
}

fn shorter(a: &str, b: &str) -> bool {
	a.len() < b.len() || (a.len() == b.len() && a < b)
}

/// How well a term fits the value it would hold: `0` rules the term out,
/// higher ranks are preferred. Exact coercion matches beat unconstrained
/// terms, which beat terms whose constraints leave the value wrapped.
fn term_rank(context: &Context, definition: &TermDefinition, value: Option<&Value>) -> i32 {
	let container = definition.container_mapping;
	let unconstrained = definition.type_mapping.is_none()
		&& definition.language_mapping.is_none()
		&& !matches!(
			container,
			Some(ContainerKind::List) | Some(ContainerKind::Language) | Some(ContainerKind::Index)
		);

	let value = match value {
		Some(value) => value,
		// key-position compaction (e.g. `@type` values): any term that does
		// not force a shape
		None => return if unconstrained { 3 } else { 1 },
	};

	if is_list(value) {
		return match container {
			Some(ContainerKind::List) => 3,
			None | Some(ContainerKind::Set) => 1,
			_ => 0,
		};
	}

	if let Some(index) = value.get("@index") {
		if container == Some(ContainerKind::Index) && index.is_string() {
			return 3;
		}
	}
	if matches!(
		container,
		Some(ContainerKind::List) | Some(ContainerKind::Index)
	) {
		return 0;
	}

	if is_value(value) {
		if let Some(value_type) = value.get("@type").and_then(Value::as_str) {
			return match &definition.type_mapping {
				Some(coercion) if coercion == value_type => 3,
				Some(_) => 0,
				None => {
					if definition.language_mapping.is_none() {
						1
					} else {
						0
					}
				}
			};
		}

		if let Some(language) = value.get("@language").and_then(Value::as_str) {
			return match (&definition.language_mapping, container) {
				(Some(Some(coercion)), _) if coercion == language => 3,
				(None, Some(ContainerKind::Language)) => 3,
				(None, _) if definition.type_mapping.is_none() => {
					if context.language() == Some(language) {
						2
					} else {
						1
					}
				}
				_ => 0,
			};
		}

		// plain value
		let is_string = value.get("@value").map(Value::is_string).unwrap_or(false);
		if is_string {
			return match &definition.language_mapping {
				Some(None) => 3,
				None if definition.type_mapping.is_none() => {
					if context.language().is_none() {
						3
					} else {
						1
					}
				}
				_ => 0,
			};
		}
		return if unconstrained { 3 } else { 0 };
	}

	// node object or node reference
	match definition.type_mapping.as_deref() {
		Some("@id") | Some("@vocab") => 3,
		Some(_) => 0,
		None => {
			if definition.language_mapping.is_none() {
				1
			} else {
				0
			}
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::options::JsonLdOptions;
	use serde_json::json;

	fn context(local: Value) -> Context {
		Context::new(None)
			.unwrap()
			.process(&local, &JsonLdOptions::new(), &mut Vec::new())
			.unwrap()
	}

	#[test]
	fn expand_term_and_compact_iri() {
		let context = context(json!({
			"ex": "http://example.org/vocab#",
			"name": "http://example.org/vocab#name"
		}));
		assert_eq!(
			context.expand_iri("name", false, true),
			"http://example.org/vocab#name"
		);
		assert_eq!(
			context.expand_iri("ex:other", false, true),
			"http://example.org/vocab#other"
		);
		// the term wins over the compact IRI, shortest first
		assert_eq!(
			context.compact_iri("http://example.org/vocab#name", None, true),
			"name"
		);
		assert_eq!(
			context.compact_iri("http://example.org/vocab#other", None, true),
			"ex:other"
		);
	}

	#[test]
	fn expand_keyword_like_is_left_alone() {
		let context = context(json!({"@vocab": "http://example.org/"}));
		assert_eq!(context.expand_iri("@nest", false, true), "@nest");
		assert_eq!(
			context.expand_iri("name", false, true),
			"http://example.org/name"
		);
	}

	#[test]
	fn vocab_relative_compaction() {
		let context = context(json!({"@vocab": "http://example.org/"}));
		assert_eq!(
			context.compact_iri("http://example.org/name", None, true),
			"name"
		);
	}

	#[test]
	fn coercion_consistency_drives_selection() {
		let context = context(json!({
			"plain": "http://example.org/p",
			"typed": {"@id": "http://example.org/p", "@type": "http://www.w3.org/2001/XMLSchema#integer"}
		}));
		let typed_value = json!({"@value": 4, "@type": "http://www.w3.org/2001/XMLSchema#integer"});
		assert_eq!(
			context.compact_iri("http://example.org/p", Some(&typed_value), true),
			"typed"
		);
		let plain_value = json!({"@value": 4});
		assert_eq!(
			context.compact_iri("http://example.org/p", Some(&plain_value), true),
			"plain"
		);
	}

	#[test]
	fn nulled_term_blocks_vocab_fallback() {
		let context = context(json!({"@vocab": "http://example.org/", "name": null}));
		assert_eq!(context.expand_iri("name", false, true), "name");
	}
}

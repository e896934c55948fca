//! Context processing and term-definition construction.

use std::collections::HashMap;
use std::convert::TryFrom;

use iref::{IriBuf, IriRef};
use log::debug;
use serde_json::{Map, Value};

use super::{Context, TermDefinition};
use crate::error::Error;
use crate::options::JsonLdOptions;
use crate::syntax::{is_keyword, ContainerKind};
use crate::util::{is_absolute_iri, ordered_keys};

impl Context {
	/// Builds a new active context by applying `local` on top of this one.
	///
	/// `remote_contexts` tracks the IRIs of remote contexts currently being
	/// dereferenced, for cycle detection.
	pub fn process(
		&self,
		local: &Value,
		options: &JsonLdOptions,
		remote_contexts: &mut Vec<String>,
	) -> Result<Context, Error> {
		let mut result = self.clone();

		let contexts: Vec<&Value> = match local {
			Value::Array(items) => items.iter().collect(),
			other => vec![other],
		};

		for context in contexts {
			match context {
				// a null context resets to the initial context
				Value::Null => {
					result = Context {
						base: self.original_base.clone(),
						original_base: self.original_base.clone(),
						..Context::default()
					};
				}
				Value::String(url) => {
					let url = result.resolve(url);
					if remote_contexts.iter().any(|candidate| candidate == &url) {
						return Err(Error::RecursiveContextInclusion(url));
					}

					debug!("dereferencing remote context `{url}`");
					remote_contexts.push(url.clone());
					let remote = options
						.loader()
						.load_document(&url)
						.map_err(|e| Error::LoadingRemoteContextFailed(e.to_string()))?;
					let imported = remote
						.document
						.get("@context")
						.cloned()
						.ok_or_else(|| Error::InvalidRemoteContext(url.clone()))?;
					result = result.process(&imported, options, remote_contexts)?;
					remote_contexts.pop();
				}
				Value::Object(map) => {
					result.process_object(map)?;
				}
				other => {
					return Err(Error::InvalidLocalContext(other.to_string()));
				}
			}
		}

		Ok(result)
	}

	fn process_object(&mut self, map: &Map<String, Value>) -> Result<(), Error> {
		if let Some(base) = map.get("@base") {
			match base {
				Value::Null => self.base = None,
				Value::String(value) => {
					if let Ok(iri) = IriBuf::new(value.clone()) {
						self.base = Some(iri);
					} else {
						match (self.base.as_ref(), IriRef::new(value.as_str())) {
							(Some(current), Ok(iri_ref)) => {
								self.base = Some(iri_ref.resolved(current.as_iri()));
							}
							_ => return Err(Error::InvalidBaseIri(value.clone())),
						}
					}
				}
				other => return Err(Error::InvalidBaseIri(other.to_string())),
			}
		}

		if let Some(vocab) = map.get("@vocab") {
			match vocab {
				Value::Null => self.vocab = None,
				Value::String(value) if is_absolute_iri(value) => {
					self.vocab = Some(value.clone());
				}
				other => return Err(Error::InvalidVocabMapping(other.to_string())),
			}
		}

		if let Some(language) = map.get("@language") {
			match language {
				Value::Null => self.language = None,
				Value::String(value) => {
					self.language = Some(value.to_lowercase());
				}
				other => return Err(Error::InvalidDefaultLanguage(other.to_string())),
			}
		}

		let mut defined = HashMap::new();
		for key in ordered_keys(map) {
			if matches!(key.as_str(), "@base" | "@vocab" | "@language") {
				continue;
			}
			self.create_term_definition(map, &key, &mut defined)?;
		}

		Ok(())
	}

	/// Creates (or rejects) the definition of `term` from the local context
	/// `local`. `defined` tracks the terms being defined to detect cyclic IRI
	/// mappings.
	pub(crate) fn create_term_definition(
		&mut self,
		local: &Map<String, Value>,
		term: &str,
		defined: &mut HashMap<String, bool>,
	) -> Result<(), Error> {
		match defined.get(term) {
			Some(true) => return Ok(()),
			Some(false) => return Err(Error::CyclicIriMapping(term.to_string())),
			None => {}
		}
		defined.insert(term.to_string(), false);

		if is_keyword(term) {
			return Err(Error::KeywordRedefinition(term.to_string()));
		}

		self.terms.shift_remove(term);

		let value = local.get(term).cloned().unwrap_or(Value::Null);

		// an explicitly nulled term maps to nothing
		let nulled = match &value {
			Value::Null => true,
			Value::Object(map) => map.get("@id").map(Value::is_null).unwrap_or(false),
			_ => false,
		};
		if nulled {
			self.terms.insert(term.to_string(), None);
			defined.insert(term.to_string(), true);
			return Ok(());
		}

		let map = match value {
			Value::String(id) => {
				let mut map = Map::new();
				map.insert("@id".to_string(), Value::String(id));
				map
			}
			Value::Object(map) => map,
			other => return Err(Error::InvalidTermDefinition(other.to_string())),
		};

		let mut definition = TermDefinition::with_iri(String::new());

		if let Some(type_value) = map.get("@type") {
			let type_value = type_value
				.as_str()
				.ok_or_else(|| Error::InvalidTypeMapping(type_value.to_string()))?;
			let expanded = self.expand_iri_with(type_value, false, true, local, defined)?;
			if expanded != "@id" && expanded != "@vocab" && !is_absolute_iri(&expanded) {
				return Err(Error::InvalidTypeMapping(expanded));
			}
			definition.type_mapping = Some(expanded);
		}

		if let Some(reverse) = map.get("@reverse") {
			if map.contains_key("@id") {
				return Err(Error::InvalidReverseProperty(term.to_string()));
			}
			let reverse = reverse
				.as_str()
				.ok_or_else(|| Error::InvalidIriMapping(term.to_string()))?;
			let expanded = self.expand_iri_with(reverse, false, true, local, defined)?;
			if !is_absolute_iri(&expanded) {
				return Err(Error::InvalidIriMapping(expanded));
			}
			definition.iri_mapping = expanded;
			definition.reverse = true;

			if let Some(container) = map.get("@container") {
				match container.as_str() {
					Some("@set") => definition.container_mapping = Some(ContainerKind::Set),
					Some("@index") => definition.container_mapping = Some(ContainerKind::Index),
					_ => return Err(Error::InvalidReverseProperty(term.to_string())),
				}
			}

			self.terms.insert(term.to_string(), Some(definition));
			defined.insert(term.to_string(), true);
			return Ok(());
		}

		let explicit_id = match map.get("@id") {
			Some(id) if id.as_str() != Some(term) => Some(id),
			_ => None,
		};

		if let Some(id) = explicit_id {
			let id = id
				.as_str()
				.ok_or_else(|| Error::InvalidIriMapping(id.to_string()))?;
			let expanded = self.expand_iri_with(id, false, true, local, defined)?;
			if expanded == "@context" {
				return Err(Error::InvalidKeywordAlias(term.to_string()));
			}
			if !is_keyword(&expanded) && !is_absolute_iri(&expanded) {
				return Err(Error::InvalidIriMapping(expanded));
			}
			definition.iri_mapping = expanded;
		} else if let Some(colon) = term.find(':') {
			// compact IRI or absolute IRI used as a term
			let prefix = &term[..colon];
			let suffix = &term[colon + 1..];
			if local.contains_key(prefix) {
				self.create_term_definition(local, prefix, defined)?;
			}
			match self.term(prefix) {
				Some(prefix_definition) => {
					definition.iri_mapping =
						format!("{}{}", prefix_definition.iri_mapping, suffix);
				}
				None => definition.iri_mapping = term.to_string(),
			}
		} else if let Some(vocab) = self.vocab() {
			definition.iri_mapping = format!("{vocab}{term}");
		} else {
			return Err(Error::InvalidIriMapping(format!(
				"term `{term}` has no IRI mapping and there is no vocabulary mapping"
			)));
		}

		if let Some(container) = map.get("@container") {
			let container = container
				.as_str()
				.ok_or_else(|| Error::InvalidContainerMapping(container.to_string()))?;
			let kind = ContainerKind::try_from(container)
				.map_err(|c| Error::InvalidContainerMapping(c.to_string()))?;
			definition.container_mapping = Some(kind);
		}

		if let Some(language) = map.get("@language") {
			if !map.contains_key("@type") {
				match language {
					Value::Null => definition.language_mapping = Some(None),
					Value::String(tag) => {
						if langtag::LangTag::new(tag).is_err() {
							return Err(Error::InvalidLanguageMapping(tag.clone()));
						}
						definition.language_mapping = Some(Some(tag.to_lowercase()));
					}
					other => {
						return Err(Error::InvalidLanguageMapping(other.to_string()));
					}
				}
			}
		}

		self.terms.insert(term.to_string(), Some(definition));
		defined.insert(term.to_string(), true);
		Ok(())
	}
}

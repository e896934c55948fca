//! Active contexts and term definitions.

use indexmap::IndexMap;
use iref::{Iri, IriBuf, IriRef};

use crate::error::Error;
use crate::syntax::ContainerKind;

pub mod iri;
pub mod processing;

/// The expansion rule recorded for a single term of an active context.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TermDefinition {
	/// Target IRI, blank node identifier or keyword.
	pub iri_mapping: String,

	/// Whether the term expresses a reverse property.
	pub reverse: bool,

	/// Type coercion: an IRI, `@id` or `@vocab`.
	pub type_mapping: Option<String>,

	/// Language coercion. The outer `None` means unset; `Some(None)` records
	/// an explicit `"@language": null` clearing the default language.
	pub language_mapping: Option<Option<String>>,

	pub container_mapping: Option<ContainerKind>,
}

impl TermDefinition {
	fn with_iri(iri_mapping: String) -> Self {
		Self {
			iri_mapping,
			reverse: false,
			type_mapping: None,
			language_mapping: None,
			container_mapping: None,
		}
	}
}

/// An active context: an immutable snapshot of a base IRI, a vocabulary
/// mapping, a default language and a set of term definitions.
///
/// Contexts are values: processing a local context returns a new context and
/// never mutates its parent.
#[derive(Debug, Clone, Default)]
pub struct Context {
	base: Option<IriBuf>,

	/// The base carried by the options the context was created with, restored
	/// when a `null` context resets the active context.
	original_base: Option<IriBuf>,

	vocab: Option<String>,
	language: Option<String>,

	/// Term definitions in definition order. `None` records a term explicitly
	/// set to `null`.
	terms: IndexMap<String, Option<TermDefinition>>,
}

impl Context {
	/// Creates the initial active context for the given document base.
	pub fn new(base: Option<&str>) -> Result<Self, Error> {
		let base = match base {
			Some(base) => Some(
				IriBuf::new(base.to_string())
					.map_err(|e| Error::InvalidBaseIri(e.0))?,
			),
			None => None,
		};
		Ok(Self {
			original_base: base.clone(),
			base,
			vocab: None,
			language: None,
			terms: IndexMap::new(),
		})
	}

	pub fn base(&self) -> Option<&IriBuf> {
		self.base.as_ref()
	}

	pub fn vocab(&self) -> Option<&str> {
		self.vocab.as_deref()
	}

	pub fn language(&self) -> Option<&str> {
		self.language.as_deref()
	}

	/// The definition of `term`, if it has one that is not `null`.
	pub fn term(&self, term: &str) -> Option<&TermDefinition> {
		self.terms.get(term).and_then(Option::as_ref)
	}

	/// Whether `term` appears in the context, including `null` definitions.
	pub fn has_term(&self, term: &str) -> bool {
		self.terms.contains_key(term)
	}

	/// Terms with a live definition, in code-point order.
	pub fn terms(&self) -> Vec<(&str, &TermDefinition)> {
		let mut terms: Vec<(&str, &TermDefinition)> = self
			.terms
			.iter()
			.filter_map(|(term, definition)| {
				definition.as_ref().map(|d| (term.as_str(), d))
			})
			.collect();
		terms.sort_unstable_by(|a, b| a.0.cmp(b.0));
		terms
	}

	/// Resolves an IRI reference against the context base. Absolute
	/// references pass through; relative references without a base are
	/// returned unchanged.
	pub fn resolve(&self, reference: &str) -> String {
		if Iri::new(reference).is_ok() {
			return reference.to_string();
		}
		match (self.base(), IriRef::new(reference)) {
			(Some(base), Ok(iri_ref)) => iri_ref.resolved(base.as_iri()).to_string(),
			_ => reference.to_string(),
		}
	}
}

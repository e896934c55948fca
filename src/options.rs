use std::convert::TryFrom;
use std::fmt;

use serde_json::Value;

use crate::loader::{DocumentLoader, NoLoader};

/// JSON-LD processing mode.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default)]
pub enum ProcessingMode {
	#[default]
	JsonLd1_0,
	JsonLd1_1,
}

impl ProcessingMode {
	pub fn as_str(&self) -> &'static str {
		match self {
			Self::JsonLd1_0 => "json-ld-1.0",
			Self::JsonLd1_1 => "json-ld-1.1",
		}
	}
}

impl<'a> TryFrom<&'a str> for ProcessingMode {
	type Error = &'a str;

	fn try_from(str: &'a str) -> Result<ProcessingMode, &'a str> {
		match str {
			"json-ld-1.0" => Ok(Self::JsonLd1_0),
			"json-ld-1.1" => Ok(Self::JsonLd1_1),
			_ => Err(str),
		}
	}
}

impl fmt::Display for ProcessingMode {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		self.as_str().fmt(f)
	}
}

/// RDF dataset canonicalization algorithm.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default)]
pub enum Algorithm {
	/// SHA-1 based labeling.
	#[default]
	Urdna2015,

	/// MD5 based labeling.
	Urgna2012,
}

impl Algorithm {
	pub fn as_str(&self) -> &'static str {
		match self {
			Self::Urdna2015 => "URDNA2015",
			Self::Urgna2012 => "URGNA2012",
		}
	}
}

impl<'a> TryFrom<&'a str> for Algorithm {
	type Error = &'a str;

	fn try_from(str: &'a str) -> Result<Algorithm, &'a str> {
		match str {
			"URDNA2015" => Ok(Self::Urdna2015),
			"URGNA2012" => Ok(Self::Urgna2012),
			_ => Err(str),
		}
	}
}

impl fmt::Display for Algorithm {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		self.as_str().fmt(f)
	}
}

/// Options driving the JSON-LD transforms.
pub struct JsonLdOptions {
	/// Base IRI against which relative IRIs resolve.
	pub base: Option<String>,

	/// Collapse single-element arrays to their value during compaction.
	pub compact_arrays: bool,

	/// A context applied on top of the active context before expansion.
	pub expand_context: Option<Value>,

	pub processing_mode: ProcessingMode,

	/// The loader used to dereference remote contexts and documents.
	pub document_loader: Option<Box<dyn DocumentLoader>>,

	// Framing flags, overridable per frame through `@embed`, `@explicit` and
	// `@omitDefault`.
	pub embed: bool,
	pub explicit: bool,
	pub omit_default: bool,

	// RDF conversion flags.
	pub use_rdf_type: bool,
	pub use_native_types: bool,
	pub produce_generalized_rdf: bool,

	/// Output format; only `application/nquads` produces a string.
	pub format: Option<String>,

	/// Canonicalization algorithm selector.
	pub algorithm: Algorithm,
}

impl JsonLdOptions {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn with_base(base: impl Into<String>) -> Self {
		Self {
			base: Some(base.into()),
			..Self::default()
		}
	}

	/// The configured loader, or a loader that refuses every URL.
	pub fn loader(&self) -> &dyn DocumentLoader {
		static NO_LOADER: NoLoader = NoLoader;
		match &self.document_loader {
			Some(loader) => loader.as_ref(),
			None => &NO_LOADER,
		}
	}
}

impl Default for JsonLdOptions {
	fn default() -> Self {
		Self {
			base: None,
			compact_arrays: true,
			expand_context: None,
			processing_mode: ProcessingMode::default(),
			document_loader: None,
			embed: true,
			explicit: false,
			omit_default: false,
			use_rdf_type: false,
			use_native_types: false,
			produce_generalized_rdf: false,
			format: None,
			algorithm: Algorithm::default(),
		}
	}
}

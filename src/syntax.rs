use std::convert::TryFrom;
use std::fmt;

/// JSON-LD keywords.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub enum Keyword {
	/// `@base`.
	/// Used to set the base IRI against which relative IRI references are
	/// resolved.
	Base,

	/// `@container`.
	/// Used to set the default container type for a term.
	Container,

	/// `@context`.
	/// Used to define the short-hand names that are used throughout a JSON-LD
	/// document.
	Context,

	/// `@default`.
	/// Used in framing to provide a default value for an absent property.
	Default,

	/// `@embed`.
	/// Framing flag controlling whether matched nodes are embedded or
	/// referenced.
	Embed,

	/// `@explicit`.
	/// Framing flag restricting output to the properties named by the frame.
	Explicit,

	/// `@graph`.
	/// Used to express a graph.
	Graph,

	/// `@id`.
	/// Used to uniquely identify node objects with IRIs or blank node
	/// identifiers.
	Id,

	/// `@index`.
	/// Used to specify that a container is used to index information.
	Index,

	/// `@language`.
	/// Used to specify the language for a particular string value or the
	/// default language of a JSON-LD document.
	Language,

	/// `@list`.
	/// Used to express an ordered set of data.
	List,

	/// `@null`.
	/// Used in framing as the explicit absence marker inside `@preserve`
	/// wrappers.
	Null,

	/// `@omitDefault`.
	/// Framing flag suppressing the insertion of `@default` values.
	OmitDefault,

	/// `@preserve`.
	/// Wraps framing defaults so they survive compaction, removed by the
	/// final cleanup pass.
	Preserve,

	/// `@reverse`.
	/// Used to express reverse properties.
	Reverse,

	/// `@set`.
	/// Used to express an unordered set of data.
	Set,

	/// `@type`.
	/// Used to set the type of a node or the datatype of a typed value.
	Type,

	/// `@value`.
	/// Used to specify the data that is associated with a particular
	/// property.
	Value,

	/// `@vocab`.
	/// Used to expand properties and values in `@type` with a common prefix
	/// IRI.
	Vocab,
}

impl Keyword {
	pub fn into_str(self) -> &'static str {
		use Keyword::*;
		match self {
			Base => "@base",
			Container => "@container",
			Context => "@context",
			Default => "@default",
			Embed => "@embed",
			Explicit => "@explicit",
			Graph => "@graph",
			Id => "@id",
			Index => "@index",
			Language => "@language",
			List => "@list",
			Null => "@null",
			OmitDefault => "@omitDefault",
			Preserve => "@preserve",
			Reverse => "@reverse",
			Set => "@set",
			Type => "@type",
			Value => "@value",
			Vocab => "@vocab",
		}
	}

	pub fn as_str(&self) -> &'static str {
		self.into_str()
	}
}

impl<'a> TryFrom<&'a str> for Keyword {
	type Error = &'a str;

	fn try_from(str: &'a str) -> Result<Keyword, &'a str> {
		use Keyword::*;
		match str {
			"@base" => Ok(Base),
			"@container" => Ok(Container),
			"@context" => Ok(Context),
			"@default" => Ok(Default),
			"@embed" => Ok(Embed),
			"@explicit" => Ok(Explicit),
			"@graph" => Ok(Graph),
			"@id" => Ok(Id),
			"@index" => Ok(Index),
			"@language" => Ok(Language),
			"@list" => Ok(List),
			"@null" => Ok(Null),
			"@omitDefault" => Ok(OmitDefault),
			"@preserve" => Ok(Preserve),
			"@reverse" => Ok(Reverse),
			"@set" => Ok(Set),
			"@type" => Ok(Type),
			"@value" => Ok(Value),
			"@vocab" => Ok(Vocab),
			_ => Err(str),
		}
	}
}

impl fmt::Display for Keyword {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		self.as_str().fmt(f)
	}
}

/// Checks if the given string is one of the reserved JSON-LD keys.
pub fn is_keyword(str: &str) -> bool {
	Keyword::try_from(str).is_ok()
}

/// Checks if the given string has the form of a keyword (an `@` prefix),
/// whether or not it is actually reserved.
pub fn is_keyword_like(str: &str) -> bool {
	str.starts_with('@')
}

/// Term container mappings.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub enum ContainerKind {
	Index,
	Language,
	List,
	Set,
}

impl ContainerKind {
	pub fn into_keyword(self) -> Keyword {
		use ContainerKind::*;
		match self {
			Index => Keyword::Index,
			Language => Keyword::Language,
			List => Keyword::List,
			Set => Keyword::Set,
		}
	}

	pub fn as_str(&self) -> &'static str {
		self.into_keyword().into_str()
	}
}

impl<'a> TryFrom<&'a str> for ContainerKind {
	type Error = &'a str;

	fn try_from(str: &'a str) -> Result<ContainerKind, &'a str> {
		use ContainerKind::*;
		match str {
			"@index" => Ok(Index),
			"@language" => Ok(Language),
			"@list" => Ok(List),
			"@set" => Ok(Set),
			_ => Err(str),
		}
	}
}

impl fmt::Display for ContainerKind {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		self.as_str().fmt(f)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn keyword_round_trip() {
		for str in [
			"@base",
			"@container",
			"@context",
			"@default",
			"@embed",
			"@explicit",
			"@graph",
			"@id",
			"@index",
			"@language",
			"@list",
			"@null",
			"@omitDefault",
			"@preserve",
			"@reverse",
			"@set",
			"@type",
			"@value",
			"@vocab",
		] {
			assert_eq!(Keyword::try_from(str).unwrap().as_str(), str);
		}
	}

	#[test]
	fn unknown_at_key_is_not_a_keyword() {
		assert!(!is_keyword("@nest"));
		assert!(is_keyword_like("@nest"));
		assert!(!is_keyword_like("nest"));
	}
}

use std::fmt;

/// Error codes of the closed JSON-LD error enumeration.
///
/// The display form of each code is the code string mandated by the JSON-LD
/// API specification.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum ErrorCode {
	LoadingDocumentFailed,
	ListOfLists,
	InvalidIndexValue,
	ConflictingIndexes,
	InvalidIdValue,
	InvalidLocalContext,
	MultipleContextLinkHeaders,
	LoadingRemoteContextFailed,
	InvalidRemoteContext,
	RecursiveContextInclusion,
	InvalidBaseIri,
	InvalidVocabMapping,
	InvalidDefaultLanguage,
	KeywordRedefinition,
	InvalidTermDefinition,
	InvalidReverseProperty,
	InvalidIriMapping,
	CyclicIriMapping,
	InvalidKeywordAlias,
	InvalidTypeMapping,
	InvalidLanguageMapping,
	CollidingKeywords,
	InvalidContainerMapping,
	InvalidTypeValue,
	InvalidValueObject,
	InvalidValueObjectValue,
	InvalidLanguageTaggedString,
	InvalidLanguageTaggedValue,
	InvalidTypedValue,
	InvalidSetOrListObject,
	InvalidLanguageMapValue,
	CompactionToListOfLists,
	InvalidReversePropertyMap,
	InvalidReverseValue,
	InvalidReversePropertyValue,
	SyntaxError,
	NotImplemented,
	UnknownFormat,
	InvalidInput,
	ParseError,
}

impl ErrorCode {
	pub fn as_str(&self) -> &'static str {
		use ErrorCode::*;
		match self {
			LoadingDocumentFailed => "loading document failed",
			ListOfLists => "list of lists",
			InvalidIndexValue => "invalid @index value",
			ConflictingIndexes => "conflicting indexes",
			InvalidIdValue => "invalid @id value",
			InvalidLocalContext => "invalid local context",
			MultipleContextLinkHeaders => "multiple context link headers",
			LoadingRemoteContextFailed => "loading remote context failed",
			InvalidRemoteContext => "invalid remote context",
			RecursiveContextInclusion => "recursive context inclusion",
			InvalidBaseIri => "invalid base IRI",
			InvalidVocabMapping => "invalid vocab mapping",
			InvalidDefaultLanguage => "invalid default language",
			KeywordRedefinition => "keyword redefinition",
			InvalidTermDefinition => "invalid term definition",
			InvalidReverseProperty => "invalid reverse property",
			InvalidIriMapping => "invalid IRI mapping",
			CyclicIriMapping => "cyclic IRI mapping",
			InvalidKeywordAlias => "invalid keyword alias",
			InvalidTypeMapping => "invalid type mapping",
			InvalidLanguageMapping => "invalid language mapping",
			CollidingKeywords => "colliding keywords",
			InvalidContainerMapping => "invalid container mapping",
			InvalidTypeValue => "invalid type value",
			InvalidValueObject => "invalid value object",
			InvalidValueObjectValue => "invalid value object value",
			InvalidLanguageTaggedString => "invalid language-tagged string",
			InvalidLanguageTaggedValue => "invalid language-tagged value",
			InvalidTypedValue => "invalid typed value",
			InvalidSetOrListObject => "invalid set or list object",
			InvalidLanguageMapValue => "invalid language map value",
			CompactionToListOfLists => "compaction to list of lists",
			InvalidReversePropertyMap => "invalid reverse property map",
			InvalidReverseValue => "invalid @reverse value",
			InvalidReversePropertyValue => "invalid reverse property value",
			SyntaxError => "syntax error",
			NotImplemented => "not implemented",
			UnknownFormat => "unknown format",
			InvalidInput => "invalid input",
			ParseError => "parse error",
		}
	}
}

impl fmt::Display for ErrorCode {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		self.as_str().fmt(f)
	}
}

/// JSON-LD processing error: an error code plus a free-form detail payload.
#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("loading document failed: {0}")]
	LoadingDocumentFailed(String),

	#[error("list of lists")]
	ListOfLists,

	#[error("invalid `@index` value: {0}")]
	InvalidIndexValue(String),

	#[error("conflicting indexes for node `{0}`")]
	ConflictingIndexes(String),

	#[error("invalid `@id` value: {0}")]
	InvalidIdValue(String),

	#[error("invalid local context: {0}")]
	InvalidLocalContext(String),

	#[error("multiple context link headers")]
	MultipleContextLinkHeaders,

	#[error("loading remote context failed: {0}")]
	LoadingRemoteContextFailed(String),

	#[error("invalid remote context: {0}")]
	InvalidRemoteContext(String),

	#[error("recursive context inclusion: {0}")]
	RecursiveContextInclusion(String),

	#[error("invalid base IRI: {0}")]
	InvalidBaseIri(String),

	#[error("invalid vocab mapping: {0}")]
	InvalidVocabMapping(String),

	#[error("invalid default language: {0}")]
	InvalidDefaultLanguage(String),

	#[error("keyword redefinition: {0}")]
	KeywordRedefinition(String),

	#[error("invalid term definition: {0}")]
	InvalidTermDefinition(String),

	#[error("invalid reverse property: {0}")]
	InvalidReverseProperty(String),

	#[error("invalid IRI mapping: {0}")]
	InvalidIriMapping(String),

	#[error("cyclic IRI mapping: {0}")]
	CyclicIriMapping(String),

	#[error("invalid keyword alias: {0}")]
	InvalidKeywordAlias(String),

	#[error("invalid type mapping: {0}")]
	InvalidTypeMapping(String),

	#[error("invalid language mapping: {0}")]
	InvalidLanguageMapping(String),

	#[error("colliding keywords: {0}")]
	CollidingKeywords(String),

	#[error("invalid container mapping: {0}")]
	InvalidContainerMapping(String),

	#[error("invalid `@type` value")]
	InvalidTypeValue,

	#[error("invalid value object: {0}")]
	InvalidValueObject(String),

	#[error("invalid value object value")]
	InvalidValueObjectValue,

	#[error("invalid language-tagged string")]
	InvalidLanguageTaggedString,

	#[error("invalid language-tagged value")]
	InvalidLanguageTaggedValue,

	#[error("invalid typed value")]
	InvalidTypedValue,

	#[error("invalid set or list object")]
	InvalidSetOrListObject,

	#[error("invalid language map value")]
	InvalidLanguageMapValue,

	#[error("compaction to list of lists: {0}")]
	CompactionToListOfLists(String),

	#[error("invalid reverse property map")]
	InvalidReversePropertyMap,

	#[error("invalid `@reverse` value")]
	InvalidReverseValue,

	#[error("invalid reverse property value")]
	InvalidReversePropertyValue,

	#[error("syntax error: {0}")]
	SyntaxError(String),

	#[error("not implemented: {0}")]
	NotImplemented(String),

	#[error("unknown format: {0}")]
	UnknownFormat(String),

	#[error("invalid input: {0}")]
	InvalidInput(String),

	#[error("error while parsing N-Quads; invalid quad at line {0}")]
	ParseError(usize),
}

impl Error {
	pub fn code(&self) -> ErrorCode {
		match self {
			Self::LoadingDocumentFailed(_) => ErrorCode::LoadingDocumentFailed,
			Self::ListOfLists => ErrorCode::ListOfLists,
			Self::InvalidIndexValue(_) => ErrorCode::InvalidIndexValue,
			Self::ConflictingIndexes(_) => ErrorCode::ConflictingIndexes,
			Self::InvalidIdValue(_) => ErrorCode::InvalidIdValue,
			Self::InvalidLocalContext(_) => ErrorCode::InvalidLocalContext,
			Self::MultipleContextLinkHeaders => ErrorCode::MultipleContextLinkHeaders,
			Self::LoadingRemoteContextFailed(_) => ErrorCode::LoadingRemoteContextFailed,
			Self::InvalidRemoteContext(_) => ErrorCode::InvalidRemoteContext,
			Self::RecursiveContextInclusion(_) => ErrorCode::RecursiveContextInclusion,
			Self::InvalidBaseIri(_) => ErrorCode::InvalidBaseIri,
			Self::InvalidVocabMapping(_) => ErrorCode::InvalidVocabMapping,
			Self::InvalidDefaultLanguage(_) => ErrorCode::InvalidDefaultLanguage,
			Self::KeywordRedefinition(_) => ErrorCode::KeywordRedefinition,
			Self::InvalidTermDefinition(_) => ErrorCode::InvalidTermDefinition,
			Self::InvalidReverseProperty(_) => ErrorCode::InvalidReverseProperty,
			Self::InvalidIriMapping(_) => ErrorCode::InvalidIriMapping,
			Self::CyclicIriMapping(_) => ErrorCode::CyclicIriMapping,
			Self::InvalidKeywordAlias(_) => ErrorCode::InvalidKeywordAlias,
			Self::InvalidTypeMapping(_) => ErrorCode::InvalidTypeMapping,
			Self::InvalidLanguageMapping(_) => ErrorCode::InvalidLanguageMapping,
			Self::CollidingKeywords(_) => ErrorCode::CollidingKeywords,
			Self::InvalidContainerMapping(_) => ErrorCode::InvalidContainerMapping,
			Self::InvalidTypeValue => ErrorCode::InvalidTypeValue,
			Self::InvalidValueObject(_) => ErrorCode::InvalidValueObject,
			Self::InvalidValueObjectValue => ErrorCode::InvalidValueObjectValue,
			Self::InvalidLanguageTaggedString => ErrorCode::InvalidLanguageTaggedString,
			Self::InvalidLanguageTaggedValue => ErrorCode::InvalidLanguageTaggedValue,
			Self::InvalidTypedValue => ErrorCode::InvalidTypedValue,
			Self::InvalidSetOrListObject => ErrorCode::InvalidSetOrListObject,
			Self::InvalidLanguageMapValue => ErrorCode::InvalidLanguageMapValue,
			Self::CompactionToListOfLists(_) => ErrorCode::CompactionToListOfLists,
			Self::InvalidReversePropertyMap => ErrorCode::InvalidReversePropertyMap,
			Self::InvalidReverseValue => ErrorCode::InvalidReverseValue,
			Self::InvalidReversePropertyValue => ErrorCode::InvalidReversePropertyValue,
			Self::SyntaxError(_) => ErrorCode::SyntaxError,
			Self::NotImplemented(_) => ErrorCode::NotImplemented,
			Self::UnknownFormat(_) => ErrorCode::UnknownFormat,
			Self::InvalidInput(_) => ErrorCode::InvalidInput,
			Self::ParseError(_) => ErrorCode::ParseError,
		}
	}
}

//! Remote document retrieval.
//!
//! The transforms only ever block inside a loader; every other component is
//! pure computation. Callers inject a loader through the options, typically
//! one that answers from a local cache.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::OnceLock;

use log::debug;
use regex::Regex;
use serde_json::Value;

use crate::error::Error;

/// JSON-LD context link relation.
pub const LINK_HEADER_REL: &str = "http://www.w3.org/ns/json-ld#context";

/// An HTTP `Accept` header that prefers JSON-LD, then plain JSON, then
/// anything JSON-shaped.
pub const ACCEPT_HEADER: &str = "application/ld+json, application/json;q=0.9, \
	application/javascript;q=0.5, text/javascript;q=0.5, text/plain;q=0.2, */*;q=0.1";

/// A document retrieved from a remote source.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct RemoteDocument {
	/// The final URL of the document, after redirects.
	pub document_url: String,

	/// The parsed document.
	pub document: Value,

	/// A context URL found in a `Link` header, if any.
	pub context_url: Option<String>,
}

/// Knows how to load remote documents.
pub trait DocumentLoader {
	fn load_document(&self, url: &str) -> Result<RemoteDocument, Error>;
}

/// A loader that does not load anything.
///
/// Can be useful when you know that all documents and contexts are provided
/// inline and no loading should ever occur.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoLoader;

impl DocumentLoader for NoLoader {
	fn load_document(&self, url: &str) -> Result<RemoteDocument, Error> {
		Err(Error::LoadingDocumentFailed(format!(
			"no loader configured, cannot load `{url}`"
		)))
	}
}

/// A loader answering from a static URL-to-file map, falling back to a
/// delegate loader on miss.
pub struct CachingLoader<L> {
	mapping: HashMap<String, PathBuf>,
	fallback: L,
}

impl<L> CachingLoader<L> {
	pub fn new(fallback: L) -> Self {
		Self {
			mapping: HashMap::new(),
			fallback,
		}
	}

	/// Maps `url` to a local file served in place of the remote document.
	pub fn mount(&mut self, url: impl Into<String>, path: impl Into<PathBuf>) -> &mut Self {
		self.mapping.insert(url.into(), path.into());
		self
	}
}

impl<L: DocumentLoader> DocumentLoader for CachingLoader<L> {
	fn load_document(&self, url: &str) -> Result<RemoteDocument, Error> {
		match self.mapping.get(url) {
			Some(path) => {
				debug!("serving `{url}` from `{}`", path.display());
				let content = std::fs::read_to_string(path)
					.map_err(|e| Error::LoadingDocumentFailed(format!("{url}: {e}")))?;
				let document: Value = serde_json::from_str(&content)
					.map_err(|e| Error::LoadingDocumentFailed(format!("{url}: {e}")))?;
				Ok(RemoteDocument {
					document_url: url.to_string(),
					document,
					context_url: None,
				})
			}
			None => self.fallback.load_document(url),
		}
	}
}

fn split_on_comma_regex() -> &'static Regex {
	static REGEX: OnceLock<Regex> = OnceLock::new();
	REGEX.get_or_init(|| {
		Regex::new("(?:<[^>]*?>|\"[^\"]*?\"|[^,])+").expect("the entry pattern is valid")
	})
}

fn link_header_regex() -> &'static Regex {
	static REGEX: OnceLock<Regex> = OnceLock::new();
	REGEX.get_or_init(|| {
		Regex::new("\\s*<([^>]*?)>\\s*(?:;\\s*(.*))?").expect("the link pattern is valid")
	})
}

fn params_regex() -> &'static Regex {
	static REGEX: OnceLock<Regex> = OnceLock::new();
	REGEX.get_or_init(|| {
		Regex::new("(.*?)=(?:(?:\"([^\"]*?)\")|([^\"]*?))\\s*(?:(?:;\\s*)|$)")
			.expect("the parameter pattern is valid")
	})
}

/// Parses an HTTP `Link` header. The results are keyed by the value of
/// `rel`; each target maps its parameters, with the link target itself under
/// `target`.
pub fn parse_link_header(header: &str) -> HashMap<String, Vec<HashMap<String, String>>> {
	let mut rval: HashMap<String, Vec<HashMap<String, String>>> = HashMap::new();

	for entry in split_on_comma_regex().find_iter(header) {
		let Some(captures) = link_header_regex().captures(entry.as_str()) else {
			continue;
		};

		let mut result = HashMap::new();
		result.insert("target".to_string(), captures[1].to_string());

		if let Some(params) = captures.get(2) {
			for param in params_regex().captures_iter(params.as_str()) {
				let value = param
					.get(2)
					.or_else(|| param.get(3))
					.map(|m| m.as_str())
					.unwrap_or("");
				result.insert(param[1].to_string(), value.to_string());
			}
		}

		let rel = result.get("rel").cloned().unwrap_or_default();
		rval.entry(rel).or_default().push(result);
	}

	rval
}

/// A loader retrieving documents over HTTP with a blocking `reqwest` client.
#[cfg(feature = "reqwest")]
pub struct ReqwestLoader {
	client: reqwest::blocking::Client,
}

#[cfg(feature = "reqwest")]
impl ReqwestLoader {
	pub fn new() -> Self {
		Self {
			client: reqwest::blocking::Client::new(),
		}
	}
}

#[cfg(feature = "reqwest")]
impl Default for ReqwestLoader {
	fn default() -> Self {
		Self::new()
	}
}

#[cfg(feature = "reqwest")]
impl DocumentLoader for ReqwestLoader {
	fn load_document(&self, url: &str) -> Result<RemoteDocument, Error> {
		debug!("loading `{url}`");
		let response = self
			.client
			.get(url)
			.header(reqwest::header::ACCEPT, ACCEPT_HEADER)
			.send()
			.map_err(|e| Error::LoadingDocumentFailed(e.to_string()))?;

		if !response.status().is_success() {
			return Err(Error::LoadingDocumentFailed(format!(
				"bad response status code: {}",
				response.status()
			)));
		}

		let document_url = response.url().to_string();

		let content_type = response
			.headers()
			.get(reqwest::header::CONTENT_TYPE)
			.and_then(|value| value.to_str().ok())
			.and_then(|value| value.parse::<mime::Mime>().ok());
		let is_json_ld = content_type
			.as_ref()
			.map(|m| m.essence_str() == "application/ld+json")
			.unwrap_or(false);

		let mut context_url = None;
		if !is_json_ld {
			if let Some(link) = response
				.headers()
				.get(reqwest::header::LINK)
				.and_then(|value| value.to_str().ok())
			{
				let links = parse_link_header(link);
				if let Some(entries) = links.get(LINK_HEADER_REL) {
					if entries.len() > 1 {
						return Err(Error::MultipleContextLinkHeaders);
					}
					context_url = entries
						.first()
						.and_then(|entry| entry.get("target"))
						.cloned();
				}
			}
		}

		let document: Value = response
			.json()
			.map_err(|e| Error::LoadingDocumentFailed(e.to_string()))?;

		Ok(RemoteDocument {
			document_url,
			document,
			context_url,
		})
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn parse_single_link_header() {
		let header = "<http://json-ld.org/contexts/person.jsonld>; \
			rel=\"http://www.w3.org/ns/json-ld#context\"; type=\"application/ld+json\"";
		let parsed = parse_link_header(header);
		let entries = parsed.get(LINK_HEADER_REL).unwrap();
		assert_eq!(entries.len(), 1);
		assert_eq!(
			entries[0].get("target").unwrap(),
			"http://json-ld.org/contexts/person.jsonld"
		);
		assert_eq!(entries[0].get("type").unwrap(), "application/ld+json");
	}

	#[test]
	fn parse_multiple_link_headers() {
		let header = "<http://a/ctx1>; rel=\"http://www.w3.org/ns/json-ld#context\", \
			<http://a/ctx2>; rel=\"http://www.w3.org/ns/json-ld#context\"";
		let parsed = parse_link_header(header);
		assert_eq!(parsed.get(LINK_HEADER_REL).unwrap().len(), 2);
	}

	#[test]
	fn no_loader_always_fails() {
		let err = NoLoader.load_document("http://example.org/").unwrap_err();
		assert_eq!(err.code(), crate::ErrorCode::LoadingDocumentFailed);
	}

	#[test]
	fn caching_loader_serves_mounted_files_and_delegates_misses() {
		let path = std::env::temp_dir().join("json-ld-processing-cached-context.json");
		std::fs::write(&path, r#"{"@context": {"@vocab": "http://example.org/"}}"#).unwrap();

		let mut loader = CachingLoader::new(NoLoader);
		loader.mount("http://example.org/context", &path);

		let document = loader
			.load_document("http://example.org/context")
			.unwrap();
		assert_eq!(
			document.document["@context"]["@vocab"],
			serde_json::json!("http://example.org/")
		);

		let err = loader.load_document("http://example.org/other").unwrap_err();
		assert_eq!(err.code(), crate::ErrorCode::LoadingDocumentFailed);

		std::fs::remove_file(&path).ok();
	}
}

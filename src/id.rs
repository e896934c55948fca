use indexmap::IndexMap;

/// Issues unique identifiers, keeping track of any previously issued
/// identifiers.
///
/// Identical input sequences yield identical output sequences; re-requesting
/// an old identifier returns the name it was first issued. The map of issued
/// identifiers preserves first-issuance order, which canonicalization
/// consumes when committing a path issuer into the canonical issuer.
#[derive(Debug, Clone)]
pub struct IdentifierIssuer {
	prefix: String,
	counter: usize,
	existing: IndexMap<String, String>,
}

impl IdentifierIssuer {
	pub fn new(prefix: &str) -> Self {
		Self {
			prefix: prefix.to_string(),
			counter: 0,
			existing: IndexMap::new(),
		}
	}

	/// Returns the identifier issued for `old`, issuing a new one on first
	/// request. `None` generates a fresh identifier that is not recorded.
	pub fn issue(&mut self, old: Option<&str>) -> String {
		if let Some(old) = old {
			if let Some(existing) = self.existing.get(old) {
				return existing.clone();
			}
		}

		let id = format!("{}{}", self.prefix, self.counter);
		self.counter += 1;

		if let Some(old) = old {
			self.existing.insert(old.to_string(), id.clone());
		}

		id
	}

	/// Returns the identifier previously issued for `old`, if any.
	pub fn get(&self, old: &str) -> Option<&str> {
		self.existing.get(old).map(String::as_str)
	}

	/// Checks whether `old` has already been assigned an identifier.
	pub fn has(&self, old: &str) -> bool {
		self.existing.contains_key(old)
	}

	/// The old identifiers in first-issuance order.
	pub fn existing_order(&self) -> impl Iterator<Item = &str> {
		self.existing.keys().map(String::as_str)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn reissue_returns_first_name() {
		let mut issuer = IdentifierIssuer::new("_:b");
		assert_eq!(issuer.issue(Some("n0")), "_:b0");
		assert_eq!(issuer.issue(Some("n1")), "_:b1");
		assert_eq!(issuer.issue(Some("n0")), "_:b0");
		assert!(issuer.has("n1"));
		assert!(!issuer.has("n2"));
	}

	#[test]
	fn anonymous_issue_is_not_recorded() {
		let mut issuer = IdentifierIssuer::new("_:b");
		assert_eq!(issuer.issue(None), "_:b0");
		assert_eq!(issuer.issue(None), "_:b1");
		assert_eq!(issuer.existing_order().count(), 0);
	}

	#[test]
	fn clone_preserves_issuance_order() {
		let mut issuer = IdentifierIssuer::new("_:c14n");
		issuer.issue(Some("z"));
		issuer.issue(Some("a"));
		let clone = issuer.clone();
		let order: Vec<&str> = clone.existing_order().collect();
		assert_eq!(order, vec!["z", "a"]);
		// the clone is independent of the original
		let mut clone = clone;
		clone.issue(Some("m"));
		assert!(!issuer.has("m"));
	}
}

//! Location resolution against a fixed base origin.
//!
//! Every navigation target is resolved against the application's base origin
//! before it reaches the route table. Matching then works on the decomposed
//! [`Location`] (path, query, fragment) rather than on raw strings.

use crate::error::UrlError;
use url::Url;

/// The fixed origin all navigation targets are resolved against.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BaseOrigin {
	base: Url,
}

impl BaseOrigin {
	/// Parses a base origin such as `https://example.org/`.
	///
	/// # Errors
	///
	/// Returns [`UrlError::InvalidBase`] if the string is not an absolute URL
	/// that can act as a base (e.g. `mailto:` URLs are rejected).
	pub fn parse(origin: &str) -> Result<Self, UrlError> {
		let base = Url::parse(origin).map_err(|e| UrlError::InvalidBase {
			origin: origin.to_string(),
			reason: e.to_string(),
		})?;

		if base.cannot_be_a_base() || base.host_str().is_none() {
			return Err(UrlError::InvalidBase {
				origin: origin.to_string(),
				reason: "not a hierarchical URL with a host".to_string(),
			});
		}

		Ok(Self { base })
	}

	/// Returns the base as a string.
	pub fn as_str(&self) -> &str {
		self.base.as_str()
	}

	/// Resolves an absolute or relative target into a [`Location`].
	///
	/// Targets on another origin still resolve; the result reports
	/// [`Location::is_foreign`] so callers can leave them to the host.
	pub fn resolve(&self, target: &str) -> Result<Location, UrlError> {
		let url = self
			.base
			.join(target)
			.map_err(|e| UrlError::InvalidTarget {
				target: target.to_string(),
				reason: e.to_string(),
			})?;
		let foreign = url.origin() != self.base.origin();
		Ok(Location::from_url(url, foreign))
	}
}

/// A decomposed, resolved navigation target.
#[derive(Debug, Clone)]
pub struct Location {
	url: Url,
	path: String,
	query: Vec<(String, String)>,
	foreign: bool,
}

impl Location {
	fn from_url(url: Url, foreign: bool) -> Self {
		let path = url.path().to_string();
		let query = url
			.query_pairs()
			.map(|(k, v)| (k.into_owned(), v.into_owned()))
			.collect();

		Self {
			url,
			path,
			query,
			foreign,
		}
	}

	/// Returns the percent-encoded path, always starting with `/`.
	pub fn path(&self) -> &str {
		&self.path
	}

	/// Returns the decoded query pairs in order of appearance.
	pub fn query(&self) -> &[(String, String)] {
		&self.query
	}

	/// Returns the first value of a query parameter.
	pub fn query_param(&self, name: &str) -> Option<&str> {
		self.query
			.iter()
			.find(|(k, _)| k == name)
			.map(|(_, v)| v.as_str())
	}

	/// Returns the fragment without the leading `#`.
	pub fn fragment(&self) -> Option<&str> {
		self.url.fragment()
	}

	/// Returns whether this location is on a different origin than the base.
	pub fn is_foreign(&self) -> bool {
		self.foreign
	}

	/// Returns the full absolute URL.
	pub fn url(&self) -> &Url {
		&self.url
	}

	/// Returns the href to hand to the history API.
	///
	/// Same-origin locations are origin-relative (`/path?query#fragment`);
	/// foreign locations keep their absolute form.
	pub fn href(&self) -> String {
		if self.foreign {
			return self.url.to_string();
		}

		let mut href = self.url.path().to_string();
		if let Some(query) = self.url.query() {
			href.push('?');
			href.push_str(query);
		}
		if let Some(fragment) = self.url.fragment() {
			href.push('#');
			href.push_str(fragment);
		}
		href
	}
}

impl PartialEq for Location {
	fn eq(&self, other: &Self) -> bool {
		self.url == other.url
	}
}

impl Eq for Location {}

impl std::fmt::Display for Location {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "{}", self.href())
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::{fixture, rstest};

	#[fixture]
	fn base() -> BaseOrigin {
		BaseOrigin::parse("https://videos.example.org/").unwrap()
	}

	#[rstest]
	fn test_resolve_absolute_path(base: BaseOrigin) {
		let location = base.resolve("/v/42").unwrap();

		assert_eq!(location.path(), "/v/42");
		assert!(location.query().is_empty());
		assert!(!location.is_foreign());
		assert_eq!(location.href(), "/v/42");
	}

	#[rstest]
	fn test_resolve_decomposes_query_and_fragment(base: BaseOrigin) {
		let location = base.resolve("/search?q=rust%20talks&page=2#results").unwrap();

		assert_eq!(location.path(), "/search");
		assert_eq!(location.query_param("q"), Some("rust talks"));
		assert_eq!(location.query_param("page"), Some("2"));
		assert_eq!(location.query_param("missing"), None);
		assert_eq!(location.fragment(), Some("results"));
		assert_eq!(location.href(), "/search?q=rust%20talks&page=2#results");
	}

	#[rstest]
	fn test_resolve_relative_against_nested_base() {
		let base = BaseOrigin::parse("https://example.org/app/").unwrap();

		let location = base.resolve("series/7").unwrap();

		assert_eq!(location.path(), "/app/series/7");
	}

	#[rstest]
	fn test_resolve_foreign_origin(base: BaseOrigin) {
		let location = base.resolve("https://elsewhere.example.com/x").unwrap();

		assert!(location.is_foreign());
		assert_eq!(location.href(), "https://elsewhere.example.com/x");
	}

	#[rstest]
	fn test_same_target_resolves_equal(base: BaseOrigin) {
		let a = base.resolve("/v/42").unwrap();
		let b = base.resolve("https://videos.example.org/v/42").unwrap();

		assert_eq!(a, b);
	}

	#[rstest]
	#[case("not a url")]
	#[case("mailto:someone@example.org")]
	fn test_invalid_base_rejected(#[case] origin: &str) {
		assert!(matches!(
			BaseOrigin::parse(origin),
			Err(UrlError::InvalidBase { .. })
		));
	}
}

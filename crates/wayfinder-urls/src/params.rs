//! Path parameters extracted by a matched pattern.

use crate::error::PathError;
use std::str::FromStr;

/// Parameters captured from a path, in the order they appear in the pattern.
///
/// Values are percent-decoded on insertion. A value that does not decode to
/// valid UTF-8 is kept verbatim.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RouteParams {
	entries: Vec<(String, String)>,
}

impl RouteParams {
	/// Creates an empty parameter set.
	pub fn new() -> Self {
		Self::default()
	}

	pub(crate) fn insert(&mut self, name: String, raw: &str) {
		let value = urlencoding::decode(raw)
			.map(|v| v.into_owned())
			.unwrap_or_else(|_| raw.to_string());
		self.entries.push((name, value));
	}

	/// Returns the value captured for `name`.
	pub fn get(&self, name: &str) -> Option<&str> {
		self.entries
			.iter()
			.find(|(k, _)| k == name)
			.map(|(_, v)| v.as_str())
	}

	/// Parses the value captured for `name` into `T`.
	///
	/// # Example
	///
	/// ```ignore
	/// let id: u64 = params.parse("id")?;
	/// ```
	pub fn parse<T>(&self, name: &str) -> Result<T, PathError>
	where
		T: FromStr,
		T::Err: std::fmt::Display,
	{
		let raw = self
			.get(name)
			.ok_or_else(|| PathError::Missing(name.to_string()))?;

		raw.parse::<T>().map_err(|e| PathError::ParseError {
			name: name.to_string(),
			param_type: std::any::type_name::<T>(),
			raw_value: raw.to_string(),
			reason: e.to_string(),
		})
	}

	/// Iterates over the values in pattern order.
	pub fn values(&self) -> impl Iterator<Item = &str> {
		self.entries.iter().map(|(_, v)| v.as_str())
	}

	/// Iterates over `(name, value)` pairs in pattern order.
	pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
		self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
	}

	/// Returns the number of captured parameters.
	pub fn len(&self) -> usize {
		self.entries.len()
	}

	/// Returns whether no parameters were captured.
	pub fn is_empty(&self) -> bool {
		self.entries.is_empty()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	fn params(pairs: &[(&str, &str)]) -> RouteParams {
		let mut params = RouteParams::new();
		for (k, v) in pairs {
			params.insert(k.to_string(), v);
		}
		params
	}

	#[rstest]
	fn test_parse_typed_value() {
		let params = params(&[("id", "42")]);

		let id: u64 = params.parse("id").unwrap();

		assert_eq!(id, 42);
	}

	#[rstest]
	fn test_parse_missing_param() {
		let params = params(&[]);

		let result = params.parse::<u64>("id");

		assert_eq!(result, Err(PathError::Missing("id".to_string())));
	}

	#[rstest]
	fn test_parse_invalid_value() {
		let params = params(&[("id", "abc")]);

		let err = params.parse::<u64>("id").unwrap_err();

		match err {
			PathError::ParseError {
				name, raw_value, ..
			} => {
				assert_eq!(name, "id");
				assert_eq!(raw_value, "abc");
			}
			other => panic!("unexpected error: {other:?}"),
		}
	}

	#[rstest]
	fn test_invalid_utf8_kept_verbatim() {
		let params = params(&[("raw", "%FF")]);

		assert_eq!(params.get("raw"), Some("%FF"));
	}
}

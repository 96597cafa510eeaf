//! Error types for route tables, patterns and URL resolution.

use thiserror::Error;

/// Error type for path parameter extraction.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PathError {
	/// The pattern has no parameter with this name.
	#[error("Missing path parameter: {0}")]
	Missing(String),
	/// Failed to parse a parameter value.
	#[error("Failed to parse parameter '{name}' value '{raw_value}' as {param_type}: {reason}")]
	ParseError {
		/// Name of the parameter that failed to parse.
		name: String,
		/// Expected type name.
		param_type: &'static str,
		/// Raw string value that failed to parse.
		raw_value: String,
		/// Error message from parsing.
		reason: String,
	},
}

/// Error type for pattern compilation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PatternError {
	/// Pattern string is longer than allowed.
	#[error("Pattern length {length} exceeds maximum allowed length of {max} bytes")]
	TooLong {
		/// Actual length in bytes.
		length: usize,
		/// Allowed length in bytes.
		max: usize,
	},
	/// Pattern has more segments than allowed.
	#[error("Pattern has {count} path segments, exceeding maximum of {max}")]
	TooManySegments {
		/// Actual segment count.
		count: usize,
		/// Allowed segment count.
		max: usize,
	},
	/// A `{` was never closed or a parameter has no name.
	#[error("Malformed parameter in pattern '{0}'")]
	MalformedParameter(String),
	/// The compiled regex was rejected.
	#[error("Failed to compile pattern regex: {0}")]
	Regex(String),
}

/// Error type for resolving targets against the base origin.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UrlError {
	/// The base origin is not an absolute, hierarchical URL.
	#[error("Invalid base origin '{origin}': {reason}")]
	InvalidBase {
		/// The rejected origin string.
		origin: String,
		/// Why it was rejected.
		reason: String,
	},
	/// The navigation target could not be parsed.
	#[error("Cannot resolve '{target}': {reason}")]
	InvalidTarget {
		/// The rejected target.
		target: String,
		/// Parser message.
		reason: String,
	},
}

/// Error type for route table construction.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RouterError {
	/// A route table was built without a fallback route.
	#[error("Route table has no fallback route")]
	MissingFallback,
	/// A route pattern was rejected.
	#[error("Invalid route pattern '{pattern}': {source}")]
	InvalidPattern {
		/// The rejected pattern.
		pattern: String,
		/// Compilation error.
		source: PatternError,
	},
}

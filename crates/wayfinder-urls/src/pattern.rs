//! Route path patterns.
//!
//! Patterns are compiled once into anchored regular expressions and matched
//! against the percent-encoded path of a resolved [`Location`](crate::Location).

use crate::error::PatternError;
use crate::params::RouteParams;
use std::collections::HashMap;

/// Longest accepted pattern source, in bytes.
const MAX_PATTERN_BYTES: usize = 1024;

/// Most `/`-separated segments a pattern may have.
const MAX_SEGMENTS: usize = 32;

/// Upper bound for the compiled automaton.
const MAX_COMPILED_SIZE: usize = 1 << 20;

/// A compiled route path pattern.
///
/// | Source | Matches |
/// |---|---|
/// | `/series/` | that path only |
/// | `/v/{id}`, `/v/:id` | one segment, captured as `id` |
/// | `/s/{series}/v/{video}` | two captures, in order |
/// | `/docs/{rest:*}` | everything after `/docs/`, slashes included |
///
/// A `{name:*}` capture is greedy and spans segments: `/docs/{rest:*}`
/// captures `guide/intro` from `/docs/guide/intro`.
#[derive(Debug, Clone)]
pub struct ClientPathPattern {
	source: String,
	regex: regex::Regex,
	param_names: Vec<String>,
}

impl ClientPathPattern {
	/// Compiles `pattern`.
	///
	/// Anything outside a capture is matched literally.
	///
	/// # Errors
	///
	/// - [`PatternError::TooLong`] past 1024 bytes
	/// - [`PatternError::TooManySegments`] past 32 segments
	/// - [`PatternError::MalformedParameter`] for an unterminated, unnamed or
	///   unknown-modifier capture
	/// - [`PatternError::Regex`] if the compiled expression is rejected
	pub fn new(pattern: &str) -> Result<Self, PatternError> {
		if pattern.len() > MAX_PATTERN_BYTES {
			return Err(PatternError::TooLong {
				length: pattern.len(),
				max: MAX_PATTERN_BYTES,
			});
		}

		let segments = pattern.split('/').count();
		if segments > MAX_SEGMENTS {
			return Err(PatternError::TooManySegments {
				count: segments,
				max: MAX_SEGMENTS,
			});
		}

		let (expression, param_names) = compile(pattern)?;
		let regex = regex::RegexBuilder::new(&expression)
			.size_limit(MAX_COMPILED_SIZE)
			.build()
			.map_err(|e| PatternError::Regex(e.to_string()))?;

		Ok(Self {
			source: pattern.to_string(),
			regex,
			param_names,
		})
	}

	/// Returns the pattern source.
	pub fn pattern(&self) -> &str {
		&self.source
	}

	/// Returns capture names in pattern order.
	pub fn param_names(&self) -> &[String] {
		&self.param_names
	}

	/// Matches `path`, returning the percent-decoded captures in pattern order.
	pub fn matches(&self, path: &str) -> Option<RouteParams> {
		let caps = self.regex.captures(path)?;
		let mut params = RouteParams::new();
		for name in &self.param_names {
			if let Some(m) = caps.name(name) {
				params.insert(name.clone(), m.as_str());
			}
		}
		Some(params)
	}

	/// Builds a path by substituting `params` into the pattern.
	///
	/// Returns `None` if a capture has no value.
	pub fn reverse(&self, params: &HashMap<String, String>) -> Option<String> {
		let mut path = self.source.clone();
		for name in &self.param_names {
			let value = params.get(name)?;
			let placeholder = [
				format!("{{{name}}}"),
				format!("{{{name}:*}}"),
				format!(":{name}"),
			]
			.into_iter()
			.find(|p| path.contains(p.as_str()))?;
			path = path.replacen(&placeholder, value, 1);
		}
		Some(path)
	}

	/// Returns whether `path` matches.
	pub fn is_match(&self, path: &str) -> bool {
		self.regex.is_match(path)
	}

	/// Returns whether the pattern has no captures.
	pub fn is_exact(&self) -> bool {
		self.param_names.is_empty()
	}
}

/// Translates a pattern into an anchored expression plus its capture names.
fn compile(pattern: &str) -> Result<(String, Vec<String>), PatternError> {
	let malformed = || PatternError::MalformedParameter(pattern.to_string());
	let mut expression = String::from("^");
	let mut literal = String::new();
	let mut names = Vec::new();
	let mut chars = pattern.chars().peekable();

	while let Some(c) = chars.next() {
		let capture = match c {
			'{' => {
				let mut body = String::new();
				let mut closed = false;
				for next in chars.by_ref() {
					if next == '}' {
						closed = true;
						break;
					}
					body.push(next);
				}
				if !closed {
					return Err(malformed());
				}
				match body.split_once(':') {
					Some((name, "*")) => (name.to_string(), true),
					Some(_) => return Err(malformed()),
					None => (body.clone(), false),
				}
			}
			':' => {
				let mut name = String::new();
				while let Some(&next) = chars.peek() {
					if !(next.is_ascii_alphanumeric() || next == '_') {
						break;
					}
					name.push(next);
					chars.next();
				}
				(name, false)
			}
			_ => {
				literal.push(c);
				continue;
			}
		};

		let (name, rest_of_path) = capture;
		if name.is_empty() {
			return Err(malformed());
		}
		expression.push_str(&regex::escape(&literal));
		literal.clear();
		let class = if rest_of_path { ".*" } else { "[^/]+" };
		expression.push_str(&format!("(?P<{name}>{class})"));
		names.push(name);
	}

	expression.push_str(&regex::escape(&literal));
	expression.push('$');
	Ok((expression, names))
}

impl PartialEq for ClientPathPattern {
	fn eq(&self, other: &Self) -> bool {
		self.source == other.source
	}
}

impl Eq for ClientPathPattern {}

impl std::fmt::Display for ClientPathPattern {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.write_str(&self.source)
	}
}

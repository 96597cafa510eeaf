//! History bridge.
//!
//! The controller talks to the host's session history through the
//! [`HistoryBridge`] trait. Every entry the controller creates carries a
//! [`HistoryState`], whose `index` is the entry's position in the stack and
//! the single source of truth for computing how far to step back when a
//! popstate has to be undone.
//!
//! Two bridges are provided:
//!
//! - [`MemoryHistory`]: an in-process linear stack, used natively and in tests
//! - `BrowserHistory`: `window.history` bindings (WASM only)

mod memory;

#[cfg(target_arch = "wasm32")]
pub(crate) mod browser;

pub use memory::{MemoryEntry, MemoryHistory, PopStateEvent};

#[cfg(target_arch = "wasm32")]
pub use browser::BrowserHistory;

use crate::error::HistoryError;
use serde::{Deserialize, Serialize};

/// State attached to every history entry the controller creates.
///
/// Serialized as `{ "scrollY": <f64>, "index": <u64> }`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryState {
	/// Vertical scroll offset last recorded for this entry.
	pub scroll_y: f64,
	/// Position of this entry in the history stack.
	///
	/// Position-based: an index freed by going back and pushing is reused.
	pub index: u64,
}

impl HistoryState {
	/// Creates a new history state.
	pub fn new(scroll_y: f64, index: u64) -> Self {
		Self { scroll_y, index }
	}

	/// Returns a copy with a different scroll offset and the same index.
	pub fn with_scroll(self, scroll_y: f64) -> Self {
		Self { scroll_y, ..self }
	}

	/// Serializes to the JSON shape stored in the host.
	pub fn to_json(&self) -> Result<String, HistoryError> {
		serde_json::to_string(self).map_err(|e| HistoryError::InvalidState(e.to_string()))
	}

	/// Parses host state. Returns `Ok(None)` for `null` or for state that
	/// was not written by this controller.
	pub fn from_json(json: &str) -> Result<Option<Self>, HistoryError> {
		let value: serde_json::Value =
			serde_json::from_str(json).map_err(|e| HistoryError::InvalidState(e.to_string()))?;
		if value.is_null() {
			return Ok(None);
		}
		Ok(serde_json::from_value(value).ok())
	}
}

/// Minimal push/replace/read contract over the host's session history.
///
/// Methods take `&self`; implementations use interior mutability since the
/// bridge is shared between the controller and the embedding.
pub trait HistoryBridge {
	/// Pushes a new entry, dropping all forward entries.
	fn push_state(&self, state: &HistoryState, url: &str) -> Result<(), HistoryError>;

	/// Replaces the current entry's state, and its URL if `url` is given.
	fn replace_state(&self, state: &HistoryState, url: Option<&str>) -> Result<(), HistoryError>;

	/// Replaces the current entry's URL, leaving its state untouched.
	fn replace_url(&self, url: &str) -> Result<(), HistoryError>;

	/// Returns the current entry's state, if it carries controller state.
	fn state(&self) -> Option<HistoryState>;

	/// Moves the history pointer by `delta` entries.
	///
	/// The host announces the move with a popstate event; it is never
	/// reported synchronously through the return value.
	fn go(&self, delta: i64) -> Result<(), HistoryError>;

	/// Returns the current entry's URL.
	fn location(&self) -> String;

	/// Returns the number of entries in the stack.
	fn len(&self) -> usize;

	/// Returns whether the stack is empty.
	fn is_empty(&self) -> bool {
		self.len() == 0
	}

	/// Disables the host's automatic scroll restoration.
	fn set_manual_scroll_restoration(&self) -> Result<(), HistoryError> {
		Ok(())
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	#[rstest]
	fn test_state_json_shape() {
		let state = HistoryState::new(120.5, 3);

		let json = state.to_json().unwrap();

		assert_eq!(json, r#"{"scrollY":120.5,"index":3}"#);
	}

	#[rstest]
	#[case("null", None)]
	#[case(r#"{"scrollY":10.0,"index":2}"#, Some(HistoryState::new(10.0, 2)))]
	#[case(r#"{"foreign":"state"}"#, None)]
	fn test_state_from_json(#[case] json: &str, #[case] expected: Option<HistoryState>) {
		assert_eq!(HistoryState::from_json(json).unwrap(), expected);
	}

	#[rstest]
	fn test_state_from_invalid_json() {
		assert!(matches!(
			HistoryState::from_json("{"),
			Err(HistoryError::InvalidState(_))
		));
	}

	#[rstest]
	fn test_with_scroll_keeps_index() {
		let state = HistoryState::new(0.0, 7).with_scroll(300.0);

		assert_eq!(state, HistoryState::new(300.0, 7));
	}
}

//! `window.history` bindings.

use super::{HistoryBridge, HistoryState};
use crate::error::HistoryError;
use wasm_bindgen::JsValue;
use web_sys::{History, ScrollRestoration, Window};

fn host_error(operation: &'static str, err: JsValue) -> HistoryError {
	HistoryError::Host {
		operation,
		message: err.as_string().unwrap_or_else(|| format!("{:?}", err)),
	}
}

/// Converts a JS history state value into controller state.
///
/// Anything that is not controller state (including `null`) maps to `None`.
pub(crate) fn state_from_js(value: &JsValue) -> Option<HistoryState> {
	if value.is_null() || value.is_undefined() {
		return None;
	}
	let json = String::from(js_sys::JSON::stringify(value).ok()?);
	HistoryState::from_json(&json).ok().flatten()
}

fn state_to_js(state: &HistoryState) -> Result<JsValue, HistoryError> {
	let json = state.to_json()?;
	js_sys::JSON::parse(&json).map_err(|e| host_error("JSON.parse", e))
}

/// [`HistoryBridge`] backed by the browser's session history.
#[derive(Debug, Clone)]
pub struct BrowserHistory {
	window: Window,
	history: History,
}

impl BrowserHistory {
	/// Binds to the global window.
	pub fn new() -> Result<Self, HistoryError> {
		let window = web_sys::window().ok_or(HistoryError::NoWindow)?;
		let history = window.history().map_err(|e| host_error("history", e))?;
		Ok(Self { window, history })
	}

	/// Returns the bound window.
	pub fn window(&self) -> &Window {
		&self.window
	}
}

impl HistoryBridge for BrowserHistory {
	fn push_state(&self, state: &HistoryState, url: &str) -> Result<(), HistoryError> {
		let value = state_to_js(state)?;
		self.history
			.push_state_with_url(&value, "", Some(url))
			.map_err(|e| host_error("pushState", e))
	}

	fn replace_state(&self, state: &HistoryState, url: Option<&str>) -> Result<(), HistoryError> {
		let value = state_to_js(state)?;
		self.history
			.replace_state_with_url(&value, "", url)
			.map_err(|e| host_error("replaceState", e))
	}

	fn replace_url(&self, url: &str) -> Result<(), HistoryError> {
		let current = self.history.state().map_err(|e| host_error("state", e))?;
		self.history
			.replace_state_with_url(&current, "", Some(url))
			.map_err(|e| host_error("replaceState", e))
	}

	fn state(&self) -> Option<HistoryState> {
		self.history.state().ok().and_then(|v| state_from_js(&v))
	}

	fn go(&self, delta: i64) -> Result<(), HistoryError> {
		let delta = i32::try_from(delta).map_err(|_| HistoryError::Host {
			operation: "go",
			message: format!("delta {} out of range", delta),
		})?;
		self.history
			.go_with_delta(delta)
			.map_err(|e| host_error("go", e))
	}

	fn location(&self) -> String {
		let location = self.window.location();
		let mut href = location.pathname().unwrap_or_else(|_| "/".to_string());
		href.push_str(&location.search().unwrap_or_default());
		href.push_str(&location.hash().unwrap_or_default());
		href
	}

	fn len(&self) -> usize {
		self.history.length().map(|n| n as usize).unwrap_or(0)
	}

	fn set_manual_scroll_restoration(&self) -> Result<(), HistoryError> {
		self.history
			.set_scroll_restoration(ScrollRestoration::Manual)
			.map_err(|e| host_error("scrollRestoration", e))
	}
}

//! Error types for the navigation controller.

use thiserror::Error;
use wayfinder_urls::UrlError;

/// Error raised by a [`HistoryBridge`](crate::history::HistoryBridge) host.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HistoryError {
	/// The host rejected a history operation.
	#[error("History operation '{operation}' failed: {message}")]
	Host {
		/// The operation that failed (`pushState`, `go`, ...).
		operation: &'static str,
		/// Host-provided message.
		message: String,
	},
	/// Entry state could not be (de)serialized.
	#[error("Invalid history state: {0}")]
	InvalidState(String),
	/// No browser window is available.
	#[error("No window object available")]
	NoWindow,
}

/// Error type for navigation operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NavigationError {
	/// The target could not be resolved against the base origin.
	#[error(transparent)]
	Url(#[from] UrlError),
	/// The history host failed.
	#[error(transparent)]
	History(#[from] HistoryError),
	/// The target is on another origin and cannot be pushed.
	#[error("Cannot navigate to foreign location: {0}")]
	ForeignTarget(String),
	/// Too many navigations were requested while one was in flight.
	#[error("Navigation queue is full ({0} pending)")]
	QueueFull(usize),
}

/// Error type for loading [`NavigatorSettings`](crate::settings::NavigatorSettings).
#[derive(Debug, Error)]
pub enum SettingsError {
	/// The TOML document could not be parsed.
	#[error("Failed to parse navigator settings: {0}")]
	Parse(#[from] toml::de::Error),
	/// The configured base origin is invalid.
	#[error(transparent)]
	Url(#[from] UrlError),
}

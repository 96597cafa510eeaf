//! Navigator settings.
//!
//! Settings can be built in code or loaded from a TOML document:
//!
//! ```toml
//! base_origin = "https://videos.example.org/"
//! manual_scroll_restoration = true
//! restore_scroll = true
//! max_queued_navigations = 16
//! ```

use crate::error::SettingsError;
use serde::Deserialize;
use wayfinder_urls::BaseOrigin;

/// Configuration for a [`Navigator`](crate::Navigator).
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct NavigatorSettings {
	/// Origin all navigation targets are resolved against.
	pub base_origin: String,
	/// Whether to switch the host's scroll restoration to manual at startup.
	pub manual_scroll_restoration: bool,
	/// Whether back/forward navigations restore the recorded scroll offset.
	pub restore_scroll: bool,
	/// Maximum navigations queued by listeners while one is in flight.
	pub max_queued_navigations: usize,
}

impl Default for NavigatorSettings {
	fn default() -> Self {
		Self {
			base_origin: "http://localhost/".to_string(),
			manual_scroll_restoration: true,
			restore_scroll: true,
			max_queued_navigations: 16,
		}
	}
}

impl NavigatorSettings {
	/// Creates default settings for `base_origin`.
	pub fn new(base_origin: impl Into<String>) -> Self {
		Self {
			base_origin: base_origin.into(),
			..Self::default()
		}
	}

	/// Parses settings from TOML. Missing keys take their defaults.
	pub fn from_toml_str(source: &str) -> Result<Self, SettingsError> {
		let settings: Self = toml::from_str(source)?;
		settings.base()?;
		Ok(settings)
	}

	/// Sets whether scroll restoration is switched to manual.
	pub fn with_manual_scroll_restoration(mut self, manual: bool) -> Self {
		self.manual_scroll_restoration = manual;
		self
	}

	/// Sets whether back/forward navigations restore scroll offsets.
	pub fn with_restore_scroll(mut self, restore: bool) -> Self {
		self.restore_scroll = restore;
		self
	}

	/// Sets the navigation queue limit.
	pub fn with_max_queued_navigations(mut self, max: usize) -> Self {
		self.max_queued_navigations = max;
		self
	}

	/// Parses the configured base origin.
	pub fn base(&self) -> Result<BaseOrigin, wayfinder_urls::UrlError> {
		BaseOrigin::parse(&self.base_origin)
	}
}

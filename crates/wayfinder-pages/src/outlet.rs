//! Rendering-side view of the active route.

use crate::controller::Navigator;
use crate::scroll::Viewport;
use std::cell::Cell;

/// Renders whatever route is active and restores its scroll offset once the
/// content has been mounted.
///
/// The outlet tracks the key of the last activation it mounted, so calling
/// [`mounted`](Self::mounted) again for the same activation (a re-render of
/// the same route) never scrolls a second time.
pub struct RouterOutlet<C> {
	navigator: Navigator<C>,
	mounted_key: Cell<Option<u64>>,
}

impl<C: 'static> RouterOutlet<C> {
	/// Creates an outlet for `navigator`.
	pub fn new(navigator: Navigator<C>) -> Self {
		Self {
			navigator,
			mounted_key: Cell::new(None),
		}
	}

	/// Renders the active route.
	pub fn render(&self) -> C {
		self.navigator.active().render()
	}

	/// Returns the key of the active activation.
	pub fn key(&self) -> u64 {
		self.navigator.active().key()
	}

	/// Returns whether the active activation has not been mounted yet.
	pub fn needs_mount(&self) -> bool {
		self.mounted_key.get() != Some(self.key())
	}

	/// Reports that the active route's content is in the viewport.
	///
	/// Returns the offset that was applied, if any.
	pub fn mounted(&self, viewport: &dyn Viewport) -> Option<f64> {
		let key = self.key();
		if self.mounted_key.replace(Some(key)) == Some(key) {
			return None;
		}
		let applied = self.navigator.restore_scroll(viewport);
		tracing::trace!(key, offset = ?applied, "route mounted");
		applied
	}

	/// Returns the navigator this outlet renders.
	pub fn navigator(&self) -> &Navigator<C> {
		&self.navigator
	}
}

impl<C> std::fmt::Debug for RouterOutlet<C> {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("RouterOutlet")
			.field("mounted_key", &self.mounted_key.get())
			.finish_non_exhaustive()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::history::{HistoryBridge, HistoryState, MemoryHistory};
	use crate::settings::NavigatorSettings;
	use rstest::rstest;
	use std::cell::RefCell;
	use std::rc::Rc;
	use wayfinder_urls::{Location, MatchedRoute, RouteTable};

	#[derive(Default)]
	struct RecordingViewport {
		scrolls: RefCell<Vec<f64>>,
	}

	impl Viewport for RecordingViewport {
		fn scroll_y(&self) -> f64 {
			self.scrolls.borrow().last().copied().unwrap_or(0.0)
		}

		fn scroll_to(&self, y: f64) {
			self.scrolls.borrow_mut().push(y);
		}
	}

	fn outlet(history: Rc<MemoryHistory>) -> RouterOutlet<String> {
		let table = RouteTable::builder()
			.fallback(|location: &Location| {
				let path = location.path().to_string();
				MatchedRoute::new(move || path.clone())
			})
			.build()
			.unwrap();
		let navigator =
			Navigator::new(table, history, NavigatorSettings::new("https://app.test")).unwrap();
		RouterOutlet::new(navigator)
	}

	#[rstest]
	fn test_mount_restores_once_per_activation() {
		// Arrange
		let history = Rc::new(MemoryHistory::with_state("/a", HistoryState::new(75.0, 0)));
		let outlet = outlet(history);
		let viewport = RecordingViewport::default();

		// Act
		let first = outlet.mounted(&viewport);
		let second = outlet.mounted(&viewport);

		// Assert
		assert_eq!(first, Some(75.0));
		assert_eq!(second, None);
		assert_eq!(*viewport.scrolls.borrow(), vec![75.0]);
		assert!(!outlet.needs_mount());
	}

	#[rstest]
	fn test_new_activation_needs_mount() {
		// Arrange
		let history = Rc::new(MemoryHistory::new("/a"));
		let outlet = outlet(history.clone());
		let viewport = RecordingViewport::default();
		assert_eq!(outlet.mounted(&viewport), None);

		// Act
		outlet.navigator().goto("/b").unwrap();

		// Assert
		assert!(outlet.needs_mount());
		assert_eq!(outlet.render(), "/b");
		assert_eq!(outlet.mounted(&viewport), Some(0.0));
		assert_eq!(history.state(), Some(HistoryState::new(0.0, 1)));
	}
}

//! Scroll persistence and restoration.
//!
//! The live scroll offset is written into the current history entry on every
//! scroll event (replacing, never pushing, and keeping the entry's `index`).
//! When a route is activated with an initial scroll offset, that offset is
//! held until the rendering layer reports the content as mounted.

use crate::error::HistoryError;
use crate::history::HistoryBridge;
use std::cell::Cell;

/// The scrollable surface the rendering layer mounts route content into.
pub trait Viewport {
	/// Returns the current vertical offset.
	fn scroll_y(&self) -> f64;

	/// Scrolls to a vertical offset.
	fn scroll_to(&self, y: f64);
}

/// Tracks scroll offsets per history entry.
#[derive(Debug, Default)]
pub struct ScrollTracker {
	/// Offset last written into the current entry, `None` after an entry change.
	last_written: Cell<Option<f64>>,
	/// Latest live offset reported by the host.
	live: Cell<f64>,
	/// Offset to apply once the active route is mounted.
	pending_restore: Cell<Option<f64>>,
}

impl ScrollTracker {
	/// Creates a tracker with nothing recorded.
	pub fn new() -> Self {
		Self::default()
	}

	/// Records a scroll offset into the current history entry.
	///
	/// Returns `Ok(true)` if the entry was written. Repeated identical
	/// offsets and entries without controller state are skipped.
	pub fn record(&self, history: &dyn HistoryBridge, offset: f64) -> Result<bool, HistoryError> {
		self.live.set(offset);
		if self.last_written.get() == Some(offset) {
			return Ok(false);
		}

		let Some(state) = history.state() else {
			tracing::trace!(offset, "current entry has no state, scroll not recorded");
			return Ok(false);
		};

		history.replace_state(&state.with_scroll(offset), None)?;
		self.last_written.set(Some(offset));
		tracing::trace!(offset, index = state.index, "scroll recorded");
		Ok(true)
	}

	/// Forgets the write cache after the current entry changed.
	pub fn entry_changed(&self) {
		self.last_written.set(None);
	}

	/// Returns the latest live offset reported through [`record`](Self::record).
	pub fn live_offset(&self) -> f64 {
		self.live.get()
	}

	/// Holds `initial_scroll` until the next [`take_pending`](Self::take_pending).
	pub fn arm(&self, initial_scroll: Option<f64>) {
		self.pending_restore.set(initial_scroll);
	}

	/// Takes the offset to restore, at most once per activation.
	pub fn take_pending(&self) -> Option<f64> {
		self.pending_restore.take()
	}

	/// Applies the pending offset to `viewport`.
	///
	/// Returns the applied offset, or `None` if nothing was pending.
	pub fn restore(&self, viewport: &dyn Viewport) -> Option<f64> {
		let y = self.take_pending()?;
		viewport.scroll_to(y);
		self.live.set(y);
		Some(y)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::history::{HistoryState, MemoryHistory};
	use rstest::rstest;

	#[derive(Default)]
	struct RecordingViewport {
		y: Cell<f64>,
		calls: Cell<u32>,
	}

	impl Viewport for RecordingViewport {
		fn scroll_y(&self) -> f64 {
			self.y.get()
		}

		fn scroll_to(&self, y: f64) {
			self.y.set(y);
			self.calls.set(self.calls.get() + 1);
		}
	}

	#[rstest]
	fn test_record_replaces_scroll_keeping_index() {
		// Arrange
		let history = MemoryHistory::with_state("/", HistoryState::new(0.0, 4));
		let tracker = ScrollTracker::new();

		// Act
		let written = tracker.record(&history, 250.0).unwrap();

		// Assert
		assert!(written);
		assert_eq!(history.state(), Some(HistoryState::new(250.0, 4)));
		assert_eq!(history.len(), 1);
	}

	#[rstest]
	fn test_record_skips_unchanged_offset() {
		let history = MemoryHistory::with_state("/", HistoryState::new(0.0, 0));
		let tracker = ScrollTracker::new();

		assert!(tracker.record(&history, 10.0).unwrap());
		assert!(!tracker.record(&history, 10.0).unwrap());
		assert!(tracker.record(&history, 11.0).unwrap());
	}

	#[rstest]
	fn test_record_rewrites_after_entry_change() {
		let history = MemoryHistory::with_state("/", HistoryState::new(0.0, 0));
		let tracker = ScrollTracker::new();
		tracker.record(&history, 10.0).unwrap();
		history.push_state(&HistoryState::new(0.0, 1), "/a").unwrap();

		tracker.entry_changed();

		assert!(tracker.record(&history, 10.0).unwrap());
		assert_eq!(history.state(), Some(HistoryState::new(10.0, 1)));
	}

	#[rstest]
	fn test_record_skips_stateless_entry() {
		let history = MemoryHistory::new("/");
		let tracker = ScrollTracker::new();

		assert!(!tracker.record(&history, 10.0).unwrap());
		assert_eq!(history.state(), None);
		assert_eq!(tracker.live_offset(), 10.0);
	}

	#[rstest]
	fn test_restore_applies_once() {
		let tracker = ScrollTracker::new();
		let viewport = RecordingViewport::default();
		tracker.arm(Some(480.0));

		assert_eq!(tracker.restore(&viewport), Some(480.0));
		assert_eq!(tracker.restore(&viewport), None);
		assert_eq!(viewport.scroll_y(), 480.0);
		assert_eq!(viewport.calls.get(), 1);
	}

	#[rstest]
	fn test_restore_nothing_armed() {
		let tracker = ScrollTracker::new();
		let viewport = RecordingViewport::default();
		tracker.arm(None);

		assert_eq!(tracker.restore(&viewport), None);
		assert_eq!(viewport.calls.get(), 0);
	}
}

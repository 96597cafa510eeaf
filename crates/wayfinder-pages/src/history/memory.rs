//! In-memory history stack.

use super::{HistoryBridge, HistoryState};
use crate::error::HistoryError;
use std::cell::{Cell, RefCell};
use std::collections::VecDeque;

/// A single entry of a [`MemoryHistory`].
#[derive(Debug, Clone, PartialEq)]
pub struct MemoryEntry {
	/// The entry's URL.
	pub url: String,
	/// Controller state, absent for entries created by someone else.
	pub state: Option<HistoryState>,
}

/// A popstate notification produced by [`MemoryHistory::go`].
#[derive(Debug, Clone, PartialEq)]
pub struct PopStateEvent {
	/// State of the entry the pointer arrived at.
	pub state: Option<HistoryState>,
	/// URL of the entry the pointer arrived at.
	pub url: String,
}

#[derive(Debug)]
struct Stack {
	entries: Vec<MemoryEntry>,
	position: usize,
}

/// Linear history stack with back/forward, kept in process memory.
///
/// Pointer moves queue a [`PopStateEvent`] instead of calling back into the
/// controller, mirroring the host's asynchronous popstate delivery. The
/// embedding drains them with [`take_popstate`](Self::take_popstate).
#[derive(Debug)]
pub struct MemoryHistory {
	stack: RefCell<Stack>,
	popstates: RefCell<VecDeque<PopStateEvent>>,
	manual_scroll_restoration: Cell<bool>,
}

impl MemoryHistory {
	/// Creates a history with a single, stateless entry.
	pub fn new(initial_url: impl Into<String>) -> Self {
		Self::from_entry(MemoryEntry {
			url: initial_url.into(),
			state: None,
		})
	}

	/// Creates a history whose single entry already carries state, as after
	/// a page reload.
	pub fn with_state(initial_url: impl Into<String>, state: HistoryState) -> Self {
		Self::from_entry(MemoryEntry {
			url: initial_url.into(),
			state: Some(state),
		})
	}

	fn from_entry(entry: MemoryEntry) -> Self {
		Self {
			stack: RefCell::new(Stack {
				entries: vec![entry],
				position: 0,
			}),
			popstates: RefCell::new(VecDeque::new()),
			manual_scroll_restoration: Cell::new(false),
		}
	}

	/// Simulates the browser's back button.
	pub fn back(&self) {
		self.step(-1);
	}

	/// Simulates the browser's forward button.
	pub fn forward(&self) {
		self.step(1);
	}

	/// Pushes an entry without controller state, like a navigation made by
	/// another script or a full page load of a foreign document.
	pub fn push_foreign(&self, url: impl Into<String>) {
		self.push(MemoryEntry {
			url: url.into(),
			state: None,
		});
	}

	/// Takes the oldest undelivered popstate event.
	pub fn take_popstate(&self) -> Option<PopStateEvent> {
		self.popstates.borrow_mut().pop_front()
	}

	/// Returns the number of undelivered popstate events.
	pub fn pending_popstates(&self) -> usize {
		self.popstates.borrow().len()
	}

	/// Returns the pointer's position in the stack.
	pub fn position(&self) -> usize {
		self.stack.borrow().position
	}

	/// Returns a copy of all entries.
	pub fn entries(&self) -> Vec<MemoryEntry> {
		self.stack.borrow().entries.clone()
	}

	/// Returns the current entry.
	pub fn current(&self) -> MemoryEntry {
		let stack = self.stack.borrow();
		stack.entries[stack.position].clone()
	}

	/// Returns whether manual scroll restoration was requested.
	pub fn is_manual_scroll_restoration(&self) -> bool {
		self.manual_scroll_restoration.get()
	}

	fn push(&self, entry: MemoryEntry) {
		let mut stack = self.stack.borrow_mut();
		let keep = stack.position + 1;
		stack.entries.truncate(keep);
		stack.entries.push(entry);
		stack.position = keep;
	}

	/// Moves the pointer and queues a popstate. Out-of-range moves and
	/// `delta == 0` do nothing.
	fn step(&self, delta: i64) {
		let mut stack = self.stack.borrow_mut();
		let target = stack.position as i64 + delta;
		if delta == 0 || target < 0 || target >= stack.entries.len() as i64 {
			return;
		}

		stack.position = target as usize;
		let entry = &stack.entries[stack.position];
		self.popstates.borrow_mut().push_back(PopStateEvent {
			state: entry.state,
			url: entry.url.clone(),
		});
	}
}

impl HistoryBridge for MemoryHistory {
	fn push_state(&self, state: &HistoryState, url: &str) -> Result<(), HistoryError> {
		self.push(MemoryEntry {
			url: url.to_string(),
			state: Some(*state),
		});
		Ok(())
	}

	fn replace_state(&self, state: &HistoryState, url: Option<&str>) -> Result<(), HistoryError> {
		let mut stack = self.stack.borrow_mut();
		let position = stack.position;
		let entry = &mut stack.entries[position];
		entry.state = Some(*state);
		if let Some(url) = url {
			entry.url = url.to_string();
		}
		Ok(())
	}

	fn replace_url(&self, url: &str) -> Result<(), HistoryError> {
		let mut stack = self.stack.borrow_mut();
		let position = stack.position;
		stack.entries[position].url = url.to_string();
		Ok(())
	}

	fn state(&self) -> Option<HistoryState> {
		let stack = self.stack.borrow();
		stack.entries[stack.position].state
	}

	fn go(&self, delta: i64) -> Result<(), HistoryError> {
		self.step(delta);
		Ok(())
	}

	fn location(&self) -> String {
		let stack = self.stack.borrow();
		stack.entries[stack.position].url.clone()
	}

	fn len(&self) -> usize {
		self.stack.borrow().entries.len()
	}

	fn set_manual_scroll_restoration(&self) -> Result<(), HistoryError> {
		self.manual_scroll_restoration.set(true);
		Ok(())
	}
}

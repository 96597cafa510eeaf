//! Navigation listeners.
//!
//! Two registries hang off every navigator:
//!
//! - before-nav guards, which see every navigation attempt and may veto it
//!   by returning [`GuardDecision::Cancel`]
//! - at-nav observers, which run after a navigation has been committed
//!
//! Both keep registration order. Invocation works on a snapshot, so a
//! listener may add or remove listeners (including itself) while running.

use std::cell::{Cell, RefCell};
use std::marker::PhantomData;
use std::rc::{Rc, Weak};
use wayfinder_urls::Location;

/// Where a navigation attempt came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavigationOrigin {
	/// A call to `goto` (or an intercepted link click).
	Goto,
	/// The browser moved the history pointer (back/forward).
	PopState,
}

/// A pending navigation, as seen by before-nav guards.
#[derive(Debug, Clone)]
pub struct NavigationAttempt {
	/// The resolved destination.
	pub target: Location,
	/// What triggered the attempt.
	pub origin: NavigationOrigin,
}

/// A guard's verdict on a navigation attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GuardDecision {
	/// Let the navigation continue.
	#[default]
	Proceed,
	/// Abort the navigation.
	Cancel,
}

impl GuardDecision {
	/// Returns whether this decision cancels the navigation.
	pub fn is_cancel(self) -> bool {
		self == Self::Cancel
	}
}

/// Before-nav guard signature.
pub type BeforeNav = dyn Fn(&NavigationAttempt) -> GuardDecision;

/// At-nav observer signature.
pub type AtNav = dyn Fn();

/// Handle returned when registering a listener.
///
/// The type parameter ties the handle to the registry kind it came from, so
/// a guard handle cannot be used to remove an observer.
pub struct ListenerHandle<F: ?Sized> {
	id: u64,
	_marker: PhantomData<fn(&F)>,
}

impl<F: ?Sized> ListenerHandle<F> {
	fn new(id: u64) -> Self {
		Self {
			id,
			_marker: PhantomData,
		}
	}
}

impl<F: ?Sized> Clone for ListenerHandle<F> {
	fn clone(&self) -> Self {
		*self
	}
}

impl<F: ?Sized> Copy for ListenerHandle<F> {}

impl<F: ?Sized> PartialEq for ListenerHandle<F> {
	fn eq(&self, other: &Self) -> bool {
		self.id == other.id
	}
}

impl<F: ?Sized> Eq for ListenerHandle<F> {}

impl<F: ?Sized> std::fmt::Debug for ListenerHandle<F> {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_tuple("ListenerHandle").field(&self.id).finish()
	}
}

/// Ordered collection of callbacks.
pub struct ListenerRegistry<F: ?Sized> {
	next_id: Cell<u64>,
	entries: RefCell<Vec<(u64, Rc<F>)>>,
}

impl<F: ?Sized> Default for ListenerRegistry<F> {
	fn default() -> Self {
		Self {
			next_id: Cell::new(0),
			entries: RefCell::new(Vec::new()),
		}
	}
}

impl<F: ?Sized> ListenerRegistry<F> {
	/// Creates an empty registry.
	pub fn new() -> Self {
		Self::default()
	}

	/// Appends a listener.
	pub fn add(&self, listener: Rc<F>) -> ListenerHandle<F> {
		let id = self.next_id.get();
		self.next_id.set(id + 1);
		self.entries.borrow_mut().push((id, listener));
		ListenerHandle::new(id)
	}

	/// Removes a listener. Returns `false` if it was already gone.
	pub fn remove(&self, handle: ListenerHandle<F>) -> bool {
		let mut entries = self.entries.borrow_mut();
		match entries.iter().position(|(id, _)| *id == handle.id) {
			Some(pos) => {
				entries.remove(pos);
				true
			}
			None => false,
		}
	}

	/// Returns the listeners in registration order.
	pub fn snapshot(&self) -> Vec<Rc<F>> {
		self.entries
			.borrow()
			.iter()
			.map(|(_, listener)| Rc::clone(listener))
			.collect()
	}

	/// Returns the number of registered listeners.
	pub fn len(&self) -> usize {
		self.entries.borrow().len()
	}

	/// Returns whether no listeners are registered.
	pub fn is_empty(&self) -> bool {
		self.entries.borrow().is_empty()
	}
}

impl ListenerRegistry<BeforeNav> {
	/// Runs every guard in order and combines their verdicts.
	///
	/// All guards run, even after one has cancelled.
	pub fn decide(&self, attempt: &NavigationAttempt) -> GuardDecision {
		let mut decision = GuardDecision::Proceed;
		for guard in self.snapshot() {
			if guard(attempt).is_cancel() {
				decision = GuardDecision::Cancel;
			}
		}
		decision
	}
}

impl ListenerRegistry<AtNav> {
	/// Notifies every observer in order.
	pub fn notify(&self) {
		for observer in self.snapshot() {
			observer();
		}
	}
}

impl<F: ?Sized> std::fmt::Debug for ListenerRegistry<F> {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("ListenerRegistry")
			.field("len", &self.len())
			.finish()
	}
}

/// Removes its listener when dropped.
#[must_use = "dropping the guard removes the listener immediately"]
pub struct ListenerGuard<F: ?Sized> {
	registry: Weak<ListenerRegistry<F>>,
	handle: ListenerHandle<F>,
}

impl<F: ?Sized> ListenerGuard<F> {
	pub(crate) fn new(registry: &Rc<ListenerRegistry<F>>, handle: ListenerHandle<F>) -> Self {
		Self {
			registry: Rc::downgrade(registry),
			handle,
		}
	}

	/// Returns the underlying handle.
	pub fn handle(&self) -> ListenerHandle<F> {
		self.handle
	}

	/// Keeps the listener registered for the registry's lifetime.
	pub fn forget(self) {
		std::mem::forget(self);
	}
}

impl<F: ?Sized> Drop for ListenerGuard<F> {
	fn drop(&mut self) {
		if let Some(registry) = self.registry.upgrade() {
			registry.remove(self.handle);
		}
	}
}

impl<F: ?Sized> std::fmt::Debug for ListenerGuard<F> {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("ListenerGuard")
			.field("handle", &self.handle)
			.finish()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;
	use wayfinder_urls::BaseOrigin;

	fn attempt() -> NavigationAttempt {
		NavigationAttempt {
			target: BaseOrigin::parse("http://localhost/")
				.unwrap()
				.resolve("/v/1")
				.unwrap(),
			origin: NavigationOrigin::Goto,
		}
	}

	#[rstest]
	fn test_observers_run_in_registration_order() {
		// Arrange
		let registry: ListenerRegistry<AtNav> = ListenerRegistry::new();
		let log = Rc::new(RefCell::new(Vec::new()));
		for label in ["first", "second", "third"] {
			let log = Rc::clone(&log);
			registry.add(Rc::new(move || log.borrow_mut().push(label)));
		}

		// Act
		registry.notify();

		// Assert
		assert_eq!(*log.borrow(), vec!["first", "second", "third"]);
	}

	#[rstest]
	fn test_all_guards_run_after_cancel() {
		// Arrange
		let registry: ListenerRegistry<BeforeNav> = ListenerRegistry::new();
		let calls = Rc::new(Cell::new(0));
		{
			let calls = Rc::clone(&calls);
			registry.add(Rc::new(move |_: &NavigationAttempt| {
				calls.set(calls.get() + 1);
				GuardDecision::Cancel
			}));
		}
		{
			let calls = Rc::clone(&calls);
			registry.add(Rc::new(move |_: &NavigationAttempt| {
				calls.set(calls.get() + 1);
				GuardDecision::Proceed
			}));
		}

		// Act
		let decision = registry.decide(&attempt());

		// Assert
		assert_eq!(decision, GuardDecision::Cancel);
		assert_eq!(calls.get(), 2);
	}

	#[rstest]
	fn test_no_guards_proceeds() {
		let registry: ListenerRegistry<BeforeNav> = ListenerRegistry::new();

		assert_eq!(registry.decide(&attempt()), GuardDecision::Proceed);
	}

	#[rstest]
	fn test_remove_is_idempotent() {
		let registry: ListenerRegistry<AtNav> = ListenerRegistry::new();
		let handle = registry.add(Rc::new(|| {}));

		assert!(registry.remove(handle));
		assert!(!registry.remove(handle));
		assert!(registry.is_empty());
	}

	#[rstest]
	fn test_listener_can_remove_itself_while_running() {
		// Arrange
		let registry: Rc<ListenerRegistry<AtNav>> = Rc::new(ListenerRegistry::new());
		let own_handle: Rc<Cell<Option<ListenerHandle<AtNav>>>> = Rc::new(Cell::new(None));
		let calls = Rc::new(Cell::new(0));
		let handle = {
			let weak = Rc::downgrade(&registry);
			let own_handle = Rc::clone(&own_handle);
			let calls = Rc::clone(&calls);
			registry.add(Rc::new(move || {
				calls.set(calls.get() + 1);
				if let (Some(registry), Some(handle)) = (weak.upgrade(), own_handle.get()) {
					registry.remove(handle);
				}
			}))
		};
		own_handle.set(Some(handle));

		// Act
		registry.notify();
		registry.notify();

		// Assert
		assert_eq!(calls.get(), 1);
	}

	#[rstest]
	fn test_guard_removes_on_drop() {
		let registry: Rc<ListenerRegistry<AtNav>> = Rc::new(ListenerRegistry::new());
		let handle = registry.add(Rc::new(|| {}));
		let guard = ListenerGuard::new(&registry, handle);
		assert_eq!(registry.len(), 1);

		drop(guard);

		assert!(registry.is_empty());
	}

	#[rstest]
	fn test_forgotten_guard_keeps_listener() {
		let registry: Rc<ListenerRegistry<AtNav>> = Rc::new(ListenerRegistry::new());
		let handle = registry.add(Rc::new(|| {}));

		ListenerGuard::new(&registry, handle).forget();

		assert_eq!(registry.len(), 1);
	}
}

//! Navigation controller.
//!
//! [`Navigator`] owns the single active-route slot and drives every
//! transition, whether it was requested by the application (`goto`, link
//! clicks) or happened in the host (back/forward, delivered as popstate).
//!
//! A navigation goes through these steps:
//!
//! 1. before-nav guards run; any [`GuardDecision::Cancel`] aborts it
//! 2. the phase switches to [`TransitionPhase::Transitioning`]
//! 3. the route table resolves the target
//! 4. the history entry is pushed (goto) or adopted (popstate)
//! 5. the new [`ActiveRoute`] is committed and the phase returns to idle
//! 6. at-nav observers run
//! 7. the outgoing route is disposed
//!
//! The host cannot be stopped from moving its history pointer, so a
//! cancelled popstate is undone afterwards by stepping back over the same
//! distance. The distance comes from the `index` stored in each entry.

use crate::error::NavigationError;
use crate::history::{HistoryBridge, HistoryState};
use crate::listeners::{
	AtNav, BeforeNav, ListenerGuard, ListenerHandle, ListenerRegistry, NavigationAttempt,
	NavigationOrigin,
};
use crate::scroll::{ScrollTracker, Viewport};
use crate::settings::NavigatorSettings;
use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::rc::Rc;
use wayfinder_urls::{BaseOrigin, Location, MatchedRoute, RouteTable};

/// Whether a navigation is being committed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TransitionPhase {
	/// One route is committed and nothing is in flight.
	#[default]
	Idle,
	/// A candidate route has been resolved and is being committed.
	Transitioning,
}

/// Phase subscriber signature.
pub type PhaseListener = dyn Fn(TransitionPhase);

/// The currently committed route.
pub struct ActiveRoute<C> {
	route: MatchedRoute<C>,
	location: Location,
	initial_scroll: Option<f64>,
	index: u64,
	key: u64,
}

impl<C> ActiveRoute<C> {
	/// Returns the matched route.
	pub fn route(&self) -> &MatchedRoute<C> {
		&self.route
	}

	/// Renders the route's content.
	pub fn render(&self) -> C {
		self.route.render()
	}

	/// Returns the location this route was resolved from.
	pub fn location(&self) -> &Location {
		&self.location
	}

	/// Returns the scroll offset to restore on first mount.
	///
	/// `None` means the scroll position is left alone.
	pub fn initial_scroll(&self) -> Option<f64> {
		self.initial_scroll
	}

	/// Returns the history index of the entry this route belongs to.
	pub fn index(&self) -> u64 {
		self.index
	}

	/// Returns a key that changes with every commit.
	pub fn key(&self) -> u64 {
		self.key
	}
}

impl<C> std::fmt::Debug for ActiveRoute<C> {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("ActiveRoute")
			.field("route", &self.route)
			.field("location", &self.location.href())
			.field("initial_scroll", &self.initial_scroll)
			.field("index", &self.index)
			.field("key", &self.key)
			.finish()
	}
}

/// Options for [`Navigator::goto_with`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GotoOptions {
	/// Skip the navigation (after guards ran) if the target is the current location.
	pub noop_if_current: bool,
}

/// What a navigation request ended up doing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavigationOutcome {
	/// A new route was committed.
	Committed,
	/// A guard cancelled a `goto`; nothing changed.
	Cancelled,
	/// The target was already active and `noop_if_current` was set.
	Unchanged,
	/// A guard cancelled a popstate and the history move is being reverted.
	Undone,
	/// The popstate was the echo of an earlier undo.
	Ignored,
	/// Another navigation was in flight; this one runs after it.
	Queued,
}

/// Mouse state of a click on a link.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LinkClick {
	/// Mouse button (0 is the primary button).
	pub button: i16,
	/// Ctrl key held.
	pub ctrl_key: bool,
	/// Meta (command) key held.
	pub meta_key: bool,
	/// Shift key held.
	pub shift_key: bool,
	/// Alt key held.
	pub alt_key: bool,
}

impl LinkClick {
	/// A plain primary-button click.
	pub fn primary() -> Self {
		Self::default()
	}

	/// Returns whether the host would open the link in place.
	///
	/// Modified clicks open new tabs or windows and are left to the host.
	pub fn is_plain_primary(&self) -> bool {
		self.button == 0 && !(self.ctrl_key || self.meta_key || self.shift_key || self.alt_key)
	}
}

enum Request {
	Goto {
		location: Location,
		options: GotoOptions,
	},
	PopState {
		state: Option<HistoryState>,
		url: String,
	},
}

struct NavigatorInner<C> {
	table: RouteTable<C>,
	history: Rc<dyn HistoryBridge>,
	base: BaseOrigin,
	settings: NavigatorSettings,
	current_index: Cell<u64>,
	/// The current entry carries no controller state (a foreign entry).
	unindexed: Cell<bool>,
	active: RefCell<Rc<ActiveRoute<C>>>,
	next_key: Cell<u64>,
	phase: Cell<TransitionPhase>,
	phase_listeners: ListenerRegistry<PhaseListener>,
	before_nav: Rc<ListenerRegistry<BeforeNav>>,
	at_nav: Rc<ListenerRegistry<AtNav>>,
	scroll: ScrollTracker,
	/// Index the host returns to after an undo; its popstate is swallowed.
	pending_undo: Cell<Option<u64>>,
	in_flight: Cell<bool>,
	queue: RefCell<VecDeque<Request>>,
}

/// Clears the in-flight flag when a navigation ends, including by unwinding
/// out of a listener.
struct InFlight<'a, C> {
	inner: &'a NavigatorInner<C>,
}

impl<'a, C> InFlight<'a, C> {
	fn enter(inner: &'a NavigatorInner<C>) -> Self {
		inner.in_flight.set(true);
		Self { inner }
	}
}

impl<C> Drop for InFlight<'_, C> {
	fn drop(&mut self) {
		self.inner.in_flight.set(false);
		// Only changes anything when unwinding; a phase listener that panics
		// here aborts the process.
		self.inner.set_phase(TransitionPhase::Idle);
	}
}

impl<C> NavigatorInner<C> {
	fn set_phase(&self, phase: TransitionPhase) {
		if self.phase.replace(phase) == phase {
			return;
		}
		for listener in self.phase_listeners.snapshot() {
			listener(phase);
		}
	}
}

/// The navigation controller.
///
/// `Navigator` is a cheap handle around shared state; clone it into event
/// handlers and listeners. It lives as long as the application.
pub struct Navigator<C> {
	inner: Rc<NavigatorInner<C>>,
}

impl<C> Clone for Navigator<C> {
	fn clone(&self) -> Self {
		Self {
			inner: Rc::clone(&self.inner),
		}
	}
}

impl<C> std::fmt::Debug for Navigator<C> {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("Navigator")
			.field("base", &self.inner.base.as_str())
			.field("current_index", &self.inner.current_index.get())
			.field("phase", &self.inner.phase.get())
			.field("active", &self.inner.active.borrow().location.href())
			.finish_non_exhaustive()
	}
}

impl<C: 'static> Navigator<C> {
	/// Creates the navigator and commits the route for the host's current entry.
	///
	/// The current entry's state is read once. If it carries no index, it is
	/// stamped with index 0.
	///
	/// # Errors
	///
	/// - the base origin or the current location cannot be parsed
	/// - the host rejects the scroll-restoration switch or the initial stamp
	pub fn new(
		table: RouteTable<C>,
		history: Rc<dyn HistoryBridge>,
		settings: NavigatorSettings,
	) -> Result<Self, NavigationError> {
		let base = settings.base()?;
		if settings.manual_scroll_restoration {
			history.set_manual_scroll_restoration()?;
		}

		let location = base.resolve(&history.location())?;
		let (index, initial_scroll) = match history.state() {
			Some(state) => (state.index, Some(state.scroll_y)),
			None => {
				history.replace_state(&HistoryState::new(0.0, 0), None)?;
				(0, None)
			}
		};
		let initial_scroll = initial_scroll.filter(|_| settings.restore_scroll);

		let route = table.resolve(&location);
		tracing::info!(
			base = base.as_str(),
			path = location.path(),
			index,
			"navigator initialized"
		);

		let scroll = ScrollTracker::new();
		scroll.arm(initial_scroll);

		let active = ActiveRoute {
			route,
			location,
			initial_scroll,
			index,
			key: 0,
		};

		Ok(Self {
			inner: Rc::new(NavigatorInner {
				table,
				history,
				base,
				settings,
				current_index: Cell::new(index),
				unindexed: Cell::new(false),
				active: RefCell::new(Rc::new(active)),
				next_key: Cell::new(0),
				phase: Cell::new(TransitionPhase::Idle),
				phase_listeners: ListenerRegistry::new(),
				before_nav: Rc::new(ListenerRegistry::new()),
				at_nav: Rc::new(ListenerRegistry::new()),
				scroll,
				pending_undo: Cell::new(None),
				in_flight: Cell::new(false),
				queue: RefCell::new(VecDeque::new()),
			}),
		})
	}

	/// Navigates to `target`, pushing a new history entry.
	pub fn goto(&self, target: &str) -> Result<NavigationOutcome, NavigationError> {
		self.goto_with(target, GotoOptions::default())
	}

	/// Navigates to `target` with options.
	///
	/// # Errors
	///
	/// - the target does not resolve, or is on a foreign origin
	/// - the host rejects the history push
	/// - too many navigations are queued behind an in-flight one
	pub fn goto_with(
		&self,
		target: &str,
		options: GotoOptions,
	) -> Result<NavigationOutcome, NavigationError> {
		let location = self.resolve_same_origin(target)?;
		self.run(Request::Goto { location, options })
	}

	/// Handles a popstate for the entry the host has just moved to.
	///
	/// `state` is the state carried by the popstate event; the URL is read
	/// from the host.
	pub fn handle_popstate(
		&self,
		state: Option<HistoryState>,
	) -> Result<NavigationOutcome, NavigationError> {
		let url = self.inner.history.location();
		self.run(Request::PopState { state, url })
	}

	/// Pushes a history entry without changing the active route.
	///
	/// Only for adjusting the address bar; use [`goto`](Self::goto) for
	/// content transitions.
	pub fn push(&self, url: &str) -> Result<(), NavigationError> {
		let inner = &self.inner;
		let location = self.resolve_same_origin(url)?;
		let index = inner.current_index.get() + 1;

		inner
			.history
			.push_state(&HistoryState::new(0.0, index), &location.href())?;
		inner.current_index.set(index);
		inner.unindexed.set(false);
		inner.scroll.entry_changed();
		Ok(())
	}

	/// Replaces the current history entry's URL without changing the active
	/// route. The entry keeps its index and the live scroll offset.
	///
	/// An entry without controller state is left without it, since any index
	/// given to it could already belong to another live entry.
	pub fn replace(&self, url: &str) -> Result<(), NavigationError> {
		let inner = &self.inner;
		let location = self.resolve_same_origin(url)?;

		if inner.unindexed.get() {
			inner.history.replace_url(&location.href())?;
		} else {
			let state = HistoryState::new(inner.scroll.live_offset(), inner.current_index.get());
			inner
				.history
				.replace_state(&state, Some(&location.href()))?;
		}
		inner.scroll.entry_changed();
		Ok(())
	}

	/// Intercepts a link click.
	///
	/// Returns `Ok(true)` if the click was turned into a navigation and the
	/// host's default action should be prevented. Modified clicks and
	/// foreign links are left to the host.
	pub fn handle_link_click(
		&self,
		href: &str,
		click: &LinkClick,
	) -> Result<bool, NavigationError> {
		if !click.is_plain_primary() {
			return Ok(false);
		}

		let location = self.inner.base.resolve(href)?;
		if location.is_foreign() {
			return Ok(false);
		}

		self.run(Request::Goto {
			location,
			options: GotoOptions {
				noop_if_current: true,
			},
		})?;
		Ok(true)
	}

	/// Records the live scroll offset into the current history entry.
	pub fn on_scroll(&self, offset: f64) -> Result<bool, NavigationError> {
		Ok(self.inner.scroll.record(&*self.inner.history, offset)?)
	}

	/// Takes the scroll offset the newly active route should be shown at.
	///
	/// Returns a value at most once per commit.
	pub fn take_pending_scroll(&self) -> Option<f64> {
		self.inner.scroll.take_pending()
	}

	/// Applies the pending scroll offset to `viewport`.
	pub fn restore_scroll(&self, viewport: &dyn Viewport) -> Option<f64> {
		self.inner.scroll.restore(viewport)
	}

	/// Registers a before-nav guard.
	pub fn listen_before_nav<F>(&self, guard: F) -> ListenerHandle<BeforeNav>
	where
		F: Fn(&NavigationAttempt) -> crate::listeners::GuardDecision + 'static,
	{
		self.inner.before_nav.add(Rc::new(guard))
	}

	/// Registers an at-nav observer.
	pub fn listen_at_nav<F>(&self, observer: F) -> ListenerHandle<AtNav>
	where
		F: Fn() + 'static,
	{
		self.inner.at_nav.add(Rc::new(observer))
	}

	/// Registers a before-nav guard that is removed when the returned guard drops.
	pub fn scoped_before_nav<F>(&self, guard: F) -> ListenerGuard<BeforeNav>
	where
		F: Fn(&NavigationAttempt) -> crate::listeners::GuardDecision + 'static,
	{
		let handle = self.listen_before_nav(guard);
		ListenerGuard::new(&self.inner.before_nav, handle)
	}

	/// Registers an at-nav observer that is removed when the returned guard drops.
	pub fn scoped_at_nav<F>(&self, observer: F) -> ListenerGuard<AtNav>
	where
		F: Fn() + 'static,
	{
		let handle = self.listen_at_nav(observer);
		ListenerGuard::new(&self.inner.at_nav, handle)
	}

	/// Removes a before-nav guard. Removing twice is a no-op.
	pub fn remove_before_nav(&self, handle: ListenerHandle<BeforeNav>) -> bool {
		self.inner.before_nav.remove(handle)
	}

	/// Removes an at-nav observer. Removing twice is a no-op.
	pub fn remove_at_nav(&self, handle: ListenerHandle<AtNav>) -> bool {
		self.inner.at_nav.remove(handle)
	}

	/// Subscribes to phase changes.
	pub fn subscribe_phase<F>(&self, listener: F) -> ListenerHandle<PhaseListener>
	where
		F: Fn(TransitionPhase) + 'static,
	{
		self.inner.phase_listeners.add(Rc::new(listener))
	}

	/// Removes a phase subscriber.
	pub fn unsubscribe_phase(&self, handle: ListenerHandle<PhaseListener>) -> bool {
		self.inner.phase_listeners.remove(handle)
	}

	/// Returns the active route.
	pub fn active(&self) -> Rc<ActiveRoute<C>> {
		Rc::clone(&self.inner.active.borrow())
	}

	/// Returns the current phase.
	pub fn phase(&self) -> TransitionPhase {
		self.inner.phase.get()
	}

	/// Returns the index of the current history entry.
	pub fn current_index(&self) -> u64 {
		self.inner.current_index.get()
	}

	/// Returns the base origin.
	pub fn base(&self) -> &BaseOrigin {
		&self.inner.base
	}

	/// Returns the settings the navigator was created with.
	pub fn settings(&self) -> &NavigatorSettings {
		&self.inner.settings
	}

	fn resolve_same_origin(&self, target: &str) -> Result<Location, NavigationError> {
		let location = self.inner.base.resolve(target)?;
		if location.is_foreign() {
			return Err(NavigationError::ForeignTarget(location.href()));
		}
		Ok(location)
	}

	/// Runs a request, or queues it if a navigation is already in flight.
	fn run(&self, request: Request) -> Result<NavigationOutcome, NavigationError> {
		let inner = &self.inner;
		if inner.in_flight.get() {
			let mut queue = inner.queue.borrow_mut();
			if queue.len() >= inner.settings.max_queued_navigations {
				return Err(NavigationError::QueueFull(queue.len()));
			}
			queue.push_back(request);
			tracing::debug!(pending = queue.len(), "navigation queued");
			return Ok(NavigationOutcome::Queued);
		}

		let _flight = InFlight::enter(inner);
		let outcome = self.execute(request);
		while let Some(next) = self.next_queued() {
			if let Err(err) = self.execute(next) {
				tracing::warn!(error = %err, "queued navigation failed");
			}
		}
		outcome
	}

	fn next_queued(&self) -> Option<Request> {
		self.inner.queue.borrow_mut().pop_front()
	}

	fn execute(&self, request: Request) -> Result<NavigationOutcome, NavigationError> {
		match request {
			Request::Goto { location, options } => self.execute_goto(location, options),
			Request::PopState { state, url } => self.execute_popstate(state, &url),
		}
	}

	fn execute_goto(
		&self,
		location: Location,
		options: GotoOptions,
	) -> Result<NavigationOutcome, NavigationError> {
		let inner = &self.inner;
		let attempt = NavigationAttempt {
			target: location,
			origin: NavigationOrigin::Goto,
		};
		if inner.before_nav.decide(&attempt).is_cancel() {
			tracing::debug!(to = %attempt.target, "navigation cancelled by guard");
			return Ok(NavigationOutcome::Cancelled);
		}

		let location = attempt.target;
		if options.noop_if_current && location == *self.active().location() {
			return Ok(NavigationOutcome::Unchanged);
		}

		self.inner.set_phase(TransitionPhase::Transitioning);
		let route = inner.table.resolve(&location);
		let index = inner.current_index.get() + 1;
		let state = HistoryState::new(0.0, index);

		if let Err(err) = inner.history.push_state(&state, &location.href()) {
			// The candidate never became active but may hold resources
			route.dispose();
			self.inner.set_phase(TransitionPhase::Idle);
			return Err(err.into());
		}

		inner.current_index.set(index);
		inner.unindexed.set(false);
		self.commit(route, location, Some(0.0), index);
		Ok(NavigationOutcome::Committed)
	}

	fn execute_popstate(
		&self,
		state: Option<HistoryState>,
		url: &str,
	) -> Result<NavigationOutcome, NavigationError> {
		let inner = &self.inner;
		let arrived = state.map(|s| s.index);

		let expected = inner.pending_undo.take();
		if expected.is_some() && expected == arrived {
			tracing::trace!(index = ?expected, "ignoring popstate caused by undo");
			return Ok(NavigationOutcome::Ignored);
		}

		let location = inner.base.resolve(url)?;
		let attempt = NavigationAttempt {
			target: location,
			origin: NavigationOrigin::PopState,
		};

		if inner.before_nav.decide(&attempt).is_cancel() {
			// The distance back is only known between two distinct indexed entries
			match arrived {
				Some(arrived)
					if !inner.unindexed.get() && arrived != inner.current_index.get() =>
				{
					return self.undo(arrived);
				}
				_ => tracing::warn!(
					url,
					"cancelled popstate cannot be undone (entry index unknown), rendering it anyway"
				),
			}
		}

		let location = attempt.target;
		match arrived {
			Some(index) => inner.current_index.set(index),
			None => tracing::debug!(url, "popstate to entry without index, scroll cannot be restored"),
		}
		inner.unindexed.set(arrived.is_none());

		self.inner.set_phase(TransitionPhase::Transitioning);
		let route = inner.table.resolve(&location);
		let initial_scroll = state
			.map(|s| s.scroll_y)
			.filter(|_| inner.settings.restore_scroll);
		self.commit(route, location, initial_scroll, inner.current_index.get());
		Ok(NavigationOutcome::Committed)
	}

	/// Steps the host back to the entry it was on before the popstate.
	fn undo(&self, arrived: u64) -> Result<NavigationOutcome, NavigationError> {
		let inner = &self.inner;
		let current = inner.current_index.get();
		let delta = current as i64 - arrived as i64;

		inner.pending_undo.set(Some(current));
		if let Err(err) = inner.history.go(delta) {
			inner.pending_undo.set(None);
			tracing::warn!(delta, error = %err, "failed to undo cancelled popstate");
			return Err(err.into());
		}

		tracing::debug!(delta, from = arrived, to = current, "undoing cancelled popstate");
		Ok(NavigationOutcome::Undone)
	}

	fn commit(
		&self,
		route: MatchedRoute<C>,
		location: Location,
		initial_scroll: Option<f64>,
		index: u64,
	) {
		let inner = &self.inner;
		let key = inner.next_key.get() + 1;
		inner.next_key.set(key);

		tracing::debug!(
			path = location.path(),
			route = route.name().unwrap_or("<unnamed>"),
			index,
			key,
			"navigation committed"
		);

		let incoming = Rc::new(ActiveRoute {
			route,
			location,
			initial_scroll,
			index,
			key,
		});
		let outgoing = inner.active.replace(incoming);

		inner.scroll.entry_changed();
		inner.scroll.arm(initial_scroll);
		self.inner.set_phase(TransitionPhase::Idle);

		inner.at_nav.notify();
		outgoing.route.dispose();
	}
}

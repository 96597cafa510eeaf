//! Route capabilities and matched routes.
//!
//! A [`Route`] decides whether it is responsible for a [`Location`]. On a
//! match it may start loading whatever its content needs and returns a
//! [`MatchedRoute`], which the navigation controller keeps as long as the
//! route is active.

use crate::error::RouterError;
use crate::location::Location;
use crate::params::RouteParams;
use crate::pattern::ClientPathPattern;
use std::cell::Cell;

/// Type alias for the hook run when a matched route stops being active.
type DisposeHook = Box<dyn FnOnce()>;

/// The renderable result of a successful match.
///
/// `render` must be free of side effects; the rendering layer may call it
/// several times before (and after) the route is committed. The dispose hook,
/// if any, runs at most once.
pub struct MatchedRoute<C> {
	name: Option<String>,
	render: Box<dyn Fn() -> C>,
	dispose: Cell<Option<DisposeHook>>,
}

impl<C> MatchedRoute<C> {
	/// Creates a matched route from a render function.
	pub fn new<F>(render: F) -> Self
	where
		F: Fn() -> C + 'static,
	{
		Self {
			name: None,
			render: Box::new(render),
			dispose: Cell::new(None),
		}
	}

	/// Sets a descriptive name used in logs.
	pub fn named(mut self, name: impl Into<String>) -> Self {
		self.name = Some(name.into());
		self
	}

	/// Adds a hook that runs once when this route stops being active.
	///
	/// Typical use is aborting a fetch started by the route's matcher.
	pub fn on_dispose<F>(self, hook: F) -> Self
	where
		F: FnOnce() + 'static,
	{
		self.dispose.set(Some(Box::new(hook)));
		self
	}

	/// Returns the descriptive name, if one was set.
	pub fn name(&self) -> Option<&str> {
		self.name.as_deref()
	}

	/// Renders the route's content.
	pub fn render(&self) -> C {
		(self.render)()
	}

	/// Returns whether a dispose hook is still pending.
	pub fn has_dispose(&self) -> bool {
		let hook = self.dispose.take();
		let pending = hook.is_some();
		self.dispose.set(hook);
		pending
	}

	/// Runs the dispose hook.
	///
	/// Returns `false` if there was no hook or it already ran.
	pub fn dispose(&self) -> bool {
		match self.dispose.take() {
			Some(hook) => {
				hook();
				true
			}
			None => false,
		}
	}
}

impl<C> std::fmt::Debug for MatchedRoute<C> {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("MatchedRoute")
			.field("name", &self.name)
			.field("has_dispose", &self.has_dispose())
			.finish()
	}
}

/// A capability that conditionally matches a location.
///
/// Implementations must return `None` quickly and without side effects for
/// locations they are not responsible for.
pub trait Route<C> {
	/// Tries to match `location`.
	fn match_location(&self, location: &Location) -> Option<MatchedRoute<C>>;

	/// Name used in logs.
	fn name(&self) -> Option<&str> {
		None
	}
}

impl<C, F> Route<C> for F
where
	F: Fn(&Location) -> Option<MatchedRoute<C>>,
{
	fn match_location(&self, location: &Location) -> Option<MatchedRoute<C>> {
		self(location)
	}
}

/// The route used when no other route matches. It never fails to match.
pub trait FallbackRoute<C> {
	/// Prepares the fallback content for `location`.
	fn prepare(&self, location: &Location) -> MatchedRoute<C>;
}

impl<C, F> FallbackRoute<C> for F
where
	F: Fn(&Location) -> MatchedRoute<C>,
{
	fn prepare(&self, location: &Location) -> MatchedRoute<C> {
		self(location)
	}
}

/// Type alias for pattern route handlers.
type PatternHandler<C> = Box<dyn Fn(&RouteParams, &Location) -> Option<MatchedRoute<C>>>;

/// A [`Route`] driven by a [`ClientPathPattern`].
///
/// The handler only runs when the path matches. It can still reject the
/// location by returning `None`, for example when an id does not parse.
pub struct PatternRoute<C> {
	pattern: ClientPathPattern,
	name: Option<String>,
	handler: PatternHandler<C>,
}

impl<C> PatternRoute<C> {
	/// Creates a pattern route.
	///
	/// # Errors
	///
	/// Returns [`RouterError::InvalidPattern`] if the pattern does not compile.
	pub fn new<F>(pattern: &str, handler: F) -> Result<Self, RouterError>
	where
		F: Fn(&RouteParams, &Location) -> Option<MatchedRoute<C>> + 'static,
	{
		let compiled =
			ClientPathPattern::new(pattern).map_err(|source| RouterError::InvalidPattern {
				pattern: pattern.to_string(),
				source,
			})?;

		Ok(Self {
			pattern: compiled,
			name: None,
			handler: Box::new(handler),
		})
	}

	/// Sets the route name.
	pub fn named(mut self, name: impl Into<String>) -> Self {
		self.name = Some(name.into());
		self
	}

	/// Returns the pattern.
	pub fn pattern(&self) -> &ClientPathPattern {
		&self.pattern
	}
}

impl<C> Route<C> for PatternRoute<C> {
	fn match_location(&self, location: &Location) -> Option<MatchedRoute<C>> {
		let params = self.pattern.matches(location.path())?;
		(self.handler)(&params, location)
	}

	fn name(&self) -> Option<&str> {
		self.name.as_deref().or(Some(self.pattern.pattern()))
	}
}

impl<C> std::fmt::Debug for PatternRoute<C> {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("PatternRoute")
			.field("pattern", &self.pattern)
			.field("name", &self.name)
			.finish()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::location::BaseOrigin;
	use rstest::rstest;
	use std::rc::Rc;

	fn location(target: &str) -> Location {
		BaseOrigin::parse("http://localhost/")
			.unwrap()
			.resolve(target)
			.unwrap()
	}

	#[rstest]
	fn test_render_is_repeatable() {
		let route = MatchedRoute::new(|| "video".to_string());

		assert_eq!(route.render(), "video");
		assert_eq!(route.render(), "video");
	}

	#[rstest]
	fn test_dispose_runs_once() {
		let count = Rc::new(Cell::new(0));
		let route = MatchedRoute::new(|| ()).on_dispose({
			let count = Rc::clone(&count);
			move || count.set(count.get() + 1)
		});

		assert!(route.has_dispose());
		assert!(route.dispose());
		assert!(!route.dispose());
		assert!(!route.has_dispose());
		assert_eq!(count.get(), 1);
	}

	#[rstest]
	fn test_pattern_route_matches_and_parses() {
		let route = PatternRoute::new("/v/:id", |params, _| {
			let id: u64 = params.parse("id").ok()?;
			Some(MatchedRoute::new(move || id))
		})
		.unwrap();

		let matched = route.match_location(&location("/v/42")).unwrap();
		assert_eq!(matched.render(), 42);

		// Handler rejects unparsable ids
		assert!(route.match_location(&location("/v/abc")).is_none());
		// Pattern rejects other paths
		assert!(route.match_location(&location("/series/1")).is_none());
	}

	#[rstest]
	fn test_pattern_route_name_defaults_to_pattern() {
		let route = PatternRoute::new("/v/:id", |_, _| Some(MatchedRoute::new(|| ()))).unwrap();
		assert_eq!(Route::name(&route), Some("/v/:id"));

		let route = route.named("video");
		assert_eq!(Route::name(&route), Some("video"));
	}

	#[rstest]
	fn test_invalid_pattern_is_an_error() {
		let result = PatternRoute::<()>::new("/v/{id", |_, _| None);

		assert!(matches!(result, Err(RouterError::InvalidPattern { .. })));
	}
}

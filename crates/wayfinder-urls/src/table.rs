//! The route table.
//!
//! An ordered list of [`Route`]s plus one mandatory [`FallbackRoute`].
//! Resolution is a total function: routes are tried in registration order,
//! the first match wins, and the fallback answers everything else.

use crate::error::RouterError;
use crate::location::Location;
use crate::params::RouteParams;
use crate::route::{FallbackRoute, MatchedRoute, PatternRoute, Route};

/// Ordered routes plus a fallback.
pub struct RouteTable<C> {
	routes: Vec<Box<dyn Route<C>>>,
	fallback: Box<dyn FallbackRoute<C>>,
}

impl<C: 'static> RouteTable<C> {
	/// Starts building a route table.
	pub fn builder() -> RouteTableBuilder<C> {
		RouteTableBuilder::new()
	}

	/// Resolves `location` to a matched route.
	///
	/// Every call re-runs the matchers, including their side effects, so
	/// callers should resolve at most once per navigation.
	pub fn resolve(&self, location: &Location) -> MatchedRoute<C> {
		for (position, route) in self.routes.iter().enumerate() {
			if let Some(matched) = route.match_location(location) {
				tracing::trace!(
					path = location.path(),
					route = route.name().unwrap_or("<unnamed>"),
					position,
					"route matched"
				);
				return matched;
			}
		}

		tracing::trace!(path = location.path(), "no route matched, using fallback");
		self.fallback.prepare(location)
	}

	/// Returns the number of registered routes, not counting the fallback.
	pub fn route_count(&self) -> usize {
		self.routes.len()
	}
}

impl<C> std::fmt::Debug for RouteTable<C> {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("RouteTable")
			.field(
				"routes",
				&self
					.routes
					.iter()
					.map(|r| r.name().unwrap_or("<unnamed>"))
					.collect::<Vec<_>>(),
			)
			.finish_non_exhaustive()
	}
}

/// Builder for [`RouteTable`].
///
/// Pattern errors are collected and reported by [`build`](Self::build), so
/// route definitions can be chained without intermediate `?`.
pub struct RouteTableBuilder<C> {
	routes: Vec<Box<dyn Route<C>>>,
	fallback: Option<Box<dyn FallbackRoute<C>>>,
	error: Option<RouterError>,
}

impl<C: 'static> RouteTableBuilder<C> {
	fn new() -> Self {
		Self {
			routes: Vec::new(),
			fallback: None,
			error: None,
		}
	}

	/// Appends a route.
	pub fn route<R>(mut self, route: R) -> Self
	where
		R: Route<C> + 'static,
	{
		self.routes.push(Box::new(route));
		self
	}

	/// Appends a [`PatternRoute`] built from `pattern` and `handler`.
	pub fn pattern<F>(mut self, pattern: &str, handler: F) -> Self
	where
		F: Fn(&RouteParams, &Location) -> Option<MatchedRoute<C>> + 'static,
	{
		match PatternRoute::new(pattern, handler) {
			Ok(route) => self.routes.push(Box::new(route)),
			Err(err) => {
				self.error.get_or_insert(err);
			}
		}
		self
	}

	/// Sets the fallback route.
	pub fn fallback<F>(mut self, fallback: F) -> Self
	where
		F: FallbackRoute<C> + 'static,
	{
		self.fallback = Some(Box::new(fallback));
		self
	}

	/// Builds the table.
	///
	/// # Errors
	///
	/// - [`RouterError::InvalidPattern`] for the first pattern that failed to compile
	/// - [`RouterError::MissingFallback`] if no fallback was set
	pub fn build(self) -> Result<RouteTable<C>, RouterError> {
		if let Some(err) = self.error {
			return Err(err);
		}
		let fallback = self.fallback.ok_or(RouterError::MissingFallback)?;

		Ok(RouteTable {
			routes: self.routes,
			fallback,
		})
	}
}

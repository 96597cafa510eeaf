//! # Wayfinder
//!
//! Client-side navigation for single-page applications: a route table, a
//! navigation controller that keeps the host's session history and the
//! active route in agreement, cancellable navigations, and per-entry scroll
//! restoration.
//!
//! ## Feature Flags
//!
//! - `urls` - route table, path patterns and URL resolution ([`urls`])
//! - `pages` - navigation controller, history bridge, listeners, scroll
//!   tracking ([`pages`]); implies `urls`
//! - `full` (default) - everything
//!
//! ## Quick Start
//!
//! ```
//! # #[cfg(feature = "pages")]
//! # {
//! use std::rc::Rc;
//! use wayfinder::prelude::*;
//!
//! let table = RouteTable::builder()
//!     .pattern("/", |_, _| Some(MatchedRoute::new(|| "home".to_string())))
//!     .pattern("/v/{id}", |params, _| {
//!         let id: u64 = params.parse("id").ok()?;
//!         Some(MatchedRoute::new(move || format!("video {id}")))
//!     })
//!     .fallback(|_: &Location| MatchedRoute::new(|| "not found".to_string()))
//!     .build()
//!     .unwrap();
//!
//! let history = Rc::new(MemoryHistory::new("/"));
//! let navigator = Navigator::new(table, history.clone(), NavigatorSettings::new("https://example.org")).unwrap();
//!
//! navigator.listen_before_nav(|attempt| {
//!     if attempt.target.path() == "/v/0" {
//!         GuardDecision::Cancel
//!     } else {
//!         GuardDecision::Proceed
//!     }
//! });
//!
//! assert_eq!(navigator.goto("/v/0").unwrap(), NavigationOutcome::Cancelled);
//! assert_eq!(navigator.goto("/v/12").unwrap(), NavigationOutcome::Committed);
//! assert_eq!(navigator.active().render(), "video 12");
//!
//! history.back();
//! while let Some(event) = history.take_popstate() {
//!     navigator.handle_popstate(event.state).unwrap();
//! }
//! assert_eq!(navigator.active().render(), "home");
//! # }
//! ```

#![warn(missing_docs)]

/// Route tables, path patterns and URL resolution.
#[cfg(feature = "urls")]
pub use wayfinder_urls as urls;

/// Navigation controller, history bridge, listeners and scroll tracking.
#[cfg(feature = "pages")]
pub use wayfinder_pages as pages;

/// Commonly used types.
pub mod prelude {
	#[cfg(feature = "urls")]
	pub use wayfinder_urls::{
		BaseOrigin, FallbackRoute, Location, MatchedRoute, PatternRoute, Route, RouteParams,
		RouteTable,
	};

	#[cfg(feature = "pages")]
	pub use wayfinder_pages::{
		GotoOptions, GuardDecision, HistoryBridge, HistoryState, LinkClick, MemoryHistory,
		NavigationAttempt, NavigationError, NavigationOrigin, NavigationOutcome, Navigator,
		NavigatorSettings, RouterOutlet, TransitionPhase, Viewport,
	};
}

//! Wayfinder Pages - client-side navigation controller
//!
//! This crate turns a [`RouteTable`](wayfinder_urls::RouteTable) into a
//! running single-page navigation system:
//!
//! - [`Navigator`]: the controller; owns the active route, runs guards,
//!   pushes history entries and reconciles back/forward moves
//! - [`HistoryBridge`]: the session-history seam, with [`MemoryHistory`] for
//!   native use and tests and `BrowserHistory` on WASM
//! - [`ListenerRegistry`]: before-nav guards and at-nav observers
//! - [`ScrollTracker`]: per-entry scroll persistence and restoration
//! - [`RouterOutlet`]: the rendering layer's view of the active route
//!
//! ## Example
//!
//! ```
//! use std::rc::Rc;
//! use wayfinder_pages::{MemoryHistory, NavigationOutcome, Navigator, NavigatorSettings};
//! use wayfinder_urls::{Location, MatchedRoute, RouteTable};
//!
//! let table = RouteTable::builder()
//!     .pattern("/v/:id", |params, _| {
//!         let id = params.get("id")?.to_string();
//!         Some(MatchedRoute::new(move || format!("video {id}")))
//!     })
//!     .fallback(|_: &Location| MatchedRoute::new(|| "home".to_string()))
//!     .build()
//!     .unwrap();
//!
//! let history = Rc::new(MemoryHistory::new("/"));
//! let navigator = Navigator::new(table, history, NavigatorSettings::new("https://example.org")).unwrap();
//!
//! assert_eq!(navigator.goto("/v/7").unwrap(), NavigationOutcome::Committed);
//! assert_eq!(navigator.active().render(), "video 7");
//! assert_eq!(navigator.current_index(), 1);
//! ```
//!
//! ## Threading
//!
//! Everything here is single-threaded (`Rc`, `RefCell`). Host events are
//! expected to be delivered one at a time on the UI thread; a navigation
//! requested while another is being committed is queued.

#![warn(missing_docs)]

pub mod controller;
pub mod error;
pub mod history;
pub mod listeners;
pub mod outlet;
pub mod scroll;
pub mod settings;

#[cfg(target_arch = "wasm32")]
pub mod browser;

pub use controller::{
	ActiveRoute, GotoOptions, LinkClick, NavigationOutcome, Navigator, PhaseListener,
	TransitionPhase,
};
pub use error::{HistoryError, NavigationError, SettingsError};
pub use history::{HistoryBridge, HistoryState, MemoryEntry, MemoryHistory, PopStateEvent};
pub use listeners::{
	AtNav, BeforeNav, GuardDecision, ListenerGuard, ListenerHandle, ListenerRegistry,
	NavigationAttempt, NavigationOrigin,
};
pub use outlet::RouterOutlet;
pub use scroll::{ScrollTracker, Viewport};
pub use settings::NavigatorSettings;

#[cfg(target_arch = "wasm32")]
pub use browser::{WindowViewport, install, start};
#[cfg(target_arch = "wasm32")]
pub use history::BrowserHistory;

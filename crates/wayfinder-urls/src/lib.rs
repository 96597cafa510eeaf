//! Wayfinder URLs - route tables and location resolution
//!
//! This crate holds the pure, URL-shaped half of wayfinder:
//!
//! - [`BaseOrigin`] / [`Location`]: resolve navigation targets against a fixed
//!   origin and decompose them into path, query and fragment
//! - [`ClientPathPattern`]: `{name}`, `:name` and `{name:*}` path patterns
//! - [`Route`], [`FallbackRoute`], [`MatchedRoute`]: the route capabilities
//! - [`RouteTable`]: ordered matching with a mandatory fallback
//!
//! ## Example
//!
//! ```
//! use wayfinder_urls::{BaseOrigin, Location, MatchedRoute, RouteTable};
//!
//! let table = RouteTable::builder()
//!     .pattern("/v/:id", |params, _| {
//!         let id: u64 = params.parse("id").ok()?;
//!         Some(MatchedRoute::new(move || format!("video {id}")))
//!     })
//!     .fallback(|_: &Location| MatchedRoute::new(|| "not found".to_string()))
//!     .build()
//!     .unwrap();
//!
//! let base = BaseOrigin::parse("https://example.org/").unwrap();
//! let matched = table.resolve(&base.resolve("/v/42").unwrap());
//! assert_eq!(matched.render(), "video 42");
//! ```

#![warn(missing_docs)]

pub mod error;
pub mod location;
pub mod params;
pub mod pattern;
pub mod route;
pub mod table;

pub use error::{PathError, PatternError, RouterError, UrlError};
pub use location::{BaseOrigin, Location};
pub use params::RouteParams;
pub use pattern::ClientPathPattern;
pub use route::{FallbackRoute, MatchedRoute, PatternRoute, Route};
pub use table::{RouteTable, RouteTableBuilder};

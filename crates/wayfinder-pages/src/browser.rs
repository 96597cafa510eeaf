//! Wiring of a [`Navigator`] into the browser's event loop.
//!
//! [`install`] registers three window/document listeners: popstate, scroll
//! and delegated link clicks. The closures are leaked, since the application
//! does not terminate before the page does.

use crate::controller::{LinkClick, Navigator};
use crate::error::{HistoryError, NavigationError};
use crate::history::{BrowserHistory, browser::state_from_js};
use crate::scroll::Viewport;
use crate::settings::NavigatorSettings;
use std::rc::Rc;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{Element, Event, MouseEvent, PopStateEvent, Window};
use wayfinder_urls::RouteTable;

/// [`Viewport`] over the browser window.
#[derive(Debug, Clone)]
pub struct WindowViewport {
	window: Window,
}

impl WindowViewport {
	/// Wraps `window`.
	pub fn new(window: Window) -> Self {
		Self { window }
	}
}

impl Viewport for WindowViewport {
	fn scroll_y(&self) -> f64 {
		self.window.scroll_y().unwrap_or(0.0)
	}

	fn scroll_to(&self, y: f64) {
		self.window.scroll_to_with_x_and_y(0.0, y);
	}
}

fn listener_error(err: JsValue) -> HistoryError {
	HistoryError::Host {
		operation: "addEventListener",
		message: err.as_string().unwrap_or_else(|| format!("{:?}", err)),
	}
}

/// Creates a navigator over the browser's session history and installs its
/// event listeners.
pub fn start<C: 'static>(
	table: RouteTable<C>,
	settings: NavigatorSettings,
) -> Result<Navigator<C>, NavigationError> {
	let history = BrowserHistory::new()?;
	let window = history.window().clone();
	let navigator = Navigator::new(table, Rc::new(history), settings)?;
	install(&navigator, &window)?;
	Ok(navigator)
}

/// Installs popstate, scroll and link-click listeners for `navigator`.
pub fn install<C: 'static>(navigator: &Navigator<C>, window: &Window) -> Result<(), HistoryError> {
	// 1. Back/forward
	let nav = navigator.clone();
	let popstate_handler = Closure::wrap(Box::new(move |event: Event| {
		let state = event
			.dyn_ref::<PopStateEvent>()
			.and_then(|e| state_from_js(&e.state()));
		if let Err(err) = nav.handle_popstate(state) {
			tracing::warn!(error = %err, "popstate handling failed");
		}
	}) as Box<dyn FnMut(_)>);
	window
		.add_event_listener_with_callback("popstate", popstate_handler.as_ref().unchecked_ref())
		.map_err(listener_error)?;
	popstate_handler.forget();

	// 2. Scroll persistence
	let nav = navigator.clone();
	let viewport = WindowViewport::new(window.clone());
	let scroll_handler = Closure::wrap(Box::new(move |_event: Event| {
		if let Err(err) = nav.on_scroll(viewport.scroll_y()) {
			tracing::warn!(error = %err, "failed to record scroll offset");
		}
	}) as Box<dyn FnMut(_)>);
	window
		.add_event_listener_with_callback("scroll", scroll_handler.as_ref().unchecked_ref())
		.map_err(listener_error)?;
	scroll_handler.forget();

	// 3. Link clicks (event delegation)
	let document = window.document().ok_or(HistoryError::NoWindow)?;
	let nav = navigator.clone();
	let link_handler = Closure::wrap(Box::new(move |event: Event| {
		let Some(mouse) = event.dyn_ref::<MouseEvent>() else {
			return;
		};
		let anchor = event
			.target()
			.and_then(|t| t.dyn_into::<Element>().ok())
			.and_then(|el| el.closest("a[href]").ok().flatten());
		let Some(anchor) = anchor else {
			return;
		};
		if anchor.has_attribute("download") || anchor.get_attribute("target").is_some() {
			return;
		}
		let Some(href) = anchor.get_attribute("href") else {
			return;
		};

		let click = LinkClick {
			button: mouse.button(),
			ctrl_key: mouse.ctrl_key(),
			meta_key: mouse.meta_key(),
			shift_key: mouse.shift_key(),
			alt_key: mouse.alt_key(),
		};
		match nav.handle_link_click(&href, &click) {
			Ok(true) => event.prevent_default(),
			Ok(false) => {}
			Err(err) => tracing::warn!(href = %href, error = %err, "link navigation failed"),
		}
	}) as Box<dyn FnMut(_)>);
	document
		.add_event_listener_with_callback("click", link_handler.as_ref().unchecked_ref())
		.map_err(listener_error)?;
	link_handler.forget();

	tracing::debug!("navigator listeners installed");
	Ok(())
}

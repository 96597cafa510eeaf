//! Facade re-export tests

#![cfg(feature = "full")]

use rstest::rstest;
use std::rc::Rc;
use wayfinder::prelude::*;

fn navigator(history: Rc<MemoryHistory>) -> Navigator<String> {
	let table = RouteTable::builder()
		.pattern("/docs/{rest:*}", |params, _| {
			let rest = params.get("rest")?.to_string();
			Some(MatchedRoute::new(move || format!("docs {rest}")))
		})
		.fallback(|location: &Location| {
			let path = location.path().to_string();
			MatchedRoute::new(move || path.clone())
		})
		.build()
		.unwrap();
	Navigator::new(table, history, NavigatorSettings::new("https://docs.example.org")).unwrap()
}

#[rstest]
#[case("/docs/guide/intro", "docs guide/intro")]
#[case("/blog", "/blog")]
fn test_prelude_navigation(#[case] target: &str, #[case] expected: &str) {
	// Arrange
	let history = Rc::new(MemoryHistory::new("/"));
	let navigator = navigator(history.clone());

	// Act
	let outcome = navigator.goto(target).unwrap();

	// Assert
	assert_eq!(outcome, NavigationOutcome::Committed);
	assert_eq!(navigator.active().render(), expected);
	assert_eq!(history.state(), Some(HistoryState::new(0.0, 1)));
}

#[rstest]
fn test_member_crates_are_reachable() {
	// Arrange
	let base = wayfinder::urls::BaseOrigin::parse("https://docs.example.org").unwrap();

	// Act
	let location = base.resolve("https://other.example.org/x").unwrap();

	// Assert
	assert!(location.is_foreign());
	assert_eq!(
		wayfinder::pages::GuardDecision::default(),
		GuardDecision::Proceed
	);
}

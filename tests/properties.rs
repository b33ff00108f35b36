//! Property-based tests for matching and list binding
//!
//! Structural invariants that must hold for any stack shape or item count,
//! not just the handcrafted documents in binding.rs.

use proptest::prelude::*;
use xmlbind::{Binder, IterSource, PathElement, PathPattern, TypeDescriptor, XmlEvent};

fn config() -> ProptestConfig {
    ProptestConfig {
        cases: 128,
        max_shrink_iters: 200,
        ..ProptestConfig::default()
    }
}

// =============================================================================
// Strategies
// =============================================================================

fn name() -> impl Strategy<Value = String> {
    "[A-Za-z][A-Za-z0-9]{0,6}"
}

fn attributes() -> impl Strategy<Value = Vec<(String, String)>> {
    prop::collection::vec((name(), "[a-z0-9]{0,4}"), 0..3)
}

fn observed_stack() -> impl Strategy<Value = Vec<(String, Vec<(String, String)>)>> {
    prop::collection::vec((name(), attributes()), 1..6)
}

fn observe(stack: &[(String, Vec<(String, String)>)]) -> Vec<PathElement> {
    stack
        .iter()
        .map(|(name, attrs)| PathElement::observed(name.clone(), attrs.clone()))
        .collect()
}

/// Declared element demanding exactly the attributes `attrs` carries
fn declare(name: &str, attrs: &[(String, String)]) -> PathElement {
    attrs
        .iter()
        .fold(PathElement::element(name), |element, (k, v)| {
            element.with_predicate(k.clone(), v.clone())
        })
}

fn order_events(items: &[String]) -> Vec<XmlEvent> {
    let mut events = vec![XmlEvent::start("Order")];
    for item in items {
        events.push(XmlEvent::start("Noise"));
        events.push(XmlEvent::end("Noise"));
        events.push(XmlEvent::start("Item"));
        events.push(XmlEvent::text(item.clone()));
        events.push(XmlEvent::end("Item"));
    }
    events.push(XmlEvent::end("Order"));
    events
}

// =============================================================================
// Properties
// =============================================================================

proptest! {
    #![proptest_config(config())]

    /// An element declared from an observation matches that observation
    #[test]
    fn element_match_is_reflexive(name in name(), attrs in attributes()) {
        let observed = PathElement::observed(name.clone(), attrs.clone());
        prop_assert!(declare(&name, &attrs).matches(&observed));
    }

    /// Extra observed attributes never break a match
    #[test]
    fn element_match_is_monotone(
        name in name(),
        declared in attributes(),
        extra in attributes(),
    ) {
        let declared_keys: Vec<&String> = declared.iter().map(|(k, _)| k).collect();
        let mut observed = declared.clone();
        observed.extend(extra.into_iter().filter(|(k, _)| !declared_keys.contains(&k)));

        let element = declare(&name, &declared);
        prop_assert!(element.matches(&PathElement::observed(name.clone(), observed)));
    }

    /// A pattern declared from a whole stack matches it absolutely and from any suffix
    #[test]
    fn pattern_match_is_reflexive(stack in observed_stack(), cut in 0usize..6) {
        let observed = observe(&stack);
        let steps: Vec<PathElement> = stack
            .iter()
            .map(|(name, attrs)| declare(name, attrs))
            .collect();

        prop_assert!(PathPattern::absolute(steps.clone()).matches(&observed, None));

        let cut = cut.min(steps.len() - 1);
        let suffix = steps[cut..].to_vec();
        prop_assert!(PathPattern::floating(suffix).matches(&observed, None));
    }

    /// A declared chain longer than the stack never matches
    #[test]
    fn longer_pattern_never_matches(stack in observed_stack(), extra in name()) {
        let observed = observe(&stack);
        let mut steps: Vec<PathElement> = stack
            .iter()
            .map(|(name, attrs)| declare(name, attrs))
            .collect();
        steps.push(PathElement::element(extra));

        prop_assert!(!PathPattern::floating(steps).matches(&observed, None));
    }

    /// List items arrive in document order, one per matching element
    #[test]
    fn list_preserves_document_order(items in prop::collection::vec("[a-z0-9 ]{0,8}", 0..24)) {
        let descriptor = TypeDescriptor::builder("Order")
            .default_constructor()
            .list("items", "Item", |o: &mut Vec<String>, v: Vec<String>| *o = v)
            .build()
            .unwrap();

        let bound = Binder::new(descriptor)
            .parse(IterSource::new(order_events(&items)))
            .unwrap();
        prop_assert_eq!(bound, items);
    }

    /// Explicit nil always yields the zero value, whatever the element contains
    #[test]
    fn nil_ignores_text(text in "\\PC{0,12}") {
        let descriptor = TypeDescriptor::builder("Order")
            .default_constructor()
            .field("count", "Count", |o: &mut i32, v: i32| *o = v)
            .build()
            .unwrap();

        let events = vec![
            XmlEvent::start("Order"),
            XmlEvent::start_with("Count", [("xsi:nil", "true")]),
            XmlEvent::text(text),
            XmlEvent::end("Count"),
            XmlEvent::end("Order"),
        ];
        let count = Binder::new(descriptor).parse(IterSource::new(events)).unwrap();
        prop_assert_eq!(count, 0);
    }
}

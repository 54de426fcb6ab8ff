//! Page format tests
//!
//! Serialization fidelity across every element variant and nesting depth,
//! and document-order lookups.

use pagecraft_dom::{
    Action, AnimationAction, AnimationTarget, Binding, BindingKind, Condition, Element, ElementKind, Event,
    EventKind, Expression, FetchAction, RepeatFrom, SetStateAction, ToggleStateAction, boxed, button, column,
    form, grid, img, input, link, submit, txt,
};
use serde_json::json;

fn every_variant() -> Vec<Element> {
    vec![
        boxed(vec![txt("inside")]),
        txt("Hello {{$store.user.name}}"),
        img("https://example.com/a.png").with_alt("A"),
        link().with_href("https://example.com").with_text("Go"),
        button().with_text("Click"),
        input(),
        form(vec![input(), submit("Send")]),
        submit("Send"),
    ]
}

fn assert_stable(element: &Element) {
    let first = element.serialize();
    let decoded = Element::deserialize(&first).expect("decode");
    assert_eq!(decoded.serialize(), first, "unstable: {first}");
    assert_eq!(&decoded, element);
}

// ============================================================================
// ROUND TRIPS
// ============================================================================

#[test]
fn test_every_variant_roundtrips() {
    for element in every_variant() {
        assert_stable(&element);
    }
}

#[test]
fn test_variant_names_cover_constructors() {
    let names: Vec<_> = every_variant().iter().map(|e| e.kind_name()).collect();
    assert_eq!(names, ElementKind::NAMES);
}

#[test]
fn test_deep_nesting_roundtrips() {
    let mut element = txt("leaf");
    for depth in 0..40 {
        element = boxed(vec![element]).with_tag(format!("level{depth}"));
    }
    assert_eq!(element.len(), 41);
    assert_stable(&element);
}

#[test]
fn test_full_attachments_roundtrip() {
    let element = column(vec![
        grid(2, vec![img("a.png"), img("b.png")]).with_repeat_from(RepeatFrom::from_state("$store.source.gallery")),
    ])
    .with_event(
        Event::new(EventKind::Intersection)
            .with_action(Action::new(
                AnimationAction::new("slide").with_target(AnimationTarget::Children),
            ))
            .with_action(Action::new(SetStateAction {
                state_name: "seen".into(),
                value: Expression::text("yes"),
            })),
    )
    .with_event(
        Event::new(EventKind::KeyDown)
            .with_action(Action::new(ToggleStateAction { state_name: "open".into() }))
            .with_action(Action::new(FetchAction { data_source_id: "src".into() })),
    )
    .with_binding(
        BindingKind::Hide,
        Binding::new("$store.source.gallery.total")
            .with_condition(Condition::LessThan)
            .with_value(Expression::text("1")),
    )
    .with_binding(BindingKind::Show, Binding::new("$store.ready"));

    assert_stable(&element);
}

#[test]
fn test_decode_external_document() {
    let value = json!({
        "kind": "Box",
        "id": "root",
        "children": [
            { "kind": "Image", "id": "logo", "tag": "logo", "data": { "src": "l.png" } },
            { "kind": "Text", "id": "t", "data": { "text": { "value": [{ "kind": "text", "value": "Hi" }] } } },
        ],
        "events": [{ "id": "e1", "kind": "mouse-enter", "actions": [
            { "kind": "Animation", "id": "a1", "animationName": "pulse" },
        ]}],
        "bindings": { "class": { "fromStateName": "$store.x", "class": "on" } },
    });
    let root = Element::deserialize(&value).unwrap();

    let logo = root.find_by_tag("logo").unwrap();
    assert_eq!(logo.kind, ElementKind::Image { src: "l.png".into(), alt: String::new() });

    let action = &root.events[0].actions[0];
    let animation = action.as_variant::<AnimationAction>().unwrap();
    assert_eq!(animation.animation_name, "pulse");
    assert_eq!(animation.target, AnimationTarget::SelfElement);

    let binding = root.binding(BindingKind::Class).unwrap();
    assert_eq!(binding.condition, Condition::Equals);
    assert_eq!(binding.class.as_deref(), Some("on"));
}

// ============================================================================
// LOOKUPS
// ============================================================================

#[test]
fn test_find_first_in_preorder() {
    let tree = boxed(vec![
        boxed(vec![boxed(vec![txt("deep").with_tag("t")])]),
        txt("shallow").with_tag("t"),
    ]);
    let found = tree.find_by_tag("t").unwrap();
    assert_eq!(found.kind, ElementKind::Text { text: Expression::text("deep") });
}

#[test]
fn test_find_with_predicate() {
    let tree = boxed(vec![txt("a"), img("x.png"), img("y.png")]);
    let second = tree
        .find(|e| matches!(&e.kind, ElementKind::Image { src, .. } if src == "y.png"))
        .unwrap();
    assert_eq!(second.kind_name(), "Image");
    assert!(tree.find(|e| e.kind_name() == "Form").is_none());
}

#[test]
fn test_find_event_owner() {
    let event = Event::new(EventKind::Submit);
    let event_id = event.id.clone();
    let owner = form(vec![submit("Go")]).with_event(event);
    let owner_id = owner.id.clone();
    let tree = boxed(vec![txt("x"), owner]);

    assert_eq!(tree.find_event_owner(&event_id).map(|e| &e.id), Some(&owner_id));
}

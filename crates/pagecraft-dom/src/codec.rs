//! Page JSON codec
//!
//! Every element carries `kind` and `id`; actions embed their `kind`;
//! bindings are an object keyed by binding kind. Decoding is the exact left
//! inverse of [`Element::serialize`].

use std::collections::{BTreeMap, HashSet};
use std::sync::Arc;

use serde_json::{Map, Value, json};

use crate::{
    ActionRegistry, Binding, BindingKind, DecodeError, DecodeResult, Element, ElementKind, Event, EventKind, Id,
    RepeatFrom, Style,
};

impl Element {
    /// Serialize this subtree to its JSON page form
    pub fn serialize(&self) -> Value {
        let mut map = Map::new();
        map.insert("kind".into(), json!(self.kind_name()));
        map.insert("id".into(), json!(self.id));
        if let Some(tag) = &self.tag {
            map.insert("tag".into(), json!(tag));
        }
        if let Ok(Value::Object(mut kind)) = serde_json::to_value(&self.kind) {
            if let Some(data) = kind.remove("data") {
                map.insert("data".into(), data);
            }
        }
        map.insert(
            "children".into(),
            Value::Array(self.children.iter().map(|c| c.serialize()).collect()),
        );
        map.insert(
            "events".into(),
            Value::Array(self.events.iter().map(Event::serialize).collect()),
        );
        let bindings: Map<String, Value> = self
            .bindings
            .iter()
            .map(|(kind, binding)| (kind.as_str().to_string(), json!(binding)))
            .collect();
        map.insert("bindings".into(), Value::Object(bindings));
        if let Some(repeat) = &self.repeat_from {
            map.insert("repeatFrom".into(), json!(repeat));
        }
        if !self.style.is_empty() {
            map.insert("style".into(), json!(self.style));
        }
        Value::Object(map)
    }

    /// Rebuild an element tree, failing on the first malformed node
    pub fn deserialize(value: &Value) -> DecodeResult<Element> {
        Decoder::strict(ActionRegistry::shared()).element(value)
    }

    /// Parse and rebuild an element tree from JSON text
    pub fn from_json(text: &str) -> DecodeResult<Element> {
        let value: Value = serde_json::from_str(text)?;
        Self::deserialize(&value)
    }

    /// Rebuild an element tree, dropping malformed nodes
    ///
    /// Only a malformed root fails the whole document.
    pub fn deserialize_lenient(value: &Value) -> DecodeResult<Decoded> {
        let mut decoder = Decoder::lenient(ActionRegistry::shared());
        let root = decoder.element(value)?;
        Ok(Decoded {
            root,
            errors: decoder.into_errors(),
        })
    }
}

impl Event {
    /// `{id, kind, actions}`
    pub fn serialize(&self) -> Value {
        json!({
            "id": self.id,
            "kind": self.kind,
            "actions": self.actions.iter().map(|a| a.serialize()).collect::<Vec<_>>(),
        })
    }
}

/// Result of a lenient decode
#[derive(Debug)]
pub struct Decoded {
    pub root: Element,
    /// Nodes that were dropped
    pub errors: Vec<DecodeError>,
}

/// Page decoder
///
/// In lenient mode a malformed child element or action is dropped and its
/// error recorded; in strict mode the first error is returned. Element ids
/// must be unique across everything one decoder reads.
#[derive(Debug)]
pub struct Decoder<'r> {
    registry: &'r ActionRegistry,
    lenient: bool,
    errors: Vec<DecodeError>,
    seen: HashSet<Id>,
}

impl<'r> Decoder<'r> {
    pub fn strict(registry: &'r ActionRegistry) -> Self {
        Self {
            registry,
            lenient: false,
            errors: Vec::new(),
            seen: HashSet::new(),
        }
    }

    pub fn lenient(registry: &'r ActionRegistry) -> Self {
        Self {
            registry,
            lenient: true,
            errors: Vec::new(),
            seen: HashSet::new(),
        }
    }

    /// Errors recorded while decoding leniently
    pub fn errors(&self) -> &[DecodeError] {
        &self.errors
    }

    pub fn into_errors(self) -> Vec<DecodeError> {
        self.errors
    }

    /// Decode a root element
    pub fn element(&mut self, value: &Value) -> DecodeResult<Element> {
        self.decode_element(value, "$")
    }

    /// Decode one event
    pub fn event(&mut self, value: &Value, path: &str) -> DecodeResult<Event> {
        let map = object(value, path, "event")?;
        let id = id_field(map, path)?;
        let kind = match map.get("kind") {
            Some(kind) => serde_json::from_value::<EventKind>(kind.clone())
                .map_err(|err| DecodeError::invalid(path, "kind", err))?,
            None => {
                return Err(DecodeError::MissingField {
                    path: path.to_string(),
                    field: "kind",
                })
            }
        };
        let actions = self.actions(map.get("actions"), path)?;
        Ok(Event { id, kind, actions })
    }

    /// Decode an action list found at `{path}.actions` (or another field)
    pub fn actions(&mut self, value: Option<&Value>, path: &str) -> DecodeResult<Vec<crate::Action>> {
        self.action_list(value, path, "actions")
    }

    pub(crate) fn action_list(
        &mut self,
        value: Option<&Value>,
        path: &str,
        field: &str,
    ) -> DecodeResult<Vec<crate::Action>> {
        let items = array(value, path, field)?;
        let mut actions = Vec::with_capacity(items.len());
        for (i, item) in items.iter().enumerate() {
            let item_path = format!("{path}.{field}[{i}]");
            match self.registry.decode(item, &item_path) {
                Ok(action) => actions.push(action),
                Err(err) => self.recover(err)?,
            }
        }
        Ok(actions)
    }

    fn decode_element(&mut self, value: &Value, path: &str) -> DecodeResult<Element> {
        let map = object(value, path, "element")?;
        let kind_name = match map.get("kind") {
            Some(Value::String(kind)) => kind.as_str(),
            Some(_) => return Err(DecodeError::invalid(path, "kind", "expected a string")),
            None => {
                return Err(DecodeError::MissingField {
                    path: path.to_string(),
                    field: "kind",
                })
            }
        };
        if !ElementKind::NAMES.contains(&kind_name) {
            return Err(DecodeError::UnknownElementKind {
                path: path.to_string(),
                kind: kind_name.to_string(),
            });
        }
        let id = id_field(map, path)?;
        if !self.seen.insert(id.clone()) {
            return Err(DecodeError::DuplicateId {
                path: path.to_string(),
                id: id.to_string(),
            });
        }
        let tag = match map.get("tag") {
            None | Some(Value::Null) => None,
            Some(Value::String(tag)) => Some(tag.clone()),
            Some(_) => return Err(DecodeError::invalid(path, "tag", "expected a string")),
        };
        let data = map.get("data").cloned().unwrap_or_else(|| json!({}));
        let kind: ElementKind = serde_json::from_value(json!({ "kind": kind_name, "data": data }))
            .map_err(|err| DecodeError::invalid(path, "data", err))?;

        let child_values = array(map.get("children"), path, "children")?;
        if kind.is_leaf() && !child_values.is_empty() {
            return Err(DecodeError::LeafWithChildren {
                path: path.to_string(),
                kind: kind_name.to_string(),
            });
        }
        let mut children = Vec::with_capacity(child_values.len());
        for (i, child) in child_values.iter().enumerate() {
            match self.decode_element(child, &format!("{path}.children[{i}]")) {
                Ok(element) => children.push(Arc::new(element)),
                Err(err) => self.recover(err)?,
            }
        }

        let mut events = Vec::new();
        for (i, event) in array(map.get("events"), path, "events")?.iter().enumerate() {
            match self.event(event, &format!("{path}.events[{i}]")) {
                Ok(event) => events.push(event),
                Err(err) => self.recover(err)?,
            }
        }

        let bindings = bindings(map.get("bindings"), path)?;
        let repeat_from = match map.get("repeatFrom") {
            None | Some(Value::Null) => None,
            Some(value) => Some(
                serde_json::from_value::<RepeatFrom>(value.clone())
                    .map_err(|err| DecodeError::invalid(path, "repeatFrom", err))?,
            ),
        };
        let style = match map.get("style") {
            None | Some(Value::Null) => Style::default(),
            Some(value) => serde_json::from_value::<Style>(value.clone())
                .map_err(|err| DecodeError::invalid(path, "style", err))?,
        };

        Ok(Element {
            id,
            tag,
            kind,
            children,
            events,
            bindings,
            repeat_from,
            style,
        })
    }

    /// Record a node failure in lenient mode, propagate it otherwise
    fn recover(&mut self, err: DecodeError) -> DecodeResult<()> {
        if !self.lenient {
            return Err(err);
        }
        tracing::warn!("Dropping malformed node: {}", err);
        self.errors.push(err);
        Ok(())
    }
}

fn object<'v>(value: &'v Value, path: &str, what: &str) -> DecodeResult<&'v Map<String, Value>> {
    value
        .as_object()
        .ok_or_else(|| DecodeError::invalid(path, what, "expected an object"))
}

fn array<'v>(value: Option<&'v Value>, path: &str, field: &str) -> DecodeResult<&'v [Value]> {
    match value {
        None | Some(Value::Null) => Ok(&[]),
        Some(Value::Array(items)) => Ok(items),
        Some(_) => Err(DecodeError::invalid(path, field, "expected an array")),
    }
}

pub(crate) fn id_field(map: &Map<String, Value>, path: &str) -> DecodeResult<Id> {
    match map.get("id") {
        Some(Value::String(id)) => Ok(Id::from(id.as_str())),
        Some(_) => Err(DecodeError::invalid(path, "id", "expected a string")),
        None => Err(DecodeError::MissingField {
            path: path.to_string(),
            field: "id",
        }),
    }
}

fn bindings(value: Option<&Value>, path: &str) -> DecodeResult<BTreeMap<BindingKind, Binding>> {
    let map = match value {
        None | Some(Value::Null) => return Ok(BTreeMap::new()),
        Some(Value::Object(map)) => map,
        Some(_) => return Err(DecodeError::invalid(path, "bindings", "expected an object")),
    };
    let mut out = BTreeMap::new();
    for (key, binding) in map {
        // The editor stores removed bindings as null.
        if binding.is_null() {
            continue;
        }
        let kind = serde_json::from_value::<BindingKind>(Value::String(key.clone()))
            .map_err(|err| DecodeError::invalid(path, format!("bindings.{key}"), err))?;
        let binding = serde_json::from_value::<Binding>(binding.clone())
            .map_err(|err| DecodeError::invalid(path, format!("bindings.{key}"), err))?;
        out.insert(kind, binding);
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        Action, AnimationAction, Condition, Expression, boxed, button, img, link, txt,
    };

    fn sample() -> Element {
        let action = Action::with_id("a1", AnimationAction::new("fade"));
        boxed(vec![
            img("logo.png").with_tag("logo").with_alt("Logo"),
            link().with_href("#").with_text("Home"),
            txt("Hi {{$store.user.name}}").with_binding(
                BindingKind::Class,
                Binding::new("$store.user.vip")
                    .with_condition(Condition::Equals)
                    .with_value(Expression::text("true"))
                    .with_class("gold"),
            ),
        ])
        .with_id("root")
        .with_event(Event::new(EventKind::Click).with_action(action))
        .with_repeat_from(RepeatFrom::from_state("$store.source.items"))
        .with_css([("display", "flex")])
    }

    #[test]
    fn test_roundtrip() {
        let tree = sample();
        let value = tree.serialize();
        let decoded = Element::deserialize(&value).unwrap();
        assert_eq!(decoded, tree);
        assert_eq!(decoded.serialize(), value);
    }

    #[test]
    fn test_serialized_shape() {
        let value = sample().serialize();
        assert_eq!(value["kind"], "Box");
        assert_eq!(value["id"], "root");
        assert_eq!(value["children"][0]["data"], json!({ "src": "logo.png", "alt": "Logo" }));
        assert_eq!(value["children"][0]["tag"], "logo");
        assert_eq!(value["events"][0]["kind"], "click");
        assert_eq!(value["events"][0]["actions"][0]["kind"], "Animation");
        assert_eq!(value["children"][2]["bindings"]["class"]["class"], "gold");
        assert_eq!(value["repeatFrom"], json!({ "name": "$store.source.items", "iterator": "itemsItem" }));
        assert_eq!(value["data"], json!({}));
    }

    #[test]
    fn test_unknown_element_kind() {
        let value = json!({ "kind": "Marquee", "id": "m" });
        let err = Element::deserialize(&value).unwrap_err();
        assert_eq!(
            err,
            DecodeError::UnknownElementKind { path: "$".into(), kind: "Marquee".into() }
        );
    }

    #[test]
    fn test_leaf_with_children_rejected() {
        let value = json!({
            "kind": "Text", "id": "t",
            "children": [{ "kind": "Box", "id": "b" }],
        });
        assert!(matches!(
            Element::deserialize(&value),
            Err(DecodeError::LeafWithChildren { .. })
        ));
    }

    #[test]
    fn test_button_keeps_children() {
        let tree = button().with_text("Buy").with_child(img("cart.svg")).with_id("buy");
        assert_eq!(tree.children.len(), 1);

        let decoded = Element::deserialize(&tree.serialize()).unwrap();
        assert_eq!(decoded, tree);
        assert_eq!(decoded.children[0].kind_name(), "Image");
    }

    #[test]
    fn test_duplicate_ids_rejected() {
        let value = json!({
            "kind": "Box", "id": "root",
            "children": [
                { "kind": "Box", "id": "x" },
                { "kind": "Box", "id": "x", "children": [{ "kind": "Box", "id": "inner" }] },
                { "kind": "Box", "id": "root" },
            ],
        });
        assert_eq!(
            Element::deserialize(&value).unwrap_err(),
            DecodeError::DuplicateId { path: "$.children[1]".into(), id: "x".into() }
        );

        let decoded = Element::deserialize_lenient(&value).unwrap();
        assert_eq!(decoded.root.children.len(), 1);
        assert!(decoded.root.find_by_id(&Id::from("inner")).is_none());
        let paths: Vec<_> = decoded.errors.iter().map(DecodeError::path).collect();
        assert_eq!(paths, ["$.children[1]", "$.children[2]"]);
    }

    #[test]
    fn test_lenient_drops_bad_nodes() {
        let value = json!({
            "kind": "Box", "id": "root",
            "children": [
                { "kind": "Box", "id": "ok" },
                { "kind": "Marquee", "id": "bad" },
            ],
            "events": [{
                "id": "e1", "kind": "click",
                "actions": [
                    { "kind": "Teleport", "id": "x" },
                    { "kind": "Toggle state", "id": "y", "stateName": "open" },
                ],
            }],
        });
        assert!(Element::deserialize(&value).is_err());

        let decoded = Element::deserialize_lenient(&value).unwrap();
        assert_eq!(decoded.root.children.len(), 1);
        assert_eq!(decoded.root.events[0].actions.len(), 1);
        assert_eq!(decoded.errors.len(), 2);
        assert_eq!(decoded.errors[0].path(), "$.children[1]");
        assert_eq!(decoded.errors[1].path(), "$.events[0].actions[0]");
    }

    #[test]
    fn test_null_binding_is_absent() {
        let value = json!({ "kind": "Box", "id": "b", "bindings": { "show": null } });
        let element = Element::deserialize(&value).unwrap();
        assert!(element.bindings.is_empty());
    }

    #[test]
    fn test_unknown_binding_kind() {
        let value = json!({ "kind": "Box", "id": "b", "bindings": { "blink": {} } });
        assert!(matches!(
            Element::deserialize(&value),
            Err(DecodeError::InvalidField { .. })
        ));
    }

    #[test]
    fn test_from_json_text() {
        let element = Element::from_json(r#"{"kind":"Submit","id":"s","data":{"text":"Send"}}"#).unwrap();
        assert_eq!(element.kind, ElementKind::Submit { text: "Send".into() });
        assert!(matches!(Element::from_json("{"), Err(DecodeError::Json(_))));
    }
}

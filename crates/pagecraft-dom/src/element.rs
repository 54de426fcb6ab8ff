//! Element node
//!
//! One node of the page tree. An element owns its children, events,
//! bindings and repeat metadata; the variant payload lives in
//! [`ElementKind`].

use std::collections::BTreeMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::{Binding, BindingKind, Event, Expression, Id, SOURCE_STATE_PREFIX};

/// Variant payload of an element
///
/// Serialized as `{"kind": <variant>, "data": {...}}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "data", rename_all_fields = "camelCase")]
pub enum ElementKind {
    Box {},
    Text {
        #[serde(default)]
        text: Expression,
    },
    Image {
        #[serde(default)]
        src: String,
        #[serde(default)]
        alt: String,
    },
    Link {
        #[serde(default)]
        href: String,
        #[serde(default)]
        open_in_new_tab: bool,
    },
    Button {
        #[serde(default)]
        text: String,
    },
    Input {
        #[serde(default)]
        name: String,
        #[serde(default)]
        input_type: String,
        #[serde(default)]
        placeholder: String,
        #[serde(default)]
        value: String,
    },
    Form {},
    Submit {
        #[serde(default)]
        text: String,
    },
}

impl ElementKind {
    /// All variant names
    pub const NAMES: [&'static str; 8] = [
        "Box", "Text", "Image", "Link", "Button", "Input", "Form", "Submit",
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Self::Box {} => "Box",
            Self::Text { .. } => "Text",
            Self::Image { .. } => "Image",
            Self::Link { .. } => "Link",
            Self::Button { .. } => "Button",
            Self::Input { .. } => "Input",
            Self::Form {} => "Form",
            Self::Submit { .. } => "Submit",
        }
    }

    /// Leaf kinds never have children
    pub fn is_leaf(&self) -> bool {
        matches!(
            self,
            Self::Text { .. } | Self::Image { .. } | Self::Input { .. } | Self::Submit { .. }
        )
    }
}

/// Repeat the element once per item of a collection state
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepeatFrom {
    /// Source state path
    pub name: String,
    /// Loop variable name
    pub iterator: String,
}

impl RepeatFrom {
    /// Repeat over `name`, deriving the loop variable from the path
    ///
    /// `$store.source.users.list` iterates as `users_listItem`.
    pub fn from_state(name: impl Into<String>) -> Self {
        Self::from_state_with_prefix(name, SOURCE_STATE_PREFIX)
    }

    /// Like [`RepeatFrom::from_state`] with a custom source prefix
    pub fn from_state_with_prefix(name: impl Into<String>, prefix: &str) -> Self {
        let name = name.into();
        let stem = name.strip_prefix(prefix).unwrap_or(&name);
        let iterator = if stem.is_empty() {
            String::new()
        } else {
            format!("{}Item", stem.replace('.', "_"))
        };
        Self { name, iterator }
    }
}

/// Style properties for one viewport
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Viewport {
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub default: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub hover: BTreeMap<String, String>,
}

impl Viewport {
    pub fn is_empty(&self) -> bool {
        self.default.is_empty() && self.hover.is_empty()
    }
}

/// Opaque per-viewport style data
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Style {
    #[serde(default, skip_serializing_if = "Viewport::is_empty")]
    pub desktop: Viewport,
    #[serde(default, skip_serializing_if = "Viewport::is_empty")]
    pub tablet: Viewport,
    #[serde(default, skip_serializing_if = "Viewport::is_empty")]
    pub mobile: Viewport,
}

impl Style {
    pub fn is_empty(&self) -> bool {
        self.desktop.is_empty() && self.tablet.is_empty() && self.mobile.is_empty()
    }
}

/// Page element
#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    pub id: Id,
    /// Author-assigned name for structural lookups; not unique
    pub tag: Option<String>,
    pub kind: ElementKind,
    pub children: Vec<Arc<Element>>,
    pub events: Vec<Event>,
    pub bindings: BTreeMap<BindingKind, Binding>,
    pub repeat_from: Option<RepeatFrom>,
    pub style: Style,
}

impl Element {
    /// Create an element with a fresh id
    pub fn new(kind: ElementKind) -> Self {
        Self {
            id: Id::new(),
            tag: None,
            kind,
            children: Vec::new(),
            events: Vec::new(),
            bindings: BTreeMap::new(),
            repeat_from: None,
            style: Style::default(),
        }
    }

    pub fn kind_name(&self) -> &'static str {
        self.kind.name()
    }

    pub fn is_leaf(&self) -> bool {
        self.kind.is_leaf()
    }

    /// First element in document order matching `pred`
    ///
    /// Searches depth-first, parent before children, children left to
    /// right, starting with `self`.
    pub fn find<P>(&self, pred: P) -> Option<&Element>
    where
        P: Fn(&Element) -> bool,
    {
        self.iter().find(|e| pred(e))
    }

    /// First element in document order carrying `tag`
    pub fn find_by_tag(&self, tag: &str) -> Option<&Element> {
        self.find(|e| e.tag.as_deref() == Some(tag))
    }

    /// Element with `id` in this subtree
    pub fn find_by_id(&self, id: &Id) -> Option<&Element> {
        self.find(|e| e.id == *id)
    }

    pub fn contains(&self, id: &Id) -> bool {
        self.find_by_id(id).is_some()
    }

    /// Element owning the event `event_id` in this subtree
    pub fn find_event_owner(&self, event_id: &Id) -> Option<&Element> {
        self.find(|e| e.event(event_id).is_some())
    }

    /// Child indices from `self` down to the element `id`
    pub fn path_to(&self, id: &Id) -> Option<Vec<usize>> {
        if self.id == *id {
            return Some(Vec::new());
        }
        self.children.iter().enumerate().find_map(|(i, child)| {
            child.path_to(id).map(|mut path| {
                path.insert(0, i);
                path
            })
        })
    }

    /// Pre-order iterator over this subtree
    pub fn iter(&self) -> Iter<'_> {
        Iter { stack: vec![self] }
    }

    /// Number of elements in this subtree
    pub fn len(&self) -> usize {
        1 + self.children.iter().map(|c| c.len()).sum::<usize>()
    }

    /// Always false: a subtree holds at least its root
    pub fn is_empty(&self) -> bool {
        false
    }

    pub fn event(&self, id: &Id) -> Option<&Event> {
        self.events.iter().find(|e| e.id == *id)
    }

    pub fn binding(&self, kind: BindingKind) -> Option<&Binding> {
        self.bindings.get(&kind)
    }

    /// Binding kinds not yet used on this element
    pub fn remaining_binding_kinds(&self) -> impl Iterator<Item = BindingKind> + '_ {
        BindingKind::ALL
            .into_iter()
            .filter(|kind| !self.bindings.contains_key(kind))
    }
}

/// Pre-order element iterator
#[derive(Debug)]
pub struct Iter<'a> {
    stack: Vec<&'a Element>,
}

impl<'a> Iterator for Iter<'a> {
    type Item = &'a Element;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        self.stack.extend(node.children.iter().rev().map(|c| c.as_ref()));
        Some(node)
    }
}

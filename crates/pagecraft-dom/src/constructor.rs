//! Element constructors
//!
//! Shorthand builders used to assemble component templates:
//!
//! ```rust,ignore
//! let logo = img("https://example.com/logo.png")
//!     .with_tag("logo")
//!     .with_alt("Logo")
//!     .with_css([("maxWidth", "100px")]);
//! let footer = column(vec![logo, link().with_href("#").with_text("Home")]);
//! ```

use std::sync::Arc;

use crate::{Binding, BindingKind, Element, ElementKind, Event, Expression, Id, RepeatFrom};

/// Container element
pub fn boxed(children: Vec<Element>) -> Element {
    Element::new(ElementKind::Box {}).with_children(children)
}

/// Container laying children out top to bottom
pub fn column(children: Vec<Element>) -> Element {
    boxed(children).with_css([("display", "flex"), ("flexDirection", "column")])
}

/// Container laying children out in `columns` equal tracks
pub fn grid(columns: usize, children: Vec<Element>) -> Element {
    boxed(children).with_css([
        ("display", "grid".to_string()),
        ("gridTemplateColumns", format!("repeat({columns}, 1fr)")),
    ])
}

/// Text element; `{{path}}` references state
pub fn txt(text: &str) -> Element {
    Element::new(ElementKind::Text {
        text: Expression::parse(text),
    })
}

pub fn img(src: &str) -> Element {
    Element::new(ElementKind::Image {
        src: src.to_string(),
        alt: String::new(),
    })
}

pub fn link() -> Element {
    Element::new(ElementKind::Link {
        href: String::new(),
        open_in_new_tab: false,
    })
}

pub fn button() -> Element {
    Element::new(ElementKind::Button { text: String::new() })
}

pub fn input() -> Element {
    Element::new(ElementKind::Input {
        name: String::new(),
        input_type: "text".to_string(),
        placeholder: String::new(),
        value: String::new(),
    })
}

pub fn form(children: Vec<Element>) -> Element {
    Element::new(ElementKind::Form {}).with_children(children)
}

pub fn submit(text: &str) -> Element {
    Element::new(ElementKind::Submit { text: text.to_string() })
}

impl Element {
    pub fn with_id(mut self, id: impl Into<Id>) -> Self {
        self.id = id.into();
        self
    }

    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = Some(tag.into());
        self
    }

    /// Add a child; leaves ignore it
    pub fn with_child(mut self, child: Element) -> Self {
        if self.is_leaf() {
            tracing::warn!("Ignoring child of leaf {} element {}", self.kind_name(), self.id);
            return self;
        }
        self.children.push(Arc::new(child));
        self
    }

    pub fn with_children(self, children: Vec<Element>) -> Self {
        children.into_iter().fold(self, Element::with_child)
    }

    pub fn with_event(mut self, event: Event) -> Self {
        self.events.push(event);
        self
    }

    /// Set the binding for `kind`, replacing any previous one
    pub fn with_binding(mut self, kind: BindingKind, binding: Binding) -> Self {
        self.bindings.insert(kind, binding);
        self
    }

    pub fn with_repeat_from(mut self, repeat_from: RepeatFrom) -> Self {
        self.repeat_from = Some(repeat_from);
        self
    }

    /// Desktop style properties
    pub fn with_css<K, V>(mut self, props: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        extend(&mut self.style.desktop.default, props);
        self
    }

    pub fn with_css_tablet<K, V>(mut self, props: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        extend(&mut self.style.tablet.default, props);
        self
    }

    pub fn with_css_mobile<K, V>(mut self, props: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        extend(&mut self.style.mobile.default, props);
        self
    }

    /// Desktop hover style properties
    pub fn with_css_hover<K, V>(mut self, props: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        extend(&mut self.style.desktop.hover, props);
        self
    }

    /// Alternative text; images only
    pub fn with_alt(mut self, text: &str) -> Self {
        if let ElementKind::Image { alt, .. } = &mut self.kind {
            *alt = text.to_string();
        }
        self
    }

    /// Link target; links only
    pub fn with_href(mut self, url: &str) -> Self {
        if let ElementKind::Link { href, .. } = &mut self.kind {
            *href = url.to_string();
        }
        self
    }

    /// Set the visible text
    ///
    /// Text, button and submit elements store it directly; other containers
    /// get a text child.
    pub fn with_text(mut self, value: &str) -> Self {
        match &mut self.kind {
            ElementKind::Text { text } => *text = Expression::parse(value),
            ElementKind::Button { text } | ElementKind::Submit { text } => *text = value.to_string(),
            ElementKind::Box {} | ElementKind::Link { .. } | ElementKind::Form {} => {
                return self.with_child(txt(value));
            }
            ElementKind::Image { .. } | ElementKind::Input { .. } => {}
        }
        self
    }
}

fn extend<K, V>(map: &mut std::collections::BTreeMap<String, String>, props: impl IntoIterator<Item = (K, V)>)
where
    K: Into<String>,
    V: Into<String>,
{
    map.extend(props.into_iter().map(|(k, v)| (k.into(), v.into())));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_leaf_refuses_children() {
        let text = txt("hi").with_child(boxed(vec![]));
        assert!(text.children.is_empty());
    }

    #[test]
    fn test_link_text_becomes_child() {
        let l = link().with_href("#").with_text("Home");
        assert_eq!(l.children.len(), 1);
        assert_eq!(l.children[0].kind_name(), "Text");
        assert_eq!(l.kind, ElementKind::Link { href: "#".into(), open_in_new_tab: false });
    }

    #[test]
    fn test_button_is_a_container() {
        let b = button().with_text("Add").with_child(txt("+"));
        assert_eq!(b.children.len(), 1);
        assert_eq!(b.kind, ElementKind::Button { text: "Add".into() });
    }

    #[test]
    fn test_css_layers() {
        let e = boxed(vec![])
            .with_css([("width", "50%")])
            .with_css_tablet([("width", "80%")])
            .with_css_mobile([("width", "100%")])
            .with_css_hover([("opacity", "0.5")]);
        assert_eq!(e.style.desktop.default["width"], "50%");
        assert_eq!(e.style.tablet.default["width"], "80%");
        assert_eq!(e.style.mobile.default["width"], "100%");
        assert_eq!(e.style.desktop.hover["opacity"], "0.5");
    }

    #[test]
    fn test_grid_columns() {
        let g = grid(3, vec![txt("a")]);
        assert_eq!(g.style.desktop.default["gridTemplateColumns"], "repeat(3, 1fr)");
        assert_eq!(g.children.len(), 1);
    }

    #[test]
    fn test_binding_overwrites_same_kind() {
        let e = boxed(vec![])
            .with_binding(BindingKind::Show, Binding::new("a"))
            .with_binding(BindingKind::Show, Binding::new("b"));
        assert_eq!(e.bindings.len(), 1);
        assert_eq!(e.bindings[&BindingKind::Show].from_state_name, "b");
    }
}

//! Update protocol
//!
//! Each function takes the current root and an address, and returns a new
//! root with exactly that address changed. The path from the root to the
//! changed element is copied; every other subtree is reused by reference.

use std::sync::Arc;

use pagecraft_dom::{Action, Binding, BindingKind, Element, Event, Id, Ids, RepeatFrom};

/// Apply `f` to the first element (pre-order) matching `pred`
///
/// `f` returns `None` to leave the element unchanged.
fn modify_where<P, F>(op: &'static str, root: &Arc<Element>, pred: P, f: F) -> Arc<Element>
where
    P: Fn(&Element) -> bool,
    F: FnOnce(&Element) -> Option<Element>,
{
    let mut f = Some(f);
    match rewrite(root, &pred, &mut f) {
        Some(new_root) => new_root,
        None => {
            tracing::debug!("{}: nothing to change", op);
            Arc::clone(root)
        }
    }
}

/// Rebuild `node` if the target below it changed
///
/// `f` is consumed when the target is reached; later siblings are not
/// visited after that.
fn rewrite<P, F>(node: &Arc<Element>, pred: &P, f: &mut Option<F>) -> Option<Arc<Element>>
where
    P: Fn(&Element) -> bool,
    F: FnOnce(&Element) -> Option<Element>,
{
    if pred(node.as_ref()) {
        let f = f.take()?;
        return f(node.as_ref()).map(Arc::new);
    }
    for (index, child) in node.children.iter().enumerate() {
        if let Some(new_child) = rewrite(child, pred, f) {
            return Some(with_child_at(node, index, new_child));
        }
        if f.is_none() {
            return None;
        }
    }
    None
}

/// Copy of `node` with the child at `index` swapped
fn with_child_at(node: &Element, index: usize, child: Arc<Element>) -> Arc<Element> {
    let mut copy = node.clone();
    copy.children[index] = child;
    Arc::new(copy)
}

/// Apply `f` to the element `id`
pub fn modify_element<F>(root: &Arc<Element>, id: &Id, f: F) -> Arc<Element>
where
    F: FnOnce(&Element) -> Option<Element>,
{
    modify_where("modify_element", root, |e| e.id == *id, f)
}

/// Replace the fields of the action at `ids`, keeping its id
///
/// The owning element is found anywhere in the tree. Never appends.
pub fn update_action(root: &Arc<Element>, ids: &Ids, action: Action) -> Arc<Element> {
    modify_where(
        "update_action",
        root,
        |e| e.event(&ids.event).is_some(),
        |element| {
            let index = element.events.iter().position(|e| e.id == ids.event)?;
            let event = element.events[index].with_action_replaced(&ids.action, action)?;
            let mut copy = element.clone();
            copy.events[index] = event;
            Some(copy)
        },
    )
}

/// Append an action to the event `event_id`
pub fn add_action(root: &Arc<Element>, event_id: &Id, action: Action) -> Arc<Element> {
    modify_where(
        "add_action",
        root,
        |e| e.event(event_id).is_some(),
        |element| {
            let mut copy = element.clone();
            let event = copy.events.iter_mut().find(|e| e.id == *event_id)?;
            event.actions.push(action);
            Some(copy)
        },
    )
}

/// Remove the action at `ids`
pub fn remove_action(root: &Arc<Element>, ids: &Ids) -> Arc<Element> {
    modify_where(
        "remove_action",
        root,
        |e| e.event(&ids.event).is_some(),
        |element| {
            let index = element.events.iter().position(|e| e.id == ids.event)?;
            let event = element.events[index].without_action(&ids.action)?;
            let mut copy = element.clone();
            copy.events[index] = event;
            Some(copy)
        },
    )
}

/// Append an event to the element `element_id`
pub fn add_event(root: &Arc<Element>, element_id: &Id, event: Event) -> Arc<Element> {
    modify_where(
        "add_event",
        root,
        |e| e.id == *element_id,
        |element| {
            let mut copy = element.clone();
            copy.events.push(event);
            Some(copy)
        },
    )
}

/// Replace the event with `event.id` on the element `element_id`
pub fn edit_event(root: &Arc<Element>, element_id: &Id, event: Event) -> Arc<Element> {
    modify_where(
        "edit_event",
        root,
        |e| e.id == *element_id,
        |element| {
            let index = element.events.iter().position(|e| e.id == event.id)?;
            let mut copy = element.clone();
            copy.events[index] = event;
            Some(copy)
        },
    )
}

/// Remove the event `event_id` from the element `element_id`
pub fn remove_event(root: &Arc<Element>, element_id: &Id, event_id: &Id) -> Arc<Element> {
    modify_where(
        "remove_event",
        root,
        |e| e.id == *element_id,
        |element| {
            let index = element.events.iter().position(|e| e.id == *event_id)?;
            let mut copy = element.clone();
            copy.events.remove(index);
            Some(copy)
        },
    )
}

/// Set the binding for `kind`, overwriting any previous one
pub fn edit_binding(root: &Arc<Element>, element_id: &Id, kind: BindingKind, binding: Binding) -> Arc<Element> {
    modify_where(
        "edit_binding",
        root,
        |e| e.id == *element_id,
        |element| {
            if element.bindings.get(&kind) == Some(&binding) {
                return None;
            }
            let mut copy = element.clone();
            copy.bindings.insert(kind, binding);
            Some(copy)
        },
    )
}

/// Remove the binding for `kind`
pub fn remove_binding(root: &Arc<Element>, element_id: &Id, kind: BindingKind) -> Arc<Element> {
    modify_where(
        "remove_binding",
        root,
        |e| e.id == *element_id,
        |element| {
            if !element.bindings.contains_key(&kind) {
                return None;
            }
            let mut copy = element.clone();
            copy.bindings.remove(&kind);
            Some(copy)
        },
    )
}

/// Set or clear the repeat descriptor
pub fn edit_repeat_from(root: &Arc<Element>, element_id: &Id, repeat_from: Option<RepeatFrom>) -> Arc<Element> {
    modify_where(
        "edit_repeat_from",
        root,
        |e| e.id == *element_id,
        |element| {
            if element.repeat_from == repeat_from {
                return None;
            }
            let mut copy = element.clone();
            copy.repeat_from = repeat_from;
            Some(copy)
        },
    )
}

/// Insert `child` under `parent_id` at `index`
///
/// An index past the end appends. Leaves accept no children, and a subtree
/// reusing an id already in the tree is refused.
pub fn insert_child(root: &Arc<Element>, parent_id: &Id, index: usize, child: Element) -> Arc<Element> {
    if let Some(id) = clashing_id(root, &child, None) {
        tracing::debug!("insert_child: id {} is already in the tree", id);
        return Arc::clone(root);
    }
    modify_where(
        "insert_child",
        root,
        |e| e.id == *parent_id,
        |parent| {
            if parent.is_leaf() {
                tracing::debug!("insert_child: {} element {} is a leaf", parent.kind_name(), parent.id);
                return None;
            }
            let mut copy = parent.clone();
            let index = index.min(copy.children.len());
            copy.children.insert(index, Arc::new(child));
            Some(copy)
        },
    )
}

/// Remove the element `id` and its whole subtree
///
/// The root itself cannot be removed.
pub fn remove_element(root: &Arc<Element>, id: &Id) -> Arc<Element> {
    modify_where(
        "remove_element",
        root,
        |e| e.children.iter().any(|c| c.id == *id),
        |parent| {
            let mut copy = parent.clone();
            copy.children.retain(|c| c.id != *id);
            Some(copy)
        },
    )
}

/// Replace the element with `element.id`, subtree included
///
/// Ids of the new subtree may only repeat ids of the subtree it replaces.
pub fn replace_element(root: &Arc<Element>, element: Element) -> Arc<Element> {
    let id = element.id.clone();
    if let Some(clash) = clashing_id(root, &element, root.find_by_id(&id)) {
        tracing::debug!("replace_element: id {} is already in the tree", clash);
        return Arc::clone(root);
    }
    modify_where("replace_element", root, |e| e.id == id, |_| Some(element))
}

/// First id of `incoming` already used in `root` outside `replaced`
fn clashing_id<'a>(root: &Element, incoming: &'a Element, replaced: Option<&Element>) -> Option<&'a Id> {
    incoming
        .iter()
        .map(|e| &e.id)
        .find(|id| root.contains(id) && !replaced.is_some_and(|r| r.contains(id)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pagecraft_dom::{AnimationAction, EventKind, boxed, txt};

    fn tree() -> (Arc<Element>, Id, Id) {
        let event = Event::new(EventKind::Click).with_action(Action::with_id("a1", AnimationAction::new("fade")));
        let event_id = event.id.clone();
        let target = txt("target").with_event(event);
        let target_id = target.id.clone();
        let root = boxed(vec![boxed(vec![txt("left")]), boxed(vec![target]), txt("right")]);
        (Arc::new(root), target_id, event_id)
    }

    #[test]
    fn test_path_copy_shares_siblings() {
        let (root, target_id, event_id) = tree();
        let new_root = update_action(
            &root,
            &Ids::new(event_id, "a1"),
            Action::with_id("ignored", AnimationAction::new("slide")),
        );

        assert!(!Arc::ptr_eq(&root, &new_root));
        assert!(Arc::ptr_eq(&root.children[0], &new_root.children[0]));
        assert!(!Arc::ptr_eq(&root.children[1], &new_root.children[1]));
        assert!(Arc::ptr_eq(&root.children[2], &new_root.children[2]));

        let action = &new_root.find_by_id(&target_id).unwrap().events[0].actions[0];
        assert_eq!(action.id, "a1");
        assert_eq!(action.as_variant::<AnimationAction>().unwrap().animation_name, "slide");
    }

    #[test]
    fn test_unmatched_returns_same_root() {
        let (root, target_id, event_id) = tree();
        let action = Action::new(AnimationAction::new("slide"));

        let same = update_action(&root, &Ids::new("nope", "a1"), action.clone());
        assert!(Arc::ptr_eq(&root, &same));
        let same = update_action(&root, &Ids::new(event_id.clone(), "nope"), action);
        assert!(Arc::ptr_eq(&root, &same));
        let same = remove_event(&root, &target_id, &Id::from("nope"));
        assert!(Arc::ptr_eq(&root, &same));
        let same = remove_binding(&root, &target_id, BindingKind::Show);
        assert!(Arc::ptr_eq(&root, &same));
        let same = remove_element(&root, &root.id.clone());
        assert!(Arc::ptr_eq(&root, &same));
    }

    #[test]
    fn test_insert_child_clamps_index() {
        let (root, _, _) = tree();
        let parent_id = root.children[0].id.clone();
        let new_root = insert_child(&root, &parent_id, 99, txt("appended"));
        assert_eq!(new_root.children[0].children.len(), 2);
        assert_eq!(new_root.children[0].children[1].kind_name(), "Text");

        let new_root = insert_child(&new_root, &parent_id, 0, boxed(vec![]));
        assert_eq!(new_root.children[0].children[0].kind_name(), "Box");
    }

    #[test]
    fn test_insert_into_leaf_is_noop() {
        let (root, target_id, _) = tree();
        let same = insert_child(&root, &target_id, 0, txt("x"));
        assert!(Arc::ptr_eq(&root, &same));
    }

    #[test]
    fn test_insert_child_into_button() {
        let button = pagecraft_dom::button().with_text("Buy");
        let button_id = button.id.clone();
        let root = Arc::new(boxed(vec![button]));
        let new_root = insert_child(&root, &button_id, 0, txt("icon"));
        assert!(!Arc::ptr_eq(&root, &new_root));
        assert_eq!(new_root.children[0].children.len(), 1);
    }

    #[test]
    fn test_insert_existing_id_is_noop() {
        let (root, target_id, _) = tree();
        let parent_id = root.children[0].id.clone();
        let same = insert_child(&root, &parent_id, 0, txt("a").with_id(target_id.clone()));
        assert!(Arc::ptr_eq(&root, &same));

        // Ids anywhere in the incoming subtree count.
        let nested = boxed(vec![txt("b").with_id(target_id)]);
        let same = insert_child(&root, &parent_id, 0, nested);
        assert!(Arc::ptr_eq(&root, &same));
    }

    #[test]
    fn test_replace_element_keeps_ids_unique() {
        let (root, target_id, _) = tree();
        let container_id = root.children[1].id.clone();
        let left_id = root.children[0].id.clone();

        // Reusing ids from the replaced subtree is fine.
        let moved = boxed(vec![txt("moved").with_id(target_id.clone())]).with_id(container_id.clone());
        let new_root = replace_element(&root, moved);
        assert_eq!(new_root.children[1].children[0].kind_name(), "Text");
        assert_eq!(new_root.iter().filter(|e| e.id == target_id).count(), 1);

        // Pulling in an id from elsewhere is not.
        let stolen = boxed(vec![boxed(vec![]).with_id(left_id)]).with_id(container_id);
        let same = replace_element(&root, stolen);
        assert!(Arc::ptr_eq(&root, &same));
    }

    #[test]
    fn test_remove_element_drops_subtree() {
        let (root, target_id, _) = tree();
        let container = root.children[1].id.clone();
        let new_root = remove_element(&root, &container);
        assert_eq!(new_root.children.len(), 2);
        assert!(!new_root.contains(&target_id));
        assert!(root.contains(&target_id));
    }

    #[test]
    fn test_replace_root() {
        let (root, _, _) = tree();
        let replacement = txt("new").with_id(root.id.clone());
        let new_root = replace_element(&root, replacement.clone());
        assert_eq!(*new_root, replacement);
    }
}

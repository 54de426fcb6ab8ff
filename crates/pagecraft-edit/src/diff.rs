//! Tree diff
//!
//! Compares two versions of a page. Shared subtrees (`Arc::ptr_eq`) are
//! skipped without being walked, so the cost follows the size of the edit.

use std::sync::Arc;

use pagecraft_dom::{Element, Id};

/// Change to one element between two versions
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Change {
    /// Own fields changed (kind, tag, events, bindings, repeat, style)
    Modified(Id),
    /// Element present only in the new version
    Inserted(Id),
    /// Element present only in the old version
    Removed(Id),
}

/// Changes from `old` to `new`, in pre-order of the new tree
///
/// Children are matched by id, so moves within one parent are not
/// reported as changes.
pub fn diff(old: &Arc<Element>, new: &Arc<Element>) -> Vec<Change> {
    let mut changes = Vec::new();
    if old.id != new.id {
        changes.push(Change::Removed(old.id.clone()));
        changes.push(Change::Inserted(new.id.clone()));
        return changes;
    }
    diff_into(old, new, &mut changes);
    changes
}

fn diff_into(old: &Arc<Element>, new: &Arc<Element>, changes: &mut Vec<Change>) {
    // Same reference = no change (structural sharing)
    if Arc::ptr_eq(old, new) {
        return;
    }
    if !same_fields(old, new) {
        changes.push(Change::Modified(new.id.clone()));
    }
    diff_children(old, new, changes);
}

fn same_fields(old: &Element, new: &Element) -> bool {
    old.tag == new.tag
        && old.kind == new.kind
        && old.events == new.events
        && old.bindings == new.bindings
        && old.repeat_from == new.repeat_from
        && old.style == new.style
}

fn diff_children(old: &Element, new: &Element, changes: &mut Vec<Change>) {
    for child in &new.children {
        match old.children.iter().find(|c| c.id == child.id) {
            Some(previous) => diff_into(previous, child, changes),
            None => changes.push(Change::Inserted(child.id.clone())),
        }
    }
    for child in &old.children {
        if !new.children.iter().any(|c| c.id == child.id) {
            changes.push(Change::Removed(child.id.clone()));
        }
    }
}

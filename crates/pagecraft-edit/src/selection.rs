//! Selection and lookup

use pagecraft_dom::{Action, Element, Event, Id, Ids};

/// Selected element ids, most recently selected first
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    ids: Vec<Id>,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Select a single element
    pub fn select(&mut self, id: Id) {
        self.ids.clear();
        self.ids.push(id);
    }

    /// Add an element to the selection
    pub fn extend(&mut self, id: Id) {
        self.ids.retain(|i| *i != id);
        self.ids.insert(0, id);
    }

    pub fn deselect(&mut self, id: &Id) {
        self.ids.retain(|i| i != id);
    }

    pub fn clear(&mut self) {
        self.ids.clear();
    }

    pub fn ids(&self) -> &[Id] {
        &self.ids
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// The active element: the most recent selection still in `tree`
    pub fn current<'t>(&self, tree: &'t Element) -> Option<&'t Element> {
        self.ids.iter().find_map(|id| tree.find_by_id(id))
    }
}

/// Event `event_id` on the active element
pub fn find_event<'t>(tree: &'t Element, selection: &Selection, event_id: &Id) -> Option<&'t Event> {
    selection.current(tree)?.event(event_id)
}

/// Action at `ids` on the active element
pub fn find_action<'t>(tree: &'t Element, selection: &Selection, ids: &Ids) -> Option<&'t Action> {
    find_event(tree, selection, &ids.event)?.action(&ids.action)
}

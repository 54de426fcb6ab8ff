//! State registry
//!
//! Names of the states a page can bind to, with their value kind. Data
//! sources publish states under the source prefix; pages may declare more.

use serde::{Deserialize, Serialize};

use pagecraft_dom::PropertyKind;

/// A named state and the kind of value it holds
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateDescriptor {
    pub name: String,
    pub kind: PropertyKind,
}

impl StateDescriptor {
    pub fn new(name: impl Into<String>, kind: PropertyKind) -> Self {
        Self {
            name: name.into(),
            kind,
        }
    }
}

impl From<(String, PropertyKind)> for StateDescriptor {
    fn from((name, kind): (String, PropertyKind)) -> Self {
        Self { name, kind }
    }
}

/// Known states, in registration order
#[derive(Debug, Clone, Default)]
pub struct StateRegistry {
    prefix: String,
    states: Vec<StateDescriptor>,
}

impl StateRegistry {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            states: Vec::new(),
        }
    }

    /// Add a state; a later state with the same name replaces the earlier one
    pub fn insert(&mut self, state: StateDescriptor) {
        match self.states.iter_mut().find(|s| s.name == state.name) {
            Some(slot) => *slot = state,
            None => self.states.push(state),
        }
    }

    pub fn get(&self, name: &str) -> Option<&StateDescriptor> {
        self.states.iter().find(|s| s.name == name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &StateDescriptor> {
        self.states.iter()
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    /// States an element can repeat over
    pub fn repeat_candidates(&self) -> impl Iterator<Item = &StateDescriptor> {
        self.states.iter().filter(|s| s.kind == PropertyKind::Array)
    }

    /// Name shown in menus, without the source prefix
    pub fn display_name<'a>(&self, name: &'a str) -> &'a str {
        name.strip_prefix(self.prefix.as_str()).unwrap_or(name)
    }
}

impl Extend<StateDescriptor> for StateRegistry {
    fn extend<I: IntoIterator<Item = StateDescriptor>>(&mut self, iter: I) {
        for state in iter {
            self.insert(state);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry() -> StateRegistry {
        let mut states = StateRegistry::new("$store.source.");
        states.extend([
            StateDescriptor::new("$store.source.users", PropertyKind::Object),
            StateDescriptor::new("$store.source.users.list", PropertyKind::Array),
            StateDescriptor::new("menuOpen", PropertyKind::Boolean),
        ]);
        states
    }

    #[test]
    fn test_repeat_candidates_are_arrays() {
        let states = registry();
        let names: Vec<_> = states.repeat_candidates().map(|s| s.name.as_str()).collect();
        assert_eq!(names, ["$store.source.users.list"]);
    }

    #[test]
    fn test_display_name() {
        let states = registry();
        assert_eq!(states.display_name("$store.source.users.list"), "users.list");
        assert_eq!(states.display_name("menuOpen"), "menuOpen");
    }

    #[test]
    fn test_insert_replaces_same_name() {
        let mut states = registry();
        states.insert(StateDescriptor::new("menuOpen", PropertyKind::String));
        assert_eq!(states.len(), 3);
        assert_eq!(states.get("menuOpen").map(|s| s.kind), Some(PropertyKind::String));
    }
}

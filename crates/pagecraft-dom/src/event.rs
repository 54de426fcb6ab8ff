//! Element events
//!
//! An event attaches an ordered list of actions to one trigger on an element.

use serde::{Deserialize, Serialize};

use crate::{Action, Id};

/// Event trigger types
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EventKind {
    #[default]
    Click,
    MouseEnter,
    MouseLeave,
    KeyDown,
    Change,
    Submit,
    Load,
    Intersection,
}

impl EventKind {
    /// All triggers, in menu order
    pub const ALL: [EventKind; 8] = [
        Self::Click,
        Self::MouseEnter,
        Self::MouseLeave,
        Self::KeyDown,
        Self::Change,
        Self::Submit,
        Self::Load,
        Self::Intersection,
    ];

    /// Serialized name
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Click => "click",
            Self::MouseEnter => "mouse-enter",
            Self::MouseLeave => "mouse-leave",
            Self::KeyDown => "key-down",
            Self::Change => "change",
            Self::Submit => "submit",
            Self::Load => "load",
            Self::Intersection => "intersection",
        }
    }

    /// Menu label
    pub fn label(self) -> &'static str {
        match self {
            Self::Click => "click",
            Self::MouseEnter => "mouse enter",
            Self::MouseLeave => "mouse leave",
            Self::KeyDown => "key down",
            Self::Change => "change",
            Self::Submit => "submit",
            Self::Load => "load",
            Self::Intersection => "intersection",
        }
    }
}

/// A trigger with the actions it runs, in execution order
#[derive(Debug, Clone, PartialEq)]
pub struct Event {
    pub id: Id,
    pub kind: EventKind,
    pub actions: Vec<Action>,
}

impl Event {
    /// Create an event with no actions
    pub fn new(kind: EventKind) -> Self {
        Self {
            id: Id::new(),
            kind,
            actions: Vec::new(),
        }
    }

    pub fn with_action(mut self, action: Action) -> Self {
        self.actions.push(action);
        self
    }

    /// Find an action by id
    pub fn action(&self, id: &Id) -> Option<&Action> {
        self.actions.iter().find(|a| a.is(id))
    }

    fn position(&self, id: &Id) -> Option<usize> {
        self.actions.iter().position(|a| a.is(id))
    }

    /// Copy of this event with one action's payload replaced
    ///
    /// The replaced action keeps its id. Returns `None` when no action
    /// has `id`.
    pub fn with_action_replaced(&self, id: &Id, action: Action) -> Option<Event> {
        let index = self.position(id)?;
        let mut event = self.clone();
        event.actions[index] = event.actions[index].with_payload_of(action);
        Some(event)
    }

    /// Copy of this event without the action `id`
    pub fn without_action(&self, id: &Id) -> Option<Event> {
        let index = self.position(id)?;
        let mut event = self.clone();
        event.actions.remove(index);
        Some(event)
    }
}

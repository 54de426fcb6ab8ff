//! Typed action accessors
//!
//! An [`ActionAccess`] pairs the current value of one action with a way to
//! update it, typed by the action variant an editor surface works with.

use std::marker::PhantomData;

use pagecraft_dom::{Action, ActionVariant, Ids, SourceIds};

use crate::Editor;

/// Where an accessed action lives
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionTarget {
    /// An event on the selected element
    Event(Ids),
    /// A data source's success list
    DataSource(SourceIds),
}

/// Read/update handle for one action of variant `T`
pub struct ActionAccess<'e, T> {
    editor: &'e mut Editor,
    target: ActionTarget,
    _variant: PhantomData<T>,
}

impl<'e, T: ActionVariant> ActionAccess<'e, T> {
    pub(crate) fn new(editor: &'e mut Editor, target: ActionTarget) -> Self {
        Self {
            editor,
            target,
            _variant: PhantomData,
        }
    }

    pub fn target(&self) -> &ActionTarget {
        &self.target
    }

    /// The addressed action, whatever its variant
    pub fn action(&self) -> Option<&Action> {
        match &self.target {
            ActionTarget::Event(ids) => self.editor.find_action(ids),
            ActionTarget::DataSource(ids) => self.editor.sources().find_action(ids),
        }
    }

    /// Current settings; `None` if the action is missing or not a `T`
    pub fn current(&self) -> Option<&T> {
        self.action()?.as_variant::<T>()
    }

    /// Replace the action's settings
    ///
    /// Returns whether anything changed. A data source action that does not
    /// exist yet is appended under the accessed id.
    pub fn update(&mut self, value: T) -> bool {
        match &self.target {
            ActionTarget::Event(ids) => {
                let action = Action::with_id(ids.action.clone(), value.into_payload());
                self.editor.update_action(ids, action)
            }
            ActionTarget::DataSource(ids) => {
                let action = Action::with_id(ids.action.clone(), value.into_payload());
                self.editor.update_data_source_action(&ids.source, &ids.action, action)
            }
        }
    }

    /// Update from a copy of the current settings
    pub fn modify<F>(&mut self, f: F) -> bool
    where
        F: FnOnce(&mut T),
    {
        let Some(mut value) = self.current().cloned() else {
            tracing::debug!("modify: no {} action at {:?}", T::NAME, self.target);
            return false;
        };
        f(&mut value);
        self.update(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Config;
    use pagecraft_dom::{AnimationAction, DataSource, Event, EventKind, SetStateAction, boxed, txt};

    fn editor_with_animation() -> (Editor, Ids) {
        let event = Event::new(EventKind::Click).with_action(Action::with_id("a1", AnimationAction::new("fade")));
        let ids = Ids::new(event.id.clone(), "a1");
        let element = txt("x").with_event(event);
        let element_id = element.id.clone();
        let mut editor = Editor::new(boxed(vec![element]), Config::default());
        editor.select(element_id);
        (editor, ids)
    }

    #[test]
    fn test_current_and_update() {
        let (mut editor, ids) = editor_with_animation();
        let mut access = editor.action::<AnimationAction>(&ids);
        assert_eq!(access.current().map(|a| a.animation_name.as_str()), Some("fade"));

        assert!(access.update(AnimationAction::new("slide")));
        assert_eq!(access.current().map(|a| a.animation_name.as_str()), Some("slide"));
        assert_eq!(access.action().map(|a| a.id.as_str()), Some("a1"));
    }

    #[test]
    fn test_wrong_variant_reads_none() {
        let (mut editor, ids) = editor_with_animation();
        let mut access = editor.action::<SetStateAction>(&ids);
        assert!(access.current().is_none());
        assert!(!access.modify(|a| a.state_name = "x".into()));
    }

    #[test]
    fn test_modify_in_place() {
        let (mut editor, ids) = editor_with_animation();
        editor
            .action::<AnimationAction>(&ids)
            .modify(|a| a.animation_name.push_str("-in"));
        let action = editor.find_action(&ids).unwrap();
        assert_eq!(action.as_variant::<AnimationAction>().unwrap().animation_name, "fade-in");
    }

    #[test]
    fn test_data_source_access_appends() {
        let mut editor = Editor::new(boxed(vec![]), Config::default());
        let source_id = editor
            .add_data_source(DataSource::new("users", "https://api.example.com/users"))
            .unwrap();

        let ids = SourceIds::new(source_id.clone(), "new-action");
        let mut access = editor.data_source_action::<AnimationAction>(&ids);
        assert!(access.current().is_none());
        assert!(access.update(AnimationAction::new("pulse")));
        assert_eq!(access.current().map(|a| a.animation_name.as_str()), Some("pulse"));
        assert_eq!(editor.sources().get(&source_id).unwrap().on_success.len(), 1);
    }
}

//! Editor - Main entry point
//!
//! One `Editor` is the explicit context of an editing session. Surfaces
//! read the page and the selection from it and send every change through
//! it; element edits apply to the selected element.

use std::sync::Arc;

use serde_json::{Value, json};

use pagecraft_dom::{
    Action, ActionRegistry, ActionVariant, Binding, BindingKind, DataSource, DecodeError, Decoder, Element, Event,
    EventKind, Id, Ids, RepeatFrom, SettingsDescriptor, SourceIds,
};
use pagecraft_edit::{DataSourceStore, ElementStore, Selection, StoreStats, Version, update};

use crate::{ActionAccess, ActionTarget, Config, EditorError, EditorResult, StateDescriptor, StateRegistry};

/// Editing session for one page
#[derive(Debug)]
pub struct Editor {
    config: Config,
    registry: ActionRegistry,
    elements: ElementStore,
    selection: Selection,
    sources: DataSourceStore,
    /// States declared by the page itself
    page_states: Vec<StateDescriptor>,
    /// Nodes dropped while loading
    load_errors: Vec<DecodeError>,
}

impl Editor {
    /// Create an editor for `root` with the built-in action variants
    pub fn new(root: Element, config: Config) -> Self {
        Self::with_registry(root, config, ActionRegistry::builtin())
    }

    pub fn with_registry(root: Element, config: Config, registry: ActionRegistry) -> Self {
        tracing::info!("Pagecraft editor {} initialized", crate::VERSION);
        Self {
            elements: ElementStore::with_history_limit(root, config.history_limit),
            config,
            registry,
            selection: Selection::new(),
            sources: DataSourceStore::new(),
            page_states: Vec::new(),
            load_errors: Vec::new(),
        }
    }

    /// Load a page from JSON text
    pub fn load(text: &str, config: Config) -> EditorResult<Self> {
        Self::load_with_registry(text, config, ActionRegistry::builtin())
    }

    pub fn load_with_registry(text: &str, config: Config, registry: ActionRegistry) -> EditorResult<Self> {
        let value: Value = serde_json::from_str(text).map_err(DecodeError::from)?;
        Self::load_value(&value, config, registry)
    }

    /// Load a page document
    ///
    /// The document is either a bare element tree or
    /// `{root, dataSources, states}`. Unless `strict_decode` is set,
    /// malformed nodes below the root are dropped and kept in
    /// [`Editor::load_errors`].
    pub fn load_value(value: &Value, config: Config, registry: ActionRegistry) -> EditorResult<Self> {
        let strict = config.strict_decode;
        let (root_value, sources_value, states_value) = match value.get("root") {
            Some(root) => (root, value.get("dataSources"), value.get("states")),
            None => (value, None, None),
        };

        let mut decoder = if strict {
            Decoder::strict(&registry)
        } else {
            Decoder::lenient(&registry)
        };
        let root = decoder.element(root_value)?;

        let mut sources = Vec::new();
        let mut source_errors = Vec::new();
        if let Some(list) = sources_value.and_then(Value::as_array) {
            for (index, item) in list.iter().enumerate() {
                match decoder.data_source(item, &format!("$.dataSources[{index}]")) {
                    Ok(source) => sources.push(source),
                    Err(err) if !strict => {
                        tracing::warn!("Dropping data source: {}", err);
                        source_errors.push(err);
                    }
                    Err(err) => return Err(err.into()),
                }
            }
        }

        let page_states = match states_value {
            Some(states) => serde_json::from_value(states.clone())
                .map_err(|err| DecodeError::InvalidField {
                    path: "$.states".into(),
                    field: "states".into(),
                    message: err.to_string(),
                })?,
            None => Vec::new(),
        };

        let mut load_errors = decoder.into_errors();
        load_errors.extend(source_errors);
        if !load_errors.is_empty() {
            tracing::warn!("Loaded page with {} malformed nodes dropped", load_errors.len());
        }

        let mut editor = Self::with_registry(root, config, registry);
        for source in sources {
            editor.sources.add(source);
        }
        editor.page_states = page_states;
        editor.load_errors = load_errors;
        Ok(editor)
    }

    /// Page document: `{root, dataSources, states}`
    pub fn serialize(&self) -> Value {
        json!({
            "root": self.elements.root().serialize(),
            "dataSources": self.sources.sources().iter().map(DataSource::serialize).collect::<Vec<_>>(),
            "states": self.page_states,
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn registry(&self) -> &ActionRegistry {
        &self.registry
    }

    pub fn load_errors(&self) -> &[DecodeError] {
        &self.load_errors
    }

    // ------------------------------------------------------------------------
    // Page and history
    // ------------------------------------------------------------------------

    /// Current page root
    pub fn root(&self) -> Arc<Element> {
        self.elements.get()
    }

    pub fn version(&self) -> Version {
        self.elements.version()
    }

    pub fn stats(&self) -> StoreStats {
        self.elements.stats()
    }

    pub fn undo(&mut self) -> Option<Version> {
        self.elements.undo()
    }

    pub fn can_undo(&self) -> bool {
        self.elements.can_undo()
    }

    /// Apply a tree update; returns whether a new version was stored
    fn apply<F>(&mut self, f: F) -> bool
    where
        F: FnOnce(&Arc<Element>) -> Arc<Element>,
    {
        let before = self.elements.version();
        self.elements.modify(f) != before
    }

    /// Apply a tree update to the selected element
    fn apply_selected<F>(&mut self, op: &'static str, f: F) -> bool
    where
        F: FnOnce(&Arc<Element>, &Id) -> Arc<Element>,
    {
        let Some(id) = self.selected().map(|e| e.id.clone()) else {
            tracing::debug!("{}: no element selected", op);
            return false;
        };
        self.apply(|root| f(root, &id))
    }

    // ------------------------------------------------------------------------
    // Selection
    // ------------------------------------------------------------------------

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn selection_mut(&mut self) -> &mut Selection {
        &mut self.selection
    }

    pub fn select(&mut self, id: Id) {
        self.selection.select(id);
    }

    /// The active selected element
    pub fn selected(&self) -> Option<&Element> {
        self.selection.current(self.elements.root())
    }

    // ------------------------------------------------------------------------
    // Events and actions
    // ------------------------------------------------------------------------

    /// Add a click event to the selected element; returns its id
    pub fn add_event(&mut self) -> Option<Id> {
        self.add_event_of(EventKind::Click)
    }

    pub fn add_event_of(&mut self, kind: EventKind) -> Option<Id> {
        let event = Event::new(kind);
        let id = event.id.clone();
        self.apply_selected("add_event", |root, element| update::add_event(root, element, event))
            .then_some(id)
    }

    /// Replace the event with `event.id` on the selected element
    pub fn edit_event(&mut self, event: Event) -> bool {
        self.apply_selected("edit_event", |root, element| update::edit_event(root, element, event))
    }

    pub fn remove_event(&mut self, event_id: &Id) -> bool {
        self.apply_selected("remove_event", |root, element| {
            update::remove_event(root, element, event_id)
        })
    }

    pub fn find_event(&self, event_id: &Id) -> Option<&Event> {
        pagecraft_edit::find_event(self.elements.root(), &self.selection, event_id)
    }

    /// Append a new action of variant `kind` to an event of the selected element
    ///
    /// Returns the new action's address, or `None` when the event is not on
    /// the selected element.
    pub fn add_action(&mut self, event_id: &Id, kind: &str) -> EditorResult<Option<Ids>> {
        let action = self
            .registry
            .create(kind)
            .ok_or_else(|| EditorError::UnknownAction(kind.to_string()))?;
        if self.find_event(event_id).is_none() {
            tracing::debug!("add_action: no event {} on the selection", event_id);
            return Ok(None);
        }
        let ids = Ids::new(event_id.clone(), action.id.clone());
        let changed = self.apply(|root| update::add_action(root, event_id, action));
        Ok(changed.then_some(ids))
    }

    /// Replace the settings of the action at `ids`, keeping its id
    pub fn update_action(&mut self, ids: &Ids, action: Action) -> bool {
        if self.find_action(ids).is_none() {
            tracing::debug!("update_action: no action {} on the selection", ids.action);
            return false;
        }
        self.apply(|root| update::update_action(root, ids, action))
    }

    pub fn remove_action(&mut self, ids: &Ids) -> bool {
        if self.find_action(ids).is_none() {
            return false;
        }
        self.apply(|root| update::remove_action(root, ids))
    }

    /// Action at `ids` on the selected element
    pub fn find_action(&self, ids: &Ids) -> Option<&Action> {
        pagecraft_edit::find_action(self.elements.root(), &self.selection, ids)
    }

    pub fn action_settings(&self, ids: &Ids) -> Option<SettingsDescriptor> {
        let event = self.find_event(&ids.event)?;
        Some(event.action(&ids.action)?.settings(ids, Some(event.kind)))
    }

    /// Typed accessor for the action at `ids`
    pub fn action<T: ActionVariant>(&mut self, ids: &Ids) -> ActionAccess<'_, T> {
        ActionAccess::new(self, ActionTarget::Event(ids.clone()))
    }

    // ------------------------------------------------------------------------
    // Bindings and repeat
    // ------------------------------------------------------------------------

    /// Add an empty binding of `kind` to the selected element
    ///
    /// An existing binding of the same kind is replaced.
    pub fn add_binding(&mut self, kind: BindingKind) -> bool {
        self.edit_binding(kind, Binding::default())
    }

    /// Set the binding of `kind` on the selected element
    pub fn edit_binding(&mut self, kind: BindingKind, binding: Binding) -> bool {
        self.apply_selected("edit_binding", |root, element| {
            update::edit_binding(root, element, kind, binding)
        })
    }

    pub fn remove_binding(&mut self, kind: BindingKind) -> bool {
        self.apply_selected("remove_binding", |root, element| {
            update::remove_binding(root, element, kind)
        })
    }

    /// Repeat the selected element over a state, or stop repeating it
    pub fn edit_repeat_from_state(&mut self, state_name: Option<&str>) -> bool {
        let repeat_from = state_name.map(|name| RepeatFrom::from_state_with_prefix(name, &self.config.state_prefix));
        self.apply_selected("edit_repeat_from", |root, element| {
            update::edit_repeat_from(root, element, repeat_from)
        })
    }

    // ------------------------------------------------------------------------
    // Data sources
    // ------------------------------------------------------------------------

    pub fn sources(&self) -> &DataSourceStore {
        &self.sources
    }

    /// Add a data source; its URL must be absolute
    pub fn add_data_source(&mut self, source: DataSource) -> EditorResult<Id> {
        validate_url(&source.url)?;
        let id = source.id.clone();
        self.sources.add(source);
        Ok(id)
    }

    pub fn edit_data_source(&mut self, id: &Id, source: DataSource) -> EditorResult<bool> {
        validate_url(&source.url)?;
        Ok(self.sources.edit(id, source))
    }

    pub fn remove_data_source(&mut self, id: &Id) -> Option<DataSource> {
        self.sources.remove(id)
    }

    /// Append a new action of variant `kind` to a source's success list
    pub fn add_data_source_action(&mut self, source_id: &Id, kind: &str) -> EditorResult<Option<SourceIds>> {
        let action = self
            .registry
            .create(kind)
            .ok_or_else(|| EditorError::UnknownAction(kind.to_string()))?;
        let ids = SourceIds::new(source_id.clone(), action.id.clone());
        let action_id = action.id.clone();
        Ok(self
            .sources
            .update_action(source_id, &action_id, action)
            .then_some(ids))
    }

    /// Replace a success action, or append it when `action_id` is unknown
    pub fn update_data_source_action(&mut self, source_id: &Id, action_id: &Id, action: Action) -> bool {
        self.sources.update_action(source_id, action_id, action)
    }

    pub fn remove_data_source_action(&mut self, ids: &SourceIds) -> bool {
        self.sources.remove_action(ids).is_some()
    }

    pub fn data_source_action_settings(&self, ids: &SourceIds) -> Option<SettingsDescriptor> {
        Some(self.sources.find_action(ids)?.data_source_settings(&ids.source))
    }

    /// Typed accessor for a data source success action
    pub fn data_source_action<T: ActionVariant>(&mut self, ids: &SourceIds) -> ActionAccess<'_, T> {
        ActionAccess::new(self, ActionTarget::DataSource(ids.clone()))
    }

    // ------------------------------------------------------------------------
    // States
    // ------------------------------------------------------------------------

    /// Declare a page-level state
    pub fn declare_state(&mut self, state: StateDescriptor) {
        self.page_states.retain(|s| s.name != state.name);
        self.page_states.push(state);
    }

    /// All states: those published by data sources, then page states
    pub fn states(&self) -> StateRegistry {
        let mut states = StateRegistry::new(self.config.state_prefix.clone());
        states.extend(
            self.sources
                .states(&self.config.state_prefix)
                .into_iter()
                .map(StateDescriptor::from),
        );
        states.extend(self.page_states.iter().cloned());
        states
    }
}

fn validate_url(raw: &str) -> EditorResult<()> {
    url::Url::parse(raw).map(|_| ()).map_err(|source| EditorError::InvalidUrl {
        url: raw.to_string(),
        source,
    })
}

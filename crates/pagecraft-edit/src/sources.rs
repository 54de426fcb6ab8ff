//! Data source registry
//!
//! Page-wide list of API data sources. Unlike element events, a source's
//! success list grows on first configuration: updating an unknown action id
//! appends it.

use pagecraft_dom::{Action, DataSource, Id, PropertyKind, SourceIds};

/// Owner of the page's data sources
#[derive(Debug, Clone, Default)]
pub struct DataSourceStore {
    sources: Vec<DataSource>,
}

impl DataSourceStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sources(&self) -> &[DataSource] {
        &self.sources
    }

    pub fn get(&self, id: &Id) -> Option<&DataSource> {
        self.sources.iter().find(|s| s.id == *id)
    }

    fn get_mut(&mut self, id: &Id) -> Option<&mut DataSource> {
        self.sources.iter_mut().find(|s| s.id == *id)
    }

    /// Add `source`; a source with the same id is replaced in place
    pub fn add(&mut self, source: DataSource) {
        match self.get_mut(&source.id) {
            Some(slot) => {
                tracing::debug!("Replacing data source {} ({})", source.id, source.state_name);
                *slot = source;
            }
            None => {
                tracing::debug!("Adding data source {} ({})", source.id, source.state_name);
                self.sources.push(source);
            }
        }
    }

    /// Replace the source `id`; the stored id is kept
    pub fn edit(&mut self, id: &Id, mut source: DataSource) -> bool {
        let Some(slot) = self.get_mut(id) else {
            tracing::debug!("edit: no data source {}", id);
            return false;
        };
        source.id = id.clone();
        *slot = source;
        true
    }

    pub fn remove(&mut self, id: &Id) -> Option<DataSource> {
        let index = self.sources.iter().position(|s| s.id == *id)?;
        Some(self.sources.remove(index))
    }

    /// Success action at `ids`
    pub fn find_action(&self, ids: &SourceIds) -> Option<&Action> {
        self.get(&ids.source)?.action(&ids.action)
    }

    /// Replace the success action `action_id` or append `action`
    ///
    /// A replaced action keeps its position and id. Returns `false` when
    /// the source does not exist.
    pub fn update_action(&mut self, source_id: &Id, action_id: &Id, action: Action) -> bool {
        let Some(source) = self.get_mut(source_id) else {
            tracing::debug!("update_action: no data source {}", source_id);
            return false;
        };
        match source.on_success.iter_mut().find(|a| a.is(action_id)) {
            Some(slot) => *slot = slot.with_payload_of(action),
            None => source.on_success.push(action),
        }
        true
    }

    /// Remove the success action at `ids`
    pub fn remove_action(&mut self, ids: &SourceIds) -> Option<Action> {
        let source = self.get_mut(&ids.source)?;
        let index = source.on_success.iter().position(|a| a.is(&ids.action))?;
        Some(source.on_success.remove(index))
    }

    /// State paths published by all sources under `prefix`
    pub fn states(&self, prefix: &str) -> Vec<(String, PropertyKind)> {
        self.sources.iter().flat_map(|s| s.state_paths(prefix)).collect()
    }
}

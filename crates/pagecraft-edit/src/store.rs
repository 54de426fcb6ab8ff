//! Element store
//!
//! Holds the current page root and a bounded history of earlier roots.
//! Because roots share unchanged subtrees, keeping history is cheap.

use std::collections::VecDeque;
use std::sync::Arc;

use pagecraft_dom::Element;

/// Version number of the stored page
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Version(pub u64);

impl Version {
    pub const INITIAL: Self = Version(0);

    pub fn next(self) -> Self {
        Version(self.0 + 1)
    }
}

/// Owner of the current page tree
#[derive(Debug)]
pub struct ElementStore {
    /// Current root
    root: Arc<Element>,
    version: Version,
    /// Earlier roots, oldest first (for undo)
    history: VecDeque<Arc<Element>>,
    max_history: usize,
}

impl ElementStore {
    /// Store holding `root` with the default history limit of 100
    pub fn new(root: Element) -> Self {
        Self::with_history_limit(root, 100)
    }

    pub fn with_history_limit(root: Element, max_history: usize) -> Self {
        Self {
            root: Arc::new(root),
            version: Version::INITIAL,
            history: VecDeque::new(),
            max_history,
        }
    }

    /// Current root
    pub fn get(&self) -> Arc<Element> {
        Arc::clone(&self.root)
    }

    /// Borrow the current root
    pub fn root(&self) -> &Arc<Element> {
        &self.root
    }

    pub fn version(&self) -> Version {
        self.version
    }

    /// Swap in a new root
    ///
    /// Setting the current root again is not a new version.
    pub fn set(&mut self, root: Arc<Element>) -> Version {
        if Arc::ptr_eq(&self.root, &root) {
            return self.version;
        }
        let previous = std::mem::replace(&mut self.root, root);
        if self.max_history > 0 {
            if self.history.len() >= self.max_history {
                self.history.pop_front();
            }
            self.history.push_back(previous);
        }
        self.version = self.version.next();
        tracing::debug!("Page version {}", self.version.0);
        self.version
    }

    /// Apply an update function to the current root
    pub fn modify<F>(&mut self, f: F) -> Version
    where
        F: FnOnce(&Arc<Element>) -> Arc<Element>,
    {
        let new_root = f(&self.root);
        self.set(new_root)
    }

    /// Restore the previous root
    pub fn undo(&mut self) -> Option<Version> {
        let previous = self.history.pop_back()?;
        self.root = previous;
        self.version = self.version.next();
        Some(self.version)
    }

    pub fn can_undo(&self) -> bool {
        !self.history.is_empty()
    }

    pub fn history_depth(&self) -> usize {
        self.history.len()
    }

    pub fn stats(&self) -> StoreStats {
        StoreStats {
            version: self.version,
            history_depth: self.history.len(),
            element_count: self.root.len(),
        }
    }
}

/// Statistics for the element store
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StoreStats {
    pub version: Version,
    pub history_depth: usize,
    pub element_count: usize,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::update::insert_child;
    use pagecraft_dom::{boxed, txt};

    #[test]
    fn test_set_and_undo() {
        let mut store = ElementStore::new(boxed(vec![]));
        let root_id = store.get().id.clone();

        store.modify(|r| insert_child(r, &root_id, 0, txt("a")));
        assert_eq!(store.version(), Version(1));
        assert_eq!(store.get().children.len(), 1);

        assert_eq!(store.undo(), Some(Version(2)));
        assert!(store.get().children.is_empty());
        assert!(!store.can_undo());
        assert_eq!(store.undo(), None);
    }

    #[test]
    fn test_noop_edit_is_not_a_version() {
        let mut store = ElementStore::new(boxed(vec![]));
        let missing = pagecraft_dom::Id::from("missing");
        let version = store.modify(|r| insert_child(r, &missing, 0, txt("a")));
        assert_eq!(version, Version::INITIAL);
        assert_eq!(store.history_depth(), 0);
    }

    #[test]
    fn test_history_is_bounded() {
        let mut store = ElementStore::with_history_limit(boxed(vec![]), 2);
        let root_id = store.get().id.clone();
        for _ in 0..5 {
            store.modify(|r| insert_child(r, &root_id, 0, txt("x")));
        }
        assert_eq!(store.history_depth(), 2);
        assert_eq!(store.stats().element_count, 6);
    }

    #[test]
    fn test_readers_keep_old_version() {
        let mut store = ElementStore::new(boxed(vec![]));
        let root_id = store.get().id.clone();
        let before = store.get();
        store.modify(|r| insert_child(r, &root_id, 0, txt("a")));
        assert!(before.children.is_empty());
        assert_eq!(store.get().children.len(), 1);
    }
}

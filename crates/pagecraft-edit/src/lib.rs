//! Pagecraft Edit - Copy-on-write tree editing
//!
//! Pure update functions over `Arc<Element>` roots, plus the stores that
//! hold the current page and its data sources.
//!
//! Every update is total: an address that matches nothing returns the input
//! root unchanged (`Arc::ptr_eq` holds). Only the path from the root to the
//! edited element is rebuilt; untouched subtrees are shared.

pub mod update;
mod diff;
mod store;
mod selection;
mod sources;

pub use update::{
    add_action, add_event, edit_binding, edit_event, edit_repeat_from, insert_child, modify_element,
    remove_action, remove_binding, remove_element, remove_event, replace_element, update_action,
};
pub use diff::{diff, Change};
pub use store::{ElementStore, StoreStats, Version};
pub use selection::{find_action, find_event, Selection};
pub use sources::DataSourceStore;

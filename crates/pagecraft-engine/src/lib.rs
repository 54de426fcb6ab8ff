//! Pagecraft Engine
//!
//! The editor context for a single page: the element store, the current
//! selection, data sources, and known states.
//!
//! # Example
//! ```rust,ignore
//! use pagecraft_engine::{Config, Editor};
//!
//! let mut editor = Editor::load(&std::fs::read_to_string("page.json")?, Config::default())?;
//! editor.select(root_id);
//! let event_id = editor.add_event();
//! ```

mod access;
mod config;
mod editor;
mod error;
mod state;

pub use access::{ActionAccess, ActionTarget};
pub use config::Config;
pub use editor::Editor;
pub use error::{EditorError, EditorResult};
pub use state::{StateDescriptor, StateRegistry};

// Re-export sub-crates for advanced usage
pub use pagecraft_dom as dom;
pub use pagecraft_edit as edit;

/// Engine version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

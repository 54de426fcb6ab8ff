//! Pagecraft DOM - Page element model
//!
//! The element tree edited by the page builder: elements, their events and
//! actions, state bindings, repeat metadata, and the JSON page format.
//!
//! Trees are immutable once built. Children are held in `Arc`s so edits can
//! rebuild only the path to the changed node (see `pagecraft-edit`).

mod id;
mod error;
mod expression;
mod binding;
mod event;
mod action;
mod registry;
mod element;
mod constructor;
mod codec;
mod source;

pub use id::Id;
pub use error::{DecodeError, DecodeResult};
pub use expression::{lookup, Expression, ExpressionPart};
pub use binding::{Binding, BindingKind, Condition, CONDITIONS};
pub use event::{Event, EventKind};
pub use action::{
    Action, ActionPayload, ActionVariant, AnimationAction, AnimationTarget, FetchAction, FieldValue,
    Ids, SetStateAction, SettingsDescriptor, SettingsField, SettingsTarget, SourceIds,
    ToggleStateAction,
};
pub use registry::ActionRegistry;
pub use element::{Element, ElementKind, Iter, RepeatFrom, Style, Viewport};
pub use constructor::{boxed, button, column, form, grid, img, input, link, submit, txt};
pub use codec::{Decoded, Decoder};
pub use source::{DataSource, HttpMethod, Property, PropertyKind};

/// State path prefix under which data sources publish their responses
pub const SOURCE_STATE_PREFIX: &str = "$store.source.";

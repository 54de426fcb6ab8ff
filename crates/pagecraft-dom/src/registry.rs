//! Action variant registry
//!
//! Maps each action `kind` to a decoder and a default constructor. The
//! registry drives both page decoding and the "add action" menu.

use std::sync::LazyLock;

use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use crate::{
    Action, ActionPayload, ActionVariant, AnimationAction, DecodeError, DecodeResult, FetchAction, Id,
    SetStateAction, ToggleStateAction,
};

static BUILTIN: LazyLock<ActionRegistry> = LazyLock::new(ActionRegistry::builtin);

#[derive(Debug, Clone, Copy)]
enum Decoder {
    /// Built-in variant decoded through serde
    Native {
        decode: fn(Map<String, Value>) -> Result<ActionPayload, serde_json::Error>,
        default: fn() -> ActionPayload,
    },
    /// Runtime variant kept as raw JSON
    Opaque,
}

#[derive(Debug, Clone)]
struct Entry {
    name: String,
    decoder: Decoder,
}

/// Registry of known action variants, in menu order
#[derive(Debug, Clone, Default)]
pub struct ActionRegistry {
    entries: Vec<Entry>,
}

fn decode_native<T>(fields: Map<String, Value>) -> Result<ActionPayload, serde_json::Error>
where
    T: ActionVariant + DeserializeOwned,
{
    serde_json::from_value::<T>(Value::Object(fields)).map(T::into_payload)
}

fn default_native<T>() -> ActionPayload
where
    T: ActionVariant + Default,
{
    T::default().into_payload()
}

impl ActionRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding the built-in variants
    pub fn builtin() -> Self {
        let mut registry = Self::new();
        registry.register::<AnimationAction>();
        registry.register::<SetStateAction>();
        registry.register::<ToggleStateAction>();
        registry.register::<FetchAction>();
        registry
    }

    /// Shared instance of [`ActionRegistry::builtin`]
    pub fn shared() -> &'static ActionRegistry {
        &BUILTIN
    }

    /// Register a typed variant, replacing any variant with the same name
    pub fn register<T>(&mut self)
    where
        T: ActionVariant + DeserializeOwned + Default,
    {
        self.insert(
            T::NAME.to_string(),
            Decoder::Native {
                decode: decode_native::<T>,
                default: default_native::<T>,
            },
        );
    }

    /// Register a variant whose payload is kept as raw JSON
    pub fn register_custom(&mut self, name: impl Into<String>) {
        self.insert(name.into(), Decoder::Opaque);
    }

    fn insert(&mut self, name: String, decoder: Decoder) {
        match self.entries.iter_mut().find(|e| e.name == name) {
            Some(entry) => entry.decoder = decoder,
            None => self.entries.push(Entry { name, decoder }),
        }
    }

    fn entry(&self, name: &str) -> Option<&Entry> {
        self.entries.iter().find(|e| e.name == name)
    }

    /// Registered variant names, in menu order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|e| e.name.as_str())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entry(name).is_some()
    }

    /// New action of the named variant with default settings and a fresh id
    pub fn create(&self, name: &str) -> Option<Action> {
        let entry = self.entry(name)?;
        let payload = match entry.decoder {
            Decoder::Native { default, .. } => default(),
            Decoder::Opaque => ActionPayload::Custom {
                name: entry.name.clone(),
                payload: Map::new(),
            },
        };
        Some(Action::new(payload))
    }

    /// Rebuild an action from its serialized form
    pub fn decode(&self, value: &Value, path: &str) -> DecodeResult<Action> {
        let Value::Object(map) = value else {
            return Err(DecodeError::invalid(path, "action", "expected an object"));
        };
        let mut fields = map.clone();
        let kind = match fields.remove("kind") {
            Some(Value::String(kind)) => kind,
            Some(_) => return Err(DecodeError::invalid(path, "kind", "expected a string")),
            None => {
                return Err(DecodeError::MissingField {
                    path: path.to_string(),
                    field: "kind",
                })
            }
        };
        let id = match fields.remove("id") {
            Some(Value::String(id)) => Id::from(id),
            Some(_) => return Err(DecodeError::invalid(path, "id", "expected a string")),
            None => {
                return Err(DecodeError::MissingField {
                    path: path.to_string(),
                    field: "id",
                })
            }
        };
        let entry = self.entry(&kind).ok_or_else(|| DecodeError::UnknownActionKind {
            path: path.to_string(),
            kind: kind.clone(),
        })?;
        let payload = match entry.decoder {
            Decoder::Native { decode, .. } => {
                decode(fields).map_err(|err| DecodeError::invalid(path, kind.as_str(), err))?
            }
            Decoder::Opaque => ActionPayload::Custom {
                name: kind,
                payload: fields,
            },
        };
        Ok(Action { id, payload })
    }
}
